//! 刷新循环
//!
//! 驱动一个注册中心客户端，把每次成功查询得到的快照写到输出。
//!
//! - **轮询模式**：查询 → 输出 → 等待固定间隔，出错只记录日志，节奏不变
//! - **监听模式**：首次进入立即查询；之后等待变更通知（按 tick 周期检查停机），
//!   收到通知后先清除再查询（查询时重新挂载监听），出错后等待重试间隔并从头开始；
//!   没有可用地址时不输出，继续等待下一次通知
//!
//! 两种模式下注册中心错误都不终止循环，只有停机信号或输出失败会结束它。

use tokio::io::AsyncWrite;
use tracing::{debug, info, warn};

use crate::discovery::backend::{RefreshMode, RegistryClient};
use crate::error::{RefreshError, RegistryError};
use crate::refresh::config::RefreshConfig;
use crate::refresh::notice::ChangeNotice;
use crate::shutdown::ShutdownSignal;
use crate::writer::SnapshotWriter;

/// 单次查询的结果
enum Outcome {
    Emitted,
    /// 没有可输出的内容，监听仍然有效
    Skipped,
    Failed,
}

/// 刷新循环
pub struct RefreshLoop<C, W> {
    client: C,
    writer: SnapshotWriter<W>,
    config: RefreshConfig,
    shutdown: ShutdownSignal,
}

impl<C, W> RefreshLoop<C, W>
where
    C: RegistryClient,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(client: C, writer: SnapshotWriter<W>, shutdown: ShutdownSignal) -> Self {
        Self {
            client,
            writer,
            config: RefreshConfig::default(),
            shutdown,
        }
    }

    /// 设置刷新配置
    pub fn with_config(mut self, config: RefreshConfig) -> Self {
        self.config = config;
        self
    }

    pub fn into_writer(self) -> SnapshotWriter<W> {
        self.writer
    }

    /// 运行直到停机
    pub async fn run(&mut self) -> Result<(), RefreshError> {
        info!(backend = %self.client.name(), "Refresh loop started");
        let result = match self.client.mode() {
            RefreshMode::Poll => self.run_poll().await,
            RefreshMode::Watch(notice) => self.run_watch(notice).await,
        };
        match &result {
            Ok(()) => info!(backend = %self.client.name(), "Refresh loop stopped"),
            Err(e) => warn!(backend = %self.client.name(), error = %e, "Refresh loop aborted"),
        }
        result
    }

    async fn run_poll(&mut self) -> Result<(), RefreshError> {
        while !self.shutdown.is_stopping() {
            self.refresh_once().await?;
            if self.shutdown.sleep(self.config.poll_interval).await {
                break;
            }
        }
        Ok(())
    }

    async fn run_watch(&mut self, notice: ChangeNotice) -> Result<(), RefreshError> {
        'arm: while !self.shutdown.is_stopping() {
            // 首次进入（以及每次出错重试后）强制立即读取
            notice.set();

            loop {
                if self.shutdown.is_stopping() {
                    break 'arm;
                }
                if !notice.is_set() {
                    tokio::select! {
                        _ = self.shutdown.stopped() => break 'arm,
                        _ = notice.wait(self.config.watch_tick) => {}
                    }
                    continue;
                }

                // 先清除再查询：查询期间到达的通知会保留到下一轮
                notice.take();
                if let Outcome::Failed = self.refresh_once().await? {
                    if self.shutdown.sleep(self.config.retry_delay).await {
                        break 'arm;
                    }
                    continue 'arm;
                }
            }
        }
        Ok(())
    }

    /// 查询一次并输出
    ///
    /// 注册中心错误在这里记录，不向上传播。
    async fn refresh_once(&mut self) -> Result<Outcome, RefreshError> {
        match self.client.fetch_membership().await {
            Ok(snapshot) => {
                self.writer.emit(&snapshot).await?;
                debug!(backend = %self.client.name(), addresses = snapshot.len(), "Snapshot emitted");
                Ok(Outcome::Emitted)
            }
            Err(e) if !e.needs_retry() => {
                debug!(backend = %self.client.name(), reason = %e, "Nothing to emit");
                Ok(Outcome::Skipped)
            }
            Err(e) => {
                self.log_registry_error(&e);
                Ok(Outcome::Failed)
            }
        }
    }

    fn log_registry_error(&self, e: &RegistryError) {
        match e {
            RegistryError::PathMissing(path) => warn!(
                backend = %self.client.name(),
                path = %path,
                retry_in = ?self.config.retry_delay,
                "Registry path not found"
            ),
            _ => warn!(
                backend = %self.client.name(),
                kind = e.kind(),
                error = %e,
                "Registry query failed"
            ),
        }
    }
}

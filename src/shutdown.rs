//! 优雅停机控制
//!
//! 进程级的停机闩锁：初始为运行状态，收到第一个终止信号（SIGINT/SIGTERM/SIGQUIT）
//! 后切换为停止状态，之后不再复位。刷新循环只观察它，不拥有它。

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// 停机信号（只读视图）
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    token: CancellationToken,
}

impl ShutdownSignal {
    /// 是否已进入停止状态
    pub fn is_stopping(&self) -> bool {
        self.token.is_cancelled()
    }

    /// 等待进入停止状态
    pub async fn stopped(&self) {
        self.token.cancelled().await
    }

    /// 在 `duration` 内等待停机
    ///
    /// 返回 `true` 表示等待期间收到了停机信号。
    pub async fn sleep(&self, duration: std::time::Duration) -> bool {
        tokio::select! {
            _ = self.token.cancelled() => true,
            _ = tokio::time::sleep(duration) => self.is_stopping(),
        }
    }
}

/// 停机控制器
#[derive(Debug, Clone, Default)]
pub struct ShutdownController {
    token: CancellationToken,
}

impl ShutdownController {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取停机信号
    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            token: self.token.clone(),
        }
    }

    /// 触发停机（幂等，首次触发生效）
    pub fn trigger(&self) {
        self.token.cancel();
    }

    pub fn is_stopping(&self) -> bool {
        self.token.is_cancelled()
    }

    /// 注册终止信号处理
    ///
    /// 后台任务在收到第一个信号后触发停机并退出，后续信号不再处理。
    pub fn install_signal_handlers(&self) -> std::io::Result<JoinHandle<()>> {
        let controller = self.clone();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};

            let mut sigint = signal(SignalKind::interrupt())?;
            let mut sigterm = signal(SignalKind::terminate())?;
            let mut sigquit = signal(SignalKind::quit())?;

            Ok(tokio::spawn(async move {
                let name = tokio::select! {
                    _ = sigint.recv() => "SIGINT",
                    _ = sigterm.recv() => "SIGTERM",
                    _ = sigquit.recv() => "SIGQUIT",
                    _ = controller.token.cancelled() => return,
                };
                info!(signal = name, "Shutdown signal received");
                controller.trigger();
            }))
        }

        #[cfg(not(unix))]
        {
            Ok(tokio::spawn(async move {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        info!("Shutdown signal received (Ctrl+C)");
                        controller.trigger();
                    }
                    _ = controller.token.cancelled() => {}
                }
            }))
        }
    }
}

//! 本地文件后端（监听）
//!
//! 文件每行一个地址：去掉首尾空白，跳过空行和 `#` 开头的注释，
//! 不是 `host:port` 的行会被跳过。没有可用地址时不输出，等待文件下一次变化。

use async_trait::async_trait;
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::discovery::backend::{RefreshMode, RegistryClient};
use crate::error::RegistryError;
use crate::refresh::ChangeNotice;
use crate::types::{MembershipSnapshot, is_host_port};

/// 本地文件客户端
pub struct FileClient {
    path: PathBuf,
    notice: ChangeNotice,
    watcher: Option<RecommendedWatcher>,
}

impl FileClient {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            notice: ChangeNotice::new(),
            watcher: None,
        }
    }

    /// 重新挂载文件监听
    ///
    /// 文件被删除或替换后旧的 inotify 监听失效，所以每次读取前都重新创建。
    fn arm_watch(&mut self) -> Result<(), RegistryError> {
        self.watcher = None;

        let notice = self.notice.clone();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) if is_content_change(&event.kind) => notice.set(),
            Ok(_) => {}
            Err(_) => notice.set(),
        })
        .map_err(|e| RegistryError::session(format!("file watcher init failed: {}", e)))?;

        watcher
            .watch(&self.path, RecursiveMode::NonRecursive)
            .map_err(|e| match e.kind {
                notify::ErrorKind::PathNotFound => {
                    RegistryError::path_missing(self.path.display().to_string())
                }
                notify::ErrorKind::Io(ref io) if io.kind() == std::io::ErrorKind::NotFound => {
                    RegistryError::path_missing(self.path.display().to_string())
                }
                _ => RegistryError::session(format!("watch {} failed: {}", self.path.display(), e)),
            })?;

        self.watcher = Some(watcher);
        Ok(())
    }
}

/// 访问时间等元数据变化不算（读取文件本身可能触发）
fn is_content_change(kind: &EventKind) -> bool {
    match kind {
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Modify(_) | EventKind::Remove(_) | EventKind::Create(_) => true,
        _ => false,
    }
}

/// 解析地址文件内容
pub fn parse_address_file(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| {
            let ok = is_host_port(line);
            if !ok {
                warn!(line = %line, "Skipping invalid address line");
            }
            ok
        })
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl RegistryClient for FileClient {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch_membership(&mut self) -> Result<MembershipSnapshot, RegistryError> {
        // 先挂载再读取，读取期间的修改不会丢失
        self.arm_watch()?;

        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RegistryError::path_missing(self.path.display().to_string()));
            }
            Err(e) => {
                return Err(RegistryError::malformed(format!(
                    "reading {} failed: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let addresses = parse_address_file(&content);
        debug!(path = %self.path.display(), addresses = addresses.len(), "Reloaded address file");
        if addresses.is_empty() {
            return Err(RegistryError::no_addresses(self.path.display().to_string()));
        }
        Ok(MembershipSnapshot::new(addresses))
    }

    fn mode(&self) -> RefreshMode {
        RefreshMode::Watch(self.notice.clone())
    }
}

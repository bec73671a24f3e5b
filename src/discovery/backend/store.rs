//! 层级协调存储后端（监听）
//!
//! 每次查询先列出组节点的子节点（同时挂载一次性子节点监听），
//! 再按子节点顺序读取每个子节点内容作为地址。

use async_trait::async_trait;
use tracing::debug;

use crate::discovery::backend::{RefreshMode, RegistryClient};
use crate::error::RegistryError;
use crate::refresh::ChangeNotice;
use crate::types::MembershipSnapshot;

/// 层级协调存储
///
/// 监听是一次性的：子节点增删时设置一次 `notice`，之后必须通过下一次
/// `list_children` 重新挂载，否则后续变化不会被发现。
#[async_trait]
pub trait CoordinationStore: Send + Sync {
    /// 列出 `path` 的子节点名，并挂载子节点变化监听
    ///
    /// `path` 不存在时返回 [`RegistryError::PathMissing`]。
    async fn list_children(
        &mut self,
        path: &str,
        notice: &ChangeNotice,
    ) -> Result<Vec<String>, RegistryError>;

    /// 读取节点内容
    async fn get_content(&mut self, path: &str) -> Result<Vec<u8>, RegistryError>;
}

/// 基于协调存储的监听客户端
pub struct WatchClient<S> {
    store: S,
    group_path: String,
    notice: ChangeNotice,
}

impl<S: CoordinationStore> WatchClient<S> {
    pub fn new(store: S, group_path: impl Into<String>) -> Self {
        Self {
            store,
            group_path: group_path.into(),
            notice: ChangeNotice::new(),
        }
    }

    pub fn notice(&self) -> &ChangeNotice {
        &self.notice
    }

    fn child_path(&self, child: &str) -> String {
        format!("{}/{}", self.group_path.trim_end_matches('/'), child)
    }
}

#[async_trait]
impl<S: CoordinationStore> RegistryClient for WatchClient<S> {
    fn name(&self) -> &str {
        "store"
    }

    async fn fetch_membership(&mut self) -> Result<MembershipSnapshot, RegistryError> {
        let children = self
            .store
            .list_children(&self.group_path, &self.notice)
            .await?;
        debug!(path = %self.group_path, children = children.len(), "Listed group children");

        let mut addresses = Vec::with_capacity(children.len());
        for child in &children {
            let content = self.store.get_content(&self.child_path(child)).await?;
            addresses.push(String::from_utf8_lossy(&content).into_owned());
        }
        Ok(MembershipSnapshot::new(addresses))
    }

    fn mode(&self) -> RefreshMode {
        RefreshMode::Watch(self.notice.clone())
    }
}

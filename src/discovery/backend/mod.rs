//! 注册中心客户端抽象和实现

pub mod directory;
pub mod etcd;
pub mod file;
pub mod fixed;
pub mod store;

use async_trait::async_trait;

use crate::error::RegistryError;
use crate::refresh::ChangeNotice;
use crate::types::MembershipSnapshot;

pub use directory::DirectoryClient;
pub use etcd::EtcdStore;
pub use file::FileClient;
pub use fixed::StaticClient;
pub use store::{CoordinationStore, WatchClient};

/// 成员变化的发现方式
#[derive(Debug, Clone)]
pub enum RefreshMode {
    /// 按固定间隔查询
    Poll,
    /// 后端通过通知闩锁推送变化，收到通知后再查询
    Watch(ChangeNotice),
}

/// 注册中心客户端
///
/// 所有后端（HTTP 目录、etcd、文件、静态列表）都实现这个 trait，
/// 启动时根据配置选择一种。
#[async_trait]
pub trait RegistryClient: Send {
    /// 后端名称（用于日志）
    fn name(&self) -> &str;

    /// 查询一次当前成员
    ///
    /// 监听类后端在查询的同时重新挂载监听。
    async fn fetch_membership(&mut self) -> Result<MembershipSnapshot, RegistryError>;

    /// 刷新方式，默认为轮询
    fn mode(&self) -> RefreshMode {
        RefreshMode::Poll
    }
}

#[async_trait]
impl<T: RegistryClient + ?Sized> RegistryClient for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn fetch_membership(&mut self) -> Result<MembershipSnapshot, RegistryError> {
        (**self).fetch_membership().await
    }

    fn mode(&self) -> RefreshMode {
        (**self).mode()
    }
}

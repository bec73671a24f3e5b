//! 注册中心客户端工厂

use anyhow::Context;
use tracing::info;

use crate::config::RefreshSettings;
use crate::discovery::BackendConfig;
use crate::discovery::backend::{
    DirectoryClient, EtcdStore, FileClient, RegistryClient, StaticClient, WatchClient,
};

/// 注册中心客户端工厂
pub struct RegistryFactory;

impl RegistryFactory {
    /// 从配置创建客户端
    ///
    /// 协调存储会话在这里建立（带连接超时），整个进程生命周期内复用。
    pub async fn create_client(
        backend: &BackendConfig,
        settings: &RefreshSettings,
    ) -> anyhow::Result<Box<dyn RegistryClient>> {
        let client: Box<dyn RegistryClient> = match backend {
            BackendConfig::Directory { .. } => {
                let group = backend
                    .group()
                    .context("directory backend without service group")?;
                let client = DirectoryClient::new(&group, settings.request_timeout())?;
                info!(url = %client.url(), "Using directory backend");
                Box::new(client)
            }
            BackendConfig::Store { url, base_path } => {
                let store = EtcdStore::connect(url, settings.connect_timeout(), settings.request_timeout())
                    .await
                    .with_context(|| format!("failed to open coordination store session at {}", url))?;
                info!(url = %url, path = %base_path, "Using coordination store backend");
                Box::new(WatchClient::new(store, base_path.clone()))
            }
            BackendConfig::File { path } => {
                info!(path = %path.display(), "Using file backend");
                Box::new(FileClient::new(path.clone()))
            }
            BackendConfig::Static { addresses } => {
                let client = StaticClient::new(addresses.clone())?;
                info!(addresses = addresses.len(), "Using static backend");
                Box::new(client)
            }
        };
        Ok(client)
    }
}

//! 静态地址列表后端（轮询）

use async_trait::async_trait;

use crate::discovery::backend::RegistryClient;
use crate::error::{ConfigError, RegistryError};
use crate::types::{MembershipSnapshot, is_host_port};

/// 固定地址列表，每次查询返回同一快照
pub struct StaticClient {
    snapshot: MembershipSnapshot,
}

impl StaticClient {
    /// 创建静态客户端，所有地址必须是 `host:port`
    pub fn new(addresses: Vec<String>) -> Result<Self, ConfigError> {
        if addresses.is_empty() {
            return Err(ConfigError::Invalid("static backend needs at least one address".to_string()));
        }
        if let Some(bad) = addresses.iter().find(|addr| !is_host_port(addr)) {
            return Err(ConfigError::InvalidAddress(bad.clone()));
        }
        Ok(Self {
            snapshot: MembershipSnapshot::new(addresses),
        })
    }
}

#[async_trait]
impl RegistryClient for StaticClient {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_membership(&mut self) -> Result<MembershipSnapshot, RegistryError> {
        Ok(self.snapshot.clone())
    }
}

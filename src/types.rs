//! 基础类型定义

use std::fmt;
use std::net::SocketAddr;

/// 刷新目标服务组
///
/// 进程生命周期内不可变，启动时确定。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceGroupRef {
    /// 后端位置：HTTP 目录服务的 host:port，或协调存储的连接串
    pub backend_location: String,

    /// 组路径：HTTP 目录为 `{namespace}/{service_type}`，协调存储为层级节点路径
    pub group_path: String,
}

impl ServiceGroupRef {
    pub fn new(backend_location: impl Into<String>, group_path: impl Into<String>) -> Self {
        Self {
            backend_location: backend_location.into(),
            group_path: group_path.into(),
        }
    }

    /// HTTP 目录服务的服务组
    pub fn directory(proxy: impl Into<String>, namespace: &str, service_type: &str) -> Self {
        Self::new(proxy, format!("{}/{}", namespace, service_type))
    }
}

impl fmt::Display for ServiceGroupRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.backend_location, self.group_path)
    }
}

/// 某一时刻注册中心视角下的成员快照
///
/// 顺序由注册中心决定，不做排序和去重。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipSnapshot {
    addresses: Vec<String>,
}

impl MembershipSnapshot {
    pub fn new(addresses: Vec<String>) -> Self {
        Self { addresses }
    }

    pub fn addresses(&self) -> &[String] {
        &self.addresses
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for MembershipSnapshot {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// 检查字符串是否是 `host:port` 形式的地址
///
/// 接受 IP 套接字地址（含 `[v6]:port`）和 `hostname:port`，不做 DNS 解析。
pub fn is_host_port(s: &str) -> bool {
    if s.parse::<SocketAddr>().is_ok() {
        return true;
    }
    let Some((host, port)) = s.rsplit_once(':') else {
        return false;
    };
    if port.parse::<u16>().is_err() || host.is_empty() {
        return false;
    }
    host.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '_')
}

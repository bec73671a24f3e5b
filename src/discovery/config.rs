//! 注册中心后端配置

use std::fmt;
use std::path::PathBuf;

use crate::types::ServiceGroupRef;

/// HTTP 目录服务的默认代理地址
pub const DEFAULT_PROXY: &str = "proxy:1234";

/// 后端配置，启动时由命令行确定
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    /// HTTP 目录服务（轮询）
    Directory {
        proxy: String,
        namespace: String,
        service_type: String,
    },
    /// etcd 协调存储（监听）
    Store { url: String, base_path: String },
    /// 本地地址文件（监听）
    File { path: PathBuf },
    /// 静态地址列表（轮询）
    Static { addresses: Vec<String> },
}

impl BackendConfig {
    pub fn directory(
        proxy: Option<String>,
        namespace: impl Into<String>,
        service_type: impl Into<String>,
    ) -> Self {
        BackendConfig::Directory {
            proxy: proxy.unwrap_or_else(|| DEFAULT_PROXY.to_string()),
            namespace: namespace.into(),
            service_type: service_type.into(),
        }
    }

    /// 目标服务组（仅 HTTP 目录和协调存储后端有）
    pub fn group(&self) -> Option<ServiceGroupRef> {
        match self {
            BackendConfig::Directory {
                proxy,
                namespace,
                service_type,
            } => Some(ServiceGroupRef::directory(proxy.clone(), namespace, service_type)),
            BackendConfig::Store { url, base_path } => {
                Some(ServiceGroupRef::new(url.clone(), base_path.clone()))
            }
            BackendConfig::File { .. } | BackendConfig::Static { .. } => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            BackendConfig::Directory { .. } => "directory",
            BackendConfig::Store { .. } => "store",
            BackendConfig::File { .. } => "file",
            BackendConfig::Static { .. } => "static",
        }
    }
}

impl fmt::Display for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendConfig::File { path } => write!(f, "file:{}", path.display()),
            BackendConfig::Static { addresses } => write!(f, "static:{}", addresses.join(",")),
            other => match other.group() {
                Some(group) => write!(f, "{}:{}", other.kind(), group),
                None => f.write_str(other.kind()),
            },
        }
    }
}

//! 刷新器错误类型
//!
//! 注册中心错误都在刷新循环内处理；只有快照输出失败会终止循环。

use thiserror::Error;

/// 注册中心查询错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// 无法连接注册中心（传输层错误、超时）
    #[error("registry unreachable: {0}")]
    Unreachable(String),

    /// 注册中心可达，但返回内容不符合约定格式
    #[error("malformed registry response: {0}")]
    MalformedResponse(String),

    /// 监听路径当前不存在
    #[error("registry path missing: {0}")]
    PathMissing(String),

    /// 会话级错误（会话过期、连接中断等）
    #[error("registry session error: {0}")]
    Session(String),

    /// 查询成功但没有可用地址，不输出，等待下一次变更
    #[error("no usable address in {0}")]
    NoAddresses(String),
}

impl RegistryError {
    pub fn unreachable(msg: impl Into<String>) -> Self {
        RegistryError::Unreachable(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        RegistryError::MalformedResponse(msg.into())
    }

    pub fn path_missing(path: impl Into<String>) -> Self {
        RegistryError::PathMissing(path.into())
    }

    pub fn session(msg: impl Into<String>) -> Self {
        RegistryError::Session(msg.into())
    }

    pub fn no_addresses(source: impl Into<String>) -> Self {
        RegistryError::NoAddresses(source.into())
    }

    /// 错误类型名称（用于结构化日志）
    pub fn kind(&self) -> &'static str {
        match self {
            RegistryError::Unreachable(_) => "unreachable",
            RegistryError::MalformedResponse(_) => "malformed_response",
            RegistryError::PathMissing(_) => "path_missing",
            RegistryError::Session(_) => "session",
            RegistryError::NoAddresses(_) => "no_addresses",
        }
    }

    /// 监听模式下是否需要等待重试间隔后强制重读
    ///
    /// `NoAddresses` 时监听已重新挂载，只需等待下一次变更。
    pub fn needs_retry(&self) -> bool {
        !matches!(self, RegistryError::NoAddresses(_))
    }
}

/// 刷新循环的终止错误
#[derive(Error, Debug)]
pub enum RefreshError {
    /// 快照输出端已关闭或写入失败
    #[error("snapshot output failed: {0}")]
    Output(#[from] std::io::Error),
}

/// 启动配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid address `{0}`: expected host:port")]
    InvalidAddress(String),

    #[error("{0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_failures_need_retry() {
        let errors = [
            RegistryError::unreachable("connection refused"),
            RegistryError::malformed("expected array"),
            RegistryError::path_missing("/lb/web"),
            RegistryError::session("expired"),
        ];
        for err in errors {
            assert!(err.needs_retry(), "{} should be retried", err.kind());
        }
        assert!(!RegistryError::no_addresses("/etc/lb/members").needs_retry());
    }

    #[test]
    fn test_display_carries_detail() {
        let err = RegistryError::path_missing("/lb/web");
        assert_eq!(err.to_string(), "registry path missing: /lb/web");
        assert_eq!(err.kind(), "path_missing");
    }
}

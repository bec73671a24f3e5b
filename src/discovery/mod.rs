//! 注册中心发现模块
//!
//! 统一的注册中心客户端抽象，支持 HTTP 目录服务（轮询）、etcd 协调存储（监听）、
//! 本地文件（监听）和静态列表（轮询）。

pub mod backend;
pub mod config;
pub mod factory;

pub use backend::{CoordinationStore, RefreshMode, RegistryClient, WatchClient};
pub use config::{BackendConfig, DEFAULT_PROXY};
pub use factory::RegistryFactory;

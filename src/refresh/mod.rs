//! 刷新引擎
//!
//! 把"如何发现成员变化"（轮询或监听）抽象在 [`RegistryClient`](crate::discovery::RegistryClient)
//! 之后，刷新循环只负责节奏、重试和停机。

pub mod config;
pub mod notice;
pub mod refresh_loop;

pub use config::RefreshConfig;
pub use notice::ChangeNotice;
pub use refresh_loop::RefreshLoop;

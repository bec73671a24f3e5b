//! 变更通知闩锁
//!
//! 监听后端的异步回调只允许调用 [`ChangeNotice::set`]；刷新循环负责读取、清除并重新挂载监听。
//! 消费前的多次通知等价于一次。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct NoticeInner {
    flag: AtomicBool,
    wakeup: Notify,
}

/// 一次性变更通知
#[derive(Debug, Clone, Default)]
pub struct ChangeNotice {
    inner: Arc<NoticeInner>,
}

impl ChangeNotice {
    pub fn new() -> Self {
        Self::default()
    }

    /// 标记"已变更"，可在任意线程调用
    pub fn set(&self) {
        if !self.inner.flag.swap(true, Ordering::AcqRel) {
            self.inner.wakeup.notify_one();
        }
    }

    pub fn is_set(&self) -> bool {
        self.inner.flag.load(Ordering::Acquire)
    }

    /// 消费通知，返回消费前是否已设置
    pub fn take(&self) -> bool {
        self.inner.flag.swap(false, Ordering::AcqRel)
    }

    /// 最多等待 `timeout`，返回等待结束时通知是否已设置
    pub async fn wait(&self, timeout: Duration) -> bool {
        if self.is_set() {
            return true;
        }
        let _ = tokio::time::timeout(timeout, self.inner.wakeup.notified()).await;
        self.is_set()
    }
}

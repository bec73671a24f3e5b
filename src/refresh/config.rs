//! 刷新循环配置

use std::time::Duration;

/// 刷新循环配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshConfig {
    /// 轮询模式的刷新间隔（默认 1 秒）
    pub poll_interval: Duration,
    /// 注册中心出错后的重试间隔（默认 1 秒）
    pub retry_delay: Duration,
    /// 监听模式下检查变更通知的周期（默认 1 秒）
    pub watch_tick: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            retry_delay: Duration::from_secs(1),
            watch_tick: Duration::from_secs(1),
        }
    }
}

impl RefreshConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_watch_tick(mut self, tick: Duration) -> Self {
        self.watch_tick = tick;
        self
    }
}

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::discovery::BackendConfig;
use crate::error::ConfigError;
use crate::refresh::RefreshConfig;

/// 配置文件（TOML）
///
/// ```toml
/// [refresh]
/// poll_interval_ms = 1000
/// retry_delay_ms = 1000
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub refresh: RefreshSettings,
}

/// 刷新相关设置，单位毫秒，缺省项使用默认值
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RefreshSettings {
    pub poll_interval_ms: u64,
    pub retry_delay_ms: u64,
    pub watch_tick_ms: u64,
    pub request_timeout_ms: u64,
    pub connect_timeout_ms: u64,
    pub static_interval_ms: u64,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            retry_delay_ms: 1000,
            watch_tick_ms: 1000,
            request_timeout_ms: 5000,
            connect_timeout_ms: 1000,
            static_interval_ms: 60_000,
        }
    }
}

impl RefreshSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// 生成刷新循环配置；静态后端使用自己的轮询间隔
    pub fn refresh_config(&self, backend: &BackendConfig) -> RefreshConfig {
        let poll_interval = match backend {
            BackendConfig::Static { .. } => self.static_interval_ms,
            _ => self.poll_interval_ms,
        };
        RefreshConfig::new()
            .with_poll_interval(Duration::from_millis(poll_interval))
            .with_retry_delay(Duration::from_millis(self.retry_delay_ms))
            .with_watch_tick(Duration::from_millis(self.watch_tick_ms))
    }

    /// 所有间隔必须大于 0，否则刷新循环会空转
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("poll_interval_ms", self.poll_interval_ms),
            ("retry_delay_ms", self.retry_delay_ms),
            ("watch_tick_ms", self.watch_tick_ms),
            ("request_timeout_ms", self.request_timeout_ms),
            ("connect_timeout_ms", self.connect_timeout_ms),
            ("static_interval_ms", self.static_interval_ms),
        ];
        match fields.iter().find(|(_, value)| *value == 0) {
            Some((name, _)) => Err(ConfigError::Invalid(format!("refresh.{} must be > 0", name))),
            None => Ok(()),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        let config = Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        config.refresh.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

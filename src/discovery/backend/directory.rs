//! HTTP 目录服务后端（轮询）
//!
//! 查询 `http://{proxy}/v2.0/cs/{namespace}/{service_type}`，响应体为对象数组，
//! 每个对象带 `addr` 字段，其余字段忽略。

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::discovery::backend::RegistryClient;
use crate::error::RegistryError;
use crate::types::{MembershipSnapshot, ServiceGroupRef};

#[derive(Debug, Deserialize)]
struct DirectoryEntry {
    addr: String,
}

/// HTTP 目录服务客户端
pub struct DirectoryClient {
    http_client: HttpClient,
    url: String,
}

impl DirectoryClient {
    /// 创建新的目录服务客户端
    ///
    /// `request_timeout` 限制单次查询（含连接）的总时长。
    pub fn new(group: &ServiceGroupRef, request_timeout: Duration) -> Result<Self, RegistryError> {
        let http_client = HttpClient::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| RegistryError::unreachable(format!("failed to build http client: {}", e)))?;

        Ok(Self {
            http_client,
            url: directory_url(group),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// 目录服务查询地址
pub fn directory_url(group: &ServiceGroupRef) -> String {
    format!("http://{}/v2.0/cs/{}", group.backend_location, group.group_path)
}

/// 解析目录服务响应体
pub fn parse_listing(body: &[u8]) -> Result<MembershipSnapshot, RegistryError> {
    let entries: Vec<DirectoryEntry> = serde_json::from_slice(body)
        .map_err(|e| RegistryError::malformed(format!("invalid directory listing: {}", e)))?;
    Ok(entries.into_iter().map(|entry| entry.addr).collect())
}

#[async_trait]
impl RegistryClient for DirectoryClient {
    fn name(&self) -> &str {
        "directory"
    }

    async fn fetch_membership(&mut self) -> Result<MembershipSnapshot, RegistryError> {
        debug!(url = %self.url, "Refreshing from directory");

        let resp = self
            .http_client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| RegistryError::unreachable(format!("GET {} failed: {}", self.url, e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RegistryError::malformed(format!(
                "GET {} returned status {}",
                self.url, status
            )));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| RegistryError::unreachable(format!("reading body of {} failed: {}", self.url, e)))?;

        parse_listing(&body)
    }
}

//! etcd 协调存储
//!
//! etcd 是扁平键空间，这里按层级存储的方式使用：组节点是键 `<path>`，
//! 子节点是键 `<path>/<child>`（child 中不含 `/`），子节点的值即地址。

use async_trait::async_trait;
use etcd_client::{Client, ConnectOptions, Event, EventType, GetOptions, WatchOptions};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::discovery::backend::CoordinationStore;
use crate::error::RegistryError;
use crate::refresh::ChangeNotice;

/// etcd 协调存储
pub struct EtcdStore {
    client: Client,
    /// 当前挂载的监听任务，重新挂载时取消旧的
    watch_task: Option<JoinHandle<()>>,
}

impl EtcdStore {
    /// 连接 etcd
    ///
    /// # 参数
    /// * `url` - 逗号分隔的 endpoint 列表
    /// * `connect_timeout` - 建立会话的超时
    /// * `request_timeout` - 单次请求超时
    pub async fn connect(
        url: &str,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, RegistryError> {
        let endpoints = parse_endpoints(url);
        if endpoints.is_empty() {
            return Err(RegistryError::session("etcd endpoints not configured"));
        }

        let options = ConnectOptions::new()
            .with_connect_timeout(connect_timeout)
            .with_timeout(request_timeout);

        let client = tokio::time::timeout(connect_timeout, Client::connect(&endpoints, Some(options)))
            .await
            .map_err(|_| {
                RegistryError::session(format!("connecting to {} timed out after {:?}", url, connect_timeout))
            })?
            .map_err(|e| RegistryError::session(format!("connecting to {} failed: {}", url, e)))?;

        Ok(Self {
            client,
            watch_task: None,
        })
    }

    /// 挂载一次性子节点监听（从 `start_revision` 开始），并替换旧监听
    async fn arm_watch(
        &mut self,
        group: &str,
        start_revision: i64,
        notice: &ChangeNotice,
    ) -> Result<(), RegistryError> {
        if let Some(previous) = self.watch_task.take() {
            previous.abort();
        }

        let opts = WatchOptions::new()
            .with_prefix()
            .with_start_revision(start_revision);
        let (mut watcher, mut stream) = self
            .client
            .watch(group, Some(opts))
            .await
            .map_err(|e| RegistryError::session(format!("watch {} failed: {}", group, e)))?;

        let group = group.to_string();
        let notice = notice.clone();
        self.watch_task = Some(tokio::spawn(async move {
            loop {
                match stream.message().await {
                    Ok(Some(resp)) => {
                        if resp.canceled() {
                            debug!(path = %group, "Watch canceled by server");
                            break;
                        }
                        if resp.events().iter().any(|ev| changes_children(&group, ev)) {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        warn!(path = %group, error = %e, "Watch stream failed");
                        break;
                    }
                }
            }
            // 流结束或出错也视为变化，迫使刷新循环重新读取并暴露会话错误
            notice.set();
            let _ = watcher.cancel().await;
        }));

        Ok(())
    }
}

impl Drop for EtcdStore {
    fn drop(&mut self) {
        if let Some(task) = self.watch_task.take() {
            task.abort();
        }
    }
}

#[async_trait]
impl CoordinationStore for EtcdStore {
    async fn list_children(
        &mut self,
        path: &str,
        notice: &ChangeNotice,
    ) -> Result<Vec<String>, RegistryError> {
        let group = path.trim_end_matches('/');
        let opts = GetOptions::new().with_prefix().with_keys_only();
        let resp = self
            .client
            .get(group, Some(opts))
            .await
            .map_err(|e| RegistryError::session(format!("get {} failed: {}", group, e)))?;

        let watch_from = watch_start_revision(resp.header().map(|h| h.revision()))?;

        let mut exists = false;
        let mut children = Vec::new();
        for kv in resp.kvs() {
            let Ok(key) = kv.key_str() else {
                continue;
            };
            if key == group {
                exists = true;
            } else if let Some(child) = direct_child(group, key) {
                exists = true;
                children.push(child.to_string());
            }
        }

        if !exists {
            return Err(RegistryError::path_missing(group));
        }

        self.arm_watch(group, watch_from, notice).await?;
        Ok(children)
    }

    async fn get_content(&mut self, path: &str) -> Result<Vec<u8>, RegistryError> {
        let resp = self
            .client
            .get(path, None)
            .await
            .map_err(|e| RegistryError::session(format!("get {} failed: {}", path, e)))?;

        resp.kvs()
            .first()
            .map(|kv| kv.value().to_vec())
            .ok_or_else(|| RegistryError::path_missing(path))
    }
}

/// 拆分逗号分隔的 endpoint 列表
pub fn parse_endpoints(url: &str) -> Vec<String> {
    url.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// 监听起点：读取时的 revision + 1
///
/// 缺少响应头时不能从 0 开始，否则会回放历史并立即触发通知。
fn watch_start_revision(read_revision: Option<i64>) -> Result<i64, RegistryError> {
    read_revision
        .map(|revision| revision + 1)
        .ok_or_else(|| RegistryError::session("missing response header"))
}

/// 若 `key` 是 `group` 的直接子节点，返回子节点名
pub fn direct_child<'a>(group: &str, key: &'a str) -> Option<&'a str> {
    let rest = key.strip_prefix(group)?.strip_prefix('/')?;
    if rest.is_empty() || rest.contains('/') {
        None
    } else {
        Some(rest)
    }
}

/// 事件是否改变了组的子节点集合
///
/// 与子节点监听一致：只关心创建和删除，内容更新不算。
fn changes_children(group: &str, event: &Event) -> bool {
    let Some(kv) = event.kv() else {
        return false;
    };
    let Ok(key) = kv.key_str() else {
        return false;
    };
    if key != group && direct_child(group, key).is_none() {
        return false;
    }
    match event.event_type() {
        EventType::Delete => true,
        EventType::Put => kv.create_revision() == kv.mod_revision(),
    }
}

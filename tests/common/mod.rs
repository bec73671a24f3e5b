//! 测试用的假后端和共享输出缓冲区

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::io::AsyncWrite;

use flare_refresh::{
    ChangeNotice, CoordinationStore, MembershipSnapshot, RefreshMode, RegistryClient,
    RegistryError,
};

/// 可在刷新循环运行期间读取的输出缓冲区
#[derive(Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.inner.lock().unwrap().clone()).unwrap()
    }

    /// 已输出的完整快照块
    pub fn blocks(&self) -> Vec<String> {
        let contents = self.contents();
        let mut blocks = Vec::new();
        let mut rest = contents.as_str();
        while let Some(end) = find_block_end(rest) {
            blocks.push(rest[..end].to_string());
            rest = &rest[end..];
        }
        blocks
    }

    /// 等待至少 `count` 个快照块输出
    pub async fn wait_for_blocks(&self, count: usize, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            if self.blocks().len() >= count {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        self.blocks().len() >= count
    }
}

/// 块以空行结束：块首的单独 "\n"（空快照）或第一个 "\n\n"
fn find_block_end(s: &str) -> Option<usize> {
    if s.starts_with('\n') {
        return Some(1);
    }
    s.find("\n\n").map(|i| i + 2)
}

impl AsyncWrite for SharedBuffer {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        self.inner.lock().unwrap().extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// 写入总是失败的输出（模拟下游管道已关闭）
pub struct BrokenPipe;

impl AsyncWrite for BrokenPipe {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        Poll::Ready(Err(std::io::ErrorKind::BrokenPipe.into()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// 按脚本返回结果的后端，脚本用完后重复最后一个结果
///
/// 默认为轮询模式；`watching` 构造的客户端以监听模式运行，由测试手动设置通知。
pub struct ScriptedClient {
    script: VecDeque<Result<MembershipSnapshot, RegistryError>>,
    last: Result<MembershipSnapshot, RegistryError>,
    notice: Option<ChangeNotice>,
    pub calls: Arc<Mutex<usize>>,
}

impl ScriptedClient {
    pub fn new(script: Vec<Result<MembershipSnapshot, RegistryError>>) -> Self {
        let last = script
            .last()
            .cloned()
            .unwrap_or_else(|| Ok(MembershipSnapshot::default()));
        Self {
            script: script.into(),
            last,
            notice: None,
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn watching(script: Vec<Result<MembershipSnapshot, RegistryError>>) -> Self {
        Self {
            notice: Some(ChangeNotice::new()),
            ..Self::new(script)
        }
    }

    pub fn notice(&self) -> Option<&ChangeNotice> {
        self.notice.as_ref()
    }
}

#[async_trait]
impl RegistryClient for ScriptedClient {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch_membership(&mut self) -> Result<MembershipSnapshot, RegistryError> {
        *self.calls.lock().unwrap() += 1;
        self.script.pop_front().unwrap_or_else(|| self.last.clone())
    }

    fn mode(&self) -> RefreshMode {
        match &self.notice {
            Some(notice) => RefreshMode::Watch(notice.clone()),
            None => RefreshMode::Poll,
        }
    }
}

#[derive(Default)]
struct StoreState {
    exists: bool,
    children: Vec<(String, String)>,
    missing_remaining: usize,
    session_errors_remaining: usize,
    list_calls: usize,
    armed: Option<ChangeNotice>,
}

/// 内存协调存储
///
/// 监听是一次性的：`list_children` 挂载，`add_child`/`remove_child` 触发一次后失效。
#[derive(Clone, Default)]
pub struct FakeStore {
    state: Arc<Mutex<StoreState>>,
}

impl FakeStore {
    pub fn with_children(children: &[(&str, &str)]) -> Self {
        let store = Self::default();
        {
            let mut state = store.state.lock().unwrap();
            state.exists = true;
            state.children = children
                .iter()
                .map(|(name, content)| (name.to_string(), content.to_string()))
                .collect();
        }
        store
    }

    /// 接下来 `n` 次列子节点返回路径不存在
    pub fn fail_missing(&self, n: usize) {
        self.state.lock().unwrap().missing_remaining = n;
    }

    /// 接下来 `n` 次列子节点返回会话错误
    pub fn fail_session(&self, n: usize) {
        self.state.lock().unwrap().session_errors_remaining = n;
    }

    /// 带外新增子节点，若有挂载的监听则触发它（只触发一次）
    pub fn add_child(&self, name: &str, content: &str) {
        let armed = {
            let mut state = self.state.lock().unwrap();
            state.children.push((name.to_string(), content.to_string()));
            state.armed.take()
        };
        // 回调只设置通知，不碰其他状态
        if let Some(notice) = armed {
            notice.set();
        }
    }

    pub fn remove_child(&self, name: &str) {
        let armed = {
            let mut state = self.state.lock().unwrap();
            state.children.retain(|(n, _)| n != name);
            state.armed.take()
        };
        if let Some(notice) = armed {
            notice.set();
        }
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }

    pub fn is_armed(&self) -> bool {
        self.state.lock().unwrap().armed.is_some()
    }
}

#[async_trait]
impl CoordinationStore for FakeStore {
    async fn list_children(
        &mut self,
        path: &str,
        notice: &ChangeNotice,
    ) -> Result<Vec<String>, RegistryError> {
        let mut state = self.state.lock().unwrap();
        state.list_calls += 1;
        if state.missing_remaining > 0 {
            state.missing_remaining -= 1;
            return Err(RegistryError::path_missing(path));
        }
        if state.session_errors_remaining > 0 {
            state.session_errors_remaining -= 1;
            return Err(RegistryError::session("session expired"));
        }
        if !state.exists {
            return Err(RegistryError::path_missing(path));
        }
        state.armed = Some(notice.clone());
        Ok(state.children.iter().map(|(name, _)| name.clone()).collect())
    }

    async fn get_content(&mut self, path: &str) -> Result<Vec<u8>, RegistryError> {
        let state = self.state.lock().unwrap();
        let name = path.rsplit('/').next().unwrap_or_default();
        state
            .children
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, content)| content.clone().into_bytes())
            .ok_or_else(|| RegistryError::path_missing(path))
    }
}

pub fn snapshot(addrs: &[&str]) -> MembershipSnapshot {
    addrs.iter().copied().collect()
}

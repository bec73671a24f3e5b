//! 快照输出
//!
//! 输出格式（下游负载均衡重载代理依赖此约定）：每行一个地址，按快照顺序；
//! 每个快照以一个空行结束。没有计数前缀，也没有快照编号。

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::warn;

use crate::types::MembershipSnapshot;

/// 快照写出器
pub struct SnapshotWriter<W> {
    out: W,
}

impl SnapshotWriter<tokio::io::Stdout> {
    /// 写到标准输出
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

impl<W: AsyncWrite + Unpin> SnapshotWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// 写出一个完整快照
    ///
    /// 整个块一次性写入并 flush。写入失败说明下游已关闭，由调用方终止。
    pub async fn emit(&mut self, snapshot: &MembershipSnapshot) -> std::io::Result<()> {
        let block = frame(snapshot);
        self.out.write_all(block.as_bytes()).await?;
        self.out.flush().await
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// 将快照编码为一个输出块
pub fn frame(snapshot: &MembershipSnapshot) -> String {
    let mut block = String::new();
    for raw in snapshot.addresses() {
        let addr = raw.trim();
        // 空行或内嵌换行会提前结束当前块
        if addr.is_empty() || addr.contains(['\n', '\r']) {
            warn!(address = ?raw, "Dropping address that would break snapshot framing");
            continue;
        }
        block.push_str(addr);
        block.push('\n');
    }
    block.push('\n');
    block
}

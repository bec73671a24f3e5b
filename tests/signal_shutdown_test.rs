//! 进程信号停机测试
//!
//! 启动 `flare-refresh static`，读到第一个快照块后发送信号，
//! 进程应在一个等待周期内以状态码 0 退出。
#![cfg(unix)]

use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::time::timeout;

const ADDRESS: &str = "10.0.0.1:80";

/// 启动进程并等待第一个 `10.0.0.1:80\n\n` 块
async fn spawn_and_wait_first_block() -> Child {
    let mut child = Command::new(env!("CARGO_BIN_EXE_flare-refresh"))
        .args(["static", ADDRESS])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to spawn flare-refresh");

    let stdout = child.stdout.take().expect("stdout is piped");
    let mut lines = BufReader::new(stdout).lines();
    let first_block = async {
        let mut block = Vec::new();
        while let Some(line) = lines.next_line().await.expect("Failed to read stdout") {
            if line.is_empty() {
                return block;
            }
            block.push(line);
        }
        panic!("stdout closed before the first block");
    };
    let block = timeout(Duration::from_secs(10), first_block)
        .await
        .expect("No block emitted in time");
    assert_eq!(block, [ADDRESS]);

    // 保持管道打开，避免进程写入时遇到 EPIPE
    tokio::spawn(async move { while let Ok(Some(_)) = lines.next_line().await {} });
    child
}

async fn send_signal(child: &Child, signal: &str) {
    let pid = child.id().expect("process is still running").to_string();
    let status = Command::new("kill")
        .args([signal, pid.as_str()])
        .status()
        .await
        .expect("Failed to run kill");
    assert!(status.success(), "kill {} {} failed", signal, pid);
}

async fn assert_clean_exit_after(signal: &str) {
    let mut child = spawn_and_wait_first_block().await;
    send_signal(&child, signal).await;

    let status = timeout(Duration::from_millis(1100), child.wait())
        .await
        .unwrap_or_else(|_| panic!("process still running 1.1s after {}", signal))
        .expect("Failed to wait for process");
    assert!(status.success(), "exit after {}: {:?}", signal, status);
}

/// 测试：SIGTERM 后正常退出
#[tokio::test]
async fn test_sigterm_exits_cleanly() {
    assert_clean_exit_after("-TERM").await;
}

/// 测试：SIGQUIT 后正常退出
#[tokio::test]
async fn test_sigquit_exits_cleanly() {
    assert_clean_exit_after("-QUIT").await;
}

/// 测试：SIGINT 后正常退出
#[tokio::test]
async fn test_sigint_exits_cleanly() {
    assert_clean_exit_after("-INT").await;
}

//! フレーム読み込みスレッド
//!
//! フレームソースから一定間隔でフレームを取得し、受信側に渡します。
//! 接続時は解像度、接続状態、フレームの順に通知します。

use super::FrameSource;
use crate::display::{FrameSink, UpdateStatus};
use fbview_common::Result;
use log::{debug, info, trace, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// フレーム読み込みスレッドのハンドル
pub struct FbReader {
    /// 名前
    name: String,
    /// 実行中かどうか
    running: Arc<AtomicBool>,
    /// スレッドハンドル
    handle: Option<JoinHandle<()>>,
}

impl FbReader {
    /// 読み込みスレッドを起動
    pub fn spawn(
        source: Box<dyn FrameSource>,
        sink: Arc<dyn FrameSink>,
        interval: Duration,
    ) -> Result<Self> {
        let name = source.name().to_string();
        let running = Arc::new(AtomicBool::new(true));
        let thread_running = Arc::clone(&running);

        let handle = thread::Builder::new()
            .name(format!("fb-reader-{}", name))
            .spawn(move || run_loop(source, sink, interval, thread_running))?;

        info!("フレーム読み込み開始: {} (間隔 {:?})", name, interval);

        Ok(Self {
            name,
            running,
            handle: Some(handle),
        })
    }

    /// 名前
    pub fn name(&self) -> &str {
        &self.name
    }

    /// スレッドが動作中かどうか
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().map_or(false, |h| !h.is_finished())
    }

    /// スレッドを停止して終了を待つ
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);

        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            if handle.join().is_err() {
                warn!("フレーム読み込みスレッドがパニックしました: {}", self.name);
            }
            info!("フレーム読み込み停止: {}", self.name);
        }
    }
}

impl Drop for FbReader {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_loop(
    mut source: Box<dyn FrameSource>,
    sink: Arc<dyn FrameSink>,
    interval: Duration,
    running: Arc<AtomicBool>,
) {
    match source.connect() {
        Ok(size) => {
            sink.notify_resolution_changed(size.width, size.height);
            sink.notify_connection_state(true);
        }
        Err(e) => {
            warn!("{}: 接続に失敗しました: {}", source.name(), e);
            sink.notify_connection_state(false);
            return;
        }
    }

    let mut counts = [0u64; 3];

    while running.load(Ordering::SeqCst) {
        match source.read_frame() {
            Ok(frame) => {
                let status = sink.push_raw_frame(Some(&frame));
                trace!("{}: frame {}", source.name(), status.as_str());
                counts[match status {
                    UpdateStatus::Done => 0,
                    UpdateStatus::Ignored => 1,
                    UpdateStatus::Invalid => 2,
                }] += 1;
            }
            Err(e) => {
                warn!("{}: フレームの読み込みに失敗しました: {}", source.name(), e);
                break;
            }
        }

        thread::park_timeout(interval);
    }

    source.disconnect();
    sink.notify_connection_state(false);

    debug!(
        "{}: done={} ignored={} invalid={}",
        source.name(),
        counts[0],
        counts[1],
        counts[2]
    );
}

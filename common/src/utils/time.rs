//! 時間ユーティリティ
//!
//! 時間処理に関連するユーティリティ機能を提供します。

use chrono::{DateTime, Local, Utc};
use std::collections::VecDeque;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// 現在のUNIXタイムスタンプ（ミリ秒）を取得
pub fn current_time_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0))
        .as_millis() as u64
}

/// タイムスタンプをフォーマット
pub fn format_timestamp(timestamp_millis: u64) -> String {
    let seconds = (timestamp_millis / 1000) as i64;
    let nanos = ((timestamp_millis % 1000) * 1_000_000) as u32;
    match DateTime::<Utc>::from_timestamp(seconds, nanos) {
        Some(dt) => {
            let local_dt = dt.with_timezone(&Local);
            local_dt.format("%Y-%m-%d %H:%M:%S").to_string()
        }
        None => "Invalid timestamp".to_string(),
    }
}

/// 一定数のサンプルからレート（回/秒）を求める計測器
#[derive(Debug, Clone)]
pub struct RateMeter {
    samples: VecDeque<Instant>,
    capacity: usize,
}

impl RateMeter {
    /// 新しい計測器を作成
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity.max(2)),
            capacity: capacity.max(2),
        }
    }

    /// 現在時刻でイベントを記録
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// 指定時刻でイベントを記録
    pub fn tick_at(&mut self, at: Instant) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(at);
    }

    /// 直近サンプルのレート
    pub fn rate(&self) -> f32 {
        match (self.samples.front(), self.samples.back()) {
            (Some(first), Some(last)) if self.samples.len() >= 2 => {
                let span = last.duration_since(*first).as_secs_f32();
                if span > 0.0 {
                    (self.samples.len() - 1) as f32 / span
                } else {
                    0.0
                }
            }
            _ => 0.0,
        }
    }
}

impl Default for RateMeter {
    fn default() -> Self {
        Self::new(60)
    }
}

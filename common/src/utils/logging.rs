//! ロギング機能
//!
//! `log` ファサードのバックエンドとして `env_logger` を初期化し、
//! 描画処理の時間計測用トレースを提供します。

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

use chrono::Local;
use lazy_static::lazy_static;
use log::LevelFilter;

/// ログレベル
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// トレース情報
    Trace = 0,
    /// デバッグ情報
    Debug = 1,
    /// 一般情報
    Info = 2,
    /// 警告
    Warn = 3,
    /// エラー
    Error = 4,
}

impl LogLevel {
    /// ログレベルを文字列に変換
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// 文字列からログレベルを解析
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "TRACE" => Some(LogLevel::Trace),
            "DEBUG" => Some(LogLevel::Debug),
            "INFO" => Some(LogLevel::Info),
            "WARN" | "WARNING" => Some(LogLevel::Warn),
            "ERROR" | "ERR" => Some(LogLevel::Error),
            _ => None,
        }
    }

    /// `log` クレートのフィルタに変換
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

lazy_static! {
    /// トレース時刻の基準点
    static ref TRACE_EPOCH: Instant = Instant::now();
}

/// グローバルロガーを初期化
///
/// `RUST_LOG` が設定されていればそちらを優先します。`file` を指定すると
/// 標準エラー出力の代わりにファイルへ追記します。
pub fn init_logger(level: LogLevel, file: Option<&Path>) -> io::Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level.to_level_filter());

    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }

    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} [{}] {}: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    if let Some(path) = file {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e.to_string()))?;

    // 基準時刻を確定させる
    lazy_static::initialize(&TRACE_EPOCH);

    Ok(())
}

/// 描画処理の区切りをトレースログに記録
///
/// プロセス起動からの経過ミリ秒をラベルと共に出力します。
pub fn dt_trace(label: &str) {
    if log::log_enabled!(log::Level::Trace) {
        let elapsed = TRACE_EPOCH.elapsed();
        log::trace!("[{:>8}.{:03}] {}", elapsed.as_secs(), elapsed.subsec_millis(), label);
    }
}

/// パニック時のログ記録ハンドラーを設定
pub fn set_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        let message = match panic_info.payload().downcast_ref::<&str>() {
            Some(s) => *s,
            None => match panic_info.payload().downcast_ref::<String>() {
                Some(s) => s.as_str(),
                None => "Unknown panic payload",
            },
        };

        let location = match panic_info.location() {
            Some(loc) => format!(" at {}:{}", loc.file(), loc.line()),
            None => String::new(),
        };

        eprintln!("Panic: {}{}", message, location);
        log::error!("Panic: {}{}", message, location);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parse() {
        assert_eq!(LogLevel::from_str("trace"), Some(LogLevel::Trace));
        assert_eq!(LogLevel::from_str("Warning"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_str("ERR"), Some(LogLevel::Error));
        assert_eq!(LogLevel::from_str("verbose"), None);
    }

    #[test]
    fn test_log_level_filter_mapping() {
        assert_eq!(LogLevel::Debug.to_level_filter(), LevelFilter::Debug);
        assert_eq!(LogLevel::Error.to_level_filter(), LevelFilter::Error);
        assert!(LogLevel::Trace < LogLevel::Info);
    }

    #[test]
    fn test_dt_trace_without_logger() {
        // ロガー未初期化でも落ちないこと
        dt_trace("FB PAINT S");
        dt_trace("FB PAINT E");
    }
}

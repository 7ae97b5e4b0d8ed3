//! フレームバッファビューア共通ライブラリ
//!
//! このクレートは、フレームバッファビューアで使用される
//! エラー型、設定、ロギングなどの共通機能を提供します。

pub mod config;
pub mod error;
pub mod utils;

// 主要コンポーネントを再エクスポート
pub use config::{
    ConfigError, SourceKind, ViewerConfig, DEFAULT_FB_HEIGHT, DEFAULT_FB_WIDTH, MAX_FB_DIMENSION,
};
pub use error::{ErrorCode, FbError, Result};

/// ライブラリのバージョン
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 設定に従ってロギングを初期化
pub fn initialize(config: &ViewerConfig) -> Result<()> {
    let level = utils::logging::LogLevel::from_str(&config.logging.level)
        .ok_or_else(|| FbError::InvalidParameter(format!("不明なログレベル: {}", config.logging.level)))?;

    utils::logging::init_logger(level, config.logging.file.as_deref())?;

    // パニックハンドラを設定
    utils::logging::set_panic_hook();

    log::info!(
        "fbview {} 初期化 - プラットフォーム: {} ({})",
        VERSION,
        std::env::consts::OS,
        std::env::consts::ARCH
    );

    Ok(())
}

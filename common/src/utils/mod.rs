//! ユーティリティモジュール
//!
//! 各種ユーティリティ機能を提供します。

pub mod logging;
pub mod time;

/// パス関連のユーティリティ
pub mod path {
    use std::path::PathBuf;

    /// 設定ディレクトリを取得
    pub fn get_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fbview")
    }
}

//! エラー型定義
//!
//! フレームバッファビューアで使用する共通エラー型を定義します。

use std::fmt;
use std::io;
use thiserror::Error;

use crate::config::ConfigError;

/// 共通エラー
#[derive(Error, Debug)]
pub enum FbError {
    /// 入出力エラー
    #[error("I/Oエラー: {0}")]
    Io(#[from] io::Error),

    /// 設定エラー
    #[error("設定エラー: {0}")]
    Config(#[from] ConfigError),

    /// フレームソースのエラー
    #[error("フレームソースエラー: {0}")]
    Source(String),

    /// 無効なパラメータ
    #[error("無効なパラメータ: {0}")]
    InvalidParameter(String),

    /// その他のエラー
    #[error("{0}")]
    Other(String),
}

impl FbError {
    /// ログ用のエラー分類を取得
    pub fn code(&self) -> ErrorCode {
        match self {
            FbError::Io(_) => ErrorCode::Io,
            FbError::Config(_) => ErrorCode::Config,
            FbError::Source(_) => ErrorCode::Source,
            FbError::InvalidParameter(_) => ErrorCode::InvalidParameter,
            FbError::Other(_) => ErrorCode::Other,
        }
    }
}

/// エラー分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// 入出力エラー
    Io,
    /// 設定エラー
    Config,
    /// フレームソースのエラー
    Source,
    /// 無効なパラメータ
    InvalidParameter,
    /// その他のエラー
    Other,
}

impl ErrorCode {
    /// 文字列表現を取得
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Io => "io",
            ErrorCode::Config => "config",
            ErrorCode::Source => "source",
            ErrorCode::InvalidParameter => "invalid-parameter",
            ErrorCode::Other => "other",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 結果型のエイリアス
pub type Result<T> = std::result::Result<T, FbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = FbError::Source("デバイスが応答しません".to_string());
        assert_eq!(err.code(), ErrorCode::Source);
        assert_eq!(err.to_string(), "フレームソースエラー: デバイスが応答しません");

        let err = FbError::InvalidParameter("x".to_string());
        assert_eq!(format!("[{}] {}", err.code(), err), "[invalid-parameter] 無効なパラメータ: x");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: FbError = io_err.into();
        assert_eq!(err.code(), ErrorCode::Io);
    }

    #[test]
    fn test_config_error_conversion() {
        let err: FbError = ConfigError::Invalid {
            key: "display.cells",
            reason: "0".to_string(),
        }
        .into();
        assert_eq!(err.code(), ErrorCode::Config);
    }
}

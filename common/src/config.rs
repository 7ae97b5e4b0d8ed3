//! 設定管理
//!
//! ビューア設定の読み込み、保存、および検証機能を提供します。

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// デフォルトのセル幅
pub const DEFAULT_FB_WIDTH: u32 = 256;
/// デフォルトのセル高さ
pub const DEFAULT_FB_HEIGHT: u32 = 256;
/// 受け付ける解像度の一辺の最大値
pub const MAX_FB_DIMENSION: u32 = 8192;

/// 設定エラー
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O エラー
    #[error("設定の読み書き中にI/Oエラーが発生しました: {0}")]
    IoError(#[from] io::Error),

    /// JSON エラー
    #[error("JSONの解析に失敗しました: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML デシリアライズエラー
    #[error("TOMLの解析に失敗しました: {0}")]
    TomlDeError(#[from] toml::de::Error),

    /// TOML シリアライズエラー
    #[error("TOMLのシリアライズに失敗しました: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    /// 設定値が不正
    #[error("設定値 '{key}' が不正です: {reason}")]
    Invalid {
        /// 設定キー
        key: &'static str,
        /// 理由
        reason: String,
    },
}

/// 設定形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigFormat {
    /// JSON 形式
    Json,
    /// TOML 形式
    #[default]
    Toml,
}

impl ConfigFormat {
    /// ファイル拡張子から設定形式を判定
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

/// ファイルから設定を読み込み
pub fn load_from_file<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path).unwrap_or_default();

    let mut file = File::open(path)?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;

    let value = match format {
        ConfigFormat::Json => serde_json::from_str(&content)?,
        ConfigFormat::Toml => toml::from_str(&content)?,
    };

    Ok(value)
}

/// 設定をファイルに保存
pub fn save_to_file<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<(), ConfigError> {
    let path = path.as_ref();

    // ディレクトリが存在することを確認
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let content = match ConfigFormat::from_path(path).unwrap_or_default() {
        ConfigFormat::Json => serde_json::to_string_pretty(value)?,
        ConfigFormat::Toml => toml::to_string(value)?,
    };

    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}

/// 表示設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// セルの幅
    pub cell_width: u32,
    /// セルの高さ
    pub cell_height: u32,
    /// グリッドの列数
    pub columns: u32,
    /// セルの数
    pub cells: u32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            cell_width: DEFAULT_FB_WIDTH,
            cell_height: DEFAULT_FB_HEIGHT,
            columns: 2,
            cells: 1,
        }
    }
}

/// フレームソースの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// テストパターン
    Synthetic,
    /// 生ダンプファイルの再生
    RawFile,
}

/// フレームソース設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// ソースの種類
    pub kind: SourceKind,
    /// ソース解像度の幅
    pub width: u32,
    /// ソース解像度の高さ
    pub height: u32,
    /// 生ダンプファイルのパス
    pub raw_path: Option<PathBuf>,
    /// フレーム取得間隔 (ミリ秒)
    pub frame_interval_ms: u64,
    /// テストパターンが同じフレームを繰り返す回数
    pub static_frames: u32,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            kind: SourceKind::Synthetic,
            width: 320,
            height: 240,
            raw_path: None,
            frame_interval_ms: 33,
            static_frames: 4,
        }
    }
}

/// ログ設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// ログレベル
    pub level: String,
    /// ログファイル（未指定なら標準エラー出力）
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// ビューア設定
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// 表示設定
    pub display: DisplaySettings,
    /// フレームソース設定
    pub source: SourceSettings,
    /// ログ設定
    pub logging: LoggingSettings,
}

impl ViewerConfig {
    /// デフォルトの設定ファイルパスを取得
    pub fn default_path() -> PathBuf {
        crate::utils::path::get_config_dir().join("config.toml")
    }

    /// ファイルから読み込んで検証
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config: ViewerConfig = load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// ファイルが存在すれば読み込み、なければデフォルト値を返す
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            log::info!("設定ファイルが見つかりません。デフォルト設定を使用します: {:?}", path.as_ref());
            Ok(Self::default())
        }
    }

    /// ファイルに保存
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        self.validate()?;
        save_to_file(self, path)
    }

    /// 設定値を検証
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn non_zero(key: &'static str, value: u64) -> Result<(), ConfigError> {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    key,
                    reason: "0より大きい値が必要です".to_string(),
                });
            }
            Ok(())
        }

        fn dimension(key: &'static str, value: u32) -> Result<(), ConfigError> {
            non_zero(key, value as u64)?;
            if value > MAX_FB_DIMENSION {
                return Err(ConfigError::Invalid {
                    key,
                    reason: format!("{} 以下である必要があります", MAX_FB_DIMENSION),
                });
            }
            Ok(())
        }

        dimension("display.cell_width", self.display.cell_width)?;
        dimension("display.cell_height", self.display.cell_height)?;
        non_zero("display.columns", self.display.columns as u64)?;
        non_zero("display.cells", self.display.cells as u64)?;
        dimension("source.width", self.source.width)?;
        dimension("source.height", self.source.height)?;
        non_zero("source.frame_interval_ms", self.source.frame_interval_ms)?;
        non_zero("source.static_frames", self.source.static_frames as u64)?;

        if self.source.kind == SourceKind::RawFile && self.source.raw_path.is_none() {
            return Err(ConfigError::Invalid {
                key: "source.raw_path",
                reason: "raw-file ソースにはファイルパスが必要です".to_string(),
            });
        }

        if crate::utils::logging::LogLevel::from_str(&self.logging.level).is_none() {
            return Err(ConfigError::Invalid {
                key: "logging.level",
                reason: format!("不明なログレベル: {}", self.logging.level),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("fbview-config-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = ViewerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.display.cell_width, DEFAULT_FB_WIDTH);
        assert_eq!(config.display.cell_height, DEFAULT_FB_HEIGHT);
        assert_eq!(config.source.kind, SourceKind::Synthetic);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.json")), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_path(Path::new("a.TOML")), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_path(Path::new("a.ini")), None);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ViewerConfig = toml::from_str(
            r#"
            [display]
            cells = 4

            [source]
            kind = "synthetic"
            width = 64
            "#,
        )
        .unwrap();

        assert_eq!(config.display.cells, 4);
        assert_eq!(config.display.cell_width, DEFAULT_FB_WIDTH);
        assert_eq!(config.source.width, 64);
        assert_eq!(config.source.height, 240);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_save_and_load_toml_and_json() {
        let mut config = ViewerConfig::default();
        config.display.cells = 3;
        config.source.frame_interval_ms = 50;
        config.logging.level = "debug".to_string();

        for name in ["viewer.toml", "viewer.json"] {
            let path = temp_path(name);
            config.save(&path).unwrap();
            let loaded = ViewerConfig::load(&path).unwrap();
            assert_eq!(loaded, config);
            let _ = fs::remove_file(&path);
        }
    }

    #[test]
    fn test_validation_rejects_zero_values() {
        let mut config = ViewerConfig::default();
        config.display.cells = 0;
        match config.validate() {
            Err(ConfigError::Invalid { key, .. }) => assert_eq!(key, "display.cells"),
            other => panic!("unexpected result: {:?}", other),
        }

        let mut config = ViewerConfig::default();
        config.source.frame_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_oversized_resolution() {
        let mut config = ViewerConfig::default();
        config.source.width = MAX_FB_DIMENSION;
        assert!(config.validate().is_ok());

        config.source.width = MAX_FB_DIMENSION + 1;
        match config.validate() {
            Err(ConfigError::Invalid { key, .. }) => assert_eq!(key, "source.width"),
            other => panic!("unexpected result: {:?}", other),
        }

        let mut config = ViewerConfig::default();
        config.display.cell_height = u32::MAX;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_requires_raw_path() {
        let mut config = ViewerConfig::default();
        config.source.kind = SourceKind::RawFile;
        assert!(config.validate().is_err());

        config.source.raw_path = Some(PathBuf::from("/tmp/fb.raw"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_unknown_log_level() {
        let mut config = ViewerConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = ViewerConfig::load_or_default(temp_path("does-not-exist.toml")).unwrap();
        assert_eq!(config, ViewerConfig::default());
    }
}

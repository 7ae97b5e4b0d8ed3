//! ビューアエントリポイント
//!
//! 設定を読み込み、ロギングを初期化してメインウィンドウを起動します。

use anyhow::{anyhow, Context as _};
use clap::Parser;
use eframe::egui;
use fbview_client::ui::ViewerWindow;
use fbview_common::config::SourceKind;
use fbview_common::ViewerConfig;
use std::path::PathBuf;

/// コマンドライン引数
#[derive(Parser, Debug)]
#[command(name = "fbview", version, about = "リモートフレームバッファビューア")]
struct Args {
    /// 設定ファイル（.toml / .json）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 表示するセルの数
    #[arg(long)]
    cells: Option<u32>,

    /// 再生する生ダンプファイル（RGBX32）
    #[arg(long)]
    raw: Option<PathBuf>,

    /// ソース解像度の幅
    #[arg(long)]
    width: Option<u32>,

    /// ソース解像度の高さ
    #[arg(long)]
    height: Option<u32>,

    /// ログレベル（trace, debug, info, warn, error）
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    /// 引数で設定を上書き
    fn apply(self, config: &mut ViewerConfig) {
        if let Some(cells) = self.cells {
            config.display.cells = cells;
        }
        if let Some(raw) = self.raw {
            config.source.kind = SourceKind::RawFile;
            config.source.raw_path = Some(raw);
        }
        if let Some(width) = self.width {
            config.source.width = width;
        }
        if let Some(height) = self.height {
            config.source.height = height;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(ViewerConfig::default_path);
    let mut config = ViewerConfig::load_or_default(&config_path)
        .with_context(|| format!("設定ファイルの読み込みに失敗しました: {:?}", config_path))?;
    args.apply(&mut config);
    config.validate().context("設定が不正です")?;

    fbview_common::initialize(&config).context("初期化に失敗しました")?;

    let columns = config.display.columns.min(config.display.cells).max(1) as f32;
    let rows = ((config.display.cells as f32) / columns).ceil();
    let window_size = egui::vec2(
        (config.display.cell_width as f32 + 16.0) * columns + 32.0,
        (config.display.cell_height as f32 + 40.0) * rows + 96.0,
    );

    // ネイティブオプションを設定
    let native_options = eframe::NativeOptions {
        initial_window_size: Some(window_size),
        min_window_size: Some(egui::vec2(320.0, 240.0)),
        resizable: true,
        vsync: true,
        ..Default::default()
    };

    eframe::run_native(
        "フレームバッファビューア",
        native_options,
        Box::new(move |cc| Box::new(ViewerWindow::new(cc, config))),
    )
    .map_err(|e| anyhow!("アプリケーションの起動に失敗しました: {}", e))
}

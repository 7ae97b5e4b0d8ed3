//! メインウィンドウ
//!
//! セルをグリッド状に並べ、各セルに読み込みスレッドを割り当てます。

use super::cell_view::CellView;
use crate::display::{CellSize, FramebufferCell};
use crate::source::{create_source, FbReader};
use fbview_common::utils::time::{format_timestamp, RateMeter};
use fbview_common::ViewerConfig;
use log::{error, info};
use std::sync::Arc;
use std::time::Duration;

/// メインウィンドウ
pub struct ViewerWindow {
    /// 設定
    config: ViewerConfig,
    /// セル一覧
    cells: Vec<CellView>,
    /// 描画レート計測
    paint_rate: RateMeter,
}

impl ViewerWindow {
    /// 新しいメインウィンドウを作成し、読み込みを開始
    pub fn new(cc: &eframe::CreationContext, config: ViewerConfig) -> Self {
        let display = CellSize::new(config.display.cell_width, config.display.cell_height);

        let cells = (0..config.display.cells as usize)
            .map(|index| {
                let cell = Arc::new(FramebufferCell::new());
                cell.set_display_size(display);

                let label = format!("#{}", index);
                let mut view = CellView::new(&cc.egui_ctx, label, Arc::clone(&cell));
                match Self::start_reader(&config, index, cell) {
                    Ok(reader) => view.attach_reader(reader),
                    Err(e) => error!("[{}] セル {} の読み込みを開始できません: {}", e.code(), index, e),
                }
                view
            })
            .collect();

        info!("ビューア起動: セル {} 個 ({})", config.display.cells, display);

        Self {
            config,
            cells,
            paint_rate: RateMeter::default(),
        }
    }

    fn start_reader(
        config: &ViewerConfig,
        index: usize,
        cell: Arc<FramebufferCell>,
    ) -> fbview_common::Result<FbReader> {
        let source = create_source(&config.source, index)?;
        FbReader::spawn(source, cell, Duration::from_millis(config.source.frame_interval_ms))
    }

    /// 全セルの読み込みを停止
    fn disconnect_all(&mut self) {
        for view in &mut self.cells {
            view.stop_reader();
        }
    }

    /// 全セルの読み込みを再開
    fn reconnect_all(&mut self) {
        for (index, view) in self.cells.iter_mut().enumerate() {
            if view.is_reading() {
                continue;
            }
            view.stop_reader();
            match Self::start_reader(&self.config, index, Arc::clone(&view.cell)) {
                Ok(reader) => view.attach_reader(reader),
                Err(e) => error!("[{}] セル {} の読み込みを開始できません: {}", e.code(), index, e),
            }
        }
    }

    fn draw_status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            ui.label(format!("描画 {:.1} fps", self.paint_rate.rate()));

            for view in &self.cells {
                let stats = view.cell.stats();
                let state = if view.cell.is_connected() { "接続" } else { "切断" };
                let last = stats
                    .last_update_ms
                    .map(format_timestamp)
                    .unwrap_or_else(|| "-".to_string());

                ui.separator();
                ui.label(format!(
                    "{} {} {} 更新 {} / 同一 {} / 不正 {} (最終 {})",
                    view.label,
                    state,
                    view.cell.source_resolution(),
                    stats.done,
                    stats.ignored,
                    stats.invalid,
                    last
                ));
            }
        });
    }
}

impl eframe::App for ViewerWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.paint_rate.tick();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("再接続").clicked() {
                    self.reconnect_all();
                }
                if ui.button("切断").clicked() {
                    self.disconnect_all();
                }
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.draw_status_bar(ui);
        });

        let columns = self.config.display.columns.max(1) as usize;
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| {
                egui::Grid::new("fb_cells").spacing([8.0, 8.0]).show(ui, |ui| {
                    for (index, view) in self.cells.iter_mut().enumerate() {
                        ui.vertical(|ui| {
                            ui.label(view.label.as_str());
                            view.ui(ui);
                        });
                        if (index + 1) % columns == 0 {
                            ui.end_row();
                        }
                    }
                });
            });
        });
    }
}

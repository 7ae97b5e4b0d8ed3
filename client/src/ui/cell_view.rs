//! セル表示ウィジェット
//!
//! 1つのフレームバッファセルを egui 上に配置し、描画とポインタイベントの
//! 受け渡しを行います。

use crate::display::{FramebufferCell, SceneItem, TextureSurface};
use crate::input::{MouseButton, PointerEvent};
use crate::source::FbReader;
use egui::{vec2, Color32, PointerButton, Pos2, Response, Sense, Stroke, Ui};
use std::sync::Arc;

const BUTTONS: [PointerButton; 3] = [
    PointerButton::Primary,
    PointerButton::Secondary,
    PointerButton::Middle,
];

/// セル1つ分の表示状態
pub struct CellView {
    /// 表示名
    pub label: String,
    /// セル本体
    pub cell: Arc<FramebufferCell>,
    /// テクスチャ描画面
    surface: TextureSurface,
    /// 読み込みスレッド
    reader: Option<FbReader>,
    /// 選択状態
    pub selected: bool,
    /// ドラッグ中のボタン
    held_button: Option<MouseButton>,
}

impl CellView {
    /// 新しい表示状態を作成
    pub fn new(ctx: &egui::Context, label: impl Into<String>, cell: Arc<FramebufferCell>) -> Self {
        let label = label.into();

        let repaint_ctx = ctx.clone();
        cell.set_update_hook(move |_rect| repaint_ctx.request_repaint());

        Self {
            surface: TextureSurface::new(ctx.clone(), format!("fb-cell-{}", label)),
            label,
            cell,
            reader: None,
            selected: false,
            held_button: None,
        }
    }

    /// 読み込みスレッドを関連付ける
    pub fn attach_reader(&mut self, reader: FbReader) {
        self.reader = Some(reader);
    }

    /// 読み込みスレッドを停止
    pub fn stop_reader(&mut self) {
        if let Some(mut reader) = self.reader.take() {
            reader.stop();
        }
    }

    /// 読み込みスレッドが動作中か
    pub fn is_reading(&self) -> bool {
        self.reader.as_ref().map_or(false, |r| r.is_running())
    }

    /// セルを描画してポインタイベントを処理
    pub fn ui(&mut self, ui: &mut Ui) -> Response {
        let size = self.cell.display_size();
        let desired = vec2(size.width as f32, size.height as f32);
        let (rect, response) = ui.allocate_exact_size(desired, Sense::click_and_drag());

        // セルに描画させてからテクスチャを貼る
        self.cell.paint(&mut self.surface);
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, Color32::from_gray(16));
        self.surface.show(&painter, rect.min);

        if self.selected && self.cell.is_selectable() {
            painter.rect_stroke(rect.shrink(1.0), 0.0, Stroke::new(2.0, Color32::LIGHT_BLUE));
        }

        self.dispatch_pointer(&response, rect.min);

        if response.clicked() && self.cell.is_selectable() {
            self.selected = !self.selected;
        }

        response
    }

    fn dispatch_pointer(&mut self, response: &Response, origin: Pos2) {
        let held = if response.drag_released() {
            self.held_button.take()
        } else {
            self.held_button
        };

        let Some(pos) = response.interact_pointer_pos() else {
            return;
        };

        let bounds = self.cell.bounding_rect();
        let local = pos - origin;
        if !bounds.contains(local.x, local.y) {
            return;
        }

        let detected = BUTTONS
            .into_iter()
            .find(|b| response.dragged_by(*b) || response.clicked_by(*b));
        let Some(button) = resolve_button(detected, held) else {
            return;
        };
        let event = PointerEvent::new(local.x, local.y, button);

        if response.drag_started() {
            self.held_button = Some(button);
            self.cell.mouse_press(&event);
        }
        if response.dragged() {
            self.cell.mouse_move(&event);
        }
        if response.drag_released() {
            self.cell.mouse_release(&event);
        }
        if response.clicked() {
            self.cell.mouse_press(&event);
            self.cell.mouse_release(&event);
        }
    }
}

/// 今回検出したボタン、なければドラッグ開始時のボタンを使う
///
/// どちらも特定できない場合はイベントを送らない。
fn resolve_button(
    detected: Option<PointerButton>,
    held: Option<MouseButton>,
) -> Option<MouseButton> {
    match detected {
        Some(button) => MouseButton::from_egui(button),
        None => held,
    }
}

impl Drop for CellView {
    fn drop(&mut self) {
        self.stop_reader();
    }
}

//! 入力モジュール
//!
//! ホストから届くポインタイベントをセルに渡すための型を提供します。

/// マウスボタン
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// 左ボタン
    Left,
    /// 右ボタン
    Right,
    /// 中ボタン
    Middle,
}

impl MouseButton {
    /// ログ用の文字列表現を取得
    pub fn as_str(&self) -> &'static str {
        match self {
            MouseButton::Left => "left",
            MouseButton::Right => "right",
            MouseButton::Middle => "middle",
        }
    }

    /// egui のボタンから変換
    pub fn from_egui(button: egui::PointerButton) -> Option<Self> {
        match button {
            egui::PointerButton::Primary => Some(MouseButton::Left),
            egui::PointerButton::Secondary => Some(MouseButton::Right),
            egui::PointerButton::Middle => Some(MouseButton::Middle),
            _ => None,
        }
    }
}

/// セル座標系でのポインタイベント
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// セル内のX座標
    pub x: f32,
    /// セル内のY座標
    pub y: f32,
    /// ボタン
    pub button: MouseButton,
}

impl PointerEvent {
    /// 新しいイベントを作成
    pub fn new(x: f32, y: f32, button: MouseButton) -> Self {
        Self { x, y, button }
    }
}

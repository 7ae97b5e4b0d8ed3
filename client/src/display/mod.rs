//! ディスプレイモジュール
//!
//! このモジュールはフレームバッファセルの表示機能を担当します。
//! 生のピクセルデータの変換、変更検出、および描画面への転送を行います。

mod cell;
mod checksum;
mod convert;
mod renderer;
mod surface;

pub use cell::{CellStats, FrameSink, FramebufferCell, SceneItem, UpdateHook};
pub use checksum::checksum16;
pub use convert::{convert_rgbx32_to_rgb888, rgb888_len, rgbx32_len};
pub use renderer::TextureSurface;
pub use surface::{ImageSurface, PaintSurface};

pub use fbview_common::MAX_FB_DIMENSION;

/// 受信するピクセル形式の1ピクセルあたりのバイト数（RGB + パディング）
pub const RAW_BYTES_PER_PIXEL: usize = 4;

/// 変換後のピクセル形式の1ピクセルあたりのバイト数
pub const RGB_BYTES_PER_PIXEL: usize = 3;

/// ピクセル単位のサイズ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellSize {
    /// 幅
    pub width: u32,
    /// 高さ
    pub height: u32,
}

impl CellSize {
    /// 新しいサイズを作成
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// ピクセル数
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// 幅か高さが0かどうか
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// 幅と高さが [`MAX_FB_DIMENSION`] 以下かどうか
    pub fn is_within_limit(&self) -> bool {
        self.width <= MAX_FB_DIMENSION && self.height <= MAX_FB_DIMENSION
    }

    /// アスペクト比を保ったまま `bound` に収まる最大サイズを求める
    ///
    /// 結果の幅か高さのどちらかは必ず `bound` と一致します。
    pub fn scaled_keep_aspect(&self, bound: CellSize) -> CellSize {
        if self.is_empty() || bound.is_empty() {
            return CellSize::new(0, 0);
        }

        let src_w = self.width as u64;
        let src_h = self.height as u64;

        let rw = bound.height as u64 * src_w / src_h;
        if rw <= bound.width as u64 {
            CellSize::new(rw.max(1) as u32, bound.height)
        } else {
            let rh = bound.width as u64 * src_h / src_w;
            CellSize::new(bound.width, rh.max(1) as u32)
        }
    }
}

impl std::fmt::Display for CellSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// 矩形領域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellRect {
    /// X座標
    pub x: u32,
    /// Y座標
    pub y: u32,
    /// 幅
    pub width: u32,
    /// 高さ
    pub height: u32,
}

impl CellRect {
    /// 新しい矩形を作成
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// 原点から指定サイズの矩形を作成
    pub fn from_size(size: CellSize) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// 矩形のサイズ
    pub fn size(&self) -> CellSize {
        CellSize::new(self.width, self.height)
    }

    /// 座標が矩形内にあるか
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x as f32
            && y >= self.y as f32
            && x < (self.x + self.width) as f32
            && y < (self.y + self.height) as f32
    }
}

/// 生フレーム適用の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use]
pub enum UpdateStatus {
    /// データが無い、または解像度に対して短すぎる
    Invalid,
    /// 前回と同じフレーム
    Ignored,
    /// 適用済み
    Done,
}

impl UpdateStatus {
    /// ログ用の文字列表現を取得
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateStatus::Invalid => "invalid",
            UpdateStatus::Ignored => "ignored",
            UpdateStatus::Done => "done",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_keep_aspect_wide_source() {
        let scaled = CellSize::new(4, 2).scaled_keep_aspect(CellSize::new(256, 256));
        assert_eq!(scaled, CellSize::new(256, 128));
    }

    #[test]
    fn test_scaled_keep_aspect_tall_source() {
        let scaled = CellSize::new(480, 800).scaled_keep_aspect(CellSize::new(256, 256));
        assert_eq!(scaled, CellSize::new(153, 256));
    }

    #[test]
    fn test_scaled_keep_aspect_exact_fit() {
        let scaled = CellSize::new(640, 480).scaled_keep_aspect(CellSize::new(320, 240));
        assert_eq!(scaled, CellSize::new(320, 240));
    }

    #[test]
    fn test_scaled_keep_aspect_degenerate() {
        assert!(CellSize::new(0, 10).scaled_keep_aspect(CellSize::new(10, 10)).is_empty());
        assert!(CellSize::new(10, 10).scaled_keep_aspect(CellSize::new(0, 10)).is_empty());
        // 極端に細長いソースでも1ピクセルは残る
        let scaled = CellSize::new(10_000, 1).scaled_keep_aspect(CellSize::new(100, 100));
        assert_eq!(scaled, CellSize::new(100, 1));
    }

    #[test]
    fn test_size_limit() {
        assert!(CellSize::new(MAX_FB_DIMENSION, MAX_FB_DIMENSION).is_within_limit());
        assert!(!CellSize::new(MAX_FB_DIMENSION + 1, 1).is_within_limit());
        assert!(!CellSize::new(1, u32::MAX).is_within_limit());
    }

    #[test]
    fn test_rect_contains() {
        let rect = CellRect::new(10, 10, 20, 20);
        assert!(rect.contains(10.0, 10.0));
        assert!(rect.contains(29.5, 29.5));
        assert!(!rect.contains(30.0, 15.0));
        assert!(!rect.contains(9.9, 15.0));
    }
}

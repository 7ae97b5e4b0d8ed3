//! 画面レンダリングモジュール
//!
//! セルのスナップショットを egui のテクスチャとして GUI に表示するための
//! 描画面を提供します。

use super::{CellRect, PaintSurface};
use egui::{pos2, Color32, Context, Rect, TextureHandle, TextureId, TextureOptions, Vec2};
use image::RgbImage;

/// egui テクスチャへ描画する描画面
pub struct TextureSurface {
    /// eguiコンテキスト
    ctx: Context,
    /// テクスチャ名
    name: String,
    /// 表示用テクスチャ
    texture: Option<TextureHandle>,
    /// 最後に描画された領域
    target: CellRect,
}

impl TextureSurface {
    /// 新しい描画面を作成
    pub fn new(ctx: Context, name: impl Into<String>) -> Self {
        Self {
            ctx,
            name: name.into(),
            texture: None,
            target: CellRect::default(),
        }
    }

    /// テクスチャIDを取得
    pub fn texture_id(&self) -> Option<TextureId> {
        self.texture.as_ref().map(|t| t.id())
    }

    /// 最後に描画された領域のサイズ
    pub fn image_size(&self) -> Vec2 {
        Vec2::new(self.target.width as f32, self.target.height as f32)
    }

    /// テクスチャを `origin` を基準に描画
    pub fn show(&self, painter: &egui::Painter, origin: egui::Pos2) -> Option<Rect> {
        let texture_id = self.texture_id()?;
        let rect = Rect::from_min_size(
            origin + Vec2::new(self.target.x as f32, self.target.y as f32),
            self.image_size(),
        );
        let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
        painter.image(texture_id, rect, uv, Color32::WHITE);
        Some(rect)
    }
}

impl PaintSurface for TextureSurface {
    fn draw_image(&mut self, target: CellRect, image: &RgbImage) {
        if image.width() == 0 || image.height() == 0 {
            return;
        }

        let size = [image.width() as usize, image.height() as usize];
        let color_image = egui::ColorImage::from_rgb(size, image.as_raw());

        // テクスチャを更新または作成
        if let Some(texture) = &mut self.texture {
            texture.set(color_image, TextureOptions::LINEAR);
        } else {
            let texture = self
                .ctx
                .load_texture(self.name.clone(), color_image, TextureOptions::LINEAR);
            self.texture = Some(texture);
        }

        self.target = target;
    }
}

//! 描画面
//!
//! セルがスナップショットを転送する先の抽象化と、
//! メモリ上の画像に描画するヘッドレス実装を提供します。

use super::{CellRect, CellSize};
use image::{imageops, imageops::FilterType, Rgb, RgbImage, Rgba, RgbaImage};

/// ペイントコールバックに渡される描画面
pub trait PaintSurface {
    /// `image` を `target` の領域に描画する
    fn draw_image(&mut self, target: CellRect, image: &RgbImage);
}

/// メモリ上の RGBA キャンバスに描画する描画面
pub struct ImageSurface {
    canvas: RgbaImage,
    draw_count: usize,
}

impl ImageSurface {
    /// 透明なキャンバスを作成
    pub fn new(size: CellSize) -> Self {
        Self {
            canvas: RgbaImage::new(size.width, size.height),
            draw_count: 0,
        }
    }

    /// キャンバスを参照
    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    /// キャンバスを取り出す
    pub fn into_canvas(self) -> RgbaImage {
        self.canvas
    }

    /// 描画回数
    pub fn draw_count(&self) -> usize {
        self.draw_count
    }

    /// 指定座標の画素
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        if x < self.canvas.width() && y < self.canvas.height() {
            Some(*self.canvas.get_pixel(x, y))
        } else {
            None
        }
    }
}

impl PaintSurface for ImageSurface {
    fn draw_image(&mut self, target: CellRect, image: &RgbImage) {
        self.draw_count += 1;

        if target.width == 0 || target.height == 0 {
            return;
        }

        let rgba = to_rgba(image);
        if rgba.dimensions() == (target.width, target.height) {
            imageops::replace(&mut self.canvas, &rgba, target.x as i64, target.y as i64);
        } else {
            let scaled = imageops::resize(&rgba, target.width, target.height, FilterType::Triangle);
            imageops::replace(&mut self.canvas, &scaled, target.x as i64, target.y as i64);
        }
    }
}

/// RGB 画像を不透明な RGBA 画像に変換
fn to_rgba(image: &RgbImage) -> RgbaImage {
    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgb([r, g, b]) = *image.get_pixel(x, y);
        Rgba([r, g, b, 0xFF])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_at_offset() {
        let mut surface = ImageSurface::new(CellSize::new(8, 8));
        let image = RgbImage::from_pixel(2, 2, Rgb([200, 100, 50]));

        surface.draw_image(CellRect::new(3, 4, 2, 2), &image);

        assert_eq!(surface.draw_count(), 1);
        assert_eq!(surface.pixel(3, 4), Some(Rgba([200, 100, 50, 255])));
        assert_eq!(surface.pixel(4, 5), Some(Rgba([200, 100, 50, 255])));
        assert_eq!(surface.pixel(2, 4), Some(Rgba([0, 0, 0, 0])));
        assert_eq!(surface.pixel(8, 8), None);
    }

    #[test]
    fn test_draw_scales_to_target() {
        let mut surface = ImageSurface::new(CellSize::new(4, 4));
        let image = RgbImage::from_pixel(1, 1, Rgb([1, 2, 3]));

        surface.draw_image(CellRect::new(0, 0, 4, 4), &image);

        for (_, _, pixel) in surface.canvas().enumerate_pixels() {
            assert_eq!(*pixel, Rgba([1, 2, 3, 255]));
        }
    }

    #[test]
    fn test_draw_clips_outside_canvas() {
        let mut surface = ImageSurface::new(CellSize::new(2, 2));
        let image = RgbImage::from_pixel(4, 4, Rgb([9, 9, 9]));

        surface.draw_image(CellRect::new(1, 1, 4, 4), &image);

        assert_eq!(surface.pixel(1, 1), Some(Rgba([9, 9, 9, 255])));
        assert_eq!(surface.pixel(0, 0), Some(Rgba([0, 0, 0, 0])));
    }
}

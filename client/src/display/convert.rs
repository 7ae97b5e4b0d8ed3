//! ピクセル形式変換
//!
//! RGBX32（RGB + パディング1バイト）から RGB888 への変換を提供します。

use super::{RAW_BYTES_PER_PIXEL, RGB_BYTES_PER_PIXEL};

/// RGBX32 形式で必要なバイト数
///
/// `usize` に収まらない場合は `None` を返します。
pub fn rgbx32_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(RAW_BYTES_PER_PIXEL)
}

/// RGB888 形式で必要なバイト数
pub fn rgb888_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(RGB_BYTES_PER_PIXEL)
}

/// RGBX32 のバッファをその場で RGB888 に詰め直す
///
/// 各ピクセルの先頭3バイトを残し、4バイト目を捨てます。行は上から下、
/// 列は左から右へ走査します。詰め直した後の有効バイト数を返します。
/// バッファに収まらないピクセルは変換しません。
pub fn convert_rgbx32_to_rgb888(buf: &mut [u8], width: u32, height: u32) -> usize {
    let pixels = (width as usize)
        .saturating_mul(height as usize)
        .min(buf.len() / RAW_BYTES_PER_PIXEL);

    // 書き込み位置は常に読み込み位置以下なので前方コピーで安全
    for i in 0..pixels {
        let src = i * RAW_BYTES_PER_PIXEL;
        let dst = i * RGB_BYTES_PER_PIXEL;
        buf.copy_within(src..src + RGB_BYTES_PER_PIXEL, dst);
    }

    pixels * RGB_BYTES_PER_PIXEL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lengths() {
        assert_eq!(rgbx32_len(4, 2), Some(32));
        assert_eq!(rgb888_len(4, 2), Some(24));
        assert_eq!(rgbx32_len(0, 100), Some(0));
    }

    #[test]
    fn test_lengths_overflow() {
        assert_eq!(rgbx32_len(u32::MAX, u32::MAX), None);
        assert_eq!(rgb888_len(u32::MAX, u32::MAX), None);
    }

    #[test]
    fn test_convert_short_buffer_stops_at_end() {
        let mut buf = vec![1, 2, 3, 4, 5, 6, 7, 8];
        let len = convert_rgbx32_to_rgb888(&mut buf, u32::MAX, u32::MAX);
        assert_eq!(len, 6);
        assert_eq!(&buf[..len], &[1, 2, 3, 5, 6, 7]);
    }

    #[test]
    fn test_convert_uniform_pixels() {
        let mut buf: Vec<u8> = [10u8, 20, 30, 99].repeat(8);
        let len = convert_rgbx32_to_rgb888(&mut buf, 4, 2);

        assert_eq!(len, 24);
        assert_eq!(&buf[..len], [10u8, 20, 30].repeat(8).as_slice());
    }

    #[test]
    fn test_convert_keeps_pixel_order() {
        let mut buf = vec![
            1, 2, 3, 0xAA, //
            4, 5, 6, 0xBB, //
            7, 8, 9, 0xCC, //
            10, 11, 12, 0xDD,
        ];
        let len = convert_rgbx32_to_rgb888(&mut buf, 2, 2);
        assert_eq!(&buf[..len], &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
    }

    #[test]
    fn test_padding_byte_is_ignored() {
        let mut a: Vec<u8> = [1u8, 2, 3, 0].repeat(6);
        let mut b: Vec<u8> = [1u8, 2, 3, 255].repeat(6);

        let la = convert_rgbx32_to_rgb888(&mut a, 3, 2);
        let lb = convert_rgbx32_to_rgb888(&mut b, 3, 2);
        assert_eq!(&a[..la], &b[..lb]);
    }

    #[test]
    fn test_trailing_bytes_untouched() {
        // 解像度より長いバッファの末尾は変換対象外
        let mut buf = vec![1, 2, 3, 4, 9, 9, 9, 9];
        let len = convert_rgbx32_to_rgb888(&mut buf, 1, 1);
        assert_eq!(len, 3);
        assert_eq!(&buf[4..], &[9, 9, 9, 9]);
    }
}

//! テストパターンのフレームソース
//!
//! 実機が無くてもセルを動かせるように、流れるグラデーションを生成します。
//! パターンは `static_frames` 回ごとにしか進まないため、その間は同じ
//! フレームが届きます。

use super::FrameSource;
use crate::display::{rgbx32_len, CellSize};
use fbview_common::{FbError, Result};

/// テストパターンのフレームソース
pub struct SyntheticSource {
    name: String,
    resolution: CellSize,
    static_frames: u32,
    phase: u32,
    frames_read: u64,
    connected: bool,
}

impl SyntheticSource {
    /// 新しいソースを作成
    pub fn new(
        name: impl Into<String>,
        resolution: CellSize,
        static_frames: u32,
        phase: u32,
    ) -> Self {
        Self {
            name: name.into(),
            resolution,
            static_frames: static_frames.max(1),
            phase,
            frames_read: 0,
            connected: false,
        }
    }

    /// 読み込んだフレーム数
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    fn render(&self) -> Vec<u8> {
        let CellSize { width, height } = self.resolution;
        let mut frame = Vec::with_capacity(rgbx32_len(width, height).unwrap_or(0));
        let phase = self.phase as u64;

        for y in 0..height as u64 {
            for x in 0..width as u64 {
                let r = (x * 255 / width as u64).wrapping_add(phase) as u8;
                let g = (y * 255 / height as u64).wrapping_add(phase * 2) as u8;
                let b = (phase * 3) as u8;
                frame.extend_from_slice(&[r, g, b, 0]);
            }
        }

        frame
    }
}

impl FrameSource for SyntheticSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn connect(&mut self) -> Result<CellSize> {
        if self.resolution.is_empty() || !self.resolution.is_within_limit() {
            return Err(FbError::Source(format!(
                "{}: 解像度が不正です ({})",
                self.name, self.resolution
            )));
        }
        self.connected = true;
        Ok(self.resolution)
    }

    fn read_frame(&mut self) -> Result<Vec<u8>> {
        if !self.connected {
            return Err(FbError::Source(format!("{}: 未接続です", self.name)));
        }

        let frame = self.render();
        self.frames_read += 1;
        if self.frames_read % self.static_frames as u64 == 0 {
            self.phase = self.phase.wrapping_add(1);
        }

        Ok(frame)
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::MAX_FB_DIMENSION;

    #[test]
    fn test_frame_size() {
        let mut source = SyntheticSource::new("t", CellSize::new(8, 4), 1, 0);
        assert_eq!(source.connect().unwrap(), CellSize::new(8, 4));
        assert_eq!(source.read_frame().unwrap().len(), 8 * 4 * 4);
    }

    #[test]
    fn test_static_runs() {
        let mut source = SyntheticSource::new("t", CellSize::new(4, 4), 3, 0);
        source.connect().unwrap();

        let frames: Vec<Vec<u8>> = (0..4).map(|_| source.read_frame().unwrap()).collect();
        assert_eq!(frames[0], frames[1]);
        assert_eq!(frames[1], frames[2]);
        assert_ne!(frames[2], frames[3]);
        assert_eq!(source.frames_read(), 4);
    }

    #[test]
    fn test_read_requires_connect() {
        let mut source = SyntheticSource::new("t", CellSize::new(4, 4), 1, 0);
        assert!(source.read_frame().is_err());

        source.connect().unwrap();
        source.disconnect();
        assert!(!source.is_connected());
        assert!(source.read_frame().is_err());
    }

    #[test]
    fn test_invalid_resolution_fails_to_connect() {
        let mut source = SyntheticSource::new("t", CellSize::new(0, 4), 1, 0);
        assert!(source.connect().is_err());

        let mut source = SyntheticSource::new("t", CellSize::new(u32::MAX, 1), 1, 0);
        assert!(source.connect().is_err());
        assert!(!source.is_connected());
    }

    #[test]
    fn test_wide_gradient_does_not_overflow() {
        let mut source = SyntheticSource::new("t", CellSize::new(MAX_FB_DIMENSION, 1), 1, 7);
        source.connect().unwrap();

        let frame = source.read_frame().unwrap();
        assert_eq!(frame.len(), MAX_FB_DIMENSION as usize * 4);
        let last = &frame[frame.len() - 4..];
        assert_eq!(last[0], (254u32 + 7) as u8);
    }
}

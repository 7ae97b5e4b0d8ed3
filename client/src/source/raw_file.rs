//! 生ダンプファイルのフレームソース
//!
//! RGBX32 のフレームを連結したファイルを先頭から順に読み、末尾に達したら
//! 先頭に戻ります。

use super::FrameSource;
use crate::display::{rgbx32_len, CellSize};
use fbview_common::{FbError, Result};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// 生ダンプファイルのフレームソース
pub struct RawFileSource {
    name: String,
    path: PathBuf,
    resolution: CellSize,
    reader: Option<BufReader<File>>,
    frame_count: u64,
    next_frame: u64,
}

impl RawFileSource {
    /// 新しいソースを作成
    pub fn new<P: AsRef<Path>>(path: P, resolution: CellSize) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            name: format!("raw:{}", path.display()),
            path,
            resolution,
            reader: None,
            frame_count: 0,
            next_frame: 0,
        }
    }

    /// ファイル内のフレーム数
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn frame_len(&self) -> Option<usize> {
        if !self.resolution.is_within_limit() {
            return None;
        }
        rgbx32_len(self.resolution.width, self.resolution.height).filter(|&len| len > 0)
    }
}

impl FrameSource for RawFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn connect(&mut self) -> Result<CellSize> {
        let frame_len = self.frame_len().ok_or_else(|| {
            FbError::Source(format!("{}: 解像度が不正です ({})", self.name, self.resolution))
        })? as u64;

        let file = File::open(&self.path)?;
        let file_len = file.metadata()?.len();
        if file_len < frame_len {
            return Err(FbError::Source(format!(
                "{}: ファイルが1フレーム分に満たません ({} < {} bytes)",
                self.name, file_len, frame_len
            )));
        }

        self.frame_count = file_len / frame_len;
        self.next_frame = 0;
        self.reader = Some(BufReader::new(file));

        log::info!("{}: {} フレーム ({})", self.name, self.frame_count, self.resolution);
        Ok(self.resolution)
    }

    fn read_frame(&mut self) -> Result<Vec<u8>> {
        let frame_len = self.frame_len().unwrap_or(0);
        let reader = self
            .reader
            .as_mut()
            .ok_or_else(|| FbError::Source(format!("{}: 未接続です", self.name)))?;

        if self.next_frame >= self.frame_count {
            reader.seek(SeekFrom::Start(0))?;
            self.next_frame = 0;
        }

        let mut frame = vec![0u8; frame_len];
        reader.read_exact(&mut frame)?;
        self.next_frame += 1;

        Ok(frame)
    }

    fn disconnect(&mut self) {
        self.reader = None;
    }

    fn is_connected(&self) -> bool {
        self.reader.is_some()
    }
}

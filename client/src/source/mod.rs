//! フレームソースモジュール
//!
//! セルに生のフレームを供給する側を担当します。ソースからの読み込みは
//! 専用スレッド（[`FbReader`]）で行い、結果を [`FrameSink`] に渡します。
//!
//! [`FrameSink`]: crate::display::FrameSink

mod raw_file;
mod reader;
mod synthetic;

pub use raw_file::RawFileSource;
pub use reader::FbReader;
pub use synthetic::SyntheticSource;

use crate::display::CellSize;
use fbview_common::config::{SourceKind, SourceSettings};
use fbview_common::{FbError, Result};

/// 生フレーム（RGBX32）の供給元
pub trait FrameSource: Send {
    /// ログ用の名前
    fn name(&self) -> &str;

    /// 接続してソース解像度を返す
    fn connect(&mut self) -> Result<CellSize>;

    /// 次のフレームを読み込む
    fn read_frame(&mut self) -> Result<Vec<u8>>;

    /// 切断
    fn disconnect(&mut self);

    /// 接続中かどうか
    fn is_connected(&self) -> bool;
}

/// 設定からフレームソースを作成
pub fn create_source(settings: &SourceSettings, index: usize) -> Result<Box<dyn FrameSource>> {
    let resolution = CellSize::new(settings.width, settings.height);

    match settings.kind {
        SourceKind::Synthetic => Ok(Box::new(SyntheticSource::new(
            format!("synthetic-{}", index),
            resolution,
            settings.static_frames,
            index as u32 * 37,
        ))),
        SourceKind::RawFile => {
            let path = settings
                .raw_path
                .as_ref()
                .ok_or_else(|| FbError::InvalidParameter("raw-file ソースにはファイルパスが必要です".to_string()))?;
            Ok(Box::new(RawFileSource::new(path, resolution)))
        }
    }
}

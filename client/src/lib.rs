//! フレームバッファビューア
//!
//! リモートのフレームバッファを受け取り、シーン上のセルとして表示します。

pub mod display;
pub mod input;
pub mod source;
pub mod ui;

pub use display::{FrameSink, FramebufferCell, SceneItem, UpdateStatus};

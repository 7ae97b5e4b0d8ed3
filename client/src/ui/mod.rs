//! UIモジュール
//!
//! このモジュールはフレームバッファビューアのユーザーインターフェースを担当します。

mod cell_view;
mod window;

pub use cell_view::CellView;
pub use window::ViewerWindow;

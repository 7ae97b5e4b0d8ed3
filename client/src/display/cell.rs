//! フレームバッファセル
//!
//! リモートのフレームバッファを表示するシーン要素です。受信した生データを
//! 変換して内部画像に保持し、要求に応じてセルのサイズに縮小して描画します。
//! 受信スレッドと描画スレッドの両方から `Arc` 経由で共有されます。

use super::checksum::checksum16;
use super::convert::{convert_rgbx32_to_rgb888, rgb888_len, rgbx32_len};
use super::{CellRect, CellSize, PaintSurface, UpdateStatus, RAW_BYTES_PER_PIXEL};
use crate::input::PointerEvent;
use fbview_common::utils::logging::dt_trace;
use fbview_common::utils::time::current_time_millis;
use fbview_common::{DEFAULT_FB_HEIGHT, DEFAULT_FB_WIDTH};
use image::{imageops, imageops::FilterType, Rgb, RgbImage};
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};

/// 再描画要求のコールバック
pub type UpdateHook = Box<dyn Fn(CellRect) + Send + Sync>;

/// ホストのシーンに配置される描画要素
pub trait SceneItem {
    /// 無効化・ヒットテスト用の外接矩形
    fn bounding_rect(&self) -> CellRect;

    /// 描画面にセルを描画
    fn paint(&self, surface: &mut dyn PaintSurface);

    /// ポインタ押下
    fn mouse_press(&self, event: &PointerEvent);

    /// ポインタ移動
    fn mouse_move(&self, event: &PointerEvent);

    /// ポインタ解放
    fn mouse_release(&self, event: &PointerEvent);

    /// 選択可能かどうか
    fn is_selectable(&self) -> bool;
}

/// フレームソースから見た受信側
pub trait FrameSink: Send + Sync {
    /// 1フレーム分の生データを渡す
    fn push_raw_frame(&self, raw: Option<&[u8]>) -> UpdateStatus;

    /// ソース解像度の変更を通知
    fn notify_resolution_changed(&self, width: u32, height: u32);

    /// 接続状態の変更を通知
    fn notify_connection_state(&self, connected: bool);
}

/// セルの統計情報
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellStats {
    /// 適用されたフレーム数
    pub done: u64,
    /// 同一として無視されたフレーム数
    pub ignored: u64,
    /// 不正として破棄されたフレーム数
    pub invalid: u64,
    /// 描画回数
    pub paints: u64,
    /// 最後にフレームを適用した時刻（UNIXミリ秒）
    pub last_update_ms: Option<u64>,
}

/// ロックで保護される状態
struct CellState {
    /// 表示サイズ
    cell_size: CellSize,
    /// 表示中のスナップショット
    snapshot: RgbImage,
    /// 接続中かどうか
    connected: bool,
    /// 最後に適用したフレームのチェックサム
    last_sum: Option<u16>,
    /// ソース解像度
    fb_size: CellSize,
    /// ソース解像度の内部画像
    fb: RgbImage,
    /// RGB888 に変換済みの作業バッファ
    bytes: Vec<u8>,
    /// 内部画像に作業バッファが描画済みか
    fb_rendered: bool,
    stats: CellStats,
}

impl CellState {
    fn render_framebuffer(&mut self) {
        let Some(len) = rgb888_len(self.fb_size.width, self.fb_size.height) else {
            return;
        };
        if self.bytes.len() < len {
            return;
        }

        dt_trace("FB PAINT RAW S");
        let dst: &mut [u8] = &mut self.fb;
        dst.copy_from_slice(&self.bytes[..len]);
        self.fb_rendered = true;
        dt_trace("FB PAINT RAW E");
    }
}

/// フレームバッファセル
pub struct FramebufferCell {
    state: Mutex<CellState>,
    update_hook: RwLock<Option<UpdateHook>>,
    selectable: bool,
}

impl FramebufferCell {
    /// デフォルトサイズの黒いセルを作成
    pub fn new() -> Self {
        let placeholder = RgbImage::from_pixel(DEFAULT_FB_WIDTH, DEFAULT_FB_HEIGHT, Rgb([0, 0, 0]));
        debug!("Default constructor");
        Self::with_placeholder(placeholder)
    }

    /// 指定した画像を初期表示とするセルを作成
    ///
    /// 表示サイズは画像のサイズになります。
    pub fn with_placeholder(placeholder: RgbImage) -> Self {
        let cell_size = CellSize::new(placeholder.width(), placeholder.height());

        Self {
            state: Mutex::new(CellState {
                cell_size,
                snapshot: placeholder,
                connected: false,
                last_sum: None,
                fb_size: cell_size,
                fb: RgbImage::new(cell_size.width, cell_size.height),
                bytes: Vec::new(),
                fb_rendered: false,
                stats: CellStats::default(),
            }),
            update_hook: RwLock::new(None),
            selectable: true,
        }
    }

    /// 再描画要求のコールバックを設定
    pub fn set_update_hook<F>(&self, hook: F)
    where
        F: Fn(CellRect) + Send + Sync + 'static,
    {
        *self.update_hook.write() = Some(Box::new(hook));
    }

    fn request_update(&self, rect: CellRect) {
        if let Some(hook) = &*self.update_hook.read() {
            hook(rect);
        }
    }

    /// 表示画像を差し替え、そのサイズを表示サイズとする
    pub fn set_placeholder(&self, placeholder: RgbImage) {
        let rect = {
            let mut state = self.state.lock();
            state.cell_size = CellSize::new(placeholder.width(), placeholder.height());
            state.snapshot = placeholder;
            CellRect::from_size(state.cell_size)
        };
        self.request_update(rect);
    }

    /// 表示サイズを変更
    ///
    /// 現在の表示内容をアスペクト比を保って新しいサイズに収めます。
    pub fn set_display_size(&self, size: CellSize) {
        if !size.is_within_limit() {
            warn!("Display size {} exceeds limit, ignored", size);
            return;
        }

        let mut guard = self.state.lock();
        let state = &mut *guard;

        if state.cell_size == size {
            return;
        }
        state.cell_size = size;

        let source = if state.fb_rendered { &state.fb } else { &state.snapshot };
        if let Some(scaled) = scale_to_fit(source, size) {
            state.snapshot = scaled;
        }

        let rect = snapshot_rect(&state.snapshot);
        self.request_update(rect);
    }

    /// ソース解像度を設定
    ///
    /// 解像度が変わった場合は内部画像を黒で作り直し、作業バッファと
    /// チェックサムを破棄します。一辺が `MAX_FB_DIMENSION` を超える解像度は
    /// 無視し、現在の解像度を維持します。
    pub fn set_source_resolution(&self, size: CellSize) {
        let mut state = self.state.lock();

        if state.fb_size == size {
            return;
        }
        if !size.is_within_limit() || rgbx32_len(size.width, size.height).is_none() {
            warn!("Unsupported FB size: {}, keeping {}", size, state.fb_size);
            return;
        }

        debug!("New FB size: {} (was {})", size, state.fb_size);
        state.fb_size = size;
        state.fb = RgbImage::new(size.width, size.height);
        state.bytes.clear();
        state.last_sum = None;
        state.fb_rendered = false;
    }

    /// 生フレームを適用
    ///
    /// `width × height × 4` バイトに満たないデータは `Invalid`、前回と同じ
    /// チェックサムのデータは `Ignored` になり、どちらも状態を変更しません。
    pub fn apply_raw_buffer(&self, raw: &[u8]) -> UpdateStatus {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let CellSize { width, height } = state.fb_size;
        let required = rgbx32_len(width, height).unwrap_or(usize::MAX);
        if raw.len() < required {
            debug!("Invalid data, ignored ({} < {} bytes)", raw.len(), required);
            state.stats.invalid += 1;
            return UpdateStatus::Invalid;
        }

        // TODO: ブロック単位の部分更新
        let sum = checksum16(raw);
        if state.last_sum == Some(sum) {
            state.stats.ignored += 1;
            return UpdateStatus::Ignored;
        }

        state.last_sum = Some(sum);
        state.bytes.clear();
        state.bytes.extend_from_slice(raw);
        let len = convert_rgbx32_to_rgb888(&mut state.bytes, width, height);
        state.bytes.truncate(len);

        state.stats.done += 1;
        state.stats.last_update_ms = Some(current_time_millis());

        let rect = snapshot_rect(&state.snapshot);
        self.request_update(rect);

        UpdateStatus::Done
    }

    /// 接続状態を設定
    pub fn set_connected(&self, connected: bool) {
        let mut state = self.state.lock();

        if state.connected != connected {
            state.connected = connected;
            info!("FB {}", if connected { "Connected" } else { "Disconnected" });
        }
    }

    /// 作業バッファを内部画像全体に描画
    pub fn render_framebuffer(&self) {
        self.state.lock().render_framebuffer();
    }

    /// 表示サイズ
    pub fn display_size(&self) -> CellSize {
        self.state.lock().cell_size
    }

    /// ソース解像度
    pub fn source_resolution(&self) -> CellSize {
        self.state.lock().fb_size
    }

    /// 接続中かどうか
    pub fn is_connected(&self) -> bool {
        self.state.lock().connected
    }

    /// 最後に適用したフレームのチェックサム
    pub fn last_checksum(&self) -> Option<u16> {
        self.state.lock().last_sum
    }

    /// 受信フレームの1ピクセルあたりのバイト数
    pub fn bytes_per_pixel(&self) -> usize {
        RAW_BYTES_PER_PIXEL
    }

    /// 変換済み作業バッファのコピー
    pub fn converted_buffer(&self) -> Vec<u8> {
        self.state.lock().bytes.clone()
    }

    /// 内部画像のコピー
    pub fn framebuffer_image(&self) -> RgbImage {
        self.state.lock().fb.clone()
    }

    /// 表示中スナップショットのコピー
    pub fn snapshot(&self) -> RgbImage {
        self.state.lock().snapshot.clone()
    }

    /// 統計情報
    pub fn stats(&self) -> CellStats {
        self.state.lock().stats
    }
}

impl Default for FramebufferCell {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneItem for FramebufferCell {
    fn bounding_rect(&self) -> CellRect {
        snapshot_rect(&self.state.lock().snapshot)
    }

    fn paint(&self, surface: &mut dyn PaintSurface) {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        dt_trace("FB PAINT S");

        if state.connected {
            state.render_framebuffer();
            if let Some(scaled) = scale_to_fit(&state.fb, state.cell_size) {
                state.snapshot = scaled;
            }
        }

        surface.draw_image(snapshot_rect(&state.snapshot), &state.snapshot);
        state.stats.paints += 1;

        dt_trace("FB PAINT E");
    }

    fn mouse_press(&self, _event: &PointerEvent) {}

    fn mouse_move(&self, _event: &PointerEvent) {}

    fn mouse_release(&self, event: &PointerEvent) {
        debug!("Item clicked at ({:.1}, {:.1}) with {:?}", event.x, event.y, event.button);
    }

    fn is_selectable(&self) -> bool {
        self.selectable
    }
}

impl FrameSink for FramebufferCell {
    fn push_raw_frame(&self, raw: Option<&[u8]>) -> UpdateStatus {
        match raw {
            Some(raw) => self.apply_raw_buffer(raw),
            None => {
                debug!("Invalid data, ignored (no buffer)");
                self.state.lock().stats.invalid += 1;
                UpdateStatus::Invalid
            }
        }
    }

    fn notify_resolution_changed(&self, width: u32, height: u32) {
        self.set_source_resolution(CellSize::new(width, height));
    }

    fn notify_connection_state(&self, connected: bool) {
        self.set_connected(connected);
    }
}

fn snapshot_rect(snapshot: &RgbImage) -> CellRect {
    CellRect::new(0, 0, snapshot.width(), snapshot.height())
}

/// アスペクト比を保って `bound` に収まるよう滑らかに拡大縮小
fn scale_to_fit(image: &RgbImage, bound: CellSize) -> Option<RgbImage> {
    let src = CellSize::new(image.width(), image.height());
    let target = src.scaled_keep_aspect(bound);

    if target.is_empty() {
        return None;
    }
    if target == src {
        return Some(image.clone());
    }

    Some(imageops::resize(image, target.width, target.height, FilterType::Triangle))
}

use crate::error::Error;
use crate::imageops_spatial::buffer::map_layout;
use crate::imageops_spatial::convolution::Convolve;
use crate::imageops_spatial::kernel::{Kernel, Laplacian};
use crate::imageops_spatial::padding::PaddingMode;
use crate::utils::{fill_rows, image_from_raw, round_f32_to_u8, validate_non_empty_image};
use crate::{Image, PixelBuffer};
use image::Pixel;
use tracing::debug;

/// エッジ検出フィルタを提供するトレイト
///
/// ラプラシアン（2次微分）とソーベル（勾配強度）の2種類を扱います。
/// どちらも結果は 8bit に丸められたエッジマップです。
pub trait EdgeFilter: Sized {
    /// 3x3 ラプラシアンカーネルで畳み込みを行う
    ///
    /// # 引数
    ///
    /// * `kind` - 4近傍 (`Basic`) か 8近傍 (`Full`) か
    /// * `inverted` - カーネルの符号を反転するかどうか
    /// * `padding` - 範囲外サンプルの扱い
    ///
    /// # エラー
    ///
    /// * 空の画像に対して処理を実行した場合
    fn laplacian(
        &self,
        kind: Laplacian,
        inverted: bool,
        padding: PaddingMode,
    ) -> Result<Self, Error>;

    /// ソーベル勾配強度 `sqrt(Gx² + Gy²)` を計算する
    ///
    /// 内部ピクセルのみを計算し、1ピクセル幅の境界は 0 のままです。
    /// パディングは使用しません。
    ///
    /// # エラー
    ///
    /// * 空の画像に対して処理を実行した場合
    fn sobel(&self) -> Result<Self, Error>;

    fn laplacian_mut(
        &mut self,
        kind: Laplacian,
        inverted: bool,
        padding: PaddingMode,
    ) -> Result<&mut Self, Error> {
        *self = self.laplacian(kind, inverted, padding)?;
        Ok(self)
    }

    fn sobel_mut(&mut self) -> Result<&mut Self, Error> {
        *self = self.sobel()?;
        Ok(self)
    }
}

impl<P> EdgeFilter for Image<P>
where
    P: Pixel<Subpixel = u8>,
{
    fn laplacian(
        &self,
        kind: Laplacian,
        inverted: bool,
        padding: PaddingMode,
    ) -> Result<Self, Error> {
        self.convolve(&Kernel::laplacian(kind, inverted), padding)
    }

    fn sobel(&self) -> Result<Self, Error> {
        let (width, height) = self.dimensions();
        validate_non_empty_image(width, height)?;
        debug!(width, height, channels = P::CHANNEL_COUNT, "sobel");

        let data = sobel_raw(self.as_raw(), width, height, usize::from(P::CHANNEL_COUNT));
        image_from_raw(width, height, data)
    }
}

impl EdgeFilter for PixelBuffer {
    fn laplacian(
        &self,
        kind: Laplacian,
        inverted: bool,
        padding: PaddingMode,
    ) -> Result<Self, Error> {
        map_layout!(self, image => image.laplacian(kind, inverted, padding))
    }

    fn sobel(&self) -> Result<Self, Error> {
        map_layout!(self, image => image.sobel())
    }
}

/// Interior-only gradient magnitude over interleaved subpixels
pub(crate) fn sobel_raw(src: &[u8], width: u32, height: u32, channels: usize) -> Vec<u8> {
    let gx = Kernel::sobel_x();
    let gy = Kernel::sobel_y();
    let (xs, ys) = PaddingMode::None.processing_region(width, height, 1, 1);
    let row_len = width as usize * channels;
    let mut output = vec![0u8; row_len * height as usize];

    fill_rows(&mut output, row_len, |y, row| {
        if !ys.contains(&(y as u32)) {
            return;
        }

        for x in xs.clone() {
            for c in 0..channels {
                let (mut sx, mut sy) = (0.0f32, 0.0f32);
                for ((dx, dy, wx), (_, _, wy)) in gx.taps().zip(gy.taps()) {
                    let nx = (i64::from(x) + dx) as usize;
                    let ny = (y as i64 + dy) as usize;
                    let value = f32::from(src[(ny * width as usize + nx) * channels + c]);
                    sx += value * wx;
                    sy += value * wy;
                }
                row[x as usize * channels + c] = round_f32_to_u8(sx.hypot(sy));
            }
        }
    });

    output
}

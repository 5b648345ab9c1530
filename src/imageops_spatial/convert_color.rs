use crate::PixelBuffer;
use image::{GrayImage, RgbImage};
use tracing::debug;

/// Integer luma weights, scaled by 1000
const LUMA_WEIGHTS: [u32; 3] = [299, 587, 114];

/// RGB → 輝度変換（`0.299 R + 0.587 G + 0.114 B`、小数点以下切り捨て）
///
/// 整数演算で計算するため、白 (255, 255, 255) は正確に 255 になります。
pub fn rgb_to_gray(image: &RgbImage) -> GrayImage {
    let (width, height) = image.dimensions();
    debug!(width, height, "rgb_to_gray");
    GrayImage::from_fn(width, height, |x, y| {
        let rgb = image.get_pixel(x, y).0;
        let weighted: u32 = rgb
            .iter()
            .zip(LUMA_WEIGHTS)
            .map(|(&c, w)| u32::from(c) * w)
            .sum();
        image::Luma([(weighted / 1000) as u8])
    })
}

impl PixelBuffer {
    /// 単一チャンネルのバッファへ変換する
    ///
    /// チャンネル数を変える唯一の操作です。既にグレースケールの場合は複製を返します。
    #[must_use]
    pub fn to_grayscale(&self) -> Self {
        match self {
            Self::Gray(image) => Self::Gray(image.clone()),
            Self::Rgb(image) => Self::Gray(rgb_to_gray(image)),
        }
    }
}

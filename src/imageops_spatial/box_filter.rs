use crate::error::Error;
use crate::imageops_spatial::convolution::Convolve;
use crate::imageops_spatial::kernel::Kernel;
use crate::imageops_spatial::padding::PaddingMode;

/// 正方形カーネルの平均化（ボックス）フィルタを提供するトレイト
///
/// 全ての重みが `1 / k²` のカーネルで畳み込みを行います。
/// 境界の扱いは [`PaddingMode`] で指定します。
pub trait BoxFilter: Sized {
    /// 指定したカーネルサイズでボックスフィルタを適用する
    ///
    /// # 引数
    ///
    /// * `kernel_size` - カーネルの一辺の長さ（奇数）
    /// * `padding` - 範囲外サンプルの扱い
    ///
    /// # 戻り値
    ///
    /// フィルタ処理された画像、またはエラー
    ///
    /// # エラー
    ///
    /// * カーネルサイズが偶数または 0 の場合
    /// * 空の画像に対して処理を実行した場合
    fn box_filter(&self, kernel_size: u32, padding: PaddingMode) -> Result<Self, Error>;

    /// [`BoxFilter::box_filter`] の結果で画像を置き換える
    fn box_filter_mut(
        &mut self,
        kernel_size: u32,
        padding: PaddingMode,
    ) -> Result<&mut Self, Error> {
        *self = self.box_filter(kernel_size, padding)?;
        Ok(self)
    }
}

impl<T> BoxFilter for T
where
    T: Convolve,
{
    fn box_filter(&self, kernel_size: u32, padding: PaddingMode) -> Result<Self, Error> {
        let kernel = Kernel::box_filter(kernel_size)?;
        self.convolve(&kernel, padding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KernelError;
    use image::{GrayImage, Luma};
    use imageproc::gray_image;

    #[test]
    fn box_filter_on_gradient_with_mirror_padding() {
        let image = gray_image!(
            0, 10, 20;
            30, 40, 50;
            60, 70, 80);
        let result = image.box_filter(3, PaddingMode::Mirror).unwrap();
        // top-left reflects -1 -> 1 on both axes
        let expected = gray_image!(
            27, 30, 33;
            37, 40, 43;
            47, 50, 53);
        assert_eq!(result, expected);
    }

    #[test]
    fn box_filter_with_replicate_padding() {
        let image = gray_image!(
            0, 10, 20;
            30, 40, 50;
            60, 70, 80);
        let result = image.box_filter(3, PaddingMode::Replicate).unwrap();
        assert_eq!(result.get_pixel(0, 0)[0], 13);
        assert_eq!(result.get_pixel(1, 1)[0], 40);
        assert_eq!(result.get_pixel(2, 2)[0], 67);
    }

    #[test]
    fn box_filter_size_one_is_identity() {
        let image = gray_image!(
            5, 250;
            17, 0);
        for mode in PaddingMode::ALL {
            assert_eq!(image.box_filter(1, mode).unwrap(), image);
        }
    }

    #[test]
    fn box_filter_rejects_even_sizes() {
        let image = GrayImage::from_pixel(4, 4, Luma([1]));
        assert_eq!(
            image.box_filter(2, PaddingMode::Zero),
            Err(Error::Kernel(KernelError::EvenSize { size: 2 }))
        );
    }

    #[test]
    fn box_filter_mut_updates_in_place() {
        let mut image = GrayImage::from_pixel(5, 5, Luma([77]));
        image.box_filter_mut(5, PaddingMode::Replicate).unwrap();
        assert!(image.pixels().all(|p| p[0] == 77));
    }
}

use crate::error::ParseMethodError;
use crate::Image;
use image::{ImageBuffer, Pixel};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// Border handling for samples that fall outside the image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaddingMode {
    /// Border pixels whose window leaves the image are not processed
    ///
    /// Windowed operators only visit `[k, dim - k)` and leave every other
    /// output position at 0.
    #[default]
    None,
    /// Out-of-range samples read as 0
    Zero,
    /// Out-of-range samples take the value of the nearest edge pixel
    Replicate,
    /// Out-of-range samples are reflected about the edge pixel (`-1 -> 1`)
    Mirror,
}

/// Result of resolving a possibly out-of-range coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sample {
    /// Read the in-range pixel at this position
    Pixel { x: usize, y: usize },
    /// Use the literal value 0
    Zero,
    /// Leave the sample out entirely
    Skip,
}

impl PaddingMode {
    pub const ALL: [Self; 4] = [Self::None, Self::Zero, Self::Replicate, Self::Mirror];

    /// Resolves `(x, y)` against a `width x height` image
    ///
    /// In-range coordinates always resolve to themselves. An empty image
    /// resolves every coordinate to [`Sample::Skip`].
    pub fn resolve(self, x: i64, y: i64, width: u32, height: u32) -> Sample {
        let (w, h) = (i64::from(width), i64::from(height));
        if w == 0 || h == 0 {
            return Sample::Skip;
        }
        if (0..w).contains(&x) && (0..h).contains(&y) {
            return Sample::Pixel {
                x: x as usize,
                y: y as usize,
            };
        }

        match self {
            Self::None => Sample::Skip,
            Self::Zero => Sample::Zero,
            Self::Replicate => Sample::Pixel {
                x: x.clamp(0, w - 1) as usize,
                y: y.clamp(0, h - 1) as usize,
            },
            Self::Mirror => Sample::Pixel {
                x: reflect(x, w),
                y: reflect(y, h),
            },
        }
    }

    /// Output region visited by a windowed operator with radii `(rx, ry)`
    ///
    /// `None` shrinks the region so that every visited window lies inside the
    /// image; the other modes visit every pixel.
    pub fn processing_region(
        self,
        width: u32,
        height: u32,
        rx: u32,
        ry: u32,
    ) -> (Range<u32>, Range<u32>) {
        match self {
            Self::None => (
                rx..width.saturating_sub(rx),
                ry..height.saturating_sub(ry),
            ),
            _ => (0..width, 0..height),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Zero => "zero",
            Self::Replicate => "replicate",
            Self::Mirror => "mirror",
        }
    }
}

/// Single reflection about the edge pixel, clamped into `[0, n)`
///
/// Radii at least as large as the axis would reflect past the opposite edge;
/// the clamp keeps those reads in bounds.
fn reflect(c: i64, n: i64) -> usize {
    let reflected = if c < 0 {
        -c
    } else if c >= n {
        2 * n - c - 2
    } else {
        c
    };
    reflected.clamp(0, n - 1) as usize
}

impl fmt::Display for PaddingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PaddingMode {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "zero" => Ok(Self::Zero),
            "replicate" => Ok(Self::Replicate),
            "mirror" => Ok(Self::Mirror),
            _ => Err(ParseMethodError::UnknownPaddingMode(s.to_owned())),
        }
    }
}

/// 画像の周囲に境界モードに従ったパディングを追加するトレイト
pub trait Padding<P: Pixel> {
    /// 左右に `pad_x`、上下に `pad_y` ピクセルを追加した画像を返す
    ///
    /// # 引数
    ///
    /// * `pad_x` - 左右それぞれに追加する幅
    /// * `pad_y` - 上下それぞれに追加する高さ
    /// * `mode` - 範囲外座標の解決方法
    /// * `fill` - `Zero` / `None` で範囲外となるセルの値
    ///
    /// # 戻り値
    ///
    /// `(width + 2 * pad_x) x (height + 2 * pad_y)` のパディング済み画像
    fn pad(&self, pad_x: u32, pad_y: u32, mode: PaddingMode, fill: P) -> Image<P>;
}

impl<P: Pixel> Padding<P> for ImageBuffer<P, Vec<P::Subpixel>> {
    fn pad(&self, pad_x: u32, pad_y: u32, mode: PaddingMode, fill: P) -> Image<P> {
        let (width, height) = self.dimensions();
        let new_width = width + 2 * pad_x;
        let new_height = height + 2 * pad_y;

        ImageBuffer::from_fn(new_width, new_height, |x, y| {
            let src_x = i64::from(x) - i64::from(pad_x);
            let src_y = i64::from(y) - i64::from(pad_y);
            match mode.resolve(src_x, src_y, width, height) {
                Sample::Pixel { x, y } => *self.get_pixel(x as u32, y as u32),
                Sample::Zero | Sample::Skip => fill,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use imageproc::gray_image;

    #[test]
    fn in_range_coordinates_resolve_to_themselves_for_every_mode() {
        for mode in PaddingMode::ALL {
            assert_eq!(mode.resolve(2, 1, 4, 3), Sample::Pixel { x: 2, y: 1 });
        }
    }

    #[test]
    fn none_and_zero_do_not_synthesize_coordinates() {
        assert_eq!(PaddingMode::None.resolve(-1, 0, 4, 4), Sample::Skip);
        assert_eq!(PaddingMode::Zero.resolve(4, 0, 4, 4), Sample::Zero);
    }

    #[test]
    fn replicate_clamps_each_axis_independently() {
        let mode = PaddingMode::Replicate;
        assert_eq!(mode.resolve(-3, 1, 5, 5), Sample::Pixel { x: 0, y: 1 });
        assert_eq!(mode.resolve(7, -2, 5, 5), Sample::Pixel { x: 4, y: 0 });
        assert_eq!(mode.resolve(5, 5, 5, 5), Sample::Pixel { x: 4, y: 4 });
    }

    #[test]
    fn mirror_reflects_without_repeating_the_edge() {
        let mode = PaddingMode::Mirror;
        assert_eq!(mode.resolve(-1, -1, 5, 5), Sample::Pixel { x: 1, y: 1 });
        assert_eq!(mode.resolve(-2, 0, 5, 5), Sample::Pixel { x: 2, y: 0 });
        assert_eq!(mode.resolve(5, 6, 5, 5), Sample::Pixel { x: 3, y: 2 });
    }

    #[test]
    fn mirror_stays_in_bounds_for_tiny_axes() {
        let mode = PaddingMode::Mirror;
        assert_eq!(mode.resolve(-1, 0, 1, 1), Sample::Pixel { x: 0, y: 0 });
        assert_eq!(mode.resolve(-3, 0, 2, 1), Sample::Pixel { x: 1, y: 0 });
    }

    #[test]
    fn empty_image_skips_everything() {
        assert_eq!(PaddingMode::Replicate.resolve(0, 0, 0, 3), Sample::Skip);
    }

    #[test]
    fn processing_region_shrinks_only_for_none() {
        assert_eq!(
            PaddingMode::None.processing_region(6, 5, 1, 2),
            (1..5, 2..3)
        );
        assert_eq!(
            PaddingMode::Mirror.processing_region(6, 5, 1, 2),
            (0..6, 0..5)
        );
        let (xs, ys) = PaddingMode::None.processing_region(2, 2, 2, 2);
        assert!(xs.is_empty() && ys.is_empty());
    }

    #[test]
    fn parse_and_display_round_trip() {
        for mode in PaddingMode::ALL {
            assert_eq!(mode.to_string().parse::<PaddingMode>(), Ok(mode));
        }
        assert_eq!(" Mirror ".parse::<PaddingMode>(), Ok(PaddingMode::Mirror));
        assert_eq!(
            "wrap".parse::<PaddingMode>(),
            Err(ParseMethodError::UnknownPaddingMode("wrap".to_owned()))
        );
    }

    #[test]
    fn pad_with_each_mode() {
        let image = gray_image!(
            1, 2, 3;
            4, 5, 6);

        let zero = image.pad(1, 1, PaddingMode::Zero, Luma([0]));
        assert_eq!(zero.dimensions(), (5, 4));
        assert_eq!(zero.get_pixel(0, 0)[0], 0);
        assert_eq!(zero.get_pixel(1, 1)[0], 1);

        let filled = image.pad(1, 0, PaddingMode::None, Luma([9]));
        assert_eq!(filled.get_pixel(0, 0)[0], 9);
        assert_eq!(filled.get_pixel(4, 1)[0], 9);

        let replicate = image.pad(1, 1, PaddingMode::Replicate, Luma([0]));
        assert_eq!(replicate.get_pixel(0, 0)[0], 1);
        assert_eq!(replicate.get_pixel(4, 3)[0], 6);

        let mirror = image.pad(1, 1, PaddingMode::Mirror, Luma([0]));
        assert_eq!(mirror.get_pixel(0, 0)[0], 5);
        assert_eq!(mirror.get_pixel(4, 0)[0], 5);
        assert_eq!(mirror.get_pixel(2, 3)[0], 2);
    }
}

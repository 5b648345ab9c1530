use crate::error::Error;
use crate::imageops_spatial::padding::{Padding, PaddingMode};
use crate::imageops_spatial::structuring_element::StructuringElement;
use crate::utils::{fill_rows, image_from_raw, validate_non_empty_image};
use crate::PixelBuffer;
use image::{GrayImage, Luma};
use tracing::{debug, warn};

const FOREGROUND: u8 = 255;
const BACKGROUND: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Test {
    /// every footprint cell is foreground
    Fit,
    /// at least one footprint cell is foreground
    Hit,
}

impl Test {
    /// Value that never changes the outcome of the test
    const fn neutral(self) -> u8 {
        match self {
            Self::Fit => FOREGROUND,
            Self::Hit => BACKGROUND,
        }
    }
}

/// 2値画像のモルフォロジー演算を提供するトレイト
///
/// 0 以外の画素を前景として扱い、結果は 0 / 255 の2値画像です。
///
/// 境界の扱い:
/// * `Replicate` / `Mirror` - 座標を解決してパディング
/// * `Zero` - 演算に影響しない値（収縮は前景、膨張は背景）でパディング
/// * `None` - 範囲外を背景として扱う（警告を出力）
pub trait Morphology: Sized {
    /// 収縮: 構造要素の全セルが前景に重なる位置を 255 にする
    fn erode(&self, element: &StructuringElement, padding: PaddingMode) -> Result<Self, Error>;

    /// 膨張: 構造要素のいずれかのセルが前景に重なる位置を 255 にする
    fn dilate(&self, element: &StructuringElement, padding: PaddingMode) -> Result<Self, Error>;

    /// オープニング（収縮の後に膨張）
    fn open(&self, element: &StructuringElement, padding: PaddingMode) -> Result<Self, Error> {
        self.erode(element, padding)?.dilate(element, padding)
    }

    /// クロージング（膨張の後に収縮）
    fn close(&self, element: &StructuringElement, padding: PaddingMode) -> Result<Self, Error> {
        self.dilate(element, padding)?.erode(element, padding)
    }

    /// 境界抽出: `元画像 - 収縮結果`（飽和減算）
    fn boundary(&self, element: &StructuringElement, padding: PaddingMode)
        -> Result<Self, Error>;

    fn erode_mut(
        &mut self,
        element: &StructuringElement,
        padding: PaddingMode,
    ) -> Result<&mut Self, Error> {
        *self = self.erode(element, padding)?;
        Ok(self)
    }

    fn dilate_mut(
        &mut self,
        element: &StructuringElement,
        padding: PaddingMode,
    ) -> Result<&mut Self, Error> {
        *self = self.dilate(element, padding)?;
        Ok(self)
    }

    fn open_mut(
        &mut self,
        element: &StructuringElement,
        padding: PaddingMode,
    ) -> Result<&mut Self, Error> {
        *self = self.open(element, padding)?;
        Ok(self)
    }

    fn close_mut(
        &mut self,
        element: &StructuringElement,
        padding: PaddingMode,
    ) -> Result<&mut Self, Error> {
        *self = self.close(element, padding)?;
        Ok(self)
    }

    fn boundary_mut(
        &mut self,
        element: &StructuringElement,
        padding: PaddingMode,
    ) -> Result<&mut Self, Error> {
        *self = self.boundary(element, padding)?;
        Ok(self)
    }
}

impl Morphology for GrayImage {
    fn erode(&self, element: &StructuringElement, padding: PaddingMode) -> Result<Self, Error> {
        apply(self, element, padding, Test::Fit)
    }

    fn dilate(&self, element: &StructuringElement, padding: PaddingMode) -> Result<Self, Error> {
        apply(self, element, padding, Test::Hit)
    }

    fn boundary(
        &self,
        element: &StructuringElement,
        padding: PaddingMode,
    ) -> Result<Self, Error> {
        let eroded = self.erode(element, padding)?;
        let data = self
            .as_raw()
            .iter()
            .zip(eroded.as_raw())
            .map(|(&original, &inner)| original.saturating_sub(inner))
            .collect();
        image_from_raw(self.width(), self.height(), data)
    }
}

impl Morphology for PixelBuffer {
    fn erode(&self, element: &StructuringElement, padding: PaddingMode) -> Result<Self, Error> {
        self.require_gray("erosion")?
            .erode(element, padding)
            .map(Self::Gray)
    }

    fn dilate(&self, element: &StructuringElement, padding: PaddingMode) -> Result<Self, Error> {
        self.require_gray("dilation")?
            .dilate(element, padding)
            .map(Self::Gray)
    }

    fn open(&self, element: &StructuringElement, padding: PaddingMode) -> Result<Self, Error> {
        self.require_gray("opening")?
            .open(element, padding)
            .map(Self::Gray)
    }

    fn close(&self, element: &StructuringElement, padding: PaddingMode) -> Result<Self, Error> {
        self.require_gray("closing")?
            .close(element, padding)
            .map(Self::Gray)
    }

    fn boundary(
        &self,
        element: &StructuringElement,
        padding: PaddingMode,
    ) -> Result<Self, Error> {
        self.require_gray("boundary extraction")?
            .boundary(element, padding)
            .map(Self::Gray)
    }
}

fn apply(
    image: &GrayImage,
    element: &StructuringElement,
    padding: PaddingMode,
    test: Test,
) -> Result<GrayImage, Error> {
    let (width, height) = image.dimensions();
    validate_non_empty_image(width, height)?;
    debug!(width, height, size = element.size(), ?test, %padding, "morphology");

    let fill = match padding {
        PaddingMode::Zero => test.neutral(),
        PaddingMode::None => {
            warn!("morphology has no unpadded mode, treating out-of-range cells as background");
            BACKGROUND
        }
        PaddingMode::Replicate | PaddingMode::Mirror => BACKGROUND,
    };

    let r = element.radius();
    let padded = image.pad(r, r, padding, Luma([fill]));
    let padded_width = padded.width() as usize;
    let padded_raw = padded.as_raw();
    let footprint = element.footprint();
    let r = i64::from(r);

    let mut output = vec![BACKGROUND; width as usize * height as usize];
    fill_rows(&mut output, width as usize, |y, row| {
        for (x, out) in row.iter_mut().enumerate() {
            let is_foreground = |&(dx, dy): &(i64, i64)| {
                let px = (x as i64 + r + dx) as usize;
                let py = (y as i64 + r + dy) as usize;
                padded_raw[py * padded_width + px] != BACKGROUND
            };
            let matched = match test {
                Test::Fit => footprint.iter().all(is_foreground),
                Test::Hit => footprint.iter().any(is_foreground),
            };
            if matched {
                *out = FOREGROUND;
            }
        }
    });

    image_from_raw(width, height, output)
}

//! Binarization of single-channel images.
//!
//! Every variant maps a pixel to 255 (foreground) or 0 (background). Local
//! thresholds are always derived from the input image, never from partially
//! written output.

use crate::error::{Error, KernelError};
use crate::imageops_spatial::summed_area_table::CreateSummedAreaTable;
use crate::utils::{fill_rows, image_from_raw, validate_non_empty_image};
use crate::PixelBuffer;
use image::GrayImage;
use tracing::debug;

const FOREGROUND: u8 = 255;
const BACKGROUND: u8 = 0;

/// 256-bin intensity histogram
pub fn histogram(image: &GrayImage) -> [u32; 256] {
    imageproc::stats::histogram(image)
        .channels
        .first()
        .copied()
        .unwrap_or([0; 256])
}

/// Otsu's global threshold for a 256-bin histogram
///
/// Scans `t` upward and keeps the first `t` that strictly maximizes the
/// between-class variance `wB * wF * (mB - mF)²`, where the background class
/// holds intensities `<= t`. Returns 0 for an empty or single-level histogram.
pub fn otsu_level(hist: &[u32; 256]) -> u8 {
    let total: f64 = hist.iter().map(|&n| f64::from(n)).sum();
    let weighted_total: f64 = hist
        .iter()
        .enumerate()
        .map(|(level, &n)| level as f64 * f64::from(n))
        .sum();

    let mut background_weight = 0.0;
    let mut background_sum = 0.0;
    let mut best_variance = 0.0;
    let mut level = 0u8;

    for (t, &count) in hist.iter().enumerate() {
        background_weight += f64::from(count);
        if background_weight == 0.0 {
            continue;
        }
        let foreground_weight = total - background_weight;
        if foreground_weight == 0.0 {
            break;
        }

        background_sum += t as f64 * f64::from(count);
        let background_mean = background_sum / background_weight;
        let foreground_mean = (weighted_total - background_sum) / foreground_weight;
        let variance = background_weight
            * foreground_weight
            * (background_mean - foreground_mean).powi(2);

        if variance > best_variance {
            best_variance = variance;
            level = t as u8;
        }
    }

    level
}

fn validate_block_size(block_size: u32) -> Result<(), Error> {
    if block_size == 0 {
        Err(KernelError::ZeroSize.into())
    } else if block_size % 2 == 0 {
        Err(KernelError::EvenSize { size: block_size }.into())
    } else {
        Ok(())
    }
}

/// Global and local binarization
pub trait Threshold: Sized {
    /// `v >= threshold -> 255`, otherwise 0
    fn fixed_threshold(&self, threshold: u8) -> Result<Self, Error>;

    /// Level chosen by Otsu's method, see [`otsu_level`]
    fn otsu_level(&self) -> Result<u8, Error>;

    /// Binarizes at the Otsu level `t` with `v > t -> 255`
    ///
    /// `t` is the brightest intensity of the background class, so a two-level
    /// image is always split exactly into its two levels.
    fn otsu_threshold(&self) -> Result<Self, Error>;

    /// `v >= mean - c -> 255`, where `mean` is the integer mean of the
    /// `block_size²` window clipped to the image
    ///
    /// # Errors
    ///
    /// * `Error::Kernel` unless `block_size` is odd and at least 1
    fn adaptive_mean_threshold(&self, block_size: u32, c: i32) -> Result<Self, Error>;

    /// `v >= trunc(gmean - c) -> 255`, where `gmean` is the Gaussian-weighted
    /// mean (`σ = block_size / 6`) of the window clipped to the image
    ///
    /// # Errors
    ///
    /// * `Error::Kernel` unless `block_size` is odd and at least 1
    fn adaptive_gaussian_threshold(&self, block_size: u32, c: i32) -> Result<Self, Error>;
}

impl Threshold for GrayImage {
    fn fixed_threshold(&self, threshold: u8) -> Result<Self, Error> {
        validate_non_empty_image(self.width(), self.height())?;
        debug!(threshold, "fixed_threshold");
        Ok(binarize(self, |v| v >= threshold))
    }

    fn otsu_level(&self) -> Result<u8, Error> {
        validate_non_empty_image(self.width(), self.height())?;
        Ok(otsu_level(&histogram(self)))
    }

    fn otsu_threshold(&self) -> Result<Self, Error> {
        let level = Threshold::otsu_level(self)?;
        debug!(level, "otsu_threshold");
        Ok(binarize(self, |v| v > level))
    }

    fn adaptive_mean_threshold(&self, block_size: u32, c: i32) -> Result<Self, Error> {
        validate_block_size(block_size)?;
        let (width, height) = self.dimensions();
        let sat = self.create_summed_area_table()?;
        debug!(width, height, block_size, c, "adaptive_mean_threshold");

        let r = i64::from(block_size / 2);
        let src = self.as_raw();
        let mut output = vec![BACKGROUND; src.len()];

        fill_rows(&mut output, width as usize, |y, row| {
            let y = y as i64;
            for (x, out) in row.iter_mut().enumerate() {
                let x = x as i64;
                let (sum, count) = sat.rectangle_sum(x - r, y - r, x + r, y + r);
                // the window always contains (x, y), so count >= 1
                let mean = (sum / count.max(1)) as i32;
                let value = i32::from(src[y as usize * width as usize + x as usize]);
                if value >= mean - c {
                    *out = FOREGROUND;
                }
            }
        });

        image_from_raw(width, height, output)
    }

    fn adaptive_gaussian_threshold(&self, block_size: u32, c: i32) -> Result<Self, Error> {
        validate_block_size(block_size)?;
        let (width, height) = self.dimensions();
        validate_non_empty_image(width, height)?;
        debug!(width, height, block_size, c, "adaptive_gaussian_threshold");

        let r = i64::from(block_size / 2);
        let sigma = block_size as f32 / 6.0;
        let denominator = 2.0 * sigma * sigma;
        // separable weights indexed by offset + r
        let weights: Vec<f32> = (-r..=r)
            .map(|d| (-((d * d) as f32) / denominator).exp())
            .collect();

        let (w, h) = (i64::from(width), i64::from(height));
        let src = self.as_raw();
        let mut output = vec![BACKGROUND; src.len()];

        fill_rows(&mut output, width as usize, |y, row| {
            let y = y as i64;
            let rows = (y - r).max(0)..=(y + r).min(h - 1);
            for (x, out) in row.iter_mut().enumerate() {
                let x = x as i64;
                let cols = (x - r).max(0)..=(x + r).min(w - 1);

                let (mut sum, mut weight_sum) = (0.0f32, 0.0f32);
                for ny in rows.clone() {
                    let wy = weights[(ny - y + r) as usize];
                    for nx in cols.clone() {
                        let weight = wy * weights[(nx - x + r) as usize];
                        sum += weight * f32::from(src[(ny * w + nx) as usize]);
                        weight_sum += weight;
                    }
                }

                let threshold = (sum / weight_sum - c as f32) as i32;
                let value = i32::from(src[(y * w + x) as usize]);
                if value >= threshold {
                    *out = FOREGROUND;
                }
            }
        });

        image_from_raw(width, height, output)
    }
}

impl Threshold for PixelBuffer {
    fn fixed_threshold(&self, threshold: u8) -> Result<Self, Error> {
        self.require_gray("fixed_threshold")?
            .fixed_threshold(threshold)
            .map(Self::Gray)
    }

    fn otsu_level(&self) -> Result<u8, Error> {
        Threshold::otsu_level(self.require_gray("otsu_threshold")?)
    }

    fn otsu_threshold(&self) -> Result<Self, Error> {
        self.require_gray("otsu_threshold")?
            .otsu_threshold()
            .map(Self::Gray)
    }

    fn adaptive_mean_threshold(&self, block_size: u32, c: i32) -> Result<Self, Error> {
        self.require_gray("adaptive_mean_threshold")?
            .adaptive_mean_threshold(block_size, c)
            .map(Self::Gray)
    }

    fn adaptive_gaussian_threshold(&self, block_size: u32, c: i32) -> Result<Self, Error> {
        self.require_gray("adaptive_gaussian_threshold")?
            .adaptive_gaussian_threshold(block_size, c)
            .map(Self::Gray)
    }
}

fn binarize<F>(image: &GrayImage, is_foreground: F) -> GrayImage
where
    F: Fn(u8) -> bool,
{
    let mut output = image.clone();
    for value in output.iter_mut() {
        *value = if is_foreground(*value) {
            FOREGROUND
        } else {
            BACKGROUND
        };
    }
    output
}

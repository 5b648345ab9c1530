//! Edge-map sharpening, unsharp masking and highboost filtering.

use crate::error::{Error, ParseMethodError};
use crate::imageops_spatial::box_filter::BoxFilter;
use crate::imageops_spatial::buffer::map_layout;
use crate::imageops_spatial::edge::EdgeFilter;
use crate::imageops_spatial::gaussian_filter::GaussianFilter;
use crate::imageops_spatial::kernel::Laplacian;
use crate::imageops_spatial::median_filter::MedianFilter;
use crate::imageops_spatial::padding::PaddingMode;
use crate::utils::{clamp_i32_to_u8, image_from_raw};
use crate::{Image, PixelBuffer};
use image::Pixel;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Edge operator whose response is added back onto the image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SharpeningMethod {
    /// Adds the negative-center 4-neighbor response, lifting the darker side of an edge
    BasicLaplacian,
    /// Adds the negative-center 8-neighbor response
    FullLaplacian,
    /// Adds the positive-center 4-neighbor response, lifting bright details
    BasicInvertedLaplacian,
    /// Adds the positive-center 8-neighbor response
    FullInvertedLaplacian,
    /// Interior-only gradient magnitude, padding is ignored
    Sobel,
}

impl SharpeningMethod {
    pub const ALL: [Self; 5] = [
        Self::BasicLaplacian,
        Self::FullLaplacian,
        Self::BasicInvertedLaplacian,
        Self::FullInvertedLaplacian,
        Self::Sobel,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::BasicLaplacian => "Basic Laplacian",
            Self::FullLaplacian => "Full Laplacian",
            Self::BasicInvertedLaplacian => "Basic Inverted Laplacian",
            Self::FullInvertedLaplacian => "Full Inverted Laplacian",
            Self::Sobel => "Sobel",
        }
    }
}

impl fmt::Display for SharpeningMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SharpeningMethod {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|method| method.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseMethodError::UnknownSharpeningMethod(s.to_owned()))
    }
}

/// Smoothing filter used to build the unsharp / highboost mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlurKernel {
    Box,
    Gaussian,
    Median,
}

impl BlurKernel {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::Gaussian => "gaussian",
            Self::Median => "median",
        }
    }
}

impl fmt::Display for BlurKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlurKernel {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "box" => Ok(Self::Box),
            "gaussian" => Ok(Self::Gaussian),
            "median" => Ok(Self::Median),
            _ => Err(ParseMethodError::UnknownBlurKernel(s.to_owned())),
        }
    }
}

/// Sharpening operators built from the edge and blur filters
pub trait Sharpen: Sized {
    /// `clamp(input + edge_map)`, where the edge map is the 8-bit result of `method`
    ///
    /// # Errors
    ///
    /// * `Error::EmptyImage` if the image has no pixels
    fn sharpen(&self, method: SharpeningMethod, padding: PaddingMode) -> Result<Self, Error>;

    /// Unsharp masking: `clamp(input + (input - blur))`
    ///
    /// `sigma` is only read for [`BlurKernel::Gaussian`].
    ///
    /// # Errors
    ///
    /// * `Error::Kernel` for an invalid `kernel_size` or `sigma`
    /// * `Error::EmptyImage` if the image has no pixels
    fn unsharp_mask(
        &self,
        kernel: BlurKernel,
        kernel_size: u32,
        sigma: f32,
        padding: PaddingMode,
    ) -> Result<Self, Error>;

    /// Highboost filtering: `clamp(round(input + k * (input - blur)))`
    ///
    /// `k = 1` reproduces unsharp masking.
    ///
    /// # Errors
    ///
    /// * `Error::InvalidParameter` if `k` is not finite
    /// * `Error::Kernel` for an invalid `kernel_size` or `sigma`
    /// * `Error::EmptyImage` if the image has no pixels
    fn highboost(
        &self,
        kernel: BlurKernel,
        kernel_size: u32,
        k: f32,
        sigma: f32,
        padding: PaddingMode,
    ) -> Result<Self, Error>;

    fn sharpen_mut(
        &mut self,
        method: SharpeningMethod,
        padding: PaddingMode,
    ) -> Result<&mut Self, Error> {
        *self = self.sharpen(method, padding)?;
        Ok(self)
    }

    fn unsharp_mask_mut(
        &mut self,
        kernel: BlurKernel,
        kernel_size: u32,
        sigma: f32,
        padding: PaddingMode,
    ) -> Result<&mut Self, Error> {
        *self = self.unsharp_mask(kernel, kernel_size, sigma, padding)?;
        Ok(self)
    }

    fn highboost_mut(
        &mut self,
        kernel: BlurKernel,
        kernel_size: u32,
        k: f32,
        sigma: f32,
        padding: PaddingMode,
    ) -> Result<&mut Self, Error> {
        *self = self.highboost(kernel, kernel_size, k, sigma, padding)?;
        Ok(self)
    }
}

impl<P> Sharpen for Image<P>
where
    P: Pixel<Subpixel = u8>,
{
    fn sharpen(&self, method: SharpeningMethod, padding: PaddingMode) -> Result<Self, Error> {
        debug!(%method, %padding, "sharpen");
        let edges = match method {
            SharpeningMethod::BasicLaplacian => self.laplacian(Laplacian::Basic, true, padding),
            SharpeningMethod::FullLaplacian => self.laplacian(Laplacian::Full, true, padding),
            SharpeningMethod::BasicInvertedLaplacian => {
                self.laplacian(Laplacian::Basic, false, padding)
            }
            SharpeningMethod::FullInvertedLaplacian => {
                self.laplacian(Laplacian::Full, false, padding)
            }
            SharpeningMethod::Sobel => self.sobel(),
        }?;

        combine(self, &edges, |input, edge| input.saturating_add(edge))
    }

    fn unsharp_mask(
        &self,
        kernel: BlurKernel,
        kernel_size: u32,
        sigma: f32,
        padding: PaddingMode,
    ) -> Result<Self, Error> {
        debug!(%kernel, kernel_size, sigma, %padding, "unsharp_mask");
        let blurred = blur(self, kernel, kernel_size, sigma, padding)?;

        combine(self, &blurred, |input, blur| {
            let (input, blur) = (i32::from(input), i32::from(blur));
            clamp_i32_to_u8(input + (input - blur))
        })
    }

    fn highboost(
        &self,
        kernel: BlurKernel,
        kernel_size: u32,
        k: f32,
        sigma: f32,
        padding: PaddingMode,
    ) -> Result<Self, Error> {
        if !k.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "highboost factor must be finite, got {k}"
            )));
        }
        debug!(%kernel, kernel_size, k, sigma, %padding, "highboost");
        let blurred = blur(self, kernel, kernel_size, sigma, padding)?;

        // the scaled mask is truncated toward zero
        combine(self, &blurred, |input, blur| {
            let mask = f32::from(input) - f32::from(blur);
            clamp_i32_to_u8(i32::from(input) + (k * mask) as i32)
        })
    }
}

impl Sharpen for PixelBuffer {
    fn sharpen(&self, method: SharpeningMethod, padding: PaddingMode) -> Result<Self, Error> {
        map_layout!(self, image => image.sharpen(method, padding))
    }

    fn unsharp_mask(
        &self,
        kernel: BlurKernel,
        kernel_size: u32,
        sigma: f32,
        padding: PaddingMode,
    ) -> Result<Self, Error> {
        map_layout!(self, image => image.unsharp_mask(kernel, kernel_size, sigma, padding))
    }

    fn highboost(
        &self,
        kernel: BlurKernel,
        kernel_size: u32,
        k: f32,
        sigma: f32,
        padding: PaddingMode,
    ) -> Result<Self, Error> {
        map_layout!(self, image => image.highboost(kernel, kernel_size, k, sigma, padding))
    }
}

fn blur<P>(
    image: &Image<P>,
    kernel: BlurKernel,
    kernel_size: u32,
    sigma: f32,
    padding: PaddingMode,
) -> Result<Image<P>, Error>
where
    P: Pixel<Subpixel = u8>,
{
    match kernel {
        BlurKernel::Box => image.box_filter(kernel_size, padding),
        BlurKernel::Gaussian => image.gaussian_filter(kernel_size, sigma, padding),
        BlurKernel::Median => image.median_filter(kernel_size, padding),
    }
}

/// Subpixel-wise combination of two images with identical layout
fn combine<P, F>(image: &Image<P>, other: &Image<P>, f: F) -> Result<Image<P>, Error>
where
    P: Pixel<Subpixel = u8>,
    F: Fn(u8, u8) -> u8,
{
    let data = image
        .as_raw()
        .iter()
        .zip(other.as_raw())
        .map(|(&a, &b)| f(a, b))
        .collect();
    image_from_raw(image.width(), image.height(), data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KernelError;
    use image::{GrayImage, Luma, Rgb, RgbImage};
    use imageproc::gray_image;

    #[test]
    fn parses_sharpening_method_names() {
        assert_eq!(
            "Basic Laplacian".parse::<SharpeningMethod>(),
            Ok(SharpeningMethod::BasicLaplacian)
        );
        assert_eq!(
            "full inverted laplacian".parse::<SharpeningMethod>(),
            Ok(SharpeningMethod::FullInvertedLaplacian)
        );
        assert_eq!("Sobel".parse::<SharpeningMethod>(), Ok(SharpeningMethod::Sobel));
        assert_eq!(
            "Prewitt".parse::<SharpeningMethod>(),
            Err(ParseMethodError::UnknownSharpeningMethod("Prewitt".to_owned()))
        );
        for method in SharpeningMethod::ALL {
            assert_eq!(method.to_string().parse::<SharpeningMethod>(), Ok(method));
        }
    }

    #[test]
    fn parses_blur_kernel_names() {
        assert_eq!("Box".parse::<BlurKernel>(), Ok(BlurKernel::Box));
        assert_eq!(" gaussian ".parse::<BlurKernel>(), Ok(BlurKernel::Gaussian));
        assert_eq!("median".parse::<BlurKernel>(), Ok(BlurKernel::Median));
        assert_eq!(
            "bilateral".parse::<BlurKernel>(),
            Err(ParseMethodError::UnknownBlurKernel("bilateral".to_owned()))
        );
    }

    #[test]
    fn sharpening_a_flat_image_is_a_no_op() {
        let image = GrayImage::from_pixel(4, 4, Luma([90]));
        for method in SharpeningMethod::ALL {
            let result = image.sharpen(method, PaddingMode::Replicate).unwrap();
            assert_eq!(result, image, "{method}");
        }
    }

    #[test]
    fn laplacian_sharpening_adds_the_clamped_edge_map() {
        let image = gray_image!(
            10, 10, 10;
            10, 50, 10;
            10, 10, 10);
        let result = image
            .sharpen(SharpeningMethod::BasicLaplacian, PaddingMode::Replicate)
            .unwrap();
        // negative-center response: the bright center gives -160 (clamped to 0),
        // each edge neighbor gives (10 + 10 + 10 + 50) - 4*10 = 40
        assert_eq!(
            result,
            gray_image!(
                10, 50, 10;
                50, 50, 50;
                10, 50, 10)
        );

        let inverted = image
            .sharpen(SharpeningMethod::BasicInvertedLaplacian, PaddingMode::Replicate)
            .unwrap();
        // positive-center response: 4*50 - 40 = 160 at the center, -40 elsewhere
        assert_eq!(
            inverted,
            gray_image!(
                10, 10, 10;
                10, 210, 10;
                10, 10, 10)
        );
    }

    #[test]
    fn full_laplacian_sharpening_uses_all_eight_neighbors() {
        let image = gray_image!(
            10, 10, 10;
            10, 50, 10;
            10, 10, 10);
        // corner neighbor: (3*10 + 50 + 4*10) - 8*10 = 40 under replicate padding
        let result = image
            .sharpen(SharpeningMethod::FullLaplacian, PaddingMode::Replicate)
            .unwrap();
        assert_eq!(result, GrayImage::from_pixel(3, 3, Luma([50])));

        // 8*50 - 80 = 320 saturates
        let inverted = image
            .sharpen(SharpeningMethod::FullInvertedLaplacian, PaddingMode::Replicate)
            .unwrap();
        assert_eq!(
            inverted,
            gray_image!(
                10, 10, 10;
                10, 255, 10;
                10, 10, 10)
        );
    }

    #[test]
    fn sharpening_saturates_at_white() {
        let image = gray_image!(
            0, 0, 0;
            0, 200, 0;
            0, 0, 0);
        let result = image
            .sharpen(SharpeningMethod::FullInvertedLaplacian, PaddingMode::Zero)
            .unwrap();
        assert_eq!(result.get_pixel(1, 1)[0], 255);
        assert_eq!(result.get_pixel(0, 0)[0], 0);

        let lifted = image
            .sharpen(SharpeningMethod::FullLaplacian, PaddingMode::Zero)
            .unwrap();
        assert_eq!(lifted.get_pixel(1, 1)[0], 200);
        assert_eq!(lifted.get_pixel(0, 0)[0], 200);
    }

    #[test]
    fn sobel_sharpening_keeps_the_border() {
        let image = gray_image!(
            0, 0, 10;
            0, 0, 10;
            0, 0, 10);
        let result = image.sharpen(SharpeningMethod::Sobel, PaddingMode::None).unwrap();
        assert_eq!(
            result,
            gray_image!(
                0, 0, 10;
                0, 40, 10;
                0, 0, 10)
        );
    }

    #[test]
    fn unsharp_mask_boosts_local_contrast() {
        let image = gray_image!(
            20, 20, 20;
            20, 110, 20;
            20, 20, 20);
        let result = image
            .unsharp_mask(BlurKernel::Box, 3, 1.0, PaddingMode::Replicate)
            .unwrap();
        // blur at center = (8*20 + 110) / 9 = 30
        assert_eq!(result.get_pixel(1, 1)[0], 190);
        // corner blur = (8*20 + 110) / 9 = 30 as well -> 20 + (20 - 30) = 10
        assert_eq!(result.get_pixel(0, 0)[0], 10);
    }

    #[test]
    fn highboost_with_unit_factor_matches_unsharp_mask() {
        let image = GrayImage::from_fn(6, 5, |x, y| Luma([((x * 37 + y * 11) % 256) as u8]));
        for kernel in [BlurKernel::Box, BlurKernel::Gaussian, BlurKernel::Median] {
            let unsharp = image
                .unsharp_mask(kernel, 3, 1.0, PaddingMode::Mirror)
                .unwrap();
            let boosted = image
                .highboost(kernel, 3, 1.0, 1.0, PaddingMode::Mirror)
                .unwrap();
            assert_eq!(unsharp, boosted, "{kernel}");
        }
    }

    #[test]
    fn highboost_with_zero_factor_is_identity() {
        let image = RgbImage::from_fn(4, 4, |x, y| Rgb([x as u8 * 40, y as u8 * 40, 7]));
        let result = image
            .highboost(BlurKernel::Median, 3, 0.0, 1.0, PaddingMode::Replicate)
            .unwrap();
        assert_eq!(result, image);
    }

    #[test]
    fn highboost_truncates_the_scaled_mask() {
        let image = gray_image!(
            10, 10, 10;
            10, 19, 10;
            10, 10, 10);
        let result = image
            .highboost(BlurKernel::Box, 3, 1.5, 1.0, PaddingMode::Replicate)
            .unwrap();
        // box blur is 11 everywhere: center 19 + trunc(1.5 * 8) = 31,
        // elsewhere 10 + trunc(1.5 * -1) = 9
        assert_eq!(result.get_pixel(1, 1)[0], 31);
        assert_eq!(result.get_pixel(0, 0)[0], 9);
        assert_eq!(result.get_pixel(1, 0)[0], 9);
    }

    #[test]
    fn highboost_rejects_non_finite_factor() {
        let image = gray_image!(1, 2, 3);
        assert!(matches!(
            image.highboost(BlurKernel::Box, 1, f32::NAN, 1.0, PaddingMode::Zero),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn blur_errors_propagate() {
        let image = gray_image!(1, 2, 3);
        assert_eq!(
            image.unsharp_mask(BlurKernel::Gaussian, 3, 0.0, PaddingMode::Zero),
            Err(Error::Kernel(KernelError::InvalidSigma(0.0)))
        );
        let mut buffer = PixelBuffer::from(image.clone());
        assert!(buffer
            .unsharp_mask_mut(BlurKernel::Box, 2, 1.0, PaddingMode::Zero)
            .is_err());
        assert_eq!(buffer, PixelBuffer::from(image));
    }
}

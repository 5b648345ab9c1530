use crate::error::Error;
use crate::imageops_spatial::buffer::map_layout;
use crate::imageops_spatial::kernel::Kernel;
use crate::imageops_spatial::padding::{PaddingMode, Sample};
use crate::utils::{fill_rows, image_from_raw, round_f32_to_u8, validate_non_empty_image};
use crate::{Image, PixelBuffer};
use image::Pixel;
use tracing::debug;

/// Padding-aware 2D convolution over every channel
///
/// This is the primitive beneath the box, Gaussian and Laplacian filters.
pub trait Convolve: Sized {
    /// Convolves every channel with `kernel`, resolving border samples with `padding`
    ///
    /// Each output value is the weighted sum of its footprint, rounded to the
    /// nearest integer and clamped to `[0, 255]`. Under [`PaddingMode::None`]
    /// only positions whose whole footprint lies inside the image are computed;
    /// every other position is 0.
    ///
    /// # Errors
    ///
    /// * `Error::EmptyImage` if the image has no pixels
    fn convolve(&self, kernel: &Kernel, padding: PaddingMode) -> Result<Self, Error>;

    /// In-place variant of [`Convolve::convolve`]
    ///
    /// The result is computed in full before it replaces `self`.
    fn convolve_mut(&mut self, kernel: &Kernel, padding: PaddingMode) -> Result<&mut Self, Error> {
        *self = self.convolve(kernel, padding)?;
        Ok(self)
    }
}

impl<P> Convolve for Image<P>
where
    P: Pixel<Subpixel = u8>,
{
    fn convolve(&self, kernel: &Kernel, padding: PaddingMode) -> Result<Self, Error> {
        let (width, height) = self.dimensions();
        validate_non_empty_image(width, height)?;
        debug!(
            width,
            height,
            channels = P::CHANNEL_COUNT,
            kernel_width = kernel.width(),
            kernel_height = kernel.height(),
            %padding,
            "convolve"
        );

        let data = convolve_raw(
            self.as_raw(),
            width,
            height,
            usize::from(P::CHANNEL_COUNT),
            kernel,
            padding,
        );
        image_from_raw(width, height, data)
    }
}

impl Convolve for PixelBuffer {
    fn convolve(&self, kernel: &Kernel, padding: PaddingMode) -> Result<Self, Error> {
        map_layout!(self, image => image.convolve(kernel, padding))
    }
}

/// Convolution over interleaved row-major subpixels
pub(crate) fn convolve_raw(
    src: &[u8],
    width: u32,
    height: u32,
    channels: usize,
    kernel: &Kernel,
    padding: PaddingMode,
) -> Vec<u8> {
    let (rx, ry) = kernel.radius();
    let (xs, ys) = padding.processing_region(width, height, rx, ry);
    let row_len = width as usize * channels;
    let mut output = vec![0u8; row_len * height as usize];

    fill_rows(&mut output, row_len, |y, row| {
        let y = y as u32;
        if !ys.contains(&y) {
            return;
        }

        for x in xs.clone() {
            for c in 0..channels {
                let mut sum = 0.0f32;
                for (dx, dy, weight) in kernel.taps() {
                    let sample =
                        padding.resolve(i64::from(x) + dx, i64::from(y) + dy, width, height);
                    // Zero contributes `weight * 0`, Skip contributes nothing
                    if let Sample::Pixel { x: sx, y: sy } = sample {
                        let index = (sy * width as usize + sx) * channels + c;
                        sum += f32::from(src[index]) * weight;
                    }
                }
                row[x as usize * channels + c] = round_f32_to_u8(sum);
            }
        }
    });

    output
}

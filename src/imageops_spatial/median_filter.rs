use crate::error::{Error, KernelError};
use crate::imageops_spatial::buffer::map_layout;
use crate::imageops_spatial::padding::{PaddingMode, Sample};
use crate::utils::{fill_rows, image_from_raw, validate_non_empty_image};
use crate::{Image, PixelBuffer};
use image::Pixel;
use itertools::iproduct;
use tracing::debug;

/// Order-statistic smoothing
pub trait MedianFilter: Sized {
    /// Replaces every subpixel with the median of its `kernel_size²` window
    ///
    /// Window samples follow `padding`: `Zero` contributes literal zeros and
    /// `None` omits out-of-range samples (and leaves the border at 0). For an
    /// even sample count the upper-middle element (index `count / 2`) wins.
    ///
    /// # Errors
    ///
    /// * `Error::Kernel` for an even or zero size
    /// * `Error::EmptyImage` if the image has no pixels
    fn median_filter(&self, kernel_size: u32, padding: PaddingMode) -> Result<Self, Error>;

    fn median_filter_mut(
        &mut self,
        kernel_size: u32,
        padding: PaddingMode,
    ) -> Result<&mut Self, Error> {
        *self = self.median_filter(kernel_size, padding)?;
        Ok(self)
    }
}

impl<P> MedianFilter for Image<P>
where
    P: Pixel<Subpixel = u8>,
{
    fn median_filter(&self, kernel_size: u32, padding: PaddingMode) -> Result<Self, Error> {
        if kernel_size == 0 {
            return Err(KernelError::ZeroSize.into());
        }
        if kernel_size % 2 == 0 {
            return Err(KernelError::EvenSize { size: kernel_size }.into());
        }
        let (width, height) = self.dimensions();
        validate_non_empty_image(width, height)?;
        debug!(width, height, kernel_size, %padding, "median_filter");

        let data = median_raw(
            self.as_raw(),
            width,
            height,
            usize::from(P::CHANNEL_COUNT),
            kernel_size / 2,
            padding,
        );
        image_from_raw(width, height, data)
    }
}

impl MedianFilter for PixelBuffer {
    fn median_filter(&self, kernel_size: u32, padding: PaddingMode) -> Result<Self, Error> {
        map_layout!(self, image => image.median_filter(kernel_size, padding))
    }
}

pub(crate) fn median_raw(
    src: &[u8],
    width: u32,
    height: u32,
    channels: usize,
    radius: u32,
    padding: PaddingMode,
) -> Vec<u8> {
    let (xs, ys) = padding.processing_region(width, height, radius, radius);
    let row_len = width as usize * channels;
    let mut output = vec![0u8; row_len * height as usize];
    let r = i64::from(radius);
    let window_len = (2 * radius as usize + 1).pow(2);

    fill_rows(&mut output, row_len, |y, row| {
        let y = y as u32;
        if !ys.contains(&y) {
            return;
        }

        let mut window = Vec::with_capacity(window_len);
        for x in xs.clone() {
            for c in 0..channels {
                window.clear();
                for (dy, dx) in iproduct!(-r..=r, -r..=r) {
                    match padding.resolve(i64::from(x) + dx, i64::from(y) + dy, width, height) {
                        Sample::Pixel { x: sx, y: sy } => {
                            window.push(src[(sy * width as usize + sx) * channels + c]);
                        }
                        Sample::Zero => window.push(0),
                        Sample::Skip => {}
                    }
                }

                let middle = window.len() / 2;
                row[x as usize * channels + c] = if window.is_empty() {
                    0
                } else {
                    *window.select_nth_unstable(middle).1
                };
            }
        }
    });

    output
}

use crate::error::Error;
use crate::imageops_spatial::convolution::Convolve;
use crate::imageops_spatial::kernel::Kernel;
use crate::imageops_spatial::padding::PaddingMode;

/// Gaussian smoothing through a normalized square kernel
pub trait GaussianFilter: Sized {
    /// Convolves with a `kernel_size x kernel_size` Gaussian of standard deviation `sigma`
    ///
    /// # Errors
    ///
    /// * `Error::Kernel` for an even or zero size, or a non-positive `sigma`
    /// * `Error::EmptyImage` if the image has no pixels
    fn gaussian_filter(
        &self,
        kernel_size: u32,
        sigma: f32,
        padding: PaddingMode,
    ) -> Result<Self, Error>;

    fn gaussian_filter_mut(
        &mut self,
        kernel_size: u32,
        sigma: f32,
        padding: PaddingMode,
    ) -> Result<&mut Self, Error> {
        *self = self.gaussian_filter(kernel_size, sigma, padding)?;
        Ok(self)
    }
}

impl<T> GaussianFilter for T
where
    T: Convolve,
{
    fn gaussian_filter(
        &self,
        kernel_size: u32,
        sigma: f32,
        padding: PaddingMode,
    ) -> Result<Self, Error> {
        let kernel = Kernel::gaussian(kernel_size, sigma)?;
        self.convolve(&kernel, padding)
    }
}

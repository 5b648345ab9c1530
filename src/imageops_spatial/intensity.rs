//! Point-wise intensity transforms.
//!
//! Each transform is tabulated once into a 256-entry lookup table and then
//! applied to every subpixel. Results are clamped to `[0, 255]` by
//! truncation.

use crate::error::Error;
use crate::imageops_spatial::buffer::map_layout;
use crate::utils::{image_from_raw, validate_non_empty_image};
use crate::{Image, PixelBuffer};
use image::Pixel;
use imageproc::definitions::Clamp;
use tracing::debug;

type Lut = [u8; 256];

pub trait IntensityTransform: Sized {
    /// `255 - v`
    fn negative(&self) -> Result<Self, Error>;

    /// `c * ln(1 + v)`
    ///
    /// # Errors
    ///
    /// * `Error::InvalidParameter` unless `c` is positive and finite
    fn log_transform(&self, c: f32) -> Result<Self, Error>;

    /// `c * (v / 255)^(1 / gamma) * 255`
    ///
    /// # Errors
    ///
    /// * `Error::InvalidParameter` unless `gamma` and `c` are positive and finite
    fn gamma_transform(&self, gamma: f32, c: f32) -> Result<Self, Error>;

    fn negative_mut(&mut self) -> Result<&mut Self, Error> {
        *self = self.negative()?;
        Ok(self)
    }

    fn log_transform_mut(&mut self, c: f32) -> Result<&mut Self, Error> {
        *self = self.log_transform(c)?;
        Ok(self)
    }

    fn gamma_transform_mut(&mut self, gamma: f32, c: f32) -> Result<&mut Self, Error> {
        *self = self.gamma_transform(gamma, c)?;
        Ok(self)
    }
}

impl<P> IntensityTransform for Image<P>
where
    P: Pixel<Subpixel = u8>,
{
    fn negative(&self) -> Result<Self, Error> {
        debug!("negative");
        apply_lut(self, &tabulate(|v| 255.0 - v))
    }

    fn log_transform(&self, c: f32) -> Result<Self, Error> {
        require_positive("c", c)?;
        debug!(c, "log_transform");
        apply_lut(self, &tabulate(|v| c * v.ln_1p()))
    }

    fn gamma_transform(&self, gamma: f32, c: f32) -> Result<Self, Error> {
        require_positive("gamma", gamma)?;
        require_positive("c", c)?;
        debug!(gamma, c, "gamma_transform");
        let exponent = gamma.recip();
        apply_lut(self, &tabulate(|v| c * (v / 255.0).powf(exponent) * 255.0))
    }
}

impl IntensityTransform for PixelBuffer {
    fn negative(&self) -> Result<Self, Error> {
        map_layout!(self, image => image.negative())
    }

    fn log_transform(&self, c: f32) -> Result<Self, Error> {
        map_layout!(self, image => image.log_transform(c))
    }

    fn gamma_transform(&self, gamma: f32, c: f32) -> Result<Self, Error> {
        map_layout!(self, image => image.gamma_transform(gamma, c))
    }
}

fn require_positive(name: &str, value: f32) -> Result<(), Error> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!(
            "{name} must be positive and finite, got {value}"
        )))
    }
}

fn tabulate<F>(f: F) -> Lut
where
    F: Fn(f32) -> f32,
{
    let mut lut = [0u8; 256];
    for (v, entry) in lut.iter_mut().enumerate() {
        *entry = <u8 as Clamp<f32>>::clamp(f(v as f32));
    }
    lut
}

fn apply_lut<P>(image: &Image<P>, lut: &Lut) -> Result<Image<P>, Error>
where
    P: Pixel<Subpixel = u8>,
{
    let (width, height) = image.dimensions();
    validate_non_empty_image(width, height)?;
    let data = image.as_raw().iter().map(|&v| lut[v as usize]).collect();
    image_from_raw(width, height, data)
}

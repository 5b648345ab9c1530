//! Channel-erased pixel buffer.
//!
//! Operators are implemented on typed `image` buffers; [`PixelBuffer`] lets a
//! caller that only knows the channel count at run time (a decoded bitmap,
//! a UI layer) hold either layout and call the same operators.

use crate::error::Error;
use crate::utils::validate_non_empty_image;
use image::{GrayImage, ImageBuffer, RgbImage};

/// 8-bit image with one (intensity / binary) or three (RGB) channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixelBuffer {
    Gray(GrayImage),
    Rgb(RgbImage),
}

/// Applies a fallible per-layout operation and rewraps the result.
macro_rules! map_layout {
    ($buffer:expr, $image:ident => $body:expr) => {
        match $buffer {
            $crate::PixelBuffer::Gray($image) => $body.map($crate::PixelBuffer::Gray),
            $crate::PixelBuffer::Rgb($image) => $body.map($crate::PixelBuffer::Rgb),
        }
    };
}
pub(crate) use map_layout;

impl PixelBuffer {
    /// Wraps raw row-major pixels
    ///
    /// # Errors
    ///
    /// * `Error::EmptyImage` for a zero width or height
    /// * `Error::InvalidChannelCount` unless `channels` is 1 or 3
    /// * `Error::BufferSizeMismatch` unless `pixels.len() == width * height * channels`
    pub fn from_raw(width: u32, height: u32, channels: u8, pixels: Vec<u8>) -> Result<Self, Error> {
        validate_non_empty_image(width, height)?;
        if channels != 1 && channels != 3 {
            return Err(Error::InvalidChannelCount(channels));
        }

        let expected = width as usize * height as usize * channels as usize;
        if pixels.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        let buffer = if channels == 1 {
            ImageBuffer::from_raw(width, height, pixels).map(Self::Gray)
        } else {
            ImageBuffer::from_raw(width, height, pixels).map(Self::Rgb)
        };
        buffer.ok_or(Error::ImageBufferCreationFailed)
    }

    pub fn width(&self) -> u32 {
        match self {
            Self::Gray(image) => image.width(),
            Self::Rgb(image) => image.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Self::Gray(image) => image.height(),
            Self::Rgb(image) => image.height(),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub const fn channels(&self) -> u8 {
        match self {
            Self::Gray(_) => 1,
            Self::Rgb(_) => 3,
        }
    }

    /// Row-major subpixels, RGB interleaved per pixel
    pub fn as_raw(&self) -> &[u8] {
        match self {
            Self::Gray(image) => image.as_raw(),
            Self::Rgb(image) => image.as_raw(),
        }
    }

    pub fn into_raw(self) -> Vec<u8> {
        match self {
            Self::Gray(image) => image.into_raw(),
            Self::Rgb(image) => image.into_raw(),
        }
    }

    pub fn as_gray(&self) -> Option<&GrayImage> {
        match self {
            Self::Gray(image) => Some(image),
            Self::Rgb(_) => None,
        }
    }

    pub fn as_rgb(&self) -> Option<&RgbImage> {
        match self {
            Self::Gray(_) => None,
            Self::Rgb(image) => Some(image),
        }
    }

    /// Borrows the single-channel image or reports which operation needed it
    pub(crate) fn require_gray(&self, operation: &'static str) -> Result<&GrayImage, Error> {
        match self {
            Self::Gray(image) => Ok(image),
            Self::Rgb(_) => {
                tracing::warn!(operation, channels = 3, "operation requires a single-channel buffer");
                Err(Error::UnsupportedChannels {
                    operation,
                    expected: 1,
                    actual: self.channels(),
                })
            }
        }
    }
}

impl From<GrayImage> for PixelBuffer {
    fn from(image: GrayImage) -> Self {
        Self::Gray(image)
    }
}

impl From<RgbImage> for PixelBuffer {
    fn from(image: RgbImage) -> Self {
        Self::Rgb(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_accepts_gray_and_rgb() {
        let gray = PixelBuffer::from_raw(2, 1, 1, vec![10, 20]).unwrap();
        assert_eq!(gray.channels(), 1);
        assert_eq!(gray.dimensions(), (2, 1));
        assert_eq!(gray.as_raw(), &[10, 20]);

        let rgb = PixelBuffer::from_raw(1, 2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(rgb.channels(), 3);
        assert_eq!(rgb.as_rgb().unwrap().get_pixel(0, 1).0, [4, 5, 6]);
        assert!(rgb.as_gray().is_none());
    }

    #[test]
    fn from_raw_enforces_the_length_invariant() {
        assert_eq!(
            PixelBuffer::from_raw(2, 2, 3, vec![0; 11]),
            Err(Error::BufferSizeMismatch {
                expected: 12,
                actual: 11
            })
        );
        assert_eq!(
            PixelBuffer::from_raw(2, 2, 4, vec![0; 16]),
            Err(Error::InvalidChannelCount(4))
        );
        assert_eq!(
            PixelBuffer::from_raw(0, 2, 1, Vec::new()),
            Err(Error::EmptyImage)
        );
    }

    #[test]
    fn require_gray_rejects_rgb() {
        let rgb = PixelBuffer::from_raw(1, 1, 3, vec![1, 2, 3]).unwrap();
        assert_eq!(
            rgb.require_gray("erosion"),
            Err(Error::UnsupportedChannels {
                operation: "erosion",
                expected: 1,
                actual: 3
            })
        );
    }

    #[test]
    fn into_raw_returns_the_pixels() {
        let buffer = PixelBuffer::from_raw(2, 1, 1, vec![7, 8]).unwrap();
        assert_eq!(buffer.into_raw(), vec![7, 8]);
    }
}

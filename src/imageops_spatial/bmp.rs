//! Uncompressed bitmap decoding and encoding through the `image` BMP codec.
//!
//! 8-bit files become single-channel buffers holding the raw palette indices
//! and 24-bit files become RGB buffers.

use crate::error::CodecError;
use crate::PixelBuffer;
use image::codecs::bmp::BmpDecoder;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, warn};

/// Offset of the little-endian bits-per-pixel field in the info header
const BIT_COUNT_OFFSET: usize = 28;
/// Offset of the little-endian compression field in the info header
const COMPRESSION_OFFSET: usize = 30;
/// Compression value of uncompressed pixel data
const BI_RGB: u32 = 0;

fn bit_count(bytes: &[u8]) -> Option<u16> {
    bytes
        .get(BIT_COUNT_OFFSET..BIT_COUNT_OFFSET + 2)
        .map(|field| u16::from_le_bytes([field[0], field[1]]))
}

fn compression(bytes: &[u8]) -> Option<u32> {
    bytes
        .get(COMPRESSION_OFFSET..COMPRESSION_OFFSET + 4)
        .map(|field| u32::from_le_bytes([field[0], field[1], field[2], field[3]]))
}

impl PixelBuffer {
    /// Decodes a bitmap held in memory
    ///
    /// # Errors
    ///
    /// * `CodecError::Image` if the bytes are not a bitmap the codec accepts
    /// * `CodecError::UnsupportedLayout` for pixel layouts other than 8-bit
    ///   gray, 24-bit RGB or 32-bit RGBA (whose alpha is dropped)
    pub fn from_bmp_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let bits = bit_count(bytes);

        // palette indices are the gray levels, the palette itself is ignored
        if bits == Some(8) && compression(bytes) == Some(BI_RGB) {
            let mut decoder = BmpDecoder::new(Cursor::new(bytes))?;
            decoder.set_indexed_color(true);
            let indexed = DynamicImage::from_decoder(decoder)?;
            debug!(
                width = indexed.width(),
                height = indexed.height(),
                bits,
                "decoded indexed bitmap"
            );
            return Ok(Self::Gray(indexed.into_luma8()));
        }

        let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Bmp)?;
        debug!(
            width = decoded.width(),
            height = decoded.height(),
            bits,
            "decoded bitmap"
        );

        // the codec expands run-length encoded palettes to RGB
        if bits == Some(8) {
            warn!("compressed 8-bit bitmap, palette colors are reduced to luma");
            return Ok(Self::Gray(decoded.into_luma8()));
        }

        match decoded {
            DynamicImage::ImageLuma8(image) => Ok(Self::Gray(image)),
            DynamicImage::ImageRgb8(image) => Ok(Self::Rgb(image)),
            DynamicImage::ImageRgba8(image) => {
                warn!("dropping the alpha channel of a 32-bit bitmap");
                Ok(Self::Rgb(DynamicImage::ImageRgba8(image).to_rgb8()))
            }
            other => Err(CodecError::UnsupportedLayout(format!(
                "{:?}",
                other.color()
            ))),
        }
    }

    /// Encodes the buffer as an uncompressed bitmap
    ///
    /// Single-channel buffers are written as 8-bit grayscale, RGB buffers as
    /// 24-bit.
    pub fn to_bmp_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut bytes = Vec::new();
        let mut cursor = Cursor::new(&mut bytes);
        match self {
            Self::Gray(image) => image.write_to(&mut cursor, ImageFormat::Bmp)?,
            Self::Rgb(image) => image.write_to(&mut cursor, ImageFormat::Bmp)?,
        }
        Ok(bytes)
    }

    /// Reads and decodes a bitmap file
    pub fn open<Q: AsRef<Path>>(path: Q) -> Result<Self, CodecError> {
        let bytes = std::fs::read(path.as_ref())?;
        debug!(path = %path.as_ref().display(), len = bytes.len(), "read bitmap");
        Self::from_bmp_bytes(&bytes)
    }

    /// Encodes and writes a bitmap file
    pub fn save<Q: AsRef<Path>>(&self, path: Q) -> Result<(), CodecError> {
        let bytes = self.to_bmp_bytes()?;
        std::fs::write(path.as_ref(), bytes)?;
        debug!(path = %path.as_ref().display(), "wrote bitmap");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray_buffers_survive_encoding() {
        let buffer = PixelBuffer::from_raw(3, 2, 1, vec![0, 64, 128, 192, 255, 7]).unwrap();
        let bytes = buffer.to_bmp_bytes().unwrap();
        assert_eq!(&bytes[..2], b"BM");
        assert_eq!(bit_count(&bytes), Some(8));
        assert_eq!(PixelBuffer::from_bmp_bytes(&bytes).unwrap(), buffer);
    }

    /// Uncompressed 8-bit bitmap, one row, with a caller-supplied palette
    fn indexed_bitmap(indices: &[u8], palette: impl Fn(u8) -> [u8; 3]) -> Vec<u8> {
        let width = indices.len() as u32;
        let stride = (width + 3) / 4 * 4;
        let data_offset: u32 = 14 + 40 + 256 * 4;
        let file_size = data_offset + stride;

        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"BM");
        bytes.extend_from_slice(&file_size.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&data_offset.to_le_bytes());

        bytes.extend_from_slice(&40u32.to_le_bytes());
        bytes.extend_from_slice(&(width as i32).to_le_bytes());
        bytes.extend_from_slice(&1i32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&8u16.to_le_bytes());
        bytes.extend_from_slice(&BI_RGB.to_le_bytes());
        bytes.extend_from_slice(&stride.to_le_bytes());
        bytes.extend_from_slice(&2835i32.to_le_bytes());
        bytes.extend_from_slice(&2835i32.to_le_bytes());
        bytes.extend_from_slice(&256u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());

        for i in 0..=255u8 {
            let [r, g, b] = palette(i);
            bytes.extend_from_slice(&[b, g, r, 0]);
        }
        bytes.extend_from_slice(indices);
        bytes.resize((data_offset + stride) as usize, 0);
        bytes
    }

    #[test]
    fn eight_bit_bitmaps_keep_palette_indices() {
        // a red ramp palette would give a luma of 76 for index 0
        let bytes = indexed_bitmap(&[0, 1, 200], |i| [255 - i, 0, 0]);
        assert_eq!(bit_count(&bytes), Some(8));
        assert_eq!(compression(&bytes), Some(BI_RGB));

        let buffer = PixelBuffer::from_bmp_bytes(&bytes).unwrap();
        assert_eq!(buffer, PixelBuffer::from_raw(3, 1, 1, vec![0, 1, 200]).unwrap());
    }

    #[test]
    fn rgb_buffers_survive_encoding() {
        let pixels: Vec<u8> = (0..5 * 3 * 3).map(|i| (i * 5) as u8).collect();
        let buffer = PixelBuffer::from_raw(5, 3, 3, pixels).unwrap();
        let bytes = buffer.to_bmp_bytes().unwrap();
        assert_eq!(bit_count(&bytes), Some(24));
        assert_eq!(PixelBuffer::from_bmp_bytes(&bytes).unwrap(), buffer);
    }

    #[test]
    fn garbage_is_a_codec_error() {
        assert!(matches!(
            PixelBuffer::from_bmp_bytes(b"not a bitmap"),
            Err(CodecError::Image(_))
        ));
    }

    #[test]
    fn missing_files_are_io_errors() {
        let path = std::env::temp_dir().join("imageops-spatial-does-not-exist.bmp");
        assert!(matches!(PixelBuffer::open(path), Err(CodecError::Io(_))));
    }

    #[test]
    fn save_then_open() {
        let path = std::env::temp_dir().join(format!(
            "imageops-spatial-save-{}.bmp",
            std::process::id()
        ));
        let buffer = PixelBuffer::from_raw(2, 2, 1, vec![1, 2, 3, 4]).unwrap();
        buffer.save(&path).unwrap();
        let reopened = PixelBuffer::open(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(reopened, buffer);
    }
}

use thiserror::Error;

/// Error type for kernel construction
///
/// Kernels are always odd-sized so that every weight can be addressed by a
/// signed offset from the center cell.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KernelError {
    /// Kernel size is even
    #[error("Kernel size must be odd, got {size}")]
    EvenSize { size: u32 },

    /// Kernel size is zero
    #[error("Kernel size must be at least 1")]
    ZeroSize,

    /// Gaussian sigma is not a positive finite number
    #[error("Gaussian sigma must be positive and finite, got {0}")]
    InvalidSigma(f32),

    /// Weight data does not cover `width * height` cells
    #[error("Kernel data length mismatch: expected {expected}, got {actual}")]
    DataLengthMismatch { expected: usize, actual: usize },

    /// Structuring element smaller than 3x3
    #[error("Structuring element size must be greater than 1, got {size}")]
    ElementTooSmall { size: u32 },

    /// Structuring element mask without a single set cell
    #[error("Structuring element mask must set at least one cell")]
    EmptyElement,
}

/// Error type for neighborhood operations
///
/// Every operator either returns a complete new buffer or one of these
/// errors; the input buffer is never left partially updated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The image has a zero width or height
    #[error("Image dimensions must be non-zero")]
    EmptyImage,

    /// The operator does not support the buffer's channel count
    ///
    /// Thresholding and morphology only accept single-channel buffers.
    #[error("{operation} requires {expected} channel(s), got {actual}")]
    UnsupportedChannels {
        /// Name of the rejected operation
        operation: &'static str,
        /// Channel count the operation accepts
        expected: u8,
        /// Channel count of the buffer
        actual: u8,
    },

    /// Channel count outside of {1, 3}
    #[error("Unsupported channel count: {0}")]
    InvalidChannelCount(u8),

    /// Raw pixel data does not match `width * height * channels`
    #[error("Pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Failed to create an ImageBuffer from processed pixels
    #[error("Failed to create ImageBuffer from processed pixels")]
    ImageBufferCreationFailed,

    /// Invalid parameter provided to the operation
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Kernel construction failed
    #[error(transparent)]
    Kernel(#[from] KernelError),
}

/// Error type for parsing caller-supplied operator names
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseMethodError {
    #[error("Unknown padding mode '{0}'")]
    UnknownPaddingMode(String),

    #[error("Unknown blur kernel type '{0}'")]
    UnknownBlurKernel(String),

    #[error("Unknown sharpening method '{0}'")]
    UnknownSharpeningMethod(String),

    #[error("Unknown structuring element shape '{0}'")]
    UnknownShape(String),
}

/// Error type for bitmap encoding and decoding
#[cfg(feature = "bmp")]
#[derive(Debug, Error)]
pub enum CodecError {
    /// Reading or writing the file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The bitmap codec rejected the data
    #[error("Bitmap codec error: {0}")]
    Image(#[from] image::ImageError),

    /// The bitmap decoded to a layout this crate does not handle
    #[error("Unsupported bitmap layout: {0}")]
    UnsupportedLayout(String),

    /// The decoded pixels do not form a valid buffer
    #[error(transparent)]
    Buffer(#[from] Error),
}

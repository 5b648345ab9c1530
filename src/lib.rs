mod error;
mod imageops_spatial;
mod utils;

#[cfg(test)]
mod test_utils;

use image::{ImageBuffer, Pixel};

#[cfg(feature = "bmp")]
pub use error::CodecError;
pub use error::{Error, KernelError, ParseMethodError};
pub use imageops_spatial::box_filter::BoxFilter;
pub use imageops_spatial::buffer::PixelBuffer;
pub use imageops_spatial::convert_color::rgb_to_gray;
pub use imageops_spatial::convolution::Convolve;
pub use imageops_spatial::edge::EdgeFilter;
pub use imageops_spatial::gaussian_filter::GaussianFilter;
pub use imageops_spatial::intensity::IntensityTransform;
pub use imageops_spatial::kernel::{Kernel, Laplacian};
pub use imageops_spatial::median_filter::MedianFilter;
pub use imageops_spatial::morphology::Morphology;
pub use imageops_spatial::padding::{Padding, PaddingMode, Sample};
pub use imageops_spatial::sharpen::{BlurKernel, Sharpen, SharpeningMethod};
pub use imageops_spatial::structuring_element::{Shape, StructuringElement};
pub use imageops_spatial::summed_area_table::{CreateSummedAreaTable, SummedAreaTable};
pub use imageops_spatial::threshold::{histogram, otsu_level, Threshold};

pub type Image<P> = ImageBuffer<P, Vec<<P as Pixel>::Subpixel>>;

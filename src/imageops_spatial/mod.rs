pub mod box_filter;
pub mod buffer;
pub mod convert_color;
pub mod convolution;
pub mod edge;
pub mod gaussian_filter;
pub mod intensity;
pub mod kernel;
pub mod median_filter;
pub mod morphology;
pub mod padding;
pub mod sharpen;
pub mod structuring_element;
pub mod summed_area_table;
pub mod threshold;

#[cfg(feature = "bmp")]
pub mod bmp;

//! Real-valued convolution kernels.

use crate::error::KernelError;
use itertools::iproduct;

/// An owned, odd-sized 2D kernel of `f32` weights in row-major order
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    data: Vec<f32>,
    width: u32,
    height: u32,
}

/// Laplacian neighborhood variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Laplacian {
    /// 4-neighbor kernel `[0,-1,0; -1,4,-1; 0,-1,0]`
    Basic,
    /// 8-neighbor kernel `[-1,-1,-1; -1,8,-1; -1,-1,-1]`
    Full,
}

const LAPLACIAN_BASIC_3X3: [f32; 9] = [0.0, -1.0, 0.0, -1.0, 4.0, -1.0, 0.0, -1.0, 0.0];
const LAPLACIAN_FULL_3X3: [f32; 9] = [-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0];
const SOBEL_X_3X3: [f32; 9] = [-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0];
const SOBEL_Y_3X3: [f32; 9] = [-1.0, -2.0, -1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0];

fn validate_size(size: u32) -> Result<(), KernelError> {
    if size == 0 {
        Err(KernelError::ZeroSize)
    } else if size % 2 == 0 {
        Err(KernelError::EvenSize { size })
    } else {
        Ok(())
    }
}

impl Kernel {
    /// Construct a kernel from row-major weights
    ///
    /// # Errors
    ///
    /// * `KernelError::ZeroSize` / `KernelError::EvenSize` if either side is not odd
    /// * `KernelError::DataLengthMismatch` if `data.len() != width * height`
    pub fn new(data: Vec<f32>, width: u32, height: u32) -> Result<Self, KernelError> {
        validate_size(width)?;
        validate_size(height)?;
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(KernelError::DataLengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Square averaging kernel, every weight `1 / size²`
    pub fn box_filter(size: u32) -> Result<Self, KernelError> {
        validate_size(size)?;
        let count = size as usize * size as usize;
        Ok(Self {
            data: vec![1.0 / count as f32; count],
            width: size,
            height: size,
        })
    }

    /// Square Gaussian kernel normalized to sum 1
    ///
    /// Cell `(x, y)` relative to the center weighs `exp(-(x² + y²) / (2σ²))`
    /// before normalization.
    pub fn gaussian(size: u32, sigma: f32) -> Result<Self, KernelError> {
        validate_size(size)?;
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(KernelError::InvalidSigma(sigma));
        }

        let r = i64::from(size / 2);
        let denominator = 2.0 * sigma * sigma;
        // σ so small that 2σ² underflows leaves no usable weights
        if denominator == 0.0 || !denominator.is_finite() {
            return Err(KernelError::InvalidSigma(sigma));
        }
        let mut data: Vec<f32> = iproduct!(-r..=r, -r..=r)
            .map(|(dy, dx)| (-((dx * dx + dy * dy) as f32) / denominator).exp())
            .collect();
        let sum: f32 = data.iter().sum();
        if !(sum.is_finite() && sum > 0.0) {
            return Err(KernelError::InvalidSigma(sigma));
        }
        data.iter_mut().for_each(|w| *w /= sum);

        Ok(Self {
            data,
            width: size,
            height: size,
        })
    }

    /// 3x3 Laplacian, optionally with every weight negated
    pub fn laplacian(kind: Laplacian, inverted: bool) -> Self {
        let weights = match kind {
            Laplacian::Basic => LAPLACIAN_BASIC_3X3,
            Laplacian::Full => LAPLACIAN_FULL_3X3,
        };
        let kernel = Self::from_3x3(weights);
        if inverted {
            kernel.inverted()
        } else {
            kernel
        }
    }

    /// Horizontal-gradient Sobel kernel
    pub fn sobel_x() -> Self {
        Self::from_3x3(SOBEL_X_3X3)
    }

    /// Vertical-gradient Sobel kernel
    pub fn sobel_y() -> Self {
        Self::from_3x3(SOBEL_Y_3X3)
    }

    fn from_3x3(weights: [f32; 9]) -> Self {
        Self {
            data: weights.to_vec(),
            width: 3,
            height: 3,
        }
    }

    /// Copy of this kernel with every weight negated
    #[must_use]
    pub fn inverted(&self) -> Self {
        Self {
            data: self.data.iter().map(|w| -w).collect(),
            width: self.width,
            height: self.height,
        }
    }

    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Horizontal and vertical radius `(⌊w/2⌋, ⌊h/2⌋)`
    #[inline]
    pub const fn radius(&self) -> (u32, u32) {
        (self.width / 2, self.height / 2)
    }

    pub fn weights(&self) -> &[f32] {
        &self.data
    }

    /// Weight at signed offset `(dx, dy)` from the center
    ///
    /// # Panics
    ///
    /// If the offset lies outside the kernel.
    #[inline]
    pub fn at(&self, dx: i64, dy: i64) -> f32 {
        let (rx, ry) = self.radius();
        let col = (dx + i64::from(rx)) as usize;
        let row = (dy + i64::from(ry)) as usize;
        self.data[row * self.width as usize + col]
    }

    /// Iterates `(dx, dy, weight)` over every cell, row by row
    pub fn taps(&self) -> impl Iterator<Item = (i64, i64, f32)> + '_ {
        let (rx, ry) = self.radius();
        let (rx, ry) = (i64::from(rx), i64::from(ry));
        iproduct!(-ry..=ry, -rx..=rx).map(move |(dy, dx)| (dx, dy, self.at(dx, dy)))
    }
}

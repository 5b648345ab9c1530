//! Structuring elements for binary morphology
//!
//! A structuring element is a square boolean mask whose set cells form the
//! footprint tested by erosion and dilation.

use crate::error::{KernelError, ParseMethodError};
use itertools::iproduct;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Footprint shape of a structuring element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Shape {
    /// Every cell set
    #[default]
    Square,
    /// Center row and center column
    Cross,
    /// Cells within Euclidean distance `size / 2` of the center
    Circle,
    /// Center row only
    LineHorizontal,
    /// Center column only
    LineVertical,
}

impl Shape {
    pub const ALL: [Self; 5] = [
        Self::Square,
        Self::Cross,
        Self::Circle,
        Self::LineHorizontal,
        Self::LineVertical,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Cross => "cross",
            Self::Circle => "circle",
            Self::LineHorizontal => "line_horizontal",
            Self::LineVertical => "line_vertical",
        }
    }

    /// Lenient lookup: unknown names fall back to [`Shape::Square`] with a warning
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            warn!(shape = name, "unknown structuring element shape, using square");
            Self::Square
        })
    }

    fn contains(self, dx: i64, dy: i64, size: u32) -> bool {
        match self {
            Self::Square => true,
            Self::Cross => dx == 0 || dy == 0,
            Self::Circle => {
                let radius = size as f32 / 2.0;
                ((dx * dx + dy * dy) as f32) <= radius * radius
            }
            Self::LineHorizontal => dy == 0,
            Self::LineVertical => dx == 0,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Shape {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|shape| shape.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseMethodError::UnknownShape(s.to_owned()))
    }
}

/// Immutable `size x size` binary mask, odd `size > 1`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuringElement {
    mask: Vec<bool>,
    size: u32,
}

impl StructuringElement {
    /// Size substituted for invalid requests
    pub const DEFAULT_SIZE: u32 = 3;

    /// Synthesizes an element of the given shape
    ///
    /// An even size or a size of at most 1 is replaced by
    /// [`Self::DEFAULT_SIZE`] and reported as a warning.
    pub fn new(shape: Shape, size: u32) -> Self {
        let size = if size % 2 == 0 || size <= 1 {
            warn!(
                size,
                default = Self::DEFAULT_SIZE,
                "structuring element size must be odd and > 1, using default"
            );
            Self::DEFAULT_SIZE
        } else {
            size
        };

        let r = i64::from(size / 2);
        let mask = iproduct!(-r..=r, -r..=r)
            .map(|(dy, dx)| shape.contains(dx, dy, size))
            .collect();
        Self { mask, size }
    }

    /// Synthesizes an element from a shape name, see [`Shape::from_name`]
    pub fn from_name(name: &str, size: u32) -> Self {
        Self::new(Shape::from_name(name), size)
    }

    /// Custom element from a row-major mask
    ///
    /// Unlike [`Self::new`] nothing is corrected: the size must be odd and
    /// greater than 1, and at least one cell must be set.
    pub fn from_mask(mask: Vec<bool>, size: u32) -> Result<Self, KernelError> {
        if size == 0 {
            return Err(KernelError::ZeroSize);
        }
        if size % 2 == 0 {
            return Err(KernelError::EvenSize { size });
        }
        if size == 1 {
            return Err(KernelError::ElementTooSmall { size });
        }
        let expected = size as usize * size as usize;
        if mask.len() != expected {
            return Err(KernelError::DataLengthMismatch {
                expected,
                actual: mask.len(),
            });
        }
        if !mask.contains(&true) {
            return Err(KernelError::EmptyElement);
        }
        Ok(Self { mask, size })
    }

    #[inline]
    pub const fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    pub const fn radius(&self) -> u32 {
        self.size / 2
    }

    /// Whether the cell at signed offset `(dx, dy)` from the center is set
    pub fn contains(&self, dx: i64, dy: i64) -> bool {
        let r = i64::from(self.radius());
        if dx.abs() > r || dy.abs() > r {
            return false;
        }
        let row = (dy + r) as usize;
        let col = (dx + r) as usize;
        self.mask[row * self.size as usize + col]
    }

    /// Offsets `(dx, dy)` of every set cell
    pub fn footprint(&self) -> Vec<(i64, i64)> {
        let r = i64::from(self.radius());
        iproduct!(-r..=r, -r..=r)
            .filter(|&(dy, dx)| self.contains(dx, dy))
            .map(|(dy, dx)| (dx, dy))
            .collect()
    }
}

impl Default for StructuringElement {
    fn default() -> Self {
        Self::new(Shape::Square, Self::DEFAULT_SIZE)
    }
}

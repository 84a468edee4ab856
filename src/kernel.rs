//! Convolution kernels and the fixed filter catalog.

use crate::{BmpError, BmpResult};
use core::{fmt, str::FromStr};

/// An odd-sized square matrix of weights, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
  size: usize,
  weights: Vec<f32>,
}
impl Kernel {
  /// ## Failure
  /// * `size` must be odd (and so, non-zero).
  /// * There must be exactly `size * size` weights.
  #[inline]
  pub fn new(size: usize, weights: Vec<f32>) -> BmpResult<Self> {
    if size % 2 == 0 {
      return Err(BmpError::InvalidParameter(format!("kernel size must be odd, got {size}")));
    }
    if Some(weights.len()) != size.checked_mul(size) {
      return Err(BmpError::InvalidParameter(format!(
        "a {size}x{size} kernel needs {} weights, got {}",
        size.saturating_mul(size),
        weights.len()
      )));
    }
    Ok(Self { size, weights })
  }

  /// A 3x3 kernel from nested rows.
  #[inline]
  #[must_use]
  pub fn from_3x3(rows: &[[f32; 3]; 3]) -> Self {
    Self { size: 3, weights: rows.iter().flatten().copied().collect() }
  }

  /// `[[0,0,0],[0,1,0],[0,0,0]]` (or the bigger odd equivalent)
  #[inline]
  pub fn identity(size: usize) -> BmpResult<Self> {
    let mut weights = vec![0.0; size.saturating_mul(size)];
    if let Some(center) = weights.get_mut((size * size) / 2) {
      *center = 1.0;
    }
    Self::new(size, weights)
  }

  /// Side length.
  #[inline]
  #[must_use]
  pub const fn size(&self) -> usize {
    self.size
  }

  /// How far the kernel reaches from its center, `size / 2`.
  #[inline]
  #[must_use]
  pub const fn radius(&self) -> usize {
    self.size / 2
  }

  /// The weight at row `i`, column `j`.
  #[inline]
  #[must_use]
  pub fn get(&self, i: usize, j: usize) -> Option<f32> {
    if i < self.size && j < self.size {
      self.weights.get(i * self.size + j).copied()
    } else {
      None
    }
  }

  /// All weights, row-major.
  #[inline]
  #[must_use]
  pub fn weights(&self) -> &[f32] {
    &self.weights
  }
}

pub const BOX_BLUR: [[f32; 3]; 3] = [[1.0 / 9.0; 3]; 3];

#[rustfmt::skip]
pub const GAUSSIAN_BLUR: [[f32; 3]; 3] = [
  [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
  [2.0 / 16.0, 4.0 / 16.0, 2.0 / 16.0],
  [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
];

#[rustfmt::skip]
pub const OUTLINE: [[f32; 3]; 3] = [
  [-1.0, -1.0, -1.0],
  [-1.0,  8.0, -1.0],
  [-1.0, -1.0, -1.0],
];

#[rustfmt::skip]
pub const EMBOSS: [[f32; 3]; 3] = [
  [-2.0, -1.0, 0.0],
  [-1.0,  1.0, 1.0],
  [ 0.0,  1.0, 2.0],
];

#[rustfmt::skip]
pub const SHARPEN: [[f32; 3]; 3] = [
  [ 0.0, -1.0,  0.0],
  [-1.0,  5.0, -1.0],
  [ 0.0, -1.0,  0.0],
];

/// The cataloged neighborhood filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NamedFilter {
  BoxBlur,
  GaussianBlur,
  Outline,
  Emboss,
  Sharpen,
}
impl NamedFilter {
  pub const ALL: [Self; 5] =
    [Self::BoxBlur, Self::GaussianBlur, Self::Outline, Self::Emboss, Self::Sharpen];

  #[inline]
  #[must_use]
  pub const fn weights(self) -> &'static [[f32; 3]; 3] {
    match self {
      Self::BoxBlur => &BOX_BLUR,
      Self::GaussianBlur => &GAUSSIAN_BLUR,
      Self::Outline => &OUTLINE,
      Self::Emboss => &EMBOSS,
      Self::Sharpen => &SHARPEN,
    }
  }

  #[inline]
  #[must_use]
  pub fn kernel(self) -> Kernel {
    Kernel::from_3x3(self.weights())
  }

  /// The name used on the command line.
  #[inline]
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::BoxBlur => "box-blur",
      Self::GaussianBlur => "gaussian-blur",
      Self::Outline => "outline",
      Self::Emboss => "emboss",
      Self::Sharpen => "sharpen",
    }
  }
}
impl fmt::Display for NamedFilter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}
impl FromStr for NamedFilter {
  type Err = BmpError;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|f| f.name().eq_ignore_ascii_case(s))
      .ok_or_else(|| BmpError::InvalidParameter(format!("unknown filter `{s}`")))
  }
}

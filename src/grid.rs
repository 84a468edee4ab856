#![forbid(unsafe_code)]

//! Provides the owned 2D pixel container used by every image type.

use crate::{BmpError, BmpResult};
use std::{
  ops::{Index, IndexMut},
  slice::{ChunksExact, ChunksExactMut},
};

/// Converts an `(x,y)` position within a given `width` 2D space into a linear
/// index.
#[inline]
#[must_use]
pub const fn xy_width_to_index(x: u32, y: u32, width: u32) -> usize {
  (y as usize) * (width as usize) + (x as usize)
}

/// A rectangular, row-major buffer of pixels.
///
/// Row 0 is the visual top of the image. Both dimensions are non-zero and
/// can't be changed after construction, so the pixel count always equals
/// `width * height`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid<P> {
  width: u32,
  height: u32,
  pixels: Vec<P>,
}
impl<P: Clone> Grid<P> {
  /// Allocates a grid with every pixel set to `fill`.
  ///
  /// ## Failure
  /// * [`BmpError::IllegalDimensions`] if either dimension is zero.
  /// * If the allocator can't provide the space, nothing is kept and
  ///   [`BmpError::Alloc`] is returned.
  #[inline]
  pub fn try_new(width: u32, height: u32, fill: P) -> BmpResult<Self> {
    let count = pixel_count(width, height)?;
    let mut pixels = Vec::new();
    pixels.try_reserve_exact(count)?;
    pixels.resize(count, fill);
    Ok(Self { width, height, pixels })
  }
}
impl<P> Grid<P> {
  /// Wraps an existing buffer.
  ///
  /// ## Failure
  /// * [`BmpError::IllegalDimensions`] if either dimension is zero.
  /// * The buffer length must be exactly `width * height`.
  #[inline]
  pub fn from_vec(width: u32, height: u32, pixels: Vec<P>) -> BmpResult<Self> {
    let count = pixel_count(width, height)?;
    if pixels.len() != count {
      return Err(BmpError::InvalidParameter(format!(
        "a {width}x{height} grid needs {count} pixels, got {}",
        pixels.len()
      )));
    }
    Ok(Self { width, height, pixels })
  }

  #[inline]
  #[must_use]
  pub const fn width(&self) -> u32 {
    self.width
  }

  #[inline]
  #[must_use]
  pub const fn height(&self) -> u32 {
    self.height
  }

  /// Gets the pixel at column `x` of row `y`, or `None` if the position is out
  /// of bounds.
  #[inline]
  #[must_use]
  pub fn get(&self, x: u32, y: u32) -> Option<&P> {
    if x < self.width && y < self.height {
      self.pixels.get(xy_width_to_index(x, y, self.width))
    } else {
      None
    }
  }

  /// Gets the pixel at column `x` of row `y`, or `None` if the position is out
  /// of bounds.
  #[inline]
  #[must_use]
  pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut P> {
    if x < self.width && y < self.height {
      self.pixels.get_mut(xy_width_to_index(x, y, self.width))
    } else {
      None
    }
  }

  /// A single row, top row first.
  #[inline]
  #[must_use]
  pub fn row(&self, y: u32) -> Option<&[P]> {
    if y < self.height {
      let start = xy_width_to_index(0, y, self.width);
      self.pixels.get(start..start + self.width as usize)
    } else {
      None
    }
  }

  /// Iterates the rows from top to bottom.
  #[inline]
  pub fn rows(&self) -> ChunksExact<'_, P> {
    self.pixels.chunks_exact(self.width as usize)
  }

  /// Iterates the rows from top to bottom.
  #[inline]
  pub fn rows_mut(&mut self) -> ChunksExactMut<'_, P> {
    self.pixels.chunks_exact_mut(self.width as usize)
  }

  #[inline]
  #[must_use]
  pub fn pixels(&self) -> &[P] {
    &self.pixels
  }

  #[inline]
  #[must_use]
  pub fn pixels_mut(&mut self) -> &mut [P] {
    &mut self.pixels
  }

  /// Builds a same-sized grid by running `op` on every pixel.
  ///
  /// The output is allocated up front, so a failed allocation doesn't leave a
  /// partial grid behind.
  #[inline]
  pub fn try_map<Q>(&self, op: impl FnMut(&P) -> Q) -> BmpResult<Grid<Q>> {
    let mut pixels = Vec::new();
    pixels.try_reserve_exact(self.pixels.len())?;
    pixels.extend(self.pixels.iter().map(op));
    Ok(Grid { width: self.width, height: self.height, pixels })
  }
}
impl<P> Index<(u32, u32)> for Grid<P> {
  type Output = P;
  /// Indexes by `(x, y)`.
  ///
  /// ## Panics
  /// * If the position is out of bounds.
  #[inline]
  #[track_caller]
  fn index(&self, (x, y): (u32, u32)) -> &P {
    match self.get(x, y) {
      Some(p) => p,
      None => panic!("position ({x},{y}) is outside of a {}x{} grid", self.width, self.height),
    }
  }
}
impl<P> IndexMut<(u32, u32)> for Grid<P> {
  #[inline]
  #[track_caller]
  fn index_mut(&mut self, (x, y): (u32, u32)) -> &mut P {
    let (w, h) = (self.width, self.height);
    match self.get_mut(x, y) {
      Some(p) => p,
      None => panic!("position ({x},{y}) is outside of a {w}x{h} grid"),
    }
  }
}

/// Both dimensions must be non-zero.
fn pixel_count(width: u32, height: u32) -> BmpResult<usize> {
  if width == 0 || height == 0 {
    return Err(BmpError::IllegalDimensions {
      width: i32::try_from(width).unwrap_or(i32::MAX),
      height: i32::try_from(height).unwrap_or(i32::MAX),
    });
  }
  usize::try_from(width)
    .ok()
    .zip(usize::try_from(height).ok())
    .and_then(|(w, h)| w.checked_mul(h))
    .ok_or(BmpError::Alloc)
}

#![forbid(unsafe_code)]

//! Provides the owned image types.

use crate::{
  bmp::{row_stride, DEFAULT_PIXELS_PER_METER, PALETTE_LEN},
  grid::Grid,
  BmpError, BmpResult,
};
use core::fmt;
use pixel_formats::{r8g8b8_Srgb, r8g8b8a8_Srgb};

/// Header values that don't follow from the pixel grid, carried through a
/// decode/encode cycle unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageMetadata {
  /// horizontal pixels per meter
  pub h_ppm: i32,

  /// vertical pixels per meter
  pub v_ppm: i32,

  /// Color table entries in use, as declared by the header.
  pub colors_used: u32,

  /// "Important" color count, as declared by the header.
  pub important_colors: u32,
}
impl ImageMetadata {
  /// The values written for a fresh image of the given depth.
  #[inline]
  #[must_use]
  pub const fn new_for_depth(bits_per_pixel: u16) -> Self {
    Self {
      h_ppm: DEFAULT_PIXELS_PER_METER,
      v_ppm: DEFAULT_PIXELS_PER_METER,
      colors_used: if bits_per_pixel == 8 { PALETTE_LEN as u32 } else { 0 },
      important_colors: 0,
    }
  }
}

/// An 8-bit indexed-color image.
///
/// The palette always has exactly 256 entries. The alpha slot of each entry
/// holds the on-disk reserved byte.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedImage {
  pub(crate) grid: Grid<u8>,
  pub(crate) palette: Vec<r8g8b8a8_Srgb>,
  pub metadata: ImageMetadata,
}
impl IndexedImage {
  /// Makes an image with the linear gray palette (index `i` is gray level
  /// `i`).
  #[inline]
  pub fn new_grayscale(grid: Grid<u8>) -> BmpResult<Self> {
    let mut palette = Vec::new();
    palette.try_reserve_exact(PALETTE_LEN)?;
    palette.extend((0..=255_u8).map(|i| r8g8b8a8_Srgb { r: i, g: i, b: i, a: 0 }));
    Ok(Self { grid, palette, metadata: ImageMetadata::new_for_depth(8) })
  }

  /// Makes an image from a grid and a palette.
  ///
  /// ## Failure
  /// * The palette must have exactly 256 entries.
  #[inline]
  pub fn from_parts(grid: Grid<u8>, palette: Vec<r8g8b8a8_Srgb>) -> BmpResult<Self> {
    if palette.len() != PALETTE_LEN {
      return Err(BmpError::InvalidParameter(format!(
        "an 8-bit palette needs {PALETTE_LEN} entries, got {}",
        palette.len()
      )));
    }
    Ok(Self { grid, palette, metadata: ImageMetadata::new_for_depth(8) })
  }

  #[inline]
  #[must_use]
  pub fn grid(&self) -> &Grid<u8> {
    &self.grid
  }

  #[inline]
  #[must_use]
  pub fn grid_mut(&mut self) -> &mut Grid<u8> {
    &mut self.grid
  }

  #[inline]
  #[must_use]
  pub fn palette(&self) -> &[r8g8b8a8_Srgb] {
    &self.palette
  }

  /// The palette length can't change.
  #[inline]
  #[must_use]
  pub fn palette_mut(&mut self) -> &mut [r8g8b8a8_Srgb] {
    &mut self.palette
  }

  #[inline]
  #[must_use]
  pub const fn width(&self) -> u32 {
    self.grid.width()
  }

  #[inline]
  #[must_use]
  pub const fn height(&self) -> u32 {
    self.grid.height()
  }
}

/// A 24-bit direct-color image.
#[derive(Debug, Clone, PartialEq)]
pub struct TruecolorImage {
  pub(crate) grid: Grid<r8g8b8_Srgb>,
  pub metadata: ImageMetadata,
}
impl TruecolorImage {
  #[inline]
  #[must_use]
  pub const fn new(grid: Grid<r8g8b8_Srgb>) -> Self {
    Self { grid, metadata: ImageMetadata::new_for_depth(24) }
  }

  #[inline]
  #[must_use]
  pub fn grid(&self) -> &Grid<r8g8b8_Srgb> {
    &self.grid
  }

  #[inline]
  #[must_use]
  pub fn grid_mut(&mut self) -> &mut Grid<r8g8b8_Srgb> {
    &mut self.grid
  }

  #[inline]
  #[must_use]
  pub const fn width(&self) -> u32 {
    self.grid.width()
  }

  #[inline]
  #[must_use]
  pub const fn height(&self) -> u32 {
    self.grid.height()
  }
}

/// Either kind of bitmap this crate can read and write.
#[derive(Debug, Clone, PartialEq)]
pub enum BitmapImage {
  Indexed8(IndexedImage),
  Truecolor24(TruecolorImage),
}
impl BitmapImage {
  #[inline]
  #[must_use]
  pub const fn width(&self) -> u32 {
    match self {
      Self::Indexed8(i) => i.width(),
      Self::Truecolor24(t) => t.width(),
    }
  }

  #[inline]
  #[must_use]
  pub const fn height(&self) -> u32 {
    match self {
      Self::Indexed8(i) => i.height(),
      Self::Truecolor24(t) => t.height(),
    }
  }

  /// Either 8 or 24.
  #[inline]
  #[must_use]
  pub const fn bits_per_pixel(&self) -> u16 {
    match self {
      Self::Indexed8(_) => 8,
      Self::Truecolor24(_) => 24,
    }
  }

  #[inline]
  #[must_use]
  pub const fn metadata(&self) -> &ImageMetadata {
    match self {
      Self::Indexed8(i) => &i.metadata,
      Self::Truecolor24(t) => &t.metadata,
    }
  }

  /// Summary of the image for display.
  #[inline]
  #[must_use]
  pub fn info(&self) -> ImageInfo {
    let (width, height, bits_per_pixel) = (self.width(), self.height(), self.bits_per_pixel());
    let data_size = row_stride(width, bits_per_pixel)
      .and_then(|stride| stride.checked_mul(height as usize))
      .and_then(|size| u32::try_from(size).ok())
      .unwrap_or(u32::MAX);
    ImageInfo { width, height, bits_per_pixel, data_size }
  }
}
impl From<IndexedImage> for BitmapImage {
  #[inline]
  fn from(i: IndexedImage) -> Self {
    Self::Indexed8(i)
  }
}
impl From<TruecolorImage> for BitmapImage {
  #[inline]
  fn from(t: TruecolorImage) -> Self {
    Self::Truecolor24(t)
  }
}

/// The basic facts about an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageInfo {
  pub width: u32,
  pub height: u32,
  pub bits_per_pixel: u16,
  /// Bytes of pixel data when written out, row padding included.
  pub data_size: u32,
}
impl fmt::Display for ImageInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Width: {}", self.width)?;
    writeln!(f, "Height: {}", self.height)?;
    writeln!(f, "Color Depth: {}", self.bits_per_pixel)?;
    write!(f, "Data Size: {}", self.data_size)
  }
}

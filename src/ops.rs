//! Point operations: each output pixel depends only on the same input pixel.

use crate::{
  image::{BitmapImage, IndexedImage, TruecolorImage},
  pixel::Channels,
  util::clamp_i32_u8,
  BmpError, BmpResult,
};
use pixel_formats::r8g8b8_Srgb;
use tracing::trace;

#[inline]
#[must_use]
fn negate(c: u8) -> u8 {
  255 - c
}

#[inline]
#[must_use]
fn brighten(c: u8, value: i32) -> u8 {
  clamp_i32_u8(i32::from(c).saturating_add(value))
}

/// Integer average of the three channels, written to all three.
#[inline]
#[must_use]
pub fn gray_of(p: r8g8b8_Srgb) -> r8g8b8_Srgb {
  let gray = ((u16::from(p.r) + u16::from(p.g) + u16::from(p.b)) / 3) as u8;
  r8g8b8_Srgb { r: gray, g: gray, b: gray }
}

impl IndexedImage {
  /// `v = 255 - v` for every pixel index.
  pub fn negative(&mut self) {
    trace!("negative on indexed image");
    self.grid.pixels_mut().iter_mut().for_each(|v| *v = negate(*v));
  }

  /// Adds `value` to every pixel index, saturating at 0 and 255.
  pub fn brightness(&mut self, value: i32) {
    trace!(value, "brightness on indexed image");
    self.grid.pixels_mut().iter_mut().for_each(|v| *v = brighten(*v, value));
  }

  /// Every pixel index at or above `level` becomes 255, all others become 0.
  pub fn threshold(&mut self, level: i32) {
    trace!(level, "threshold on indexed image");
    self
      .grid
      .pixels_mut()
      .iter_mut()
      .for_each(|v| *v = if i32::from(*v) >= level { 255 } else { 0 });
  }
}

impl TruecolorImage {
  /// `c = 255 - c` on every channel.
  pub fn negative(&mut self) {
    trace!("negative on truecolor image");
    self.grid.pixels_mut().iter_mut().for_each(|p| *p = p.map_channels(negate));
  }

  /// Adds `value` to every channel, saturating at 0 and 255.
  pub fn brightness(&mut self, value: i32) {
    trace!(value, "brightness on truecolor image");
    self.grid.pixels_mut().iter_mut().for_each(|p| *p = p.map_channels(|c| brighten(c, value)));
  }

  /// Sets each pixel to the integer average of its channels.
  pub fn grayscale(&mut self) {
    trace!("grayscale on truecolor image");
    self.grid.pixels_mut().iter_mut().for_each(|p| *p = gray_of(*p));
  }
}

impl BitmapImage {
  #[inline]
  pub fn negative(&mut self) {
    match self {
      Self::Indexed8(i) => i.negative(),
      Self::Truecolor24(t) => t.negative(),
    }
  }

  #[inline]
  pub fn brightness(&mut self, value: i32) {
    match self {
      Self::Indexed8(i) => i.brightness(value),
      Self::Truecolor24(t) => t.brightness(value),
    }
  }

  /// ## Failure
  /// * [`BmpError::DepthMismatch`] on an indexed image, which is untouched.
  #[inline]
  pub fn grayscale(&mut self) -> BmpResult<()> {
    match self {
      Self::Truecolor24(t) => {
        t.grayscale();
        Ok(())
      }
      Self::Indexed8(_) => Err(BmpError::DepthMismatch { op: "grayscale", bits_per_pixel: 8 }),
    }
  }

  /// ## Failure
  /// * [`BmpError::DepthMismatch`] on a truecolor image, which is untouched.
  #[inline]
  pub fn threshold(&mut self, level: i32) -> BmpResult<()> {
    match self {
      Self::Indexed8(i) => {
        i.threshold(level);
        Ok(())
      }
      Self::Truecolor24(_) => Err(BmpError::DepthMismatch { op: "threshold", bits_per_pixel: 24 }),
    }
  }
}

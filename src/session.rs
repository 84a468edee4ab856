//! A one-image-at-a-time command runner.

use crate::{
  bmp,
  image::{BitmapImage, ImageInfo},
  kernel::NamedFilter,
  BmpError, BmpResult,
};
use core::{fmt, str::FromStr};
use std::path::Path;
use tracing::{debug, info};

/// One of the cataloged image transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transform {
  Negative,
  /// Truecolor only.
  Grayscale,
  Brightness(i32),
  /// Indexed only.
  Threshold(i32),
  Filter(NamedFilter),
  Equalize,
}
impl Transform {
  /// Applies the transform to an image.
  ///
  /// On failure the image is unchanged.
  pub fn apply_to(self, image: &mut BitmapImage) -> BmpResult<()> {
    match self {
      Self::Negative => image.negative(),
      Self::Grayscale => image.grayscale()?,
      Self::Brightness(value) => image.brightness(value),
      Self::Threshold(level) => image.threshold(level)?,
      Self::Filter(filter) => image.apply_filter(filter)?,
      Self::Equalize => image.equalize()?,
    }
    Ok(())
  }

  /// If the transform can be used on an image with this many bits per pixel.
  #[inline]
  #[must_use]
  pub const fn supports_depth(self, bits_per_pixel: u16) -> bool {
    match self {
      Self::Grayscale => bits_per_pixel == 24,
      Self::Threshold(_) => bits_per_pixel == 8,
      _ => true,
    }
  }
}
impl fmt::Display for Transform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Negative => f.write_str("negative"),
      Self::Grayscale => f.write_str("grayscale"),
      Self::Brightness(value) => write!(f, "brightness={value}"),
      Self::Threshold(level) => write!(f, "threshold={level}"),
      Self::Filter(filter) => fmt::Display::fmt(filter, f),
      Self::Equalize => f.write_str("equalize"),
    }
  }
}
impl FromStr for Transform {
  type Err = BmpError;
  /// Accepts the same text that `Display` writes.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    let parse_arg = |name: &str, arg: &str| {
      arg.trim().parse::<i32>().map_err(|e| {
        BmpError::InvalidParameter(format!("bad {name} argument `{arg}`: {e}"))
      })
    };
    match s.split_once('=') {
      Some((name, arg)) if name.trim().eq_ignore_ascii_case("brightness") => {
        Ok(Self::Brightness(parse_arg("brightness", arg)?))
      }
      Some((name, arg)) if name.trim().eq_ignore_ascii_case("threshold") => {
        Ok(Self::Threshold(parse_arg("threshold", arg)?))
      }
      Some(_) => Err(BmpError::InvalidParameter(format!("unknown transform `{s}`"))),
      None if s.eq_ignore_ascii_case("negative") => Ok(Self::Negative),
      None if s.eq_ignore_ascii_case("grayscale") => Ok(Self::Grayscale),
      None if s.eq_ignore_ascii_case("equalize") => Ok(Self::Equalize),
      None => s
        .parse::<NamedFilter>()
        .map(Self::Filter)
        .map_err(|_| BmpError::InvalidParameter(format!("unknown transform `{s}`"))),
    }
  }
}

/// Holds at most one image and runs commands against it.
#[derive(Debug, Clone, Default)]
pub struct Session {
  image: Option<BitmapImage>,
}
impl Session {
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self { image: None }
  }

  /// Loads the file, replacing the current image.
  ///
  /// If loading fails the current image is kept.
  pub fn open(&mut self, path: impl AsRef<Path>) -> BmpResult<ImageInfo> {
    let path = path.as_ref();
    let image = bmp::load(path)?;
    let info = image.info();
    info!(path = %path.display(), width = info.width, height = info.height, "opened image");
    self.image = Some(image);
    Ok(info)
  }

  pub fn save(&self, path: impl AsRef<Path>) -> BmpResult<()> {
    let path = path.as_ref();
    bmp::save(self.current()?, path)?;
    info!(path = %path.display(), "saved image");
    Ok(())
  }

  pub fn info(&self) -> BmpResult<ImageInfo> {
    Ok(self.current()?.info())
  }

  pub fn apply(&mut self, transform: Transform) -> BmpResult<()> {
    let image = self.image.as_mut().ok_or(BmpError::NoImage)?;
    transform.apply_to(image)?;
    debug!(%transform, "applied transform");
    Ok(())
  }

  /// Drops the current image, giving it back if there was one.
  #[inline]
  pub fn close(&mut self) -> Option<BitmapImage> {
    self.image.take()
  }

  #[inline]
  #[must_use]
  pub const fn image(&self) -> Option<&BitmapImage> {
    self.image.as_ref()
  }

  /// Puts an already decoded image into the session.
  #[inline]
  pub fn set_image(&mut self, image: BitmapImage) -> Option<BitmapImage> {
    self.image.replace(image)
  }

  #[inline]
  fn current(&self) -> BmpResult<&BitmapImage> {
    self.image.as_ref().ok_or(BmpError::NoImage)
  }
}

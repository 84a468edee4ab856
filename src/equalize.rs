//! Histogram equalization.
//!
//! Indexed images remap their pixel indexes directly. Truecolor images are
//! split into luma (`Y`) and chroma (`U`, `V`), only the luma gets remapped,
//! and then the pixels are rebuilt from the new luma and the original chroma.

use crate::{
  image::{BitmapImage, IndexedImage, TruecolorImage},
  util::clamp_round_u8,
  BmpResult,
};
use pixel_formats::r8g8b8_Srgb;
use tracing::trace;

/// Counts how many times each value appears.
#[must_use]
pub fn histogram(values: &[u8]) -> [u32; 256] {
  let mut hist = [0_u32; 256];
  for &v in values {
    hist[usize::from(v)] += 1;
  }
  hist
}

/// Running totals of a histogram: `cdf[i]` is the count of values `<= i`.
#[must_use]
pub fn cumulative(hist: &[u32; 256]) -> [u32; 256] {
  let mut cdf = [0_u32; 256];
  let mut total = 0_u32;
  for (c, &h) in cdf.iter_mut().zip(hist.iter()) {
    total = total.saturating_add(h);
    *c = total;
  }
  cdf
}

/// The lookup table that spreads the histogram over the full `0..=255` range.
///
/// The lowest occupied value maps to 0 and the highest maps to 255. If only
/// one value occurs at all, everything maps to 0.
#[must_use]
pub fn equalization_map(hist: &[u32; 256]) -> [u8; 256] {
  let cdf = cumulative(hist);
  let total = cdf[255];
  let cdf_min = cdf.iter().copied().find(|&c| c > 0).unwrap_or(0);
  let mut map = [0_u8; 256];
  if total > cdf_min {
    let span = f64::from(total - cdf_min);
    for (m, &c) in map.iter_mut().zip(cdf.iter()) {
      let scaled = (f64::from(c) - f64::from(cdf_min)) / span * 255.0;
      *m = scaled.round().clamp(0.0, 255.0) as u8;
    }
  }
  map
}

/// One pixel split into luma and two chroma values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Yuv {
  y: f32,
  u: f32,
  v: f32,
}
impl From<r8g8b8_Srgb> for Yuv {
  #[inline]
  fn from(p: r8g8b8_Srgb) -> Self {
    let (r, g, b) = (f32::from(p.r), f32::from(p.g), f32::from(p.b));
    Self {
      y: 0.299 * r + 0.587 * g + 0.114 * b,
      u: -0.14713 * r - 0.28886 * g + 0.436 * b,
      v: 0.615 * r - 0.51499 * g - 0.10001 * b,
    }
  }
}
impl From<Yuv> for r8g8b8_Srgb {
  #[inline]
  fn from(Yuv { y, u, v }: Yuv) -> Self {
    r8g8b8_Srgb {
      r: clamp_round_u8(y + 1.13983 * v),
      g: clamp_round_u8(y - 0.39465 * u - 0.58060 * v),
      b: clamp_round_u8(y + 2.03211 * u),
    }
  }
}
impl Yuv {
  /// The luma as a histogram bucket.
  #[inline]
  #[must_use]
  fn luma_level(self) -> u8 {
    clamp_round_u8(self.y)
  }
}

impl IndexedImage {
  /// Equalizes the histogram of the pixel indexes. The palette is unchanged.
  pub fn equalize(&mut self) {
    let map = equalization_map(&histogram(self.grid.pixels()));
    trace!("equalize on indexed image");
    self.grid.pixels_mut().iter_mut().for_each(|v| *v = map[usize::from(*v)]);
  }
}

impl TruecolorImage {
  /// Equalizes the luma histogram, keeping the chroma of every pixel.
  ///
  /// ## Failure
  /// * The scratch luma/chroma grid couldn't be allocated. The image is
  ///   unchanged in that case.
  pub fn equalize(&mut self) -> BmpResult<()> {
    let yuv = self.grid.try_map(|&p| Yuv::from(p))?;
    let levels = yuv.try_map(|p| p.luma_level())?;
    let map = equalization_map(&histogram(levels.pixels()));
    trace!("equalize on truecolor image");
    for ((dst, src), level) in
      self.grid.pixels_mut().iter_mut().zip(yuv.pixels()).zip(levels.pixels())
    {
      *dst = Yuv { y: f32::from(map[usize::from(*level)]), ..*src }.into();
    }
    Ok(())
  }
}

impl BitmapImage {
  #[inline]
  pub fn equalize(&mut self) -> BmpResult<()> {
    match self {
      Self::Indexed8(i) => {
        i.equalize();
        Ok(())
      }
      Self::Truecolor24(t) => t.equalize(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::grid::Grid;

  #[test]
  fn test_histogram_and_cdf() {
    let hist = histogram(&[0, 0, 3, 255]);
    assert_eq!(hist[0], 2);
    assert_eq!(hist[3], 1);
    assert_eq!(hist[255], 1);
    let cdf = cumulative(&hist);
    assert_eq!(cdf[0], 2);
    assert_eq!(cdf[2], 2);
    assert_eq!(cdf[3], 3);
    assert_eq!(cdf[255], 4);
  }

  #[test]
  fn test_four_levels_spread_out() {
    let grid = Grid::from_vec(2, 2, vec![0, 64, 128, 255]).unwrap();
    let mut image = IndexedImage::new_grayscale(grid).unwrap();
    image.equalize();
    // cdf = 1, 2, 3, 4 with cdf_min = 1: 0/3, 1/3, 2/3, 3/3 of 255
    assert_eq!(image.grid().pixels(), &[0, 85, 170, 255]);
  }

  #[test]
  fn test_single_level_maps_to_zero() {
    let map = equalization_map(&histogram(&[77; 9]));
    assert!(map.iter().all(|&m| m == 0));
    let map = equalization_map(&[0; 256]);
    assert!(map.iter().all(|&m| m == 0));
  }

  #[test]
  fn test_map_is_monotonic() {
    let values: Vec<u8> = (0..1000_u32).map(|i| ((i * i) % 251) as u8).collect();
    let map = equalization_map(&histogram(&values));
    assert!(map.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(map[255], 255);
  }

  #[test]
  fn test_gray_round_trips_through_yuv() {
    for level in [0_u8, 1, 77, 128, 254, 255] {
      let p = r8g8b8_Srgb { r: level, g: level, b: level };
      let yuv = Yuv::from(p);
      assert_eq!(yuv.luma_level(), level);
      assert_eq!(r8g8b8_Srgb::from(yuv), p);
    }
  }

  #[test]
  fn test_truecolor_equalize_stretches_luma() {
    let dark = r8g8b8_Srgb { r: 40, g: 40, b: 40 };
    let light = r8g8b8_Srgb { r: 60, g: 60, b: 60 };
    let grid = Grid::from_vec(2, 1, vec![dark, light]).unwrap();
    let mut image = TruecolorImage::new(grid);
    image.equalize().unwrap();
    assert_eq!(image.grid()[(0, 0)], r8g8b8_Srgb { r: 0, g: 0, b: 0 });
    assert_eq!(image.grid()[(1, 0)], r8g8b8_Srgb { r: 255, g: 255, b: 255 });
  }

  #[test]
  fn test_truecolor_equalize_keeps_chroma() {
    let red = r8g8b8_Srgb { r: 200, g: 30, b: 30 };
    let blue = r8g8b8_Srgb { r: 30, g: 30, b: 200 };
    let mut image = TruecolorImage::new(Grid::from_vec(2, 1, vec![red, blue]).unwrap());
    image.equalize().unwrap();
    // luma 81 goes to 255 and luma 49 goes to 0, the chroma of each pixel
    // stays and the channels are clamped
    assert_eq!(image.grid()[(0, 0)], r8g8b8_Srgb { r: 255, g: 204, b: 204 });
    assert_eq!(image.grid()[(1, 0)], r8g8b8_Srgb { r: 0, g: 0, b: 151 });
  }

  #[test]
  fn test_truecolor_single_luma_drops_to_zero() {
    let red = r8g8b8_Srgb { r: 200, g: 30, b: 30 };
    let yuv = Yuv::from(red);
    let expected = r8g8b8_Srgb::from(Yuv { y: 0.0, ..yuv });
    assert_eq!(expected, r8g8b8_Srgb { r: 119, g: 0, b: 0 });

    let mut single = TruecolorImage::new(Grid::from_vec(1, 1, vec![red]).unwrap());
    single.equalize().unwrap();
    assert_eq!(single.grid()[(0, 0)], expected);

    let mut flat = TruecolorImage::new(Grid::try_new(2, 2, red).unwrap());
    flat.equalize().unwrap();
    assert!(flat.grid().pixels().iter().all(|&p| p == expected));
  }
}

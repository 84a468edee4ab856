//! Sliding-window convolution over a pixel grid.

use crate::{
  grid::Grid,
  image::{BitmapImage, IndexedImage, TruecolorImage},
  kernel::{Kernel, NamedFilter},
  pixel::Channels,
  util::clamp_truncate_u8,
  BmpResult,
};
use tracing::trace;

/// What to do with pixels whose kernel window hangs off the edge of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderPolicy {
  /// Border pixels are copied to the output unchanged.
  #[default]
  PassThrough,

  /// Border pixels use only the kernel taps that land inside the grid. The
  /// weights are not renormalized.
  PartialSum,
}

/// Convolves every channel of `grid` with `kernel`, giving a new grid.
///
/// Each output channel is the weighted sum of the neighborhood, clamped to
/// `0.0..=255.0` and then truncated.
pub fn convolve<P: Channels>(
  grid: &Grid<P>, kernel: &Kernel, policy: BorderPolicy,
) -> BmpResult<Grid<P>> {
  let (width, height) = (grid.width() as usize, grid.height() as usize);
  let radius = kernel.radius();
  let mut out = Grid::try_new(grid.width(), grid.height(), P::default())?;
  let src = grid.pixels();
  let is_border = |x: usize, y: usize| {
    x < radius || y < radius || x + radius >= width || y + radius >= height
  };

  for (y, out_row) in out.rows_mut().enumerate() {
    for (x, out_px) in out_row.iter_mut().enumerate() {
      if policy == BorderPolicy::PassThrough && is_border(x, y) {
        *out_px = src[y * width + x];
        continue;
      }
      let mut sums = [0.0_f32; 3];
      for (i, taps) in kernel.weights().chunks_exact(kernel.size()).enumerate() {
        let Some(sy) = (y + i).checked_sub(radius).filter(|&sy| sy < height) else {
          continue;
        };
        for (j, &weight) in taps.iter().enumerate() {
          let Some(sx) = (x + j).checked_sub(radius).filter(|&sx| sx < width) else {
            continue;
          };
          let channels = src[sy * width + sx].to_channels();
          for (sum, ch) in sums.iter_mut().zip(channels).take(P::COUNT) {
            *sum += weight * f32::from(ch);
          }
        }
      }
      *out_px = P::from_channels(sums.map(clamp_truncate_u8));
    }
  }
  Ok(out)
}

impl IndexedImage {
  /// Convolves the index grid in place. The palette is left alone.
  #[inline]
  pub fn apply_kernel(&mut self, kernel: &Kernel, policy: BorderPolicy) -> BmpResult<()> {
    self.grid = convolve(&self.grid, kernel, policy)?;
    Ok(())
  }

  #[inline]
  pub fn apply_filter(&mut self, filter: NamedFilter) -> BmpResult<()> {
    trace!(%filter, "filtering indexed image");
    self.apply_kernel(&filter.kernel(), BorderPolicy::default())
  }
}

impl TruecolorImage {
  #[inline]
  pub fn apply_kernel(&mut self, kernel: &Kernel, policy: BorderPolicy) -> BmpResult<()> {
    self.grid = convolve(&self.grid, kernel, policy)?;
    Ok(())
  }

  #[inline]
  pub fn apply_filter(&mut self, filter: NamedFilter) -> BmpResult<()> {
    trace!(%filter, "filtering truecolor image");
    self.apply_kernel(&filter.kernel(), BorderPolicy::default())
  }
}

impl BitmapImage {
  /// Convolves the image with any odd square kernel.
  ///
  /// On failure the image is unchanged.
  #[inline]
  pub fn apply_kernel(&mut self, kernel: &Kernel, policy: BorderPolicy) -> BmpResult<()> {
    match self {
      Self::Indexed8(i) => i.apply_kernel(kernel, policy),
      Self::Truecolor24(t) => t.apply_kernel(kernel, policy),
    }
  }

  /// Runs one of the cataloged filters with the default border policy.
  #[inline]
  pub fn apply_filter(&mut self, filter: NamedFilter) -> BmpResult<()> {
    match self {
      Self::Indexed8(i) => i.apply_filter(filter),
      Self::Truecolor24(t) => t.apply_filter(filter),
    }
  }
}

//! Uniform per-channel access to the two pixel types.

use pixel_formats::r8g8b8_Srgb;

/// A pixel made of up to three `u8` channels.
///
/// Lets the filters work on both image depths with one implementation. Unused
/// channels read as 0 and are ignored on write.
pub trait Channels: Copy + Default {
  /// How many of the three channel slots are meaningful.
  const COUNT: usize;

  fn to_channels(self) -> [u8; 3];

  fn from_channels(c: [u8; 3]) -> Self;

  /// Runs `op` on each meaningful channel.
  #[inline]
  #[must_use]
  fn map_channels(self, mut op: impl FnMut(u8) -> u8) -> Self {
    let mut c = self.to_channels();
    c.iter_mut().take(Self::COUNT).for_each(|ch| *ch = op(*ch));
    Self::from_channels(c)
  }
}

impl Channels for u8 {
  const COUNT: usize = 1;
  #[inline]
  fn to_channels(self) -> [u8; 3] {
    [self, 0, 0]
  }
  #[inline]
  fn from_channels([v, _, _]: [u8; 3]) -> Self {
    v
  }
}

impl Channels for r8g8b8_Srgb {
  const COUNT: usize = 3;
  #[inline]
  fn to_channels(self) -> [u8; 3] {
    [self.r, self.g, self.b]
  }
  #[inline]
  fn from_channels([r, g, b]: [u8; 3]) -> Self {
    r8g8b8_Srgb { r, g, b }
  }
}

#[test]
fn test_map_channels_skips_unused_slots() {
  assert_eq!(5_u8.map_channels(|c| c + 1), 6);
  let p = r8g8b8_Srgb { r: 1, g: 2, b: 3 }.map_channels(|c| c * 2);
  assert_eq!([p.r, p.g, p.b], [2, 4, 6]);
}

use super::raw_headers::*;
use crate::{util::try_pull_pod, BmpResult};
use bytemuck::cast;
use pack1::*;

/// `BM` read as a little-endian `u16`.
pub const BMP_SIGNATURE: u16 = 0x4D42;

/// Byte size of the file header.
pub const FILE_HEADER_SIZE: usize = 14;

/// Byte size of the `BITMAPINFOHEADER`, the only info header version handled.
pub const INFO_HEADER_SIZE: usize = 40;

/// Number of entries in the color table of an 8-bit image.
pub const PALETTE_LEN: usize = 256;

/// Byte size of the color table of an 8-bit image.
pub const PALETTE_BYTE_SIZE: usize = PALETTE_LEN * 4;

/// 72 DPI, in pixels per meter.
pub const DEFAULT_PIXELS_PER_METER: i32 = 2835;

/// The header at the start of all BMP files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FileHeader {
  /// Should be [`BMP_SIGNATURE`].
  pub signature: u16,

  /// The total size of the file.
  ///
  /// If this doesn't match the actual size of the file, there might be some
  /// sort of data loss or corruption.
  pub file_size: u32,

  pub reserved1: u16,
  pub reserved2: u16,

  /// The byte index within the file where the pixel data starts.
  pub pixel_data_offset: u32,
}
impl From<BitmapFileHeader> for FileHeader {
  #[inline]
  fn from(raw: BitmapFileHeader) -> Self {
    Self {
      signature: raw.ty.get(),
      file_size: raw.file_size.get(),
      reserved1: raw.reserved1.get(),
      reserved2: raw.reserved2.get(),
      pixel_data_offset: raw.bitmap_offset.get(),
    }
  }
}
impl From<FileHeader> for [u8; FILE_HEADER_SIZE] {
  #[inline]
  fn from(h: FileHeader) -> Self {
    cast(BitmapFileHeader {
      ty: U16LE::new(h.signature),
      file_size: U32LE::new(h.file_size),
      reserved1: U16LE::new(h.reserved1),
      reserved2: U16LE::new(h.reserved2),
      bitmap_offset: U32LE::new(h.pixel_data_offset),
    })
  }
}
impl FileHeader {
  /// Tries to get the file header and remaining bytes from the bytes of a BMP
  /// file.
  ///
  /// The bytes from here should be used to get the [InfoHeader].
  #[inline]
  pub fn try_from_bytes(bytes: &[u8]) -> BmpResult<(Self, &[u8])> {
    let (raw, rest) = try_pull_pod::<BitmapFileHeader>(bytes)?;
    Ok((Self::from(raw), rest))
  }
}

/// The 40 byte `BITMAPINFOHEADER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InfoHeader {
  /// Should be [`INFO_HEADER_SIZE`].
  pub header_size: u32,

  /// Image pixel width
  pub width: i32,

  /// Image pixel height.
  ///
  /// Only positive (bottom-up) heights are handled.
  pub height: i32,

  /// Should be 1.
  pub planes: u16,

  /// 8 or 24 for images this crate handles.
  pub bits_per_pixel: u16,

  /// Should be 0 (`BI_RGB`).
  pub compression: u32,

  /// The number of bytes in the pixel data, including any row padding.
  pub image_size: u32,

  /// horizontal pixels per meter
  pub h_ppm: i32,

  /// vertical pixels per meter
  pub v_ppm: i32,

  /// Number of color table entries in use. Zero means "all of them".
  pub colors_used: u32,

  /// The number of "important" colors. This field is generally ignored.
  pub important_colors: u32,
}
impl From<BitmapInfoHeader> for InfoHeader {
  #[inline]
  fn from(raw: BitmapInfoHeader) -> Self {
    Self {
      header_size: raw.size.get(),
      width: raw.width.get(),
      height: raw.height.get(),
      planes: raw.planes.get(),
      bits_per_pixel: raw.bits_per_pixel.get(),
      compression: raw.compression.get(),
      image_size: raw.image_size.get(),
      h_ppm: raw.pixels_per_meter_x.get(),
      v_ppm: raw.pixels_per_meter_y.get(),
      colors_used: raw.colors_used.get(),
      important_colors: raw.important_colors.get(),
    }
  }
}
impl From<InfoHeader> for [u8; INFO_HEADER_SIZE] {
  #[inline]
  #[rustfmt::skip]
  fn from(h: InfoHeader) -> Self {
    cast(BitmapInfoHeader {
      size: U32LE::new(h.header_size),
      width: I32LE::new(h.width),
      height: I32LE::new(h.height),
      planes: U16LE::new(h.planes),
      bits_per_pixel: U16LE::new(h.bits_per_pixel),
      compression: U32LE::new(h.compression),
      image_size: U32LE::new(h.image_size),
      pixels_per_meter_x: I32LE::new(h.h_ppm),
      pixels_per_meter_y: I32LE::new(h.v_ppm),
      colors_used: U32LE::new(h.colors_used),
      important_colors: U32LE::new(h.important_colors),
    })
  }
}
impl InfoHeader {
  /// Tries to get the info header and the remaining bytes.
  ///
  /// This doesn't validate any of the fields, see [decode](super::decode) for
  /// that.
  #[inline]
  pub fn try_from_bytes(bytes: &[u8]) -> BmpResult<(Self, &[u8])> {
    let (raw, rest) = try_pull_pod::<BitmapInfoHeader>(bytes)?;
    Ok((Self::from(raw), rest))
  }

  /// If the compression field says the data is stored uncompressed.
  #[inline]
  #[must_use]
  pub const fn is_uncompressed(&self) -> bool {
    self.compression == BI_RGB
  }
}

/// Bytes of zero padding after each pixel row on disk.
///
/// 24-bit rows are padded to a multiple of 4. 8-bit rows are stored packed.
#[inline]
#[must_use]
pub const fn row_padding(width: u32, bits_per_pixel: u16) -> usize {
  match bits_per_pixel {
    24 => (4 - (width as usize * 3) % 4) % 4,
    _ => 0,
  }
}

/// Bytes per on-disk pixel row, padding included.
///
/// `None` if the value doesn't fit in a `usize`.
#[inline]
#[must_use]
pub fn row_stride(width: u32, bits_per_pixel: u16) -> Option<usize> {
  let bytes_per_pixel = usize::from(bits_per_pixel / 8);
  usize::try_from(width)
    .ok()?
    .checked_mul(bytes_per_pixel)?
    .checked_add(row_padding(width, bits_per_pixel))
}

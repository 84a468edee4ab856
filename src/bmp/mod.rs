#![forbid(unsafe_code)]

//! Module for Windows Bitmap files (BMP).
//!
//! ## The Format
//!
//! Note: All multi-byte values in BMP are always little-endian encoded.
//!
//! * A bitmap file always starts with a "file header". This is always 14 bytes.
//!   * The `BM` tag.
//!   * A total size of the file, to check if a file was unexpectedly truncated.
//!   * Two reserved `u16` values, which should be zero.
//!   * The position of the pixel data within the file.
//! * Next is the 40 byte "info header" (`BITMAPINFOHEADER`). Other versions of
//!   the info header exist, they aren't handled here.
//! * Next, for 8 bits per pixel, there's a color table of 256 entries. Each
//!   entry is `[b, g, r, reserved]`.
//! * Finally the pixel array, starting at the offset given in the file header.
//!   Rows are stored bottom row first.
//!   * 24 bits per pixel stores `[b, g, r]` per pixel, and each row is padded
//!     with zeroes to a multiple of 4 bytes.
//!   * 8 bits per pixel stores one palette index per pixel, and the rows are
//!     packed with no padding at all.
//!
//! Within this crate the in-memory row 0 is always the visual top row, the
//! reading and writing functions here do the flip.

use crate::{
  grid::Grid,
  image::{BitmapImage, ImageMetadata, IndexedImage, TruecolorImage},
  util::try_pull_pod,
  BmpError, BmpResult,
};
use pixel_formats::{r8g8b8_Srgb, r8g8b8a8_Srgb};
use std::path::Path;
use tracing::{debug, warn};

mod headers;
pub use headers::*;

mod raw_headers;
use raw_headers::{RgbQuad, BI_RGB};

/// Parses the bytes of an 8-bit or 24-bit uncompressed BMP file.
///
/// ## Failure
/// * [`BmpError::BadSignature`] if the file doesn't start with `BM`.
/// * [`BmpError::UnknownHeaderLength`] for info headers other than the 40
///   byte version.
/// * [`BmpError::UnsupportedDepth`] for bit depths other than 8 and 24.
/// * [`BmpError::UnsupportedCompression`] for compressed data.
/// * [`BmpError::IllegalDimensions`] if the width or height isn't positive.
/// * [`BmpError::InsufficientBytes`] if the data ends early.
/// * [`BmpError::Alloc`] if the pixel storage can't be allocated.
pub fn decode(bytes: &[u8]) -> BmpResult<BitmapImage> {
  let (file_header, rest) = FileHeader::try_from_bytes(bytes)?;
  if file_header.signature != BMP_SIGNATURE {
    return Err(BmpError::BadSignature(file_header.signature));
  }
  if file_header.file_size as usize != bytes.len() {
    warn!(declared = file_header.file_size, actual = bytes.len(), "bitmap file size mismatch");
  }
  if file_header.reserved1 != 0 || file_header.reserved2 != 0 {
    warn!(
      reserved1 = file_header.reserved1,
      reserved2 = file_header.reserved2,
      "non-zero reserved header fields"
    );
  }
  let (info, rest) = InfoHeader::try_from_bytes(rest)?;
  if info.header_size as usize != INFO_HEADER_SIZE {
    return Err(BmpError::UnknownHeaderLength(info.header_size));
  }
  if !matches!(info.bits_per_pixel, 8 | 24) {
    return Err(BmpError::UnsupportedDepth(info.bits_per_pixel));
  }
  if !info.is_uncompressed() {
    return Err(BmpError::UnsupportedCompression(info.compression));
  }
  if info.width <= 0 || info.height <= 0 {
    return Err(BmpError::IllegalDimensions { width: info.width, height: info.height });
  }
  if info.planes != 1 {
    warn!(planes = info.planes, "color planes should be 1");
  }
  let width = info.width.unsigned_abs();
  let height = info.height.unsigned_abs();
  let metadata = ImageMetadata {
    h_ppm: info.h_ppm,
    v_ppm: info.v_ppm,
    colors_used: info.colors_used,
    important_colors: info.important_colors,
  };

  // The color table comes right after the info header, but the pixel data is
  // wherever the file header says it is.
  let palette = if info.bits_per_pixel == 8 {
    let (table, _rest) = try_pull_pod::<[RgbQuad; PALETTE_LEN]>(rest)?;
    let mut palette: Vec<r8g8b8a8_Srgb> = Vec::new();
    palette.try_reserve_exact(PALETTE_LEN)?;
    palette.extend(table.iter().map(|&[b, g, r, a]| r8g8b8a8_Srgb { r, g, b, a }));
    Some(palette)
  } else {
    None
  };

  let stride = row_stride(width, info.bits_per_pixel).ok_or(BmpError::Alloc)?;
  let data_len = stride.checked_mul(height as usize).ok_or(BmpError::Alloc)?;
  let data_start = file_header.pixel_data_offset as usize;
  let pixel_data = data_start
    .checked_add(data_len)
    .and_then(|data_end| bytes.get(data_start..data_end))
    .ok_or(BmpError::InsufficientBytes {
      needed: data_start.saturating_add(data_len),
      found: bytes.len(),
    })?;

  // `rchunks_exact` walks the on-disk rows from the last one (the visual top)
  // back to the first one (the visual bottom).
  let image = match palette {
    Some(palette) => {
      let mut grid = Grid::try_new(width, height, 0_u8)?;
      for (dst, src) in grid.rows_mut().zip(pixel_data.rchunks_exact(stride)) {
        dst.copy_from_slice(&src[..dst.len()]);
      }
      BitmapImage::Indexed8(IndexedImage { grid, palette, metadata })
    }
    None => {
      let mut grid = Grid::try_new(width, height, r8g8b8_Srgb::default())?;
      for (dst, src) in grid.rows_mut().zip(pixel_data.rchunks_exact(stride)) {
        for (p, bgr) in dst.iter_mut().zip(src.chunks_exact(3)) {
          *p = r8g8b8_Srgb { r: bgr[2], g: bgr[1], b: bgr[0] };
        }
      }
      BitmapImage::Truecolor24(TruecolorImage { grid, metadata })
    }
  };
  Ok(image)
}

/// Writes an image as BMP file bytes.
///
/// The image size and file size fields are computed fresh from the grid, the
/// pixel data is placed directly after the headers (and color table).
///
/// ## Failure
/// * [`BmpError::IllegalDimensions`] if the image is too big for the format.
/// * [`BmpError::Alloc`] if the output buffer can't be allocated.
pub fn encode(image: &BitmapImage) -> BmpResult<Vec<u8>> {
  let bits_per_pixel = image.bits_per_pixel();
  let (width, height) = (image.width(), image.height());
  let too_big = || BmpError::IllegalDimensions {
    width: i32::try_from(width).unwrap_or(i32::MAX),
    height: i32::try_from(height).unwrap_or(i32::MAX),
  };
  let stride = row_stride(width, bits_per_pixel).ok_or_else(too_big)?;
  let padding = row_padding(width, bits_per_pixel);
  let image_size = stride.checked_mul(height as usize).ok_or_else(too_big)?;
  let palette_size = if bits_per_pixel == 8 { PALETTE_BYTE_SIZE } else { 0 };
  let pixel_data_offset = FILE_HEADER_SIZE + INFO_HEADER_SIZE + palette_size;
  let file_size = pixel_data_offset.checked_add(image_size).ok_or_else(too_big)?;

  let file_header = FileHeader {
    signature: BMP_SIGNATURE,
    file_size: u32::try_from(file_size).map_err(|_| too_big())?,
    reserved1: 0,
    reserved2: 0,
    pixel_data_offset: pixel_data_offset as u32,
  };
  let metadata = image.metadata();
  let info = InfoHeader {
    header_size: INFO_HEADER_SIZE as u32,
    width: i32::try_from(width).map_err(|_| too_big())?,
    height: i32::try_from(height).map_err(|_| too_big())?,
    planes: 1,
    bits_per_pixel,
    compression: BI_RGB,
    image_size: u32::try_from(image_size).map_err(|_| too_big())?,
    h_ppm: metadata.h_ppm,
    v_ppm: metadata.v_ppm,
    colors_used: metadata.colors_used,
    important_colors: metadata.important_colors,
  };

  let mut out: Vec<u8> = Vec::new();
  out.try_reserve_exact(file_size)?;
  out.extend_from_slice(&<[u8; FILE_HEADER_SIZE]>::from(file_header));
  out.extend_from_slice(&<[u8; INFO_HEADER_SIZE]>::from(info));
  match image {
    BitmapImage::Indexed8(indexed) => {
      for r8g8b8a8_Srgb { r, g, b, a } in indexed.palette.iter().copied() {
        out.extend_from_slice(&[b, g, r, a]);
      }
      for row in indexed.grid.rows().rev() {
        out.extend_from_slice(row);
      }
    }
    BitmapImage::Truecolor24(truecolor) => {
      for row in truecolor.grid.rows().rev() {
        for r8g8b8_Srgb { r, g, b } in row.iter().copied() {
          out.extend_from_slice(&[b, g, r]);
        }
        out.extend(core::iter::repeat(0).take(padding));
      }
    }
  }
  debug_assert_eq!(out.len(), file_size);
  Ok(out)
}

/// Reads and decodes the file at `path`.
pub fn load(path: impl AsRef<Path>) -> BmpResult<BitmapImage> {
  let path = path.as_ref();
  let bytes = std::fs::read(path)?;
  let image = decode(&bytes)?;
  debug!(
    path = %path.display(),
    width = image.width(),
    height = image.height(),
    bits_per_pixel = image.bits_per_pixel(),
    "loaded bitmap"
  );
  Ok(image)
}

/// Encodes the image and writes it to `path`.
///
/// Encoding happens fully in memory first, so an encoding error never creates
/// or truncates the file.
pub fn save(image: &BitmapImage, path: impl AsRef<Path>) -> BmpResult<()> {
  let path = path.as_ref();
  let bytes = encode(image)?;
  std::fs::write(path, &bytes)?;
  debug!(path = %path.display(), bytes = bytes.len(), "saved bitmap");
  Ok(())
}

//! The on-disk header structs, field for field.
//!
//! Every field is a packed little-endian type, so these structs have an
//! alignment of 1 and can be read from any position of a byte slice.

use pack1::*;

pub(crate) const BI_RGB: u32 = 0;

#[derive(Debug, Clone, Copy, bytemuck::Zeroable, bytemuck::Pod)]
#[repr(C)]
pub(crate) struct BitmapFileHeader {
  pub ty: U16LE,
  pub file_size: U32LE,
  pub reserved1: U16LE,
  pub reserved2: U16LE,
  pub bitmap_offset: U32LE,
}

#[derive(Debug, Clone, Copy, bytemuck::Zeroable, bytemuck::Pod)]
#[repr(C)]
pub(crate) struct BitmapInfoHeader {
  pub size: U32LE,
  pub width: I32LE,
  pub height: I32LE,
  pub planes: U16LE,
  pub bits_per_pixel: U16LE,
  pub compression: U32LE,
  pub image_size: U32LE,
  pub pixels_per_meter_x: I32LE,
  pub pixels_per_meter_y: I32LE,
  pub colors_used: U32LE,
  pub important_colors: U32LE,
}

/// One color table entry, `[b, g, r, reserved]`.
pub(crate) type RgbQuad = [u8; 4];

#[test]
fn test_raw_header_sizes() {
  assert_eq!(core::mem::size_of::<BitmapFileHeader>(), 14);
  assert_eq!(core::mem::size_of::<BitmapInfoHeader>(), 40);
  assert_eq!(core::mem::align_of::<BitmapInfoHeader>(), 1);
}

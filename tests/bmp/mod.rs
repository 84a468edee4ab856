use bmpkit::{
  decode, encode, r8g8b8_Srgb, r8g8b8a8_Srgb, BitmapImage, BmpError, Grid, IndexedImage,
  TruecolorImage,
};
use walkdir::WalkDir;

fn random_truecolor(width: u32, height: u32) -> BitmapImage {
  let bytes = super::rand_bytes((width * height * 3) as usize);
  let pixels =
    bytes.chunks_exact(3).map(|c| r8g8b8_Srgb { r: c[0], g: c[1], b: c[2] }).collect();
  TruecolorImage::new(Grid::from_vec(width, height, pixels).unwrap()).into()
}

fn random_indexed(width: u32, height: u32) -> BitmapImage {
  let grid = Grid::from_vec(width, height, super::rand_bytes((width * height) as usize)).unwrap();
  let palette = super::rand_bytes(256 * 4)
    .chunks_exact(4)
    .map(|c| r8g8b8a8_Srgb { r: c[0], g: c[1], b: c[2], a: c[3] })
    .collect();
  IndexedImage::from_parts(grid, palette).unwrap().into()
}

#[test]
fn test_truecolor_round_trip() {
  // widths 1 through 8 cover every amount of row padding
  for width in 1..=8 {
    for height in [1, 2, 5] {
      let image = random_truecolor(width, height);
      let bytes = encode(&image).unwrap();
      let stride = (width as usize * 3 + 3) / 4 * 4;
      assert_eq!(bytes.len(), 54 + stride * height as usize);
      assert_eq!(decode(&bytes).unwrap(), image, "{width}x{height}");
    }
  }
}

#[test]
fn test_width_5_has_one_padding_byte() {
  let image = random_truecolor(5, 3);
  let bytes = encode(&image).unwrap();
  assert_eq!(bytes.len(), 54 + 16 * 3);
  for row in bytes[54..].chunks_exact(16) {
    assert_eq!(row[15], 0);
  }
}

#[test]
fn test_indexed_round_trip() {
  for (width, height) in [(1, 1), (3, 2), (5, 5), (16, 3)] {
    let image = random_indexed(width, height);
    let bytes = encode(&image).unwrap();
    assert_eq!(bytes.len(), 1078 + (width * height) as usize);
    assert_eq!(decode(&bytes).unwrap(), image, "{width}x{height}");
  }
}

#[test]
fn test_rows_are_stored_bottom_up() {
  let grid = Grid::from_vec(1, 3, vec![10, 20, 30]).unwrap();
  let image: BitmapImage = IndexedImage::new_grayscale(grid).unwrap().into();
  let bytes = encode(&image).unwrap();
  assert_eq!(&bytes[1078..], &[30, 20, 10]);
}

#[test]
fn test_pixel_offset_is_respected() {
  // put a gap between the headers and the pixel data
  let image = random_truecolor(2, 2);
  let bytes = encode(&image).unwrap();
  let mut gapped = bytes[..54].to_vec();
  gapped.extend_from_slice(&[0xAA; 10]);
  gapped.extend_from_slice(&bytes[54..]);
  gapped[10..14].copy_from_slice(&64_u32.to_le_bytes());
  let gapped_len = gapped.len() as u32;
  gapped[2..6].copy_from_slice(&gapped_len.to_le_bytes());
  assert_eq!(decode(&gapped).unwrap(), image);
}

#[test]
fn test_truncated_files_fail_cleanly() {
  let bytes = encode(&random_indexed(4, 4)).unwrap();
  for len in [0, 1, 13, 14, 53, 54, 1077, 1078, bytes.len() - 1] {
    let err = decode(&bytes[..len]).unwrap_err();
    assert!(matches!(err, BmpError::InsufficientBytes { .. }), "len {len}: {err}");
    assert!(err.is_format_error());
  }
}

#[test]
fn test_bmps_do_not_panic_decoder() {
  // whatever is lying around the tests folder (mostly source files) must come
  // back as an error, not a panic
  for entry in WalkDir::new("tests/").into_iter().filter_map(|e| e.ok()) {
    if entry.file_type().is_dir() {
      continue;
    }
    if let Ok(bytes) = std::fs::read(entry.path()) {
      assert!(decode(&bytes).is_err(), "{} decoded as a bitmap", entry.path().display());
    }
  }
  // same for noise
  for _ in 0..50 {
    let _ = decode(&super::rand_bytes(2048));
  }
  // and for noise behind a plausible header
  let header = encode(&random_truecolor(3, 3)).unwrap();
  for _ in 0..50 {
    let mut v = header[..30].to_vec();
    v.extend(super::rand_bytes(200));
    let _ = decode(&v);
  }
}

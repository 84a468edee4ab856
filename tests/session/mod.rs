use bmpkit::{
  load, r8g8b8_Srgb, save, BitmapImage, BmpError, Grid, IndexedImage, NamedFilter, Session,
  Transform, TruecolorImage,
};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn scratch_dir(name: &str) -> PathBuf {
  let dir = Path::new(env!("CARGO_TARGET_TMPDIR")).join(name);
  let _ = std::fs::remove_dir_all(&dir);
  std::fs::create_dir_all(&dir).unwrap();
  dir
}

fn write_inputs(dir: &Path) -> (PathBuf, PathBuf) {
  let gray = Grid::from_vec(13, 9, super::rand_bytes(13 * 9)).unwrap();
  let gray: BitmapImage = IndexedImage::new_grayscale(gray).unwrap().into();
  let pixels = super::rand_bytes(11 * 7 * 3)
    .chunks_exact(3)
    .map(|c| r8g8b8_Srgb { r: c[0], g: c[1], b: c[2] })
    .collect();
  let color: BitmapImage = TruecolorImage::new(Grid::from_vec(11, 7, pixels).unwrap()).into();
  let gray_path = dir.join("gray.bmp");
  let color_path = dir.join("color.bmp");
  save(&gray, &gray_path).unwrap();
  save(&color, &color_path).unwrap();
  (gray_path, color_path)
}

#[test]
fn test_every_transform_output_decodes() {
  let dir = scratch_dir("every_transform");
  let (gray_path, color_path) = write_inputs(&dir);
  let out_dir = dir.join("out");
  std::fs::create_dir_all(&out_dir).unwrap();

  let mut transforms = vec![
    Transform::Negative,
    Transform::Grayscale,
    Transform::Brightness(50),
    Transform::Brightness(-50),
    Transform::Threshold(128),
    Transform::Equalize,
  ];
  transforms.extend(NamedFilter::ALL.into_iter().map(Transform::Filter));

  let mut written = 0;
  for input in [&gray_path, &color_path] {
    let depth = load(input).unwrap().bits_per_pixel();
    for (i, &transform) in transforms.iter().enumerate() {
      let mut session = Session::new();
      session.open(input).unwrap();
      match session.apply(transform) {
        Ok(()) => assert!(transform.supports_depth(depth)),
        Err(BmpError::DepthMismatch { .. }) => {
          assert!(!transform.supports_depth(depth));
          continue;
        }
        Err(e) => panic!("{transform} failed: {e}"),
      }
      session.save(out_dir.join(format!("{depth}_{i:02}.bmp"))).unwrap();
      written += 1;
    }
  }
  // each depth skips exactly one transform
  assert_eq!(written, 2 * transforms.len() - 2);

  let mut decoded = 0;
  for entry in WalkDir::new(&out_dir).into_iter().filter_map(|e| e.ok()) {
    if entry.file_type().is_dir() {
      continue;
    }
    let image = load(entry.path()).unwrap();
    let expected = if image.bits_per_pixel() == 8 { (13, 9) } else { (11, 7) };
    assert_eq!((image.width(), image.height()), expected, "{}", entry.path().display());
    decoded += 1;
  }
  assert_eq!(decoded, written);
}

#[test]
fn test_session_round_trip_through_files() {
  let dir = scratch_dir("session_round_trip");
  let (gray_path, _) = write_inputs(&dir);
  let mut session = Session::new();
  let info = session.open(&gray_path).unwrap();
  assert_eq!((info.width, info.height, info.bits_per_pixel), (13, 9, 8));
  let original = session.image().cloned().unwrap();

  let copy_path = dir.join("copy.bmp");
  session.save(&copy_path).unwrap();
  assert_eq!(std::fs::read(&copy_path).unwrap(), std::fs::read(&gray_path).unwrap());

  session.apply("negative".parse().unwrap()).unwrap();
  session.apply("negative".parse().unwrap()).unwrap();
  assert_eq!(session.image(), Some(&original));

  assert_eq!(session.close(), Some(original));
  assert!(matches!(session.info(), Err(BmpError::NoImage)));
}

#[test]
fn test_bad_files_are_reported() {
  let dir = scratch_dir("bad_files");
  let junk = dir.join("junk.bmp");
  std::fs::write(&junk, b"definitely not a bitmap").unwrap();
  let mut session = Session::new();
  let err = session.open(&junk).unwrap_err();
  assert!(err.is_format_error(), "{err}");
  assert!(session.image().is_none());
  assert!(matches!(session.open(dir.join("missing.bmp")), Err(BmpError::Io(_))));
}

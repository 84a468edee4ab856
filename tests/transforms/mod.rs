use bmpkit::{
  convolve, equalize::equalization_map, equalize::histogram, r8g8b8_Srgb, BitmapImage,
  BorderPolicy, Grid, IndexedImage, Kernel, NamedFilter, TruecolorImage,
};

fn random_gray(width: u32, height: u32) -> IndexedImage {
  let grid = Grid::from_vec(width, height, super::rand_bytes((width * height) as usize)).unwrap();
  IndexedImage::new_grayscale(grid).unwrap()
}

fn random_color(width: u32, height: u32) -> TruecolorImage {
  let pixels = super::rand_bytes((width * height * 3) as usize)
    .chunks_exact(3)
    .map(|c| r8g8b8_Srgb { r: c[0], g: c[1], b: c[2] })
    .collect();
  TruecolorImage::new(Grid::from_vec(width, height, pixels).unwrap())
}

#[test]
fn test_negative_twice_is_identity() {
  let gray: BitmapImage = random_gray(7, 5).into();
  let color: BitmapImage = random_color(6, 4).into();
  for original in [gray, color] {
    let mut image = original.clone();
    image.negative();
    assert_ne!(image, original);
    image.negative();
    assert_eq!(image, original);
  }
}

#[test]
fn test_threshold_is_idempotent() {
  for level in [-1, 0, 1, 100, 128, 255, 256] {
    let mut image = random_gray(9, 9);
    image.threshold(level);
    let once = image.clone();
    image.threshold(level);
    assert_eq!(image, once);
    assert!(image.grid().pixels().iter().all(|&v| v == 0 || v == 255));
  }
}

#[test]
fn test_grayscale_leaves_gray_pixels() {
  let pixels = (0..=255_u8).map(|v| r8g8b8_Srgb { r: v, g: v, b: v }).collect();
  let mut image = TruecolorImage::new(Grid::from_vec(16, 16, pixels).unwrap());
  let before = image.clone();
  image.grayscale();
  assert_eq!(image, before);

  let mut image = random_color(4, 4);
  image.grayscale();
  let once = image.clone();
  image.grayscale();
  assert_eq!(image, once);
}

#[test]
fn test_identity_kernel_everywhere() {
  let kernel = Kernel::identity(3).unwrap();
  for policy in [BorderPolicy::PassThrough, BorderPolicy::PartialSum] {
    let gray = random_gray(6, 5);
    assert_eq!(&convolve(gray.grid(), &kernel, policy).unwrap(), gray.grid());
    let color = random_color(5, 6);
    assert_eq!(&convolve(color.grid(), &kernel, policy).unwrap(), color.grid());
  }
  let big = Kernel::identity(5).unwrap();
  let gray = random_gray(9, 9);
  assert_eq!(&convolve(gray.grid(), &big, BorderPolicy::PartialSum).unwrap(), gray.grid());
}

#[test]
fn test_brightness_up_then_down() {
  let pixels = super::rand_bytes(64).into_iter().map(|v| 50 + v % 156).collect();
  let original = IndexedImage::new_grayscale(Grid::from_vec(8, 8, pixels).unwrap()).unwrap();
  let mut image = original.clone();
  image.brightness(50);
  image.brightness(-50);
  assert_eq!(image, original);
}

#[test]
fn test_brightness_up_then_down_truecolor() {
  let pixels = super::rand_bytes(6 * 5 * 3)
    .chunks_exact(3)
    .map(|c| r8g8b8_Srgb { r: 60 + c[0] % 136, g: 60 + c[1] % 136, b: 60 + c[2] % 136 })
    .collect();
  let original = TruecolorImage::new(Grid::from_vec(6, 5, pixels).unwrap());
  let mut image = original.clone();
  image.brightness(-60);
  image.brightness(60);
  assert_eq!(image, original);
}

#[test]
fn test_brightness_past_white() {
  let grid = Grid::try_new(4, 4, r8g8b8_Srgb { r: 0, g: 0, b: 0 }).unwrap();
  let mut image = TruecolorImage::new(grid);
  image.brightness(300);
  let white = r8g8b8_Srgb { r: 255, g: 255, b: 255 };
  assert!(image.grid().pixels().iter().all(|&p| p == white));
}

#[test]
fn test_equalize_spreads_four_levels() {
  let grid = Grid::from_vec(2, 2, vec![0, 64, 128, 255]).unwrap();
  let mut image = IndexedImage::new_grayscale(grid).unwrap();
  image.equalize();
  let out = image.grid().pixels();
  assert!(out.windows(2).all(|w| w[0] < w[1]), "{out:?}");
  assert_eq!(out[0], 0);
  assert_eq!(out[3], 255);
}

#[test]
fn test_equalize_single_level() {
  let mut image = IndexedImage::new_grayscale(Grid::try_new(5, 3, 140).unwrap()).unwrap();
  image.equalize();
  assert!(image.grid().pixels().iter().all(|&v| v == 0));
  assert!(equalization_map(&histogram(&[9])).iter().all(|&m| m == 0));
}

#[test]
fn test_filters_keep_dimensions() {
  for filter in NamedFilter::ALL {
    let mut image: BitmapImage = random_color(7, 3).into();
    image.apply_filter(filter).unwrap();
    assert_eq!((image.width(), image.height()), (7, 3));
    let mut image: BitmapImage = random_gray(1, 1).into();
    let before = image.clone();
    image.apply_filter(filter).unwrap();
    assert_eq!(image, before, "{filter} should pass a 1x1 image through");
  }
}

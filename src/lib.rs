#![forbid(unsafe_code)]

//! A crate for reading, writing, and filtering uncompressed BMP images.
//!
//! Two kinds of bitmap are handled: 8-bit indexed color (with a 256 entry
//! palette) and 24-bit truecolor. Once an image is decoded you can run the
//! point operations (negative, grayscale, brightness, threshold), the 3x3
//! convolution filters of [`NamedFilter`], or histogram equalization on it,
//! and then encode it again.
//!
//! ```no_run
//! # fn main() -> bmpkit::BmpResult<()> {
//! let mut image = bmpkit::load("lena_color.bmp")?;
//! image.apply_filter(bmpkit::NamedFilter::Sharpen)?;
//! image.equalize()?;
//! bmpkit::save(&image, "lena_sharp.bmp")?;
//! # Ok(())
//! # }
//! ```

#[cfg(target_pointer_width = "16")]
compile_error!("this crate assumes 32-bit or bigger pointers!");

mod error;
pub use error::*;

pub mod grid;
pub use grid::Grid;

mod util;

pub mod pixel;
pub use pixel::Channels;

pub mod image;
pub use image::*;

pub mod bmp;
pub use bmp::{decode, encode, load, save};

pub mod kernel;
pub use kernel::{Kernel, NamedFilter};

pub mod convolve;
pub use convolve::{convolve, BorderPolicy};

pub mod ops;

pub mod equalize;

pub mod session;
pub use session::{Session, Transform};

pub use pixel_formats::{r8g8b8_Srgb, r8g8b8a8_Srgb};

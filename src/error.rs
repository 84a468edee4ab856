use std::collections::TryReserveError;

/// An error from the `bmpkit` crate.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BmpError {
  /// The file couldn't be opened, read, or written.
  #[error("i/o error: {0}")]
  Io(#[from] std::io::Error),

  /// The first two bytes weren't `BM`.
  #[error("not a bitmap file: signature {0:#06x}, expected 0x4d42")]
  BadSignature(u16),

  /// Only the 40 byte `BITMAPINFOHEADER` is understood.
  #[error("unsupported info header size {0}, expected 40")]
  UnknownHeaderLength(u32),

  /// Any compression other than `BI_RGB`.
  #[error("unsupported compression {0}, only uncompressed data is handled")]
  UnsupportedCompression(u32),

  /// Width or height was zero or negative.
  #[error("illegal image dimensions {width}x{height}")]
  IllegalDimensions { width: i32, height: i32 },

  /// The data ended before something that the headers say must be there.
  #[error("truncated bitmap data: needed {needed} bytes, found {found}")]
  InsufficientBytes { needed: usize, found: usize },

  /// Bits per pixel other than 8 or 24.
  #[error("unsupported bit depth {0}, only 8 and 24 bits per pixel are handled")]
  UnsupportedDepth(u16),

  /// The allocator couldn't give us enough space.
  #[error("allocation failed")]
  Alloc,

  /// An argument that can't be used, such as an even kernel size.
  #[error("invalid parameter: {0}")]
  InvalidParameter(String),

  /// The operation only exists for the other bit depth.
  #[error("{op} is not available for {bits_per_pixel}-bit images")]
  DepthMismatch { op: &'static str, bits_per_pixel: u16 },

  /// A session command was given while no image is loaded.
  #[error("no image is loaded")]
  NoImage,
}
impl From<TryReserveError> for BmpError {
  #[inline]
  fn from(_: TryReserveError) -> Self {
    Self::Alloc
  }
}
impl BmpError {
  /// If this error came from malformed file contents (rather than I/O or a
  /// bad argument).
  #[inline]
  #[must_use]
  pub const fn is_format_error(&self) -> bool {
    matches!(
      self,
      Self::BadSignature(_)
        | Self::UnknownHeaderLength(_)
        | Self::UnsupportedCompression(_)
        | Self::IllegalDimensions { .. }
        | Self::InsufficientBytes { .. }
    )
  }
}

/// Shorthand for results with a [`BmpError`].
pub type BmpResult<T> = Result<T, BmpError>;

use core::{fmt, num::TryFromIntError};

/// An error from the `apple_png` crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplePngError {
  /// No input bytes were given at all.
  InvalidArgument,

  /// The bytes aren't a well formed PNG container.
  ///
  /// This covers a bad signature, chunk framing that runs off the end of the
  /// data, a CRC mismatch, a missing `IEND`, a corrupt deflate stream, and
  /// decompressed data that doesn't match the header's geometry.
  MalformedContainer,

  /// The container is fine, but it isn't an Apple CgBI PNG that can be
  /// converted.
  NotAppleFormat,

  /// The allocator couldn't give us enough space.
  Alloc,
}
impl ApplePngError {
  /// A short human readable description.
  #[inline]
  #[must_use]
  pub const fn kind_name(self) -> &'static str {
    match self {
      Self::InvalidArgument => "no input data was given",
      Self::MalformedContainer => "the input is not well formed PNG data",
      Self::NotAppleFormat => "the input is not a valid Apple PNG",
      Self::Alloc => "ran out of memory while processing the PNG data",
    }
  }
}
impl fmt::Display for ApplePngError {
  #[inline]
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.kind_name())
  }
}
#[cfg(feature = "std")]
impl std::error::Error for ApplePngError {}

impl From<alloc::collections::TryReserveError> for ApplePngError {
  #[inline]
  fn from(_: alloc::collections::TryReserveError) -> Self {
    Self::Alloc
  }
}
impl From<TryFromIntError> for ApplePngError {
  #[inline]
  fn from(_: TryFromIntError) -> Self {
    Self::MalformedContainer
  }
}

/// Result alias used throughout the crate.
pub type ApplePngResult<T> = Result<T, ApplePngError>;

#![forbid(unsafe_code)]

//! An owned Apple PNG with a lazily converted standard PNG.

use alloc::vec::Vec;
use log::debug;

use crate::{
  options::ConvertOptions,
  png::{convert_cgbi_png_with_options, png_get_dimensions},
  ApplePngError, ApplePngResult,
};

/// Where the conversion of an [`ApplePng`] is at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionState {
  /// Conversion hasn't been attempted.
  NotStarted,
  /// Conversion worked, these are the standard PNG bytes.
  Computed(Vec<u8>),
  /// The last conversion attempt failed with this error.
  ///
  /// This isn't a cached answer: the next request tries again (and, since
  /// the input can't change, fails again the same way).
  Failed(ApplePngError),
}

/// Apple CgBI PNG data along with its dimensions.
///
/// The dimensions are read when the value is made. The conversion to a
/// standard PNG happens the first time [`data`](ApplePng::data) is called,
/// and the result is kept for all later calls. The original bytes are always
/// kept too, so they're available even if conversion fails.
///
/// ```no_run
/// use apple_png::ApplePng;
/// let bytes: Vec<u8> = unimplemented!("data from somewhere");
/// let mut png = ApplePng::new(bytes)?;
/// println!("{}x{}", png.width(), png.height());
/// let standard_png: &[u8] = png.data()?;
/// # Ok::<(), apple_png::ApplePngError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplePng {
  width: u32,
  height: u32,
  raw_data: Vec<u8>,
  options: ConvertOptions,
  state: ConversionState,
}
impl ApplePng {
  /// Takes in Apple PNG bytes and reads the dimensions.
  ///
  /// ## Failure
  /// * Empty input is [`InvalidArgument`](ApplePngError::InvalidArgument).
  /// * Anything that [`png_get_dimensions`] can't read.
  ///
  /// Problems with the rest of the data only show up when calling
  /// [`data`](ApplePng::data).
  #[inline]
  pub fn new(apple_png_data: impl Into<Vec<u8>>) -> ApplePngResult<Self> {
    Self::with_options(apple_png_data, ConvertOptions::default())
  }

  /// As [`new`](ApplePng::new), with non-default conversion options.
  pub fn with_options(
    apple_png_data: impl Into<Vec<u8>>, options: ConvertOptions,
  ) -> ApplePngResult<Self> {
    let raw_data: Vec<u8> = apple_png_data.into();
    if raw_data.is_empty() {
      return Err(ApplePngError::InvalidArgument);
    }
    let (width, height) = png_get_dimensions(&raw_data)?;
    debug!("new ApplePng, {width}x{height}, {} bytes", raw_data.len());
    Ok(Self { width, height, raw_data, options, state: ConversionState::NotStarted })
  }

  /// Width in pixels.
  #[inline]
  #[must_use]
  pub const fn width(&self) -> u32 {
    self.width
  }

  /// Height in pixels.
  #[inline]
  #[must_use]
  pub const fn height(&self) -> u32 {
    self.height
  }

  /// The original bytes, exactly as given.
  #[inline]
  #[must_use]
  pub fn raw_data(&self) -> &[u8] {
    &self.raw_data
  }

  /// The options used for conversion.
  #[inline]
  #[must_use]
  pub const fn options(&self) -> &ConvertOptions {
    &self.options
  }

  /// The conversion state, without attempting any conversion.
  #[inline]
  #[must_use]
  pub const fn state(&self) -> &ConversionState {
    &self.state
  }

  /// If the standard PNG bytes are already computed.
  #[inline]
  #[must_use]
  pub fn is_converted(&self) -> bool {
    matches!(self.state, ConversionState::Computed(_))
  }

  /// Gets the standard PNG bytes, converting on the first call.
  ///
  /// Later calls give back the same bytes without converting again. If
  /// conversion fails the error is returned, and every later call tries again
  /// and gives the same error.
  pub fn data(&mut self) -> ApplePngResult<&[u8]> {
    if !self.is_converted() {
      match convert_cgbi_png_with_options(&self.raw_data, &self.options) {
        Ok(bytes) => self.state = ConversionState::Computed(bytes),
        Err(e) => {
          debug!("conversion failed: {e}");
          self.state = ConversionState::Failed(e);
          return Err(e);
        }
      }
    }
    let ConversionState::Computed(bytes) = &self.state else {
      unreachable!("we already know that the conversion worked")
    };
    Ok(bytes)
  }

  /// Gives back the standard PNG bytes, converting if that hasn't happened
  /// yet, and drops the original data.
  pub fn into_data(self) -> ApplePngResult<Vec<u8>> {
    match self.state {
      ConversionState::Computed(bytes) => Ok(bytes),
      _ => convert_cgbi_png_with_options(&self.raw_data, &self.options),
    }
  }
}
impl TryFrom<Option<Vec<u8>>> for ApplePng {
  type Error = ApplePngError;
  /// `None` is an [`InvalidArgument`](ApplePngError::InvalidArgument) error.
  #[inline]
  fn try_from(value: Option<Vec<u8>>) -> Result<Self, Self::Error> {
    value.map_or(Err(ApplePngError::InvalidArgument), Self::new)
  }
}
impl TryFrom<&[u8]> for ApplePng {
  type Error = ApplePngError;
  #[inline]
  fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
    Self::new(value)
  }
}

use super::*;

/// The types of color that PNG supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PngColorType {
  /// Greyscale
  Y = 0,
  /// Red, Green, Blue
  RGB = 2,
  /// Index into a palette.
  Index = 3,
  /// Greyscale + Alpha
  YA = 4,
  /// Red, Green, Blue, Alpha
  ///
  /// In a CgBI file the channels are actually stored as Blue, Green, Red,
  /// Alpha, with the color premultiplied.
  RGBA = 6,
}
impl PngColorType {
  /// The number of channels in this type of color.
  #[inline]
  #[must_use]
  pub const fn channel_count(self) -> usize {
    match self {
      Self::Y => 1,
      Self::RGB => 3,
      Self::Index => 1,
      Self::YA => 2,
      Self::RGBA => 4,
    }
  }
}
impl TryFrom<u8> for PngColorType {
  type Error = ApplePngError;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => PngColorType::Y,
      2 => PngColorType::RGB,
      3 => PngColorType::Index,
      4 => PngColorType::YA,
      6 => PngColorType::RGBA,
      _ => return Err(ApplePngError::MalformedContainer),
    })
  }
}

/// Image Header
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IHDR {
  /// width in pixels
  pub width: u32,
  /// height in pixels
  pub height: u32,
  /// bits per channel
  pub bit_depth: u8,
  /// pixel color type
  pub color_type: PngColorType,
  /// if the image data is stored interlaced.
  pub is_interlaced: bool,
}
impl IHDR {
  /// Bits used by one pixel.
  #[inline]
  #[must_use]
  pub const fn bits_per_pixel(&self) -> usize {
    (self.bit_depth as usize) * self.color_type.channel_count()
  }

  /// The filter distance: bytes per complete pixel, rounded up to 1.
  #[inline]
  #[must_use]
  pub const fn filter_bpp(&self) -> usize {
    let bytes = self.bits_per_pixel() / 8;
    if bytes == 0 {
      1
    } else {
      bytes
    }
  }

  /// Bytes per scanline including the leading filter type byte.
  ///
  /// `None` if the math overflows.
  #[inline]
  #[must_use]
  pub fn bytes_per_filterline(&self) -> Option<usize> {
    let bits_per_line = self.bits_per_pixel().checked_mul(self.width as usize)?;
    let bytes_per_scanline = (bits_per_line / 8) + (bits_per_line % 8 != 0) as usize;
    bytes_per_scanline.checked_add(1)
  }

  /// Gets the exact number of bytes the decompressed (still filtered) pixel
  /// data must have for a non-interlaced image.
  #[inline]
  #[must_use]
  pub fn get_zlib_decompression_requirement(&self) -> Option<usize> {
    self.bytes_per_filterline()?.checked_mul(self.height as usize)
  }

  /// If this header describes the pixel layout that CgBI conversion supports:
  /// 8-bit, four channel, non-interlaced.
  #[inline]
  #[must_use]
  pub const fn is_cgbi_convertible(&self) -> bool {
    self.bit_depth == 8
      && matches!(self.color_type, PngColorType::RGBA)
      && !self.is_interlaced
  }

  /// Serializes back to the 13 bytes of `IHDR` chunk data.
  #[inline]
  #[must_use]
  pub fn to_bytes(&self) -> [u8; 13] {
    let mut out = [0_u8; 13];
    out[0..4].copy_from_slice(&self.width.to_be_bytes());
    out[4..8].copy_from_slice(&self.height.to_be_bytes());
    out[8] = self.bit_depth;
    out[9] = self.color_type as u8;
    // compression method and filter method are always 0
    out[12] = self.is_interlaced as u8;
    out
  }
}
impl TryFrom<&[u8]> for IHDR {
  type Error = ApplePngError;
  fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
    match value {
      [w0, w1, w2, w3, h0, h1, h2, h3, bit_depth, color_type, 0, 0, interlace_method] => Ok(Self {
        width: u32::from_be_bytes([*w0, *w1, *w2, *w3]),
        height: u32::from_be_bytes([*h0, *h1, *h2, *h3]),
        bit_depth: match *color_type {
          0 if [1, 2, 4, 8, 16].contains(bit_depth) => *bit_depth,
          2 if [8, 16].contains(bit_depth) => *bit_depth,
          3 if [1, 2, 4, 8].contains(bit_depth) => *bit_depth,
          4 if [8, 16].contains(bit_depth) => *bit_depth,
          6 if [8, 16].contains(bit_depth) => *bit_depth,
          _ => return Err(ApplePngError::MalformedContainer),
        },
        color_type: PngColorType::try_from(*color_type)?,
        is_interlaced: match interlace_method {
          0 => false,
          1 => true,
          _ => return Err(ApplePngError::MalformedContainer),
        },
      }),
      _ => Err(ApplePngError::MalformedContainer),
    }
  }
}

/// Walks the chunks (without checking CRCs) until the first `IHDR`.
///
/// Chunks before the `IHDR` (such as `CgBI`) are skipped. Nothing after the
/// `IHDR` is looked at.
fn find_ihdr_data(png: &[u8]) -> ApplePngResult<&[u8]> {
  if png.is_empty() {
    return Err(ApplePngError::InvalidArgument);
  }
  if !is_png_signature_correct(png) {
    return Err(ApplePngError::MalformedContainer);
  }
  for chunk in PngRawChunkIter::new(png) {
    let chunk = chunk?;
    match chunk.chunk_type() {
      PngRawChunkType::IHDR => return Ok(chunk.data()),
      PngRawChunkType::IEND => break,
      other => trace!("skipping {other:?} while looking for IHDR"),
    }
  }
  Err(ApplePngError::NotAppleFormat)
}

/// Reads `(width, height)` from a PNG without decoding anything else.
///
/// This only needs the first 8 bytes of the `IHDR` data, so it works even when
/// the rest of the header (or the rest of the file) wouldn't survive a full
/// conversion.
///
/// ## Failure
/// * Empty input: [`InvalidArgument`](ApplePngError::InvalidArgument)
/// * Bad signature, or the chunk framing breaks before an `IHDR` is found:
///   [`MalformedContainer`](ApplePngError::MalformedContainer)
/// * No `IHDR` at all: [`NotAppleFormat`](ApplePngError::NotAppleFormat)
pub fn png_get_dimensions(png: &[u8]) -> ApplePngResult<(u32, u32)> {
  let data = find_ihdr_data(png)?;
  let (width, rest) = try_pull_u32_be(data).ok_or(ApplePngError::MalformedContainer)?;
  let (height, _) = try_pull_u32_be(rest).ok_or(ApplePngError::MalformedContainer)?;
  Ok((width, height))
}

/// Reads and fully validates the `IHDR` of a PNG.
pub fn png_get_header(png: &[u8]) -> ApplePngResult<IHDR> {
  let ihdr = IHDR::try_from(find_ihdr_data(png)?)?;
  info!("Width: {}", ihdr.width);
  info!("Height: {}", ihdr.height);
  info!("Color type: {:?}", ihdr.color_type);
  info!("Depth: {}", ihdr.bit_depth);
  info!("Interlaced: {}", ihdr.is_interlaced);
  Ok(ihdr)
}

#[test]
fn test_ihdr_round_trip_and_sizes() {
  let bytes = [0, 0, 2, 128, 0, 0, 3, 192, 8, 6, 0, 0, 0];
  let ihdr = IHDR::try_from(&bytes[..]).unwrap();
  assert_eq!(ihdr.width, 640);
  assert_eq!(ihdr.height, 960);
  assert!(ihdr.is_cgbi_convertible());
  assert_eq!(ihdr.filter_bpp(), 4);
  assert_eq!(ihdr.bytes_per_filterline(), Some(1 + 640 * 4));
  assert_eq!(ihdr.get_zlib_decompression_requirement(), Some(960 * (1 + 640 * 4)));
  assert_eq!(ihdr.to_bytes(), bytes);
}

#[test]
fn test_ihdr_rejects_bad_combinations() {
  // 16-bit palette
  assert!(IHDR::try_from(&[0, 0, 0, 1, 0, 0, 0, 1, 16, 3, 0, 0, 0][..]).is_err());
  // unknown interlace
  assert!(IHDR::try_from(&[0, 0, 0, 1, 0, 0, 0, 1, 8, 6, 0, 0, 2][..]).is_err());
  // unknown compression method
  assert!(IHDR::try_from(&[0, 0, 0, 1, 0, 0, 0, 1, 8, 6, 1, 0, 0][..]).is_err());
  // short
  assert!(IHDR::try_from(&[0, 0, 0, 1, 0, 0, 0, 1, 8, 6][..]).is_err());
  // valid but not convertible
  let rgb = IHDR::try_from(&[0, 0, 0, 1, 0, 0, 0, 1, 8, 2, 0, 0, 0][..]).unwrap();
  assert!(!rgb.is_cgbi_convertible());
}

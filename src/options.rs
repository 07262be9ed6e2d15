//! Knobs for the conversion.

/// The largest chunk payload the PNG format permits (2^31 - 1).
pub const PNG_MAX_CHUNK_LEN: usize = 0x7FFF_FFFF;

/// Options controlling how a CgBI PNG is converted.
///
/// The defaults reproduce the classic converter: CRCs are checked, the output
/// pixel data is compressed at level 6 into a single `IDAT`, and premultiplied
/// alpha is reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConvertOptions {
  confirm_crc: bool,
  max_width: u32,
  max_height: u32,
  compression_level: u8,
  max_idat_len: usize,
  unpremultiply: bool,
}
impl Default for ConvertOptions {
  #[inline]
  fn default() -> Self {
    Self {
      confirm_crc: true,
      max_width: 1 << 17,
      max_height: 1 << 17,
      compression_level: 6,
      max_idat_len: PNG_MAX_CHUNK_LEN,
      unpremultiply: true,
    }
  }
}
impl ConvertOptions {
  /// If the CRC of every input chunk is checked.
  #[inline]
  #[must_use]
  pub const fn confirm_crc(&self) -> bool {
    self.confirm_crc
  }
  /// Maximum accepted image width.
  #[inline]
  #[must_use]
  pub const fn max_width(&self) -> u32 {
    self.max_width
  }
  /// Maximum accepted image height.
  #[inline]
  #[must_use]
  pub const fn max_height(&self) -> u32 {
    self.max_height
  }
  /// Deflate level used for the output pixel data.
  #[inline]
  #[must_use]
  pub const fn compression_level(&self) -> u8 {
    self.compression_level
  }
  /// Largest payload of a single emitted `IDAT` chunk.
  #[inline]
  #[must_use]
  pub const fn max_idat_len(&self) -> usize {
    self.max_idat_len
  }
  /// If premultiplied alpha is reversed.
  #[inline]
  #[must_use]
  pub const fn unpremultiply(&self) -> bool {
    self.unpremultiply
  }

  /// Set whether chunk CRCs must match.
  #[inline]
  #[must_use]
  pub const fn set_confirm_crc(mut self, yes: bool) -> Self {
    self.confirm_crc = yes;
    self
  }
  /// Set the maximum accepted width.
  #[inline]
  #[must_use]
  pub const fn set_max_width(mut self, width: u32) -> Self {
    self.max_width = width;
    self
  }
  /// Set the maximum accepted height.
  #[inline]
  #[must_use]
  pub const fn set_max_height(mut self, height: u32) -> Self {
    self.max_height = height;
    self
  }
  /// Set the deflate level. Values above 10 are clamped to 10.
  #[inline]
  #[must_use]
  pub const fn set_compression_level(mut self, level: u8) -> Self {
    self.compression_level = if level > 10 { 10 } else { level };
    self
  }
  /// Set the largest payload per output `IDAT` chunk.
  ///
  /// The value is clamped to `1..=PNG_MAX_CHUNK_LEN`.
  #[inline]
  #[must_use]
  pub const fn set_max_idat_len(mut self, len: usize) -> Self {
    self.max_idat_len = if len == 0 {
      1
    } else if len > PNG_MAX_CHUNK_LEN {
      PNG_MAX_CHUNK_LEN
    } else {
      len
    };
    self
  }
  /// Set whether premultiplied alpha is reversed.
  ///
  /// When this is off only the red and blue channels are swapped, and that's
  /// done directly on the filtered scanlines.
  #[inline]
  #[must_use]
  pub const fn set_unpremultiply(mut self, yes: bool) -> Self {
    self.unpremultiply = yes;
    self
  }
}

#[test]
fn test_options_clamp() {
  let opts = ConvertOptions::default().set_compression_level(200).set_max_idat_len(0);
  assert_eq!(opts.compression_level(), 10);
  assert_eq!(opts.max_idat_len(), 1);
  let opts = opts.set_max_idat_len(usize::MAX);
  assert_eq!(opts.max_idat_len(), PNG_MAX_CHUNK_LEN);
}

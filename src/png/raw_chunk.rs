use super::*;

/// The four byte tag of a PNG chunk.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PngRawChunkType(pub [u8; 4]);
#[allow(nonstandard_style)]
impl PngRawChunkType {
  /// Image Header
  pub const IHDR: Self = Self(*b"IHDR");
  /// Image Data
  pub const IDAT: Self = Self(*b"IDAT");
  /// Image End
  pub const IEND: Self = Self(*b"IEND");
  /// Apple's marker for "device optimized" pixel data.
  pub const CgBI: Self = Self(*b"CgBI");

  /// Critical chunks have an uppercase first letter.
  #[inline]
  #[must_use]
  pub const fn is_critical(self) -> bool {
    (self.0[0] & (1 << 5)) == 0
  }
}
impl Debug for PngRawChunkType {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_char(self.0[0] as char)?;
    f.write_char(self.0[1] as char)?;
    f.write_char(self.0[2] as char)?;
    f.write_char(self.0[3] as char)?;
    Ok(())
  }
}

/// An unparsed chunk from a PNG.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PngRawChunk<'b> {
  pub(crate) type_: PngRawChunkType,
  pub(crate) data: &'b [u8],
  pub(crate) declared_crc: u32,
}
impl Debug for PngRawChunk<'_> {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("PngRawChunk")
      .field("type_", &self.type_)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .field("declared_crc", &self.declared_crc)
      .finish()
  }
}
impl<'b> PngRawChunk<'b> {
  #[inline]
  #[must_use]
  pub const fn chunk_type(&self) -> PngRawChunkType {
    self.type_
  }
  #[inline]
  #[must_use]
  pub const fn data(&self) -> &'b [u8] {
    self.data
  }
  #[inline]
  #[must_use]
  pub const fn declared_crc(&self) -> u32 {
    self.declared_crc
  }
  /// The CRC that the chunk's type and data actually hash to.
  #[inline]
  #[must_use]
  pub fn actual_crc(&self) -> u32 {
    png_crc(self.type_.0, self.data)
  }
}

/// An iterator that produces successive raw chunks from PNG bytes.
///
/// Unlike a lenient chunk walk, any framing problem (a length that runs past
/// the end of the data, or a partial chunk) produces one
/// [`MalformedContainer`](ApplePngError::MalformedContainer) error and then
/// the iterator is finished.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PngRawChunkIter<'b>(pub(crate) &'b [u8]);
impl<'b> PngRawChunkIter<'b> {
  /// Pass the full PNG bytes, it will remove the PNG signature automatically.
  ///
  /// The signature isn't checked, use [`is_png_signature_correct`] for that.
  #[inline]
  pub const fn new(bytes: &'b [u8]) -> Self {
    match bytes {
      [_, _, _, _, _, _, _, _, rest @ ..] => Self(rest),
      _ => Self(&[]),
    }
  }

  /// The bytes that haven't been walked yet.
  #[inline]
  #[must_use]
  pub const fn remaining(&self) -> &'b [u8] {
    self.0
  }

  #[inline]
  fn pull_chunk(&mut self) -> Option<PngRawChunk<'b>> {
    let (chunk_len, rest) = try_pull_u32_be(self.0)?;
    if chunk_len as usize > PNG_MAX_CHUNK_LEN {
      return None;
    }
    let (type_bytes, rest) = try_pull_byte_array::<4>(rest)?;
    if rest.len() < chunk_len as usize {
      return None;
    }
    let (data, rest) = rest.split_at(chunk_len as usize);
    let (declared_crc, rest) = try_pull_u32_be(rest)?;
    self.0 = rest;
    Some(PngRawChunk { type_: PngRawChunkType(type_bytes), data, declared_crc })
  }
}
impl<'b> Iterator for PngRawChunkIter<'b> {
  type Item = ApplePngResult<PngRawChunk<'b>>;
  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    if self.0.is_empty() {
      return None;
    }
    match self.pull_chunk() {
      Some(chunk) => Some(Ok(chunk)),
      None => {
        trace!("chunk framing overruns the data with {} bytes left", self.0.len());
        self.0 = &[];
        Some(Err(ApplePngError::MalformedContainer))
      }
    }
  }
}

/// Checks that the first 8 bytes are the PNG signature.
#[inline]
#[must_use]
pub fn is_png_signature_correct(bytes: &[u8]) -> bool {
  bytes.get(..8) == Some(&PNG_SIGNATURE[..])
}

/// Parses a complete PNG container into its chunks, ending with `IEND`.
///
/// * Empty input is an [`InvalidArgument`](ApplePngError::InvalidArgument)
///   error.
/// * A bad signature, bad framing, a CRC mismatch (when `confirm_crc` is set),
///   or running out of data before `IEND` is a
///   [`MalformedContainer`](ApplePngError::MalformedContainer) error.
///
/// Bytes after the `IEND` chunk are ignored.
pub fn png_get_chunks(png: &[u8], confirm_crc: bool) -> ApplePngResult<Vec<PngRawChunk<'_>>> {
  if png.is_empty() {
    return Err(ApplePngError::InvalidArgument);
  }
  if !is_png_signature_correct(png) {
    return Err(ApplePngError::MalformedContainer);
  }
  let mut out = Vec::new();
  let mut it = PngRawChunkIter::new(png);
  while let Some(chunk) = it.next() {
    let chunk = chunk?;
    if confirm_crc && chunk.actual_crc() != chunk.declared_crc() {
      debug!(
        "CRC mismatch in {:?}: declared {:08X}, actual {:08X}",
        chunk.chunk_type(),
        chunk.declared_crc(),
        chunk.actual_crc()
      );
      return Err(ApplePngError::MalformedContainer);
    }
    out.try_reserve(1)?;
    out.push(chunk);
    if chunk.chunk_type() == PngRawChunkType::IEND {
      if !it.remaining().is_empty() {
        warn!("ignoring {} bytes after IEND", it.remaining().len());
      }
      debug!("parsed {} chunks", out.len());
      return Ok(out);
    }
  }
  debug!("PNG data ended without an IEND chunk");
  Err(ApplePngError::MalformedContainer)
}

#[test]
fn test_chunk_type_is_critical() {
  assert!(PngRawChunkType::IHDR.is_critical());
  assert!(PngRawChunkType::CgBI.is_critical());
  assert!(!PngRawChunkType(*b"iDOT").is_critical());
  assert!(!PngRawChunkType(*b"tEXt").is_critical());
}

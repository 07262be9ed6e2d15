use super::*;

/// Builds a PNG byte stream one chunk at a time.
///
/// The signature is written on creation, and every chunk gets its length and
/// CRC computed here, so the caller only supplies chunk types and data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngWriter {
  out: Vec<u8>,
}
impl PngWriter {
  /// Starts a new stream, reserving `capacity` bytes up front.
  #[inline]
  pub fn with_capacity(capacity: usize) -> ApplePngResult<Self> {
    let mut out = Vec::new();
    out.try_reserve(capacity.max(PNG_SIGNATURE.len()))?;
    out.extend_from_slice(&PNG_SIGNATURE);
    Ok(Self { out })
  }

  /// Appends one chunk: length, type, data, CRC.
  pub fn write_chunk(&mut self, chunk_ty: PngRawChunkType, data: &[u8]) -> ApplePngResult<()> {
    if data.len() > PNG_MAX_CHUNK_LEN {
      return Err(ApplePngError::MalformedContainer);
    }
    let len = u32::try_from(data.len())?;
    self.out.try_reserve(12 + data.len())?;
    self.out.extend_from_slice(&len.to_be_bytes());
    self.out.extend_from_slice(&chunk_ty.0);
    self.out.extend_from_slice(data);
    self.out.extend_from_slice(&png_crc(chunk_ty.0, data).to_be_bytes());
    trace!("wrote {chunk_ty:?} with {} bytes of data", data.len());
    Ok(())
  }

  /// Writes a zlib stream as one or more `IDAT` chunks of at most
  /// `max_chunk_len` bytes each.
  pub fn write_idat_chunks(&mut self, zlib: &[u8], max_chunk_len: usize) -> ApplePngResult<()> {
    let max_chunk_len = max_chunk_len.clamp(1, PNG_MAX_CHUNK_LEN);
    let mut count = 0_usize;
    for part in zlib.chunks(max_chunk_len) {
      self.write_chunk(PngRawChunkType::IDAT, part)?;
      count += 1;
    }
    debug!("wrote {} bytes of image data as {count} IDAT chunks", zlib.len());
    Ok(())
  }

  /// Bytes written so far, signature included.
  #[inline]
  #[must_use]
  pub fn bytes_written(&self) -> usize {
    self.out.len()
  }

  /// Finishes the stream and gives back the bytes.
  #[inline]
  #[must_use]
  pub fn finish(self) -> Vec<u8> {
    self.out
  }
}

#[test]
fn test_writer_framing() {
  let mut w = PngWriter::with_capacity(0).unwrap();
  w.write_chunk(PngRawChunkType::IEND, &[]).unwrap();
  assert_eq!(
    w.finish(),
    [137, 80, 78, 71, 13, 10, 26, 10, 0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82]
  );
}

#[test]
fn test_writer_splits_idat() {
  let mut w = PngWriter::with_capacity(64).unwrap();
  w.write_idat_chunks(&[1, 2, 3, 4, 5], 2).unwrap();
  let bytes = w.finish();
  let chunks: Vec<_> = PngRawChunkIter::new(&bytes).map(Result::unwrap).collect();
  assert_eq!(chunks.len(), 3);
  assert!(chunks.iter().all(|c| c.chunk_type() == PngRawChunkType::IDAT));
  assert!(chunks.iter().all(|c| c.actual_crc() == c.declared_crc()));
  assert_eq!(chunks[0].data(), &[1, 2]);
  assert_eq!(chunks[1].data(), &[3, 4]);
  assert_eq!(chunks[2].data(), &[5]);
}

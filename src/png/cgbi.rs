//! Detecting CgBI PNGs and converting them to standard PNGs.

use super::*;

/// Finds the `CgBI` chunk, if any.
#[inline]
#[must_use]
pub fn cgbi_get_chunk<'b>(chunks: &[PngRawChunk<'b>]) -> Option<PngRawChunk<'b>> {
  chunks.iter().copied().find(|c| c.chunk_type() == PngRawChunkType::CgBI)
}

/// Quick check for a CgBI PNG.
///
/// The signature must be right and a `CgBI` chunk must show up before the
/// first `IDAT`. CRCs aren't checked and the walk stops quietly at the first
/// framing error, so a `true` here doesn't promise that conversion works.
#[must_use]
pub fn is_cgbi_png(png: &[u8]) -> bool {
  if !is_png_signature_correct(png) {
    return false;
  }
  for chunk in PngRawChunkIter::new(png) {
    match chunk.map(|c| c.chunk_type()) {
      Ok(PngRawChunkType::CgBI) => return true,
      Ok(PngRawChunkType::IDAT) | Ok(PngRawChunkType::IEND) | Err(_) => return false,
      Ok(_) => continue,
    }
  }
  false
}

/// Checks the chunk list of a CgBI PNG and pulls out its header.
///
/// The `CgBI` chunk has to be present, and the first chunk that isn't `CgBI`
/// has to be the only `IHDR`.
fn cgbi_get_header(chunks: &[PngRawChunk<'_>]) -> ApplePngResult<IHDR> {
  let cgbi = cgbi_get_chunk(chunks).ok_or_else(|| {
    debug!("no CgBI chunk present");
    ApplePngError::NotAppleFormat
  })?;
  trace!("CgBI chunk data: {:02X?}", cgbi.data());
  let first = chunks
    .iter()
    .find(|c| c.chunk_type() != PngRawChunkType::CgBI)
    .ok_or(ApplePngError::MalformedContainer)?;
  if first.chunk_type() != PngRawChunkType::IHDR {
    debug!("first chunk after CgBI is {:?}, not IHDR", first.chunk_type());
    return Err(ApplePngError::MalformedContainer);
  }
  if chunks.iter().filter(|c| c.chunk_type() == PngRawChunkType::IHDR).count() != 1 {
    debug!("more than one IHDR");
    return Err(ApplePngError::MalformedContainer);
  }
  IHDR::try_from(first.data())
}

/// Converts a CgBI PNG to a standard PNG, using the default options.
///
/// See [`convert_cgbi_png_with_options`].
#[inline]
pub fn convert_cgbi_png(png: &[u8]) -> ApplePngResult<Vec<u8>> {
  convert_cgbi_png_with_options(png, &ConvertOptions::default())
}

/// Converts a CgBI PNG to a standard PNG.
///
/// 1) The container is parsed (and CRCs checked, if enabled).
/// 2) The `CgBI` chunk must be present, else this isn't an Apple PNG.
/// 3) All `IDAT` data is inflated as one raw deflate stream, into a buffer
///    sized exactly by the header.
/// 4) The pixels get their red and blue swapped, and their alpha
///    premultiplication reversed (unless disabled in the options).
/// 5) The lines are deflated again as a zlib stream.
/// 6) All other chunks are written back out in the same order with new CRCs,
///    minus the `CgBI` chunk, and with the new `IDAT` chunk(s) where the first
///    old `IDAT` was.
///
/// ## Failure
/// * [`InvalidArgument`](ApplePngError::InvalidArgument): empty input.
/// * [`MalformedContainer`](ApplePngError::MalformedContainer): broken
///   framing, a bad CRC, a bad or misplaced header, dimensions over the
///   configured limits, no image data, a corrupt deflate stream, or the wrong
///   amount of pixel data.
/// * [`NotAppleFormat`](ApplePngError::NotAppleFormat): no `CgBI` chunk, or a
///   pixel format other than 8-bit four channel non-interlaced.
/// * [`Alloc`](ApplePngError::Alloc): buffers couldn't be allocated.
pub fn convert_cgbi_png_with_options(
  png: &[u8], options: &ConvertOptions,
) -> ApplePngResult<Vec<u8>> {
  let chunks = png_get_chunks(png, options.confirm_crc())?;
  let ihdr = cgbi_get_header(&chunks)?;
  info!("Width: {}", ihdr.width);
  info!("Height: {}", ihdr.height);
  info!("Color type: {:?}", ihdr.color_type);
  info!("Depth: {}", ihdr.bit_depth);
  if !ihdr.is_cgbi_convertible() {
    debug!("unsupported CgBI pixel layout: {ihdr:?}");
    return Err(ApplePngError::NotAppleFormat);
  }
  if ihdr.width == 0 || ihdr.height == 0 {
    return Err(ApplePngError::MalformedContainer);
  }
  if ihdr.width > options.max_width() || ihdr.height > options.max_height() {
    debug!(
      "{}x{} is over the configured limit of {}x{}",
      ihdr.width,
      ihdr.height,
      options.max_width(),
      options.max_height()
    );
    return Err(ApplePngError::MalformedContainer);
  }
  let line_len = ihdr.bytes_per_filterline().ok_or(ApplePngError::MalformedContainer)?;
  let expected_len =
    ihdr.get_zlib_decompression_requirement().ok_or(ApplePngError::MalformedContainer)?;

  let mut idat_it = chunks.iter().filter(|c| c.chunk_type() == PngRawChunkType::IDAT).peekable();
  if idat_it.peek().is_none() {
    debug!("no IDAT chunks");
    return Err(ApplePngError::MalformedContainer);
  }
  let mut lines = inflate_cgbi_idat(idat_it.map(|c| c.data()), expected_len)?;

  let bpp = ihdr.filter_bpp();
  if options.unpremultiply() {
    unfilter_lines(&mut lines, line_len, bpp)?;
    unpremultiply_lines(&mut lines, line_len)?;
    refilter_lines(&mut lines, line_len, bpp)?;
  } else {
    swap_red_blue_lines(&mut lines, line_len)?;
  }
  let zlib = deflate_idat(&lines, options.compression_level());
  drop(lines);

  let mut writer = PngWriter::with_capacity(png.len().saturating_add(zlib.len()))?;
  let mut wrote_idat = false;
  for chunk in chunks.iter() {
    match chunk.chunk_type() {
      PngRawChunkType::CgBI => trace!("dropping the CgBI chunk"),
      PngRawChunkType::IDAT => {
        if !wrote_idat {
          writer.write_idat_chunks(&zlib, options.max_idat_len())?;
          wrote_idat = true;
        }
      }
      PngRawChunkType::IHDR => writer.write_chunk(PngRawChunkType::IHDR, &ihdr.to_bytes())?,
      other => {
        if other.is_critical() {
          trace!("passing through critical chunk {other:?}");
        }
        writer.write_chunk(other, chunk.data())?
      }
    }
  }
  debug!("converted {} input bytes into {} output bytes", png.len(), writer.bytes_written());
  Ok(writer.finish())
}

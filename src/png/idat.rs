use super::*;

use miniz_oxide::{deflate::compress_to_vec_zlib, inflate::decompress_slice_iter_to_slice};

/// The most output a deflate stream can make per input byte.
///
/// A length 258 match coded in two bits is the densest deflate gets.
pub const DEFLATE_MAX_RATIO: usize = 1032;

/// The largest inflated size that `compressed_len` bytes of deflate data can
/// possibly have.
#[inline]
#[must_use]
pub const fn deflate_inflate_bound(compressed_len: usize) -> usize {
  compressed_len.saturating_mul(DEFLATE_MAX_RATIO)
}

/// Decompresses the `IDAT` payloads of a CgBI PNG.
///
/// All the `IDAT` slices form one deflate stream. CgBI streams are raw deflate
/// without the zlib header and Adler-32 trailer that a normal PNG has.
///
/// The output buffer is allocated at exactly `expected_len` bytes, which is
/// what the image header says the filtered lines take up. A stream that
/// produces more or less than that is an error rather than being truncated or
/// padded. Before allocating, `expected_len` is checked against the most the
/// given compressed bytes could ever inflate to, so a tiny file with a huge
/// header fails without a huge allocation.
pub fn inflate_cgbi_idat<'b>(
  it: impl Iterator<Item = &'b [u8]>, expected_len: usize,
) -> ApplePngResult<Vec<u8>> {
  let slices: Vec<&'b [u8]> = it.collect();
  let compressed_len: usize = slices.iter().map(|s| s.len()).sum();
  if expected_len > deflate_inflate_bound(compressed_len) {
    debug!("{compressed_len} compressed bytes can't inflate to {expected_len} bytes");
    return Err(ApplePngError::MalformedContainer);
  }
  let mut out: Vec<u8> = Vec::new();
  out.try_reserve_exact(expected_len)?;
  out.resize(expected_len, 0);
  match decompress_slice_iter_to_slice(&mut out, slices.into_iter(), false, true) {
    Ok(count) if count == expected_len => {
      debug!("inflated {count} bytes of filtered pixel data");
      Ok(out)
    }
    Ok(count) => {
      debug!("inflated {count} bytes but the header requires {expected_len}");
      Err(ApplePngError::MalformedContainer)
    }
    Err(status) => {
      debug!("inflate of the pixel data failed: {status:?}");
      Err(ApplePngError::MalformedContainer)
    }
  }
}

/// Compresses filtered lines into a zlib stream for standard `IDAT` chunks.
///
/// The output only depends on the input bytes and the level.
#[inline]
#[must_use]
pub fn deflate_idat(filtered: &[u8], level: u8) -> Vec<u8> {
  let compressed = compress_to_vec_zlib(filtered, level);
  debug!("deflated {} bytes down to {} at level {level}", filtered.len(), compressed.len());
  compressed
}

//! Per-pixel fixes for CgBI pixel data.
//!
//! CgBI stores each 8-bit pixel as blue, green, red, alpha, with the color
//! channels already multiplied by alpha. Standard PNG wants red, green, blue,
//! alpha with "straight" (not multiplied) color.

use super::*;

use pixel_formats::r8g8b8a8_Srgb;

#[inline]
#[must_use]
const fn unpremultiply_channel(c: u8, a: u8) -> u8 {
  let v = (c as u32 * 255 + (a as u32) / 2) / (a as u32);
  if v > 255 {
    255
  } else {
    v as u8
  }
}

/// Converts one premultiplied BGRA pixel into a straight RGBA pixel.
///
/// A fully transparent pixel has no recoverable color, so it becomes all zero.
#[inline]
#[must_use]
pub const fn bgra_premultiplied_to_rgba(bgra: [u8; 4]) -> r8g8b8a8_Srgb {
  let [b, g, r, a] = bgra;
  match a {
    0 => r8g8b8a8_Srgb { r: 0, g: 0, b: 0, a: 0 },
    255 => r8g8b8a8_Srgb { r, g, b, a },
    _ => r8g8b8a8_Srgb {
      r: unpremultiply_channel(r, a),
      g: unpremultiply_channel(g, a),
      b: unpremultiply_channel(b, a),
      a,
    },
  }
}

#[inline]
fn line_pixels_mut(line: &mut [u8]) -> ApplePngResult<&mut [[u8; 4]]> {
  let pixels = line.get_mut(1..).ok_or(ApplePngError::MalformedContainer)?;
  bytemuck::try_cast_slice_mut(pixels).map_err(|_| ApplePngError::MalformedContainer)
}

/// Fixes every pixel of unfiltered lines in place: channel swap plus
/// un-premultiply.
///
/// Each line is a filter type byte followed by 4-byte pixels.
pub fn unpremultiply_lines(data: &mut [u8], line_len: usize) -> ApplePngResult<()> {
  if line_len == 0 || data.len() % line_len != 0 {
    return Err(ApplePngError::MalformedContainer);
  }
  for line in data.chunks_exact_mut(line_len) {
    for px in line_pixels_mut(line)? {
      let r8g8b8a8_Srgb { r, g, b, a } = bgra_premultiplied_to_rgba(*px);
      *px = [r, g, b, a];
    }
  }
  Ok(())
}

/// Swaps the blue and red channel of every pixel, in place, without touching
/// alpha.
///
/// Filters work on each byte position separately, so this is valid on
/// *filtered* lines too, which lets the swap skip the unfilter step entirely.
/// Each line's filter type byte must still be one of the five known filters.
pub fn swap_red_blue_lines(data: &mut [u8], line_len: usize) -> ApplePngResult<()> {
  if line_len == 0 || data.len() % line_len != 0 {
    return Err(ApplePngError::MalformedContainer);
  }
  for line in data.chunks_exact_mut(line_len) {
    if line[0] > 4 {
      debug!("unknown filter type {}", line[0]);
      return Err(ApplePngError::MalformedContainer);
    }
    for px in line_pixels_mut(line)? {
      px.swap(0, 2);
    }
  }
  Ok(())
}

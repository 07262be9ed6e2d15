use super::*;

const fn paeth_predict(a: u8, b: u8, c: u8) -> u8 {
  let a_ = a as i32;
  let b_ = b as i32;
  let c_ = c as i32;
  let p: i32 = a_ + b_ - c_;
  let pa = (p - a_).abs();
  let pb = (p - b_).abs();
  let pc = (p - c_).abs();
  // Note: The PNG spec is extremely specific that you shall not, under any
  // circumstances, alter the order of evaluation of this expression's tests.
  if pa <= pb && pa <= pc {
    a
  } else if pb <= pc {
    b
  } else {
    c
  }
}

/// Reconstructs one line of filtered bytes in place.
///
/// `prev` is the already reconstructed line above, or empty for the first
/// line of the image (which acts as if the line above were all zero).
fn reconstruct_line(filter: u8, line: &mut [u8], prev: &[u8], bpp: usize) -> ApplePngResult<()> {
  let up = |i: usize| prev.get(i).copied().unwrap_or(0);
  match filter {
    0 => (),
    1 => {
      // Sub
      for i in bpp..line.len() {
        line[i] = line[i].wrapping_add(line[i - bpp]);
      }
    }
    2 => {
      // Up
      for i in 0..line.len() {
        line[i] = line[i].wrapping_add(up(i));
      }
    }
    3 => {
      // Average
      for i in 0..line.len() {
        let a = if i >= bpp { line[i - bpp] } else { 0 };
        line[i] = line[i].wrapping_add(((a as u16 + up(i) as u16) / 2) as u8);
      }
    }
    4 => {
      // Paeth
      for i in 0..line.len() {
        let (a, c) = if i >= bpp { (line[i - bpp], up(i - bpp)) } else { (0, 0) };
        line[i] = line[i].wrapping_add(paeth_predict(a, up(i), c));
      }
    }
    _ => return Err(ApplePngError::MalformedContainer),
  }
  Ok(())
}

/// Applies a filter to one line of plain bytes in place.
///
/// Works right to left so that the "left" neighbor is still unfiltered when
/// it's needed. `prev` must be the *unfiltered* line above.
fn filter_line(filter: u8, line: &mut [u8], prev: &[u8], bpp: usize) {
  let up = |i: usize| prev.get(i).copied().unwrap_or(0);
  match filter {
    1 => {
      for i in (bpp..line.len()).rev() {
        line[i] = line[i].wrapping_sub(line[i - bpp]);
      }
    }
    2 => {
      for i in 0..line.len() {
        line[i] = line[i].wrapping_sub(up(i));
      }
    }
    3 => {
      for i in (0..line.len()).rev() {
        let a = if i >= bpp { line[i - bpp] } else { 0 };
        line[i] = line[i].wrapping_sub(((a as u16 + up(i) as u16) / 2) as u8);
      }
    }
    4 => {
      for i in (0..line.len()).rev() {
        let (a, c) = if i >= bpp { (line[i - bpp], up(i - bpp)) } else { (0, 0) };
        line[i] = line[i].wrapping_sub(paeth_predict(a, up(i), c));
      }
    }
    _ => (),
  }
}

/// Turns decompressed filter lines into plain pixel bytes, in place.
///
/// Each line is `line_len` bytes: one filter type byte followed by the
/// filtered pixel bytes. The filter type bytes are left alone so that
/// [`refilter_lines`] can later apply the same filters again.
///
/// ## Failure
/// * `line_len` of 0, or data that isn't a whole number of lines.
/// * Any filter type byte other than 0 through 4.
pub fn unfilter_lines(data: &mut [u8], line_len: usize, bpp: usize) -> ApplePngResult<()> {
  if line_len == 0 || data.len() % line_len != 0 {
    return Err(ApplePngError::MalformedContainer);
  }
  let mut prev: &[u8] = &[];
  for line in data.chunks_exact_mut(line_len) {
    let (f, pixels) = line.split_at_mut(1);
    reconstruct_line(f[0], pixels, prev, bpp)?;
    prev = pixels;
  }
  Ok(())
}

/// The reverse of [`unfilter_lines`]: applies each line's filter type to the
/// plain pixel bytes, in place.
///
/// Lines are processed bottom to top so that the line above is still plain
/// when each line is filtered. Unknown filter types are left unfiltered.
pub fn refilter_lines(data: &mut [u8], line_len: usize, bpp: usize) -> ApplePngResult<()> {
  if line_len == 0 || data.len() % line_len != 0 {
    return Err(ApplePngError::MalformedContainer);
  }
  let line_count = data.len() / line_len;
  for y in (0..line_count).rev() {
    let (above, here) = data.split_at_mut(y * line_len);
    let prev: &[u8] = if y == 0 { &[] } else { &above[(y - 1) * line_len + 1..] };
    let (f, pixels) = here[..line_len].split_at_mut(1);
    filter_line(f[0], pixels, prev, bpp);
  }
  Ok(())
}

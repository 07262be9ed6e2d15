//! The CRC-32 used by PNG chunks (ISO 3309 / ITU-T V.42, reflected, poly
//! `0xEDB88320`).

const CRC_TABLE: [u32; 256] = make_crc_table();

const fn make_crc_table() -> [u32; 256] {
  let mut out = [0; 256];
  let mut n = 0;
  while n < 256 {
    let mut c = n as u32;
    let mut k = 0;
    while k < 8 {
      if (c & 1) != 0 {
        c = 0xEDB8_8320_u32 ^ (c >> 1);
      } else {
        c = c >> 1;
      }
      //
      k += 1;
    }
    out[n] = c;
    //
    n += 1;
  }
  out
}

#[inline]
fn update_crc(mut crc: u32, bytes: &[u8]) -> u32 {
  for &byte in bytes {
    let i = (crc ^ u32::from(byte)) as u8 as usize;
    crc = CRC_TABLE[i] ^ (crc >> 8);
  }
  crc
}

/// Computes the CRC of a chunk, which covers the chunk type and then the chunk
/// data (but not the length).
#[inline]
#[must_use]
pub fn png_crc(chunk_ty: [u8; 4], data: &[u8]) -> u32 {
  update_crc(update_crc(u32::MAX, &chunk_ty), data) ^ u32::MAX
}

#[test]
fn test_png_crc_known_values() {
  // every PNG ends with this exact chunk.
  assert_eq!(png_crc(*b"IEND", &[]), 0xAE42_6082);
  // sRGB with perceptual intent.
  assert_eq!(png_crc(*b"sRGB", &[0]), 0xAECE_1CE9);
}

#![forbid(unsafe_code)]

//! Just has shorthands for the int parsing we need.

#[inline]
#[must_use]
pub(crate) fn try_pull_byte_array<const N: usize>(bytes: &[u8]) -> Option<([u8; N], &[u8])> {
  if bytes.len() >= N {
    let (head, tail) = bytes.split_at(N);
    let mut a = [0_u8; N];
    a.copy_from_slice(head);
    Some((a, tail))
  } else {
    None
  }
}

#[inline]
#[must_use]
pub(crate) fn try_pull_u32_be(bytes: &[u8]) -> Option<(u32, &[u8])> {
  try_pull_byte_array::<4>(bytes).map(|(a, rest)| (u32::from_be_bytes(a), rest))
}

#[test]
fn test_try_pull() {
  assert_eq!(try_pull_u32_be(&[0, 0, 1, 2, 9]), Some((258, &[9_u8][..])));
  assert_eq!(try_pull_u32_be(&[0, 0, 1]), None);
  assert_eq!(try_pull_byte_array::<0>(&[]), Some(([], &[][..])));
}

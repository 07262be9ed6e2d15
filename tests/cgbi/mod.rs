use apple_png::{
  convert_cgbi_png, convert_cgbi_png_with_options, is_cgbi_png,
  png::{png_get_chunks, refilter_lines, unfilter_lines, PngRawChunkType, PNG_SIGNATURE},
  ApplePng, ApplePngError, ConversionState, ConvertOptions,
};
use miniz_oxide::{deflate::compress_to_vec, inflate::decompress_to_vec_zlib};

use super::{
  cgbi_png, cgbi_png_with_ihdr, ihdr_data, push_chunk, rand_bytes, standard_png, unfiltered_lines,
  CGBI_DATA,
};

/// A 3x2 image stored the Apple way, and what it should turn into.
fn small_pair() -> (Vec<u8>, Vec<u8>) {
  let apple_lines = unfiltered_lines(&[
    &[[1, 2, 3, 255], [9, 9, 9, 0], [128, 32, 64, 128]],
    &[[0, 0, 200, 128], [10, 20, 30, 255], [0, 0, 0, 0]],
  ]);
  let standard_lines = unfiltered_lines(&[
    &[[3, 2, 1, 255], [0, 0, 0, 0], [128, 64, 255, 128]],
    &[[255, 0, 0, 128], [30, 20, 10, 255], [0, 0, 0, 0]],
  ]);
  (cgbi_png(3, 2, &apple_lines, 1), standard_png(3, 2, &standard_lines))
}

/// Inflates all IDAT data of a standard PNG.
fn standard_idat_lines(png: &[u8]) -> Vec<u8> {
  let chunks = png_get_chunks(png, true).unwrap();
  let zlib: Vec<u8> = chunks
    .iter()
    .filter(|c| c.chunk_type() == PngRawChunkType::IDAT)
    .flat_map(|c| c.data().iter().copied())
    .collect();
  decompress_to_vec_zlib(&zlib).unwrap()
}

fn chunk_types(png: &[u8]) -> Vec<PngRawChunkType> {
  png_get_chunks(png, true).unwrap().iter().map(|c| c.chunk_type()).collect()
}

#[test]
fn test_it_converts_apple_png_files_to_standard_png_files() {
  let (apple, expected) = small_pair();
  assert_eq!(convert_cgbi_png(&apple).unwrap(), expected);
  let mut png = ApplePng::new(apple).unwrap();
  assert_eq!(png.data().unwrap(), &expected[..]);
}

#[test]
fn test_data_is_computed_once() {
  let (apple, expected) = small_pair();
  let mut png = ApplePng::new(apple.clone()).unwrap();
  assert_eq!(png.state(), &ConversionState::NotStarted);
  assert!(!png.is_converted());
  let first_ptr = png.data().unwrap().as_ptr();
  assert!(png.is_converted());
  let second = png.data().unwrap();
  assert_eq!(second.as_ptr(), first_ptr);
  assert_eq!(second, &expected[..]);
  assert_eq!(png.raw_data(), &apple[..]);
  assert_eq!(png.into_data().unwrap(), expected);
}

#[test]
fn test_it_extracts_the_correct_sizes_and_handles_large_files() {
  let (width, height) = (640_u32, 960_u32);
  let noise = rand_bytes((height * width * 4) as usize);
  let mut lines = Vec::with_capacity((height * (1 + width * 4)) as usize);
  for (y, row) in noise.chunks_exact((width * 4) as usize).enumerate() {
    lines.push((y % 5) as u8);
    lines.extend_from_slice(row);
  }
  let apple = cgbi_png(width, height, &lines, 7);
  assert!(apple.len() > 2 * 1024 * 1024);
  let mut png = ApplePng::new(apple).unwrap();
  assert_eq!(png.width(), 640);
  assert_eq!(png.height(), 960);
  let out = png.data().unwrap().to_vec();
  let out_lines = standard_idat_lines(&out);
  assert_eq!(out_lines.len(), lines.len());
  assert_eq!(apple_png::png_get_dimensions(&out), Ok((640, 960)));
}

#[test]
fn test_it_raises_on_invalid_input() {
  assert_eq!(ApplePng::new(&b"xyz"[..]), Err(ApplePngError::MalformedContainer));
  assert_eq!(convert_cgbi_png(b"xyz"), Err(ApplePngError::MalformedContainer));
}

#[test]
fn test_it_raises_when_null() {
  assert_eq!(ApplePng::try_from(None::<Vec<u8>>), Err(ApplePngError::InvalidArgument));
  assert_eq!(ApplePng::new(Vec::new()), Err(ApplePngError::InvalidArgument));
  assert_eq!(convert_cgbi_png(&[]), Err(ApplePngError::InvalidArgument));
}

#[test]
fn test_it_raises_if_input_can_not_be_parsed_and_raw_data_can_still_be_accessed() {
  let lines = unfiltered_lines(&[&[[1, 2, 3, 4]; 4], &[[5, 6, 7, 8]; 4]]);
  let ordinary = standard_png(4, 2, &lines);
  let mut png = ApplePng::new(ordinary.clone()).unwrap();
  assert_eq!((png.width(), png.height()), (4, 2));
  assert_eq!(png.data(), Err(ApplePngError::NotAppleFormat));
  assert_eq!(png.state(), &ConversionState::Failed(ApplePngError::NotAppleFormat));
  // and again, the same way
  assert_eq!(png.data(), Err(ApplePngError::NotAppleFormat));
  assert_eq!(png.raw_data(), &ordinary[..]);
  assert!(!is_cgbi_png(&ordinary));
}

#[test]
fn test_dimensions_survive_corrupt_pixel_data() {
  let mut apple = PNG_SIGNATURE.to_vec();
  push_chunk(&mut apple, b"CgBI", &CGBI_DATA);
  push_chunk(&mut apple, b"IHDR", &ihdr_data(20, 30, 8, 6));
  push_chunk(&mut apple, b"IDAT", &[0xFF; 40]);
  push_chunk(&mut apple, b"IEND", &[]);
  assert!(is_cgbi_png(&apple));
  let mut png = ApplePng::new(apple).unwrap();
  assert_eq!((png.width(), png.height()), (20, 30));
  assert_eq!(png.data(), Err(ApplePngError::MalformedContainer));
  assert!(!png.raw_data().is_empty());
}

#[test]
fn test_wrong_amount_of_pixel_data() {
  let lines = unfiltered_lines(&[&[[1, 2, 3, 255]; 2]]);
  // header says 2 lines, data has 1
  let apple = cgbi_png(2, 2, &lines, 1);
  assert_eq!(convert_cgbi_png(&apple), Err(ApplePngError::MalformedContainer));
  // header says 1 pixel wide, data has 2
  let apple = cgbi_png(1, 1, &lines, 1);
  assert_eq!(convert_cgbi_png(&apple), Err(ApplePngError::MalformedContainer));
}

#[test]
fn test_unknown_filter_type() {
  let mut lines = unfiltered_lines(&[&[[1, 2, 3, 255]; 2]]);
  lines[0] = 9;
  let apple = cgbi_png(2, 1, &lines, 1);
  assert_eq!(convert_cgbi_png(&apple), Err(ApplePngError::MalformedContainer));
  let swap_only = ConvertOptions::default().set_unpremultiply(false);
  assert_eq!(
    convert_cgbi_png_with_options(&apple, &swap_only),
    Err(ApplePngError::MalformedContainer)
  );
  let apple = cgbi_png(1, 1, &[9, 1, 2, 3, 255], 1);
  assert_eq!(
    convert_cgbi_png_with_options(&apple, &swap_only),
    Err(ApplePngError::MalformedContainer)
  );
}

#[test]
fn test_huge_header_with_tiny_data_is_rejected_before_allocating() {
  let apple = cgbi_png(8192, 8192, &[], 1);
  assert!(apple.len() < 100);
  let mut png = ApplePng::new(apple.clone()).unwrap();
  assert_eq!((png.width(), png.height()), (8192, 8192));
  assert_eq!(png.data(), Err(ApplePngError::MalformedContainer));
  let swap_only = ConvertOptions::default().set_unpremultiply(false);
  assert_eq!(
    convert_cgbi_png_with_options(&apple, &swap_only),
    Err(ApplePngError::MalformedContainer)
  );
  // the largest size allowed by default, far past anything allocatable
  let apple = cgbi_png(1 << 17, 1 << 17, &[0; 64], 1);
  assert_eq!(convert_cgbi_png(&apple), Err(ApplePngError::MalformedContainer));
}

#[test]
fn test_unsupported_pixel_layouts_are_not_apple_format() {
  let lines = unfiltered_lines(&[&[[1, 2, 3, 255]; 2]]);
  for (depth, color) in [(8, 2), (16, 6), (8, 3), (8, 0)] {
    let apple = cgbi_png_with_ihdr(&ihdr_data(2, 1, depth, color), &lines, 1);
    assert_eq!(convert_cgbi_png(&apple), Err(ApplePngError::NotAppleFormat), "{depth} {color}");
  }
  let mut interlaced = ihdr_data(2, 1, 8, 6);
  interlaced[12] = 1;
  let apple = cgbi_png_with_ihdr(&interlaced, &lines, 1);
  assert_eq!(convert_cgbi_png(&apple), Err(ApplePngError::NotAppleFormat));
}

#[test]
fn test_split_input_idat_gives_same_output() {
  let (apple, expected) = small_pair();
  assert_eq!(standard_idat_lines(&expected).len(), 2 * (1 + 3 * 4));
  let raw_lines = unfiltered_lines(&[
    &[[1, 2, 3, 255], [9, 9, 9, 0], [128, 32, 64, 128]],
    &[[0, 0, 200, 128], [10, 20, 30, 255], [0, 0, 0, 0]],
  ]);
  let split = cgbi_png(3, 2, &raw_lines, 3);
  assert_ne!(split, apple);
  assert_eq!(convert_cgbi_png(&split).unwrap(), expected);
}

#[test]
fn test_filter_types_are_kept() {
  // each line uses a different filter on the apple side
  let plain: [[[u8; 4]; 2]; 4] = [
    [[10, 20, 30, 255], [40, 50, 60, 255]],
    [[5, 5, 5, 128], [64, 0, 32, 128]],
    [[0, 0, 0, 0], [1, 2, 3, 255]],
    [[7, 8, 9, 255], [100, 100, 100, 200]],
  ];
  let mut apple_lines = Vec::new();
  for (filter, row) in [1_u8, 2, 3, 4].into_iter().zip(plain.iter()) {
    apple_lines.push(filter);
    for px in row {
      apple_lines.extend_from_slice(px);
    }
  }
  refilter_lines(&mut apple_lines, 9, 4).unwrap();
  let apple = cgbi_png(2, 4, &apple_lines, 1);

  let out = convert_cgbi_png(&apple).unwrap();
  let mut out_lines = standard_idat_lines(&out);
  let filters: Vec<u8> = out_lines.chunks(9).map(|l| l[0]).collect();
  assert_eq!(filters, [1, 2, 3, 4]);
  unfilter_lines(&mut out_lines, 9, 4).unwrap();
  let expected: [[[u8; 4]; 2]; 4] = [
    [[30, 20, 10, 255], [60, 50, 40, 255]],
    [[10, 10, 10, 128], [64, 0, 128, 128]],
    [[0, 0, 0, 0], [3, 2, 1, 255]],
    [[9, 8, 7, 255], [128, 128, 128, 200]],
  ];
  for (line, row) in out_lines.chunks(9).zip(expected.iter()) {
    let px: Vec<[u8; 4]> = line[1..].chunks(4).map(|p| [p[0], p[1], p[2], p[3]]).collect();
    assert_eq!(&px[..], &row[..]);
  }
}

#[test]
fn test_swap_only_option() {
  let mut apple_lines = vec![2_u8, 1, 2, 3, 100, 4, 5, 6, 7];
  apple_lines.extend_from_slice(&[1, 9, 8, 7, 6, 5, 4, 3, 2]);
  let apple = cgbi_png(2, 2, &apple_lines, 1);
  let opts = ConvertOptions::default().set_unpremultiply(false);
  let out = convert_cgbi_png_with_options(&apple, &opts).unwrap();
  assert_eq!(
    standard_idat_lines(&out),
    [2, 3, 2, 1, 100, 6, 5, 4, 7, 1, 7, 8, 9, 6, 3, 4, 5, 2]
  );
}

#[test]
fn test_output_idat_split_option() {
  let (apple, expected) = small_pair();
  let opts = ConvertOptions::default().set_max_idat_len(5);
  let mut png = ApplePng::with_options(apple, opts).unwrap();
  let out = png.data().unwrap().to_vec();
  let chunks = png_get_chunks(&out, true).unwrap();
  let idats: Vec<_> =
    chunks.iter().filter(|c| c.chunk_type() == PngRawChunkType::IDAT).collect();
  assert!(idats.len() > 1);
  assert!(idats.iter().all(|c| c.data().len() <= 5));
  assert_eq!(standard_idat_lines(&out), standard_idat_lines(&expected));
}

#[test]
fn test_other_chunks_are_kept_in_order() {
  let lines = unfiltered_lines(&[&[[1, 2, 3, 255]]]);
  let raw = compress_to_vec(&lines, 6);
  let mut apple = PNG_SIGNATURE.to_vec();
  push_chunk(&mut apple, b"CgBI", &CGBI_DATA);
  push_chunk(&mut apple, b"IHDR", &ihdr_data(1, 1, 8, 6));
  push_chunk(&mut apple, b"sRGB", &[0]);
  push_chunk(&mut apple, b"IDAT", &raw);
  push_chunk(&mut apple, b"tEXt", b"Comment\0hi");
  push_chunk(&mut apple, b"IEND", &[]);
  let out = convert_cgbi_png(&apple).unwrap();
  assert_eq!(
    chunk_types(&out),
    [
      PngRawChunkType::IHDR,
      PngRawChunkType(*b"sRGB"),
      PngRawChunkType::IDAT,
      PngRawChunkType(*b"tEXt"),
      PngRawChunkType::IEND,
    ]
  );
  assert!(!is_cgbi_png(&out));
}

#[test]
fn test_crc_checking() {
  let (mut apple, expected) = small_pair();
  // the CgBI chunk's CRC is the last 4 bytes of the first chunk
  apple[8 + 12 + 4 - 1] ^= 0x55;
  assert_eq!(convert_cgbi_png(&apple), Err(ApplePngError::MalformedContainer));
  let opts = ConvertOptions::default().set_confirm_crc(false);
  assert_eq!(convert_cgbi_png_with_options(&apple, &opts).unwrap(), expected);
}

#[test]
fn test_header_must_come_first() {
  let lines = unfiltered_lines(&[&[[1, 2, 3, 255]]]);
  let raw = compress_to_vec(&lines, 6);
  let mut apple = PNG_SIGNATURE.to_vec();
  push_chunk(&mut apple, b"CgBI", &CGBI_DATA);
  push_chunk(&mut apple, b"sRGB", &[0]);
  push_chunk(&mut apple, b"IHDR", &ihdr_data(1, 1, 8, 6));
  push_chunk(&mut apple, b"IDAT", &raw);
  push_chunk(&mut apple, b"IEND", &[]);
  assert_eq!(convert_cgbi_png(&apple), Err(ApplePngError::MalformedContainer));
}

#[test]
fn test_missing_idat() {
  let mut apple = PNG_SIGNATURE.to_vec();
  push_chunk(&mut apple, b"CgBI", &CGBI_DATA);
  push_chunk(&mut apple, b"IHDR", &ihdr_data(1, 1, 8, 6));
  push_chunk(&mut apple, b"IEND", &[]);
  assert_eq!(convert_cgbi_png(&apple), Err(ApplePngError::MalformedContainer));
}

#[test]
fn test_dimension_limits() {
  let (apple, _) = small_pair();
  let opts = ConvertOptions::default().set_max_width(2);
  assert_eq!(convert_cgbi_png_with_options(&apple, &opts), Err(ApplePngError::MalformedContainer));
  let opts = ConvertOptions::default().set_max_height(1);
  assert_eq!(convert_cgbi_png_with_options(&apple, &opts), Err(ApplePngError::MalformedContainer));
  let lines = unfiltered_lines(&[]);
  let apple = cgbi_png(0, 0, &lines, 1);
  assert_eq!(convert_cgbi_png(&apple), Err(ApplePngError::MalformedContainer));
}

#[test]
fn test_is_cgbi_png() {
  let (apple, expected) = small_pair();
  assert!(is_cgbi_png(&apple));
  assert!(!is_cgbi_png(&expected));
  assert!(!is_cgbi_png(b"xyz"));
  assert!(!is_cgbi_png(&[]));
}

#[test]
fn test_compression_level_changes_nothing_but_size() {
  let (apple, expected) = small_pair();
  let opts = ConvertOptions::default().set_compression_level(0);
  let out = convert_cgbi_png_with_options(&apple, &opts).unwrap();
  assert_ne!(out, expected);
  assert_eq!(standard_idat_lines(&out), standard_idat_lines(&expected));
}

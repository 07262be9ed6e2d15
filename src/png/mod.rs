#![forbid(unsafe_code)]

//! Tools for taking apart and putting back together PNG data.
//!
//! * [Portable Network Graphics Specification (Second Edition)][png-spec]
//!
//! [png-spec]: https://www.w3.org/TR/2003/REC-PNG-20031110/
//!
//! A PNG is an 8 byte signature followed by "chunks". Each chunk is a 4 byte
//! big-endian length, a 4 byte type tag, that many bytes of data, and a CRC
//! of the tag and data.
//!
//! Apple's CgBI variant looks like a PNG but differs in three ways:
//! * An extra critical `CgBI` chunk comes first (before `IHDR`).
//! * The `IDAT` data is a raw deflate stream, not a zlib stream.
//! * The pixels are stored BGRA with the color premultiplied by alpha.
//!
//! Conversion undoes all three, see [`convert_cgbi_png`].
//!
//! ## Library Design Assumptions
//!
//! * The entire PNG source data is a single byte slice.
//! * Each stage of the conversion goes into a single owned buffer, there is
//!   no streaming.

use core::fmt::{Debug, Write};

use alloc::vec::Vec;
use log::{debug, info, trace, warn};

use crate::{options::*, parser_helpers::*, ApplePngError, ApplePngResult};

/// The first eight bytes of a PNG datastream should match these bytes.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

mod crc32;
pub use crc32::*;

mod raw_chunk;
pub use raw_chunk::*;

mod ihdr;
pub use ihdr::*;

mod unfilter;
pub use unfilter::*;

mod pixels;
pub use pixels::*;

mod idat;
pub use idat::*;

mod writer;
pub use writer::*;

mod cgbi;
pub use cgbi::*;

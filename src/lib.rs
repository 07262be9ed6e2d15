#![no_std]
#![cfg_attr(docs_rs, feature(doc_cfg))]
#![warn(missing_docs)]

//! A crate for turning Apple's CgBI PNG files back into standard PNG files.
//!
//! iOS app bundles store their PNG images in a "device optimized" form which
//! regular PNG decoders can't read. This crate undoes Apple's changes and
//! gives you ordinary PNG bytes, along with the image's dimensions.
//!
//! * For one-shot conversion use [`convert_cgbi_png`](png::convert_cgbi_png).
//! * For just the dimensions use
//!   [`png_get_dimensions`](png::png_get_dimensions).
//! * [`ApplePng`] bundles both, reading the dimensions right away and
//!   converting lazily (once) when the data is first asked for.
//!
//! Everything happens in memory with no global state, so separate conversions
//! can run on separate threads freely.
//!
//! ## Logging
//!
//! Progress is reported through the [`log`] facade. No logger is installed by
//! this crate.

#[macro_use]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[cfg(target_pointer_width = "16")]
compile_error!("this crate assumes 32-bit or bigger pointers!");

mod error;
pub use error::*;

mod options;
pub use options::*;

mod parser_helpers;

#[allow(missing_docs)]
pub mod png;
pub use png::{convert_cgbi_png, convert_cgbi_png_with_options, is_cgbi_png, png_get_dimensions};

mod apple_png;
pub use apple_png::*;

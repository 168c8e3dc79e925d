//! srz is a Rust library for block-oriented lossless compression of byte
//! streams whose statistical structure is dominated by local byte-pair
//! correlations, such as PCM audio samples, sensor traces, and other
//! 16-bit-word data.
//!
//! The input is split into fixed-size blocks, each of which is run through a
//! reversible transform chain before entropy coding:
//!
//! 1. A *word-context permutation* groups each 16-bit word under the value of
//!    the word that preceded it, concentrating similar words together. An
//!    optional *previous-byte median* heuristic subdivides each group in two
//!    for a better layout on smooth data.
//! 2. A *byte-pair column split* deinterleaves the permuted words into a
//!    high-byte column and a counting-sorted low-byte column.
//! 3. A *Move-To-Front* pass turns the locally repetitive columns into small
//!    rank values.
//! 4. The ranks are *Elias-gamma* coded into a packed bitstream of 32-bit
//!    code elements (see the [`srz_bitpack`] crate).
//!
//! Every stage is exactly reversible given the small amount of side-band
//! state (last word, last byte) carried by the block headers, so
//! decompression reproduces the original byte stream bit for bit. Blocks are
//! independently decodable: no state survives from one block to the next.
//!
//! # Container
//!
//! Compressed streams are self-describing: a 6-byte file header records the
//! format version, the block size and whether the median heuristic was used,
//! and each block is framed by a header carrying its original length,
//! payload length, CRC-32 checksum and side-band state. The
//! [`container`] module documents the exact wire layout.
//!
//! The recommended entry points are [`StreamCompressor`] and
//! [`StreamDecompressor`], which process whole streams between a reader and
//! a writer. The lower-level, container-agnostic block pipeline in the
//! [`codec`] module is also exposed for advanced use cases, such as framing
//! blocks in a different transport.
//!
//! # Logging
//!
//! This crate uses the [`log`](https://crates.io/crates/log) crate for
//! logging status and diagnostic messages to any interested consumers.
//! Executables can customize the verbosity of this logging, and even compile
//! it out, [as explained in the `log` crate
//! documentation](https://docs.rs/log/0.4.16/log).
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use srz::{CompressorSettings, StreamCompressor, StreamDecompressor};
//!
//! # fn main() -> Result<(), srz::SrzError> {
//! let samples: Vec<u8> = (0u32..4096).flat_map(|i| {
//! 	let x = (f64::from(i) * 0.02).sin();
//! 	(((x * 8000.0) as i16) as u16).to_be_bytes()
//! }).collect();
//!
//! let compressed = StreamCompressor::new(CompressorSettings {
//! 	use_previous_byte: true,
//! 	..Default::default()
//! })
//! .compress(Cursor::new(&samples), Vec::new())?;
//!
//! let restored = StreamDecompressor::new().decompress(Cursor::new(&compressed), Vec::new())?;
//! assert_eq!(restored, samples);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![forbid(unsafe_op_in_unsafe_fn)]
#![forbid(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]
#![deny(non_ascii_idents)]
#![deny(clippy::print_stdout)]
#![deny(clippy::unimplemented)]
#![warn(explicit_outlives_requirements)]
#![warn(noop_method_call)]
#![warn(unreachable_pub)]
#![warn(unused_import_braces)]
#![warn(unused_qualifications)]
#![warn(variant_size_differences)]
#![warn(clippy::empty_enum)]
#![warn(clippy::enum_glob_use)]
#![warn(clippy::invalid_upcast_comparisons)]
#![warn(clippy::multiple_inherent_impl)]
#![warn(clippy::use_self)]
#![warn(clippy::used_underscore_binding)]

#[doc(inline)]
pub use container::{CompressorSettings, SrzError, StreamCompressor, StreamDecompressor};

/// The version tag baked into this build of the library, as printed by the
/// `srcomp` front-end. Defaults to the crate version; packagers may replace
/// it by exporting `SRZ_BUILD_TAG` while compiling.
pub static SRZ_VERSION_TAG: &str = concat!("srz ", env!("SRZ_BUILD_TAG"));

pub mod codec;
pub mod container;

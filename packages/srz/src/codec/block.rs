//! Composes the transform stages into the block compression pipeline.
//!
//! Compression runs word-context permutation, byte-pair column split,
//! Move-To-Front and Elias-gamma coding over a single block of words and
//! packs the result into 32-bit code elements; decompression undoes the
//! stages in reverse order. The side-band state a decoder needs — the last
//! word and the last byte of the permuted stream — is returned to the caller
//! for framing, which is how the container's block headers obtain it.

use std::collections::TryReserveError;

use srz_bitpack::{BitReader, BitWriter, BitpackError};
use thiserror::Error;

use super::byte_split::{join_bytes, separate_bytes};
use super::mtf::MtfState;
use super::try_vec;
use super::word_context::{join_words, separate_words};

/// Represents an error that may occur while compressing or decompressing a
/// block of words.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BlockCodecError {
	/// The compressed data ended before the block could be fully decoded.
	#[error("compressed block data is truncated")]
	Truncated,
	/// The compressed data decodes to something no compressor produces.
	#[error("corrupt compressed block: {0}")]
	Corrupt(&'static str),
	/// A block-scoped working buffer could not be allocated.
	#[error("out of memory while allocating block buffers: {0}")]
	OutOfMemory(#[from] TryReserveError)
}

impl From<BitpackError> for BlockCodecError {
	fn from(error: BitpackError) -> Self {
		match error {
			BitpackError::Truncated => Self::Truncated,
			BitpackError::OutOfRange(_) => Self::Corrupt("Elias-gamma code out of range"),
			BitpackError::InvalidWidth(_) | BitpackError::ZeroValue => {
				Self::Corrupt("invalid variable-width code")
			}
		}
	}
}

/// Returns the number of code elements that suffice for the worst-case
/// Elias-gamma expansion of a block of `word_count` words.
///
/// Each of the `2 × word_count` rank bytes codes to at most 17 bits
/// (the gamma code of 256).
pub(crate) fn worst_case_elements(word_count: usize) -> usize {
	(2 * word_count * 17).div_ceil(32)
}

/// Compresses a block of words, returning the packed code elements together
/// with the last byte of the context-permuted stream, which the matching
/// [`decompress_block`] call needs back. `src` must not be empty.
///
/// The compressed byte length is four times the number of returned elements.
pub fn compress_block(
	src: &[u16],
	use_previous_byte: bool
) -> Result<(Vec<u32>, u8), BlockCodecError> {
	let length = src.len();
	debug_assert!(length > 0);

	let mut permuted = try_vec(length, 0u16)?;
	separate_words(src, &mut permuted, use_previous_byte)?;
	let last_byte = permuted[length - 1] as u8;

	let mut columns = try_vec(2 * length, 0u8)?;
	separate_bytes(&permuted, &mut columns);

	let mut state = MtfState::new();
	let mut ranks = try_vec(2 * length, 0u8)?;
	state.code(&columns, &mut ranks);

	let mut writer = BitWriter::with_capacity(worst_case_elements(length));
	for &rank in &ranks {
		// Shifting by one makes rank zero representable in Elias-gamma
		writer.write_eg(u32::from(rank) + 1)?;
	}
	writer.flush();

	Ok((writer.into_elements(), last_byte))
}

/// Decompresses a block of `word_count` words from packed code elements.
///
/// `last_word` and `last_byte` are the side-band values recorded when the
/// block was compressed, and `use_previous_byte` must match the compression
/// setting; all three travel in the container's block header.
pub fn decompress_block(
	elements: &[u32],
	word_count: usize,
	last_word: u16,
	last_byte: u8,
	use_previous_byte: bool
) -> Result<Vec<u16>, BlockCodecError> {
	debug_assert!(word_count > 0);

	let mut reader = BitReader::new(elements);
	let mut ranks = try_vec(2 * word_count, 0u8)?;
	for rank in &mut ranks {
		let coded = reader.read_eg()?;
		*rank = u8::try_from(coded - 1)
			.map_err(|_| BlockCodecError::Corrupt("Elias-gamma code outside the byte alphabet"))?;
	}

	let mut state = MtfState::new();
	let mut columns = try_vec(2 * word_count, 0u8)?;
	state.decode(&ranks, &mut columns);

	let mut permuted = try_vec(word_count, 0u16)?;
	join_bytes(&columns, &mut permuted, last_byte);

	let mut words = try_vec(word_count, 0u16)?;
	join_words(&permuted, &mut words, last_word, use_previous_byte)?;

	Ok(words)
}

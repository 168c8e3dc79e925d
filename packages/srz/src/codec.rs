//! The container-agnostic block codec: the reversible transform stages and
//! the [`compress_block`](block::compress_block) /
//! [`decompress_block`](block::decompress_block) pipeline composing them.
//!
//! Everything here operates on in-memory word and byte buffers scoped to a
//! single block. The [`container`](crate::container) module is the primary
//! intended consumer; the stages are exposed for advanced use cases and for
//! exercising them in isolation.

use std::collections::TryReserveError;

pub mod block;
pub mod byte_split;
pub mod mtf;
pub mod word_context;

#[cfg(test)]
mod test;

#[doc(inline)]
pub use block::{BlockCodecError, compress_block, decompress_block};

/// Allocates a `value`-filled vector of the given length, reporting
/// allocation failure as an error instead of aborting the process.
pub(crate) fn try_vec<T: Clone>(length: usize, value: T) -> Result<Vec<T>, TryReserveError> {
	let mut vec = Vec::new();
	vec.try_reserve_exact(length)?;
	vec.resize(length, value);

	Ok(vec)
}

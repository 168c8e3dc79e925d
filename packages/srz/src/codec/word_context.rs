//! Reorders a word stream by grouping each word under its *context*, the
//! value of the word that preceded it, and restores the original order.
//!
//! The grouping is a stable counting sort over the 65536 possible contexts.
//! Because the context of every word can be rederived while walking the
//! restored stream, the join needs no side table beyond the value of the
//! last word, which the block framing carries: the first word always uses
//! context 0, and the last word has no successor, so its count is moved to
//! the bootstrap context before the offsets are computed. That fixup must be
//! applied identically on both sides or the cursors drift apart.
//!
//! In median mode each context group is filled from both ends: words whose
//! predecessor's predecessor had a low byte at or below the context's
//! running median go to the front, the rest to the back, and the median is
//! nudged one step towards that byte after every decision. Both sides
//! replay the same decisions and nudges in the same order, keeping the
//! cursors in lockstep. The median tables live on the stack frame of each
//! call, so concurrent codecs never share state.

use super::block::BlockCodecError;
use super::try_vec;

/// The number of distinct word contexts.
const CONTEXT_COUNT: usize = 65536;

/// The initial per-context median of the preceding low byte.
const MEDIAN_SEED: u8 = 127;

/// Call-scoped counting-sort state shared by the separate and join walks:
/// per-context counts, front cursors and, in median mode, back cursors and
/// the median table.
struct ContextCursors {
	front: Vec<i64>,
	back: Vec<i64>,
	median: Vec<u8>,
	use_previous_byte: bool
}

impl ContextCursors {
	/// Builds the cursors from per-context counts. `length` is the total
	/// number of words.
	fn new(
		count: &[u32],
		length: usize,
		use_previous_byte: bool
	) -> Result<Self, BlockCodecError> {
		let mut front = try_vec(CONTEXT_COUNT, 0i64)?;
		for context in 1..CONTEXT_COUNT {
			front[context] = front[context - 1] + i64::from(count[context - 1]);
		}

		let mut back = Vec::new();
		let mut median = Vec::new();
		if use_previous_byte {
			back = try_vec(CONTEXT_COUNT, 0i64)?;
			back[CONTEXT_COUNT - 1] = length as i64 - 1;
			for context in (0..CONTEXT_COUNT - 1).rev() {
				back[context] = back[context + 1] - i64::from(count[context + 1]);
			}

			median = try_vec(CONTEXT_COUNT, MEDIAN_SEED)?;
		}

		Ok(Self {
			front,
			back,
			median,
			use_previous_byte
		})
	}

	/// Picks the output slot for the next word of `context`, advancing the
	/// chosen cursor. `previous_byte` is the low byte of the context's own
	/// predecessor.
	fn next_slot(&mut self, context: u16, previous_byte: u8) -> i64 {
		let context = context as usize;
		if self.use_previous_byte && self.median[context] < previous_byte {
			let slot = self.back[context];
			self.back[context] -= 1;
			slot
		} else {
			let slot = self.front[context];
			self.front[context] += 1;
			slot
		}
	}

	/// Nudges the context's median one step towards the observed byte.
	fn nudge_median(&mut self, context: u16, previous_byte: u8) {
		if !self.use_previous_byte {
			return;
		}

		let median = &mut self.median[context as usize];
		if *median < previous_byte {
			*median += 1;
		} else if *median > previous_byte {
			*median -= 1;
		}
	}
}

/// Counts how many words of each value appear in `src`.
fn count_words(src: &[u16]) -> Result<Vec<u32>, BlockCodecError> {
	let mut count = try_vec(CONTEXT_COUNT, 0u32)?;
	for &word in src {
		count[word as usize] += 1;
	}

	Ok(count)
}

/// Turns per-word counts into per-context counts: the last word never
/// becomes a context, while the bootstrap context 0 gains the first word.
fn adjust_counts(count: &mut [u32], last_word: u16) -> Result<(), BlockCodecError> {
	let last = &mut count[last_word as usize];
	*last = last
		.checked_sub(1)
		.ok_or(BlockCodecError::Corrupt("last word is absent from the block"))?;
	count[0] += 1;

	Ok(())
}

/// Groups the words of `src` by their context into `dst`, which must have
/// the same length. `src` must not be empty.
///
/// With `use_previous_byte` set, each context group is filled from both ends
/// under the control of the per-context median described in the module
/// documentation; the same setting must be used to join.
pub fn separate_words(
	src: &[u16],
	dst: &mut [u16],
	use_previous_byte: bool
) -> Result<(), BlockCodecError> {
	let length = src.len();
	debug_assert_eq!(dst.len(), length);
	debug_assert!(length > 0);

	let mut count = count_words(src)?;
	adjust_counts(&mut count, src[length - 1])?;
	let mut cursors = ContextCursors::new(&count, length, use_previous_byte)?;

	let mut previous: u16 = 0;
	let mut previous_byte: u8 = 0;
	for &current in src {
		let slot = cursors.next_slot(previous, previous_byte);
		dst[slot as usize] = current;

		cursors.nudge_median(previous, previous_byte);
		previous_byte = previous as u8;
		previous = current;
	}

	Ok(())
}

/// Restores the word order that [`separate_words`] permuted away. `src` and
/// `dst` must have the same nonzero length, `last_word` must be the final
/// word of the original stream, and `use_previous_byte` must match the
/// separation setting.
///
/// The permuted data drives the walk, so corrupted input can send a cursor
/// outside its group; a cursor that escapes the buffer altogether is
/// reported as a corrupt block.
pub fn join_words(
	src: &[u16],
	dst: &mut [u16],
	last_word: u16,
	use_previous_byte: bool
) -> Result<(), BlockCodecError> {
	let length = src.len();
	debug_assert_eq!(dst.len(), length);
	debug_assert!(length > 0);

	let mut count = count_words(src)?;
	adjust_counts(&mut count, last_word)?;
	let mut cursors = ContextCursors::new(&count, length, use_previous_byte)?;

	let mut previous: u16 = 0;
	let mut previous_byte: u8 = 0;
	for slot in dst.iter_mut() {
		let index = cursors.next_slot(previous, previous_byte);
		let current = *usize::try_from(index)
			.ok()
			.and_then(|index| src.get(index))
			.ok_or(BlockCodecError::Corrupt("context cursor escaped the block"))?;

		cursors.nudge_median(previous, previous_byte);
		previous_byte = previous as u8;
		*slot = current;
		previous = current;
	}

	Ok(())
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn separation_groups_words_by_their_predecessor() {
		let words = [3, 1, 3, 1, 2];
		let mut separated = [0u16; 5];

		separate_words(&words, &mut separated, false).unwrap();

		// Contexts in order of appearance: 0, 3, 1, 3, 1. Groups laid out by
		// ascending context value: {0: [3]}, {1: [3, 2]}, {3: [1, 1]}
		assert_eq!(separated, [3, 3, 2, 1, 1]);
	}

	#[test]
	fn join_restores_the_original_order() {
		let words = [3, 1, 3, 1, 2];
		let mut separated = [0u16; 5];
		separate_words(&words, &mut separated, false).unwrap();

		let mut joined = [0u16; 5];
		join_words(&separated, &mut joined, 2, false).unwrap();

		assert_eq!(joined, words);
	}

	#[test]
	fn round_trip_preserves_arbitrary_words() {
		for use_previous_byte in [false, true] {
			let words: Vec<u16> = (0..8192u32)
				.map(|i| (i.wrapping_mul(40503).wrapping_add(i / 7)) as u16)
				.collect();

			let mut separated = vec![0u16; words.len()];
			separate_words(&words, &mut separated, use_previous_byte).unwrap();

			let mut joined = vec![0u16; words.len()];
			join_words(
				&separated,
				&mut joined,
				words[words.len() - 1],
				use_previous_byte
			)
			.unwrap();

			assert_eq!(joined, words, "use_previous_byte = {use_previous_byte}");
		}
	}

	#[test]
	fn round_trip_preserves_smooth_waveforms() {
		// Smooth data exercises the median heuristic's two-ended placement
		for use_previous_byte in [false, true] {
			let words: Vec<u16> = (0..4096u32)
				.map(|i| ((f64::from(i) * 0.05).sin() * 12000.0) as i16 as u16)
				.collect();

			let mut separated = vec![0u16; words.len()];
			separate_words(&words, &mut separated, use_previous_byte).unwrap();

			let mut joined = vec![0u16; words.len()];
			join_words(
				&separated,
				&mut joined,
				words[words.len() - 1],
				use_previous_byte
			)
			.unwrap();

			assert_eq!(joined, words, "use_previous_byte = {use_previous_byte}");
		}
	}

	#[test]
	fn single_word_streams_survive() {
		for use_previous_byte in [false, true] {
			let words = [0xABCD];
			let mut separated = [0u16; 1];
			separate_words(&words, &mut separated, use_previous_byte).unwrap();

			let mut joined = [0u16; 1];
			join_words(&separated, &mut joined, 0xABCD, use_previous_byte).unwrap();

			assert_eq!(joined, words);
		}
	}

	#[test]
	fn joining_with_an_absent_last_word_is_rejected() {
		let separated = [5u16, 5, 5];
		let mut joined = [0u16; 3];

		assert!(matches!(
			join_words(&separated, &mut joined, 1234, false),
			Err(BlockCodecError::Corrupt(_))
		));
	}
}

//! Splits a word buffer into a high-byte column and a low-byte column, and
//! joins them back.
//!
//! The high bytes keep their input order; the low bytes are grouped by their
//! word's high byte with a stable counting sort. Since the grouped layout is
//! fully determined by the high-byte column, the join can rebuild the exact
//! word sequence from the two columns alone.
//!
//! The high byte is the more significant half of the word throughout.

/// The number of distinct high-byte keys.
const KEY_COUNT: usize = 256;

/// Computes, for each high-byte key, the offset of its group within the
/// low-byte column: the running sum of the counts of all smaller keys.
fn group_offsets(count: &[usize; KEY_COUNT]) -> [usize; KEY_COUNT] {
	let mut offset = [0; KEY_COUNT];
	for key in 1..KEY_COUNT {
		offset[key] = offset[key - 1] + count[key - 1];
	}

	offset
}

/// Deinterleaves `src` into `dst`: the first half of `dst` receives the high
/// bytes in input order, the second half the low bytes grouped by high byte.
///
/// `dst` must be exactly twice as long as `src`.
pub fn separate_bytes(src: &[u16], dst: &mut [u8]) {
	let length = src.len();
	debug_assert_eq!(dst.len(), 2 * length);

	let mut count = [0; KEY_COUNT];
	for &word in src {
		count[(word >> 8) as usize] += 1;
	}
	let mut offset = group_offsets(&count);

	let (dst_high, dst_low) = dst.split_at_mut(length);
	for (i, &word) in src.iter().enumerate() {
		let [high, low] = word.to_be_bytes();
		dst_high[i] = high;
		dst_low[offset[high as usize]] = low;
		offset[high as usize] += 1;
	}
}

/// Rebuilds the word sequence from the two-column layout produced by
/// [`separate_bytes`]. `src` must be exactly twice as long as `dst`.
///
/// `_last` is the low byte of the final word before separation; it is
/// carried by block framing for layout compatibility but the join itself is
/// fully determined by the columns, so it goes unused here.
pub fn join_bytes(src: &[u8], dst: &mut [u16], _last: u8) {
	let length = dst.len();
	debug_assert_eq!(src.len(), 2 * length);

	let mut count = [0; KEY_COUNT];
	for &high in &src[..length] {
		count[high as usize] += 1;
	}
	let mut offset = group_offsets(&count);

	let (src_high, src_low) = src.split_at(length);
	for (i, word) in dst.iter_mut().enumerate() {
		let high = src_high[i];
		let low = src_low[offset[high as usize]];
		offset[high as usize] += 1;
		*word = u16::from_be_bytes([high, low]);
	}
}

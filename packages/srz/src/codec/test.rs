use rand::RngCore;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::*;

/// Builds a word block from pseudorandom bytes, pairing them big-endian.
fn random_words(seed: u64, word_count: usize) -> Vec<u16> {
	let mut rng = SmallRng::seed_from_u64(seed);
	let mut bytes = vec![0u8; word_count * 2];
	rng.fill_bytes(&mut bytes);

	bytes
		.chunks_exact(2)
		.map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
		.collect()
}

fn assert_block_round_trip(words: &[u16], use_previous_byte: bool) {
	let (elements, last_byte) = compress_block(words, use_previous_byte).unwrap();

	let restored = decompress_block(
		&elements,
		words.len(),
		words[words.len() - 1],
		last_byte,
		use_previous_byte
	)
	.unwrap();

	assert_eq!(restored, words, "use_previous_byte = {use_previous_byte}");
}

#[test]
fn block_round_trip_preserves_random_words() {
	for use_previous_byte in [false, true] {
		assert_block_round_trip(&random_words(0x5121, 2048), use_previous_byte);
	}
}

#[test]
fn block_round_trip_preserves_waveforms() {
	let words: Vec<u16> = (0..2048u32)
		.map(|i| ((f64::from(i) * 0.03).sin() * 10000.0) as i16 as u16)
		.collect();

	for use_previous_byte in [false, true] {
		assert_block_round_trip(&words, use_previous_byte);
	}
}

#[test]
fn block_round_trip_preserves_degenerate_blocks() {
	for use_previous_byte in [false, true] {
		assert_block_round_trip(&[0x0000], use_previous_byte);
		assert_block_round_trip(&[0xFFFF; 512], use_previous_byte);
		assert_block_round_trip(&[0x1234, 0x1234, 0x5678], use_previous_byte);
	}
}

#[test]
fn compressed_blocks_fit_the_worst_case_bound() {
	let words = random_words(0xC0DE, 4096);
	let (elements, _) = compress_block(&words, false).unwrap();

	assert!(elements.len() <= block::worst_case_elements(words.len()));
}

#[test]
fn decompressing_truncated_elements_fails() {
	let words = random_words(0xBEEF, 1024);
	let (elements, last_byte) = compress_block(&words, false).unwrap();

	let result = decompress_block(
		&elements[..elements.len() / 2],
		words.len(),
		words[words.len() - 1],
		last_byte,
		false
	);

	assert!(matches!(result, Err(BlockCodecError::Truncated)));
}

#[test]
fn decompressing_an_overlong_gamma_code_fails() {
	// A gamma code of 512 decodes fine at the bit layer but does not fit the
	// byte alphabet after the rank shift
	let mut writer = srz_bitpack::BitWriter::new();
	for _ in 0..4 {
		writer.write_eg(512).unwrap();
	}
	writer.flush();

	let result = decompress_block(writer.elements(), 2, 0, 0, false);

	assert!(matches!(result, Err(BlockCodecError::Corrupt(_))));
}

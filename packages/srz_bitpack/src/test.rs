use super::*;

#[test]
fn writing_single_bits_works() {
	let mut writer = BitWriter::new();
	for bit in [true, true, false, false, true, false, true, false] {
		writer.write_bit(bit);
	}
	writer.flush();

	assert_eq!(writer.element_count(), 1);
	assert_eq!(writer.elements(), [0xCA000000]);
}

#[test]
fn reading_single_bits_works() {
	let mut reader = BitReader::new(&[0xCA000000]);

	for expected in [true, true, false, false, true, false, true, false] {
		assert_eq!(reader.read_bit().expect("No truncation expected"), expected);
	}
}

#[test]
fn reading_nbits_works() {
	let mut reader = BitReader::new(&[0x12345678]);

	for expected in 1..=8 {
		assert_eq!(
			reader.read_nbits(4).expect("No truncation expected"),
			expected
		);
	}
}

#[test]
fn reading_nbits_between_elements_works() {
	let mut reader = BitReader::new(&[0x12345678, 0x12345678]);

	assert_eq!(reader.read_nbits(28).unwrap(), 0x1234567);
	assert_eq!(reader.read_nbits(8).unwrap(), 0x81);
	assert_eq!(reader.read_nbits(28).unwrap(), 0x2345678);
}

#[test]
fn writing_nbits_works() {
	let mut writer = BitWriter::new();
	writer.write_nbits(4, 0xC).unwrap();
	writer.write_nbits(4, 0xA).unwrap();
	writer.flush();

	assert_eq!(writer.elements(), [0xCA000000]);
}

#[test]
fn writing_nbits_between_elements_works() {
	let mut writer = BitWriter::new();
	writer.write_nbits(28, 0x1234567).unwrap();
	writer.write_nbits(8, 0x81).unwrap();
	writer.write_nbits(28, 0x2345678).unwrap();
	writer.flush();

	assert_eq!(writer.elements(), [0x12345678, 0x12345678]);
}

#[test]
fn writing_unary_works() {
	let mut writer = BitWriter::new();
	for n in [7, 0, 6, 16, 94] {
		writer.write_unary(n);
	}
	writer.flush();

	assert_eq!(
		writer.elements(),
		[0x01810000, 0x80000000, 0x00000000, 0x00000001]
	);
}

#[test]
fn reading_unary_works() {
	let mut reader = BitReader::new(&[0x01810000, 0x80000000, 0x00000000, 0x00000001]);

	for expected in [7, 0, 6, 16, 94] {
		assert_eq!(
			reader.read_unary().expect("No truncation expected"),
			expected
		);
	}
}

#[test]
fn unary_round_trip_works() {
	let mut writer = BitWriter::new();
	for n in 0..=10_000 {
		writer.write_unary(n);
	}
	writer.flush();

	let elements = writer.into_elements();
	let mut reader = BitReader::new(&elements);
	for expected in 0..=10_000 {
		assert_eq!(reader.read_unary().unwrap(), expected);
	}
}

#[test]
fn writing_eg_works() {
	let mut writer = BitWriter::new();
	for n in [1, 3, 15] {
		writer.write_eg(n).unwrap();
	}
	writer.flush();

	assert_eq!(writer.elements(), [0xB1E00000]);
}

#[test]
fn reading_eg_works() {
	let mut reader = BitReader::new(&[0xB1E00000]);

	for expected in [1, 3, 15] {
		assert_eq!(reader.read_eg().expect("No truncation expected"), expected);
	}
}

#[test]
fn eg_round_trip_works() {
	let mut writer = BitWriter::new();
	for n in 1..=65_536 {
		writer.write_eg(n).unwrap();
	}
	writer.flush();

	let elements = writer.into_elements();
	let mut reader = BitReader::new(&elements);
	for expected in 1..=65_536 {
		assert_eq!(reader.read_eg().unwrap(), expected);
	}
}

#[test]
fn eg_wide_values_round_trip() {
	// Exercise the unary + remainder path, which fused single-write encoding
	// does not cover
	let wide_values = [65_537, 1 << 20, u32::MAX / 2, u32::MAX];

	let mut writer = BitWriter::new();
	for n in wide_values {
		writer.write_eg(n).unwrap();
	}
	writer.flush();

	let elements = writer.into_elements();
	let mut reader = BitReader::new(&elements);
	for expected in wide_values {
		assert_eq!(reader.read_eg().unwrap(), expected);
	}
}

#[test]
fn mixed_width_round_trip_works() {
	let writes = [
		(1, 1),
		(32, 0xDEADBEEF),
		(3, 0b101),
		(17, 0x1ABCD),
		(32, 0),
		(5, 31),
		(12, 0xFFF),
		(7, 64)
	];

	let mut writer = BitWriter::new();
	for (width, value) in writes {
		writer.write_nbits(width, value).unwrap();
	}
	writer.flush();

	let elements = writer.into_elements();
	let mut reader = BitReader::new(&elements);
	for (width, expected) in writes {
		assert_eq!(reader.read_nbits(width).unwrap(), expected);
	}
}

#[test]
fn reader_reset_rewinds_to_the_first_element() {
	let mut reader = BitReader::new(&[0xB1E00000]);

	assert_eq!(reader.read_eg().unwrap(), 1);
	assert_eq!(reader.read_eg().unwrap(), 3);

	reader.reset();

	assert_eq!(reader.read_eg().unwrap(), 1);
}

#[test]
fn reading_past_the_end_is_truncated() {
	let mut reader = BitReader::new(&[0xFFFFFFFF]);

	assert_eq!(reader.read_nbits(32).unwrap(), 0xFFFFFFFF);
	assert_eq!(reader.read_bit(), Err(BitpackError::Truncated));
	assert_eq!(reader.read_nbits(4), Err(BitpackError::Truncated));
}

#[test]
fn unary_without_terminator_is_truncated() {
	let mut reader = BitReader::new(&[0x00000000]);

	assert_eq!(reader.read_unary(), Err(BitpackError::Truncated));
}

#[test]
fn eg_exponent_past_element_width_is_out_of_range() {
	// 32 zero bits then the unary terminator: exponent 32 cannot yield a
	// 32-bit value
	let mut reader = BitReader::new(&[0x00000000, 0x80000000]);

	assert_eq!(reader.read_eg(), Err(BitpackError::OutOfRange(32)));
}

#[test]
fn zero_is_rejected_by_eg() {
	let mut writer = BitWriter::new();

	assert_eq!(writer.write_eg(0), Err(BitpackError::ZeroValue));
	assert_eq!(writer.element_count(), 0);
}

#[test]
fn invalid_widths_are_rejected() {
	let mut writer = BitWriter::new();
	assert_eq!(writer.write_nbits(0, 0), Err(BitpackError::InvalidWidth(0)));
	assert_eq!(writer.write_nbits(33, 0), Err(BitpackError::InvalidWidth(33)));

	let mut reader = BitReader::new(&[0]);
	assert_eq!(reader.read_nbits(0), Err(BitpackError::InvalidWidth(0)));
	assert_eq!(reader.read_nbits(33), Err(BitpackError::InvalidWidth(33)));
}

#[test]
fn flush_with_no_pending_bits_emits_nothing() {
	let mut writer = BitWriter::new();
	writer.write_nbits(32, 0x12345678).unwrap();
	writer.flush();
	writer.flush();

	assert_eq!(writer.elements(), [0x12345678]);
}

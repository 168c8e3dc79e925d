//! This crate implements the bit-layer conventions of the SR compressed stream
//! format: variable-width integers packed MSB-first into 32-bit code elements,
//! plus the unary and Elias-gamma codes built on top of them.
//!
//! # Overview
//!
//! A packed stream is a sequence of 32-bit *code elements*. Bits are written
//! from the most significant position of each element downwards: the first bit
//! written becomes the MSB of the first element. Writers accumulate bits in a
//! 32-bit accumulator and commit it to storage whenever it fills up; the
//! accumulator is cleared on every commit, so bits from a committed element can
//! never bleed into the next one. [`BitWriter::flush`] left-aligns whatever is
//! pending so the valid bits occupy the high end of the final element.
//!
//! Readers consume bits from the MSB of their accumulator and reload it from
//! the next element on demand. A read that runs past the last element fails
//! with [`BitpackError::Truncated`] rather than fabricating bits.
//!
//! How the elements travel between machines is up to the caller: this crate
//! only deals in `u32` values. The SR container serializes them in
//! little-endian byte order.
//!
//! # Codes
//!
//! - *n-bit integers*, 1 to 32 bits wide, MSB-first, freely spanning element
//!   boundaries.
//! - *Unary*: `n` is written as `n` zero bits followed by a terminating one.
//! - *Elias-gamma*: a positive `n` is written as its exponent `e = ⌊log₂ n⌋`
//!   in unary followed by the `e` low bits of `n` (the implicit leading one is
//!   dropped). Zero is not representable and is rejected.
//!
//! # Example
//!
//! ```
//! use srz_bitpack::{BitReader, BitWriter};
//!
//! # fn main() -> Result<(), srz_bitpack::BitpackError> {
//! let mut writer = BitWriter::new();
//! writer.write_eg(1)?;
//! writer.write_eg(3)?;
//! writer.write_eg(15)?;
//! writer.flush();
//!
//! let elements = writer.into_elements();
//! assert_eq!(elements, [0xB1E00000]);
//!
//! let mut reader = BitReader::new(&elements);
//! assert_eq!(reader.read_eg()?, 1);
//! assert_eq!(reader.read_eg()?, 3);
//! assert_eq!(reader.read_eg()?, 15);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![forbid(unsafe_op_in_unsafe_fn)]
#![forbid(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

use thiserror::Error;

#[cfg(test)]
mod test;

/// The number of bits held by one code element.
pub const BITS_PER_ELEMENT: u32 = u32::BITS;

/// Represents an error returned by a bitpacking operation.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BitpackError {
	/// The element storage ended before a complete code could be read.
	#[error("bitpacked data ended before a complete code could be read")]
	Truncated,
	/// An Elias-gamma exponent was read that cannot produce a 32-bit value.
	#[error("Elias-gamma exponent {0} does not fit in a 32-bit code element")]
	OutOfRange(u32),
	/// A bit width outside the supported `1..=32` range was requested.
	#[error("bit width {0} is outside the supported 1..=32 range")]
	InvalidWidth(u32),
	/// Zero was passed to an Elias-gamma encoder, which starts at one.
	#[error("Elias-gamma cannot encode zero")]
	ZeroValue
}

/// Packs variable-width integers MSB-first into a growing sequence of 32-bit
/// code elements.
///
/// Completed elements are committed to the internal storage lazily, at the
/// start of the write that would overflow them; [`flush`](Self::flush) commits
/// the left-aligned remainder. The accumulator is cleared on every commit.
#[derive(Debug, Default)]
pub struct BitWriter {
	elements: Vec<u32>,
	current: u32,
	bit: u32
}

impl BitWriter {
	/// Creates an empty bit writer.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an empty bit writer whose storage can hold `elements` code
	/// elements before reallocating.
	pub fn with_capacity(elements: usize) -> Self {
		Self {
			elements: Vec::with_capacity(elements),
			current: 0,
			bit: 0
		}
	}

	/// Commits the full accumulator to storage and clears it.
	fn commit(&mut self) {
		self.elements.push(self.current);
		self.current = 0;
		self.bit = 0;
	}

	/// Appends a single bit.
	pub fn write_bit(&mut self, bit: bool) {
		if self.bit == BITS_PER_ELEMENT {
			self.commit();
		}

		self.current = (self.current << 1) | bit as u32;
		self.bit += 1;
	}

	/// Appends the `n` least significant bits of `value`, MSB-first. `n` must
	/// be in `1..=32`.
	///
	/// When the pending element has fewer than `n` free bits, the top bits of
	/// `value` complete it and the rest start the next element.
	pub fn write_nbits(&mut self, n: u32, value: u32) -> Result<(), BitpackError> {
		if n < 1 || n > BITS_PER_ELEMENT {
			return Err(BitpackError::InvalidWidth(n));
		}

		if self.bit == BITS_PER_ELEMENT {
			self.commit();
		}

		let mut n = n;
		let free_bits = BITS_PER_ELEMENT - self.bit;
		if n > free_bits {
			// Complete the pending element with the top bits of the value.
			// free_bits is less than 32 here, as a full element was committed
			// above, so the shift cannot overflow
			n -= free_bits;
			self.current = (self.current << free_bits) | (value >> n);
			self.commit();
		}

		self.current = if n == BITS_PER_ELEMENT {
			value
		} else {
			(self.current << n) | (value & ones_mask(n))
		};
		self.bit += n;

		Ok(())
	}

	/// Appends `n` in unary code: `n` zero bits followed by a one bit.
	pub fn write_unary(&mut self, n: u32) {
		for _ in 0..n {
			self.write_bit(false);
		}

		self.write_bit(true);
	}

	/// Appends `n` in Elias-gamma code. `n` must be positive.
	pub fn write_eg(&mut self, n: u32) -> Result<(), BitpackError> {
		if n == 0 {
			return Err(BitpackError::ZeroValue);
		}

		let exponent = n.ilog2();
		let code_length = 2 * exponent + 1;
		if code_length <= BITS_PER_ELEMENT {
			// The whole gamma code of n is numerically n itself, widened with
			// exponent leading zero bits, so it goes out as one n-bit write
			self.write_nbits(code_length, n)
		} else {
			self.write_unary(exponent);
			self.write_nbits(exponent, n & ones_mask(exponent))
		}
	}

	/// Left-aligns any pending bits so they occupy the high end of the final
	/// element, commits it, and clears the accumulator.
	///
	/// A writer with no pending bits is left untouched.
	pub fn flush(&mut self) {
		if self.bit > 0 {
			self.current <<= BITS_PER_ELEMENT - self.bit;
			self.commit();
		}
	}

	/// Returns the number of code elements committed to storage so far.
	/// Pending unflushed bits are not counted.
	pub fn element_count(&self) -> usize {
		self.elements.len()
	}

	/// Returns the code elements committed to storage so far.
	pub fn elements(&self) -> &[u32] {
		&self.elements
	}

	/// Consumes this writer, returning the committed code elements.
	pub fn into_elements(self) -> Vec<u32> {
		self.elements
	}
}

/// Reads variable-width integers MSB-first from a slice of 32-bit code
/// elements, symmetrically to [`BitWriter`].
#[derive(Debug)]
pub struct BitReader<'data> {
	elements: &'data [u32],
	index: usize,
	current: u32,
	bit: u32
}

impl<'data> BitReader<'data> {
	/// Creates a bit reader over the given code elements, positioned at the
	/// MSB of the first element.
	pub fn new(elements: &'data [u32]) -> Self {
		Self {
			elements,
			index: 0,
			current: 0,
			bit: 0
		}
	}

	/// Rewinds the cursor to the beginning of the element storage.
	pub fn reset(&mut self) {
		self.index = 0;
		self.current = 0;
		self.bit = 0;
	}

	/// Loads the next element into the accumulator.
	fn load(&mut self) -> Result<(), BitpackError> {
		self.current = *self
			.elements
			.get(self.index)
			.ok_or(BitpackError::Truncated)?;
		self.index += 1;
		self.bit = BITS_PER_ELEMENT;

		Ok(())
	}

	/// Reads a single bit.
	pub fn read_bit(&mut self) -> Result<bool, BitpackError> {
		if self.bit == 0 {
			self.load()?;
		}

		self.bit -= 1;
		Ok((self.current >> self.bit) & 1 != 0)
	}

	/// Reads an `n`-bit integer, MSB-first. `n` must be in `1..=32`.
	///
	/// A read wider than the bits remaining in the accumulator spans two
	/// elements: the high bits come from the low end of the current element
	/// and the low bits from the high end of the next one.
	pub fn read_nbits(&mut self, n: u32) -> Result<u32, BitpackError> {
		if n < 1 || n > BITS_PER_ELEMENT {
			return Err(BitpackError::InvalidWidth(n));
		}

		if self.bit == 0 {
			self.load()?;
		}

		if n <= self.bit {
			self.bit -= n;
			return Ok((self.current >> self.bit) & ones_mask(n));
		}

		let high = self.current & ones_mask(self.bit);
		let rest = n - self.bit;
		self.load()?;
		self.bit = BITS_PER_ELEMENT - rest;

		Ok((high << rest) | ((self.current >> self.bit) & ones_mask(rest)))
	}

	/// Reads a unary-coded integer: the count of zero bits up to and including
	/// the terminating one bit.
	pub fn read_unary(&mut self) -> Result<u32, BitpackError> {
		let mut n = 0;
		while !self.read_bit()? {
			n += 1;
		}

		Ok(n)
	}

	/// Reads an Elias-gamma-coded positive integer.
	pub fn read_eg(&mut self) -> Result<u32, BitpackError> {
		let exponent = self.read_unary()?;
		if exponent >= BITS_PER_ELEMENT {
			return Err(BitpackError::OutOfRange(exponent));
		}

		let rest = if exponent > 0 {
			self.read_nbits(exponent)?
		} else {
			0
		};

		Ok((1 << exponent) | rest)
	}
}

/// Returns a 32-bit binary mask that has its `width` least significant bits
/// set to 1, and the remaining bits set to 0.
const fn ones_mask(width: u32) -> u32 {
	((1u64 << width as u64) - 1) as u32
}

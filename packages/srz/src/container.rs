//! Contains the [`StreamCompressor`] and [`StreamDecompressor`] structs,
//! which frame the block codec into self-describing compressed streams.
//!
//! # Wire format
//!
//! A compressed stream is a file header followed by zero or more blocks:
//!
//! ```text
//! FileHeader Block₀ Block₁ … Blockₙ₋₁
//! ```
//!
//! The file header is 6 bytes, packed: the magic bytes `'S' 'R'`, a one-byte
//! format version (currently 1), a one-byte flag recording whether the
//! previous-byte median heuristic was used, and the block size in KiB as a
//! little-endian u16 (65536 KiB is stored as 0).
//!
//! Each block is a 23-byte packed little-endian header — original byte
//! length (u64), payload byte length (u64), CRC-32 checksum of the original
//! bytes (u32), last word (u16), last byte (u8) — followed by exactly the
//! payload bytes, which are the block's 32-bit code elements serialized in
//! little-endian order. The payload length is always a multiple of four.
//!
//! There is no end-of-stream marker: a clean EOF where the next block header
//! would start ends the stream, while any short read inside a header or
//! payload is reported as truncation. Decoded data only reaches the sink
//! after its block checksum has been verified, so a corrupt stream never
//! exposes output past the last validated block.

use std::collections::TryReserveError;
use std::io::{self, Read, Write};

use log::{debug, info};
use thiserror::Error;

use crate::codec::{BlockCodecError, block, compress_block, decompress_block, try_vec};


/// The magic bytes that open every compressed stream.
const MAGIC: [u8; 2] = [b'S', b'R'];

/// The stream format version this build reads and writes.
const FORMAT_VERSION: u8 = 1;

/// The unit of the block size field, in bytes.
const BLOCK_SIZE_UNIT: usize = 1024;

/// The size of the packed file header on the wire.
const FILE_HEADER_LENGTH: usize = 6;

/// The size of a packed block header on the wire.
const BLOCK_HEADER_LENGTH: usize = 23;

/// The largest expressible block size, in KiB.
const MAX_BLOCK_SIZE_KIB: u32 = 65536;

/// Represents an error that may occur while compressing or decompressing a
/// stream.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SrzError {
	/// The stream does not start with the expected magic bytes.
	#[error("bad magic number: not a compressed stream")]
	BadMagic,
	/// The stream was produced by an incompatible format version.
	#[error("unsupported stream format version {0}")]
	BadVersion(u8),
	/// The stream ended in the middle of a header, payload or code.
	#[error("truncated stream")]
	Truncated,
	/// A block failed validation: impossible header values, malformed codes,
	/// or a checksum mismatch.
	#[error("corrupt block: {0}")]
	CorruptBlock(&'static str),
	/// The configured block size is outside the supported range.
	#[error("invalid block size of {0} KiB: must be between 1 and 65536")]
	InvalidBlockSize(u32),
	/// A working buffer could not be allocated.
	#[error("out of memory while allocating stream buffers: {0}")]
	OutOfMemory(#[from] TryReserveError),
	/// An I/O error occurred on the source or the sink.
	#[error("I/O error: {0}")]
	Io(#[from] io::Error)
}

impl From<BlockCodecError> for SrzError {
	fn from(error: BlockCodecError) -> Self {
		match error {
			BlockCodecError::Truncated => Self::Truncated,
			BlockCodecError::Corrupt(reason) => Self::CorruptBlock(reason),
			BlockCodecError::OutOfMemory(inner) => Self::OutOfMemory(inner)
		}
	}
}

/// Holds settings that customize how streams are compressed.
#[derive(Debug, Clone)]
pub struct CompressorSettings {
	/// The block size in KiB units. The input is compressed in independent
	/// blocks of this many kibibytes; bigger blocks give the context
	/// permutation more structure to exploit at the cost of memory and
	/// latency.
	///
	/// Must be between 1 and 65536 inclusive.
	///
	/// **Default value**: `1`
	pub block_size_kib: u32,
	/// Whether to engage the previous-byte median heuristic, which splits
	/// every word-context group in two halves steered by a per-context
	/// running median. On smooth data, such as sampled waveforms, this
	/// usually buys a denser layout; the flag is recorded in the file header
	/// so decompression picks it up automatically.
	///
	/// **Default value**: `false`
	pub use_previous_byte: bool
}

impl Default for CompressorSettings {
	fn default() -> Self {
		Self {
			block_size_kib: 1,
			use_previous_byte: false
		}
	}
}

/// Decoded contents of a block header.
struct BlockHeader {
	original_length: u64,
	compressed_length: u64,
	checksum: u32,
	last_word: u16,
	last_byte: u8
}

impl BlockHeader {
	/// Packs this header into its wire representation.
	fn to_bytes(&self) -> [u8; BLOCK_HEADER_LENGTH] {
		let mut bytes = [0; BLOCK_HEADER_LENGTH];
		bytes[0..8].copy_from_slice(&self.original_length.to_le_bytes());
		bytes[8..16].copy_from_slice(&self.compressed_length.to_le_bytes());
		bytes[16..20].copy_from_slice(&self.checksum.to_le_bytes());
		bytes[20..22].copy_from_slice(&self.last_word.to_le_bytes());
		bytes[22] = self.last_byte;

		bytes
	}

	/// Unpacks a header from its wire representation.
	fn from_bytes(bytes: &[u8; BLOCK_HEADER_LENGTH]) -> Self {
		Self {
			original_length: u64::from_le_bytes(bytes[0..8].try_into().unwrap()),
			compressed_length: u64::from_le_bytes(bytes[8..16].try_into().unwrap()),
			checksum: u32::from_le_bytes(bytes[16..20].try_into().unwrap()),
			last_word: u16::from_le_bytes(bytes[20..22].try_into().unwrap()),
			last_byte: bytes[22]
		}
	}
}

/// Compresses byte streams into self-describing compressed streams,
/// according to its settings.
#[derive(Debug, Default)]
pub struct StreamCompressor {
	settings: CompressorSettings
}

impl StreamCompressor {
	/// Creates a stream compressor that will compress according to the
	/// provided settings.
	pub fn new(settings: CompressorSettings) -> Self {
		Self { settings }
	}

	/// Compresses the whole of `source` into `sink`, returning the sink on
	/// success.
	///
	/// The source is consumed up to EOF in blocks of the configured size; an
	/// odd-length final block is padded internally with a zero byte, which
	/// the block header accounts for so decompression reproduces the exact
	/// original length. The sink is flushed before returning.
	pub fn compress<R: Read, W: Write>(&self, mut source: R, mut sink: W) -> Result<W, SrzError> {
		let settings = &self.settings;
		if settings.block_size_kib < 1 || settings.block_size_kib > MAX_BLOCK_SIZE_KIB {
			return Err(SrzError::InvalidBlockSize(settings.block_size_kib));
		}

		let block_bytes = settings.block_size_kib as usize * BLOCK_SIZE_UNIT;

		let mut file_header = [0; FILE_HEADER_LENGTH];
		file_header[0..2].copy_from_slice(&MAGIC);
		file_header[2] = FORMAT_VERSION;
		file_header[3] = settings.use_previous_byte as u8;
		// 65536 KiB wraps to 0 in the u16 field and is decoded back as 65536
		file_header[4..6].copy_from_slice(&(settings.block_size_kib as u16).to_le_bytes());
		sink.write_all(&file_header)?;

		let mut buffer = try_vec(block_bytes + 1, 0u8)?;
		let mut words = try_vec(block_bytes.div_ceil(2), 0u16)?;
		let mut block_index = 0u64;
		let mut total_in = 0u64;
		let mut total_out = 0u64;

		loop {
			let read = read_until_full(&mut source, &mut buffer[..block_bytes])?;
			if read == 0 {
				break;
			}

			let checksum = crc32fast::hash(&buffer[..read]);

			// Pad odd-length blocks so the word count is integral; the header
			// records the unpadded length
			let padded = read + (read & 1);
			if read & 1 == 1 {
				buffer[read] = 0;
			}

			let word_count = padded / 2;
			for (word, pair) in words[..word_count]
				.iter_mut()
				.zip(buffer[..padded].chunks_exact(2))
			{
				*word = u16::from_be_bytes([pair[0], pair[1]]);
			}

			let block = &words[..word_count];
			let (elements, last_byte) = compress_block(block, settings.use_previous_byte)?;

			let header = BlockHeader {
				original_length: read as u64,
				compressed_length: 4 * elements.len() as u64,
				checksum,
				last_word: block[word_count - 1],
				last_byte
			};
			sink.write_all(&header.to_bytes())?;
			for element in &elements {
				sink.write_all(&element.to_le_bytes())?;
			}

			debug!(
				"block {}: {} bytes in, {} payload bytes out",
				block_index,
				read,
				header.compressed_length
			);
			block_index += 1;
			total_in += read as u64;
			total_out += BLOCK_HEADER_LENGTH as u64 + header.compressed_length;
		}

		sink.flush()?;
		info!(
			"compressed {} bytes into {} blocks ({} bytes of stream)",
			total_in,
			block_index,
			FILE_HEADER_LENGTH as u64 + total_out
		);

		Ok(sink)
	}
}

/// Decompresses self-describing compressed streams back into the exact
/// original byte streams.
///
/// Every decoding parameter travels in the stream itself, so no settings are
/// needed.
#[derive(Debug, Default)]
pub struct StreamDecompressor;

impl StreamDecompressor {
	/// Creates a stream decompressor.
	pub fn new() -> Self {
		Self
	}

	/// Decompresses the whole of `source` into `sink`, returning the sink on
	/// success.
	///
	/// Decoding stops successfully at a clean EOF between blocks. Each
	/// block's checksum is verified before any of its bytes reach the sink.
	/// The sink is flushed before returning.
	pub fn decompress<R: Read, W: Write>(&self, mut source: R, mut sink: W) -> Result<W, SrzError> {
		let mut file_header = [0; FILE_HEADER_LENGTH];
		if read_until_full(&mut source, &mut file_header)? != FILE_HEADER_LENGTH {
			return Err(SrzError::Truncated);
		}

		if file_header[0..2] != MAGIC {
			return Err(SrzError::BadMagic);
		}
		if file_header[2] != FORMAT_VERSION {
			return Err(SrzError::BadVersion(file_header[2]));
		}
		let use_previous_byte = file_header[3] != 0;
		let block_size_kib = match u16::from_le_bytes(file_header[4..6].try_into().unwrap()) {
			0 => MAX_BLOCK_SIZE_KIB,
			kib => u32::from(kib)
		};
		let block_bytes = block_size_kib as usize * BLOCK_SIZE_UNIT;

		let mut block_index = 0u64;
		let mut total_out = 0u64;

		loop {
			let header = match read_block_header(&mut source)? {
				Some(header) => header,
				None => break
			};

			validate_block_header(&header, block_bytes)?;
			let compressed_length = header.compressed_length as usize;
			let original_length = header.original_length as usize;

			let mut payload = try_vec(compressed_length, 0u8)?;
			if read_until_full(&mut source, &mut payload)? != compressed_length {
				return Err(SrzError::Truncated);
			}

			let mut elements = try_vec(compressed_length / 4, 0u32)?;
			for (element, bytes) in elements.iter_mut().zip(payload.chunks_exact(4)) {
				*element = u32::from_le_bytes(bytes.try_into().unwrap());
			}

			let word_count = original_length.div_ceil(2);
			let words = decompress_block(
				&elements,
				word_count,
				header.last_word,
				header.last_byte,
				use_previous_byte
			)?;

			let mut bytes = try_vec(2 * word_count, 0u8)?;
			for (pair, &word) in bytes.chunks_exact_mut(2).zip(&words) {
				pair.copy_from_slice(&word.to_be_bytes());
			}
			// The final byte may be padding; the header says how much is real
			let bytes = &bytes[..original_length];

			if crc32fast::hash(bytes) != header.checksum {
				return Err(SrzError::CorruptBlock("checksum mismatch"));
			}
			sink.write_all(bytes)?;

			debug!(
				"block {}: {} payload bytes in, {} bytes out",
				block_index, compressed_length, original_length
			);
			block_index += 1;
			total_out += original_length as u64;
		}

		sink.flush()?;
		info!("decompressed {} blocks into {} bytes", block_index, total_out);

		Ok(sink)
	}
}

/// Checks a block header against the limits implied by the stream's block
/// size before any allocation is sized from it.
fn validate_block_header(header: &BlockHeader, block_bytes: usize) -> Result<(), SrzError> {
	if header.original_length == 0 || header.original_length > block_bytes as u64 {
		return Err(SrzError::CorruptBlock(
			"block length outside the stream's block size"
		));
	}

	let max_payload = 4 * block::worst_case_elements(block_bytes.div_ceil(2)) as u64;
	if header.compressed_length == 0
		|| header.compressed_length % 4 != 0
		|| header.compressed_length > max_payload
	{
		return Err(SrzError::CorruptBlock(
			"payload length is not a plausible code element count"
		));
	}

	Ok(())
}

/// Reads the next block header, distinguishing a clean end of stream (`None`)
/// from a header cut short by EOF.
fn read_block_header<R: Read>(source: &mut R) -> Result<Option<BlockHeader>, SrzError> {
	let mut bytes = [0; BLOCK_HEADER_LENGTH];
	match read_until_full(source, &mut bytes)? {
		0 => Ok(None),
		BLOCK_HEADER_LENGTH => Ok(Some(BlockHeader::from_bytes(&bytes))),
		_ => Err(SrzError::Truncated)
	}
}

/// Reads from `source` until `buffer` is full or EOF is reached, returning
/// how many bytes were read. Interrupted reads are retried.
fn read_until_full<R: Read>(source: &mut R, buffer: &mut [u8]) -> io::Result<usize> {
	let mut filled = 0;
	while filled < buffer.len() {
		match source.read(&mut buffer[filled..]) {
			Ok(0) => break,
			Ok(read) => filled += read,
			Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
			Err(error) => return Err(error)
		}
	}

	Ok(filled)
}

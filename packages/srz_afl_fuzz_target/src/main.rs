use std::io;

use srz::StreamDecompressor;

fn main() {
	afl::fuzz!(|data: &[u8]| {
		// Each fuzz run has to be pretty fast. Just check that no crashes
		// happen: errors on malformed streams are expected
		StreamDecompressor::new().decompress(data, io::sink()).ok();
	})
}

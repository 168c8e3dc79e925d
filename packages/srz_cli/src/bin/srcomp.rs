use std::borrow::Cow;
use std::env;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write, stdin, stdout};
use std::process::exit;
use std::time::Instant;

use getopts::{Matches, Options};
use log::info;
use stderrlog::ColorChoice;

use srz::{CompressorSettings, SRZ_VERSION_TAG, StreamCompressor, StreamDecompressor};

fn main() {
	exit(match run() {
		Ok(_) => 0,
		Err(err) => {
			eprintln!("{}", err);
			1
		}
	})
}

fn run() -> Result<(), Cow<'static, str>> {
	let mut options = Options::new();

	options
		.optflag(
			"h",
			"help",
			"Prints information about the accepted command line arguments and exits."
		)
		.optflag(
			"",
			"version",
			"Prints version and copyright information, then exits."
		)
		.optflag("c", "compress", "Compresses the input into the output.")
		.optflag("d", "decompress", "Decompresses the input into the output.")
		.optflag(
			"p",
			"previous-byte",
			"Engages the previous-byte median heuristic while compressing, which \
			usually improves the ratio on smooth data such as sampled waveforms. \
			Decompression picks the setting up from the stream itself."
		)
		.optopt(
			"i",
			"input",
			"The file to read from. If not specified, standard input is read.",
			"FILE"
		)
		.optopt(
			"o",
			"output",
			"The file to write to. If not specified, standard output is written.",
			"FILE"
		)
		.optopt(
			"b",
			"block-size",
			"The compression block size, in kilobytes, between 1 and 65536. \
			Each block is compressed and decompressed independently. \
			The default value is 1.",
			"KILOBYTES"
		)
		.optflag(
			"q",
			"quiet",
			"When enabled, the program will only print error messages, unless -h is specified."
		)
		.optflagmulti(
			"v",
			"verbose",
			"Increases the verbosity of the messages. Can be repeated several times."
		);

	match options.parse(env::args().skip(1)) {
		Ok(matches) => {
			if matches.opt_present("h") {
				print_header();
				println!();
				println!("Usage:");
				print!(
					"    {} [-c|-d] [-i FILE] [-o FILE] [-p] [-b KILOBYTES]",
					env!("CARGO_BIN_NAME")
				);
				println!("{}", options.usage(""));
			} else if matches.opt_present("version") {
				print_header();
			} else {
				let quiet_mode = matches.opt_present("q");

				let mode = match (matches.opt_present("c"), matches.opt_present("d")) {
					(true, false) => Mode::Compress,
					(false, true) => Mode::Decompress,
					_ => {
						return Err(format!(
							"Exactly one of -c and -d must be specified. Run {} -h to see \
							command line argument help",
							env!("CARGO_BIN_NAME")
						))?;
					}
				};

				let input: Box<dyn Read> = match matches.opt_str("i") {
					Some(path) => Box::new(BufReader::new(
						File::open(&path)
							.map_err(|err| format!("Could not open input file {}: {}", path, err))?
					)),
					None => Box::new(stdin().lock())
				};

				let output: Box<dyn Write> = match matches.opt_str("o") {
					Some(path) => Box::new(BufWriter::new(
						File::create(&path)
							.map_err(|err| format!("Could not open output file {}: {}", path, err))?
					)),
					None => Box::new(stdout().lock())
				};

				init_logging(&matches, quiet_mode);

				process(&matches, mode, input, output)?;
			}

			Ok(())
		}
		Err(parse_err) => Err(format!(
			"{}\nRun {} -h to see command line argument help",
			parse_err,
			env!("CARGO_BIN_NAME")
		))?
	}
}

fn process(
	option_matches: &Matches,
	mode: Mode,
	input: Box<dyn Read>,
	output: Box<dyn Write>
) -> Result<(), Cow<'static, str>> {
	let begin = Instant::now();

	match mode {
		Mode::Compress => {
			let block_size_kib = option_matches
				.opt_get("b")
				.map_err(|err| format!("Invalid block size: {}", err))?
				.unwrap_or(1);

			let settings = CompressorSettings {
				block_size_kib,
				use_previous_byte: option_matches.opt_present("p")
			};

			info!("Compressing with {} KiB blocks...", settings.block_size_kib);

			StreamCompressor::new(settings)
				.compress(input, output)
				.map_err(|err| format!("Error while compressing the input: {}", err))?;
		}
		Mode::Decompress => {
			info!("Decompressing...");

			StreamDecompressor::new()
				.decompress(input, output)
				.map_err(|err| format!("Error while decompressing the input: {}", err))?;
		}
	}

	info!(
		"Completed in {:.3} s. Have a nice day!",
		begin.elapsed().as_secs_f64()
	);

	Ok(())
}

fn init_logging(option_matches: &Matches, quiet_mode: bool) {
	let verbosity_level = option_matches.opt_count("v");

	stderrlog::new()
		.module("srz")
		.verbosity(2 + verbosity_level)
		.show_level(false)
		.quiet(quiet_mode)
		.color(ColorChoice::Never)
		.init()
		.unwrap();
}

fn print_header() {
	println!("{}", SRZ_VERSION_TAG);
	println!("{}", env!("CARGO_PKG_DESCRIPTION"));
	println!("Copyright (C) {}", env!("CARGO_PKG_AUTHORS"));
}

enum Mode {
	Compress,
	Decompress
}

// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command-line front end: parse a KDL document and re-print it canonically.
//!
//! Flag set mirrors `kdl/cli.py`'s argparse definitions (`--indent`,
//! `--semicolons`, `--[no-]radix`, `--[no-]raw-strings`, `--exponent`).
//! Wired up the way `orgish-tools`' optional `cli` feature keeps `clap` and
//! `anyhow` out of the library build.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, ValueEnum};
use kdldoc::{ExponentCase, ParseConfig, PrintConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExponentArg {
	Lower,
	Upper,
}

impl From<ExponentArg> for ExponentCase {
	fn from(v: ExponentArg) -> Self {
		match v {
			ExponentArg::Lower => ExponentCase::Lower,
			ExponentArg::Upper => ExponentCase::Upper,
		}
	}
}

/// Parse a KDL document and print it back in canonical form.
#[derive(Debug, ClapParser)]
#[command(name = "kdldoc", version, about)]
struct Cli {
	/// Input file; reads stdin when omitted.
	input: Option<PathBuf>,

	/// Write output here instead of stdout.
	#[arg(short, long)]
	output: Option<PathBuf>,

	/// Spaces per indentation level; -1 selects a single tab.
	#[arg(long, allow_negative_numbers = true, default_value_t = -1)]
	indent: i64,

	/// Terminate nodes with `;` instead of a newline.
	#[arg(long)]
	semicolons: bool,

	/// Print integers in their original radix.
	#[arg(long, default_value_t = true, overrides_with = "no_radix")]
	radix: bool,
	#[arg(long = "no-radix")]
	no_radix: bool,

	/// Print strings using their original raw/quoted flavor.
	#[arg(long = "raw-strings", default_value_t = true, overrides_with = "no_raw_strings")]
	raw_strings: bool,
	#[arg(long = "no-raw-strings")]
	no_raw_strings: bool,

	/// Case of the exponent marker (`e`/`E`) in decimal literals.
	#[arg(long, value_enum, default_value_t = ExponentArg::Lower)]
	exponent: ExponentArg,

	/// Sort node properties by key.
	#[arg(long)]
	sort_properties: bool,

	/// Apply the built-in native-tag conversions (`i8`, `url`, `uuid`, ...)
	/// while parsing, instead of leaving tagged values untouched.
	#[arg(long, default_value_t = true)]
	native_tags: bool,
}

fn run(cli: Cli) -> Result<()> {
	let text = match &cli.input {
		Some(path) => {
			log::debug!("reading {}", path.display());
			fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
		}
		None => {
			log::debug!("reading stdin");
			let mut buf = String::new();
			io::stdin().read_to_string(&mut buf).context("reading stdin")?;
			buf
		}
	};
	log::debug!("read {} bytes", text.len());

	let mut parse_config = ParseConfig::new();
	parse_config.native_tagged_values = cli.native_tags;

	log::debug!("parsing with native_tags={}", cli.native_tags);
	let doc = kdldoc::parse_with(&text, &parse_config).map_err(|e| {
		log::error!("{e}");
		anyhow::anyhow!("{e}")
	})?;
	log::debug!("parsed {} top-level nodes", doc.nodes.len());

	let indent = if cli.indent < 0 { "\t".to_string() } else { " ".repeat(cli.indent as usize) };
	let print_config = PrintConfig {
		indent,
		semicolons: cli.semicolons,
		respect_radix: cli.radix && !cli.no_radix,
		respect_string_type: cli.raw_strings && !cli.no_raw_strings,
		exponent: cli.exponent.into(),
		sort_properties: cli.sort_properties,
		..PrintConfig::default()
	};

	log::debug!("printing");
	let rendered = doc.print(&print_config);
	match &cli.output {
		Some(path) => {
			log::debug!("writing {}", path.display());
			fs::write(path, rendered).with_context(|| format!("writing {}", path.display()))?
		}
		None => io::stdout().write_all(rendered.as_bytes()).context("writing stdout")?,
	}
	Ok(())
}

fn main() -> ExitCode {
	env_logger::init();
	let cli = Cli::parse();
	match run(cli) {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			eprintln!("kdldoc: {e:#}");
			ExitCode::FAILURE
		}
	}
}

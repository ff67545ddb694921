//! Parse-time and print-time configuration.
//!
//! Ports the field sets of `kdlpy`'s `parsing.ParseConfig` and
//! `printing.PrintConfig` dataclasses (`kdl/parsing.py`, `kdl/printing.py`).
//! `sortProperties` has no Python counterpart; the closest the Python
//! reference gets is sorting at call sites rather than in config.

use crate::convert::{builtin_value_converters, NodeConverters, ValueConverters};

/// Governs how the parser resolves tag conversions.
#[derive(Clone)]
pub struct ParseConfig {
	/// Convert untagged literals straight to native Rust scalars.
	pub native_untagged_values: bool,
	/// Apply the built-in native-tag conversions (`i8`, `url`, `uuid`, ...).
	pub native_tagged_values: bool,
	/// User value converters, tried before the built-ins.
	pub value_converters: ValueConverters,
	/// User node converters, run once a node's entries and children are
	/// fully assembled; a match is stored in [`crate::value::Node::native`].
	pub node_converters: NodeConverters,
}

impl Default for ParseConfig {
	fn default() -> Self {
		Self {
			native_untagged_values: true,
			native_tagged_values: true,
			value_converters: ValueConverters::new(),
			node_converters: NodeConverters::new(),
		}
	}
}

impl ParseConfig {
	pub fn new() -> Self {
		Self::default()
	}

	/// The registry actually consulted during parsing: user converters take
	/// priority, falling through to the built-ins unless
	/// `native_tagged_values` is disabled.
	pub(crate) fn effective_value_converters(&self) -> ValueConverters {
		let mut merged = self.value_converters.clone();
		if self.native_tagged_values {
			for (key, f) in builtin_value_converters().into_pairs() {
				merged.register(key, f);
			}
		}
		merged
	}
}

/// Which case to render the `#inf`/`#-inf`/`#nan`/`e`/`E` exponent marker in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExponentCase {
	Lower,
	Upper,
}

/// Governs canonical re-serialization.
#[derive(Debug, Clone)]
pub struct PrintConfig {
	/// Text prepended per nesting depth (default a single tab).
	pub indent: String,
	/// Terminate every node with `;` instead of a newline.
	pub semicolons: bool,
	/// Emit `null` arguments rather than silently dropping them.
	pub print_null_args: bool,
	/// Emit `key=null` properties rather than silently dropping them.
	pub print_null_props: bool,
	/// Print integers in their original radix (`0x..`/`0o..`/`0b..`) rather
	/// than always decimal.
	pub respect_radix: bool,
	/// Print strings using their original flavor (raw vs. quoted) rather
	/// than always the canonical quoted form.
	pub respect_string_type: bool,
	pub exponent: ExponentCase,
	/// Sort properties by key before printing (ties broken by original
	/// position, so the sort is stable).
	pub sort_properties: bool,
}

impl Default for PrintConfig {
	fn default() -> Self {
		Self {
			indent: "\t".to_string(),
			semicolons: false,
			print_null_args: true,
			print_null_props: true,
			respect_radix: true,
			respect_string_type: true,
			exponent: ExponentCase::Lower,
			sort_properties: false,
		}
	}
}

impl PrintConfig {
	pub fn new() -> Self {
		Self::default()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_spec_table() {
		let pc = PrintConfig::default();
		assert_eq!(pc.indent, "\t");
		assert!(!pc.semicolons);
		assert!(pc.print_null_args);
		assert!(pc.respect_radix);
		assert_eq!(pc.exponent, ExponentCase::Lower);
	}

	#[test]
	fn parse_config_defaults_apply_builtins() {
		let cfg = ParseConfig::default();
		assert!(cfg.native_tagged_values);
		assert!(cfg.native_untagged_values);
	}
}

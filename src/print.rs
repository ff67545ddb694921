//! Canonical printer: turns a [`Document`]/[`Node`]/[`Value`] back into KDL
//! text under a [`PrintConfig`].
//!
//! Grounded on `kdlite`'s `impl fmt::Display for Node`/`Document` and its
//! `IdentDisplay` wrapper (`src/dom.rs`), which decide identifier-vs-quoted
//! form the same way: scan the text against the identifier grammar before
//! falling back to an escaped literal. This module generalizes that
//! decision to cover raw strings and radix-preserving integers too,
//! governed by the `PrintConfig` knobs below.

use crate::config::{ExponentCase, PrintConfig};
use crate::grammar;
use crate::number::{format_radix, Mantissa, Radix};
use crate::convert::Native;
use crate::value::{Document, Node, Value};

fn is_bare_identifier(s: &str) -> bool {
	if s.is_empty() || grammar::is_reserved_keyword(s) {
		return false;
	}
	let mut chars = s.chars();
	let first = chars.next().unwrap();
	if first.is_ascii_digit() {
		return false;
	}
	if grammar::is_sign(first) || first == '.' {
		if let Some(second) = s.chars().nth(1) {
			if second.is_ascii_digit() {
				return false;
			}
		}
	}
	s.chars().all(grammar::is_ident_char)
}

fn escape_quoted(s: &str) -> String {
	let mut out = String::with_capacity(s.len() + 2);
	out.push('"');
	for ch in s.chars() {
		match ch {
			'\\' => out.push_str("\\\\"),
			'"' => out.push_str("\\\""),
			'\n' => out.push_str("\\n"),
			'\r' => out.push_str("\\r"),
			'\t' => out.push_str("\\t"),
			'\u{08}' => out.push_str("\\b"),
			'\u{0C}' => out.push_str("\\f"),
			c if (c as u32) < 0x20 => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
			c => out.push(c),
		}
	}
	out.push('"');
	out
}

/// Smallest number of `#` marks a raw string delimiter needs so that no
/// `"` (possibly followed by `#`s) inside `content` is mistaken for the
/// closing delimiter.
fn minimal_raw_hashes(content: &str) -> usize {
	if !content.contains('"') {
		return 0;
	}
	let chars: Vec<char> = content.chars().collect();
	let mut max_run = 0usize;
	let mut i = 0;
	while i < chars.len() {
		if chars[i] == '"' {
			let mut j = i + 1;
			let mut run = 0usize;
			while j < chars.len() && chars[j] == '#' {
				run += 1;
				j += 1;
			}
			max_run = max_run.max(run);
			i = j;
		} else {
			i += 1;
		}
	}
	max_run + 1
}

fn print_raw_string(s: &str) -> String {
	if s.contains('\n') {
		return print_multiline_raw_string(s);
	}
	let hashes = minimal_raw_hashes(s);
	let h = "#".repeat(hashes);
	format!("r{h}\"{s}\"{h}")
}

/// Emits `s` as a multiline raw string: an indented body wrapped in
/// `r#"""\n ... \n"""#`-style delimiters, so re-parsing goes through
/// [`crate::parser::Parser::dedent_multiline`] instead of the single-line
/// raw-string path, which hard-errors on an embedded newline.
fn print_multiline_raw_string(s: &str) -> String {
	let hashes = minimal_raw_hashes(s);
	let h = "#".repeat(hashes);
	let mut out = format!("r{h}\"\"\"\n");
	for line in s.split('\n') {
		out.push_str(line);
		out.push('\n');
	}
	out.push_str(&format!("\"\"\"{h}"));
	out
}

/// Print `s` as a bare identifier if the grammar allows it, else as an
/// escaped quoted string. Used for node names, tags, and property keys.
pub(crate) fn print_identifier(s: &str) -> String {
	if is_bare_identifier(s) {
		s.to_string()
	} else {
		escape_quoted(s)
	}
}

fn with_tag(tag: Option<&str>, body: String) -> String {
	match tag {
		Some(t) => format!("({}){}", print_identifier(t), body),
		None => body,
	}
}

fn print_decimal(mantissa: &Mantissa, exponent: i32, config: &PrintConfig) -> String {
	if let Mantissa::Float(v) = mantissa {
		if v.is_nan() {
			return "#nan".to_string();
		}
		if v.is_infinite() {
			return if *v < 0.0 { "#-inf".to_string() } else { "#inf".to_string() };
		}
	}
	if exponent == 0 {
		return mantissa.to_string();
	}
	let marker = match config.exponent {
		ExponentCase::Lower => 'e',
		ExponentCase::Upper => 'E',
	};
	format!("{mantissa}{marker}{exponent}")
}

pub fn print_value(value: &Value, config: &PrintConfig) -> String {
	match value {
		Value::Binary(v, tag) => with_tag(tag.as_deref(), radix_body(*v, Radix::Binary, config)),
		Value::Octal(v, tag) => with_tag(tag.as_deref(), radix_body(*v, Radix::Octal, config)),
		Value::Hex(v, tag) => with_tag(tag.as_deref(), radix_body(*v, Radix::Hexadecimal, config)),
		Value::Decimal(m, exp, tag) => with_tag(tag.as_deref(), print_decimal(m, *exp, config)),
		Value::Bool(b, tag) => with_tag(tag.as_deref(), b.to_string()),
		Value::Null(tag) => with_tag(tag.as_deref(), "null".to_string()),
		Value::String(s, tag) => with_tag(tag.as_deref(), print_identifier_or_quoted(s)),
		Value::RawString(s, tag) => {
			with_tag(tag.as_deref(), if config.respect_string_type { print_raw_string(s) } else { escape_quoted(s) })
		}
		Value::ExactValue(s, tag) => with_tag(tag.as_deref(), s.clone()),
		Value::Native(n) => print_native(n),
	}
}

/// A converted value carries no tag and no original string-literal flavor,
/// so string-shaped natives are re-quoted like an ordinary string rather
/// than trusted to already be identifier-safe.
fn print_native(n: &Native) -> String {
	match n {
		Native::Str(v) => print_identifier_or_quoted(v),
		Native::Date(_)
		| Native::Time(_)
		| Native::DateTime(_)
		| Native::Ipv4(_)
		| Native::Ipv6(_)
		| Native::Url(_)
		| Native::Uuid(_)
		| Native::Regex(_)
		| Native::Base64(_) => print_identifier_or_quoted(&n.to_string()),
		_ => n.to_string(),
	}
}

fn radix_body(v: i128, radix: Radix, config: &PrintConfig) -> String {
	if config.respect_radix {
		format_radix(v, radix)
	} else {
		v.to_string()
	}
}

fn print_identifier_or_quoted(s: &str) -> String {
	escape_quoted(s)
}

pub fn print_node(node: &Node, config: &PrintConfig, indent_level: usize) -> String {
	let indent = config.indent.repeat(indent_level);
	let mut out = String::new();
	out.push_str(&indent);
	if let Some(tag) = &node.tag {
		out.push('(');
		out.push_str(&print_identifier(tag));
		out.push(')');
	}
	out.push_str(&print_identifier(&node.name));

	for arg in node.args() {
		if matches!(arg, Value::Null(_)) && !config.print_null_args {
			continue;
		}
		out.push(' ');
		out.push_str(&print_value(arg, config));
	}

	let mut props: Vec<(&str, &Value)> = node.props().collect();
	if config.sort_properties {
		props.sort_by(|a, b| a.0.cmp(b.0));
	}
	for (key, val) in props {
		if matches!(val, Value::Null(_)) && !config.print_null_props {
			continue;
		}
		out.push(' ');
		out.push_str(&print_identifier(key));
		out.push('=');
		out.push_str(&print_value(val, config));
	}

	if node.nodes.is_empty() {
		out.push_str(if config.semicolons { ";\n" } else { "\n" });
	} else {
		out.push_str(" {\n");
		for child in &node.nodes {
			out.push_str(&print_node(child, config, indent_level + 1));
		}
		out.push_str(&indent);
		out.push_str("}\n");
	}
	out
}

pub fn print_document(doc: &Document, config: &PrintConfig) -> String {
	if doc.nodes.is_empty() {
		return "\n".to_string();
	}
	doc.nodes.iter().map(|n| print_node(n, config, 0)).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::value::{Entry, Node};

	#[test]
	fn bare_identifier_vs_quoted() {
		assert_eq!(print_identifier("hello"), "hello");
		assert_eq!(print_identifier("hello world"), "\"hello world\"");
		assert_eq!(print_identifier("123abc"), "\"123abc\"");
		assert_eq!(print_identifier("true"), "\"true\"");
	}

	#[test]
	fn radix_respects_config() {
		let mut cfg = PrintConfig::default();
		let v = Value::Hex(26, None);
		assert_eq!(print_value(&v, &cfg), "0x1a");
		cfg.respect_radix = false;
		assert_eq!(print_value(&v, &cfg), "26");
	}

	#[test]
	fn special_floats_print_as_keywords() {
		let cfg = PrintConfig::default();
		assert_eq!(print_value(&Value::Decimal(Mantissa::Float(f64::NAN), 0, None), &cfg), "#nan");
		assert_eq!(print_value(&Value::Decimal(Mantissa::Float(f64::INFINITY), 0, None), &cfg), "#inf");
		assert_eq!(print_value(&Value::Decimal(Mantissa::Float(f64::NEG_INFINITY), 0, None), &cfg), "#-inf");
	}

	#[test]
	fn raw_string_picks_minimal_hash_count() {
		assert_eq!(print_raw_string("no quotes here"), "r\"no quotes here\"");
		assert_eq!(print_raw_string("has \"one\" quote"), "r#\"has \"one\" quote\"#");
		assert_eq!(print_raw_string("edge \"#case"), "r##\"edge \"#case\"##");
	}

	#[test]
	fn node_prints_args_then_sorted_properties() {
		let node = Node {
			name: "n".to_string(),
			tag: None,
			entries: vec![
				Entry::new_prop("b", Value::Bool(true, None)),
				Entry::new_value(Value::Decimal(Mantissa::Int(1), 0, None)),
				Entry::new_prop("a", Value::Bool(false, None)),
			],
			nodes: vec![],
			native: None,
		};
		let mut cfg = PrintConfig::default();
		cfg.sort_properties = true;
		assert_eq!(print_node(&node, &cfg, 0), "n 1 a=false b=true\n");
	}
}

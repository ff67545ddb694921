// SPDX-License-Identifier: MIT OR Apache-2.0
//! End-to-end conformance tests covering the parse/print round-trip
//! invariants and the construction/query scenarios every `ParseConfig`
//! combination is expected to honor.

use crate::config::{ParseConfig, PrintConfig};
use crate::convert::Native;
use crate::number::Mantissa;
use crate::value::{Document, Node, Value};
use crate::{parse, parse_with};

fn roundtrip(text: &str) -> String {
	let config = ParseConfig { native_untagged_values: false, ..ParseConfig::default() };
	let doc = parse_with(text, &config).unwrap_or_else(|e| panic!("parse failed: {e}\ninput:\n{text}"));
	doc.print(&PrintConfig::default())
}

#[test]
fn print_of_parse_is_idempotent() {
	let text = "node 1 \"two\" key=#true {\n    child (i8)5\n}\n";
	let once = roundtrip(text);
	let twice = parse(&once).unwrap().print(&PrintConfig::default());
	assert_eq!(once, twice, "printing a parsed document twice must converge to the same text");
}

#[test]
fn duplicate_properties_collapse_to_one_entry() {
	let config = ParseConfig { native_untagged_values: false, ..ParseConfig::default() };
	let doc = parse_with("node a=1 a=2 a=3\n", &config).unwrap();
	let n = &doc.nodes[0];
	assert_eq!(n.entries.iter().filter(|e| e.key.as_deref() == Some("a")).count(), 1);
	assert_eq!(n.entry("a").unwrap().value, Value::Decimal(Mantissa::Int(3), 0, None));
}

#[test]
fn slashdash_removes_its_target_entirely() {
	let doc = parse("node 1 /-2 3 /-key=4 {\n    /-child\n    kept\n}\n").unwrap();
	let n = &doc.nodes[0];
	assert_eq!(n.args().count(), 2);
	assert!(n.entry("key").is_none());
	assert_eq!(n.nodes.len(), 1);
	assert_eq!(n.nodes[0].name, "kept");
}

#[test]
fn radix_is_preserved_through_a_round_trip_when_configured() {
	let text = "node 0x1a 0o17 0b101\n";
	assert_eq!(roundtrip(text), text);
}

#[test]
fn string_flavor_is_preserved_through_a_round_trip_when_configured() {
	let text = "node r\"plain\" \"quoted\"\n";
	assert_eq!(roundtrip(text), text);
}

#[test]
fn disabling_respect_radix_normalizes_to_decimal() {
	let config = ParseConfig { native_untagged_values: false, ..ParseConfig::default() };
	let doc = parse_with("node 0x1a\n", &config).unwrap();
	let mut cfg = PrintConfig::default();
	cfg.respect_radix = false;
	assert_eq!(doc.print(&cfg), "node 26\n");
}

#[test]
fn get_and_get_all_filter_by_tag_and_name() {
	let config = ParseConfig { native_untagged_values: false, ..ParseConfig::default() };
	let doc = parse_with("a 1\n(t)a 2\nb 3\n", &config).unwrap();
	assert_eq!(doc.get_all(None, "a").count(), 2);
	assert_eq!(doc.get(Some("t"), "a").unwrap().args().next().unwrap(), &Value::Decimal(Mantissa::Int(2), 0, None));
	assert!(doc.get(None, "missing").is_none());
}

#[test]
fn constructed_document_prints_without_parsing() {
	let doc = Document {
		nodes: vec![Node::new("greeting")
			.with_arg(Value::String("hello".to_string(), None))
			.with_prop("loud", Value::Bool(true, None))],
	};
	assert_eq!(doc.print(&PrintConfig::default()), "greeting \"hello\" loud=true\n");
}

#[test]
fn untagged_values_collapse_to_native_by_default() {
	let doc = parse("node 1 \"two\" #true #null\n").unwrap();
	let n = &doc.nodes[0];
	let args: Vec<_> = n.args().collect();
	assert_eq!(args[0], &Value::Native(Native::Int(1)));
	assert_eq!(args[1], &Value::Native(Native::Str("two".to_string())));
	assert_eq!(args[2], &Value::Native(Native::Bool(true)));
	assert_eq!(args[3], &Value::Native(Native::Null));
}

#[test]
fn native_tagged_value_conversion_end_to_end() {
	let doc = parse("node (u8)200 (url)\"https://example.com/\" (uuid)\"3fa85f64-5717-4562-b3fc-2c963f66afa6\"\n").unwrap();
	let n = &doc.nodes[0];
	let args: Vec<_> = n.args().collect();
	assert_eq!(args[0], &Value::Native(Native::U8(200)));
	assert!(matches!(args[1], Value::Native(Native::Url(_))));
	assert!(matches!(args[2], Value::Native(Native::Uuid(_))));
}

#[test]
fn native_tagged_conversion_can_be_disabled() {
	let mut cfg = ParseConfig::default();
	cfg.native_tagged_values = false;
	let doc = parse_with("node (u8)200\n", &cfg).unwrap();
	let n = &doc.nodes[0];
	assert_eq!(n.args().next().unwrap(), &Value::Decimal(Mantissa::Int(200), 0, Some("u8".to_string())));
}

#[test]
fn out_of_range_tagged_int_conversion_falls_through_untouched() {
	let doc = parse("node (i8)1000\n").unwrap();
	let n = &doc.nodes[0];
	assert_eq!(n.args().next().unwrap(), &Value::Decimal(Mantissa::Int(1000), 0, Some("i8".to_string())));
}

#[test]
fn malformed_document_reports_a_location() {
	let err = parse("node key=\n").unwrap_err();
	assert_eq!(err.line, 1);
}

#[test]
fn vertical_tab_terminates_a_node_like_a_newline() {
	let doc = parse("node 1\u{B}node2 2\n").unwrap();
	assert_eq!(doc.nodes.len(), 2);
	assert_eq!(doc.nodes[1].name, "node2");
}

#[test]
fn children_are_indented_and_braces_balance() {
	let text = "parent {\n\tchild 1\n\tnested {\n\t\tgrandchild\n\t}\n}\n";
	assert_eq!(roundtrip(text), text);
}

#[test]
fn exact_value_construction_rejects_invalid_literals_but_accepts_valid_ones() {
	assert!(Value::exact("1_000").is_ok());
	assert!(Value::exact("not a value }}}").is_err());
}

//! The value model: [`Document`], [`Node`], [`Entry`], [`Value`].
//!
//! Ownership is strict containment: `Document` owns `Node`s, a `Node` owns
//! its `Entry`s and child `Node`s, mirroring `kdlite::dom` (`Document`
//! owning `Vec<Node>`, `Node` owning `Vec<Entry>` plus an optional child
//! `Document`) and `kdlpy`'s `types.Document`/`types.Node`/`Entity`
//! dataclasses. Unlike `kdlite::dom::Value`, which discards radix and
//! string-literal flavor because it's meant to be thrown away after one
//! read, every variant here carries what's needed to print canonical KDL
//! back out: radix for integers, raw-vs-escaped for strings, and an
//! optional tag on every variant.

use crate::config::PrintConfig;
use crate::convert::{Native, NodeKey, ValueKey, ValueKind};
use crate::error::ParseError;
use crate::number::Mantissa;

/// An ordered sequence of [`Node`]s: a whole document, or a node's
/// children block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
	pub nodes: Vec<Node>,
}

impl Document {
	pub fn new() -> Self {
		Self::default()
	}

	/// Parse `text` with the default [`crate::config::ParseConfig`].
	pub fn parse(text: &str) -> Result<Self, ParseError> {
		crate::parser::parse(text, &crate::config::ParseConfig::default())
	}

	/// First child node matching `tag` (if given) and `name`.
	pub fn get<'a>(&'a self, tag: Option<&str>, name: &str) -> Option<&'a Node> {
		self.get_all(tag, name).next()
	}

	/// All child nodes matching `tag` (if given) and `name`, in document order.
	pub fn get_all<'a, 'b>(&'a self, tag: Option<&'b str>, name: &'b str) -> impl Iterator<Item = &'a Node> {
		self.nodes
			.iter()
			.filter(move |n| n.name == name && tag.is_none_or(|t| n.tag.as_deref() == Some(t)))
	}

	pub fn print(&self, config: &PrintConfig) -> String {
		crate::print::print_document(self, config)
	}
}

/// A named statement: optional tag, ordered entries, ordered children.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
	pub name: String,
	pub tag: Option<String>,
	pub entries: Vec<Entry>,
	pub nodes: Vec<Node>,
	/// Set once a registered node converter matched this node after parsing.
	pub native: Option<Native>,
}

impl Node {
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into(), tag: None, entries: Vec::new(), nodes: Vec::new(), native: None }
	}

	pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
		self.tag = Some(tag.into());
		self
	}

	pub fn with_arg(mut self, value: Value) -> Self {
		self.entries.push(Entry::new_value(value));
		self
	}

	pub fn with_prop(mut self, key: impl Into<String>, value: Value) -> Self {
		self.entries.push(Entry::new_prop(key, value));
		self
	}

	pub fn with_children(mut self, nodes: Vec<Node>) -> Self {
		self.nodes = nodes;
		self
	}

	/// Positional arguments, in source order.
	pub fn args(&self) -> impl Iterator<Item = &Value> {
		self.entries.iter().filter(|e| e.key.is_none()).map(|e| &e.value)
	}

	/// Properties, in their retained (first-occurrence) position.
	pub fn props(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.entries.iter().filter_map(|e| e.key.as_deref().map(|k| (k, &e.value)))
	}

	/// An entry addressed by position (among arguments only) or by name
	/// (among properties only), mirroring `kdlite::dom::Node::entry`.
	pub fn entry<'k>(&self, key: impl Into<EntryKey<'k>>) -> Option<&Entry> {
		match key.into() {
			EntryKey::Pos(pos) => self.entries.iter().filter(|e| e.key.is_none()).nth(pos),
			EntryKey::Name(name) => self.entries.iter().rfind(|e| e.key.as_deref() == Some(name)),
		}
	}

	/// Does this node's `(tag, name)` match `key`? Used by the node
	/// converter registry.
	pub fn matches_key(&self, key: &NodeKey) -> bool {
		key.matches(self)
	}

	/// The node converter's output, if one matched this node after parsing.
	pub fn native(&self) -> Option<&Native> {
		self.native.as_ref()
	}

	pub fn print(&self, config: &PrintConfig, indent_level: usize) -> String {
		crate::print::print_node(self, config, indent_level)
	}
}

/// A numeric or textual key addressing an [`Entry`] within a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKey<'a> {
	Pos(usize),
	Name(&'a str),
}
impl From<usize> for EntryKey<'_> {
	fn from(v: usize) -> Self {
		EntryKey::Pos(v)
	}
}
impl<'a> From<&'a str> for EntryKey<'a> {
	fn from(v: &'a str) -> Self {
		EntryKey::Name(v)
	}
}

/// An argument (`key: None`) or a property (`key: Some`). Duplicate
/// property keys are already collapsed by the time a `Node` exists; see
/// [`crate::parser`]'s entry-merging logic.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
	pub key: Option<String>,
	pub value: Value,
}

impl Entry {
	pub fn new_value(value: Value) -> Self {
		Self { key: None, value }
	}

	pub fn new_prop(key: impl Into<String>, value: Value) -> Self {
		Self { key: Some(key.into()), value }
	}
}

/// The scalar a [`Value`] carries underneath its formatting/tag metadata:
/// the read-only ".value accessor" a `Value` exposes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
	Int(i128),
	Float(f64),
	Bool(bool),
	Null,
	Str(&'a str),
	Native(&'a Native),
}

/// A tagged sum of every literal shape the grammar can produce, plus
/// [`Value::Native`] for values that have passed through a built-in or
/// user tag conversion via the converter-dispatch step.
#[derive(Debug, Clone)]
pub enum Value {
	/// An integer literal written `0b...`.
	Binary(i128, Option<String>),
	/// An integer literal written `0o...`.
	Octal(i128, Option<String>),
	/// An integer literal written `0x...`.
	Hex(i128, Option<String>),
	/// A base-10 literal; `value = mantissa * 10^exponent`.
	Decimal(Mantissa, i32, Option<String>),
	Bool(bool, Option<String>),
	Null(Option<String>),
	/// A decoded string, originally quoted, identifier, or multiline.
	String(String, Option<String>),
	/// A decoded string that was written as a raw (`r#"..."#`) literal.
	RawString(String, Option<String>),
	/// An opaque, pre-formatted token bypassing all formatting rules.
	/// Constructed only via [`Value::exact`], which best-effort validates
	/// that the literal actually parses as a value.
	ExactValue(String, Option<String>),
	/// The result of a built-in or user value-converter.
	Native(Native),
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		use Value::*;
		match (self, other) {
			(Binary(a, ta), Binary(b, tb)) | (Octal(a, ta), Octal(b, tb)) | (Hex(a, ta), Hex(b, tb)) => {
				a == b && ta == tb
			}
			(Decimal(a, ea, ta), Decimal(b, eb, tb)) => a == b && ea == eb && ta == tb,
			(Bool(a, ta), Bool(b, tb)) => a == b && ta == tb,
			(Null(ta), Null(tb)) => ta == tb,
			(String(a, ta), String(b, tb)) | (RawString(a, ta), RawString(b, tb)) | (ExactValue(a, ta), ExactValue(b, tb)) => {
				a == b && ta == tb
			}
			(Native(a), Native(b)) => a == b,
			_ => false,
		}
	}
}

impl Value {
	pub fn tag(&self) -> Option<&str> {
		match self {
			Value::Binary(_, t) | Value::Octal(_, t) | Value::Hex(_, t) | Value::Bool(_, t) | Value::Null(t) => {
				t.as_deref()
			}
			Value::Decimal(_, _, t) => t.as_deref(),
			Value::String(_, t) | Value::RawString(_, t) | Value::ExactValue(_, t) => t.as_deref(),
			Value::Native(_) => None,
		}
	}

	pub fn set_tag(&mut self, tag: Option<String>) {
		match self {
			Value::Binary(_, t) | Value::Octal(_, t) | Value::Hex(_, t) | Value::Bool(_, t) | Value::Null(t) => {
				*t = tag
			}
			Value::Decimal(_, _, t) => *t = tag,
			Value::String(_, t) | Value::RawString(_, t) | Value::ExactValue(_, t) => *t = tag,
			Value::Native(_) => {}
		}
	}

	/// The read-only underlying scalar, stripped of formatting metadata.
	pub fn scalar(&self) -> Scalar<'_> {
		match self {
			Value::Binary(v, _) | Value::Octal(v, _) | Value::Hex(v, _) => Scalar::Int(*v),
			Value::Decimal(m, exp, _) => match m {
				Mantissa::Int(v) if *exp == 0 => Scalar::Int(*v),
				_ => Scalar::Float(m.as_f64() * 10f64.powi(*exp)),
			},
			Value::Bool(v, _) => Scalar::Bool(*v),
			Value::Null(_) => Scalar::Null,
			Value::String(s, _) | Value::RawString(s, _) | Value::ExactValue(s, _) => Scalar::Str(s),
			Value::Native(n) => Scalar::Native(n),
		}
	}

	pub fn kind(&self) -> ValueKind {
		match self {
			Value::Binary(..) => ValueKind::Binary,
			Value::Octal(..) => ValueKind::Octal,
			Value::Hex(..) => ValueKind::Hex,
			Value::Decimal(..) => ValueKind::Decimal,
			Value::Bool(..) => ValueKind::Bool,
			Value::Null(..) => ValueKind::Null,
			Value::String(..) => ValueKind::String,
			Value::RawString(..) => ValueKind::RawString,
			Value::ExactValue(..) => ValueKind::ExactValue,
			Value::Native(..) => ValueKind::Native,
		}
	}

	/// Does this value's `(tag, runtime-type)` match `key`?
	pub fn matches_key(&self, key: &ValueKey) -> bool {
		key.matches(self)
	}

	pub fn print(&self, config: &PrintConfig) -> String {
		crate::print::print_value(self, config)
	}

	/// Build an opaque, pre-formatted value, bypassing all printer
	/// formatting rules, with a best-effort re-parse check at construction
	/// time: `literal` is rejected if `node <literal>` doesn't parse back to
	/// a single-argument node, so the printer can never be made to emit
	/// invalid KDL.
	pub fn exact(literal: impl Into<String>) -> Result<Self, ParseError> {
		let literal = literal.into();
		let probe = format!("node {literal}\n");
		let doc = crate::parser::parse(&probe, &crate::config::ParseConfig::default())?;
		let ok = doc.nodes.len() == 1 && doc.nodes[0].entries.len() == 1 && doc.nodes[0].entries[0].key.is_none();
		if !ok {
			return Err(ParseError::new(1, 6, 5, format!("'{literal}' is not a valid single KDL value literal")));
		}
		Ok(Value::ExactValue(literal, None))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn document_get_filters_by_tag_and_name() {
		let mut doc = Document::new();
		doc.nodes.push(Node::new("a"));
		doc.nodes.push(Node::new("a").with_tag("t"));
		assert!(doc.get(None, "a").is_some());
		assert_eq!(doc.get_all(None, "a").count(), 2);
		assert_eq!(doc.get_all(Some("t"), "a").count(), 1);
		assert!(doc.get(Some("missing"), "a").is_none());
	}

	#[test]
	fn node_entry_lookup_by_position_and_name() {
		let node = Node::new("n")
			.with_arg(Value::Decimal(Mantissa::Int(1), 0, None))
			.with_prop("k", Value::Bool(true, None))
			.with_arg(Value::Decimal(Mantissa::Int(2), 0, None));
		assert_eq!(node.entry(0).unwrap().value, Value::Decimal(Mantissa::Int(1), 0, None));
		assert_eq!(node.entry(1).unwrap().value, Value::Decimal(Mantissa::Int(2), 0, None));
		assert_eq!(node.entry("k").unwrap().value, Value::Bool(true, None));
		assert!(node.entry("missing").is_none());
	}

	#[test]
	fn exact_value_rejects_junk() {
		assert!(Value::exact("1 2").is_err());
		assert!(Value::exact("not valid {{{").is_err());
		assert!(Value::exact("42").is_ok());
	}
}

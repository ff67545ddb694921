//! Native-type conversions and the converter registries.
//!
//! Ports `kdl/converters.py`'s `toNative` dispatch table: a value (or, for
//! the node-level extension, a whole tagged node) is handed to user
//! converters first, then to the built-in tag handlers, in registration
//! order, until one returns [`ConvertOutcome::Handled`]. Python expresses
//! "didn't handle this one, try the next" by returning `NotImplemented`;
//! [`ConvertOutcome::Unhandled`] is the typed equivalent.
//!
//! `ValueKey`/`NodeKey` generalize `kdl/t.py`'s matcher union
//! (`str | None | Ellipsis | re.Pattern | Callable`) into a small enum tree
//! instead of `Any`-typed tuples, so registration is still total (every
//! value/node either matches or doesn't) but checkable at compile time.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use std::sync::Arc;

use base64::Engine as _;
use regex::Regex;

use crate::value::{Node, Scalar, Value};

/// A compiled regex with value semantics, so it can live inside a `Clone +
/// PartialEq + Eq` [`Native`] variant. `regex::Regex` itself only derives
/// `Clone`; pattern-text equality is close enough for a document value.
#[derive(Clone)]
pub struct RegexValue(pub Regex);

impl PartialEq for RegexValue {
	fn eq(&self, other: &Self) -> bool {
		self.0.as_str() == other.0.as_str()
	}
}
impl Eq for RegexValue {}
impl fmt::Debug for RegexValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Regex({:?})", self.0.as_str())
	}
}

/// The closed set of types a built-in (or user) converter can produce.
/// Deliberately not a `Box<dyn Any>` catch-all: keeping this a concrete enum
/// lets `Value` stay `Clone`/comparable, at the cost of user converters only
/// being able to target one of these shapes (see `DESIGN.md`).
#[derive(Debug, Clone, PartialEq)]
pub enum Native {
	I8(i8),
	I16(i16),
	I32(i32),
	I64(i64),
	U8(u8),
	U16(u16),
	U32(u32),
	U64(u64),
	F32(f32),
	F64(f64),
	Decimal(rust_decimal::Decimal),
	Date(chrono::NaiveDate),
	Time(chrono::NaiveTime),
	DateTime(chrono::DateTime<chrono::FixedOffset>),
	Ipv4(Ipv4Addr),
	Ipv6(Ipv6Addr),
	Url(url::Url),
	Uuid(uuid::Uuid),
	Regex(RegexValue),
	Base64(Vec<u8>),
	/// Passthrough for a user converter that just wants to re-tag a scalar
	/// without otherwise changing it.
	Bool(bool),
	Int(i128),
	Str(String),
	Null,
}

impl fmt::Display for Native {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Native::I8(v) => write!(f, "{v}"),
			Native::I16(v) => write!(f, "{v}"),
			Native::I32(v) => write!(f, "{v}"),
			Native::I64(v) => write!(f, "{v}"),
			Native::U8(v) => write!(f, "{v}"),
			Native::U16(v) => write!(f, "{v}"),
			Native::U32(v) => write!(f, "{v}"),
			Native::U64(v) => write!(f, "{v}"),
			Native::F32(v) => write!(f, "{v}"),
			Native::F64(v) => write!(f, "{v}"),
			Native::Decimal(v) => write!(f, "{v}"),
			Native::Date(v) => write!(f, "{v}"),
			Native::Time(v) => write!(f, "{v}"),
			Native::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
			Native::Ipv4(v) => write!(f, "{v}"),
			Native::Ipv6(v) => write!(f, "{v}"),
			Native::Url(v) => write!(f, "{v}"),
			Native::Uuid(v) => write!(f, "{v}"),
			Native::Regex(v) => write!(f, "{}", v.0.as_str()),
			Native::Base64(v) => write!(f, "{}", base64::engine::general_purpose::STANDARD.encode(v)),
			Native::Bool(v) => write!(f, "{v}"),
			Native::Int(v) => write!(f, "{v}"),
			Native::Str(v) => write!(f, "{v}"),
			Native::Null => write!(f, "null"),
		}
	}
}

/// What a registry entry may answer when offered a value or node.
pub enum ConvertOutcome<T> {
	Unhandled,
	Handled(T),
}

/// Matches a single optional string (a value's tag, or a node's name):
/// the leaf of `ValueKey`/`NodeKey`.
#[derive(Clone)]
pub enum Matcher {
	Literal(String),
	Any,
	Regex(Regex),
	Predicate(Arc<dyn Fn(Option<&str>) -> bool + Send + Sync>),
}

impl fmt::Debug for Matcher {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Matcher::Literal(s) => write!(f, "Literal({s:?})"),
			Matcher::Any => write!(f, "Any"),
			Matcher::Regex(r) => write!(f, "Regex({:?})", r.as_str()),
			Matcher::Predicate(_) => write!(f, "Predicate(..)"),
		}
	}
}

impl Matcher {
	pub fn matches(&self, subject: Option<&str>) -> bool {
		match self {
			Matcher::Literal(s) => subject == Some(s.as_str()),
			Matcher::Any => true,
			Matcher::Regex(r) => subject.is_some_and(|s| r.is_match(s)),
			Matcher::Predicate(f) => f(subject),
		}
	}
}

impl From<&str> for Matcher {
	fn from(s: &str) -> Self {
		Matcher::Literal(s.to_string())
	}
}

/// Which runtime shape a [`Value`] currently holds; used by
/// [`ValueKey::TagAndKind`] to match on type as well as tag, the way
/// `kdl/t.py`'s tuple matcher keys pair a tag matcher with a type matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
	Binary,
	Octal,
	Hex,
	Decimal,
	Bool,
	Null,
	String,
	RawString,
	ExactValue,
	Native,
}

/// A matcher for the value converter registry: tag alone, tag-and-kind, or
/// an arbitrary predicate over the whole value.
#[derive(Clone)]
pub enum ValueKey {
	Tag(Matcher),
	TagAndKind(Matcher, ValueKind),
	Predicate(Arc<dyn Fn(&Value) -> bool + Send + Sync>),
}

impl ValueKey {
	pub fn tag(tag: &str) -> Self {
		ValueKey::Tag(Matcher::Literal(tag.to_string()))
	}

	pub fn matches(&self, value: &Value) -> bool {
		match self {
			ValueKey::Tag(m) => m.matches(value.tag()),
			ValueKey::TagAndKind(m, k) => m.matches(value.tag()) && value.kind() == *k,
			ValueKey::Predicate(f) => f(value),
		}
	}
}

/// A matcher for the node converter registry: node name alone,
/// tag-and-name, or a predicate over the whole node.
#[derive(Clone)]
pub enum NodeKey {
	Name(Matcher),
	TagAndName(Matcher, Matcher),
	Predicate(Arc<dyn Fn(&Node) -> bool + Send + Sync>),
}

impl NodeKey {
	pub fn matches(&self, node: &Node) -> bool {
		match self {
			NodeKey::Name(m) => m.matches(Some(&node.name)),
			NodeKey::TagAndName(tag_m, name_m) => tag_m.matches(node.tag.as_deref()) && name_m.matches(Some(&node.name)),
			NodeKey::Predicate(f) => f(node),
		}
	}
}

pub type ValueConverter = Arc<dyn Fn(&Value) -> ConvertOutcome<Value> + Send + Sync>;
pub type NodeConverter = Arc<dyn Fn(&Node) -> ConvertOutcome<Native> + Send + Sync>;

/// An ordered table of `(key, converter)` pairs, scanned front-to-back;
/// the first matching key whose converter returns `Handled` wins.
#[derive(Clone, Default)]
pub struct ValueConverters(Vec<(ValueKey, ValueConverter)>);

impl ValueConverters {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&mut self, key: ValueKey, f: ValueConverter) {
		self.0.push((key, f));
	}

	pub fn convert(&self, value: &Value) -> Option<Value> {
		for (key, f) in &self.0 {
			if key.matches(value) {
				if let ConvertOutcome::Handled(v) = f(value) {
					return Some(v);
				}
			}
		}
		None
	}

	pub fn into_pairs(self) -> Vec<(ValueKey, ValueConverter)> {
		self.0
	}
}

#[derive(Clone, Default)]
pub struct NodeConverters(Vec<(NodeKey, NodeConverter)>);

impl NodeConverters {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&mut self, key: NodeKey, f: NodeConverter) {
		self.0.push((key, f));
	}

	pub fn convert(&self, node: &Node) -> Option<Native> {
		for (key, f) in &self.0 {
			if key.matches(node) {
				if let ConvertOutcome::Handled(n) = f(node) {
					return Some(n);
				}
			}
		}
		None
	}
}

fn scalar_as_i128(value: &Value) -> Result<i128, String> {
	match value.scalar() {
		Scalar::Int(v) => Ok(v),
		Scalar::Float(v) if v.fract() == 0.0 => Ok(v as i128),
		other => Err(format!("expected an integer, found {other:?}")),
	}
}

fn scalar_as_f64(value: &Value) -> Result<f64, String> {
	match value.scalar() {
		Scalar::Int(v) => Ok(v as f64),
		Scalar::Float(v) => Ok(v),
		other => Err(format!("expected a number, found {other:?}")),
	}
}

fn scalar_as_str<'a>(value: &'a Value) -> Result<&'a str, String> {
	match value.scalar() {
		Scalar::Str(s) => Ok(s),
		other => Err(format!("expected a string, found {other:?}")),
	}
}

macro_rules! int_converter {
	($tag:literal, $ty:ty, $variant:ident) => {
		(
			ValueKey::tag($tag),
			Arc::new(|v: &Value| match scalar_as_i128(v) {
				Ok(n) => match <$ty>::try_from(n) {
					Ok(n) => ConvertOutcome::Handled(Value::Native(Native::$variant(n))),
					Err(_) => ConvertOutcome::Unhandled,
				},
				Err(_) => ConvertOutcome::Unhandled,
			}) as ValueConverter,
		)
	};
}

/// The built-in native-tag conversions every [`crate::config::ParseConfig`]
/// starts with, ported from `kdl/converters.py`'s module-level registry.
pub fn builtin_value_converters() -> ValueConverters {
	let mut reg = ValueConverters::new();
	for (key, f) in [
		int_converter!("i8", i8, I8),
		int_converter!("i16", i16, I16),
		int_converter!("i32", i32, I32),
		int_converter!("i64", i64, I64),
		int_converter!("u8", u8, U8),
		int_converter!("u16", u16, U16),
		int_converter!("u32", u32, U32),
		int_converter!("u64", u64, U64),
	] {
		reg.register(key, f);
	}

	reg.register(
		ValueKey::tag("f32"),
		Arc::new(|v| match scalar_as_f64(v) {
			Ok(n) => ConvertOutcome::Handled(Value::Native(Native::F32(n as f32))),
			Err(_) => ConvertOutcome::Unhandled,
		}),
	);
	reg.register(
		ValueKey::tag("f64"),
		Arc::new(|v| match scalar_as_f64(v) {
			Ok(n) => ConvertOutcome::Handled(Value::Native(Native::F64(n))),
			Err(_) => ConvertOutcome::Unhandled,
		}),
	);
	reg.register(
		ValueKey::tag("decimal"),
		Arc::new(|v| {
			let text = match v.scalar() {
				Scalar::Str(s) => s.to_string(),
				Scalar::Int(i) => i.to_string(),
				Scalar::Float(f) => f.to_string(),
				_ => return ConvertOutcome::Unhandled,
			};
			match rust_decimal::Decimal::from_str(&text) {
				Ok(d) => ConvertOutcome::Handled(Value::Native(Native::Decimal(d))),
				Err(_) => ConvertOutcome::Unhandled,
			}
		}),
	);
	reg.register(
		ValueKey::tag("date"),
		Arc::new(|v| match scalar_as_str(v).and_then(|s| {
			chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| e.to_string())
		}) {
			Ok(d) => ConvertOutcome::Handled(Value::Native(Native::Date(d))),
			Err(_) => ConvertOutcome::Unhandled,
		}),
	);
	reg.register(
		ValueKey::tag("time"),
		Arc::new(|v| match scalar_as_str(v).and_then(|s| {
			chrono::NaiveTime::parse_from_str(s, "%H:%M:%S%.f").map_err(|e| e.to_string())
		}) {
			Ok(t) => ConvertOutcome::Handled(Value::Native(Native::Time(t))),
			Err(_) => ConvertOutcome::Unhandled,
		}),
	);
	reg.register(
		ValueKey::tag("date-time"),
		Arc::new(|v| match scalar_as_str(v).and_then(|s| {
			chrono::DateTime::parse_from_rfc3339(s).map_err(|e| e.to_string())
		}) {
			Ok(dt) => ConvertOutcome::Handled(Value::Native(Native::DateTime(dt))),
			Err(_) => ConvertOutcome::Unhandled,
		}),
	);
	reg.register(
		ValueKey::tag("ipv4"),
		Arc::new(|v| match scalar_as_str(v).and_then(|s| Ipv4Addr::from_str(s).map_err(|e| e.to_string())) {
			Ok(ip) => ConvertOutcome::Handled(Value::Native(Native::Ipv4(ip))),
			Err(_) => ConvertOutcome::Unhandled,
		}),
	);
	reg.register(
		ValueKey::tag("ipv6"),
		Arc::new(|v| match scalar_as_str(v).and_then(|s| Ipv6Addr::from_str(s).map_err(|e| e.to_string())) {
			Ok(ip) => ConvertOutcome::Handled(Value::Native(Native::Ipv6(ip))),
			Err(_) => ConvertOutcome::Unhandled,
		}),
	);
	reg.register(
		ValueKey::tag("url"),
		Arc::new(|v| match scalar_as_str(v).and_then(|s| url::Url::parse(s).map_err(|e| e.to_string())) {
			Ok(u) => ConvertOutcome::Handled(Value::Native(Native::Url(u))),
			Err(_) => ConvertOutcome::Unhandled,
		}),
	);
	reg.register(
		ValueKey::tag("uuid"),
		Arc::new(|v| match scalar_as_str(v).and_then(|s| uuid::Uuid::parse_str(s).map_err(|e| e.to_string())) {
			Ok(u) => ConvertOutcome::Handled(Value::Native(Native::Uuid(u))),
			Err(_) => ConvertOutcome::Unhandled,
		}),
	);
	reg.register(
		ValueKey::tag("regex"),
		Arc::new(|v| match scalar_as_str(v).and_then(|s| Regex::new(s).map_err(|e| e.to_string())) {
			Ok(r) => ConvertOutcome::Handled(Value::Native(Native::Regex(RegexValue(r)))),
			Err(_) => ConvertOutcome::Unhandled,
		}),
	);
	reg.register(
		ValueKey::tag("base64"),
		Arc::new(|v| match scalar_as_str(v).and_then(|s| {
			base64::engine::general_purpose::STANDARD.decode(s).map_err(|e| e.to_string())
		}) {
			Ok(bytes) => ConvertOutcome::Handled(Value::Native(Native::Base64(bytes))),
			Err(_) => ConvertOutcome::Unhandled,
		}),
	);
	reg
}

/// Converts entirely untagged values so lookups via `.scalar()` already see
/// native Rust numeric types where the literal permits it; backs
/// `ParseConfig::native_untagged_values`.
pub fn native_untagged(value: &Value) -> Option<Native> {
	if value.tag().is_some() {
		return None;
	}
	match value.scalar() {
		Scalar::Int(v) => Some(Native::Int(v)),
		Scalar::Float(v) => Some(Native::F64(v)),
		Scalar::Bool(v) => Some(Native::Bool(v)),
		Scalar::Null => Some(Native::Null),
		Scalar::Str(s) => Some(Native::Str(s.to_string())),
		Scalar::Native(_) => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::number::Mantissa;

	#[test]
	fn i8_conversion_range_checks() {
		let reg = builtin_value_converters();
		let ok = Value::Decimal(Mantissa::Int(100), 0, Some("i8".to_string()));
		assert_eq!(reg.convert(&ok), Some(Value::Native(Native::I8(100))));

		let overflow = Value::Decimal(Mantissa::Int(1000), 0, Some("i8".to_string()));
		assert_eq!(reg.convert(&overflow), None);
	}

	#[test]
	fn uuid_and_regex_round_trip() {
		let reg = builtin_value_converters();
		let v = Value::String("3fa85f64-5717-4562-b3fc-2c963f66afa6".to_string(), Some("uuid".to_string()));
		match reg.convert(&v) {
			Some(Value::Native(Native::Uuid(_))) => {}
			other => panic!("expected Native::Uuid, got {other:?}"),
		}

		let re = Value::String("^a+$".to_string(), Some("regex".to_string()));
		match reg.convert(&re) {
			Some(Value::Native(Native::Regex(r))) => assert!(r.0.is_match("aaa")),
			other => panic!("expected Native::Regex, got {other:?}"),
		}
	}

	#[test]
	fn value_key_tag_and_kind_requires_both() {
		let key = ValueKey::TagAndKind(Matcher::Literal("x".to_string()), ValueKind::String);
		let matching = Value::String("s".to_string(), Some("x".to_string()));
		let wrong_kind = Value::Bool(true, Some("x".to_string()));
		assert!(key.matches(&matching));
		assert!(!key.matches(&wrong_kind));
	}
}

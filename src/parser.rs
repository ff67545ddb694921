//! Recursive-descent parser: document → node → entry → value → literal.
//!
//! Structurally this follows `kdlite::stream::Grammar` (a cursor over the
//! source advancing through hand-written productions, each returning
//! `Result<T, ParseError>`) rather than a parser-combinator library.
//! Feature coverage (slashdash, property last-write-wins, multiline
//! string dedent, converter dispatch) is ported from `kdlpy`'s
//! `parsefuncs.py`, which implements the fuller KDL v2 grammar this crate
//! targets.

use crate::config::ParseConfig;
use crate::convert::ValueConverters;
use crate::error::{PResult, ParseError};
use crate::grammar;
use crate::number::Mantissa;
use crate::source::Source;
use crate::value::{Document, Entry, Node, Value};

pub fn parse(text: &str, config: &ParseConfig) -> Result<Document, ParseError> {
	let mut parser = Parser::new(text, config);
	parser.parse_document()
}

struct Parser<'a> {
	src: Source,
	pos: usize,
	config: &'a ParseConfig,
	value_converters: ValueConverters,
}

impl<'a> Parser<'a> {
	fn new(text: &str, config: &'a ParseConfig) -> Self {
		Self { src: Source::new(text), pos: 0, config, value_converters: config.effective_value_converters() }
	}

	fn peek(&self) -> char {
		self.src.char_at(self.pos)
	}

	fn peek_at(&self, offset: usize) -> char {
		self.src.char_at(self.pos + offset)
	}

	fn eof(&self) -> bool {
		self.src.eof(self.pos)
	}

	fn bump(&mut self) -> char {
		let c = self.peek();
		if !self.eof() {
			self.pos += 1;
		}
		c
	}

	fn err(&self, message: impl Into<String>) -> ParseError {
		let (line, col) = self.src.loc(self.pos);
		ParseError::new(line, col, self.src.byte_offset(self.pos), message)
	}

	fn expect_char(&mut self, ch: char) -> PResult<()> {
		if self.peek() == ch {
			self.bump();
			Ok(())
		} else {
			Err(self.err(format!("expected '{ch}'")))
		}
	}

	fn matches_literal(&self, lit: &str) -> bool {
		lit.chars().enumerate().all(|(i, c)| self.src.char_at(self.pos + i) == c)
	}

	fn consume_newline(&mut self) -> bool {
		if self.peek() == '\r' && self.peek_at(1) == '\n' {
			self.pos += 2;
			return true;
		}
		if grammar::is_newline(self.peek()) {
			self.bump();
			return true;
		}
		false
	}

	fn skip_line_comment(&mut self) {
		while !self.eof() && !grammar::is_newline(self.peek()) {
			self.bump();
		}
	}

	fn skip_block_comment(&mut self) -> PResult<()> {
		self.pos += 2;
		let mut depth = 1;
		while depth > 0 {
			if self.eof() {
				return Err(self.err("unterminated block comment"));
			}
			if self.peek() == '/' && self.peek_at(1) == '*' {
				self.pos += 2;
				depth += 1;
			} else if self.peek() == '*' && self.peek_at(1) == '/' {
				self.pos += 2;
				depth -= 1;
			} else {
				self.bump();
			}
		}
		Ok(())
	}

	/// Whitespace, comments, and escaped-newline line continuations:
	/// everything allowed *within* a node's entry list without ending it.
	fn skip_inline_ws(&mut self) -> PResult<()> {
		loop {
			let c = self.peek();
			if grammar::is_space(c) {
				self.bump();
				continue;
			}
			if c == '/' && self.peek_at(1) == '/' {
				self.skip_line_comment();
				continue;
			}
			if c == '/' && self.peek_at(1) == '*' {
				self.skip_block_comment()?;
				continue;
			}
			if c == '\\' {
				let save = self.pos;
				self.pos += 1;
				while grammar::is_space(self.peek()) {
					self.bump();
				}
				if self.peek() == '/' && self.peek_at(1) == '/' {
					self.skip_line_comment();
				}
				if self.consume_newline() {
					continue;
				}
				self.pos = save;
			}
			break;
		}
		Ok(())
	}

	/// Whitespace including newlines; separates nodes within a document
	/// or children block.
	fn skip_linespace(&mut self) -> PResult<()> {
		loop {
			self.skip_inline_ws()?;
			if self.consume_newline() {
				continue;
			}
			break;
		}
		Ok(())
	}

	fn at_node_boundary(&self) -> bool {
		self.eof() || matches!(self.peek(), ';' | '{' | '}') || grammar::is_newline(self.peek())
	}

	fn parse_document(&mut self) -> PResult<Document> {
		if self.peek() == '\u{FEFF}' {
			self.pos += 1;
		}
		let mut nodes = Vec::new();
		loop {
			self.skip_linespace()?;
			if self.eof() {
				break;
			}
			if self.peek() == '}' {
				return Err(self.err("unexpected '}'"));
			}
			if let Some(node) = self.parse_node()? {
				nodes.push(node);
			}
		}
		Ok(Document { nodes })
	}

	/// A node, honoring a leading `/-` that discards the whole node
	/// (still consumed, so the caller advances past it).
	fn parse_node(&mut self) -> PResult<Option<Node>> {
		if self.peek() == '/' && self.peek_at(1) == '-' {
			self.pos += 2;
			self.skip_inline_ws()?;
			self.parse_node_inner()?;
			return Ok(None);
		}
		Ok(Some(self.parse_node_inner()?))
	}

	fn parse_node_inner(&mut self) -> PResult<Node> {
		let tag = self.parse_optional_tag()?;
		if tag.is_some() {
			self.skip_inline_ws()?;
		}
		let name = self.parse_identifier()?;

		let mut entries: Vec<Entry> = Vec::new();
		let mut children: Vec<Node> = Vec::new();
		loop {
			self.skip_inline_ws()?;
			if self.at_node_boundary() {
				break;
			}
			if self.peek() == '/' && self.peek_at(1) == '-' {
				self.pos += 2;
				self.skip_inline_ws()?;
				if self.peek() == '{' {
					self.parse_children_block()?;
				} else {
					self.parse_entry()?;
				}
				continue;
			}
			let entry = self.parse_entry()?;
			merge_entry(&mut entries, entry);
		}

		self.skip_inline_ws()?;
		if self.peek() == '{' {
			children = self.parse_children_block()?;
		}

		self.skip_inline_ws()?;
		if !self.eof() && self.peek() != '}' {
			if self.peek() == ';' {
				self.bump();
			} else if !self.consume_newline() {
				return Err(self.err("expected node terminator"));
			}
		}

		let mut node = Node { name, tag, entries, nodes: children, native: None };
		node.native = self.config.node_converters.convert(&node);
		Ok(node)
	}

	fn parse_children_block(&mut self) -> PResult<Vec<Node>> {
		self.expect_char('{')?;
		let mut nodes = Vec::new();
		loop {
			self.skip_linespace()?;
			if self.peek() == '}' {
				self.bump();
				break;
			}
			if self.eof() {
				return Err(self.err("unterminated children block"));
			}
			if let Some(node) = self.parse_node()? {
				nodes.push(node);
			}
		}
		Ok(nodes)
	}

	fn parse_optional_tag(&mut self) -> PResult<Option<String>> {
		if self.peek() != '(' {
			return Ok(None);
		}
		self.bump();
		self.skip_inline_ws()?;
		let name = self.parse_identifier()?;
		self.skip_inline_ws()?;
		self.expect_char(')')?;
		Ok(Some(name))
	}

	/// A node name, tag name, or property key: bare identifier, or any
	/// string literal used as an identifier.
	fn parse_identifier(&mut self) -> PResult<String> {
		if self.peek() == '"' || (self.peek() == 'r' && matches!(self.peek_at(1), '#' | '"')) {
			self.parse_string_token()
		} else if let Some(name) = self.try_bare_identifier() {
			Ok(name)
		} else {
			Err(self.err("expected an identifier"))
		}
	}

	fn try_bare_identifier(&mut self) -> Option<String> {
		let start = self.pos;
		let mut s = String::new();
		while grammar::is_ident_char(self.peek()) {
			s.push(self.peek());
			self.pos += 1;
		}
		if s.is_empty() || grammar::is_number_like(&s) || grammar::is_reserved_keyword(&s) {
			self.pos = start;
			return None;
		}
		Some(s)
	}

	fn parse_string_token(&mut self) -> PResult<String> {
		if self.peek() == 'r' {
			self.parse_raw_string()
		} else {
			self.parse_quoted_string()
		}
	}

	fn parse_entry(&mut self) -> PResult<Entry> {
		if self.peek() == '(' {
			let value = self.parse_value()?;
			return Ok(Entry::new_value(value));
		}
		let save = self.pos;
		if let Some(name) = self.try_prop_name()? {
			let value = self.parse_value()?;
			return Ok(Entry::new_prop(name, value));
		}
		self.pos = save;
		let value = self.parse_value()?;
		Ok(Entry::new_value(value))
	}

	/// Consumes and returns an identifier-like token followed by `=`, or
	/// rewinds entirely and returns `None` if there's no `=`.
	fn try_prop_name(&mut self) -> PResult<Option<String>> {
		let save = self.pos;
		let name = if self.peek() == '"' || (self.peek() == 'r' && matches!(self.peek_at(1), '#' | '"')) {
			Some(self.parse_string_token()?)
		} else {
			self.try_bare_identifier()
		};
		match name {
			Some(n) if self.peek() == '=' => {
				self.bump();
				Ok(Some(n))
			}
			_ => {
				self.pos = save;
				Ok(None)
			}
		}
	}

	fn parse_value(&mut self) -> PResult<Value> {
		let tag = self.parse_optional_tag()?;
		if tag.is_some() {
			self.skip_inline_ws()?;
		}
		let mut value = self.parse_untagged_value()?;
		value.set_tag(tag);
		self.apply_converters(&mut value);
		Ok(value)
	}

	fn apply_converters(&self, value: &mut Value) {
		if let Some(converted) = self.value_converters.convert(value) {
			*value = converted;
			return;
		}
		if self.config.native_untagged_values {
			if let Some(native) = crate::convert::native_untagged(value) {
				*value = Value::Native(native);
			}
		}
	}

	fn parse_untagged_value(&mut self) -> PResult<Value> {
		match self.peek() {
			'#' => self.parse_keyword(),
			'"' => Ok(Value::String(self.parse_quoted_string()?, None)),
			'r' if matches!(self.peek_at(1), '#' | '"') => Ok(Value::RawString(self.parse_raw_string()?, None)),
			c if grammar::is_digit(c) => self.parse_number(),
			c if (grammar::is_sign(c) || c == '.') && grammar::is_digit(self.peek_at(1)) => self.parse_number(),
			_ => match self.try_bare_identifier() {
				Some(ident) => Ok(Value::String(ident, None)),
				None => Err(self.err("expected a value")),
			},
		}
	}

	fn parse_keyword(&mut self) -> PResult<Value> {
		self.bump();
		let mut s = String::from("#");
		while self.peek().is_ascii_alphabetic() || self.peek() == '-' {
			s.push(self.peek());
			self.pos += 1;
		}
		match s.as_str() {
			"#true" => Ok(Value::Bool(true, None)),
			"#false" => Ok(Value::Bool(false, None)),
			"#null" => Ok(Value::Null(None)),
			"#inf" => Ok(Value::Decimal(Mantissa::Float(f64::INFINITY), 0, None)),
			"#-inf" => Ok(Value::Decimal(Mantissa::Float(f64::NEG_INFINITY), 0, None)),
			"#nan" => Ok(Value::Decimal(Mantissa::Float(f64::NAN), 0, None)),
			other => Err(self.err(format!("unknown keyword '{other}'"))),
		}
	}

	fn parse_number(&mut self) -> PResult<Value> {
		let mut sign: i128 = 1;
		if self.peek() == '-' {
			sign = -1;
			self.pos += 1;
		} else if self.peek() == '+' {
			self.pos += 1;
		}

		if self.peek() == '0' && matches!(self.peek_at(1), 'b' | 'o' | 'x') {
			let radix_char = self.peek_at(1);
			self.pos += 2;
			let digit_ok: fn(char) -> bool = match radix_char {
				'b' => grammar::is_binary_digit,
				'o' => grammar::is_octal_digit,
				_ => grammar::is_hex_digit,
			};
			let base = match radix_char {
				'b' => 2,
				'o' => 8,
				_ => 16,
			};
			let mut digits = String::new();
			while digit_ok(self.peek()) || self.peek() == '_' {
				if self.peek() != '_' {
					digits.push(self.peek());
				}
				self.pos += 1;
			}
			if digits.is_empty() {
				return Err(self.err("expected digits after radix prefix"));
			}
			let magnitude = i128::from_str_radix(&digits, base).map_err(|_| self.err("integer literal out of range"))?;
			let value = sign * magnitude;
			return Ok(match radix_char {
				'b' => Value::Binary(value, None),
				'o' => Value::Octal(value, None),
				_ => Value::Hex(value, None),
			});
		}

		let mut int_part = String::new();
		while grammar::is_digit(self.peek()) || self.peek() == '_' {
			if self.peek() != '_' {
				int_part.push(self.peek());
			}
			self.pos += 1;
		}
		if int_part.is_empty() {
			return Err(self.err("expected a digit"));
		}

		let mut frac_part = String::new();
		let mut is_float = false;
		if self.peek() == '.' && grammar::is_digit(self.peek_at(1)) {
			is_float = true;
			self.pos += 1;
			while grammar::is_digit(self.peek()) || self.peek() == '_' {
				if self.peek() != '_' {
					frac_part.push(self.peek());
				}
				self.pos += 1;
			}
		}

		let mut exponent = 0i32;
		if matches!(self.peek(), 'e' | 'E') {
			let save = self.pos;
			self.pos += 1;
			let mut exp_sign = 1i32;
			if self.peek() == '-' {
				exp_sign = -1;
				self.pos += 1;
			} else if self.peek() == '+' {
				self.pos += 1;
			}
			let mut exp_digits = String::new();
			while grammar::is_digit(self.peek()) || self.peek() == '_' {
				if self.peek() != '_' {
					exp_digits.push(self.peek());
				}
				self.pos += 1;
			}
			if exp_digits.is_empty() {
				self.pos = save;
			} else {
				exponent = exp_sign
					* exp_digits.parse::<i32>().map_err(|_| self.err("exponent out of range"))?;
			}
		}

		if is_float {
			let text = format!("{}{int_part}.{}", if sign < 0 { "-" } else { "" }, if frac_part.is_empty() { "0" } else { &frac_part });
			let mantissa: f64 = text.parse().map_err(|_| self.err("invalid float literal"))?;
			Ok(Value::Decimal(Mantissa::Float(mantissa), exponent, None))
		} else {
			let magnitude: i128 = int_part.parse().map_err(|_| self.err("integer literal out of range"))?;
			Ok(Value::Decimal(Mantissa::Int(sign * magnitude), exponent, None))
		}
	}

	fn parse_quoted_string(&mut self) -> PResult<String> {
		if self.peek() == '"' && self.peek_at(1) == '"' && self.peek_at(2) == '"' {
			self.pos += 3;
			if !self.consume_newline() {
				return Err(self.err("multiline string must begin with a newline"));
			}
			let mut raw = String::new();
			loop {
				if self.eof() {
					return Err(self.err("unterminated multiline string"));
				}
				if self.matches_literal("\"\"\"") {
					self.pos += 3;
					break;
				}
				raw.push(self.bump());
			}
			self.dedent_multiline(&raw, true)
		} else {
			self.expect_char('"')?;
			let mut out = String::new();
			loop {
				if self.eof() {
					return Err(self.err("unterminated string"));
				}
				let c = self.peek();
				if c == '"' {
					self.pos += 1;
					break;
				}
				if c == '\\' {
					self.pos += 1;
					out.push_str(&self.parse_escape()?);
					continue;
				}
				if grammar::is_newline(c) {
					return Err(self.err("unescaped newline in single-line string"));
				}
				self.pos += 1;
				out.push(c);
			}
			Ok(out)
		}
	}

	fn parse_escape(&mut self) -> PResult<String> {
		let c = self.peek();
		match c {
			'n' => {
				self.pos += 1;
				Ok("\n".to_string())
			}
			'r' => {
				self.pos += 1;
				Ok("\r".to_string())
			}
			't' => {
				self.pos += 1;
				Ok("\t".to_string())
			}
			'\\' => {
				self.pos += 1;
				Ok("\\".to_string())
			}
			'"' => {
				self.pos += 1;
				Ok("\"".to_string())
			}
			'b' => {
				self.pos += 1;
				Ok("\u{08}".to_string())
			}
			'f' => {
				self.pos += 1;
				Ok("\u{0C}".to_string())
			}
			's' => {
				self.pos += 1;
				Ok(" ".to_string())
			}
			'u' => {
				self.pos += 1;
				self.expect_char('{')?;
				let mut hex = String::new();
				while grammar::is_hex_digit(self.peek()) {
					hex.push(self.peek());
					self.pos += 1;
				}
				self.expect_char('}')?;
				let code = u32::from_str_radix(&hex, 16).map_err(|_| self.err("invalid unicode escape"))?;
				char::from_u32(code).map(|c| c.to_string()).ok_or_else(|| self.err("invalid unicode scalar value"))
			}
			c if grammar::is_space(c) || grammar::is_newline(c) => {
				while grammar::is_space(self.peek()) || grammar::is_newline(self.peek()) {
					self.pos += 1;
				}
				Ok(String::new())
			}
			other => Err(self.err(format!("invalid escape sequence '\\{other}'"))),
		}
	}

	fn parse_raw_string(&mut self) -> PResult<String> {
		self.pos += 1; // 'r'
		let mut hashes = 0usize;
		while self.peek() == '#' {
			hashes += 1;
			self.pos += 1;
		}
		self.expect_char('"')?;

		if self.peek() == '"' && self.peek_at(1) == '"' {
			self.pos += 2;
			if !self.consume_newline() {
				return Err(self.err("multiline raw string must begin with a newline"));
			}
			let raw = self.raw_string_body("\"\"\"", hashes, true)?;
			self.dedent_multiline(&raw, false)
		} else {
			self.raw_string_body("\"", hashes, false)
		}
	}

	/// Scans raw-string content up to a terminator made of `quote` followed
	/// by exactly `hashes` `#`s. A `"`/`"""` run followed by *fewer* `#`s is
	/// literal content; followed by *more* is a hard error, since that run
	/// can never be literal: it always contains a valid, shorter terminator
	/// as a prefix.
	fn raw_string_body(&mut self, quote: &str, hashes: usize, allow_newlines: bool) -> PResult<String> {
		let quote_len = quote.chars().count();
		let mut out = String::new();
		loop {
			if self.eof() {
				return Err(self.err("unterminated raw string"));
			}
			if self.matches_literal(quote) {
				let mut run = 0usize;
				while self.peek_at(quote_len + run) == '#' {
					run += 1;
				}
				match run.cmp(&hashes) {
					std::cmp::Ordering::Equal => {
						self.pos += quote_len + hashes;
						return Ok(out);
					}
					std::cmp::Ordering::Greater => {
						return Err(self.err("raw string closing delimiter has extra '#'"));
					}
					std::cmp::Ordering::Less => {
						for _ in 0..quote_len + run {
							out.push(self.bump());
						}
					}
				}
				continue;
			}
			let c = self.bump();
			if !allow_newlines && grammar::is_newline(c) {
				return Err(self.err("unescaped newline in single-line raw string"));
			}
			out.push(c);
		}
	}

	/// Strips the indentation established by the closing delimiter's line
	/// (the multiline-string dedent rule). When `unescape` is
	/// set, each remaining line is run back through the single-line escape
	/// table; raw strings skip that step.
	fn dedent_multiline(&self, raw: &str, unescape: bool) -> PResult<String> {
		let mut lines: Vec<&str> = raw.split('\n').collect();
		let last_raw = lines.pop().expect("split always yields at least one element");
		let prefix = last_raw.strip_suffix('\r').unwrap_or(last_raw);
		if !prefix.chars().all(grammar::is_space) {
			return Err(self.err("multiline string closing line must be pure indentation"));
		}
		let mut out_lines = Vec::with_capacity(lines.len());
		for line in lines {
			let line = line.strip_suffix('\r').unwrap_or(line);
			let dedented = line
				.strip_prefix(prefix)
				.ok_or_else(|| self.err("multiline string line has less indentation than its closing line"))?;
			out_lines.push(if unescape { unescape_line(dedented).map_err(|m| self.err(m))? } else { dedented.to_string() });
		}
		Ok(out_lines.join("\n"))
	}
}

fn unescape_line(line: &str) -> Result<String, String> {
	let mut out = String::with_capacity(line.len());
	let mut chars = line.chars().peekable();
	while let Some(c) = chars.next() {
		if c != '\\' {
			out.push(c);
			continue;
		}
		match chars.next() {
			Some('n') => out.push('\n'),
			Some('r') => out.push('\r'),
			Some('t') => out.push('\t'),
			Some('\\') => out.push('\\'),
			Some('"') => out.push('"'),
			Some('b') => out.push('\u{08}'),
			Some('f') => out.push('\u{0C}'),
			Some('s') => out.push(' '),
			Some('u') => {
				if chars.next() != Some('{') {
					return Err("invalid unicode escape".to_string());
				}
				let mut hex = String::new();
				for c in chars.by_ref() {
					if c == '}' {
						break;
					}
					hex.push(c);
				}
				let code = u32::from_str_radix(&hex, 16).map_err(|_| "invalid unicode escape".to_string())?;
				out.push(char::from_u32(code).ok_or("invalid unicode scalar value".to_string())?);
			}
			Some(other) => return Err(format!("invalid escape sequence '\\{other}'")),
			None => return Err("dangling escape at end of line".to_string()),
		}
	}
	Ok(out)
}

/// Property insertion: last value wins, but the entry keeps the position
/// of its *first* occurrence.
fn merge_entry(entries: &mut Vec<Entry>, entry: Entry) {
	if let Some(key) = entry.key.clone() {
		if let Some(existing) = entries.iter_mut().find(|e| e.key.as_deref() == Some(key.as_str())) {
			existing.value = entry.value;
			return;
		}
	}
	entries.push(entry);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::convert::Native;

	fn doc(text: &str) -> Document {
		let config = ParseConfig { native_untagged_values: false, ..ParseConfig::default() };
		parse(text, &config).unwrap_or_else(|e| panic!("parse failed: {e}\ninput:\n{text}"))
	}

	#[test]
	fn parses_flat_node_with_args_and_props() {
		let d = doc("node 1 2 key=3\n");
		assert_eq!(d.nodes.len(), 1);
		let n = &d.nodes[0];
		assert_eq!(n.name, "node");
        let args: Vec<_> = n.args().collect();
        assert_eq!(args.len(), 2);
		assert_eq!(n.entry("key").unwrap().value, Value::Decimal(Mantissa::Int(3), 0, None));
	}

	#[test]
	fn duplicate_properties_keep_first_position_last_value() {
		let d = doc("node a=1 b=2 a=3\n");
		let n = &d.nodes[0];
		assert_eq!(n.entries.len(), 2);
		assert_eq!(n.entries[0].key.as_deref(), Some("a"));
		assert_eq!(n.entries[0].value, Value::Decimal(Mantissa::Int(3), 0, None));
		assert_eq!(n.entries[1].key.as_deref(), Some("b"));
	}

	#[test]
	fn slashdash_discards_node_entry_and_children() {
		let d = doc("/-dropped 1 2\nkept 1 /-2 key=3 {\n  /-child\n}\n");
		assert_eq!(d.nodes.len(), 1);
		let n = &d.nodes[0];
		assert_eq!(n.name, "kept");
		assert_eq!(n.args().count(), 1);
		assert!(n.nodes.is_empty());
	}

	#[test]
	fn children_block_nests() {
		let d = doc("parent {\n  child1\n  child2 1\n}\n");
		let n = &d.nodes[0];
		assert_eq!(n.nodes.len(), 2);
		assert_eq!(n.nodes[1].args().count(), 1);
	}

	#[test]
	fn radix_literals_parse_to_expected_magnitude() {
		let d = doc("node 0x1a 0o10 0b10\n");
		let n = &d.nodes[0];
		let args: Vec<_> = n.args().collect();
		assert_eq!(args[0], &Value::Hex(26, None));
		assert_eq!(args[1], &Value::Octal(8, None));
		assert_eq!(args[2], &Value::Binary(2, None));
	}

	#[test]
	fn keyword_literals() {
		let d = doc("node #true #false #null\n");
		let n = &d.nodes[0];
		let args: Vec<_> = n.args().collect();
		assert_eq!(args[0], &Value::Bool(true, None));
		assert_eq!(args[1], &Value::Bool(false, None));
		assert_eq!(args[2], &Value::Null(None));
	}

	#[test]
	fn quoted_string_escapes() {
		let d = doc(r#"node "a\nb\tc\"d""#);
		let n = &d.nodes[0];
		assert_eq!(n.args().next().unwrap(), &Value::String("a\nb\tc\"d".to_string(), None));
	}

	#[test]
	fn raw_string_extra_closing_hash_is_a_hard_error() {
		let err = parse("node r#\"oops\"##\n", &ParseConfig::default()).unwrap_err();
		assert!(err.message.contains("extra"), "unexpected message: {}", err.message);
	}

	#[test]
	fn raw_string_minimal_hashes() {
		let d = doc("node r#\"has \"quote\"\"#\n");
		let n = &d.nodes[0];
		assert_eq!(n.args().next().unwrap(), &Value::RawString("has \"quote\"".to_string(), None));
	}

	#[test]
	fn builtin_tag_conversion_applies() {
		let d = doc("node (i8)100\n");
		let n = &d.nodes[0];
		assert_eq!(n.args().next().unwrap(), &Value::Native(Native::I8(100)));
	}

	#[test]
	fn tagged_node_name() {
		let d = doc("(kind)node\n");
		assert_eq!(d.nodes[0].tag.as_deref(), Some("kind"));
	}

	#[test]
	fn bare_identifier_falls_through_to_a_string_value() {
		let d = doc("node level=info hello\n");
		let n = &d.nodes[0];
		assert_eq!(n.entry("level").unwrap().value, Value::String("info".to_string(), None));
		assert_eq!(n.args().next().unwrap(), &Value::String("hello".to_string(), None));
	}

	#[test]
	fn bare_identifier_value_can_start_with_sign_or_dot() {
		let d = doc("node -foo +bar .baz\n");
		let n = &d.nodes[0];
		let args: Vec<_> = n.args().collect();
		assert_eq!(args[0], &Value::String("-foo".to_string(), None));
		assert_eq!(args[1], &Value::String("+bar".to_string(), None));
		assert_eq!(args[2], &Value::String(".baz".to_string(), None));
	}

	#[test]
	fn reserved_keyword_as_bare_identifier_is_a_hard_error() {
		let err = parse("true 1\n", &ParseConfig::default()).unwrap_err();
		assert!(err.message.contains("identifier"), "unexpected message: {}", err.message);
	}

	#[test]
	fn reserved_keyword_as_bare_value_is_a_hard_error() {
		let err = parse("node true\n", &ParseConfig::default()).unwrap_err();
		assert!(err.message.contains("expected a value"), "unexpected message: {}", err.message);
	}

	#[test]
	fn node_converter_dispatch_sets_native() {
		use crate::convert::{ConvertOutcome, Matcher, NodeConverters, NodeKey};
		use std::sync::Arc;

		let mut node_converters = NodeConverters::new();
		node_converters.register(
			NodeKey::Name(Matcher::Literal("point".to_string())),
			Arc::new(|node| {
				let x = node.entry(0).map(|e| e.value.scalar());
				match x {
					Some(crate::value::Scalar::Int(v)) => ConvertOutcome::Handled(Native::Int(v * 2)),
					_ => ConvertOutcome::Unhandled,
				}
			}),
		);
		let config = ParseConfig { node_converters, native_untagged_values: false, ..ParseConfig::default() };
		let d = parse("point 21\n", &config).unwrap();
		assert_eq!(d.nodes[0].native(), Some(&Native::Int(42)));
	}
}

//! Grammar primitives: pure character-class predicates.
//!
//! Ported from `kdlite::stream::Grammar`'s `ident`/`space`/`newline`/`banned`
//! associated functions, cross-checked against `kdlpy`'s `isIdentChar` /
//! `isWSChar` / `isNewlineChar` / `isDisallowedLiteralChar`.
//!
//! U+000B (vertical tab) is treated as a *newline*, not whitespace,
//! following `kdlpy`'s `isNewlineChar`, which includes `0x0B`, rather than
//! `kdlite`'s narrower range.

/// `disallowed-literal-code-points`: C0 controls (except TAB, and except the
/// newlines handled by [`is_newline`]), DEL, bidi control marks, and BOM.
pub fn is_banned(ch: char) -> bool {
	matches!(ch,
		'\u{0}'..='\u{8}'
		| '\u{E}'..='\u{1F}'
		| '\u{7F}'
		| '\u{200E}'..='\u{200F}'
		| '\u{202A}'..='\u{202E}'
		| '\u{2066}'..='\u{2069}'
		| '\u{FEFF}'
	)
}

/// `unicode-space`, excluding newlines.
pub fn is_space(ch: char) -> bool {
	matches!(ch,
		'\u{9}' | '\u{20}' | '\u{A0}' | '\u{1680}'
		| '\u{2000}'..='\u{200A}'
		| '\u{202F}' | '\u{205F}' | '\u{3000}'
	)
}

/// `newline`. CRLF is handled by callers as a single newline; this predicate
/// only classifies a lone codepoint.
pub fn is_newline(ch: char) -> bool {
	matches!(ch, '\u{A}'..='\u{D}' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

/// `identifier-char`: anything that isn't reserved punctuation, whitespace,
/// a newline, or a disallowed codepoint.
pub fn is_ident_char(ch: char) -> bool {
	if ch == crate::source::EOF {
		return false;
	}
	!(is_banned(ch)
		|| is_space(ch)
		|| is_newline(ch)
		|| matches!(ch, '\\' | '/' | '(' | ')' | '{' | '}' | ';' | '[' | ']' | '"' | '#' | '='))
}

pub fn is_digit(ch: char) -> bool {
	ch.is_ascii_digit()
}

pub fn is_binary_digit(ch: char) -> bool {
	matches!(ch, '0' | '1')
}

pub fn is_octal_digit(ch: char) -> bool {
	matches!(ch, '0'..='7')
}

pub fn is_hex_digit(ch: char) -> bool {
	ch.is_ascii_hexdigit()
}

pub fn is_sign(ch: char) -> bool {
	matches!(ch, '+' | '-')
}

/// True if `text` (after stripping a leading sign and/or `.`) starts with a
/// decimal digit; used to reject identifier-strings confusable with
/// numbers.
pub fn is_number_like(text: &str) -> bool {
	let text = text.strip_prefix(['+', '-']).unwrap_or(text);
	let text = text.strip_prefix('.').unwrap_or(text);
	text.as_bytes().first().is_some_and(u8::is_ascii_digit)
}

/// Identifiers that must be quoted rather than written bare, because they
/// collide with keyword literals (case-insensitively).
pub fn is_reserved_keyword(text: &str) -> bool {
	let lower = text.to_ascii_lowercase();
	matches!(lower.as_str(), "true" | "false" | "null" | "inf" | "-inf" | "nan")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn vtab_is_newline_not_space() {
		assert!(is_newline('\u{B}'));
		assert!(!is_space('\u{B}'));
	}

	#[test]
	fn reserved_punct_not_ident() {
		for ch in ['\\', '/', '(', ')', '{', '}', '[', ']', '"', '#', ';', '='] {
			assert!(!is_ident_char(ch), "{ch:?} should not be an identifier char");
		}
	}

	#[test]
	fn number_like_detection() {
		assert!(is_number_like("123"));
		assert!(is_number_like("-123"));
		assert!(is_number_like("+.5"));
		assert!(!is_number_like("abc"));
		assert!(!is_number_like("-abc"));
	}

	#[test]
	fn reserved_keywords_case_insensitive() {
		assert!(is_reserved_keyword("true"));
		assert!(is_reserved_keyword("TRUE"));
		assert!(is_reserved_keyword("NaN"));
		assert!(!is_reserved_keyword("truely"));
	}
}

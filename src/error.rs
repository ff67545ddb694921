//! Parse error type and line/column reporting.
//!
//! Mirrors `kdl/errors.py`'s `ParseError(s, i, msg)`: a single error kind,
//! carrying a 1-based `(line, col)` and a free-form message. Subkinds are
//! distinguished only by message text.

use thiserror::Error;

/// The one error kind the crate raises. Always fatal: parsing stops at the
/// first occurrence and no partial document is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("parse error on line {line} col {col}: {message}")]
pub struct ParseError {
	/// 1-based line number.
	pub line: usize,
	/// 1-based column number.
	pub col: usize,
	/// Human-readable description of what went wrong.
	pub message: String,
	/// Byte offset into the original input where the error was detected.
	pub offset: usize,
}

impl ParseError {
	pub(crate) fn new(line: usize, col: usize, offset: usize, message: impl Into<String>) -> Self {
		Self { line, col, offset, message: message.into() }
	}
}

pub(crate) type PResult<T> = Result<T, ParseError>;

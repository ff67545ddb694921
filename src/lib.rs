// SPDX-License-Identifier: MIT OR Apache-2.0
//! Parser and canonical printer for the [KDL] document language.
//!
//! ```
//! let doc = kdldoc::parse("node 1 2 key=\"value\" {\n    child\n}\n").unwrap();
//! let node = doc.get(None, "node").unwrap();
//! assert_eq!(node.args().count(), 2);
//! println!("{}", doc.print(&kdldoc::PrintConfig::default()));
//! ```
//!
//! The pipeline is three stages, each its own module:
//! - [`source`] + [`grammar`]: a random-access character buffer and the
//!   character-class predicates the grammar is built from.
//! - [`parser`]: the recursive-descent grammar, producing a [`value::Document`].
//! - [`print`]: the canonical printer, turning a document back into text
//!   under a [`config::PrintConfig`].
//!
//! [`convert`] sits alongside the parser and implements the native-tag
//! conversion registry (`(i8)100`, `(uuid)"..."`, and friends); [`config`]
//! holds the knobs both the parser and printer read. Every operation is a
//! pure function over its input; there's no shared mutable state to
//! synchronize, so nothing here needs locking.
//!
//! [KDL]: https://kdl.dev

pub mod config;
pub mod convert;
pub mod error;
pub mod grammar;
pub mod number;
pub mod parser;
pub mod print;
pub mod source;
pub mod value;

pub use config::{ExponentCase, ParseConfig, PrintConfig};
pub use convert::{Native, NodeKey, ValueKey, ValueKind};
pub use error::ParseError;
pub use value::{Document, Entry, EntryKey, Node, Scalar, Value};

/// Parse `text` under the default [`ParseConfig`].
pub fn parse(text: &str) -> Result<Document, ParseError> {
	Document::parse(text)
}

/// Parse `text` under a custom [`ParseConfig`].
pub fn parse_with(text: &str, config: &ParseConfig) -> Result<Document, ParseError> {
	parser::parse(text, config)
}

#[cfg(test)]
mod tests;

//! Numeric representation shared by the `Decimal` value variant.
//!
//! `kdlite::number::Number` collapses every numeric literal into one of
//! `u64`/`i64`/`f64` and throws away which radix or literal shape produced
//! it; that's fine for a parser that doesn't round-trip formatting, but
//! this crate's printer has to reproduce `0x1a` rather than `26`, so radix
//! is tracked on the [`crate::value::Value`] variant itself (`Binary` /
//! `Octal` / `Hex` / `Decimal`) and this module only holds the
//! mantissa-with-optional-fraction shape that `Decimal` needs, matching
//! `kdlpy`'s `types.Decimal(mantissa, exponent)` (`kdl/types.py`,
//! `parsefuncs.py::parseDecimalNumber`).

use std::fmt;

/// The numeric payload of a `Decimal` value: an integer or floating-point
/// mantissa, exactly as produced by the literal: integers that fit in
/// `i128` keep an integer mantissa, everything else becomes a floating
/// mantissa.
#[derive(Debug, Clone, Copy)]
pub enum Mantissa {
	Int(i128),
	Float(f64),
}

impl PartialEq for Mantissa {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Mantissa::Int(a), Mantissa::Int(b)) => a == b,
			(Mantissa::Float(a), Mantissa::Float(b)) => a.to_bits() == b.to_bits(),
			_ => false,
		}
	}
}
impl Eq for Mantissa {}

impl Mantissa {
	/// Numeric interpretation as `f64`, used by native conversions that
	/// don't care about the original mantissa shape (e.g. `f32`/`f64` tags).
	pub fn as_f64(&self) -> f64 {
		match self {
			Mantissa::Int(v) => *v as f64,
			Mantissa::Float(v) => *v,
		}
	}

	pub fn is_int(&self) -> bool {
		matches!(self, Mantissa::Int(_))
	}
}

impl fmt::Display for Mantissa {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Mantissa::Int(v) => write!(f, "{v}"),
			// Debug formatting of f64 always includes a decimal point (or
			// exponent), ensuring the printed text re-parses as a float
			// rather than silently becoming an integer literal again.
			Mantissa::Float(v) => fmt::Debug::fmt(v, f),
		}
	}
}

/// Which radix an integer literal (`Binary`/`Octal`/`Hex`) was written in;
/// `Decimal` has no radix of its own, its magnitude is always base 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Radix {
	Binary,
	Octal,
	Hexadecimal,
}

impl Radix {
	pub fn prefix(self) -> &'static str {
		match self {
			Radix::Binary => "0b",
			Radix::Octal => "0o",
			Radix::Hexadecimal => "0x",
		}
	}

	pub fn base(self) -> u32 {
		match self {
			Radix::Binary => 2,
			Radix::Octal => 8,
			Radix::Hexadecimal => 16,
		}
	}
}

/// Render `value` in `radix`, with its prefix, honoring sign.
pub fn format_radix(value: i128, radix: Radix) -> String {
	if value < 0 {
		format!("-{}{}", radix.prefix(), to_radix_digits(value.unsigned_abs(), radix.base()))
	} else {
		format!("{}{}", radix.prefix(), to_radix_digits(value as u128, radix.base()))
	}
}

fn to_radix_digits(mut value: u128, base: u32) -> String {
	if value == 0 {
		return "0".to_string();
	}
	let base = base as u128;
	let mut digits = Vec::new();
	while value > 0 {
		let digit = (value % base) as u32;
		digits.push(std::char::from_digit(digit, base as u32).unwrap());
		value /= base;
	}
	digits.reverse();
	digits.into_iter().collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn radix_formatting_round_trips_digits() {
		assert_eq!(format_radix(26, Radix::Hexadecimal), "0x1a");
		assert_eq!(format_radix(-26, Radix::Hexadecimal), "-0x1a");
		assert_eq!(format_radix(2, Radix::Binary), "0b10");
		assert_eq!(format_radix(8, Radix::Octal), "0o10");
		assert_eq!(format_radix(0, Radix::Hexadecimal), "0x0");
	}

	#[test]
	fn float_mantissa_prints_with_fractional_marker() {
		assert_eq!(Mantissa::Float(1.0).to_string(), "1.0");
		assert_eq!(Mantissa::Int(1).to_string(), "1");
	}
}

use std::fmt;

use crate::classfile::{ConstTag, ConstantPool, Result};

/// Literal value at the width its tag requires.
#[derive(Debug, Clone)]
pub enum Scalar {
	/// `byte`, `char`, `short`, `boolean`, and `int` literals, all pool `Integer`s.
	Int(i32),
	/// `long` literal.
	Long(i64),
	/// `float` literal.
	Float(f32),
	/// `double` literal.
	Double(f64),
	/// `String` literal.
	Text(Box<str>),
}

/// Equality by representation: bit patterns for floats, with every NaN equal to every NaN.
impl PartialEq for Scalar {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Scalar::Int(left), Scalar::Int(right)) => left == right,
			(Scalar::Long(left), Scalar::Long(right)) => left == right,
			(Scalar::Float(left), Scalar::Float(right)) => (left.is_nan() && right.is_nan()) || left.to_bits() == right.to_bits(),
			(Scalar::Double(left), Scalar::Double(right)) => (left.is_nan() && right.is_nan()) || left.to_bits() == right.to_bits(),
			(Scalar::Text(left), Scalar::Text(right)) => left == right,
			_ => false,
		}
	}
}

impl fmt::Display for Scalar {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Scalar::Int(value) => write!(f, "{value}"),
			Scalar::Long(value) => write!(f, "{value}"),
			Scalar::Float(value) => write!(f, "{value:?}"),
			Scalar::Double(value) => write!(f, "{value:?}"),
			Scalar::Text(value) => f.write_str(value),
		}
	}
}

impl Scalar {
	/// Resolve the pool entry a literal of kind `tag` refers to.
	pub fn resolve(pool: &ConstantPool, tag: ConstTag, idx: u16) -> Result<Self> {
		Ok(match tag {
			ConstTag::Byte | ConstTag::Char | ConstTag::Short | ConstTag::Boolean | ConstTag::Int => Scalar::Int(pool.integer(idx)?),
			ConstTag::Long => Scalar::Long(pool.long(idx)?),
			ConstTag::Float => Scalar::Float(pool.float(idx)?),
			ConstTag::Double => Scalar::Double(pool.double(idx)?),
			ConstTag::String => Scalar::Text(pool.utf8(idx)?.into()),
		})
	}

	/// Parse an expectation token at the exact width of `tag`.
	pub fn parse(tag: ConstTag, token: &str) -> std::result::Result<Self, String> {
		let bad = |err: &dyn fmt::Display| format!("token {token:?} is not a valid {}: {err}", tag.tag().name());
		Ok(match tag {
			ConstTag::Byte => Scalar::Int(i32::from(token.parse::<i8>().map_err(|err| bad(&err))?)),
			ConstTag::Short => Scalar::Int(i32::from(token.parse::<i16>().map_err(|err| bad(&err))?)),
			ConstTag::Int => Scalar::Int(token.parse::<i32>().map_err(|err| bad(&err))?),
			ConstTag::Long => Scalar::Long(token.parse::<i64>().map_err(|err| bad(&err))?),
			ConstTag::Float => Scalar::Float(token.parse::<f32>().map_err(|err| bad(&err))?),
			ConstTag::Double => Scalar::Double(token.parse::<f64>().map_err(|err| bad(&err))?),
			ConstTag::Boolean => match token {
				"true" => Scalar::Int(1),
				"false" => Scalar::Int(0),
				_ => return Err(bad(&"expected true or false")),
			},
			ConstTag::Char => match char_unit(token) {
				Some(unit) => Scalar::Int(i32::from(unit)),
				None => return Err(bad(&"expected one UTF-16 code unit or a \\uXXXX escape")),
			},
			ConstTag::String => Scalar::Text(token.into()),
		})
	}

	/// Render as an expectation token that [`Scalar::parse`] accepts for `tag`.
	pub fn to_token(&self, tag: ConstTag) -> std::result::Result<String, String> {
		match (tag, self) {
			(ConstTag::Boolean, Scalar::Int(0)) => Ok("false".to_owned()),
			(ConstTag::Boolean, Scalar::Int(1)) => Ok("true".to_owned()),
			// Surrogates have no `char`, so they render as an escape.
			(ConstTag::Char, Scalar::Int(unit)) => match u16::try_from(*unit) {
				Ok(unit) => Ok(char::from_u32(u32::from(unit)).map_or_else(|| format!("\\u{unit:04X}"), String::from)),
				Err(_) => Err(format!("char value {unit} is not a UTF-16 code unit")),
			},
			(ConstTag::Byte, Scalar::Int(value)) if i8::try_from(*value).is_err() => Err(format!("byte value {value} out of range")),
			(ConstTag::Short, Scalar::Int(value)) if i16::try_from(*value).is_err() => Err(format!("short value {value} out of range")),
			(ConstTag::Boolean, Scalar::Int(value)) => Err(format!("boolean value {value} is neither 0 nor 1")),
			(_, Scalar::Int(value)) => Ok(value.to_string()),
			(_, Scalar::Long(value)) => Ok(value.to_string()),
			(_, Scalar::Float(value)) => Ok(value.to_string()),
			(_, Scalar::Double(value)) => Ok(value.to_string()),
			(_, Scalar::Text(value)) => Ok(value.to_string()),
		}
	}
}

/// One BMP character, or `\uXXXX` for any code unit including lone surrogates.
fn char_unit(token: &str) -> Option<u16> {
	if let Some(hex) = token.strip_prefix("\\u") {
		if hex.len() == 4 && hex.bytes().all(|byte| byte.is_ascii_hexdigit()) {
			return u16::from_str_radix(hex, 16).ok();
		}
	}
	let mut chars = token.chars();
	match (chars.next(), chars.next()) {
		(Some(ch), None) => u16::try_from(u32::from(ch)).ok(),
		_ => None,
	}
}

#[cfg(test)]
mod tests;

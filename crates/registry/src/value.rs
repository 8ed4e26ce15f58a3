//! Typed values for dynamic transform parameters.
//!
//! Literals in the settings document use XML Schema lexical forms, so parsing
//! here is stricter than Rust's `FromStr`: `inf` and `nan` are rejected while
//! `INF`, `-INF` and `NaN` are accepted, and booleans are `true`, `false`, `1`
//! or `0`.

use serde::{Deserialize, Serialize};

/// Declared type of a dynamic parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
	String,
	Number,
	Boolean,
}

impl ParameterType {
	/// Maps a `dynamicType` attribute value to a type.
	pub fn from_literal(literal: &str) -> Option<Self> {
		match literal.trim() {
			"string" => Some(Self::String),
			"number" => Some(Self::Number),
			"boolean" => Some(Self::Boolean),
			_ => None,
		}
	}

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::String => "string",
			Self::Number => "number",
			Self::Boolean => "boolean",
		}
	}

	/// Parses a literal as a value of this type.
	pub fn parse(self, literal: &str) -> Result<ParameterValue, ParameterError> {
		match self {
			Self::String => Ok(ParameterValue::String(literal.to_string())),
			Self::Number => parse_number(literal).map(ParameterValue::Number),
			Self::Boolean => parse_boolean(literal).map(ParameterValue::Boolean),
		}
	}
}

impl core::fmt::Display for ParameterType {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// The value of a dynamic parameter or transform argument.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
	Boolean(bool),
	Number(f64),
	String(String),
}

impl ParameterValue {
	pub fn parameter_type(&self) -> ParameterType {
		match self {
			Self::String(_) => ParameterType::String,
			Self::Number(_) => ParameterType::Number,
			Self::Boolean(_) => ParameterType::Boolean,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_number(&self) -> Option<f64> {
		match self {
			Self::Number(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Boolean(v) => Some(*v),
			_ => None,
		}
	}
}

impl PartialEq for ParameterValue {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::String(a), Self::String(b)) => a == b,
			(Self::Number(a), Self::Number(b)) => same_number(*a, *b),
			(Self::Boolean(a), Self::Boolean(b)) => a == b,
			_ => false,
		}
	}
}

impl core::fmt::Display for ParameterValue {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		match self {
			Self::String(v) => f.write_str(v),
			Self::Boolean(v) => write!(f, "{v}"),
			Self::Number(v) if v.is_nan() => f.write_str("NaN"),
			Self::Number(v) if v.is_infinite() => f.write_str(if *v > 0.0 { "INF" } else { "-INF" }),
			Self::Number(v) => write!(f, "{v}"),
		}
	}
}

impl From<bool> for ParameterValue {
	fn from(v: bool) -> Self {
		Self::Boolean(v)
	}
}

impl From<f64> for ParameterValue {
	fn from(v: f64) -> Self {
		Self::Number(v)
	}
}

impl From<String> for ParameterValue {
	fn from(v: String) -> Self {
		Self::String(v)
	}
}

impl From<&str> for ParameterValue {
	fn from(v: &str) -> Self {
		Self::String(v.to_string())
	}
}

/// Errors raised while parsing or assigning parameter values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParameterError {
	#[error("'{literal}' is not a valid {expected} value")]
	Parse { expected: ParameterType, literal: String },

	#[error("parameter '{name}' expects a {expected} value, got {got}")]
	TypeMismatch {
		name: String,
		expected: ParameterType,
		got: ParameterType,
	},

	#[error("parameter '{name}' only accepts its listed values, got '{value}'")]
	NotSuggested { name: String, value: String },
}

/// Parses an `xs:boolean` literal.
pub fn parse_boolean(literal: &str) -> Result<bool, ParameterError> {
	match literal.trim() {
		"true" | "1" => Ok(true),
		"false" | "0" => Ok(false),
		_ => Err(ParameterError::Parse {
			expected: ParameterType::Boolean,
			literal: literal.to_string(),
		}),
	}
}

/// Parses an `xs:double` literal.
pub fn parse_number(literal: &str) -> Result<f64, ParameterError> {
	let trimmed = literal.trim();
	let invalid = || ParameterError::Parse {
		expected: ParameterType::Number,
		literal: literal.to_string(),
	};
	match trimmed {
		"INF" | "+INF" => return Ok(f64::INFINITY),
		"-INF" => return Ok(f64::NEG_INFINITY),
		"NaN" => return Ok(f64::NAN),
		_ => {}
	}
	// Rust accepts "inf"/"nan"/"infinity"; XML does not.
	if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-')) {
		return Err(invalid());
	}
	trimmed.parse::<f64>().map_err(|_| invalid())
}

/// Numeric equality for "differs from default": NaN equals NaN.
pub(crate) fn same_number(a: f64, b: f64) -> bool {
	a == b || (a.is_nan() && b.is_nan())
}

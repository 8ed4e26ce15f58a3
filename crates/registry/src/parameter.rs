//! Dynamic transform parameters.
//!
//! A dynamic parameter is a transform argument the user may adjust before a
//! conversion runs. Each parameter is one case of a closed variant keyed by its
//! declared type; every case carries the same metadata plus native default,
//! current, and suggested values.
//!
//! Parameters live inside a shared [`Registry`](crate::Registry), so the
//! current value sits behind a lock and is edited through `&self`.

use parking_lot::RwLock;

use crate::value::{ParameterError, ParameterType, ParameterValue, parse_boolean, parse_number, same_number};

/// Metadata shared by every parameter type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterMeta {
	/// Argument name the value is passed under.
	pub name: String,
	/// Help text for editing surfaces; empty when the settings omit it.
	pub description: String,
	/// When true and suggestions exist, only suggested values are accepted.
	pub exclusive: bool,
}

impl ParameterMeta {
	pub fn new(name: impl Into<String>, description: impl Into<String>, exclusive: bool) -> Self {
		Self {
			name: name.into(),
			description: description.into(),
			exclusive,
		}
	}
}

mod sealed {
	pub trait Sealed {}
	impl Sealed for String {}
	impl Sealed for f64 {}
	impl Sealed for bool {}
}

/// Native Rust types backing each [`ParameterType`].
pub trait NativeValue: sealed::Sealed + Clone + core::fmt::Debug + Send + Sync + Sized {
	const TYPE: ParameterType;

	fn parse_literal(literal: &str) -> Result<Self, ParameterError>;

	fn from_value(value: &ParameterValue) -> Option<Self>;

	fn into_value(self) -> ParameterValue;

	fn same(&self, other: &Self) -> bool;
}

impl NativeValue for String {
	const TYPE: ParameterType = ParameterType::String;

	fn parse_literal(literal: &str) -> Result<Self, ParameterError> {
		Ok(literal.to_string())
	}

	fn from_value(value: &ParameterValue) -> Option<Self> {
		value.as_str().map(str::to_string)
	}

	fn into_value(self) -> ParameterValue {
		ParameterValue::String(self)
	}

	fn same(&self, other: &Self) -> bool {
		self == other
	}
}

impl NativeValue for f64 {
	const TYPE: ParameterType = ParameterType::Number;

	fn parse_literal(literal: &str) -> Result<Self, ParameterError> {
		parse_number(literal)
	}

	fn from_value(value: &ParameterValue) -> Option<Self> {
		value.as_number()
	}

	fn into_value(self) -> ParameterValue {
		ParameterValue::Number(self)
	}

	fn same(&self, other: &Self) -> bool {
		same_number(*self, *other)
	}
}

impl NativeValue for bool {
	const TYPE: ParameterType = ParameterType::Boolean;

	fn parse_literal(literal: &str) -> Result<Self, ParameterError> {
		parse_boolean(literal)
	}

	fn from_value(value: &ParameterValue) -> Option<Self> {
		value.as_bool()
	}

	fn into_value(self) -> ParameterValue {
		ParameterValue::Boolean(self)
	}

	fn same(&self, other: &Self) -> bool {
		self == other
	}
}

/// Storage for one parameter of native type `T`.
#[derive(Debug)]
pub struct Typed<T: NativeValue> {
	meta: ParameterMeta,
	default: T,
	current: RwLock<T>,
	suggestions: Vec<T>,
}

impl<T: NativeValue> Typed<T> {
	fn parse(meta: ParameterMeta, default_literal: &str) -> Result<Self, ParameterError> {
		let default = T::parse_literal(default_literal)?;
		Ok(Self {
			meta,
			current: RwLock::new(default.clone()),
			default,
			suggestions: Vec::new(),
		})
	}

	pub fn meta(&self) -> &ParameterMeta {
		&self.meta
	}

	pub fn default_value(&self) -> &T {
		&self.default
	}

	pub fn current(&self) -> T {
		self.current.read().clone()
	}

	pub fn suggestions(&self) -> &[T] {
		&self.suggestions
	}

	fn check(&self, value: &ParameterValue) -> Result<T, ParameterError> {
		let native = T::from_value(value).ok_or_else(|| ParameterError::TypeMismatch {
			name: self.meta.name.clone(),
			expected: T::TYPE,
			got: value.parameter_type(),
		})?;
		if self.meta.exclusive && !self.suggestions.is_empty() && !self.suggestions.iter().any(|s| s.same(&native)) {
			return Err(ParameterError::NotSuggested {
				name: self.meta.name.clone(),
				value: value.to_string(),
			});
		}
		Ok(native)
	}

	fn set(&self, value: &ParameterValue) -> Result<(), ParameterError> {
		let native = self.check(value)?;
		*self.current.write() = native;
		Ok(())
	}

	fn reset(&self) {
		*self.current.write() = self.default.clone();
	}

	fn is_modified(&self) -> bool {
		!self.current.read().same(&self.default)
	}

	fn add_suggestion(&mut self, literal: &str) -> Result<(), ParameterError> {
		self.suggestions.push(T::parse_literal(literal)?);
		Ok(())
	}
}

/// A named, typed, user-adjustable transform argument.
#[derive(Debug)]
pub enum DynamicParameter {
	String(Typed<String>),
	Number(Typed<f64>),
	Boolean(Typed<bool>),
}

macro_rules! dispatch {
	($self:expr, $typed:ident => $body:expr) => {
		match $self {
			DynamicParameter::String($typed) => $body,
			DynamicParameter::Number($typed) => $body,
			DynamicParameter::Boolean($typed) => $body,
		}
	};
}

impl DynamicParameter {
	/// Builds a parameter of type `ty`, parsing its default literal.
	///
	/// An unparseable default fails construction.
	pub fn new(ty: ParameterType, meta: ParameterMeta, default_literal: &str) -> Result<Self, ParameterError> {
		Ok(match ty {
			ParameterType::String => Self::String(Typed::parse(meta, default_literal)?),
			ParameterType::Number => Self::Number(Typed::parse(meta, default_literal)?),
			ParameterType::Boolean => Self::Boolean(Typed::parse(meta, default_literal)?),
		})
	}

	/// Appends a suggested value, parsed through this parameter's type.
	pub fn add_suggestion(&mut self, literal: &str) -> Result<(), ParameterError> {
		dispatch!(self, typed => typed.add_suggestion(literal))
	}

	/// Builder form of [`DynamicParameter::add_suggestion`].
	pub fn with_suggestions<'a>(mut self, literals: impl IntoIterator<Item = &'a str>) -> Result<Self, ParameterError> {
		for literal in literals {
			self.add_suggestion(literal)?;
		}
		Ok(self)
	}

	pub fn parameter_type(&self) -> ParameterType {
		match self {
			Self::String(_) => ParameterType::String,
			Self::Number(_) => ParameterType::Number,
			Self::Boolean(_) => ParameterType::Boolean,
		}
	}

	pub fn meta(&self) -> &ParameterMeta {
		dispatch!(self, typed => typed.meta())
	}

	pub fn name(&self) -> &str {
		&self.meta().name
	}

	pub fn description(&self) -> &str {
		&self.meta().description
	}

	pub fn is_exclusive(&self) -> bool {
		self.meta().exclusive
	}

	/// Current value.
	pub fn value(&self) -> ParameterValue {
		dispatch!(self, typed => typed.current().into_value())
	}

	pub fn default_value(&self) -> ParameterValue {
		dispatch!(self, typed => typed.default_value().clone().into_value())
	}

	/// Suggested values in declaration order.
	pub fn suggestions(&self) -> Vec<ParameterValue> {
		dispatch!(self, typed => typed.suggestions().iter().cloned().map(NativeValue::into_value).collect())
	}

	pub fn has_suggestions(&self) -> bool {
		dispatch!(self, typed => !typed.suggestions().is_empty())
	}

	/// Returns true if [`DynamicParameter::set_value`] would accept `value`.
	pub fn accepts(&self, value: &ParameterValue) -> bool {
		dispatch!(self, typed => typed.check(value).is_ok())
	}

	/// Replaces the current value.
	///
	/// The value must have the declared type, and must be one of the
	/// suggestions when the parameter is exclusive and has any.
	pub fn set_value(&self, value: impl Into<ParameterValue>) -> Result<(), ParameterError> {
		let value = value.into();
		dispatch!(self, typed => typed.set(&value))
	}

	/// Parses `literal` through the declared type, then assigns it.
	pub fn set_literal(&self, literal: &str) -> Result<(), ParameterError> {
		self.set_value(self.parameter_type().parse(literal)?)
	}

	/// Restores the default value.
	pub fn reset(&self) {
		dispatch!(self, typed => typed.reset())
	}

	/// Whether the current value differs from the default.
	pub fn is_modified(&self) -> bool {
		dispatch!(self, typed => typed.is_modified())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn param(ty: ParameterType, default: &str, exclusive: bool) -> DynamicParameter {
		DynamicParameter::new(ty, ParameterMeta::new("p", "", exclusive), default).unwrap()
	}

	#[test]
	#[allow(clippy::approx_constant)]
	fn number_default_is_parsed_eagerly() {
		let p = param(ParameterType::Number, "3.14", true);
		assert_eq!(p.value(), ParameterValue::Number(3.14));
		assert!(!p.is_modified());
	}

	#[test]
	fn non_numeric_default_fails_construction() {
		let result = DynamicParameter::new(ParameterType::Number, ParameterMeta::new("p", "", true), "pi");
		assert!(matches!(result, Err(ParameterError::Parse { expected: ParameterType::Number, .. })));
	}

	#[test]
	fn unparseable_suggestion_fails() {
		let mut p = param(ParameterType::Boolean, "true", true);
		assert!(p.add_suggestion("false").is_ok());
		assert!(p.add_suggestion("maybe").is_err());
		assert_eq!(p.suggestions(), vec![ParameterValue::Boolean(false)]);
	}

	#[test]
	fn modified_tracks_equality_with_default() {
		let p = param(ParameterType::String, "compact", false);
		p.set_value("verbose").unwrap();
		assert!(p.is_modified());
		p.set_value("compact").unwrap();
		assert!(!p.is_modified());
		p.set_value("verbose").unwrap();
		p.reset();
		assert!(!p.is_modified());
		assert_eq!(p.value(), ParameterValue::from("compact"));
	}

	#[test]
	fn numeric_modified_compares_by_value() {
		let p = param(ParameterType::Number, "1", true);
		p.set_literal("1.0").unwrap();
		assert!(!p.is_modified());
		p.set_literal("1e0").unwrap();
		assert!(!p.is_modified());
		p.set_value(1.5).unwrap();
		assert!(p.is_modified());
	}

	#[test]
	fn set_value_is_type_checked() {
		let p = param(ParameterType::Boolean, "false", true);
		let err = p.set_value("true").unwrap_err();
		assert_eq!(
			err,
			ParameterError::TypeMismatch {
				name: "p".to_string(),
				expected: ParameterType::Boolean,
				got: ParameterType::String,
			}
		);
		assert_eq!(p.value(), ParameterValue::Boolean(false));
	}

	#[test]
	fn exclusive_suggestions_restrict_input() {
		let p = param(ParameterType::String, "a", true).with_suggestions(["a", "b"]).unwrap();
		assert!(p.accepts(&"b".into()));
		assert!(!p.accepts(&"c".into()));
		assert!(matches!(p.set_value("c"), Err(ParameterError::NotSuggested { .. })));
		p.set_value("b").unwrap();
		assert_eq!(p.value(), ParameterValue::from("b"));
	}

	#[test]
	fn non_exclusive_suggestions_allow_any_typed_value() {
		let p = param(ParameterType::Number, "1", false).with_suggestions(["1", "2"]).unwrap();
		assert!(p.has_suggestions());
		p.set_value(7.0).unwrap();
		assert_eq!(p.value(), ParameterValue::Number(7.0));
		assert!(!p.accepts(&"7".into()));
	}

	#[test]
	fn exclusive_without_suggestions_accepts_any_typed_value() {
		let p = param(ParameterType::Number, "1", true);
		p.set_value(42.0).unwrap();
		assert_eq!(p.value().as_number(), Some(42.0));
	}

	#[test]
	fn literal_edits_go_through_type_parser() {
		let p = param(ParameterType::Boolean, "0", true);
		assert_eq!(p.default_value(), ParameterValue::Boolean(false));
		p.set_literal("1").unwrap();
		assert_eq!(p.value(), ParameterValue::Boolean(true));
		assert!(p.set_literal("on").is_err());
	}
}

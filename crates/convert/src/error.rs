use ladder_intern::InternError;
use ladder_registry::{SettingsError, TransformError};
use thiserror::Error;

/// Errors raised by a conversion.
#[derive(Error, Debug)]
pub enum ConvertError {
	/// The converter settings could not be loaded.
	#[error("converter settings: {0}")]
	Settings(#[from] SettingsError),

	#[error("malformed document: {0}")]
	Xml(#[from] quick_xml::Error),

	#[error("document has no root element")]
	MissingRoot,

	#[error("root element prefix '{0}' is not bound to a namespace")]
	UnboundPrefix(String),

	#[error("root element name is not valid UTF-8: {0}")]
	NonUtf8(String),

	#[error(transparent)]
	Name(#[from] InternError),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Transform(#[from] TransformError),

	/// The disambiguator declined to pick a candidate. No output is produced.
	#[error("conversion cancelled")]
	Cancelled,

	/// The chain revisited a root element it already converted.
	#[error("conversion cycle: {element} was already converted in this chain")]
	CycleDetected { element: String },

	#[error("candidate {index} selected but only {count} exist")]
	InvalidSelection { index: usize, count: usize },
}

impl ConvertError {
	pub fn is_cancelled(&self) -> bool {
		matches!(self, Self::Cancelled)
	}
}

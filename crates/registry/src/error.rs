use std::path::PathBuf;

use ladder_intern::InternError;
use thiserror::Error;

use crate::value::ParameterError;

/// Errors raised while loading converter settings.
///
/// Any of these aborts the whole load. No partial registry is produced.
#[derive(Error, Debug)]
pub enum SettingsError {
	#[error("failed to read settings {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("malformed settings XML: {0}")]
	Xml(#[from] quick_xml::Error),

	#[error("malformed settings attribute: {0}")]
	Attribute(#[from] quick_xml::events::attributes::AttrError),

	#[error("settings document has no root element")]
	MissingRoot,

	#[error("unexpected settings root {found}, expected {expected}")]
	UnexpectedRoot { found: String, expected: String },

	#[error("element <{0}> found after the settings root")]
	ContentAfterRoot(String),

	#[error("settings document ended inside <{0}>")]
	UnexpectedEof(String),

	#[error("<{element}> is missing required attribute '{attribute}'")]
	MissingAttribute { element: &'static str, attribute: &'static str },

	#[error("prefix '{0}' is not bound to a namespace")]
	UnboundPrefix(String),

	#[error(transparent)]
	Name(#[from] InternError),

	#[error("unknown dynamicType '{0}'")]
	UnknownDynamicType(String),

	#[error("attribute '{attribute}' has invalid boolean value '{value}'")]
	InvalidBoolean { attribute: &'static str, value: String },

	#[error("transform parameter '{name}': {source}")]
	Parameter {
		name: String,
		#[source]
		source: ParameterError,
	},

	#[error("dynamic parameter '{0}' is declared twice in one converter")]
	DuplicateParameter(String),

	#[error("extension namespace '{0}' is bound twice in one converter")]
	DuplicateExtension(String),

	#[error("unknown extension class '{0}'")]
	UnknownExtensionClass(String),

	#[error("settings contain non-UTF-8 names")]
	NonUtf8,
}

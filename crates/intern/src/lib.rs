//! Interned XML names.
//!
//! Every namespace URI and local name read while loading converter settings or
//! inspecting a document goes through one [`NameTable`]. Names that decode to
//! the same text share a single allocation, so the element-name tests run for
//! every visited element are pointer comparisons rather than string scans.
//!
//! * [`Name`]: an interned atom.
//! * [`NameTable`]: the interning table, with a process-wide instance at
//!   [`NameTable::global`].
//! * [`ElementName`]: a `(namespace, local name)` pair built from two atoms.

mod element;
mod name;
#[cfg(test)]
mod tests;

pub use element::ElementName;
pub use name::{Name, NameTable};

/// Errors raised while building element names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InternError {
	/// Element names need a non-empty local part.
	#[error("element local name cannot be empty")]
	EmptyLocalName,

	/// Text that should have been `{namespace}local` or `local`.
	#[error("invalid element name '{0}' (expected '{{namespace}}local' or 'local')")]
	InvalidClarkName(String),
}

use crate::{InternError, Name, NameTable};

/// A `(namespace URI, local name)` pair identifying an element type.
///
/// The namespace may be empty; the local name may not. Both parts are atoms
/// from a [`NameTable`], so equality between names from the same table never
/// compares text.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementName {
	namespace: Name,
	local: Name,
}

impl ElementName {
	/// Interns both parts in `table`.
	pub fn new(table: &NameTable, namespace: &str, local: &str) -> Result<Self, InternError> {
		if local.is_empty() {
			return Err(InternError::EmptyLocalName);
		}
		Ok(Self {
			namespace: table.intern(namespace),
			local: table.intern(local),
		})
	}

	/// Builds an element name from atoms that are already interned.
	pub fn from_names(namespace: Name, local: Name) -> Result<Self, InternError> {
		if local.is_empty() {
			return Err(InternError::EmptyLocalName);
		}
		Ok(Self { namespace, local })
	}

	/// Parses Clark notation: `{namespace}local`, or a bare `local` for the
	/// empty namespace.
	pub fn from_clark(table: &NameTable, text: &str) -> Result<Self, InternError> {
		let text = text.trim();
		let Some(rest) = text.strip_prefix('{') else {
			if text.contains(is_brace) {
				return Err(InternError::InvalidClarkName(text.to_string()));
			}
			return Self::new(table, "", text);
		};
		let (namespace, local) = rest
			.split_once('}')
			.ok_or_else(|| InternError::InvalidClarkName(text.to_string()))?;
		if local.contains(is_brace) {
			return Err(InternError::InvalidClarkName(text.to_string()));
		}
		Self::new(table, namespace, local)
	}

	/// The same name with both parts interned in `table`.
	pub fn rebind(&self, table: &NameTable) -> Self {
		Self {
			namespace: table.intern(&self.namespace),
			local: table.intern(&self.local),
		}
	}

	pub fn namespace(&self) -> &Name {
		&self.namespace
	}

	pub fn local_name(&self) -> &Name {
		&self.local
	}

	/// Identity test against pre-interned atoms.
	pub fn is(&self, namespace: &Name, local: &Name) -> bool {
		Name::ptr_eq(&self.local, local) && Name::ptr_eq(&self.namespace, namespace)
	}
}

impl core::fmt::Display for ElementName {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		if self.namespace.is_empty() {
			write!(f, "{}", self.local)
		} else {
			write!(f, "{{{}}}{}", self.namespace, self.local)
		}
	}
}

impl core::fmt::Debug for ElementName {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		write!(f, "ElementName({self})")
	}
}

fn is_brace(c: char) -> bool {
	c == '{' || c == '}'
}

use std::borrow::Borrow;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use rustc_hash::FxHashSet as HashSet;

/// An interned string atom.
///
/// Atoms handed out by the same [`NameTable`] are equal exactly when they are
/// the same allocation. Equality still falls back to content so that atoms
/// from different tables compare sensibly; use [`Name::ptr_eq`] where only the
/// identity test is wanted.
#[derive(Clone)]
pub struct Name(Arc<str>);

impl Name {
	/// Returns the text of this atom.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Identity comparison.
	pub fn ptr_eq(a: &Name, b: &Name) -> bool {
		Arc::ptr_eq(&a.0, &b.0)
	}

	/// Returns true for the empty atom (the "no namespace" URI).
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl PartialEq for Name {
	fn eq(&self, other: &Self) -> bool {
		Name::ptr_eq(self, other) || *self.0 == *other.0
	}
}

impl Eq for Name {}

impl Hash for Name {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.as_str().hash(state);
	}
}

impl PartialOrd for Name {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Name {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		self.as_str().cmp(other.as_str())
	}
}

impl Borrow<str> for Name {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl AsRef<str> for Name {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl std::ops::Deref for Name {
	type Target = str;

	fn deref(&self) -> &str {
		&self.0
	}
}

impl core::fmt::Debug for Name {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		core::fmt::Debug::fmt(self.as_str(), f)
	}
}

impl core::fmt::Display for Name {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.write_str(self.as_str())
	}
}

static GLOBAL: LazyLock<NameTable> = LazyLock::new(NameTable::new);

/// Canonicalizing table of [`Name`] atoms.
///
/// Safe to share between threads; lookups take a read lock and only the first
/// sighting of a string takes the write lock.
#[derive(Default)]
pub struct NameTable {
	names: RwLock<HashSet<Name>>,
}

impl NameTable {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// The process-wide table shared by settings loading and document inspection.
	pub fn global() -> &'static NameTable {
		&GLOBAL
	}

	/// Returns the canonical atom for `text`, adding it on first use.
	pub fn intern(&self, text: &str) -> Name {
		if let Some(name) = self.names.read().get(text) {
			return name.clone();
		}

		let mut names = self.names.write();
		// Another writer may have won the race between the two locks.
		if let Some(name) = names.get(text) {
			return name.clone();
		}
		let name = Name(Arc::from(text));
		names.insert(name.clone());
		name
	}

	/// Returns the canonical atom for `text` without adding it.
	pub fn get(&self, text: &str) -> Option<Name> {
		self.names.read().get(text).cloned()
	}

	/// Returns true when `name` is the atom this table hands out for its text.
	pub fn owns(&self, name: &Name) -> bool {
		self.names
			.read()
			.get(name.as_str())
			.is_some_and(|canonical| Name::ptr_eq(canonical, name))
	}

	/// Number of distinct atoms.
	pub fn len(&self) -> usize {
		self.names.read().len()
	}

	/// Returns true if nothing has been interned yet.
	pub fn is_empty(&self) -> bool {
		self.names.read().is_empty()
	}
}

impl core::fmt::Debug for NameTable {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("NameTable").field("len", &self.len()).finish()
	}
}

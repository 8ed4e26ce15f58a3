use indexmap::IndexMap;
use indexmap::map::Entry;
use ladder_intern::ElementName;
use rustc_hash::FxBuildHasher;

use crate::candidate::CandidateTransform;

/// Candidate transforms keyed by source root element.
///
/// Sources keep first-registration order and each source's candidates keep
/// file order, so disambiguation menus list them as the settings declare them.
#[derive(Debug, Default)]
pub struct Registry {
	by_source: IndexMap<ElementName, Vec<CandidateTransform>, FxBuildHasher>,
}

impl Registry {
	/// A registry with no sources. Every lookup misses.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Appends `candidate` to the list for `source`.
	pub fn register(&mut self, source: ElementName, candidate: CandidateTransform) {
		match self.by_source.entry(source) {
			Entry::Occupied(mut e) => e.get_mut().push(candidate),
			Entry::Vacant(e) => {
				e.insert(vec![candidate]);
			}
		}
	}

	/// Candidates registered for `source`, in registration order.
	pub fn candidates(&self, source: &ElementName) -> Option<&[CandidateTransform]> {
		self.by_source.get(source).map(Vec::as_slice)
	}

	pub fn sources(&self) -> impl Iterator<Item = &ElementName> {
		self.by_source.keys()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&ElementName, &[CandidateTransform])> {
		self.by_source.iter().map(|(k, v)| (k, v.as_slice()))
	}

	/// Number of distinct sources.
	pub fn len(&self) -> usize {
		self.by_source.len()
	}

	pub fn candidate_count(&self) -> usize {
		self.by_source.values().map(Vec::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.by_source.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use ladder_intern::NameTable;

	use super::*;
	use crate::arguments::Arguments;

	fn candidate(names: &NameTable, target: &str, description: &str) -> CandidateTransform {
		CandidateTransform::new(
			ElementName::from_clark(names, target).unwrap(),
			description,
			"t.xslt",
			Arguments::new(),
			Vec::new(),
		)
	}

	#[test]
	fn preserves_registration_order() {
		let names = NameTable::new();
		let v1 = ElementName::from_clark(&names, "{urn:v1}Model").unwrap();
		let v0 = ElementName::from_clark(&names, "{urn:v0}Model").unwrap();

		let mut registry = Registry::empty();
		registry.register(v1.clone(), candidate(&names, "{urn:v2}Model", "first"));
		registry.register(v0.clone(), candidate(&names, "{urn:v1}Model", "only"));
		registry.register(v1.clone(), candidate(&names, "{urn:v3}Model", "second"));

		let sources: Vec<_> = registry.sources().cloned().collect();
		assert_eq!(sources, [v1.clone(), v0]);
		let labels: Vec<_> = registry.candidates(&v1).unwrap().iter().map(|c| c.description()).collect();
		assert_eq!(labels, ["first", "second"]);
		assert_eq!(registry.len(), 2);
		assert_eq!(registry.candidate_count(), 3);
	}

	#[test]
	fn empty_registry_misses() {
		let names = NameTable::new();
		let registry = Registry::empty();
		assert!(registry.is_empty());
		assert!(registry.candidates(&ElementName::from_clark(&names, "Model").unwrap()).is_none());
	}
}

use ladder_intern::ElementName;
use ladder_registry::CandidateTransform;

/// Outcome of a disambiguation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
	/// Index into the candidate slice.
	Selected(usize),
	/// Abort the whole conversion chain.
	Cancel,
}

/// Picks one candidate when a source has several, or when its single
/// candidate has parameters worth confirming.
///
/// Implementations may edit parameters through
/// [`DynamicParameter::set_value`](ladder_registry::DynamicParameter::set_value)
/// before returning; the driver passes the current values to the transform.
pub trait Disambiguator {
	fn choose(&mut self, source: &ElementName, candidates: &[CandidateTransform]) -> Choice;
}

/// Always takes the first candidate with its parameters as they are.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstCandidate;

impl Disambiguator for FirstCandidate {
	fn choose(&mut self, _: &ElementName, _: &[CandidateTransform]) -> Choice {
		Choice::Selected(0)
	}
}

impl<F> Disambiguator for F
where
	F: FnMut(&ElementName, &[CandidateTransform]) -> Choice,
{
	fn choose(&mut self, source: &ElementName, candidates: &[CandidateTransform]) -> Choice {
		self(source, candidates)
	}
}

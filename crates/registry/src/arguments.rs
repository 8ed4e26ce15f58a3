use std::sync::Arc;

use crate::extension::Extension;
use crate::value::ParameterValue;

/// Name/value arguments and extension bindings handed to a transform.
#[derive(Clone, Default)]
pub struct Arguments {
	params: Vec<(String, ParameterValue)>,
	extensions: Vec<(String, Arc<dyn Extension>)>,
}

impl Arguments {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets `name`, replacing an existing value in place or appending.
	///
	/// Returns the replaced value, if any.
	pub fn set_param(&mut self, name: impl Into<String>, value: impl Into<ParameterValue>) -> Option<ParameterValue> {
		let name = name.into();
		let value = value.into();
		match self.params.iter_mut().find(|(n, _)| *n == name) {
			Some((_, slot)) => Some(std::mem::replace(slot, value)),
			None => {
				self.params.push((name, value));
				None
			}
		}
	}

	pub fn param(&self, name: &str) -> Option<&ParameterValue> {
		self.params.iter().find(|(n, _)| n == name).map(|(_, v)| v)
	}

	pub fn remove_param(&mut self, name: &str) -> Option<ParameterValue> {
		let index = self.params.iter().position(|(n, _)| n == name)?;
		Some(self.params.remove(index).1)
	}

	/// Parameters in insertion order.
	pub fn params(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
		self.params.iter().map(|(n, v)| (n.as_str(), v))
	}

	/// Binds `extension` under `namespace`, returning any previous binding.
	pub fn bind_extension(&mut self, namespace: impl Into<String>, extension: Arc<dyn Extension>) -> Option<Arc<dyn Extension>> {
		let namespace = namespace.into();
		match self.extensions.iter_mut().find(|(ns, _)| *ns == namespace) {
			Some((_, slot)) => Some(std::mem::replace(slot, extension)),
			None => {
				self.extensions.push((namespace, extension));
				None
			}
		}
	}

	pub fn extension(&self, namespace: &str) -> Option<&Arc<dyn Extension>> {
		self.extensions.iter().find(|(ns, _)| ns == namespace).map(|(_, e)| e)
	}

	pub fn extensions(&self) -> impl Iterator<Item = (&str, &Arc<dyn Extension>)> {
		self.extensions.iter().map(|(ns, e)| (ns.as_str(), e))
	}

	pub fn is_empty(&self) -> bool {
		self.params.is_empty() && self.extensions.is_empty()
	}
}

impl core::fmt::Debug for Arguments {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("Arguments")
			.field("params", &self.params)
			.field("extensions", &self.extensions.iter().map(|(ns, _)| ns).collect::<Vec<_>>())
			.finish()
	}
}

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ladder_intern::ElementName;
use once_cell::sync::OnceCell;

use crate::arguments::Arguments;
use crate::parameter::DynamicParameter;
use crate::transform::{Transform, TransformError, TransformLoader};
use crate::value::ParameterValue;

/// One registered conversion from a source root element to a target.
///
/// The descriptor is immutable once loaded. The compiled transform is
/// produced on first use and then shared by every later conversion.
pub struct CandidateTransform {
	target: ElementName,
	description: String,
	transform_file: PathBuf,
	arguments: Arguments,
	parameters: Vec<DynamicParameter>,
	compiled: OnceCell<Arc<dyn Transform>>,
}

impl CandidateTransform {
	pub fn new(
		target: ElementName,
		description: impl Into<String>,
		transform_file: impl Into<PathBuf>,
		arguments: Arguments,
		parameters: Vec<DynamicParameter>,
	) -> Self {
		Self {
			target,
			description: description.into(),
			transform_file: transform_file.into(),
			arguments,
			parameters,
			compiled: OnceCell::new(),
		}
	}

	/// Root element produced by this transform.
	pub fn target(&self) -> &ElementName {
		&self.target
	}

	pub fn description(&self) -> &str {
		&self.description
	}

	/// Text for menus: the description, or the target when none was given.
	pub fn label(&self) -> String {
		if self.description.is_empty() {
			self.target.to_string()
		} else {
			self.description.clone()
		}
	}

	pub fn transform_file(&self) -> &Path {
		&self.transform_file
	}

	/// Base arguments exactly as declared in the settings.
	pub fn arguments(&self) -> &Arguments {
		&self.arguments
	}

	pub fn parameters(&self) -> &[DynamicParameter] {
		&self.parameters
	}

	pub fn has_dynamic_parameters(&self) -> bool {
		!self.parameters.is_empty()
	}

	pub fn parameter(&self, name: &str) -> Option<&DynamicParameter> {
		self.parameters.iter().find(|p| p.name() == name)
	}

	/// Base arguments with each dynamic parameter's current value written
	/// under its own name.
	pub fn synchronized_arguments(&self) -> Arguments {
		let mut arguments = self.arguments.clone();
		for parameter in &self.parameters {
			arguments.set_param(parameter.name(), parameter.value());
		}
		arguments
	}

	/// Parameters whose current value differs from the default.
	pub fn modified_parameters(&self) -> Vec<(String, ParameterValue)> {
		self.parameters
			.iter()
			.filter(|p| p.is_modified())
			.map(|p| (p.name().to_string(), p.value()))
			.collect()
	}

	pub fn reset_parameters(&self) {
		for parameter in &self.parameters {
			parameter.reset();
		}
	}

	/// Whether the transform has been compiled.
	pub fn is_loaded(&self) -> bool {
		self.compiled.get().is_some()
	}

	/// Returns the compiled transform, loading it through `loader` on first use.
	///
	/// A failed load leaves the cell empty, so the next call tries again.
	pub fn transform(&self, loader: &dyn TransformLoader) -> Result<&Arc<dyn Transform>, TransformError> {
		self.compiled.get_or_try_init(|| {
			tracing::debug!(file = %self.transform_file.display(), produces = %self.target, "compiling transform");
			loader.load(&self.transform_file)
		})
	}
}

impl core::fmt::Debug for CandidateTransform {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("CandidateTransform")
			.field("target", &self.target)
			.field("description", &self.description)
			.field("transform_file", &self.transform_file)
			.field("arguments", &self.arguments)
			.field("parameters", &self.parameters)
			.field("loaded", &self.is_loaded())
			.finish()
	}
}

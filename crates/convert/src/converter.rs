use std::io::{BufReader, Cursor, Read, Seek};
use std::sync::Arc;

use ladder_intern::{ElementName, NameTable};
use ladder_registry::{CandidateTransform, ExtensionCatalog, Registry, SettingsLoader, TransformLoader};
use once_cell::sync::OnceCell;
use rustc_hash::FxHashSet as HashSet;

use crate::config::ConverterConfig;
use crate::disambiguate::{Choice, Disambiguator};
use crate::error::ConvertError;
use crate::guard::PositionGuard;
use crate::inspect::inspect_root;

/// Upgrades documents saved under obsolete schemas.
///
/// The registry is loaded from [`ConverterConfig::settings_path`] on the first
/// conversion and kept for the converter's lifetime. A failed load is
/// reported to that caller and retried by the next one.
pub struct Converter {
	config: ConverterConfig,
	canonical: ElementName,
	names: &'static NameTable,
	extensions: ExtensionCatalog,
	loader: Arc<dyn TransformLoader>,
	registry: OnceCell<Registry>,
}

impl Converter {
	/// Creates a converter using the global name table and every extension
	/// class submitted to the binary.
	pub fn new(config: ConverterConfig, loader: Arc<dyn TransformLoader>) -> Result<Self, ConvertError> {
		let names = NameTable::global();
		let canonical = config.canonical_root(names)?;
		Ok(Self {
			config,
			canonical,
			names,
			extensions: ExtensionCatalog::with_submitted(),
			loader,
			registry: OnceCell::new(),
		})
	}

	/// Replaces the extension catalog used when the registry is built.
	pub fn with_extensions(mut self, extensions: ExtensionCatalog) -> Self {
		self.extensions = extensions;
		self
	}

	/// Interns settings and document names into `names` instead of the
	/// global table.
	pub fn with_names(mut self, names: &'static NameTable) -> Self {
		self.canonical = self.canonical.rebind(names);
		self.names = names;
		self
	}

	pub fn config(&self) -> &ConverterConfig {
		&self.config
	}

	/// Root element of the current format.
	pub fn canonical_root(&self) -> &ElementName {
		&self.canonical
	}

	pub fn names(&self) -> &'static NameTable {
		self.names
	}

	/// Returns the registry, loading it on first use.
	pub fn registry(&self) -> Result<&Registry, ConvertError> {
		self.registry
			.get_or_try_init(|| {
				let loader = SettingsLoader::new(self.names, &self.config.converters_dir, &self.extensions);
				loader.load_file(&self.config.settings_path)
			})
			.map_err(|error| {
				tracing::error!(path = %self.config.settings_path.display(), %error, "failed to load converter settings");
				ConvertError::from(error)
			})
	}

	/// Reads the root element name of `input` without moving its position.
	pub fn inspect<S: Read + Seek>(&self, input: &mut S) -> Result<ElementName, ConvertError> {
		let mut guard = PositionGuard::new(input)?;
		inspect_root(self.names, BufReader::new(&mut *guard))
	}

	/// Converts `input` until it reaches the canonical format or no further
	/// converter applies.
	///
	/// Returns `None` when no conversion was needed. Otherwise the result is
	/// the output of the last step, positioned at its start. The position of
	/// `input` is the same on return as on entry, whatever the outcome.
	///
	/// Without a disambiguator the first candidate is used wherever a choice
	/// would have been offered.
	pub fn convert<S: Read + Seek>(&self, input: &mut S, mut disambiguator: Option<&mut dyn Disambiguator>) -> Result<Option<Cursor<Vec<u8>>>, ConvertError> {
		let registry = self.registry()?;
		let mut input = PositionGuard::new(input)?;
		let mut current: Option<Cursor<Vec<u8>>> = None;
		let mut visited: HashSet<ElementName> = HashSet::default();

		loop {
			let root = match current.as_mut() {
				Some(buffer) => self.inspect(buffer)?,
				None => self.inspect(&mut *input)?,
			};
			if root == self.canonical {
				tracing::debug!(root = %root, "document is current");
				break;
			}
			let Some(candidates) = registry.candidates(&root) else {
				tracing::debug!(root = %root, "no converter registered");
				break;
			};
			if !visited.insert(root.clone()) {
				return Err(ConvertError::CycleDetected { element: root.to_string() });
			}

			let candidate = select(&root, candidates, disambiguator.as_deref_mut())?;
			let output = match current.as_mut() {
				Some(buffer) => self.apply(candidate, buffer)?,
				None => self.apply(candidate, &mut *input)?,
			};
			tracing::info!(
				from = %root,
				to = %candidate.target(),
				step = visited.len(),
				bytes = output.get_ref().len(),
				"applied converter"
			);
			// Replacing `current` releases the previous step's buffer.
			current = Some(output);
		}

		Ok(current)
	}

	fn apply<S: Read + Seek>(&self, candidate: &CandidateTransform, stream: &mut S) -> Result<Cursor<Vec<u8>>, ConvertError> {
		let transform = candidate.transform(self.loader.as_ref())?;
		let arguments = candidate.synchronized_arguments();

		let mut guard = PositionGuard::new(stream)?;
		let mut reader = BufReader::new(&mut *guard);
		let mut output = Vec::new();
		transform.apply(&mut reader, &arguments, &mut output)?;
		Ok(Cursor::new(output))
	}
}

fn select<'r>(
	source: &ElementName,
	candidates: &'r [CandidateTransform],
	disambiguator: Option<&mut (dyn Disambiguator + '_)>,
) -> Result<&'r CandidateTransform, ConvertError> {
	let index = match (candidates, disambiguator) {
		([only], _) if !only.has_dynamic_parameters() => 0,
		(_, None) => 0,
		(_, Some(disambiguator)) => match disambiguator.choose(source, candidates) {
			Choice::Selected(index) => index,
			Choice::Cancel => {
				tracing::info!(source = %source, "conversion cancelled");
				return Err(ConvertError::Cancelled);
			}
		},
	};
	let candidate = candidates.get(index).ok_or(ConvertError::InvalidSelection {
		index,
		count: candidates.len(),
	})?;
	tracing::debug!(source = %source, index, to = %candidate.target(), "selected converter");
	Ok(candidate)
}

impl core::fmt::Debug for Converter {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("Converter")
			.field("config", &self.config)
			.field("canonical", &self.canonical)
			.field("extensions", &self.extensions)
			.field("registry", &self.registry.get())
			.finish_non_exhaustive()
	}
}

//! Converter settings loading.
//!
//! The settings document is read in one streaming pass:
//!
//! ```xml
//! <settings xmlns="urn:ladder:settings" xmlns:v1="urn:example:v1" xmlns:v2="urn:example:v2">
//!   <xmlConverters>
//!     <xmlConverter sourceElement="v1:Model" targetElement="v2:Model"
//!                   transformFile="v1-to-v2.xslt" description="Upgrade to v2">
//!       <transformParameter name="indent" value="2" dynamicType="number">
//!         <dynamicValue value="2"/>
//!         <dynamicValue value="4"/>
//!       </transformParameter>
//!       <extensionClass xslNamespace="urn:helpers" className="DateHelpers"/>
//!     </xmlConverter>
//!   </xmlConverters>
//! </settings>
//! ```
//!
//! Elements the loader does not know are skipped with their whole subtree.
//! Any error aborts the load.

mod schema;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use ladder_intern::{ElementName, Name, NameTable};
use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, QName, ResolveResult};
pub use schema::SETTINGS_NAMESPACE;
use schema::SettingsVocabulary;

use crate::arguments::Arguments;
use crate::candidate::CandidateTransform;
use crate::error::SettingsError;
use crate::extension::ExtensionCatalog;
use crate::parameter::{DynamicParameter, ParameterMeta};
use crate::registry::Registry;
use crate::value::{ParameterType, parse_boolean};

/// Builds a [`Registry`] from a settings document.
pub struct SettingsLoader<'a> {
	names: &'a NameTable,
	vocab: SettingsVocabulary,
	converters_dir: PathBuf,
	catalog: &'a ExtensionCatalog,
}

impl<'a> SettingsLoader<'a> {
	/// Creates a loader that interns into `names`, resolves transform files
	/// under `converters_dir`, and instantiates extensions from `catalog`.
	pub fn new(names: &'a NameTable, converters_dir: impl Into<PathBuf>, catalog: &'a ExtensionCatalog) -> Self {
		Self {
			names,
			vocab: SettingsVocabulary::new(names),
			converters_dir: converters_dir.into(),
			catalog,
		}
	}

	/// Loads the settings file at `path`.
	///
	/// A missing file is not an error and yields an empty registry.
	pub fn load_file(&self, path: &Path) -> Result<Registry, SettingsError> {
		let file = match File::open(path) {
			Ok(file) => file,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				tracing::debug!(path = %path.display(), "no converter settings, registry is empty");
				return Ok(Registry::empty());
			}
			Err(source) => {
				return Err(SettingsError::Io {
					path: path.to_path_buf(),
					source,
				});
			}
		};

		let registry = self.parse(BufReader::new(file))?;
		tracing::info!(
			path = %path.display(),
			sources = registry.len(),
			candidates = registry.candidate_count(),
			"loaded converter settings"
		);
		Ok(registry)
	}

	/// Parses a settings document from `input`.
	pub fn parse<R: BufRead>(&self, input: R) -> Result<Registry, SettingsError> {
		let mut parser = Parser {
			loader: self,
			reader: NsReader::from_reader(input),
			buf: Vec::new(),
		};
		parser.document()
	}
}

/// An element start tag with its unprefixed attributes.
struct OpenElement {
	namespace: Name,
	local: Name,
	attributes: Vec<(Name, String)>,
	empty: bool,
}

impl OpenElement {
	fn attribute(&self, key: &Name) -> Option<&str> {
		self.attributes.iter().find(|(k, _)| Name::ptr_eq(k, key)).map(|(_, v)| v.as_str())
	}

	fn required(&self, key: &Name, element: &'static str, attribute: &'static str) -> Result<&str, SettingsError> {
		self.attribute(key).ok_or(SettingsError::MissingAttribute { element, attribute })
	}

	fn clark(&self) -> String {
		if self.namespace.is_empty() {
			self.local.to_string()
		} else {
			format!("{{{}}}{}", self.namespace, self.local)
		}
	}
}

struct Parser<'l, 'a, R> {
	loader: &'l SettingsLoader<'a>,
	reader: NsReader<R>,
	buf: Vec<u8>,
}

impl<R: BufRead> Parser<'_, '_, R> {
	fn document(&mut self) -> Result<Registry, SettingsError> {
		let root = self.root()?;
		let loader = self.loader;
		let vocab = &loader.vocab;
		if !self.is_settings(&root, &vocab.settings) {
			return Err(SettingsError::UnexpectedRoot {
				found: root.clark(),
				expected: format!("{{{SETTINGS_NAMESPACE}}}{}", schema::SETTINGS),
			});
		}

		let mut registry = Registry::empty();
		if !root.empty {
			while let Some(child) = self.next_child(schema::SETTINGS)? {
				if self.is_settings(&child, &vocab.xml_converters) {
					self.converters(&child, &mut registry)?;
				} else {
					self.skip(&child)?;
				}
			}
		}
		self.epilog()?;
		Ok(registry)
	}

	/// Reads past the root element to the end of input, which may hold only
	/// comments, processing instructions and whitespace.
	fn epilog(&mut self) -> Result<(), SettingsError> {
		loop {
			self.buf.clear();
			match self.reader.read_event_into(&mut self.buf)? {
				Event::Start(start) | Event::Empty(start) => {
					return Err(SettingsError::ContentAfterRoot(String::from_utf8_lossy(start.name().as_ref()).into_owned()));
				}
				Event::Eof => return Ok(()),
				_ => {}
			}
		}
	}

	fn is_settings(&self, element: &OpenElement, local: &Name) -> bool {
		Name::ptr_eq(&element.namespace, &self.loader.vocab.namespace) && Name::ptr_eq(&element.local, local)
	}

	fn converters(&mut self, block: &OpenElement, registry: &mut Registry) -> Result<(), SettingsError> {
		if block.empty {
			return Ok(());
		}
		while let Some(child) = self.next_child(schema::XML_CONVERTERS)? {
			if self.is_settings(&child, &self.loader.vocab.xml_converter) {
				self.converter(&child, registry)?;
			} else {
				self.skip(&child)?;
			}
		}
		Ok(())
	}

	fn converter(&mut self, element: &OpenElement, registry: &mut Registry) -> Result<(), SettingsError> {
		let loader = self.loader;
		let vocab = &loader.vocab;
		let element_name = schema::XML_CONVERTER;

		// Qualified names resolve against the scope of this start tag, so they
		// must be read before the next event moves the reader on.
		let source = self.qualified_name(element.required(&vocab.source_element, element_name, schema::SOURCE_ELEMENT)?)?;
		let target = self.qualified_name(element.required(&vocab.target_element, element_name, schema::TARGET_ELEMENT)?)?;
		let transform_file = loader
			.converters_dir
			.join(element.required(&vocab.transform_file, element_name, schema::TRANSFORM_FILE)?);
		let description = element.attribute(&vocab.description).unwrap_or_default().to_string();

		let mut arguments = Arguments::new();
		let mut parameters: Vec<DynamicParameter> = Vec::new();
		if !element.empty {
			while let Some(child) = self.next_child(element_name)? {
				if self.is_settings(&child, &vocab.transform_parameter) {
					if let Some(parameter) = self.parameter(&child, &mut arguments)? {
						if parameters.iter().any(|p| p.name() == parameter.name()) {
							return Err(SettingsError::DuplicateParameter(parameter.name().to_string()));
						}
						parameters.push(parameter);
					}
				} else if self.is_settings(&child, &vocab.extension_class) {
					self.extension(&child, &mut arguments)?;
				} else {
					self.skip(&child)?;
				}
			}
		}

		tracing::debug!(
			source = %source,
			to = %target,
			file = %transform_file.display(),
			dynamic = parameters.len(),
			"registered converter"
		);
		registry.register(source, CandidateTransform::new(target, description, transform_file, arguments, parameters));
		Ok(())
	}

	/// Reads one `transformParameter`, adding its base argument and returning
	/// the dynamic parameter it declares, if any.
	fn parameter(&mut self, element: &OpenElement, arguments: &mut Arguments) -> Result<Option<DynamicParameter>, SettingsError> {
		let loader = self.loader;
		let vocab = &loader.vocab;
		let element_name = schema::TRANSFORM_PARAMETER;
		let name = element.required(&vocab.name, element_name, schema::NAME)?.to_string();
		let value = element.required(&vocab.value, element_name, schema::VALUE)?;
		arguments.set_param(name.clone(), value);

		let Some(type_literal) = element.attribute(&vocab.dynamic_type) else {
			self.skip(element)?;
			return Ok(None);
		};
		let ty = ParameterType::from_literal(type_literal).ok_or_else(|| SettingsError::UnknownDynamicType(type_literal.to_string()))?;
		let exclusive = match element.attribute(&vocab.dynamic_values_exclusive) {
			Some(literal) => parse_boolean(literal).map_err(|_| SettingsError::InvalidBoolean {
				attribute: schema::DYNAMIC_VALUES_EXCLUSIVE,
				value: literal.to_string(),
			})?,
			None => true,
		};
		let description = element.attribute(&vocab.description).unwrap_or_default();

		let wrap = |source| SettingsError::Parameter { name: name.clone(), source };
		let mut parameter = DynamicParameter::new(ty, ParameterMeta::new(name.clone(), description, exclusive), value).map_err(wrap)?;

		if !element.empty {
			while let Some(child) = self.next_child(element_name)? {
				if self.is_settings(&child, &vocab.dynamic_value) {
					match child.attribute(&vocab.value) {
						Some(literal) => parameter.add_suggestion(literal).map_err(wrap)?,
						None => tracing::trace!(parameter = %name, "dynamicValue without value ignored"),
					}
				}
				self.skip(&child)?;
			}
		}
		Ok(Some(parameter))
	}

	fn extension(&mut self, element: &OpenElement, arguments: &mut Arguments) -> Result<(), SettingsError> {
		let loader = self.loader;
		let vocab = &loader.vocab;
		let element_name = schema::EXTENSION_CLASS;
		let namespace = element.required(&vocab.xsl_namespace, element_name, schema::XSL_NAMESPACE)?;
		let class_name = element.required(&vocab.class_name, element_name, schema::CLASS_NAME)?;

		let extension = loader
			.catalog
			.instantiate(class_name)
			.ok_or_else(|| SettingsError::UnknownExtensionClass(class_name.to_string()))?;
		if arguments.bind_extension(namespace, extension).is_some() {
			return Err(SettingsError::DuplicateExtension(namespace.to_string()));
		}
		self.skip(element)
	}

	/// Resolves `prefix:local` against the namespace scope of the element just
	/// read. An unprefixed name is in the empty namespace.
	fn qualified_name(&self, text: &str) -> Result<ElementName, SettingsError> {
		let text = text.trim();
		let names = self.loader.names;
		let Some((prefix, local)) = text.split_once(':') else {
			return Ok(ElementName::new(names, "", text)?);
		};
		let (resolved, _) = self.reader.resolve_element(QName(text.as_bytes()));
		let namespace = match resolved {
			ResolveResult::Bound(Namespace(uri)) => utf8(uri)?,
			ResolveResult::Unbound => "",
			ResolveResult::Unknown(_) => return Err(SettingsError::UnboundPrefix(prefix.to_string())),
		};
		Ok(ElementName::new(names, namespace, local)?)
	}

	/// Reads up to and including the document element's start tag.
	fn root(&mut self) -> Result<OpenElement, SettingsError> {
		let names = self.loader.names;
		loop {
			self.buf.clear();
			let (resolved, event) = self.reader.read_resolved_event_into(&mut self.buf)?;
			match event {
				Event::Start(start) => return open_element(names, resolved, &start, false),
				Event::Empty(start) => return open_element(names, resolved, &start, true),
				Event::Eof => return Err(SettingsError::MissingRoot),
				_ => {}
			}
		}
	}

	/// Reads the next child element of `parent`, or `None` at its end tag.
	fn next_child(&mut self, parent: &'static str) -> Result<Option<OpenElement>, SettingsError> {
		let names = self.loader.names;
		loop {
			self.buf.clear();
			let (resolved, event) = self.reader.read_resolved_event_into(&mut self.buf)?;
			match event {
				Event::Start(start) => return open_element(names, resolved, &start, false).map(Some),
				Event::Empty(start) => return open_element(names, resolved, &start, true).map(Some),
				Event::End(_) => return Ok(None),
				Event::Eof => return Err(SettingsError::UnexpectedEof(parent.to_string())),
				_ => {}
			}
		}
	}

	/// Consumes the rest of `element`, including its end tag.
	fn skip(&mut self, element: &OpenElement) -> Result<(), SettingsError> {
		if element.empty {
			return Ok(());
		}
		let known = [
			&self.loader.vocab.transform_parameter,
			&self.loader.vocab.dynamic_value,
			&self.loader.vocab.extension_class,
		];
		if !known.iter().any(|k| self.is_settings(element, k)) {
			tracing::trace!(element = %element.clark(), "skipping unknown settings element");
		}

		let mut depth = 1usize;
		loop {
			self.buf.clear();
			match self.reader.read_event_into(&mut self.buf)? {
				Event::Start(_) => depth += 1,
				Event::End(_) => {
					depth -= 1;
					if depth == 0 {
						return Ok(());
					}
				}
				Event::Eof => return Err(SettingsError::UnexpectedEof(element.clark())),
				_ => {}
			}
		}
	}
}

fn open_element(names: &NameTable, resolved: ResolveResult<'_>, start: &BytesStart<'_>, empty: bool) -> Result<OpenElement, SettingsError> {
	let namespace = match resolved {
		ResolveResult::Bound(Namespace(uri)) => names.intern(utf8(uri)?),
		ResolveResult::Unbound => names.intern(""),
		ResolveResult::Unknown(prefix) => return Err(SettingsError::UnboundPrefix(String::from_utf8_lossy(&prefix).into_owned())),
	};
	let local = names.intern(utf8(start.local_name().as_ref())?);

	let mut attributes = Vec::new();
	for attribute in start.attributes() {
		let attribute = attribute?;
		if attribute.key.as_namespace_binding().is_some() || attribute.key.prefix().is_some() {
			continue;
		}
		let key = names.intern(utf8(attribute.key.local_name().as_ref())?);
		let value = attribute.unescape_value()?.into_owned();
		attributes.push((key, value));
	}

	Ok(OpenElement {
		namespace,
		local,
		attributes,
		empty,
	})
}

fn utf8(bytes: &[u8]) -> Result<&str, SettingsError> {
	std::str::from_utf8(bytes).map_err(|_| SettingsError::NonUtf8)
}

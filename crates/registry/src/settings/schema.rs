//! Element and attribute names of the converter settings document.

use ladder_intern::{Name, NameTable};

/// Namespace of every element in the settings document.
pub const SETTINGS_NAMESPACE: &str = "urn:ladder:settings";

pub(crate) const SETTINGS: &str = "settings";
pub(crate) const XML_CONVERTERS: &str = "xmlConverters";
pub(crate) const XML_CONVERTER: &str = "xmlConverter";
pub(crate) const TRANSFORM_PARAMETER: &str = "transformParameter";
pub(crate) const DYNAMIC_VALUE: &str = "dynamicValue";
pub(crate) const EXTENSION_CLASS: &str = "extensionClass";

pub(crate) const SOURCE_ELEMENT: &str = "sourceElement";
pub(crate) const TARGET_ELEMENT: &str = "targetElement";
pub(crate) const TRANSFORM_FILE: &str = "transformFile";
pub(crate) const DESCRIPTION: &str = "description";
pub(crate) const NAME: &str = "name";
pub(crate) const VALUE: &str = "value";
pub(crate) const DYNAMIC_TYPE: &str = "dynamicType";
pub(crate) const DYNAMIC_VALUES_EXCLUSIVE: &str = "dynamicValuesExclusive";
pub(crate) const XSL_NAMESPACE: &str = "xslNamespace";
pub(crate) const CLASS_NAME: &str = "className";

/// The settings vocabulary interned once per loader.
///
/// Names read from the document are interned in the same table, so every
/// comparison against these fields is an identity test.
pub(crate) struct SettingsVocabulary {
	pub namespace: Name,

	pub settings: Name,
	pub xml_converters: Name,
	pub xml_converter: Name,
	pub transform_parameter: Name,
	pub dynamic_value: Name,
	pub extension_class: Name,

	pub source_element: Name,
	pub target_element: Name,
	pub transform_file: Name,
	pub description: Name,
	pub name: Name,
	pub value: Name,
	pub dynamic_type: Name,
	pub dynamic_values_exclusive: Name,
	pub xsl_namespace: Name,
	pub class_name: Name,
}

impl SettingsVocabulary {
	pub fn new(names: &NameTable) -> Self {
		Self {
			namespace: names.intern(SETTINGS_NAMESPACE),
			settings: names.intern(SETTINGS),
			xml_converters: names.intern(XML_CONVERTERS),
			xml_converter: names.intern(XML_CONVERTER),
			transform_parameter: names.intern(TRANSFORM_PARAMETER),
			dynamic_value: names.intern(DYNAMIC_VALUE),
			extension_class: names.intern(EXTENSION_CLASS),
			source_element: names.intern(SOURCE_ELEMENT),
			target_element: names.intern(TARGET_ELEMENT),
			transform_file: names.intern(TRANSFORM_FILE),
			description: names.intern(DESCRIPTION),
			name: names.intern(NAME),
			value: names.intern(VALUE),
			dynamic_type: names.intern(DYNAMIC_TYPE),
			dynamic_values_exclusive: names.intern(DYNAMIC_VALUES_EXCLUSIVE),
			xsl_namespace: names.intern(XSL_NAMESPACE),
			class_name: names.intern(CLASS_NAME),
		}
	}
}

//! Extension objects bound into a transform's argument space.
//!
//! Settings name extensions by class name. A class is any `Default` type
//! implementing [`Extension`], registered in an [`ExtensionCatalog`] either
//! explicitly or through an [`ExtensionClass`] submitted with `inventory`.

use std::any::Any;
use std::sync::Arc;

use rustc_hash::FxHashMap as HashMap;

/// An object a transform engine can call back into.
///
/// Engines recover the concrete type with [`Extension::as_any`].
pub trait Extension: Any + Send + Sync {
	fn as_any(&self) -> &dyn Any;
}

/// Constructor for one extension instance.
pub type ExtensionCtor = fn() -> Arc<dyn Extension>;

/// Link-time registration of an extension class.
///
/// ```ignore
/// inventory::submit! {
///     ExtensionClass::new("DateHelpers", || Arc::new(DateHelpers::default()))
/// }
/// ```
pub struct ExtensionClass {
	pub class_name: &'static str,
	pub construct: ExtensionCtor,
}

impl ExtensionClass {
	pub const fn new(class_name: &'static str, construct: ExtensionCtor) -> Self {
		Self { class_name, construct }
	}
}

inventory::collect!(ExtensionClass);

fn construct_default<T: Extension + Default>() -> Arc<dyn Extension> {
	Arc::new(T::default())
}

/// Class-name lookup for extension constructors.
#[derive(Clone, Default)]
pub struct ExtensionCatalog {
	classes: HashMap<String, ExtensionCtor>,
}

impl ExtensionCatalog {
	/// Creates an empty catalog.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a catalog holding every [`ExtensionClass`] submitted in the binary.
	pub fn with_submitted() -> Self {
		let mut catalog = Self::new();
		for class in inventory::iter::<ExtensionClass> {
			catalog.register_with(class.class_name, class.construct);
		}
		catalog
	}

	/// Registers the default-constructible type `T` under `class_name`.
	pub fn register<T: Extension + Default>(&mut self, class_name: impl Into<String>) {
		self.register_with(class_name, construct_default::<T>);
	}

	/// Registers an explicit constructor, replacing any previous one.
	pub fn register_with(&mut self, class_name: impl Into<String>, construct: ExtensionCtor) {
		let class_name = class_name.into();
		if self.classes.insert(class_name.clone(), construct).is_some() {
			tracing::debug!(class = %class_name, "extension class re-registered");
		}
	}

	/// Creates a fresh instance of `class_name`.
	pub fn instantiate(&self, class_name: &str) -> Option<Arc<dyn Extension>> {
		self.classes.get(class_name.trim()).map(|construct| construct())
	}

	pub fn contains(&self, class_name: &str) -> bool {
		self.classes.contains_key(class_name)
	}

	/// Registered class names, sorted.
	pub fn class_names(&self) -> Vec<&str> {
		let mut names: Vec<_> = self.classes.keys().map(String::as_str).collect();
		names.sort_unstable();
		names
	}

	pub fn len(&self) -> usize {
		self.classes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.classes.is_empty()
	}
}

impl core::fmt::Debug for ExtensionCatalog {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("ExtensionCatalog").field("classes", &self.class_names()).finish()
	}
}

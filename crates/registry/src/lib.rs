//! Converter registry.
//!
//! A [`Registry`] maps an obsolete root element to the [`CandidateTransform`]s
//! able to upgrade it. Registries are built from a settings document by
//! [`SettingsLoader`]; each candidate carries its base [`Arguments`], typed
//! [`DynamicParameter`]s a user may adjust, and bound [`Extension`] objects.
//!
//! Transform engines plug in through [`TransformLoader`] and [`Transform`];
//! nothing here runs a transform itself.

mod arguments;
mod candidate;
mod error;
mod extension;
mod parameter;
mod registry;
mod settings;
mod transform;
mod value;

pub use arguments::Arguments;
pub use candidate::CandidateTransform;
pub use error::SettingsError;
pub use extension::{Extension, ExtensionCatalog, ExtensionClass, ExtensionCtor};
pub use parameter::{DynamicParameter, NativeValue, ParameterMeta, Typed};
pub use registry::Registry;
pub use settings::{SETTINGS_NAMESPACE, SettingsLoader};
pub use transform::{Transform, TransformError, TransformLoader};
pub use value::{ParameterError, ParameterType, ParameterValue, parse_boolean, parse_number};

// Re-exported for `inventory::submit!` in downstream crates.
#[doc(hidden)]
pub use inventory;

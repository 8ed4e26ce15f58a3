//! Document conversion driver.
//!
//! [`Converter::convert`] runs a document through registered converters until
//! its root element is the configured canonical root or nothing more applies:
//!
//! 1. inspect the root element without moving the input,
//! 2. look the root up in the [`Registry`](ladder_registry::Registry),
//! 3. let a [`Disambiguator`] choose when there is a real choice,
//! 4. apply the chosen transform into a fresh buffer, and repeat on it.
//!
//! Only the last buffer is returned; a chain that revisits a root element
//! fails with [`ConvertError::CycleDetected`].

mod config;
mod converter;
mod disambiguate;
mod error;
mod guard;
mod inspect;

pub use config::{ConfigError, ConverterConfig};
pub use converter::Converter;
pub use disambiguate::{Choice, Disambiguator, FirstCandidate};
pub use error::ConvertError;
pub use inspect::inspect_root;

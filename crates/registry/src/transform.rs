//! Transform capability.
//!
//! The registry never depends on a particular rewrite engine. A host supplies a
//! [`TransformLoader`] that turns a transform file into a [`Transform`], and the
//! conversion driver calls [`Transform::apply`] with borrowed streams.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::arguments::Arguments;

/// Errors raised while loading or running a transform.
#[derive(Error, Debug)]
pub enum TransformError {
	#[error("failed to load transform {path}: {reason}")]
	Load { path: PathBuf, reason: String },

	#[error("transform failed: {0}")]
	Apply(String),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

impl TransformError {
	pub fn load(path: impl Into<PathBuf>, reason: impl core::fmt::Display) -> Self {
		Self::Load {
			path: path.into(),
			reason: reason.to_string(),
		}
	}
}

/// A compiled document transform.
///
/// Implementations read the whole document from `input` and write the
/// converted document to `output`. Both streams belong to the caller.
pub trait Transform: Send + Sync {
	fn apply(&self, input: &mut dyn BufRead, arguments: &Arguments, output: &mut dyn Write) -> Result<(), TransformError>;
}

/// Compiles transform files into [`Transform`]s.
pub trait TransformLoader: Send + Sync {
	fn load(&self, path: &Path) -> Result<Arc<dyn Transform>, TransformError>;
}

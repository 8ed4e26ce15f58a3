//! Transform engine backed by the system `xsltproc`.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;

use ladder_registry::{Arguments, ParameterValue, Transform, TransformError, TransformLoader};

/// Loads stylesheets for `xsltproc`.
///
/// `xsltproc` compiles on every run, so loading only checks that the
/// stylesheet exists.
#[derive(Debug, Clone)]
pub struct XsltProcLoader {
	program: PathBuf,
}

impl XsltProcLoader {
	/// Finds `xsltproc` on `PATH`.
	pub fn locate() -> Result<Self, which::Error> {
		which::which("xsltproc").map(Self::with_program)
	}

	pub fn with_program(program: impl Into<PathBuf>) -> Self {
		Self { program: program.into() }
	}
}

impl TransformLoader for XsltProcLoader {
	fn load(&self, path: &Path) -> Result<Arc<dyn Transform>, TransformError> {
		if !path.is_file() {
			return Err(TransformError::load(path, "stylesheet not found"));
		}
		Ok(Arc::new(XsltProc {
			program: self.program.clone(),
			stylesheet: path.to_path_buf(),
		}))
	}
}

struct XsltProc {
	program: PathBuf,
	stylesheet: PathBuf,
}

impl Transform for XsltProc {
	fn apply(&self, input: &mut dyn BufRead, arguments: &Arguments, output: &mut dyn Write) -> Result<(), TransformError> {
		for (namespace, _) in arguments.extensions() {
			tracing::warn!(namespace, stylesheet = %self.stylesheet.display(), "xsltproc cannot call extension objects, binding ignored");
		}

		let mut document = Vec::new();
		input.read_to_end(&mut document)?;

		let mut command = Command::new(&self.program);
		command.args(command_line(arguments));
		command.arg(&self.stylesheet).arg("-");
		command.stdin(Stdio::piped()).stdout(Stdio::piped()).stderr(Stdio::piped());
		tracing::debug!(?command, "running xsltproc");

		let mut child = command.spawn()?;
		let mut stdin = child.stdin.take().ok_or_else(|| TransformError::Apply("xsltproc stdin unavailable".into()))?;
		let result = std::thread::scope(|scope| {
			let writer = scope.spawn(move || stdin.write_all(&document));
			let collected = child.wait_with_output();
			let written = writer.join().unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked")));
			collected.map(|out| (out, written))
		});
		let (collected, written) = result?;

		if !collected.status.success() {
			let stderr = String::from_utf8_lossy(&collected.stderr);
			return Err(TransformError::Apply(format!("xsltproc exited with {}: {}", collected.status, stderr.trim())));
		}
		// A stylesheet may finish without reading all input; only report the
		// broken pipe if xsltproc itself failed.
		if let Err(error) = written {
			tracing::debug!(%error, "xsltproc closed stdin early");
		}
		output.write_all(&collected.stdout)?;
		Ok(())
	}
}

/// Builds the parameter flags for `arguments`.
///
/// Strings go through `--stringparam` so no quoting is needed. Numbers and
/// booleans become XPath expressions under `--param`.
fn command_line(arguments: &Arguments) -> Vec<String> {
	let mut args = Vec::new();
	for (name, value) in arguments.params() {
		match value {
			ParameterValue::String(text) => args.extend(["--stringparam".to_string(), name.to_string(), text.clone()]),
			ParameterValue::Number(number) => args.extend(["--param".to_string(), name.to_string(), xpath_number(*number)]),
			ParameterValue::Boolean(flag) => {
				let expr = if *flag { "true()" } else { "false()" };
				args.extend(["--param".to_string(), name.to_string(), expr.to_string()]);
			}
		}
	}
	args
}

fn xpath_number(number: f64) -> String {
	if number.is_nan() {
		"0 div 0".to_string()
	} else if number == f64::INFINITY {
		"1 div 0".to_string()
	} else if number == f64::NEG_INFINITY {
		"-1 div 0".to_string()
	} else {
		number.to_string()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parameters_map_to_xsltproc_flags() {
		let mut arguments = Arguments::new();
		arguments.set_param("title", "A \"quoted\" title");
		arguments.set_param("indent", 4.0);
		arguments.set_param("legacy", false);
		arguments.set_param("limit", f64::INFINITY);

		assert_eq!(
			command_line(&arguments),
			[
				"--stringparam",
				"title",
				"A \"quoted\" title",
				"--param",
				"indent",
				"4",
				"--param",
				"legacy",
				"false()",
				"--param",
				"limit",
				"1 div 0",
			]
		);
	}

	#[test]
	fn missing_stylesheet_fails_to_load() {
		let dir = tempfile::tempdir().unwrap();
		let loader = XsltProcLoader::with_program("xsltproc");
		let err = loader.load(&dir.path().join("absent.xslt")).err().unwrap();
		assert!(matches!(err, TransformError::Load { .. }));
	}

	#[test]
	fn existing_stylesheet_loads_without_running() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("noop.xslt");
		std::fs::write(&path, "<xsl:stylesheet/>").unwrap();
		let loader = XsltProcLoader::with_program("/nonexistent/xsltproc");
		assert!(loader.load(&path).is_ok());
	}
}

//! `ladder` binary.
//!
//! Lists registered converters, inspects documents, and upgrades them to the
//! current format with `xsltproc` as the transform engine.

mod cli;
mod prompt;
mod xsltproc;

use std::fs::File;
use std::io::{BufReader, Write};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use cli::{Cli, Command};
use ladder_convert::{ConvertError, Converter, ConverterConfig, Disambiguator, FirstCandidate};
use ladder_registry::{DynamicParameter, Registry};
use prompt::PromptDisambiguator;
use tracing::info;
use xsltproc::XsltProcLoader;

/// Exit status when the user cancels a conversion.
const EXIT_CANCELLED: u8 = 2;

fn main() -> ExitCode {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	match run(cli) {
		Ok(code) => code,
		Err(error) => {
			if error.downcast_ref::<ConvertError>().is_some_and(ConvertError::is_cancelled) {
				eprintln!("ladder: conversion cancelled");
				return ExitCode::from(EXIT_CANCELLED);
			}
			eprintln!("ladder: {error:#}");
			ExitCode::FAILURE
		}
	}
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("ladder=debug,ladder_convert=debug,ladder_registry=debug,info")
		} else {
			EnvFilter::new("ladder=info,ladder_convert=info,warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.init();
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
	let config = resolve_config(&cli)?;
	info!(settings = %config.settings_path.display(), canonical = %config.canonical_root, "using converter settings");

	// Only conversion runs transforms; listing and inspecting work without xsltproc.
	let loader = match XsltProcLoader::locate() {
		Ok(loader) => loader,
		Err(error) if matches!(cli.command, Command::Convert { .. }) => {
			return Err(error).context("xsltproc not found on PATH");
		}
		Err(_) => XsltProcLoader::with_program("xsltproc"),
	};
	let converter = Converter::new(config, Arc::new(loader))?;

	match cli.command {
		Command::List => list(converter.registry()?),
		Command::Inspect { file } => {
			let mut input = BufReader::new(File::open(&file).with_context(|| format!("opening {}", file.display()))?);
			let root = converter.inspect(&mut input)?;
			println!("root: {root}");
			if &root == converter.canonical_root() {
				println!("already in the current format");
			} else {
				match converter.registry()?.candidates(&root) {
					Some(candidates) => {
						for (i, candidate) in candidates.iter().enumerate() {
							println!("  {}) {} -> {}", i + 1, candidate.label(), candidate.target());
						}
					}
					None => println!("no converter registered for this root"),
				}
			}
		}
		Command::Convert { file, output, yes } => {
			let mut input = BufReader::new(File::open(&file).with_context(|| format!("opening {}", file.display()))?);
			let mut first = FirstCandidate;
			let mut prompt = PromptDisambiguator::new(std::io::stdin().lock(), std::io::stderr());
			let disambiguator: &mut dyn Disambiguator = if yes { &mut first } else { &mut prompt };

			let Some(result) = converter.convert(&mut input, Some(disambiguator))? else {
				eprintln!("{} is already current", file.display());
				return Ok(ExitCode::SUCCESS);
			};
			let bytes = result.into_inner();
			match output {
				Some(path) => std::fs::write(&path, &bytes).with_context(|| format!("writing {}", path.display()))?,
				None => std::io::stdout().lock().write_all(&bytes)?,
			}
			report_modified(converter.registry()?);
		}
	}
	Ok(ExitCode::SUCCESS)
}

/// Builds the configuration from `--config` and the individual overrides.
fn resolve_config(cli: &Cli) -> anyhow::Result<ConverterConfig> {
	let mut config = match &cli.config {
		Some(path) => Some(ConverterConfig::load(path).with_context(|| format!("loading {}", path.display()))?),
		None => None,
	};

	if let Some(settings) = &cli.settings {
		match config.as_mut() {
			Some(config) => config.settings_path = settings.clone(),
			None => {
				let Some(canonical) = &cli.canonical else {
					bail!("--canonical is required when no --config is given");
				};
				let dir = settings.parent().map(ToOwned::to_owned).unwrap_or_default();
				config = Some(ConverterConfig::new(settings, dir, canonical.clone()));
			}
		}
	}
	let Some(mut config) = config else {
		bail!("either --config or --settings must be given");
	};
	if let Some(dir) = &cli.converters_dir {
		config.converters_dir = dir.clone();
	}
	if let Some(canonical) = &cli.canonical {
		config.canonical_root = canonical.clone();
	}
	Ok(config)
}

fn list(registry: &Registry) {
	if registry.is_empty() {
		println!("no converters registered");
		return;
	}
	for (source, candidates) in registry.iter() {
		println!("{source}");
		for candidate in candidates {
			println!("  -> {} ({})", candidate.target(), candidate.transform_file().display());
			if !candidate.description().is_empty() {
				println!("     {}", candidate.description());
			}
			for parameter in candidate.parameters() {
				println!("     {}", describe(parameter));
			}
		}
	}
}

fn describe(parameter: &DynamicParameter) -> String {
	let mut line = format!(
		"{}: {} = {}",
		parameter.name(),
		parameter.parameter_type(),
		parameter.default_value()
	);
	if parameter.has_suggestions() {
		let options: Vec<String> = parameter.suggestions().iter().map(ToString::to_string).collect();
		let kind = if parameter.is_exclusive() { "one of" } else { "suggested" };
		line.push_str(&format!(" [{kind}: {}]", options.join(", ")));
	}
	line
}

/// Logs parameter values the user changed, so they can be saved as defaults.
fn report_modified(registry: &Registry) {
	for (source, candidates) in registry.iter() {
		for candidate in candidates {
			for (name, value) in candidate.modified_parameters() {
				info!(source = %source, to = %candidate.target(), parameter = %name, value = %value, "parameter changed from default");
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use std::path::PathBuf;

	use ladder_registry::{ParameterMeta, ParameterType};

	use super::*;

	fn parse(args: &[&str]) -> Cli {
		Cli::try_parse_from(std::iter::once("ladder").chain(args.iter().copied())).unwrap()
	}

	#[test]
	fn settings_flag_builds_config_next_to_settings() {
		let cli = parse(&["--settings", "/etc/ladder/settings.xml", "--canonical", "{urn:v3}Model", "list"]);
		let config = resolve_config(&cli).unwrap();
		assert_eq!(config.settings_path, PathBuf::from("/etc/ladder/settings.xml"));
		assert_eq!(config.converters_dir, PathBuf::from("/etc/ladder"));
		assert_eq!(config.canonical_root, "{urn:v3}Model");
	}

	#[test]
	fn flags_override_config_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("ladder.toml");
		std::fs::write(
			&path,
			"settings-path = \"settings.xml\"\nconverters-dir = \"conv\"\ncanonical-root = \"{urn:v2}Model\"\n",
		)
		.unwrap();
		let config_arg = path.to_string_lossy().into_owned();

		let cli = parse(&["--config", &config_arg, "--canonical", "{urn:v3}Model", "--converters-dir", "/x", "list"]);
		let config = resolve_config(&cli).unwrap();
		assert_eq!(config.settings_path, dir.path().join("settings.xml"));
		assert_eq!(config.converters_dir, PathBuf::from("/x"));
		assert_eq!(config.canonical_root, "{urn:v3}Model");
	}

	#[test]
	fn config_source_is_required() {
		assert!(resolve_config(&parse(&["list"])).is_err());
		assert!(resolve_config(&parse(&["--settings", "s.xml", "list"])).is_err());
	}

	#[test]
	fn describe_shows_type_default_and_options() {
		let parameter = DynamicParameter::new(ParameterType::Boolean, ParameterMeta::new("legacy", "", false), "0")
			.unwrap()
			.with_suggestions(["true", "false"])
			.unwrap();
		assert_eq!(describe(&parameter), "legacy: boolean = false [suggested: true, false]");
	}
}

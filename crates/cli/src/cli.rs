use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ladder")]
#[command(about = "Upgrade documents saved under older schemas")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// TOML file with settings-path, converters-dir and canonical-root
	#[arg(long, short = 'c', value_name = "PATH", global = true)]
	pub config: Option<PathBuf>,

	/// Converter settings document (overrides the config file)
	#[arg(long, value_name = "PATH", global = true)]
	pub settings: Option<PathBuf>,

	/// Directory transform files are resolved against (defaults to the settings directory)
	#[arg(long, value_name = "DIR", global = true)]
	pub converters_dir: Option<PathBuf>,

	/// Root element of the current format, as {namespace}local
	#[arg(long, value_name = "NAME", global = true)]
	pub canonical: Option<String>,

	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// List every registered converter
	List,
	/// Show a document's root element and the converters that apply to it
	Inspect {
		/// Document to inspect
		file: PathBuf,
	},
	/// Convert a document to the current format
	Convert {
		/// Document to convert
		file: PathBuf,

		/// Write the result here instead of stdout
		#[arg(long, short = 'o', value_name = "PATH")]
		output: Option<PathBuf>,

		/// Take the first converter without prompting
		#[arg(long, short = 'y')]
		yes: bool,
	},
}

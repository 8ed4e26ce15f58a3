//! Terminal disambiguation.

use std::io::{BufRead, Write};

use ladder_convert::{Choice, Disambiguator};
use ladder_intern::ElementName;
use ladder_registry::{CandidateTransform, DynamicParameter, ParameterType};

/// Asks on a terminal which converter to run and how to set its parameters.
///
/// Entering `q`, or closing the input, cancels the conversion. A blank answer
/// keeps a parameter's value; a double-quoted answer is taken literally, so
/// `""` and `"q"` set those strings.
pub struct PromptDisambiguator<R, W> {
	input: R,
	output: W,
}

impl<R: BufRead, W: Write> PromptDisambiguator<R, W> {
	pub fn new(input: R, output: W) -> Self {
		Self { input, output }
	}

	/// `Ok(None)` means the user cancelled.
	fn run(&mut self, source: &ElementName, candidates: &[CandidateTransform]) -> std::io::Result<Option<usize>> {
		writeln!(self.output, "{source} can be converted by:")?;
		for (i, candidate) in candidates.iter().enumerate() {
			writeln!(self.output, "  {}) {} -> {}", i + 1, candidate.label(), candidate.target())?;
		}

		let index = if candidates.len() == 1 {
			0
		} else {
			match self.pick(candidates.len())? {
				Some(index) => index,
				None => return Ok(None),
			}
		};

		for parameter in candidates[index].parameters() {
			if !self.edit(parameter)? {
				return Ok(None);
			}
		}
		Ok(Some(index))
	}

	fn pick(&mut self, count: usize) -> std::io::Result<Option<usize>> {
		loop {
			write!(self.output, "convert with [1-{count}, q to cancel]: ")?;
			self.output.flush()?;
			let Some(line) = self.read_line()? else {
				return Ok(None);
			};
			match line.as_str() {
				"q" => return Ok(None),
				text => match text.parse::<usize>() {
					Ok(n) if (1..=count).contains(&n) => return Ok(Some(n - 1)),
					_ => writeln!(self.output, "  enter a number from 1 to {count}")?,
				},
			}
		}
	}

	/// Prompts for one parameter. Returns false if the user cancelled.
	fn edit(&mut self, parameter: &DynamicParameter) -> std::io::Result<bool> {
		if !parameter.description().is_empty() {
			writeln!(self.output, "  {}", parameter.description())?;
		}
		if parameter.has_suggestions() {
			let options: Vec<String> = parameter.suggestions().iter().map(ToString::to_string).collect();
			let lead = if parameter.is_exclusive() { "one of" } else { "e.g." };
			writeln!(self.output, "  {lead}: {}", options.join(", "))?;
		}
		if parameter.parameter_type() == ParameterType::String {
			writeln!(self.output, "  quote the value to enter \"\" or \"q\"")?;
		}
		loop {
			write!(
				self.output,
				"{} ({}) [{}]: ",
				parameter.name(),
				parameter.parameter_type(),
				parameter.value()
			)?;
			self.output.flush()?;
			let Some(line) = self.read_line()? else {
				return Ok(false);
			};
			match line.as_str() {
				"" => return Ok(true),
				"q" => return Ok(false),
				answer => match parameter.set_literal(unquote(answer)) {
					Ok(()) => return Ok(true),
					Err(error) => writeln!(self.output, "  {error}")?,
				},
			}
		}
	}

	/// Next trimmed line, or `None` at end of input.
	fn read_line(&mut self) -> std::io::Result<Option<String>> {
		let mut line = String::new();
		if self.input.read_line(&mut line)? == 0 {
			return Ok(None);
		}
		Ok(Some(line.trim().to_string()))
	}
}

/// Strips one pair of surrounding double quotes.
fn unquote(answer: &str) -> &str {
	answer
		.strip_prefix('"')
		.and_then(|rest| rest.strip_suffix('"'))
		.unwrap_or(answer)
}

impl<R: BufRead, W: Write> Disambiguator for PromptDisambiguator<R, W> {
	fn choose(&mut self, source: &ElementName, candidates: &[CandidateTransform]) -> Choice {
		match self.run(source, candidates) {
			Ok(Some(index)) => Choice::Selected(index),
			Ok(None) => Choice::Cancel,
			Err(error) => {
				tracing::warn!(%error, "prompt failed, cancelling");
				Choice::Cancel
			}
		}
	}
}

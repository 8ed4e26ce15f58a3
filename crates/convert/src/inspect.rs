use std::io::BufRead;

use ladder_intern::{ElementName, NameTable};
use quick_xml::NsReader;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};

use crate::error::ConvertError;

/// Reads `reader` up to the document element's start tag and returns its name.
///
/// Nothing past the start tag is parsed, so a document that is malformed
/// further on still inspects cleanly.
pub fn inspect_root<R: BufRead>(names: &NameTable, reader: R) -> Result<ElementName, ConvertError> {
	let mut reader = NsReader::from_reader(reader);
	let mut buf = Vec::new();
	loop {
		buf.clear();
		let (resolved, event) = reader.read_resolved_event_into(&mut buf)?;
		let start = match event {
			Event::Start(start) | Event::Empty(start) => start,
			Event::Eof => return Err(ConvertError::MissingRoot),
			_ => continue,
		};
		let namespace = match resolved {
			ResolveResult::Bound(Namespace(uri)) => utf8(uri)?,
			ResolveResult::Unbound => "",
			ResolveResult::Unknown(prefix) => return Err(ConvertError::UnboundPrefix(String::from_utf8_lossy(&prefix).into_owned())),
		};
		let local = start.local_name();
		return Ok(ElementName::new(names, namespace, utf8(local.as_ref())?)?);
	}
}

fn utf8(bytes: &[u8]) -> Result<&str, ConvertError> {
	std::str::from_utf8(bytes).map_err(|_| ConvertError::NonUtf8(String::from_utf8_lossy(bytes).into_owned()))
}

use std::io::{Seek, SeekFrom};
use std::ops::{Deref, DerefMut};

/// Restores a stream's position when dropped.
///
/// Every exit from the guarded scope, including `?` and panics, seeks the
/// stream back to where it was when the guard was created.
pub(crate) struct PositionGuard<'a, S: Seek> {
	stream: &'a mut S,
	position: u64,
}

impl<'a, S: Seek> PositionGuard<'a, S> {
	pub fn new(stream: &'a mut S) -> std::io::Result<Self> {
		let position = stream.stream_position()?;
		Ok(Self { stream, position })
	}
}

impl<S: Seek> Deref for PositionGuard<'_, S> {
	type Target = S;

	fn deref(&self) -> &S {
		self.stream
	}
}

impl<S: Seek> DerefMut for PositionGuard<'_, S> {
	fn deref_mut(&mut self) -> &mut S {
		self.stream
	}
}

impl<S: Seek> Drop for PositionGuard<'_, S> {
	fn drop(&mut self) {
		if let Err(error) = self.stream.seek(SeekFrom::Start(self.position)) {
			tracing::warn!(position = self.position, %error, "failed to restore stream position");
		}
	}
}

#[cfg(test)]
mod tests {
	use std::io::{Cursor, Read};

	use super::*;

	#[test]
	fn restores_position_on_drop() {
		let mut stream = Cursor::new(b"0123456789".to_vec());
		stream.set_position(3);
		{
			let mut guard = PositionGuard::new(&mut stream).unwrap();
			let mut rest = String::new();
			guard.read_to_string(&mut rest).unwrap();
			assert_eq!(rest, "3456789");
		}
		assert_eq!(stream.position(), 3);
	}

	#[test]
	fn restores_position_on_early_return() {
		fn fail(stream: &mut Cursor<Vec<u8>>) -> std::io::Result<()> {
			let mut guard = PositionGuard::new(stream)?;
			guard.seek(SeekFrom::End(0))?;
			Err(std::io::Error::other("boom"))
		}

		let mut stream = Cursor::new(b"abc".to_vec());
		assert!(fail(&mut stream).is_err());
		assert_eq!(stream.position(), 0);
	}
}

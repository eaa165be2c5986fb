//! Various traits for reading and writing to file-like objects

use crate::error::{Result, SpliceError};
use crate::macros::try_vec;

use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};

// TODO: https://github.com/rust-lang/rust/issues/59359
pub(crate) trait SeekStreamLen: Seek {
	fn stream_len_hack(&mut self) -> Result<u64> {
		let current_pos = self.stream_position()?;
		let len = self.seek(SeekFrom::End(0))?;

		self.seek(SeekFrom::Start(current_pos))?;

		Ok(len)
	}
}

impl<T> SeekStreamLen for T where T: Seek {}

/// Provides a method to truncate an object to the specified length
///
/// This is one component of the [`FileLike`] trait, which is used as the destination of
/// [`splice_file`](crate::surgery::splice_file) and [`TaggedFile::write`](crate::file::TaggedFile::write).
///
/// Take great care in implementing this for downstream types, as tagsplice will assume that the
/// container has the new length specified. If this assumption were to be broken, files **will** become corrupted.
pub trait Truncate {
	/// The error type of the truncation operation
	type Error: Into<SpliceError>;

	/// Truncate a storage object to the specified length
	///
	/// # Errors
	///
	/// Errors depend on the object being truncated, which may not always be fallible.
	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error>;
}

impl Truncate for File {
	type Error = std::io::Error;

	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error> {
		self.set_len(new_len)
	}
}

impl Truncate for Vec<u8> {
	type Error = std::convert::Infallible;

	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error> {
		self.truncate(new_len as usize);
		Ok(())
	}
}

impl<T> Truncate for Cursor<T>
where
	T: Truncate,
{
	type Error = <T as Truncate>::Error;

	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error> {
		self.get_mut().truncate(new_len)
	}
}

impl<T> Truncate for &mut T
where
	T: Truncate,
{
	type Error = <T as Truncate>::Error;

	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error> {
		(**self).truncate(new_len)
	}
}

/// Provides a method to get the length of a storage object
///
/// This is one component of the [`FileLike`] trait.
///
/// Take great care in implementing this for downstream types, as tagsplice will assume that the
/// container has the exact length specified. If this assumption were to be broken, files **may** become corrupted.
pub trait Length {
	/// The error type of the length operation
	type Error: Into<SpliceError>;

	/// Get the length of a storage object
	///
	/// # Errors
	///
	/// Errors depend on the object being read, which may not always be fallible.
	fn len(&self) -> std::result::Result<u64, Self::Error>;
}

impl Length for File {
	type Error = std::io::Error;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		self.metadata().map(|m| m.len())
	}
}

impl Length for Vec<u8> {
	type Error = std::convert::Infallible;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		Ok(self.len() as u64)
	}
}

impl<T> Length for Cursor<T>
where
	T: Length,
{
	type Error = <T as Length>::Error;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		Length::len(self.get_ref())
	}
}

impl<T> Length for &mut T
where
	T: Length,
{
	type Error = <T as Length>::Error;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		Length::len(*self)
	}
}

/// Provides a set of methods to read and write to a file-like object
///
/// This is a combination of the [`Read`], [`Write`], [`Seek`], [`Truncate`], and [`Length`] traits.
/// Anything implementing it can be rewritten in place by the surgery engine.
pub trait FileLike: Read + Write + Seek + Truncate + Length
where
	<Self as Truncate>::Error: Into<SpliceError>,
	<Self as Length>::Error: Into<SpliceError>,
{
}

impl<T> FileLike for T
where
	T: Read + Write + Seek + Truncate + Length,
	<T as Truncate>::Error: Into<SpliceError>,
	<T as Length>::Error: Into<SpliceError>,
{
}

/// Copy exactly `len` bytes from the current position of `reader` into `writer`
pub(crate) fn copy_exact<R, W>(reader: &mut R, writer: &mut W, len: u64) -> Result<()>
where
	R: Read,
	W: Write + ?Sized,
{
	if len == 0 {
		return Ok(());
	}

	let copied = std::io::copy(&mut reader.take(len), writer)?;
	if copied != len {
		return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
	}

	Ok(())
}

/// Read `len` bytes starting at `offset`
///
/// Fails with `TruncatedFile` if the region extends past the end of the stream.
pub(crate) fn read_region<R>(reader: &mut R, offset: u64, len: u64) -> Result<Vec<u8>>
where
	R: Read + Seek,
{
	let stream_len = reader.stream_len_hack()?;
	let end = offset.saturating_add(len);
	if end > stream_len {
		return Err(SpliceError::truncated(end, stream_len));
	}

	reader.seek(SeekFrom::Start(offset))?;

	let mut content = try_vec![0; len as usize];
	reader.read_exact(&mut content)?;

	Ok(content)
}

/// Replace the entire contents of `file` with `content`
pub(crate) fn overwrite<F>(file: &mut F, content: &[u8]) -> Result<()>
where
	F: FileLike,
	SpliceError: From<<F as Truncate>::Error>,
	SpliceError: From<<F as Length>::Error>,
{
	file.rewind()?;
	file.truncate(0)?;
	file.write_all(content)?;
	file.flush()?;

	log::trace!(
		"Replaced destination contents, new length: {}",
		file.len()?
	);

	file.rewind()?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::{Length, SeekStreamLen, Truncate, copy_exact, overwrite, read_region};
	use crate::error::ErrorKind;

	use std::io::{Cursor, Read, Seek, SeekFrom};

	#[test_log::test]
	fn stream_len_keeps_position() {
		let mut cursor = Cursor::new(vec![0u8; 64]);
		cursor.seek(SeekFrom::Start(10)).unwrap();

		assert_eq!(cursor.stream_len_hack().unwrap(), 64);
		assert_eq!(cursor.stream_position().unwrap(), 10);
	}

	#[test_log::test]
	fn copy_exact_fails_on_short_read() {
		let mut reader = &[1u8, 2, 3][..];
		let mut out = Vec::new();

		assert!(copy_exact(&mut reader, &mut out, 5).is_err());
	}

	#[test_log::test]
	fn region_past_end() {
		let mut cursor = Cursor::new((0u8..16).collect::<Vec<_>>());

		assert_eq!(read_region(&mut cursor, 4, 3).unwrap(), [4, 5, 6]);

		let err = read_region(&mut cursor, 10, 10).unwrap_err();
		assert!(matches!(
			err.kind(),
			ErrorKind::TruncatedFile {
				offset: 20,
				stream_len: 16
			}
		));
	}

	#[test_log::test]
	fn overwrite_shrinks_cursor() {
		let mut cursor = Cursor::new(vec![0xAAu8; 32]);
		overwrite(&mut cursor, &[1, 2, 3]).unwrap();

		assert_eq!(Length::len(&cursor).unwrap(), 3);

		let mut content = Vec::new();
		cursor.read_to_end(&mut content).unwrap();
		assert_eq!(content, [1, 2, 3]);

		Truncate::truncate(&mut cursor, 1).unwrap();
		assert_eq!(cursor.get_ref(), &[1]);
	}
}

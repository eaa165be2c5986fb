use crate::error::Result;
use crate::macros::{err, try_vec};

use std::io::{Read, Seek, SeekFrom};
use std::marker::PhantomData;

use byteorder::{ByteOrder, ReadBytesExt};

pub(crate) const CHUNK_HEADER_SIZE: u64 = 8;

/// A walker over consecutive chunks
///
/// Chunks are expected to start on even boundaries, and are padded with a 0 if necessary.
/// This pad byte is NOT included in the chunk's size.
pub(crate) struct Chunks<B>
where
	B: ByteOrder,
{
	pub fourcc: [u8; 4],
	pub size: u32,
	/// The offset of the current chunk's header
	pub offset: u64,
	remaining_size: u64,
	_phantom: PhantomData<B>,
}

impl<B: ByteOrder> Chunks<B> {
	/// Walk `len` bytes of chunks
	#[must_use]
	pub const fn new(len: u64) -> Self {
		Self {
			fourcc: [0; 4],
			size: 0,
			offset: 0,
			remaining_size: len,
			_phantom: PhantomData,
		}
	}

	pub fn next<R>(&mut self, data: &mut R) -> Result<bool>
	where
		R: Read + Seek,
	{
		if self.remaining_size < CHUNK_HEADER_SIZE {
			return Ok(false);
		}

		self.offset = data.stream_position()?;
		data.read_exact(&mut self.fourcc)?;
		self.size = data.read_u32::<B>()?;

		self.remaining_size = self.remaining_size.saturating_sub(CHUNK_HEADER_SIZE);

		log::trace!(
			"Chunk \"{}\" @ {}, size: {}",
			self.fourcc.escape_ascii(),
			self.offset,
			self.size
		);

		Ok(true)
	}

	/// The size of the chunk's content, including the pad byte
	pub fn padded_size(&self) -> u64 {
		u64::from(self.size) + u64::from(self.size % 2)
	}

	/// The size of the entire chunk, header and pad byte included
	pub fn full_size(&self) -> u64 {
		CHUNK_HEADER_SIZE + self.padded_size()
	}

	/// The offset of the chunk's content
	pub fn content_offset(&self) -> u64 {
		self.offset + CHUNK_HEADER_SIZE
	}

	/// Whether the chunk extends past the end of the walked region
	pub fn is_truncated(&self) -> bool {
		u64::from(self.size) > self.remaining_size
	}

	pub fn content<R>(&mut self, data: &mut R) -> Result<Vec<u8>>
	where
		R: Read + Seek,
	{
		let size = u64::from(self.size);
		if size > self.remaining_size {
			err!(SizeMismatch);
		}

		let mut content = try_vec![0; size as usize];
		data.read_exact(&mut content)?;

		self.remaining_size = self.remaining_size.saturating_sub(size);
		self.correct_position(data)?;

		Ok(content)
	}

	pub fn skip<R>(&mut self, data: &mut R) -> Result<()>
	where
		R: Read + Seek,
	{
		data.seek(SeekFrom::Start(self.content_offset() + u64::from(self.size)))?;
		self.remaining_size = self.remaining_size.saturating_sub(u64::from(self.size));

		self.correct_position(data)
	}

	fn correct_position<R>(&mut self, data: &mut R) -> Result<()>
	where
		R: Read + Seek,
	{
		if self.size % 2 != 0 {
			data.seek(SeekFrom::Current(1))?;
			self.remaining_size = self.remaining_size.saturating_sub(1);
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::Chunks;

	use std::io::{Cursor, Seek};

	use byteorder::LittleEndian;

	#[test_log::test]
	fn odd_chunks_are_padded() {
		let mut data = Vec::new();
		data.extend_from_slice(b"abcd\x03\0\0\0xyz\0");
		data.extend_from_slice(b"efgh\x02\0\0\0qq");

		let mut reader = Cursor::new(data);
		let mut chunks = Chunks::<LittleEndian>::new(22);

		assert!(chunks.next(&mut reader).unwrap());
		assert_eq!(&chunks.fourcc, b"abcd");
		assert_eq!(chunks.full_size(), 12);
		assert_eq!(chunks.content(&mut reader).unwrap(), b"xyz");
		assert_eq!(reader.stream_position().unwrap(), 12);

		assert!(chunks.next(&mut reader).unwrap());
		assert_eq!(&chunks.fourcc, b"efgh");
		assert_eq!(chunks.offset, 12);
		chunks.skip(&mut reader).unwrap();

		assert!(!chunks.next(&mut reader).unwrap());
	}

	#[test_log::test]
	fn oversized_content() {
		let mut reader = Cursor::new(b"abcd\xFF\0\0\0xyz".to_vec());
		let mut chunks = Chunks::<LittleEndian>::new(11);

		assert!(chunks.next(&mut reader).unwrap());
		assert!(chunks.is_truncated());
		assert!(chunks.content(&mut reader).is_err());
	}
}

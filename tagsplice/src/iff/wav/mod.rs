//! WAV specific items
//!
//! A WAV file can carry two tags, both stored as chunks of the `RIFF` chunk:
//!
//! * A `LIST` chunk of type `INFO` ([`TagType::Native`](crate::tag::TagType::Native))
//! * An `ID3 ` (or `id3 `) chunk wrapping an ID3v2 tag
//!
//! Missing tags are appended to the end of the `RIFF` chunk, INFO first.

pub(crate) mod info;
mod properties;
pub(crate) mod read;

pub(crate) use properties::FmtChunk;

use crate::config::WriteOptions;
use crate::error::Result;
use crate::iff::chunk::CHUNK_HEADER_SIZE;
use crate::macros::err;
use crate::surgery::EmbeddingAdapter;

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

/// The framing of an ID3v2 tag in a RIFF file
///
/// An existing chunk keeps its ID, new chunks use the casing from
/// [`WriteOptions::uppercase_id3v2_chunk`].
pub(crate) struct Id3Chunk {
	fourcc: [u8; 4],
	offset: Option<u64>,
}

impl Id3Chunk {
	pub(crate) fn new(existing: Option<([u8; 4], u64)>, options: WriteOptions) -> Self {
		match existing {
			Some((fourcc, offset)) => Self {
				fourcc,
				offset: Some(offset),
			},
			None => Self {
				fourcc: if options.uppercase_id3v2_chunk {
					*b"ID3 "
				} else {
					*b"id3 "
				},
				offset: None,
			},
		}
	}
}

impl EmbeddingAdapter for Id3Chunk {
	fn embedded_tag_offset(&self) -> Option<u64> {
		self.offset
	}

	fn embedding_header_size(&self) -> u32 {
		CHUNK_HEADER_SIZE as u32
	}

	fn write_embedding_header(&self, writer: &mut dyn Write, tag_size: u64) -> Result<()> {
		let Ok(size) = u32::try_from(tag_size) else {
			err!(TooMuchData);
		};

		writer.write_all(&self.fourcc)?;
		writer.write_u32::<LittleEndian>(size)?;
		Ok(())
	}

	fn embedding_padding(&self, tag_size: u64) -> u32 {
		(tag_size % 2) as u32
	}
}

#[cfg(test)]
mod tests {
	use super::Id3Chunk;
	use crate::config::WriteOptions;
	use crate::surgery::embed;

	#[test_log::test]
	fn new_chunk_casing() {
		let upper = Id3Chunk::new(None, WriteOptions::new().uppercase_id3v2_chunk(true));
		assert_eq!(&embed(&upper, &[1; 30]).unwrap()[..4], b"ID3 ");

		let lower = Id3Chunk::new(None, WriteOptions::new().uppercase_id3v2_chunk(false));
		assert_eq!(&embed(&lower, &[1; 30]).unwrap()[..4], b"id3 ");
	}

	#[test_log::test]
	fn existing_chunk_keeps_its_id() {
		let chunk = Id3Chunk::new(Some((*b"id3 ", 36)), WriteOptions::new());
		let payload = embed(&chunk, &[1; 31]).unwrap();

		assert_eq!(&payload[..4], b"id3 ");
		assert_eq!(&payload[4..8], &31u32.to_le_bytes());
		// Padded to an even size
		assert_eq!(payload.len(), 8 + 31 + 1);
	}
}

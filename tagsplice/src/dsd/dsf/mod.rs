mod properties;
pub(crate) mod read;

use crate::error::Result;
use crate::surgery::EmbeddingAdapter;

use std::io::Write;

pub(crate) const DSD_MAGIC: &[u8; 4] = b"DSD ";
pub(crate) const FMT_MAGIC: &[u8; 4] = b"fmt ";
pub(crate) const DATA_MAGIC: &[u8; 4] = b"data";

/// The size of the `DSD ` chunk, always 28 bytes
pub(crate) const HEADER_SIZE: u64 = 28;
pub(crate) const FMT_CHUNK_SIZE: u64 = 52;

/// Offset of the total file size in the `DSD ` chunk
pub(crate) const FILE_SIZE_OFFSET: u64 = 12;
/// Offset of the metadata pointer in the `DSD ` chunk
pub(crate) const METADATA_POINTER_OFFSET: u64 = 20;

/// The ID3v2 tag at the end of a DSF file
///
/// The tag isn't framed at all, the metadata pointer is all that ties it to the file.
pub(crate) struct TrailingId3 {
	pub(crate) offset: Option<u64>,
}

impl EmbeddingAdapter for TrailingId3 {
	fn embedded_tag_offset(&self) -> Option<u64> {
		self.offset
	}

	fn embedding_header_size(&self) -> u32 {
		0
	}

	fn write_embedding_header(&self, _writer: &mut dyn Write, _tag_size: u64) -> Result<()> {
		Ok(())
	}
}

use crate::error::Result;
use crate::macros::err;
use crate::util::alloc::VecFallibleCapacity;

use std::io::Write;

/// A container that wraps a foreign tag in its own framing
///
/// RIFF stores ID3v2 inside an `id3 ` chunk, so the bytes written to the zone are the chunk
/// header followed by the tag (and a pad byte for odd sizes). DSF appends the tag as-is, with
/// a header size of `0`.
pub trait EmbeddingAdapter {
	/// The offset of the embedded tag's framing in the original file, if a tag exists
	fn embedded_tag_offset(&self) -> Option<u64>;

	/// The exact number of bytes [`EmbeddingAdapter::write_embedding_header`] writes
	fn embedding_header_size(&self) -> u32;

	/// Write the framing header for a tag of `tag_size` bytes
	///
	/// # Errors
	///
	/// * `tag_size` can't be represented in the container's header
	/// * `std::io::Error`
	fn write_embedding_header(&self, writer: &mut dyn Write, tag_size: u64) -> Result<()>;

	/// The number of zero bytes appended after a tag of `tag_size` bytes
	fn embedding_padding(&self, _tag_size: u64) -> u32 {
		0
	}
}

/// Build the zone content for `tag`: framing header, tag, then padding
///
/// An empty `tag` produces an empty payload, removing the embedded tag entirely.
///
/// # Errors
///
/// * The adapter wrote a header that doesn't match [`EmbeddingAdapter::embedding_header_size`]
/// * See [`EmbeddingAdapter::write_embedding_header`]
pub fn embed<A>(adapter: &A, tag: &[u8]) -> Result<Vec<u8>>
where
	A: EmbeddingAdapter + ?Sized,
{
	if tag.is_empty() {
		return Ok(Vec::new());
	}

	let tag_size = tag.len() as u64;
	let header_size = adapter.embedding_header_size() as usize;
	let padding = adapter.embedding_padding(tag_size) as usize;

	let mut payload = Vec::try_with_capacity_stable(header_size + tag.len() + padding)?;
	adapter.write_embedding_header(&mut payload, tag_size)?;

	if payload.len() != header_size {
		log::error!(
			"Embedding header is {} bytes, expected {}",
			payload.len(),
			header_size
		);
		err!(SizeMismatch);
	}

	payload.extend_from_slice(tag);
	payload.resize(payload.len() + padding, 0);

	Ok(payload)
}

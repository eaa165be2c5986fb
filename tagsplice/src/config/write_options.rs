/// Options for encoding tags and framing them in their container
///
/// These only affect the bytes of the tag zone being written. Everything outside of it is copied
/// as-is, apart from the size and offset fields the container registered.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct WriteOptions {
	pub(crate) preferred_padding: Option<u32>,
	pub(crate) uppercase_id3v2_chunk: bool,
}

impl WriteOptions {
	/// Default preferred padding size in bytes
	pub const DEFAULT_PREFERRED_PADDING: u32 = 1024;

	/// Default options, see the [`Default`] implementation
	pub const fn new() -> Self {
		Self {
			preferred_padding: Some(Self::DEFAULT_PREFERRED_PADDING),
			uppercase_id3v2_chunk: true,
		}
	}

	/// The number of padding bytes to reserve after an ID3v2 tag
	///
	/// Padding lets later edits of a DSF or WAV ID3v2 tag stay the same size. A value of `0`
	/// disables it. APE, ID3v1, and RIFF INFO have no notion of padding.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsplice::config::WriteOptions;
	///
	/// // Keep tags as small as possible
	/// let options = WriteOptions::new().preferred_padding(0);
	/// ```
	pub fn preferred_padding(mut self, preferred_padding: u32) -> Self {
		match preferred_padding {
			0 => self.preferred_padding = None,
			_ => self.preferred_padding = Some(preferred_padding),
		}
		self
	}

	/// Whether to name a newly created WAV ID3v2 chunk `ID3 ` (`true`) or `id3 ` (`false`)
	///
	/// An existing chunk keeps its name.
	pub fn uppercase_id3v2_chunk(mut self, uppercase_id3v2_chunk: bool) -> Self {
		self.uppercase_id3v2_chunk = uppercase_id3v2_chunk;
		self
	}
}

impl Default for WriteOptions {
	/// 1 KiB of ID3v2 padding, and `ID3 ` as the name of new WAV chunks
	fn default() -> Self {
		Self::new()
	}
}

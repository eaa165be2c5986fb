use super::data::TagData;
use super::field::FieldKey;
use super::items::{Chapter, Lyrics};
use super::tag_type::TagType;
use super::view::{TagSystem, TagSystemView};
use crate::config::{ReadOptions, WriteOptions};
use crate::error::Result;
use crate::picture::Picture;

use std::borrow::Cow;
use std::collections::BTreeMap;

/// The binary encodings a tag can be stored in
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum TagFormat {
	/// ID3v1(.1), 128 bytes at the end of the file
	Id3v1,
	/// ID3v2.2 to ID3v2.4, always written as ID3v2.4
	Id3v2,
	/// APEv1/APEv2, always written as APEv2
	Ape,
	/// RIFF `LIST INFO`, the native format of WAV
	RiffInfo,
}

impl TagFormat {
	/// The tag type this format is stored as
	pub fn tag_type(self) -> TagType {
		match self {
			Self::Id3v1 => TagType::Id3v1,
			Self::Id3v2 => TagType::Id3v2,
			Self::Ape => TagType::Ape,
			Self::RiffInfo => TagType::Native,
		}
	}

	/// Decode a tag, returning its values and the amount of padding it had
	pub(crate) fn decode(self, content: &[u8], options: ReadOptions) -> Result<(TagData, u64)> {
		let (mut data, padding) = match self {
			Self::Id3v1 => (crate::id3::v1::decode(content, options)?, 0),
			Self::Id3v2 => crate::id3::v2::decode(content, options)?,
			Self::Ape => (crate::ape::tag::decode(content, options)?, 0),
			Self::RiffInfo => (crate::iff::wav::info::decode(content, options)?, 0),
		};

		if !options.read_pictures {
			data.pictures = None;
		}

		data.prune();
		Ok((data, padding))
	}

	/// Encode `data`, an empty `data` encodes to nothing
	pub(crate) fn encode(self, data: &TagData, options: WriteOptions) -> Result<Vec<u8>> {
		if data.is_empty() {
			log::debug!("Nothing to write for {self:?}, encoding as removal");
			return Ok(Vec::new());
		}

		match self {
			Self::Id3v1 => crate::id3::v1::encode(data),
			Self::Id3v2 => crate::id3::v2::encode(data, options),
			Self::Ape => crate::ape::tag::encode(data),
			Self::RiffInfo => crate::iff::wav::info::encode(data),
		}
	}
}

/// A concrete tag of one [`TagType`]
///
/// This is what the container parsers produce for every tag they find.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataTag {
	pub(crate) format: TagFormat,
	pub(crate) data: TagData,
	pub(crate) exists: bool,
	pub(crate) size: u64,
	pub(crate) padding_size: u64,
}

impl MetadataTag {
	/// Create a tag that isn't (yet) part of a file
	pub fn new(format: TagFormat, data: TagData) -> Self {
		Self {
			format,
			data,
			exists: false,
			size: 0,
			padding_size: 0,
		}
	}

	/// Decode a tag that occupies `content` in a file
	///
	/// # Errors
	///
	/// See [`TagSystem::read`]
	pub fn read_from(format: TagFormat, content: &[u8], options: ReadOptions) -> Result<Self> {
		let mut tag = Self::new(format, TagData::new());
		tag.read(content, options)?;
		Ok(tag)
	}

	/// The encoding of this tag
	pub fn format(&self) -> TagFormat {
		self.format
	}

	/// Consume the tag, returning its values
	pub fn into_data(self) -> TagData {
		self.data
	}
}

impl TagSystemView for MetadataTag {
	fn tag_type(&self) -> TagType {
		self.format.tag_type()
	}

	fn exists(&self) -> bool {
		self.exists
	}

	fn field(&self, key: FieldKey) -> Option<Cow<'_, str>> {
		self.data
			.fields
			.get(&key)
			.filter(|value| !key.is_empty_value(value))
			.map(|value| Cow::Borrowed(value.as_str()))
	}

	fn additional_fields(&self) -> &BTreeMap<String, String> {
		&self.data.additional_fields
	}

	fn pictures(&self) -> &[Picture] {
		self.data.pictures()
	}

	fn chapters(&self) -> &[Chapter] {
		self.data.chapters()
	}

	fn chapters_table_description(&self) -> Option<&str> {
		self.data.chapters_table_description()
	}

	fn lyrics(&self) -> Option<&Lyrics> {
		self.data.lyrics()
	}

	fn size(&self) -> u64 {
		self.size
	}

	fn padding_size(&self) -> u64 {
		self.padding_size
	}
}

impl TagSystem for MetadataTag {
	fn read(&mut self, content: &[u8], options: ReadOptions) -> Result<()> {
		let (data, padding) = self.format.decode(content, options)?;

		self.data = data;
		self.exists = true;
		self.size = content.len() as u64;
		self.padding_size = padding;

		Ok(())
	}

	fn write(&self, options: WriteOptions) -> Result<Vec<u8>> {
		self.format.encode(&self.data, options)
	}

	fn remove(&mut self) {
		self.clear();
		self.exists = false;
		self.size = 0;
		self.padding_size = 0;
	}

	fn clear(&mut self) {
		self.data = TagData::new();
	}

	fn data(&self) -> &TagData {
		&self.data
	}
}

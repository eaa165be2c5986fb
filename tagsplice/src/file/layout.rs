use super::FileType;
use crate::config::{ParsingMode, ReadOptions, WriteOptions};
use crate::error::Result;
use crate::macros::surgery_err;
use crate::properties::FileProperties;
use crate::surgery::{EmbeddingAdapter, FileSurgeryPlan};
use crate::tag::{MetadataTag, TagFormat, TagSystemView, TagType};
use crate::util::io::read_region;

use std::fmt::{Debug, Formatter};
use std::io::{Read, Seek};

/// Builds the framing for an embedded tag, once the [`WriteOptions`] are known
pub(crate) type AdapterFactory = Box<dyn Fn(WriteOptions) -> Box<dyn EmbeddingAdapter>>;

/// The location of the audio stream within a file
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AudioRegion {
	/// Offset of the first byte of audio data
	pub offset: u64,
	/// Length of the audio data
	pub size: u64,
}

/// A tag type the container can write, and how it's stored
pub(crate) struct TagSlot {
	pub(crate) format: TagFormat,
	pub(crate) adapter: Option<AdapterFactory>,
}

impl TagSlot {
	/// Turn an encoded tag into the content of the slot's zone
	pub(crate) fn zone_content(&self, tag: Vec<u8>, options: WriteOptions) -> Result<Vec<u8>> {
		match &self.adapter {
			Some(factory) => crate::surgery::embed(factory(options).as_ref(), &tag),
			None => Ok(tag),
		}
	}
}

impl Debug for TagSlot {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TagSlot")
			.field("format", &self.format)
			.field("embedded", &self.adapter.is_some())
			.finish()
	}
}

/// Everything a container parser learned about a file
///
/// This holds the [`FileSurgeryPlan`] for the file, so a layout is only valid until the file
/// is modified.
#[derive(Debug)]
pub struct ContainerLayout {
	pub(crate) file_type: FileType,
	pub(crate) plan: FileSurgeryPlan,
	pub(crate) audio: AudioRegion,
	pub(crate) properties: FileProperties,
	pub(crate) tags: Vec<MetadataTag>,
	pub(crate) slots: Vec<TagSlot>,
}

impl ContainerLayout {
	pub(crate) fn new(file_type: FileType) -> Self {
		Self {
			file_type,
			plan: FileSurgeryPlan::new(),
			audio: AudioRegion::default(),
			properties: FileProperties::default(),
			tags: Vec::new(),
			slots: Vec::new(),
		}
	}

	/// The format of the file
	pub fn file_type(&self) -> FileType {
		self.file_type
	}

	/// The zones and patches registered while parsing
	pub fn plan(&self) -> &FileSurgeryPlan {
		&self.plan
	}

	/// The location of the audio stream
	pub fn audio_region(&self) -> AudioRegion {
		self.audio
	}

	/// The audio properties, empty if they weren't read
	pub fn properties(&self) -> &FileProperties {
		&self.properties
	}

	/// Every tag found in the file
	pub fn tags(&self) -> &[MetadataTag] {
		&self.tags
	}

	/// The tag of a specific type, if it exists
	pub fn tag(&self, tag_type: TagType) -> Option<&MetadataTag> {
		self.tags.iter().find(|tag| tag.tag_type() == tag_type)
	}

	/// Consume the layout, keeping only the plan
	pub fn into_plan(self) -> FileSurgeryPlan {
		self.plan
	}

	/// Make sure no zone of the plan would rewrite, or split, the audio
	pub(crate) fn verify_audio_untouched(&self) -> Result<()> {
		let audio_start = self.audio.offset;
		let audio_end = audio_start + self.audio.size;

		for zone in self.plan.zones().iter() {
			let overlaps = if zone.is_insertion_point() {
				audio_start < zone.offset() && zone.offset() < audio_end
			} else {
				zone.offset() < audio_end && zone.end() > audio_start
			};

			if overlaps {
				surgery_err!(@ZONE zone.name(), "zone overlaps the audio data");
			}
		}

		Ok(())
	}

	pub(crate) fn add_slot(&mut self, format: TagFormat, adapter: Option<AdapterFactory>) {
		self.slots.push(TagSlot { format, adapter });
	}

	pub(crate) fn slot(&self, tag_type: TagType) -> Option<&TagSlot> {
		self.slots
			.iter()
			.find(|slot| slot.format.tag_type() == tag_type)
	}

	/// Read and decode the tag at `offset..offset + size`
	///
	/// Does nothing if tags aren't being read. A tag that fails to decode is skipped,
	/// unless the parsing mode is [`ParsingMode::Strict`].
	pub(crate) fn read_tag<R>(
		&mut self,
		reader: &mut R,
		format: TagFormat,
		offset: u64,
		size: u64,
		options: ReadOptions,
	) -> Result<()>
	where
		R: Read + Seek,
	{
		if !options.read_tags {
			return Ok(());
		}

		let content = read_region(reader, offset, size)?;
		self.add_tag(format, &content, options)
	}

	pub(crate) fn add_tag(
		&mut self,
		format: TagFormat,
		content: &[u8],
		options: ReadOptions,
	) -> Result<()> {
		if !options.read_tags {
			return Ok(());
		}

		match MetadataTag::read_from(format, content, options) {
			Ok(tag) => {
				log::debug!("Found a {format:?} tag ({} bytes)", content.len());

				if self.tag(tag.tag_type()).is_some() {
					log::warn!("Duplicate {format:?} tag found, keeping the first");
					return Ok(());
				}

				self.tags.push(tag);
			},
			Err(e) => {
				if options.parsing_mode == ParsingMode::Strict {
					return Err(e);
				}

				log::warn!("Unable to decode {format:?} tag, skipping: {e}");
			},
		}

		Ok(())
	}
}

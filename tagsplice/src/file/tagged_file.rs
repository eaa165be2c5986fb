use super::layout::{AudioRegion, ContainerLayout};
use super::FileType;
use crate::config::{ReadOptions, TagTypeRegistry, WriteOptions};
use crate::error::{Result, SpliceError};
use crate::macros::err;
use crate::properties::FileProperties;
use crate::resolve::ResolvedView;
use crate::surgery::{ZoneContents, splice_file};
use crate::tag::{MetadataTag, TagData, TagSystemView, TagType};
use crate::util::io::{FileLike, Length, Truncate};

use std::io::{Read, Seek};

/// A file, its audio properties, and every tag it carries
///
/// A `TaggedFile` is a snapshot. Writing through it re-parses the file first, so the zones that
/// get rewritten always match what's on disk, and reloads the snapshot afterwards.
///
/// # Examples
///
/// ```rust,no_run
/// use tagsplice::config::{ReadOptions, TagTypeRegistry, WriteOptions};
/// use tagsplice::file::TaggedFile;
/// use tagsplice::tag::{TagData, TagSystemView, TagType};
/// use std::fs::OpenOptions;
///
/// # fn main() -> tagsplice::error::Result<()> {
/// let mut file = OpenOptions::new().read(true).write(true).open("song.wv")?;
/// let mut tagged_file = TaggedFile::read_from(&mut file, ReadOptions::new())?;
///
/// // APE and ID3v1, merged by priority
/// let view = tagged_file.read(TagType::Any, TagTypeRegistry::global());
/// println!("Title: {:?}", view.title());
///
/// let mut changes = TagData::new();
/// changes.set_title("New title");
/// tagged_file.write(
/// 	&mut file,
/// 	&changes,
/// 	TagType::Ape,
/// 	TagTypeRegistry::global(),
/// 	WriteOptions::new(),
/// )?;
/// # Ok(()) }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedFile {
	pub(crate) file_type: FileType,
	pub(crate) properties: FileProperties,
	pub(crate) audio: AudioRegion,
	pub(crate) tags: Vec<MetadataTag>,
	pub(crate) options: ReadOptions,
}

impl TaggedFile {
	/// Read a file, guessing its format from the content
	///
	/// # Errors
	///
	/// * The format can't be determined
	/// * The container is malformed
	/// * `std::io::Error`
	pub fn read_from<R>(reader: &mut R, options: ReadOptions) -> Result<Self>
	where
		R: Read + Seek,
	{
		let layout = crate::probe::parse_layout(reader, options)?;
		Ok(Self::from_layout(layout, options))
	}

	pub(crate) fn from_layout(layout: ContainerLayout, options: ReadOptions) -> Self {
		Self {
			file_type: layout.file_type,
			properties: layout.properties,
			audio: layout.audio,
			tags: layout.tags,
			options,
		}
	}

	/// The format of the file
	pub fn file_type(&self) -> FileType {
		self.file_type
	}

	/// The audio properties, empty if they weren't read
	pub fn properties(&self) -> &FileProperties {
		&self.properties
	}

	/// The location of the audio stream
	pub fn audio_region(&self) -> AudioRegion {
		self.audio
	}

	/// Every tag read from the file
	pub fn tags(&self) -> &[MetadataTag] {
		&self.tags
	}

	/// The tag of a specific type, if the file has one
	pub fn tag(&self, tag_type: TagType) -> Option<&MetadataTag> {
		self.tags.iter().find(|tag| tag.tag_type() == tag_type)
	}

	/// Whether the file has a tag of `tag_type`
	///
	/// [`TagType::Any`] checks for any tag at all.
	pub fn contains_tag_type(&self, tag_type: TagType) -> bool {
		self.tags
			.iter()
			.any(|tag| tag.exists() && (tag_type.is_wildcard() || tag.tag_type() == tag_type))
	}

	/// Query the file's tags
	///
	/// A concrete `tag_type` yields only that tag (or an empty view if it's absent).
	/// [`TagType::Any`] lets `registry` choose, merging tag systems if cross-reading is enabled.
	pub fn read(&self, tag_type: TagType, registry: &TagTypeRegistry) -> ResolvedView<'_> {
		let views = self
			.tags
			.iter()
			.map(|tag| -> &dyn TagSystemView { tag })
			.collect::<Vec<_>>();

		registry.resolve(&views, tag_type)
	}

	/// Write `data` to the file as a tag of `tag_type`
	///
	/// The values are merged into the existing tag, anything `data` doesn't mention is kept.
	/// If the merged tag ends up empty, it is removed from the file.
	///
	/// [`TagType::Any`] picks the tag type the format supports that ranks highest in `registry`.
	///
	/// # Errors
	///
	/// * The format doesn't support `tag_type` ([`ErrorKind::UnsupportedTagType`](crate::error::ErrorKind::UnsupportedTagType))
	/// * The file changed and can no longer be parsed
	/// * A value can't be encoded
	/// * `std::io::Error`
	pub fn write<F>(
		&mut self,
		file: &mut F,
		data: &TagData,
		tag_type: TagType,
		registry: &TagTypeRegistry,
		options: WriteOptions,
	) -> Result<()>
	where
		F: FileLike,
		SpliceError: From<<F as Truncate>::Error>,
		SpliceError: From<<F as Length>::Error>,
	{
		let tag_type = self.writable_tag_type(tag_type, registry)?;
		log::debug!("Writing {tag_type:?} to {:?} file", self.file_type);

		file.rewind()?;
		let layout = crate::probe::parse_layout(file, self.rewrite_options(true))?;
		layout.verify_audio_untouched()?;

		let zone_name = tag_type.zone_name();
		let (Some(slot), Some(_)) = (layout.slot(tag_type), layout.plan().zone(zone_name)) else {
			err!(UnsupportedTagType(tag_type));
		};

		let mut merged = layout
			.tag(tag_type)
			.map(|tag| tag.data.clone())
			.unwrap_or_default();
		data.merge_into(&mut merged);

		let encoded = slot.format.encode(&merged, options)?;
		let content = slot.zone_content(encoded, options)?;

		let mut contents = ZoneContents::new();
		contents.insert(zone_name.to_owned(), content);

		splice_file(file, layout.plan(), &contents)?;
		self.reload(file)
	}

	/// Remove the tag of `tag_type` from the file
	///
	/// [`TagType::Any`] removes every tag type the format supports. Removing a tag that doesn't
	/// exist does nothing.
	///
	/// # Errors
	///
	/// * The format doesn't support `tag_type`
	/// * The file changed and can no longer be parsed
	/// * `std::io::Error`
	pub fn remove<F>(&mut self, file: &mut F, tag_type: TagType) -> Result<()>
	where
		F: FileLike,
		SpliceError: From<<F as Truncate>::Error>,
		SpliceError: From<<F as Length>::Error>,
	{
		let targets = if tag_type.is_wildcard() {
			self.file_type.supported_tag_types()
		} else if self.file_type.supports_tag_type(tag_type) {
			std::slice::from_ref(&tag_type)
		} else {
			err!(UnsupportedTagType(tag_type));
		};

		file.rewind()?;
		let layout = crate::probe::parse_layout(file, self.rewrite_options(false))?;
		layout.verify_audio_untouched()?;

		let mut contents = ZoneContents::new();
		for target in targets {
			let name = target.zone_name();
			match layout.plan().zone(name) {
				Some(zone) if !zone.is_insertion_point() => {
					log::debug!("Removing {target:?} ({} bytes)", zone.original_size());
					contents.insert(name.to_owned(), Vec::new());
				},
				_ => {},
			}
		}

		if contents.is_empty() {
			log::debug!("No {tag_type:?} tag to remove");
			return Ok(());
		}

		splice_file(file, layout.plan(), &contents)?;
		self.reload(file)
	}

	/// Drop the tags held in memory
	///
	/// This doesn't touch the file, see [`TaggedFile::remove`] for that.
	pub fn clear(&mut self) {
		self.tags.clear();
	}

	fn writable_tag_type(&self, tag_type: TagType, registry: &TagTypeRegistry) -> Result<TagType> {
		if !tag_type.is_wildcard() {
			if !self.file_type.supports_tag_type(tag_type) {
				err!(UnsupportedTagType(tag_type));
			}

			return Ok(tag_type);
		}

		let preferred = registry
			.priority()
			.iter()
			.find(|tag_type| self.file_type.supports_tag_type(*tag_type));

		Ok(preferred.unwrap_or_else(|| self.file_type.primary_tag_type()))
	}

	// Writes need the existing tag in full to merge into, removals only need the zones
	fn rewrite_options(&self, read_tags: bool) -> ReadOptions {
		ReadOptions::new()
			.read_properties(false)
			.read_tags(read_tags)
			.read_pictures(read_tags)
			.parsing_mode(self.options.parsing_mode)
	}

	fn reload<R>(&mut self, reader: &mut R) -> Result<()>
	where
		R: Read + Seek,
	{
		reader.rewind()?;
		*self = Self::read_from(reader, self.options)?;
		Ok(())
	}
}

/// A [`TaggedFile`] that holds on to its file
///
/// # Examples
///
/// ```rust,no_run
/// use tagsplice::config::{ReadOptions, TagTypeRegistry, WriteOptions};
/// use tagsplice::file::BoundTaggedFile;
/// use tagsplice::tag::{TagData, TagType};
/// use std::fs::OpenOptions;
///
/// # fn main() -> tagsplice::error::Result<()> {
/// // We'll need to open our file for reading *and* writing
/// let file = OpenOptions::new().read(true).write(true).open("song.dsf")?;
/// let mut bound_tagged_file = BoundTaggedFile::read_from(file, ReadOptions::new())?;
///
/// let mut changes = TagData::new();
/// changes.set_artist("Artist");
/// bound_tagged_file.write(
/// 	&changes,
/// 	TagType::Id3v2,
/// 	TagTypeRegistry::global(),
/// 	WriteOptions::new(),
/// )?;
/// # Ok(()) }
/// ```
#[derive(Debug)]
pub struct BoundTaggedFile<F> {
	inner: TaggedFile,
	file_handle: F,
}

impl<F> BoundTaggedFile<F> {
	/// The current state of the file
	pub fn tagged_file(&self) -> &TaggedFile {
		&self.inner
	}

	/// Consume this tagged file and return the internal file "buffer"
	pub fn into_inner(self) -> F {
		self.file_handle
	}
}

impl<F: FileLike> BoundTaggedFile<F>
where
	SpliceError: From<<F as Truncate>::Error>,
	SpliceError: From<<F as Length>::Error>,
{
	/// Create a new [`BoundTaggedFile`]
	///
	/// # Errors
	///
	/// See [`TaggedFile::read_from`]
	pub fn read_from(mut file: F, options: ReadOptions) -> Result<Self> {
		let inner = TaggedFile::read_from(&mut file, options)?;
		file.rewind()?;

		Ok(Self {
			inner,
			file_handle: file,
		})
	}

	/// See [`TaggedFile::write`]
	///
	/// # Errors
	///
	/// See [`TaggedFile::write`]
	pub fn write(
		&mut self,
		data: &TagData,
		tag_type: TagType,
		registry: &TagTypeRegistry,
		options: WriteOptions,
	) -> Result<()> {
		self.inner
			.write(&mut self.file_handle, data, tag_type, registry, options)
	}

	/// See [`TaggedFile::remove`]
	///
	/// # Errors
	///
	/// See [`TaggedFile::remove`]
	pub fn remove(&mut self, tag_type: TagType) -> Result<()> {
		self.inner.remove(&mut self.file_handle, tag_type)
	}
}

impl<F> From<BoundTaggedFile<F>> for TaggedFile {
	fn from(input: BoundTaggedFile<F>) -> Self {
		input.inner
	}
}

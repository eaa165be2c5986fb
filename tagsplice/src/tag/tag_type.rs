use crate::config::ReadOptions;
use crate::error::{Result, SpliceError};
use crate::file::TaggedFile;
use crate::util::io::{FileLike, Length, Truncate};

use std::fs::OpenOptions;
use std::path::Path;

/// The tag systems a file can carry
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagType {
	/// Represents an ID3v1(.1) tag
	Id3v1,
	/// This covers all ID3v2 versions since they all get upgraded to ID3v2.4
	Id3v2,
	/// Represents an APEv2 tag (APEv1 tags are read as well)
	Ape,
	/// The container's own metadata format (Ex. RIFF INFO in WAV)
	Native,
	/// A query wildcard, never the type of a stored tag
	///
	/// When reading, this lets the registry decide (merging tag systems if cross-reading is
	/// enabled). When writing, it selects the highest priority type the container supports.
	Any,
}

impl TagType {
	/// The number of concrete tag types ([`TagType::Any`] excluded)
	pub const COUNT: usize = 4;

	/// Every concrete tag type
	pub const KNOWN: [TagType; Self::COUNT] = [Self::Id3v1, Self::Id3v2, Self::Ape, Self::Native];

	/// Whether this is the [`TagType::Any`] wildcard
	pub fn is_wildcard(self) -> bool {
		self == Self::Any
	}

	/// The name of the zone a tag of this type occupies
	pub(crate) fn zone_name(self) -> &'static str {
		match self {
			Self::Id3v1 => "id3v1",
			Self::Id3v2 => "id3v2",
			Self::Ape => "ape",
			Self::Native => "native",
			Self::Any => "any",
		}
	}

	/// Remove a tag from a [`Path`]
	///
	/// # Errors
	///
	/// See [`TagType::remove_from`]
	pub fn remove_from_path(self, path: impl AsRef<Path>) -> Result<()> {
		let mut file = OpenOptions::new().read(true).write(true).open(path)?;
		self.remove_from(&mut file)
	}

	/// Remove a tag from a [`FileLike`]
	///
	/// # Errors
	///
	/// * It is unable to guess the file format
	/// * The format doesn't support the tag
	/// * It is unable to write to the file
	pub fn remove_from<F>(self, file: &mut F) -> Result<()>
	where
		F: FileLike,
		SpliceError: From<<F as Truncate>::Error>,
		SpliceError: From<<F as Length>::Error>,
	{
		file.rewind()?;

		let mut tagged_file = TaggedFile::read_from(
			file,
			ReadOptions::new().read_tags(false).read_properties(false),
		)?;
		tagged_file.remove(file, self)
	}
}

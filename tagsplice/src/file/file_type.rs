use crate::id3::v2::synchsafe::SynchsafeInteger;
use crate::tag::TagType;

use std::ffi::OsStr;
use std::path::Path;

/// List of common extensions for all supported [`FileType`]s
///
/// Can be used as a filter when scanning directories.
pub const EXTENSIONS: &[&str] = &[
	// Also update `FileType::from_ext()` below
	"wav", "wave", "dsf", "tak", "wv",
];

/// The type of file read
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
#[allow(missing_docs)]
#[non_exhaustive]
pub enum FileType {
	Wav,
	Dsf,
	Tak,
	WavPack,
}

impl FileType {
	/// Returns the file type's "primary" [`TagType`], or the one most likely to be used in the target format
	///
	/// | [`FileType`]      | [`TagType`] |
	/// |-------------------|-------------|
	/// | `Wav`, `Dsf`      | `Id3v2`     |
	/// | `Tak`, `WavPack`  | `Ape`       |
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsplice::file::FileType;
	/// use tagsplice::tag::TagType;
	///
	/// assert_eq!(FileType::Dsf.primary_tag_type(), TagType::Id3v2);
	/// ```
	pub fn primary_tag_type(&self) -> TagType {
		match self {
			FileType::Wav | FileType::Dsf => TagType::Id3v2,
			FileType::Tak | FileType::WavPack => TagType::Ape,
		}
	}

	/// Every [`TagType`] this `FileType` can store
	pub fn supported_tag_types(&self) -> &'static [TagType] {
		match self {
			FileType::Wav => &[TagType::Id3v2, TagType::Native],
			FileType::Dsf => &[TagType::Id3v2],
			FileType::Tak => &[TagType::Ape],
			FileType::WavPack => &[TagType::Ape, TagType::Id3v1],
		}
	}

	/// Whether this `FileType` can store the given [`TagType`]
	///
	/// [`TagType::Any`] is supported by every format.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsplice::file::FileType;
	/// use tagsplice::tag::TagType;
	///
	/// assert!(FileType::WavPack.supports_tag_type(TagType::Id3v1));
	/// assert!(!FileType::Dsf.supports_tag_type(TagType::Ape));
	/// ```
	pub fn supports_tag_type(&self, tag_type: TagType) -> bool {
		tag_type.is_wildcard() || self.supported_tag_types().contains(&tag_type)
	}

	/// Attempts to extract a [`FileType`] from an extension
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsplice::file::FileType;
	///
	/// assert_eq!(FileType::from_ext("wv"), Some(FileType::WavPack));
	/// ```
	pub fn from_ext<E>(ext: E) -> Option<Self>
	where
		E: AsRef<OsStr>,
	{
		let ext = ext.as_ref().to_str()?.to_ascii_lowercase();

		// Also update `EXTENSIONS` above
		match ext.as_str() {
			"wav" | "wave" => Some(Self::Wav),
			"dsf" => Some(Self::Dsf),
			"tak" => Some(Self::Tak),
			"wv" => Some(Self::WavPack),
			_ => None,
		}
	}

	/// Attempts to determine a [`FileType`] from a path
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsplice::file::FileType;
	/// use std::path::Path;
	///
	/// let path = Path::new("path/to/my.tak");
	/// assert_eq!(FileType::from_path(path), Some(FileType::Tak));
	/// ```
	pub fn from_path<P>(path: P) -> Option<Self>
	where
		P: AsRef<Path>,
	{
		let ext = path.as_ref().extension();
		ext.and_then(Self::from_ext)
	}

	/// Attempts to extract a [`FileType`] from a buffer
	///
	/// This **will not** search past an ID3v2 tag at the start of the buffer, and can't tell
	/// WavPack 3 (which lives inside a RIFF container) apart from WAV. For both of those, use
	/// [`guess_file_type`](crate::probe::guess_file_type).
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsplice::file::FileType;
	///
	/// assert_eq!(FileType::from_buffer(b"DSD \x1c\0\0\0"), Some(FileType::Dsf));
	/// assert_eq!(FileType::from_buffer(b"ID3\x04\0\0\0\0\0\0"), None);
	/// ```
	pub fn from_buffer(buf: &[u8]) -> Option<Self> {
		match Self::from_buffer_inner(buf) {
			Some(FileTypeGuessResult::Determined(file_ty)) => Some(file_ty),
			_ => None,
		}
	}

	pub(crate) fn from_buffer_inner(buf: &[u8]) -> Option<FileTypeGuessResult> {
		if let Some(file_ty) = Self::quick_type_guess(buf) {
			return Some(FileTypeGuessResult::Determined(file_ty));
		}

		// The bare minimum size for an ID3v2 header is 10 bytes
		if buf.len() >= 10 && &buf[..3] == b"ID3" {
			let size = u32::from_be_bytes([buf[6], buf[7], buf[8], buf[9]]).unsynch();
			let footer = buf[3] == 4 && buf[5] & 0x10 == 0x10;
			return Some(FileTypeGuessResult::MaybePrecededById3 { size, footer });
		}

		None
	}

	fn quick_type_guess(buf: &[u8]) -> Option<Self> {
		match buf.get(..4)? {
			b"RIFF" if buf.len() >= 12 && &buf[8..12] == b"WAVE" => Some(Self::Wav),
			b"DSD " => Some(Self::Dsf),
			b"tBaK" => Some(Self::Tak),
			b"wvpk" => Some(Self::WavPack),
			_ => None,
		}
	}
}

/// The result of a `FileType` guess
///
/// External callers of `FileType::from_buffer()` will only ever see `Determined` cases.
pub(crate) enum FileTypeGuessResult {
	/// The `FileType` was guessed
	Determined(FileType),
	/// The stream starts with an ID3v2 tag of `size` bytes (header excluded)
	MaybePrecededById3 { size: u32, footer: bool },
}

#[cfg(test)]
mod tests {
	use super::{FileType, FileTypeGuessResult};
	use crate::tag::TagType;

	#[test_log::test]
	fn signatures() {
		assert_eq!(FileType::from_buffer(b"RIFF\0\0\0\0WAVE"), Some(FileType::Wav));
		assert_eq!(FileType::from_buffer(b"RIFF\0\0\0\0AVI "), None);
		assert_eq!(FileType::from_buffer(b"tBaK"), Some(FileType::Tak));
		assert_eq!(FileType::from_buffer(b"wvpk"), Some(FileType::WavPack));
		assert_eq!(FileType::from_buffer(b"MThd"), None);
		assert_eq!(FileType::from_buffer(b""), None);
	}

	#[test_log::test]
	fn leading_id3v2() {
		let buf = [b'I', b'D', b'3', 4, 0, 0x10, 0, 0, 0x01, 0x00];
		match FileType::from_buffer_inner(&buf) {
			Some(FileTypeGuessResult::MaybePrecededById3 { size, footer }) => {
				assert_eq!(size, 128);
				assert!(footer);
			},
			_ => panic!("Expected a leading ID3v2 tag"),
		}
	}

	#[test_log::test]
	fn tag_support() {
		assert!(FileType::Wav.supports_tag_type(TagType::Native));
		assert!(!FileType::Wav.supports_tag_type(TagType::Ape));
		assert!(FileType::Tak.supports_tag_type(TagType::Any));
		assert!(!FileType::Tak.supports_tag_type(TagType::Id3v1));

		for file_type in [FileType::Wav, FileType::Dsf, FileType::Tak, FileType::WavPack] {
			assert!(file_type.supports_tag_type(file_type.primary_tag_type()));
		}
	}
}

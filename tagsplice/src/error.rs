//! Contains the errors that can arise within tagsplice
//!
//! The primary error is [`SpliceError`]. The type of error is determined by [`ErrorKind`],
//! which can be extended at any time.

use crate::file::FileType;
use crate::tag::TagType;

use std::collections::TryReserveError;
use std::fmt::{Debug, Display, Formatter};

/// Alias for `Result<T, SpliceError>`
pub type Result<T> = std::result::Result<T, SpliceError>;

/// The types of errors that can occur
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
	// File format related errors
	/// Unable to guess the format, or the container's signature is corrupt
	Format(FormatError),
	/// A structure points past the end of the stream
	TruncatedFile {
		/// The offset that was expected to be readable
		offset: u64,
		/// The actual length of the stream
		stream_len: u64,
	},

	// Surgery related errors
	/// A zone overlaps another zone, or otherwise can't be registered/used
	InvalidZone(ZoneError),
	/// A size or index patch can't be applied
	InvalidPatch(PatchError),
	/// The engine produced a different amount of data than it predicted
	///
	/// Also used when a declared size is too big or small to be valid within its item.
	SizeMismatch,

	// Tag related errors
	/// Arises when writing a tag to a file type that doesn't support it
	UnsupportedTagType(TagType),
	/// Arises when a tag is expected (Ex. found an "id3 " chunk in a WAV file), but isn't found
	FakeTag,
	/// Errors that arise while decoding text
	TextDecode(&'static str),
	/// Arises when decoding OR encoding a problematic [`Timestamp`](crate::tag::items::Timestamp)
	BadTimestamp(&'static str),
	/// Attempting to read/write an abnormally large amount of data
	TooMuchData,

	// Conversions for external errors
	/// Unable to convert bytes to a String
	StringFromUtf8(std::string::FromUtf8Error),
	/// Represents all cases of [`std::io::Error`].
	Io(std::io::Error),
	/// Failure to allocate enough memory
	Alloc(TryReserveError),
	/// This should **never** be encountered
	Infallible(std::convert::Infallible),
}

/// An error that arises while decoding a container or tag
pub struct FormatError {
	format: Option<FileType>,
	description: &'static str,
}

impl FormatError {
	/// Create a `FormatError` from a [`FileType`] and description
	#[must_use]
	pub const fn new(format: FileType, description: &'static str) -> Self {
		Self {
			format: Some(format),
			description,
		}
	}

	/// Create a `FormatError` without binding it to a [`FileType`]
	pub fn from_description(description: &'static str) -> Self {
		Self {
			format: None,
			description,
		}
	}

	/// Returns the associated [`FileType`], if one exists
	pub fn format(&self) -> Option<FileType> {
		self.format
	}

	/// Returns the error description
	pub fn description(&self) -> &str {
		self.description
	}
}

impl Debug for FormatError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		if let Some(format) = self.format {
			write!(f, "{:?}: {:?}", format, self.description)
		} else {
			write!(f, "{:?}", self.description)
		}
	}
}

impl Display for FormatError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		if let Some(format) = self.format {
			write!(f, "{:?}: {}", format, self.description)
		} else {
			write!(f, "{}", self.description)
		}
	}
}

/// An error that arises while registering or resolving a zone
#[derive(Debug)]
pub struct ZoneError {
	name: String,
	reason: &'static str,
}

impl ZoneError {
	pub(crate) fn new(name: impl Into<String>, reason: &'static str) -> Self {
		Self {
			name: name.into(),
			reason,
		}
	}

	/// The name of the offending zone
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Why the zone was rejected
	pub fn reason(&self) -> &str {
		self.reason
	}
}

impl Display for ZoneError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "Zone \"{}\": {}", self.name, self.reason)
	}
}

/// An error that arises while computing or placing a size/index patch
#[derive(Debug)]
pub struct PatchError {
	target_offset: u64,
	reason: &'static str,
}

impl PatchError {
	pub(crate) fn new(target_offset: u64, reason: &'static str) -> Self {
		Self {
			target_offset,
			reason,
		}
	}

	/// The offset of the patched field in the original stream
	pub fn target_offset(&self) -> u64 {
		self.target_offset
	}

	/// Why the patch was rejected
	pub fn reason(&self) -> &str {
		self.reason
	}
}

impl Display for PatchError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "Patch @ {}: {}", self.target_offset, self.reason)
	}
}

/// Errors that could occur within tagsplice
pub struct SpliceError {
	pub(crate) kind: ErrorKind,
}

impl SpliceError {
	/// Create a `SpliceError` from an [`ErrorKind`]
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsplice::error::{ErrorKind, SpliceError};
	///
	/// let too_much_data = SpliceError::new(ErrorKind::TooMuchData);
	/// ```
	#[must_use]
	pub const fn new(kind: ErrorKind) -> Self {
		Self { kind }
	}

	/// Returns the [`ErrorKind`]
	pub fn kind(&self) -> &ErrorKind {
		&self.kind
	}

	pub(crate) fn truncated(offset: u64, stream_len: u64) -> Self {
		Self::new(ErrorKind::TruncatedFile { offset, stream_len })
	}
}

impl std::error::Error for SpliceError {}

impl Debug for SpliceError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?}", self.kind)
	}
}

impl From<FormatError> for SpliceError {
	fn from(input: FormatError) -> Self {
		Self {
			kind: ErrorKind::Format(input),
		}
	}
}

impl From<ZoneError> for SpliceError {
	fn from(input: ZoneError) -> Self {
		Self {
			kind: ErrorKind::InvalidZone(input),
		}
	}
}

impl From<PatchError> for SpliceError {
	fn from(input: PatchError) -> Self {
		Self {
			kind: ErrorKind::InvalidPatch(input),
		}
	}
}

impl From<std::io::Error> for SpliceError {
	fn from(input: std::io::Error) -> Self {
		Self {
			kind: ErrorKind::Io(input),
		}
	}
}

impl From<std::string::FromUtf8Error> for SpliceError {
	fn from(input: std::string::FromUtf8Error) -> Self {
		Self {
			kind: ErrorKind::StringFromUtf8(input),
		}
	}
}

impl From<std::collections::TryReserveError> for SpliceError {
	fn from(input: TryReserveError) -> Self {
		Self {
			kind: ErrorKind::Alloc(input),
		}
	}
}

impl From<std::convert::Infallible> for SpliceError {
	fn from(input: std::convert::Infallible) -> Self {
		Self {
			kind: ErrorKind::Infallible(input),
		}
	}
}

impl Display for SpliceError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self.kind {
			// Conversions
			ErrorKind::StringFromUtf8(ref err) => write!(f, "{err}"),
			ErrorKind::Io(ref err) => write!(f, "{err}"),
			ErrorKind::Alloc(ref err) => write!(f, "{err}"),

			ErrorKind::Format(ref format_err) => write!(f, "{format_err}"),
			ErrorKind::TruncatedFile { offset, stream_len } => write!(
				f,
				"Expected data at offset {offset}, but the stream is only {stream_len} bytes long"
			),
			ErrorKind::InvalidZone(ref zone_err) => write!(f, "{zone_err}"),
			ErrorKind::InvalidPatch(ref patch_err) => write!(f, "{patch_err}"),
			ErrorKind::SizeMismatch => write!(
				f,
				"Encountered an invalid size, either too big or too small to be valid"
			),
			ErrorKind::UnsupportedTagType(tag_type) => write!(
				f,
				"Attempted to write a {tag_type:?} tag to a format that does not support it"
			),
			ErrorKind::FakeTag => write!(f, "Reading: Expected a tag, found invalid data"),
			ErrorKind::TextDecode(message) => write!(f, "Text decoding: {message}"),
			ErrorKind::BadTimestamp(message) => {
				write!(f, "Encountered an invalid timestamp: {message}")
			},
			ErrorKind::TooMuchData => write!(
				f,
				"Attempted to read/write an abnormally large amount of data"
			),

			ErrorKind::Infallible(_) => write!(f, "A expected condition was not upheld"),
		}
	}
}

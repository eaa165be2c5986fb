/// Options to control how tagsplice reads a file
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct ReadOptions {
	pub(crate) read_properties: bool,
	pub(crate) read_tags: bool,
	pub(crate) read_pictures: bool,
	pub(crate) parsing_mode: ParsingMode,
}

impl Default for ReadOptions {
	/// The default implementation for `ReadOptions`
	///
	/// The defaults are as follows:
	///
	/// ```rust,ignore
	/// ReadOptions {
	/// 	read_properties: true,
	/// 	read_tags: true,
	/// 	read_pictures: true,
	/// 	parsing_mode: ParsingMode::BestAttempt,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}

impl ReadOptions {
	/// Default parsing mode
	pub const DEFAULT_PARSING_MODE: ParsingMode = ParsingMode::BestAttempt;

	/// Creates a new `ReadOptions`, alias for `Default` implementation
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsplice::config::ReadOptions;
	///
	/// let read_options = ReadOptions::new();
	/// ```
	#[must_use]
	pub const fn new() -> Self {
		Self {
			read_properties: true,
			read_tags: true,
			read_pictures: true,
			parsing_mode: Self::DEFAULT_PARSING_MODE,
		}
	}

	/// Whether or not to read the audio properties
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsplice::config::ReadOptions;
	///
	/// // By default, `read_properties` is enabled. Here, we don't want to read them.
	/// let read_options = ReadOptions::new().read_properties(false);
	/// ```
	pub fn read_properties(mut self, read_properties: bool) -> Self {
		self.read_properties = read_properties;
		self
	}

	/// Whether or not to decode the tags
	///
	/// Tags are still located (and their zones registered) when this is disabled, they just
	/// won't be decoded into views.
	pub fn read_tags(mut self, read_tags: bool) -> Self {
		self.read_tags = read_tags;
		self
	}

	/// Whether or not to decode embedded pictures
	pub fn read_pictures(mut self, read_pictures: bool) -> Self {
		self.read_pictures = read_pictures;
		self
	}

	/// The parsing mode to use, see [`ParsingMode`] for details
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsplice::config::{ParsingMode, ReadOptions};
	///
	/// let read_options = ReadOptions::new().parsing_mode(ParsingMode::Strict);
	/// ```
	pub fn parsing_mode(mut self, parsing_mode: ParsingMode) -> Self {
		self.parsing_mode = parsing_mode;
		self
	}
}

/// The parsing strictness mode
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq, Default)]
#[non_exhaustive]
pub enum ParsingMode {
	/// Will eagerly error on invalid input
	///
	/// Examples:
	///
	/// * Unrecognized ID3v2 frame flags or text encodings
	/// * An ID3v1 year that isn't 4 digits
	Strict,
	/// Default mode, less eager to error on recoverably malformed input
	///
	/// Malformed items are skipped (and logged), the rest of the tag is kept.
	#[default]
	BestAttempt,
	/// Least strict mode
	///
	/// Also tolerates structural issues, such as a RIFF size that disagrees with the stream length.
	Relaxed,
}

/// Unsynchronized lyrics
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Lyrics {
	/// ISO-639-2 language code
	pub language: [u8; 3],
	/// A short content description
	pub description: String,
	/// The lyrics themselves
	pub text: String,
}

impl Lyrics {
	/// Create lyrics in an unknown language (`XXX`) with no description
	pub fn new(text: impl Into<String>) -> Self {
		Self {
			language: *b"XXX",
			description: String::new(),
			text: text.into(),
		}
	}

	/// Whether there is no text
	pub fn is_empty(&self) -> bool {
		self.text.is_empty()
	}
}

/// A chapter marker
///
/// Times are in milliseconds, relative to the start of the audio.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Chapter {
	/// Start of the chapter
	pub start_ms: u32,
	/// End of the chapter
	pub end_ms: u32,
	/// The chapter title
	pub title: Option<String>,
	/// A longer description, stored as the chapter's subtitle
	pub subtitle: Option<String>,
}

impl Chapter {
	/// Create a new chapter
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsplice::tag::items::Chapter;
	///
	/// let intro = Chapter::new(0, 15_000, "Intro");
	/// assert_eq!(intro.title.as_deref(), Some("Intro"));
	/// ```
	pub fn new(start_ms: u32, end_ms: u32, title: impl Into<String>) -> Self {
		Self {
			start_ms,
			end_ms,
			title: Some(title.into()),
			subtitle: None,
		}
	}
}

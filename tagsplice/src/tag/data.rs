use super::field::FieldKey;
use super::items::{Chapter, Lyrics, Timestamp};
use crate::picture::Picture;

use std::collections::BTreeMap;

// Generates typed setters for `TagData`
//
// Usage:
//
// tag_data_setters! {
//     [field name] => FieldKey, value_type, |value| conversion_to_string
// }
macro_rules! tag_data_setters {
	($([$name:tt $($other:tt)*] => $key:ident, $ty:ty, |$value:ident| $convert:expr);+ $(;)?) => {
		impl TagData {
			$(
				paste::paste! {
					#[doc = "Sets the " $name $(" " $other)* "."]
					pub fn [<set_ $name $(_ $other)*>](&mut self, $value: $ty) -> &mut Self {
						self.set_field(FieldKey::$key, $convert)
					}
				}
			)+
		}
	};
}

/// A normalized set of tag fields
///
/// This is both the decoded form of a tag and the input to
/// [`TaggedFile::write`](crate::file::TaggedFile::write). When used as a write request, only the
/// values that are present are applied, and an empty value removes the existing one.
///
/// # Examples
///
/// ```rust
/// use tagsplice::tag::{FieldKey, TagData};
///
/// let mut data = TagData::new();
/// data.set_title("Foo title").set_track(3);
///
/// assert_eq!(data.field(FieldKey::Title), Some("Foo title"));
/// assert_eq!(data.field(FieldKey::TrackNumber), Some("3"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagData {
	pub(crate) fields: BTreeMap<FieldKey, String>,
	pub(crate) additional_fields: BTreeMap<String, String>,
	pub(crate) pictures: Option<Vec<Picture>>,
	pub(crate) chapters: Option<Vec<Chapter>>,
	pub(crate) chapters_table_description: Option<String>,
	pub(crate) lyrics: Option<Lyrics>,
}

tag_data_setters! {
	[title] => Title, impl Into<String>, |value| value;
	[artist] => Artist, impl Into<String>, |value| value;
	[composer] => Composer, impl Into<String>, |value| value;
	[comment] => Comment, impl Into<String>, |value| value;
	[genre] => Genre, impl Into<String>, |value| value;
	[album] => Album, impl Into<String>, |value| value;
	[album artist] => AlbumArtist, impl Into<String>, |value| value;
	[conductor] => Conductor, impl Into<String>, |value| value;
	[copyright] => Copyright, impl Into<String>, |value| value;
	[original artist] => OriginalArtist, impl Into<String>, |value| value;
	[original album] => OriginalAlbum, impl Into<String>, |value| value;
	[general description] => GeneralDescription, impl Into<String>, |value| value;
	[publisher] => Publisher, impl Into<String>, |value| value;
	[track] => TrackNumber, u32, |value| value.to_string();
	[track total] => TrackTotal, u32, |value| value.to_string();
	[disc] => DiscNumber, u32, |value| value.to_string();
	[disc total] => DiscTotal, u32, |value| value.to_string();
	[date] => RecordingDate, Timestamp, |value| value.to_string();
	[publishing date] => PublishingDate, Timestamp, |value| value.to_string();
	[popularity] => Popularity, f32, |value| value.clamp(0.0, 1.0).to_string();
}

impl TagData {
	/// Create an empty `TagData`
	pub fn new() -> Self {
		Self::default()
	}

	/// Get a field's raw value
	pub fn field(&self, key: FieldKey) -> Option<&str> {
		self.fields.get(&key).map(String::as_str)
	}

	/// Set a field, replacing any existing value
	pub fn set_field(&mut self, key: FieldKey, value: impl Into<String>) -> &mut Self {
		self.fields.insert(key, value.into());
		self
	}

	/// Remove a field, returning its value
	pub fn remove_field(&mut self, key: FieldKey) -> Option<String> {
		self.fields.remove(&key)
	}

	/// Iterate over the fields and their values
	pub fn fields(&self) -> impl Iterator<Item = (FieldKey, &str)> + '_ {
		self.fields.iter().map(|(k, v)| (*k, v.as_str()))
	}

	/// Fields without a [`FieldKey`], keyed by their format-specific name
	pub fn additional_fields(&self) -> &BTreeMap<String, String> {
		&self.additional_fields
	}

	/// Set a field without a [`FieldKey`]
	pub fn set_additional_field(
		&mut self,
		key: impl Into<String>,
		value: impl Into<String>,
	) -> &mut Self {
		self.additional_fields.insert(key.into(), value.into());
		self
	}

	/// The pictures, if any were set
	pub fn pictures(&self) -> &[Picture] {
		self.pictures.as_deref().unwrap_or_default()
	}

	/// Replace every picture
	///
	/// An empty `Vec` removes all existing pictures on write.
	pub fn set_pictures(&mut self, pictures: Vec<Picture>) -> &mut Self {
		self.pictures = Some(pictures);
		self
	}

	/// The chapters, if any were set
	pub fn chapters(&self) -> &[Chapter] {
		self.chapters.as_deref().unwrap_or_default()
	}

	/// Replace every chapter
	///
	/// An empty `Vec` removes all existing chapters on write.
	pub fn set_chapters(&mut self, chapters: Vec<Chapter>) -> &mut Self {
		self.chapters = Some(chapters);
		self
	}

	/// The description of the chapter table
	pub fn chapters_table_description(&self) -> Option<&str> {
		self.chapters_table_description.as_deref()
	}

	/// Set the description of the chapter table
	pub fn set_chapters_table_description(&mut self, description: impl Into<String>) -> &mut Self {
		self.chapters_table_description = Some(description.into());
		self
	}

	/// The (unsynchronized) lyrics
	pub fn lyrics(&self) -> Option<&Lyrics> {
		self.lyrics.as_ref()
	}

	/// Set the lyrics
	///
	/// Empty lyrics remove the existing ones on write.
	pub fn set_lyrics(&mut self, lyrics: Lyrics) -> &mut Self {
		self.lyrics = Some(lyrics);
		self
	}

	/// Whether there is nothing worth storing
	///
	/// An empty `TagData` encodes to no tag at all.
	pub fn is_empty(&self) -> bool {
		self.fields.iter().all(|(k, v)| k.is_empty_value(v))
			&& self.additional_fields.values().all(|v| v.trim().is_empty())
			&& self.pictures().is_empty()
			&& self.chapters().is_empty()
			&& self.lyrics.as_ref().is_none_or(Lyrics::is_empty)
	}

	/// Apply this write request on top of `base`
	///
	/// Present values replace those in `base`, empty values remove them. Everything absent from
	/// `self` is left untouched.
	pub fn merge_into(&self, base: &mut TagData) {
		for (key, value) in &self.fields {
			if key.is_empty_value(value) {
				log::trace!("Removing field {key:?}");
				base.fields.remove(key);
			} else {
				base.fields.insert(*key, value.clone());
			}
		}

		for (key, value) in &self.additional_fields {
			if value.trim().is_empty() {
				base.additional_fields.remove(key);
			} else {
				base.additional_fields.insert(key.clone(), value.clone());
			}
		}

		if let Some(pictures) = &self.pictures {
			base.pictures = (!pictures.is_empty()).then(|| pictures.clone());
		}

		if let Some(chapters) = &self.chapters {
			base.chapters = (!chapters.is_empty()).then(|| chapters.clone());
		}

		if let Some(description) = &self.chapters_table_description {
			base.chapters_table_description =
				(!description.trim().is_empty()).then(|| description.clone());
		}

		if let Some(lyrics) = &self.lyrics {
			base.lyrics = (!lyrics.is_empty()).then(|| lyrics.clone());
		}
	}

	/// Drop every value that counts as empty
	pub(crate) fn prune(&mut self) {
		self.fields.retain(|k, v| !k.is_empty_value(v));
		self.additional_fields.retain(|_, v| !v.trim().is_empty());

		if self.pictures().is_empty() {
			self.pictures = None;
		}

		if self.chapters().is_empty() {
			self.chapters = None;
		}

		if self.lyrics.as_ref().is_some_and(Lyrics::is_empty) {
			self.lyrics = None;
		}
	}
}

#[cfg(test)]
mod tests {
	use crate::picture::{Picture, PictureType};
	use crate::tag::items::Lyrics;
	use crate::tag::{FieldKey, TagData};

	#[test_log::test]
	fn merge_overrides_and_keeps() {
		let mut base = TagData::new();
		base.set_title("Old title").set_artist("Artist").set_track(4);

		let mut request = TagData::new();
		request.set_title("New title");

		request.merge_into(&mut base);

		assert_eq!(base.field(FieldKey::Title), Some("New title"));
		assert_eq!(base.field(FieldKey::Artist), Some("Artist"));
		assert_eq!(base.field(FieldKey::TrackNumber), Some("4"));
	}

	#[test_log::test]
	fn empty_values_remove() {
		let mut base = TagData::new();
		base.set_title("Title")
			.set_track(4)
			.set_additional_field("MOOD", "calm")
			.set_pictures(vec![Picture::new(
				PictureType::CoverFront,
				None,
				None,
				vec![1, 2, 3],
			)])
			.set_lyrics(Lyrics::new("la la"));

		let mut request = TagData::new();
		request
			.set_title("")
			.set_track(0)
			.set_additional_field("MOOD", " ")
			.set_pictures(Vec::new())
			.set_lyrics(Lyrics::new(""));

		request.merge_into(&mut base);

		assert!(base.is_empty());
		assert_eq!(base, TagData::new());
	}

	#[test_log::test]
	fn prune() {
		let mut data = TagData::new();
		data.set_genre(" ").set_chapters(Vec::new());
		assert!(data.is_empty());

		data.prune();
		assert_eq!(data, TagData::new());
	}
}

use super::data::TagData;
use super::field::{FieldKey, leading_number};
use super::items::{Chapter, Lyrics, Timestamp};
use super::tag_type::TagType;
use crate::config::{ParsingMode, ReadOptions, WriteOptions};
use crate::error::Result;
use crate::picture::Picture;

use std::borrow::Cow;
use std::collections::BTreeMap;

// Defines the `TagSystemView` trait, along with typed getters built on top of `TagSystemView::field`
//
// Usage:
//
// tag_system_view! {
//     kind [field name] => FieldKey,
// }
//
// Where `kind` is one of `text`, `number`, `date`, or `rating`. Names with multiple segments are
// separated by spaces, [track total] becomes `track_total()`.
macro_rules! tag_system_view {
	($($kind:ident [$($name:tt)+] => $key:ident),+ $(,)?) => {
		/// The read side of a tag system
		///
		/// Implemented by concrete tags ([`MetadataTag`](super::MetadataTag)) as well as by the
		/// views the resolver produces, so callers don't need to care whether they are looking at
		/// one tag or several merged ones.
		pub trait TagSystemView {
			/// The type of the underlying tag
			///
			/// This is [`TagType::Any`] for merged and empty views.
			fn tag_type(&self) -> TagType;

			/// Whether the tag is present in the file
			fn exists(&self) -> bool;

			/// Get a field's value
			///
			/// Empty values (see [`FieldKey::is_empty_value`]) are never returned.
			fn field(&self, key: FieldKey) -> Option<Cow<'_, str>>;

			/// Fields without a [`FieldKey`]
			fn additional_fields(&self) -> &BTreeMap<String, String>;

			/// The embedded pictures
			fn pictures(&self) -> &[Picture];

			/// The chapters
			fn chapters(&self) -> &[Chapter];

			/// The description of the chapter table
			fn chapters_table_description(&self) -> Option<&str>;

			/// The (unsynchronized) lyrics
			fn lyrics(&self) -> Option<&Lyrics>;

			/// The size of the tag in the file, in bytes
			fn size(&self) -> u64;

			/// The amount of padding included in [`TagSystemView::size`]
			fn padding_size(&self) -> u64 {
				0
			}

			$(
				tag_system_view! { @$kind [$($name)+] $key }
			)+
		}
	};
	(@text [$name:tt $($other:tt)*] $key:ident) => {
		paste::paste! {
			#[doc = "Returns the " $name $(" " $other)* "."]
			fn [<$name $(_ $other)*>](&self) -> Option<Cow<'_, str>> {
				self.field(FieldKey::$key)
			}
		}
	};
	(@number [$name:tt $($other:tt)*] $key:ident) => {
		paste::paste! {
			#[doc = "Returns the " $name $(" " $other)* "."]
			fn [<$name $(_ $other)*>](&self) -> Option<u32> {
				self.field(FieldKey::$key).as_deref().and_then(leading_number)
			}
		}
	};
	(@date [$name:tt $($other:tt)*] $key:ident) => {
		paste::paste! {
			#[doc = "Returns the " $name $(" " $other)* "."]
			///
			/// Malformed timestamps are treated as missing.
			fn [<$name $(_ $other)*>](&self) -> Option<Timestamp> {
				let value = self.field(FieldKey::$key)?;
				Timestamp::parse(&value, ParsingMode::BestAttempt).ok().flatten()
			}
		}
	};
	(@rating [$name:tt $($other:tt)*] $key:ident) => {
		paste::paste! {
			#[doc = "Returns the " $name $(" " $other)* ", in `0.0..=1.0`."]
			fn [<$name $(_ $other)*>](&self) -> Option<f32> {
				let value = self.field(FieldKey::$key)?.trim().parse::<f32>().ok()?;
				Some(value.clamp(0.0, 1.0))
			}
		}
	};
}

tag_system_view! {
	text [title] => Title,
	text [artist] => Artist,
	text [composer] => Composer,
	text [comment] => Comment,
	text [genre] => Genre,
	text [album] => Album,
	text [album artist] => AlbumArtist,
	text [conductor] => Conductor,
	text [copyright] => Copyright,
	text [original artist] => OriginalArtist,
	text [original album] => OriginalAlbum,
	text [general description] => GeneralDescription,
	text [publisher] => Publisher,
	number [track] => TrackNumber,
	number [track total] => TrackTotal,
	number [disc] => DiscNumber,
	number [disc total] => DiscTotal,
	date [date] => RecordingDate,
	date [publishing date] => PublishingDate,
	rating [popularity] => Popularity,
}

/// The mutating side of a concrete tag system
pub trait TagSystem: TagSystemView {
	/// Replace the tag's contents with the decoded `content`
	///
	/// # Errors
	///
	/// The content is malformed, and the [`ParsingMode`] doesn't allow recovering.
	fn read(&mut self, content: &[u8], options: ReadOptions) -> Result<()>;

	/// Encode the tag
	///
	/// A tag with nothing worth storing encodes to no bytes at all, which removes it from the file.
	///
	/// # Errors
	///
	/// A value can't be represented in the format.
	fn write(&self, options: WriteOptions) -> Result<Vec<u8>>;

	/// Mark the tag as absent, dropping all of its values
	fn remove(&mut self);

	/// Drop all values, keeping the tag itself
	fn clear(&mut self);

	/// The tag's values
	fn data(&self) -> &TagData;
}

pub(crate) static NO_ADDITIONAL_FIELDS: BTreeMap<String, String> = BTreeMap::new();

/// A view over nothing
///
/// Returned when the requested tag system isn't in the file.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct EmptyView;

impl TagSystemView for EmptyView {
	fn tag_type(&self) -> TagType {
		TagType::Any
	}

	fn exists(&self) -> bool {
		false
	}

	fn field(&self, _key: FieldKey) -> Option<Cow<'_, str>> {
		None
	}

	fn additional_fields(&self) -> &BTreeMap<String, String> {
		&NO_ADDITIONAL_FIELDS
	}

	fn pictures(&self) -> &[Picture] {
		&[]
	}

	fn chapters(&self) -> &[Chapter] {
		&[]
	}

	fn chapters_table_description(&self) -> Option<&str> {
		None
	}

	fn lyrics(&self) -> Option<&Lyrics> {
		None
	}

	fn size(&self) -> u64 {
		0
	}
}

//! The APE tag codec
//!
//! ## Item storage
//!
//! Text items with a [`FieldKey`] mapping become fields, the rest end up in the additional
//! fields under their original key. Pictures are binary items named after their type
//! (`Cover Art (Front)`, ...), holding a null terminated description followed by the image.
//!
//! Track and disc numbers are stored as `n/total`, the rating as a percentage.

mod read;
mod write;

use crate::tag::FieldKey;

pub(crate) use read::decode;
pub(crate) use write::encode;

// Keys that may not be used, as they would confuse tag readers
pub(super) const INVALID_KEYS: [&str; 4] = ["ID3", "TAG", "OGGS", "MP+"];

pub(super) const TRACK_KEY: &str = "Track";
pub(super) const DISC_KEY: &str = "Disc";
pub(super) const RATING_KEY: &str = "Rating";
pub(super) const LYRICS_KEY: &str = "Lyrics";

// The first key of each entry is the one written
pub(super) const FIELD_KEYS: [(FieldKey, &[&str]); 15] = [
	(FieldKey::Title, &["Title"]),
	(FieldKey::Artist, &["Artist"]),
	(FieldKey::Album, &["Album"]),
	(FieldKey::AlbumArtist, &["Album Artist", "ALBUMARTIST"]),
	(FieldKey::Composer, &["Composer"]),
	(FieldKey::Conductor, &["Conductor"]),
	(FieldKey::Comment, &["Comment"]),
	(FieldKey::Genre, &["Genre"]),
	(FieldKey::Copyright, &["Copyright"]),
	(FieldKey::Publisher, &["Publisher", "Label"]),
	(FieldKey::OriginalArtist, &["Original Artist"]),
	(FieldKey::OriginalAlbum, &["Original Album"]),
	(FieldKey::GeneralDescription, &["Subtitle"]),
	// The ecosystem agreed on "Year", even for full dates
	(FieldKey::RecordingDate, &["Year"]),
	(FieldKey::PublishingDate, &["RELEASEDATE"]),
];

pub(super) fn field_for_key(key: &str) -> Option<FieldKey> {
	FIELD_KEYS.iter().find_map(|(field, keys)| {
		keys.iter()
			.any(|k| k.eq_ignore_ascii_case(key))
			.then_some(*field)
	})
}

pub(super) fn key_for_field(field: FieldKey) -> Option<&'static str> {
	FIELD_KEYS
		.iter()
		.find(|(f, _)| *f == field)
		.map(|(_, keys)| keys[0])
}

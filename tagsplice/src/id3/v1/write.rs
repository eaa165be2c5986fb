use super::constants::{GENRES, ID3V1_TAG_MARKER, ID3V1_TAG_SIZE};
use crate::error::Result;
use crate::tag::items::Timestamp;
use crate::tag::{FieldKey, TagData, leading_number};
use crate::util::text::latin1_encode_lossy;

use std::io::Write;

use byteorder::WriteBytesExt;

/// Encode an ID3v1.1 tag
///
/// Values that don't fit are truncated, and everything ID3v1 can't represent is dropped.
pub(crate) fn encode(data: &TagData) -> Result<Vec<u8>> {
	fn fixed(value: Option<&str>, size: usize) -> Vec<u8> {
		let mut bytes = value.map(latin1_encode_lossy).unwrap_or_default();
		bytes.resize(size, 0);
		bytes
	}

	let mut writer = Vec::with_capacity(ID3V1_TAG_SIZE as usize);
	writer.write_all(&ID3V1_TAG_MARKER)?;

	writer.write_all(&fixed(data.field(FieldKey::Title), 30))?;
	writer.write_all(&fixed(data.field(FieldKey::Artist), 30))?;
	writer.write_all(&fixed(data.field(FieldKey::Album), 30))?;

	let year = data
		.field(FieldKey::RecordingDate)
		.and_then(|date| date.parse::<Timestamp>().ok())
		.map(|date| format!("{:04}", date.year.min(9999)));
	writer.write_all(&fixed(year.as_deref(), 4))?;

	writer.write_all(&fixed(data.field(FieldKey::Comment), 28))?;
	writer.write_u8(0)?;

	let track = data
		.field(FieldKey::TrackNumber)
		.and_then(leading_number)
		.and_then(|track| u8::try_from(track).ok())
		.unwrap_or(0);
	writer.write_u8(track)?;

	writer.write_u8(data.field(FieldKey::Genre).map_or(255, genre_index))?;

	Ok(writer)
}

fn genre_index(genre: &str) -> u8 {
	let genre = genre.trim();

	if let Some(index) = GENRES.iter().position(|g| g.eq_ignore_ascii_case(genre)) {
		return index as u8;
	}

	// Also accept a raw index, as written by some ID3v2 taggers ("(17)" or "17")
	let numeric = genre.trim_start_matches('(').trim_end_matches(')');
	match numeric.parse::<u8>() {
		Ok(index) if usize::from(index) < GENRES.len() => index,
		_ => {
			log::debug!("Genre \"{genre}\" can't be represented in ID3v1");
			255
		},
	}
}

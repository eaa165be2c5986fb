use super::constants::{GENRES, ID3V1_TAG_MARKER, ID3V1_TAG_SIZE};
use crate::config::{ParsingMode, ReadOptions};
use crate::error::Result;
use crate::macros::{decode_err, err};
use crate::tag::items::Timestamp;
use crate::tag::{FieldKey, TagData};
use crate::util::text::latin1_decode;

/// Decode a 128 byte ID3v1(.1) tag
pub(crate) fn decode(content: &[u8], options: ReadOptions) -> Result<TagData> {
	if content.len() as u64 != ID3V1_TAG_SIZE {
		decode_err!(@BAIL "ID3v1 tag has an invalid size");
	}

	if content[..3] != ID3V1_TAG_MARKER {
		err!(FakeTag);
	}

	let content = &content[3..];
	let mut data = TagData::new();

	let text_fields = [
		(FieldKey::Title, 0..30),
		(FieldKey::Artist, 30..60),
		(FieldKey::Album, 60..90),
	];
	for (key, range) in text_fields {
		if let Some(value) = decode_text(&content[range]) {
			data.set_field(key, value);
		}
	}

	if let Some(year) = try_parse_year(&content[90..94], options.parsing_mode)? {
		data.set_date(Timestamp::from_year(year));
	}

	// ID3v1.1 steals the last two bytes of the comment: a null, then a non-zero track number
	let comment_range = if content[122] == 0 && content[123] != 0 {
		data.set_track(u32::from(content[123]));
		94..122
	} else {
		94..124
	};

	if let Some(comment) = decode_text(&content[comment_range]) {
		data.set_comment(comment);
	}

	match GENRES.get(usize::from(content[124])) {
		Some(genre) => {
			data.set_genre(*genre);
		},
		None => log::trace!("ID3v1 tag has no genre ({})", content[124]),
	}

	Ok(data)
}

fn decode_text(data: &[u8]) -> Option<String> {
	let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
	if end == 0 {
		return None;
	}

	if data[end..].iter().any(|b| *b != 0) {
		log::warn!("ID3v1 text field contains trailing junk, skipping");
	}

	let text = latin1_decode(&data[..end]);
	let trimmed = text.trim_end();
	(!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn try_parse_year(input: &[u8], parse_mode: ParsingMode) -> Result<Option<u16>> {
	if input.iter().all(|b| *b == 0) {
		return Ok(None);
	}

	if !input.iter().all(u8::is_ascii_digit) {
		// Many writers use spaces or nulls for an unknown year, only strict mode cares
		if parse_mode == ParsingMode::Strict {
			err!(TextDecode(
				"ID3v1 year field contains non-ASCII digit characters"
			));
		}

		return Ok(None);
	}

	let year = input
		.iter()
		.fold(0u16, |year, c| year * 10 + u16::from(*c - b'0'));
	Ok(Some(year))
}

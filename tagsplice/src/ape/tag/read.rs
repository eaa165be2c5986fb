use super::{DISC_KEY, INVALID_KEYS, LYRICS_KEY, RATING_KEY, TRACK_KEY, field_for_key};
use crate::ape::APE_HEADER_SIZE;
use crate::ape::header::ApeHeader;
use crate::config::{ParsingMode, ReadOptions};
use crate::error::Result;
use crate::macros::{decode_err, err, try_vec};
use crate::picture::{Picture, PictureType};
use crate::tag::items::Lyrics;
use crate::tag::{FieldKey, TagData};
use crate::util::text::utf8_decode;

use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};

enum ItemValue {
	Text(String),
	Binary(Vec<u8>),
}

struct ApeItem {
	key: String,
	value: ItemValue,
}

/// Decode a complete APE tag, ending in its footer
///
/// The header, if present, is skipped.
pub(crate) fn decode(content: &[u8], options: ReadOptions) -> Result<TagData> {
	let footer_start = content
		.len()
		.checked_sub(APE_HEADER_SIZE as usize)
		.ok_or_else(|| decode_err!("APE tag is too small to hold a footer"))?;

	let footer = ApeHeader::parse(&mut &content[footer_start..])?;
	let Some(items_start) = content.len().checked_sub(footer.size as usize) else {
		decode_err!(@BAIL "APE tag is smaller than its footer claims");
	};

	log::debug!(
		"Decoding an APE tag, version: {}, items: {}",
		footer.version,
		footer.item_count
	);

	let mut reader = &content[items_start..footer_start];
	let mut data = TagData::new();

	for _ in 0..footer.item_count {
		// 4 byte size + 4 byte flags + 2 byte key + null terminator
		if reader.len() < 11 {
			log::warn!("APE tag ended before all items were read");
			break;
		}

		let Some(item) = read_item(&mut reader, options.parsing_mode)? else {
			continue;
		};

		if let Err(e) = apply_item(&mut data, item, options) {
			if options.parsing_mode == ParsingMode::Strict {
				return Err(e);
			}

			log::warn!("Skipping malformed APE item: {e}");
		}
	}

	Ok(data)
}

fn read_item(reader: &mut &[u8], parse_mode: ParsingMode) -> Result<Option<ApeItem>> {
	let value_size = reader.read_u32::<LittleEndian>()?;
	let flags = reader.read_u32::<LittleEndian>()?;

	let remaining = *reader;
	let Some(key_len) = remaining.iter().position(|b| *b == 0) else {
		decode_err!(@BAIL "APE tag item key has no terminator");
	};

	let key = utf8_decode(remaining[..key_len].to_vec())
		.map_err(|_| decode_err!("APE tag item contains a non UTF-8 key"))?;
	*reader = &remaining[key_len + 1..];

	if value_size as usize > reader.len() {
		err!(SizeMismatch);
	}

	let mut value = try_vec![0; value_size as usize];
	reader.read_exact(&mut value)?;

	let valid = (2..=255).contains(&key.len())
		&& key.bytes().all(|b| (0x20..=0x7E).contains(&b))
		&& !INVALID_KEYS.contains(&&*key.to_uppercase());
	if !valid {
		if parse_mode == ParsingMode::Strict {
			decode_err!(@BAIL "APE tag item contains an illegal key");
		}

		log::warn!("Skipping APE item with an invalid key \"{key}\"");
		return Ok(None);
	}

	let value = match (flags >> 1) & 3 {
		0 | 2 => ItemValue::Text(
			utf8_decode(value)
				.map_err(|_| decode_err!("Failed to convert APE text item into a UTF-8 string"))?,
		),
		1 => ItemValue::Binary(value),
		_ => decode_err!(@BAIL "APE tag item contains an invalid item type"),
	};

	Ok(Some(ApeItem { key, value }))
}

fn apply_item(data: &mut TagData, item: ApeItem, options: ReadOptions) -> Result<()> {
	let text = match item.value {
		ItemValue::Text(text) => text,
		ItemValue::Binary(content) => {
			match PictureType::from_ape_key(&item.key) {
				Some(pic_type) if options.read_pictures => {
					let picture = read_picture(pic_type, content)?;
					data.pictures.get_or_insert_with(Vec::new).push(picture);
				},
				Some(_) => {},
				None => log::trace!("Skipping binary APE item \"{}\"", item.key),
			}

			return Ok(());
		},
	};

	// APEv2 separates multiple values with nulls
	let text = text
		.split('\0')
		.map(str::trim)
		.filter(|value| !value.is_empty())
		.collect::<Vec<_>>()
		.join("/");

	if text.is_empty() {
		return Ok(());
	}

	let key = item.key.as_str();
	if key.eq_ignore_ascii_case(TRACK_KEY) || key.eq_ignore_ascii_case(DISC_KEY) {
		let (number_key, total_key) = if key.eq_ignore_ascii_case(TRACK_KEY) {
			(FieldKey::TrackNumber, FieldKey::TrackTotal)
		} else {
			(FieldKey::DiscNumber, FieldKey::DiscTotal)
		};

		let (number, total) = text.split_once('/').unwrap_or((text.as_str(), ""));
		for (key, value) in [(number_key, number), (total_key, total)] {
			if !value.trim().is_empty() {
				data.set_field(key, value.trim());
			}
		}

		return Ok(());
	}

	if key.eq_ignore_ascii_case(RATING_KEY) {
		let Ok(percent) = text.parse::<f32>() else {
			decode_err!(@BAIL "APE rating is not a number");
		};

		if percent > 0.0 {
			data.set_popularity(percent / 100.0);
		}

		return Ok(());
	}

	if key.eq_ignore_ascii_case(LYRICS_KEY) {
		data.set_lyrics(Lyrics::new(text));
		return Ok(());
	}

	match field_for_key(key) {
		Some(field) => data.set_field(field, text),
		None => data.set_additional_field(key, text),
	};

	Ok(())
}

fn read_picture(pic_type: PictureType, content: Vec<u8>) -> Result<Picture> {
	let Some(description_len) = content.iter().position(|b| *b == 0) else {
		decode_err!(@BAIL "APE picture has no description terminator");
	};

	let description = utf8_decode(content[..description_len].to_vec())?;
	let data = content[description_len + 1..].to_vec();

	Ok(Picture::new(
		pic_type,
		None,
		(!description.is_empty()).then_some(description),
		data,
	))
}

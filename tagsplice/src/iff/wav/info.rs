//! RIFF `LIST INFO`, the native tag of WAV files
//!
//! The tag is a `LIST` chunk of type `INFO`, holding one sub-chunk per item. Every value is a
//! null-terminated string, and sub-chunks are padded to even sizes. There is no standard text
//! encoding, UTF-8 is written and anything that isn't valid UTF-8 is read as Latin-1.

use crate::config::ReadOptions;
use crate::error::Result;
use crate::iff::chunk::{CHUNK_HEADER_SIZE, Chunks};
use crate::macros::{decode_err, err, parse_mode_choice};
use crate::tag::{FieldKey, TagData, leading_number};
use crate::util::text::{latin1_decode, trim_end_nulls};

use std::io::{Cursor, Write};

use byteorder::{LittleEndian, WriteBytesExt};

const ITEM_KEYS: [(&str, FieldKey); 9] = [
	("INAM", FieldKey::Title),
	("IART", FieldKey::Artist),
	("IPRD", FieldKey::Album),
	("ICMT", FieldKey::Comment),
	("IGNR", FieldKey::Genre),
	("ICOP", FieldKey::Copyright),
	("ICRD", FieldKey::RecordingDate),
	("IMUS", FieldKey::Composer),
	("ITRK", FieldKey::TrackNumber),
];

fn field_for_key(key: &str) -> Option<FieldKey> {
	ITEM_KEYS.iter().find(|(k, _)| *k == key).map(|(_, f)| *f)
}

pub(crate) fn verify_key(key: &str) -> bool {
	key.len() == 4
		&& key
			.chars()
			.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

/// Decode an entire `LIST` chunk, header included
pub(crate) fn decode(content: &[u8], options: ReadOptions) -> Result<TagData> {
	let parse_mode = options.parsing_mode;

	if content.len() < 12 || &content[..4] != b"LIST" || &content[8..12] != b"INFO" {
		decode_err!(@BAIL Wav, "Expected a LIST INFO chunk");
	}

	let list_size = u64::from(u32::from_le_bytes([
		content[4], content[5], content[6], content[7],
	]));
	if list_size < 4 || CHUNK_HEADER_SIZE + list_size > content.len() as u64 {
		err!(SizeMismatch);
	}

	let items = &content[12..(CHUNK_HEADER_SIZE + list_size) as usize];
	let mut reader = Cursor::new(items);
	let mut chunks = Chunks::<LittleEndian>::new(items.len() as u64);

	let mut data = TagData::new();
	while chunks.next(&mut reader)? {
		let Some(key) = std::str::from_utf8(&chunks.fourcc)
			.ok()
			.filter(|key| verify_key(key))
			.map(str::to_owned)
		else {
			parse_mode_choice!(
				parse_mode,
				STRICT: decode_err!(@BAIL Wav, "RIFF INFO item key contains invalid characters"),
				DEFAULT: {
					log::warn!("Skipping RIFF INFO item with an invalid key");
					chunks.skip(&mut reader)?;
					continue;
				}
			);
		};

		let value = match chunks.content(&mut reader) {
			Ok(value) => value,
			Err(e) => {
				parse_mode_choice!(
					parse_mode,
					STRICT: return Err(e),
					DEFAULT: {
						log::warn!("RIFF INFO item \"{key}\" is truncated, discarding the rest of the list");
						break;
					}
				);
			},
		};

		let mut value = match String::from_utf8(value) {
			Ok(value) => value,
			Err(e) => {
				log::debug!("RIFF INFO item \"{key}\" isn't UTF-8, reading as Latin-1");
				latin1_decode(e.as_bytes())
			},
		};
		trim_end_nulls(&mut value);

		apply_item(&mut data, &key, value);
	}

	Ok(data)
}

fn apply_item(data: &mut TagData, key: &str, value: String) {
	match field_for_key(key) {
		Some(FieldKey::TrackNumber) => {
			let (number, total) = value.split_once('/').unwrap_or((value.as_str(), ""));
			if let Some(number) = leading_number(number) {
				data.set_track(number);
			}
			if let Some(total) = leading_number(total) {
				data.set_track_total(total);
			}
		},
		Some(field) => {
			data.set_field(field, value);
		},
		None => {
			data.set_additional_field(key, value);
		},
	}
}

/// Encode a full `LIST` chunk
///
/// Additional fields are only kept if their key is a valid INFO chunk ID, everything that
/// can't be represented (pictures, chapters, lyrics, ...) is dropped.
pub(crate) fn encode(data: &TagData) -> Result<Vec<u8>> {
	let mut items = Vec::new();

	for (key, field) in ITEM_KEYS {
		if field == FieldKey::TrackNumber {
			continue;
		}

		if let Some(value) = data.field(field) {
			write_item(&mut items, key, value)?;
		}
	}

	if let Some(track) = data.field(FieldKey::TrackNumber) {
		let value = match data.field(FieldKey::TrackTotal) {
			Some(total) => format!("{track}/{total}"),
			None => track.to_owned(),
		};
		write_item(&mut items, "ITRK", &value)?;
	}

	for (key, value) in data.additional_fields() {
		if !verify_key(key) || field_for_key(key).is_some() {
			log::debug!("Dropping \"{key}\", it can't be represented in RIFF INFO");
			continue;
		}

		write_item(&mut items, key, value)?;
	}

	if items.is_empty() {
		log::debug!("No items to write, removing RIFF INFO list");
		return Ok(items);
	}

	let Ok(list_size) = u32::try_from(items.len() + 4) else {
		err!(TooMuchData);
	};

	let mut list = Vec::with_capacity(items.len() + 12);
	list.write_all(b"LIST")?;
	list.write_u32::<LittleEndian>(list_size)?;
	list.write_all(b"INFO")?;
	list.extend(items);

	log::debug!("Created RIFF INFO list, size: {list_size} bytes");
	Ok(list)
}

fn write_item(items: &mut Vec<u8>, key: &str, value: &str) -> Result<()> {
	if value.is_empty() {
		return Ok(());
	}

	// Account for the null terminator
	let Ok(len) = u32::try_from(value.len() + 1) else {
		err!(TooMuchData);
	};

	items.write_all(key.as_bytes())?;
	items.write_u32::<LittleEndian>(len)?;
	items.write_all(value.as_bytes())?;
	items.push(0);

	if len % 2 != 0 {
		items.push(0);
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::{decode, encode};
	use crate::config::{ParsingMode, ReadOptions};
	use crate::tag::{FieldKey, TagData};

	#[test_log::test]
	fn round_trip() {
		let mut data = TagData::new();
		data.set_title("Title")
			.set_artist("Artist")
			.set_album("Album")
			.set_genre("Genre")
			.set_track(4)
			.set_track_total(9)
			.set_additional_field("ISFT", "Encoder");

		let encoded = encode(&data).unwrap();
		assert_eq!(&encoded[..4], b"LIST");
		assert_eq!(encoded.len() % 2, 0);

		assert_eq!(decode(&encoded, ReadOptions::new()).unwrap(), data);
	}

	#[test_log::test]
	fn values_are_padded() {
		let mut data = TagData::new();
		// "ab\0" needs a pad byte, "abc\0" doesn't
		data.set_title("ab").set_artist("abc");

		let encoded = encode(&data).unwrap();

		// LIST header + INFO + (8 + 4) + (8 + 4)
		assert_eq!(encoded.len(), 12 + 12 + 12);
		assert_eq!(&encoded[12..16], b"INAM");
		assert_eq!(&encoded[16..20], &3u32.to_le_bytes());
		assert_eq!(&encoded[20..24], b"ab\0\0");
	}

	#[test_log::test]
	fn unrepresentable_keys_are_dropped() {
		let mut data = TagData::new();
		data.set_additional_field("MOOD", "calm")
			.set_additional_field("lowercase", "no");

		let decoded = decode(&encode(&data).unwrap(), ReadOptions::new()).unwrap();
		assert_eq!(decoded.additional_fields().len(), 1);
		assert_eq!(decoded.additional_fields()["MOOD"], "calm");
	}

	#[test_log::test]
	fn latin1_fallback() {
		let mut list = b"LIST\x10\0\0\0INFOINAM\x04\0\0\0\xE9t\xE9\0".to_vec();
		let decoded = decode(&list, ReadOptions::new()).unwrap();
		assert_eq!(decoded.field(FieldKey::Title), Some("été"));

		// Invalid key
		list[12] = b'i';
		assert!(decode(&list, ReadOptions::new()).unwrap().is_empty());
		assert!(decode(&list, ReadOptions::new().parsing_mode(ParsingMode::Strict)).is_err());
	}

	#[test_log::test]
	fn not_a_list() {
		assert!(decode(b"LIST\x04\0\0\0adtl", ReadOptions::new()).is_err());
		assert!(decode(b"LIST\xFF\0\0\0INFO", ReadOptions::new()).is_err());
	}
}

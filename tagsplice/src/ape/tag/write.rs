use super::{DISC_KEY, LYRICS_KEY, RATING_KEY, TRACK_KEY, key_for_field};
use crate::ape::{APE_HEADER_SIZE, APE_PREAMBLE};
use crate::error::Result;
use crate::macros::err;
use crate::tag::{FieldKey, TagData};

use std::io::{Cursor, Seek, SeekFrom, Write};

use byteorder::{LittleEndian, WriteBytesExt};

const TEXT_ITEM: u32 = 0;
const BINARY_ITEM: u32 = 1 << 1;

/// Encode an APEv2 tag, with both a header and a footer
pub(crate) fn encode(data: &TagData) -> Result<Vec<u8>> {
	let mut tag_write = Cursor::new(Vec::<u8>::new());
	let mut item_count = 0_u32;

	let mut write_item = |key: &str, flags: u32, value: &[u8]| -> Result<()> {
		log::trace!("Writing APE item \"{key}\" ({} bytes)", value.len());

		let Ok(size) = u32::try_from(value.len()) else {
			err!(TooMuchData);
		};

		tag_write.write_u32::<LittleEndian>(size)?;
		tag_write.write_u32::<LittleEndian>(flags)?;
		tag_write.write_all(key.as_bytes())?;
		tag_write.write_u8(0)?;
		tag_write.write_all(value)?;

		item_count += 1;
		Ok(())
	};

	for (field, value) in data.fields() {
		if let Some(key) = key_for_field(field) {
			write_item(key, TEXT_ITEM, value.as_bytes())?;
		}
	}

	for (key, number_key, total_key) in [
		(TRACK_KEY, FieldKey::TrackNumber, FieldKey::TrackTotal),
		(DISC_KEY, FieldKey::DiscNumber, FieldKey::DiscTotal),
	] {
		let value = match (data.field(number_key), data.field(total_key)) {
			(Some(number), Some(total)) => format!("{number}/{total}"),
			(Some(number), None) => number.to_owned(),
			(None, Some(total)) => format!("0/{total}"),
			(None, None) => continue,
		};

		write_item(key, TEXT_ITEM, value.as_bytes())?;
	}

	if let Some(popularity) = data.field(FieldKey::Popularity) {
		let rating = popularity.trim().parse::<f32>().unwrap_or(0.0).clamp(0.0, 1.0);
		let percent = (rating * 100.0).round() as u8;
		write_item(RATING_KEY, TEXT_ITEM, percent.to_string().as_bytes())?;
	}

	for (key, value) in data.additional_fields() {
		write_item(key, TEXT_ITEM, value.as_bytes())?;
	}

	if let Some(lyrics) = data.lyrics() {
		write_item(LYRICS_KEY, TEXT_ITEM, lyrics.text.as_bytes())?;
	}

	let mut written_keys = Vec::new();
	for picture in data.pictures() {
		let Some(key) = picture.pic_type().as_ape_key() else {
			log::warn!(
				"APE can't store pictures of type {:?}, skipping",
				picture.pic_type()
			);
			continue;
		};

		// The key is the type, so there can only be one picture of each type
		if written_keys.contains(&key) {
			log::warn!("Discarding a duplicate APE picture \"{key}\"");
			continue;
		}
		written_keys.push(key);

		let mut value = Vec::new();
		value.extend_from_slice(picture.description().unwrap_or_default().as_bytes());
		value.push(0);
		value.extend_from_slice(picture.data());

		write_item(key, BINARY_ITEM, &value)?;
	}

	let size = tag_write.get_ref().len();
	if size as u64 + u64::from(APE_HEADER_SIZE) > u64::from(u32::MAX) {
		err!(TooMuchData);
	}

	let mut footer = [0_u8; APE_HEADER_SIZE as usize];
	let mut footer = Cursor::new(&mut footer[..]);

	footer.write_all(APE_PREAMBLE)?;
	// This is the APE tag version
	// Even if we read a v1 tag, we end up adding a header anyway
	footer.write_u32::<LittleEndian>(2000)?;
	// The total size includes the 32 bytes of the footer
	footer.write_u32::<LittleEndian>(size as u32 + APE_HEADER_SIZE)?;
	footer.write_u32::<LittleEndian>(item_count)?;
	// Bit 29 unset: this is the footer
	// Bit 30 set: tag contains a footer
	// Bit 31 set: tag contains a header
	footer.write_u32::<LittleEndian>((1_u32 << 30) | (1_u32 << 31))?;
	// The header/footer must end in 8 bytes of zeros
	footer.write_u64::<LittleEndian>(0)?;

	let mut tag_write = tag_write.into_inner();
	tag_write.extend_from_slice(footer.get_ref());

	// The header is exactly the same as the footer, except for the flags
	footer.seek(SeekFrom::Current(-12))?;
	// Bit 29 set: this is the header
	footer.write_u32::<LittleEndian>((1_u32 << 29) | (1_u32 << 30) | (1_u32 << 31))?;

	let header = footer.into_inner();
	tag_write.splice(0..0, header.iter().copied());

	log::debug!("Encoded an APE tag of {} bytes, {item_count} item(s)", tag_write.len());
	Ok(tag_write)
}

#[cfg(test)]
mod tests {
	use super::encode;
	use crate::ape::tag::decode;
	use crate::config::ReadOptions;
	use crate::picture::{Picture, PictureType};
	use crate::tag::items::{Lyrics, Timestamp};
	use crate::tag::TagData;

	#[test_log::test]
	fn round_trip() {
		let mut data = TagData::new();
		data.set_title("Title")
			.set_album_artist("Album Artist")
			.set_track(3)
			.set_track_total(12)
			.set_disc(2)
			.set_date(Timestamp::from_year(1999))
			.set_popularity(0.5)
			.set_additional_field("Mood", "calm")
			.set_lyrics(Lyrics::new("la la la"))
			.set_pictures(vec![Picture::new(
				PictureType::CoverBack,
				None,
				Some(String::from("back")),
				vec![0xFF, 0xD8, 0xFF, 0xE0],
			)]);

		let encoded = encode(&data).unwrap();

		// Header and footer only differ in their flags
		assert_eq!(&encoded[..8], b"APETAGEX");
		assert_eq!(&encoded[..20], &encoded[encoded.len() - 32..encoded.len() - 12]);

		let decoded = decode(&encoded, ReadOptions::new()).unwrap();
		assert_eq!(decoded, data);
	}

	#[test_log::test]
	fn duplicate_picture_types() {
		let picture = |byte| Picture::new(PictureType::CoverFront, None, None, vec![byte]);

		let mut data = TagData::new();
		data.set_pictures(vec![picture(1), picture(2)]);

		let decoded = decode(&encode(&data).unwrap(), ReadOptions::new()).unwrap();
		assert_eq!(decoded.pictures(), &[picture(1)]);
	}
}

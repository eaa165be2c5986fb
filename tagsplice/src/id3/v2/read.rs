use super::frame::{RawFrame, field_for_frame, read_frames};
use super::header::{ID3V2_HEADER_SIZE, Id3v2Header, Id3v2Version};
use super::synchsafe::{SynchsafeInteger, resynchronise};
use crate::config::{ParsingMode, ReadOptions};
use crate::error::Result;
use crate::id3::v1::GENRES;
use crate::macros::{decode_err, err};
use crate::picture::{MimeType, Picture, PictureType};
use crate::tag::items::{Chapter, Lyrics, Timestamp};
use crate::tag::{FieldKey, TagData};
use crate::util::text::{TextEncoding, decode_text};

use std::borrow::Cow;
use std::io::Read;

use byteorder::{BigEndian, ByteOrder, ReadBytesExt};

// Values spread over multiple frames, only known once every frame is read
#[derive(Default)]
struct PendingValues {
	// ID3v2.3 TYER + TDAT (DDMM) + TIME (HHMM)
	year: Option<u16>,
	day_month: Option<(u8, u8)>,
	hour_minute: Option<(u8, u8)>,
	chapters: Vec<Chapter>,
}

/// Decode a complete ID3v2 tag (header included)
///
/// Returns the values and the amount of padding after the frames.
pub(crate) fn decode(content: &[u8], options: ReadOptions) -> Result<(TagData, u64)> {
	let parse_mode = options.parsing_mode;

	let mut reader = content;
	let header = Id3v2Header::parse(&mut reader)?;
	log::debug!("Decoding an ID3v2 tag, version: {:?}", header.version);

	if header.flags.experimental {
		log::debug!("ID3v2 tag is marked as experimental");
	}

	let body_start = ID3V2_HEADER_SIZE as usize;
	let body_end = body_start + header.size as usize;
	let Some(body) = content.get(body_start..body_end) else {
		decode_err!(@BAIL "ID3v2 tag is smaller than its header claims");
	};

	// ID3v2.4 moved unsynchronisation to the frames
	let body = if header.flags.unsynchronisation && header.version < Id3v2Version::V4 {
		Cow::Owned(resynchronise(body))
	} else {
		Cow::Borrowed(body)
	};

	let body = if header.flags.extended_header {
		skip_extended_header(&body, header.version)?
	} else {
		&body[..]
	};

	let frame_unsynchronisation =
		header.version == Id3v2Version::V4 && header.flags.unsynchronisation;
	let (frames, padding) = read_frames(body, header.version, frame_unsynchronisation, parse_mode)?;

	let mut data = TagData::new();
	let mut pending = PendingValues::default();

	for frame in &frames {
		if let Err(e) = read_frame(&mut data, &mut pending, frame, header.version, options) {
			if parse_mode == ParsingMode::Strict {
				return Err(e);
			}

			log::warn!("Skipping malformed \"{}\" frame: {e}", frame.id);
		}
	}

	if let Some(year) = pending.year {
		if data.field(FieldKey::RecordingDate).is_none() {
			let mut date = Timestamp::from_year(year);
			if let Some((day, month)) = pending.day_month {
				date.month = Some(month);
				date.day = Some(day);

				if let Some((hour, minute)) = pending.hour_minute {
					date.hour = Some(hour);
					date.minute = Some(minute);
				}
			}

			data.set_date(date);
		}
	}

	if !pending.chapters.is_empty() {
		pending.chapters.sort_by_key(|chapter| chapter.start_ms);
		data.set_chapters(pending.chapters);
	}

	Ok((data, padding))
}

fn skip_extended_header(body: &[u8], version: Id3v2Version) -> Result<&[u8]> {
	if body.len() < 4 {
		err!(SizeMismatch);
	}

	let size = BigEndian::read_u32(&body[..4]);
	let skip = match version {
		// The size excludes itself
		Id3v2Version::V3 => size as usize + 4,
		_ => size.unsynch() as usize,
	};

	if skip < 6 || skip > body.len() {
		decode_err!(@BAIL "ID3v2 extended header has an invalid size");
	}

	Ok(&body[skip..])
}

fn read_frame(
	data: &mut TagData,
	pending: &mut PendingValues,
	frame: &RawFrame<'_>,
	version: Id3v2Version,
	options: ReadOptions,
) -> Result<()> {
	let content = &frame.content[..];

	match frame.id.as_str() {
		"TXXX" => {
			let (description, value) = read_extended_text(content)?;
			if !value.is_empty() {
				data.set_additional_field(description, value);
			}
		},
		"TRCK" | "TPOS" => {
			let (number_key, total_key) = if frame.id == "TRCK" {
				(FieldKey::TrackNumber, FieldKey::TrackTotal)
			} else {
				(FieldKey::DiscNumber, FieldKey::DiscTotal)
			};

			let text = read_text(content)?;
			let (number, total) = text.split_once('/').unwrap_or((text.as_str(), ""));
			for (key, value) in [(number_key, number), (total_key, total)] {
				if !value.trim().is_empty() {
					data.set_field(key, value.trim());
				}
			}
		},
		"TCON" => {
			let text = read_text(content)?;
			data.set_genre(resolve_genre(&text));
		},
		"TYER" => pending.year = read_text(content)?.trim().parse().ok(),
		"TDAT" => pending.day_month = read_pair(&read_text(content)?),
		"TIME" => pending.hour_minute = read_pair(&read_text(content)?),
		"COMM" => {
			let (_, _, text) = read_language_frame(content)?;
			if data.field(FieldKey::Comment).is_none() && !text.is_empty() {
				data.set_comment(text);
			}
		},
		"USLT" => {
			let (language, description, text) = read_language_frame(content)?;
			if data.lyrics().is_none() && !text.is_empty() {
				data.set_lyrics(Lyrics {
					language,
					description,
					text,
				});
			}
		},
		"APIC" => {
			if options.read_pictures {
				let picture = read_picture(content, version)?;
				data.pictures.get_or_insert_with(Vec::new).push(picture);
			}
		},
		"POPM" => {
			let mut reader = content;
			let _email = decode_text(&mut reader, TextEncoding::Latin1, true)?;
			let rating = reader.read_u8()?;

			if data.field(FieldKey::Popularity).is_none() && rating > 0 {
				data.set_popularity(f32::from(rating) / 255.0);
			}
		},
		"CHAP" => pending
			.chapters
			.push(read_chapter(content, version, options.parsing_mode)?),
		"CTOC" => {
			if let Some(description) = read_table_of_contents(content, version, options.parsing_mode)? {
				data.set_chapters_table_description(description);
			}
		},
		id if id.starts_with('T') => {
			let text = read_text(content)?;
			if text.is_empty() {
				return Ok(());
			}

			match field_for_frame(id) {
				Some(key) => data.set_field(key, text),
				None => data.set_additional_field(id, text),
			};
		},
		id => log::trace!("Skipping unsupported frame \"{id}\""),
	}

	Ok(())
}

fn read_encoding(reader: &mut &[u8]) -> Result<TextEncoding> {
	let encoding = reader.read_u8()?;
	TextEncoding::from_u8(encoding)
		.ok_or_else(|| decode_err!("Found invalid text encoding in an ID3v2 frame"))
}

fn read_text(content: &[u8]) -> Result<String> {
	let mut reader = content;
	let encoding = read_encoding(&mut reader)?;
	let text = decode_text(&mut reader, encoding, false)?;

	// ID3v2.4 separates multiple values with nulls
	let values = text
		.split('\0')
		.map(str::trim)
		.filter(|value| !value.is_empty())
		.collect::<Vec<_>>();

	Ok(values.join("/"))
}

fn read_extended_text(content: &[u8]) -> Result<(String, String)> {
	let mut reader = content;
	let encoding = read_encoding(&mut reader)?;

	let description = decode_text(&mut reader, encoding, true)?;
	let value = decode_text(&mut reader, encoding, false)?;

	Ok((description, value))
}

fn read_language_frame(content: &[u8]) -> Result<([u8; 3], String, String)> {
	let mut reader = content;
	let encoding = read_encoding(&mut reader)?;

	let mut language = [0; 3];
	reader.read_exact(&mut language)?;

	let description = decode_text(&mut reader, encoding, true)?;
	let text = decode_text(&mut reader, encoding, false)?;

	Ok((language, description, text))
}

fn read_picture(content: &[u8], version: Id3v2Version) -> Result<Picture> {
	let mut reader = content;
	let encoding = read_encoding(&mut reader)?;

	let mime_type = if version == Id3v2Version::V2 {
		// ID3v2.2 uses a 3 character image format instead of a MIME type
		let mut format = [0; 3];
		reader.read_exact(&mut format)?;
		format.make_ascii_uppercase();

		match &format {
			b"PNG" => Some(MimeType::Png),
			b"JPG" => Some(MimeType::Jpeg),
			b"GIF" => Some(MimeType::Gif),
			b"BMP" => Some(MimeType::Bmp),
			b"TIF" => Some(MimeType::Tiff),
			_ => None,
		}
	} else {
		let mime = decode_text(&mut reader, TextEncoding::Latin1, true)?;
		(!mime.is_empty()).then(|| MimeType::from_str(&mime))
	};

	let pic_type = PictureType::from_u8(reader.read_u8()?);
	let description = decode_text(&mut reader, encoding, true)?;

	Ok(Picture::new(
		pic_type,
		mime_type,
		(!description.is_empty()).then_some(description),
		reader.to_vec(),
	))
}

fn read_chapter(content: &[u8], version: Id3v2Version, parse_mode: ParsingMode) -> Result<Chapter> {
	let mut reader = content;
	let element_id = decode_text(&mut reader, TextEncoding::Latin1, true)?;
	log::trace!("Reading chapter \"{element_id}\"");

	let start_ms = reader.read_u32::<BigEndian>()?;
	let end_ms = reader.read_u32::<BigEndian>()?;

	// Byte offsets, unused
	let _start_offset = reader.read_u32::<BigEndian>()?;
	let _end_offset = reader.read_u32::<BigEndian>()?;

	let mut chapter = Chapter {
		start_ms,
		end_ms,
		..Chapter::default()
	};

	let (frames, _) = read_frames(reader, version, false, parse_mode)?;
	for frame in frames {
		match frame.id.as_str() {
			"TIT2" => chapter.title = Some(read_text(&frame.content)?),
			"TIT3" => chapter.subtitle = Some(read_text(&frame.content)?),
			_ => {},
		}
	}

	Ok(chapter)
}

fn read_table_of_contents(
	content: &[u8],
	version: Id3v2Version,
	parse_mode: ParsingMode,
) -> Result<Option<String>> {
	let mut reader = content;
	let _element_id = decode_text(&mut reader, TextEncoding::Latin1, true)?;

	let flags = reader.read_u8()?;
	if flags & 0x02 == 0 {
		// Only the top level table describes the chapters as a whole
		return Ok(None);
	}

	let entry_count = reader.read_u8()?;
	for _ in 0..entry_count {
		let _child = decode_text(&mut reader, TextEncoding::Latin1, true)?;
	}

	let (frames, _) = read_frames(reader, version, false, parse_mode)?;
	frames
		.iter()
		.find(|frame| frame.id == "TIT2")
		.map(|frame| read_text(&frame.content))
		.transpose()
}

// "DDMM" or "HHMM"
fn read_pair(text: &str) -> Option<(u8, u8)> {
	let text = text.trim();
	if text.len() != 4 || !text.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}

	Some((text[..2].parse().ok()?, text[2..].parse().ok()?))
}

// Genres may be stored as "(17)", "17", or "(17)Rock"
fn resolve_genre(text: &str) -> String {
	let refined = text
		.strip_prefix('(')
		.and_then(|rest| rest.split_once(')'));

	let (index, suffix) = match refined {
		Some((index, suffix)) => (index, suffix),
		None => (text, ""),
	};

	if !suffix.is_empty() {
		return suffix.to_owned();
	}

	match index {
		"RX" => return String::from("Remix"),
		"CR" => return String::from("Cover"),
		_ => {},
	}

	index
		.parse::<usize>()
		.ok()
		.and_then(|index| GENRES.get(index))
		.map_or_else(|| text.to_owned(), |genre| (*genre).to_owned())
}

#[cfg(test)]
mod tests {
	use super::{decode, resolve_genre};
	use crate::config::ReadOptions;
	use crate::tag::{FieldKey, TagSystemView};

	fn v3_tag(frames: &[(&[u8; 4], &[u8])]) -> Vec<u8> {
		let mut body = Vec::new();
		for (id, content) in frames {
			body.extend_from_slice(*id);
			body.extend_from_slice(&(content.len() as u32).to_be_bytes());
			body.extend_from_slice(&[0, 0]);
			body.extend_from_slice(content);
		}
		body.extend_from_slice(&[0; 16]);

		let mut tag = b"ID3\x03\x00\x00".to_vec();
		let size = body.len() as u32;
		tag.extend([
			(size >> 21) as u8 & 0x7F,
			(size >> 14) as u8 & 0x7F,
			(size >> 7) as u8 & 0x7F,
			size as u8 & 0x7F,
		]);
		tag.extend(body);
		tag
	}

	#[test_log::test]
	fn id3v23_frames() {
		let tag = v3_tag(&[
			(b"TIT2", b"\x00Title"),
			(b"TRCK", b"\x005/10"),
			(b"TYER", b"\x001999"),
			(b"TDAT", b"\x001402"),
			(b"TCON", b"\x00(17)"),
			(b"TXXX", b"\x00MOOD\x00calm"),
			(b"TSSE", b"\x00Encoder"),
			(b"COMM", b"\x00engdesc\x00A comment"),
		]);

		let (data, padding) = decode(&tag, ReadOptions::new()).unwrap();
		let view = crate::tag::MetadataTag::new(crate::tag::TagFormat::Id3v2, data.clone());

		assert_eq!(padding, 16);
		assert_eq!(data.field(FieldKey::Title), Some("Title"));
		assert_eq!(view.track(), Some(5));
		assert_eq!(view.track_total(), Some(10));
		assert_eq!(data.field(FieldKey::RecordingDate), Some("1999-02-14"));
		assert_eq!(data.field(FieldKey::Genre), Some("Rock"));
		assert_eq!(data.field(FieldKey::Comment), Some("A comment"));
		assert_eq!(data.additional_fields().get("MOOD").map(String::as_str), Some("calm"));
		assert_eq!(data.additional_fields().get("TSSE").map(String::as_str), Some("Encoder"));
	}

	#[test_log::test]
	fn utf16_text() {
		let tag = v3_tag(&[(b"TPE1", b"\x01\xFF\xFEA\x00B\x00")]);
		let (data, _) = decode(&tag, ReadOptions::new()).unwrap();
		assert_eq!(data.field(FieldKey::Artist), Some("AB"));
	}

	#[test_log::test]
	fn genres() {
		assert_eq!(resolve_genre("(8)"), "Jazz");
		assert_eq!(resolve_genre("8"), "Jazz");
		assert_eq!(resolve_genre("(8)Smooth Jazz"), "Smooth Jazz");
		assert_eq!(resolve_genre("Polka"), "Polka");
		assert_eq!(resolve_genre("(RX)"), "Remix");
	}
}

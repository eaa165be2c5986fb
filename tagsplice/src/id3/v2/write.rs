use super::frame::TEXT_FRAME_MAPPINGS;
use super::synchsafe::SynchsafeInteger;
use crate::config::WriteOptions;
use crate::error::{ErrorKind, Result, SpliceError};
use crate::macros::err;
use crate::picture::Picture;
use crate::tag::items::Chapter;
use crate::tag::{FieldKey, TagData};
use crate::util::text::{TextEncoding, latin1_encode_lossy};

use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};

const UTF8: u8 = TextEncoding::UTF8 as u8;

/// Encode an ID3v2.4 tag
///
/// All text is written as UTF-8, and frames are written in a fixed order so that encoding the
/// same [`TagData`] twice produces identical bytes.
pub(crate) fn encode(data: &TagData, options: WriteOptions) -> Result<Vec<u8>> {
	let mut frames = Vec::new();

	for (id, key) in TEXT_FRAME_MAPPINGS {
		if let Some(value) = data.field(key) {
			write_text_frame(&mut frames, id, value)?;
		}
	}

	for (id, number_key, total_key) in [
		("TRCK", FieldKey::TrackNumber, FieldKey::TrackTotal),
		("TPOS", FieldKey::DiscNumber, FieldKey::DiscTotal),
	] {
		let value = match (data.field(number_key), data.field(total_key)) {
			(Some(number), Some(total)) => format!("{number}/{total}"),
			(Some(number), None) => number.to_owned(),
			(None, Some(total)) => format!("0/{total}"),
			(None, None) => continue,
		};

		write_text_frame(&mut frames, id, &value)?;
	}

	if let Some(comment) = data.field(FieldKey::Comment) {
		write_language_frame(&mut frames, "COMM", *b"XXX", "", comment)?;
	}

	if let Some(popularity) = data.field(FieldKey::Popularity) {
		let rating = popularity.trim().parse::<f32>().unwrap_or(0.0).clamp(0.0, 1.0);

		let mut content = vec![0]; // No email
		content.push((rating * 255.0).round() as u8);
		write_frame(&mut frames, "POPM", &content)?;
	}

	for (key, value) in data.additional_fields() {
		if is_text_frame_id(key) {
			write_text_frame(&mut frames, key, value)?;
			continue;
		}

		let mut content = vec![UTF8];
		content.extend_from_slice(key.as_bytes());
		content.push(0);
		content.extend_from_slice(value.as_bytes());
		write_frame(&mut frames, "TXXX", &content)?;
	}

	if let Some(lyrics) = data.lyrics() {
		write_language_frame(
			&mut frames,
			"USLT",
			lyrics.language,
			&lyrics.description,
			&lyrics.text,
		)?;
	}

	for picture in data.pictures() {
		write_frame(&mut frames, "APIC", &picture_content(picture)?)?;
	}

	write_chapters(&mut frames, data)?;

	let padding = options.preferred_padding.unwrap_or(0) as usize;
	let size = u32::try_from(frames.len() + padding)
		.map_err(|_| SpliceError::new(ErrorKind::TooMuchData))?
		.synch()?;

	let mut tag = Vec::with_capacity(10 + frames.len() + padding);
	tag.write_all(b"ID3")?;
	tag.write_all(&[4, 0, 0])?;
	tag.write_u32::<BigEndian>(size)?;
	tag.extend(frames);
	tag.resize(tag.len() + padding, 0);

	log::debug!("Encoded an ID3v2.4 tag of {} bytes ({padding} padding)", tag.len());
	Ok(tag)
}

// Only 4 character text frame IDs can be written as-is, the rest goes in TXXX
fn is_text_frame_id(key: &str) -> bool {
	key.len() == 4
		&& key != "TXXX"
		&& key.starts_with('T')
		&& key
			.bytes()
			.all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

fn write_frame(writer: &mut Vec<u8>, id: &str, content: &[u8]) -> Result<()> {
	let size = u32::try_from(content.len())
		.map_err(|_| SpliceError::new(ErrorKind::TooMuchData))?
		.synch()?;

	log::trace!("Writing frame \"{id}\" ({} bytes)", content.len());

	writer.write_all(id.as_bytes())?;
	writer.write_u32::<BigEndian>(size)?;
	writer.write_u16::<BigEndian>(0)?;
	writer.write_all(content)?;
	Ok(())
}

fn write_text_frame(writer: &mut Vec<u8>, id: &str, value: &str) -> Result<()> {
	let mut content = Vec::with_capacity(value.len() + 1);
	content.push(UTF8);
	content.extend_from_slice(value.as_bytes());
	write_frame(writer, id, &content)
}

fn write_language_frame(
	writer: &mut Vec<u8>,
	id: &str,
	language: [u8; 3],
	description: &str,
	text: &str,
) -> Result<()> {
	let mut content = vec![UTF8];
	content.extend_from_slice(&language);
	content.extend_from_slice(description.as_bytes());
	content.push(0);
	content.extend_from_slice(text.as_bytes());
	write_frame(writer, id, &content)
}

fn picture_content(picture: &Picture) -> Result<Vec<u8>> {
	let mut content = vec![UTF8];

	if let Some(mime_type) = picture.mime_type() {
		content.extend(latin1_encode_lossy(mime_type.as_str()));
	}
	content.push(0);

	content.write_u8(picture.pic_type().as_u8())?;
	content.extend_from_slice(picture.description().unwrap_or_default().as_bytes());
	content.push(0);
	content.extend_from_slice(picture.data());

	Ok(content)
}

fn write_chapters(writer: &mut Vec<u8>, data: &TagData) -> Result<()> {
	let chapters = data.chapters();
	if chapters.is_empty() {
		return Ok(());
	}

	let Ok(entry_count) = u8::try_from(chapters.len()) else {
		err!(TooMuchData);
	};

	let mut toc = b"toc\0".to_vec();
	// Top level + ordered
	toc.push(0x03);
	toc.push(entry_count);
	for index in 0..chapters.len() {
		toc.extend_from_slice(format!("chp{index}").as_bytes());
		toc.push(0);
	}

	if let Some(description) = data.chapters_table_description() {
		write_text_frame(&mut toc, "TIT2", description)?;
	}

	write_frame(writer, "CTOC", &toc)?;

	for (index, chapter) in chapters.iter().enumerate() {
		write_frame(writer, "CHAP", &chapter_content(index, chapter)?)?;
	}

	Ok(())
}

fn chapter_content(index: usize, chapter: &Chapter) -> Result<Vec<u8>> {
	let mut content = format!("chp{index}").into_bytes();
	content.push(0);

	content.write_u32::<BigEndian>(chapter.start_ms)?;
	content.write_u32::<BigEndian>(chapter.end_ms)?;
	// Byte offsets are unknown
	content.write_u32::<BigEndian>(u32::MAX)?;
	content.write_u32::<BigEndian>(u32::MAX)?;

	if let Some(title) = &chapter.title {
		write_text_frame(&mut content, "TIT2", title)?;
	}

	if let Some(subtitle) = &chapter.subtitle {
		write_text_frame(&mut content, "TIT3", subtitle)?;
	}

	Ok(content)
}

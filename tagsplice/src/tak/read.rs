use super::TAK_MAGIC;
use super::properties::{STREAM_INFO_SIZE, StreamInfo};
use crate::config::ReadOptions;
use crate::error::Result;
use crate::file::{AudioRegion, ContainerLayout, FileType};
use crate::locate::{leading_id3v2, trailing_tags};
use crate::macros::{decode_err, parse_mode_choice, try_vec};
use crate::tag::TagFormat;
use crate::util::io::SeekStreamLen;

use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};

const BLOCK_END: u32 = 0;
const BLOCK_STREAM_INFO: u32 = 1;
const BLOCK_ENCODER_INFO: u32 = 4;

pub(crate) fn read_layout<R>(reader: &mut R, options: ReadOptions) -> Result<ContainerLayout>
where
	R: Read + Seek,
{
	let mut layout = ContainerLayout::new(FileType::Tak);
	layout.add_slot(TagFormat::Ape, None);

	let stream_start = leading_id3v2(reader, &mut layout, options)?;

	let mut magic = [0; 4];
	reader.read_exact(&mut magic)?;
	if &magic != TAK_MAGIC {
		decode_err!(@BAIL Tak, "File doesn't contain a \"tBaK\" signature");
	}

	let stream_info = read_metadata_blocks(reader, options)?;

	let stream_end = trailing_tags(reader, &mut layout, stream_start + 4, options)?;
	layout.audio = AudioRegion {
		offset: stream_start,
		size: stream_end - stream_start,
	};

	let parse_mode = options.parsing_mode;
	if options.read_properties {
		match stream_info {
			Some(info) => {
				let file_length = reader.stream_len_hack()?;
				layout.properties = info.properties(layout.audio.size, file_length);
			},
			None => parse_mode_choice!(
				parse_mode,
				STRICT: decode_err!(@BAIL Tak, "File doesn't contain a stream info block"),
				DEFAULT: log::warn!("No stream info block found, unable to read properties")
			),
		}
	}

	Ok(layout)
}

fn read_metadata_blocks<R>(reader: &mut R, options: ReadOptions) -> Result<Option<StreamInfo>>
where
	R: Read + Seek,
{
	let parse_mode = options.parsing_mode;
	let stream_len = reader.stream_len_hack()?;
	let mut stream_info = None;

	loop {
		let header = reader.read_u32::<LittleEndian>()?;
		let block_type = header & 0x7F;
		let block_size = header >> 8;

		if block_type == BLOCK_END {
			break;
		}

		let content_start = reader.stream_position()?;
		let content_end = content_start + u64::from(block_size);
		if content_end > stream_len {
			parse_mode_choice!(
				parse_mode,
				STRICT: decode_err!(@BAIL Tak, "Metadata block extends past the end of the file"),
				DEFAULT: {
					log::warn!("Metadata block extends past the end of the file, stopping");
					break;
				}
			);
		}

		log::trace!("Metadata block {block_type} @ {content_start}, size: {block_size}");

		match block_type {
			BLOCK_STREAM_INFO if options.read_properties && stream_info.is_none() => {
				let mut content = try_vec![0; block_size.min(STREAM_INFO_SIZE) as usize];
				reader.read_exact(&mut content)?;
				stream_info = Some(StreamInfo::parse(&content)?);
			},
			BLOCK_ENCODER_INFO if block_size >= 4 => {
				let version = reader.read_u32::<LittleEndian>()?;
				log::debug!(
					"Encoded with TAK {}.{}.{}",
					(version >> 16) & 0xFF,
					(version >> 8) & 0xFF,
					version & 0xFF
				);
			},
			_ => {},
		}

		reader.seek(SeekFrom::Start(content_end))?;
	}

	Ok(stream_info)
}

#[cfg(test)]
mod tests {
	use super::read_layout;
	use crate::config::{ParsingMode, ReadOptions, WriteOptions};
	use crate::tag::{TagData, TagFormat, TagSystemView, TagType};
	use crate::tak::properties::tests::stream_info;

	use std::io::Cursor;

	fn block(block_type: u32, content: &[u8]) -> Vec<u8> {
		let mut block = ((content.len() as u32) << 8 | block_type).to_le_bytes().to_vec();
		block.extend_from_slice(content);
		block
	}

	fn tak(frames: &[u8]) -> Vec<u8> {
		let mut file = b"tBaK".to_vec();
		file.extend(block(1, &stream_info(44100 * 2, 44100, 16, 2)));
		file.extend(block(4, &0x0002_0301u32.to_le_bytes()));
		file.extend(block(0, &[]));
		file.extend_from_slice(frames);
		file
	}

	#[test_log::test]
	fn untagged() {
		let file = tak(&[0x55; 200]);
		let layout = read_layout(&mut Cursor::new(&file), ReadOptions::new()).unwrap();

		assert_eq!(layout.audio_region().offset, 0);
		assert_eq!(layout.audio_region().size, file.len() as u64);
		assert_eq!(layout.properties().sample_rate(), Some(44100));
		assert_eq!(layout.properties().channels(), Some(2));

		// Only APE can be added
		let zone = layout.plan().zone("ape").unwrap();
		assert!(zone.is_insertion_point());
		assert!(layout.plan().zone("id3v1").is_none());
	}

	#[test_log::test]
	fn leading_id3v2_and_ape() {
		let mut data = TagData::new();
		data.set_title("Title");

		let id3v2 = TagFormat::Id3v2.encode(&data, WriteOptions::new()).unwrap();
		let ape = TagFormat::Ape.encode(&data, WriteOptions::new()).unwrap();

		let mut file = id3v2.clone();
		file.extend(tak(&[0x55; 200]));
		file.extend_from_slice(&ape);

		let layout = read_layout(&mut Cursor::new(&file), ReadOptions::new()).unwrap();

		let audio = layout.audio_region();
		assert_eq!(audio.offset, id3v2.len() as u64);
		assert_eq!(audio.offset + audio.size, (file.len() - ape.len()) as u64);

		assert!(layout.tag(TagType::Id3v2).unwrap().exists());
		assert_eq!(layout.tag(TagType::Ape).unwrap().title().as_deref(), Some("Title"));
	}

	#[test_log::test]
	fn not_tak() {
		let file = b"fLaC\0\0\0\0".to_vec();
		assert!(read_layout(&mut Cursor::new(&file), ReadOptions::new()).is_err());
	}

	#[test_log::test]
	fn missing_stream_info() {
		let mut file = b"tBaK".to_vec();
		file.extend(block(0, &[]));
		file.extend_from_slice(&[0; 16]);

		let layout = read_layout(&mut Cursor::new(&file), ReadOptions::new()).unwrap();
		assert_eq!(layout.properties().sample_rate(), None);

		let strict = ReadOptions::new().parsing_mode(ParsingMode::Strict);
		assert!(read_layout(&mut Cursor::new(&file), strict).is_err());
	}
}

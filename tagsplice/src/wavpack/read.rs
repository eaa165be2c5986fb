use super::WAVPACK_MAGIC;
use super::properties::{StreamInfo, read_v3, read_v4};
use crate::config::ReadOptions;
use crate::error::Result;
use crate::file::{AudioRegion, ContainerLayout, FileType};
use crate::iff::chunk::Chunks;
use crate::iff::wav::FmtChunk;
use crate::iff::wav::read::verify_wav;
use crate::locate::trailing_tags;
use crate::macros::decode_err;
use crate::tag::TagFormat;
use crate::util::io::SeekStreamLen;

use std::io::{Read, Seek, SeekFrom};

use byteorder::LittleEndian;

/// The size of a v4 block header
const BLOCK_HEADER_SIZE: u64 = 32;
/// The part of a v3 header needed for the stream info
const V3_HEADER_SIZE: usize = 20;

pub(crate) fn read_layout<R>(reader: &mut R, options: ReadOptions) -> Result<ContainerLayout>
where
	R: Read + Seek,
{
	let mut layout = ContainerLayout::new(FileType::WavPack);
	layout.add_slot(TagFormat::Ape, None);
	layout.add_slot(TagFormat::Id3v1, None);

	let start = reader.stream_position()?;

	let mut magic = [0; 4];
	reader.read_exact(&mut magic)?;
	reader.seek(SeekFrom::Start(start))?;

	let (audio_offset, v3_info) = match &magic {
		WAVPACK_MAGIC => (start, None),
		b"RIFF" => {
			log::debug!("Found a legacy (v3) WavPack file");
			let (offset, info) = read_v3_layout(reader, options)?;
			(offset, Some(info))
		},
		_ => decode_err!(@BAIL WavPack, "File doesn't start with a WavPack block"),
	};

	let audio_end = trailing_tags(reader, &mut layout, audio_offset + BLOCK_HEADER_SIZE, options)?;
	layout.audio = AudioRegion {
		offset: audio_offset,
		size: audio_end - audio_offset,
	};

	if options.read_properties {
		let info = match v3_info {
			Some(info) => info,
			None => read_v4(reader, audio_offset, audio_end, options.parsing_mode)?,
		};

		let file_length = reader.stream_len_hack()?;
		layout.properties = info.properties(layout.audio.size, file_length);
	}

	Ok(layout)
}

// Returns the offset of the WavPack header within the `data` chunk, which is where the audio starts
fn read_v3_layout<R>(reader: &mut R, options: ReadOptions) -> Result<(u64, StreamInfo)>
where
	R: Read + Seek,
{
	let start = reader.stream_position()?;
	let riff_size = verify_wav(reader)?;
	let riff_end = reader.stream_len_hack()?.min(start + 8 + u64::from(riff_size));

	let mut fmt = None;
	let mut chunks = Chunks::<LittleEndian>::new(riff_end.saturating_sub(reader.stream_position()?));
	while chunks.next(reader)? {
		match &chunks.fourcc {
			b"fmt " if fmt.is_none() => {
				fmt = Some(FmtChunk::parse(&chunks.content(reader)?)?);
			},
			b"data" => {
				let Some(fmt) = fmt else {
					decode_err!(@BAIL WavPack, "Found a \"data\" chunk before the \"fmt \" chunk");
				};

				let offset = chunks.content_offset();

				let mut header = [0; V3_HEADER_SIZE];
				reader.read_exact(&mut header)?;

				let info = if options.read_properties {
					read_v3(&header, fmt.sample_rate)?
				} else {
					StreamInfo::default()
				};

				if &header[..4] != WAVPACK_MAGIC {
					decode_err!(@BAIL WavPack, "RIFF file doesn't contain a WavPack stream");
				}

				return Ok((offset, info));
			},
			_ => chunks.skip(reader)?,
		}
	}

	decode_err!(@BAIL WavPack, "RIFF file doesn't contain a \"data\" chunk")
}

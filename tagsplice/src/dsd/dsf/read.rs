use super::properties::DsfFormat;
use super::{
	DATA_MAGIC, DSD_MAGIC, FILE_SIZE_OFFSET, FMT_CHUNK_SIZE, FMT_MAGIC, HEADER_SIZE,
	METADATA_POINTER_OFFSET, TrailingId3,
};
use crate::config::ReadOptions;
use crate::error::{Result, SpliceError};
use crate::file::{AudioRegion, ContainerLayout, FileType};
use crate::macros::{decode_err, parse_mode_choice, try_vec};
use crate::surgery::{EmbeddingAdapter, IndexPatch, PatchWidth, SizeMode, SizePatch, Zone};
use crate::tag::{TagFormat, TagType};
use crate::util::io::SeekStreamLen;

use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};

/// Chunk ID + chunk size
const CHUNK_HEADER_SIZE: u64 = 12;

pub(crate) fn read_layout<R>(reader: &mut R, options: ReadOptions) -> Result<ContainerLayout>
where
	R: Read + Seek,
{
	// All offsets in the header are absolute
	reader.rewind()?;
	let file_len = reader.stream_len_hack()?;

	let metadata_pointer = read_header(reader)?;
	let format = read_format_chunk(reader, options)?;

	let mut data_magic = [0; 4];
	reader.read_exact(&mut data_magic)?;
	if &data_magic != DATA_MAGIC {
		decode_err!(@BAIL Dsf, "Expected a \"data\" chunk");
	}

	let data_size = reader.read_u64::<LittleEndian>()?;
	let audio_offset = HEADER_SIZE + FMT_CHUNK_SIZE + CHUNK_HEADER_SIZE;
	let audio_size = data_size
		.saturating_sub(CHUNK_HEADER_SIZE)
		.min(file_len.saturating_sub(audio_offset));
	let audio_end = audio_offset + audio_size;

	let mut layout = ContainerLayout::new(FileType::Dsf);
	layout.audio = AudioRegion {
		offset: audio_offset,
		size: audio_size,
	};

	let zone_name = TagType::Id3v2.zone_name();
	let mut existing = (metadata_pointer != 0).then_some(metadata_pointer);

	if let Some(pointer) = existing {
		if pointer > file_len {
			return Err(SpliceError::truncated(pointer, file_len));
		}

		if pointer < audio_end {
			let parse_mode = options.parsing_mode;
			parse_mode_choice!(
				parse_mode,
				RELAXED: {
					log::warn!("Metadata pointer ({pointer}) points into the audio data, ignoring it");
					existing = None;
				},
				DEFAULT: decode_err!(@BAIL Dsf, "Metadata pointer points into the audio data")
			);
		}
	}

	match existing {
		Some(pointer) => {
			log::debug!("Found an ID3v2 tag at {pointer}");

			let size = file_len - pointer;
			layout.plan.add_zone(pointer, size, zone_name)?;
			layout.read_tag(reader, TagFormat::Id3v2, pointer, size, options)?;
		},
		None => layout.plan.add(Zone::new(zone_name, file_len, 0))?,
	}

	let tag_offset = existing.unwrap_or(file_len);
	layout.plan.add_size(
		SizePatch::new(FILE_SIZE_OFFSET, PatchWidth::U64, zone_name)
			.mode(SizeMode::DeltaAdd)
			.value(file_len),
	);
	layout.plan.add_index(
		IndexPatch::new(METADATA_POINTER_OFFSET, PatchWidth::U64)
			.value(tag_offset)
			.linked_zone(zone_name),
	);

	layout.add_slot(
		TagFormat::Id3v2,
		Some(Box::new(move |_| -> Box<dyn EmbeddingAdapter> {
			Box::new(TrailingId3 { offset: existing })
		})),
	);

	if let Some(format) = format {
		layout.properties = format.properties(audio_size, file_len);
	}

	Ok(layout)
}

// Returns the metadata pointer
fn read_header<R>(reader: &mut R) -> Result<u64>
where
	R: Read,
{
	let mut magic = [0; 4];
	reader.read_exact(&mut magic)?;
	if &magic != DSD_MAGIC {
		decode_err!(@BAIL Dsf, "File doesn't start with \"DSD \"");
	}

	let chunk_size = reader.read_u64::<LittleEndian>()?;
	if chunk_size != HEADER_SIZE {
		decode_err!(@BAIL Dsf, "Invalid DSD chunk size");
	}

	let _file_size = reader.read_u64::<LittleEndian>()?;
	Ok(reader.read_u64::<LittleEndian>()?)
}

fn read_format_chunk<R>(reader: &mut R, options: ReadOptions) -> Result<Option<DsfFormat>>
where
	R: Read + Seek,
{
	let mut magic = [0; 4];
	reader.read_exact(&mut magic)?;
	if &magic != FMT_MAGIC {
		decode_err!(@BAIL Dsf, "Expected a \"fmt \" chunk");
	}

	let chunk_size = reader.read_u64::<LittleEndian>()?;
	if chunk_size != FMT_CHUNK_SIZE {
		decode_err!(@BAIL Dsf, "Invalid \"fmt \" chunk size");
	}

	if !options.read_properties {
		reader.seek(SeekFrom::Current(DsfFormat::SIZE as i64))?;
		return Ok(None);
	}

	let mut body = try_vec![0; DsfFormat::SIZE as usize];
	reader.read_exact(&mut body)?;

	DsfFormat::parse(&body).map(Some)
}

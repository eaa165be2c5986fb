use super::Id3Chunk;
use super::properties::{FmtChunk, read_properties};
use crate::config::ReadOptions;
use crate::error::{Result, SpliceError};
use crate::file::{AudioRegion, ContainerLayout, FileType};
use crate::iff::chunk::{CHUNK_HEADER_SIZE, Chunks};
use crate::macros::{decode_err, parse_mode_choice};
use crate::surgery::{EmbeddingAdapter, PatchWidth, SizeMode, SizePatch, Zone};
use crate::tag::{TagFormat, TagType};
use crate::util::io::SeekStreamLen;

use std::io::{Read, Seek};

use byteorder::{LittleEndian, ReadBytesExt};

// Verifies that the stream is a WAV file and returns the RIFF chunk size
pub(crate) fn verify_wav<T>(data: &mut T) -> Result<u32>
where
	T: Read,
{
	let mut id = [0; 12];
	data.read_exact(&mut id)?;

	if &id[..4] != b"RIFF" {
		decode_err!(@BAIL Wav, "WAV file doesn't contain a RIFF chunk");
	}

	if &id[8..] != b"WAVE" {
		decode_err!(@BAIL Wav, "Found RIFF file, format is not WAVE");
	}

	log::debug!("File verified to be WAV");
	Ok(u32::from_le_bytes([id[4], id[5], id[6], id[7]]))
}

pub(crate) fn read_layout<R>(data: &mut R, options: ReadOptions) -> Result<ContainerLayout>
where
	R: Read + Seek,
{
	let parse_mode = options.parsing_mode;

	let start = data.stream_position()?;
	let riff_size = verify_wav(data)?;
	let file_len = data.stream_len_hack()?;

	let declared_end = start + CHUNK_HEADER_SIZE + u64::from(riff_size);
	let riff_end = if declared_end > file_len {
		parse_mode_choice!(
			parse_mode,
			RELAXED: {
				log::warn!("RIFF size ({riff_size}) exceeds the stream length, ignoring it");
				file_len
			},
			DEFAULT: return Err(SpliceError::truncated(declared_end, file_len))
		)
	} else {
		declared_end
	};

	let mut layout = ContainerLayout::new(FileType::Wav);

	let mut fmt = None;
	let mut total_samples = 0_u32;
	let mut existing_id3 = None;

	let native = TagType::Native.zone_name();
	let id3v2 = TagType::Id3v2.zone_name();

	let mut chunks = Chunks::<LittleEndian>::new(riff_end.saturating_sub(data.stream_position()?));
	while chunks.next(data)? {
		if chunks.is_truncated() {
			parse_mode_choice!(
				parse_mode,
				STRICT: {
					let end = chunks.content_offset() + u64::from(chunks.size);
					return Err(SpliceError::truncated(end, riff_end));
				},
				DEFAULT: {
					log::warn!(
						"Chunk \"{}\" extends past the end of the RIFF chunk, stopping",
						chunks.fourcc.escape_ascii()
					);
					break;
				}
			);
		}

		// A missing pad byte on the final chunk isn't worth failing over
		let zone_size = chunks.full_size().min(riff_end - chunks.offset);

		match &chunks.fourcc {
			b"fmt " if options.read_properties && fmt.is_none() => {
				fmt = Some(FmtChunk::parse(&chunks.content(data)?)?);
			},
			b"fact" if options.read_properties && total_samples == 0 && chunks.size >= 4 => {
				total_samples = data.read_u32::<LittleEndian>()?;
				chunks.skip(data)?;
			},
			b"data" => {
				if layout.audio == AudioRegion::default() {
					layout.audio = AudioRegion {
						offset: chunks.content_offset(),
						size: u64::from(chunks.size),
					};
				}

				chunks.skip(data)?;
			},
			b"LIST" => {
				let mut list_type = [0; 4];
				if chunks.size >= 4 {
					data.read_exact(&mut list_type)?;
				}

				if &list_type == b"INFO" {
					if layout.plan.zone(native).is_some() {
						log::warn!("Duplicate RIFF INFO list found, ignoring it");
					} else {
						layout.plan.add_zone(chunks.offset, zone_size, native)?;
						layout.read_tag(
							data,
							TagFormat::RiffInfo,
							chunks.offset,
							CHUNK_HEADER_SIZE + u64::from(chunks.size),
							options,
						)?;
					}
				}

				chunks.skip(data)?;
			},
			b"ID3 " | b"id3 " => {
				if existing_id3.is_some() {
					log::warn!("Duplicate ID3v2 chunk found, ignoring it");
				} else {
					layout.plan.add_zone(chunks.offset, zone_size, id3v2)?;
					layout.read_tag(
						data,
						TagFormat::Id3v2,
						chunks.content_offset(),
						u64::from(chunks.size),
						options,
					)?;

					existing_id3 = Some((chunks.fourcc, chunks.offset));
				}

				chunks.skip(data)?;
			},
			_ => chunks.skip(data)?,
		}
	}

	// Relaxed parsing may have clamped the declared size
	let riff_content_size = riff_end - start - CHUNK_HEADER_SIZE;

	// Missing tags are appended to the RIFF chunk, INFO first
	for name in [native, id3v2] {
		if layout.plan.zone(name).is_none() {
			layout.plan.add(Zone::new(name, riff_end, 0))?;
		}

		layout.plan.add_size(
			SizePatch::new(start + 4, PatchWidth::U32, name)
				.mode(SizeMode::DeltaAdd)
				.value(riff_content_size),
		);
	}

	layout.add_slot(TagFormat::RiffInfo, None);
	layout.add_slot(
		TagFormat::Id3v2,
		Some(Box::new(move |write_options| -> Box<dyn EmbeddingAdapter> {
			Box::new(Id3Chunk::new(existing_id3, write_options))
		})),
	);

	if options.read_properties {
		let Some(fmt) = fmt else {
			decode_err!(@BAIL Wav, "File does not contain a valid \"fmt \" chunk");
		};

		if layout.audio == AudioRegion::default() {
			decode_err!(@BAIL Wav, "File does not contain a \"data\" chunk");
		}

		layout.properties = read_properties(
			&fmt,
			total_samples,
			layout.audio.size as u32,
			file_len,
		)?;
	}

	Ok(layout)
}

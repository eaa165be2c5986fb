//! Tags that live outside of a container's structure
//!
//! ID3v2 may precede the container, while APE and ID3v1 are appended to it. The trailing tags
//! are always ordered `[..audio][APE][ID3v1]`.

use crate::ape::APE_HEADER_SIZE;
use crate::ape::header::ApeHeader;
use crate::config::ReadOptions;
use crate::error::{ErrorKind, Result, SpliceError};
use crate::file::ContainerLayout;
use crate::id3::v1::constants::ID3V1_TAG_SIZE;
use crate::id3::v2::header::{ID3V2_HEADER_SIZE, Id3v2Header};
use crate::macros::err;
use crate::surgery::Zone;
use crate::tag::{TagFormat, TagType};
use crate::util::io::SeekStreamLen;

use std::io::{Read, Seek, SeekFrom};

/// Look for an ID3v2 tag at the current position
///
/// If one exists, its zone is registered and the stream is left right after it. Otherwise, the
/// stream position is unchanged.
///
/// Returns the offset of the first byte after the tag.
pub(crate) fn leading_id3v2<R>(
	reader: &mut R,
	layout: &mut ContainerLayout,
	options: ReadOptions,
) -> Result<u64>
where
	R: Read + Seek,
{
	let start = reader.stream_position()?;
	let stream_len = reader.stream_len_hack()?;

	if stream_len.saturating_sub(start) < ID3V2_HEADER_SIZE {
		return Ok(start);
	}

	let header = match Id3v2Header::parse(reader) {
		Ok(header) => header,
		Err(e) if matches!(e.kind(), ErrorKind::FakeTag) => {
			reader.seek(SeekFrom::Start(start))?;
			return Ok(start);
		},
		Err(e) => return Err(e),
	};

	let size = header.full_tag_size();
	let end = start + size;
	if end > stream_len {
		return Err(SpliceError::truncated(end, stream_len));
	}

	log::debug!("Found a leading ID3v2 tag ({size} bytes)");

	layout
		.plan
		.add_zone(start, size, TagType::Id3v2.zone_name())?;
	layout.read_tag(reader, TagFormat::Id3v2, start, size, options)?;

	reader.seek(SeekFrom::Start(end))?;
	Ok(end)
}

/// Find the APE and ID3v1 tags at the end of the stream
///
/// Existing tags get zones. For tag types the layout has a slot for, a missing tag gets an
/// insertion point instead, so APE is always placed before ID3v1.
///
/// Returns the offset where the trailing tags start (the stream length if there are none).
/// Tags may not start before `min_offset`.
pub(crate) fn trailing_tags<R>(
	reader: &mut R,
	layout: &mut ContainerLayout,
	min_offset: u64,
	options: ReadOptions,
) -> Result<u64>
where
	R: Read + Seek,
{
	let stream_len = reader.stream_len_hack()?;

	let id3v1_offset = find_id3v1(reader, stream_len, min_offset)?;
	let ape_end = id3v1_offset.unwrap_or(stream_len);
	let ape = find_ape(reader, ape_end, min_offset)?;

	let ape_name = TagType::Ape.zone_name();
	match ape {
		Some((ape_offset, ape_size)) => {
			layout.plan.add_zone(ape_offset, ape_size, ape_name)?;
			layout.read_tag(reader, TagFormat::Ape, ape_offset, ape_size, options)?;
		},
		None if layout.slot(TagType::Ape).is_some() => {
			layout.plan.add(Zone::new(ape_name, ape_end, 0))?;
		},
		None => {},
	}

	let id3v1_name = TagType::Id3v1.zone_name();
	match id3v1_offset {
		Some(offset) => {
			layout.plan.add_zone(offset, ID3V1_TAG_SIZE, id3v1_name)?;
			layout.read_tag(reader, TagFormat::Id3v1, offset, ID3V1_TAG_SIZE, options)?;
		},
		None if layout.slot(TagType::Id3v1).is_some() => {
			layout.plan.add(Zone::new(id3v1_name, stream_len, 0))?;
		},
		None => {},
	}

	Ok(ape.map_or(ape_end, |(offset, _)| offset))
}

fn find_id3v1<R>(reader: &mut R, stream_len: u64, min_offset: u64) -> Result<Option<u64>>
where
	R: Read + Seek,
{
	if stream_len < min_offset + ID3V1_TAG_SIZE {
		return Ok(None);
	}

	let offset = stream_len - ID3V1_TAG_SIZE;
	reader.seek(SeekFrom::Start(offset))?;

	let mut id = [0; 3];
	reader.read_exact(&mut id)?;

	if &id != b"TAG" {
		return Ok(None);
	}

	log::debug!("Found an ID3v1 tag at {offset}");
	Ok(Some(offset))
}

// Returns the offset and size of the tag, header included
fn find_ape<R>(reader: &mut R, end: u64, min_offset: u64) -> Result<Option<(u64, u64)>>
where
	R: Read + Seek,
{
	let footer_size = u64::from(APE_HEADER_SIZE);
	if end < min_offset + footer_size {
		return Ok(None);
	}

	reader.seek(SeekFrom::Start(end - footer_size))?;

	let footer = match ApeHeader::parse(reader) {
		Ok(footer) => footer,
		Err(e) if matches!(e.kind(), ErrorKind::FakeTag) => return Ok(None),
		Err(e) => return Err(e),
	};

	let size = footer.full_tag_size();
	let Some(offset) = end.checked_sub(size).filter(|offset| *offset >= min_offset) else {
		log::error!("APE tag ({size} bytes) extends past the start of the audio");
		err!(SizeMismatch);
	};

	log::debug!("Found an APE tag at {offset} ({size} bytes)");
	Ok(Some((offset, size)))
}

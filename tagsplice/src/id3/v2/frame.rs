use super::header::Id3v2Version;
use super::synchsafe::{SynchsafeInteger, resynchronise};
use crate::config::ParsingMode;
use crate::error::Result;
use crate::macros::{decode_err, err};
use crate::tag::FieldKey;

use std::borrow::Cow;

use byteorder::{BigEndian, ByteOrder};

/// Text frames that map directly onto a [`FieldKey`]
///
/// `TRCK`/`TPOS` (number + total) and the ID3v2.3 date frames are handled separately.
pub(crate) const TEXT_FRAME_MAPPINGS: [(&str, FieldKey); 14] = [
	("TIT2", FieldKey::Title),
	("TPE1", FieldKey::Artist),
	("TPE2", FieldKey::AlbumArtist),
	("TPE3", FieldKey::Conductor),
	("TCOM", FieldKey::Composer),
	("TALB", FieldKey::Album),
	("TCON", FieldKey::Genre),
	("TDRC", FieldKey::RecordingDate),
	("TDRL", FieldKey::PublishingDate),
	("TCOP", FieldKey::Copyright),
	("TOPE", FieldKey::OriginalArtist),
	("TOAL", FieldKey::OriginalAlbum),
	("TPUB", FieldKey::Publisher),
	("TIT3", FieldKey::GeneralDescription),
];

pub(crate) fn field_for_frame(id: &str) -> Option<FieldKey> {
	TEXT_FRAME_MAPPINGS
		.iter()
		.find(|(frame_id, _)| *frame_id == id)
		.map(|(_, key)| *key)
}

// ID3v2.2 uses 3 character IDs, only the frames we understand are upgraded
const V2_ID_UPGRADES: [(&str, &str); 28] = [
	("TT1", "TIT1"),
	("TT2", "TIT2"),
	("TT3", "TIT3"),
	("TP1", "TPE1"),
	("TP2", "TPE2"),
	("TP3", "TPE3"),
	("TP4", "TPE4"),
	("TCM", "TCOM"),
	("TXT", "TEXT"),
	("TAL", "TALB"),
	("TCO", "TCON"),
	("TRK", "TRCK"),
	("TPA", "TPOS"),
	("TYE", "TYER"),
	("TDA", "TDAT"),
	("TIM", "TIME"),
	("TCR", "TCOP"),
	("TOA", "TOPE"),
	("TOT", "TOAL"),
	("TPB", "TPUB"),
	("TEN", "TENC"),
	("TSS", "TSSE"),
	("TBP", "TBPM"),
	("TXX", "TXXX"),
	("COM", "COMM"),
	("PIC", "APIC"),
	("ULT", "USLT"),
	("POP", "POPM"),
];

/// A frame whose header has been parsed and whose flags have been applied
#[derive(Debug)]
pub(crate) struct RawFrame<'a> {
	pub(crate) id: String,
	pub(crate) content: Cow<'a, [u8]>,
}

/// Split `body` into frames
///
/// Returns the frames and the amount of padding that followed them.
pub(crate) fn read_frames(
	body: &[u8],
	version: Id3v2Version,
	unsynchronised: bool,
	parse_mode: ParsingMode,
) -> Result<(Vec<RawFrame<'_>>, u64)> {
	let header_len = match version {
		Id3v2Version::V2 => 6,
		_ => 10,
	};

	let mut frames = Vec::new();
	let mut pos = 0;

	while pos + header_len <= body.len() {
		let header = &body[pos..pos + header_len];

		if header[0] == 0 {
			break;
		}

		let (id, size, flags) = match version {
			Id3v2Version::V2 => (&header[..3], BigEndian::read_u24(&header[3..]), 0),
			Id3v2Version::V3 => (
				&header[..4],
				BigEndian::read_u32(&header[4..8]),
				BigEndian::read_u16(&header[8..]),
			),
			Id3v2Version::V4 => (
				&header[..4],
				BigEndian::read_u32(&header[4..8]).unsynch(),
				BigEndian::read_u16(&header[8..]),
			),
		};

		if !id
			.iter()
			.all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
		{
			if parse_mode == ParsingMode::Strict {
				decode_err!(@BAIL "Encountered an invalid ID3v2 frame ID");
			}

			log::warn!("Encountered an invalid ID3v2 frame ID, discarding the rest of the tag");
			break;
		}

		let start = pos + header_len;
		let end = start + size as usize;
		if end > body.len() {
			if parse_mode == ParsingMode::Strict {
				err!(SizeMismatch);
			}

			log::warn!("ID3v2 frame is larger than the tag, discarding the rest of the tag");
			break;
		}

		pos = end;

		// Every byte of `id` is ASCII
		let id = String::from_utf8_lossy(id).into_owned();
		let id = match version {
			Id3v2Version::V2 => V2_ID_UPGRADES
				.iter()
				.find(|(v2, _)| *v2 == id)
				.map_or(id, |(_, v4)| (*v4).to_owned()),
			_ => id,
		};

		if let Some(content) = apply_flags(&id, &body[start..end], version, flags, unsynchronised) {
			frames.push(RawFrame { id, content });
		}
	}

	let remaining = &body[pos..];
	let padding = if remaining.iter().all(|b| *b == 0) {
		remaining.len() as u64
	} else {
		0
	};

	log::trace!("Read {} frames, followed by {padding} bytes of padding", frames.len());
	Ok((frames, padding))
}

fn apply_flags<'a>(
	id: &str,
	content: &'a [u8],
	version: Id3v2Version,
	flags: u16,
	unsynchronised: bool,
) -> Option<Cow<'a, [u8]>> {
	let (compressed_or_encrypted, grouped, data_length_indicator, frame_unsynchronised) =
		match version {
			Id3v2Version::V2 => (false, false, false, false),
			Id3v2Version::V3 => (flags & 0x00C0 != 0, flags & 0x0020 != 0, false, false),
			Id3v2Version::V4 => (
				flags & 0x000C != 0,
				flags & 0x0040 != 0,
				flags & 0x0001 != 0,
				flags & 0x0002 != 0,
			),
		};

	if compressed_or_encrypted {
		log::warn!("Skipping compressed or encrypted frame \"{id}\"");
		return None;
	}

	let skip = usize::from(grouped) + if data_length_indicator { 4 } else { 0 };
	let Some(content) = content.get(skip..) else {
		log::warn!("Frame \"{id}\" is too small for its flags, skipping");
		return None;
	};

	if frame_unsynchronised || unsynchronised {
		return Some(Cow::Owned(resynchronise(content)));
	}

	Some(Cow::Borrowed(content))
}

#[cfg(test)]
mod tests {
	use super::read_frames;
	use crate::config::ParsingMode;
	use crate::id3::v2::header::Id3v2Version;

	#[test_log::test]
	fn v2_ids_are_upgraded() {
		let body = [b'T', b'T', b'2', 0, 0, 2, 0, b'A', 0, 0, 0, 0];
		let (frames, padding) = read_frames(&body, Id3v2Version::V2, false, ParsingMode::Strict).unwrap();

		assert_eq!(frames.len(), 1);
		assert_eq!(frames[0].id, "TIT2");
		assert_eq!(&*frames[0].content, &[0, b'A']);
		assert_eq!(padding, 4);
	}

	#[test_log::test]
	fn oversized_frame() {
		let body = [b'T', b'I', b'T', b'2', 0, 0, 0, 0x20, 0, 0, 0, b'A'];

		assert!(read_frames(&body, Id3v2Version::V4, false, ParsingMode::Strict).is_err());

		let (frames, _) =
			read_frames(&body, Id3v2Version::V4, false, ParsingMode::BestAttempt).unwrap();
		assert!(frames.is_empty());
	}

	#[test_log::test]
	fn v4_frame_flags() {
		// Data length indicator + unsynchronisation
		let body = [
			b'T', b'I', b'T', b'2', 0, 0, 0, 8, 0x00, 0x03, 0, 0, 0, 3, 0, 0xFF, 0x00, b'A',
		];
		let (frames, _) = read_frames(&body, Id3v2Version::V4, false, ParsingMode::Strict).unwrap();

		assert_eq!(&*frames[0].content, &[0, 0xFF, b'A']);
	}
}

use crate::util::{self, contents, encoded_tag};

use tagsplice::config::{ParsingMode, ReadOptions, TagTypeRegistry, WriteOptions};
use tagsplice::error::ErrorKind;
use tagsplice::file::{BoundTaggedFile, FileType};
use tagsplice::prelude::*;
use tagsplice::tag::{TagData, TagFormat, TagType};

use std::io::Cursor;
use std::time::Duration;

fn riff_size(file: &[u8]) -> u32 {
	u32::from_le_bytes(file[4..8].try_into().unwrap())
}

#[test_log::test]
fn read() {
	// Here we have a WAV file with both an ID3v2 chunk and a RIFF INFO chunk
	let mut id3v2 = TagData::new();
	id3v2.set_artist("Foo artist");
	let id3v2 = encoded_tag(TagFormat::Id3v2, &id3v2);

	let mut info = TagData::new();
	info.set_artist("Bar artist");
	let info = encoded_tag(TagFormat::RiffInfo, &info);

	let mut chunks = info;
	chunks.extend_from_slice(b"id3 ");
	chunks.extend_from_slice(&(id3v2.len() as u32).to_le_bytes());
	chunks.extend_from_slice(&id3v2);
	if id3v2.len() % 2 != 0 {
		chunks.push(0);
	}

	let file = util::probe(&util::wav(400, &chunks));
	assert_eq!(file.file_type(), FileType::Wav);

	// Verify the ID3v2 tag first
	util::verify_artist(&file, TagType::Id3v2, "Foo artist");

	// Now verify the RIFF INFO chunk
	util::verify_artist(&file, TagType::Native, "Bar artist");
}

#[test_log::test]
fn properties() {
	// One second of audio
	let file = util::probe(&util::wav(176_400, &[]));
	let properties = file.properties();

	assert_eq!(properties.duration(), Duration::from_secs(1));
	assert_eq!(properties.sample_rate(), Some(44100));
	assert_eq!(properties.bit_depth(), Some(16));
	assert_eq!(properties.channels(), Some(2));
	assert_eq!(properties.audio_bitrate(), Some(1411));
	assert!(properties.is_lossless());

	assert_eq!(file.audio_region().offset, 44);
	assert_eq!(file.audio_region().size, 176_400);
}

#[test_log::test]
fn write() {
	let original = util::wav(400, &[]);
	let mut tagged_file = util::read(&original);

	assert_eq!(tagged_file.tagged_file().file_type(), FileType::Wav);

	// ID3v2
	util::set_artist(&mut tagged_file, TagType::Id3v2, None, "Foo artist");

	// RIFF INFO
	util::set_artist(&mut tagged_file, TagType::Native, None, "Bar artist");

	// Now reread the file
	let mut file = tagged_file.into_inner();
	let written = contents(&mut file);

	assert_eq!(riff_size(&written) as usize, written.len() - 8);
	// The audio is untouched
	assert_eq!(&written[..4], &original[..4]);
	assert_eq!(&written[8..original.len()], &original[8..]);

	let mut tagged_file = BoundTaggedFile::read_from(file, ReadOptions::new()).unwrap();
	util::set_artist(
		&mut tagged_file,
		TagType::Id3v2,
		Some("Foo artist"),
		"Bar artist",
	);
	util::set_artist(
		&mut tagged_file,
		TagType::Native,
		Some("Bar artist"),
		"Baz artist",
	);
}

#[test_log::test]
fn oversized_riff_size() {
	let mut original = util::wav(400, &[]);
	original[4..8].copy_from_slice(&10_000u32.to_le_bytes());

	let err = BoundTaggedFile::read_from(Cursor::new(original.clone()), ReadOptions::new())
		.unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::TruncatedFile { .. }));

	let mut tagged_file = BoundTaggedFile::read_from(
		Cursor::new(original.clone()),
		ReadOptions::new().parsing_mode(ParsingMode::Relaxed),
	)
	.unwrap();

	let mut data = TagData::new();
	data.set_title("Title");
	tagged_file
		.write(&data, TagType::Native, TagTypeRegistry::global(), WriteOptions::new())
		.unwrap();

	// The header is corrected from the actual length, not the declared one
	let written = tagged_file.into_inner().into_inner();
	assert_eq!(riff_size(&written) as usize, written.len() - 8);
	assert_eq!(&written[8..original.len()], &original[8..]);
}

#[test_log::test]
fn new_id3_chunk_casing() {
	let original = util::wav(400, &[]);

	let mut data = TagData::new();
	data.set_title("Title");

	for (uppercase, fourcc) in [(true, b"ID3 "), (false, b"id3 ")] {
		let mut tagged_file = util::read(&original);
		tagged_file
			.write(
				&data,
				TagType::Id3v2,
				TagTypeRegistry::global(),
				WriteOptions::new().uppercase_id3v2_chunk(uppercase),
			)
			.unwrap();

		let written = contents(&mut tagged_file.into_inner());
		assert_eq!(&written[original.len()..original.len() + 4], fourcc);
	}
}

#[test_log::test]
fn write_merges_fields() {
	let mut tagged_file = util::read(&util::wav(400, &[]));

	let mut title = TagData::new();
	title.set_title("Title");
	tagged_file
		.write(&title, TagType::Native, TagTypeRegistry::global(), WriteOptions::new())
		.unwrap();

	let mut artist = TagData::new();
	artist.set_artist("Artist").set_track(3).set_track_total(10);
	tagged_file
		.write(&artist, TagType::Native, TagTypeRegistry::global(), WriteOptions::new())
		.unwrap();

	let info = tagged_file.tagged_file().tag(TagType::Native).unwrap();
	assert_eq!(info.title().as_deref(), Some("Title"));
	assert_eq!(info.artist().as_deref(), Some("Artist"));
	assert_eq!(info.track(), Some(3));
	assert_eq!(info.track_total(), Some(10));
}

#[test_log::test]
fn remove_restores_the_original() {
	let original = util::wav(400, &[]);

	util::add_and_remove(&original, TagType::Native);
	util::add_and_remove(&original, TagType::Id3v2);
}

#[test_log::test]
fn remove_everything() {
	let original = util::wav(400, &[]);
	let mut tagged_file = util::read(&original);

	let mut data = TagData::new();
	data.set_album("Album");
	tagged_file
		.write(&data, TagType::Native, TagTypeRegistry::global(), WriteOptions::new())
		.unwrap();
	tagged_file
		.write(&data, TagType::Id3v2, TagTypeRegistry::global(), WriteOptions::new())
		.unwrap();
	assert_eq!(tagged_file.tagged_file().tags().len(), 2);

	tagged_file.remove(TagType::Any).unwrap();
	assert!(!tagged_file.tagged_file().contains_tag_type(TagType::Any));
	assert_eq!(contents(&mut tagged_file.into_inner()), original);
}

#[test_log::test]
fn unsupported_tag_type() {
	let mut tagged_file = util::read(&util::wav(400, &[]));

	let mut data = TagData::new();
	data.set_title("Title");

	let err = tagged_file
		.write(&data, TagType::Ape, TagTypeRegistry::global(), WriteOptions::new())
		.unwrap_err();
	assert!(matches!(
		err.kind(),
		ErrorKind::UnsupportedTagType(TagType::Ape)
	));
}

#[test_log::test]
fn read_no_properties() {
	util::no_properties_test(&util::wav(400, &[]));
}

#[test_log::test]
fn read_no_tags() {
	let mut info = TagData::new();
	info.set_title("Title");

	util::no_tag_test(&util::wav(
		400,
		&encoded_tag(TagFormat::RiffInfo, &info),
	));
}

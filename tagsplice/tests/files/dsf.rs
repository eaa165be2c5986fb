use crate::util::{self, contents, encoded_tag};

use tagsplice::config::{ParsingMode, ReadOptions, TagTypeRegistry, WriteOptions};
use tagsplice::error::ErrorKind;
use tagsplice::file::{FileType, TaggedFile};
use tagsplice::prelude::*;
use tagsplice::tag::{TagData, TagFormat, TagType};

use std::io::Cursor;
use std::time::Duration;

fn header_fields(file: &[u8]) -> (u64, u64) {
	let size = u64::from_le_bytes(file[12..20].try_into().unwrap());
	let pointer = u64::from_le_bytes(file[20..28].try_into().unwrap());
	(size, pointer)
}

#[test_log::test]
fn read() {
	let mut data = TagData::new();
	data.set_artist("Foo artist");

	let file = util::probe(&util::dsf(1, &encoded_tag(TagFormat::Id3v2, &data)));
	assert_eq!(file.file_type(), FileType::Dsf);

	util::verify_artist(&file, TagType::Id3v2, "Foo artist");
}

#[test_log::test]
fn properties() {
	let file = util::probe(&util::dsf(1, &[]));
	let properties = file.properties();

	assert_eq!(properties.duration(), Duration::from_secs(1));
	assert_eq!(properties.sample_rate(), Some(2_822_400));
	assert_eq!(properties.bit_depth(), Some(1));
	assert_eq!(properties.channels(), Some(2));
	assert!(properties.is_lossless());

	assert_eq!(file.audio_region().offset, 92);
	assert_eq!(file.audio_region().size, 705_600);
}

#[test_log::test]
fn write() {
	let original = util::dsf(1, &[]);
	assert_eq!(header_fields(&original).1, 0);

	let mut tagged_file = util::read(&original);
	util::set_artist(&mut tagged_file, TagType::Id3v2, None, "Foo artist");

	let written = contents(&mut tagged_file.into_inner());
	let (file_size, pointer) = header_fields(&written);

	assert_eq!(file_size, written.len() as u64);
	// The tag is appended after the audio
	assert_eq!(pointer, original.len() as u64);
	assert_eq!(&written[pointer as usize..pointer as usize + 3], b"ID3");

	// Growing the existing tag keeps the pointer
	let mut tagged_file = util::read(&written);
	let mut data = TagData::new();
	data.set_comment("x".repeat(4000));
	tagged_file
		.write(&data, TagType::Id3v2, TagTypeRegistry::global(), WriteOptions::new())
		.unwrap();

	let grown = contents(&mut tagged_file.into_inner());
	assert!(grown.len() > written.len());
	assert_eq!(header_fields(&grown), (grown.len() as u64, pointer));
}

#[test_log::test]
fn remove_restores_the_original() {
	util::add_and_remove(&util::dsf(1, &[]), TagType::Id3v2);
}

#[test_log::test]
fn unsupported_tag_types() {
	let mut file = Cursor::new(util::dsf(1, &[]));
	let mut tagged_file = TaggedFile::read_from(&mut file, ReadOptions::new()).unwrap();

	let mut data = TagData::new();
	data.set_title("Title");

	for tag_type in [TagType::Ape, TagType::Id3v1, TagType::Native] {
		let err = tagged_file
			.write(&mut file, &data, tag_type, TagTypeRegistry::global(), WriteOptions::new())
			.unwrap_err();
		assert!(matches!(err.kind(), ErrorKind::UnsupportedTagType(_)));
	}
}

#[test_log::test]
fn metadata_pointer_into_the_audio() {
	let mut original = util::dsf(1, &[]);
	original[20..28].copy_from_slice(&100u64.to_le_bytes());

	let err = TaggedFile::read_from(&mut Cursor::new(&original), ReadOptions::new()).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::Format(_)));

	// Relaxed parsing ignores the pointer, a new tag goes after the audio
	let mut file = Cursor::new(original.clone());
	let mut tagged_file = TaggedFile::read_from(
		&mut file,
		ReadOptions::new().parsing_mode(ParsingMode::Relaxed),
	)
	.unwrap();
	assert!(!tagged_file.contains_tag_type(TagType::Any));

	let mut data = TagData::new();
	data.set_artist("Foo artist");
	tagged_file
		.write(&mut file, &data, TagType::Id3v2, TagTypeRegistry::global(), WriteOptions::new())
		.unwrap();

	let written = file.into_inner();
	assert_eq!(&written[28..original.len()], &original[28..]);
	assert_eq!(header_fields(&written), (written.len() as u64, original.len() as u64));
	util::verify_artist(&tagged_file, TagType::Id3v2, "Foo artist");
}

#[test_log::test]
fn read_no_properties() {
	util::no_properties_test(&util::dsf(1, &[]));
}

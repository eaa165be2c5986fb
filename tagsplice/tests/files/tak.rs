use crate::util::{self, contents, encoded_tag};

use tagsplice::config::{TagTypeRegistry, WriteOptions};
use tagsplice::error::ErrorKind;
use tagsplice::file::FileType;
use tagsplice::prelude::*;
use tagsplice::probe::guess_file_type;
use tagsplice::tag::{TagData, TagFormat, TagType};

use std::io::Cursor;
use std::time::Duration;

#[test_log::test]
fn read() {
	let mut data = TagData::new();
	data.set_artist("Foo artist").set_album("Album");

	let mut original = util::tak(44100, 500);
	original.extend(encoded_tag(TagFormat::Ape, &data));

	let file = util::probe(&original);
	assert_eq!(file.file_type(), FileType::Tak);

	util::verify_artist(&file, TagType::Ape, "Foo artist");
	assert_eq!(
		file.tag(TagType::Ape).unwrap().album().as_deref(),
		Some("Album")
	);

	// The APE tag isn't part of the audio
	assert_eq!(file.audio_region().size, util::tak(44100, 500).len() as u64);
}

#[test_log::test]
fn properties() {
	let file = util::probe(&util::tak(44100 * 2, 500));
	let properties = file.properties();

	assert_eq!(properties.duration(), Duration::from_secs(2));
	assert_eq!(properties.sample_rate(), Some(44100));
	assert_eq!(properties.bit_depth(), Some(16));
	assert_eq!(properties.channels(), Some(2));
	assert!(properties.is_lossless());
}

#[test_log::test]
fn write() {
	let original = util::tak(44100, 500);
	let mut tagged_file = util::read(&original);

	util::set_artist(&mut tagged_file, TagType::Ape, None, "Foo artist");
	util::set_artist(&mut tagged_file, TagType::Ape, Some("Foo artist"), "Bar artist");

	let written = contents(&mut tagged_file.into_inner());
	assert_eq!(&written[..original.len()], &original[..]);
	assert_eq!(&written[original.len()..original.len() + 8], b"APETAGEX");
}

#[test_log::test]
fn write_any_picks_ape() {
	let mut tagged_file = util::read(&util::tak(44100, 500));

	let mut data = TagData::new();
	data.set_title("Title");
	tagged_file
		.write(&data, TagType::Any, TagTypeRegistry::global(), WriteOptions::new())
		.unwrap();

	assert!(tagged_file.tagged_file().contains_tag_type(TagType::Ape));
}

#[test_log::test]
fn remove_restores_the_original() {
	util::add_and_remove(&util::tak(44100, 500), TagType::Ape);
}

#[test_log::test]
fn leading_id3v2() {
	let mut data = TagData::new();
	data.set_artist("Foo artist");

	let mut original = encoded_tag(TagFormat::Id3v2, &data);
	let id3v2_len = original.len();
	original.extend(util::tak(44100, 500));

	assert_eq!(
		guess_file_type(&mut Cursor::new(&original)).unwrap(),
		Some(FileType::Tak)
	);

	let mut tagged_file = util::read(&original);
	util::verify_artist(tagged_file.tagged_file(), TagType::Id3v2, "Foo artist");
	assert_eq!(tagged_file.tagged_file().audio_region().offset, id3v2_len as u64);

	// It can be read, but not written
	let err = tagged_file
		.write(&data, TagType::Id3v2, TagTypeRegistry::global(), WriteOptions::new())
		.unwrap_err();
	assert!(matches!(
		err.kind(),
		ErrorKind::UnsupportedTagType(TagType::Id3v2)
	));

	// Removing every supported tag type leaves it alone
	tagged_file.remove(TagType::Any).unwrap();
	assert_eq!(contents(&mut tagged_file.into_inner()), original);
}

#[test_log::test]
fn read_no_properties() {
	util::no_properties_test(&util::tak(44100, 500));
}

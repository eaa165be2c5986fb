use crate::util::{self, contents, encoded_tag};

use tagsplice::config::{TagTypeRegistry, WriteOptions};
use tagsplice::file::FileType;
use tagsplice::prelude::*;
use tagsplice::tag::{TagData, TagFormat, TagType};

use std::io::Write;
use std::time::Duration;

#[test_log::test]
fn read() {
	// Here we have a WavPack file with both an APE tag and an ID3v1 tag
	let mut ape = TagData::new();
	ape.set_artist("Foo artist");

	let mut id3v1 = TagData::new();
	id3v1.set_artist("Bar artist");

	let mut original = util::wavpack(44100, 300);
	original.extend(encoded_tag(TagFormat::Ape, &ape));
	original.extend(encoded_tag(TagFormat::Id3v1, &id3v1));

	let file = util::probe(&original);
	assert_eq!(file.file_type(), FileType::WavPack);

	// Verify the APE tag first
	util::verify_artist(&file, TagType::Ape, "Foo artist");

	// Now verify the ID3v1 tag
	util::verify_artist(&file, TagType::Id3v1, "Bar artist");

	// APE outranks ID3v1 by default
	let registry = TagTypeRegistry::new();
	let view = file.read(TagType::Any, &registry);
	assert_eq!(view.artist().as_deref(), Some("Foo artist"));

	let forced = file.read(TagType::Id3v1, &registry);
	assert_eq!(forced.artist().as_deref(), Some("Bar artist"));
}

#[test_log::test]
fn properties() {
	let file = util::probe(&util::wavpack(44100 * 3, 300));
	let properties = file.properties();

	assert_eq!(properties.duration(), Duration::from_secs(3));
	assert_eq!(properties.sample_rate(), Some(44100));
	assert_eq!(properties.bit_depth(), Some(16));
	assert_eq!(properties.channels(), Some(2));
	assert!(properties.is_lossless());
}

#[test_log::test]
fn write() {
	let original = util::wavpack(44100, 300);
	let mut tagged_file = util::read(&original);

	// ID3v1 first, the APE tag still has to end up in front of it
	util::set_artist(&mut tagged_file, TagType::Id3v1, None, "Bar artist");
	util::set_artist(&mut tagged_file, TagType::Ape, None, "Foo artist");

	let written = contents(&mut tagged_file.into_inner());
	assert_eq!(&written[..original.len()], &original[..]);
	assert_eq!(&written[original.len()..original.len() + 8], b"APETAGEX");
	assert_eq!(&written[written.len() - 128..written.len() - 125], b"TAG");

	let mut tagged_file = util::read(&written);
	util::set_artist(&mut tagged_file, TagType::Ape, Some("Foo artist"), "Baz artist");
	util::verify_artist(tagged_file.tagged_file(), TagType::Id3v1, "Bar artist");
}

#[test_log::test]
fn id3v1_values_are_truncated() {
	let mut tagged_file = util::read(&util::wavpack(44100, 300));

	let mut data = TagData::new();
	data.set_title("A title that is far too long for an ID3v1 tag");
	tagged_file
		.write(&data, TagType::Id3v1, TagTypeRegistry::global(), WriteOptions::new())
		.unwrap();

	let id3v1 = tagged_file.tagged_file().tag(TagType::Id3v1).unwrap();
	assert_eq!(
		id3v1.title().as_deref(),
		Some("A title that is far too long f")
	);
}

#[test_log::test]
fn remove_restores_the_original() {
	let original = util::wavpack(44100, 300);

	util::add_and_remove(&original, TagType::Ape);
	util::add_and_remove(&original, TagType::Id3v1);
}

#[test_log::test]
fn remove_from_path() {
	let original = util::wavpack(44100, 300);

	let mut ape = TagData::new();
	ape.set_title("Title");

	let mut tagged = original.clone();
	tagged.extend(encoded_tag(TagFormat::Ape, &ape));
	tagged.extend(encoded_tag(TagFormat::Id3v1, &ape));

	let mut temp = tempfile::Builder::new().suffix(".wv").tempfile().unwrap();
	temp.write_all(&tagged).unwrap();
	temp.flush().unwrap();

	TagType::Any.remove_from_path(temp.path()).unwrap();
	assert_eq!(std::fs::read(temp.path()).unwrap(), original);

	let file = tagsplice::read_from_path(temp.path()).unwrap();
	assert!(!file.contains_tag_type(TagType::Any));
}

#[test_log::test]
fn read_no_tags() {
	let mut ape = TagData::new();
	ape.set_title("Title");

	let mut original = util::wavpack(44100, 300);
	original.extend(encoded_tag(TagFormat::Ape, &ape));

	util::no_tag_test(&original);

	let file = util::probe(&original);
	assert!(file.contains_tag_type(TagType::Ape));

	let mut cleared = file.clone();
	cleared.clear();
	assert!(!cleared.contains_tag_type(TagType::Any));
	assert_eq!(cleared.properties(), file.properties());
}

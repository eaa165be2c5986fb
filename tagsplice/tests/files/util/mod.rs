use tagsplice::config::{ReadOptions, TagTypeRegistry, WriteOptions};
use tagsplice::file::{BoundTaggedFile, TaggedFile};
use tagsplice::probe::Probe;
use tagsplice::tag::{MetadataTag, TagData, TagFormat, TagSystem, TagSystemView, TagType};

use std::fs::File;
use std::io::{Read, Seek, Write};

/// Create a new temporary file holding `content`
pub fn temp_file(content: &[u8]) -> File {
	let mut file = tempfile::tempfile().unwrap();
	file.write_all(content).unwrap();
	file.rewind().unwrap();

	file
}

/// Copy `content` into a [`temp_file()`] and parse it via [`Probe`]
pub fn read(content: &[u8]) -> BoundTaggedFile<File> {
	let file = temp_file(content);
	BoundTaggedFile::read_from(file, ReadOptions::new()).unwrap()
}

/// Parse `content` without touching the disk
pub fn probe(content: &[u8]) -> TaggedFile {
	Probe::new(std::io::Cursor::new(content))
		.options(ReadOptions::new())
		.guess_file_type()
		.unwrap()
		.read()
		.unwrap()
}

/// The full contents of `file`
pub fn contents(file: &mut File) -> Vec<u8> {
	let mut content = Vec::new();
	file.rewind().unwrap();
	file.read_to_end(&mut content).unwrap();
	content
}

/// Encode a standalone tag, as it would appear in a file
pub fn encoded_tag(format: TagFormat, data: &TagData) -> Vec<u8> {
	MetadataTag::new(format, data.clone())
		.write(WriteOptions::new())
		.unwrap()
}

/// Write `artist` to the tag of type `tag_type`, verifying the tag had `previous` beforehand
pub fn set_artist(
	file: &mut BoundTaggedFile<File>,
	tag_type: TagType,
	previous: Option<&str>,
	artist: &str,
) {
	println!("SET: Setting {tag_type:?} artist to \"{artist}\"");
	assert_eq!(
		file.tagged_file()
			.tag(tag_type)
			.and_then(|tag| tag.artist().map(|a| a.into_owned()))
			.as_deref(),
		previous
	);

	let mut data = TagData::new();
	data.set_artist(artist);
	file.write(&data, tag_type, TagTypeRegistry::global(), WriteOptions::new()).unwrap();

	verify_artist(file.tagged_file(), tag_type, artist);
}

/// Verify that the tag of type `tag_type` has an artist of `expected`
pub fn verify_artist(file: &TaggedFile, tag_type: TagType, expected: &str) {
	println!("VERIFY: Expecting {tag_type:?} to have an artist of \"{expected}\"");

	let tag = file.tag(tag_type).unwrap();
	assert!(tag.exists());
	assert_eq!(tag.artist().as_deref(), Some(expected));
}

/// Write a tag of `tag_type`, then remove it again, expecting the original bytes back
pub fn add_and_remove(original: &[u8], tag_type: TagType) {
	let mut file = read(original);

	let mut data = TagData::new();
	data.set_title("Title").set_artist("Artist").set_track(2);
	file.write(&data, tag_type, TagTypeRegistry::global(), WriteOptions::new()).unwrap();

	assert!(file.tagged_file().contains_tag_type(tag_type));

	let mut handle = file.into_inner();
	assert_ne!(contents(&mut handle), original);

	tag_type.remove_from(&mut handle).unwrap();
	assert_eq!(contents(&mut handle), original);
}

/// Verify that no audio properties are read when requested
pub fn no_properties_test(content: &[u8]) {
	let tagged_file = Probe::new(std::io::Cursor::new(content))
		.options(ReadOptions::new().read_properties(false))
		.guess_file_type()
		.unwrap()
		.read()
		.unwrap();
	assert!(tagged_file.properties().is_empty());
}

/// Verify that no tags are read when requested
pub fn no_tag_test(content: &[u8]) {
	let tagged_file = Probe::new(std::io::Cursor::new(content))
		.options(ReadOptions::new().read_tags(false))
		.guess_file_type()
		.unwrap()
		.read()
		.unwrap();
	assert!(!tagged_file.contains_tag_type(TagType::Any));
}

// 16-bit stereo PCM, 44.1 kHz
pub fn wav(audio_len: u32, extra_chunks: &[u8]) -> Vec<u8> {
	let mut fmt = Vec::new();
	fmt.extend_from_slice(&1u16.to_le_bytes());
	fmt.extend_from_slice(&2u16.to_le_bytes());
	fmt.extend_from_slice(&44100u32.to_le_bytes());
	fmt.extend_from_slice(&(44100u32 * 4).to_le_bytes());
	fmt.extend_from_slice(&4u16.to_le_bytes());
	fmt.extend_from_slice(&16u16.to_le_bytes());

	let mut body = b"WAVE".to_vec();
	body.extend_from_slice(b"fmt ");
	body.extend_from_slice(&(fmt.len() as u32).to_le_bytes());
	body.extend(fmt);
	body.extend_from_slice(b"data");
	body.extend_from_slice(&audio_len.to_le_bytes());
	body.extend(std::iter::repeat_n(0x11, audio_len as usize));
	body.extend_from_slice(extra_chunks);

	let mut file = b"RIFF".to_vec();
	file.extend_from_slice(&(body.len() as u32).to_le_bytes());
	file.extend(body);
	file
}

// Stereo DSD64, with `seconds` worth of samples
pub fn dsf(seconds: u64, tag: &[u8]) -> Vec<u8> {
	let audio_len = 2_822_400 * 2 / 8 * seconds;
	let audio_end = 92 + audio_len;
	let file_size = audio_end + tag.len() as u64;
	let pointer = if tag.is_empty() { 0 } else { audio_end };

	let mut file = b"DSD ".to_vec();
	file.extend_from_slice(&28u64.to_le_bytes());
	file.extend_from_slice(&file_size.to_le_bytes());
	file.extend_from_slice(&pointer.to_le_bytes());

	file.extend_from_slice(b"fmt ");
	file.extend_from_slice(&52u64.to_le_bytes());
	// Version, format ID, channel type, channels
	for value in [1u32, 0, 2, 2] {
		file.extend_from_slice(&value.to_le_bytes());
	}
	file.extend_from_slice(&2_822_400u32.to_le_bytes());
	file.extend_from_slice(&1u32.to_le_bytes());
	file.extend_from_slice(&(2_822_400 * seconds).to_le_bytes());
	file.extend_from_slice(&4096u32.to_le_bytes());
	file.extend_from_slice(&0u32.to_le_bytes());

	file.extend_from_slice(b"data");
	file.extend_from_slice(&(12 + audio_len).to_le_bytes());
	file.extend(std::iter::repeat_n(0x69, audio_len as usize));
	file.extend_from_slice(tag);
	file
}

// 16-bit stereo, 44.1 kHz
pub fn tak(total_samples: u64, frames_len: usize) -> Vec<u8> {
	fn block(block_type: u32, content: &[u8]) -> Vec<u8> {
		let mut block = ((content.len() as u32) << 8 | block_type)
			.to_le_bytes()
			.to_vec();
		block.extend_from_slice(content);
		block
	}

	let low = ((total_samples & 0x3) as u16) << 14;
	let middle = ((total_samples >> 2) & 0xFFFF_FFFF) as u32;
	let rest = (((total_samples >> 34) & 1) as u32) << 7
		| (44100 - 6000) << 4
		| (16 - 8) << 22
		| (2 - 1) << 27;

	let mut stream_info = Vec::new();
	stream_info.extend_from_slice(&low.to_le_bytes());
	stream_info.extend_from_slice(&middle.to_le_bytes());
	stream_info.extend_from_slice(&rest.to_le_bytes());

	let mut file = b"tBaK".to_vec();
	file.extend(block(1, &stream_info));
	file.extend(block(0, &[]));
	file.extend(std::iter::repeat_n(0x5A, frames_len));
	file
}

// A single v4 block, 16-bit stereo, 44.1 kHz
pub fn wavpack(total_samples: u32, frames_len: usize) -> Vec<u8> {
	let flags = 1u32 | (9 << 23) | 0x800 | 0x1000;

	let mut file = b"wvpk".to_vec();
	file.extend_from_slice(&24u32.to_le_bytes());
	file.extend_from_slice(&0x410u16.to_le_bytes());
	file.extend_from_slice(&[0, 0]);
	file.extend_from_slice(&total_samples.to_le_bytes());
	file.extend_from_slice(&0u32.to_le_bytes());
	file.extend_from_slice(&total_samples.to_le_bytes());
	file.extend_from_slice(&flags.to_le_bytes());
	file.extend_from_slice(&0u32.to_le_bytes());
	file.extend(std::iter::repeat_n(0x42, frames_len));
	file
}

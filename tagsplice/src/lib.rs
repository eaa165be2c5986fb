//! Byte-exact reading and rewriting of the tags in audio containers.
//!
//! A file may carry several tag systems at once (ID3v1, ID3v2, APE and the container's own
//! format). tagsplice reads all of them into a common [`TagData`](tag::TagData) model, merges
//! them into one view if asked to, and writes a single tag back by splicing it into the file
//! without touching a byte of the audio stream.
//!
//! # Supported Formats
//!
//! | Format  | Tags                          |
//! |---------|-------------------------------|
//! | WAV     | RIFF INFO, ID3v2 (`id3 ` chunk) |
//! | DSF     | ID3v2                         |
//! | TAK     | APE (ID3v2 is read only)      |
//! | WavPack | APE, ID3v1                    |
//!
//! # Examples
//!
//! ## Reading a file
//!
//! ```rust,no_run
//! # fn main() -> tagsplice::error::Result<()> {
//! use tagsplice::config::TagTypeRegistry;
//! use tagsplice::read_from_path;
//! use tagsplice::tag::{TagSystemView, TagType};
//!
//! let tagged_file = read_from_path("song.wv")?;
//!
//! // With cross-reading enabled (the default), the APE and ID3v1 tags are merged. For every
//! // field, the highest priority tag that has a value wins.
//! let view = tagged_file.read(TagType::Any, TagTypeRegistry::global());
//! println!("{:?} - {:?}", view.artist(), view.title());
//!
//! // Only look at the ID3v1 tag
//! let id3v1 = tagged_file.read(TagType::Id3v1, TagTypeRegistry::global());
//! # Ok(())
//! # }
//! ```
//!
//! ## Writing a tag
//!
//! ```rust,no_run
//! # fn main() -> tagsplice::error::Result<()> {
//! use tagsplice::config::{ReadOptions, TagTypeRegistry, WriteOptions};
//! use tagsplice::file::TaggedFile;
//! use tagsplice::tag::{TagData, TagType};
//! use std::fs::OpenOptions;
//!
//! let mut file = OpenOptions::new().read(true).write(true).open("song.wav")?;
//! let mut tagged_file = TaggedFile::read_from(&mut file, ReadOptions::new())?;
//!
//! // Only the fields set here change, everything else in the tag is kept
//! let mut data = TagData::new();
//! data.set_title("Title").set_track(3);
//!
//! tagged_file.write(
//! 	&mut file,
//! 	&data,
//! 	TagType::Native,
//! 	TagTypeRegistry::global(),
//! 	WriteOptions::new(),
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Rewriting arbitrary regions
//!
//! The engine behind writing is available on its own in the [`surgery`] module: describe the
//! replaceable regions of a file and the size/offset fields that depend on them, and it
//! produces the rewritten file in one pass.
//!
//! ```rust
//! # fn main() -> tagsplice::error::Result<()> {
//! use std::io::Cursor;
//! use tagsplice::surgery::{FileSurgeryPlan, PatchWidth, SizeMode, SizePatch, ZoneContents, rewrite};
//!
//! // A 4 byte big endian size field, followed by the 4 byte region it measures
//! let original = [0, 0, 0, 4, b'a', b'b', b'c', b'd'];
//!
//! let mut plan = FileSurgeryPlan::new();
//! plan.add_zone(4, 4, "body")?;
//! plan.add_size(
//! 	SizePatch::new(0, PatchWidth::U32, "body")
//! 		.mode(SizeMode::DeltaAdd)
//! 		.endianness(tagsplice::surgery::Endianness::Big),
//! );
//!
//! let mut contents = ZoneContents::new();
//! contents.insert(String::from("body"), b"longer".to_vec());
//!
//! let mut output = Vec::new();
//! rewrite(&mut Cursor::new(&original), &plan, &contents, &mut output)?;
//! assert_eq!(output, [0, 0, 0, 6, b'l', b'o', b'n', b'g', b'e', b'r']);
//! # Ok(())
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod config;
pub mod error;
pub mod file;
pub(crate) mod locate;
pub(crate) mod macros;
pub mod picture;
pub mod probe;
pub mod properties;
pub mod resolve;
pub mod surgery;
pub mod tag;
mod util;

pub(crate) mod ape;
pub(crate) mod dsd;
pub mod id3;
pub(crate) mod iff;
pub(crate) mod tak;
pub(crate) mod wavpack;

pub use crate::probe::{read_from, read_from_path};

pub use util::io;

pub mod prelude {
	//! A prelude for commonly used items in the library.
	//!
	//! This module is intended to be wildcard imported.
	//!
	//! ```rust
	//! use tagsplice::prelude::*;
	//! ```

	pub use crate::tag::{TagSystem, TagSystemView};
}

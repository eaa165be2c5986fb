use super::synchsafe::SynchsafeInteger;
use crate::error::Result;
use crate::macros::{decode_err, err};

use std::io::Read;

use byteorder::{BigEndian, ByteOrder};

/// The size of the ID3v2 header (and footer)
pub(crate) const ID3V2_HEADER_SIZE: u64 = 10;

/// The ID3v2 version
#[derive(PartialEq, Eq, Debug, Clone, Copy, PartialOrd, Ord)]
pub(crate) enum Id3v2Version {
	/// ID3v2.2
	V2,
	/// ID3v2.3
	V3,
	/// ID3v2.4
	V4,
}

/// Flags that apply to the entire tag
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct Id3v2TagFlags {
	pub(crate) unsynchronisation: bool,
	pub(crate) extended_header: bool,
	pub(crate) experimental: bool,
	pub(crate) footer: bool,
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct Id3v2Header {
	pub(crate) version: Id3v2Version,
	pub(crate) flags: Id3v2TagFlags,
	/// The size of the tag contents (**DOES NOT INCLUDE THE HEADER/FOOTER**)
	pub(crate) size: u32,
}

impl Id3v2Header {
	pub(crate) fn parse<R>(reader: &mut R) -> Result<Self>
	where
		R: Read,
	{
		let mut header = [0; ID3V2_HEADER_SIZE as usize];
		reader.read_exact(&mut header)?;

		if &header[..3] != b"ID3" {
			err!(FakeTag);
		}

		// Minor revisions are backwards compatible
		let version = match header[3] {
			2 => Id3v2Version::V2,
			3 => Id3v2Version::V3,
			4 => Id3v2Version::V4,
			_ => decode_err!(@BAIL "Found an unsupported ID3v2 version"),
		};

		let flags = header[5];

		// ID3v2.2 reserved bit 6 for a compression scheme that was never decided on
		if version == Id3v2Version::V2 && flags & 0x40 == 0x40 {
			decode_err!(@BAIL "Encountered a compressed ID3v2.2 tag");
		}

		let flags = Id3v2TagFlags {
			unsynchronisation: flags & 0x80 == 0x80,
			extended_header: version != Id3v2Version::V2 && flags & 0x40 == 0x40,
			experimental: version != Id3v2Version::V2 && flags & 0x20 == 0x20,
			footer: version == Id3v2Version::V4 && flags & 0x10 == 0x10,
		};

		Ok(Self {
			version,
			flags,
			size: BigEndian::read_u32(&header[6..]).unsynch(),
		})
	}

	/// The total size of the tag, including the header and footer
	pub(crate) fn full_tag_size(&self) -> u64 {
		let footer = if self.flags.footer { ID3V2_HEADER_SIZE } else { 0 };
		ID3V2_HEADER_SIZE + u64::from(self.size) + footer
	}
}

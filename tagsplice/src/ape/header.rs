use super::{APE_HEADER_SIZE, APE_PREAMBLE};
use crate::error::Result;
use crate::macros::{decode_err, err};

use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};

/// An APE tag header or footer
///
/// Both share the same layout, only the flags tell them apart.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ApeHeader {
	pub(crate) version: u32,
	/// The size of the items + footer, **excluding** the header
	pub(crate) size: u32,
	pub(crate) item_count: u32,
	pub(crate) flags: u32,
}

impl ApeHeader {
	/// Parse the 32 bytes of a header or footer, starting at the preamble
	pub(crate) fn parse<R>(reader: &mut R) -> Result<Self>
	where
		R: Read,
	{
		let mut preamble = [0; 8];
		reader.read_exact(&mut preamble)?;

		if &preamble != APE_PREAMBLE {
			err!(FakeTag);
		}

		let version = reader.read_u32::<LittleEndian>()?;
		let size = reader.read_u32::<LittleEndian>()?;
		if size < APE_HEADER_SIZE {
			// If the size is less than 32, something went wrong
			decode_err!(@BAIL "APE tag has an invalid size (< 32)");
		}

		let item_count = reader.read_u32::<LittleEndian>()?;
		if item_count > size / 11 {
			// 4 byte size + 4 byte flags + 2 byte key + null terminator + 1 byte value
			decode_err!(@BAIL "APE tag has an invalid item count");
		}

		let flags = reader.read_u32::<LittleEndian>()?;

		// Reserved, must be zero
		let mut reserved = [0; 8];
		reader.read_exact(&mut reserved)?;

		log::trace!("APE header: version {version}, size {size}, {item_count} item(s)");

		Ok(Self {
			version,
			size,
			item_count,
			flags,
		})
	}

	/// Whether the tag also carries a header (only meaningful in a footer)
	pub(crate) fn has_header(&self) -> bool {
		self.version >= 2000 && self.flags & (1 << 31) != 0
	}

	/// The total size of the tag, including the header
	pub(crate) fn full_tag_size(&self) -> u64 {
		let header = if self.has_header() { APE_HEADER_SIZE } else { 0 };
		u64::from(self.size) + u64::from(header)
	}
}

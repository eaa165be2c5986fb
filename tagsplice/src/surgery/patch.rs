use crate::error::Result;

use std::io::Read;

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt};

/// The byte order of a patched integer
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Endianness {
	/// Least significant byte first (RIFF, DSF, APE)
	#[default]
	Little,
	/// Most significant byte first
	Big,
}

/// The width of a patched integer
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PatchWidth {
	/// 1 byte
	U8 = 1,
	/// 2 bytes
	U16 = 2,
	/// 4 bytes
	U32 = 4,
	/// 8 bytes
	U64 = 8,
}

impl PatchWidth {
	/// The number of bytes the integer occupies
	pub fn bytes(self) -> u64 {
		u64::from(self as u8)
	}

	/// The largest value that fits
	pub fn max_value(self) -> u64 {
		match self {
			Self::U8 => u64::from(u8::MAX),
			Self::U16 => u64::from(u16::MAX),
			Self::U32 => u64::from(u32::MAX),
			Self::U64 => u64::MAX,
		}
	}

	pub(crate) fn read<R>(self, reader: &mut R, endianness: Endianness) -> Result<u64>
	where
		R: Read,
	{
		let value = match (self, endianness) {
			(Self::U8, _) => u64::from(reader.read_u8()?),
			(Self::U16, Endianness::Little) => u64::from(reader.read_u16::<LittleEndian>()?),
			(Self::U16, Endianness::Big) => u64::from(reader.read_u16::<BigEndian>()?),
			(Self::U32, Endianness::Little) => u64::from(reader.read_u32::<LittleEndian>()?),
			(Self::U32, Endianness::Big) => u64::from(reader.read_u32::<BigEndian>()?),
			(Self::U64, Endianness::Little) => reader.read_u64::<LittleEndian>()?,
			(Self::U64, Endianness::Big) => reader.read_u64::<BigEndian>()?,
		};

		Ok(value)
	}

	/// Encode `value`, which must already be known to fit
	pub(crate) fn encode(self, value: u64, endianness: Endianness) -> Vec<u8> {
		let mut buf = [0; 8];
		let width = self.bytes() as usize;

		match endianness {
			Endianness::Little => LittleEndian::write_uint(&mut buf, value, width),
			Endianness::Big => BigEndian::write_uint(&mut buf, value, width),
		}

		buf[..width].to_vec()
	}
}

/// How a [`SizePatch`] derives its new value
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum SizeMode {
	/// The field holds exactly the zone's size, and becomes its new size
	Absolute,
	/// The field covers the zone among other things, and is adjusted by the zone's size delta
	#[default]
	DeltaAdd,
}

/// A length field that depends on the size of a zone
///
/// Several [`SizeMode::DeltaAdd`] patches may target the same field (a RIFF size covering two
/// zones), their deltas are summed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SizePatch {
	pub(crate) target_offset: u64,
	pub(crate) width: PatchWidth,
	pub(crate) endianness: Endianness,
	pub(crate) zone: String,
	pub(crate) mode: SizeMode,
	pub(crate) value: Option<u64>,
}

impl SizePatch {
	/// Create a little endian, [`SizeMode::DeltaAdd`] patch
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsplice::surgery::{Endianness, PatchWidth, SizeMode, SizePatch};
	///
	/// // The RIFF size field, covering the "id3 " chunk
	/// let riff_size = SizePatch::new(4, PatchWidth::U32, "id3v2");
	///
	/// // A big endian field holding exactly the tag's size
	/// let tag_size = SizePatch::new(8, PatchWidth::U32, "tag")
	/// 	.endianness(Endianness::Big)
	/// 	.mode(SizeMode::Absolute);
	/// ```
	pub fn new(target_offset: u64, width: PatchWidth, zone: impl Into<String>) -> Self {
		Self {
			target_offset,
			width,
			endianness: Endianness::Little,
			zone: zone.into(),
			mode: SizeMode::DeltaAdd,
			value: None,
		}
	}

	/// Set the byte order of the field
	pub fn endianness(mut self, endianness: Endianness) -> Self {
		self.endianness = endianness;
		self
	}

	/// Set how the new value is derived
	pub fn mode(mut self, mode: SizeMode) -> Self {
		self.mode = mode;
		self
	}

	/// The field's current value, if already known
	///
	/// When unset, the value is read from the original stream.
	pub fn value(mut self, value: u64) -> Self {
		self.value = Some(value);
		self
	}

	/// The offset of the field in the original file
	pub fn target_offset(&self) -> u64 {
		self.target_offset
	}

	/// The name of the zone the field depends on
	pub fn zone(&self) -> &str {
		&self.zone
	}
}

/// An absolute file offset that must follow the bytes it points to
///
/// When linked to a zone that ends up empty, the pointer is written as `0`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexPatch {
	pub(crate) target_offset: u64,
	pub(crate) width: PatchWidth,
	pub(crate) endianness: Endianness,
	pub(crate) zone: Option<String>,
	pub(crate) value: Option<u64>,
}

impl IndexPatch {
	/// Create a little endian index patch
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsplice::surgery::{IndexPatch, PatchWidth};
	///
	/// // DSF's metadata pointer
	/// let pointer = IndexPatch::new(20, PatchWidth::U64).linked_zone("id3v2");
	/// ```
	pub fn new(target_offset: u64, width: PatchWidth) -> Self {
		Self {
			target_offset,
			width,
			endianness: Endianness::Little,
			zone: None,
			value: None,
		}
	}

	/// Set the byte order of the field
	pub fn endianness(mut self, endianness: Endianness) -> Self {
		self.endianness = endianness;
		self
	}

	/// Link the pointer to the zone it points at
	pub fn linked_zone(mut self, zone: impl Into<String>) -> Self {
		self.zone = Some(zone.into());
		self
	}

	/// The field's current value, if already known
	pub fn value(mut self, value: u64) -> Self {
		self.value = Some(value);
		self
	}

	/// The offset of the field in the original file
	pub fn target_offset(&self) -> u64 {
		self.target_offset
	}

	/// The zone the pointer is linked to, if any
	pub fn zone(&self) -> Option<&str> {
		self.zone.as_deref()
	}
}

#[cfg(test)]
mod tests {
	use super::{Endianness, PatchWidth};

	#[test_log::test]
	fn encode_widths() {
		assert_eq!(PatchWidth::U8.encode(0xAB, Endianness::Little), [0xAB]);
		assert_eq!(
			PatchWidth::U16.encode(0x1234, Endianness::Big),
			[0x12, 0x34]
		);
		assert_eq!(
			PatchWidth::U32.encode(0x1234, Endianness::Little),
			[0x34, 0x12, 0, 0]
		);
		assert_eq!(
			PatchWidth::U64.encode(1, Endianness::Big),
			[0, 0, 0, 0, 0, 0, 0, 1]
		);
	}

	#[test_log::test]
	fn read_widths() {
		let data = [0x01, 0x02, 0x03, 0x04];

		assert_eq!(
			PatchWidth::U32
				.read(&mut &data[..], Endianness::Little)
				.unwrap(),
			0x0403_0201
		);
		assert_eq!(
			PatchWidth::U16.read(&mut &data[..], Endianness::Big).unwrap(),
			0x0102
		);
		assert!(PatchWidth::U64.read(&mut &data[..], Endianness::Big).is_err());
	}

	#[test_log::test]
	fn max_values() {
		assert_eq!(PatchWidth::U8.max_value(), 255);
		assert_eq!(PatchWidth::U32.max_value(), u64::from(u32::MAX));
	}
}

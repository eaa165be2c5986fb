use super::FMT_CHUNK_SIZE;
use crate::error::Result;
use crate::macros::decode_err;
use crate::properties::{FileProperties, duration_of};

use byteorder::{LittleEndian, ReadBytesExt};

/// The contents of a DSF `fmt ` chunk, after the chunk header
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) struct DsfFormat {
	pub(super) version: u32,
	pub(super) channels: u32,
	pub(super) sample_rate: u32,
	pub(super) bits_per_sample: u32,
	pub(super) sample_count: u64,
}

impl DsfFormat {
	/// The size of the chunk body
	pub(super) const SIZE: u64 = FMT_CHUNK_SIZE - 12;

	pub(super) fn parse(mut body: &[u8]) -> Result<Self> {
		let reader = &mut body;

		let version = reader.read_u32::<LittleEndian>()?;
		if version > 1 {
			log::error!("DSF format version {version} is not supported");
			decode_err!(@BAIL Dsf, "Unsupported DSF format version");
		}

		// Format ID (4), channel type (4)
		let _format_id = reader.read_u32::<LittleEndian>()?;
		let _channel_type = reader.read_u32::<LittleEndian>()?;

		let channels = reader.read_u32::<LittleEndian>()?;
		let sample_rate = reader.read_u32::<LittleEndian>()?;
		let bits_per_sample = reader.read_u32::<LittleEndian>()?;
		let sample_count = reader.read_u64::<LittleEndian>()?;

		if channels == 0 || sample_rate == 0 {
			decode_err!(@BAIL Dsf, "Format chunk contains 0 channels or a sample rate of 0");
		}

		Ok(Self {
			version,
			channels,
			sample_rate,
			bits_per_sample,
			sample_count,
		})
	}

	pub(super) fn properties(&self, audio_size: u64, file_length: u64) -> FileProperties {
		let duration = duration_of(self.sample_count, self.sample_rate);

		FileProperties::timed(duration, audio_size, file_length)
			.format(
				self.sample_rate,
				u8::try_from(self.bits_per_sample).ok(),
				u8::try_from(self.channels).ok(),
			)
			.lossless(true)
	}
}

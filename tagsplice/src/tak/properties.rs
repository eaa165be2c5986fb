use crate::error::Result;
use crate::macros::decode_err;
use crate::properties::{FileProperties, duration_of};

use byteorder::{LittleEndian, ReadBytesExt};

/// The size of the fields read from a stream info block
pub(super) const STREAM_INFO_SIZE: u32 = 10;

const SAMPLE_RATE_BASE: u32 = 6000;
const BIT_DEPTH_BASE: u8 = 8;

/// The parts of a TAK stream info block needed for the audio properties
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(super) struct StreamInfo {
	pub(super) total_samples: u64,
	pub(super) sample_rate: u32,
	pub(super) bit_depth: u8,
	pub(super) channels: u8,
}

impl StreamInfo {
	// Layout, starting after the encoder/frame size fields:
	//
	// u16: bits 14..16 = sample count bits 0..2
	// u32: sample count bits 2..34
	// u32: bit 7 = sample count bit 34, bits 4..22 = sample rate - 6000,
	//      bits 22..27 = bit depth - 8, bits 27..31 = channels - 1
	pub(super) fn parse(mut block: &[u8]) -> Result<Self> {
		if block.len() < STREAM_INFO_SIZE as usize {
			decode_err!(@BAIL Tak, "Stream info block is too small");
		}

		let reader = &mut block;

		let low = reader.read_u16::<LittleEndian>()?;
		let middle = reader.read_u32::<LittleEndian>()?;
		let rest = reader.read_u32::<LittleEndian>()?;

		let total_samples = u64::from(low >> 14)
			| (u64::from(middle) << 2)
			| (u64::from(rest & 0x80) << 27);

		Ok(Self {
			total_samples,
			sample_rate: ((rest >> 4) & 0x3_FFFF) + SAMPLE_RATE_BASE,
			bit_depth: ((rest >> 22) & 0x1F) as u8 + BIT_DEPTH_BASE,
			channels: ((rest >> 27) & 0xF) as u8 + 1,
		})
	}

	pub(super) fn properties(&self, audio_size: u64, file_length: u64) -> FileProperties {
		let duration = duration_of(self.total_samples, self.sample_rate);

		FileProperties::timed(duration, audio_size, file_length)
			.format(self.sample_rate, Some(self.bit_depth), Some(self.channels))
			.lossless(true)
	}
}

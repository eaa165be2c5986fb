use crate::error::Result;
use crate::macros::decode_err;
use crate::properties::{FileProperties, bitrate, duration_of};

use std::time::Duration;

use byteorder::{LittleEndian, ReadBytesExt};

const PCM: u16 = 0x0001;
const IEEE_FLOAT: u16 = 0x0003;
const EXTENSIBLE: u16 = 0xFFFE;

/// The parts of a `fmt ` chunk needed for the audio properties
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct FmtChunk {
	pub(crate) format_tag: u16,
	pub(crate) channels: u16,
	pub(crate) sample_rate: u32,
	pub(crate) bytes_per_second: u32,
	pub(crate) block_align: u16,
	pub(crate) bits_per_sample: u16,
	pub(crate) valid_bits_per_sample: Option<u16>,
}

impl FmtChunk {
	pub(crate) fn parse(content: &[u8]) -> Result<Self> {
		if content.len() < 16 {
			decode_err!(@BAIL Wav, "File does not contain a valid \"fmt \" chunk");
		}

		let reader = &mut &content[..];

		let mut fmt = FmtChunk {
			format_tag: reader.read_u16::<LittleEndian>()?,
			channels: reader.read_u16::<LittleEndian>()?,
			sample_rate: reader.read_u32::<LittleEndian>()?,
			bytes_per_second: reader.read_u32::<LittleEndian>()?,
			block_align: reader.read_u16::<LittleEndian>()?,
			bits_per_sample: reader.read_u16::<LittleEndian>()?,
			valid_bits_per_sample: None,
		};

		if fmt.format_tag == EXTENSIBLE {
			if content.len() < 40 {
				decode_err!(@BAIL Wav, "Extensible format identified, invalid \"fmt \" chunk size found (< 40)");
			}

			// cbSize (Size of extra format information) (2)
			let _cb_size = reader.read_u16::<LittleEndian>()?;
			fmt.valid_bits_per_sample = Some(reader.read_u16::<LittleEndian>()?);
			// Channel mask (4)
			let _channel_mask = reader.read_u32::<LittleEndian>()?;
			// The first 2 bytes of the sub format GUID are the actual format tag
			fmt.format_tag = reader.read_u16::<LittleEndian>()?;
		}

		Ok(fmt)
	}

	fn is_pcm(&self) -> bool {
		self.format_tag == PCM || self.format_tag == IEEE_FLOAT
	}
}

pub(super) fn read_properties(
	fmt: &FmtChunk,
	mut total_samples: u32,
	stream_len: u32,
	file_length: u64,
) -> Result<FileProperties> {
	if fmt.channels == 0 {
		decode_err!(@BAIL Wav, "File contains 0 channels");
	}

	let channels = fmt.channels as u8;
	let bytes_per_sample = fmt.block_align / fmt.channels;

	let bit_depth = match fmt.valid_bits_per_sample {
		Some(valid) if valid > 0 => valid as u8,
		_ if fmt.bits_per_sample > 0 => fmt.bits_per_sample as u8,
		_ => bytes_per_sample.saturating_mul(8) as u8,
	};

	if !fmt.is_pcm() && total_samples == 0 {
		decode_err!(@BAIL Wav, "Non-PCM format identified, no \"fact\" chunk found");
	}

	if fmt.bits_per_sample >= 8 && (total_samples == 0 || fmt.is_pcm()) {
		total_samples =
			stream_len / (u32::from(fmt.channels) * u32::from(fmt.bits_per_sample / 8));
	}

	let duration = if fmt.sample_rate > 0 && total_samples > 0 {
		log::debug!("Calculating duration and bitrate from total samples");
		duration_of(u64::from(total_samples), fmt.sample_rate)
	} else if stream_len > 0 && fmt.bytes_per_second > 0 {
		log::debug!("Calculating duration and bitrate from stream length/byte rate");
		let millis = (u64::from(stream_len) * 1000) / u64::from(fmt.bytes_per_second);
		Duration::from_millis(millis)
	} else {
		log::warn!("Unable to calculate duration and bitrate");
		Duration::ZERO
	};

	let mut properties = FileProperties::timed(duration, u64::from(stream_len), file_length)
		.format(fmt.sample_rate, Some(bit_depth), Some(channels))
		.lossless(fmt.is_pcm());

	// The byte rate is exact, the stream length may include trailing junk
	if fmt.bytes_per_second > 0 {
		properties.audio_bitrate = bitrate(u64::from(fmt.bytes_per_second), Duration::from_secs(1));
	}

	Ok(properties)
}

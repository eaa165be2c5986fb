use super::WAVPACK_MAGIC;
use crate::config::ParsingMode;
use crate::error::Result;
use crate::macros::{decode_err, err, parse_mode_choice, try_vec};
use crate::properties::{FileProperties, duration_of};

use std::io::{Read, Seek, SeekFrom};
use std::time::Duration;

use byteorder::{LittleEndian, ReadBytesExt};

// https://wiki.multimedia.cx/index.php?title=WavPack#Block_structure

const BYTES_PER_SAMPLE_MASK: u32 = 3;
const BIT_DEPTH_SHL: u32 = 13;
const BIT_DEPTH_SHIFT_MASK: u32 = 0x1F << BIT_DEPTH_SHL;
const FLAG_INITIAL_BLOCK: u32 = 0x800;
const FLAG_FINAL_BLOCK: u32 = 0x1000;
const FLAG_MONO: u32 = 0x0004;
const FLAG_HYBRID_COMPRESSION: u32 = 8;

// https://wiki.multimedia.cx/index.php?title=WavPack#Metadata

const ID_FLAG_ODD_SIZE: u8 = 0x40;
const ID_FLAG_LARGE_SIZE: u8 = 0x80;

const ID_MULTICHANNEL: u8 = 0x0D;
const ID_NON_STANDARD_SAMPLE_RATE: u8 = 0x27;

const MIN_STREAM_VERSION: u16 = 0x402;
const MAX_STREAM_VERSION: u16 = 0x410;

const SAMPLE_RATES: [u32; 15] = [
	6000, 8000, 9600, 11025, 12000, 16000, 22050, 24000, 32000, 44100, 48000, 64000, 88200, 96000,
	192_000,
];
const CUSTOM_SAMPLE_RATE: usize = 15;
const FALLBACK_SAMPLE_RATE: u32 = 44100;

// v3 header flags
const V3_FLAG_MONO: u16 = 1;
const V3_FLAG_WVC: u16 = 0x80;
const V3_FLAG_NEW_HIGH: u16 = 0x400;

// According to the format documentation, the max block size is 1MB
const WV_BLOCK_MAX_SIZE: u32 = 1_048_576;

/// What both stream versions report about the audio
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(super) struct StreamInfo {
	pub(super) version: u16,
	pub(super) total_samples: u32,
	pub(super) sample_rate: u32,
	pub(super) channels: u16,
	pub(super) bit_depth: u8,
	pub(super) lossless: bool,
}

impl StreamInfo {
	pub(super) fn properties(&self, stream_length: u64, file_length: u64) -> FileProperties {
		// An unknown sample count is stored as -1
		let duration = if self.total_samples == !0 {
			log::warn!("Unable to calculate duration, the sample count is unknown");
			Duration::ZERO
		} else {
			duration_of(u64::from(self.total_samples), self.sample_rate)
		};

		FileProperties::timed(duration, stream_length, file_length)
			.format(
				self.sample_rate,
				Some(self.bit_depth),
				u8::try_from(self.channels).ok(),
			)
			.lossless(self.lossless)
	}
}

#[derive(Debug)]
struct BlockHeader {
	version: u16,
	block_size: u32,
	total_samples: u32,
	samples: u32,
	flags: u32,
}

/// Read the stream info from the v4 blocks starting at `stream_start`
#[rustfmt::skip]
pub(super) fn read_v4<R>(reader: &mut R, stream_start: u64, stream_end: u64, parse_mode: ParsingMode) -> Result<StreamInfo>
where
	R: Read + Seek,
{
	let mut info = StreamInfo::default();

	let mut offset = stream_start;
	while offset < stream_end {
		reader.seek(SeekFrom::Start(offset))?;

		let block_header = match parse_block_header(reader) {
			Ok(header) => header,
			Err(e) if parse_mode == ParsingMode::Strict => return Err(e),
			Err(_) => break,
		};

		let flags = block_header.flags;
		let sample_rate_idx = ((flags >> 23) & 0xF) as usize;

		if sample_rate_idx == CUSTOM_SAMPLE_RATE {
			let mut block_contents = try_vec![0; (block_header.block_size - 24) as usize];
			if reader.read_exact(&mut block_contents).is_err() {
				parse_mode_choice!(
					parse_mode,
					STRICT: decode_err!(@BAIL WavPack, "Block size mismatch"),
					DEFAULT: break
				);
			}

			if let Err(e) = read_metadata_sub_blocks(&block_contents, &mut info) {
				parse_mode_choice!(
					parse_mode,
					STRICT: return Err(e),
					DEFAULT: break
				);
			}

			if info.sample_rate == 0 {
				parse_mode_choice!(
					parse_mode,
					STRICT: decode_err!(@BAIL WavPack, "Expected a custom sample rate"),
					DEFAULT: info.sample_rate = FALLBACK_SAMPLE_RATE
				);
			}
		} else {
			info.sample_rate = SAMPLE_RATES[sample_rate_idx];
		}

		if flags & FLAG_INITIAL_BLOCK == FLAG_INITIAL_BLOCK {
			if block_header.version < MIN_STREAM_VERSION
				|| block_header.version > MAX_STREAM_VERSION
			{
				parse_mode_choice!(
					parse_mode,
					STRICT: decode_err!(@BAIL WavPack, "Unsupported stream version encountered"),
					DEFAULT: break
				);
			}

			info.version = block_header.version;
			info.total_samples = block_header.total_samples;
			info.bit_depth = (((flags & BYTES_PER_SAMPLE_MASK) + 1) * 8).saturating_sub((flags & BIT_DEPTH_SHIFT_MASK) >> BIT_DEPTH_SHL) as u8;
			info.lossless = flags & FLAG_HYBRID_COMPRESSION == 0;

			// Simple mono and stereo streams are a single block that's both initial and final
			if flags & FLAG_FINAL_BLOCK > 0 && info.channels == 0 {
				info.channels = if flags & FLAG_MONO > 0 { 1 } else { 2 };
			}
		}

		offset += u64::from(block_header.block_size + 8);

		if block_header.samples > 0 && flags & FLAG_FINAL_BLOCK == FLAG_FINAL_BLOCK {
			break;
		}
	}

	if info.version == 0 {
		decode_err!(@BAIL WavPack, "No initial WavPack block found");
	}

	if info.channels == 0 {
		info.channels = 2;
	}

	Ok(info)
}

fn parse_block_header<R>(reader: &mut R) -> Result<BlockHeader>
where
	R: Read + Seek,
{
	let mut wv_ident = [0; 4];
	reader.read_exact(&mut wv_ident)?;

	if &wv_ident != WAVPACK_MAGIC {
		decode_err!(@BAIL WavPack, "Expected a WavPack block");
	}

	let block_size = reader.read_u32::<LittleEndian>()?;
	if !(24..=WV_BLOCK_MAX_SIZE).contains(&block_size) {
		decode_err!(@BAIL WavPack, "WavPack block has an invalid size");
	}

	let version = reader.read_u16::<LittleEndian>()?;

	// Track number (1)
	// Track sub index (1)
	reader.seek(SeekFrom::Current(2))?;

	let total_samples = reader.read_u32::<LittleEndian>()?;
	let _block_idx = reader.read_u32::<LittleEndian>()?;
	let samples = reader.read_u32::<LittleEndian>()?;
	let flags = reader.read_u32::<LittleEndian>()?;
	let _crc = reader.read_u32::<LittleEndian>()?;

	Ok(BlockHeader {
		version,
		block_size,
		total_samples,
		samples,
		flags,
	})
}

fn read_metadata_sub_blocks(block_content: &[u8], info: &mut StreamInfo) -> Result<()> {
	let reader = &mut &block_content[..];
	while reader.len() >= 2 {
		let id = reader.read_u8()?;
		let mut size = u32::from(reader.read_u8()?) << 1;

		if id & ID_FLAG_LARGE_SIZE > 0 {
			size += u32::from(reader.read_u8()?) << 9;
			size += u32::from(reader.read_u8()?) << 17;
		}

		if size == 0 {
			continue;
		}

		if (size as usize) > reader.len() {
			err!(SizeMismatch);
		}

		let (mut content, rem) = reader.split_at(size as usize);
		*reader = rem;

		if id & ID_FLAG_ODD_SIZE > 0 {
			content = &content[..content.len() - 1];
		}

		match id & 0x3F {
			ID_NON_STANDARD_SAMPLE_RATE => {
				if content.len() < 3 {
					decode_err!(@BAIL WavPack, "Encountered an invalid block size for non-standard sample rate");
				}

				info.sample_rate = content.read_u24::<LittleEndian>()?;
			},
			ID_MULTICHANNEL => {
				if content.is_empty() {
					decode_err!(@BAIL WavPack, "Unable to extract channel information");
				}

				let mut channels = u16::from(content[0]);

				// Streams with more than 255 channels store the upper bits after the count
				if content.len() >= 6 {
					channels |= u16::from(content[1] & 0xF) << 8;
					channels += 1;
				}

				info.channels = channels;
			},
			_ => {},
		}
	}

	Ok(())
}

/// A legacy (v3) WavPack header, found at the start of the RIFF `data` chunk
///
/// The sample rate and channel count come from the `fmt ` chunk.
pub(super) fn read_v3(header: &[u8], sample_rate: u32) -> Result<StreamInfo> {
	// ckID (4), ckSize (4), version (2), bits (2), flags (2), shift (2), total_samples (4)
	if header.len() < 20 || &header[..4] != WAVPACK_MAGIC {
		decode_err!(@BAIL WavPack, "Expected a v3 WavPack header");
	}

	let reader = &mut &header[8..];
	let version = reader.read_u16::<LittleEndian>()?;
	let bits = reader.read_u16::<LittleEndian>()?;
	let flags = reader.read_u16::<LittleEndian>()?;
	let _shift = reader.read_u16::<LittleEndian>()?;
	let total_samples = reader.read_u32::<LittleEndian>()?;

	// `bits` is only set for lossy encodes, a hybrid encode with a correction file is
	// still lossless
	let lossless = bits == 0 || (flags & V3_FLAG_NEW_HIGH > 0 && flags & V3_FLAG_WVC > 0);

	Ok(StreamInfo {
		version,
		total_samples,
		sample_rate: if sample_rate == 0 { FALLBACK_SAMPLE_RATE } else { sample_rate },
		channels: if flags & V3_FLAG_MONO > 0 { 1 } else { 2 },
		bit_depth: 0,
		lossless,
	})
}

#[cfg(test)]
pub(super) mod tests {
	use super::{read_v3, read_v4};
	use crate::config::ParsingMode;

	use std::io::Cursor;

	pub(in crate::wavpack) fn v4_block(total_samples: u32, flags: u32) -> Vec<u8> {
		let mut block = b"wvpk".to_vec();
		block.extend_from_slice(&24u32.to_le_bytes());
		block.extend_from_slice(&0x410u16.to_le_bytes());
		block.extend_from_slice(&[0, 0]);
		block.extend_from_slice(&total_samples.to_le_bytes());
		block.extend_from_slice(&0u32.to_le_bytes());
		block.extend_from_slice(&total_samples.to_le_bytes());
		block.extend_from_slice(&flags.to_le_bytes());
		block.extend_from_slice(&0u32.to_le_bytes());
		block
	}

	// 16-bit, 44.1kHz, initial + final block
	pub(in crate::wavpack) const STEREO_16: u32 = 1 | (9 << 23) | 0x800 | 0x1000;

	#[test_log::test]
	fn v4_stereo() {
		let block = v4_block(44100 * 3, STEREO_16);
		let info = read_v4(&mut Cursor::new(&block), 0, 32, ParsingMode::Strict).unwrap();

		assert_eq!(info.sample_rate, 44100);
		assert_eq!(info.channels, 2);
		assert_eq!(info.bit_depth, 16);
		assert_eq!(info.total_samples, 132_300);
		assert!(info.lossless);
	}

	#[test_log::test]
	fn v4_hybrid_mono() {
		let block = v4_block(1000, STEREO_16 | 4 | 8);
		let info = read_v4(&mut Cursor::new(&block), 0, 32, ParsingMode::Strict).unwrap();

		assert_eq!(info.channels, 1);
		assert!(!info.lossless);
	}

	#[test_log::test]
	fn v4_garbage() {
		let garbage = vec![0; 64];
		assert!(read_v4(&mut Cursor::new(&garbage), 0, 64, ParsingMode::BestAttempt).is_err());
	}

	#[test_log::test]
	fn v3_header() {
		let mut header = b"wvpk".to_vec();
		header.extend_from_slice(&28u32.to_le_bytes());
		header.extend_from_slice(&3u16.to_le_bytes());
		header.extend_from_slice(&0u16.to_le_bytes());
		header.extend_from_slice(&1u16.to_le_bytes());
		header.extend_from_slice(&0u16.to_le_bytes());
		header.extend_from_slice(&22050u32.to_le_bytes());

		let info = read_v3(&header, 22050).unwrap();
		assert_eq!(info.version, 3);
		assert_eq!(info.channels, 1);
		assert_eq!(info.total_samples, 22050);
		assert!(info.lossless);

		let properties = info.properties(1000, 1100);
		assert_eq!(properties.duration().as_secs(), 1);
	}
}

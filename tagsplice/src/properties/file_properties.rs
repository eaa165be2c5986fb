use super::bitrate;

use std::time::Duration;

/// The audio properties of a file
///
/// Bitrates are averages over the whole duration. The overall bitrate counts every byte of the
/// file (tags included), the audio bitrate only the audio region.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
#[non_exhaustive]
pub struct FileProperties {
	pub(crate) duration: Duration,
	pub(crate) overall_bitrate: Option<u32>,
	pub(crate) audio_bitrate: Option<u32>,
	pub(crate) sample_rate: Option<u32>,
	pub(crate) bit_depth: Option<u8>,
	pub(crate) channels: Option<u8>,
	pub(crate) lossless: bool,
}

impl FileProperties {
	// `audio_size` bytes of audio lasting `duration`, stored in a `file_length` byte file
	pub(crate) fn timed(duration: Duration, audio_size: u64, file_length: u64) -> Self {
		Self {
			duration,
			overall_bitrate: bitrate(file_length, duration),
			audio_bitrate: bitrate(audio_size, duration),
			..Self::default()
		}
	}

	pub(crate) fn format(mut self, sample_rate: u32, bit_depth: Option<u8>, channels: Option<u8>) -> Self {
		self.sample_rate = Some(sample_rate);
		self.bit_depth = bit_depth.filter(|bits| *bits > 0);
		self.channels = channels.filter(|channels| *channels > 0);
		self
	}

	pub(crate) fn lossless(mut self, lossless: bool) -> Self {
		self.lossless = lossless;
		self
	}

	/// Duration of the audio
	pub fn duration(&self) -> Duration {
		self.duration
	}

	/// Overall bitrate (kbps)
	pub fn overall_bitrate(&self) -> Option<u32> {
		self.overall_bitrate
	}

	/// Audio bitrate (kbps)
	pub fn audio_bitrate(&self) -> Option<u32> {
		self.audio_bitrate
	}

	/// Sample rate (Hz)
	pub fn sample_rate(&self) -> Option<u32> {
		self.sample_rate
	}

	/// Bits per sample, `1` for DSD
	pub fn bit_depth(&self) -> Option<u8> {
		self.bit_depth
	}

	/// Channel count
	pub fn channels(&self) -> Option<u8> {
		self.channels
	}

	/// Whether the audio is stored without loss (PCM, DSD, lossless compression)
	pub fn is_lossless(&self) -> bool {
		self.lossless
	}

	/// Whether nothing is known about the audio
	///
	/// This is the case when the file was read with
	/// [`ReadOptions::read_properties`](crate::config::ReadOptions::read_properties) disabled.
	pub fn is_empty(&self) -> bool {
		*self == Self::default()
	}
}

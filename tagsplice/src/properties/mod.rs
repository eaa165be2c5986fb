//! Generic audio properties
//!
//! Every container reports its properties as a [`FileProperties`]. Fields the container
//! doesn't store (or that couldn't be calculated) are `None`.

mod file_properties;

pub use file_properties::FileProperties;

use std::time::Duration;

/// Bitrate in kbps of `byte_len` bytes played over `duration`
pub(crate) fn bitrate(byte_len: u64, duration: Duration) -> Option<u32> {
	let millis = duration.as_millis();
	if millis == 0 {
		return None;
	}

	Some(((u128::from(byte_len) * 8 + millis / 2) / millis) as u32)
}

/// Duration of `total_samples` samples at `sample_rate`
pub(crate) fn duration_of(total_samples: u64, sample_rate: u32) -> Duration {
	if sample_rate == 0 {
		return Duration::ZERO;
	}

	let millis = (u128::from(total_samples) * 1000) / u128::from(sample_rate);
	Duration::from_millis(millis as u64)
}

#[cfg(test)]
mod tests {
	use super::{FileProperties, bitrate, duration_of};

	use std::time::Duration;

	#[test_log::test]
	fn bitrate_rounds() {
		// 176,400 bytes per second is 1411.2 kbps
		assert_eq!(bitrate(176_400, Duration::from_secs(1)), Some(1411));
		assert_eq!(bitrate(1000, Duration::ZERO), None);
	}

	#[test_log::test]
	fn durations() {
		assert_eq!(duration_of(44100 * 3, 44100), Duration::from_secs(3));
		assert_eq!(duration_of(22050, 44100), Duration::from_millis(500));
		assert_eq!(duration_of(1000, 0), Duration::ZERO);
	}

	#[test_log::test]
	fn default_is_empty() {
		assert!(FileProperties::default().is_empty());
	}
}

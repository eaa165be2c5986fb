use crate::config::ParsingMode;
use crate::error::{ErrorKind, Result, SpliceError};
use crate::macros::err;

use std::fmt::Display;
use std::str::FromStr;

/// A subset of the ISO 8601 timestamp format
///
/// Every segment after the year is optional, but may only be present if the segment before it is.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default, PartialOrd, Ord)]
#[allow(missing_docs)]
pub struct Timestamp {
	pub year: u16,
	pub month: Option<u8>,
	pub day: Option<u8>,
	pub hour: Option<u8>,
	pub minute: Option<u8>,
	pub second: Option<u8>,
}

// The separators allowed in front of each segment, and the segment's limits
const SEGMENTS: [(&[u8], u8, u8); 5] = [
	(b"-", 1, 12),
	(b"-", 1, 31),
	(b"T ", 0, 23),
	(b":", 0, 59),
	(b":", 0, 59),
];

impl Timestamp {
	/// The maximum length of a timestamp in bytes
	pub const MAX_LENGTH: usize = 19;

	/// A timestamp with only a year
	pub fn from_year(year: u16) -> Self {
		Self {
			year,
			..Self::default()
		}
	}

	/// Parse a [`Timestamp`]
	///
	/// Returns `Ok(None)` for empty input.
	///
	/// Outside of [`ParsingMode::Strict`], surrounding whitespace is ignored and parsing stops at
	/// the first malformed segment, keeping the segments before it.
	///
	/// # Errors
	///
	/// * The year isn't 4 digits
	/// * [`ParsingMode::Strict`]: any malformed segment or trailing data
	pub fn parse(text: &str, parse_mode: ParsingMode) -> Result<Option<Self>> {
		let strict = parse_mode == ParsingMode::Strict;
		let text = if strict { text } else { text.trim() };

		if text.is_empty() {
			if strict {
				err!(BadTimestamp("Timestamp is empty"));
			}

			return Ok(None);
		}

		let bytes = text.as_bytes();
		if bytes.len() < 4 || !bytes[..4].iter().all(u8::is_ascii_digit) {
			err!(BadTimestamp(
				"Encountered an invalid year length (should be 4 digits)"
			));
		}

		let mut timestamp = Self::from_year(parse_number(&bytes[..4]));

		let mut segments = [None; 5];
		let mut rest = &bytes[4..];
		for (index, (separators, min, max)) in SEGMENTS.iter().enumerate() {
			let Some((separator, after)) = rest.split_first() else {
				break;
			};

			let digits = after
				.iter()
				.take(2)
				.take_while(|b| b.is_ascii_digit())
				.count();

			if !separators.contains(separator) || digits == 0 {
				if strict {
					err!(BadTimestamp("Timestamp segment is malformed"));
				}

				log::debug!("Stopping timestamp parsing at segment {index}");
				break;
			}

			let value = parse_number(&after[..digits]) as u8;
			if value < *min || value > *max {
				if strict {
					err!(BadTimestamp(
						"Timestamp contains segment(s) that exceed their limits"
					));
				}

				break;
			}

			segments[index] = Some(value);
			rest = &after[digits..];
		}

		if strict && !rest.is_empty() {
			err!(BadTimestamp("Timestamp contains trailing data"));
		}

		[
			timestamp.month,
			timestamp.day,
			timestamp.hour,
			timestamp.minute,
			timestamp.second,
		] = segments;

		Ok(Some(timestamp))
	}
}

fn parse_number(digits: &[u8]) -> u16 {
	digits
		.iter()
		.fold(0u16, |acc, d| acc * 10 + u16::from(d - b'0'))
}

impl Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:04}", self.year)?;

		let segments = [
			("-", self.month),
			("-", self.day),
			("T", self.hour),
			(":", self.minute),
			(":", self.second),
		];

		for (separator, segment) in segments {
			let Some(segment) = segment else {
				break;
			};

			write!(f, "{separator}{segment:02}")?;
		}

		Ok(())
	}
}

impl FromStr for Timestamp {
	type Err = SpliceError;

	fn from_str(s: &str) -> Result<Self> {
		Timestamp::parse(s, ParsingMode::BestAttempt)?
			.ok_or_else(|| SpliceError::new(ErrorKind::BadTimestamp("Timestamp is empty")))
	}
}

#[cfg(test)]
mod tests {
	use super::Timestamp;
	use crate::config::ParsingMode;

	fn expected() -> Timestamp {
		// 2024-06-03T14:08:49
		Timestamp {
			year: 2024,
			month: Some(6),
			day: Some(3),
			hour: Some(14),
			minute: Some(8),
			second: Some(49),
		}
	}

	#[test_log::test]
	fn full_timestamp() {
		let parsed = Timestamp::parse("2024-06-03T14:08:49", ParsingMode::Strict).unwrap();
		assert_eq!(parsed, Some(expected()));
		assert_eq!(expected().to_string(), "2024-06-03T14:08:49");
	}

	#[test_log::test]
	fn missing_zeroes() {
		let parsed = Timestamp::parse("2024-6-3T14:8:49", ParsingMode::BestAttempt).unwrap();
		assert_eq!(parsed, Some(expected()));
	}

	#[test_log::test]
	fn partial() {
		let parsed: Timestamp = "1999-12".parse().unwrap();
		assert_eq!(parsed.year, 1999);
		assert_eq!(parsed.month, Some(12));
		assert_eq!(parsed.day, None);
		assert_eq!(parsed.to_string(), "1999-12");
	}

	#[test_log::test]
	fn space_separated_time() {
		let parsed = Timestamp::parse("2024-06-03 14:08:49", ParsingMode::BestAttempt).unwrap();
		assert_eq!(parsed, Some(expected()));
	}

	#[test_log::test]
	fn malformed() {
		assert!(Timestamp::parse("99", ParsingMode::BestAttempt).is_err());
		assert!(Timestamp::parse("2024-13", ParsingMode::Strict).is_err());
		assert!(Timestamp::parse("2024 ", ParsingMode::Strict).is_err());

		// Only the valid prefix is kept
		let relaxed = Timestamp::parse("2024-13", ParsingMode::BestAttempt).unwrap();
		assert_eq!(relaxed, Some(Timestamp::from_year(2024)));

		assert_eq!(Timestamp::parse("  ", ParsingMode::BestAttempt).unwrap(), None);
	}
}

use crate::error::Result;
use crate::macros::err;

use std::io::Read;

use byteorder::ReadBytesExt;

/// The text encodings an ID3v2 frame can declare
#[derive(Debug, Clone, Eq, PartialEq, Copy, Hash)]
#[repr(u8)]
pub(crate) enum TextEncoding {
	/// ISO-8859-1
	Latin1 = 0,
	/// UTF-16 with a byte order mark
	UTF16 = 1,
	/// UTF-16 big endian
	UTF16BE = 2,
	/// UTF-8
	UTF8 = 3,
}

impl TextEncoding {
	/// Get a `TextEncoding` from a u8, must be 0-3 inclusive
	pub(crate) fn from_u8(byte: u8) -> Option<Self> {
		match byte {
			0 => Some(Self::Latin1),
			1 => Some(Self::UTF16),
			2 => Some(Self::UTF16BE),
			3 => Some(Self::UTF8),
			_ => None,
		}
	}

	fn terminator_len(self) -> usize {
		match self {
			Self::Latin1 | Self::UTF8 => 1,
			Self::UTF16 | Self::UTF16BE => 2,
		}
	}
}

/// Decode a string in `encoding`
///
/// With `terminated`, reading stops after the encoding's null terminator (or at the end of
/// the reader). Otherwise the rest of the reader is consumed.
pub(crate) fn decode_text<R>(reader: &mut R, encoding: TextEncoding, terminated: bool) -> Result<String>
where
	R: Read,
{
	let raw_bytes = if terminated {
		read_to_terminator(reader, encoding)
	} else {
		let mut bytes = Vec::new();
		reader.read_to_end(&mut bytes)?;
		bytes
	};

	if raw_bytes.is_empty() {
		return Ok(String::new());
	}

	match encoding {
		TextEncoding::Latin1 => Ok(latin1_decode(&raw_bytes)),
		TextEncoding::UTF16 => {
			if raw_bytes.len() % 2 != 0 {
				err!(TextDecode("UTF-16 string has an odd length"));
			}

			match [raw_bytes[0], raw_bytes.get(1).copied().unwrap_or(0)] {
				[0xFE, 0xFF] => utf16_decode_bytes(&raw_bytes[2..], u16::from_be_bytes),
				[0xFF, 0xFE] => utf16_decode_bytes(&raw_bytes[2..], u16::from_le_bytes),
				// Some encoders only put a BOM on the first string of a frame
				_ => utf16_decode_bytes(&raw_bytes, u16::from_le_bytes),
			}
		},
		TextEncoding::UTF16BE => utf16_decode_bytes(&raw_bytes, u16::from_be_bytes),
		TextEncoding::UTF8 => utf8_decode(raw_bytes),
	}
}

fn read_to_terminator<R>(reader: &mut R, encoding: TextEncoding) -> Vec<u8>
where
	R: Read,
{
	let mut text_bytes = Vec::new();

	if encoding.terminator_len() == 1 {
		while let Ok(byte) = reader.read_u8() {
			if byte == 0 {
				break;
			}

			text_bytes.push(byte)
		}
	} else {
		while let (Ok(b1), Ok(b2)) = (reader.read_u8(), reader.read_u8()) {
			if b1 == 0 && b2 == 0 {
				break;
			}

			text_bytes.push(b1);
			text_bytes.push(b2)
		}
	}

	text_bytes
}

pub(crate) fn latin1_decode(bytes: &[u8]) -> String {
	let mut text = bytes.iter().map(|c| char::from(*c)).collect::<String>();
	trim_end_nulls(&mut text);
	text
}

/// Encode `s` as Latin-1, replacing anything outside of it with `?`
pub(crate) fn latin1_encode_lossy(s: &str) -> Vec<u8> {
	s.chars()
		.map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
		.collect()
}

pub(crate) fn utf8_decode(bytes: Vec<u8>) -> Result<String> {
	String::from_utf8(bytes)
		.map(|mut text| {
			trim_end_nulls(&mut text);
			text
		})
		.map_err(Into::into)
}

fn utf16_decode_bytes(bytes: &[u8], endianness: fn([u8; 2]) -> u16) -> Result<String> {
	let words: Vec<u16> = bytes
		.chunks_exact(2)
		// Multiple strings in one frame may each carry their own BOM
		.filter_map(|c| match c {
			[0xFF, 0xFE] | [0xFE, 0xFF] => None,
			[b1, b2] => Some(endianness([*b1, *b2])),
			_ => None,
		})
		.collect();

	match String::from_utf16(&words) {
		Ok(mut text) => {
			trim_end_nulls(&mut text);
			Ok(text)
		},
		Err(_) => err!(TextDecode("Given an invalid UTF-16 string")),
	}
}

pub(crate) fn trim_end_nulls(text: &mut String) {
	if text.ends_with('\0') {
		let new_len = text.trim_end_matches('\0').len();
		text.truncate(new_len);
	}
}

#[cfg(test)]
mod tests {
	use super::{TextEncoding, decode_text, latin1_encode_lossy};

	const TEST_STRING: &str = "l\u{00f8}ft\u{00a5}";

	#[test_log::test]
	fn text_decode() {
		// No BOM
		let utf16_decode = decode_text(
			&mut &[0x00, 0x6C, 0x00, 0xF8, 0x00, 0x66, 0x00, 0x74, 0x00, 0xA5][..],
			TextEncoding::UTF16BE,
			false,
		)
		.unwrap();
		assert_eq!(utf16_decode, TEST_STRING);

		// BOM test
		let be_utf16_decode = decode_text(
			&mut &[
				0xFE, 0xFF, 0x00, 0x6C, 0x00, 0xF8, 0x00, 0x66, 0x00, 0x74, 0x00, 0xA5,
			][..],
			TextEncoding::UTF16,
			false,
		)
		.unwrap();
		let le_utf16_decode = decode_text(
			&mut &[
				0xFF, 0xFE, 0x6C, 0x00, 0xF8, 0x00, 0x66, 0x00, 0x74, 0x00, 0xA5, 0x00,
			][..],
			TextEncoding::UTF16,
			false,
		)
		.unwrap();
		assert_eq!(be_utf16_decode, le_utf16_decode);
		assert_eq!(be_utf16_decode, TEST_STRING);

		let utf8_decode =
			decode_text(&mut TEST_STRING.as_bytes(), TextEncoding::UTF8, false).unwrap();
		assert_eq!(utf8_decode, TEST_STRING);
	}

	#[test_log::test]
	fn terminated_stops_at_null() {
		let mut reader = &b"first\0second"[..];

		let first = decode_text(&mut reader, TextEncoding::Latin1, true).unwrap();
		assert_eq!(first, "first");
		assert_eq!(reader, b"second");
	}

	#[test_log::test]
	fn latin1_lossy() {
		assert_eq!(latin1_encode_lossy("a\u{00e9}\u{4e16}"), [b'a', 0xE9, b'?']);
	}
}

//! Synchsafe integers and unsynchronisation
//!
//! ID3v2 avoids false MPEG frame syncs (`0xFF 0xE0`) by storing sizes in 7 bits per byte, and by
//! optionally inserting a `0x00` after every `0xFF` in the tag body.

use crate::error::Result;
use crate::macros::err;

/// Integers that can be converted to and from their synchsafe form
pub(crate) trait SynchsafeInteger: Sized {
	/// Create a synchsafe integer
	///
	/// Fails with `TooMuchData` if `self` doesn't fit in 7 bits per byte.
	fn synch(self) -> Result<Self>;

	/// Convert a synchsafe integer back to a plain one
	fn unsynch(self) -> Self;
}

impl SynchsafeInteger for u32 {
	fn synch(self) -> Result<Self> {
		const MAXIMUM_INTEGER: u32 = u32::MAX >> 4;

		if self > MAXIMUM_INTEGER {
			err!(TooMuchData);
		}

		Ok((self & 0x7F)
			| ((self & (0x7F << 7)) << 1)
			| ((self & (0x7F << 14)) << 2)
			| ((self & (0x7F << 21)) << 3))
	}

	fn unsynch(self) -> Self {
		((self & 0x7F00_0000) >> 3) | ((self & 0x7F_0000) >> 2) | ((self & 0x7F00) >> 1) | (self & 0x7F)
	}
}

/// Remove the `0x00` inserted after every `0xFF`
pub(crate) fn resynchronise(content: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(content.len());
	let mut previous_ff = false;

	for &byte in content {
		if previous_ff && byte == 0 {
			previous_ff = false;
			continue;
		}

		previous_ff = byte == 0xFF;
		out.push(byte);
	}

	out
}

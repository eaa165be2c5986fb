//! WavPack specific items
//!
//! Both v4 block streams (`wvpk`) and legacy v3 files (a RIFF WAVE wrapper around a `wvpk`
//! header) are recognized. WavPack has no tag of its own, APEv2 and ID3v1 are appended
//! to the stream.

mod properties;
pub(crate) mod read;

pub(crate) const WAVPACK_MAGIC: &[u8; 4] = b"wvpk";

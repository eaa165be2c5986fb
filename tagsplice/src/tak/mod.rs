//! TAK (Tom's lossless Audio Kompressor) specific items
//!
//! TAK files have no tag of their own. APEv2 is appended to the stream, and an ID3v2 tag
//! written by another tool may precede it. Only the former is written.

mod properties;
pub(crate) mod read;

pub(crate) const TAK_MAGIC: &[u8; 4] = b"tBaK";

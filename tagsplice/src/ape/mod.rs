//! APE specific items
//!
//! APEv1 and APEv2 tags are read, tags are always written as APEv2 with both a header and
//! a footer. An APE tag lives at the end of the file, before an ID3v1 tag if one exists.

pub(crate) mod header;
pub(crate) mod tag;

pub(crate) const APE_PREAMBLE: &[u8; 8] = b"APETAGEX";

/// The size of an APE tag header or footer, including the preamble
pub(crate) const APE_HEADER_SIZE: u32 = 32;

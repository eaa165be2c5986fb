//! ID3v1 items
//!
//! ID3v1 is a fixed 128 byte structure at the very end of a file. Every field is severely limited
//! in size, values that are too long are truncated on write rather than rejected.
//!
//! The genre is stored as an index into [`GENRES`]. Genres that aren't in the list can't be
//! represented.

pub(crate) mod constants;
mod read;
mod write;

pub use constants::GENRES;

pub(crate) use read::decode;
pub(crate) use write::encode;

//! ID3v2 items
//!
//! ID3v2.2, ID3v2.3, and ID3v2.4 tags are read. Tags are always written as ID3v2.4, with
//! UTF-8 text.
//!
//! Only the frames with a [`FieldKey`](crate::tag::FieldKey) mapping, along with `TXXX`,
//! `COMM`, `USLT`, `APIC`, `POPM`, `CHAP`, and `CTOC`, are understood. Any other text frame
//! is kept as an additional field under its frame ID.

mod frame;
pub(crate) mod header;
mod read;
pub(crate) mod synchsafe;
mod write;

pub(crate) use read::decode;
pub(crate) use write::encode;

//! Byte-exact rewriting of tagged files
//!
//! While parsing, a container registers every region a tag occupies (or could occupy) as a
//! [`Zone`], along with every field that depends on those regions: lengths ([`SizePatch`]) and
//! absolute offsets ([`IndexPatch`]). Together these form a [`FileSurgeryPlan`].
//!
//! To write, [`rewrite`] takes the original stream, the plan, and new contents for some of the
//! zones, and produces a stream where only those zones (and the dependent fields) changed.
//!
//! # Examples
//!
//! ```rust
//! # fn main() -> tagsplice::error::Result<()> {
//! use tagsplice::surgery::{FileSurgeryPlan, PatchWidth, SizePatch, ZoneContents, rewrite};
//! use std::io::Cursor;
//!
//! // A 4 byte length field, followed by a 4 byte tag
//! let original = [4, 0, 0, 0, b'T', b'A', b'G', b'!'];
//!
//! let mut plan = FileSurgeryPlan::new();
//! plan.add_zone(4, 4, "tag")?;
//! plan.add_size(SizePatch::new(0, PatchWidth::U32, "tag"));
//!
//! let mut contents = ZoneContents::new();
//! contents.insert(String::from("tag"), b"BIGGER TAG".to_vec());
//!
//! let mut output = Vec::new();
//! rewrite(&mut Cursor::new(&original[..]), &plan, &contents, &mut output)?;
//!
//! assert_eq!(&output[..4], &10u32.to_le_bytes());
//! assert_eq!(&output[4..], b"BIGGER TAG");
//! # Ok(()) }
//! ```

mod embed;
mod engine;
mod patch;
mod plan;
mod zone;

pub use embed::{EmbeddingAdapter, embed};
pub use engine::{SurgeryOutcome, ZoneContents, rewrite, splice_file};
pub use patch::{Endianness, IndexPatch, PatchWidth, SizeMode, SizePatch};
pub use plan::FileSurgeryPlan;
pub use zone::{Zone, ZoneRegistry};

//! Utilities for generic tag handling
//!
//! Every tag system a file carries is decoded into a [`MetadataTag`], which holds the normalized
//! [`TagData`]. Reading goes through [`TagSystemView`], so merged views and single tags look
//! the same to callers.

mod data;
mod field;
pub mod items;
mod metadata_tag;
mod tag_type;
mod view;

pub use data::TagData;
pub use field::FieldKey;
pub use metadata_tag::{MetadataTag, TagFormat};
pub use tag_type::TagType;
pub use view::{EmptyView, TagSystem, TagSystemView};

pub(crate) use field::leading_number;
pub(crate) use view::NO_ADDITIONAL_FIELDS;

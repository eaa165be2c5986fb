//! ID3 specific items

pub mod v1;
pub(crate) mod v2;

//! Direct Stream Digital containers
//!
//! Only Sony's DSF is supported. Its ID3v2 tag is appended to the end of the file and
//! referenced by the metadata pointer in the file header.

pub(crate) mod dsf;

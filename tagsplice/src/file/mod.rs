//! Generic file handling utilities

mod file_type;
mod layout;
mod tagged_file;

pub use file_type::{EXTENSIONS, FileType};
pub use layout::{AudioRegion, ContainerLayout};
pub use tagged_file::{BoundTaggedFile, TaggedFile};

pub(crate) use file_type::FileTypeGuessResult;

//! Various configuration options to control tagsplice

mod read_options;
mod registry;
mod write_options;

pub use read_options::{ParsingMode, ReadOptions};
pub use registry::{PriorityList, TagTypeRegistry};
pub use write_options::WriteOptions;

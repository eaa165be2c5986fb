//! Various generic representations of tag items

mod chapter;
mod lyrics;
mod timestamp;

pub use chapter::Chapter;
pub use lyrics::Lyrics;
pub use timestamp::Timestamp;

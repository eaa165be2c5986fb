//! Integration tests: files
mod dsf;
mod tak;
mod util;
mod wav;
mod wavpack;

//! Delimited text reading and writing.

mod reader;
mod writer;

pub use reader::{parse_table, read_table, read_text};
pub use writer::{to_delimited_string, write_table, write_text};

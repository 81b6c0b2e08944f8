//! UFX Input Module
//!
//! Reads the fixed-width UFX text format: one record per line, each line
//! being a k-mer, a separator, the two extension symbols and a newline
//! (`k + 4` bytes total).
//!
//! ## Responsibilities
//! - **Record counting**: the sizing oracle for table creation, derived from
//!   the file size alone after sniffing the first line.
//! - **Record reading**: iterating every line into `{kmer, left, right}`.
//! - **Shape validation**: malformed inputs surface as distinct error
//!   variants so the caller can decide between aborting and diagnostics;
//!   nothing is retried or swallowed.

pub mod reader;
pub mod types;


pub use reader::{count_records, line_width, read_records};
pub use types::{UfxError, UfxRecord};

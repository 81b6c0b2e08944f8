use serde::{Deserialize, Serialize};

/// One UFX line: the raw k-mer plus its two extension symbols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UfxRecord {
    pub kmer: Vec<u8>,
    pub left_ext: u8,
    pub right_ext: u8,
}

/// Input-shape failure. Each malformation is a distinct variant so callers
/// can report precisely what was wrong with the file.
#[derive(Debug, thiserror::Error)]
pub enum UfxError {
    #[error("i/o failure reading UFX file: {0}")]
    Io(#[from] std::io::Error),

    #[error("UFX file shorter than one record: needed {needed} bytes, got {got}")]
    TruncatedHeader { needed: usize, got: usize },

    #[error("no separator after the k-mer column: found {found:?} at line offset {offset}")]
    MissingSeparator { found: u8, offset: usize },

    #[error("UFX file size {file_size} is not a multiple of the record width {line_width}")]
    MisalignedSize { file_size: u64, line_width: usize },
}

use serde::{Deserialize, Serialize};

/// Extension symbol marking "no extension on this side".
///
/// A k-mer whose left extension is the terminator is a chain seed: the
/// graph-walk consumer starts a traversal from it. The predicate itself is
/// applied by the build driver, not by the table.
pub const EXT_TERMINATOR: u8 = b'F';

/// A nucleotide sequence in packed form: two bits per symbol, four symbols
/// per byte, high bits first, zero-padded final byte.
///
/// The packed bytes are the comparison key of the hash table. They are only
/// meaningful together with the k-mer length they were packed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackedKmer(Vec<u8>);

impl PackedKmer {
    pub(crate) fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Packing failure: the input contained a symbol outside the `ACGT` alphabet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PackError {
    #[error("invalid symbol {symbol:?} at position {position} (expected one of A, C, G, T)")]
    InvalidSymbol { symbol: u8, position: usize },
}

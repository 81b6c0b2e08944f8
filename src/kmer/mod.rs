//! Sequence Packing Module
//!
//! Converts raw nucleotide sequences into the compact packed representation
//! used as the hash-table comparison key everywhere else in the system.
//!
//! ## Core Guarantees
//! - **Canonical**: the same sequence always packs to the same bytes.
//! - **Injective**: for a fixed k-mer length, two distinct sequences never
//!   pack to the same bytes, so byte equality of packed keys is sequence
//!   equality.

pub mod pack;
pub mod types;


pub use pack::{pack, packed_len, unpack};
pub use types::{EXT_TERMINATOR, PackError, PackedKmer};

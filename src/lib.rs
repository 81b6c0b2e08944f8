//! Distributed K-mer Hash Table Library
//!
//! This library crate defines the core modules of the distributed k-mer store.
//! It serves as the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! The system is composed of five loosely coupled subsystems:
//!
//! - **`kmer`**: The packing collaborator. Encodes raw nucleotide sequences
//!   into the canonical fixed-size byte representation used as the comparison
//!   key everywhere else.
//! - **`space`**: The global address space. A cluster-wide addressable record
//!   heap plus the shared bucket-head array, accessed only through explicit,
//!   accounted read/write operations (each one models a remote round trip).
//! - **`table`**: The core data structure. Hashing, the locked chain-prepend
//!   insertion protocol, lock-free chain lookup, and per-unit start lists.
//! - **`ufx`**: The input layer. Counts and reads fixed-width UFX records,
//!   reporting malformed inputs as distinct typed errors.
//! - **`cluster`**: The coordination layer. Runs a fixed-size SPMD unit group
//!   with collective barrier points and drives the build phase end to end.

pub mod cluster;
pub mod kmer;
pub mod space;
pub mod table;
pub mod ufx;

//! Bucket Hashing
//!
//! DJB2-style rolling hash over the packed key bytes, reduced modulo the
//! bucket count. Uniform spread over real genomic data is the only property
//! relied upon; there are no adversarial-input guarantees.

/// Maps packed key bytes to a bucket index in `0..bucket_count`.
pub fn bucket_for(bucket_count: u64, packed_key: &[u8]) -> u64 {
    let mut h: u64 = 5381;
    for &byte in packed_key {
        h = (byte as u64).wrapping_add(h << 5).wrapping_add(h);
    }
    h % bucket_count
}

use super::types::{PackError, PackedKmer};

/// Number of packed bytes needed for a k-mer of `k` symbols (4 symbols per byte).
pub fn packed_len(k: usize) -> usize {
    k.div_ceil(4)
}

fn code(symbol: u8) -> Option<u8> {
    match symbol {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' => Some(3),
        _ => None,
    }
}

fn symbol(code: u8) -> u8 {
    match code & 0b11 {
        0 => b'A',
        1 => b'C',
        2 => b'G',
        _ => b'T',
    }
}

/// Packs a raw sequence into its canonical byte representation.
///
/// Symbols fill each byte from the high bits down; the final byte is
/// zero-padded. Because the k-mer length is fixed per run, the padding cannot
/// collide with a shorter sequence.
pub fn pack(seq: &[u8]) -> Result<PackedKmer, PackError> {
    let mut bytes = vec![0u8; packed_len(seq.len())];

    for (position, &s) in seq.iter().enumerate() {
        let code = code(s).ok_or(PackError::InvalidSymbol {
            symbol: s,
            position,
        })?;
        let shift = 6 - 2 * (position % 4);
        bytes[position / 4] |= code << shift;
    }

    Ok(PackedKmer::from_bytes(bytes))
}

/// Expands a packed key back into its `k` raw symbols.
///
/// Used for diagnostics and report output; the core never needs to unpack.
pub fn unpack(packed: &PackedKmer, k: usize) -> Vec<u8> {
    let bytes = packed.as_bytes();
    let mut seq = Vec::with_capacity(k);

    for position in 0..k {
        let Some(&byte) = bytes.get(position / 4) else {
            break;
        };
        let shift = 6 - 2 * (position % 4);
        seq.push(symbol(byte >> shift));
    }

    seq
}

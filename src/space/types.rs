use serde::{Deserialize, Serialize};

/// Identifies one of the P cooperating units of the run.
///
/// Units are numbered `0..P` at group creation; the id doubles as the index
/// of the unit's heap partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

/// Sentinel bit pattern for "no record" in a bucket head or chain link.
pub(crate) const NULL_REF: u64 = u64::MAX;

/// Globally addressable reference to a record slot.
///
/// Records are addressed as `(owning unit, offset inside that unit's
/// partition)` rather than by native pointer, so a reference stays valid no
/// matter which unit dereferences it. The pair packs into a single `u64`
/// (unit in the high half) so a bucket head fits in one atomic word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordRef {
    pub unit: u32,
    pub offset: u32,
}

impl RecordRef {
    pub(crate) fn to_bits(self) -> u64 {
        ((self.unit as u64) << 32) | self.offset as u64
    }

    pub(crate) fn from_bits(bits: u64) -> Option<RecordRef> {
        if bits == NULL_REF {
            None
        } else {
            Some(RecordRef {
                unit: (bits >> 32) as u32,
                offset: bits as u32,
            })
        }
    }

    pub(crate) fn option_to_bits(value: Option<RecordRef>) -> u64 {
        match value {
            Some(r) => r.to_bits(),
            None => NULL_REF,
        }
    }
}

/// Failure of a per-unit arena operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeapError {
    /// The unit exhausted its own heap partition. The cursor never crosses
    /// into a neighbouring partition; callers must size the table for the
    /// whole input up front.
    #[error("heap partition of unit {unit} is full ({capacity} slots)")]
    PartitionFull { unit: u32, capacity: u32 },
}

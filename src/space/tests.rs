//! Global Address Space Tests
//!
//! Validates the addressing scheme, the partition geometry of the heap, the
//! write-once record discipline, and the access accounting.

#[cfg(test)]
mod tests {
    use crate::kmer::pack;
    use crate::space::buckets::BucketArray;
    use crate::space::heap::GlobalHeap;
    use crate::space::stats::AccessStats;
    use crate::space::types::{HeapError, NULL_REF, RecordRef, UnitId};
    use std::sync::Arc;

    fn heap(capacity: u64, units: u32) -> Arc<GlobalHeap> {
        Arc::new(GlobalHeap::new(capacity, units, Arc::new(AccessStats::default())))
    }

    // ============================================================
    // RECORD REFERENCES
    // ============================================================

    #[test]
    fn test_record_ref_bits_roundtrip() {
        let r = RecordRef {
            unit: 3,
            offset: 41,
        };
        assert_eq!(RecordRef::from_bits(r.to_bits()), Some(r));
    }

    #[test]
    fn test_null_bits_decode_to_none() {
        assert_eq!(RecordRef::from_bits(NULL_REF), None);
        assert_eq!(RecordRef::option_to_bits(None), NULL_REF);
    }

    // ============================================================
    // PARTITION GEOMETRY
    // ============================================================

    #[test]
    fn test_capacity_per_unit_formula() {
        // floor(capacity / units) + 1 slots per unit.
        let heap = heap(10, 4);
        assert_eq!(heap.capacity_per_unit(), 10 / 4 + 1);
        assert_eq!(heap.slot_count(), 3 * 4);
    }

    #[test]
    fn test_writers_stay_inside_their_partition() {
        let heap = heap(8, 2);
        let per_unit = heap.capacity_per_unit();

        for unit in 0..2 {
            let mut writer = heap.writer(UnitId(unit));
            for expected in 0..per_unit {
                let at = writer.claim().unwrap();
                assert_eq!(at.unit, unit);
                assert_eq!(at.offset, expected);
            }
        }
    }

    #[test]
    fn test_claim_fails_fast_when_partition_full() {
        let heap = heap(2, 1);
        let mut writer = heap.writer(UnitId(0));

        // capacity 2 over 1 unit -> 3 slots.
        for _ in 0..3 {
            writer.claim().unwrap();
        }
        assert_eq!(
            writer.claim(),
            Err(HeapError::PartitionFull {
                unit: 0,
                capacity: 3
            })
        );
        // The cursor never moves past the end.
        assert_eq!(writer.claimed(), 3);
    }

    #[test]
    fn test_last_claimed_tracks_cursor() {
        let heap = heap(4, 1);
        let mut writer = heap.writer(UnitId(0));

        assert_eq!(writer.last_claimed(), None);
        let first = writer.claim().unwrap();
        assert_eq!(writer.last_claimed(), Some(first));
        let second = writer.claim().unwrap();
        assert_eq!(writer.last_claimed(), Some(second));
    }

    // ============================================================
    // RECORD LIFECYCLE
    // ============================================================

    #[test]
    fn test_publish_then_fetch_returns_local_copy() {
        let heap = heap(4, 2);
        let mut writer = heap.writer(UnitId(1));
        let at = writer.claim().unwrap();

        let key = pack(b"ACGTACG").unwrap();
        heap.publish(at, key.clone(), b'G', b'T');

        let entry = heap.fetch(at).expect("published record should fetch");
        assert_eq!(entry.key, key);
        assert_eq!(entry.left_ext, b'G');
        assert_eq!(entry.right_ext, b'T');
        assert_eq!(entry.next, None, "freshly published record is unlinked");
    }

    #[test]
    fn test_fetch_unpublished_slot_is_none() {
        let heap = heap(4, 1);
        assert_eq!(
            heap.fetch(RecordRef {
                unit: 0,
                offset: 0
            }),
            None
        );
    }

    #[test]
    fn test_fetch_out_of_bounds_is_none() {
        let heap = heap(4, 1);
        assert_eq!(
            heap.fetch(RecordRef {
                unit: 7,
                offset: 0
            }),
            None
        );
        assert_eq!(
            heap.fetch(RecordRef {
                unit: 0,
                offset: 999
            }),
            None
        );
    }

    #[test]
    fn test_link_is_visible_through_fetch() {
        let heap = heap(4, 1);
        let mut writer = heap.writer(UnitId(0));

        let first = writer.claim().unwrap();
        heap.publish(first, pack(b"AAA").unwrap(), b'F', b'C');

        let second = writer.claim().unwrap();
        heap.publish(second, pack(b"CCC").unwrap(), b'A', b'A');
        heap.link(second, Some(first));

        let entry = heap.fetch(second).unwrap();
        assert_eq!(entry.next, Some(first));
    }

    #[test]
    fn test_double_publish_keeps_first_record() {
        let heap = heap(4, 1);
        let mut writer = heap.writer(UnitId(0));
        let at = writer.claim().unwrap();

        heap.publish(at, pack(b"AAA").unwrap(), b'F', b'C');
        heap.publish(at, pack(b"TTT").unwrap(), b'G', b'G');

        let entry = heap.fetch(at).unwrap();
        assert_eq!(entry.key, pack(b"AAA").unwrap());
    }

    // ============================================================
    // BUCKET ARRAY
    // ============================================================

    #[test]
    fn test_bucket_heads_start_null() {
        let buckets = BucketArray::new(8, Arc::new(AccessStats::default()));
        assert_eq!(buckets.len(), 8);
        for bucket in 0..8 {
            assert_eq!(buckets.head(bucket), None);
        }
    }

    #[test]
    fn test_set_head_then_head() {
        let buckets = BucketArray::new(4, Arc::new(AccessStats::default()));
        let r = RecordRef {
            unit: 1,
            offset: 5,
        };
        buckets.set_head(2, r);
        assert_eq!(buckets.head(2), Some(r));
        assert_eq!(buckets.head(3), None);
    }

    // ============================================================
    // ACCOUNTING
    // ============================================================

    #[test]
    fn test_every_access_is_accounted() {
        let stats = Arc::new(AccessStats::default());
        let heap = Arc::new(GlobalHeap::new(4, 1, stats.clone()));
        let buckets = BucketArray::new(2, stats.clone());

        let mut writer = heap.writer(UnitId(0));
        let at = writer.claim().unwrap();
        heap.publish(at, pack(b"ACG").unwrap(), b'F', b'T');
        heap.link(at, None);
        buckets.set_head(0, at);
        buckets.head(0);
        heap.fetch(at);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.record_publishes, 1);
        assert_eq!(snapshot.link_writes, 1);
        assert_eq!(snapshot.head_writes, 1);
        assert_eq!(snapshot.head_reads, 1);
        assert_eq!(snapshot.record_fetches, 1);
        assert_eq!(snapshot.total_round_trips(), 5);
    }
}

//! Cluster Module Tests
//!
//! Validates the SPMD group mechanics and the end-to-end build: distribution,
//! visibility after the quiesce barrier, seed counting, and teardown.

#[cfg(test)]
mod tests {
    use crate::cluster::build::{build, shutdown};
    use crate::cluster::group::UnitGroup;
    use crate::cluster::types::UnitReport;
    use crate::kmer::EXT_TERMINATOR;
    use crate::table::lock::LockStrategy;
    use crate::table::map::TableConfig;
    use crate::ufx::UfxRecord;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use tokio::time::timeout;

    fn config() -> TableConfig {
        TableConfig {
            load_factor: 1.0,
            lock_strategy: LockStrategy::PerBucket,
        }
    }

    /// Deterministic distinct k-mer for an index: base-4 digits of `n`.
    fn seq_for(mut n: u64, k: usize) -> Vec<u8> {
        let alphabet = [b'A', b'C', b'G', b'T'];
        let mut seq = vec![b'A'; k];
        for slot in seq.iter_mut() {
            *slot = alphabet[(n % 4) as usize];
            n /= 4;
        }
        seq
    }

    /// `count` records with every fourth one flagged as a seed.
    fn records(count: u64, k: usize) -> Vec<UfxRecord> {
        (0..count)
            .map(|n| UfxRecord {
                kmer: seq_for(n, k),
                left_ext: if n % 4 == 0 { EXT_TERMINATOR } else { b'A' },
                right_ext: b'C',
            })
            .collect()
    }

    // ============================================================
    // UNIT GROUP
    // ============================================================

    #[test]
    fn test_empty_group_is_rejected() {
        assert!(UnitGroup::new(0).is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_group_runs_every_unit_once() {
        let group = UnitGroup::new(4).unwrap();
        let ran = Arc::new(AtomicU32::new(0));

        let body_ran = ran.clone();
        group
            .run(move |unit, group| {
                let ran = body_ran.clone();
                async move {
                    ran.fetch_add(1, Ordering::SeqCst);
                    group.barrier().await;
                    group.submit_report(UnitReport {
                        unit: unit.0,
                        inserted: unit.0 as u64,
                        seeds: 0,
                    });
                    Ok(())
                }
            })
            .await
            .unwrap();

        assert_eq!(ran.load(Ordering::SeqCst), 4);

        let reports = group.reports();
        assert_eq!(reports.len(), 4);
        // Sorted by unit id regardless of completion order.
        let units: Vec<u32> = reports.iter().map(|r| r.unit).collect();
        assert_eq!(units, vec![0, 1, 2, 3]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_unit_error_fails_the_run() {
        let group = UnitGroup::new(2).unwrap();

        let result = group
            .run(|unit, _group| async move {
                if unit.0 == 1 {
                    anyhow::bail!("unit 1 gave up");
                }
                Ok(())
            })
            .await;

        assert!(result.is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_unit_error_before_barrier_aborts_the_group() {
        let group = UnitGroup::new(2).unwrap();

        // Unit 1 bails out before the collective point, so unit 0 is parked
        // on a barrier nobody else will ever reach. The run must still fail
        // instead of waiting for it.
        let result = timeout(
            Duration::from_secs(5),
            group.run(|unit, group| async move {
                if unit.0 == 1 {
                    anyhow::bail!("unit 1 gave up early");
                }
                group.barrier().await;
                Ok(())
            }),
        )
        .await
        .expect("run must fail, not stall on the abandoned barrier");

        assert!(result.is_err());
    }

    // ============================================================
    // BUILD
    // ============================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_build_inserts_every_record() {
        const COUNT: u64 = 40;
        const K: usize = 7;

        let group = UnitGroup::new(3).unwrap();
        let input = records(COUNT, K);
        let output = build(&group, Arc::new(input.clone()), K, config())
            .await
            .unwrap();

        assert_eq!(output.report.records, COUNT);
        assert_eq!(output.report.inserted, COUNT);
        assert_eq!(output.report.units.len(), 3);
        assert_eq!(
            output.report.units.iter().map(|u| u.inserted).sum::<u64>(),
            COUNT
        );
        assert_eq!(output.report.bucket_count, COUNT as usize);

        // Quiesced: every record is visible with its extensions intact.
        for record in &input {
            let entry = output
                .table
                .lookup(&record.kmer)
                .unwrap()
                .expect("record missing after build");
            assert_eq!(entry.left_ext, record.left_ext);
            assert_eq!(entry.right_ext, record.right_ext);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_build_counts_seeds() {
        const COUNT: u64 = 41;
        const K: usize = 7;

        let group = UnitGroup::new(2).unwrap();
        let input = records(COUNT, K);
        let expected_seeds = input
            .iter()
            .filter(|r| r.left_ext == EXT_TERMINATOR)
            .count() as u64;

        let output = build(&group, Arc::new(input), K, config()).await.unwrap();
        assert_eq!(output.report.seeds, expected_seeds);
    }

    #[tokio::test]
    async fn test_build_single_unit_matches_multi_unit() {
        const COUNT: u64 = 24;
        const K: usize = 5;

        let input = records(COUNT, K);

        let single = build(
            &UnitGroup::new(1).unwrap(),
            Arc::new(input.clone()),
            K,
            config(),
        )
        .await
        .unwrap();
        let multi = build(
            &UnitGroup::new(4).unwrap(),
            Arc::new(input.clone()),
            K,
            config(),
        )
        .await
        .unwrap();

        for record in &input {
            let a = single.table.lookup(&record.kmer).unwrap().unwrap();
            let b = multi.table.lookup(&record.kmer).unwrap().unwrap();
            assert_eq!(a.key, b.key);
            assert_eq!((a.left_ext, a.right_ext), (b.left_ext, b.right_ext));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_invalid_record_fails_the_build() {
        const K: usize = 5;

        let mut input = records(12, K);
        // One record with a symbol outside the alphabet: its unit fails
        // mid-phase while the other unit heads for the quiesce barrier.
        input[3].kmer[2] = b'N';

        let group = UnitGroup::new(2).unwrap();
        let result = timeout(
            Duration::from_secs(5),
            build(&group, Arc::new(input), K, config()),
        )
        .await
        .expect("a failed unit must fail the build, not deadlock it");

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_build_rejects_empty_input() {
        let group = UnitGroup::new(2).unwrap();
        let result = build(&group, Arc::new(Vec::new()), 7, config()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_build_access_accounting_is_nonzero() {
        const COUNT: u64 = 10;
        let group = UnitGroup::new(2).unwrap();
        let output = build(&group, Arc::new(records(COUNT, 5)), 5, config())
            .await
            .unwrap();

        // Per insertion: one publish, one head read, one link, one head write.
        assert_eq!(output.report.access.record_publishes, COUNT);
        assert_eq!(output.report.access.link_writes, COUNT);
        assert_eq!(output.report.access.head_writes, COUNT);
        assert!(output.report.access.head_reads >= COUNT);
    }

    #[tokio::test]
    async fn test_shutdown_releases_all_handles() {
        let group = UnitGroup::new(2).unwrap();
        let output = build(&group, Arc::new(records(8, 5)), 5, config())
            .await
            .unwrap();

        let report = output.report.clone();
        shutdown(output);

        // The report outlives the structures it describes.
        assert_eq!(report.inserted, 8);
    }
}

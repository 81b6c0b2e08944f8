use kmer_cluster::cluster::{self, UnitGroup};
use kmer_cluster::table::{LockStrategy, TableConfig};
use kmer_cluster::ufx;
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!(
            "Usage: {} --input <file.ufx> [--k <len>] [--units <P>] [--load-factor <f>] [--lock <global|per-bucket|striped:N>]",
            args[0]
        );
        eprintln!("Example: {} --input test.ufx --k 19 --units 4", args[0]);
        std::process::exit(1);
    }

    let mut input: Option<PathBuf> = None;
    let mut kmer_len: usize = 19;
    let mut units: u32 = 4;
    let mut config = TableConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                input = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "--k" => {
                kmer_len = args[i + 1].parse()?;
                i += 2;
            }
            "--units" => {
                units = args[i + 1].parse()?;
                i += 2;
            }
            "--load-factor" => {
                config.load_factor = args[i + 1].parse()?;
                i += 2;
            }
            "--lock" => {
                config.lock_strategy = args[i + 1]
                    .parse::<LockStrategy>()
                    .map_err(|e| anyhow::anyhow!(e))?;
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    let input = input.ok_or_else(|| anyhow::anyhow!("--input is required"))?;

    tracing::info!(input = %input.display(), k = kmer_len, units, "starting build");

    // The sizing oracle: the table is dimensioned from the file shape alone.
    let expected = ufx::count_records(&input, kmer_len)?;
    tracing::info!(records = expected, "counted UFX records");

    let records = ufx::read_records(&input, kmer_len)?;
    let probe = records.first().cloned();

    let group = UnitGroup::new(units)?;
    let output = cluster::build(&group, Arc::new(records), kmer_len, config).await?;

    // Spot-check the finished table from outside the group.
    if let Some(record) = probe {
        match output.table.lookup(&record.kmer)? {
            Some(entry) => tracing::info!(
                left = %(entry.left_ext as char),
                right = %(entry.right_ext as char),
                "probe lookup hit"
            ),
            None => tracing::warn!("probe lookup missed a record that was inserted"),
        }
    }

    println!("{}", serde_json::to_string_pretty(&output.report)?);

    cluster::shutdown(output);
    Ok(())
}

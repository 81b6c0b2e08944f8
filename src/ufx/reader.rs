use super::types::{UfxError, UfxRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Width of one UFX line for k-mer length `k`: the k-mer, one separator, the
/// two extension symbols, and the trailing newline.
pub fn line_width(k: usize) -> usize {
    k + 4
}

fn check_separator(line: &[u8], k: usize) -> Result<(), UfxError> {
    let found = line[k];
    if found != b' ' && found != b'\t' {
        return Err(UfxError::MissingSeparator { found, offset: k });
    }
    Ok(())
}

/// Counts the records in a UFX file without reading it whole.
///
/// Sniffs the first line to confirm the expected shape, then derives the
/// count from the file size. A size that is not a multiple of the line width
/// is a malformed file, reported as such rather than rounded.
pub fn count_records(path: &Path, k: usize) -> Result<u64, UfxError> {
    let width = line_width(k);
    let mut file = File::open(path)?;

    let mut first = vec![0u8; width];
    let got = read_full(&mut file, &mut first)?;
    if got < width {
        return Err(UfxError::TruncatedHeader { needed: width, got });
    }
    check_separator(&first, k)?;

    let file_size = file.metadata()?.len();
    if file_size % width as u64 != 0 {
        return Err(UfxError::MisalignedSize {
            file_size,
            line_width: width,
        });
    }

    let records = file_size / width as u64;
    tracing::debug!(records, path = %path.display(), "counted UFX records");
    Ok(records)
}

/// Reads every record of a UFX file into memory.
///
/// Applies the same shape checks as [`count_records`] and additionally
/// verifies the separator on every line, not just the first.
pub fn read_records(path: &Path, k: usize) -> Result<Vec<UfxRecord>, UfxError> {
    let width = line_width(k);
    let bytes = std::fs::read(path)?;

    if bytes.len() < width {
        return Err(UfxError::TruncatedHeader {
            needed: width,
            got: bytes.len(),
        });
    }
    if bytes.len() % width != 0 {
        return Err(UfxError::MisalignedSize {
            file_size: bytes.len() as u64,
            line_width: width,
        });
    }

    let mut records = Vec::with_capacity(bytes.len() / width);
    for line in bytes.chunks_exact(width) {
        check_separator(line, k)?;
        records.push(UfxRecord {
            kmer: line[..k].to_vec(),
            left_ext: line[k + 1],
            right_ext: line[k + 2],
        });
    }

    tracing::debug!(records = records.len(), path = %path.display(), "read UFX records");
    Ok(records)
}

fn read_full(file: &mut File, buf: &mut [u8]) -> Result<usize, std::io::Error> {
    let mut got = 0;
    while got < buf.len() {
        let n = file.read(&mut buf[got..])?;
        if n == 0 {
            break;
        }
        got += n;
    }
    Ok(got)
}

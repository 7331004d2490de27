use crate::libs::vcf::{next_line, read_header};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use std::path::Path;

pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Picks `min(size, available)` distinct indices uniformly, in ascending order.
pub fn draw(available: usize, size: usize, rng: &mut StdRng) -> Vec<usize> {
    let amount = size.min(available);

    let mut picked = rand::seq::index::sample(rng, available, amount).into_vec();
    picked.sort_unstable();
    picked
}

/// Number of records after the `#CHROM` line
pub fn count_records(infile: &Path) -> anyhow::Result<usize> {
    let mut reader = crate::reader(&infile.to_string_lossy())?;
    read_header(&mut reader, infile)?;

    let mut count = 0;
    let mut line = String::new();
    while next_line(&mut reader, &mut line)? {
        count += 1;
    }
    Ok(count)
}

/// Writes the header of `infile` and `size` of its records drawn uniformly
/// without replacement.
///
/// The file is read twice, first to count the records, then to copy the
/// chosen ones; no more than one line is held at a time. Chosen lines keep
/// their input order. Asking for more records than the file holds copies
/// all of them.
///
/// Returns `(written, available)`.
pub fn subsample_file<W: Write + ?Sized>(
    infile: &Path,
    size: usize,
    rng: &mut StdRng,
    writer: &mut W,
) -> anyhow::Result<(usize, usize)> {
    let available = count_records(infile)?;
    let picked = draw(available, size, rng);

    let mut reader = crate::reader(&infile.to_string_lossy())?;
    for line in read_header(&mut reader, infile)? {
        writer.write_all(line.as_bytes())?;
    }

    let mut wanted = picked.iter().copied().peekable();
    let mut line = String::new();
    let mut idx = 0;
    while let Some(&next) = wanted.peek() {
        if !next_line(&mut reader, &mut line)? {
            break;
        }
        if idx == next {
            writer.write_all(line.as_bytes())?;
            wanted.next();
        }
        idx += 1;
    }

    Ok((picked.len(), available))
}

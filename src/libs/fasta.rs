use crate::libs::vcf::{Record, VcfText};
use std::io::Write;

/// IUPAC code for an unordered pair of bases
///
/// ```
/// use snp2tree::libs::fasta::iupac;
/// assert_eq!(iupac(b'A', b'G'), b'R');
/// assert_eq!(iupac(b'T', b'C'), b'Y');
/// assert_eq!(iupac(b'C', b'C'), b'C');
/// ```
pub fn iupac(a: u8, b: u8) -> u8 {
    let (a, b) = (a.to_ascii_uppercase(), b.to_ascii_uppercase());
    if a == b {
        return a;
    }
    let pair = if a < b { (a, b) } else { (b, a) };
    match pair {
        (b'A', b'G') => b'R',
        (b'C', b'T') => b'Y',
        (b'C', b'G') => b'S',
        (b'A', b'T') => b'W',
        (b'G', b'T') => b'K',
        (b'A', b'C') => b'M',
        _ => b'N',
    }
}

fn allele_base(record: &Record, allele: Option<usize>) -> Option<u8> {
    let base = record.allele(allele?)?;
    match base.as_bytes() {
        [b] if b"ACGTacgt".contains(b) => Some(b.to_ascii_uppercase()),
        _ => None,
    }
}

/// One alignment column: a character per sample.
fn column(record: &Record, n_samples: usize) -> Vec<u8> {
    (0..n_samples)
        .map(|i| {
            let Some(gt) = record.genotypes.get(i) else {
                return b'N';
            };
            let bases: Option<Vec<u8>> = gt.iter().map(|a| allele_base(record, *a)).collect();
            match bases {
                Some(mut bases) => {
                    bases.sort_unstable();
                    bases.dedup();
                    match bases.as_slice() {
                        [b] => *b,
                        [a, b] => iupac(*a, *b),
                        _ => b'N',
                    }
                }
                None => b'N',
            }
        })
        .collect()
}

/// Writes one sequence per sample, named after its `#CHROM` column.
///
/// Returns `(samples, sites)`.
pub fn vcf_to_fasta<W: Write + ?Sized>(vcf: &VcfText, writer: &mut W) -> anyhow::Result<(usize, usize)> {
    let samples = vcf.samples();
    let mut seqs: Vec<Vec<u8>> = vec![Vec::with_capacity(vcf.body.len()); samples.len()];

    let mut sites = 0;
    for line in &vcf.body {
        if line.trim().is_empty() {
            continue;
        }
        let record = Record::parse(line)?;
        for (seq, base) in seqs.iter_mut().zip(column(&record, samples.len())) {
            seq.push(base);
        }
        sites += 1;
    }

    for (name, seq) in samples.iter().zip(seqs.iter()) {
        writer.write_fmt(format_args!(">{}\n", name))?;
        writer.write_all(seq)?;
        writer.write_all(b"\n")?;
    }

    Ok((samples.len(), sites))
}

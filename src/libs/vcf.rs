//! Line-oriented VCF handling.
//!
//! Records are never rewritten: lines are parsed only to make keep/drop
//! decisions, and the original text is what gets written.

use crate::libs::error::PipelineError;
use std::io::{BufRead, Write};
use std::path::Path;

pub const COLUMN_HEADER: &str = "#CHROM";

/// A VCF split at the `#CHROM` line. Lines keep their line endings.
#[derive(Debug, Clone, Default)]
pub struct VcfText {
    /// All lines up to and including `#CHROM`
    pub header: Vec<String>,
    pub body: Vec<String>,
}

impl VcfText {
    /// The `#CHROM` line itself
    pub fn column_line(&self) -> &str {
        self.header.last().map(|s| s.as_str()).unwrap_or_default()
    }

    pub fn samples(&self) -> Vec<String> {
        sample_names(self.column_line())
    }
}

/// Reads the next line into `line`, ending included; a missing final
/// newline is added. Returns `false` at the end of the stream.
pub fn next_line<R: BufRead>(reader: &mut R, line: &mut String) -> anyhow::Result<bool> {
    line.clear();
    if reader.read_line(line)? == 0 {
        return Ok(false);
    }
    if !line.ends_with('\n') {
        line.push('\n');
    }
    Ok(true)
}

/// Reads the header, up to and including `#CHROM`.
///
/// The reader is left at the first record, so the body can be streamed
/// afterwards. `path` is only used for the error message.
pub fn read_header<R: BufRead>(reader: &mut R, path: &Path) -> anyhow::Result<Vec<String>> {
    let mut header = vec![];
    let mut line = String::new();
    while next_line(reader, &mut line)? {
        let done = line.starts_with(COLUMN_HEADER);
        header.push(line.clone());
        if done {
            return Ok(header);
        }
    }
    Err(PipelineError::NoColumnHeader(path.to_path_buf()).into())
}

/// Splits a VCF stream into header and body, both held in memory.
pub fn split_vcf<R: BufRead>(reader: &mut R, path: &Path) -> anyhow::Result<VcfText> {
    let header = read_header(reader, path)?;

    let mut body = vec![];
    let mut line = String::new();
    while next_line(reader, &mut line)? {
        body.push(line.clone());
    }

    Ok(VcfText { header, body })
}

pub fn read_vcf(infile: &str) -> anyhow::Result<VcfText> {
    let mut reader = crate::reader(infile)?;
    split_vcf(&mut reader, Path::new(infile))
}

/// Sample columns of a `#CHROM` line
///
/// ```
/// let line = "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tIR64\tKasalath\n";
/// assert_eq!(snp2tree::libs::vcf::sample_names(line), vec!["IR64", "Kasalath"]);
/// ```
pub fn sample_names(line: &str) -> Vec<String> {
    line.trim_end_matches(['\n', '\r'])
        .split('\t')
        .skip(9)
        .map(|s| s.to_string())
        .collect()
}

/// The fields of a data line the filters look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<'a> {
    pub chrom: &'a str,
    pub pos: &'a str,
    pub ref_allele: &'a str,
    pub alts: Vec<&'a str>,
    /// One entry per sample; `None` for a missing allele
    pub genotypes: Vec<Vec<Option<usize>>>,
}

/// Parses the `GT` subfield of a sample column, `0/1`, `1|1`, `./.` or `2`.
pub fn parse_gt(gt: &str) -> Vec<Option<usize>> {
    gt.split(['/', '|'])
        .map(|allele| allele.parse::<usize>().ok())
        .collect()
}

impl<'a> Record<'a> {
    pub fn parse(line: &'a str) -> anyhow::Result<Record<'a>> {
        let fields: Vec<&str> = line.trim_end_matches(['\n', '\r']).split('\t').collect();
        if fields.len() < 8 {
            anyhow::bail!(
                "VCF record has {} columns, expected at least 8: {}",
                fields.len(),
                line.trim_end()
            );
        }

        let alts = if fields[4] == "." {
            vec![]
        } else {
            fields[4].split(',').collect()
        };

        let mut genotypes = vec![];
        if fields.len() > 9 {
            let gt_idx = fields[8].split(':').position(|key| key == "GT");
            if let Some(gt_idx) = gt_idx {
                for sample in &fields[9..] {
                    let gt = sample.split(':').nth(gt_idx).unwrap_or(".");
                    genotypes.push(parse_gt(gt));
                }
            }
        }

        Ok(Record {
            chrom: fields[0],
            pos: fields[1],
            ref_allele: fields[3],
            alts,
            genotypes,
        })
    }

    /// The base of allele `idx`, 0 being REF
    pub fn allele(&self, idx: usize) -> Option<&'a str> {
        if idx == 0 {
            Some(self.ref_allele)
        } else {
            self.alts.get(idx - 1).copied()
        }
    }
}

const NON_REF: &str = "<NON_REF>";

fn is_base(allele: &str) -> bool {
    matches!(allele, "A" | "C" | "G" | "T")
}

/// Decides whether a record is a plain SNP and not a disguised MNP or
/// `<NON_REF>` artifact.
///
/// A record is kept only when
/// * REF is a single base of `ACGTN`;
/// * ALT is neither `.` nor a lone `<NON_REF>`;
/// * every ALT except `<NON_REF>` is a single base;
/// * each called allele of each sample names a concrete base, so `2/2`,
///   `3/3` or `4/4` needs at least that many real ALT alleles;
/// * no sample has a missing allele.
///
/// ```
/// use snp2tree::libs::vcf::{is_clean_snp, Record};
///
/// let line = "chr01\t100\t.\tA\tG\t50\tPASS\t.\tGT\t0/0\t1/1\n";
/// assert!(is_clean_snp(&Record::parse(line).unwrap()));
///
/// let line = "chr01\t100\t.\tA\tG,<NON_REF>\t50\tPASS\t.\tGT\t0/0\t2/2\n";
/// assert!(!is_clean_snp(&Record::parse(line).unwrap()));
/// ```
pub fn is_clean_snp(record: &Record) -> bool {
    if !matches!(record.ref_allele, "A" | "C" | "G" | "T" | "N") {
        return false;
    }

    if record.alts.is_empty() || record.alts == [NON_REF] {
        return false;
    }
    if !record
        .alts
        .iter()
        .all(|alt| *alt == NON_REF || is_base(alt))
    {
        return false;
    }

    record.genotypes.iter().all(|gt| {
        gt.iter().all(|allele| match allele {
            None => false,
            Some(0) => true,
            Some(idx) => record.allele(*idx).is_some_and(is_base),
        })
    })
}

/// Copies the header and the clean SNP records of a VCF stream.
///
/// Returns `(kept, total)` record counts.
pub fn filter_snps<R: BufRead, W: Write + ?Sized>(
    reader: &mut R,
    writer: &mut W,
) -> anyhow::Result<(usize, usize)> {
    let mut kept = 0;
    let mut total = 0;

    for line in reader.lines() {
        let line = line?;
        if line.starts_with('#') {
            writeln!(writer, "{}", line)?;
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        total += 1;
        let record = Record::parse(&line)?;
        if is_clean_snp(&record) {
            writeln!(writer, "{}", line)?;
            kept += 1;
        }
    }

    Ok((kept, total))
}

use crate::libs::error::PipelineError;
use crate::libs::vcf::{next_line, read_header};
use std::io::Write;
use std::path::PathBuf;

/// Checks that every file exists and that all share the first file's
/// `#CHROM` line. Only headers are read.
///
/// Returns the first file's header.
pub fn check_headers(infiles: &[PathBuf]) -> anyhow::Result<Vec<String>> {
    let missing: Vec<String> = infiles
        .iter()
        .filter(|p| !p.is_file())
        .map(|p| p.display().to_string())
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::MissingInput(missing.join(", ")).into());
    }

    let mut first: Option<Vec<String>> = None;
    for infile in infiles {
        let mut reader = crate::reader(&infile.to_string_lossy())?;
        let header = read_header(&mut reader, infile)?;
        match &first {
            None => first = Some(header),
            Some(first_header) if first_header.last() != header.last() => {
                return Err(PipelineError::HeaderMismatch {
                    first: infiles[0].clone(),
                    other: infile.clone(),
                }
                .into());
            }
            Some(_) => {}
        }
    }

    Ok(first.unwrap_or_default())
}

/// Concatenates VCFs in the given order under the first file's header.
///
/// Headers are checked before anything is written; records are then
/// streamed one line at a time. Returns the number of records written.
pub fn concat_vcfs<W: Write + ?Sized>(infiles: &[PathBuf], writer: &mut W) -> anyhow::Result<usize> {
    let header = check_headers(infiles)?;
    for line in &header {
        writer.write_all(line.as_bytes())?;
    }

    let mut count = 0;
    let mut line = String::new();
    for infile in infiles {
        let mut reader = crate::reader(&infile.to_string_lossy())?;
        read_header(&mut reader, infile)?;
        while next_line(&mut reader, &mut line)? {
            writer.write_all(line.as_bytes())?;
            count += 1;
        }
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const HEADER: &str = "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tA\tB\n";

    fn write_vcf(dir: &Path, name: &str, header: &str, body: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut content = header.to_string();
        for line in body {
            content.push_str(line);
            content.push('\n');
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn keeps_file_order_and_one_header() {
        let dir = tempfile::TempDir::new().unwrap();
        let f1 = write_vcf(
            dir.path(),
            "chr01.vcf",
            HEADER,
            &["chr01\t9\t.\tA\tG\t.\t.\t.\tGT\t0/0\t1/1"],
        );
        let f2 = write_vcf(dir.path(), "chr02.vcf", HEADER, &[]);
        let f3 = write_vcf(
            dir.path(),
            "chr03.vcf",
            HEADER,
            &[
                "chr03\t5\t.\tC\tT\t.\t.\t.\tGT\t1/1\t0/0",
                "chr03\t2\t.\tC\tA\t.\t.\t.\tGT\t1/1\t0/0",
            ],
        );

        let mut out = vec![];
        let count = concat_vcfs(&[f1, f2, f3], &mut out).unwrap();
        assert_eq!(count, 3);

        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with(HEADER));
        assert_eq!(out.matches("#CHROM").count(), 1);

        let body: Vec<&str> = out.lines().filter(|l| !l.starts_with('#')).collect();
        assert!(body[0].starts_with("chr01\t9"));
        // not re-sorted
        assert!(body[1].starts_with("chr03\t5"));
        assert!(body[2].starts_with("chr03\t2"));
    }

    #[test]
    fn missing_file_writes_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let f1 = write_vcf(dir.path(), "chr01.vcf", HEADER, &[]);
        let f2 = dir.path().join("chr02.vcf");

        let mut out = vec![];
        let err = concat_vcfs(&[f1, f2], &mut out).unwrap_err();
        assert!(err.to_string().contains("chr02.vcf"));
        assert!(out.is_empty());
    }

    #[test]
    fn different_samples_are_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let f1 = write_vcf(dir.path(), "chr01.vcf", HEADER, &[]);
        let f2 = write_vcf(
            dir.path(),
            "chr02.vcf",
            "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tA\tC\n",
            &[],
        );

        let mut out = vec![];
        let err = concat_vcfs(&[f1, f2], &mut out).unwrap_err();
        let err = err.downcast::<PipelineError>().unwrap();
        assert!(matches!(err, PipelineError::HeaderMismatch { .. }));
    }

    #[test]
    fn streams_plain_and_gzipped_inputs() {
        let dir = tempfile::TempDir::new().unwrap();
        let r1 = "chr01\t9\t.\tA\tG\t.\t.\t.\tGT\t0/0\t1/1\n";
        let r2 = "chr02\t3\t.\tT\tC\t.\t.\t.\tGT\t1/1\t0/0\n";
        let r3 = "chr02\t8\t.\tG\tA\t.\t.\t.\tGT\t0/1\t0/0\n";

        let f1 = write_vcf(dir.path(), "chr01.vcf", HEADER, &[r1.trim_end()]);
        let f2 = dir.path().join("chr02.vcf.gz");
        let content = format!("{}{}{}", HEADER.replace("##", "##source=x\n##"), r2, r3);
        crate::with_bgzf_writer(&f2, |w| {
            w.write_all(content.as_bytes())?;
            Ok(())
        })
        .unwrap();

        let mut out = vec![];
        assert_eq!(concat_vcfs(&[f1, f2], &mut out).unwrap(), 3);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("{}{}{}{}", HEADER, r1, r2, r3)
        );
    }

    #[test]
    fn header_check_reads_no_records() {
        let dir = tempfile::TempDir::new().unwrap();
        let f1 = write_vcf(dir.path(), "chr01.vcf", HEADER, &["chr01\t9\t.\tA\tG"]);
        let f2 = write_vcf(dir.path(), "chr02.vcf", "##fileformat=VCFv4.2\nchr02\t1\n", &[]);

        assert_eq!(check_headers(&[f1.clone()]).unwrap().concat(), HEADER);

        let err = check_headers(&[f1, f2]).unwrap_err();
        let err = err.downcast::<PipelineError>().unwrap();
        assert!(matches!(err, PipelineError::NoColumnHeader(_)));
    }
}

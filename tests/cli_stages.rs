use assert_cmd::Command;
use std::fs;
use std::io::Write;
use tempfile::TempDir;

const MERGED: &str = "tests/data/chr01.merged.vcf";

fn body(vcf: &str) -> Vec<&str> {
    vcf.lines().filter(|l| !l.starts_with('#')).collect()
}

fn positions(vcf: &str) -> Vec<String> {
    body(vcf)
        .iter()
        .map(|l| l.split('\t').nth(1).unwrap().to_string())
        .collect()
}

#[test]
fn command_filter() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("snp2tree")?;
    let output = cmd.arg("filter").arg(MERGED).output()?;
    let stdout = String::from_utf8(output.stdout)?;
    let stderr = String::from_utf8(output.stderr)?;

    assert!(output.status.success());
    assert_eq!(stdout.lines().filter(|l| l.starts_with('#')).count(), 4);
    assert_eq!(positions(&stdout), vec!["1021", "1377", "4120", "6230"]);
    assert!(stderr.contains("Kept 4 of 8 records"));

    Ok(())
}

#[test]
fn command_filter_stdin() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("snp2tree")?;
    let output = cmd
        .arg("filter")
        .arg("stdin")
        .write_stdin(fs::read(MERGED)?)
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(body(&stdout).len(), 4);

    Ok(())
}

#[test]
fn command_filter_gz_to_file() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let gz = temp.path().join("chr01.vcf.gz");
    let content = fs::read(MERGED)?;
    snp2tree::with_bgzf_writer(&gz, |w| {
        w.write_all(&content)?;
        Ok(())
    })?;

    let outfile = temp.path().join("chr01.snps.vcf");
    let mut cmd = Command::cargo_bin("snp2tree")?;
    cmd.arg("filter")
        .arg(&gz)
        .arg("-o")
        .arg(&outfile)
        .assert()
        .success();

    let filtered = fs::read_to_string(&outfile)?;
    assert_eq!(positions(&filtered), vec!["1021", "1377", "4120", "6230"]);

    Ok(())
}

#[test]
fn command_to_fasta() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let filtered = temp.path().join("filtered.vcf");

    let mut cmd = Command::cargo_bin("snp2tree")?;
    cmd.arg("filter")
        .arg(MERGED)
        .arg("-o")
        .arg(&filtered)
        .assert()
        .success();

    let mut cmd = Command::cargo_bin("snp2tree")?;
    let output = cmd.arg("to-fasta").arg(&filtered).output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert!(output.status.success());
    assert_eq!(stdout, ">Nipponbare\nACCC\n>IR64\nGYGA\n>Kasalath\nGTCM\n");

    Ok(())
}

#[test]
fn command_to_fasta_not_vcf() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("snp2tree")?;
    cmd.arg("to-fasta")
        .arg("tests/data/cultivars.txt")
        .assert()
        .failure()
        .stderr(predicates::str::contains("No #CHROM line"));

    Ok(())
}

#[test]
fn command_subsample() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("snp2tree")?;
    let output = cmd
        .arg("subsample")
        .arg(MERGED)
        .arg("-n")
        .arg("3")
        .arg("--seed")
        .arg("42")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert!(output.status.success());
    assert!(stdout.starts_with("##fileformat=VCFv4.2\n"));
    assert!(stdout.contains("#CHROM\tPOS"));

    // records keep the order of the input
    let pos: Vec<u64> = positions(&stdout)
        .iter()
        .map(|p| p.parse().unwrap())
        .collect();
    assert_eq!(pos.len(), 3);
    assert!(pos.windows(2).all(|w| w[0] < w[1]));

    // the same seed draws the same records
    let mut cmd = Command::cargo_bin("snp2tree")?;
    let again = cmd
        .arg("subsample")
        .arg(MERGED)
        .arg("-n")
        .arg("3")
        .arg("--seed")
        .arg("42")
        .output()?;
    assert_eq!(String::from_utf8(again.stdout)?, stdout);

    Ok(())
}

#[test]
fn command_subsample_oversized() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("snp2tree")?;
    let output = cmd
        .arg("subsample")
        .arg(MERGED)
        .arg("-n")
        .arg("100")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;
    let stderr = String::from_utf8(output.stderr)?;

    assert!(output.status.success());
    assert_eq!(stdout, fs::read_to_string(MERGED)?);
    assert!(stderr.contains("has only 8"));

    Ok(())
}

#[test]
fn command_subsample_stdin() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("snp2tree")?;
    let from_file = cmd
        .arg("subsample")
        .arg(MERGED)
        .arg("-n")
        .arg("4")
        .arg("--seed")
        .arg("5")
        .output()?;

    let mut cmd = Command::cargo_bin("snp2tree")?;
    let from_stdin = cmd
        .arg("subsample")
        .arg("stdin")
        .arg("-n")
        .arg("4")
        .arg("--seed")
        .arg("5")
        .write_stdin(fs::read(MERGED)?)
        .output()?;

    assert!(from_stdin.status.success());
    assert_eq!(body(&String::from_utf8(from_stdin.stdout.clone())?).len(), 4);
    assert_eq!(from_stdin.stdout, from_file.stdout);

    Ok(())
}

#[test]
fn command_concat() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let header = "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tIR64\n";
    let first = temp.path().join("chr01.vcf");
    let second = temp.path().join("chr02.vcf.gz");
    fs::write(&first, format!("{}chr01\t5\t.\tA\tG\t.\t.\t.\tGT\t1/1\n", header))?;
    let content = format!(
        "{}chr02\t7\t.\tC\tT\t.\t.\t.\tGT\t1/1\nchr02\t9\t.\tC\tA\t.\t.\t.\tGT\t1/1\n",
        header.replace("##fileformat=VCFv4.2\n", "##fileformat=VCFv4.2\n##source=chr02\n")
    );
    snp2tree::with_bgzf_writer(&second, |w| {
        w.write_all(content.as_bytes())?;
        Ok(())
    })?;

    let mut cmd = Command::cargo_bin("snp2tree")?;
    let output = cmd.arg("concat").arg(&first).arg(&second).output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert!(output.status.success());
    assert!(!stdout.contains("##source=chr02"));
    assert_eq!(stdout.matches("#CHROM").count(), 1);
    assert_eq!(positions(&stdout), vec!["5", "7", "9"]);

    Ok(())
}

#[test]
fn command_concat_mismatched_samples() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let first = temp.path().join("a.vcf");
    let second = temp.path().join("b.vcf");
    fs::write(
        &first,
        "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tIR64\n",
    )?;
    fs::write(
        &second,
        "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tKasalath\n",
    )?;
    let outfile = temp.path().join("all.vcf");

    let mut cmd = Command::cargo_bin("snp2tree")?;
    cmd.arg("concat")
        .arg(&first)
        .arg(&second)
        .arg("-o")
        .arg(&outfile)
        .assert()
        .failure()
        .stderr(predicates::str::contains("Sample columns of"));
    assert!(!outfile.exists());

    Ok(())
}

#[test]
fn command_concat_missing_file() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("snp2tree")?;
    cmd.arg("concat")
        .arg(MERGED)
        .arg("tests/data/chr02.merged.vcf")
        .assert()
        .failure()
        .stderr(predicates::str::contains("chr02.merged.vcf"));

    Ok(())
}

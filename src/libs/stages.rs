//! The four pipeline stages.
//!
//! Each stage reads the files of the one before it and finishes its own
//! outputs before returning.

use crate::libs::assemble::concat_vcfs;
use crate::libs::config::{Config, Tools};
use crate::libs::error::PipelineError;
use crate::libs::fasta::vcf_to_fasta;
use crate::libs::layout::{Layout, CHROMOSOMES};
use crate::libs::subsample::{make_rng, subsample_file};
use crate::libs::taskgroup::run_all;
use crate::libs::vcf::{filter_snps, read_vcf};
use anyhow::Context;
use cmd_lib::run_cmd;
use log::{error, info, warn};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

fn tool_path(tool: &Option<PathBuf>, name: &str) -> anyhow::Result<String> {
    tool.as_ref()
        .map(|p| p.display().to_string())
        .ok_or_else(|| {
            PipelineError::MissingTool {
                name: name.to_string(),
                key: name.to_string(),
            }
            .into()
        })
}

fn path_str(path: &Path) -> String {
    path.display().to_string()
}

/// Merges, filters, compresses and indexes one chromosome.
pub fn merge_chromosome(
    layout: &Layout,
    cultivars: &[String],
    chr: &str,
    tools: &Tools,
    threads: usize,
) -> anyhow::Result<()> {
    let infiles: Vec<PathBuf> = cultivars
        .iter()
        .map(|cultivar| layout.split_vcf(cultivar, chr))
        .collect();
    let missing: Vec<String> = infiles
        .iter()
        .filter(|p| !p.is_file())
        .map(|p| path_str(p))
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::MissingInput(format!("{}: {}", chr, missing.join(", "))).into());
    }

    let bcftools = tool_path(&tools.bcftools, "bcftools")?;
    let tabix = tool_path(&tools.tabix, "tabix")?;

    let list = layout.merge_list(chr);
    let raw = layout.merged_raw_vcf(chr);
    let cleaned = layout.cleaned_vcf(chr);

    {
        let mut writer = crate::writer(&path_str(&list))?;
        for infile in &infiles {
            writeln!(writer, "{}", infile.display())?;
        }
        writer.flush()?;
    }

    let merge_args: Vec<String> = vec![
        "merge".to_string(),
        "--file-list".to_string(),
        path_str(&list),
        "--threads".to_string(),
        threads.to_string(),
        "-Ou".to_string(),
    ];
    let view_args: Vec<String> = [
        "view",
        "--exclude-uncalled",
        "--exclude-types",
        "indels",
        "--min-alleles",
        "2",
        "--min-ac",
        "2:minor",
        "--max-af",
        "0.99:alt1",
        "--genotype",
        "^miss",
        "-Ov",
        "-o",
    ]
    .iter()
    .map(|s| s.to_string())
    .chain(std::iter::once(path_str(&raw)))
    .collect();

    run_cmd!(${bcftools} $[merge_args] | ${bcftools} $[view_args])
        .with_context(|| format!("bcftools failed for {}", chr))?;

    let mut reader = crate::reader(&path_str(&raw))?;
    let (kept, total) = crate::with_bgzf_writer(&cleaned, |writer| filter_snps(&mut reader, writer))?;
    info!("    {}: kept {} of {} sites", chr, kept, total);

    let cleaned_str = path_str(&cleaned);
    run_cmd!(${tabix} -f -p vcf ${cleaned_str})
        .with_context(|| format!("tabix failed for {}", chr))?;

    std::fs::remove_file(&list)?;
    std::fs::remove_file(&raw)?;

    Ok(())
}

/// Stage `merge`: every chromosome in parallel, then one barrier.
pub fn merge_stage(
    layout: &Layout,
    cultivars: &[String],
    tools: &Tools,
    threads: usize,
) -> anyhow::Result<()> {
    std::fs::create_dir_all(layout.merged_dir())?;

    run_all(&CHROMOSOMES, |chr| {
        merge_chromosome(layout, cultivars, chr, tools, threads)
    })
}

/// Stage `assemble`: all cleaned chromosomes into one genome-wide VCF.
///
/// Records are streamed into a temporary file next to the output, which is
/// renamed into place once complete.
pub fn assemble_stage(layout: &Layout) -> anyhow::Result<()> {
    let infiles: Vec<PathBuf> = CHROMOSOMES
        .iter()
        .map(|chr| layout.cleaned_vcf(chr))
        .collect();

    let outfile = layout.assembled_vcf();
    let mut tmp = tempfile::NamedTempFile::new_in(layout.merged_dir())?;
    let count = {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        let count = concat_vcfs(&infiles, &mut writer)?;
        writer.flush()?;
        count
    };
    tmp.persist(&outfile)
        .with_context(|| format!("could not create {}", outfile.display()))?;

    info!("    {} sites in {}", count, outfile.display());
    Ok(())
}

/// Stage `align`: subsample the assembled VCF and convert it to FASTA.
pub fn align_stage(layout: &Layout, size: usize, seed: Option<u64>) -> anyhow::Result<()> {
    std::fs::create_dir_all(layout.alignment_dir())?;

    let mut rng = make_rng(seed);
    let (written, available) = {
        let mut writer = crate::writer(&path_str(&layout.subsample_vcf()))?;
        let counts = subsample_file(&layout.assembled_vcf(), size, &mut rng, &mut writer)?;
        writer.flush()?;
        counts
    };
    if size > available {
        warn!(
            "Asked for {} sites, but only {} are available; using all of them",
            size, available
        );
    }

    let sub = read_vcf(&path_str(&layout.subsample_vcf()))?;
    let mut writer = crate::writer(&path_str(&layout.fasta()))?;
    let (samples, sites) = vcf_to_fasta(&sub, &mut writer)?;
    writer.flush()?;

    info!("    {} of {} sites drawn", written, available);
    info!("    {} sequences of {} sites", samples, sites);
    Ok(())
}

/// The raxml-ng command line for the alignment.
pub fn tree_args(layout: &Layout, config: &Config, threads: usize) -> anyhow::Result<Vec<String>> {
    let mut args = vec![
        "--all".to_string(),
        "--msa".to_string(),
        path_str(&layout.fasta()),
        "--model".to_string(),
        config.raxml_model().to_string(),
        "--bs-trees".to_string(),
        config.raxml_bs_trees()?.to_string(),
        "--threads".to_string(),
        threads.to_string(),
        "--prefix".to_string(),
        path_str(&layout.tree_prefix()),
        "--redo".to_string(),
    ];
    args.extend(config.raxml_options());
    Ok(args)
}

/// Stage `tree`: runs raxml-ng.
///
/// A failure only leaves the sentinel file; it is not an error of the run.
/// Returns whether the tree was built.
pub fn tree_stage(
    layout: &Layout,
    config: &Config,
    tools: &Tools,
    threads: usize,
) -> anyhow::Result<bool> {
    std::fs::create_dir_all(layout.alignment_dir())?;

    let sentinel = layout.tree_sentinel();
    if sentinel.exists() {
        std::fs::remove_file(&sentinel)?;
    }

    let args = tree_args(layout, config, threads)?;
    let mut log = std::fs::File::create(layout.tree_log())?;

    let outcome = match &tools.raxml {
        None => Err("raxml-ng not found".to_string()),
        Some(raxml) => {
            writeln!(log, "{} {}", raxml.display(), args.join(" "))?;
            let mut cmd = std::process::Command::new(raxml);
            cmd.args(&args)
                .stdout(log.try_clone()?)
                .stderr(log.try_clone()?);
            match cmd.status() {
                Ok(status) if status.success() => Ok(()),
                Ok(status) => Err(format!("raxml-ng exited with {}", status)),
                Err(e) => Err(format!("can't run {}: {}", raxml.display(), e)),
            }
        }
    };

    match outcome {
        Ok(()) => {
            info!("    best tree in {}", layout.best_tree().display());
            Ok(true)
        }
        Err(msg) => {
            writeln!(log, "{}", msg)?;
            std::fs::File::create(&sentinel)?;
            error!(
                "    {}; see {} (failure marked by {})",
                msg,
                layout.tree_log().display(),
                sentinel.display()
            );
            Ok(false)
        }
    }
}

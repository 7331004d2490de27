//! The on-disk layout shared by all stages.

use std::path::{Path, PathBuf};

/// The twelve chromosomes, in assembly order
pub const CHROMOSOMES: [&str; 12] = [
    "chr01", "chr02", "chr03", "chr04", "chr05", "chr06", "chr07", "chr08", "chr09", "chr10",
    "chr11", "chr12",
];

pub const SPLIT_DIR: &str = "splitchromosomefiles";
pub const MERGED_DIR: &str = "mergedchromosomefiles";
pub const ALIGNMENT_DIR: &str = "alignmentfiles";

/// Paths of every file the pipeline reads or writes.
///
/// `name` is the stem shared by the genome-wide outputs, taken from the
/// cultivar list's file name.
#[derive(Debug, Clone)]
pub struct Layout {
    pub root: PathBuf,
    pub name: String,
}

impl Layout {
    pub fn new(root: &Path, name: &str) -> Self {
        Self {
            root: root.to_path_buf(),
            name: name.to_string(),
        }
    }

    pub fn split_dir(&self) -> PathBuf {
        self.root.join(SPLIT_DIR)
    }

    pub fn merged_dir(&self) -> PathBuf {
        self.root.join(MERGED_DIR)
    }

    pub fn alignment_dir(&self) -> PathBuf {
        self.root.join(ALIGNMENT_DIR)
    }

    /// `splitchromosomefiles/<cultivar>.<chr>.vcf.gz`
    pub fn split_vcf(&self, cultivar: &str, chr: &str) -> PathBuf {
        self.split_dir().join(format!("{}.{}.vcf.gz", cultivar, chr))
    }

    pub fn merge_list(&self, chr: &str) -> PathBuf {
        self.merged_dir().join(format!("{}.list", chr))
    }

    /// Output of bcftools, before the artifact filter
    pub fn merged_raw_vcf(&self, chr: &str) -> PathBuf {
        self.merged_dir().join(format!("{}.merged.vcf", chr))
    }

    pub fn cleaned_vcf(&self, chr: &str) -> PathBuf {
        self.merged_dir().join(format!("{}.snps.vcf.gz", chr))
    }

    pub fn assembled_vcf(&self) -> PathBuf {
        self.merged_dir().join(format!("{}.snps.vcf", self.name))
    }

    pub fn subsample_vcf(&self) -> PathBuf {
        self.alignment_dir()
            .join(format!("{}.subsample.vcf", self.name))
    }

    pub fn fasta(&self) -> PathBuf {
        self.alignment_dir().join(format!("{}.fasta", self.name))
    }

    /// Prefix handed to raxml-ng; it appends `.raxml.*`
    pub fn tree_prefix(&self) -> PathBuf {
        self.alignment_dir().join(&self.name)
    }

    pub fn best_tree(&self) -> PathBuf {
        self.alignment_dir()
            .join(format!("{}.raxml.bestTree", self.name))
    }

    pub fn tree_log(&self) -> PathBuf {
        self.alignment_dir().join(format!("{}.tree.log", self.name))
    }

    pub fn tree_sentinel(&self) -> PathBuf {
        self.alignment_dir()
            .join(format!("{}.tree.failed", self.name))
    }
}

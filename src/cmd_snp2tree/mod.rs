//! Subcommand modules for the `snp2tree` binary.

pub mod concat;
pub mod filter;
pub mod run;
pub mod steps;
pub mod subsample;
pub mod to_fasta;

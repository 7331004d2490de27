pub mod assemble;
pub mod config;
pub mod error;
pub mod fasta;
pub mod io;
pub mod layout;
pub mod stages;
pub mod steps;
pub mod subsample;
pub mod taskgroup;
pub mod vcf;

use clap::*;
use snp2tree::libs::fasta::vcf_to_fasta;
use snp2tree::libs::vcf::read_vcf;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("to-fasta")
        .about("Convert VCF genotypes into a FASTA alignment")
        .after_help(
            r###"
Writes one sequence per sample, named as in the #CHROM line, with one
column per record.

* Homozygous or haploid calls give the allele's base
* Heterozygous calls give the IUPAC code, e.g. A/G => R
* Missing calls and non-base alleles give N
* Sequences are not wrapped

Examples:
1. Alignment for a tree builder:
   snp2tree to-fasta sub.vcf -o sub.fasta

"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .index(1)
                .help("Input VCF file to process"),
        )
        .arg(
            Arg::new("outfile")
                .long("outfile")
                .short('o')
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let vcf = read_vcf(args.get_one::<String>("infile").unwrap())?;

    let mut writer = snp2tree::writer(args.get_one::<String>("outfile").unwrap())?;
    vcf_to_fasta(&vcf, &mut writer)?;
    writer.flush()?;

    Ok(())
}

use clap::*;
use log::info;
use snp2tree::libs::vcf::filter_snps;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("filter")
        .about("Keep plain SNP records, dropping MNP and <NON_REF> artifacts")
        .after_help(
            r###"
This is the line filter `run` applies after `bcftools view`.

A record is kept only when:
* REF is a single base (A, C, G, T or N)
* ALT is not `.` and not a lone <NON_REF>
* every ALT other than <NON_REF> is a single base
* every called allele in GT names a real base, so 2/2, 3/3 or 4/4
  needs at least 2, 3 or 4 real ALT alleles
* no sample has a missing allele

Header lines are copied unchanged.

Notes:
* Supports both plain text and gzipped (.gz) files
* Reads from stdin if input file is 'stdin'

Examples:
1. Filter a merged VCF:
   snp2tree filter chr01.merged.vcf -o chr01.snps.vcf

2. In a pipe:
   bcftools view -Ov in.bcf | snp2tree filter stdin | bgzip > out.vcf.gz

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
    let mut reader = snp2tree::reader(args.get_one::<String>("infile").unwrap())?;
    let mut writer = snp2tree::writer(args.get_one::<String>("outfile").unwrap())?;

    let (kept, total) = filter_snps(&mut reader, &mut writer)?;
    writer.flush()?;
    info!("Kept {} of {} records", kept, total);

    Ok(())
}

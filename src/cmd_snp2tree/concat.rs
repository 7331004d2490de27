use clap::*;
use log::info;
use snp2tree::libs::assemble::{check_headers, concat_vcfs};
use std::io::Write;
use std::path::PathBuf;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("concat")
        .about("Concatenate VCF files under a single header")
        .after_help(
            r###"
The `assemble` step of `run`, on any list of files.

* Records are written in the order the files are given; nothing is re-sorted
* The header comes from the first file
* All files must have the same #CHROM line, i.e. the same samples
* Any missing file is an error and nothing is written
* .vcf.gz inputs are decompressed

Examples:
1. Join chromosomes:
   snp2tree concat chr01.snps.vcf.gz chr02.snps.vcf.gz -o genome.vcf

"###,
        )
        .arg(
            Arg::new("infiles")
                .required(true)
                .num_args(1..)
                .index(1)
                .help("Input VCF files, in output order"),
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
    let infiles: Vec<PathBuf> = args
        .get_many::<String>("infiles")
        .unwrap()
        .map(PathBuf::from)
        .collect();

    // Nothing is created until every input has been checked
    check_headers(&infiles)?;

    let mut writer = snp2tree::writer(args.get_one::<String>("outfile").unwrap())?;
    let count = concat_vcfs(&infiles, &mut writer)?;
    writer.flush()?;
    info!("Wrote {} records from {} files", count, infiles.len());

    Ok(())
}

use clap::*;
use log::warn;
use snp2tree::libs::subsample::{make_rng, subsample_file};
use std::io::Write;
use std::path::PathBuf;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("subsample")
        .about("Randomly draw records from a VCF file")
        .after_help(
            r###"
Draws --number records uniformly at random, without replacement.

* Header lines, everything up to and including #CHROM, are copied unchanged
* Drawn records are copied verbatim and keep their input order
* If the file has fewer records than requested, all of them are written
* Use --seed for a reproducible draw
* The file is read twice and never held in memory; stdin is first
  copied to a temporary file

Examples:
1. Draw 10000 SNPs:
   snp2tree subsample genome.snps.vcf -n 10000 -o sub.vcf

2. Reproducible:
   snp2tree subsample genome.snps.vcf -n 500 --seed 42

"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .index(1)
                .help("Input VCF file to process"),
        )
        .arg(
            Arg::new("number")
                .long("number")
                .short('n')
                .required(true)
                .num_args(1)
                .value_parser(value_parser!(usize))
                .help("Number of records to draw"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .short('s')
                .num_args(1)
                .value_parser(value_parser!(u64))
                .help("Random seed; default draws from the OS"),
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
    //----------------------------
    // Args
    //----------------------------
    let infile = args.get_one::<String>("infile").unwrap();
    let opt_number = *args.get_one::<usize>("number").unwrap();
    let opt_seed = args.get_one::<u64>("seed").copied();

    // stdin can only be read once
    let mut spool = None;
    let path = if infile == "stdin" {
        let mut tmp = tempfile::NamedTempFile::new()?;
        std::io::copy(&mut std::io::stdin().lock(), &mut tmp)?;
        tmp.flush()?;
        let path = tmp.path().to_path_buf();
        spool = Some(tmp);
        path
    } else {
        PathBuf::from(infile)
    };

    //----------------------------
    // Operating
    //----------------------------
    let mut rng = make_rng(opt_seed);
    let mut writer = snp2tree::writer(args.get_one::<String>("outfile").unwrap())?;
    let (_, available) = subsample_file(&path, opt_number, &mut rng, &mut writer)?;
    writer.flush()?;
    drop(spool);

    if opt_number > available {
        warn!(
            "Asked for {} records, but {} has only {}",
            opt_number, infile, available
        );
    }

    Ok(())
}

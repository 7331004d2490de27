extern crate clap;
use clap::*;
use std::io::Write;

mod cmd_snp2tree;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| match record.level() {
            log::Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(buf, "[{}] {}", level, record.args()),
        })
        .init();

    let app = Command::new("snp2tree")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`snp2tree` - merge cultivar VCFs into a SNP alignment and build a tree")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .subcommand(cmd_snp2tree::run::make_subcommand())
        .subcommand(cmd_snp2tree::steps::make_subcommand())
        .subcommand(cmd_snp2tree::filter::make_subcommand())
        .subcommand(cmd_snp2tree::concat::make_subcommand())
        .subcommand(cmd_snp2tree::subsample::make_subcommand())
        .subcommand(cmd_snp2tree::to_fasta::make_subcommand())
        .after_help(
            r###"Subcommand groups:

* Pipeline:
    * run   - merge => assemble => align => tree
    * steps - Show which steps a set of step flags selects

* Single stages:
    * filter    - Drop indels, MNPs and <NON_REF> artifacts from a VCF
    * concat    - Concatenate VCFs under one header
    * subsample - Draw random records from a VCF
    * to-fasta  - Convert VCF genotypes into an alignment

"###,
        );

    // Check which subcommand the user ran...
    match app.get_matches().subcommand() {
        Some(("run", sub_matches)) => cmd_snp2tree::run::execute(sub_matches),
        Some(("steps", sub_matches)) => cmd_snp2tree::steps::execute(sub_matches),
        Some(("filter", sub_matches)) => cmd_snp2tree::filter::execute(sub_matches),
        Some(("concat", sub_matches)) => cmd_snp2tree::concat::execute(sub_matches),
        Some(("subsample", sub_matches)) => cmd_snp2tree::subsample::execute(sub_matches),
        Some(("to-fasta", sub_matches)) => cmd_snp2tree::to_fasta::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}

use clap::*;
use itertools::Itertools;
use log::info;
use snp2tree::libs::config::{resolve_tools, resolve_workdir, Config, Environment, Mode, DEFAULT_CONFIG};
use snp2tree::libs::error::PipelineError;
use snp2tree::libs::layout::Layout;
use snp2tree::libs::stages;
use snp2tree::libs::steps::{ActiveSteps, Step};
use std::path::{Path, PathBuf};

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("run")
        .about("Pipeline - cultivar VCFs to a SNP alignment and a tree")
        .after_help(
            r###"
Steps, in order:

* merge    - For each of chr01..chr12, in parallel:
             bcftools merge | bcftools view (SNPs, MAC >= 2, AF <= 0.99, no missing GT),
             drop MNP / <NON_REF> artifacts, bgzip and tabix
* assemble - Concatenate the 12 chromosomes into <name>.snps.vcf
* align    - Draw --sites random SNPs and convert them to <name>.fasta
* tree     - raxml-ng --all on the alignment; a failure leaves <name>.tree.failed

Layout under --outdir:

    splitchromosomefiles/   <cultivar>.<chr>.vcf.gz, required input
    mergedchromosomefiles/  <chr>.snps.vcf.gz(.tbi), <name>.snps.vcf
    alignmentfiles/         <name>.subsample.vcf, <name>.fasta, raxml-ng outputs

<name> is the cultivar list's file name without extension.

Configuration (key=value, default <outdir>/snp2tree.conf):

    threads=4
    subsample_size=10000
    bcftools=bcftools
    tabix=tabix
    raxml=raxml-ng
    raxml_model=GTR+G
    raxml_bs_trees=100
    raxml_options=--seed 42

--env cluster takes the working directory from $PBS_O_WORKDIR or $SLURM_SUBMIT_DIR.

Examples:
1. The whole pipeline:
   snp2tree run cultivars.txt -o rice -t 8

2. Resume from the alignment:
   snp2tree run cultivars.txt -o rice --start-from-step align

3. Only rebuild the tree:
   snp2tree run cultivars.txt -o rice --run-only-step tree

"###,
        )
        .arg(
            Arg::new("cultivars")
                .required(true)
                .index(1)
                .help("File listing the cultivars, one per line"),
        )
        .arg(
            Arg::new("outdir")
                .long("outdir")
                .short('o')
                .num_args(1)
                .help("Output root [default: the working directory]"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .num_args(1)
                .help("Configuration file [default: <outdir>/snp2tree.conf]"),
        )
        .arg(
            Arg::new("threads")
                .long("threads")
                .short('t')
                .num_args(1)
                .value_parser(value_parser!(usize))
                .help("Threads for each bcftools and raxml-ng; overrides `threads`"),
        )
        .arg(
            Arg::new("sites")
                .long("sites")
                .short('n')
                .num_args(1)
                .value_parser(value_parser!(usize))
                .help("Number of SNPs in the alignment; overrides `subsample_size`"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .short('s')
                .num_args(1)
                .value_parser(value_parser!(u64))
                .help("Random seed for subsampling"),
        )
        .arg(
            Arg::new("env")
                .long("env")
                .num_args(1)
                .value_parser(["local", "cluster"])
                .default_value("local")
                .help("Interactive or batch-scheduled execution"),
        )
        .args(super::steps::step_args())
}

fn resolve(base: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn load_cultivars(path: &Path) -> anyhow::Result<Vec<String>> {
    if !path.is_file() {
        return Err(PipelineError::MissingInput(format!(
            "cultivar list {} does not exist",
            path.display()
        ))
        .into());
    }

    let cultivars = snp2tree::read_list(&path.to_string_lossy())?;
    if cultivars.is_empty() {
        return Err(
            PipelineError::MissingInput(format!("cultivar list {} is empty", path.display())).into(),
        );
    }

    let dups: Vec<&String> = cultivars.iter().duplicates().collect();
    if !dups.is_empty() {
        anyhow::bail!(
            "Cultivars listed more than once in {}: {}",
            path.display(),
            dups.iter().join(", ")
        );
    }

    Ok(cultivars)
}

/// The directory the first active step reads from
fn upstream_dir(layout: &Layout, active: &ActiveSteps) -> Option<PathBuf> {
    match active.first()? {
        Step::Merge => Some(layout.split_dir()),
        Step::Assemble | Step::Align => Some(layout.merged_dir()),
        Step::Tree => Some(layout.alignment_dir()),
    }
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let active = super::steps::active_steps(args)?;

    let mode = args.get_one::<String>("env").unwrap().parse::<Mode>()?;
    let workdir = resolve_workdir(mode, |var| std::env::var(var).ok())?;

    let outdir = match args.get_one::<String>("outdir") {
        Some(dir) => resolve(&workdir, dir),
        None => workdir.clone(),
    };

    let list_file = resolve(&workdir, args.get_one::<String>("cultivars").unwrap());
    let cultivars = load_cultivars(&list_file)?;
    let name = list_file
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "cultivars".to_string());

    let config_file = match args.get_one::<String>("config") {
        Some(file) => resolve(&workdir, file),
        None => outdir.join(DEFAULT_CONFIG),
    };
    let config = Config::load(&config_file)?;

    let threads = match args.get_one::<usize>("threads") {
        Some(t) => (*t).max(1),
        None => config.threads()?,
    };
    let sites = match args.get_one::<usize>("sites") {
        Some(n) => *n,
        None => config.subsample_size()?,
    };
    let seed = args.get_one::<u64>("seed").copied();

    let layout = Layout::new(&outdir, &name);

    //----------------------------
    // Preconditions
    //----------------------------
    if let Some(dir) = upstream_dir(&layout, &active) {
        if !dir.is_dir() {
            return Err(PipelineError::MissingDirectory(dir).into());
        }
    }

    let env = Environment {
        mode,
        workdir,
        tools: resolve_tools(&config, &active)?,
    };

    info!("==> Paths");
    info!("    \"env\"       = {:?}", env.mode);
    info!("    \"workdir\"   = {}", env.workdir.display());
    info!("    \"outdir\"    = {}", outdir.display());
    info!("    \"config\"    = {}", config_file.display());
    info!("    \"cultivars\" = {} ({})", list_file.display(), cultivars.len());
    info!("    \"steps\"     = {}", active);

    //----------------------------
    // Operating
    //----------------------------
    if active.contains(Step::Merge) {
        info!("==> merge: bcftools merge | bcftools view, 12 chromosomes in parallel");
        stages::merge_stage(&layout, &cultivars, &env.tools, threads)?;
    }

    if active.contains(Step::Assemble) {
        info!("==> assemble: concatenate chr01..chr12");
        stages::assemble_stage(&layout)?;
    }

    if active.contains(Step::Align) {
        info!("==> align: subsample {} sites and convert to FASTA", sites);
        stages::align_stage(&layout, sites, seed)?;
    }

    if active.contains(Step::Tree) {
        info!("==> tree: raxml-ng");
        stages::tree_stage(&layout, &config, &env.tools, threads)?;
    }

    //----------------------------
    // Done
    //----------------------------
    info!("==> Done");

    Ok(())
}

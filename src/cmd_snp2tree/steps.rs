use clap::*;
use snp2tree::libs::steps::{select_steps, ActiveSteps};
use std::io::Write;

/// The three step flags, shared with `run`
pub fn step_args() -> Vec<Arg> {
    vec![
        Arg::new("start_from_step")
            .long("start-from-step")
            .num_args(1)
            .help("First step to run [merge|assemble|align|tree]"),
        Arg::new("stop_at_step")
            .long("stop-at-step")
            .num_args(1)
            .help("Last step to run"),
        Arg::new("run_only_step")
            .long("run-only-step")
            .num_args(1)
            .help("Run this step alone; overrides the two flags above"),
    ]
}

pub fn active_steps(args: &ArgMatches) -> anyhow::Result<ActiveSteps> {
    let get = |id: &str| args.get_one::<String>(id).map(|s| s.as_str());
    let active = select_steps(
        get("start_from_step"),
        get("stop_at_step"),
        get("run_only_step"),
    )?;
    Ok(active)
}

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("steps")
        .about("Show the steps selected by --start-from-step/--stop-at-step/--run-only-step")
        .after_help(
            r###"
The pipeline steps always run in this order:

    merge => assemble => align => tree

* Without flags, all four steps run
* --start-from-step and --stop-at-step are both inclusive
* --run-only-step selects exactly one step, whatever the other flags say
* An unknown step name is an error

Examples:
1. Steps from assemble on:
   snp2tree steps --start-from-step assemble

2. A single step:
   snp2tree steps --run-only-step tree

"###,
        )
        .args(step_args())
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let active = active_steps(args)?;

    let mut writer = snp2tree::writer("stdout")?;
    for step in active.steps() {
        writeln!(writer, "{}", step)?;
    }

    Ok(())
}

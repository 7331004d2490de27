//! Workflow options and the execution environment.
//!
//! Both are resolved once at startup and passed to the stages explicitly.

use crate::libs::error::PipelineError;
use crate::libs::steps::{ActiveSteps, Step};
use log::warn;
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG: &str = "snp2tree.conf";

const KNOWN_KEYS: [&str; 8] = [
    "threads",
    "subsample_size",
    "bcftools",
    "tabix",
    "raxml",
    "raxml_model",
    "raxml_bs_trees",
    "raxml_options",
];

/// Variables batch schedulers set to the directory a job was submitted from
pub const SCHEDULER_WORKDIR_VARS: [&str; 2] = ["PBS_O_WORKDIR", "SLURM_SUBMIT_DIR"];

/// A key=value configuration file.
#[derive(Debug, Clone, Default)]
pub struct Config {
    values: BTreeMap<String, String>,
}

impl Config {
    /// Parses `key=value` lines. `#` starts a comment line.
    pub fn parse<R: BufRead>(reader: R, path: &Path) -> anyhow::Result<Self> {
        let mut values = BTreeMap::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let content = line.trim();
            if content.is_empty() || content.starts_with('#') {
                continue;
            }

            let Some((key, value)) = content.split_once('=') else {
                return Err(PipelineError::BadConfigLine {
                    path: path.to_path_buf(),
                    line: i + 1,
                    content: content.to_string(),
                }
                .into());
            };
            let key = key.trim();
            if key.is_empty() {
                return Err(PipelineError::BadConfigLine {
                    path: path.to_path_buf(),
                    line: i + 1,
                    content: content.to_string(),
                }
                .into());
            }
            if !KNOWN_KEYS.contains(&key) {
                warn!("Unknown key `{}` in {}", key, path.display());
            }
            values.insert(key.to_string(), value.trim().to_string());
        }

        Ok(Self { values })
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.is_file() {
            return Err(PipelineError::MissingConfig(path.to_path_buf()).into());
        }
        let reader = crate::reader(&path.to_string_lossy())?;
        Self::parse(reader, path)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// A numeric value, or `default` when the key is absent
    pub fn get_usize(&self, key: &str, default: usize) -> anyhow::Result<usize> {
        match self.get(key) {
            None => Ok(default),
            Some(v) => v.parse::<usize>().map_err(|_| {
                anyhow::anyhow!("Configuration key `{}` must be a number, got \"{}\"", key, v)
            }),
        }
    }

    pub fn threads(&self) -> anyhow::Result<usize> {
        Ok(self.get_usize("threads", 1)?.max(1))
    }

    pub fn subsample_size(&self) -> anyhow::Result<usize> {
        self.get_usize("subsample_size", 10_000)
    }

    pub fn raxml_model(&self) -> &str {
        self.get_or("raxml_model", "GTR+G")
    }

    pub fn raxml_bs_trees(&self) -> anyhow::Result<usize> {
        self.get_usize("raxml_bs_trees", 100)
    }

    /// Extra raxml-ng options, passed through verbatim
    pub fn raxml_options(&self) -> Vec<String> {
        self.get_or("raxml_options", "")
            .split_whitespace()
            .map(|s| s.to_string())
            .collect()
    }
}

/// Where the pipeline is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// An interactive shell; the working directory is the current one
    Local,
    /// A batch job; the scheduler names the working directory
    Cluster,
}

impl std::str::FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Mode::Local),
            "cluster" => Ok(Mode::Cluster),
            _ => anyhow::bail!("Unknown environment `{}`, expected local or cluster", s),
        }
    }
}

/// Paths of the external tools, resolved before any stage runs.
#[derive(Debug, Clone, Default)]
pub struct Tools {
    pub bcftools: Option<PathBuf>,
    pub tabix: Option<PathBuf>,
    /// `None` means the tree stage records a failure instead of running
    pub raxml: Option<PathBuf>,
}

/// Everything a stage needs to know about its surroundings.
#[derive(Debug, Clone)]
pub struct Environment {
    pub mode: Mode,
    pub workdir: PathBuf,
    pub tools: Tools,
}

/// Finds the working directory for `mode`.
///
/// `lookup` reads an environment variable; tests pass a closure.
pub fn resolve_workdir<F>(mode: Mode, lookup: F) -> anyhow::Result<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    match mode {
        Mode::Local => Ok(std::env::current_dir()?),
        Mode::Cluster => SCHEDULER_WORKDIR_VARS
            .iter()
            .filter_map(|var| lookup(var))
            .find(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Running with --env cluster, but none of {} is set\nHint: submit through the scheduler, or use --env local",
                    SCHEDULER_WORKDIR_VARS.join(", ")
                )
            }),
    }
}

fn find_tool(config: &Config, key: &str, default: &str) -> Option<PathBuf> {
    which::which(config.get_or(key, default)).ok()
}

/// Resolves the tools the active steps call.
///
/// A missing merge tool is fatal; a missing tree builder is left to the
/// tree stage.
pub fn resolve_tools(config: &Config, active: &ActiveSteps) -> anyhow::Result<Tools> {
    let require = |key: &str, default: &str| {
        find_tool(config, key, default).ok_or_else(|| PipelineError::MissingTool {
            name: config.get_or(key, default).to_string(),
            key: key.to_string(),
        })
    };

    let mut tools = Tools::default();

    if active.contains(Step::Merge) {
        tools.bcftools = Some(require("bcftools", "bcftools")?);
        tools.tabix = Some(require("tabix", "tabix")?);
    }

    if active.contains(Step::Tree) {
        tools.raxml = find_tool(config, "raxml", "raxml-ng");
        if tools.raxml.is_none() {
            warn!(
                "Can't find `{}`; the tree step will be marked as failed",
                config.get_or("raxml", "raxml-ng")
            );
        }
    }

    Ok(tools)
}

use std::fmt;
use std::path::PathBuf;

/// Failures that stop the pipeline, each with a hint for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// A step flag names no known step
    UnknownStep {
        /// The flag the name came from, e.g. `--stop-at-step`
        flag: String,
        name: String,
    },
    /// `--start-from-step` comes after `--stop-at-step`
    EmptyStepRange { start: String, stop: String },
    /// The configuration file could not be found
    MissingConfig(PathBuf),
    /// A configuration line is not `key=value`
    BadConfigLine {
        path: PathBuf,
        line: usize,
        content: String,
    },
    /// Mandatory input is missing or empty
    MissingInput(String),
    /// An upstream directory of the first active step is absent
    MissingDirectory(PathBuf),
    /// An external tool can't be found
    MissingTool { name: String, key: String },
    /// One or more chromosome tasks failed
    ChromosomesFailed(Vec<String>),
    /// No `#CHROM` line in a VCF
    NoColumnHeader(PathBuf),
    /// Two VCFs to be concatenated carry different sample columns
    HeaderMismatch { first: PathBuf, other: PathBuf },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::UnknownStep { flag, name } => write!(
                f,
                "Unknown step '{}' given to {}\nHint: valid steps are merge, assemble, align, tree",
                name, flag
            ),
            PipelineError::EmptyStepRange { start, stop } => write!(
                f,
                "Step '{}' comes after step '{}', no step would run\nHint: steps run in the order merge, assemble, align, tree",
                start, stop
            ),
            PipelineError::MissingConfig(path) => write!(
                f,
                "Configuration file not found: {}\nHint: pass --config, or create snp2tree.conf in the output directory",
                path.display()
            ),
            PipelineError::BadConfigLine {
                path,
                line,
                content,
            } => write!(
                f,
                "Malformed line {} in {}: \"{}\"\nHint: every line must look like key=value",
                line,
                path.display(),
                content
            ),
            PipelineError::MissingInput(msg) => write!(
                f,
                "Missing input: {}\nHint: check the cultivar list and the splitchromosomefiles/ directory",
                msg
            ),
            PipelineError::MissingDirectory(path) => write!(
                f,
                "Expected directory not found: {}\nHint: run the earlier steps first, or check --outdir",
                path.display()
            ),
            PipelineError::MissingTool { name, key } => write!(
                f,
                "Can't find '{}' in PATH\nHint: install it, or set `{}=/path/to/{}` in the configuration file",
                name, key, name
            ),
            PipelineError::ChromosomesFailed(labels) => write!(
                f,
                "Merging failed for: {}\nHint: see the log above for each chromosome's error",
                labels.join(", ")
            ),
            PipelineError::NoColumnHeader(path) => write!(
                f,
                "No #CHROM line in {}\nHint: the file is not a VCF, or its header is truncated",
                path.display()
            ),
            PipelineError::HeaderMismatch { first, other } => write!(
                f,
                "Sample columns of {} differ from {}\nHint: every chromosome must be merged from the same cultivar list",
                other.display(),
                first.display()
            ),
        }
    }
}

impl std::error::Error for PipelineError {}

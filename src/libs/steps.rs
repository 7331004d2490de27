//! Which pipeline stages run.
//!
//! The four stages always run in the order of [`Step::ALL`]. A selection only
//! takes a subset, decided once before anything touches the filesystem.

use crate::libs::error::PipelineError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    Merge,
    Assemble,
    Align,
    Tree,
}

impl Step {
    pub const ALL: [Step; 4] = [Step::Merge, Step::Assemble, Step::Align, Step::Tree];

    pub fn name(&self) -> &'static str {
        match self {
            Step::Merge => "merge",
            Step::Assemble => "assemble",
            Step::Align => "align",
            Step::Tree => "tree",
        }
    }

    /// Position in the fixed order
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Step {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Step::ALL
            .iter()
            .find(|step| step.name() == s)
            .copied()
            .ok_or(())
    }
}

/// The steps a run executes, kept in pipeline order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSteps {
    steps: Vec<Step>,
}

impl ActiveSteps {
    pub fn contains(&self, step: Step) -> bool {
        self.steps.contains(&step)
    }

    pub fn first(&self) -> Option<Step> {
        self.steps.first().copied()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for ActiveSteps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.steps.iter().map(|s| s.name()).collect();
        write!(f, "{}", names.join(" "))
    }
}

fn parse_step(flag: &str, name: Option<&str>) -> Result<Option<Step>, PipelineError> {
    match name {
        None => Ok(None),
        Some(name) => name
            .parse::<Step>()
            .map(Some)
            .map_err(|_| PipelineError::UnknownStep {
                flag: flag.to_string(),
                name: name.to_string(),
            }),
    }
}

/// Computes the active steps from the three optional step flags.
///
/// `only` wins over `start` and `stop`. All three names are checked, even
/// the ones `only` overrides.
///
/// ```
/// use snp2tree::libs::steps::{select_steps, Step};
///
/// let active = select_steps(Some("assemble"), Some("align"), None).unwrap();
/// assert_eq!(active.steps(), &[Step::Assemble, Step::Align]);
///
/// let active = select_steps(Some("merge"), None, Some("tree")).unwrap();
/// assert_eq!(active.steps(), &[Step::Tree]);
///
/// assert!(select_steps(None, Some("phylo"), None).is_err());
/// ```
pub fn select_steps(
    start: Option<&str>,
    stop: Option<&str>,
    only: Option<&str>,
) -> Result<ActiveSteps, PipelineError> {
    let start = parse_step("--start-from-step", start)?;
    let stop = parse_step("--stop-at-step", stop)?;
    let only = parse_step("--run-only-step", only)?;

    if let Some(step) = only {
        return Ok(ActiveSteps { steps: vec![step] });
    }

    let start = start.unwrap_or(Step::Merge);
    let stop = stop.unwrap_or(Step::Tree);
    if start > stop {
        return Err(PipelineError::EmptyStepRange {
            start: start.to_string(),
            stop: stop.to_string(),
        });
    }

    let steps = Step::ALL[start.index()..=stop.index()].to_vec();
    Ok(ActiveSteps { steps })
}

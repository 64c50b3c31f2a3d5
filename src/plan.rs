//! Bench plan: which file to load, which engines to time, and which paired
//! operations to run. Plans come from YAML and can be overridden from the CLI.

use crate::errors::{FrameError, FrameResult};
use crate::frame::Axis;
use miette::SourceSpan;
use serde::de::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Routine {
    SumColumns,
    SumRows,
    MeanColumns,
    MeanRows,
    MaxColumns,
    MaxRows,
    Copy,
}

impl Routine {
    pub const ALL: [Routine; 7] = [
        Routine::SumColumns,
        Routine::SumRows,
        Routine::Copy,
        Routine::MeanColumns,
        Routine::MeanRows,
        Routine::MaxColumns,
        Routine::MaxRows,
    ];

    /// Text printed before each timing line.
    pub fn label(self) -> &'static str {
        match self {
            Routine::SumColumns | Routine::SumRows => "Summing CSV",
            Routine::MeanColumns | Routine::MeanRows => "Calculating means",
            Routine::MaxColumns | Routine::MaxRows => "Calculating maximum",
            Routine::Copy => "Copying CSV",
        }
    }

    pub fn axis(self) -> Option<Axis> {
        match self {
            Routine::SumColumns | Routine::MeanColumns | Routine::MaxColumns => Some(Axis::Columns),
            Routine::SumRows | Routine::MeanRows | Routine::MaxRows => Some(Axis::Rows),
            Routine::Copy => None,
        }
    }
}

impl fmt::Display for Routine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Routine::SumColumns => "sum_columns",
            Routine::SumRows => "sum_rows",
            Routine::MeanColumns => "mean_columns",
            Routine::MeanRows => "mean_rows",
            Routine::MaxColumns => "max_columns",
            Routine::MaxRows => "max_rows",
            Routine::Copy => "copy",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ContenderKind {
    /// The reference engine
    Polars,
    /// This crate's engine
    Rp,
}

impl ContenderKind {
    pub fn label(self) -> &'static str {
        match self {
            ContenderKind::Polars => "POLARS",
            ContenderKind::Rp => "RP",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BenchPlan {
    #[serde(default = "default_input")]
    pub input: PathBuf,
    #[serde(default = "default_routines")]
    pub routines: Vec<Routine>,
    /// Timed calls per step; the report keeps the mean and the fastest.
    #[serde(default = "default_repeat")]
    pub repeat: usize,
    #[serde(default = "default_contenders")]
    pub contenders: Vec<ContenderKind>,
}

fn default_input() -> PathBuf {
    PathBuf::from("data/2008.csv")
}

fn default_routines() -> Vec<Routine> {
    vec![Routine::MaxRows]
}

fn default_repeat() -> usize {
    1
}

fn default_contenders() -> Vec<ContenderKind> {
    vec![ContenderKind::Polars, ContenderKind::Rp]
}

impl Default for BenchPlan {
    fn default() -> Self {
        Self {
            input: default_input(),
            routines: default_routines(),
            repeat: default_repeat(),
            contenders: default_contenders(),
        }
    }
}

/// CLI values that take precedence over the plan file.
#[derive(Debug, Clone, Default)]
pub struct PlanOverrides {
    pub input: Option<PathBuf>,
    pub routines: Vec<Routine>,
    pub all_routines: bool,
    pub repeat: Option<usize>,
    pub contenders: Vec<ContenderKind>,
}

impl BenchPlan {
    pub fn from_path<P: AsRef<Path>>(path: P) -> FrameResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> FrameResult<Self> {
        let plan: BenchPlan = serde_yaml::from_str(content).map_err(|e| {
            let span = e.location().map(|loc| SourceSpan::from((loc.index(), 1)));
            FrameError::ConfigError(e, span)
        })?;
        plan.validate()
    }

    pub fn with_overrides(mut self, overrides: PlanOverrides) -> FrameResult<Self> {
        if let Some(input) = overrides.input {
            self.input = input;
        }
        if overrides.all_routines {
            self.routines = Routine::ALL.to_vec();
        } else if !overrides.routines.is_empty() {
            self.routines = overrides.routines;
        }
        if let Some(repeat) = overrides.repeat {
            self.repeat = repeat;
        }
        if !overrides.contenders.is_empty() {
            self.contenders = overrides.contenders;
        }
        self.validate()
    }

    fn validate(self) -> FrameResult<Self> {
        if self.repeat == 0 {
            return Err(FrameError::ConfigError(
                serde_yaml::Error::custom("repeat must be at least 1"),
                None,
            ));
        }
        if self.contenders.is_empty() {
            return Err(FrameError::ConfigError(
                serde_yaml::Error::custom("at least one contender is required"),
                None,
            ));
        }
        Ok(self)
    }
}

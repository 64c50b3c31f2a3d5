//! The two engines a bench run compares.
//!
//! Routines hit the same semantic axis on both sides: `SumColumns` yields one
//! value per column whether the engine calls that axis 0 or not.

use crate::errors::FrameResult;
use crate::frame::{Axis, DataFrame};
use crate::io;
use crate::plan::{ContenderKind, Routine};
use polars::prelude::{self as pl, col, max_horizontal, mean_horizontal, sum_horizontal, IntoLazy};
use std::hint::black_box;
use std::path::Path;

pub trait Contender {
    fn name(&self) -> &'static str;

    /// Runs one routine and returns the number of cells it produced.
    fn run(&self, routine: Routine) -> FrameResult<usize>;
}

/// Loads the CSV file for `kind`. This is the call timed as "Reading CSV".
pub fn load<P: AsRef<Path>>(kind: ContenderKind, path: P) -> FrameResult<Box<dyn Contender>> {
    Ok(match kind {
        ContenderKind::Rp => Box::new(RustyContender::load(path)?),
        ContenderKind::Polars => Box::new(PolarsContender::load(path)?),
    })
}

pub struct RustyContender {
    df: DataFrame,
}

impl RustyContender {
    pub fn load<P: AsRef<Path>>(path: P) -> FrameResult<Self> {
        Ok(Self {
            df: io::read_csv(path)?,
        })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }
}

impl Contender for RustyContender {
    fn name(&self) -> &'static str {
        ContenderKind::Rp.label()
    }

    fn run(&self, routine: Routine) -> FrameResult<usize> {
        let out = match routine {
            Routine::SumColumns => self.df.sum(Axis::Columns),
            Routine::SumRows => self.df.sum(Axis::Rows),
            Routine::MeanColumns => self.df.mean(Axis::Columns),
            Routine::MeanRows => self.df.mean(Axis::Rows),
            Routine::MaxColumns => self.df.max(Axis::Columns),
            Routine::MaxRows => self.df.max(Axis::Rows),
            Routine::Copy => self.df.copy(),
        };
        Ok(black_box(out).size())
    }
}

pub struct PolarsContender {
    df: pl::DataFrame,
}

impl PolarsContender {
    pub fn load<P: AsRef<Path>>(path: P) -> FrameResult<Self> {
        Ok(Self {
            df: io::read_reference_csv(path)?,
        })
    }

    pub fn frame(&self) -> &pl::DataFrame {
        &self.df
    }
}

impl Contender for PolarsContender {
    fn name(&self) -> &'static str {
        ContenderKind::Polars.label()
    }

    fn run(&self, routine: Routine) -> FrameResult<usize> {
        let expr = match routine {
            Routine::SumColumns => col("*").sum(),
            Routine::SumRows => sum_horizontal([col("*")], true)?,
            Routine::MeanColumns => col("*").mean(),
            Routine::MeanRows => mean_horizontal([col("*")], true)?,
            Routine::MaxColumns => col("*").max(),
            Routine::MaxRows => max_horizontal([col("*")])?,
            Routine::Copy => {
                // Frames are copy-on-write; clone is the polars copy.
                let copy = black_box(self.df.clone());
                return Ok(copy.height() * copy.width());
            }
        };
        let out = black_box(self.df.clone().lazy().select([expr]).collect()?);
        Ok(out.height() * out.width())
    }
}

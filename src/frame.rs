//! Two-dimensional numeric table.
//!
//! Data is held twice: column-major for axis-0 work and row-major for axis-1
//! work. Every constructor keeps `rows == transpose(cols)`.

use crate::errors::{FrameError, FrameResult};
use crate::io;
use crate::scan::LOWER_PAR_BOUND;
use crate::series::Series;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::ops::Index;
use std::path::Path;

/// Frames this wide or tall are abbreviated when displayed.
const DISPLAY_TRUNCATE_AT: usize = 10;
const DISPLAY_EDGE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Reduce each column to one value.
    Columns,
    /// Reduce each row to one value.
    Rows,
}

impl TryFrom<usize> for Axis {
    type Error = FrameError;

    fn try_from(value: usize) -> FrameResult<Self> {
        match value {
            0 => Ok(Axis::Columns),
            1 => Ok(Axis::Rows),
            other => Err(FrameError::InvalidAxis(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Reduction {
    Sum,
    Prod,
    Mean,
    Median,
    Mode,
    Var,
    Std,
    Min,
    Max,
}

impl Reduction {
    pub fn apply(self, df: &DataFrame, axis: Axis) -> DataFrame {
        match self {
            Reduction::Sum => df.sum(axis),
            Reduction::Prod => df.prod(axis),
            Reduction::Mean => df.mean(axis),
            Reduction::Median => df.median(axis),
            Reduction::Mode => df.mode(axis),
            Reduction::Var => df.var(axis),
            Reduction::Std => df.std(axis),
            Reduction::Min => df.min(axis),
            Reduction::Max => df.max(axis),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DataFrame {
    header_row: Vec<String>,
    cols: Vec<Series>,
    rows: Vec<Series>,
}

/// Swaps the orientation of a list of equal-length series.
pub fn transpose(mat: &[Series]) -> Vec<Series> {
    let Some(first) = mat.first() else {
        return Vec::new();
    };
    let n = first.size();
    let pick = |i: usize| -> Series { mat.iter().map(|c| c.values()[i]).collect() };
    if n * mat.len() < LOWER_PAR_BOUND {
        (0..n).map(pick).collect()
    } else {
        (0..n).into_par_iter().map(pick).collect()
    }
}

fn check_lengths(series: &[Series]) -> FrameResult<usize> {
    let expected = series.first().map(Series::size).unwrap_or(0);
    match series.iter().find(|s| s.size() != expected) {
        Some(bad) => Err(FrameError::LengthMismatch {
            expected,
            found: bad.size(),
        }),
        None => Ok(expected),
    }
}

impl DataFrame {
    /// Builds a frame from columns. Without a header, columns are named
    /// `"0"`, `"1"`, ...
    ///
    /// ```
    /// use rusty_pandas::{DataFrame, Series};
    /// let df = DataFrame::new(
    ///     vec![Series::from(vec![0, 1, 2]), Series::from(vec![42, 21, 8])],
    ///     Some(vec!["UserID".to_string(), "Age".to_string()]),
    /// )
    /// .unwrap();
    /// assert_eq!(df.shape(), (3, 2));
    /// ```
    pub fn new(data: Vec<Series>, header_row: Option<Vec<String>>) -> FrameResult<DataFrame> {
        check_lengths(&data)?;
        let header_row = Self::resolve_header(header_row, data.len())?;
        Ok(Self::assemble_from_cols(header_row, data))
    }

    /// Builds a frame from rows.
    pub fn from_rows(rows: Vec<Series>, header_row: Option<Vec<String>>) -> FrameResult<DataFrame> {
        let width = check_lengths(&rows)?;
        let header_row = Self::resolve_header(header_row, width)?;
        Ok(Self::assemble_from_rows(header_row, rows))
    }

    /// Builds a frame from named columns, ordered by name.
    pub fn from_hashmap(data_map: HashMap<String, Vec<f64>>) -> FrameResult<DataFrame> {
        let mut entries: Vec<(String, Vec<f64>)> = data_map.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        let (header, data): (Vec<String>, Vec<Series>) = entries
            .into_iter()
            .map(|(name, values)| (name, Series::new(values)))
            .unzip();
        DataFrame::new(data, Some(header))
    }

    pub fn gen_default_header(len: usize) -> Vec<String> {
        (0..len).map(|x| x.to_string()).collect()
    }

    fn resolve_header(header_row: Option<Vec<String>>, width: usize) -> FrameResult<Vec<String>> {
        match header_row {
            Some(h) if h.len() != width => Err(FrameError::LengthMismatch {
                expected: width,
                found: h.len(),
            }),
            Some(h) => Ok(h),
            None => Ok(Self::gen_default_header(width)),
        }
    }

    // Callers guarantee equal lengths and a matching header.
    fn assemble_from_cols(header_row: Vec<String>, cols: Vec<Series>) -> DataFrame {
        let rows = transpose(&cols);
        DataFrame {
            header_row,
            cols,
            rows,
        }
    }

    fn assemble_from_rows(header_row: Vec<String>, rows: Vec<Series>) -> DataFrame {
        // Zero-width rows carry no cells.
        if header_row.is_empty() {
            return DataFrame {
                header_row,
                cols: Vec::new(),
                rows: Vec::new(),
            };
        }
        let cols = if rows.is_empty() {
            vec![Series::default(); header_row.len()]
        } else {
            transpose(&rows)
        };
        DataFrame {
            header_row,
            cols,
            rows,
        }
    }

    pub fn header(&self) -> &[String] {
        &self.header_row
    }

    pub fn columns(&self) -> &[Series] {
        &self.cols
    }

    pub fn rows(&self) -> &[Series] {
        &self.rows
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.cols.len()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.cols.first().map(Series::size).unwrap_or(0)
    }

    /// `(height, width)`
    pub fn shape(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    /// Number of cells.
    pub fn size(&self) -> usize {
        self.height() * self.width()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn irow(&self, row: usize) -> FrameResult<&Series> {
        self.rows.get(row).ok_or(FrameError::OutOfBounds {
            index: row,
            len: self.rows.len(),
        })
    }

    pub fn icol(&self, col: usize) -> FrameResult<&Series> {
        self.cols.get(col).ok_or(FrameError::OutOfBounds {
            index: col,
            len: self.cols.len(),
        })
    }

    pub fn loc_col(&self, col_name: &str) -> FrameResult<&Series> {
        self.header_row
            .iter()
            .position(|c| c == col_name)
            .map(|i| &self.cols[i])
            .ok_or_else(|| FrameError::ColumnNotFound(col_name.to_string()))
    }

    fn reduce<F>(&self, axis: Axis, f: F) -> DataFrame
    where
        F: Fn(&Series) -> f64 + Send + Sync,
    {
        let (series, header) = match axis {
            Axis::Columns => (&self.cols, self.header_row.clone()),
            Axis::Rows => (&self.rows, Self::gen_default_header(self.rows.len())),
        };
        let values: Vec<f64> = if series.len() < LOWER_PAR_BOUND {
            series.iter().map(&f).collect()
        } else {
            series.par_iter().map(&f).collect()
        };
        let cols = values.iter().map(|&v| Series::new(vec![v])).collect();
        // Nothing to reduce: no columns, so no rows either.
        let rows = if values.is_empty() {
            Vec::new()
        } else {
            vec![Series::new(values)]
        };
        DataFrame {
            header_row: header,
            cols,
            rows,
        }
    }

    fn map_cols<F>(&self, f: F) -> DataFrame
    where
        F: Fn(&Series) -> Series + Send + Sync,
    {
        let cols = self.cols.par_iter().map(f).collect();
        Self::assemble_from_cols(self.header_row.clone(), cols)
    }

    pub fn sum(&self, axis: Axis) -> DataFrame {
        self.reduce(axis, Series::sum)
    }

    pub fn prod(&self, axis: Axis) -> DataFrame {
        self.reduce(axis, Series::prod)
    }

    pub fn mean(&self, axis: Axis) -> DataFrame {
        self.reduce(axis, Series::mean)
    }

    pub fn median(&self, axis: Axis) -> DataFrame {
        self.reduce(axis, Series::median)
    }

    pub fn mode(&self, axis: Axis) -> DataFrame {
        self.reduce(axis, Series::mode)
    }

    pub fn var(&self, axis: Axis) -> DataFrame {
        self.reduce(axis, Series::var)
    }

    pub fn std(&self, axis: Axis) -> DataFrame {
        self.reduce(axis, Series::std)
    }

    pub fn min(&self, axis: Axis) -> DataFrame {
        self.reduce(axis, Series::min)
    }

    pub fn max(&self, axis: Axis) -> DataFrame {
        self.reduce(axis, Series::max)
    }

    /// Running totals down each column (`Columns`) or across each row (`Rows`).
    pub fn cumsum(&self, axis: Axis) -> DataFrame {
        match axis {
            Axis::Columns => self.map_cols(Series::cumsum),
            Axis::Rows => {
                let rows = self.rows.par_iter().map(Series::cumsum).collect();
                Self::assemble_from_rows(self.header_row.clone(), rows)
            }
        }
    }

    pub fn plus(&self, n: f64) -> DataFrame {
        self.map_cols(|s| s.plus(n))
    }

    pub fn sub(&self, n: f64) -> DataFrame {
        self.map_cols(|s| s.sub(n))
    }

    pub fn mult(&self, n: f64) -> DataFrame {
        self.map_cols(|s| s.mult(n))
    }

    pub fn div(&self, n: f64) -> DataFrame {
        self.map_cols(|s| s.div(n))
    }

    /// Drops every column (`Columns`) or row (`Rows`) holding a missing value.
    pub fn dropna(&self, axis: Axis) -> DataFrame {
        match axis {
            Axis::Columns => {
                let (header, cols): (Vec<String>, Vec<Series>) = self
                    .header_row
                    .par_iter()
                    .zip(self.cols.par_iter())
                    .filter(|(_, s)| !s.has_na())
                    .map(|(h, s)| (h.clone(), s.clone()))
                    .unzip();
                Self::assemble_from_cols(header, cols)
            }
            Axis::Rows => {
                let rows = self
                    .rows
                    .par_iter()
                    .filter(|s| !s.has_na())
                    .cloned()
                    .collect();
                Self::assemble_from_rows(self.header_row.clone(), rows)
            }
        }
    }

    /// Deep copy of header and data.
    pub fn copy(&self) -> DataFrame {
        DataFrame {
            header_row: self.header_row.clone(),
            cols: self.cols.par_iter().cloned().collect(),
            rows: self.rows.par_iter().cloned().collect(),
        }
    }

    /// First `n` rows.
    pub fn head(&self, n: usize) -> DataFrame {
        let end = n.min(self.rows.len());
        Self::assemble_from_rows(self.header_row.clone(), self.rows[..end].to_vec())
    }

    /// Last `n` rows.
    pub fn tail(&self, n: usize) -> DataFrame {
        let start = self.rows.len().saturating_sub(n);
        Self::assemble_from_rows(self.header_row.clone(), self.rows[start..].to_vec())
    }

    /// New frame with `column` inserted at position `pos`.
    pub fn insert_col(&self, pos: usize, column_name: &str, column: Series) -> FrameResult<DataFrame> {
        if pos > self.width() {
            return Err(FrameError::OutOfBounds {
                index: pos,
                len: self.width(),
            });
        }
        if self.width() > 0 && column.size() != self.height() {
            return Err(FrameError::LengthMismatch {
                expected: self.height(),
                found: column.size(),
            });
        }
        let mut cols = self.cols.clone();
        let mut header = self.header_row.clone();
        cols.insert(pos, column);
        header.insert(pos, column_name.to_string());
        Ok(Self::assemble_from_cols(header, cols))
    }

    pub fn to_hashmap(&self) -> HashMap<String, Vec<f64>> {
        self.header_row
            .iter()
            .cloned()
            .zip(self.cols.iter().map(Series::to_vec))
            .collect()
    }

    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> FrameResult<()> {
        io::write_csv(self, path)
    }

    fn display_indices(len: usize) -> Vec<Option<usize>> {
        if len < DISPLAY_TRUNCATE_AT {
            (0..len).map(Some).collect()
        } else {
            (0..DISPLAY_EDGE)
                .map(Some)
                .chain(std::iter::once(None))
                .chain((len - DISPLAY_EDGE..len).map(Some))
                .collect()
        }
    }
}

impl fmt::Display for DataFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let col_idx = Self::display_indices(self.width());
        let row_idx = Self::display_indices(self.rows.len());
        let ellipsis = || "...".to_string();

        let header: Vec<String> = col_idx
            .iter()
            .map(|c| c.map_or_else(ellipsis, |i| self.header_row[i].clone()))
            .collect();
        let body: Vec<Vec<String>> = row_idx
            .iter()
            .map(|r| match r {
                Some(r) => col_idx
                    .iter()
                    .map(|c| c.map_or_else(ellipsis, |i| self.rows[*r].values()[i].to_string()))
                    .collect(),
                None => vec![ellipsis(); col_idx.len()],
            })
            .collect();

        let widths: Vec<usize> = (0..col_idx.len())
            .map(|j| {
                std::iter::once(&header)
                    .chain(body.iter())
                    .map(|line| line[j].len())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let rule: String = widths
            .iter()
            .map(|w| format!("+{}", "-".repeat(w + 2)))
            .collect::<String>()
            + "+";

        writeln!(f, "{}", rule)?;
        write_line(f, &header, &widths)?;
        writeln!(f, "{}", rule)?;
        for line in &body {
            write_line(f, line, &widths)?;
        }
        write!(f, "{}", rule)
    }
}

fn write_line(f: &mut fmt::Formatter<'_>, line: &[String], widths: &[usize]) -> fmt::Result {
    for (cell, w) in line.iter().zip(widths) {
        write!(f, "| {:>w$} ", cell, w = w)?;
    }
    writeln!(f, "|")
}

impl PartialEq for DataFrame {
    fn eq(&self, other: &Self) -> bool {
        self.header_row == other.header_row && self.cols == other.cols
    }
}

impl Index<usize> for DataFrame {
    type Output = Series;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.rows[idx]
    }
}

macro_rules! from_vec_type {
    ($($type:ty),*) => {$(
        /// Single unnamed column.
        impl From<Vec<$type>> for DataFrame {
            fn from(data: Vec<$type>) -> Self {
                DataFrame::assemble_from_cols(
                    DataFrame::gen_default_header(1),
                    vec![Series::from(data)],
                )
            }
        }

        /// Rows; short rows are padded with NaN.
        impl From<Vec<Vec<$type>>> for DataFrame {
            fn from(data: Vec<Vec<$type>>) -> Self {
                let width = data.iter().map(Vec::len).max().unwrap_or(0);
                let rows = data
                    .iter()
                    .map(|r| {
                        let mut values: Vec<f64> = r.iter().map(|&x| x as f64).collect();
                        values.resize(width, f64::NAN);
                        Series::new(values)
                    })
                    .collect();
                DataFrame::assemble_from_rows(DataFrame::gen_default_header(width), rows)
            }
        }
    )*}
}

from_vec_type!(f64, f32, i8, i16, i32, i64, u8, u16, u32, u64);

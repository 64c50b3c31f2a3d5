//! One-dimensional numeric column.
//!
//! Missing values are stored as `NaN`. Reductions skip them; an input with no
//! valid values reduces to `NaN` (except `sum` and `prod`, which return their
//! identities).

use crate::errors::{FrameError, FrameResult};
use crate::scan::{self, LOWER_PAR_BOUND};
use rayon::prelude::*;
use std::fmt;
use std::ops::{Add, Range, RangeInclusive};

#[derive(Debug, Clone, Default)]
pub struct Series {
    data: Vec<f64>,
}

impl Series {
    pub fn new(data: Vec<f64>) -> Series {
        Series { data }
    }

    /// Number of elements, missing values included.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iloc(&self, idx: usize) -> Option<f64> {
        self.data.get(idx).copied()
    }

    pub fn values(&self) -> &[f64] {
        &self.data
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.data.clone()
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    fn is_par(&self) -> bool {
        self.size() >= LOWER_PAR_BOUND
    }

    fn map<F>(&self, f: F) -> Series
    where
        F: Fn(f64) -> f64 + Send + Sync,
    {
        if self.is_par() {
            Series::new(self.data.par_iter().map(|&x| f(x)).collect())
        } else {
            Series::new(self.data.iter().map(|&x| f(x)).collect())
        }
    }

    fn zip_with<F>(&self, other: &Series, f: F) -> FrameResult<Series>
    where
        F: Fn(f64, f64) -> f64 + Send + Sync,
    {
        if self.size() != other.size() {
            return Err(FrameError::LengthMismatch {
                expected: self.size(),
                found: other.size(),
            });
        }
        let data = if self.is_par() {
            self.data
                .par_iter()
                .zip(other.data.par_iter())
                .map(|(&a, &b)| f(a, b))
                .collect()
        } else {
            self.data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect()
        };
        Ok(Series::new(data))
    }

    /// New series without missing values.
    pub fn dropna(&self) -> Series {
        if self.is_par() {
            Series::new(self.data.par_iter().copied().filter(|x| !x.is_nan()).collect())
        } else {
            Series::new(self.data.iter().copied().filter(|x| !x.is_nan()).collect())
        }
    }

    /// 1.0 where a value is missing, 0.0 elsewhere.
    pub fn isna(&self) -> Series {
        self.map(|x| x.is_nan() as i32 as f64)
    }

    /// 1.0 where a value is present, 0.0 elsewhere.
    pub fn notna(&self) -> Series {
        self.map(|x| !x.is_nan() as i32 as f64)
    }

    pub fn has_na(&self) -> bool {
        self.any(f64::is_nan)
    }

    /// Whether any element satisfies `pred`.
    pub fn any<F>(&self, pred: F) -> bool
    where
        F: Fn(f64) -> bool + Send + Sync,
    {
        if self.is_par() {
            self.data.par_iter().any(|&x| pred(x))
        } else {
            self.data.iter().any(|&x| pred(x))
        }
    }

    /// Number of non-missing values.
    pub fn count(&self) -> usize {
        if self.is_par() {
            self.data.par_iter().filter(|x| !x.is_nan()).count()
        } else {
            self.data.iter().filter(|x| !x.is_nan()).count()
        }
    }

    pub fn sum(&self) -> f64 {
        if self.is_par() {
            self.data.par_iter().filter(|x| !x.is_nan()).sum()
        } else {
            self.data.iter().filter(|x| !x.is_nan()).sum()
        }
    }

    pub fn prod(&self) -> f64 {
        if self.is_par() {
            self.data.par_iter().filter(|x| !x.is_nan()).product()
        } else {
            self.data.iter().filter(|x| !x.is_nan()).product()
        }
    }

    pub fn mean(&self) -> f64 {
        let n = self.count();
        if n == 0 {
            return f64::NAN;
        }
        self.sum() / n as f64
    }

    /// Ascending copy with missing values dropped.
    pub fn sort(&self) -> Series {
        let mut sorted = self.dropna().data;
        if sorted.len() >= LOWER_PAR_BOUND {
            sorted.par_sort_unstable_by(f64::total_cmp);
        } else {
            sorted.sort_unstable_by(f64::total_cmp);
        }
        Series::new(sorted)
    }

    pub fn median(&self) -> f64 {
        let sorted = self.sort().data;
        let n = sorted.len();
        match n {
            0 => f64::NAN,
            _ if n % 2 == 1 => sorted[n / 2],
            _ => (sorted[n / 2 - 1] + sorted[n / 2]) * 0.5,
        }
    }

    /// Most frequent value; ties resolve to the smallest.
    pub fn mode(&self) -> f64 {
        let sorted = self.sort().data;
        let mut best = f64::NAN;
        let mut best_len = 0;
        let mut start = 0;
        while start < sorted.len() {
            let mut end = start + 1;
            while end < sorted.len() && sorted[end] == sorted[start] {
                end += 1;
            }
            if end - start > best_len {
                best_len = end - start;
                best = sorted[start];
            }
            start = end;
        }
        best
    }

    /// Sample variance (ddof = 1).
    pub fn var(&self) -> f64 {
        let valid = self.dropna();
        let n = valid.size();
        if n < 2 {
            return f64::NAN;
        }
        let mean = valid.sum() / n as f64;
        let sq: f64 = if valid.is_par() {
            valid.data.par_iter().map(|x| (x - mean).powi(2)).sum()
        } else {
            valid.data.iter().map(|x| (x - mean).powi(2)).sum()
        };
        sq / (n as f64 - 1.0)
    }

    pub fn std(&self) -> f64 {
        self.var().sqrt()
    }

    pub fn min(&self) -> f64 {
        let m = if self.is_par() {
            self.data
                .par_iter()
                .copied()
                .filter(|x| !x.is_nan())
                .reduce_with(f64::min)
        } else {
            self.data
                .iter()
                .copied()
                .filter(|x| !x.is_nan())
                .reduce(f64::min)
        };
        m.unwrap_or(f64::NAN)
    }

    pub fn max(&self) -> f64 {
        let m = if self.is_par() {
            self.data
                .par_iter()
                .copied()
                .filter(|x| !x.is_nan())
                .reduce_with(f64::max)
        } else {
            self.data
                .iter()
                .copied()
                .filter(|x| !x.is_nan())
                .reduce(f64::max)
        };
        m.unwrap_or(f64::NAN)
    }

    pub fn plus(&self, n: f64) -> Series {
        self.map(|x| x + n)
    }

    pub fn sub(&self, n: f64) -> Series {
        self.map(|x| x - n)
    }

    pub fn mult(&self, n: f64) -> Series {
        self.map(|x| x * n)
    }

    pub fn div(&self, n: f64) -> Series {
        self.map(|x| x / n)
    }

    /// Inclusive running total. Missing values contribute 0.
    pub fn cumsum(&self) -> Series {
        if self.is_empty() {
            return Series::default();
        }
        let filled: Vec<f64> = self
            .data
            .iter()
            .map(|&x| if x.is_nan() { 0.0 } else { x })
            .collect();
        let (mut pfs, total) = scan::prefix_sum(&filled);
        pfs.remove(0);
        pfs.push(total);
        Series::new(pfs)
    }

    pub fn join(&self, token: &str) -> String {
        let cells: Vec<String> = if self.is_par() {
            self.data.par_iter().map(|x| x.to_string()).collect()
        } else {
            self.data.iter().map(|x| x.to_string()).collect()
        };
        cells.join(token)
    }

    /// Elements in `start..end`, clamped to the series bounds.
    pub fn slice(&self, start: usize, end: usize) -> Series {
        let end = end.min(self.size());
        let start = start.min(end);
        Series::new(self.data[start..end].to_vec())
    }

    pub fn dot(&self, other: &Series) -> FrameResult<f64> {
        Ok(self.zip_with(other, |a, b| a * b)?.data.iter().sum())
    }

    pub fn vadd(&self, other: &Series) -> FrameResult<Series> {
        self.zip_with(other, |a, b| a + b)
    }

    pub fn vsub(&self, other: &Series) -> FrameResult<Series> {
        self.zip_with(other, |a, b| a - b)
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        let sq: f64 = if self.is_par() {
            self.data.par_iter().map(|x| x * x).sum()
        } else {
            self.data.iter().map(|x| x * x).sum()
        };
        sq.sqrt()
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.join(", "))
    }
}

/// Concatenation.
impl Add for Series {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        let mut data = self.data;
        data.extend(other.data);
        Self { data }
    }
}

impl PartialEq for Series {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl FromIterator<f64> for Series {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Series::new(iter.into_iter().collect())
    }
}

macro_rules! from_num_type {
    ($($type:ty),*) => {$(
        impl From<$type> for Series {
            fn from(val: $type) -> Self {
                Self { data: vec![val as f64] }
            }
        }

        impl From<Vec<$type>> for Series {
            fn from(val: Vec<$type>) -> Self {
                Self { data: val.into_iter().map(|x| x as f64).collect() }
            }
        }

        impl From<&Vec<$type>> for Series {
            fn from(val: &Vec<$type>) -> Self {
                Self { data: val.iter().map(|&x| x as f64).collect() }
            }
        }

        impl From<&[$type]> for Series {
            fn from(val: &[$type]) -> Self {
                Self { data: val.iter().map(|&x| x as f64).collect() }
            }
        }
    )*}
}

macro_rules! from_range_type {
    ($($type:ty),*) => {$(
        impl From<Range<$type>> for Series {
            fn from(val: Range<$type>) -> Self {
                Self { data: val.map(|x| x as f64).collect() }
            }
        }

        impl From<RangeInclusive<$type>> for Series {
            fn from(val: RangeInclusive<$type>) -> Self {
                Self { data: val.map(|x| x as f64).collect() }
            }
        }
    )*}
}

from_num_type!(f64, f32, i8, i16, i32, i64, u8, u16, u32, u64);
from_range_type!(i8, i16, i32, i64, u8, u16, u32, u64);

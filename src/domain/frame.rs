//! Time-indexed matrices: dates down the rows, instrument codes across the
//! columns.
//!
//! `TimeFrame` holds `f64` cells with `NaN` marking a missing observation;
//! `HoldFrame` is the boolean variant used for hold signals. Row dates are
//! strictly increasing with no duplicates.

use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, BTreeSet};

use super::error::VectraderError;

/// Numeric matrix keyed by date rows and instrument columns.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeFrame {
    dates: Vec<NaiveDate>,
    columns: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl TimeFrame {
    /// Build a frame from pre-assembled rows, validating the date invariant.
    pub fn new(
        dates: Vec<NaiveDate>,
        columns: Vec<String>,
        values: Vec<Vec<f64>>,
    ) -> Result<Self, VectraderError> {
        check_shape(&dates, columns.len(), values.len(), values.iter().map(Vec::len))?;
        Ok(Self {
            dates,
            columns,
            values,
        })
    }

    pub fn empty() -> Self {
        Self {
            dates: Vec::new(),
            columns: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Outer-join per-instrument series into one matrix, the way a column
    /// concat works: the row index is the sorted union of all observation
    /// dates, and instruments without an observation on a date get `NaN`.
    pub fn from_series(series: Vec<(String, Vec<(NaiveDate, f64)>)>) -> Self {
        if series.is_empty() {
            return Self::empty();
        }

        let maps: Vec<(String, BTreeMap<NaiveDate, f64>)> = series
            .into_iter()
            .map(|(code, obs)| (code, obs.into_iter().collect()))
            .collect();

        let dates: Vec<NaiveDate> = maps
            .iter()
            .flat_map(|(_, m)| m.keys().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let columns: Vec<String> = maps.iter().map(|(code, _)| code.clone()).collect();
        let values = dates
            .iter()
            .map(|date| {
                maps.iter()
                    .map(|(_, m)| m.get(date).copied().unwrap_or(f64::NAN))
                    .collect()
            })
            .collect();

        Self {
            dates,
            columns,
            values,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.columns.is_empty()
    }

    pub fn n_rows(&self) -> usize {
        self.dates.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row][col]
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Keep the named columns, in the given order. Names this frame does not
    /// carry are skipped.
    pub fn select_columns(&self, names: &[String]) -> Self {
        let picks: Vec<usize> = names
            .iter()
            .filter_map(|n| self.column_index(n))
            .collect();
        Self {
            dates: self.dates.clone(),
            columns: picks.iter().map(|&i| self.columns[i].clone()).collect(),
            values: self
                .values
                .iter()
                .map(|row| picks.iter().map(|&i| row[i]).collect())
                .collect(),
        }
    }

    /// Propagate the last seen value forward over missing cells, per column.
    /// Cells before a column's first observation stay missing.
    pub fn ffill(&self) -> Self {
        let mut out = self.clone();
        for col in 0..out.columns.len() {
            let mut last = f64::NAN;
            for row in 0..out.dates.len() {
                if out.values[row][col].is_nan() {
                    out.values[row][col] = last;
                } else {
                    last = out.values[row][col];
                }
            }
        }
        out
    }

    /// Shift all rows down by `periods`, filling the vacated top rows with
    /// missing values.
    pub fn shift(&self, periods: usize) -> Self {
        let values = (0..self.dates.len())
            .map(|row| {
                if row < periods {
                    vec![f64::NAN; self.columns.len()]
                } else {
                    self.values[row - periods].clone()
                }
            })
            .collect();
        Self {
            dates: self.dates.clone(),
            columns: self.columns.clone(),
            values,
        }
    }

    /// Row-over-row simple returns: `cur / prev - 1`. Missing neighbours
    /// yield missing; a zero previous value yields an infinity the caller is
    /// expected to sanitize.
    pub fn pct_change(&self) -> Self {
        let values = (0..self.dates.len())
            .map(|row| {
                (0..self.columns.len())
                    .map(|col| {
                        if row == 0 {
                            f64::NAN
                        } else {
                            self.values[row][col] / self.values[row - 1][col] - 1.0
                        }
                    })
                    .collect()
            })
            .collect();
        Self {
            dates: self.dates.clone(),
            columns: self.columns.clone(),
            values,
        }
    }

    /// Trailing simple moving average over `window` rows. A cell is defined
    /// once at least `min_periods` observations fall inside the window;
    /// missing observations are skipped, not zeroed.
    pub fn rolling_mean(&self, window: usize, min_periods: usize) -> Self {
        let min_periods = min_periods.max(1);
        let values = (0..self.dates.len())
            .map(|row| {
                let lo = (row + 1).saturating_sub(window);
                (0..self.columns.len())
                    .map(|col| {
                        let mut sum = 0.0;
                        let mut count = 0usize;
                        for r in lo..=row {
                            let v = self.values[r][col];
                            if !v.is_nan() {
                                sum += v;
                                count += 1;
                            }
                        }
                        if count >= min_periods {
                            sum / count as f64
                        } else {
                            f64::NAN
                        }
                    })
                    .collect()
            })
            .collect();
        Self {
            dates: self.dates.clone(),
            columns: self.columns.clone(),
            values,
        }
    }

    /// Downsample to one row per calendar month, labelled with the month-end
    /// date and carrying the last observation of each instrument in that
    /// month.
    pub fn resample_month_end(&self) -> Self {
        let mut groups: BTreeMap<(i32, u32), Vec<usize>> = BTreeMap::new();
        for (row, date) in self.dates.iter().enumerate() {
            groups.entry((date.year(), date.month())).or_default().push(row);
        }

        let mut dates = Vec::with_capacity(groups.len());
        let mut values = Vec::with_capacity(groups.len());
        for ((year, month), rows) in groups {
            dates.push(month_end(year, month));
            let row = (0..self.columns.len())
                .map(|col| {
                    rows.iter()
                        .rev()
                        .map(|&r| self.values[r][col])
                        .find(|v| !v.is_nan())
                        .unwrap_or(f64::NAN)
                })
                .collect();
            values.push(row);
        }

        Self {
            dates,
            columns: self.columns.clone(),
            values,
        }
    }

    /// Project this frame onto a new date index, forward-filling from the
    /// most recent row at or before each target date. Targets before the
    /// first row get missing values.
    pub fn reindex_ffill(&self, dates: &[NaiveDate]) -> Self {
        let mut src = 0usize;
        let mut values = Vec::with_capacity(dates.len());
        for &target in dates {
            while src < self.dates.len() && self.dates[src] <= target {
                src += 1;
            }
            if src == 0 {
                values.push(vec![f64::NAN; self.columns.len()]);
            } else {
                values.push(self.values[src - 1].clone());
            }
        }
        Self {
            dates: dates.to_vec(),
            columns: self.columns.clone(),
            values,
        }
    }

    /// Drop rows dated before `start`.
    pub fn trim_before(&self, start: NaiveDate) -> Self {
        let keep = self.dates.iter().position(|&d| d >= start).unwrap_or(self.dates.len());
        Self {
            dates: self.dates[keep..].to_vec(),
            columns: self.columns.clone(),
            values: self.values[keep..].to_vec(),
        }
    }

    /// Elementwise strict `self > other`; comparisons against a missing cell
    /// are false. Both frames must share dimensions.
    pub fn gt(&self, other: &TimeFrame) -> HoldFrame {
        debug_assert_eq!(self.dates, other.dates);
        debug_assert_eq!(self.columns, other.columns);
        let values = (0..self.dates.len())
            .map(|row| {
                (0..self.columns.len())
                    .map(|col| self.values[row][col] > other.values[row][col])
                    .collect()
            })
            .collect();
        HoldFrame {
            dates: self.dates.clone(),
            columns: self.columns.clone(),
            values,
        }
    }
}

/// Boolean matrix marking which instruments are held on which dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldFrame {
    dates: Vec<NaiveDate>,
    columns: Vec<String>,
    values: Vec<Vec<bool>>,
}

impl HoldFrame {
    pub fn new(
        dates: Vec<NaiveDate>,
        columns: Vec<String>,
        values: Vec<Vec<bool>>,
    ) -> Result<Self, VectraderError> {
        check_shape(&dates, columns.len(), values.len(), values.iter().map(Vec::len))?;
        Ok(Self {
            dates,
            columns,
            values,
        })
    }

    pub fn empty() -> Self {
        Self {
            dates: Vec::new(),
            columns: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.columns.is_empty()
    }

    pub fn n_rows(&self) -> usize {
        self.dates.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        self.values[row][col]
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn select_columns(&self, names: &[String]) -> Self {
        let picks: Vec<usize> = names
            .iter()
            .filter_map(|n| self.column_index(n))
            .collect();
        Self {
            dates: self.dates.clone(),
            columns: picks.iter().map(|&i| self.columns[i].clone()).collect(),
            values: self
                .values
                .iter()
                .map(|row| picks.iter().map(|&i| row[i]).collect())
                .collect(),
        }
    }

    /// Project onto a new date index, forward-filling the most recent
    /// decision. Targets before the first row resolve to not-held, never
    /// undefined.
    pub fn reindex_ffill(&self, dates: &[NaiveDate]) -> Self {
        let mut src = 0usize;
        let mut values = Vec::with_capacity(dates.len());
        for &target in dates {
            while src < self.dates.len() && self.dates[src] <= target {
                src += 1;
            }
            if src == 0 {
                values.push(vec![false; self.columns.len()]);
            } else {
                values.push(self.values[src - 1].clone());
            }
        }
        Self {
            dates: dates.to_vec(),
            columns: self.columns.clone(),
            values,
        }
    }

    pub fn trim_before(&self, start: NaiveDate) -> Self {
        let keep = self.dates.iter().position(|&d| d >= start).unwrap_or(self.dates.len());
        Self {
            dates: self.dates[keep..].to_vec(),
            columns: self.columns.clone(),
            values: self.values[keep..].to_vec(),
        }
    }
}

/// Last calendar day of the given month.
pub fn month_end(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

fn check_shape(
    dates: &[NaiveDate],
    n_cols: usize,
    n_value_rows: usize,
    row_lens: impl Iterator<Item = usize>,
) -> Result<(), VectraderError> {
    if n_value_rows != dates.len() {
        return Err(VectraderError::MalformedFrame {
            reason: format!("{} value rows for {} dates", n_value_rows, dates.len()),
        });
    }
    for (i, len) in row_lens.enumerate() {
        if len != n_cols {
            return Err(VectraderError::MalformedFrame {
                reason: format!("row {} has {} cells for {} columns", i, len, n_cols),
            });
        }
    }
    if let Some(w) = dates.windows(2).find(|w| w[0] >= w[1]) {
        return Err(VectraderError::MalformedFrame {
            reason: format!("dates not strictly increasing at {}", w[1]),
        });
    }
    Ok(())
}

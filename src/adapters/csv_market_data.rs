//! CSV file market data adapter.
//!
//! Reads wide matrix files from a data directory: `prices.csv`,
//! `revenues.csv` and `dividend_yields.csv`, each with a leading `date`
//! column (ISO format) and one column per instrument code. Blank cells mark
//! missing observations.

use crate::domain::error::VectraderError;
use crate::domain::frame::TimeFrame;
use crate::ports::data_port::MarketDataPort;
use chrono::NaiveDate;
use std::path::PathBuf;

pub const PRICES_FILE: &str = "prices.csv";
pub const REVENUES_FILE: &str = "revenues.csv";
pub const DIVIDEND_YIELDS_FILE: &str = "dividend_yields.csv";

pub struct CsvMarketData {
    base_path: PathBuf,
}

impl CsvMarketData {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn load_matrix(
        &self,
        file: &str,
        universe: &[String],
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<TimeFrame, VectraderError> {
        let path = self.base_path.join(file);
        let mut rdr = csv::Reader::from_path(&path).map_err(|e| VectraderError::DataLoad {
            reason: format!("failed to open {}: {}", path.display(), e),
        })?;

        let headers = rdr
            .headers()
            .map_err(|e| VectraderError::DataLoad {
                reason: format!("{}: {}", path.display(), e),
            })?
            .clone();

        // column 0 is the date; keep instrument columns the universe names
        let picks: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, name)| universe.iter().any(|code| code == name))
            .map(|(i, name)| (i, name.to_string()))
            .collect();
        if picks.is_empty() {
            return Ok(TimeFrame::empty());
        }

        let mut rows: Vec<(NaiveDate, Vec<f64>)> = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| VectraderError::DataLoad {
                reason: format!("{}: {}", path.display(), e),
            })?;

            let date_str = record.get(0).ok_or_else(|| VectraderError::DataLoad {
                reason: format!("{}: missing date column", path.display()),
            })?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
                VectraderError::DataLoad {
                    reason: format!("{}: invalid date {:?}: {}", path.display(), date_str, e),
                }
            })?;

            if date < start || end.is_some_and(|e| date > e) {
                continue;
            }

            let mut cells = Vec::with_capacity(picks.len());
            for (i, name) in &picks {
                let raw = record.get(*i).unwrap_or("").trim();
                let value = if raw.is_empty() {
                    f64::NAN
                } else {
                    raw.parse().map_err(|e| VectraderError::DataLoad {
                        reason: format!(
                            "{}: invalid value {:?} for {} on {}: {}",
                            path.display(),
                            raw,
                            name,
                            date,
                            e
                        ),
                    })?
                };
                cells.push(value);
            }
            rows.push((date, cells));
        }

        if rows.is_empty() {
            return Ok(TimeFrame::empty());
        }

        rows.sort_by_key(|(date, _)| *date);
        let (dates, values): (Vec<_>, Vec<_>) = rows.into_iter().unzip();
        TimeFrame::new(dates, picks.into_iter().map(|(_, name)| name).collect(), values)
    }
}

impl MarketDataPort for CsvMarketData {
    fn fetch_prices(
        &self,
        universe: &[String],
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<TimeFrame, VectraderError> {
        self.load_matrix(PRICES_FILE, universe, start, end)
    }

    fn fetch_revenues(
        &self,
        universe: &[String],
        start: NaiveDate,
    ) -> Result<TimeFrame, VectraderError> {
        self.load_matrix(REVENUES_FILE, universe, start, None)
    }

    fn fetch_dividend_yields(
        &self,
        universe: &[String],
        start: NaiveDate,
    ) -> Result<TimeFrame, VectraderError> {
        self.load_matrix(DIVIDEND_YIELDS_FILE, universe, start, None)
    }
}

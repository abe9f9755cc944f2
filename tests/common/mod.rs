#![allow(dead_code)]

use chrono::NaiveDate;
use vectrader::domain::error::VectraderError;
use vectrader::domain::frame::{HoldFrame, TimeFrame};
use vectrader::ports::data_port::MarketDataPort;

/// In-memory market data port with canned matrices.
pub struct MockMarketData {
    pub prices: TimeFrame,
    pub revenues: TimeFrame,
    pub yields: TimeFrame,
    pub error: Option<String>,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self {
            prices: TimeFrame::empty(),
            revenues: TimeFrame::empty(),
            yields: TimeFrame::empty(),
            error: None,
        }
    }

    pub fn with_prices(mut self, frame: TimeFrame) -> Self {
        self.prices = frame;
        self
    }

    pub fn with_revenues(mut self, frame: TimeFrame) -> Self {
        self.revenues = frame;
        self
    }

    pub fn with_yields(mut self, frame: TimeFrame) -> Self {
        self.yields = frame;
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }

    fn serve(&self, frame: &TimeFrame, start: NaiveDate) -> Result<TimeFrame, VectraderError> {
        if let Some(reason) = &self.error {
            return Err(VectraderError::DataLoad {
                reason: reason.clone(),
            });
        }
        Ok(frame.trim_before(start))
    }
}

impl MarketDataPort for MockMarketData {
    fn fetch_prices(
        &self,
        _universe: &[String],
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<TimeFrame, VectraderError> {
        let frame = self.serve(&self.prices, start)?;
        Ok(match end {
            None => frame,
            Some(end) => clamp_end(&frame, end),
        })
    }

    fn fetch_revenues(
        &self,
        _universe: &[String],
        start: NaiveDate,
    ) -> Result<TimeFrame, VectraderError> {
        self.serve(&self.revenues, start)
    }

    fn fetch_dividend_yields(
        &self,
        _universe: &[String],
        start: NaiveDate,
    ) -> Result<TimeFrame, VectraderError> {
        self.serve(&self.yields, start)
    }
}

/// Drop rows dated after `end`.
pub fn clamp_end(frame: &TimeFrame, end: NaiveDate) -> TimeFrame {
    let keep: Vec<usize> = frame
        .dates()
        .iter()
        .enumerate()
        .filter(|(_, d)| **d <= end)
        .map(|(i, _)| i)
        .collect();
    let dates = keep.iter().map(|&i| frame.dates()[i]).collect();
    let values = keep
        .iter()
        .map(|&i| (0..frame.n_cols()).map(|c| frame.get(i, c)).collect())
        .collect();
    TimeFrame::new(dates, frame.columns().to_vec(), values).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn codes(list: &[&str]) -> Vec<String> {
    list.iter().map(|c| c.to_string()).collect()
}

/// Daily price frame starting at `start`, one row per consecutive day.
pub fn price_frame(start: NaiveDate, columns: &[&str], rows: Vec<Vec<f64>>) -> TimeFrame {
    let dates = (0..rows.len())
        .map(|i| start + chrono::Duration::days(i as i64))
        .collect();
    TimeFrame::new(dates, codes(columns), rows).unwrap()
}

/// Daily hold frame starting at `start`, one row per consecutive day.
pub fn hold_frame(start: NaiveDate, columns: &[&str], rows: Vec<Vec<bool>>) -> HoldFrame {
    let dates = (0..rows.len())
        .map(|i| start + chrono::Duration::days(i as i64))
        .collect();
    HoldFrame::new(dates, codes(columns), rows).unwrap()
}

/// Monthly frame labelled on consecutive month-ends of 2024.
pub fn monthly_frame(columns: &[&str], rows: Vec<Vec<f64>>) -> TimeFrame {
    let dates = (0..rows.len())
        .map(|i| vectrader::domain::frame::month_end(2024, i as u32 + 1))
        .collect();
    TimeFrame::new(dates, codes(columns), rows).unwrap()
}

//! Market data access port trait.
//!
//! The remote data source (with its rate limiting and retries) lives behind
//! this boundary; the core only ever sees fully materialized matrices. A
//! source with nothing usable returns an empty frame, not an error.

use crate::domain::error::VectraderError;
use crate::domain::frame::TimeFrame;
use chrono::NaiveDate;

pub trait MarketDataPort {
    /// Daily close prices from `start`, optionally clamped to `end`
    /// (inclusive), one column per instrument.
    fn fetch_prices(
        &self,
        universe: &[String],
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<TimeFrame, VectraderError>;

    /// Monthly revenue from `start`, one column per instrument.
    fn fetch_revenues(
        &self,
        universe: &[String],
        start: NaiveDate,
    ) -> Result<TimeFrame, VectraderError>;

    /// Daily dividend yield from `start`, one column per instrument.
    fn fetch_dividend_yields(
        &self,
        universe: &[String],
        start: NaiveDate,
    ) -> Result<TimeFrame, VectraderError>;
}

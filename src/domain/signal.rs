//! Signal Builder: turns raw price/revenue/dividend-yield matrices into a
//! boolean hold-matrix for one strategy.
//!
//! Builders fetch through the data port, compute at the source frequency
//! (monthly for revenue- and rank-derived signals) and trim back to the
//! requested start after any cold-start prefetch. An empty upstream fetch
//! yields an empty hold-matrix; unknown strategies cannot reach this layer
//! because [`StrategyConfig`] is a closed enum.

use std::cmp::Ordering;

use chrono::{Days, NaiveDate};

use crate::domain::error::VectraderError;
use crate::domain::frame::{HoldFrame, TimeFrame};
use crate::domain::strategy::StrategyConfig;
use crate::ports::data_port::MarketDataPort;

/// Trading days assumed per calendar month for momentum lookbacks.
const TRADING_DAYS_PER_MONTH: usize = 21;

/// Extra calendar days fetched ahead of the momentum lookback window.
const MOMENTUM_FETCH_SLACK_DAYS: usize = 10;

/// Calendar days of history prefetched for the dividend-yield resample.
const DIVIDEND_FETCH_LEAD_DAYS: u64 = 60;

pub fn build_signal(
    data: &dyn MarketDataPort,
    universe: &[String],
    start: NaiveDate,
    config: &StrategyConfig,
) -> Result<HoldFrame, VectraderError> {
    match *config {
        StrategyConfig::RevenueGrowth { months } => revenue_growth(data, universe, start, months),
        StrategyConfig::PriceBreakout { ma_days } => price_breakout(data, universe, start, ma_days),
        StrategyConfig::HighDividend { top_pct } => high_dividend(data, universe, start, top_pct),
        StrategyConfig::Momentum {
            lookback_months,
            top_pct,
        } => momentum(data, universe, start, lookback_months, top_pct),
    }
}

/// True where monthly revenue rose strictly for each of the last `months`
/// month-over-month comparisons: `rev[t] > rev[t-1] > … > rev[t-months]`.
/// Comparisons falling off the front of the history, or touching a missing
/// observation, resolve to false.
fn revenue_growth(
    data: &dyn MarketDataPort,
    universe: &[String],
    start: NaiveDate,
    months: usize,
) -> Result<HoldFrame, VectraderError> {
    let rev = data.fetch_revenues(universe, start)?;
    if rev.is_empty() {
        return Ok(HoldFrame::empty());
    }

    let months = months.max(1);
    let values = (0..rev.n_rows())
        .map(|t| {
            (0..rev.n_cols())
                .map(|c| {
                    (0..months).all(|i| {
                        t > i && {
                            let newer = rev.get(t - i, c);
                            let older = rev.get(t - i - 1, c);
                            newer > older
                        }
                    })
                })
                .collect()
        })
        .collect();

    HoldFrame::new(rev.dates().to_vec(), rev.columns().to_vec(), values)
}

/// True where close sits strictly above its `ma_days` simple moving average
/// (minimum periods `ma_days / 2`). Prices are fetched `2 * ma_days`
/// calendar days early so the average is warm by the requested start, then
/// the output is trimmed back.
fn price_breakout(
    data: &dyn MarketDataPort,
    universe: &[String],
    start: NaiveDate,
    ma_days: usize,
) -> Result<HoldFrame, VectraderError> {
    let ma_days = ma_days.max(1);
    let early = days_before(start, 2 * ma_days as u64);
    let prices = data.fetch_prices(universe, early, None)?;
    if prices.is_empty() {
        return Ok(HoldFrame::empty());
    }

    let ma = prices.rolling_mean(ma_days, ma_days / 2);
    Ok(prices.gt(&ma).trim_before(start))
}

/// Each month-end, hold the top `top_pct` fraction of the universe by
/// dividend yield, forward-filled to daily frequency.
fn high_dividend(
    data: &dyn MarketDataPort,
    universe: &[String],
    start: NaiveDate,
    top_pct: f64,
) -> Result<HoldFrame, VectraderError> {
    let early = days_before(start, DIVIDEND_FETCH_LEAD_DAYS);
    let yields = data.fetch_dividend_yields(universe, early)?;
    if yields.is_empty() {
        return Ok(HoldFrame::empty());
    }

    let monthly = yields.resample_month_end();
    let picks = top_fraction(&monthly, top_pct)?;
    Ok(picks.reindex_ffill(yields.dates()).trim_before(start))
}

/// Each month-end, hold the top `top_pct` fraction by trailing return over
/// `lookback_months * 21` trading days, forward-filled to daily frequency.
fn momentum(
    data: &dyn MarketDataPort,
    universe: &[String],
    start: NaiveDate,
    lookback_months: usize,
    top_pct: f64,
) -> Result<HoldFrame, VectraderError> {
    let lookback_days = lookback_months.max(1) * TRADING_DAYS_PER_MONTH;
    let early = days_before(start, (lookback_days + MOMENTUM_FETCH_SLACK_DAYS) as u64);
    let prices = data.fetch_prices(universe, early, None)?;
    if prices.is_empty() {
        return Ok(HoldFrame::empty());
    }

    let trailing = trailing_return(&prices, lookback_days)?;
    let monthly = trailing.resample_month_end();
    let picks = top_fraction(&monthly, top_pct)?;
    Ok(picks.reindex_ffill(prices.dates()).trim_before(start))
}

/// `price[t] / price[t - lookback] - 1`, missing until the lookback row
/// exists.
fn trailing_return(prices: &TimeFrame, lookback: usize) -> Result<TimeFrame, VectraderError> {
    let base = prices.shift(lookback);
    let values = (0..prices.n_rows())
        .map(|t| {
            (0..prices.n_cols())
                .map(|c| prices.get(t, c) / base.get(t, c) - 1.0)
                .collect()
        })
        .collect();
    TimeFrame::new(prices.dates().to_vec(), prices.columns().to_vec(), values)
}

/// Cross-sectional selection: per row, mark the top `max(1, ceil(top_pct *
/// column_count))` values. The cutoff is the smallest value among those, and
/// every instrument at or above it is included, so ties at the cutoff can
/// push the selection past the nominal count. Rows with no observations
/// select nothing.
fn top_fraction(frame: &TimeFrame, top_pct: f64) -> Result<HoldFrame, VectraderError> {
    let n_pick = ((top_pct * frame.n_cols() as f64).ceil() as usize).max(1);

    let values = (0..frame.n_rows())
        .map(|row| {
            let mut present: Vec<f64> = (0..frame.n_cols())
                .map(|col| frame.get(row, col))
                .filter(|v| !v.is_nan())
                .collect();
            if present.is_empty() {
                return vec![false; frame.n_cols()];
            }
            present.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));
            let cutoff = present[n_pick.min(present.len()) - 1];
            (0..frame.n_cols())
                .map(|col| frame.get(row, col) >= cutoff)
                .collect()
        })
        .collect();

    HoldFrame::new(frame.dates().to_vec(), frame.columns().to_vec(), values)
}

fn days_before(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}

//! Vectorized portfolio simulator.
//!
//! Turns a hold-matrix plus a close-price matrix into a net daily return
//! series and equity curve. Everything is a pure function of its inputs:
//! no state survives between calls, so identical inputs give bit-identical
//! outputs and independent backtests can run in parallel over aliased
//! matrices.

use chrono::NaiveDate;

use super::error::VectraderError;
use super::frame::{HoldFrame, TimeFrame};

/// Simulation parameters.
///
/// `stop_loss` and `take_profit` are reserved for a future per-position
/// exit rule; they are accepted and validated but not applied to the return
/// computation.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub stop_loss: f64,
    pub take_profit: f64,
    /// One-sided brokerage fee as a fraction of traded value.
    pub fee_ratio: f64,
    /// Sell-side transaction tax as a fraction of traded value.
    pub tax_ratio: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            stop_loss: 0.10,
            take_profit: 0.20,
            fee_ratio: 0.001425,
            tax_ratio: 0.003,
        }
    }
}

/// Simulator output: one row per trading date of the price matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub dates: Vec<NaiveDate>,
    /// Net simple daily returns, after transaction costs.
    pub daily_returns: Vec<f64>,
    /// Running product of `1 + daily_return`, anchored at the first date.
    pub cumulative: Vec<f64>,
    /// Equal-weight allocation per date, row sums are 1 or 0.
    pub weights: TimeFrame,
    /// Count of instruments held per date.
    pub n_stocks_held: Vec<usize>,
}

/// Run an equal-weight vectorized backtest.
///
/// The signal matrix may sit at a lower frequency than prices; it is
/// forward-filled onto the price dates, with dates before the first signal
/// row resolving to not-held. Today's return always uses yesterday's
/// allocation, so a signal flip affects the portfolio one day later.
///
/// Fails only when the two matrices share no instrument columns.
pub fn run_backtest(
    signal: &HoldFrame,
    prices: &TimeFrame,
    config: &BacktestConfig,
) -> Result<BacktestResult, VectraderError> {
    let common: Vec<String> = signal
        .columns()
        .iter()
        .filter(|c| prices.column_index(c.as_str()).is_some())
        .cloned()
        .collect();
    if common.is_empty() {
        return Err(VectraderError::NoCommonInstruments);
    }

    let px = prices.select_columns(&common).ffill();
    let sig = signal.select_columns(&common).reindex_ffill(px.dates());

    let n_rows = px.n_rows();
    let n_cols = px.n_cols();

    // Equal weights; a zero-holding row is all zeros, not a division result.
    let mut weights = vec![vec![0.0; n_cols]; n_rows];
    let mut n_held = vec![0usize; n_rows];
    for t in 0..n_rows {
        let count = (0..n_cols).filter(|&c| sig.get(t, c)).count();
        n_held[t] = count;
        if count > 0 {
            let w = 1.0 / count as f64;
            for c in 0..n_cols {
                if sig.get(t, c) {
                    weights[t][c] = w;
                }
            }
        }
    }

    // Per-instrument simple returns; halted or unpriced days contribute zero.
    let pct = px.pct_change();
    let mut inst_log_ret = vec![vec![0.0; n_cols]; n_rows];
    for t in 0..n_rows {
        for c in 0..n_cols {
            let r = pct.get(t, c);
            let r = if r.is_finite() { r } else { 0.0 };
            inst_log_ret[t][c] = r.ln_1p();
        }
    }

    // Aggregate in log space under lagged weights, then expm1 back to the
    // simple-return domain.
    let mut daily_returns = Vec::with_capacity(n_rows);
    let mut cumulative = Vec::with_capacity(n_rows);
    let mut equity = 1.0;
    for t in 0..n_rows {
        let mut port_log = 0.0;
        if t > 0 {
            for c in 0..n_cols {
                let w = weights[t - 1][c];
                if w != 0.0 {
                    port_log += w * inst_log_ret[t][c];
                }
            }
        }
        let gross = port_log.exp_m1();

        let mut turnover = 0.0;
        for c in 0..n_cols {
            let prev = if t > 0 { weights[t - 1][c] } else { 0.0 };
            turnover += (weights[t][c] - prev).abs();
        }
        let cost = turnover * (config.fee_ratio + config.tax_ratio / 2.0);

        let net = gross - cost;
        equity *= 1.0 + net;
        daily_returns.push(net);
        cumulative.push(equity);
    }

    let weights = TimeFrame::new(px.dates().to_vec(), common, weights)?;

    Ok(BacktestResult {
        dates: px.dates().to_vec(),
        daily_returns,
        cumulative,
        weights,
        n_stocks_held: n_held,
    })
}

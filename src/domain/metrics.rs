//! Performance metrics over a simulated return series.

use serde::Serialize;

use super::backtest::BacktestResult;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Scalar performance statistics, recomputed from scratch on every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub total_return: f64,
    pub annualized_return: f64,
    pub sharpe_ratio: f64,
    /// Non-positive peak-to-trough decline of the equity curve.
    pub max_drawdown: f64,
    /// Fraction of daily returns strictly above zero.
    pub win_rate: f64,
    /// Count of valid daily return observations.
    pub trading_days: usize,
}

impl Metrics {
    /// Compute the metrics record; `None` when fewer than 2 return
    /// observations exist.
    pub fn compute(result: &BacktestResult) -> Option<Self> {
        let returns = &result.daily_returns;
        let n_days = returns.len();
        if n_days < 2 {
            return None;
        }

        let total_return = result.cumulative.last().copied().unwrap_or(1.0) - 1.0;
        let annualized_return =
            (1.0 + total_return).powf(TRADING_DAYS_PER_YEAR / n_days as f64) - 1.0;

        let mean = returns.iter().sum::<f64>() / n_days as f64;
        let std = sample_std(returns, mean);
        let sharpe_ratio = if std > 0.0 {
            mean * TRADING_DAYS_PER_YEAR / (std * TRADING_DAYS_PER_YEAR.sqrt())
        } else {
            0.0
        };

        let max_drawdown = compute_max_drawdown(&result.cumulative);
        let win_rate = returns.iter().filter(|r| **r > 0.0).count() as f64 / n_days as f64;

        Some(Metrics {
            total_return,
            annualized_return,
            sharpe_ratio,
            max_drawdown,
            win_rate,
            trading_days: n_days,
        })
    }
}

/// Sample standard deviation (n-1 divisor).
fn sample_std(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Minimum of `(equity - running_max) / running_max` over the curve.
fn compute_max_drawdown(cumulative: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0f64;
    for &equity in cumulative {
        if equity > peak {
            peak = equity;
        }
        let dd = (equity - peak) / peak;
        if dd < max_dd {
            max_dd = dd;
        }
    }
    max_dd
}

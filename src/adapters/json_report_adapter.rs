//! JSON report adapter implementing ReportPort.

use std::fs;

use serde::Serialize;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::VectraderError;
use crate::domain::metrics::Metrics;
use crate::domain::strategy::StrategyConfig;
use crate::ports::report_port::ReportPort;

#[derive(Serialize)]
struct ReportDocument<'a> {
    #[serde(flatten)]
    strategy: &'a StrategyConfig,
    metrics: &'a Metrics,
    series: Vec<SeriesRow>,
}

#[derive(Serialize)]
struct SeriesRow {
    date: String,
    daily_return: f64,
    equity: f64,
    n_stocks_held: usize,
}

pub struct JsonReportAdapter;

impl JsonReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for JsonReportAdapter {
    fn write(
        &self,
        result: &BacktestResult,
        metrics: &Metrics,
        strategy: &StrategyConfig,
        output_path: &str,
    ) -> Result<(), VectraderError> {
        let series = result
            .dates
            .iter()
            .enumerate()
            .map(|(i, date)| SeriesRow {
                date: date.format("%Y-%m-%d").to_string(),
                daily_return: result.daily_returns[i],
                equity: result.cumulative[i],
                n_stocks_held: result.n_stocks_held[i],
            })
            .collect();

        let document = ReportDocument {
            strategy,
            metrics,
            series,
        };

        let json =
            serde_json::to_string_pretty(&document).map_err(|e| VectraderError::Report {
                reason: format!("failed to serialize report: {}", e),
            })?;
        fs::write(output_path, json).map_err(|e| VectraderError::Report {
            reason: format!("failed to write {}: {}", output_path, e),
        })
    }
}

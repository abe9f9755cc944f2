//! Report generation port trait.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::VectraderError;
use crate::domain::metrics::Metrics;
use crate::domain::strategy::StrategyConfig;

/// Port for writing backtest reports. The core computes; rendering and file
/// formats live behind this boundary.
pub trait ReportPort {
    fn write(
        &self,
        result: &BacktestResult,
        metrics: &Metrics,
        strategy: &StrategyConfig,
        output_path: &str,
    ) -> Result<(), VectraderError>;
}

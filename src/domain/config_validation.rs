//! Typed extraction and validation of run configuration.
//!
//! Converts a [`ConfigPort`] into the typed settings the engine consumes,
//! checking ranges as it goes. Only recognized keys are read, so unknown
//! keys in a config file are ignored; missing keys fall back to the
//! documented defaults.

use crate::domain::backtest::BacktestConfig;
use crate::domain::error::VectraderError;
use crate::domain::strategy::{
    StrategyConfig, StrategyId, DEFAULT_LOOKBACK_MONTHS, DEFAULT_MA_DAYS, DEFAULT_MONTHS,
    DEFAULT_TOP_PCT,
};
use crate::domain::universe::{default_universe, parse_codes};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

/// Run-level settings: where the data lives, what to trade, and when from.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub data_path: String,
    pub universe: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

pub fn build_run_config(config: &dyn ConfigPort) -> Result<RunConfig, VectraderError> {
    let data_path = match config.get_string("data", "path") {
        Some(p) if !p.trim().is_empty() => p.trim().to_string(),
        _ => {
            return Err(VectraderError::ConfigMissing {
                section: "data".to_string(),
                key: "path".to_string(),
            })
        }
    };

    let start_date = match config.get_string("backtest", "start_date") {
        None => {
            return Err(VectraderError::ConfigMissing {
                section: "backtest".to_string(),
                key: "start_date".to_string(),
            })
        }
        Some(_) => config
            .get_date("backtest", "start_date")
            .ok_or_else(|| VectraderError::ConfigInvalid {
                section: "backtest".to_string(),
                key: "start_date".to_string(),
                reason: "invalid date format, expected YYYY-MM-DD".to_string(),
            })?,
    };

    let end_date = match config.get_string("backtest", "end_date") {
        None => None,
        Some(_) => Some(config.get_date("backtest", "end_date").ok_or_else(|| {
            VectraderError::ConfigInvalid {
                section: "backtest".to_string(),
                key: "end_date".to_string(),
                reason: "invalid date format, expected YYYY-MM-DD".to_string(),
            }
        })?),
    };

    if let Some(end) = end_date {
        if start_date >= end {
            return Err(VectraderError::ConfigInvalid {
                section: "backtest".to_string(),
                key: "start_date".to_string(),
                reason: "start_date must be before end_date".to_string(),
            });
        }
    }

    let universe = match config.get_string("backtest", "codes") {
        Some(list) if !list.trim().is_empty() => parse_codes(&list)?,
        _ => default_universe(),
    };

    Ok(RunConfig {
        data_path,
        universe,
        start_date,
        end_date,
    })
}

pub fn build_backtest_config(config: &dyn ConfigPort) -> Result<BacktestConfig, VectraderError> {
    let defaults = BacktestConfig::default();
    let built = BacktestConfig {
        stop_loss: config.get_double("backtest", "stop_loss", defaults.stop_loss),
        take_profit: config.get_double("backtest", "take_profit", defaults.take_profit),
        fee_ratio: config.get_double("backtest", "fee_ratio", defaults.fee_ratio),
        tax_ratio: config.get_double("backtest", "tax_ratio", defaults.tax_ratio),
    };

    for (key, value) in [
        ("stop_loss", built.stop_loss),
        ("take_profit", built.take_profit),
        ("fee_ratio", built.fee_ratio),
        ("tax_ratio", built.tax_ratio),
    ] {
        if !(value >= 0.0) {
            return Err(VectraderError::ConfigInvalid {
                section: "backtest".to_string(),
                key: key.to_string(),
                reason: format!("{key} must be non-negative"),
            });
        }
    }

    Ok(built)
}

/// Resolve the strategy id (rejecting unknown ids here, one layer above the
/// signal builder) and read that strategy's recognized options.
pub fn build_strategy_config(config: &dyn ConfigPort) -> Result<StrategyConfig, VectraderError> {
    let id: StrategyId = match config.get_string("strategy", "id") {
        Some(s) if !s.trim().is_empty() => s.trim().parse()?,
        _ => {
            return Err(VectraderError::ConfigMissing {
                section: "strategy".to_string(),
                key: "id".to_string(),
            })
        }
    };

    let built = match id {
        StrategyId::RevenueGrowth => StrategyConfig::RevenueGrowth {
            months: positive_int(config, "months", DEFAULT_MONTHS)?,
        },
        StrategyId::PriceBreakout => StrategyConfig::PriceBreakout {
            ma_days: positive_int(config, "ma_days", DEFAULT_MA_DAYS)?,
        },
        StrategyId::HighDividend => StrategyConfig::HighDividend {
            top_pct: fraction(config, "top_pct", DEFAULT_TOP_PCT)?,
        },
        StrategyId::Momentum => StrategyConfig::Momentum {
            lookback_months: positive_int(config, "lookback_months", DEFAULT_LOOKBACK_MONTHS)?,
            top_pct: fraction(config, "top_pct", DEFAULT_TOP_PCT)?,
        },
    };

    Ok(built)
}

fn positive_int(
    config: &dyn ConfigPort,
    key: &str,
    default: usize,
) -> Result<usize, VectraderError> {
    let value = config.get_int("strategy", key, default as i64);
    if value < 1 {
        return Err(VectraderError::ConfigInvalid {
            section: "strategy".to_string(),
            key: key.to_string(),
            reason: format!("{key} must be at least 1"),
        });
    }
    Ok(value as usize)
}

fn fraction(config: &dyn ConfigPort, key: &str, default: f64) -> Result<f64, VectraderError> {
    let value = config.get_double("strategy", key, default);
    if !(value > 0.0 && value <= 1.0) {
        return Err(VectraderError::ConfigInvalid {
            section: "strategy".to_string(),
            key: key.to_string(),
            reason: format!("{key} must be in (0, 1]"),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    const VALID: &str = r#"
[data]
path = ./data

[backtest]
start_date = 2023-01-01
codes = 2330,2317
fee_ratio = 0.001425
tax_ratio = 0.003

[strategy]
id = momentum
lookback_months = 6
top_pct = 0.1
"#;

    #[test]
    fn valid_config_builds_everything() {
        let config = make_config(VALID);

        let run = build_run_config(&config).unwrap();
        assert_eq!(run.data_path, "./data");
        assert_eq!(run.universe, vec!["2330", "2317"]);
        assert_eq!(
            run.start_date,
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
        );
        assert_eq!(run.end_date, None);

        let backtest = build_backtest_config(&config).unwrap();
        assert!((backtest.fee_ratio - 0.001425).abs() < 1e-12);

        let strategy = build_strategy_config(&config).unwrap();
        assert_eq!(
            strategy,
            StrategyConfig::Momentum {
                lookback_months: 6,
                top_pct: 0.1
            }
        );
    }

    #[test]
    fn missing_data_path_fails() {
        let config = make_config("[backtest]\nstart_date = 2023-01-01\n[strategy]\nid = momentum\n");
        let err = build_run_config(&config).unwrap_err();
        assert!(matches!(err, VectraderError::ConfigMissing { section, .. } if section == "data"));
    }

    #[test]
    fn missing_start_date_fails() {
        let config = make_config("[data]\npath = ./data\n");
        let err = build_run_config(&config).unwrap_err();
        assert!(matches!(err, VectraderError::ConfigMissing { key, .. } if key == "start_date"));
    }

    #[test]
    fn bad_start_date_format_fails() {
        let config = make_config("[data]\npath = ./data\n[backtest]\nstart_date = 2023/01/01\n");
        let err = build_run_config(&config).unwrap_err();
        assert!(matches!(err, VectraderError::ConfigInvalid { key, .. } if key == "start_date"));
    }

    #[test]
    fn start_after_end_fails() {
        let config = make_config(
            "[data]\npath = ./data\n[backtest]\nstart_date = 2024-01-01\nend_date = 2023-01-01\n",
        );
        let err = build_run_config(&config).unwrap_err();
        assert!(matches!(err, VectraderError::ConfigInvalid { key, .. } if key == "start_date"));
    }

    #[test]
    fn omitted_codes_fall_back_to_default_universe() {
        let config = make_config("[data]\npath = ./data\n[backtest]\nstart_date = 2023-01-01\n");
        let run = build_run_config(&config).unwrap();
        assert!(!run.universe.is_empty());
    }

    #[test]
    fn backtest_defaults_apply_when_keys_absent() {
        let config = make_config("[data]\npath = ./data\n[backtest]\nstart_date = 2023-01-01\n");
        let backtest = build_backtest_config(&config).unwrap();
        assert_eq!(backtest, BacktestConfig::default());
    }

    #[test]
    fn negative_fee_ratio_fails() {
        let config = make_config("[backtest]\nfee_ratio = -0.1\n");
        let err = build_backtest_config(&config).unwrap_err();
        assert!(matches!(err, VectraderError::ConfigInvalid { key, .. } if key == "fee_ratio"));
    }

    #[test]
    fn missing_strategy_id_fails() {
        let config = make_config("[strategy]\ntop_pct = 0.2\n");
        let err = build_strategy_config(&config).unwrap_err();
        assert!(matches!(err, VectraderError::ConfigMissing { key, .. } if key == "id"));
    }

    #[test]
    fn unknown_strategy_id_fails() {
        let config = make_config("[strategy]\nid = mean_reversion\n");
        let err = build_strategy_config(&config).unwrap_err();
        assert!(matches!(err, VectraderError::UnknownStrategy(s) if s == "mean_reversion"));
    }

    #[test]
    fn strategy_defaults_apply_when_keys_absent() {
        let config = make_config("[strategy]\nid = revenue_growth\n");
        let strategy = build_strategy_config(&config).unwrap();
        assert_eq!(strategy, StrategyConfig::RevenueGrowth { months: 3 });
    }

    #[test]
    fn unrecognized_keys_are_ignored() {
        let config = make_config("[strategy]\nid = price_breakout\nma_days = 20\nwindow = 99\n");
        let strategy = build_strategy_config(&config).unwrap();
        assert_eq!(strategy, StrategyConfig::PriceBreakout { ma_days: 20 });
    }

    #[test]
    fn zero_months_fails() {
        let config = make_config("[strategy]\nid = revenue_growth\nmonths = 0\n");
        let err = build_strategy_config(&config).unwrap_err();
        assert!(matches!(err, VectraderError::ConfigInvalid { key, .. } if key == "months"));
    }

    #[test]
    fn top_pct_out_of_range_fails() {
        let config = make_config("[strategy]\nid = high_dividend\ntop_pct = 1.5\n");
        let err = build_strategy_config(&config).unwrap_err();
        assert!(matches!(err, VectraderError::ConfigInvalid { key, .. } if key == "top_pct"));

        let config = make_config("[strategy]\nid = high_dividend\ntop_pct = 0\n");
        let err = build_strategy_config(&config).unwrap_err();
        assert!(matches!(err, VectraderError::ConfigInvalid { key, .. } if key == "top_pct"));
    }
}

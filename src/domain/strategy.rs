//! Strategy identifiers and per-strategy configuration.
//!
//! The four selection strategies form a closed set. Each variant carries its
//! own typed parameters with documented defaults, so option handling is
//! resolved at construction time instead of at lookup time.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::domain::error::VectraderError;

pub const DEFAULT_MONTHS: usize = 3;
pub const DEFAULT_MA_DAYS: usize = 60;
pub const DEFAULT_TOP_PCT: f64 = 0.2;
pub const DEFAULT_LOOKBACK_MONTHS: usize = 3;

/// The closed set of strategy identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyId {
    RevenueGrowth,
    PriceBreakout,
    HighDividend,
    Momentum,
}

impl StrategyId {
    pub const ALL: [StrategyId; 4] = [
        StrategyId::RevenueGrowth,
        StrategyId::PriceBreakout,
        StrategyId::HighDividend,
        StrategyId::Momentum,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyId::RevenueGrowth => "revenue_growth",
            StrategyId::PriceBreakout => "price_breakout",
            StrategyId::HighDividend => "high_dividend",
            StrategyId::Momentum => "momentum",
        }
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyId {
    type Err = VectraderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "revenue_growth" => Ok(StrategyId::RevenueGrowth),
            "price_breakout" => Ok(StrategyId::PriceBreakout),
            "high_dividend" => Ok(StrategyId::HighDividend),
            "momentum" => Ok(StrategyId::Momentum),
            other => Err(VectraderError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Typed configuration, one variant per strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum StrategyConfig {
    /// Hold instruments whose monthly revenue rose for `months` consecutive
    /// months.
    RevenueGrowth { months: usize },
    /// Hold instruments whose close sits strictly above their `ma_days`
    /// simple moving average.
    PriceBreakout { ma_days: usize },
    /// Each month, hold the top `top_pct` fraction by dividend yield.
    HighDividend { top_pct: f64 },
    /// Each month, hold the top `top_pct` fraction by trailing
    /// `lookback_months * 21`-day return.
    Momentum {
        lookback_months: usize,
        top_pct: f64,
    },
}

impl StrategyConfig {
    /// Default parameters for the given strategy.
    pub fn defaults_for(id: StrategyId) -> Self {
        match id {
            StrategyId::RevenueGrowth => StrategyConfig::RevenueGrowth {
                months: DEFAULT_MONTHS,
            },
            StrategyId::PriceBreakout => StrategyConfig::PriceBreakout {
                ma_days: DEFAULT_MA_DAYS,
            },
            StrategyId::HighDividend => StrategyConfig::HighDividend {
                top_pct: DEFAULT_TOP_PCT,
            },
            StrategyId::Momentum => StrategyConfig::Momentum {
                lookback_months: DEFAULT_LOOKBACK_MONTHS,
                top_pct: DEFAULT_TOP_PCT,
            },
        }
    }

    pub fn id(&self) -> StrategyId {
        match self {
            StrategyConfig::RevenueGrowth { .. } => StrategyId::RevenueGrowth,
            StrategyConfig::PriceBreakout { .. } => StrategyId::PriceBreakout,
            StrategyConfig::HighDividend { .. } => StrategyId::HighDividend,
            StrategyConfig::Momentum { .. } => StrategyId::Momentum,
        }
    }
}

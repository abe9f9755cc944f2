//! Instrument universe handling.
//!
//! Parses instrument code lists from configuration and supplies the built-in
//! default universe. Codes are opaque identifiers; the core attaches no
//! meaning to them.

use std::collections::HashSet;
use std::env;

/// Environment variable overriding the built-in default universe.
pub const UNIVERSE_ENV_VAR: &str = "BACKTEST_UNIVERSE";

/// Fifty liquid Taiwan-listed codes spanning electronics, financials,
/// industrials and large caps.
const DEFAULT_UNIVERSE: [&str; 50] = [
    "2330", "2317", "2454", "2382", "2308", "2303", "2357", "3711", "2379", "2395",
    "2377", "2301", "2344", "3034", "2049", "2891", "2882", "2886", "2884", "2885",
    "2892", "2880", "2881", "5880", "2883", "1301", "1303", "6505", "2912", "2207",
    "1216", "2105", "2002", "1402", "2603", "3008", "2409", "2408", "3481", "2376",
    "2352", "2327", "2353", "3045", "4938", "2412", "2474", "2615", "2609", "2610",
];

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in code list")]
    EmptyToken,

    #[error("duplicate code: {0}")]
    DuplicateCode(String),
}

/// Parse a comma-separated code list, rejecting empty tokens and duplicates.
pub fn parse_codes(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut codes = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let code = token.trim();
        if code.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        if !seen.insert(code.to_string()) {
            return Err(UniverseError::DuplicateCode(code.to_string()));
        }
        codes.push(code.to_string());
    }

    Ok(codes)
}

/// The default universe, or the `BACKTEST_UNIVERSE` override when set to a
/// non-empty list.
pub fn default_universe() -> Vec<String> {
    if let Ok(value) = env::var(UNIVERSE_ENV_VAR) {
        let codes: Vec<String> = value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if !codes.is_empty() {
            return codes;
        }
    }
    DEFAULT_UNIVERSE.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_codes_basic() {
        let result = parse_codes("2330,2317,2454").unwrap();
        assert_eq!(result, vec!["2330", "2317", "2454"]);
    }

    #[test]
    fn parse_codes_trims_whitespace() {
        let result = parse_codes("  2330 , 2317 ,2454  ").unwrap();
        assert_eq!(result, vec!["2330", "2317", "2454"]);
    }

    #[test]
    fn parse_codes_single() {
        assert_eq!(parse_codes("2330").unwrap(), vec!["2330"]);
    }

    #[test]
    fn parse_codes_empty_token() {
        assert!(matches!(
            parse_codes("2330,,2317"),
            Err(UniverseError::EmptyToken)
        ));
    }

    #[test]
    fn parse_codes_duplicate() {
        assert!(matches!(
            parse_codes("2330,2317,2330"),
            Err(UniverseError::DuplicateCode(s)) if s == "2330"
        ));
    }

    #[test]
    fn default_universe_has_fifty_unique_codes() {
        let codes = DEFAULT_UNIVERSE;
        let unique: HashSet<&str> = codes.iter().copied().collect();
        assert_eq!(unique.len(), 50);
    }
}

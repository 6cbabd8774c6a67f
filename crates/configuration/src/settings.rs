use crate::error::ConfigError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

/// The root configuration structure for a single backtest run.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub backtest: Backtest,
    pub simulation: Simulation,
    pub sizing: Sizing,
    pub strategies: Strategies,
}

/// Contains parameters for a single backtest run.
#[derive(Debug, Clone, Deserialize)]
pub struct Backtest {
    /// The universe of symbols the aligned timeline is built from
    /// (e.g., ["BTC-USDT", "ETH-USDT"]).
    pub symbols: Vec<String>,
    /// The initial starting capital that seeds the portfolio's cash.
    pub initial_capital: Decimal,
    /// The nominal start timestamp of the run, logged when the replay begins.
    pub start_time: DateTime<Utc>,
}

/// Contains parameters for the simulated execution handler.
#[derive(Debug, Clone, Deserialize)]
pub struct Simulation {
    /// The commission charged on each fill as a fraction of the fill cost.
    /// 0.0004 corresponds to 0.04%.
    pub commission_pct: Decimal,
    /// The exchange label stamped on simulated fills.
    pub exchange: String,
}

/// Contains parameters for the portfolio's naive position sizing.
#[derive(Debug, Clone, Deserialize)]
pub struct Sizing {
    /// The fixed quantity the naive portfolio orders per signal, before
    /// scaling by signal strength.
    pub default_quantity: Decimal,
}

/// Contains the parameter sets for all available strategies.
#[derive(Debug, Deserialize, Clone)]
pub struct Strategies {
    pub ma_crossover: MaCrossoverParams,
}

/// Parameters for the Double Moving Average Crossover strategy.
#[derive(Debug, Deserialize, Clone)]
pub struct MaCrossoverParams {
    pub fast_period: usize,
    pub slow_period: usize,
}

impl Config {
    /// Checks the cross-field constraints the type system cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backtest.symbols.is_empty() {
            return Err(ConfigError::ValidationError(
                "backtest.symbols must list at least one symbol".to_string(),
            ));
        }
        if self.backtest.initial_capital <= Decimal::ZERO {
            return Err(ConfigError::ValidationError(
                "backtest.initial_capital must be positive".to_string(),
            ));
        }
        if self.sizing.default_quantity <= Decimal::ZERO {
            return Err(ConfigError::ValidationError(
                "sizing.default_quantity must be positive".to_string(),
            ));
        }
        if self.strategies.ma_crossover.fast_period >= self.strategies.ma_crossover.slow_period {
            return Err(ConfigError::ValidationError(
                "strategies.ma_crossover.fast_period must be less than slow_period".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn sample_config() -> Config {
        Config {
            backtest: Backtest {
                symbols: vec!["BTC-USDT".to_string()],
                initial_capital: dec!(100000),
                start_time: Utc.with_ymd_and_hms(2021, 3, 1, 0, 0, 0).unwrap(),
            },
            simulation: Simulation {
                commission_pct: dec!(0.0004),
                exchange: "SIMULATED".to_string(),
            },
            sizing: Sizing {
                default_quantity: dec!(100),
            },
            strategies: Strategies {
                ma_crossover: MaCrossoverParams {
                    fast_period: 5,
                    slow_period: 13,
                },
            },
        }
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(sample_config().validate().is_ok());
    }

    #[test]
    fn empty_symbol_universe_is_rejected() {
        let mut config = sample_config();
        config.backtest.symbols.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_ma_periods_are_rejected() {
        let mut config = sample_config();
        config.strategies.ma_crossover.fast_period = 20;
        assert!(config.validate().is_err());
    }
}

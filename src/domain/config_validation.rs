//! Configuration validation.
//!
//! Validates every config field a run reads before any data is loaded.

use crate::domain::error::TradetipsError;
use crate::domain::strategy::Strategy;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

/// Symbol is checked separately: the command line may supply it.
pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), TradetipsError> {
    validate_initial_capital(config)?;
    validate_commission(config)?;
    validate_risk_free_rate(config)?;
    validate_dates(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), TradetipsError> {
    validate_strategy_name(config)?;
    validate_strategy_params(config)
}

/// Window and threshold checks, which apply even when the strategy name is
/// supplied on the command line.
pub fn validate_strategy_params(config: &dyn ConfigPort) -> Result<(), TradetipsError> {
    validate_windows(config)?;
    validate_thresholds(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> TradetipsError {
    TradetipsError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_symbol(config: &dyn ConfigPort) -> Result<(), TradetipsError> {
    match config.get_string("backtest", "symbol") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(TradetipsError::ConfigMissing {
            section: "backtest".to_string(),
            key: "symbol".to_string(),
        }),
    }
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), TradetipsError> {
    let value = config.get_double("backtest", "initial_capital", 100_000.0);
    if value <= 0.0 || !value.is_finite() {
        return Err(invalid(
            "backtest",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    Ok(())
}

fn validate_commission(config: &dyn ConfigPort) -> Result<(), TradetipsError> {
    let value = config.get_double("backtest", "commission", 0.001);
    if !(0.0..1.0).contains(&value) {
        return Err(invalid(
            "backtest",
            "commission",
            "commission must be a fraction in [0, 1)",
        ));
    }
    Ok(())
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<(), TradetipsError> {
    let value = config.get_double("backtest", "risk_free_rate", 0.05);
    if !(0.0..1.0).contains(&value) {
        return Err(invalid(
            "backtest",
            "risk_free_rate",
            "risk_free_rate must be between 0 and 1",
        ));
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), TradetipsError> {
    let start_date = parse_date(config.get_string("backtest", "start_date").as_deref(), "start_date")?;
    let end_date = parse_date(config.get_string("backtest", "end_date").as_deref(), "end_date")?;

    if start_date >= end_date {
        return Err(invalid(
            "backtest",
            "start_date",
            "start_date must be before end_date",
        ));
    }
    Ok(())
}

pub fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, TradetipsError> {
    match value {
        None => Err(TradetipsError::ConfigMissing {
            section: "backtest".to_string(),
            key: field.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            invalid(
                "backtest",
                field,
                &format!("invalid {} format, expected YYYY-MM-DD", field),
            )
        }),
    }
}

fn validate_strategy_name(config: &dyn ConfigPort) -> Result<(), TradetipsError> {
    let name = config
        .get_string("strategy", "name")
        .unwrap_or_else(|| "SMA".to_string());
    Strategy::from_name(&name).map(|_| ())
}

fn validate_windows(config: &dyn ConfigPort) -> Result<(), TradetipsError> {
    let short = config.get_int("strategy", "short_window", 20);
    let long = config.get_int("strategy", "long_window", 50);

    if short < 1 {
        return Err(invalid("strategy", "short_window", "short_window must be at least 1"));
    }
    if long < 1 {
        return Err(invalid("strategy", "long_window", "long_window must be at least 1"));
    }
    if short >= long {
        return Err(invalid(
            "strategy",
            "short_window",
            "short_window must be less than long_window",
        ));
    }
    Ok(())
}

fn validate_thresholds(config: &dyn ConfigPort) -> Result<(), TradetipsError> {
    let oversold = config.get_double("strategy", "oversold", 30.0);
    let overbought = config.get_double("strategy", "overbought", 70.0);

    if !(0.0..=100.0).contains(&oversold) {
        return Err(invalid("strategy", "oversold", "oversold must be between 0 and 100"));
    }
    if !(0.0..=100.0).contains(&overbought) {
        return Err(invalid(
            "strategy",
            "overbought",
            "overbought must be between 0 and 100",
        ));
    }
    if oversold >= overbought {
        return Err(invalid(
            "strategy",
            "oversold",
            "oversold must be less than overbought",
        ));
    }
    Ok(())
}

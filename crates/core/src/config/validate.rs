use super::{
    types::{MarketConfig, Settings},
    ConfigError,
};

/// Validate a market configuration
/// Currently validates:
/// - Every field is positive
/// - Pool capacity does not exceed total tickets
pub fn validate_market_config(config: &MarketConfig) -> Result<(), ConfigError> {
    let fields = [
        ("totalTickets", config.total_tickets),
        ("ticketReleaseRate", config.ticket_release_rate),
        ("customerRetrievalRate", config.customer_retrieval_rate),
        ("maxTicketCapacity", config.max_ticket_capacity),
    ];
    for (name, value) in fields {
        if value == 0 {
            return Err(ConfigError::ValidationError(format!(
                "{} must be a positive integer",
                name
            )));
        }
    }

    if config.max_ticket_capacity > config.total_tickets {
        return Err(ConfigError::ValidationError(
            "maxTicketCapacity cannot exceed totalTickets".to_string(),
        ));
    }

    Ok(())
}

/// Validate runtime settings
/// - Tick and run duration must be non-zero
pub fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
    if settings.simulation.tick_ms == 0 {
        return Err(ConfigError::ValidationError(
            "simulation.tick_ms cannot be 0".to_string(),
        ));
    }
    if settings.simulation.run_secs == 0 {
        return Err(ConfigError::ValidationError(
            "simulation.run_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::SimulationSettings;

    #[test]
    fn test_validate_valid_market_config() {
        assert!(validate_market_config(&MarketConfig::new(100, 5, 4, 20)).is_ok());
        assert!(validate_market_config(&MarketConfig::new(10, 1, 1, 10)).is_ok());
    }

    #[test]
    fn test_validate_zero_field_fails() {
        let result = validate_market_config(&MarketConfig::new(100, 0, 4, 20));
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("ticketReleaseRate"));
    }

    #[test]
    fn test_validate_capacity_above_total_fails() {
        let result = validate_market_config(&MarketConfig::new(10, 1, 1, 11));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("maxTicketCapacity"));
    }

    #[test]
    fn test_validate_settings() {
        assert!(validate_settings(&Settings::default()).is_ok());

        let settings = Settings {
            simulation: SimulationSettings {
                tick_ms: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        let result = validate_settings(&settings);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}

use crate::store::admission::{default_placeholders, PlaceholderCoordinate};
use serde::{Deserialize, Serialize};

/// Default capacity of the store.
pub const DEFAULT_MAX_DETECTIONS: usize = 1000;

/// Shared configuration for a detection store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub max_detections: usize,
    /// Coordinates that indicate an upstream geocoding fallback.
    pub placeholders: Vec<PlaceholderCoordinate>,
    pub placeholder_epsilon_deg: f64,
    pub recent_window_secs: i64,
    pub high_confidence_threshold: f64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_detections: DEFAULT_MAX_DETECTIONS,
            placeholders: default_placeholders(),
            placeholder_epsilon_deg: 0.001,
            recent_window_secs: 60 * 60,
            high_confidence_threshold: 0.8,
        }
    }
}

impl StoreConfig {
    pub fn with_capacity(max_detections: usize) -> Self {
        Self {
            max_detections,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> StoreResult<()> {
        if self.max_detections == 0 {
            return Err(StoreError::InvalidCapacity(self.max_detections));
        }
        if !self.placeholder_epsilon_deg.is_finite() || self.placeholder_epsilon_deg < 0.0 {
            return Err(StoreError::InvalidConfig(format!(
                "placeholder epsilon must be a non-negative number, got {}",
                self.placeholder_epsilon_deg
            )));
        }
        if self.recent_window_secs <= 0
            || chrono::Duration::try_seconds(self.recent_window_secs).is_none()
        {
            return Err(StoreError::InvalidConfig(format!(
                "recent window must be a positive, representable number of seconds, got {}s",
                self.recent_window_secs
            )));
        }
        Ok(())
    }
}

/// Errors raised while building a store.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("invalid capacity: {0} (must be at least 1)")]
    InvalidCapacity(usize),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = StoreConfig::default();
        assert_eq!(config.max_detections, 1000);
        assert_eq!(config.placeholders.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = StoreConfig::with_capacity(0).validate().unwrap_err();
        assert!(matches!(err, StoreError::InvalidCapacity(0)));
    }

    #[test]
    fn negative_epsilon_is_rejected() {
        let config = StoreConfig {
            placeholder_epsilon_deg: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(StoreError::InvalidConfig(_))
        ));
    }

    #[test]
    fn recent_window_must_fit_a_duration() {
        let too_long = StoreConfig {
            recent_window_secs: i64::MAX,
            ..Default::default()
        };
        assert!(matches!(
            too_long.validate(),
            Err(StoreError::InvalidConfig(_))
        ));

        let longest = StoreConfig {
            recent_window_secs: i64::MAX / 1000,
            ..Default::default()
        };
        assert!(longest.validate().is_ok());
    }
}

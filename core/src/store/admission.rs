use crate::math::geo::is_valid_lat_lng;
use crate::prelude::StoreConfig;
use crate::record::Coordinates;
use serde::{Deserialize, Serialize};

/// A known fallback position that signals a failed upstream geocode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderCoordinate {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl PlaceholderCoordinate {
    pub fn new(name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lng,
        }
    }

    pub fn matches(&self, lat: f64, lng: f64, epsilon_deg: f64) -> bool {
        (self.lat - lat).abs() < epsilon_deg && (self.lng - lng).abs() < epsilon_deg
    }
}

/// `(0, 0)` and the London fallback used by the location lookup.
pub fn default_placeholders() -> Vec<PlaceholderCoordinate> {
    vec![
        PlaceholderCoordinate::new("null island", 0.0, 0.0),
        PlaceholderCoordinate::new("london fallback", 51.5074, -0.1278),
    ]
}

/// Why a candidate record was not admitted.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    #[error("id already present")]
    DuplicateId,
    #[error("missing geographic coordinates")]
    MissingCoordinates,
    #[error("non-finite coordinates ({lat}, {lng})")]
    NonFiniteCoordinates { lat: f64, lng: f64 },
    #[error("coordinates out of range ({lat}, {lng})")]
    OutOfRange { lat: f64, lng: f64 },
    #[error("placeholder coordinates ({name})")]
    Placeholder { name: String },
}

impl Rejection {
    /// Stable short name, used as a metrics key.
    pub fn label(&self) -> &'static str {
        match self {
            Rejection::DuplicateId => "duplicate_id",
            Rejection::MissingCoordinates => "missing_coordinates",
            Rejection::NonFiniteCoordinates { .. } => "non_finite_coordinates",
            Rejection::OutOfRange { .. } => "out_of_range",
            Rejection::Placeholder { .. } => "placeholder",
        }
    }
}

/// Coordinate checks applied to every candidate record.
#[derive(Debug, Clone)]
pub struct AdmissionPolicy {
    placeholders: Vec<PlaceholderCoordinate>,
    epsilon_deg: f64,
}

impl AdmissionPolicy {
    pub fn new(placeholders: Vec<PlaceholderCoordinate>, epsilon_deg: f64) -> Self {
        Self {
            placeholders,
            epsilon_deg,
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.placeholders.clone(), config.placeholder_epsilon_deg)
    }

    pub fn matching_placeholder(&self, lat: f64, lng: f64) -> Option<&PlaceholderCoordinate> {
        self.placeholders
            .iter()
            .find(|p| p.matches(lat, lng, self.epsilon_deg))
    }

    pub fn check_coordinates(&self, coordinates: &Coordinates) -> Result<(), Rejection> {
        let (lat, lng) = coordinates
            .lat_lng()
            .ok_or(Rejection::MissingCoordinates)?;
        if !lat.is_finite() || !lng.is_finite() {
            return Err(Rejection::NonFiniteCoordinates { lat, lng });
        }
        if !is_valid_lat_lng(lat, lng) {
            return Err(Rejection::OutOfRange { lat, lng });
        }
        if let Some(placeholder) = self.matching_placeholder(lat, lng) {
            return Err(Rejection::Placeholder {
                name: placeholder.name.clone(),
            });
        }
        Ok(())
    }
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self::from_config(&StoreConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_position() {
        let policy = AdmissionPolicy::default();
        assert!(policy
            .check_coordinates(&Coordinates::geo(33.3152, 44.3661))
            .is_ok());
    }

    #[test]
    fn rejects_missing_position() {
        let policy = AdmissionPolicy::default();
        let coords = Coordinates {
            lat: Some(10.0),
            ..Default::default()
        };
        assert_eq!(
            policy.check_coordinates(&coords),
            Err(Rejection::MissingCoordinates)
        );
    }

    #[test]
    fn rejects_non_finite_and_out_of_range() {
        let policy = AdmissionPolicy::default();
        assert!(matches!(
            policy.check_coordinates(&Coordinates::geo(f64::NAN, 1.0)),
            Err(Rejection::NonFiniteCoordinates { .. })
        ));
        assert!(matches!(
            policy.check_coordinates(&Coordinates::geo(200.0, 1.0)),
            Err(Rejection::OutOfRange { .. })
        ));
        assert!(matches!(
            policy.check_coordinates(&Coordinates::geo(1.0, -181.0)),
            Err(Rejection::OutOfRange { .. })
        ));
    }

    #[test]
    fn rejects_placeholders_within_epsilon() {
        let policy = AdmissionPolicy::default();
        assert!(matches!(
            policy.check_coordinates(&Coordinates::geo(0.0, 0.0)),
            Err(Rejection::Placeholder { .. })
        ));
        assert!(matches!(
            policy.check_coordinates(&Coordinates::geo(51.5078, -0.1275)),
            Err(Rejection::Placeholder { .. })
        ));
        assert!(policy
            .check_coordinates(&Coordinates::geo(0.002, 0.0))
            .is_ok());
    }

    #[test]
    fn empty_placeholder_list_disables_the_check() {
        let policy = AdmissionPolicy::new(Vec::new(), 0.001);
        assert!(policy.check_coordinates(&Coordinates::geo(0.0, 0.0)).is_ok());
    }
}

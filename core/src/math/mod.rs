pub mod bounds;
pub mod geo;
pub mod stats;

pub use bounds::{BoundsAccumulator, CoordinateBounds};
pub use geo::{haversine_km, is_valid_lat_lng, EARTH_RADIUS_KM};
pub use stats::RunningMean;

//! Station model: an immutable geographic record plus the derived gap
//! predicates used throughout the solver (spec section 3).

use crate::config::constant::EARTH_RADIUS_M;

/// An immutable station record. Station number 0 is reserved for the depot.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub number: u32,
    pub name: String,
    pub capacity: u32,
    pub address: String,
    pub longitude: f64,
    pub latitude: f64,
    pub bike_count: i64,
    pub bike_target: i64,
}

impl Station {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        number: u32,
        name: impl Into<String>,
        capacity: u32,
        address: impl Into<String>,
        longitude: f64,
        latitude: f64,
        bike_count: i64,
        bike_target: i64,
    ) -> Self {
        Self {
            number,
            name: name.into(),
            capacity,
            address: address.into(),
            longitude,
            latitude,
            bike_count,
            bike_target,
        }
    }

    pub fn depot(number: u32, name: impl Into<String>, longitude: f64, latitude: f64) -> Self {
        Self::new(number, name, 0, "", longitude, latitude, 0, 0)
    }

    /// Current bike count minus target. Positive means the station has
    /// surplus bikes to pick up; negative means it needs bikes dropped off.
    pub fn gap(&self) -> i64 {
        self.bike_count - self.bike_target
    }

    pub fn is_loading(&self) -> bool {
        self.gap() > 0
    }

    pub fn is_unloading(&self) -> bool {
        self.gap() < 0
    }

    pub fn is_equilibrated(&self) -> bool {
        self.gap() == 0
    }

    /// Great-circle distance to `other` in meters via the haversine formula.
    pub fn distance_to(&self, other: &Station) -> f64 {
        haversine(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// Haversine distance in meters between two lat/long points, in degrees.
pub fn haversine(lat1: f64, long1: f64, lat2: f64, long2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_long = (long2 - long1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_long / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// A pluggable distance provider, per spec section 6. Must be symmetric and
/// non-negative; the triangle inequality is recommended but not required.
/// Injected into a [`crate::graph::RoutingGraph`] via `with_distance_fn`.
pub type DistanceFn = dyn Fn(&Station, &Station) -> f64 + Send + Sync;

use ruta_matrix_providers::as_the_crow_flies::haversine_distance_km;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    point: geo::Point,
    zone: Option<String>,
}

impl Location {
    pub fn from_lat_lon(lat: f64, lon: f64) -> Self {
        Self {
            point: geo::Point::new(lon, lat),
            zone: None,
        }
    }

    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    pub fn lon(&self) -> f64 {
        self.point.x()
    }

    pub fn lat(&self) -> f64 {
        self.point.y()
    }

    pub fn zone(&self) -> Option<&str> {
        self.zone.as_deref()
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat()) && (-180.0..=180.0).contains(&self.lon())
    }

    pub fn haversine_distance_km(&self, to: &Location) -> f64 {
        haversine_distance_km(self.point, to.point)
    }
}

impl From<&Location> for geo::Point<f64> {
    fn from(location: &Location) -> Self {
        location.point
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct TestPoint {
    pub lon: f64,
    pub lat: f64,
}

impl From<&TestPoint> for geo_types::Point {
    fn from(value: &TestPoint) -> Self {
        geo_types::Point::new(value.lon, value.lat)
    }
}

pub fn test_point(lon: f64, lat: f64) -> TestPoint {
    TestPoint { lon, lat }
}

use crate::travel_matrices::TravelMatrices;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers.
pub fn haversine_distance_km<P>(from: P, to: P) -> f64
where
    P: Into<geo_types::Point>,
{
    let from: geo_types::Point = from.into();
    let to: geo_types::Point = to.into();

    let lat1_rad = from.y().to_radians();
    let lon1_rad = from.x().to_radians();
    let lat2_rad = to.y().to_radians();
    let lon2_rad = to.x().to_radians();

    let delta_lat = lat2_rad - lat1_rad;
    let delta_lon = lon2_rad - lon1_rad;

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Seconds needed to cover `distance_meters` at `speed_kmh`, 0 for a non positive speed.
pub fn travel_seconds(distance_meters: f64, speed_kmh: f64) -> f64 {
    if speed_kmh <= 0.0 {
        return 0.0;
    }

    distance_meters / (speed_kmh * 1000.0 / 3600.0)
}

pub fn as_the_crow_flies_matrices<P>(points: &[P], speed_kmh: f64) -> TravelMatrices
where
    for<'a> &'a P: Into<geo_types::Point>,
{
    let num_points = points.len();
    let mut distances: Vec<f64> = vec![0.0; num_points * num_points];
    let mut times: Vec<f64> = vec![0.0; num_points * num_points];

    for (i, from) in points.iter().enumerate() {
        for (j, to) in points.iter().enumerate() {
            let meters = haversine_distance_km(from, to) * 1000.0;
            distances[i * num_points + j] = meters;
            times[i * num_points + j] = travel_seconds(meters, speed_kmh);
        }
    }

    TravelMatrices {
        size: num_points,
        distances,
        times,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_point;

    #[test]
    fn test_haversine_hundredth_of_degree() {
        let distance = haversine_distance_km(
            geo_types::Point::new(0.0, 0.0),
            geo_types::Point::new(0.01, 0.0),
        );

        assert!((distance - 1.111_95).abs() < 1e-3);
    }

    #[test]
    fn test_haversine_same_point() {
        let point = geo_types::Point::new(-3.7038, 40.4168);
        assert_eq!(haversine_distance_km(point, point), 0.0);
    }

    #[test]
    fn test_travel_seconds() {
        assert_eq!(travel_seconds(40_000.0, 40.0), 3600.0);
        assert_eq!(travel_seconds(1000.0, 0.0), 0.0);
    }

    #[test]
    fn test_matrices() {
        let points = vec![test_point(0.0, 0.0), test_point(0.01, 0.0)];
        let matrices = as_the_crow_flies_matrices(&points, 40.0);

        assert_eq!(matrices.size, 2);
        assert_eq!(matrices.distance(0, 0), 0.0);
        assert!((matrices.distance(0, 1) - 1111.95).abs() < 1.0);
        assert_eq!(matrices.distance(0, 1), matrices.distance(1, 0));
        assert!((matrices.time(0, 1) - 100.07).abs() < 0.1);
    }
}

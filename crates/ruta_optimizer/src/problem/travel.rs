use super::location::Location;

/// Great-circle distance in kilometers (Earth radius 6371 km).
pub fn distance_km(from: &Location, to: &Location) -> f64 {
    from.haversine_distance_km(to)
}

/// Longest leg or service time represented, about a century. Longer durations are clamped to it.
pub const MAX_PLANNING_MINUTES: i64 = 100 * 365 * 24 * 60;

/// Rounds `minutes` up, clamped to `[0, MAX_PLANNING_MINUTES]`.
pub fn clamp_minutes(minutes: f64) -> i64 {
    if minutes.is_nan() || minutes <= 0.0 {
        return 0;
    }

    minutes.ceil().min(MAX_PLANNING_MINUTES as f64) as i64
}

/// Whole minutes needed to cover `distance_km` at `speed_kmh`, scaled by `traffic_multiplier`
/// before rounding up. Returns 0 for a non positive speed.
pub fn travel_time_minutes(distance_km: f64, speed_kmh: f64, traffic_multiplier: f64) -> i64 {
    if speed_kmh <= 0.0 || !speed_kmh.is_finite() {
        return 0;
    }

    let multiplier = if traffic_multiplier.is_finite() && traffic_multiplier > 0.0 {
        traffic_multiplier
    } else {
        1.0
    };

    clamp_minutes(distance_km / speed_kmh * 60.0 * multiplier)
}

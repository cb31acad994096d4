pub mod capacity_constraint;
pub mod constraint;
pub mod constraint_set;
pub mod global_constraint;
pub mod priority_constraint;
pub mod shift_constraint;
pub mod time_window_constraint;
pub mod transport_distance_constraint;
pub mod travel_time_constraint;
pub mod unassigned_visit_constraint;
pub mod vehicle_usage_constraint;
pub mod visit_constraint;
pub mod zone_affinity_constraint;

pub mod amount;
pub mod error;
pub mod location;
pub mod time_window;
pub mod traffic_event;
pub mod travel;
pub mod vehicle;
pub mod vehicle_routing_problem;
pub mod visit;

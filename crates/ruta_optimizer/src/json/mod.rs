pub mod previous_plan;
pub mod schema;
pub mod types;

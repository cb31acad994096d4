pub mod accepted_solution;
pub mod constraints;
pub mod construction;
pub mod disruption;
pub mod ls;
pub mod route_plan;
pub mod score;
pub mod score_level;
pub mod search;
pub mod solution;
#[allow(clippy::module_inception)]
pub mod solver;
pub mod solver_manager;
pub mod solver_params;

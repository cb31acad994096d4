pub mod propagator;
pub mod shadow;
pub mod working_solution;

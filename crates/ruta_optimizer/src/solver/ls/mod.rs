pub mod r#move;
pub mod move_selector;
pub mod reassign;
pub mod relink;

pub mod history;
pub mod lanes;
pub mod movement;
pub mod search;

pub mod classify;
pub mod data;
pub mod territory;
pub mod tiles;

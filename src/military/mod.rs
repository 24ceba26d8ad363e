pub mod combat;
pub mod defense;
pub mod threatmap;

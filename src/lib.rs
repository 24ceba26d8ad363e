#![recursion_limit = "256"]
#![warn(clippy::all)]

#[macro_use]
pub mod timing;

pub mod actions;
pub mod config;
pub mod economy;
pub mod findnearest;
pub mod game_loop;
pub mod location;
pub mod logging;
pub mod message;
pub mod military;
pub mod panic;
pub mod pathing;
pub mod room;
pub mod selection;

#[cfg(test)]
mod fixture;

pub use config::EngineConfig;
pub use game_loop::{Engine, Phase};
pub use message::{Action, TeamGameState};
pub use timing::Deadline;

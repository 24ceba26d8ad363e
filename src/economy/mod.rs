pub mod builder;
pub mod facility;
pub mod planner;
pub mod production;
pub mod site;
pub mod split;

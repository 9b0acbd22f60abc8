//! KSR Chef: task creation, worker assignment and roster upkeep for crane projects.

pub mod api;
pub mod config;
pub mod error;
pub mod matching;
pub mod model;
pub mod roster;
pub mod tasks;

pub mod connection;
pub mod entities;
pub mod repositories;

pub use repositories::{GameRepository, RosterRepository, SubmitOutcome, TeamRepository};

pub mod game_repository;
pub mod roster_repository;
pub mod team_repository;

pub use game_repository::{GameRepository, SubmitOutcome};
pub use roster_repository::RosterRepository;
pub use team_repository::TeamRepository;

pub mod analysis;
pub mod errors;
pub mod game;
pub mod stats;
pub mod team;

// Re-export all types
pub use analysis::*;
pub use errors::*;
pub use game::*;
pub use stats::*;
pub use team::*;

pub mod aggregator;
pub mod export;
pub mod lineup;
pub mod merge;
pub mod rates;
pub mod roster_match;
pub mod season_sort;

// Re-export main components
pub use aggregator::*;
pub use lineup::*;
pub use merge::*;
pub use rates::*;
pub use roster_match::*;
pub use season_sort::*;

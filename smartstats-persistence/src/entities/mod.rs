pub mod prelude;

pub mod games;
pub mod players;
pub mod teams;

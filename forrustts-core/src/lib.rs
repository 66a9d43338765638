//! Core types shared by the simulation crates.

use thiserror::Error;

mod position;
#[cfg(feature = "rand")]
mod rand_position;
mod time;

pub use position::Position;
#[cfg(feature = "rand")]
pub use rand_position::UniformPos;
pub use time::Time;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("invalid position: {0:?}")]
    PositionError(i64),
}

//! Bracket Pool - March Madness office pool bookkeeping.
//!
//! Tracks a 64-team single-elimination bracket, the players who bought teams
//! in it, and settles the pool's side contests from the recorded scores.
//! Python bindings for the display shell are available behind the `python`
//! feature.

pub mod bracket;
pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod persistence;
pub mod pick_four;
pub mod player;
pub mod prize;
pub mod region;
pub mod report;
pub mod settlement;
pub mod team;

#[cfg(feature = "python")]
mod python;

#[cfg(test)]
mod testing;

pub use bracket::{Bracket, Slot};
pub use config::PoolConfig;
pub use constants::{ROUNDS, SEED_ORDER, TOTAL_TEAMS};
pub use database::Database;
pub use error::{PoolError, PoolResult};
pub use persistence::{load_from_path, read_database, save_to_path, write_database, write_summary};
pub use player::Player;
pub use prize::{Contest, Contests, PrizeType};
pub use region::Region;
pub use report::{OwnedTeamStanding, PickFourStanding, PlayerReport, TeamReport};
pub use settlement::ContestManager;
pub use team::Team;

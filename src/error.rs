//! Error types shared by the bracket, roster and persistence layers.

use thiserror::Error;

use crate::region::Region;

/// Errors raised by pool operations.
///
/// Expected rejections (a full roster, a duplicate pick) get their own variant
/// so callers can tell the user exactly what went wrong.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("Invalid seed {0}: must be between 1 and 16")]
    InvalidSeed(u8),

    #[error("Unknown region: {0:?}")]
    InvalidRegion(String),

    #[error("Invalid name: {0:?}")]
    InvalidName(String),

    #[error("Invalid region order: each region must appear exactly once")]
    InvalidRegionOrder,

    #[error("Invalid prize amount {0}: must be a positive number")]
    InvalidPrizeAmount(f64),

    #[error("Invalid leaderboard size {0}: use -1 for unlimited")]
    InvalidLeaderboardSize(i32),

    #[error("Invalid spot count {0}: must purchase at least one spot")]
    InvalidSpots(u32),

    #[error("{team} has already been eliminated")]
    TeamEliminated { team: String },

    #[error("{team} is still waiting on its round {round} result")]
    RoundPending { team: String, round: u8 },

    #[error("{team} has no game left to score")]
    TournamentComplete { team: String },

    #[error("Tied score {score} between {team} and {opponent} in round {round}")]
    TiedScore {
        team: String,
        opponent: String,
        round: u8,
        score: u32,
    },

    #[error("Team not found: {0}")]
    TeamNotFound(String),

    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("A team already holds seed {seed} in the {region} region")]
    DuplicateSlot { seed: u8, region: Region },

    #[error("Name already in use: {0}")]
    DuplicateName(String),

    #[error("{player} already selected {team}")]
    AlreadySelected { player: String, team: String },

    #[error("{team} is already owned by {owner}")]
    AlreadyOwned { team: String, owner: String },

    #[error("Insufficient spots: requested {requested}, remaining {remaining}")]
    InsufficientSpots { requested: u32, remaining: u32 },

    #[error("No price configured for {0} spots")]
    UnpricedSpots(u32),

    #[error("{player} already owns all {spots} purchased teams")]
    OwnedTeamsFull { player: String, spots: u32 },

    #[error("{player} already has four pick-four teams")]
    PickFourFull { player: String },

    #[error("Teams cannot be assigned: {0}")]
    AssignmentUnavailable(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PoolError {
    /// True for rejections caused by bad caller input rather than pool state.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PoolError::InvalidSeed(_)
                | PoolError::InvalidRegion(_)
                | PoolError::InvalidName(_)
                | PoolError::InvalidRegionOrder
                | PoolError::InvalidPrizeAmount(_)
                | PoolError::InvalidLeaderboardSize(_)
                | PoolError::InvalidSpots(_)
                | PoolError::TeamEliminated { .. }
                | PoolError::RoundPending { .. }
                | PoolError::TournamentComplete { .. }
                | PoolError::TiedScore { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PoolError::TeamNotFound(_) | PoolError::PlayerNotFound(_))
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            PoolError::DuplicateSlot { .. }
                | PoolError::DuplicateName(_)
                | PoolError::AlreadySelected { .. }
                | PoolError::AlreadyOwned { .. }
        )
    }
}

/// Result type for pool operations
pub type PoolResult<T> = Result<T, PoolError>;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{ROUNDS, TEAMS_PER_REGION};
use crate::error::{PoolError, PoolResult};
use crate::region::Region;

/// Team occupying one seed line of a region.
///
/// Wins and the alive flag are derived from the bracket's score history and
/// are only changed by the bracket.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,

    /// Initials of a multi-word name, or the first four letters of one word
    pub short_name: String,

    pub seed: u8,

    pub region: Region,

    pub(crate) wins: u8,

    pub(crate) alive: bool,
}

impl Team {
    /// Create an alive team with no wins.
    ///
    /// The name is trimmed and must not be empty; the seed must be 1 to 16.
    pub fn new(name: &str, seed: u8, region: Region) -> PoolResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PoolError::InvalidName(name.to_string()));
        }
        if seed < 1 || seed as usize > TEAMS_PER_REGION {
            return Err(PoolError::InvalidSeed(seed));
        }

        Ok(Team {
            name: name.to_string(),
            short_name: short_name(name),
            seed,
            region,
            wins: 0,
            alive: true,
        })
    }

    pub fn wins(&self) -> u8 {
        self.wins
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Games this team could still win.
    pub fn possible_wins(&self) -> u8 {
        if self.alive {
            ROUNDS - self.wins
        } else {
            0
        }
    }

    /// Case-insensitive name comparison.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }

    pub(crate) fn reset(&mut self) {
        self.wins = 0;
        self.alive = true;
    }

    pub(crate) fn record_win(&mut self) {
        debug_assert!(self.alive && self.wins < ROUNDS);
        self.wins += 1;
    }

    pub(crate) fn record_loss(&mut self) {
        self.alive = false;
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.seed, self.name)
    }
}

fn short_name(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    if words.len() > 1 {
        words
            .iter()
            .filter_map(|w| w.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    } else {
        name.chars().take(4).flat_map(char::to_uppercase).collect()
    }
}

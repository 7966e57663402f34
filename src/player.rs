use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::PICK_FOUR_SIZE;
use crate::error::{PoolError, PoolResult};

/// A pool entrant and the teams they hold.
///
/// Teams are referenced by name; the bracket resolves them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,

    pub spots: u32,

    /// Winnings minus the entry price, recomputed on every settlement
    pub(crate) balance: f64,

    /// Combined championship score guess used as the U-Pick-It tiebreaker
    pub predicted_score: i32,

    pub paid: bool,

    pub(crate) owned_teams: Vec<String>,

    pub(crate) pick_four: Vec<String>,

    pub(crate) chosen_winner: Option<String>,
}

impl Player {
    pub fn new(name: &str, spots: u32) -> PoolResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PoolError::InvalidName(name.to_string()));
        }
        if spots < 1 {
            return Err(PoolError::InvalidSpots(spots));
        }
        Ok(Player {
            name: name.to_string(),
            spots,
            balance: 0.0,
            predicted_score: 0,
            paid: false,
            owned_teams: Vec::new(),
            pick_four: Vec::new(),
            chosen_winner: None,
        })
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn owned_teams(&self) -> &[String] {
        &self.owned_teams
    }

    pub fn pick_four(&self) -> &[String] {
        &self.pick_four
    }

    pub fn chosen_winner(&self) -> Option<&str> {
        self.chosen_winner.as_deref()
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }

    pub fn owns(&self, team: &str) -> bool {
        self.owned_teams.iter().any(|t| t.eq_ignore_ascii_case(team))
    }

    pub(crate) fn add_owned_team(&mut self, team: &str) -> PoolResult<()> {
        if self.owns(team) {
            return Err(PoolError::AlreadySelected {
                player: self.name.clone(),
                team: team.to_string(),
            });
        }
        if self.owned_teams.len() >= self.spots as usize {
            return Err(PoolError::OwnedTeamsFull {
                player: self.name.clone(),
                spots: self.spots,
            });
        }
        self.owned_teams.push(team.to_string());
        Ok(())
    }

    pub(crate) fn add_pick_four(&mut self, team: &str) -> PoolResult<()> {
        if self.pick_four.iter().any(|t| t.eq_ignore_ascii_case(team)) {
            return Err(PoolError::AlreadySelected {
                player: self.name.clone(),
                team: team.to_string(),
            });
        }
        if self.pick_four.len() >= PICK_FOUR_SIZE {
            return Err(PoolError::PickFourFull {
                player: self.name.clone(),
            });
        }
        self.pick_four.push(team.to_string());
        Ok(())
    }

    /// Drop every reference to `team`.
    pub(crate) fn forget_team(&mut self, team: &str) {
        self.owned_teams.retain(|t| !t.eq_ignore_ascii_case(team));
        self.pick_four.retain(|t| !t.eq_ignore_ascii_case(team));
        if self.chosen_winner.as_deref().is_some_and(|t| t.eq_ignore_ascii_case(team)) {
            self.chosen_winner = None;
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

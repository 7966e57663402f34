//! Structured reports for players, teams and leaderboards.
//!
//! Each report serializes with serde for shells that want data, and renders
//! the legacy text layout through `Display`.

use serde::Serialize;
use std::fmt;

use crate::error::PoolResult;
use crate::region::Region;
use crate::team::Team;

const MENU_BAR: &str =
    "================================================================================================";

/// A team as it appears inside a player report.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TeamLine {
    pub name: String,
    pub seed: u8,
    pub alive: bool,
}

impl From<&Team> for TeamLine {
    fn from(team: &Team) -> Self {
        TeamLine {
            name: team.name.clone(),
            seed: team.seed,
            alive: team.is_alive(),
        }
    }
}

impl TeamLine {
    fn status(&self) -> &'static str {
        if self.alive {
            "Alive"
        } else {
            "Eliminated"
        }
    }
}

impl fmt::Display for TeamLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.seed, self.name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerReport {
    pub name: String,
    pub balance: f64,
    pub predicted_score: i32,
    pub paid: bool,
    pub chosen_winner: Option<TeamLine>,
    pub owned_teams: Vec<TeamLine>,
    pub pick_four: Vec<TeamLine>,
    pub pick_four_points: u32,
    /// Points still available; `None` until the bracket is full
    pub potential_points: Option<u32>,
}

impl PlayerReport {
    pub fn to_json(&self) -> PoolResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for PlayerReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.balance < 0.0 { "" } else { " " };
        writeln!(f)?;
        writeln!(f, "{}", MENU_BAR)?;
        write!(
            f,
            "Player: {} | ${}{:.2} | Tiebreaker Score: {} | ",
            self.name, sign, self.balance, self.predicted_score
        )?;
        match &self.chosen_winner {
            Some(team) => writeln!(f, "Chosen Winner: {} ({})", team, team.status())?,
            None => writeln!(f, "Chosen Winner: None Selected")?,
        }
        writeln!(f, "{}", MENU_BAR)?;

        let points = match self.potential_points {
            Some(potential) => format!("({}/{})", self.pick_four_points, self.pick_four_points + potential),
            None => "(0/0)".to_string(),
        };
        let sections = [
            ("Owned Teams:".to_string(), &self.owned_teams),
            (format!("Pick-Four: {}", points), &self.pick_four),
        ];
        for (title, teams) in sections {
            write!(f, "{}\n   ", title)?;
            for (i, team) in teams.iter().enumerate() {
                write!(f, "{:<20}{:<15}", team.to_string(), format!(" ({})", team.status()))?;
                if i + 1 < teams.len() {
                    f.write_str(if (i + 1) % 2 == 0 { "\n   " } else { " | " })?;
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "{}", MENU_BAR)
    }
}

/// One game in a team's history.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameLine {
    pub round: u8,
    pub score: u32,
    pub opponent: TeamLine,
    pub opponent_score: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TeamReport {
    pub name: String,
    pub seed: u8,
    pub region: Region,
    pub wins: u8,
    pub alive: bool,
    pub games: Vec<GameLine>,
    pub possible_wins: u8,
}

impl TeamReport {
    pub fn to_json(&self) -> PoolResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for TeamReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Games:")?;
        for game in &self.games {
            writeln!(
                f,
                "  -#{} {}: {} vs {}: {}",
                self.seed, self.name, game.score, game.opponent, game.opponent_score
            )?;
        }
        writeln!(f, "Alive/Eliminated: {}", if self.alive { "Alive" } else { "Eliminated" })?;
        writeln!(f, "Seed: {}", self.seed)?;
        writeln!(f, "Region: {}", self.region)?;
        writeln!(f, "Wins: {}", self.wins)?;
        write!(f, "Potential Games Remaining: {}", self.possible_wins)
    }
}

/// Pick-four leaderboard row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PickFourStanding {
    pub player: String,
    pub points: u32,
    pub potential: u32,
}

impl fmt::Display for PickFourStanding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} pts ({} possible)", self.player, self.points, self.points + self.potential)
    }
}

/// Owned-team leaderboard row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OwnedTeamStanding {
    pub player: String,
    pub teams_alive: usize,
    pub teams_owned: usize,
}

impl fmt::Display for OwnedTeamStanding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}/{} teams alive", self.player, self.teams_alive, self.teams_owned)
    }
}

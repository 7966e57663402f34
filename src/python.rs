use pyo3::exceptions::{PyIOError, PyKeyError, PyValueError};
use pyo3::prelude::*;
use std::str::FromStr;

use crate::constants::{ROUNDS, TOTAL_TEAMS};
use crate::database::Database;
use crate::error::PoolError;
use crate::persistence;
use crate::prize::PrizeType;
use crate::region::Region;

impl From<PoolError> for PyErr {
    fn from(err: PoolError) -> PyErr {
        let message = err.to_string();
        if err.is_not_found() {
            PyKeyError::new_err(message)
        } else if matches!(err, PoolError::Io(_)) {
            PyIOError::new_err(message)
        } else {
            PyValueError::new_err(message)
        }
    }
}

/// Accepts a legacy key ("won first game") or a display name ("U-Pick-It").
fn prize_type(key: &str) -> PyResult<PrizeType> {
    PrizeType::from_key(key)
        .or_else(|| PrizeType::ALL.into_iter().find(|p| p.name().eq_ignore_ascii_case(key.trim())))
        .ok_or_else(|| PyValueError::new_err(format!("Unknown prize: {}", key)))
}

fn region(name: &str) -> PyResult<Region> {
    Ok(Region::from_str(name)?)
}

/// Pool handle for the display shell.
#[pyclass(name = "Pool")]
pub struct PyPool {
    db: Database,
}

#[pymethods]
impl PyPool {
    #[new]
    pub fn new() -> Self {
        PyPool { db: Database::new() }
    }

    /// Load a pool from a save file.
    #[staticmethod]
    pub fn load(path: &str) -> PyResult<Self> {
        Ok(PyPool {
            db: persistence::load_from_path(path)?,
        })
    }

    pub fn save(&self, path: &str) -> PyResult<()> {
        Ok(persistence::save_to_path(&self.db, path)?)
    }

    /// Printable summary of every player, leaderboard and contest.
    pub fn summary(&mut self) -> PyResult<String> {
        let mut out = Vec::new();
        persistence::write_summary(&mut self.db, &mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    #[pyo3(signature = (name, seed, region_name, scores = None))]
    pub fn add_team(&mut self, name: &str, seed: u8, region_name: &str, scores: Option<Vec<u32>>) -> PyResult<()> {
        let region = region(region_name)?;
        match scores {
            Some(scores) => self.db.add_team_with_scores(name, seed, region, scores)?,
            None => self.db.add_team(name, seed, region)?,
        }
        Ok(())
    }

    pub fn remove_team(&mut self, name: &str) -> bool {
        self.db.remove_team(name).is_some()
    }

    pub fn move_team(&mut self, name: &str, seed: u8, region_name: &str) -> PyResult<()> {
        Ok(self.db.move_team(name, seed, region(region_name)?)?)
    }

    /// Record a score and return the round it counted for.
    pub fn add_score(&mut self, team: &str, score: u32) -> PyResult<u8> {
        Ok(self.db.add_score(team, score)?)
    }

    pub fn edit_scores(&mut self, team: &str, scores: Vec<u32>) -> PyResult<()> {
        Ok(self.db.edit_scores(team, scores)?)
    }

    pub fn scores(&self, team: &str) -> PyResult<Vec<u32>> {
        Ok(self.db.scores(team)?.to_vec())
    }

    pub fn opponents(&self, team: &str) -> PyResult<Vec<String>> {
        Ok(self.db.opponents(team)?.into_iter().map(|t| t.name.clone()).collect())
    }

    pub fn teams(&self) -> Vec<String> {
        self.db.teams().into_iter().map(|t| t.name.clone()).collect()
    }

    pub fn set_region_semifinal(&mut self, first: &str, second: &str) -> PyResult<()> {
        Ok(self.db.set_region_semifinal(region(first)?, region(second)?)?)
    }

    pub fn add_player(&mut self, name: &str, spots: u32) -> PyResult<()> {
        Ok(self.db.add_player(name, spots)?)
    }

    pub fn remove_player(&mut self, name: &str) -> bool {
        self.db.remove_player(name).is_some()
    }

    pub fn players(&self) -> Vec<String> {
        self.db.players().iter().map(|p| p.name.clone()).collect()
    }

    pub fn set_paid(&mut self, player: &str, paid: bool) -> PyResult<()> {
        Ok(self.db.set_paid(player, paid)?)
    }

    pub fn set_predicted_score(&mut self, player: &str, score: i32) -> PyResult<()> {
        Ok(self.db.set_predicted_score(player, score)?)
    }

    pub fn add_owned_team(&mut self, player: &str, team: &str) -> PyResult<()> {
        Ok(self.db.add_owned_team(player, team)?)
    }

    pub fn add_pick_four_team(&mut self, player: &str, team: &str) -> PyResult<()> {
        Ok(self.db.add_pick_four_team(player, team)?)
    }

    #[pyo3(signature = (player, team = None))]
    pub fn set_chosen_winner(&mut self, player: &str, team: Option<&str>) -> PyResult<()> {
        Ok(self.db.set_chosen_winner(player, team)?)
    }

    /// Deal every team at random; pass a seed for a repeatable deal.
    #[pyo3(signature = (seed = None))]
    pub fn assign_teams(&mut self, seed: Option<u64>) -> PyResult<()> {
        Ok(self.db.assign_teams(seed)?)
    }

    #[pyo3(signature = (team = None))]
    pub fn set_overtime_loser(&mut self, team: Option<&str>) -> PyResult<()> {
        Ok(self.db.set_overtime_loser(team)?)
    }

    pub fn update(&mut self) {
        self.db.update();
    }

    pub fn prize_money(&self, prize: &str) -> PyResult<f64> {
        Ok(self.db.prize_money(prize_type(prize)?))
    }

    pub fn set_prize_money(&mut self, prize: &str, amount: f64) -> PyResult<()> {
        Ok(self.db.set_prize_money(prize_type(prize)?, amount)?)
    }

    pub fn prize_winners(&self, prize: &str) -> PyResult<Vec<String>> {
        Ok(self.db.prize_winners(prize_type(prize)?).to_vec())
    }

    pub fn balance(&self, player: &str) -> PyResult<f64> {
        self.db
            .find_player(player)
            .map(|p| p.balance())
            .ok_or_else(|| PoolError::PlayerNotFound(player.to_string()).into())
    }

    /// (player, points, potential) rows.
    pub fn pick_four_leaderboard(&self) -> Vec<(String, u32, u32)> {
        self.db
            .pick_four_leaderboard()
            .into_iter()
            .map(|s| (s.player, s.points, s.potential))
            .collect()
    }

    /// (player, teams alive, teams owned) rows.
    pub fn owned_team_leaderboard(&self) -> Vec<(String, usize, usize)> {
        self.db
            .owned_team_leaderboard()
            .into_iter()
            .map(|s| (s.player, s.teams_alive, s.teams_owned))
            .collect()
    }

    pub fn player_report(&self, name: &str) -> PyResult<String> {
        self.db
            .player_report(name)
            .map(|r| r.to_string())
            .ok_or_else(|| PoolError::PlayerNotFound(name.to_string()).into())
    }

    pub fn player_report_json(&self, name: &str) -> PyResult<String> {
        match self.db.player_report(name) {
            Some(report) => Ok(report.to_json()?),
            None => Err(PoolError::PlayerNotFound(name.to_string()).into()),
        }
    }

    pub fn team_report(&self, name: &str) -> PyResult<String> {
        self.db
            .team_report(name)
            .map(|r| r.to_string())
            .ok_or_else(|| PoolError::TeamNotFound(name.to_string()).into())
    }

    pub fn team_report_json(&self, name: &str) -> PyResult<String> {
        match self.db.team_report(name) {
            Some(report) => Ok(report.to_json()?),
            None => Err(PoolError::TeamNotFound(name.to_string()).into()),
        }
    }

    #[getter]
    pub fn spots_remaining(&self) -> u32 {
        self.db.spots_remaining()
    }

    #[getter]
    pub fn champion(&self) -> Option<String> {
        self.db.champion().map(|t| t.name.clone())
    }

    #[getter]
    pub fn title(&self) -> String {
        self.db.config().title.clone()
    }

    #[setter]
    pub fn set_title(&mut self, title: String) {
        self.db.config_mut().title = title;
    }

    #[getter]
    pub fn leaderboard_size(&self) -> i32 {
        self.db.config().leaderboard_size()
    }

    #[setter]
    pub fn set_leaderboard_size(&mut self, size: i32) -> PyResult<()> {
        Ok(self.db.config_mut().set_leaderboard_size(size)?)
    }

    fn __repr__(&self) -> String {
        format!(
            "Pool({} teams, {} players, {} spots open)",
            self.db.bracket().len(),
            self.db.players().len(),
            self.db.spots_remaining()
        )
    }
}

/// Python module definition
#[pymodule]
fn bracket_pool(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyPool>()?;

    m.add("TOTAL_TEAMS", TOTAL_TEAMS)?;
    m.add("ROUNDS", ROUNDS)?;
    m.add(
        "PRIZE_TYPES",
        PrizeType::ALL.iter().map(|p| p.name()).collect::<Vec<_>>(),
    )?;

    Ok(())
}

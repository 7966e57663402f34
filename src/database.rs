//! The pool database: bracket, roster, contests and configuration.

use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::bracket::Bracket;
use crate::config::PoolConfig;
use crate::constants::TOTAL_TEAMS;
use crate::error::{PoolError, PoolResult};
use crate::pick_four;
use crate::player::Player;
use crate::prize::{Contest, PrizeType};
use crate::region::Region;
use crate::report::{GameLine, OwnedTeamStanding, PickFourStanding, PlayerReport, TeamLine, TeamReport};
use crate::settlement::ContestManager;
use crate::team::Team;

/// Everything the pool tracks.
///
/// All mutation goes through `&mut self`; call [`Database::update`] after
/// changes to refresh contest winners and balances.
#[derive(Clone, Debug, Default)]
pub struct Database {
    bracket: Bracket,
    players: Vec<Player>,
    manager: ContestManager,
    config: PoolConfig,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PoolConfig) -> Self {
        Database {
            config,
            ..Self::default()
        }
    }

    pub fn bracket(&self) -> &Bracket {
        &self.bracket
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut PoolConfig {
        &mut self.config
    }

    // --- Teams ---------------------------------------------------------

    pub fn add_team(&mut self, name: &str, seed: u8, region: Region) -> PoolResult<()> {
        self.bracket.add_team(Team::new(name, seed, region)?)
    }

    /// Add a team together with its recorded scores.
    pub fn add_team_with_scores(&mut self, name: &str, seed: u8, region: Region, scores: Vec<u32>) -> PoolResult<()> {
        self.bracket.add_team_with_scores(Team::new(name, seed, region)?, scores)
    }

    /// Remove a team from the bracket and from every player's selections.
    pub fn remove_team(&mut self, name: &str) -> Option<Team> {
        let removed = self.bracket.remove_team(name)?;
        for player in &mut self.players {
            player.forget_team(&removed.name);
        }
        Some(removed)
    }

    /// Move a team to another slot, keeping its score history and every
    /// player's reference to it. A team already in the target slot is removed.
    ///
    /// A move that fails leaves the bracket and every player untouched.
    pub fn move_team(&mut self, name: &str, seed: u8, region: Region) -> PoolResult<()> {
        let team = self
            .bracket
            .find_team(name)
            .cloned()
            .ok_or_else(|| PoolError::TeamNotFound(name.trim().to_string()))?;
        let moved = Team::new(&team.name, seed, region)?;
        if self.bracket.team(seed, region).is_some_and(|t| t.name == team.name) {
            return Ok(());
        }

        let bracket_backup = self.bracket.clone();
        let players_backup = self.players.clone();

        if let Some(occupant) = self.bracket.team(seed, region).map(|t| t.name.clone()) {
            self.remove_team(&occupant);
        }
        let scores = self.bracket.scores(&team.name).map(<[u32]>::to_vec).unwrap_or_default();
        self.bracket.remove_team(&team.name);
        if let Err(e) = self.bracket.add_team_with_scores(moved, scores) {
            warn!("Could not move {} to the {} {} seed: {}", team.name, region, seed, e);
            self.bracket = bracket_backup;
            self.players = players_backup;
            return Err(e);
        }
        info!("Moved {} to the {} {} seed", team.name, region, seed);
        Ok(())
    }

    pub fn find_team(&self, name: &str) -> Option<&Team> {
        self.bracket.find_team(name)
    }

    pub fn team(&self, seed: u8, region: Region) -> Option<&Team> {
        self.bracket.team(seed, region)
    }

    /// Teams sorted by name.
    pub fn teams(&self) -> Vec<&Team> {
        let mut teams: Vec<&Team> = self.bracket.teams().collect();
        teams.sort_by(|a, b| a.name.cmp(&b.name));
        teams
    }

    pub fn scores(&self, team: &str) -> PoolResult<&[u32]> {
        self.bracket
            .scores(team)
            .ok_or_else(|| PoolError::TeamNotFound(team.trim().to_string()))
    }

    pub fn opponents(&self, team: &str) -> PoolResult<Vec<&Team>> {
        self.bracket.opponents(team)
    }

    pub fn add_score(&mut self, team: &str, score: u32) -> PoolResult<u8> {
        self.bracket.add_score(team, score)
    }

    /// Replace a team's score history. A 0 marks the end of the list; it and
    /// everything after it are dropped.
    pub fn edit_scores(&mut self, team: &str, mut scores: Vec<u32>) -> PoolResult<()> {
        if let Some(end) = scores.iter().position(|&s| s == 0) {
            debug!("Truncating scores for {} at game {}", team.trim(), end + 1);
            scores.truncate(end);
        }
        self.bracket.edit_scores(team, scores)
    }

    pub fn champion(&self) -> Option<&Team> {
        self.bracket.champion()
    }

    pub fn final_four(&self) -> Vec<&Team> {
        self.bracket.final_four()
    }

    pub fn region_matchups(&self) -> [Region; 4] {
        self.bracket.regions()
    }

    pub fn set_region_matchups(&mut self, order: [Region; 4]) -> PoolResult<()> {
        self.bracket.set_regions(order)
    }

    /// Pair `first` with `second` in a national semifinal; the other two
    /// regions meet in the remaining one.
    pub fn set_region_semifinal(&mut self, first: Region, second: Region) -> PoolResult<()> {
        let order = Region::pair_semifinal(first, second, &self.bracket.regions())?;
        self.bracket.set_regions(order)
    }

    pub fn bracket_initialized(&self) -> bool {
        self.bracket.is_initialized()
    }

    pub fn tournament_has_begun(&self) -> bool {
        self.bracket.has_begun()
    }

    // --- Players -------------------------------------------------------

    /// Add a player who bought `spots` teams.
    pub fn add_player(&mut self, name: &str, spots: u32) -> PoolResult<()> {
        let player = Player::new(name, spots)?;
        if self.find_player(&player.name).is_some() {
            return Err(PoolError::DuplicateName(player.name));
        }
        let remaining = self.spots_remaining();
        if spots > remaining {
            return Err(PoolError::InsufficientSpots {
                requested: spots,
                remaining,
            });
        }
        if self.config.price_for(spots).is_none() {
            return Err(PoolError::UnpricedSpots(spots));
        }

        info!("Added player {} with {} spot(s)", player.name, spots);
        self.players.push(player);
        self.players.sort_by_key(|p| p.name.to_lowercase());
        Ok(())
    }

    /// Remove a player. Balances of the others refresh on the next update.
    pub fn remove_player(&mut self, name: &str) -> Option<Player> {
        let index = self.players.iter().position(|p| p.is_named(name))?;
        let player = self.players.remove(index);
        info!("Removed player {}", player.name);
        Some(player)
    }

    pub fn find_player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.is_named(name))
    }

    /// Players sorted by name.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn set_paid(&mut self, player: &str, paid: bool) -> PoolResult<()> {
        self.player_mut(player)?.paid = paid;
        Ok(())
    }

    pub fn set_predicted_score(&mut self, player: &str, score: i32) -> PoolResult<()> {
        self.player_mut(player)?.predicted_score = score;
        Ok(())
    }

    /// Unsold spots out of the 64 available.
    pub fn spots_remaining(&self) -> u32 {
        let sold: u32 = self.players.iter().map(|p| p.spots).sum();
        (TOTAL_TEAMS as u32).saturating_sub(sold)
    }

    /// Give `team` to `player`. A team has at most one owner.
    pub fn add_owned_team(&mut self, player: &str, team: &str) -> PoolResult<()> {
        let team = self.team_name(team)?;
        if self.find_player(player).is_none() {
            return Err(PoolError::PlayerNotFound(player.trim().to_string()));
        }
        if let Some(owner) = self.players.iter().find(|p| p.owns(&team) && !p.is_named(player)) {
            return Err(PoolError::AlreadyOwned {
                team,
                owner: owner.name.clone(),
            });
        }
        self.player_mut(player)?.add_owned_team(&team)
    }

    pub fn add_pick_four_team(&mut self, player: &str, team: &str) -> PoolResult<()> {
        let team = self.team_name(team)?;
        self.player_mut(player)?.add_pick_four(&team)
    }

    /// Set or clear a player's pick for overall champion.
    pub fn set_chosen_winner(&mut self, player: &str, team: Option<&str>) -> PoolResult<()> {
        let team = team.map(|t| self.team_name(t)).transpose()?;
        self.player_mut(player)?.chosen_winner = team;
        Ok(())
    }

    /// Randomly deal every team to the players, each receiving as many teams
    /// as spots purchased. A `seed` makes the deal reproducible.
    pub fn assign_teams(&mut self, seed: Option<u64>) -> PoolResult<()> {
        if !self.bracket.is_initialized() {
            return Err(PoolError::AssignmentUnavailable("the bracket is not full"));
        }
        if self.spots_remaining() != 0 {
            return Err(PoolError::AssignmentUnavailable("not every spot has been sold"));
        }

        let mut rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };

        let mut undealt: Vec<String> = self.bracket.teams().map(|t| t.name.clone()).collect();
        for player in &mut self.players {
            player.owned_teams.clear();
            for _ in 0..player.spots {
                if undealt.is_empty() {
                    break;
                }
                let index = rng.gen_range(0..undealt.len());
                player.owned_teams.push(undealt.remove(index));
            }
        }
        info!("Assigned {} teams to {} players", TOTAL_TEAMS, self.players.len());
        Ok(())
    }

    /// True when every spot is sold and every player holds their teams.
    pub fn teams_assigned(&self) -> bool {
        self.spots_remaining() == 0 && self.players.iter().all(|p| p.owned_teams.len() == p.spots as usize)
    }

    // --- Contests ------------------------------------------------------

    /// Recompute contest winners and balances from the current state.
    pub fn update(&mut self) {
        debug!("Updating contests");
        self.manager.update(&self.bracket, &mut self.players, &self.config.pricing);
    }

    pub fn contest(&self, prize: PrizeType) -> &Contest {
        self.manager.contest(prize)
    }

    pub fn prize_winners(&self, prize: PrizeType) -> &[String] {
        self.manager.contest(prize).players()
    }

    pub fn prize_winner_teams(&self, prize: PrizeType) -> &[String] {
        self.manager.contest(prize).teams()
    }

    pub fn prize_money(&self, prize: PrizeType) -> f64 {
        self.manager.prize_money(prize)
    }

    pub fn set_prize_money(&mut self, prize: PrizeType, amount: f64) -> PoolResult<()> {
        self.manager.set_prize_money(prize, amount)
    }

    pub fn overtime_loser(&self) -> Option<&Team> {
        self.manager.overtime_loser().and_then(|name| self.bracket.find_team(name))
    }

    /// Record (or clear) the first team to lose in overtime.
    pub fn set_overtime_loser(&mut self, team: Option<&str>) -> PoolResult<()> {
        let team = team.map(|t| self.team_name(t)).transpose()?;
        self.manager.set_overtime_loser(team);
        Ok(())
    }

    // --- Pick four and leaderboards ------------------------------------

    pub fn pick_four_points(&self, player: &str) -> Option<u32> {
        self.find_player(player)
            .map(|p| pick_four::points(&self.bracket, &p.pick_four))
    }

    pub fn potential_pick_four_points(&self, player: &str) -> Option<u32> {
        self.find_player(player)
            .map(|p| pick_four::potential_points(&self.bracket, &p.pick_four))
    }

    /// Players by pick-four points, ties broken by points still available.
    pub fn pick_four_leaderboard(&self) -> Vec<PickFourStanding> {
        self.pick_four_leaderboard_sized(self.config.leaderboard_limit())
    }

    pub fn pick_four_leaderboard_sized(&self, limit: Option<usize>) -> Vec<PickFourStanding> {
        let mut standings: Vec<PickFourStanding> = self
            .players
            .iter()
            .map(|p| PickFourStanding {
                player: p.name.clone(),
                points: pick_four::points(&self.bracket, &p.pick_four),
                potential: pick_four::potential_points(&self.bracket, &p.pick_four),
            })
            .collect();
        standings.sort_by(|a, b| b.points.cmp(&a.points).then(b.potential.cmp(&a.potential)));
        if let Some(limit) = limit {
            standings.truncate(limit);
        }
        standings
    }

    /// Players by number of owned teams still alive.
    pub fn owned_team_leaderboard(&self) -> Vec<OwnedTeamStanding> {
        let mut standings: Vec<OwnedTeamStanding> = self
            .players
            .iter()
            .map(|p| OwnedTeamStanding {
                player: p.name.clone(),
                teams_alive: p
                    .owned_teams
                    .iter()
                    .filter_map(|t| self.bracket.find_team(t))
                    .filter(|t| t.is_alive())
                    .count(),
                teams_owned: p.owned_teams.len(),
            })
            .collect();
        standings.sort_by(|a, b| b.teams_alive.cmp(&a.teams_alive));
        if let Some(limit) = self.config.leaderboard_limit() {
            standings.truncate(limit);
        }
        standings
    }

    // --- Reports -------------------------------------------------------

    pub fn player_report(&self, name: &str) -> Option<PlayerReport> {
        let player = self.find_player(name)?;
        let lines = |names: &[String]| -> Vec<TeamLine> {
            names
                .iter()
                .filter_map(|n| self.bracket.find_team(n))
                .map(TeamLine::from)
                .collect()
        };

        Some(PlayerReport {
            name: player.name.clone(),
            balance: player.balance(),
            predicted_score: player.predicted_score,
            paid: player.paid,
            chosen_winner: player
                .chosen_winner()
                .and_then(|t| self.bracket.find_team(t))
                .map(TeamLine::from),
            owned_teams: lines(&player.owned_teams),
            pick_four: lines(&player.pick_four),
            pick_four_points: pick_four::points(&self.bracket, &player.pick_four),
            potential_points: self
                .bracket
                .is_initialized()
                .then(|| pick_four::potential_points(&self.bracket, &player.pick_four)),
        })
    }

    pub fn team_report(&self, name: &str) -> Option<TeamReport> {
        let team = self.bracket.find_team(name)?;
        let scores = self.bracket.scores(&team.name).unwrap_or_default();
        let opponents = self.bracket.opponents(&team.name).unwrap_or_default();

        let games = scores
            .iter()
            .zip(opponents)
            .enumerate()
            .filter_map(|(i, (&score, opponent))| {
                let opponent_score = *self.bracket.scores(&opponent.name)?.get(i)?;
                Some(GameLine {
                    round: i as u8 + 1,
                    score,
                    opponent: TeamLine::from(opponent),
                    opponent_score,
                })
            })
            .collect();

        Some(TeamReport {
            name: team.name.clone(),
            seed: team.seed,
            region: team.region,
            wins: team.wins(),
            alive: team.is_alive(),
            games,
            possible_wins: team.possible_wins(),
        })
    }

    fn player_mut(&mut self, name: &str) -> PoolResult<&mut Player> {
        self.players
            .iter_mut()
            .find(|p| p.is_named(name))
            .ok_or_else(|| PoolError::PlayerNotFound(name.trim().to_string()))
    }

    /// Canonical name of an existing team.
    fn team_name(&self, name: &str) -> PoolResult<String> {
        self.bracket
            .find_team(name)
            .map(|t| t.name.clone())
            .ok_or_else(|| PoolError::TeamNotFound(name.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{team_name, play_chalk_tournament};

    fn full_database() -> Database {
        let mut db = Database::new();
        for region in Region::ALL {
            for seed in 1..=16 {
                db.add_team(&team_name(region, seed), seed, region).unwrap();
            }
        }
        db
    }

    #[test]
    fn test_add_player_rejections() {
        let mut db = Database::new();
        db.add_player("Ann", 5).unwrap();
        assert!(matches!(db.add_player("ann ", 1), Err(PoolError::DuplicateName(_))));
        assert!(matches!(db.add_player("Bob", 6), Err(PoolError::UnpricedSpots(6))));
        assert!(matches!(db.add_player("", 1), Err(PoolError::InvalidName(_))));
        assert!(matches!(db.add_player("Bob", 0), Err(PoolError::InvalidSpots(0))));

        for i in 0..11 {
            db.add_player(&format!("Player {}", i), 5).unwrap();
        }
        assert_eq!(db.spots_remaining(), 4);
        assert!(matches!(
            db.add_player("Late", 5),
            Err(PoolError::InsufficientSpots { requested: 5, remaining: 4 })
        ));
    }

    #[test]
    fn test_players_sorted_by_name() {
        let mut db = Database::new();
        for name in ["cat", "Ann", "bob"] {
            db.add_player(name, 1).unwrap();
        }
        let names: Vec<&str> = db.players().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Ann", "bob", "cat"]);
    }

    #[test]
    fn test_remove_team_cascades() {
        let mut db = full_database();
        let duke = team_name(Region::East, 2);
        db.add_player("Ann", 1).unwrap();
        db.add_owned_team("Ann", &duke).unwrap();
        db.add_pick_four_team("Ann", &duke.to_lowercase()).unwrap();
        db.set_chosen_winner("Ann", Some(&duke)).unwrap();

        db.remove_team(&duke).unwrap();
        let ann = db.find_player("Ann").unwrap();
        assert!(ann.owned_teams().is_empty());
        assert!(ann.pick_four().is_empty());
        assert_eq!(ann.chosen_winner(), None);
    }

    #[test]
    fn test_selection_errors() {
        let mut db = full_database();
        db.add_player("Ann", 1).unwrap();
        db.add_player("Bob", 1).unwrap();
        let team = team_name(Region::West, 3);

        db.add_owned_team("Ann", &team).unwrap();
        assert!(matches!(db.add_owned_team("Bob", &team), Err(PoolError::AlreadyOwned { .. })));
        assert!(matches!(
            db.add_owned_team("Ann", &team_name(Region::West, 4)),
            Err(PoolError::OwnedTeamsFull { .. })
        ));
        assert!(matches!(db.add_owned_team("Zed", &team), Err(PoolError::PlayerNotFound(_))));
        assert!(matches!(db.add_pick_four_team("Ann", "Nowhere"), Err(PoolError::TeamNotFound(_))));
        // Pick-four picks may overlap between players
        db.add_pick_four_team("Ann", &team).unwrap();
        db.add_pick_four_team("Bob", &team).unwrap();
    }

    #[test]
    fn test_assign_teams_is_seeded() {
        let mut db = full_database();
        assert!(matches!(db.assign_teams(Some(7)), Err(PoolError::AssignmentUnavailable(_))));
        for i in 0..16 {
            db.add_player(&format!("Player {:02}", i), 4).unwrap();
        }
        db.assign_teams(Some(7)).unwrap();
        assert!(db.teams_assigned());

        let first: Vec<Vec<String>> = db.players().iter().map(|p| p.owned_teams().to_vec()).collect();
        let mut all: Vec<&String> = first.iter().flatten().collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 64);

        db.assign_teams(Some(7)).unwrap();
        let second: Vec<Vec<String>> = db.players().iter().map(|p| p.owned_teams().to_vec()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_move_team_keeps_scores_and_references() {
        let mut db = full_database();
        let mover = team_name(Region::East, 5);
        let occupant = team_name(Region::West, 5);
        db.add_player("Ann", 1).unwrap();
        db.add_owned_team("Ann", &occupant).unwrap();
        db.add_pick_four_team("Ann", &mover).unwrap();

        db.move_team(&mover, 5, Region::West).unwrap();
        assert_eq!(db.team(5, Region::West).unwrap().name, mover);
        assert!(db.team(5, Region::East).is_none());
        assert!(db.find_team(&occupant).is_none());
        let ann = db.find_player("Ann").unwrap();
        assert!(ann.owned_teams().is_empty());
        assert_eq!(ann.pick_four(), &[mover]);
    }

    #[test]
    fn test_failed_move_team_keeps_occupant() {
        let mut db = full_database();
        let mover = team_name(Region::East, 5);
        let occupant = team_name(Region::West, 5);
        let opponent = team_name(Region::West, 12);
        db.add_score(&mover, 70).unwrap();
        db.add_score(&opponent, 70).unwrap();
        db.add_player("Ann", 1).unwrap();
        db.add_owned_team("Ann", &occupant).unwrap();
        db.set_chosen_winner("Ann", Some(&occupant)).unwrap();

        // The mover would tie the West 12 seed in round one
        assert!(matches!(
            db.move_team(&mover, 5, Region::West),
            Err(PoolError::TiedScore { round: 1, .. })
        ));
        assert_eq!(db.team(5, Region::West).unwrap().name, occupant);
        assert_eq!(db.team(5, Region::East).unwrap().name, mover);
        assert_eq!(db.scores(&mover).unwrap(), &[70]);
        let ann = db.find_player("Ann").unwrap();
        assert_eq!(ann.owned_teams(), &[occupant.clone()]);
        assert_eq!(ann.chosen_winner(), Some(occupant.as_str()));
    }

    #[test]
    fn test_edit_scores_stops_at_zero() {
        let mut db = full_database();
        let one = team_name(Region::Midwest, 1);
        db.add_score(&team_name(Region::Midwest, 16), 50).unwrap();
        db.edit_scores(&one, vec![80, 0, 75]).unwrap();
        assert_eq!(db.scores(&one).unwrap(), &[80]);
        assert_eq!(db.find_team(&one).unwrap().wins(), 1);

        db.edit_scores(&one, vec![0]).unwrap();
        assert!(db.scores(&one).unwrap().is_empty());
        assert!(db.find_team(&team_name(Region::Midwest, 16)).unwrap().is_alive());
    }

    #[test]
    fn test_end_to_end_chosen_winner_full_prize() {
        let mut db = full_database();
        db.add_player("Ann", 1).unwrap();
        db.set_predicted_score("Ann", 70).unwrap();

        // Chalk all the way, then the final is corrected to 75-70
        let mut bracket = db.bracket.clone();
        let champ = play_chalk_tournament(&mut bracket);
        let runner_up = bracket.opponents(&champ).unwrap()[5].name.clone();
        db.bracket = bracket;
        for (team, score) in [(&champ, 75), (&runner_up, 70)] {
            let mut scores = db.scores(team).unwrap().to_vec();
            *scores.last_mut().unwrap() = score;
            db.edit_scores(team, scores).unwrap();
        }
        assert_eq!(db.champion().unwrap().name, champ);

        db.set_chosen_winner("Ann", Some(&champ)).unwrap();
        db.set_paid("Ann", true).unwrap();
        db.update();
        assert_eq!(db.prize_winners(PrizeType::ChosenWinner), &["Ann".to_string()]);
        assert_eq!(db.find_player("Ann").unwrap().balance(), db.prize_money(PrizeType::ChosenWinner));
    }

    #[test]
    fn test_split_prize_sums_to_prize_money() {
        let mut db = full_database();
        for name in ["Ann", "Bob", "Cat"] {
            db.add_player(name, 1).unwrap();
            db.set_paid(name, true).unwrap();
            db.set_predicted_score(name, 130).unwrap();
        }
        let mut bracket = db.bracket.clone();
        let champ = play_chalk_tournament(&mut bracket);
        db.bracket = bracket;
        for name in ["Ann", "Bob", "Cat"] {
            db.set_chosen_winner(name, Some(&champ)).unwrap();
        }
        db.set_prize_money(PrizeType::ChosenWinner, 25.0).unwrap();
        db.update();

        assert_eq!(db.prize_winners(PrizeType::ChosenWinner).len(), 3);
        let total: f64 = db.players().iter().map(Player::balance).sum();
        assert!((total - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_leaderboards() {
        let mut db = full_database();
        let r = Region::South;
        for name in ["Ann", "Bob", "Cat"] {
            db.add_player(name, 2).unwrap();
        }
        db.add_score(&team_name(r, 12), 70).unwrap();
        db.add_score(&team_name(r, 5), 60).unwrap();
        db.add_score(&team_name(r, 1), 70).unwrap();
        db.add_score(&team_name(r, 16), 60).unwrap();

        db.add_pick_four_team("Ann", &team_name(r, 1)).unwrap();
        db.add_pick_four_team("Bob", &team_name(r, 12)).unwrap();
        db.add_pick_four_team("Cat", &team_name(r, 12)).unwrap();
        db.add_pick_four_team("Cat", &team_name(r, 2)).unwrap();

        db.config_mut().set_leaderboard_size(-1).unwrap();
        let board: Vec<String> = db.pick_four_leaderboard().into_iter().map(|s| s.player).collect();
        // Bob and Cat tie on points; Cat still has the 2 seed alive
        assert_eq!(board, vec!["Cat", "Bob", "Ann"]);

        db.config_mut().set_leaderboard_size(1).unwrap();
        assert_eq!(db.pick_four_leaderboard().len(), 1);

        db.add_owned_team("Ann", &team_name(r, 16)).unwrap();
        db.add_owned_team("Bob", &team_name(r, 12)).unwrap();
        db.add_owned_team("Bob", &team_name(r, 1)).unwrap();
        db.config_mut().set_leaderboard_size(-1).unwrap();
        let owned = db.owned_team_leaderboard();
        assert_eq!(owned[0].player, "Bob");
        assert_eq!(owned[0].teams_alive, 2);
        assert_eq!(owned[1].player, "Ann");
        assert_eq!(owned[1].teams_alive, 0);
    }

    #[test]
    fn test_reports() {
        let mut db = full_database();
        let r = Region::Midwest;
        db.add_score(&team_name(r, 1), 82).unwrap();
        db.add_score(&team_name(r, 16), 55).unwrap();
        db.add_player("Ann", 1).unwrap();
        db.add_owned_team("Ann", &team_name(r, 1)).unwrap();
        db.update();

        let team = db.team_report(&team_name(r, 1)).unwrap();
        assert_eq!(team.games.len(), 1);
        assert_eq!(team.games[0].opponent_score, 55);
        assert_eq!(team.possible_wins, 5);

        let player = db.player_report("ann").unwrap();
        assert_eq!(player.owned_teams.len(), 1);
        assert!(player.owned_teams[0].alive);
        assert_eq!(player.potential_points, Some(0));
        assert!(db.player_report("nobody").is_none());
    }
}

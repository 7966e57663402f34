//! Contest settlement.
//!
//! Every call to [`ContestManager::update`] throws away the previous winners
//! and balances and recomputes them from the bracket and roster alone, so it
//! is safe to run after every score change.

use log::{debug, warn};

use crate::bracket::Bracket;
use crate::constants::{MIN_CINDERELLA_SEED, ROUNDS};
use crate::error::PoolResult;
use crate::pick_four;
use crate::player::Player;
use crate::prize::{Contest, Contests, PrizeType};
use crate::team::Team;

/// Prize money, winners and the externally reported overtime loser.
#[derive(Clone, Debug, Default)]
pub struct ContestManager {
    contests: Contests,
    overtime_loser: Option<String>,
}

/// Leader of the cinderella race so far.
#[derive(Default)]
struct CinderellaRace {
    wins: u8,
    seed: Option<u8>,
}

/// Players holding the highest and second-highest distinct pick-four scores.
#[derive(Default)]
struct PickFourRace {
    top_score: u32,
    top: Vec<String>,
    second_score: u32,
    second: Vec<String>,
}

impl PickFourRace {
    fn observe(&mut self, player: &str, score: u32) {
        if score > self.top_score {
            self.second = std::mem::take(&mut self.top);
            self.second_score = self.top_score;
            self.top.push(player.to_string());
            self.top_score = score;
        } else if score == self.top_score {
            self.top.push(player.to_string());
        } else if score > self.second_score {
            self.second = vec![player.to_string()];
            self.second_score = score;
        } else if score == self.second_score {
            self.second.push(player.to_string());
        }
    }
}

impl ContestManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contests(&self) -> &Contests {
        &self.contests
    }

    pub fn contest(&self, prize: PrizeType) -> &Contest {
        self.contests.get(prize)
    }

    pub fn prize_money(&self, prize: PrizeType) -> f64 {
        self.contests.get(prize).prize_money()
    }

    pub fn set_prize_money(&mut self, prize: PrizeType, amount: f64) -> PoolResult<()> {
        self.contests.get_mut(prize).set_prize_money(amount)
    }

    pub fn overtime_loser(&self) -> Option<&str> {
        self.overtime_loser.as_deref()
    }

    /// Set (or clear) the team that lost the first overtime game.
    pub fn set_overtime_loser(&mut self, team: Option<String>) {
        self.overtime_loser = team;
    }

    /// Recompute every contest's winners and every player's balance.
    ///
    /// `pricing[n]` is the entry price for a player holding `n` spots.
    pub fn update(&mut self, bracket: &Bracket, players: &mut [Player], pricing: &[f64]) {
        self.contests.clear_winners();

        let mut final_four: Vec<&Team> = bracket.final_four();
        let champion = bracket.champion();
        let blowout = first_round_blowout(bracket);

        let mut cinderella = CinderellaRace::default();
        let mut race = PickFourRace::default();

        for player in players.iter() {
            for owned in &player.owned_teams {
                let Some(team) = bracket.find_team(owned) else {
                    continue;
                };

                if let Some(i) = final_four.iter().position(|t| t.name == team.name) {
                    final_four.remove(i);
                    self.award(PrizeType::FinalFourTeam, player, team);
                }
                if champion.is_some_and(|c| c.name == team.name) {
                    self.award(PrizeType::ChampionTeam, player, team);
                }
                if self.overtime_loser.as_deref().is_some_and(|n| team.is_named(n)) {
                    self.award(PrizeType::FirstOvertimeLoss, player, team);
                }
                if blowout.iter().any(|n| *n == team.name) {
                    self.award(PrizeType::FirstRoundBlowout, player, team);
                }
                if team.wins() > 0 {
                    self.award(PrizeType::WonFirstGame, player, team);
                }
                self.check_cinderella(&mut cinderella, player, team);
            }

            if let (Some(champ), Some(chosen)) = (champion, player.chosen_winner()) {
                if champ.is_named(chosen) {
                    self.award(PrizeType::ChosenWinner, player, champ);
                }
            }

            race.observe(&player.name, pick_four::points(bracket, &player.pick_four));
        }

        if self.contests.get(PrizeType::ChosenWinner).players.len() > 1 {
            self.break_chosen_winner_tie(bracket, players);
        }
        self.settle_pick_four(race, players.len());
        self.update_balances(players, pricing);

        debug!(
            "Settled contests for {} players ({} teams, champion: {})",
            players.len(),
            bracket.len(),
            champion.map_or("undecided", |t| t.name.as_str())
        );
    }

    fn award(&mut self, prize: PrizeType, player: &Player, team: &Team) {
        self.contests.get_mut(prize).award(&player.name, &team.name);
    }

    fn check_cinderella(&mut self, race: &mut CinderellaRace, player: &Player, team: &Team) {
        if team.seed < MIN_CINDERELLA_SEED {
            return;
        }
        let wins = team.wins();
        let contest = self.contests.get_mut(PrizeType::CinderellaTeam);
        let overtakes = wins > race.wins
            || (race.wins != 0 && wins == race.wins && race.seed.map_or(true, |seed| team.seed > seed));

        if overtakes {
            contest.clear();
            contest.award(&player.name, &team.name);
            race.wins = wins;
            race.seed = Some(team.seed);
        } else if race.wins != 0 && wins == race.wins && race.seed == Some(team.seed) {
            contest.award(&player.name, &team.name);
        }
    }

    /// Keep only the U-Pick-It winners closest to the championship game total.
    fn break_chosen_winner_tie(&mut self, bracket: &Bracket, players: &[Player]) {
        let Some(actual) = championship_total(bracket) else {
            warn!("Champion decided without a recorded final score; tiebreak skipped");
            return;
        };

        let contest = self.contests.get_mut(PrizeType::ChosenWinner);
        let distance = |name: &String| {
            players
                .iter()
                .find(|p| p.is_named(name))
                .map_or(i64::MAX, |p| (p.predicted_score as i64 - actual).abs())
        };
        let Some(closest) = contest.players.iter().map(distance).min() else {
            return;
        };

        let (players_kept, teams_kept): (Vec<String>, Vec<String>) = contest
            .players
            .iter()
            .zip(contest.teams.iter())
            .filter(|(name, _)| distance(name) == closest)
            .map(|(p, t)| (p.clone(), t.clone()))
            .unzip();
        contest.players = players_kept;
        contest.teams = teams_kept;
    }

    fn settle_pick_four(&mut self, mut race: PickFourRace, player_count: usize) {
        let champions = race.top.len();
        // A bucket made up of every player at zero points has no real winner
        if !race.top.is_empty() && champions == player_count && race.top_score == 0 {
            race.top.clear();
        }
        if !race.second.is_empty() && race.second.len() + champions == player_count && race.second_score == 0 {
            race.second.clear();
        }
        self.contests.get_mut(PrizeType::PickFourChampion).players = race.top;
        self.contests.get_mut(PrizeType::PickFourRunnerUp).players = race.second;
    }

    fn update_balances(&mut self, players: &mut [Player], pricing: &[f64]) {
        for player in players.iter_mut() {
            player.balance = if player.paid {
                0.0
            } else {
                match pricing.get(player.spots as usize) {
                    Some(price) => -price,
                    None => {
                        warn!("No price configured for {} spots ({})", player.spots, player.name);
                        0.0
                    }
                }
            };
        }

        for prize in PrizeType::ALL {
            let contest = self.contests.get(prize);
            let earnings = if prize == PrizeType::PickFourChampion && contest.players.len() > 1 {
                // Tied champions absorb the runner-up pool
                let pool = contest.prize_money() + self.contests.get(PrizeType::PickFourRunnerUp).prize_money();
                let share = pool / contest.players.len() as f64;
                self.contests.get_mut(PrizeType::PickFourRunnerUp).clear();
                share
            } else {
                contest.payout()
            };

            for name in &self.contests.get(prize).players {
                if let Some(player) = players.iter_mut().find(|p| p.is_named(name)) {
                    player.balance += earnings;
                }
            }
        }
    }
}

/// Losing team(s) of the widest first-round margin.
fn first_round_blowout(bracket: &Bracket) -> Vec<String> {
    let mut widest = 0i64;
    let mut losers = Vec::new();

    for team in bracket.teams().filter(|t| t.wins() > 0) {
        let Some(opponent) = bracket.opponents(&team.name).ok().and_then(|o| o.first().copied()) else {
            continue;
        };
        let first = |name: &str| bracket.scores(name).and_then(|s| s.first().copied());
        let (Some(score), Some(opp_score)) = (first(&team.name), first(&opponent.name)) else {
            continue;
        };

        let margin = score as i64 - opp_score as i64;
        if margin > widest {
            widest = margin;
            losers = vec![opponent.name.clone()];
        } else if margin == widest {
            losers.push(opponent.name.clone());
        }
    }
    losers
}

/// Combined score of the championship game, once a champion exists.
fn championship_total(bracket: &Bracket) -> Option<i64> {
    let champion = bracket.champion()?;
    let opponents = bracket.opponents(&champion.name).ok()?;
    let runner_up = opponents.get(ROUNDS as usize - 1)?;
    let champ_score = *bracket.scores(&champion.name)?.last()?;
    let runner_up_score = *bracket.scores(&runner_up.name)?.last()?;
    Some(champ_score as i64 + runner_up_score as i64)
}

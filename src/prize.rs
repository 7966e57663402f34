//! Prize contests and their static metadata.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{PoolError, PoolResult};

/// The nine side contests paid out by the pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PrizeType {
    ChosenWinner,
    CinderellaTeam,
    FirstOvertimeLoss,
    FirstRoundBlowout,
    WonFirstGame,
    FinalFourTeam,
    ChampionTeam,
    PickFourChampion,
    PickFourRunnerUp,
}

impl PrizeType {
    /// Every prize type, in settlement order.
    pub const ALL: [PrizeType; 9] = [
        PrizeType::ChosenWinner,
        PrizeType::CinderellaTeam,
        PrizeType::FirstOvertimeLoss,
        PrizeType::FirstRoundBlowout,
        PrizeType::WonFirstGame,
        PrizeType::FinalFourTeam,
        PrizeType::ChampionTeam,
        PrizeType::PickFourChampion,
        PrizeType::PickFourRunnerUp,
    ];

    pub fn ordinal(&self) -> usize {
        match self {
            PrizeType::ChosenWinner => 0,
            PrizeType::CinderellaTeam => 1,
            PrizeType::FirstOvertimeLoss => 2,
            PrizeType::FirstRoundBlowout => 3,
            PrizeType::WonFirstGame => 4,
            PrizeType::FinalFourTeam => 5,
            PrizeType::ChampionTeam => 6,
            PrizeType::PickFourChampion => 7,
            PrizeType::PickFourRunnerUp => 8,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PrizeType::ChosenWinner => "U-Pick-It",
            PrizeType::CinderellaTeam => "Cinderella",
            PrizeType::FirstOvertimeLoss => "Hard-Luck Loser",
            PrizeType::FirstRoundBlowout => "Just Glad To Be Here",
            PrizeType::WonFirstGame => "Won First Game",
            PrizeType::FinalFourTeam => "Final Four Team",
            PrizeType::ChampionTeam => "Championship Team",
            PrizeType::PickFourChampion => "Pick Four Contest Champion",
            PrizeType::PickFourRunnerUp => "Pick Four Contest Runner-Up",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PrizeType::ChosenWinner => "The player(s) who correctly select the\nteam that won the NCAA tournament.",
            PrizeType::CinderellaTeam => "The player(s) with the furthest advancing\nteam ranked 9-16",
            PrizeType::FirstOvertimeLoss => "The player who owns the first team to lose\nin overtime",
            PrizeType::FirstRoundBlowout => {
                "The player(s) who own the team that lost by\nthe largest margin in the first round"
            }
            PrizeType::WonFirstGame => "The players whose team(s) have won at least\none game",
            PrizeType::FinalFourTeam => "The players whose team(s) made it to the\nfinal four",
            PrizeType::ChampionTeam => "The player who owns the team that won the\nNCAA tournament",
            PrizeType::PickFourChampion => "The player(s) whose pick four teams scored the\nmost points",
            PrizeType::PickFourRunnerUp => "The player(s) whose pick four teams scored the\nsecond most points",
        }
    }

    pub fn tiebreaker(&self) -> &'static str {
        match self {
            PrizeType::ChosenWinner => "Predicted Championship Score.",
            PrizeType::CinderellaTeam
            | PrizeType::FirstRoundBlowout
            | PrizeType::PickFourChampion
            | PrizeType::PickFourRunnerUp => "None. Split Prize.",
            _ => "N/A",
        }
    }

    pub fn default_prize(&self) -> f64 {
        match self {
            PrizeType::ChosenWinner => 20.0,
            PrizeType::CinderellaTeam => 10.0,
            PrizeType::FirstOvertimeLoss => 10.0,
            PrizeType::FirstRoundBlowout => 20.0,
            PrizeType::WonFirstGame => 5.0,
            PrizeType::FinalFourTeam => 20.0,
            PrizeType::ChampionTeam => 80.0,
            PrizeType::PickFourChampion => 30.0,
            PrizeType::PickFourRunnerUp => 10.0,
        }
    }

    /// Whether winners share the prize or each occurrence is paid in full.
    pub fn split_prize(&self) -> bool {
        !matches!(
            self,
            PrizeType::FirstOvertimeLoss | PrizeType::WonFirstGame | PrizeType::FinalFourTeam | PrizeType::ChampionTeam
        )
    }

    /// Look up a prize type by its legacy lower-case key, e.g. "won first game".
    pub fn from_key(key: &str) -> Option<PrizeType> {
        match key.trim().to_lowercase().as_str() {
            "chosen winner" => Some(PrizeType::ChosenWinner),
            "cinderella team" => Some(PrizeType::CinderellaTeam),
            "first overtime loss" => Some(PrizeType::FirstOvertimeLoss),
            "first round blowout" => Some(PrizeType::FirstRoundBlowout),
            "won first game" => Some(PrizeType::WonFirstGame),
            "final four team" => Some(PrizeType::FinalFourTeam),
            "champion team" => Some(PrizeType::ChampionTeam),
            "pick four winner" => Some(PrizeType::PickFourChampion),
            "pick four runnerup" => Some(PrizeType::PickFourRunnerUp),
            _ => None,
        }
    }
}

impl fmt::Display for PrizeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Prize money and current winners for one prize type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contest {
    prize_money: f64,
    split_prize: bool,
    /// One entry per winning occurrence; a player may repeat
    pub(crate) players: Vec<String>,
    pub(crate) teams: Vec<String>,
}

impl Contest {
    pub fn new(prize_money: f64, split_prize: bool) -> Self {
        Contest {
            prize_money,
            split_prize,
            players: Vec::new(),
            teams: Vec::new(),
        }
    }

    pub fn prize_money(&self) -> f64 {
        self.prize_money
    }

    pub fn set_prize_money(&mut self, prize_money: f64) -> PoolResult<()> {
        if !prize_money.is_finite() || prize_money <= 0.0 {
            return Err(PoolError::InvalidPrizeAmount(prize_money));
        }
        self.prize_money = prize_money;
        Ok(())
    }

    pub fn split_prize(&self) -> bool {
        self.split_prize
    }

    pub fn players(&self) -> &[String] {
        &self.players
    }

    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    /// Number of times `player` appears among the winners.
    pub fn instances_of(&self, player: &str) -> usize {
        self.players.iter().filter(|p| p.eq_ignore_ascii_case(player)).count()
    }

    pub(crate) fn award(&mut self, player: &str, team: &str) {
        self.players.push(player.to_string());
        self.teams.push(team.to_string());
    }

    pub(crate) fn clear(&mut self) {
        self.players.clear();
        self.teams.clear();
    }

    /// Amount credited per winning occurrence.
    pub fn payout(&self) -> f64 {
        if self.split_prize && !self.players.is_empty() {
            self.prize_money / self.players.len() as f64
        } else {
            self.prize_money
        }
    }
}

/// One contest per prize type, addressed by the type itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contests {
    chosen_winner: Contest,
    cinderella_team: Contest,
    first_overtime_loss: Contest,
    first_round_blowout: Contest,
    won_first_game: Contest,
    final_four_team: Contest,
    champion_team: Contest,
    pick_four_champion: Contest,
    pick_four_runner_up: Contest,
}

impl Default for Contests {
    fn default() -> Self {
        let contest = |p: PrizeType| Contest::new(p.default_prize(), p.split_prize());
        Contests {
            chosen_winner: contest(PrizeType::ChosenWinner),
            cinderella_team: contest(PrizeType::CinderellaTeam),
            first_overtime_loss: contest(PrizeType::FirstOvertimeLoss),
            first_round_blowout: contest(PrizeType::FirstRoundBlowout),
            won_first_game: contest(PrizeType::WonFirstGame),
            final_four_team: contest(PrizeType::FinalFourTeam),
            champion_team: contest(PrizeType::ChampionTeam),
            pick_four_champion: contest(PrizeType::PickFourChampion),
            pick_four_runner_up: contest(PrizeType::PickFourRunnerUp),
        }
    }
}

impl Contests {
    pub fn get(&self, prize: PrizeType) -> &Contest {
        match prize {
            PrizeType::ChosenWinner => &self.chosen_winner,
            PrizeType::CinderellaTeam => &self.cinderella_team,
            PrizeType::FirstOvertimeLoss => &self.first_overtime_loss,
            PrizeType::FirstRoundBlowout => &self.first_round_blowout,
            PrizeType::WonFirstGame => &self.won_first_game,
            PrizeType::FinalFourTeam => &self.final_four_team,
            PrizeType::ChampionTeam => &self.champion_team,
            PrizeType::PickFourChampion => &self.pick_four_champion,
            PrizeType::PickFourRunnerUp => &self.pick_four_runner_up,
        }
    }

    pub fn get_mut(&mut self, prize: PrizeType) -> &mut Contest {
        match prize {
            PrizeType::ChosenWinner => &mut self.chosen_winner,
            PrizeType::CinderellaTeam => &mut self.cinderella_team,
            PrizeType::FirstOvertimeLoss => &mut self.first_overtime_loss,
            PrizeType::FirstRoundBlowout => &mut self.first_round_blowout,
            PrizeType::WonFirstGame => &mut self.won_first_game,
            PrizeType::FinalFourTeam => &mut self.final_four_team,
            PrizeType::ChampionTeam => &mut self.champion_team,
            PrizeType::PickFourChampion => &mut self.pick_four_champion,
            PrizeType::PickFourRunnerUp => &mut self.pick_four_runner_up,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (PrizeType, &Contest)> {
        PrizeType::ALL.into_iter().map(move |p| (p, self.get(p)))
    }

    pub(crate) fn clear_winners(&mut self) {
        for prize in PrizeType::ALL {
            self.get_mut(prize).clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_are_dense() {
        for (i, prize) in PrizeType::ALL.iter().enumerate() {
            assert_eq!(prize.ordinal(), i);
        }
    }

    #[test]
    fn test_from_key() {
        assert_eq!(PrizeType::from_key(" Won First Game "), Some(PrizeType::WonFirstGame));
        assert_eq!(PrizeType::from_key("pick four winner"), Some(PrizeType::PickFourChampion));
        assert_eq!(PrizeType::from_key("pick four runnerup"), Some(PrizeType::PickFourRunnerUp));
        assert_eq!(PrizeType::from_key("best mascot"), None);
    }

    #[test]
    fn test_contest_payout() {
        let mut contest = Contest::new(30.0, true);
        contest.award("Ann", "Duke");
        contest.award("Bob", "Duke");
        contest.award("Cat", "Duke");
        assert!((contest.payout() - 10.0).abs() < 1e-10);

        let mut full = Contest::new(5.0, false);
        full.award("Ann", "Duke");
        full.award("Ann", "Kansas");
        assert_eq!(full.payout(), 5.0);
        assert_eq!(full.instances_of("ann"), 2);
    }

    #[test]
    fn test_set_prize_money_rejects_non_positive() {
        let mut contest = Contest::new(10.0, true);
        assert!(contest.set_prize_money(0.0).is_err());
        assert!(contest.set_prize_money(-4.0).is_err());
        assert!(contest.set_prize_money(f64::NAN).is_err());
        contest.set_prize_money(12.5).unwrap();
        assert_eq!(contest.prize_money(), 12.5);
    }

    #[test]
    fn test_contests_defaults_match_metadata() {
        let contests = Contests::default();
        for (prize, contest) in contests.iter() {
            assert_eq!(contest.prize_money(), prize.default_prize());
            assert_eq!(contest.split_prize(), prize.split_prize());
            assert!(contest.players().is_empty());
        }
        assert!(!PrizeType::WonFirstGame.split_prize());
        assert!(PrizeType::ChosenWinner.split_prize());
    }
}

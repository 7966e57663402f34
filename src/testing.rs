//! Fixtures shared by the unit tests.

use crate::bracket::Bracket;
use crate::region::Region;
use crate::team::Team;

pub fn team_name(region: Region, seed: u8) -> String {
    format!("{} {}", region, seed)
}

/// A full 64-team bracket named "<Region> <seed>".
pub fn full_bracket() -> Bracket {
    let mut bracket = Bracket::new();
    for region in Region::ALL {
        for seed in 1..=16 {
            bracket
                .add_team(Team::new(&team_name(region, seed), seed, region).unwrap())
                .unwrap();
        }
    }
    bracket
}

/// Play the next game between `winner` and `loser`, 70-60.
pub fn play(bracket: &mut Bracket, winner: &str, loser: &str) {
    play_with(bracket, winner, 70, loser, 60);
}

pub fn play_with(bracket: &mut Bracket, winner: &str, winner_score: u32, loser: &str, loser_score: u32) {
    bracket.add_score(winner, winner_score).unwrap();
    bracket.add_score(loser, loser_score).unwrap();
}

/// Play out the remainder of the tournament with the better seed always
/// winning (name order among equal seeds). Returns the champion's name.
pub fn play_chalk_tournament(bracket: &mut Bracket) -> String {
    for round in 1..=6u8 {
        let mut games = Vec::new();
        for team in bracket.teams() {
            if !team.is_alive() || team.wins() != round - 1 {
                continue;
            }
            let opponents = bracket.opponents(&team.name).unwrap();
            let Some(opponent) = opponents.get(round as usize - 1) else {
                continue;
            };
            let team_first = (team.seed, &team.name) < (opponent.seed, &opponent.name);
            if team_first {
                games.push((team.name.clone(), opponent.name.clone()));
            }
        }
        for (winner, loser) in games {
            play(bracket, &winner, &loser);
        }
    }
    bracket
        .champion()
        .map(|t| t.name.clone())
        .unwrap_or_default()
}

//! Pick-four scoring: earned points and the points a selection could still earn.

use crate::bracket::Bracket;
use crate::team::Team;

/// Points earned so far: the sum of seed × wins over the selected teams.
pub fn points(bracket: &Bracket, selection: &[String]) -> u32 {
    selection
        .iter()
        .filter_map(|name| bracket.find_team(name))
        .map(|team| team.seed as u32 * team.wins() as u32)
        .sum()
}

/// Additional points the selection could still earn.
///
/// Alive teams are credited from the highest seed number down. A team's wins
/// are capped where its path meets an already credited teammate, since two
/// selections cannot both keep winning past the game between them.
pub fn potential_points(bracket: &Bracket, selection: &[String]) -> u32 {
    let mut alive: Vec<&Team> = selection
        .iter()
        .filter_map(|name| bracket.find_team(name))
        .filter(|team| team.is_alive())
        .collect();
    alive.sort_by(|a, b| b.seed.cmp(&a.seed));

    let mut total = 0;
    for (i, team) in alive.iter().enumerate() {
        let mut clamped = team.possible_wins();
        for teammate in &alive[..i] {
            let before = bracket.games_before_matchup(&team.name, &teammate.name).unwrap_or(0);
            clamped = clamped.min(team.wins() + before);
        }
        total += team.seed as u32 * clamped as u32;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::Region;
    use crate::testing::{full_bracket, play, team_name};

    fn selection(region: Region, seeds: &[u8]) -> Vec<String> {
        seeds.iter().map(|&s| team_name(region, s)).collect()
    }

    #[test]
    fn test_points_sum_seed_times_wins() {
        let mut bracket = full_bracket();
        let r = Region::East;
        play(&mut bracket, &team_name(r, 12), &team_name(r, 5));
        play(&mut bracket, &team_name(r, 1), &team_name(r, 16));
        let picks = selection(r, &[1, 16, 5, 12]);
        assert_eq!(points(&bracket, &picks), 12 + 1);
    }

    #[test]
    fn test_potential_before_tournament() {
        let bracket = full_bracket();
        let picks = selection(Region::East, &[1, 16, 5, 12]);
        // 16 runs the table (96); 12 is stopped by the 16 in round three (24);
        // 5 meets the 12 immediately, and the 1 meets the 16 immediately.
        assert_eq!(potential_points(&bracket, &picks), 96 + 24);
    }

    #[test]
    fn test_potential_ignores_eliminated_selection() {
        let mut bracket = full_bracket();
        let r = Region::East;
        play(&mut bracket, &team_name(r, 1), &team_name(r, 16));
        let picks = selection(r, &[1, 16, 5, 12]);
        // 12: 6 games; 5: capped at its opener with the 12; 1: one win plus
        // one more game before the 5/12 winner.
        assert_eq!(potential_points(&bracket, &picks), 72 + 0 + 2);
    }

    #[test]
    fn test_potential_across_regions_caps_at_final() {
        let bracket = full_bracket();
        let picks = vec![team_name(Region::Midwest, 1), team_name(Region::South, 1)];
        // Both 1 seeds: Midwest and South only meet in the final
        assert_eq!(potential_points(&bracket, &picks), 6 + 5);
    }

    #[test]
    fn test_empty_selection() {
        let bracket = full_bracket();
        assert_eq!(points(&bracket, &[]), 0);
        assert_eq!(potential_points(&bracket, &[]), 0);
    }
}

//! Bracket topology and score bookkeeping.
//!
//! Every (region, seed) maps to a leaf of a balanced binary tree with 64
//! leaves. Regions occupy consecutive 16-leaf subtrees in matchup order and
//! seeds are laid out by [`SEED_ORDER`] inside them, so two teams first meet
//! in the round given by the bit length of `leaf_a ^ leaf_b`, and a team's
//! round-`r` opponent comes from the sibling subtree of size `2^(r-1)`.

use log::{debug, info, warn};
use std::collections::BTreeMap;

use crate::constants::{seed_slot, FINAL_FOUR_WINS, ROUNDS, SEED_ORDER, TEAMS_PER_REGION, TOTAL_TEAMS};
use crate::error::{PoolError, PoolResult};
use crate::region::Region;
use crate::team::Team;

/// Bracket position of a team: its region and seed line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot {
    pub region: Region,
    pub seed: u8,
}

#[derive(Clone, Debug)]
struct Entry {
    team: Team,
    /// One score per game played, in round order
    scores: Vec<u32>,
}

/// All teams, their score histories and the region matchup order.
#[derive(Clone, Debug)]
pub struct Bracket {
    entries: BTreeMap<Slot, Entry>,
    regions: [Region; 4],
}

impl Default for Bracket {
    fn default() -> Self {
        Self::new()
    }
}

impl Bracket {
    pub fn new() -> Self {
        Bracket {
            entries: BTreeMap::new(),
            regions: Region::DEFAULT_ORDER,
        }
    }

    /// Region matchup order; entries 0 and 1 meet in one national semifinal,
    /// 2 and 3 in the other.
    pub fn regions(&self) -> [Region; 4] {
        self.regions
    }

    /// Insert a team into its (seed, region) slot.
    ///
    /// The team enters with no wins and no scores.
    pub fn add_team(&mut self, mut team: Team) -> PoolResult<()> {
        let slot = Slot {
            region: team.region,
            seed: team.seed,
        };
        if self.entries.contains_key(&slot) {
            return Err(PoolError::DuplicateSlot {
                seed: team.seed,
                region: team.region,
            });
        }
        if self.find_team(&team.name).is_some() {
            return Err(PoolError::DuplicateName(team.name));
        }

        team.reset();
        debug!("Added {} to the {} region", team, team.region);
        self.entries.insert(slot, Entry { team, scores: Vec::new() });
        Ok(())
    }

    /// Insert a team together with a previously recorded score history.
    ///
    /// Results are replayed against whatever opponents are already present, so
    /// teams may be restored in any order. Scores past the final are dropped.
    pub fn add_team_with_scores(&mut self, team: Team, mut scores: Vec<u32>) -> PoolResult<()> {
        if scores.len() > ROUNDS as usize {
            warn!(
                "Dropping {} score(s) past the final for {}",
                scores.len() - ROUNDS as usize,
                team
            );
            scores.truncate(ROUNDS as usize);
        }
        let slot = Slot {
            region: team.region,
            seed: team.seed,
        };
        self.add_team(team)?;
        if scores.is_empty() {
            return Ok(());
        }

        let backup = self.entries.clone();
        if let Some(entry) = self.entries.get_mut(&slot) {
            entry.scores = scores;
        }
        if let Err(e) = self.replay() {
            self.entries = backup;
            self.entries.remove(&slot);
            return Err(e);
        }
        Ok(())
    }

    /// Remove a team and its scores, replaying the remaining results.
    pub fn remove_team(&mut self, name: &str) -> Option<Team> {
        let slot = self.slot_of(name)?;
        let entry = self.entries.remove(&slot)?;
        if self.replay().is_err() {
            warn!("Replay after removing {} left unresolved ties", entry.team);
        }
        info!("Removed {} from the bracket", entry.team);
        Some(entry.team)
    }

    /// Record `score` for the team's next game.
    ///
    /// Once both teams of a matchup have a score for the round, the lower
    /// scorer is eliminated and the higher scorer credited with a win.
    /// Returns the round the score was recorded for.
    pub fn add_score(&mut self, name: &str, score: u32) -> PoolResult<u8> {
        let slot = self.slot_of(name).ok_or_else(|| PoolError::TeamNotFound(name.trim().to_string()))?;
        let entry = &self.entries[&slot];
        let team = &entry.team;

        if !team.alive {
            return Err(PoolError::TeamEliminated { team: team.name.clone() });
        }
        if team.wins >= ROUNDS {
            return Err(PoolError::TournamentComplete { team: team.name.clone() });
        }
        if entry.scores.len() > team.wins as usize {
            return Err(PoolError::RoundPending {
                team: team.name.clone(),
                round: team.wins + 1,
            });
        }

        let round = team.wins + 1;
        let opponent = self
            .opponent_slot(self.leaf(slot), round)
            .filter(|opp| self.entries[opp].scores.len() >= round as usize);

        if let Some(opp) = opponent {
            let opp_score = self.entries[&opp].scores[round as usize - 1];
            if opp_score == score {
                return Err(PoolError::TiedScore {
                    team: team.name.clone(),
                    opponent: self.entries[&opp].team.name.clone(),
                    round,
                    score,
                });
            }
            self.push_score(slot, score);
            if score > opp_score {
                self.resolve(slot, opp);
            } else {
                self.resolve(opp, slot);
            }
        } else {
            self.push_score(slot, score);
        }

        Ok(round)
    }

    /// Replace a team's score history and recompute every affected result.
    ///
    /// Scores that belong to rounds a team no longer reaches are dropped.
    pub fn edit_scores(&mut self, name: &str, scores: Vec<u32>) -> PoolResult<()> {
        let slot = self.slot_of(name).ok_or_else(|| PoolError::TeamNotFound(name.trim().to_string()))?;
        if scores.len() > ROUNDS as usize {
            return Err(PoolError::TournamentComplete {
                team: self.entries[&slot].team.name.clone(),
            });
        }

        let backup = self.entries.clone();
        if let Some(entry) = self.entries.get_mut(&slot) {
            entry.scores = scores;
        }
        if let Err(e) = self.replay() {
            self.entries = backup;
            return Err(e);
        }
        self.prune_orphaned_scores();
        Ok(())
    }

    /// Rebuild the bracket under a new region matchup order.
    ///
    /// Every team and its score history is preserved; all results are
    /// replayed under the new pairings. Scores for games the new pairings do
    /// not reach stay recorded and count again once the order is restored.
    pub fn set_regions(&mut self, order: [Region; 4]) -> PoolResult<()> {
        Region::validate_order(&order)?;
        if order == self.regions {
            return Ok(());
        }

        let backup_entries = self.entries.clone();
        let backup_regions = self.regions;

        let saved: Vec<Entry> = std::mem::take(&mut self.entries).into_values().collect();
        self.regions = order;
        let restored: PoolResult<()> = saved.into_iter().try_for_each(|Entry { team, scores }| {
            let slot = Slot {
                region: team.region,
                seed: team.seed,
            };
            self.add_team(team)?;
            if let Some(entry) = self.entries.get_mut(&slot) {
                entry.scores = scores;
            }
            Ok(())
        });

        if let Err(e) = restored.and_then(|()| self.replay()) {
            self.entries = backup_entries;
            self.regions = backup_regions;
            return Err(e);
        }
        info!(
            "Region matchups set to {} vs {}, {} vs {}",
            order[0], order[1], order[2], order[3]
        );
        Ok(())
    }

    pub fn find_team(&self, name: &str) -> Option<&Team> {
        self.slot_of(name).map(|slot| &self.entries[&slot].team)
    }

    pub fn team(&self, seed: u8, region: Region) -> Option<&Team> {
        self.entries.get(&Slot { region, seed }).map(|e| &e.team)
    }

    /// Teams in region then seed order.
    pub fn teams(&self) -> impl Iterator<Item = &Team> {
        self.entries.values().map(|e| &e.team)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True once all 64 slots are filled.
    pub fn is_initialized(&self) -> bool {
        self.entries.len() == TOTAL_TEAMS
    }

    /// True once any score has been recorded.
    pub fn has_begun(&self) -> bool {
        self.entries.values().any(|e| !e.scores.is_empty())
    }

    pub fn scores(&self, name: &str) -> Option<&[u32]> {
        self.slot_of(name).map(|slot| self.entries[&slot].scores.as_slice())
    }

    /// Opponent for each round the team has reached, in round order.
    ///
    /// The list ends at the first round whose opponent is not yet decided.
    pub fn opponents(&self, name: &str) -> PoolResult<Vec<&Team>> {
        let slot = self.slot_of(name).ok_or_else(|| PoolError::TeamNotFound(name.trim().to_string()))?;
        let team = &self.entries[&slot].team;
        let leaf = self.leaf(slot);

        let mut opponents = Vec::new();
        for round in 1..=ROUNDS {
            if team.wins < round - 1 {
                break;
            }
            match self.opponent_slot(leaf, round) {
                Some(opp) => opponents.push(&self.entries[&opp].team),
                None => break,
            }
        }
        Ok(opponents)
    }

    /// Games the team could still win: `6 - wins` while alive, otherwise 0.
    pub fn possible_wins(&self, name: &str) -> Option<u8> {
        self.find_team(name).map(Team::possible_wins)
    }

    /// Round (1-6) in which the two teams' bracket paths converge.
    pub fn meeting_round(&self, a: &str, b: &str) -> PoolResult<u8> {
        let slot_a = self.slot_of(a).ok_or_else(|| PoolError::TeamNotFound(a.trim().to_string()))?;
        let slot_b = self.slot_of(b).ok_or_else(|| PoolError::TeamNotFound(b.trim().to_string()))?;
        let diff = self.leaf(slot_a) ^ self.leaf(slot_b);
        Ok((usize::BITS - diff.leading_zeros()) as u8)
    }

    /// Games `a` must still win before it could face `b`.
    pub fn games_before_matchup(&self, a: &str, b: &str) -> PoolResult<u8> {
        let meeting = self.meeting_round(a, b)?;
        let wins = self.find_team(a).map(Team::wins).unwrap_or(0);
        Ok(meeting.saturating_sub(1).saturating_sub(wins))
    }

    /// The single team that won all six games, if the final has been played.
    pub fn champion(&self) -> Option<&Team> {
        let mut champions = self.teams().filter(|t| t.wins == ROUNDS);
        match (champions.next(), champions.next()) {
            (Some(team), None) => Some(team),
            _ => None,
        }
    }

    /// Teams that reached the national semifinals.
    pub fn final_four(&self) -> Vec<&Team> {
        self.teams().filter(|t| t.wins >= FINAL_FOUR_WINS).collect()
    }

    fn slot_of(&self, name: &str) -> Option<Slot> {
        self.entries
            .iter()
            .find(|(_, entry)| entry.team.is_named(name))
            .map(|(slot, _)| *slot)
    }

    fn leaf(&self, slot: Slot) -> usize {
        let region_index = self.regions.iter().position(|&r| r == slot.region).unwrap_or(0);
        // Seeds are validated on insertion, so the slot always exists.
        region_index * TEAMS_PER_REGION + seed_slot(slot.seed).unwrap_or(0)
    }

    fn slot_at(&self, leaf: usize) -> Slot {
        Slot {
            region: self.regions[leaf / TEAMS_PER_REGION],
            seed: SEED_ORDER[leaf % TEAMS_PER_REGION],
        }
    }

    /// Team from the sibling subtree that reached `round`, if decided.
    fn opponent_slot(&self, leaf: usize, round: u8) -> Option<Slot> {
        let size = 1usize << (round - 1);
        let start = ((leaf >> (round - 1)) ^ 1) * size;
        (start..start + size)
            .map(|l| self.slot_at(l))
            .find(|s| self.entries.get(s).is_some_and(|e| e.team.wins >= round - 1))
    }

    fn push_score(&mut self, slot: Slot, score: u32) {
        if let Some(entry) = self.entries.get_mut(&slot) {
            entry.scores.push(score);
        }
    }

    fn resolve(&mut self, winner: Slot, loser: Slot) {
        if let Some(entry) = self.entries.get_mut(&winner) {
            entry.team.record_win();
        }
        if let Some(entry) = self.entries.get_mut(&loser) {
            entry.team.record_loss();
        }
    }

    /// Recompute wins and alive flags for every team from the score histories.
    fn replay(&mut self) -> PoolResult<()> {
        for entry in self.entries.values_mut() {
            entry.team.reset();
        }

        for round in 1..=ROUNDS {
            let contenders: Vec<Slot> = self
                .entries
                .iter()
                .filter(|(_, e)| e.team.alive && e.team.wins == round - 1 && e.scores.len() >= round as usize)
                .map(|(slot, _)| *slot)
                .collect();

            for slot in contenders {
                let leaf = self.leaf(slot);
                let Some(opp) = self.opponent_slot(leaf, round) else {
                    continue;
                };
                if self.leaf(opp) < leaf {
                    // Pair already handled from the other side
                    continue;
                }
                let opp_entry = &self.entries[&opp];
                if opp_entry.scores.len() < round as usize || opp_entry.team.wins != round - 1 {
                    continue;
                }

                let index = round as usize - 1;
                let score = self.entries[&slot].scores[index];
                let opp_score = opp_entry.scores[index];
                if score == opp_score {
                    return Err(PoolError::TiedScore {
                        team: self.entries[&slot].team.name.clone(),
                        opponent: opp_entry.team.name.clone(),
                        round,
                        score,
                    });
                }
                if score > opp_score {
                    self.resolve(slot, opp);
                } else {
                    self.resolve(opp, slot);
                }
            }
        }
        Ok(())
    }

    /// Drop scores recorded for rounds a team can no longer have played.
    fn prune_orphaned_scores(&mut self) {
        for entry in self.entries.values_mut() {
            let playable = (entry.team.wins as usize + 1).min(ROUNDS as usize);
            if entry.scores.len() > playable {
                warn!(
                    "Dropping {} orphaned score(s) for {}",
                    entry.scores.len() - playable,
                    entry.team
                );
                entry.scores.truncate(playable);
            }
        }
    }
}

//! Pool save files and the printable summary.
//!
//! A save file has three sections, each closed by a `}` line:
//!
//! ```text
//! #Config:
//! #Pricing:
//! Spots Pricing: [0.0, 10.0, 15.0, 20.0, 25.0, 30.0]
//! #Prizes:
//! Blowout Loss Prize: 20.0
//! Pick Four Prize: [30.0, 10.0]
//! #Region Matchups:
//! Midwest vs West
//! East vs South
//! #Other:
//! Leaderboard Size: 1
//! First Overtime Loss Team: Iona
//! }
//! #Teams:
//! #Region: Midwest
//! 1 Kansas [82,71]
//! }
//! #Players:
//! #Player: Ann Lee 2 140 paid
//! 	#Chosen Team:
//! 		Kansas
//! 	#Owned Teams:
//! 		Kansas
//! 	#Pick Four Teams:
//! }
//! ```
//!
//! Reading is forgiving: malformed fields and unknown references are logged
//! and skipped, only I/O failures abort.

use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use crate::database::Database;
use crate::error::PoolResult;
use crate::prize::PrizeType;
use crate::region::Region;

const SUMMARY_RULE_WIDTH: usize = 96;

/// Single-amount prize keys as they appear under `#Prizes:`.
const PRIZE_KEYS: [(&str, PrizeType); 7] = [
    ("Blowout Loss Prize", PrizeType::FirstRoundBlowout),
    ("Cinderella Prize", PrizeType::CinderellaTeam),
    ("First Overtime Loss Prize", PrizeType::FirstOvertimeLoss),
    ("Chosen Winner Prize", PrizeType::ChosenWinner),
    ("Won First Game Prize", PrizeType::WonFirstGame),
    ("Final Four Team", PrizeType::FinalFourTeam),
    ("Champion Team", PrizeType::ChampionTeam),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    Idle,
    Config,
    Pricing,
    Prizes,
    RegionMatchups,
    Other,
    Teams,
    Players,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Selection {
    Chosen,
    Owned,
    PickFour,
}

/// Line-by-line loader state.
struct Loader {
    db: Database,
    section: Section,
    region: Option<Region>,
    matchups: Vec<Option<Region>>,
    overtime_loser: Option<String>,
    player: Option<String>,
    selection: Option<Selection>,
}

impl Loader {
    fn new() -> Self {
        Loader {
            db: Database::new(),
            section: Section::Idle,
            region: None,
            matchups: Vec::new(),
            overtime_loser: None,
            player: None,
            selection: None,
        }
    }

    fn read_line(&mut self, raw: &str) {
        let line = raw.trim();
        if line.is_empty() {
            return;
        }
        if line.contains('}') {
            self.close_section();
            return;
        }

        let next = match line {
            "#Config:" => Some(Section::Config),
            "#Pricing:" => Some(Section::Pricing),
            "#Prizes:" => Some(Section::Prizes),
            "#Region Matchups:" => Some(Section::RegionMatchups),
            "#Other:" => Some(Section::Other),
            "#Teams:" => Some(Section::Teams),
            "#Players:" => Some(Section::Players),
            _ => None,
        };
        if let Some(section) = next {
            self.section = section;
            return;
        }

        match self.section {
            Section::Idle | Section::Config => {}
            Section::Pricing => self.read_pricing(line),
            Section::Prizes => self.read_prize(line),
            Section::RegionMatchups => self
                .matchups
                .extend(line.split("vs").map(|r| Region::from_str(r).ok())),
            Section::Other => self.read_other(line),
            Section::Teams => self.read_team(line),
            Section::Players => self.read_player_line(line),
        }
    }

    fn close_section(&mut self) {
        if matches!(
            self.section,
            Section::Config | Section::Pricing | Section::Prizes | Section::RegionMatchups | Section::Other
        ) {
            self.apply_matchups();
        }
        self.section = Section::Idle;
        self.region = None;
        self.player = None;
        self.selection = None;
    }

    fn read_pricing(&mut self, line: &str) {
        let Some(("Spots Pricing", value)) = split_field(line) else {
            warn!("Ignoring pricing line: {}", line);
            return;
        };
        let pricing: Vec<f64> = parse_list(value);
        if pricing.is_empty() {
            warn!("Empty spot pricing; keeping defaults");
        } else {
            self.db.config_mut().pricing = pricing;
        }
    }

    fn read_prize(&mut self, line: &str) {
        let Some((key, value)) = split_field(line) else {
            warn!("Ignoring prize line: {}", line);
            return;
        };

        let amounts: Vec<(PrizeType, f64)> = if key == "Pick Four Prize" {
            let values: Vec<f64> = parse_list(value);
            [PrizeType::PickFourChampion, PrizeType::PickFourRunnerUp]
                .into_iter()
                .zip(values)
                .collect()
        } else if let Some(&(_, prize)) = PRIZE_KEYS.iter().find(|(k, _)| *k == key) {
            match value.parse() {
                Ok(amount) => vec![(prize, amount)],
                Err(_) => {
                    warn!("Invalid amount for {}: {:?}", key, value);
                    return;
                }
            }
        } else {
            warn!("Unknown prize: {}", key);
            return;
        };

        for (prize, amount) in amounts {
            if let Err(e) = self.db.set_prize_money(prize, amount) {
                warn!("Skipping {} prize: {}", prize, e);
            }
        }
    }

    fn read_other(&mut self, line: &str) {
        let Some((key, value)) = split_field(line) else {
            warn!("Ignoring config line: {}", line);
            return;
        };
        match key {
            "Leaderboard Size" => match value.parse() {
                Ok(size) => {
                    if let Err(e) = self.db.config_mut().set_leaderboard_size(size) {
                        warn!("Skipping leaderboard size: {}", e);
                    }
                }
                Err(_) => warn!("Invalid leaderboard size: {:?}", value),
            },
            "First Overtime Loss Team" => {
                self.overtime_loser = (!value.is_empty()).then(|| value.to_string());
            }
            "Title" => self.db.config_mut().title = value.to_string(),
            "Subtitle" => self.db.config_mut().subtitle = value.to_string(),
            _ => warn!("Unknown config key: {}", key),
        }
    }

    /// Four distinct regions set the full order; a valid leading pair only
    /// fixes one semifinal.
    fn apply_matchups(&mut self) {
        if self.matchups.is_empty() {
            return;
        }
        let matchups = std::mem::take(&mut self.matchups);

        if let [Some(a), Some(b), Some(c), Some(d)] = matchups[..] {
            match self.db.set_region_matchups([a, b, c, d]) {
                Ok(()) => return,
                Err(e) => warn!("Ignoring region matchups: {}", e),
            }
        }
        if let [Some(first), Some(second), ..] = matchups[..] {
            if let Err(e) = self.db.set_region_semifinal(first, second) {
                warn!("Ignoring region semifinal: {}", e);
            }
        } else {
            warn!("Unreadable region matchups; keeping defaults");
        }
    }

    fn read_team(&mut self, line: &str) {
        if let Some(region) = line.strip_prefix("#Region:") {
            self.region = Region::from_str(region).ok();
            if self.region.is_none() {
                warn!("Unknown region {:?}; skipping its teams", region.trim());
            }
            return;
        }
        let Some(region) = self.region else {
            return;
        };

        let Some((seed, rest)) = line.split_once(char::is_whitespace) else {
            warn!("Ignoring team line: {}", line);
            return;
        };
        let Ok(seed) = seed.parse::<u8>() else {
            warn!("Invalid seed in team line: {}", line);
            return;
        };
        let rest = rest.trim();
        let (name, scores) = match rest.rsplit_once(char::is_whitespace) {
            Some((name, list)) if list.starts_with('[') => (name.trim(), parse_list(list)),
            _ => (rest, Vec::new()),
        };

        if let Err(e) = self.db.add_team_with_scores(name, seed, region, scores) {
            warn!("Skipping team {}: {}", name, e);
        }
    }

    fn read_player_line(&mut self, line: &str) {
        if let Some(header) = line.strip_prefix("#Player:") {
            self.read_player(header);
            return;
        }
        let selection = match line {
            "#Chosen Team:" => Some(Selection::Chosen),
            "#Owned Teams:" => Some(Selection::Owned),
            "#Pick Four Teams:" => Some(Selection::PickFour),
            _ => None,
        };
        if selection.is_some() {
            self.selection = selection;
            return;
        }

        let (Some(player), Some(selection)) = (self.player.as_deref(), self.selection) else {
            return;
        };
        let result = match selection {
            Selection::Chosen => self.db.set_chosen_winner(player, Some(line)),
            Selection::Owned => self.db.add_owned_team(player, line),
            Selection::PickFour => self.db.add_pick_four_team(player, line),
        };
        if let Err(e) = result {
            warn!("Skipping selection {} for {}: {}", line, player, e);
        }
    }

    /// `<name> <spots> <tiebreaker> [paid]`
    fn read_player(&mut self, header: &str) {
        self.player = None;
        self.selection = None;

        let mut tokens: Vec<&str> = header.split_whitespace().collect();
        let paid = tokens.last() == Some(&"paid");
        if paid {
            tokens.pop();
        }
        let (Some(predicted), Some(spots)) = (tokens.pop(), tokens.pop()) else {
            warn!("Ignoring player line: {}", header.trim());
            return;
        };
        let name = tokens.join(" ");
        let (Ok(spots), Ok(predicted)) = (spots.parse::<u32>(), predicted.parse::<i32>()) else {
            warn!("Invalid spots or tiebreaker for {}", name);
            return;
        };

        if let Err(e) = self.db.add_player(&name, spots) {
            warn!("Skipping player {}: {}", name, e);
            return;
        }
        if let Err(e) = self
            .db
            .set_paid(&name, paid)
            .and_then(|()| self.db.set_predicted_score(&name, predicted))
        {
            warn!("Incomplete entry for {}: {}", name, e);
        }
        self.player = Some(name);
    }

    fn finish(mut self) -> Database {
        self.apply_matchups();
        if let Some(team) = self.overtime_loser.take() {
            if let Err(e) = self.db.set_overtime_loser(Some(&team)) {
                warn!("Skipping overtime loser: {}", e);
            }
        }
        self.db.update();
        self.db
    }
}

/// `Key: value`, both trimmed.
fn split_field(line: &str) -> Option<(&str, &str)> {
    line.split_once(':').map(|(k, v)| (k.trim(), v.trim()))
}

/// Comma separated values inside optional brackets; bad entries are skipped.
fn parse_list<T: FromStr>(text: &str) -> Vec<T> {
    text.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .filter_map(|piece| {
            let value = piece.parse().ok();
            if value.is_none() {
                warn!("Skipping unreadable value {:?}", piece);
            }
            value
        })
        .collect()
}

fn format_amounts(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| format!("{:?}", v)).collect();
    format!("[{}]", parts.join(", "))
}

/// Load a pool from a save file and settle its contests.
pub fn read_database<R: BufRead>(reader: R) -> PoolResult<Database> {
    let mut loader = Loader::new();
    for line in reader.lines() {
        loader.read_line(&line?);
    }
    Ok(loader.finish())
}

pub fn write_database<W: Write>(db: &Database, out: &mut W) -> PoolResult<()> {
    let config = db.config();

    writeln!(out, "#Config:")?;
    writeln!(out, "#Pricing:")?;
    writeln!(out, "Spots Pricing: {}", format_amounts(&config.pricing))?;
    writeln!(out, "#Prizes:")?;
    for (key, prize) in &PRIZE_KEYS[..3] {
        writeln!(out, "{}: {:?}", key, db.prize_money(*prize))?;
    }
    writeln!(
        out,
        "Pick Four Prize: {}",
        format_amounts(&[
            db.prize_money(PrizeType::PickFourChampion),
            db.prize_money(PrizeType::PickFourRunnerUp),
        ])
    )?;
    for (key, prize) in &PRIZE_KEYS[3..] {
        writeln!(out, "{}: {:?}", key, db.prize_money(*prize))?;
    }

    writeln!(out, "#Region Matchups:")?;
    for pair in db.region_matchups().chunks(2) {
        writeln!(out, "{} vs {}", pair[0], pair[1])?;
    }
    writeln!(out, "#Other:")?;
    writeln!(out, "Leaderboard Size: {}", config.leaderboard_size())?;
    writeln!(
        out,
        "First Overtime Loss Team: {}",
        db.overtime_loser().map_or("", |t| t.name.as_str())
    )?;
    writeln!(out, "Title: {}", config.title)?;
    writeln!(out, "Subtitle: {}", config.subtitle)?;
    writeln!(out, "}}")?;

    writeln!(out, "#Teams:")?;
    let mut region = None;
    for team in db.bracket().teams() {
        if region != Some(team.region) {
            region = Some(team.region);
            writeln!(out, "#Region: {}", team.region)?;
        }
        let scores: Vec<String> = db
            .scores(&team.name)
            .unwrap_or_default()
            .iter()
            .map(u32::to_string)
            .collect();
        writeln!(out, "{} {} [{}]", team.seed, team.name, scores.join(","))?;
    }
    writeln!(out, "}}")?;

    writeln!(out, "#Players:")?;
    for player in db.players() {
        let paid = if player.paid { " paid" } else { "" };
        writeln!(
            out,
            "#Player: {} {} {}{}",
            player.name, player.spots, player.predicted_score, paid
        )?;
        writeln!(out, "\t#Chosen Team:")?;
        if let Some(team) = player.chosen_winner() {
            writeln!(out, "\t\t{}", team)?;
        }
        writeln!(out, "\t#Owned Teams:")?;
        for team in player.owned_teams() {
            writeln!(out, "\t\t{}", team)?;
        }
        writeln!(out, "\t#Pick Four Teams:")?;
        for team in player.pick_four() {
            writeln!(out, "\t\t{}", team)?;
        }
    }
    writeln!(out, "}}")?;
    Ok(())
}

pub fn load_from_path<P: AsRef<Path>>(path: P) -> PoolResult<Database> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let db = read_database(BufReader::new(file))?;
    info!(
        "Loaded {} teams and {} players from {}",
        db.bracket().len(),
        db.players().len(),
        path.display()
    );
    Ok(db)
}

pub fn save_to_path<P: AsRef<Path>>(db: &Database, path: P) -> PoolResult<()> {
    let path = path.as_ref();
    let mut out = BufWriter::new(File::create(path)?);
    write_database(db, &mut out)?;
    out.flush()?;
    info!("Saved pool to {}", path.display());
    Ok(())
}

/// Write the printable pool summary: every player, both leaderboards, the
/// U-Pick-It picks and the contest winners. Contests are settled first.
pub fn write_summary<W: Write>(db: &mut Database, out: &mut W) -> PoolResult<()> {
    db.update();

    writeln!(out, "PLAYERS:")?;
    for player in db.players() {
        if let Some(report) = db.player_report(&player.name) {
            writeln!(out, "{}", report)?;
        }
    }

    write_heading(out, "PICK FOUR LEADERBOARD")?;
    for standing in db.pick_four_leaderboard() {
        writeln!(out, "{}", standing)?;
    }
    write_heading(out, "OWNED TEAM LEADERBOARD")?;
    for standing in db.owned_team_leaderboard() {
        writeln!(out, "{}", standing)?;
    }
    write_heading(out, "U-PICK-IT")?;
    for player in db.players() {
        let pick = player
            .chosen_winner()
            .and_then(|t| db.find_team(t))
            .map_or_else(|| "None Selected".to_string(), |t| t.to_string());
        writeln!(out, "{}: {} (Tiebreaker: {})", player.name, pick, player.predicted_score)?;
    }

    write_heading(out, "CONTESTS:")?;
    for prize in PrizeType::ALL {
        write!(out, " -{}", prize.name())?;
        if prize == PrizeType::WonFirstGame {
            write!(out, " (each instance is ${:?})", db.prize_money(prize))?;
        }
        writeln!(out, ": [{}]\n", db.prize_winners(prize).join(", "))?;
    }
    writeln!(out, "{}", "-".repeat(SUMMARY_RULE_WIDTH))?;
    Ok(())
}

fn write_heading<W: Write>(out: &mut W, title: &str) -> std::io::Result<()> {
    let rule = "-".repeat(SUMMARY_RULE_WIDTH);
    writeln!(out, "{}", rule)?;
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", rule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::team_name;
    use std::io::Cursor;

    fn populated() -> Database {
        let mut db = Database::new();
        db.set_region_matchups([Region::East, Region::Midwest, Region::West, Region::South])
            .unwrap();
        for region in Region::ALL {
            for seed in 1..=16 {
                db.add_team(&team_name(region, seed), seed, region).unwrap();
            }
        }
        let r = Region::West;
        for (winner, loser, w, l) in [(1, 16, 88, 61), (9, 8, 72, 70), (12, 5, 66, 64), (1, 9, 75, 68)] {
            db.add_score(&team_name(r, winner), w).unwrap();
            db.add_score(&team_name(r, loser), l).unwrap();
        }

        db.add_player("Ann Lee", 2).unwrap();
        db.add_player("Bob", 1).unwrap();
        db.set_paid("Ann Lee", true).unwrap();
        db.set_predicted_score("Ann Lee", 141).unwrap();
        db.set_predicted_score("Bob", -1).unwrap();
        db.add_owned_team("Ann Lee", &team_name(r, 1)).unwrap();
        db.add_owned_team("Ann Lee", &team_name(r, 12)).unwrap();
        db.add_owned_team("Bob", &team_name(Region::South, 3)).unwrap();
        db.add_pick_four_team("Bob", &team_name(r, 12)).unwrap();
        db.add_pick_four_team("Bob", &team_name(r, 9)).unwrap();
        db.set_chosen_winner("Ann Lee", Some(&team_name(r, 1))).unwrap();

        db.config_mut().pricing = vec![0.0, 12.5, 20.0];
        db.config_mut().set_leaderboard_size(-1).unwrap();
        db.config_mut().title = "Office Pool".to_string();
        db.set_prize_money(PrizeType::PickFourRunnerUp, 15.0).unwrap();
        db.set_prize_money(PrizeType::ChampionTeam, 100.0).unwrap();
        db.set_overtime_loser(Some(&team_name(r, 8))).unwrap();
        db.update();
        db
    }

    fn round_trip(db: &Database) -> (String, Database) {
        let mut out = Vec::new();
        write_database(db, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let loaded = read_database(Cursor::new(text.clone())).unwrap();
        (text, loaded)
    }

    #[test]
    fn test_round_trip_preserves_pool() {
        let db = populated();
        let (text, loaded) = round_trip(&db);

        assert!(text.contains("Spots Pricing: [0.0, 12.5, 20.0]"));
        assert!(text.contains("Pick Four Prize: [30.0, 15.0]"));
        assert!(text.contains("East vs Midwest\nWest vs South\n"));
        assert!(text.contains("1 West 1 [88,75]"));
        assert!(text.contains("#Player: Ann Lee 2 141 paid"));

        assert_eq!(loaded.region_matchups(), db.region_matchups());
        assert_eq!(loaded.config(), db.config());
        for prize in PrizeType::ALL {
            assert_eq!(loaded.prize_money(prize), db.prize_money(prize));
            assert_eq!(loaded.prize_winners(prize), db.prize_winners(prize));
        }
        assert_eq!(loaded.overtime_loser().unwrap().name, team_name(Region::West, 8));

        for team in db.teams() {
            let other = loaded.find_team(&team.name).unwrap();
            assert_eq!(other, team);
            assert_eq!(loaded.scores(&team.name).unwrap(), db.scores(&team.name).unwrap());
        }
        for player in db.players() {
            let other = loaded.find_player(&player.name).unwrap();
            assert_eq!(other.owned_teams(), player.owned_teams());
            assert_eq!(other.pick_four(), player.pick_four());
            assert_eq!(other.chosen_winner(), player.chosen_winner());
            assert_eq!(other.paid, player.paid);
            assert_eq!(other.predicted_score, player.predicted_score);
            assert_eq!(other.balance(), player.balance());
        }
    }

    #[test]
    fn test_malformed_fields_are_skipped() {
        let text = "\
#Config:
#Prizes:
Cinderella Prize: lots
Won First Game Prize: 7.5
#Other:
Leaderboard Size: -5
Title: Hoops
}
#Teams:
#Region: Atlantis
1 Nowhere []
#Region: east
1 Duke [70]
x Broken [60]
16 Iona [oops,60]
}
#Players:
#Player: Cat five 0
#Player: Dan 1 99
\t#Chosen Team:
\t\tUnknown U
\t#Owned Teams:
\t\tduke
\t#Pick Four Teams:
}
";
        let db = read_database(Cursor::new(text)).unwrap();
        assert_eq!(db.prize_money(PrizeType::CinderellaTeam), PrizeType::CinderellaTeam.default_prize());
        assert_eq!(db.prize_money(PrizeType::WonFirstGame), 7.5);
        assert_eq!(db.config().leaderboard_size(), 1);
        assert_eq!(db.config().title, "Hoops");

        assert_eq!(db.bracket().len(), 2);
        assert!(db.find_team("Nowhere").is_none());
        assert_eq!(db.find_team("Duke").unwrap().wins(), 1);
        assert!(!db.find_team("Iona").unwrap().is_alive());

        assert!(db.find_player("Cat five").is_none());
        let dan = db.find_player("Dan").unwrap();
        assert_eq!(dan.predicted_score, 99);
        assert_eq!(dan.chosen_winner(), None);
        assert_eq!(dan.owned_teams(), &["Duke".to_string()]);
    }

    #[test]
    fn test_scores_past_final_are_dropped() {
        let text = "#Teams:\n#Region: East\n1 Duke [70,70,70,70,70,70,99]\n}\n";
        let db = read_database(Cursor::new(text)).unwrap();
        assert_eq!(db.scores("Duke").unwrap(), &[70, 70, 70, 70, 70, 70]);
    }

    #[test]
    fn test_legacy_two_region_matchup() {
        let text = "#Config:\n#Region Matchups:\nMidwest vs East\n}\n";
        let db = read_database(Cursor::new(text)).unwrap();
        assert_eq!(
            db.region_matchups(),
            [Region::Midwest, Region::East, Region::West, Region::South]
        );
    }

    #[test]
    fn test_summary_lists_contests() {
        let mut db = populated();
        let mut out = Vec::new();
        write_summary(&mut db, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("PLAYERS:\n"));
        assert!(text.contains("Player: Ann Lee | $ "));
        assert!(text.contains("PICK FOUR LEADERBOARD"));
        assert!(text.contains("Ann Lee: #1 West 1 (Tiebreaker: 141)"));
        assert!(text.contains("Bob: None Selected (Tiebreaker: -1)"));
        assert!(text.contains(" -Won First Game (each instance is $5.0): [Ann Lee, Ann Lee]"));
        assert!(text.contains(" -Pick Four Contest Champion: [Bob]"));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = load_from_path("/nonexistent/pool.txt").unwrap_err();
        assert!(matches!(err, crate::error::PoolError::Io(_)));
    }
}

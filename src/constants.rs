/// Number of regions in the field
pub const NUM_REGIONS: usize = 4;

/// Seeded teams per region
pub const TEAMS_PER_REGION: usize = 16;

/// Total teams in a full bracket
pub const TOTAL_TEAMS: usize = NUM_REGIONS * TEAMS_PER_REGION;

/// Games a team must win to take the title
pub const ROUNDS: u8 = 6;

/// Wins needed to reach the national semifinals
pub const FINAL_FOUR_WINS: u8 = 4;

/// Lowest seed number eligible for the cinderella contest
pub const MIN_CINDERELLA_SEED: u8 = 9;

/// Maximum teams in a pick-four selection
pub const PICK_FOUR_SIZE: usize = 4;

/// Seeds in bracket order within a region: adjacent pairs meet in round one,
/// adjacent quads in round two, and so on.
pub const SEED_ORDER: [u8; TEAMS_PER_REGION] = [1, 16, 8, 9, 5, 12, 4, 13, 6, 11, 3, 14, 7, 10, 2, 15];

/// Price of a purchase indexed by spots bought (index 0 is unused)
pub const DEFAULT_PRICING: [f64; 6] = [0.0, 10.0, 15.0, 20.0, 25.0, 30.0];

/// Rows shown on a leaderboard unless configured otherwise
pub const DEFAULT_LEADERBOARD_SIZE: i32 = 1;

/// Leaderboard size meaning "show everyone"
pub const UNLIMITED_LEADERBOARD: i32 = -1;

/// Position of `seed` within its region's 16 leaves.
pub fn seed_slot(seed: u8) -> Option<usize> {
    SEED_ORDER.iter().position(|&s| s == seed)
}

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LEADERBOARD_SIZE, DEFAULT_PRICING, UNLIMITED_LEADERBOARD};
use crate::error::{PoolError, PoolResult};

/// Pool-wide settings that are not part of the bracket or contests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Entry price indexed by number of spots purchased
    pub pricing: Vec<f64>,

    /// Leaderboard rows to show; -1 shows everyone
    leaderboard_size: i32,

    pub title: String,

    pub subtitle: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            pricing: DEFAULT_PRICING.to_vec(),
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
            title: "March Madness".to_string(),
            subtitle: String::new(),
        }
    }
}

impl PoolConfig {
    pub fn leaderboard_size(&self) -> i32 {
        self.leaderboard_size
    }

    pub fn set_leaderboard_size(&mut self, size: i32) -> PoolResult<()> {
        if size < UNLIMITED_LEADERBOARD {
            return Err(PoolError::InvalidLeaderboardSize(size));
        }
        self.leaderboard_size = size;
        Ok(())
    }

    /// Row limit for leaderboards, `None` when unlimited.
    pub fn leaderboard_limit(&self) -> Option<usize> {
        usize::try_from(self.leaderboard_size).ok()
    }

    pub fn price_for(&self, spots: u32) -> Option<f64> {
        self.pricing.get(spots as usize).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaderboard_limit() {
        let mut config = PoolConfig::default();
        assert_eq!(config.leaderboard_limit(), Some(1));
        config.set_leaderboard_size(-1).unwrap();
        assert_eq!(config.leaderboard_limit(), None);
        config.set_leaderboard_size(0).unwrap();
        assert_eq!(config.leaderboard_limit(), Some(0));
        assert!(config.set_leaderboard_size(-2).is_err());
        assert_eq!(config.leaderboard_size(), 0);
    }

    #[test]
    fn test_default_pricing() {
        let config = PoolConfig::default();
        assert_eq!(config.price_for(1), Some(10.0));
        assert_eq!(config.price_for(5), Some(30.0));
        assert_eq!(config.price_for(6), None);
    }
}

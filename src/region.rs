use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PoolError;

/// One of the four named partitions of the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    Midwest,
    West,
    East,
    South,
}

impl Region {
    pub const ALL: [Region; 4] = [Region::Midwest, Region::West, Region::East, Region::South];

    /// Default national semifinal pairing: Midwest vs West, East vs South.
    pub const DEFAULT_ORDER: [Region; 4] = Region::ALL;

    pub fn name(&self) -> &'static str {
        match self {
            Region::Midwest => "Midwest",
            Region::West => "West",
            Region::East => "East",
            Region::South => "South",
        }
    }

    /// Check that `order` names every region exactly once.
    pub fn validate_order(order: &[Region; 4]) -> Result<(), PoolError> {
        for region in Region::ALL {
            if !order.contains(&region) {
                return Err(PoolError::InvalidRegionOrder);
            }
        }
        Ok(())
    }

    /// Build an order where `first` meets `second` in a semifinal and the two
    /// remaining regions keep their relative position from `current`.
    pub fn pair_semifinal(first: Region, second: Region, current: &[Region; 4]) -> Result<[Region; 4], PoolError> {
        if first == second {
            return Err(PoolError::InvalidRegionOrder);
        }
        let mut order = [first, second, first, second];
        let mut index = 2;
        for &region in current {
            if region != first && region != second {
                order[index] = region;
                index += 1;
            }
        }
        Self::validate_order(&order)?;
        Ok(order)
    }
}

impl FromStr for Region {
    type Err = PoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "midwest" => Ok(Region::Midwest),
            "west" => Ok(Region::West),
            "east" => Ok(Region::East),
            "south" => Ok(Region::South),
            _ => Err(PoolError::InvalidRegion(s.trim().to_string())),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(" midWEST ".parse::<Region>().unwrap(), Region::Midwest);
        assert_eq!("South".parse::<Region>().unwrap(), Region::South);
        assert!("North".parse::<Region>().is_err());
    }

    #[test]
    fn test_pair_semifinal_keeps_remaining_order() {
        let order = Region::pair_semifinal(Region::West, Region::South, &Region::DEFAULT_ORDER).unwrap();
        assert_eq!(order, [Region::West, Region::South, Region::Midwest, Region::East]);
        assert!(Region::pair_semifinal(Region::East, Region::East, &Region::DEFAULT_ORDER).is_err());
    }

    #[test]
    fn test_validate_order_rejects_repeats() {
        assert!(Region::validate_order(&[Region::East, Region::East, Region::West, Region::South]).is_err());
        assert!(Region::validate_order(&Region::DEFAULT_ORDER).is_ok());
    }
}

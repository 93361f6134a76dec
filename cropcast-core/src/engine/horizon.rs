use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::ForecastError;

/// Number of days to forecast, always within `MIN_DAYS..=MAX_DAYS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Horizon(u32);

impl Horizon {
    pub const MIN_DAYS: u32 = 1;
    pub const MAX_DAYS: u32 = 30;
    pub const DEFAULT: Horizon = Horizon(7);

    /// Reject anything outside 1..=30. Never clamps.
    pub fn new(days: u32) -> Result<Self, ForecastError> {
        if (Self::MIN_DAYS..=Self::MAX_DAYS).contains(&days) {
            Ok(Self(days))
        } else {
            Err(out_of_range())
        }
    }

    pub fn days(self) -> u32 {
        self.0
    }
}

fn out_of_range() -> ForecastError {
    ForecastError::InvalidParameter(format!(
        "days must be between {} and {}",
        Horizon::MIN_DAYS,
        Horizon::MAX_DAYS
    ))
}

impl Default for Horizon {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for Horizon {
    type Error = ForecastError;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        Self::new(days)
    }
}

impl FromStr for Horizon {
    type Err = ForecastError;

    /// Parse a whole number of days. Negative numbers are range errors;
    /// anything that is not an integer is rejected outright.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let days: i64 = s.trim().parse().map_err(|_| {
            ForecastError::InvalidParameter(format!("days must be an integer, got {s:?}"))
        })?;
        u32::try_from(days)
            .map_err(|_| out_of_range())
            .and_then(Self::new)
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        assert_eq!(Horizon::new(1).unwrap().days(), 1);
        assert_eq!(Horizon::new(30).unwrap().days(), 30);
        assert!(Horizon::new(0).is_err());
        assert!(Horizon::new(31).is_err());
    }

    #[test]
    fn default_is_a_week() {
        assert_eq!(Horizon::default().days(), 7);
    }

    #[test]
    fn parse_rejects_non_integers() {
        assert_eq!("14".parse::<Horizon>().unwrap().days(), 14);
        assert!(matches!(
            "7.5".parse::<Horizon>(),
            Err(ForecastError::InvalidParameter(m)) if m.contains("integer")
        ));
        assert!(matches!(
            "-3".parse::<Horizon>(),
            Err(ForecastError::InvalidParameter(m)) if m == "days must be between 1 and 30"
        ));
        assert!("".parse::<Horizon>().is_err());
    }
}

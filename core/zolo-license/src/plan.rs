//! License plan tokens.
//!
//! A plan is written as `<digits><unit>` where the unit is `D` (days) or
//! `Y` (years), e.g. `30D` or `1Y`.

use crate::error::{LicenseError, LicenseResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Largest plan quantity accepted by [`Plan::parse`].
pub const DEFAULT_MAX_PLAN_QUANTITY: u32 = 3650;

/// Duration unit of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanUnit {
    /// One day.
    Day,
    /// Fixed 365-day year.
    Year,
}

impl PlanUnit {
    /// Number of days in one unit.
    #[must_use]
    pub const fn days(&self) -> i64 {
        match self {
            Self::Day => 1,
            Self::Year => 365,
        }
    }

    const fn letter(&self) -> char {
        match self {
            Self::Day => 'D',
            Self::Year => 'Y',
        }
    }
}

/// A validated license plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Plan {
    quantity: u32,
    unit: PlanUnit,
}

impl Plan {
    /// Parses a plan token using [`DEFAULT_MAX_PLAN_QUANTITY`].
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidPlan`] if the token is malformed or
    /// the quantity is out of range.
    pub fn parse(token: &str) -> LicenseResult<Self> {
        Self::parse_with_max(token, DEFAULT_MAX_PLAN_QUANTITY)
    }

    /// Parses a plan token, accepting quantities in `1..=max_quantity`.
    pub fn parse_with_max(token: &str, max_quantity: u32) -> LicenseResult<Self> {
        let unit = match token.chars().last() {
            Some('D') => PlanUnit::Day,
            Some('Y') => PlanUnit::Year,
            _ => {
                return Err(LicenseError::InvalidPlan(format!(
                    "`{token}` must end with D or Y"
                )));
            }
        };

        let digits = &token[..token.len() - 1];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LicenseError::InvalidPlan(format!(
                "`{token}` must be <digits><D|Y>"
            )));
        }

        let quantity: u32 = digits
            .parse()
            .map_err(|_| LicenseError::InvalidPlan(format!("`{token}` quantity is too large")))?;

        if quantity == 0 || quantity > max_quantity {
            return Err(LicenseError::InvalidPlan(format!(
                "`{token}` quantity must be between 1 and {max_quantity}"
            )));
        }

        Ok(Self { quantity, unit })
    }

    /// Creates a plan from components without range checks.
    #[must_use]
    pub const fn new(quantity: u32, unit: PlanUnit) -> Self {
        Self { quantity, unit }
    }

    /// Returns the quantity.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the unit.
    #[must_use]
    pub const fn unit(&self) -> PlanUnit {
        self.unit
    }

    /// Total length of the plan in days.
    #[must_use]
    pub const fn total_days(&self) -> i64 {
        self.quantity as i64 * self.unit.days()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.quantity, self.unit.letter())
    }
}

impl FromStr for Plan {
    type Err = LicenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// Persisted plans were validated on creation, so only the grammar is
// re-checked when reading them back.
impl Serialize for Plan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Plan {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Self::parse_with_max(&token, u32::MAX).map_err(serde::de::Error::custom)
    }
}

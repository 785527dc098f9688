//! `NdM` dice notation

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Roller;
use crate::error::SiteRpgError;

static DICE_PATTERN: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"^\s*(\d*)\s*[dD]\s*(\d+)\s*$"));

/// A group of identical dice such as `2d6`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiceSpec {
    pub count: u32,
    pub sides: u32,
}

impl DiceSpec {
    pub const fn new(count: u32, sides: u32) -> Self {
        Self { count, sides }
    }

    pub fn roll<R: Roller + ?Sized>(&self, roller: &mut R) -> u32 {
        roller.dice(self.count, self.sides)
    }

    pub fn min(&self) -> u32 {
        self.count
    }

    pub fn max(&self) -> u32 {
        self.count * self.sides
    }
}

impl FromStr for DiceSpec {
    type Err = SiteRpgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SiteRpgError::InvalidDiceNotation(s.to_string());
        let pattern = DICE_PATTERN
            .as_ref()
            .map_err(|e| SiteRpgError::InvalidDiceNotation(e.to_string()))?;
        let caps = pattern.captures(s).ok_or_else(invalid)?;
        let count = match caps.get(1).map(|m| m.as_str()) {
            Some("") | None => 1,
            Some(digits) => digits.parse().map_err(|_| invalid())?,
        };
        let sides: u32 = caps[2].parse().map_err(|_| invalid())?;
        if count == 0 || sides == 0 {
            return Err(invalid());
        }
        Ok(Self { count, sides })
    }
}

impl TryFrom<String> for DiceSpec {
    type Error = SiteRpgError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DiceSpec> for String {
    fn from(spec: DiceSpec) -> Self {
        spec.to_string()
    }
}

impl fmt::Display for DiceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}

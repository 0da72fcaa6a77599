use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::api::error::ConfigError;

/// How aggressively user functions are stripped of unused captured state before they are
/// shipped to workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosureCleanerLevel {
    /// Cleaning is disabled.
    None,
    /// Only the top-level function is cleaned.
    TopLevel,
    /// The function and everything it references are cleaned.
    Recursive,
}

impl Default for ClosureCleanerLevel {
    fn default() -> Self {
        Self::Recursive
    }
}

impl ClosureCleanerLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClosureCleanerLevel::None => "none",
            ClosureCleanerLevel::TopLevel => "top_level",
            ClosureCleanerLevel::Recursive => "recursive",
        }
    }
}

impl fmt::Display for ClosureCleanerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClosureCleanerLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "none" => Ok(ClosureCleanerLevel::None),
            "top_level" => Ok(ClosureCleanerLevel::TopLevel),
            "recursive" => Ok(ClosureCleanerLevel::Recursive),
            other => Err(ConfigError::invalid(
                "closure cleaner level",
                format!("unknown level '{other}', expected none, top_level or recursive"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_levels() {
        assert_eq!("none".parse::<ClosureCleanerLevel>().unwrap(), ClosureCleanerLevel::None);
        assert_eq!("TOP-LEVEL".parse::<ClosureCleanerLevel>().unwrap(), ClosureCleanerLevel::TopLevel);
        assert_eq!(" recursive ".parse::<ClosureCleanerLevel>().unwrap(), ClosureCleanerLevel::Recursive);
        assert!("deep".parse::<ClosureCleanerLevel>().is_err());
    }
}

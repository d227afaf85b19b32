use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Viewing status of a watchlist item
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum WatchStatus {
    /// Planned, not started
    #[default]
    ToWatch,
    /// Started, some progress recorded
    Watching,
    /// Finished; entering this state writes a history entry
    Watched,
}

impl WatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WatchStatus::ToWatch => "to-watch",
            WatchStatus::Watching => "watching",
            WatchStatus::Watched => "watched",
        }
    }
}

impl fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "to-watch" | "towatch" | "to_watch" => Ok(WatchStatus::ToWatch),
            "watching" => Ok(WatchStatus::Watching),
            "watched" => Ok(WatchStatus::Watched),
            _ => Err(format!("Invalid status: {}. Use 'to-watch', 'watching' or 'watched'", s)),
        }
    }
}

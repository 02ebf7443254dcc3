//! Travel-stat classification: which nodes end a corridor.

use std::collections::HashSet;

/// Reward-style stat descriptions that mark a node as an exit point.
///
/// Must match the exported stat text verbatim.
pub const DEFAULT_TRAVEL_STATS: &[&str] = &[
    "0.5% chance for map drops to be duplicated",
    "1% increased Quantity of Items found in your Maps",
    "3% increased Scarabs found in your Maps",
    "2% increased effect of Explicit Modifiers on your Maps",
    "2% chance for one Monster in each of your Maps to drop an additional connected Map",
    "+10 to Strength",
    "+10 to Intelligence",
    "+10 to Dexterity",
];

/// Exact-match classifier over a fixed allow-list of stat strings.
#[derive(Debug, Clone)]
pub struct TravelStats {
    stats: HashSet<String>,
}

impl Default for TravelStats {
    fn default() -> Self {
        Self::new(DEFAULT_TRAVEL_STATS.iter().copied())
    }
}

impl TravelStats {
    pub fn new<I, S>(stats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stats: stats.into_iter().map(Into::into).collect(),
        }
    }

    /// True if any of `stats` is on the allow-list. No trimming or case folding.
    pub fn is_travel(&self, stats: &[String]) -> bool {
        stats.iter().any(|s| self.stats.contains(s))
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

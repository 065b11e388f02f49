//! Typed view of a parsed status grid

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Separator used in both keys and values of the flat mapping
pub const FIELD_SEPARATOR: &str = "--";

/// Status of a single build as shown in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BuildStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "failed")]
    Failed,
    #[serde(rename = "building")]
    Building,
}

impl BuildStatus {
    /// The literal token the build master renders for this status
    pub fn token(&self) -> &'static str {
        match self {
            BuildStatus::Ok => "OK",
            BuildStatus::Failed => "failed",
            BuildStatus::Building => "building",
        }
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.token())
    }
}

impl FromStr for BuildStatus {
    type Err = String;

    /// Tokens are case-sensitive: "ok" or "Failed" are not statuses.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OK" => Ok(BuildStatus::Ok),
            "failed" => Ok(BuildStatus::Failed),
            "building" => Ok(BuildStatus::Building),
            _ => Err(format!("Unknown build status token: '{}'", s)),
        }
    }
}

/// (revision, bot) pair identifying one grid cell
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GridKey {
    pub revision: String,
    pub bot: String,
}

impl fmt::Display for GridKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.revision, FIELD_SEPARATOR, self.bot)
    }
}

/// Build number and status found in one grid cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    pub build_number: String,
    pub status: BuildStatus,
}

impl fmt::Display for BuildResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.build_number, FIELD_SEPARATOR, self.status)
    }
}

/// Latest known build for a bot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BotSummary {
    pub bot: String,
    pub revision: String,
    pub build_number: String,
    pub status: BuildStatus,
}

/// All build statuses extracted from one grid page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusGrid {
    entries: BTreeMap<GridKey, BuildResult>,
}

impl StatusGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any earlier one for the same revision and bot
    pub fn insert(&mut self, key: GridKey, result: BuildResult) {
        self.entries.insert(key, result);
    }

    /// Fold another grid into this one; entries from `other` win on conflict
    pub fn merge(&mut self, other: StatusGrid) {
        self.entries.extend(other.entries);
    }

    pub fn get(&self, revision: &str, bot: &str) -> Option<&BuildResult> {
        self.entries.get(&GridKey {
            revision: revision.to_string(),
            bot: bot.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GridKey, &BuildResult)> {
        self.entries.iter()
    }

    /// Flatten to `"<revision>--<bot>"` -> `"<build_number>--<status>"`
    pub fn to_flat_map(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(key, result)| (key.to_string(), result.to_string()))
            .collect()
    }

    /// Most recent build per bot, ordered by bot name.
    ///
    /// Revisions are compared numerically; the grid only ever carries
    /// decimal revision numbers.
    pub fn latest_per_bot(&self) -> Vec<BotSummary> {
        let mut latest: BTreeMap<&str, (&GridKey, &BuildResult)> = BTreeMap::new();

        for (key, result) in &self.entries {
            let newer = match latest.get(key.bot.as_str()) {
                Some((current, _)) => revision_number(&key.revision) > revision_number(&current.revision),
                None => true,
            };
            if newer {
                latest.insert(key.bot.as_str(), (key, result));
            }
        }

        latest
            .into_values()
            .map(|(key, result)| BotSummary {
                bot: key.bot.clone(),
                revision: key.revision.clone(),
                build_number: result.build_number.clone(),
                status: result.status,
            })
            .collect()
    }
}

fn revision_number(revision: &str) -> u128 {
    revision.parse().unwrap_or(0)
}

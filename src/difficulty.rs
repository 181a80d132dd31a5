use std::fs;
use std::path::Path;

use enumset::{EnumSet, EnumSetType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::{Error, Result};

/// Deepest search a tier may ask for. Bounds recursion depth.
pub const MAX_SEARCH_DEPTH: u8 = 64;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
#[derive(EnumIter, EnumString, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    #[default]
    Hard,
}

/// Tactical shortcuts tried, in declaration order, before searching.
#[derive(EnumSetType, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreCheck {
    /// Complete one of our own lines.
    ImmediateWin,
    /// Occupy the cell the opponent would complete a line on.
    ImmediateBlock,
    /// Occupy the cell on which the opponent would fork two lines.
    DoubleThreat,
}

pub type PreChecks = EnumSet<PreCheck>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierConfig {
    /// Plies searched. Zero skips the search.
    pub search_depth: u8,
    #[serde(with = "pre_check_list")]
    pub pre_checks: PreChecks,
    /// Chance of answering with a uniformly random empty cell.
    pub random_move_probability: f64,
}

impl TierConfig {
    fn validate(&self, difficulty: Difficulty) -> Result<()> {
        if !(0.0..=1.0).contains(&self.random_move_probability) {
            return Err(Error::InvalidConfiguration {
                message: format!("{difficulty}: random_move_probability {} is not within [0, 1]", self.random_move_probability),
            });
        }
        if self.search_depth > MAX_SEARCH_DEPTH {
            return Err(Error::InvalidConfiguration {
                message: format!("{difficulty}: search_depth {} exceeds {MAX_SEARCH_DEPTH}", self.search_depth),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    pub easy: TierConfig,
    pub medium: TierConfig,
    pub hard: TierConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            easy: TierConfig {
                search_depth: 0,
                pre_checks: PreCheck::ImmediateWin | PreCheck::ImmediateBlock,
                random_move_probability: 0.5,
            },
            medium: TierConfig {
                search_depth: 6,
                pre_checks: EnumSet::all(),
                random_move_probability: 0.0,
            },
            hard: TierConfig {
                search_depth: 20,
                pre_checks: EnumSet::empty(),
                random_move_probability: 0.0,
            },
        }
    }
}

impl EngineConfig {
    pub fn tier(&self, difficulty: Difficulty) -> &TierConfig {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    pub fn validate(&self) -> Result<()> {
        use strum::IntoEnumIterator;
        Difficulty::iter().try_for_each(|difficulty| self.tier(difficulty).validate(difficulty))
    }

    /// Parses a JSON config. Omitted tiers and fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let overrides: Value = serde_json::from_str(json)?;
        let mut merged = serde_json::to_value(EngineConfig::default())?;
        merge(&mut merged, overrides);
        let config: EngineConfig = serde_json::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}

fn merge(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                merge(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (base, overrides) => *base = overrides,
    }
}

/// Pre-check sets travel as plain lists of names.
mod pre_check_list {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{PreCheck, PreChecks};

    pub fn serialize<S: Serializer>(checks: &PreChecks, serializer: S) -> Result<S::Ok, S::Error> {
        checks.iter().collect::<Vec<_>>().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PreChecks, D::Error> {
        Ok(Vec::<PreCheck>::deserialize(deserializer)?.into_iter().collect())
    }
}

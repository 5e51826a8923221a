//! Policy rules: the recognized knobs of the accrual model.
//!
//! The canonical configuration lives in `warren.yaml` at the project root.
//! All knobs default to the production values, so an empty file (or no
//! file) yields a fully-working rule set. The knobs are fixed for the
//! lifetime of the process -- they are configuration, not runtime state.
//!
//! `xp_per_feed` and `feed_cost` are numerically equal in the defaults.
//! They are deliberately independent knobs: nothing in the logic assumes
//! one XP per point spent.

use std::path::Path;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur when loading rules from disk.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    /// Failed to read the rules file from disk.
    #[error("failed to read rules file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse rules YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A knob holds a value the accrual logic cannot work with.
    #[error("invalid rules: {reason}")]
    Invalid {
        /// Explanation of what is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for RulesError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

// ---------------------------------------------------------------------------
// EnergyRules
// ---------------------------------------------------------------------------

/// Knobs governing energy regeneration, consumption, and refills.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnergyRules {
    /// Energy ceiling assigned to new players.
    #[serde(default = "default_max_energy")]
    pub max_energy: u32,
    /// Milliseconds between regeneration ticks.
    #[serde(default = "default_regen_interval_ms")]
    pub regen_interval_ms: u64,
    /// Regeneration only runs while energy is strictly below this value.
    /// The throttle avoids needless writes while a player is nearly full.
    #[serde(default = "default_regen_threshold")]
    pub regen_threshold: u32,
    /// Point cost per energy unit when refilling.
    #[serde(default = "default_points_per_energy")]
    pub points_per_energy: i64,
}

const fn default_max_energy() -> u32 {
    10
}

const fn default_regen_interval_ms() -> u64 {
    // 30 minutes
    30 * 60 * 1000
}

const fn default_regen_threshold() -> u32 {
    5
}

const fn default_points_per_energy() -> i64 {
    10
}

impl Default for EnergyRules {
    fn default() -> Self {
        Self {
            max_energy: default_max_energy(),
            regen_interval_ms: default_regen_interval_ms(),
            regen_threshold: default_regen_threshold(),
            points_per_energy: default_points_per_energy(),
        }
    }
}

// ---------------------------------------------------------------------------
// PetRules
// ---------------------------------------------------------------------------

/// Knobs governing pet progression and idle mining.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PetRules {
    /// Experience required for one level-up.
    #[serde(default = "default_xp_per_level")]
    pub xp_per_level: u32,
    /// Level ceiling; experience gain is inert beyond it.
    #[serde(default = "default_max_level")]
    pub max_level: u32,
    /// Unclaimed mining accrual is capped at this many hours of value.
    /// Accrual beyond the cap is forfeited, not banked.
    #[serde(default = "default_max_claim_hours")]
    pub max_claim_hours: u32,
}

const fn default_xp_per_level() -> u32 {
    1200
}

const fn default_max_level() -> u32 {
    10
}

const fn default_max_claim_hours() -> u32 {
    4
}

impl Default for PetRules {
    fn default() -> Self {
        Self {
            xp_per_level: default_xp_per_level(),
            max_level: default_max_level(),
            max_claim_hours: default_max_claim_hours(),
        }
    }
}

// ---------------------------------------------------------------------------
// FeedRules
// ---------------------------------------------------------------------------

/// Knobs governing pet feeding and the daily spend cap.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedRules {
    /// Point cost of a single feed action.
    #[serde(default = "default_feed_cost")]
    pub feed_cost: u32,
    /// Experience granted by a single feed action.
    #[serde(default = "default_xp_per_feed")]
    pub xp_per_feed: u32,
    /// Maximum points spendable on feeding per UTC calendar day.
    #[serde(default = "default_daily_spend_cap")]
    pub daily_spend_cap: u32,
    /// Maximum feed actions per request.
    #[serde(default = "default_max_feed_count")]
    pub max_feed_count: u32,
}

const fn default_feed_cost() -> u32 {
    20
}

const fn default_xp_per_feed() -> u32 {
    20
}

const fn default_daily_spend_cap() -> u32 {
    600
}

const fn default_max_feed_count() -> u32 {
    30
}

impl Default for FeedRules {
    fn default() -> Self {
        Self {
            feed_cost: default_feed_cost(),
            xp_per_feed: default_xp_per_feed(),
            daily_spend_cap: default_daily_spend_cap(),
            max_feed_count: default_max_feed_count(),
        }
    }
}

// ---------------------------------------------------------------------------
// GameRules
// ---------------------------------------------------------------------------

/// The complete rule set for the accrual model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GameRules {
    /// Energy knobs.
    #[serde(default)]
    pub energy: EnergyRules,
    /// Pet progression and mining knobs.
    #[serde(default)]
    pub pet: PetRules,
    /// Feeding knobs.
    #[serde(default)]
    pub feed: FeedRules,
}

impl GameRules {
    /// Load rules from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::Io`] if the file cannot be read,
    /// [`RulesError::Yaml`] if the content is not valid YAML, or
    /// [`RulesError::Invalid`] if a knob is out of range.
    pub fn from_file(path: &Path) -> Result<Self, RulesError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse rules from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::Yaml`] on malformed YAML or
    /// [`RulesError::Invalid`] if a knob is out of range.
    pub fn parse(yaml: &str) -> Result<Self, RulesError> {
        let rules: Self = serde_yml::from_str(yaml)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Check that the knobs form a workable rule set.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::Invalid`] naming the first bad knob.
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.energy.max_energy == 0 {
            return Err(RulesError::Invalid {
                reason: String::from("energy.max_energy must be at least 1"),
            });
        }
        if self.energy.regen_interval_ms == 0 {
            return Err(RulesError::Invalid {
                reason: String::from("energy.regen_interval_ms must be at least 1"),
            });
        }
        if self.energy.points_per_energy < 0 {
            return Err(RulesError::Invalid {
                reason: String::from("energy.points_per_energy must not be negative"),
            });
        }
        if self.pet.xp_per_level == 0 {
            return Err(RulesError::Invalid {
                reason: String::from("pet.xp_per_level must be at least 1"),
            });
        }
        if self.pet.max_level == 0 {
            return Err(RulesError::Invalid {
                reason: String::from("pet.max_level must be at least 1"),
            });
        }
        if self.feed.max_feed_count == 0 {
            return Err(RulesError::Invalid {
                reason: String::from("feed.max_feed_count must be at least 1"),
            });
        }
        Ok(())
    }
}

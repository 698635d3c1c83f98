//! Deduplication configuration
//!
//! Loaded from TOML or built in code. Every field has a default, so an empty
//! file is a valid configuration:
//!
//! ```toml
//! overlap_mode = "contain"
//! tie_break = ["origin", "length", "entity", "position"]
//! origin_order = ["manual", "addition", "auto"]
//! length_preference = "long"
//! position_preference = "first"
//! entity_priority = ["PERSON", "LOCATION"]
//! ```

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use shared_types::{Origin, RedactError};

/// When two detections count as the same region
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapMode {
    /// Identical span, or identical quads on the same page
    Exact,
    /// One is contained in the other
    Contain,
    /// Any positive overlap
    #[default]
    Overlap,
}

impl FromStr for OverlapMode {
    type Err = RedactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exact" => Ok(OverlapMode::Exact),
            "contain" | "contained" => Ok(OverlapMode::Contain),
            "overlap" => Ok(OverlapMode::Overlap),
            other => Err(RedactError::validation(format!(
                "Unknown overlap mode '{}' (expected exact, contain or overlap)",
                other
            ))),
        }
    }
}

impl fmt::Display for OverlapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OverlapMode::Exact => "exact",
            OverlapMode::Contain => "contain",
            OverlapMode::Overlap => "overlap",
        })
    }
}

/// One criterion of the survivor ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieBreak {
    Origin,
    Length,
    Entity,
    Position,
}

impl TieBreak {
    pub const DEFAULT_ORDER: [TieBreak; 4] = [
        TieBreak::Origin,
        TieBreak::Length,
        TieBreak::Entity,
        TieBreak::Position,
    ];
}

impl FromStr for TieBreak {
    type Err = RedactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "origin" => Ok(TieBreak::Origin),
            "length" => Ok(TieBreak::Length),
            "entity" => Ok(TieBreak::Entity),
            "position" => Ok(TieBreak::Position),
            other => Err(RedactError::validation(format!(
                "Unknown tie-break criterion '{}'",
                other
            ))),
        }
    }
}

/// Legacy single-rule survivor policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeepPolicy {
    Widest,
    First,
    Last,
    EntityOrder,
}

impl FromStr for KeepPolicy {
    type Err = RedactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "widest" => Ok(KeepPolicy::Widest),
            "first" => Ok(KeepPolicy::First),
            "last" => Ok(KeepPolicy::Last),
            "entity-order" => Ok(KeepPolicy::EntityOrder),
            other => Err(RedactError::validation(format!(
                "Unknown keep policy '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthPreference {
    #[default]
    Long,
    Short,
}

impl FromStr for LengthPreference {
    type Err = RedactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "long" => Ok(LengthPreference::Long),
            "short" => Ok(LengthPreference::Short),
            other => Err(RedactError::validation(format!(
                "Unknown length preference '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionPreference {
    #[default]
    First,
    Last,
}

impl FromStr for PositionPreference {
    type Err = RedactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first" => Ok(PositionPreference::First),
            "last" => Ok(PositionPreference::Last),
            other => Err(RedactError::validation(format!(
                "Unknown position preference '{}'",
                other
            ))),
        }
    }
}

/// A tie-break criterion with its preference resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    Origin,
    Length(LengthPreference),
    Entity,
    Position(PositionPreference),
}

/// Deduplication settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DedupeConfig {
    #[serde(default)]
    pub overlap_mode: OverlapMode,
    /// Explicit ranking; takes precedence over `keep`
    #[serde(default)]
    pub tie_break: Option<Vec<TieBreak>>,
    /// Legacy policy, used only when `tie_break` is absent
    #[serde(default)]
    pub keep: Option<KeepPolicy>,
    /// Origin buckets, best first. Unlisted origins rank as `auto`.
    #[serde(default = "default_origin_order")]
    pub origin_order: Vec<Origin>,
    #[serde(default)]
    pub length_preference: LengthPreference,
    #[serde(default)]
    pub position_preference: PositionPreference,
    /// Entities, best first. Unlisted entities rank last.
    #[serde(default)]
    pub entity_priority: Vec<String>,
}

fn default_origin_order() -> Vec<Origin> {
    vec![Origin::Manual, Origin::Addition, Origin::Auto]
}

impl Default for DedupeConfig {
    fn default() -> Self {
        Self {
            overlap_mode: OverlapMode::default(),
            tie_break: None,
            keep: None,
            origin_order: default_origin_order(),
            length_preference: LengthPreference::default(),
            position_preference: PositionPreference::default(),
            entity_priority: Vec::new(),
        }
    }
}

impl DedupeConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML is malformed
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read dedupe config: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse dedupe configuration")
    }

    pub fn with_overlap_mode(mut self, mode: OverlapMode) -> Self {
        self.overlap_mode = mode;
        self
    }

    pub fn with_tie_break(mut self, criteria: Vec<TieBreak>) -> Self {
        self.tie_break = Some(criteria);
        self
    }

    pub fn with_keep(mut self, keep: KeepPolicy) -> Self {
        self.keep = Some(keep);
        self
    }

    pub fn with_entity_priority<I, S>(mut self, entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entity_priority = entities.into_iter().map(Into::into).collect();
        self
    }

    /// The effective ranking: explicit `tie_break`, else the legacy `keep`
    /// policy, else the default order.
    pub fn criteria(&self) -> Vec<Criterion> {
        if let Some(tie_break) = &self.tie_break {
            return tie_break
                .iter()
                .map(|t| match t {
                    TieBreak::Origin => Criterion::Origin,
                    TieBreak::Length => Criterion::Length(self.length_preference),
                    TieBreak::Entity => Criterion::Entity,
                    TieBreak::Position => Criterion::Position(self.position_preference),
                })
                .collect();
        }

        match self.keep {
            Some(KeepPolicy::Widest) => vec![
                Criterion::Length(LengthPreference::Long),
                Criterion::Position(PositionPreference::First),
            ],
            Some(KeepPolicy::First) => vec![Criterion::Position(PositionPreference::First)],
            Some(KeepPolicy::Last) => vec![Criterion::Position(PositionPreference::Last)],
            Some(KeepPolicy::EntityOrder) => vec![
                Criterion::Entity,
                Criterion::Length(LengthPreference::Long),
                Criterion::Position(PositionPreference::First),
            ],
            None => vec![
                Criterion::Origin,
                Criterion::Length(self.length_preference),
                Criterion::Entity,
                Criterion::Position(self.position_preference),
            ],
        }
    }
}

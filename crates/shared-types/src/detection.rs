//! Detection value objects
//!
//! A detection is either a span over canonical text ([`PlainDetection`]) or a
//! set of rectangles on one page ([`StructuredDetection`]). Both are immutable
//! once built; the constructors validate and assign a deterministic id.

use std::fmt;
use std::str::FromStr;

use crate::error::{RedactError, Result};
use crate::id::{plain_detection_id, structured_detection_id};
use crate::types::Rect;

/// Who proposed a detection
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Entered by a user
    Manual,
    /// Added by a user-supplied rule or term list
    Addition,
    /// Proposed by the entity recognizer
    #[default]
    Auto,
    /// Any other label, lowercased
    Other(String),
}

impl Origin {
    pub fn as_str(&self) -> &str {
        match self {
            Origin::Manual => "manual",
            Origin::Addition => "addition",
            Origin::Auto => "auto",
            Origin::Other(label) => label,
        }
    }
}

impl FromStr for Origin {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Origin::from(s))
    }
}

impl From<&str> for Origin {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "manual" => Origin::Manual,
            "addition" => Origin::Addition,
            "auto" => Origin::Auto,
            other => Origin::Other(other.to_string()),
        }
    }
}

impl From<String> for Origin {
    fn from(s: String) -> Self {
        Origin::from(s.as_str())
    }
}

impl From<Origin> for String {
    fn from(o: Origin) -> Self {
        o.as_str().to_string()
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for Origin {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for Origin {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Origin::from(label))
    }
}

/// A span `[start, end)` in canonical codepoint offsets
#[derive(Debug, Clone, PartialEq)]
pub struct PlainDetection {
    pub id: String,
    pub entity: String,
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub origin: Origin,
}

impl PlainDetection {
    pub fn new(
        entity: impl Into<String>,
        text: impl Into<String>,
        start: usize,
        end: usize,
        origin: Origin,
    ) -> Result<Self> {
        let entity = entity.into();
        let text = text.into();
        let id = plain_detection_id(&entity, &text, start, end);
        let detection = Self {
            id,
            entity,
            text,
            start,
            end,
            origin,
        };
        detection.validate()?;
        Ok(detection)
    }

    pub fn validate(&self) -> Result<()> {
        if self.start >= self.end {
            return Err(RedactError::validation(format!(
                "Detection {} has empty or inverted span [{}, {})",
                self.id, self.start, self.end
            )));
        }
        Ok(())
    }

    /// Span length in codepoints
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Rectangles covering one region on a single page
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredDetection {
    pub id: String,
    pub entity: String,
    pub text: String,
    pub page: u32,
    pub quads: Vec<Rect>,
    pub origin: Origin,
}

impl StructuredDetection {
    pub fn new(
        entity: impl Into<String>,
        text: impl Into<String>,
        page: u32,
        quads: Vec<Rect>,
        origin: Origin,
    ) -> Result<Self> {
        let entity = entity.into();
        let text = text.into();
        let id = structured_detection_id(&entity, &text, page, &quads);
        let detection = Self {
            id,
            entity,
            text,
            page,
            quads,
            origin,
        };
        detection.validate()?;
        Ok(detection)
    }

    /// Quads must be non-empty and individually well-formed
    pub fn validate(&self) -> Result<()> {
        if self.quads.is_empty() {
            return Err(RedactError::validation(format!(
                "Detection {} on page {} has no quads",
                self.id, self.page
            )));
        }
        for quad in &self.quads {
            quad.validate_quad().map_err(|e| match e {
                RedactError::Validation(msg) => {
                    RedactError::Validation(format!("Detection {}: {}", self.id, msg))
                }
                other => other,
            })?;
        }
        Ok(())
    }

    /// Sum of quad areas
    pub fn area(&self) -> f64 {
        self.quads.iter().map(Rect::area).sum()
    }
}

/// Either kind of detection
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    Plain(PlainDetection),
    Structured(StructuredDetection),
}

impl Detection {
    pub fn id(&self) -> &str {
        match self {
            Detection::Plain(d) => &d.id,
            Detection::Structured(d) => &d.id,
        }
    }

    pub fn entity(&self) -> &str {
        match self {
            Detection::Plain(d) => &d.entity,
            Detection::Structured(d) => &d.entity,
        }
    }

    pub fn origin(&self) -> &Origin {
        match self {
            Detection::Plain(d) => &d.origin,
            Detection::Structured(d) => &d.origin,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Detection::Plain(d) => d.validate(),
            Detection::Structured(d) => d.validate(),
        }
    }
}

impl From<PlainDetection> for Detection {
    fn from(d: PlainDetection) -> Self {
        Detection::Plain(d)
    }
}

impl From<StructuredDetection> for Detection {
    fn from(d: StructuredDetection) -> Self {
        Detection::Structured(d)
    }
}

/// The two detection pools for one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionSet {
    pub plain: Vec<PlainDetection>,
    pub structured: Vec<StructuredDetection>,
}

impl DetectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.plain.is_empty() && self.structured.is_empty()
    }

    pub fn len(&self) -> usize {
        self.plain.len() + self.structured.len()
    }

    pub fn push(&mut self, detection: Detection) {
        match detection {
            Detection::Plain(d) => self.plain.push(d),
            Detection::Structured(d) => self.structured.push(d),
        }
    }

    /// All detections, plain pool first
    pub fn into_detections(self) -> Vec<Detection> {
        self.plain
            .into_iter()
            .map(Detection::Plain)
            .chain(self.structured.into_iter().map(Detection::Structured))
            .collect()
    }
}

impl FromIterator<Detection> for DetectionSet {
    fn from_iter<I: IntoIterator<Item = Detection>>(iter: I) -> Self {
        let mut set = DetectionSet::new();
        for detection in iter {
            set.push(detection);
        }
        set
    }
}

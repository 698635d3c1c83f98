//! Persisted JSON contract shared with the CLI and web front ends
//!
//! ```json
//! {
//!   "schema_version": "1",
//!   "source": { "path": "lease.pdf" },
//!   "content": { "plain_text": "...", "structured_text": null },
//!   "detections": {
//!     "plain": [{ "detection_id": "..", "text": "..", "entity": "PERSON",
//!                 "start": 0, "end": 4, "unit": "codepoint", "origin": "auto" }],
//!     "structured": [{ "detection_id": "..", "text": "..", "entity": "PERSON",
//!                      "page": 0, "quads": [[0, 0, 10, 10]], "origin": "manual" }]
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::detection::{DetectionSet, Origin, PlainDetection, StructuredDetection};
use crate::error::{RedactError, Result};
use crate::id::{plain_detection_id, structured_detection_id};
use crate::types::Rect;

pub const SCHEMA_VERSION: &str = "1";

/// Offsets are always counted in Unicode codepoints
pub const OFFSET_UNIT: &str = "codepoint";

fn default_schema_version() -> String {
    SCHEMA_VERSION.to_string()
}

fn default_unit() -> String {
    OFFSET_UNIT.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterchangeDocument {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    #[serde(default)]
    pub source: SourceInfo,
    pub content: Content,
    #[serde(default)]
    pub detections: DetectionEntries,
}

/// Where the document came from. Unknown keys are carried through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    /// Canonical text the plain offsets refer to
    pub plain_text: String,
    /// Parser-specific layout dump, passed through as-is
    #[serde(default)]
    pub structured_text: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionEntries {
    #[serde(default)]
    pub plain: Vec<PlainEntry>,
    #[serde(default)]
    pub structured: Vec<StructuredEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlainEntry {
    #[serde(default)]
    pub detection_id: Option<String>,
    pub text: String,
    pub entity: String,
    pub start: usize,
    pub end: usize,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default)]
    pub origin: Origin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredEntry {
    #[serde(default)]
    pub detection_id: Option<String>,
    pub text: String,
    pub entity: String,
    pub page: u32,
    /// Raw `[x0, y0, x1, y1]` lists; checked on conversion
    pub quads: Vec<Vec<f64>>,
    #[serde(default)]
    pub origin: Origin,
}

impl TryFrom<&PlainEntry> for PlainDetection {
    type Error = RedactError;

    fn try_from(entry: &PlainEntry) -> Result<Self> {
        if entry.unit != OFFSET_UNIT {
            return Err(RedactError::validation(format!(
                "Unsupported offset unit '{}', expected '{}'",
                entry.unit, OFFSET_UNIT
            )));
        }
        let id = entry.detection_id.clone().unwrap_or_else(|| {
            plain_detection_id(&entry.entity, &entry.text, entry.start, entry.end)
        });
        let detection = PlainDetection {
            id,
            entity: entry.entity.clone(),
            text: entry.text.clone(),
            start: entry.start,
            end: entry.end,
            origin: entry.origin.clone(),
        };
        detection.validate()?;
        Ok(detection)
    }
}

impl TryFrom<&StructuredEntry> for StructuredDetection {
    type Error = RedactError;

    fn try_from(entry: &StructuredEntry) -> Result<Self> {
        let quads = entry
            .quads
            .iter()
            .map(|q| Rect::try_from_slice(q))
            .collect::<Result<Vec<_>>>()?;
        let id = entry.detection_id.clone().unwrap_or_else(|| {
            structured_detection_id(&entry.entity, &entry.text, entry.page, &quads)
        });
        let detection = StructuredDetection {
            id,
            entity: entry.entity.clone(),
            text: entry.text.clone(),
            page: entry.page,
            quads,
            origin: entry.origin.clone(),
        };
        detection.validate()?;
        Ok(detection)
    }
}

impl From<&PlainDetection> for PlainEntry {
    fn from(d: &PlainDetection) -> Self {
        Self {
            detection_id: Some(d.id.clone()),
            text: d.text.clone(),
            entity: d.entity.clone(),
            start: d.start,
            end: d.end,
            unit: default_unit(),
            origin: d.origin.clone(),
        }
    }
}

impl From<&StructuredDetection> for StructuredEntry {
    fn from(d: &StructuredDetection) -> Self {
        Self {
            detection_id: Some(d.id.clone()),
            text: d.text.clone(),
            entity: d.entity.clone(),
            page: d.page,
            quads: d
                .quads
                .iter()
                .map(|q| <[f64; 4]>::from(*q).to_vec())
                .collect(),
            origin: d.origin.clone(),
        }
    }
}

impl InterchangeDocument {
    pub fn new(plain_text: impl Into<String>) -> Self {
        Self {
            schema_version: default_schema_version(),
            source: SourceInfo::default(),
            content: Content {
                plain_text: plain_text.into(),
                structured_text: None,
            },
            detections: DetectionEntries::default(),
        }
    }

    /// Validate every entry and convert to typed detection pools
    pub fn detection_set(&self) -> Result<DetectionSet> {
        let plain = self
            .detections
            .plain
            .iter()
            .map(PlainDetection::try_from)
            .collect::<Result<Vec<_>>>()?;
        let structured = self
            .detections
            .structured
            .iter()
            .map(StructuredDetection::try_from)
            .collect::<Result<Vec<_>>>()?;

        let text_len = self.content.plain_text.chars().count();
        if let Some(d) = plain.iter().find(|d| d.end > text_len) {
            return Err(RedactError::validation(format!(
                "Detection {} ends at {} beyond text length {}",
                d.id, d.end, text_len
            )));
        }

        Ok(DetectionSet { plain, structured })
    }

    /// Replace both detection pools
    pub fn set_detections(&mut self, set: &DetectionSet) {
        self.detections = DetectionEntries {
            plain: set.plain.iter().map(PlainEntry::from).collect(),
            structured: set.structured.iter().map(StructuredEntry::from).collect(),
        };
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

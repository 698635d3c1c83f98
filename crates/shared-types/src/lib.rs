//! Shared data model for span location and detection deduplication
//!
//! Character records come from the document parser, detections from the
//! entity recognizer or a user. Everything here is a plain value type.

pub mod detection;
pub mod error;
pub mod id;
pub mod interchange;
pub mod types;

pub use detection::{Detection, DetectionSet, Origin, PlainDetection, StructuredDetection};
pub use error::{RedactError, Result};
pub use interchange::InterchangeDocument;
pub use types::{CharacterRecord, PageRect, Rect, QUAD_EPSILON};

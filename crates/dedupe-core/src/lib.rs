//! Duplicate detection resolution
//!
//! Detections that refer to the same region (under a configurable
//! [`OverlapMode`]) are grouped into connected components, and one
//! representative per component is kept according to an ordered list of
//! tie-break criteria.
//!
//! ```
//! use dedupe_core::{DedupeConfig, Deduplicator, OverlapMode, TieBreak};
//! use shared_types::{Origin, PlainDetection};
//!
//! let pool = vec![
//!     PlainDetection::new("PERSON", "田中太郎", 0, 4, Origin::Auto).unwrap(),
//!     PlainDetection::new("PERSON", "田中太郎", 0, 4, Origin::Manual).unwrap(),
//! ];
//! let config = DedupeConfig::default()
//!     .with_overlap_mode(OverlapMode::Exact)
//!     .with_tie_break(vec![TieBreak::Origin]);
//!
//! let kept = Deduplicator::new(config).dedupe_plain(&pool).unwrap();
//! assert_eq!(kept.len(), 1);
//! assert_eq!(kept[0].origin, Origin::Manual);
//! ```

pub mod config;
pub mod dedupe;
pub mod graph;
pub mod relation;
pub mod tie_break;

pub use config::{
    Criterion, DedupeConfig, KeepPolicy, LengthPreference, OverlapMode, PositionPreference,
    TieBreak,
};
pub use dedupe::{DedupeReport, Deduplicator};
pub use tie_break::{Candidate, TieBreaker};

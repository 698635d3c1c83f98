//! Survivor selection within a duplicate group
//!
//! Each member gets a key tuple, one entry per criterion; the smallest key
//! wins. Input position is always the last component, so the choice is total
//! and deterministic.

use std::cmp::Ordering;

use shared_types::{Origin, PlainDetection, StructuredDetection};

use crate::config::{Criterion, DedupeConfig, LengthPreference, PositionPreference};

/// What the ranking needs to know about a detection
pub trait Candidate {
    fn origin(&self) -> &Origin;
    fn entity(&self) -> &str;
    /// Span length for text, total quad area for regions
    fn extent(&self) -> f64;
}

impl Candidate for PlainDetection {
    fn origin(&self) -> &Origin {
        &self.origin
    }

    fn entity(&self) -> &str {
        &self.entity
    }

    fn extent(&self) -> f64 {
        self.len() as f64
    }
}

impl Candidate for StructuredDetection {
    fn origin(&self) -> &Origin {
        &self.origin
    }

    fn entity(&self) -> &str {
        &self.entity
    }

    fn extent(&self) -> f64 {
        self.area()
    }
}

#[derive(Debug, Clone)]
pub struct TieBreaker {
    criteria: Vec<Criterion>,
    origin_order: Vec<Origin>,
    entity_priority: Vec<String>,
}

impl TieBreaker {
    pub fn from_config(config: &DedupeConfig) -> Self {
        Self {
            criteria: config.criteria(),
            origin_order: config.origin_order.clone(),
            entity_priority: config.entity_priority.clone(),
        }
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// Bucket position; unrecognized origins share the `auto` bucket
    fn origin_rank(&self, origin: &Origin) -> usize {
        let position = |o: &Origin| self.origin_order.iter().position(|x| x == o);
        position(origin)
            .or_else(|| position(&Origin::Auto))
            .unwrap_or(self.origin_order.len())
    }

    fn entity_rank(&self, entity: &str) -> usize {
        self.entity_priority
            .iter()
            .position(|e| e.eq_ignore_ascii_case(entity))
            .unwrap_or(self.entity_priority.len())
    }

    /// Order two pool members; `Less` means `a` is preferred
    pub fn compare<C: Candidate>(&self, (ia, a): (usize, &C), (ib, b): (usize, &C)) -> Ordering {
        for criterion in &self.criteria {
            let ordering = match criterion {
                Criterion::Origin => self
                    .origin_rank(a.origin())
                    .cmp(&self.origin_rank(b.origin())),
                Criterion::Length(LengthPreference::Long) => b.extent().total_cmp(&a.extent()),
                Criterion::Length(LengthPreference::Short) => a.extent().total_cmp(&b.extent()),
                Criterion::Entity => self
                    .entity_rank(a.entity())
                    .cmp(&self.entity_rank(b.entity())),
                Criterion::Position(PositionPreference::First) => ia.cmp(&ib),
                Criterion::Position(PositionPreference::Last) => ib.cmp(&ia),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        ia.cmp(&ib)
    }

    /// Pick the survivor among `members` (indices into `pool`)
    pub fn select<C: Candidate>(&self, pool: &[C], members: &[usize]) -> Option<usize> {
        members
            .iter()
            .copied()
            .min_by(|&a, &b| self.compare((a, &pool[a]), (b, &pool[b])))
    }
}

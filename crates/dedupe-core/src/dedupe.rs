//! Collapse duplicate detections to one representative per group

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;
use shared_types::{DetectionSet, PlainDetection, Result, StructuredDetection};
use tracing::debug;

use crate::config::{DedupeConfig, OverlapMode};
use crate::graph::UnionFind;
use crate::relation::{plain_duplicates, plain_key, structured_duplicates, structured_key};
use crate::tie_break::{Candidate, TieBreaker};

/// Counts before and after deduplication
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DedupeReport {
    pub plain_in: usize,
    pub plain_kept: usize,
    pub structured_in: usize,
    pub structured_kept: usize,
}

/// Stateless deduplication engine; one instance can serve any number of documents
#[derive(Debug, Clone)]
pub struct Deduplicator {
    config: DedupeConfig,
    tie_breaker: TieBreaker,
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self::new(DedupeConfig::default())
    }
}

impl Deduplicator {
    pub fn new(config: DedupeConfig) -> Self {
        let tie_breaker = TieBreaker::from_config(&config);
        Self {
            config,
            tie_breaker,
        }
    }

    pub fn config(&self) -> &DedupeConfig {
        &self.config
    }

    /// Deduplicate both pools independently.
    ///
    /// Every detection in both pools is validated before any grouping starts.
    pub fn run(&self, set: &DetectionSet) -> Result<DetectionSet> {
        self.run_with_report(set).map(|(set, _)| set)
    }

    pub fn run_with_report(&self, set: &DetectionSet) -> Result<(DetectionSet, DedupeReport)> {
        for d in &set.plain {
            d.validate()?;
        }
        for d in &set.structured {
            d.validate()?;
        }

        let plain = self.select(&set.plain, self.plain_components(&set.plain));
        let structured = self.select(&set.structured, self.structured_components(&set.structured));

        let report = DedupeReport {
            plain_in: set.plain.len(),
            plain_kept: plain.len(),
            structured_in: set.structured.len(),
            structured_kept: structured.len(),
        };
        debug!(
            mode = %self.config.overlap_mode,
            plain_in = report.plain_in,
            plain_kept = report.plain_kept,
            structured_in = report.structured_in,
            structured_kept = report.structured_kept,
            "Deduplicated detections"
        );

        Ok((DetectionSet { plain, structured }, report))
    }

    pub fn dedupe_plain(&self, pool: &[PlainDetection]) -> Result<Vec<PlainDetection>> {
        for d in pool {
            d.validate()?;
        }
        Ok(self.select(pool, self.plain_components(pool)))
    }

    pub fn dedupe_structured(
        &self,
        pool: &[StructuredDetection],
    ) -> Result<Vec<StructuredDetection>> {
        for d in pool {
            d.validate()?;
        }
        Ok(self.select(pool, self.structured_components(pool)))
    }

    fn plain_components(&self, pool: &[PlainDetection]) -> Vec<Vec<usize>> {
        let mode = self.config.overlap_mode;
        if mode == OverlapMode::Exact {
            return group_by_key(pool, plain_key);
        }

        let mut uf = UnionFind::new(pool.len());
        for i in 0..pool.len() {
            for j in (i + 1)..pool.len() {
                if plain_duplicates(mode, &pool[i], &pool[j]) {
                    uf.union(i, j);
                }
            }
        }
        uf.components()
    }

    fn structured_components(&self, pool: &[StructuredDetection]) -> Vec<Vec<usize>> {
        let mode = self.config.overlap_mode;
        if mode == OverlapMode::Exact {
            return group_by_key(pool, structured_key);
        }

        // Only detections on the same page can be duplicates
        let mut by_page: HashMap<u32, Vec<usize>> = HashMap::new();
        for (i, d) in pool.iter().enumerate() {
            by_page.entry(d.page).or_default().push(i);
        }

        let mut uf = UnionFind::new(pool.len());
        for members in by_page.values() {
            for (n, &i) in members.iter().enumerate() {
                for &j in &members[n + 1..] {
                    if structured_duplicates(mode, &pool[i], &pool[j]) {
                        uf.union(i, j);
                    }
                }
            }
        }
        uf.components()
    }

    /// One survivor per component, returned in original relative order
    fn select<C: Candidate + Clone>(&self, pool: &[C], components: Vec<Vec<usize>>) -> Vec<C> {
        let mut survivors: Vec<usize> = components
            .iter()
            .filter_map(|members| self.tie_breaker.select(pool, members))
            .collect();
        survivors.sort_unstable();
        survivors.into_iter().map(|i| pool[i].clone()).collect()
    }
}

/// Components of the equality relation on `key`, via hashing
fn group_by_key<T, K, F>(pool: &[T], key: F) -> Vec<Vec<usize>>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut slots: HashMap<K, usize> = HashMap::with_capacity(pool.len());
    let mut components: Vec<Vec<usize>> = Vec::new();

    for (i, item) in pool.iter().enumerate() {
        let slot = *slots.entry(key(item)).or_insert_with(|| {
            components.push(Vec::new());
            components.len() - 1
        });
        components[slot].push(i);
    }

    components
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::config::TieBreak;
    use proptest::prelude::*;
    use shared_types::Origin;

    fn origin_strategy() -> impl Strategy<Value = Origin> {
        prop_oneof![Just(Origin::Auto), Just(Origin::Manual), Just(Origin::Addition)]
    }

    fn pool_strategy() -> impl Strategy<Value = Vec<PlainDetection>> {
        prop::collection::vec((0usize..20, 1usize..6, origin_strategy()), 0..30).prop_map(|spans| {
            spans
                .into_iter()
                .map(|(start, len, origin)| {
                    PlainDetection::new("E", "x", start, start + len, origin).unwrap()
                })
                .collect()
        })
    }

    proptest! {
        /// Property: under exact mode, no two survivors share a span
        #[test]
        fn exact_survivors_are_unique(pool in pool_strategy()) {
            let dedup = Deduplicator::new(
                DedupeConfig::default().with_overlap_mode(OverlapMode::Exact),
            );
            let kept = dedup.dedupe_plain(&pool).unwrap();

            let mut spans: Vec<_> = kept.iter().map(|d| (d.start, d.end)).collect();
            let total = spans.len();
            spans.sort_unstable();
            spans.dedup();
            prop_assert_eq!(spans.len(), total);

            let mut distinct: Vec<_> = pool.iter().map(|d| (d.start, d.end)).collect();
            distinct.sort_unstable();
            distinct.dedup();
            prop_assert_eq!(distinct.len(), total);
        }

        /// Property: with position ranking, the first-seen duplicate survives
        #[test]
        fn exact_position_keeps_first_seen(pool in pool_strategy()) {
            let dedup = Deduplicator::new(
                DedupeConfig::default()
                    .with_overlap_mode(OverlapMode::Exact)
                    .with_tie_break(vec![TieBreak::Position]),
            );
            let kept = dedup.dedupe_plain(&pool).unwrap();

            for survivor in &kept {
                let first = pool
                    .iter()
                    .find(|d| (d.start, d.end) == (survivor.start, survivor.end))
                    .unwrap();
                prop_assert_eq!(first, survivor);
            }
        }

        /// Property: under overlap mode, survivors are pairwise disjoint
        #[test]
        fn overlap_survivors_are_disjoint(pool in pool_strategy()) {
            let kept = Deduplicator::default().dedupe_plain(&pool).unwrap();

            for (i, a) in kept.iter().enumerate() {
                for b in &kept[i + 1..] {
                    prop_assert!(!(a.start < b.end && b.start < a.end));
                }
            }
        }

        /// Property: deduplication is idempotent
        #[test]
        fn dedupe_is_idempotent(pool in pool_strategy()) {
            let dedup = Deduplicator::default();
            let once = dedup.dedupe_plain(&pool).unwrap();
            let twice = dedup.dedupe_plain(&once).unwrap();
            prop_assert_eq!(once, twice);
        }
    }
}

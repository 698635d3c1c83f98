//! The duplicate relation for each overlap mode

use shared_types::{PlainDetection, StructuredDetection, QUAD_EPSILON};

use crate::config::OverlapMode;

/// Grouping key for exact plain matches
pub(crate) fn plain_key(d: &PlainDetection) -> (usize, usize) {
    (d.start, d.end)
}

/// Grouping key for exact structured matches: page plus the snapped,
/// order-independent quad multiset
pub(crate) fn structured_key(d: &StructuredDetection) -> (u32, Vec<[i64; 4]>) {
    let mut quads: Vec<[i64; 4]> = d.quads.iter().map(|q| q.snapped(QUAD_EPSILON)).collect();
    quads.sort_unstable();
    (d.page, quads)
}

pub fn plain_duplicates(mode: OverlapMode, a: &PlainDetection, b: &PlainDetection) -> bool {
    match mode {
        OverlapMode::Exact => plain_key(a) == plain_key(b),
        OverlapMode::Contain => {
            (a.start <= b.start && b.end <= a.end) || (b.start <= a.start && a.end <= b.end)
        }
        OverlapMode::Overlap => a.start < b.end && b.start < a.end,
    }
}

/// Detections on different pages are never duplicates
pub fn structured_duplicates(
    mode: OverlapMode,
    a: &StructuredDetection,
    b: &StructuredDetection,
) -> bool {
    if a.page != b.page {
        return false;
    }
    match mode {
        OverlapMode::Exact => structured_key(a) == structured_key(b),
        OverlapMode::Contain => quads_within(a, b) || quads_within(b, a),
        OverlapMode::Overlap => a
            .quads
            .iter()
            .any(|qa| b.quads.iter().any(|qb| qa.intersects(qb))),
    }
}

/// Every quad of `inner` fits inside some quad of `outer`
fn quads_within(inner: &StructuredDetection, outer: &StructuredDetection) -> bool {
    inner
        .quads
        .iter()
        .all(|q| outer.quads.iter().any(|o| o.contains(q, QUAD_EPSILON)))
}

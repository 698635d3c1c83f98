//! Reshape span detections into per-page rectangle detections
//!
//! The masking step draws quads, not offsets. Each plain detection becomes one
//! structured detection per page it touches, carrying one quad per line.

use shared_types::{PageRect, PlainDetection, Result, StructuredDetection};
use tracing::{debug, warn};

use crate::resolver::Locate;

/// Resolve one plain detection into structured detections, in page order of
/// first appearance. Returns an empty list when no glyph has coordinates.
pub fn project<L: Locate + ?Sized>(
    locator: &L,
    detection: &PlainDetection,
) -> Result<Vec<StructuredDetection>> {
    detection.validate()?;
    let rects = locator.locate(detection.start, detection.end)?;

    let mut pages: Vec<(u32, Vec<PageRect>)> = Vec::new();
    for page_rect in rects {
        // Zero-width glyphs resolve to lines with no area; nothing to mask there
        if page_rect.rect.area() <= 0.0 {
            debug!(
                detection_id = %detection.id,
                page = page_rect.page,
                "Skipping degenerate line rectangle"
            );
            continue;
        }
        match pages.iter_mut().find(|(page, _)| *page == page_rect.page) {
            Some((_, group)) => group.push(page_rect),
            None => pages.push((page_rect.page, vec![page_rect])),
        }
    }

    pages
        .into_iter()
        .map(|(page, group)| {
            StructuredDetection::new(
                detection.entity.clone(),
                detection.text.clone(),
                page,
                group.into_iter().map(|r| r.rect).collect(),
                detection.origin.clone(),
            )
        })
        .collect()
}

/// Project a batch, skipping detections that have no visual coordinates
pub fn project_all<L: Locate + ?Sized>(
    locator: &L,
    detections: &[PlainDetection],
) -> Result<Vec<StructuredDetection>> {
    let mut projected = Vec::with_capacity(detections.len());

    for detection in detections {
        let structured = project(locator, detection)?;
        if structured.is_empty() {
            warn!(
                detection_id = %detection.id,
                start = detection.start,
                end = detection.end,
                "No visual coordinates for detection"
            );
            continue;
        }
        projected.extend(structured);
    }

    Ok(projected)
}

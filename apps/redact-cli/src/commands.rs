use anyhow::Context;
use dedupe_core::{DedupeConfig, Deduplicator};
use pdf_locator::{project_all, CachedResolver, CoordinateResolver, Locate, TextIndex};
use shared_types::{CharacterRecord, InterchangeDocument, PageRect};

fn parse_records(chars_json: &str) -> anyhow::Result<Vec<CharacterRecord>> {
    serde_json::from_str(chars_json).context("Failed to parse character records")
}

/// Deduplicate both detection pools of an interchange document
pub fn dedupe_document(document_json: &str, config: DedupeConfig) -> anyhow::Result<String> {
    let mut document = InterchangeDocument::from_json(document_json)
        .context("Failed to parse interchange document")?;
    let set = document
        .detection_set()
        .context("Invalid detections in interchange document")?;

    let (deduped, report) = Deduplicator::new(config).run_with_report(&set)?;
    tracing::info!(
        plain = %format!("{} -> {}", report.plain_in, report.plain_kept),
        structured = %format!("{} -> {}", report.structured_in, report.structured_kept),
        "Deduplication finished"
    );

    document.set_detections(&deduped);
    Ok(document.to_json()?)
}

/// Resolve one canonical span and render the rectangles as JSON
pub fn locate_span(chars_json: &str, start: usize, end: usize) -> anyhow::Result<String> {
    let index = TextIndex::build(parse_records(chars_json)?);
    let rects: Vec<PageRect> = CoordinateResolver::new(&index)
        .locate(start, end)
        .with_context(|| format!("Failed to locate span [{}, {})", start, end))?;

    if rects.is_empty() {
        tracing::warn!(start, end, "Span has no visual coordinates");
    }
    Ok(serde_json::to_string_pretty(&rects)?)
}

/// Project every plain detection into structured detections and append them
pub fn project_document(chars_json: &str, document_json: &str) -> anyhow::Result<String> {
    let index = TextIndex::build(parse_records(chars_json)?);
    let mut document = InterchangeDocument::from_json(document_json)
        .context("Failed to parse interchange document")?;

    if document.content.plain_text != index.canonical_text() {
        anyhow::bail!("Document plain_text does not match the character records' canonical text");
    }

    let mut set = document.detection_set()?;
    let resolver = CachedResolver::new(&index);
    let projected = project_all(&resolver, &set.plain)?;
    tracing::info!(
        plain = set.plain.len(),
        projected = projected.len(),
        "Projected plain detections"
    );

    set.structured.extend(projected);
    document.set_detections(&set);
    Ok(document.to_json()?)
}

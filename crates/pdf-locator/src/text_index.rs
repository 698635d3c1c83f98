//! Canonical text index over a parsed character stream
//!
//! The parser hands us glyphs in reading order, with inferred line and page
//! breaks interleaved as structural markers. Entity detection runs over the
//! *canonical* text (markers removed), so every canonical codepoint offset
//! must map back to exactly one glyph record.

use shared_types::{CharacterRecord, RedactError, Result};
use tracing::debug;

/// Immutable index built once per loaded document
#[derive(Debug, Clone, Default)]
pub struct TextIndex {
    pub(crate) records: Vec<CharacterRecord>,
    pub(crate) full_text: String,
    pub(crate) canonical_text: String,
    /// codepoint count of `canonical_text`
    pub(crate) canonical_len: usize,
    /// canonical offset -> record index, strictly increasing
    pub(crate) offset_to_record: Vec<usize>,
    /// record index -> canonical offset (None for structural markers)
    pub(crate) record_to_offset: Vec<Option<usize>>,
}

impl TextIndex {
    /// Build the index in a single pass over records in reading order
    pub fn build(records: Vec<CharacterRecord>) -> Self {
        let mut full_text = String::with_capacity(records.len());
        let mut canonical_text = String::with_capacity(records.len());
        let mut offset_to_record = Vec::with_capacity(records.len());
        let mut record_to_offset = Vec::with_capacity(records.len());

        for (record_index, record) in records.iter().enumerate() {
            full_text.push(record.ch);

            if record.is_structural() {
                record_to_offset.push(None);
                continue;
            }

            record_to_offset.push(Some(offset_to_record.len()));
            offset_to_record.push(record_index);
            canonical_text.push(record.ch);
        }

        debug!(
            records = records.len(),
            canonical_len = offset_to_record.len(),
            "Built text index"
        );

        Self {
            records,
            full_text,
            canonical_text,
            canonical_len: offset_to_record.len(),
            offset_to_record,
            record_to_offset,
        }
    }

    /// Build from per-page record lists, inserting a page-end marker between pages
    pub fn from_pages<I>(pages: I) -> Self
    where
        I: IntoIterator<Item = Vec<CharacterRecord>>,
    {
        let mut records: Vec<CharacterRecord> = Vec::new();

        for page in pages {
            if let Some(last) = records.last() {
                if !last.is_structural() {
                    let mut marker = CharacterRecord::line_break(last.page, last.block, last.line);
                    marker.origin_index = last.origin_index;
                    records.push(marker);
                }
            }
            records.extend(page);
        }

        Self::build(records)
    }

    /// Text including structural newlines
    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    /// Text with structural newlines stripped; the offset space for detections
    pub fn canonical_text(&self) -> &str {
        &self.canonical_text
    }

    /// Canonical length in codepoints
    pub fn canonical_len(&self) -> usize {
        self.canonical_len
    }

    pub fn records(&self) -> &[CharacterRecord] {
        &self.records
    }

    pub fn record(&self, record_index: usize) -> Option<&CharacterRecord> {
        self.records.get(record_index)
    }

    pub fn record_for_offset(&self, offset: usize) -> Option<usize> {
        self.offset_to_record.get(offset).copied()
    }

    pub fn offset_for_record(&self, record_index: usize) -> Option<usize> {
        self.record_to_offset.get(record_index).copied().flatten()
    }

    /// Check `0 <= start < end <= canonical_len`
    pub fn validate_span(&self, start: usize, end: usize) -> Result<()> {
        if start >= end {
            return Err(RedactError::validation(format!(
                "Span [{}, {}) is empty or inverted",
                start, end
            )));
        }
        if end > self.canonical_len() {
            return Err(RedactError::validation(format!(
                "Span [{}, {}) exceeds canonical text length {}",
                start,
                end,
                self.canonical_len()
            )));
        }
        Ok(())
    }

    /// Canonical substring for a codepoint range
    pub fn slice(&self, start: usize, end: usize) -> Result<String> {
        self.validate_span(start, end)?;
        Ok(self
            .canonical_text
            .chars()
            .skip(start)
            .take(end - start)
            .collect())
    }

    /// Record index range `[record(start), record(end - 1)]` backing a span
    pub(crate) fn record_range(&self, start: usize, end: usize) -> Result<(usize, usize)> {
        self.validate_span(start, end)?;
        let first = self
            .record_for_offset(start)
            .ok_or(RedactError::MappingGap { offset: start })?;
        let last = self
            .record_for_offset(end - 1)
            .ok_or(RedactError::MappingGap { offset: end - 1 })?;
        Ok((first, last))
    }
}

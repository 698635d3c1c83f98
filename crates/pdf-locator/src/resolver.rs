//! Offset range to page rectangles

use std::collections::HashMap;

use shared_types::{PageRect, Result};

use crate::text_index::TextIndex;

/// Anything that can turn a canonical span into page rectangles
pub trait Locate {
    /// Rectangles covering `[start, end)`, one per visual line touched.
    ///
    /// An empty list means the span is valid but none of its glyphs carry
    /// coordinates.
    fn locate(&self, start: usize, end: usize) -> Result<Vec<PageRect>>;
}

/// Resolves spans against one immutable [`TextIndex`]
#[derive(Debug, Clone, Copy)]
pub struct CoordinateResolver<'a> {
    index: &'a TextIndex,
}

impl<'a> CoordinateResolver<'a> {
    pub fn new(index: &'a TextIndex) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &'a TextIndex {
        self.index
    }
}

impl Locate for CoordinateResolver<'_> {
    fn locate(&self, start: usize, end: usize) -> Result<Vec<PageRect>> {
        let (first, last) = self.index.record_range(start, end)?;

        // Keyed by (page, line); a span revisiting a key widens its first group
        let mut groups: Vec<PageRect> = Vec::new();
        let mut slots: HashMap<(u32, u32), usize> = HashMap::new();

        for record in &self.index.records[first..=last] {
            let Some(bbox) = record.bbox else {
                continue;
            };

            let key = (record.page, record.line);
            match slots.get(&key) {
                Some(&slot) => {
                    let group = &mut groups[slot];
                    group.rect = group.rect.union(&bbox);
                }
                None => {
                    slots.insert(key, groups.len());
                    groups.push(PageRect {
                        page: record.page,
                        rect: bbox,
                    });
                }
            }
        }

        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_index::fixtures::*;
    use pretty_assertions::assert_eq;
    use shared_types::{CharacterRecord, RedactError, Rect};

    #[test]
    fn test_locate_two_lines() {
        let index = TextIndex::build(two_line_records());
        let resolver = CoordinateResolver::new(&index);

        let rects = resolver.locate(0, 10).unwrap();

        assert_eq!(
            rects,
            vec![
                PageRect {
                    page: 0,
                    rect: Rect::new(0.0, 0.0, 40.0, 12.0)
                },
                PageRect {
                    page: 0,
                    rect: Rect::new(0.0, 20.0, 60.0, 32.0)
                },
            ]
        );
    }

    #[test]
    fn test_locate_bounds_only_covered_glyphs() {
        let index = TextIndex::build(two_line_records());
        let resolver = CoordinateResolver::new(&index);

        // "郎東京" -> last glyph of line 0, first two of line 1
        let rects = resolver.locate(3, 6).unwrap();

        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0].rect, Rect::new(30.0, 0.0, 40.0, 12.0));
        assert_eq!(rects[1].rect, Rect::new(0.0, 20.0, 20.0, 32.0));
    }

    #[test]
    fn test_locate_single_line_yields_one_rect() {
        let index = TextIndex::build(two_line_records());
        let rects = CoordinateResolver::new(&index).locate(5, 8).unwrap();

        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0].rect, Rect::new(10.0, 20.0, 40.0, 32.0));
    }

    #[test]
    fn test_locate_splits_page_boundary() {
        let index = TextIndex::from_pages(vec![line("ab", 0, 0, 700.0), line("cd", 1, 0, 700.0)]);
        let rects = CoordinateResolver::new(&index).locate(1, 3).unwrap();

        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0].page, 0);
        assert_eq!(rects[1].page, 1);
        assert_eq!(rects[0].rect, Rect::new(10.0, 700.0, 20.0, 712.0));
        assert_eq!(rects[1].rect, Rect::new(0.0, 700.0, 10.0, 712.0));
    }

    #[test]
    fn test_locate_without_coordinates_is_empty() {
        let mut records = line("abc", 0, 0, 0.0);
        for record in &mut records {
            record.bbox = None;
        }
        let index = TextIndex::build(records);

        let rects = CoordinateResolver::new(&index).locate(0, 3).unwrap();
        assert!(rects.is_empty());
    }

    #[test]
    fn test_locate_skips_glyphs_without_bbox() {
        let mut records = line("abc", 0, 0, 0.0);
        records[1].bbox = None;
        let index = TextIndex::build(records);

        let rects = CoordinateResolver::new(&index).locate(0, 3).unwrap();
        assert_eq!(rects[0].rect, Rect::new(0.0, 0.0, 30.0, 12.0));
    }

    #[test]
    fn test_zero_width_glyph_gives_degenerate_rect() {
        let records = vec![CharacterRecord::glyph(
            '\u{200b}',
            Rect::new(5.0, 0.0, 5.0, 12.0),
            0,
            0,
            0,
            0,
        )];
        let index = TextIndex::build(records);

        let rects = CoordinateResolver::new(&index).locate(0, 1).unwrap();
        assert_eq!(rects[0].rect.width(), 0.0);
    }

    #[test]
    fn test_locate_rejects_invalid_spans() {
        let index = TextIndex::build(two_line_records());
        let resolver = CoordinateResolver::new(&index);

        assert!(matches!(resolver.locate(4, 4), Err(RedactError::Validation(_))));
        assert!(matches!(resolver.locate(6, 2), Err(RedactError::Validation(_))));
        assert!(matches!(resolver.locate(0, 11), Err(RedactError::Validation(_))));
    }

    #[test]
    fn test_locate_reports_mapping_gap() {
        let mut index = TextIndex::build(two_line_records());
        // Corrupt the map so the last two offsets have no record behind them
        index.offset_to_record.truncate(8);

        let err = CoordinateResolver::new(&index).locate(0, 10).unwrap_err();
        assert_eq!(err, RedactError::MappingGap { offset: 9 });
        assert!(CoordinateResolver::new(&index).locate(0, 8).is_ok());
    }

    #[test]
    fn test_revisited_line_merges_into_first_group() {
        let mut records = line("ab", 0, 0, 0.0);
        records.extend(line("cd", 0, 1, 20.0));
        let mut tail = line("ef", 0, 0, 0.0);
        for (i, record) in tail.iter_mut().enumerate() {
            let x = 50.0 + i as f64 * 10.0;
            record.bbox = Some(Rect::new(x, 0.0, x + 10.0, 12.0));
        }
        records.extend(tail);
        let index = TextIndex::build(records);

        let rects = CoordinateResolver::new(&index).locate(0, 6).unwrap();

        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0].rect, Rect::new(0.0, 0.0, 70.0, 12.0));
        assert_eq!(rects[1].rect, Rect::new(0.0, 20.0, 20.0, 32.0));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::text_index::fixtures::line;
    use proptest::prelude::*;

    fn document() -> TextIndex {
        let mut records = Vec::new();
        for (n, text) in ["the quick brown", "fox jumps over", "the lazy dog"].iter().enumerate() {
            if n > 0 {
                records.push(shared_types::CharacterRecord::line_break(0, 0, n as u32 - 1));
            }
            records.extend(line(text, (n / 2) as u32, n as u32, n as f64 * 20.0));
        }
        TextIndex::build(records)
    }

    proptest! {
        /// Property: returned rectangles cover every glyph box in the span
        #[test]
        fn rects_cover_every_glyph(start in 0usize..41, len in 1usize..41) {
            let index = document();
            let end = (start + len).min(index.canonical_len());
            prop_assume!(start < end);

            let rects = CoordinateResolver::new(&index).locate(start, end).unwrap();
            for offset in start..end {
                let record = index.record(index.record_for_offset(offset).unwrap()).unwrap();
                let bbox = record.bbox.unwrap();
                prop_assert!(rects
                    .iter()
                    .any(|r| r.page == record.page && r.rect.contains(&bbox, 0.0)));
            }
        }

        /// Property: locate is a pure function of the index
        #[test]
        fn locate_is_idempotent(start in 0usize..41, len in 1usize..41) {
            let index = document();
            let end = (start + len).min(index.canonical_len());
            prop_assume!(start < end);

            let resolver = CoordinateResolver::new(&index);
            prop_assert_eq!(resolver.locate(start, end).unwrap(), resolver.locate(start, end).unwrap());
        }
    }
}

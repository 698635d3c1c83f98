//! Canonical text indexing and span-to-rectangle resolution
//!
//! Build a [`TextIndex`] once per document from the parser's character
//! stream, then resolve detection spans into page rectangles:
//!
//! ```
//! use pdf_locator::{CoordinateResolver, Locate, TextIndex};
//! use shared_types::{CharacterRecord, Rect};
//!
//! let records: Vec<CharacterRecord> = "abc"
//!     .chars()
//!     .enumerate()
//!     .map(|(i, ch)| {
//!         let x = i as f64 * 10.0;
//!         CharacterRecord::glyph(ch, Rect::new(x, 0.0, x + 10.0, 12.0), 0, 0, 0, 0)
//!     })
//!     .collect();
//!
//! let index = TextIndex::build(records);
//! let rects = CoordinateResolver::new(&index).locate(0, 2).unwrap();
//! assert_eq!(rects[0].rect, Rect::new(0.0, 0.0, 20.0, 12.0));
//! ```

pub mod cache;
pub mod projection;
pub mod resolver;
pub mod text_index;

pub use cache::CachedResolver;
pub use projection::{project, project_all};
pub use resolver::{CoordinateResolver, Locate};
pub use text_index::TextIndex;

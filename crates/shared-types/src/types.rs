use serde::{Deserialize, Serialize};

use crate::error::{RedactError, Result};

/// Coordinate grid used when comparing quads for equality or containment.
/// Parsers report glyph boxes with float noise well below this.
pub const QUAD_EPSILON: f64 = 0.01;

/// Axis-aligned rectangle `(x0, y0, x1, y1)` in document coordinate space.
///
/// Serialized as a four-element array `[x0, y0, x1, y1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl From<[f64; 4]> for Rect {
    fn from(c: [f64; 4]) -> Self {
        Rect::new(c[0], c[1], c[2], c[3])
    }
}

impl From<Rect> for [f64; 4] {
    fn from(r: Rect) -> Self {
        [r.x0, r.y0, r.x1, r.y1]
    }
}

impl Rect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Build a quad from a raw coordinate list, checking arity and shape
    pub fn try_from_slice(coords: &[f64]) -> Result<Self> {
        match coords {
            [x0, y0, x1, y1] => {
                let rect = Rect::new(*x0, *y0, *x1, *y1);
                rect.validate_quad()?;
                Ok(rect)
            }
            _ => Err(RedactError::validation(format!(
                "Quad must have exactly 4 coordinates, got {}",
                coords.len()
            ))),
        }
    }

    /// A quad must be finite with strictly positive width and height
    pub fn validate_quad(&self) -> Result<()> {
        if ![self.x0, self.y0, self.x1, self.y1]
            .iter()
            .all(|c| c.is_finite())
        {
            return Err(RedactError::validation(format!(
                "Quad has non-finite coordinates: {:?}",
                self
            )));
        }
        if self.x0 >= self.x1 || self.y0 >= self.y1 {
            return Err(RedactError::validation(format!(
                "Quad must satisfy x0 < x1 and y0 < y1: {:?}",
                self
            )));
        }
        Ok(())
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f64 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    /// Smallest rectangle enclosing both
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Area of the geometric intersection (0.0 when disjoint or only touching)
    pub fn intersection_area(&self, other: &Rect) -> f64 {
        let w = self.x1.min(other.x1) - self.x0.max(other.x0);
        let h = self.y1.min(other.y1) - self.y0.max(other.y0);
        if w <= 0.0 || h <= 0.0 {
            return 0.0;
        }
        w * h
    }

    /// True when the rectangles share a region of positive area
    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection_area(other) > 0.0
    }

    /// True when `inner` lies within `self`, allowing `tolerance` slack on every edge
    pub fn contains(&self, inner: &Rect, tolerance: f64) -> bool {
        inner.x0 >= self.x0 - tolerance
            && inner.y0 >= self.y0 - tolerance
            && inner.x1 <= self.x1 + tolerance
            && inner.y1 <= self.y1 + tolerance
    }

    /// Coordinates snapped to an integer grid of `epsilon` cells
    pub fn snapped(&self, epsilon: f64) -> [i64; 4] {
        let snap = |v: f64| (v / epsilon).round() as i64;
        [snap(self.x0), snap(self.y0), snap(self.x1), snap(self.y1)]
    }
}

/// One glyph emitted by the document parser, in reading order.
///
/// A record whose `char` is a line or page break is a structural marker:
/// it appears in the full text but never receives a canonical offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterRecord {
    #[serde(rename = "char")]
    pub ch: char,
    #[serde(default)]
    pub bbox: Option<Rect>,
    pub page: u32,
    #[serde(default)]
    pub block: u32,
    pub line: u32,
    #[serde(default)]
    pub span: i32,
    #[serde(default)]
    pub origin_index: usize,
}

impl CharacterRecord {
    pub fn glyph(ch: char, bbox: Rect, page: u32, block: u32, line: u32, span: i32) -> Self {
        Self {
            ch,
            bbox: Some(bbox),
            page,
            block,
            line,
            span,
            origin_index: 0,
        }
    }

    /// Inferred line break with no geometry
    pub fn line_break(page: u32, block: u32, line: u32) -> Self {
        Self {
            ch: '\n',
            bbox: None,
            page,
            block,
            line,
            span: -1,
            origin_index: 0,
        }
    }

    /// Line breaks, carriage returns and form feeds never enter the canonical text
    pub fn is_structural(&self) -> bool {
        matches!(self.ch, '\n' | '\r' | '\x0C')
    }
}

/// A rectangle on a specific page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageRect {
    pub page: u32,
    pub rect: Rect,
}

//! Deterministic detection identifiers
//!
//! Ids are a SHA-256 over the detection's identifying fields, so re-running
//! the same pipeline over the same document yields the same ids.

use sha2::{Digest, Sha256};

use crate::types::{Rect, QUAD_EPSILON};

const FIELD_SEP: &[u8] = b"\x1f";

fn field(hasher: &mut Sha256, value: &[u8]) {
    hasher.update(value);
    hasher.update(FIELD_SEP);
}

/// Id for a span detection over canonical text
pub fn plain_detection_id(entity: &str, text: &str, start: usize, end: usize) -> String {
    let mut hasher = Sha256::new();
    field(&mut hasher, b"plain");
    field(&mut hasher, entity.as_bytes());
    field(&mut hasher, text.as_bytes());
    field(&mut hasher, start.to_string().as_bytes());
    field(&mut hasher, end.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// Id for a geometric detection.
///
/// Quads are snapped to the comparison grid first so that float noise from
/// the parser does not change the id.
pub fn structured_detection_id(entity: &str, text: &str, page: u32, quads: &[Rect]) -> String {
    let mut hasher = Sha256::new();
    field(&mut hasher, b"structured");
    field(&mut hasher, entity.as_bytes());
    field(&mut hasher, text.as_bytes());
    field(&mut hasher, page.to_string().as_bytes());
    for quad in quads {
        let [x0, y0, x1, y1] = quad.snapped(QUAD_EPSILON);
        field(&mut hasher, format!("{},{},{},{}", x0, y0, x1, y1).as_bytes());
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_id_is_stable() {
        let a = plain_detection_id("PERSON", "田中太郎", 0, 4);
        let b = plain_detection_id("PERSON", "田中太郎", 0, 4);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_plain_id_depends_on_every_field() {
        let base = plain_detection_id("PERSON", "abc", 0, 3);
        assert_ne!(base, plain_detection_id("ORG", "abc", 0, 3));
        assert_ne!(base, plain_detection_id("PERSON", "abd", 0, 3));
        assert_ne!(base, plain_detection_id("PERSON", "abc", 1, 3));
        assert_ne!(base, plain_detection_id("PERSON", "abc", 0, 4));
    }

    #[test]
    fn test_field_boundaries_are_unambiguous() {
        // "ab"+"c" and "a"+"bc" must not collide
        assert_ne!(
            plain_detection_id("ab", "c", 0, 1),
            plain_detection_id("a", "bc", 0, 1)
        );
    }

    #[test]
    fn test_structured_id_ignores_float_noise() {
        let q1 = [Rect::new(0.0, 0.0, 10.0, 10.0)];
        let q2 = [Rect::new(0.0001, 0.0, 10.0, 9.9999)];
        assert_eq!(
            structured_detection_id("PERSON", "x", 1, &q1),
            structured_detection_id("PERSON", "x", 1, &q2)
        );
        assert_ne!(
            structured_detection_id("PERSON", "x", 1, &q1),
            structured_detection_id("PERSON", "x", 2, &q1)
        );
    }
}

//! Grid model: width classes, their fixed span mapping, and the cell/placement types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Total span units available in one grid row.
pub const ROW_CAPACITY: i32 = 12;

/// Maximum cells per row. Follows from the minimum span of 4 out of 12.
pub const MAX_COLS: i32 = 3;

/// The four card widths the builder offers. Each maps to a fixed column
/// span out of a 12-unit row; the mapping is closed and not configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidthClass {
    Full,
    TwoThirds,
    Half,
    OneThird,
}

impl WidthClass {
    /// Column span occupied by this width class.
    pub fn span(self) -> i32 {
        match self {
            WidthClass::Full => 12,
            WidthClass::TwoThirds => 8,
            WidthClass::Half => 6,
            WidthClass::OneThird => 4,
        }
    }

    /// Exact inverse of [`span`](Self::span). Returns `None` for any span
    /// outside {12, 8, 6, 4}; callers on the storage path must have run the
    /// validator first, so `None` only arises from unvalidated input.
    pub fn from_span(span: i32) -> Option<WidthClass> {
        match span {
            12 => Some(WidthClass::Full),
            8 => Some(WidthClass::TwoThirds),
            6 => Some(WidthClass::Half),
            4 => Some(WidthClass::OneThird),
            _ => None,
        }
    }
}

/// One persisted slot of a form layout: a question pinned at (row, col)
/// with a span. A question may appear in more than one cell of a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub question_id: Uuid,
    pub row: i32,
    pub col: i32,
    pub span: i32,
}

/// One card in the editor's ordered list. `instance_id` is editor-local —
/// it lets the list reorder and hold duplicate questions without losing
/// track of individual cards, and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub instance_id: Uuid,
    pub question_id: Uuid,
    pub width: WidthClass,
}

impl Placement {
    /// A fresh placement with a newly minted instance id.
    pub fn new(question_id: Uuid, width: WidthClass) -> Self {
        Placement {
            instance_id: Uuid::new_v4(),
            question_id,
            width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_mapping_is_closed_table() {
        assert_eq!(WidthClass::Full.span(), 12);
        assert_eq!(WidthClass::TwoThirds.span(), 8);
        assert_eq!(WidthClass::Half.span(), 6);
        assert_eq!(WidthClass::OneThird.span(), 4);
    }

    #[test]
    fn test_from_span_inverts_span() {
        for w in [
            WidthClass::Full,
            WidthClass::TwoThirds,
            WidthClass::Half,
            WidthClass::OneThird,
        ] {
            assert_eq!(WidthClass::from_span(w.span()), Some(w));
        }
    }

    #[test]
    fn test_from_span_rejects_out_of_range() {
        for bad in [0, 1, 3, 5, 7, 9, 10, 11, 13, -4] {
            assert_eq!(WidthClass::from_span(bad), None, "span {bad} must be invalid");
        }
    }
}

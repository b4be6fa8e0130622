//! Validator: structural checks on a complete cell set before it is
//! committed to storage. Runs the same way on packer output, direct API
//! payloads, and hand-edited grids — the write is rejected wholesale on
//! the first failing check.

use std::collections::{BTreeMap, HashSet};

use thiserror::Error;

use crate::layout::width::{GridCell, WidthClass, MAX_COLS, ROW_CAPACITY};

/// Row shapes a form may contain, as comma-joined span signatures sorted
/// by column. Every member sums to 12.
pub const ALLOWED_ROW_SIGNATURES: &[&str] = &["12", "6,6", "4,4,4", "4,8", "8,4"];

/// Structural failure raised by [`validate`]. Carries machine-checkable
/// diagnostic context; user-facing wording belongs to the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("layout must contain at least one cell")]
    EmptyLayout,

    #[error("cell {index}: {field} is missing or out of range")]
    InvalidCellField { index: usize, field: &'static str },

    #[error("duplicate slot at row {row}, col {col}")]
    DuplicateSlot { row: i32, col: i32 },

    #[error("row {row} has invalid layout ({signature})")]
    InvalidRowLayout { row: i32, signature: String },

    #[error("row {row} spans sum to {sum}, expected 12")]
    RowSumMismatch { row: i32, sum: i32 },
}

impl LayoutError {
    /// Stable machine-readable code for the API error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            LayoutError::EmptyLayout => "EMPTY_LAYOUT",
            LayoutError::InvalidCellField { .. } => "INVALID_CELL_FIELD",
            LayoutError::DuplicateSlot { .. } => "DUPLICATE_SLOT",
            LayoutError::InvalidRowLayout { .. } => "INVALID_ROW_LAYOUT",
            LayoutError::RowSumMismatch { .. } => "ROW_SUM_MISMATCH",
        }
    }
}

/// Validates a cell set against the layout invariants, failing fast on the
/// first violation. Checks run in a fixed order: non-empty, per-cell field
/// domains, slot uniqueness, row signature membership, row sum.
///
/// Pure: no side effects, no I/O.
pub fn validate(cells: &[GridCell]) -> Result<(), LayoutError> {
    if cells.is_empty() {
        return Err(LayoutError::EmptyLayout);
    }

    for (index, cell) in cells.iter().enumerate() {
        if cell.question_id.is_nil() {
            return Err(LayoutError::InvalidCellField {
                index,
                field: "question_id",
            });
        }
        if cell.row < 1 {
            return Err(LayoutError::InvalidCellField { index, field: "row" });
        }
        if cell.col < 1 || cell.col > MAX_COLS {
            return Err(LayoutError::InvalidCellField { index, field: "col" });
        }
        if WidthClass::from_span(cell.span).is_none() {
            return Err(LayoutError::InvalidCellField { index, field: "span" });
        }
    }

    let mut seen = HashSet::new();
    for cell in cells {
        if !seen.insert((cell.row, cell.col)) {
            return Err(LayoutError::DuplicateSlot {
                row: cell.row,
                col: cell.col,
            });
        }
    }

    // Group by row; BTreeMap keeps failure reporting deterministic.
    let mut by_row: BTreeMap<i32, Vec<&GridCell>> = BTreeMap::new();
    for cell in cells {
        by_row.entry(cell.row).or_default().push(cell);
    }

    for (row, mut row_cells) in by_row {
        row_cells.sort_by_key(|c| c.col);
        let signature = row_cells
            .iter()
            .map(|c| c.span.to_string())
            .collect::<Vec<_>>()
            .join(",");
        if !ALLOWED_ROW_SIGNATURES.contains(&signature.as_str()) {
            return Err(LayoutError::InvalidRowLayout { row, signature });
        }

        // Implied by the signature set; kept as an independent invariant so
        // a future edit to ALLOWED_ROW_SIGNATURES cannot let a short or
        // overfull row through.
        let sum: i32 = row_cells.iter().map(|c| c.span).sum();
        if sum != ROW_CAPACITY {
            return Err(LayoutError::RowSumMismatch { row, sum });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn cell(row: i32, col: i32, span: i32) -> GridCell {
        GridCell {
            question_id: Uuid::new_v4(),
            row,
            col,
            span,
        }
    }

    fn row_from_signature(row: i32, spans: &[i32]) -> Vec<GridCell> {
        spans
            .iter()
            .enumerate()
            .map(|(i, s)| cell(row, i as i32 + 1, *s))
            .collect()
    }

    #[test]
    fn test_empty_layout_rejected() {
        assert_eq!(validate(&[]), Err(LayoutError::EmptyLayout));
    }

    #[test]
    fn test_all_allowed_signatures_accepted() {
        for spans in [
            vec![12],
            vec![6, 6],
            vec![4, 4, 4],
            vec![4, 8],
            vec![8, 4],
        ] {
            let cells = row_from_signature(1, &spans);
            assert_eq!(validate(&cells), Ok(()), "signature {spans:?} must pass");
        }
    }

    #[test]
    fn test_short_row_rejected_as_invalid_layout() {
        let cells = row_from_signature(1, &[4, 4]);
        assert_eq!(
            validate(&cells),
            Err(LayoutError::InvalidRowLayout {
                row: 1,
                signature: "4,4".to_string()
            })
        );
    }

    #[test]
    fn test_overfull_row_rejected_as_invalid_layout() {
        let cells = row_from_signature(1, &[8, 8]);
        assert_eq!(
            validate(&cells),
            Err(LayoutError::InvalidRowLayout {
                row: 1,
                signature: "8,8".to_string()
            })
        );
    }

    #[test]
    fn test_duplicate_slot_rejected_regardless_of_span() {
        let cells = vec![cell(1, 1, 6), cell(1, 1, 4)];
        assert_eq!(
            validate(&cells),
            Err(LayoutError::DuplicateSlot { row: 1, col: 1 })
        );
    }

    #[test]
    fn test_nil_question_id_rejected() {
        let mut cells = row_from_signature(1, &[12]);
        cells[0].question_id = Uuid::nil();
        assert_eq!(
            validate(&cells),
            Err(LayoutError::InvalidCellField {
                index: 0,
                field: "question_id"
            })
        );
    }

    #[test]
    fn test_row_below_one_rejected() {
        let cells = vec![cell(0, 1, 12)];
        assert_eq!(
            validate(&cells),
            Err(LayoutError::InvalidCellField {
                index: 0,
                field: "row"
            })
        );
    }

    #[test]
    fn test_col_out_of_range_rejected() {
        let cells = vec![cell(1, 4, 12)];
        assert_eq!(
            validate(&cells),
            Err(LayoutError::InvalidCellField {
                index: 0,
                field: "col"
            })
        );
    }

    #[test]
    fn test_span_out_of_range_rejected() {
        let cells = vec![cell(1, 1, 5)];
        assert_eq!(
            validate(&cells),
            Err(LayoutError::InvalidCellField {
                index: 0,
                field: "span"
            })
        );
    }

    #[test]
    fn test_field_checks_precede_slot_and_signature_checks() {
        // A bad span in a grid that also has a duplicate slot must report
        // the field error first.
        let cells = vec![cell(1, 1, 5), cell(1, 1, 6)];
        assert!(matches!(
            validate(&cells),
            Err(LayoutError::InvalidCellField { field: "span", .. })
        ));
    }

    #[test]
    fn test_multi_row_grid_reports_offending_row() {
        let mut cells = row_from_signature(1, &[12]);
        cells.extend(row_from_signature(2, &[6, 6]));
        cells.extend(row_from_signature(3, &[12, 4]));
        assert_eq!(
            validate(&cells),
            Err(LayoutError::InvalidRowLayout {
                row: 3,
                signature: "12,4".to_string()
            })
        );
    }

    #[test]
    fn test_signature_sorted_by_col_not_input_order() {
        // 8,4 and 4,8 are distinct signatures; column order decides.
        let cells = vec![cell(1, 2, 4), cell(1, 1, 8)];
        assert_eq!(validate(&cells), Ok(()));
    }

    #[test]
    fn test_two_full_rows_accepted() {
        let mut cells = row_from_signature(1, &[12]);
        cells.extend(row_from_signature(2, &[12]));
        assert_eq!(validate(&cells), Ok(()));
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(LayoutError::EmptyLayout.code(), "EMPTY_LAYOUT");
        assert_eq!(
            LayoutError::DuplicateSlot { row: 1, col: 1 }.code(),
            "DUPLICATE_SLOT"
        );
        assert_eq!(
            LayoutError::RowSumMismatch { row: 1, sum: 8 }.code(),
            "ROW_SUM_MISMATCH"
        );
    }
}

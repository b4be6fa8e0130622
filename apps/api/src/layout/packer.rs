//! Packer: turns the editor's ordered card list into concrete grid cells.
//!
//! Greedy left-to-right bin packing at a fixed row capacity of 12. A card
//! that does not fit the current row starts a new one; a row is allowed to
//! end short (the validator decides whether the final grid is acceptable).
//! The no-overflow guarantee is preferred over compaction: cards are never
//! reordered or resized to fill a remainder.

use crate::layout::width::{GridCell, Placement, ROW_CAPACITY};

/// Packs an ordered placement list into grid cells.
///
/// Deterministic in the input order and widths. Emits cells in row-major
/// order with `col` a slot counter 1..=3 within each row (never a unit
/// offset), so the output sorts identically by emission order and by
/// `(row, col)`.
pub fn pack(placements: &[Placement]) -> Vec<GridCell> {
    let mut row = 1;
    let mut col = 1;
    let mut accumulated = 0;

    let mut cells = Vec::with_capacity(placements.len());
    for p in placements {
        let span = p.width.span();
        if accumulated + span > ROW_CAPACITY {
            row += 1;
            col = 1;
            accumulated = 0;
        }
        cells.push(GridCell {
            question_id: p.question_id,
            row,
            col,
            span,
        });
        accumulated += span;
        col += 1;
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::width::WidthClass;
    use uuid::Uuid;

    fn placements(widths: &[WidthClass]) -> Vec<Placement> {
        widths
            .iter()
            .map(|w| Placement::new(Uuid::new_v4(), *w))
            .collect()
    }

    fn row_sums(cells: &[GridCell]) -> Vec<i32> {
        let max_row = cells.iter().map(|c| c.row).max().unwrap_or(0);
        (1..=max_row)
            .map(|r| cells.iter().filter(|c| c.row == r).map(|c| c.span).sum())
            .collect()
    }

    #[test]
    fn test_empty_input_packs_to_nothing() {
        assert!(pack(&[]).is_empty());
    }

    #[test]
    fn test_two_fulls_stack_as_two_rows() {
        let cells = pack(&placements(&[WidthClass::Full, WidthClass::Full]));
        assert_eq!(cells.len(), 2);
        assert_eq!((cells[0].row, cells[0].col, cells[0].span), (1, 1, 12));
        assert_eq!((cells[1].row, cells[1].col, cells[1].span), (2, 1, 12));
    }

    #[test]
    fn test_three_thirds_share_one_row() {
        let cells = pack(&placements(&[
            WidthClass::OneThird,
            WidthClass::OneThird,
            WidthClass::OneThird,
        ]));
        assert_eq!(cells.len(), 3);
        for (i, c) in cells.iter().enumerate() {
            assert_eq!(c.row, 1);
            assert_eq!(c.col, i as i32 + 1);
            assert_eq!(c.span, 4);
        }
    }

    #[test]
    fn test_third_then_two_thirds_fill_one_row() {
        let cells = pack(&placements(&[WidthClass::OneThird, WidthClass::TwoThirds]));
        assert_eq!((cells[0].row, cells[0].col, cells[0].span), (1, 1, 4));
        assert_eq!((cells[1].row, cells[1].col, cells[1].span), (1, 2, 8));
    }

    #[test]
    fn test_full_then_two_halves() {
        let cells = pack(&placements(&[
            WidthClass::Full,
            WidthClass::Half,
            WidthClass::Half,
        ]));
        assert_eq!((cells[0].row, cells[0].col, cells[0].span), (1, 1, 12));
        assert_eq!((cells[1].row, cells[1].col, cells[1].span), (2, 1, 6));
        assert_eq!((cells[2].row, cells[2].col, cells[2].span), (2, 2, 6));
    }

    #[test]
    fn test_overflow_wraps_without_resizing() {
        // Half + TwoThirds does not fit in 12: the second card wraps whole.
        let cells = pack(&placements(&[WidthClass::Half, WidthClass::TwoThirds]));
        assert_eq!((cells[0].row, cells[0].span), (1, 6));
        assert_eq!((cells[1].row, cells[1].col, cells[1].span), (2, 1, 8));
    }

    #[test]
    fn test_no_row_ever_exceeds_capacity() {
        // Exhaustive over all width sequences of length 4.
        let all = [
            WidthClass::Full,
            WidthClass::TwoThirds,
            WidthClass::Half,
            WidthClass::OneThird,
        ];
        for a in all {
            for b in all {
                for c in all {
                    for d in all {
                        let cells = pack(&placements(&[a, b, c, d]));
                        for sum in row_sums(&cells) {
                            assert!(sum <= ROW_CAPACITY, "overflow for {:?}", (a, b, c, d));
                        }
                        for cell in &cells {
                            assert!((1..=3).contains(&cell.col));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_packing_is_deterministic() {
        let input = placements(&[
            WidthClass::Half,
            WidthClass::OneThird,
            WidthClass::Full,
            WidthClass::TwoThirds,
            WidthClass::OneThird,
        ]);
        assert_eq!(pack(&input), pack(&input));
    }

    #[test]
    fn test_columns_contiguous_from_one() {
        let cells = pack(&placements(&[
            WidthClass::OneThird,
            WidthClass::OneThird,
            WidthClass::Half,
            WidthClass::Half,
            WidthClass::Half,
        ]));
        let mut expected_col = std::collections::HashMap::new();
        for c in &cells {
            let next = expected_col.entry(c.row).or_insert(1);
            assert_eq!(c.col, *next);
            *next += 1;
        }
    }
}

//! Reverse mapper: rebuilds the editor's ordered card list from persisted
//! cells. The packer always emits in row-major order, so sorting by
//! `(row, col)` recovers the original placement order losslessly.

use crate::layout::width::{GridCell, Placement, WidthClass};
use crate::layout::LayoutError;

/// Reconstructs the ordered placement list for a stored cell set.
///
/// Cells are sorted by `(row, col)` and each span is mapped back to its
/// width class. Instance ids are minted fresh — instance identity is
/// editor-local and never persisted. An out-of-range span means the cells
/// bypassed validation and is reported as the corresponding field error.
pub fn unpack(cells: &[GridCell]) -> Result<Vec<Placement>, LayoutError> {
    let mut ordered: Vec<(usize, &GridCell)> = cells.iter().enumerate().collect();
    ordered.sort_by_key(|(_, c)| (c.row, c.col));

    ordered
        .into_iter()
        .map(|(index, c)| {
            let width = WidthClass::from_span(c.span)
                .ok_or(LayoutError::InvalidCellField { index, field: "span" })?;
            Ok(Placement::new(c.question_id, width))
        })
        .collect()
}

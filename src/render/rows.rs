//! Variable rows inside a frame or object node
//!
//! Rows have no identity of their own: row `i` of a node always shows
//! variable `i` of its entity. Reconciling rows is therefore positional,
//! overwrite the shared prefix, append the surplus, truncate the excess.

use super::canvas::{Canvas, CellRef, NodeId, RowCells, ValueCell};
use super::resolve::ReferenceQueue;
use crate::error::RenderError;
use crate::snapshot::Variable;

/// Render `variables` into `node`, which currently holds `previous_rows`
/// rows, and return the new row count.
///
/// Reference values get no text. Their cell is queued in `references` and
/// becomes the origin of a connector once every node of the pass exists.
pub fn render_rows<C: Canvas>(
    canvas: &mut C,
    node: NodeId,
    previous_rows: usize,
    variables: &[Variable],
    references: &mut ReferenceQueue,
    null_text: &str,
) -> Result<usize, RenderError> {
    for (row, variable) in variables.iter().enumerate() {
        let value = match variable {
            Variable::Primitive { value, .. } => ValueCell::Text(value),
            Variable::NullReference { .. } => ValueCell::Text(null_text),
            Variable::Reference { target, .. } => {
                references.defer(CellRef { node, row }, target.clone());
                ValueCell::Connector
            }
        };

        canvas.set_row(
            node,
            row,
            RowCells {
                ty: variable.ty(),
                name: variable.name(),
                value,
            },
        )?;
    }

    if variables.len() < previous_rows {
        canvas.truncate_rows(node, variables.len())?;
    }

    Ok(variables.len())
}

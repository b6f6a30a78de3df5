//! Second phase of a render pass: outstanding references become connectors
//!
//! References can point forward (a frame variable at an object rendered
//! later) or around (two objects referencing each other), so nothing is
//! connected while nodes are still being placed. Rows only record what they
//! point at; [`resolve_all`] connects everything once the pass has placed
//! every node.

use super::canvas::{Canvas, CellRef};
use super::reconcile::LiveSet;
use crate::error::RenderError;
use crate::snapshot::ObjectId;

/// A reference recorded during row rendering, not yet drawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutstandingReference {
    pub origin: CellRef,
    pub target: ObjectId,
}

/// References deferred by the current pass
#[derive(Debug, Default)]
pub struct ReferenceQueue {
    pending: Vec<OutstandingReference>,
}

impl ReferenceQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn defer(&mut self, origin: CellRef, target: ObjectId) {
        self.pending.push(OutstandingReference { origin, target });
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OutstandingReference> {
        self.pending.iter()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

/// Outcome of a resolution pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub connectors: usize,
    /// References whose target has no node in this pass
    pub dangling: Vec<OutstandingReference>,
}

/// Replace the canvas's connectors with one per outstanding reference.
///
/// The queue is always left empty. References whose target is not in
/// `objects` are returned as dangling and draw nothing.
pub fn resolve_all<C: Canvas>(
    references: &mut ReferenceQueue,
    objects: &LiveSet<ObjectId>,
    canvas: &mut C,
) -> Result<Resolution, RenderError> {
    let pending = std::mem::take(&mut references.pending);
    let mut resolution = Resolution::default();

    canvas.clear_connectors();
    for reference in pending {
        match objects.node_id(&reference.target) {
            Some(target) => {
                canvas.connect(reference.origin, target)?;
                resolution.connectors += 1;
            }
            None => {
                tracing::warn!(
                    target_id = %reference.target,
                    origin = %reference.origin.node,
                    row = reference.origin.row,
                    "dangling reference; no connector drawn"
                );
                resolution.dangling.push(reference);
            }
        }
    }

    Ok(resolution)
}

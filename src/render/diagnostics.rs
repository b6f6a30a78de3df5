//! Recoverable conditions reported by the renderer and the source overlay

use super::canvas::{CellRef, Container};
use super::reconcile::JoinSummary;
use super::resolve::Resolution;
use crate::snapshot::ObjectId;
use std::fmt;

/// A data-quality problem that was reported and worked around
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Two entities of one snapshot shared a key; the later one was skipped
    DuplicateKey { container: Container, key: String },
    /// A reference named an object with no node after the full pass
    DanglingReference { origin: CellRef, target: ObjectId },
    /// A marker command named a line outside the document
    LineOutOfRange { line: usize, line_count: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DuplicateKey { container, key } => {
                write!(f, "duplicate {} key {} in snapshot", container, key)
            }
            Diagnostic::DanglingReference { origin, target } => {
                write!(
                    f,
                    "reference from {} row {} to missing object {}",
                    origin.node, origin.row, target
                )
            }
            Diagnostic::LineOutOfRange { line, line_count } => {
                write!(f, "line {} is outside the document (1..={})", line, line_count)
            }
        }
    }
}

/// Everything one render pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Sequence number of the pass, starting at 1
    pub pass: u64,
    pub stack: JoinSummary<usize>,
    pub heap: JoinSummary<ObjectId>,
    pub connectors: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl PassReport {
    pub(crate) fn collect_diagnostics(&mut self, resolution: Resolution) {
        self.connectors = resolution.connectors;

        let frames = self.stack.duplicates.iter().map(|index| Diagnostic::DuplicateKey {
            container: Container::Stack,
            key: index.to_string(),
        });
        let objects = self.heap.duplicates.iter().map(|id| Diagnostic::DuplicateKey {
            container: Container::Heap,
            key: id.to_string(),
        });
        let dangling = resolution
            .dangling
            .into_iter()
            .map(|reference| Diagnostic::DanglingReference {
                origin: reference.origin,
                target: reference.target,
            });

        self.diagnostics = frames.chain(objects).chain(dangling).collect();
    }

    pub fn dangling(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|diagnostic| matches!(diagnostic, Diagnostic::DanglingReference { .. }))
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

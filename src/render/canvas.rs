//! Capability interface to the diagram backend
//!
//! The reconciler and resolver never draw anything themselves. They issue a
//! small set of structural commands against a [`Canvas`]: create, move and
//! remove nodes, write rows, and draw connectors. Backends decide what a
//! node or a connector looks like.

use crate::error::RenderError;
use std::fmt;

/// Handle to a node created by a [`Canvas`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Top-level region a node lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    Stack,
    Heap,
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Container::Stack => f.write_str("stack"),
            Container::Heap => f.write_str("heap"),
        }
    }
}

/// The value cell of one row; the origin of a connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub node: NodeId,
    pub row: usize,
}

/// Directed edge from a value cell to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Connector {
    pub origin: CellRef,
    pub target: NodeId,
}

/// Header text of a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeHeader {
    pub title: String,
    pub subtitle: Option<String>,
}

impl NodeHeader {
    pub fn new(title: impl Into<String>) -> Self {
        NodeHeader {
            title: title.into(),
            subtitle: None,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }
}

/// Content of a value cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueCell<'a> {
    Text(&'a str),
    /// No text; the cell is the origin of a connector drawn later in the pass
    Connector,
}

/// The three cells of a variable row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowCells<'a> {
    pub ty: &'a str,
    pub name: &'a str,
    pub value: ValueCell<'a>,
}

/// Structural operations the renderer needs from a diagram backend
pub trait Canvas {
    /// Bring the backend up. Called once before the first render pass and
    /// again on every explicit reinitialization.
    fn initialize(&mut self) -> Result<(), RenderError> {
        Ok(())
    }

    /// Create a node and insert it at `position` among its container's
    /// children.
    fn create_node(
        &mut self,
        container: Container,
        position: usize,
        header: &NodeHeader,
    ) -> Result<NodeId, RenderError>;

    /// Refresh a node's header and move it to `position` among its siblings.
    fn update_node(&mut self, node: NodeId, position: usize, header: &NodeHeader) -> Result<(), RenderError>;

    fn remove_node(&mut self, node: NodeId) -> Result<(), RenderError>;

    /// Overwrite row `row`, or append it when `row` equals the current count.
    fn set_row(&mut self, node: NodeId, row: usize, cells: RowCells<'_>) -> Result<(), RenderError>;

    /// Drop every row at index `len` and beyond.
    fn truncate_rows(&mut self, node: NodeId, len: usize) -> Result<(), RenderError>;

    fn connect(&mut self, origin: CellRef, target: NodeId) -> Result<(), RenderError>;

    fn clear_connectors(&mut self);
}

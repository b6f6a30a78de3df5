//! Headless canvas that records every command it receives

use super::canvas::{Canvas, CellRef, Connector, Container, NodeHeader, NodeId, RowCells};
use super::scene::{Scene, SceneNode};
use crate::error::RenderError;
use rustc_hash::FxHashMap;

/// One call made against a [`RecordingCanvas`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasCommand {
    Initialize,
    CreateNode {
        node: NodeId,
        container: Container,
        position: usize,
    },
    UpdateNode {
        node: NodeId,
        position: usize,
    },
    RemoveNode(NodeId),
    SetRow {
        node: NodeId,
        row: usize,
    },
    TruncateRows {
        node: NodeId,
        len: usize,
    },
    Connect(Connector),
    ClearConnectors,
}

/// A [`Scene`] that logs commands, lets callers tag nodes, and can be told to
/// fail initialization.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    scene: Scene,
    log: Vec<CanvasCommand>,
    tags: FxHashMap<NodeId, String>,
    initialization_failure: Option<String>,
    row_limit: Option<usize>,
    initializations: usize,
    created: usize,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// A canvas whose initialization fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        RecordingCanvas {
            initialization_failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Make subsequent initializations fail (`Some`) or succeed (`None`)
    pub fn set_initialization_failure(&mut self, failure: Option<String>) {
        self.initialization_failure = failure;
    }

    /// Reject `set_row` for rows at or past `limit`
    pub fn set_row_limit(&mut self, limit: Option<usize>) {
        self.row_limit = limit;
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.scene.node(id)
    }

    pub fn children(&self, container: Container) -> &[NodeId] {
        self.scene.children(container)
    }

    pub fn connectors(&self) -> &[Connector] {
        self.scene.connectors()
    }

    pub fn log(&self) -> &[CanvasCommand] {
        &self.log
    }

    pub fn take_log(&mut self) -> Vec<CanvasCommand> {
        std::mem::take(&mut self.log)
    }

    /// Number of nodes created since the canvas was built
    pub fn created(&self) -> usize {
        self.created
    }

    pub fn initializations(&self) -> usize {
        self.initializations
    }

    /// Attach a marker to a live node. It is cleared only when the node is
    /// removed, so a tag that survives a render proves the node was reused
    /// rather than rebuilt.
    pub fn tag(&mut self, node: NodeId, tag: impl Into<String>) {
        if self.scene.node(node).is_some() {
            self.tags.insert(node, tag.into());
        }
    }

    pub fn tag_of(&self, node: NodeId) -> Option<&str> {
        self.tags.get(&node).map(String::as_str)
    }
}

impl Canvas for RecordingCanvas {
    fn initialize(&mut self) -> Result<(), RenderError> {
        self.log.push(CanvasCommand::Initialize);
        self.initializations += 1;
        match &self.initialization_failure {
            Some(message) => Err(RenderError::Initialization(message.clone())),
            None => Ok(()),
        }
    }

    fn create_node(
        &mut self,
        container: Container,
        position: usize,
        header: &NodeHeader,
    ) -> Result<NodeId, RenderError> {
        let node = self.scene.create_node(container, position, header)?;
        self.tags.remove(&node);
        self.created += 1;
        self.log.push(CanvasCommand::CreateNode {
            node,
            container,
            position,
        });
        Ok(node)
    }

    fn update_node(&mut self, node: NodeId, position: usize, header: &NodeHeader) -> Result<(), RenderError> {
        self.scene.update_node(node, position, header)?;
        self.log.push(CanvasCommand::UpdateNode { node, position });
        Ok(())
    }

    fn remove_node(&mut self, node: NodeId) -> Result<(), RenderError> {
        self.scene.remove_node(node)?;
        self.tags.remove(&node);
        self.log.push(CanvasCommand::RemoveNode(node));
        Ok(())
    }

    fn set_row(&mut self, node: NodeId, row: usize, cells: RowCells<'_>) -> Result<(), RenderError> {
        if let Some(len) = self.row_limit.filter(|limit| row >= *limit) {
            return Err(RenderError::RowOutOfBounds { node, row, len });
        }
        self.scene.set_row(node, row, cells)?;
        self.log.push(CanvasCommand::SetRow { node, row });
        Ok(())
    }

    fn truncate_rows(&mut self, node: NodeId, len: usize) -> Result<(), RenderError> {
        self.scene.truncate_rows(node, len)?;
        self.log.push(CanvasCommand::TruncateRows { node, len });
        Ok(())
    }

    fn connect(&mut self, origin: CellRef, target: NodeId) -> Result<(), RenderError> {
        self.scene.connect(origin, target)?;
        self.log
            .push(CanvasCommand::Connect(Connector { origin, target }));
        Ok(())
    }

    fn clear_connectors(&mut self) {
        self.scene.clear_connectors();
        self.log.push(CanvasCommand::ClearConnectors);
    }
}

//! Retained in-memory diagram
//!
//! [`Scene`] is a complete [`Canvas`] that keeps nodes, rows and connectors as
//! plain data. Backends that paint from a model each frame (the terminal UI)
//! and test doubles build on top of it instead of re-implementing sibling
//! bookkeeping.

use super::canvas::{Canvas, CellRef, Connector, Container, NodeHeader, NodeId, RowCells, ValueCell};
use crate::error::RenderError;
use rustc_hash::FxHashMap;

/// A value cell as stored in the scene
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneValue {
    Text(String),
    Connector,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneRow {
    pub ty: String,
    pub name: String,
    pub value: SceneValue,
}

impl From<RowCells<'_>> for SceneRow {
    fn from(cells: RowCells<'_>) -> Self {
        SceneRow {
            ty: cells.ty.to_string(),
            name: cells.name.to_string(),
            value: match cells.value {
                ValueCell::Text(text) => SceneValue::Text(text.to_string()),
                ValueCell::Connector => SceneValue::Connector,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneNode {
    pub id: NodeId,
    pub container: Container,
    pub header: NodeHeader,
    pub rows: Vec<SceneRow>,
}

#[derive(Debug, Default)]
pub struct Scene {
    nodes: FxHashMap<NodeId, SceneNode>,
    stack: Vec<NodeId>,
    heap: Vec<NodeId>,
    connectors: Vec<Connector>,
    next_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Children of a container in sibling order
    pub fn children(&self, container: Container) -> &[NodeId] {
        match container {
            Container::Stack => &self.stack,
            Container::Heap => &self.heap,
        }
    }

    /// Nodes of a container in sibling order
    pub fn nodes_in(&self, container: Container) -> impl Iterator<Item = &SceneNode> + '_ {
        self.children(container)
            .iter()
            .filter_map(move |id| self.nodes.get(id))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    /// Target of the connector leaving `origin`, if one was drawn
    pub fn connector_from(&self, origin: CellRef) -> Option<NodeId> {
        self.connectors
            .iter()
            .find(|connector| connector.origin == origin)
            .map(|connector| connector.target)
    }

    /// Position of a node among its container's children
    pub fn position_of(&self, id: NodeId) -> Option<usize> {
        let node = self.nodes.get(&id)?;
        self.children(node.container)
            .iter()
            .position(|child| *child == id)
    }

    fn siblings_mut(&mut self, container: Container) -> &mut Vec<NodeId> {
        match container {
            Container::Stack => &mut self.stack,
            Container::Heap => &mut self.heap,
        }
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut SceneNode, RenderError> {
        self.nodes.get_mut(&id).ok_or(RenderError::UnknownNode(id))
    }
}

impl Canvas for Scene {
    fn create_node(
        &mut self,
        container: Container,
        position: usize,
        header: &NodeHeader,
    ) -> Result<NodeId, RenderError> {
        let id = NodeId(self.next_id);
        self.next_id += 1;

        self.nodes.insert(
            id,
            SceneNode {
                id,
                container,
                header: header.clone(),
                rows: Vec::new(),
            },
        );
        let siblings = self.siblings_mut(container);
        let position = position.min(siblings.len());
        siblings.insert(position, id);
        Ok(id)
    }

    fn update_node(&mut self, node: NodeId, position: usize, header: &NodeHeader) -> Result<(), RenderError> {
        let scene_node = self.node_mut(node)?;
        if scene_node.header != *header {
            scene_node.header = header.clone();
        }
        let container = scene_node.container;

        let siblings = self.siblings_mut(container);
        if siblings.get(position) != Some(&node) {
            siblings.retain(|child| *child != node);
            let position = position.min(siblings.len());
            siblings.insert(position, node);
        }
        Ok(())
    }

    fn remove_node(&mut self, node: NodeId) -> Result<(), RenderError> {
        let removed = self.nodes.remove(&node).ok_or(RenderError::UnknownNode(node))?;
        self.siblings_mut(removed.container).retain(|child| *child != node);
        self.connectors
            .retain(|connector| connector.origin.node != node && connector.target != node);
        Ok(())
    }

    fn set_row(&mut self, node: NodeId, row: usize, cells: RowCells<'_>) -> Result<(), RenderError> {
        let scene_node = self.node_mut(node)?;
        let len = scene_node.rows.len();
        match row.cmp(&len) {
            std::cmp::Ordering::Less => scene_node.rows[row] = cells.into(),
            std::cmp::Ordering::Equal => scene_node.rows.push(cells.into()),
            std::cmp::Ordering::Greater => {
                return Err(RenderError::RowOutOfBounds { node, row, len });
            }
        }
        Ok(())
    }

    fn truncate_rows(&mut self, node: NodeId, len: usize) -> Result<(), RenderError> {
        self.node_mut(node)?.rows.truncate(len);
        Ok(())
    }

    fn connect(&mut self, origin: CellRef, target: NodeId) -> Result<(), RenderError> {
        let row_count = self.nodes.get(&origin.node).map(|node| node.rows.len());
        match row_count {
            None => return Err(RenderError::UnknownNode(origin.node)),
            Some(len) if origin.row >= len => {
                return Err(RenderError::RowOutOfBounds {
                    node: origin.node,
                    row: origin.row,
                    len,
                });
            }
            Some(_) => {}
        }
        if !self.nodes.contains_key(&target) {
            return Err(RenderError::UnknownNode(target));
        }
        self.connectors.push(Connector { origin, target });
        Ok(())
    }

    fn clear_connectors(&mut self) {
        self.connectors.clear();
    }
}

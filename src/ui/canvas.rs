//! [`Canvas`] backed by the terminal
//!
//! The diagram is kept as a [`Scene`] and painted by the stack and heap panes
//! on every frame. Initialization fails when the terminal is too small to
//! hold the layout; the app retries after a resize.

use crate::error::RenderError;
use crate::render::{Canvas, CellRef, Container, NodeHeader, NodeId, RowCells, Scene};

/// Smallest terminal the four-pane layout fits in
pub const MIN_WIDTH: u16 = 60;
pub const MIN_HEIGHT: u16 = 12;

pub struct TerminalCanvas {
    scene: Scene,
    probe: fn() -> std::io::Result<(u16, u16)>,
}

impl Default for TerminalCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalCanvas {
    pub fn new() -> Self {
        TerminalCanvas {
            scene: Scene::new(),
            probe: crossterm::terminal::size,
        }
    }

    /// A canvas measuring its terminal with `probe` instead of crossterm
    pub fn with_size_probe(probe: fn() -> std::io::Result<(u16, u16)>) -> Self {
        TerminalCanvas {
            scene: Scene::new(),
            probe,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }
}

impl Canvas for TerminalCanvas {
    fn initialize(&mut self) -> Result<(), RenderError> {
        let (width, height) =
            (self.probe)().map_err(|err| RenderError::Initialization(err.to_string()))?;
        if width < MIN_WIDTH || height < MIN_HEIGHT {
            return Err(RenderError::Initialization(format!(
                "terminal is {}x{}, need at least {}x{}",
                width, height, MIN_WIDTH, MIN_HEIGHT
            )));
        }
        Ok(())
    }

    fn create_node(
        &mut self,
        container: Container,
        position: usize,
        header: &NodeHeader,
    ) -> Result<NodeId, RenderError> {
        self.scene.create_node(container, position, header)
    }

    fn update_node(&mut self, node: NodeId, position: usize, header: &NodeHeader) -> Result<(), RenderError> {
        self.scene.update_node(node, position, header)
    }

    fn remove_node(&mut self, node: NodeId) -> Result<(), RenderError> {
        self.scene.remove_node(node)
    }

    fn set_row(&mut self, node: NodeId, row: usize, cells: RowCells<'_>) -> Result<(), RenderError> {
        self.scene.set_row(node, row, cells)
    }

    fn truncate_rows(&mut self, node: NodeId, len: usize) -> Result<(), RenderError> {
        self.scene.truncate_rows(node, len)
    }

    fn connect(&mut self, origin: CellRef, target: NodeId) -> Result<(), RenderError> {
        self.scene.connect(origin, target)
    }

    fn clear_connectors(&mut self) {
        self.scene.clear_connectors();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_terminal_fails_initialization() {
        let mut canvas = TerminalCanvas::with_size_probe(|| Ok((40, 10)));
        assert!(matches!(canvas.initialize(), Err(RenderError::Initialization(_))));

        let mut canvas = TerminalCanvas::with_size_probe(|| Ok((120, 40)));
        assert_eq!(canvas.initialize(), Ok(()));
    }
}

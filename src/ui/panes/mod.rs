//! TUI pane rendering modules
//!
//! - [`source`]: source text with gutter markers and the current line
//! - [`stack`]: frame nodes of the diagram
//! - [`heap`]: object nodes of the diagram, with connector targets
//! - [`status`]: step counter, keybindings and playback state
//!
//! Panes are stateless render functions. The stack and heap panes paint the
//! [`Scene`](crate::render::Scene) kept by the terminal canvas.

mod utils;

pub mod heap;
pub mod source;
pub mod stack;
pub mod status;

pub use heap::render_heap_pane;
pub use source::{render_source_pane, GUTTER_WIDTH};
pub use stack::render_stack_pane;
pub use status::{render_status_bar, StatusRenderData};
pub use utils::ListScrollState;

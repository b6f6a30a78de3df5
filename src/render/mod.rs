//! Incremental stack and heap diagram renderer
//!
//! On every debugger step the host hands a [`Snapshot`] to a
//! [`DiagramRenderer`], which updates the diagram instead of redrawing it:
//!
//! - [`reconcile`]: keyed join of frames (by index) and heap objects (by id)
//!   against the nodes already on the canvas
//! - [`rows`]: positional update of each node's variable rows
//! - [`resolve`]: references become connectors only after every node of the
//!   pass exists
//! - [`canvas`]: the capability trait the renderer draws through
//! - [`scene`] / [`recording`]: retained and recording [`Canvas`]
//!   implementations
//!
//! [`Snapshot`]: crate::snapshot::Snapshot

pub mod canvas;
pub mod diagnostics;
pub mod reconcile;
pub mod recording;
pub mod renderer;
pub mod resolve;
pub mod rows;
pub mod scene;

pub use canvas::{Canvas, CellRef, Connector, Container, NodeHeader, NodeId, RowCells, ValueCell};
pub use diagnostics::{Diagnostic, PassReport};
pub use reconcile::{reconcile, Binder, JoinSummary, LiveNode, LiveSet};
pub use recording::{CanvasCommand, RecordingCanvas};
pub use renderer::{DiagramRenderer, RenderPhase};
pub use resolve::{resolve_all, OutstandingReference, ReferenceQueue, Resolution};
pub use scene::{Scene, SceneNode, SceneRow, SceneValue};

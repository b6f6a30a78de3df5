//! # Introduction
//!
//! heapview draws the call stack and heap of a program paused in a step
//! debugger as linked diagrams, and marks breakpoints and the current line
//! on its source. Each debugger step hands over a fresh [`snapshot::Snapshot`];
//! the diagram is updated in place rather than redrawn, so a frame or object
//! that survives a step keeps its node.
//!
//! ## Pipeline
//!
//! ```text
//! Host → Snapshot → reconcile stack → reconcile heap → resolve references → Canvas
//!      ↘ breakpoint / line events → MarkerOverlay → SourceView
//! ```
//!
//! 1. [`snapshot`]: the stack/heap data model, its JSON wire form, a
//!    builder for hosts that walk an object graph, and recorded traces.
//! 2. [`render`]: the incremental diagram renderer over the [`render::Canvas`]
//!    capability.
//! 3. [`overlay`]: gutter markers and the current-line highlight over the
//!    [`overlay::SourceView`] capability.
//! 4. [`ui`]: ratatui implementations of both capabilities and a trace
//!    player; not part of the stable library API.
//!
//! [`config`], [`error`] and [`logging`] carry the ambient plumbing.

pub mod config;
pub mod error;
pub mod logging;
pub mod overlay;
pub mod render;
pub mod snapshot;
pub mod ui;

pub use error::{Error, RenderError, Result};

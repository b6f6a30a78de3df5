//! Terminal front-end built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! - **[`app`]**: the host. Replays a [`Trace`], keeps the breakpoint set and
//!   handles keyboard and mouse input
//! - **[`canvas`]** / **[`source_view`]**: terminal implementations of the
//!   renderer's and the overlay's capability traits
//! - **[`panes`]**: stateless render functions for each visible pane
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! [`Trace`]: crate::snapshot::Trace

pub mod app;
pub mod canvas;
pub mod panes;
pub mod source_view;
pub mod theme;

pub use app::App;
pub use canvas::TerminalCanvas;
pub use source_view::TerminalSourceView;

//! Error types
//!
//! [`Error`] covers everything that can stop the front-end from starting or
//! continuing: unreadable configuration or traces, terminal I/O, and backend
//! failures. [`RenderError`] is the narrower failure of the visualization
//! backend consumed through [`Canvas`].
//!
//! Data-quality problems inside a snapshot (duplicate keys, dangling
//! references, out-of-range lines) are not errors. They are reported as
//! [`Diagnostic`]s and the render continues.
//!
//! [`Canvas`]: crate::render::Canvas
//! [`Diagnostic`]: crate::render::Diagnostic

use crate::render::NodeId;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid trace: {0}")]
    Trace(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("trace has no steps")]
    EmptyTrace,

    #[error("trace history limit exceeded: {current} + {incoming} > {limit} bytes")]
    HistoryLimitExceeded {
        current: usize,
        incoming: usize,
        limit: usize,
    },

    #[error("failed to open log file {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to initialize logging: {0}")]
    Logging(String),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Failures of the visualization backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The backend could not be brought up; rendering stays disabled until
    /// it is reinitialized.
    #[error("visualization backend failed to initialize: {0}")]
    Initialization(String),

    #[error("rendering is disabled until the visualization backend is reinitialized")]
    Disabled,

    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    #[error("row {row} is out of bounds for node {node} with {len} rows")]
    RowOutOfBounds { node: NodeId, row: usize, len: usize },
}

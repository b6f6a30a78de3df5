//! Render pass driver
//!
//! [`DiagramRenderer`] owns everything that must survive between debugger
//! steps: the canvas, the live frame and object node sets, and the reference
//! queue. Each snapshot runs one pass through a fixed sequence of phases:
//!
//! ```text
//! Idle → ReconcilingStack → ReconcilingHeap → ResolvingReferences → Idle
//! ```
//!
//! Snapshots submitted while earlier ones are still queued are rendered
//! strictly in order, one full pass each. While the backend is disabled only
//! the newest submitted snapshot is kept.

use super::canvas::{Canvas, Container, NodeHeader, NodeId};
use super::diagnostics::PassReport;
use super::reconcile::{reconcile, Binder, LiveNode, LiveSet};
use super::resolve::{resolve_all, ReferenceQueue};
use super::rows::render_rows;
use crate::config::RendererConfig;
use crate::error::RenderError;
use crate::snapshot::{Frame, HeapObject, ObjectId, Snapshot, Variable};
use std::collections::VecDeque;

/// Where a render pass currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    Idle,
    ReconcilingStack,
    ReconcilingHeap,
    ResolvingReferences,
}

impl RenderPhase {
    /// The only phase allowed to follow this one
    pub fn next(self) -> Self {
        match self {
            RenderPhase::Idle => RenderPhase::ReconcilingStack,
            RenderPhase::ReconcilingStack => RenderPhase::ReconcilingHeap,
            RenderPhase::ReconcilingHeap => RenderPhase::ResolvingReferences,
            RenderPhase::ResolvingReferences => RenderPhase::Idle,
        }
    }
}

fn advance(phase: &mut RenderPhase, to: RenderPhase) {
    debug_assert_eq!(phase.next(), to, "render phases must not be skipped");
    tracing::trace!(from = ?*phase, ?to, "render phase");
    *phase = to;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Backend {
    Uninitialized,
    Ready,
    Failed(String),
}

fn frame_header(frame: &Frame) -> NodeHeader {
    NodeHeader::new(frame.function_name.as_str())
}

fn object_header(object: &HeapObject) -> NodeHeader {
    NodeHeader::new(object.class_name.as_str()).with_subtitle(format!("(id={})", object.id))
}

/// Binds frames and objects to nodes, deferring references into the queue
struct NodeBinder<'a> {
    references: &'a mut ReferenceQueue,
    null_text: &'a str,
}

impl NodeBinder<'_> {
    fn rebind_rows<C: Canvas>(
        &mut self,
        canvas: &mut C,
        node: &mut LiveNode,
        variables: &[Variable],
    ) -> Result<(), RenderError> {
        match render_rows(canvas, node.id, node.rows, variables, self.references, self.null_text) {
            Ok(rows) => {
                node.rows = rows;
                Ok(())
            }
            Err(err) => {
                // Rows may be partly written; an upper bound keeps the next truncate correct
                node.rows = node.rows.max(variables.len());
                Err(err)
            }
        }
    }

    fn populate<C: Canvas>(
        &mut self,
        canvas: &mut C,
        id: NodeId,
        variables: &[Variable],
    ) -> Result<LiveNode, RenderError> {
        match render_rows(canvas, id, 0, variables, self.references, self.null_text) {
            Ok(rows) => Ok(LiveNode { id, rows }),
            Err(err) => {
                if let Err(remove_err) = canvas.remove_node(id) {
                    tracing::warn!(%remove_err, %id, "failed to remove half-built node");
                }
                Err(err)
            }
        }
    }
}

impl Binder<Frame> for NodeBinder<'_> {
    fn bind_new<C: Canvas>(
        &mut self,
        canvas: &mut C,
        container: Container,
        position: usize,
        frame: &Frame,
    ) -> Result<LiveNode, RenderError> {
        let id = canvas.create_node(container, position, &frame_header(frame))?;
        self.populate(canvas, id, &frame.variables)
    }

    fn bind_existing<C: Canvas>(
        &mut self,
        canvas: &mut C,
        node: &mut LiveNode,
        position: usize,
        frame: &Frame,
    ) -> Result<(), RenderError> {
        canvas.update_node(node.id, position, &frame_header(frame))?;
        self.rebind_rows(canvas, node, &frame.variables)
    }
}

impl Binder<HeapObject> for NodeBinder<'_> {
    fn bind_new<C: Canvas>(
        &mut self,
        canvas: &mut C,
        container: Container,
        position: usize,
        object: &HeapObject,
    ) -> Result<LiveNode, RenderError> {
        let id = canvas.create_node(container, position, &object_header(object))?;
        self.populate(canvas, id, &object.fields)
    }

    fn bind_existing<C: Canvas>(
        &mut self,
        canvas: &mut C,
        node: &mut LiveNode,
        position: usize,
        object: &HeapObject,
    ) -> Result<(), RenderError> {
        canvas.update_node(node.id, position, &object_header(object))?;
        self.rebind_rows(canvas, node, &object.fields)
    }
}

/// Incremental stack and heap diagram over a [`Canvas`]
pub struct DiagramRenderer<C> {
    canvas: C,
    config: RendererConfig,
    frames: LiveSet<usize>,
    objects: LiveSet<ObjectId>,
    references: ReferenceQueue,
    phase: RenderPhase,
    backend: Backend,
    pending: VecDeque<Snapshot>,
    passes: u64,
}

impl<C: Canvas> DiagramRenderer<C> {
    pub fn new(canvas: C) -> Self {
        Self::with_config(canvas, RendererConfig::default())
    }

    pub fn with_config(canvas: C, config: RendererConfig) -> Self {
        DiagramRenderer {
            canvas,
            config,
            frames: LiveSet::new(),
            objects: LiveSet::new(),
            references: ReferenceQueue::new(),
            phase: RenderPhase::Idle,
            backend: Backend::Uninitialized,
            pending: VecDeque::new(),
            passes: 0,
        }
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn phase(&self) -> RenderPhase {
        self.phase
    }

    /// `false` after a failed initialization, until [`reinitialize`] succeeds
    ///
    /// [`reinitialize`]: DiagramRenderer::reinitialize
    pub fn is_enabled(&self) -> bool {
        !matches!(self.backend, Backend::Failed(_))
    }

    /// Node bound to the frame at `index` (0 = outermost)
    pub fn frame_node(&self, index: usize) -> Option<NodeId> {
        self.frames.node_id(&index)
    }

    pub fn object_node(&self, id: &ObjectId) -> Option<NodeId> {
        self.objects.node_id(id)
    }

    /// Frame nodes in sibling order
    pub fn frame_nodes(&self) -> Vec<NodeId> {
        self.frames.node_ids()
    }

    /// Object nodes in sibling order
    pub fn object_nodes(&self) -> Vec<NodeId> {
        self.objects.node_ids()
    }

    /// Number of passes run so far
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Snapshots waiting for a pass
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Queue a snapshot behind any not yet rendered.
    ///
    /// While the backend is disabled the queue holds at most one snapshot:
    /// a new submission replaces whatever was waiting.
    pub fn submit(&mut self, snapshot: Snapshot) {
        if let Backend::Failed(_) = self.backend {
            if !self.pending.is_empty() {
                tracing::debug!(dropped = self.pending.len(), "replacing stale snapshots while disabled");
                self.pending.clear();
            }
        }
        self.pending.push_back(snapshot);
    }

    /// Render every queued snapshot in submission order.
    ///
    /// While the backend is disabled the queue is kept for the next
    /// [`reinitialize`] and [`RenderError::Disabled`] is returned.
    ///
    /// [`reinitialize`]: DiagramRenderer::reinitialize
    pub fn drain(&mut self) -> Result<Vec<PassReport>, RenderError> {
        if self.pending.is_empty() {
            return Ok(Vec::new());
        }
        self.ensure_backend()?;

        let mut reports = Vec::with_capacity(self.pending.len());
        while let Some(snapshot) = self.pending.pop_front() {
            reports.push(self.run_pass(&snapshot)?);
        }
        Ok(reports)
    }

    /// Render one snapshot, after anything already queued.
    pub fn render_snapshot(&mut self, snapshot: Snapshot) -> Result<PassReport, RenderError> {
        self.submit(snapshot);
        let mut reports = self.drain()?;
        Ok(reports.pop().unwrap_or_default())
    }

    /// Retry backend initialization after a failure.
    pub fn reinitialize(&mut self) -> Result<(), RenderError> {
        self.backend = Backend::Uninitialized;
        self.ensure_backend()
    }

    fn ensure_backend(&mut self) -> Result<(), RenderError> {
        match &self.backend {
            Backend::Ready => Ok(()),
            Backend::Failed(message) => {
                tracing::debug!(%message, "render skipped; backend disabled");
                Err(RenderError::Disabled)
            }
            Backend::Uninitialized => match self.canvas.initialize() {
                Ok(()) => {
                    tracing::info!("visualization backend initialized");
                    self.backend = Backend::Ready;
                    Ok(())
                }
                Err(err) => {
                    tracing::error!(%err, "visualization backend failed to initialize; rendering disabled");
                    self.backend = Backend::Failed(err.to_string());
                    Err(err)
                }
            },
        }
    }

    fn run_pass(&mut self, snapshot: &Snapshot) -> Result<PassReport, RenderError> {
        self.passes += 1;
        let span = tracing::debug_span!("render_pass", pass = self.passes);
        let _entered = span.enter();

        let mut report = PassReport {
            pass: self.passes,
            ..PassReport::default()
        };
        let result = self.run_phases(snapshot, &mut report);
        self.phase = RenderPhase::Idle;
        self.references.clear();

        match result {
            Ok(()) => {
                tracing::debug!(
                    frames = self.frames.len(),
                    objects = self.objects.len(),
                    connectors = report.connectors,
                    diagnostics = report.diagnostics.len(),
                    "render pass complete"
                );
                Ok(report)
            }
            Err(err) => {
                tracing::warn!(%err, "render pass aborted");
                Err(err)
            }
        }
    }

    fn run_phases(&mut self, snapshot: &Snapshot, report: &mut PassReport) -> Result<(), RenderError> {
        self.references.clear();
        let mut binder = NodeBinder {
            references: &mut self.references,
            null_text: &self.config.null_text,
        };

        advance(&mut self.phase, RenderPhase::ReconcilingStack);
        report.stack = reconcile(
            &mut self.canvas,
            Container::Stack,
            &mut self.frames,
            &snapshot.stack,
            |index, _| index,
            &mut binder,
        )?;

        advance(&mut self.phase, RenderPhase::ReconcilingHeap);
        report.heap = reconcile(
            &mut self.canvas,
            Container::Heap,
            &mut self.objects,
            &snapshot.heap,
            |_, object| object.id.clone(),
            &mut binder,
        )?;

        advance(&mut self.phase, RenderPhase::ResolvingReferences);
        let resolution = resolve_all(&mut self.references, &self.objects, &mut self.canvas)?;
        report.collect_diagnostics(resolution);

        advance(&mut self.phase, RenderPhase::Idle);
        Ok(())
    }
}

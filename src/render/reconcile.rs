//! Keyed data join between a new entity collection and the live node set
//!
//! [`reconcile`] partitions the incoming entities against the nodes rendered
//! by the previous pass:
//!
//! - **exit**: live keys absent from the new collection are unbound and their
//!   nodes removed
//! - **update**: matching keys keep their node, which is refreshed in place and
//!   moved to the entity's new position
//! - **enter**: new keys get a freshly created node at their position
//!
//! After the join the container's children are exactly the new collection, in
//! the same order. A node is only ever rebuilt when its key disappears.

use super::canvas::{Canvas, Container, NodeId};
use crate::error::RenderError;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt::Debug;
use std::hash::Hash;

/// A node bound to an entity, as tracked between passes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveNode {
    pub id: NodeId,
    /// Rows rendered into the node by the last bind
    pub rows: usize,
}

/// Live nodes in sibling order with keyed lookup
#[derive(Debug)]
pub struct LiveSet<K> {
    order: Vec<K>,
    nodes: FxHashMap<K, LiveNode>,
}

impl<K> Default for LiveSet<K> {
    fn default() -> Self {
        LiveSet {
            order: Vec::new(),
            nodes: FxHashMap::default(),
        }
    }
}

impl<K: Eq + Hash + Clone> LiveSet<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &K) -> Option<&LiveNode> {
        self.nodes.get(key)
    }

    pub fn node_id(&self, key: &K) -> Option<NodeId> {
        self.nodes.get(key).map(|node| node.id)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Keys in sibling order
    pub fn keys(&self) -> &[K] {
        &self.order
    }

    /// Node handles in sibling order
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.order
            .iter()
            .filter_map(|key| self.node_id(key))
            .collect()
    }

    fn push(&mut self, key: K, node: LiveNode) {
        self.order.push(key.clone());
        self.nodes.insert(key, node);
    }
}

/// Callbacks that turn entities into node content
pub trait Binder<E> {
    /// Create and populate a node for an entity with no live counterpart.
    fn bind_new<C: Canvas>(
        &mut self,
        canvas: &mut C,
        container: Container,
        position: usize,
        entity: &E,
    ) -> Result<LiveNode, RenderError>;

    /// Refresh a reused node so it shows `entity` at `position`.
    fn bind_existing<C: Canvas>(
        &mut self,
        canvas: &mut C,
        node: &mut LiveNode,
        position: usize,
        entity: &E,
    ) -> Result<(), RenderError>;

    /// Release anything tied to a node before it is removed.
    fn unbind_removed<C: Canvas>(&mut self, _canvas: &mut C, _node: &LiveNode) -> Result<(), RenderError> {
        Ok(())
    }
}

/// What a join did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSummary<K> {
    pub entered: Vec<K>,
    pub updated: usize,
    pub exited: Vec<K>,
    /// Keys seen more than once; only the first occurrence was rendered
    pub duplicates: Vec<K>,
}

impl<K> Default for JoinSummary<K> {
    fn default() -> Self {
        JoinSummary {
            entered: Vec::new(),
            updated: 0,
            exited: Vec::new(),
            duplicates: Vec::new(),
        }
    }
}

/// Join `entities` against `live`, issuing canvas commands for the difference.
///
/// On a canvas failure the join stops; nodes not yet visited stay in `live`
/// so the next pass can still remove them.
pub fn reconcile<E, K, C, B, F>(
    canvas: &mut C,
    container: Container,
    live: &mut LiveSet<K>,
    entities: &[E],
    key_fn: F,
    binder: &mut B,
) -> Result<JoinSummary<K>, RenderError>
where
    K: Eq + Hash + Clone + Debug,
    C: Canvas,
    B: Binder<E>,
    F: Fn(usize, &E) -> K,
{
    let mut summary = JoinSummary::default();

    let mut seen = FxHashSet::default();
    let mut keyed = Vec::with_capacity(entities.len());
    for (index, entity) in entities.iter().enumerate() {
        let key = key_fn(index, entity);
        if seen.contains(&key) {
            tracing::warn!(%container, ?key, index, "duplicate key in snapshot; keeping first occurrence");
            summary.duplicates.push(key);
            continue;
        }
        seen.insert(key.clone());
        keyed.push((key, entity));
    }

    let previous_order = std::mem::take(&mut live.order);
    let mut previous = std::mem::take(&mut live.nodes);

    let mut failure = None;
    for key in &previous_order {
        if seen.contains(key) {
            continue;
        }
        let Some(node) = previous.get(key).copied() else {
            continue;
        };
        let removed = binder
            .unbind_removed(canvas, &node)
            .and_then(|()| canvas.remove_node(node.id));
        match removed {
            Ok(()) => {
                previous.remove(key);
                summary.exited.push(key.clone());
            }
            Err(err) => {
                failure = Some(err);
                break;
            }
        }
    }

    if failure.is_none() {
        for (position, (key, entity)) in keyed.into_iter().enumerate() {
            let bound = match previous.get(&key).copied() {
                Some(mut node) => match binder.bind_existing(canvas, &mut node, position, entity) {
                    Ok(()) => {
                        previous.remove(&key);
                        summary.updated += 1;
                        Ok(node)
                    }
                    Err(err) => {
                        // Keep what the failed bind left on the canvas
                        previous.insert(key.clone(), node);
                        Err(err)
                    }
                },
                None => binder
                    .bind_new(canvas, container, position, entity)
                    .map(|node| {
                        summary.entered.push(key.clone());
                        node
                    }),
            };
            match bound {
                Ok(node) => live.push(key, node),
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }
    }

    if let Some(err) = failure {
        for key in previous_order {
            if let Some(node) = previous.remove(&key) {
                live.push(key, node);
            }
        }
        return Err(err);
    }

    tracing::trace!(
        %container,
        entered = summary.entered.len(),
        updated = summary.updated,
        exited = summary.exited.len(),
        "join complete"
    );
    Ok(summary)
}

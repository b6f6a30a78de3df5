//! Host-side snapshot assembly
//!
//! Debugger back-ends usually report frames innermost-first and only know the
//! heap as an object graph reachable from those frames. [`SnapshotBuilder`]
//! flips the frames into call order and walks the graph breadth-first from
//! the stack, so heap objects appear in the order they are first referenced
//! and each object appears exactly once.

use super::{Frame, HeapObject, ObjectId, Snapshot};
use rustc_hash::FxHashSet;
use std::collections::{HashMap, VecDeque};
use std::hash::BuildHasher;

/// Lookup of live heap objects by identity
pub trait ObjectGraph {
    /// Describe a live object, or `None` if it no longer exists.
    fn object(&self, id: &ObjectId) -> Option<HeapObject>;
}

impl<S: BuildHasher> ObjectGraph for HashMap<ObjectId, HeapObject, S> {
    fn object(&self, id: &ObjectId) -> Option<HeapObject> {
        self.get(id).cloned()
    }
}

/// Collects frames and resolves the reachable heap into a [`Snapshot`]
#[derive(Debug, Clone, Default)]
pub struct SnapshotBuilder {
    stack: Vec<Frame>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from frames listed innermost (currently executing) first.
    pub fn from_innermost(frames: impl IntoIterator<Item = Frame>) -> Self {
        let mut stack: Vec<Frame> = frames.into_iter().collect();
        stack.reverse();
        SnapshotBuilder { stack }
    }

    /// Push a frame on top of the stack built so far.
    pub fn push_frame(&mut self, frame: Frame) -> &mut Self {
        self.stack.push(frame);
        self
    }

    pub fn build<G: ObjectGraph>(self, graph: &G) -> Snapshot {
        let mut seen = FxHashSet::default();
        let mut pending = VecDeque::new();

        let roots = self
            .stack
            .iter()
            .flat_map(|frame| frame.variables.iter())
            .filter_map(|variable| variable.target());
        for target in roots {
            if seen.insert(target.clone()) {
                pending.push_back(target.clone());
            }
        }

        let mut heap = Vec::new();
        while let Some(id) = pending.pop_front() {
            let Some(object) = graph.object(&id) else {
                tracing::debug!(object = %id, "referenced object is no longer live");
                continue;
            };

            for target in object.fields.iter().filter_map(|field| field.target()) {
                if seen.insert(target.clone()) {
                    pending.push_back(target.clone());
                }
            }
            heap.push(object);
        }

        Snapshot {
            stack: self.stack,
            heap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Variable;

    fn graph(objects: Vec<HeapObject>) -> HashMap<ObjectId, HeapObject> {
        objects
            .into_iter()
            .map(|object| (object.id.clone(), object))
            .collect()
    }

    #[test]
    fn test_frames_are_reversed_into_call_order() {
        let snapshot = SnapshotBuilder::from_innermost(vec![
            Frame::new("helper", vec![]),
            Frame::new("main", vec![]),
        ])
        .build(&graph(vec![]));

        let names: Vec<_> = snapshot.stack.iter().map(|f| f.function_name.as_str()).collect();
        assert_eq!(names, ["main", "helper"]);
    }

    #[test]
    fn test_heap_is_discovered_breadth_first() {
        let objects = graph(vec![
            HeapObject::new("1", "List", vec![Variable::reference("Node", "head", "2")]),
            HeapObject::new(
                "2",
                "Node",
                vec![
                    Variable::reference("Node", "next", "3"),
                    Variable::reference("List", "owner", "1"),
                ],
            ),
            HeapObject::new("3", "Node", vec![Variable::null_reference("Node", "next")]),
            HeapObject::new("9", "Unreachable", vec![]),
        ]);

        let mut builder = SnapshotBuilder::new();
        builder.push_frame(Frame::new(
            "main",
            vec![
                Variable::reference("List", "list", "1"),
                Variable::reference("List", "alias", "1"),
            ],
        ));
        let snapshot = builder.build(&objects);

        let ids: Vec<_> = snapshot.heap.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn test_missing_objects_are_skipped() {
        let mut builder = SnapshotBuilder::new();
        builder.push_frame(Frame::new("main", vec![Variable::reference("Foo", "f", "42")]));
        let snapshot = builder.build(&graph(vec![]));

        assert!(snapshot.heap.is_empty());
        assert_eq!(snapshot.stack.len(), 1);
    }
}

//! Snapshot model shared between the debugger host and the renderer
//!
//! A [`Snapshot`] is the complete stack and heap state at one debugger step:
//! - [`Frame`]: one activation record, in call order (outermost first)
//! - [`HeapObject`]: one live object, keyed by its stable [`ObjectId`]
//! - [`Variable`]: a local or field, tagged as primitive, reference or null
//!
//! # Wire Format
//!
//! Hosts deliver snapshots as JSON using flat variable records:
//!
//! ```text
//! { "type": "Foo", "name": "f", "value": "1", "isReference": true }
//! ```
//!
//! A reference whose value is [`NULL_SENTINEL`] is a null reference; any
//! other reference value is the id of a heap object. The flat record is
//! converted into the tagged [`Variable`] on deserialization so the renderer
//! never inspects the flag or the sentinel string.

pub mod builder;
pub mod trace;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use builder::{ObjectGraph, SnapshotBuilder};
pub use trace::{Trace, TraceFile, TraceStep};

/// Value carried by a reference variable that points at nothing
pub const NULL_SENTINEL: &str = "null";

/// Stable identity of a heap object for the lifetime of its allocation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        ObjectId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        ObjectId::new(id)
    }
}

impl From<String> for ObjectId {
    fn from(id: String) -> Self {
        ObjectId(id)
    }
}

/// A local variable or object field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "VariableInfo", into = "VariableInfo")]
pub enum Variable {
    /// Value rendered as literal text
    Primitive {
        ty: String,
        name: String,
        value: String,
    },
    /// Points at a heap object; rendered as a connector
    Reference {
        ty: String,
        name: String,
        target: ObjectId,
    },
    /// Reference holding no object
    NullReference { ty: String, name: String },
}

impl Variable {
    pub fn primitive(ty: impl Into<String>, name: impl Into<String>, value: impl Into<String>) -> Self {
        Variable::Primitive {
            ty: ty.into(),
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn reference(ty: impl Into<String>, name: impl Into<String>, target: impl Into<ObjectId>) -> Self {
        Variable::Reference {
            ty: ty.into(),
            name: name.into(),
            target: target.into(),
        }
    }

    pub fn null_reference(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Variable::NullReference {
            ty: ty.into(),
            name: name.into(),
        }
    }

    pub fn ty(&self) -> &str {
        match self {
            Variable::Primitive { ty, .. }
            | Variable::Reference { ty, .. }
            | Variable::NullReference { ty, .. } => ty,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Variable::Primitive { name, .. }
            | Variable::Reference { name, .. }
            | Variable::NullReference { name, .. } => name,
        }
    }

    /// The heap object this variable points at, if any
    pub fn target(&self) -> Option<&ObjectId> {
        match self {
            Variable::Reference { target, .. } => Some(target),
            _ => None,
        }
    }
}

/// Flat host representation of a [`Variable`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableInfo {
    #[serde(rename = "type")]
    pub ty: String,
    pub name: String,
    pub value: String,
    #[serde(rename = "isReference", default)]
    pub is_reference: bool,
}

impl From<VariableInfo> for Variable {
    fn from(info: VariableInfo) -> Self {
        let VariableInfo {
            ty,
            name,
            value,
            is_reference,
        } = info;
        if !is_reference {
            Variable::Primitive { ty, name, value }
        } else if value == NULL_SENTINEL {
            Variable::NullReference { ty, name }
        } else {
            Variable::Reference {
                ty,
                name,
                target: ObjectId(value),
            }
        }
    }
}

impl From<Variable> for VariableInfo {
    fn from(variable: Variable) -> Self {
        match variable {
            Variable::Primitive { ty, name, value } => VariableInfo {
                ty,
                name,
                value,
                is_reference: false,
            },
            Variable::Reference { ty, name, target } => VariableInfo {
                ty,
                name,
                value: target.0,
                is_reference: true,
            },
            Variable::NullReference { ty, name } => VariableInfo {
                ty,
                name,
                value: NULL_SENTINEL.to_string(),
                is_reference: true,
            },
        }
    }
}

/// One activation record on the call stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(rename = "function")]
    pub function_name: String,
    #[serde(default)]
    pub variables: Vec<Variable>,
}

impl Frame {
    pub fn new(function_name: impl Into<String>, variables: Vec<Variable>) -> Self {
        Frame {
            function_name: function_name.into(),
            variables,
        }
    }
}

/// One live heap object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeapObject {
    pub id: ObjectId,
    #[serde(rename = "klass")]
    pub class_name: String,
    #[serde(default)]
    pub fields: Vec<Variable>,
}

impl HeapObject {
    pub fn new(id: impl Into<ObjectId>, class_name: impl Into<String>, fields: Vec<Variable>) -> Self {
        HeapObject {
            id: id.into(),
            class_name: class_name.into(),
            fields,
        }
    }
}

/// Stack and heap state at one debugger step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub stack: Vec<Frame>,
    #[serde(default)]
    pub heap: Vec<HeapObject>,
}

impl Snapshot {
    pub fn new(stack: Vec<Frame>, heap: Vec<HeapObject>) -> Self {
        Snapshot { stack, heap }
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty() && self.heap.is_empty()
    }

    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        fn variable_size(variable: &Variable) -> usize {
            let value_len = match variable {
                Variable::Primitive { value, .. } => value.len(),
                Variable::Reference { target, .. } => target.as_str().len(),
                Variable::NullReference { .. } => 0,
            };
            variable.ty().len() + variable.name().len() + value_len + 24
        }

        let stack: usize = self
            .stack
            .iter()
            .map(|frame| frame.function_name.len() + 32 + frame.variables.iter().map(variable_size).sum::<usize>())
            .sum();
        let heap: usize = self
            .heap
            .iter()
            .map(|object| {
                object.id.as_str().len()
                    + object.class_name.len()
                    + 48
                    + object.fields.iter().map(variable_size).sum::<usize>()
            })
            .sum();

        stack + heap
    }
}

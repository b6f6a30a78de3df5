// Recorded debugger sessions for replay

use super::Snapshot;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// One debugger step: the execution line and the state at that line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
    /// 1-based source line about to execute
    pub line: usize,
    #[serde(flatten)]
    pub snapshot: Snapshot,
}

/// On-disk layout of a recorded session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceFile {
    pub source: String,
    #[serde(default)]
    pub breakpoints: Vec<usize>,
    #[serde(default)]
    pub steps: Vec<TraceStep>,
}

/// Step history with a cursor, bounded by an estimated memory budget
#[derive(Debug)]
pub struct Trace {
    source: String,
    breakpoints: Vec<usize>,
    steps: Vec<TraceStep>,
    position: usize,
    max_memory: usize,
    current_memory: usize,
}

impl Trace {
    pub fn new(source: String, max_memory: usize) -> Self {
        Trace {
            source,
            breakpoints: Vec::new(),
            steps: Vec::new(),
            position: 0,
            max_memory,
            current_memory: 0,
        }
    }

    /// Load a JSON trace from disk
    pub fn load(path: &Path, max_memory: usize) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text, max_memory)
    }

    pub fn from_json(text: &str, max_memory: usize) -> Result<Self> {
        let file: TraceFile = serde_json::from_str(text)?;
        Self::from_file(file, max_memory)
    }

    pub fn from_file(file: TraceFile, max_memory: usize) -> Result<Self> {
        if file.steps.is_empty() {
            return Err(Error::EmptyTrace);
        }

        let mut trace = Trace::new(file.source, max_memory);
        trace.breakpoints = file.breakpoints;
        for step in file.steps {
            trace.push(step)?;
        }
        tracing::info!(
            steps = trace.len(),
            bytes = trace.memory_usage(),
            "trace loaded"
        );
        Ok(trace)
    }

    /// Append a step to history
    pub fn push(&mut self, step: TraceStep) -> Result<()> {
        let step_size = step.snapshot.estimated_size();

        if self.current_memory + step_size > self.max_memory {
            return Err(Error::HistoryLimitExceeded {
                current: self.current_memory,
                incoming: step_size,
                limit: self.max_memory,
            });
        }

        self.current_memory += step_size;
        self.steps.push(step);
        Ok(())
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Breakpoint lines recorded with the session
    pub fn initial_breakpoints(&self) -> &[usize] {
        &self.breakpoints
    }

    pub fn current(&self) -> Option<&TraceStep> {
        self.steps.get(self.position)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn is_at_end(&self) -> bool {
        self.position + 1 >= self.steps.len()
    }

    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }

    /// Move one step forward, returning `false` at the end of history
    pub fn step_forward(&mut self) -> bool {
        if self.is_at_end() {
            return false;
        }
        self.position += 1;
        true
    }

    /// Move one step backward, returning `false` at the start of history
    pub fn step_backward(&mut self) -> bool {
        if self.position == 0 {
            return false;
        }
        self.position -= 1;
        true
    }

    pub fn rewind_to_start(&mut self) {
        self.position = 0;
    }

    pub fn jump_to_end(&mut self) {
        self.position = self.steps.len().saturating_sub(1);
    }

    /// Advance to the next step whose line holds a breakpoint, or to the last
    /// step if none does. Returns whether a breakpoint was hit.
    pub fn continue_to(&mut self, breakpoints: &BTreeSet<usize>) -> bool {
        let hit = self
            .steps
            .iter()
            .skip(self.position + 1)
            .position(|step| breakpoints.contains(&step.line));
        match hit {
            Some(offset) => {
                self.position += offset + 1;
                true
            }
            None => {
                self.jump_to_end();
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{Frame, Variable};

    fn step(line: usize) -> TraceStep {
        TraceStep {
            line,
            snapshot: Snapshot::new(
                vec![Frame::new("main", vec![Variable::primitive("int", "x", "1")])],
                vec![],
            ),
        }
    }

    fn trace(lines: &[usize]) -> Trace {
        let file = TraceFile {
            source: "a\nb\nc\nd\n".to_string(),
            breakpoints: vec![],
            steps: lines.iter().copied().map(step).collect(),
        };
        Trace::from_file(file, 1024 * 1024).unwrap()
    }

    #[test]
    fn test_stepping_is_bounded() {
        let mut trace = trace(&[1, 2]);
        assert!(!trace.step_backward());
        assert!(trace.step_forward());
        assert!(!trace.step_forward());
        assert_eq!(trace.current().map(|s| s.line), Some(2));
    }

    #[test]
    fn test_continue_stops_at_breakpoint() {
        let mut trace = trace(&[1, 2, 3, 2, 4]);
        let breakpoints = BTreeSet::from([2]);

        assert!(trace.continue_to(&breakpoints));
        assert_eq!(trace.position(), 1);
        assert!(trace.continue_to(&breakpoints));
        assert_eq!(trace.position(), 3);
        assert!(!trace.continue_to(&breakpoints));
        assert_eq!(trace.position(), 4);
    }

    #[test]
    fn test_memory_limit() {
        let file = TraceFile {
            source: String::new(),
            breakpoints: vec![],
            steps: vec![step(1), step(2)],
        };
        let result = Trace::from_file(file, 10);
        assert!(matches!(result, Err(Error::HistoryLimitExceeded { .. })));
    }

    #[test]
    fn test_empty_trace_is_rejected() {
        let result = Trace::from_json(r#"{"source": "", "steps": []}"#, 1024);
        assert!(matches!(result, Err(Error::EmptyTrace)));
    }

    #[test]
    fn test_step_fields_are_flattened() {
        let json = r#"{
            "source": "int x = 3;",
            "breakpoints": [1],
            "steps": [{"line": 1, "stack": [{"function": "main"}], "heap": []}]
        }"#;
        let trace = Trace::from_json(json, 1024).unwrap();
        assert_eq!(trace.initial_breakpoints(), &[1]);
        assert_eq!(trace.current().unwrap().snapshot.stack[0].function_name, "main");
    }
}

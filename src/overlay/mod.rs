//! Breakpoint markers and the current-line highlight over a source view
//!
//! [`MarkerOverlay`] mirrors the host's breakpoint set and execution position
//! onto a [`SourceView`]. It is a view of that state, not its owner: a click
//! in the gutter is forwarded to the host as [`OverlayEvent::GutterClick`],
//! and the host answers with marker commands.
//!
//! Until the view reports ready, commands are recorded and replayed when it
//! attaches. A view that fails to load is reported through
//! [`OverlayEvent::InitializationFailed`] and recording continues, so a later
//! successful load still shows everything. Commands naming a line outside the document do nothing and
//! return [`MarkerOutcome::OutOfRange`].

pub mod view;

pub use view::{Glyph, MemorySourceView, SourceView};

use crate::config::OverlayConfig;
use crate::render::Diagnostic;
use std::collections::{BTreeMap, VecDeque};

/// Notifications for the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayEvent {
    /// The view finished loading
    Ready,
    /// The view could not be loaded; commands stay recorded
    InitializationFailed(String),
    /// The user clicked the gutter of a 1-based line
    GutterClick(usize),
    /// A toggle left the line with (`set`) or without a marker
    BreakpointToggled { line: usize, set: bool },
}

/// Result of a marker command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerOutcome {
    Applied,
    /// The command matched the current state
    Unchanged,
    OutOfRange { line: usize, line_count: usize },
}

impl MarkerOutcome {
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        match *self {
            MarkerOutcome::OutOfRange { line, line_count } => {
                Some(Diagnostic::LineOutOfRange { line, line_count })
            }
            _ => None,
        }
    }
}

pub struct MarkerOverlay<V> {
    view: Option<V>,
    pending_text: Option<String>,
    markers: BTreeMap<usize, Glyph>,
    current_line: Option<usize>,
    breakpoint_glyph: Glyph,
    events: VecDeque<OverlayEvent>,
}

impl<V: SourceView> Default for MarkerOverlay<V> {
    fn default() -> Self {
        Self::new(&OverlayConfig::default())
    }
}

impl<V: SourceView> MarkerOverlay<V> {
    /// An overlay waiting for its view
    pub fn new(config: &OverlayConfig) -> Self {
        MarkerOverlay {
            view: None,
            pending_text: None,
            markers: BTreeMap::new(),
            current_line: None,
            breakpoint_glyph: Glyph::new(config.breakpoint_glyph.as_str()),
            events: VecDeque::new(),
        }
    }

    /// An overlay over a view that is already loaded
    pub fn attached(view: V, config: &OverlayConfig) -> Self {
        let mut overlay = Self::new(config);
        overlay.editor_ready(view);
        overlay
    }

    pub fn is_ready(&self) -> bool {
        self.view.is_some()
    }

    pub fn view(&self) -> Option<&V> {
        self.view.as_ref()
    }

    pub fn view_mut(&mut self) -> Option<&mut V> {
        self.view.as_mut()
    }

    /// Next notification for the host, oldest first
    pub fn poll_event(&mut self) -> Option<OverlayEvent> {
        self.events.pop_front()
    }

    pub fn current_line(&self) -> Option<usize> {
        self.current_line
    }

    pub fn has_marker(&self, line: usize) -> bool {
        self.markers.contains_key(&line)
    }

    pub fn marker(&self, line: usize) -> Option<&Glyph> {
        self.markers.get(&line)
    }

    /// Marked lines in ascending order
    pub fn marked_lines(&self) -> impl Iterator<Item = usize> + '_ {
        self.markers.keys().copied()
    }

    /// Report that the view failed to load.
    ///
    /// The overlay stays detached and keeps recording commands for a later
    /// [`editor_ready`](MarkerOverlay::editor_ready).
    pub fn editor_failed(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::error!(%reason, attached = self.is_ready(), "source view failed to load");
        self.events.push_back(OverlayEvent::InitializationFailed(reason));
    }

    /// Attach the loaded view and replay everything recorded before it.
    pub fn editor_ready(&mut self, mut view: V) {
        if let Some(text) = self.pending_text.take() {
            view.replace_text(&text);
        }

        let line_count = view.line_count();
        self.markers.retain(|line, glyph| {
            let keep = (1..=line_count).contains(line);
            if keep {
                view.set_gutter_marker(*line, Some(glyph));
            } else {
                tracing::warn!(line, line_count, "dropping breakpoint marker recorded before load");
            }
            keep
        });
        if let Some(line) = self.current_line {
            if (1..=line_count).contains(&line) {
                view.set_line_highlight(line, true);
            } else {
                self.current_line = None;
            }
        }

        tracing::debug!(line_count, markers = self.markers.len(), "source view ready");
        self.view = Some(view);
        self.events.push_back(OverlayEvent::Ready);
    }

    /// Swap the document, keeping markers and the highlight that still fit.
    pub fn replace_text(&mut self, text: &str) {
        let Some(view) = self.view.as_mut() else {
            self.pending_text = Some(text.to_string());
            return;
        };

        view.replace_text(text);
        let line_count = view.line_count();
        self.markers.retain(|line, glyph| {
            let keep = *line <= line_count;
            if keep {
                view.set_gutter_marker(*line, Some(glyph));
            }
            keep
        });
        match self.current_line {
            Some(line) if line <= line_count => view.set_line_highlight(line, true),
            _ => self.current_line = None,
        }
    }

    /// Forward a click on the gutter of 0-based view row `row` to the host.
    pub fn gutter_click(&mut self, row: usize) -> MarkerOutcome {
        let line = row + 1;
        if let Some(outcome) = self.check_range(line) {
            return outcome;
        }
        self.events.push_back(OverlayEvent::GutterClick(line));
        MarkerOutcome::Applied
    }

    /// Flip the marker on `line` and tell the host which way it went.
    pub fn toggle_breakpoint(&mut self, line: usize) -> MarkerOutcome {
        if let Some(outcome) = self.check_range(line) {
            return outcome;
        }

        let set = if self.markers.remove(&line).is_some() {
            if let Some(view) = self.view.as_mut() {
                view.set_gutter_marker(line, None);
            }
            false
        } else {
            let glyph = self.breakpoint_glyph.clone();
            if let Some(view) = self.view.as_mut() {
                view.set_gutter_marker(line, Some(&glyph));
            }
            self.markers.insert(line, glyph);
            true
        };

        self.events
            .push_back(OverlayEvent::BreakpointToggled { line, set });
        MarkerOutcome::Applied
    }

    pub fn set_breakpoint_marker(&mut self, line: usize, glyph: Glyph) -> MarkerOutcome {
        if let Some(outcome) = self.check_range(line) {
            return outcome;
        }
        if self.markers.get(&line) == Some(&glyph) {
            return MarkerOutcome::Unchanged;
        }

        if let Some(view) = self.view.as_mut() {
            view.set_gutter_marker(line, Some(&glyph));
        }
        self.markers.insert(line, glyph);
        MarkerOutcome::Applied
    }

    /// [`set_breakpoint_marker`] with the configured breakpoint glyph
    ///
    /// [`set_breakpoint_marker`]: MarkerOverlay::set_breakpoint_marker
    pub fn mark_breakpoint(&mut self, line: usize) -> MarkerOutcome {
        let glyph = self.breakpoint_glyph.clone();
        self.set_breakpoint_marker(line, glyph)
    }

    pub fn clear_breakpoint_marker(&mut self, line: usize) -> MarkerOutcome {
        if let Some(outcome) = self.check_range(line) {
            return outcome;
        }
        if self.markers.remove(&line).is_none() {
            return MarkerOutcome::Unchanged;
        }

        if let Some(view) = self.view.as_mut() {
            view.set_gutter_marker(line, None);
        }
        MarkerOutcome::Applied
    }

    /// Move the execution highlight to `line`.
    pub fn set_current_line(&mut self, line: usize) -> MarkerOutcome {
        if let Some(outcome) = self.check_range(line) {
            return outcome;
        }
        if self.current_line == Some(line) {
            return MarkerOutcome::Unchanged;
        }

        let previous = self.current_line.replace(line);
        if let Some(view) = self.view.as_mut() {
            if let Some(previous) = previous {
                view.set_line_highlight(previous, false);
            }
            view.set_line_highlight(line, true);
        }
        MarkerOutcome::Applied
    }

    /// Remove the execution highlight, e.g. once the program has finished.
    pub fn clear_current_line(&mut self) -> MarkerOutcome {
        let Some(previous) = self.current_line.take() else {
            return MarkerOutcome::Unchanged;
        };
        if let Some(view) = self.view.as_mut() {
            view.set_line_highlight(previous, false);
        }
        MarkerOutcome::Applied
    }

    /// Scroll so `line` sits in the middle of the viewport.
    pub fn scroll_line_into_view(&mut self, line: usize) -> MarkerOutcome {
        if let Some(outcome) = self.check_range(line) {
            return outcome;
        }
        let Some(view) = self.view.as_mut() else {
            return MarkerOutcome::Unchanged;
        };

        let line_count = view.line_count();
        let visible_height = view.viewport_height().max(1);
        let mut offset = (line - 1).saturating_sub(visible_height / 2);
        if line_count > visible_height {
            offset = offset.min(line_count - visible_height);
        } else {
            offset = 0;
        }

        view.scroll_to(offset);
        MarkerOutcome::Applied
    }

    /// `Some(OutOfRange)` when the view is loaded and `line` is not in it
    fn check_range(&self, line: usize) -> Option<MarkerOutcome> {
        let line_count = self.view.as_ref()?.line_count();
        if line == 0 || line > line_count {
            tracing::warn!(line, line_count, "line out of range; ignoring marker command");
            return Some(MarkerOutcome::OutOfRange { line, line_count });
        }
        None
    }
}

//! Capability interface to the read-only source view

use std::collections::{BTreeMap, BTreeSet};

/// What a gutter marker shows; an image path, a symbol, or anything else
/// the view knows how to draw
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Glyph(pub String);

impl Glyph {
    pub fn new(source: impl Into<String>) -> Self {
        Glyph(source.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Line-oriented operations the overlay needs from a text view.
///
/// Lines are 1-based everywhere except [`SourceView::scroll_to`], which takes
/// the 0-based index of the first visible line like a scroll offset.
pub trait SourceView {
    fn line_count(&self) -> usize;

    /// Place (`Some`) or remove (`None`) the breakpoint marker of a line.
    fn set_gutter_marker(&mut self, line: usize, glyph: Option<&Glyph>);

    fn set_line_highlight(&mut self, line: usize, highlighted: bool);

    /// Number of lines visible at once
    fn viewport_height(&self) -> usize;

    fn scroll_to(&mut self, offset: usize);

    fn replace_text(&mut self, text: &str);
}

/// View with no rendering at all, for hosts without a display and tests
#[derive(Debug, Clone, Default)]
pub struct MemorySourceView {
    lines: Vec<String>,
    markers: BTreeMap<usize, Glyph>,
    highlighted: BTreeSet<usize>,
    height: usize,
    offset: usize,
}

impl MemorySourceView {
    pub fn new(text: &str, height: usize) -> Self {
        MemorySourceView {
            lines: text.lines().map(str::to_string).collect(),
            height,
            ..Self::default()
        }
    }

    pub fn marker(&self, line: usize) -> Option<&Glyph> {
        self.markers.get(&line)
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn highlighted(&self) -> impl Iterator<Item = usize> + '_ {
        self.highlighted.iter().copied()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn line(&self, line: usize) -> Option<&str> {
        line.checked_sub(1)
            .and_then(|index| self.lines.get(index))
            .map(String::as_str)
    }
}

impl SourceView for MemorySourceView {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn set_gutter_marker(&mut self, line: usize, glyph: Option<&Glyph>) {
        match glyph {
            Some(glyph) => {
                self.markers.insert(line, glyph.clone());
            }
            None => {
                self.markers.remove(&line);
            }
        }
    }

    fn set_line_highlight(&mut self, line: usize, highlighted: bool) {
        if highlighted {
            self.highlighted.insert(line);
        } else {
            self.highlighted.remove(&line);
        }
    }

    fn viewport_height(&self) -> usize {
        self.height
    }

    fn scroll_to(&mut self, offset: usize) {
        self.offset = offset;
    }

    fn replace_text(&mut self, text: &str) {
        self.lines = text.lines().map(str::to_string).collect();
        self.markers.clear();
        self.highlighted.clear();
        self.offset = 0;
    }
}

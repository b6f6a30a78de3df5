//! [`SourceView`] backed by the source pane
//!
//! Holds the document and everything the overlay places on it. The source
//! pane reads it when drawing and reports its height back, so centering uses
//! the height of the last frame drawn.

use crate::overlay::{Glyph, SourceView};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default)]
pub struct TerminalSourceView {
    lines: Vec<String>,
    markers: BTreeMap<usize, Glyph>,
    highlighted: BTreeSet<usize>,
    height: usize,
    offset: usize,
    /// 1-based line the keyboard cursor is on
    cursor: usize,
}

impl TerminalSourceView {
    pub fn new(text: &str) -> Self {
        let mut view = Self::default();
        view.replace_text(text);
        view
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn marker(&self, line: usize) -> Option<&Glyph> {
        self.markers.get(&line)
    }

    pub fn is_highlighted(&self, line: usize) -> bool {
        self.highlighted.contains(&line)
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Record the number of text rows the pane drew last frame.
    ///
    /// Leaves the scroll offset alone; only cursor moves scroll to follow it.
    pub fn set_viewport_height(&mut self, height: usize) {
        self.height = height;
    }

    pub fn move_cursor_to(&mut self, line: usize) {
        if self.lines.is_empty() {
            return;
        }
        self.cursor = line.clamp(1, self.lines.len());
        self.keep_cursor_visible();
    }

    pub fn cursor_up(&mut self) {
        self.move_cursor_to(self.cursor.saturating_sub(1));
    }

    pub fn cursor_down(&mut self) {
        self.move_cursor_to(self.cursor + 1);
    }

    /// 0-based view row of a pane row, if it shows a line
    pub fn row_to_view_row(&self, pane_row: usize) -> Option<usize> {
        let row = self.offset + pane_row;
        (row < self.lines.len()).then_some(row)
    }

    fn keep_cursor_visible(&mut self) {
        if self.height == 0 || self.cursor == 0 {
            return;
        }
        let index = self.cursor - 1;
        if index < self.offset {
            self.offset = index;
        } else if index >= self.offset + self.height {
            self.offset = index + 1 - self.height;
        }
    }
}

impl SourceView for TerminalSourceView {
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
        self.cursor = usize::from(!self.lines.is_empty());
    }
}

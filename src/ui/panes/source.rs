//! Source pane: syntax highlighting, gutter markers and the current line
//!
//! Everything shown comes from a [`TerminalSourceView`]; the pane only
//! decides how it looks. The gutter is `GUTTER_WIDTH` columns wide and holds
//! the marker glyph followed by the line number.

use crate::ui::source_view::TerminalSourceView;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Marker glyph, space, 4-digit line number, space
pub const GUTTER_WIDTH: u16 = 7;

/// Simple syntax highlighting for Java-like source
fn highlight_source_code(line: &str) -> Line<'_> {
    let mut spans = Vec::new();
    let mut current_word = String::new();

    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut i = 0;

    while i < chars.len() {
        let (byte, c) = chars[i];

        // Line comment
        if c == '/' && chars.get(i + 1).is_some_and(|(_, next)| *next == '/') {
            if !current_word.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_word)));
            }
            spans.push(Span::styled(
                &line[byte..],
                Style::default().fg(DEFAULT_THEME.comment),
            ));
            break;
        }

        // String or char literal
        if c == '"' || c == '\'' {
            if !current_word.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_word)));
            }
            let mut end = i + 1;
            while end < chars.len() && chars[end].1 != c {
                end += if chars[end].1 == '\\' { 2 } else { 1 };
            }
            end = (end + 1).min(chars.len());
            let end_byte = chars.get(end).map_or(line.len(), |(b, _)| *b);
            spans.push(Span::styled(
                &line[byte..end_byte],
                Style::default().fg(DEFAULT_THEME.string),
            ));
            i = end;
            continue;
        }

        if !c.is_alphanumeric() && c != '_' {
            if !current_word.is_empty() {
                let style = keyword_style(&current_word, c == '(');
                spans.push(Span::styled(std::mem::take(&mut current_word), style));
            }

            let style = match c {
                '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.primary),
                _ => Style::default().fg(DEFAULT_THEME.fg),
            };
            spans.push(Span::styled(c.to_string(), style));
            i += 1;
            continue;
        }

        current_word.push(c);
        i += 1;
    }

    if !current_word.is_empty() {
        let style = keyword_style(&current_word, false);
        spans.push(Span::styled(current_word, style));
    }

    Line::from(spans)
}

fn keyword_style(word: &str, is_call: bool) -> Style {
    match word {
        "int" | "char" | "void" | "boolean" | "byte" | "float" | "double" | "long" | "short"
        | "String" => Style::default().fg(DEFAULT_THEME.type_name),
        "class" | "interface" | "enum" | "extends" | "implements" | "new" | "return" | "if"
        | "else" | "while" | "for" | "do" | "switch" | "case" | "default" | "break"
        | "continue" | "public" | "private" | "protected" | "static" | "final" | "this"
        | "throw" | "throws" | "try" | "catch" | "finally" | "import" | "package" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        "null" | "true" | "false" => Style::default().fg(DEFAULT_THEME.number),
        _ if word.chars().all(|c| c.is_ascii_digit()) => Style::default().fg(DEFAULT_THEME.number),
        _ if is_call => Style::default().fg(DEFAULT_THEME.function),
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Render the source pane
///
/// Records the drawn height on the view so the overlay can center lines.
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    view: &mut TerminalSourceView,
    current_line_glyph: &str,
    is_focused: bool,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Source ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    view.set_viewport_height(visible_height);

    let visible_lines: Vec<Line> = view
        .lines()
        .iter()
        .enumerate()
        .skip(view.offset())
        .take(visible_height)
        .map(|(idx, text)| {
            let line = idx + 1;
            let is_current = view.is_highlighted(line);
            let is_cursor = is_focused && view.cursor() == line;

            let marker = match view.marker(line) {
                Some(glyph) => Span::styled(
                    glyph.as_str().to_string(),
                    Style::default().fg(DEFAULT_THEME.breakpoint),
                ),
                None if is_current => Span::styled(
                    current_line_glyph.to_string(),
                    Style::default().fg(DEFAULT_THEME.secondary),
                ),
                None => Span::raw(" "),
            };

            let number_style = if is_current {
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };

            let mut content = highlight_source_code(text);
            let background = if is_current {
                Some(DEFAULT_THEME.current_line_bg)
            } else if is_cursor {
                Some(DEFAULT_THEME.cursor_line_bg)
            } else {
                None
            };
            if let Some(bg) = background {
                for span in &mut content.spans {
                    span.style = span.style.bg(bg);
                }
            }

            let mut spans = vec![marker, Span::styled(format!(" {:4} ", line), number_style)];
            spans.extend(content.spans);
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_highlighting_keeps_text() {
        let source = r#"Foo f = new Foo("a\"b"); // done"#;
        assert_eq!(text_of(&highlight_source_code(source)), source);
    }

    #[test]
    fn test_keywords_and_calls() {
        let line = highlight_source_code("return bar(1);");
        assert_eq!(line.spans[0].content, "return");
        assert!(line.spans[0].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(line.spans[2].content, "bar");
        assert_eq!(line.spans[2].style.fg, Some(DEFAULT_THEME.function));
    }
}

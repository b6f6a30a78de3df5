//! Row formatting shared by the stack and heap panes

use crate::render::{CellRef, NodeHeader, Scene, SceneNode, SceneValue};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::ListItem,
};

/// Arrow drawn in a value cell that holds a connector
pub const CONNECTOR_ARROW: &str = "●─▶ ";

/// Scroll state for a list pane
#[derive(Debug, Default)]
pub struct ListScrollState {
    pub offset: usize,
    pub prev_item_count: usize,
}

impl ListScrollState {
    /// Clamp the offset so the last page stays full.
    pub(crate) fn clamp(&mut self, item_count: usize, visible_height: usize) {
        let max_scroll = item_count.saturating_sub(visible_height);
        self.offset = self.offset.min(max_scroll);
        self.prev_item_count = item_count;
    }
}

pub(crate) fn header_label(header: &NodeHeader) -> String {
    match &header.subtitle {
        Some(subtitle) => format!("{} {}", header.title, subtitle),
        None => header.title.clone(),
    }
}

/// Value cell text; connector cells name their target or show `?`
pub(crate) fn value_span(scene: &Scene, origin: CellRef, value: &SceneValue) -> Span<'static> {
    match value {
        SceneValue::Text(text) => Span::styled(text.clone(), Style::default().fg(DEFAULT_THEME.number)),
        SceneValue::Connector => match scene.connector_from(origin).and_then(|target| scene.node(target)) {
            Some(target) => Span::styled(
                format!("{}{}", CONNECTOR_ARROW, header_label(&target.header)),
                Style::default().fg(DEFAULT_THEME.connector),
            ),
            None => Span::styled(
                format!("{}?", CONNECTOR_ARROW),
                Style::default()
                    .fg(DEFAULT_THEME.error)
                    .add_modifier(Modifier::ITALIC),
            ),
        },
    }
}

/// Rows of `node` as list items, type names right-aligned
pub(crate) fn render_rows<'a>(scene: &Scene, node: &'a SceneNode, content_width: usize) -> Vec<ListItem<'a>> {
    node.rows
        .iter()
        .enumerate()
        .map(|(row, cells)| {
            let value = value_span(scene, CellRef { node: node.id, row }, &cells.value);
            let left_width = cells.name.chars().count() + 5;
            let padding = content_width.saturating_sub(left_width + value.width() + cells.ty.chars().count());

            ListItem::new(Line::from(vec![
                Span::styled(format!("  {}", cells.name), Style::default().fg(DEFAULT_THEME.fg)),
                Span::styled(" = ", Style::default().fg(DEFAULT_THEME.comment)),
                value,
                Span::raw(" ".repeat(padding.max(1))),
                Span::styled(cells.ty.as_str(), Style::default().fg(DEFAULT_THEME.type_name)),
            ]))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Canvas, Container, RowCells, ValueCell};

    #[test]
    fn test_connector_cells_name_their_target() {
        let mut scene = Scene::new();
        let frame = scene.create_node(Container::Stack, 0, &NodeHeader::new("main")).unwrap();
        let object = scene
            .create_node(Container::Heap, 0, &NodeHeader::new("Foo").with_subtitle("(id=1)"))
            .unwrap();
        for (row, name) in ["f", "g"].into_iter().enumerate() {
            let cells = RowCells {
                ty: "Foo",
                name,
                value: ValueCell::Connector,
            };
            scene.set_row(frame, row, cells).unwrap();
        }
        scene.connect(CellRef { node: frame, row: 0 }, object).unwrap();

        let linked = value_span(&scene, CellRef { node: frame, row: 0 }, &SceneValue::Connector);
        let dangling = value_span(&scene, CellRef { node: frame, row: 1 }, &SceneValue::Connector);
        assert_eq!(linked.content, "●─▶ Foo (id=1)");
        assert_eq!(dangling.content, "●─▶ ?");

        let node = scene.node(frame).unwrap();
        assert_eq!(render_rows(&scene, node, 40).len(), 2);
    }

    #[test]
    fn test_scroll_clamps_to_last_page() {
        let mut state = ListScrollState {
            offset: 50,
            prev_item_count: 0,
        };
        state.clamp(20, 8);
        assert_eq!(state.offset, 12);
        assert_eq!(state.prev_item_count, 20);
    }
}

//! Heap pane: one block per object node in first-reference order

use super::utils::{render_rows, ListScrollState};
use crate::render::{Container, Scene};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render the heap pane
pub fn render_heap_pane(
    frame: &mut Frame,
    area: Rect,
    scene: &Scene,
    is_focused: bool,
    scroll_state: &mut ListScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let content_width = area.width.saturating_sub(2) as usize;
    let mut all_items = Vec::new();
    let mut objects = 0;

    for node in scene.nodes_in(Container::Heap) {
        objects += 1;
        let mut header = vec![
            Span::styled("◆ ", Style::default().fg(DEFAULT_THEME.connector)),
            Span::styled(
                node.header.title.clone(),
                Style::default()
                    .fg(DEFAULT_THEME.type_name)
                    .add_modifier(Modifier::BOLD),
            ),
        ];
        if let Some(subtitle) = &node.header.subtitle {
            header.push(Span::styled(
                format!(" {}", subtitle),
                Style::default().fg(DEFAULT_THEME.comment),
            ));
        }
        all_items.push(ListItem::new(Line::from(header)));
        all_items.extend(render_rows(scene, node, content_width));
    }

    if all_items.is_empty() {
        all_items.push(
            ListItem::new("(no objects)").style(Style::default().fg(DEFAULT_THEME.comment)),
        );
    }

    let block = Block::default()
        .title(format!(" Heap ({}) ", objects))
        .borders(Borders::ALL)
        .border_style(border_style);

    let visible_height = area.height.saturating_sub(2) as usize;
    scroll_state.clamp(all_items.len(), visible_height);

    let items: Vec<ListItem> = all_items.into_iter().skip(scroll_state.offset).collect();
    frame.render_widget(List::new(items).block(block), area);
}

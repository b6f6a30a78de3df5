//! Stack pane: one block per frame node, outermost first

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

/// Render the stack pane
pub fn render_stack_pane(
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

    let block = Block::default()
        .title(" Call Stack ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let content_width = area.width.saturating_sub(2) as usize;
    let mut all_items = Vec::new();

    for (depth, node) in scene.nodes_in(Container::Stack).enumerate() {
        all_items.push(ListItem::new(Line::from(vec![
            Span::styled("▸ ", Style::default().fg(DEFAULT_THEME.secondary)),
            Span::styled(
                format!("Frame {} ", depth),
                Style::default().fg(DEFAULT_THEME.comment),
            ),
            Span::styled("│ ", Style::default().fg(DEFAULT_THEME.comment)),
            Span::styled(
                format!("{}()", node.header.title),
                Style::default()
                    .fg(DEFAULT_THEME.function)
                    .add_modifier(Modifier::BOLD),
            ),
        ])));

        if node.rows.is_empty() {
            all_items.push(
                ListItem::new("  (no locals)").style(Style::default().fg(DEFAULT_THEME.comment)),
            );
        }
        all_items.extend(render_rows(scene, node, content_width));
    }

    if all_items.is_empty() {
        all_items.push(ListItem::new("(empty)").style(Style::default().fg(DEFAULT_THEME.comment)));
    }

    // Follow new frames as they are pushed
    let visible_height = area.height.saturating_sub(2) as usize;
    if all_items.len() > scroll_state.prev_item_count {
        scroll_state.offset = usize::MAX;
    }
    scroll_state.clamp(all_items.len(), visible_height);

    let items: Vec<ListItem> = all_items.into_iter().skip(scroll_state.offset).collect();
    frame.render_widget(List::new(items).block(block), area);
}

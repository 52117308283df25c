use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;

use super::{Component, ACCENT, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::state::AppState;

/// Pagination readout, key hints and the current notice. Render-only.
pub struct StatusFooter;

pub struct StatusFooterProps<'a> {
    pub state: &'a AppState,
}

impl Component<Action> for StatusFooter {
    type Props<'a> = StatusFooterProps<'a>;

    fn handle_event(
        &mut self,
        _event: &EventKind,
        _props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;

        let arrow = |enabled: bool| {
            if enabled {
                Style::default().fg(TEXT_MAIN)
            } else {
                // Disabled boundary: navigation there is a no-op.
                Style::default().fg(TEXT_DIM).add_modifier(Modifier::DIM)
            }
        };

        let page_line = Line::from(vec![
            Span::styled("< ", arrow(state.can_page_prev())),
            Span::styled(
                format!("Page {} / {}", state.current_page, state.total_pages()),
                Style::default().fg(TEXT_MAIN),
            ),
            Span::styled(" >", arrow(state.can_page_next())),
            Span::styled(
                format!(
                    "   {} shown / {} loaded",
                    state.working_set.len(),
                    state.catalog.len()
                ),
                Style::default().fg(TEXT_DIM),
            ),
        ]);

        let second_line = match &state.message {
            Some(message) => Line::from(Span::styled(
                message.clone(),
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            )),
            None => Line::from(Span::styled(
                "up/down select  left/right page  enter detail  / search  [] type  g gen  s sort  c clear  r reload  q quit",
                Style::default().fg(TEXT_DIM),
            )),
        };

        let footer = Paragraph::new(vec![page_line, second_line]).block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(TEXT_DIM))
                .style(Style::default().bg(BG_PANEL)),
        );
        frame.render_widget(footer, area);
    }
}

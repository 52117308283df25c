use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;

use super::{spinner_frame, Component, ACCENT, ACCENT_ALT, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::state::AppState;

/// Title bar plus the filter/search/sort readout. Acts as the search prompt
/// while search mode is active.
pub struct FilterHeader;

pub struct FilterHeaderProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

impl Component<Action> for FilterHeader {
    type Props<'a> = FilterHeaderProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused || !props.state.search_active {
            return Vec::new();
        }

        let EventKind::Key(key) = event else {
            return Vec::new();
        };
        match key.code {
            KeyCode::Esc => vec![Action::SearchCancel],
            KeyCode::Enter => vec![Action::SearchSubmit],
            KeyCode::Backspace => vec![Action::SearchBackspace],
            KeyCode::Char(ch) => vec![Action::SearchInput(ch)],
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;

        let mut title_spans = vec![Span::styled(
            " POKETABLE ",
            Style::default()
                .fg(ACCENT)
                .add_modifier(Modifier::BOLD),
        )];
        if state.any_loading() {
            title_spans.push(Span::styled(
                format!(" {} ", spinner_frame(state.tick)),
                Style::default().fg(ACCENT_ALT),
            ));
        }

        let label = Style::default().fg(TEXT_DIM);
        let value = Style::default().fg(TEXT_MAIN);
        let active = Style::default().fg(ACCENT_ALT).add_modifier(Modifier::BOLD);

        let mut status = vec![Span::styled("search ", label)];
        if state.search_active {
            status.push(Span::styled(format!("{}\u{2588}", state.filters.query), active));
        } else if state.filters.query.is_empty() {
            status.push(Span::styled("-", value));
        } else {
            status.push(Span::styled(state.filters.query.clone(), value));
        }
        status.push(Span::styled("  type ", label));
        status.push(Span::styled(
            state.filters.type_tag.clone().unwrap_or_else(|| "all".to_string()),
            if state.filters.type_tag.is_some() { active } else { value },
        ));
        status.push(Span::styled("  gen ", label));
        status.push(Span::styled(
            state
                .filters
                .generation
                .map(|id| id.to_string())
                .unwrap_or_else(|| "all".to_string()),
            if state.filters.generation.is_some() { active } else { value },
        ));
        status.push(Span::styled("  sort ", label));
        status.push(Span::styled(
            state
                .filters
                .sort
                .map(|sort| format!("{} desc", sort.label()))
                .unwrap_or_else(|| "none".to_string()),
            if state.filters.sort.is_some() { active } else { value },
        ));

        let header = Paragraph::new(vec![Line::from(title_spans), Line::from(status)]).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(TEXT_DIM))
                .style(Style::default().bg(BG_PANEL)),
        );
        frame.render_widget(header, area);
    }
}

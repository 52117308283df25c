use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use tui_dispatch::EventKind;

use super::{capitalize, spinner_frame, type_color, Component, ACCENT, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::state::AppState;

/// The paginated catalog table. Owns list navigation and the filter hotkeys.
pub struct CatalogTable {
    table_state: TableState,
}

pub struct CatalogTableProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

impl Default for CatalogTable {
    fn default() -> Self {
        Self {
            table_state: TableState::default(),
        }
    }
}

impl CatalogTable {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component<Action> for CatalogTable {
    type Props<'a> = CatalogTableProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Up | KeyCode::Char('k') => vec![Action::SelectionMove(-1)],
                KeyCode::Down | KeyCode::Char('j') => vec![Action::SelectionMove(1)],
                KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => vec![Action::PagePrev],
                KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown => vec![Action::PageNext],
                KeyCode::Enter => vec![Action::DetailOpen],
                KeyCode::Char('/') => vec![Action::SearchStart],
                KeyCode::Char('[') => vec![Action::TypeFilterPrev],
                KeyCode::Char(']') => vec![Action::TypeFilterNext],
                KeyCode::Char('g') => vec![Action::GenerationNext],
                KeyCode::Char('G') => vec![Action::GenerationPrev],
                KeyCode::Char('s') => vec![Action::SortCycle],
                KeyCode::Char('c') => vec![Action::FiltersReset],
                KeyCode::Char('r') => vec![Action::CatalogFetch],
                _ => Vec::new(),
            },
            EventKind::Scroll { delta, .. } => vec![Action::SelectionMove(*delta as i16)],
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let border_color = if props.is_focused { ACCENT } else { TEXT_DIM };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .style(Style::default().bg(BG_PANEL))
            .title(" Catalog ");

        if state.catalog.is_empty() {
            let text = if state.catalog_loading {
                format!("{} loading catalog...", spinner_frame(state.tick))
            } else {
                "No entries loaded. Press r to reload.".to_string()
            };
            let empty = Paragraph::new(text)
                .style(Style::default().fg(TEXT_DIM))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        if state.working_set.is_empty() {
            let empty = Paragraph::new("No entries match the current filter.")
                .style(Style::default().fg(TEXT_DIM))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let header = Row::new(["#", "NAME", "TYPE", "HP", "ATK", "DEF"])
            .style(
                Style::default()
                    .fg(TEXT_DIM)
                    .add_modifier(Modifier::BOLD),
            )
            .bottom_margin(1);

        let rows: Vec<Row> = state
            .page_entries()
            .map(|entry| {
                let types: Vec<Span> = entry
                    .types
                    .iter()
                    .flat_map(|tag| {
                        [
                            Span::styled(tag.clone(), Style::default().fg(type_color(tag))),
                            Span::raw(" "),
                        ]
                    })
                    .collect();
                Row::new(vec![
                    Cell::from(format!("#{:03}", entry.id))
                        .style(Style::default().fg(TEXT_DIM)),
                    Cell::from(capitalize(&entry.name))
                        .style(Style::default().fg(TEXT_MAIN)),
                    Cell::from(Line::from(types)),
                    Cell::from(entry.hp.to_string()),
                    Cell::from(entry.attack.to_string()),
                    Cell::from(entry.defense.to_string()),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(5),
            Constraint::Min(14),
            Constraint::Length(16),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(4),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .style(Style::default().fg(TEXT_MAIN))
            .row_highlight_style(
                Style::default()
                    .bg(ACCENT)
                    .fg(BG_PANEL)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        self.table_state.select(Some(state.selected_row.min(
            state.page_len().saturating_sub(1),
        )));
        frame.render_stateful_widget(table, area, &mut self.table_state);
    }
}

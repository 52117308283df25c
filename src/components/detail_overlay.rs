use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    centered_rect, BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding,
};

use super::{capitalize, spinner_frame, type_color, Component, ACCENT_ALT, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::state::AppState;

/// Stat bars scale against this ceiling, as in the source material.
const STAT_BAR_MAX: u16 = 200;
const STAT_BAR_WIDTH: u16 = 20;

/// Modal overlay for one full detail record.
pub struct DetailOverlay {
    modal: Modal,
}

pub struct DetailOverlayProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

impl Default for DetailOverlay {
    fn default() -> Self {
        Self {
            modal: Modal::new(),
        }
    }
}

impl DetailOverlay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component<Action> for DetailOverlay {
    type Props<'a> = DetailOverlayProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        let EventKind::Key(key) = event else {
            return Vec::new();
        };
        match key.code {
            KeyCode::Esc | KeyCode::Enter => vec![Action::DetailClose],
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        if !state.detail_open {
            return;
        }

        let lines = detail_lines(state);
        let modal_area = centered_rect(56, 22, area);
        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            frame.render_widget(Paragraph::new(lines.clone()), content_area);
        };

        self.modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: modal_area,
                style: ModalStyle {
                    base: BaseStyle {
                        bg: Some(ratatui::style::Color::Rgb(30, 38, 52)),
                        padding: Padding::all(1),
                        border: None,
                        fg: None,
                    },
                    ..Default::default()
                },
                behavior: ModalBehavior::default(),
                on_close: || Action::DetailClose,
                render_content: &mut render_content,
            },
        );
    }
}

fn detail_lines(state: &AppState) -> Vec<Line<'static>> {
    let Some(detail) = &state.detail else {
        let text = if state.detail_loading {
            format!("{} loading...", spinner_frame(state.tick))
        } else {
            "No detail loaded.".to_string()
        };
        return vec![Line::from(Span::styled(text, Style::default().fg(TEXT_DIM)))];
    };

    let mut lines = Vec::new();
    let mut title = vec![Span::styled(
        format!("#{} {}", detail.id, capitalize(&detail.name)),
        Style::default()
            .fg(TEXT_MAIN)
            .add_modifier(Modifier::BOLD),
    )];
    if state.detail_loading {
        title.push(Span::styled(
            format!("  {}", spinner_frame(state.tick)),
            Style::default().fg(ACCENT_ALT),
        ));
    }
    lines.push(Line::from(title));
    lines.push(Line::default());

    let mut types = vec![Span::styled("types      ", Style::default().fg(TEXT_DIM))];
    for tag in &detail.types {
        types.push(Span::styled(
            tag.clone(),
            Style::default().fg(type_color(tag)),
        ));
        types.push(Span::raw(" "));
    }
    lines.push(Line::from(types));

    lines.push(labeled("height", format_height(detail.height)));
    lines.push(labeled("weight", format_weight(detail.weight)));
    lines.push(labeled(
        "abilities",
        detail
            .abilities
            .iter()
            .map(|name| name.replace('-', " "))
            .collect::<Vec<_>>()
            .join(", "),
    ));
    if let Some(sprite) = &detail.sprite {
        lines.push(labeled("sprite", sprite.clone()));
    }

    lines.push(Line::default());
    for stat in &detail.stats {
        lines.push(stat_line(&stat.name, stat.value));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "esc close",
        Style::default().fg(TEXT_DIM),
    )));
    lines
}

fn labeled(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<11}"), Style::default().fg(TEXT_DIM)),
        Span::styled(value, Style::default().fg(TEXT_MAIN)),
    ])
}

fn stat_line(name: &str, value: u16) -> Line<'static> {
    let filled = (u32::from(value.min(STAT_BAR_MAX)) * u32::from(STAT_BAR_WIDTH)
        / u32::from(STAT_BAR_MAX)) as usize;
    let bar: String = "\u{2588}".repeat(filled);
    let rest: String = "\u{2591}".repeat(STAT_BAR_WIDTH as usize - filled);
    Line::from(vec![
        Span::styled(
            format!("{:<16}", name.replace('-', " ")),
            Style::default().fg(TEXT_DIM),
        ),
        Span::styled(bar, Style::default().fg(ACCENT_ALT)),
        Span::styled(rest, Style::default().fg(TEXT_DIM)),
        Span::styled(format!(" {value:>3}"), Style::default().fg(TEXT_MAIN)),
    ])
}

/// Decimetres to metres, matching the source presentation.
fn format_height(height: u16) -> String {
    format!("{:.1} m", f64::from(height) / 10.0)
}

/// Hectograms to kilograms.
fn format_weight(weight: u16) -> String {
    format!("{:.1} kg", f64::from(weight) / 10.0)
}

pub mod catalog_table;
pub mod detail_overlay;
pub mod filter_header;
pub mod status_footer;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use catalog_table::{CatalogTable, CatalogTableProps};
pub use detail_overlay::{DetailOverlay, DetailOverlayProps};
pub use filter_header::{FilterHeader, FilterHeaderProps};
pub use status_footer::{StatusFooter, StatusFooterProps};

use ratatui::style::Color;

pub(crate) const BG_PANEL: Color = Color::Rgb(22, 30, 42);
pub(crate) const TEXT_MAIN: Color = Color::Rgb(230, 238, 242);
pub(crate) const TEXT_DIM: Color = Color::Rgb(150, 166, 180);
pub(crate) const ACCENT: Color = Color::Rgb(240, 92, 108);
pub(crate) const ACCENT_ALT: Color = Color::Rgb(255, 203, 64);

const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

pub(crate) fn spinner_frame(tick: u64) -> &'static str {
    SPINNER_FRAMES[(tick % SPINNER_FRAMES.len() as u64) as usize]
}

/// Badge color per type tag.
pub(crate) fn type_color(tag: &str) -> Color {
    match tag {
        "normal" => Color::Rgb(168, 168, 120),
        "fire" => Color::Rgb(240, 128, 48),
        "water" => Color::Rgb(104, 144, 240),
        "electric" => Color::Rgb(248, 208, 48),
        "grass" => Color::Rgb(120, 200, 80),
        "ice" => Color::Rgb(152, 216, 216),
        "fighting" => Color::Rgb(192, 48, 40),
        "poison" => Color::Rgb(160, 64, 160),
        "ground" => Color::Rgb(224, 192, 104),
        "flying" => Color::Rgb(168, 144, 240),
        "psychic" => Color::Rgb(248, 88, 136),
        "bug" => Color::Rgb(168, 184, 32),
        "rock" => Color::Rgb(184, 160, 56),
        "ghost" => Color::Rgb(112, 88, 152),
        "dragon" => Color::Rgb(112, 56, 248),
        "dark" => Color::Rgb(112, 88, 72),
        "steel" => Color::Rgb(184, 184, 208),
        "fairy" => Color::Rgb(238, 153, 172),
        _ => Color::Rgb(168, 168, 120),
    }
}

pub(crate) fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

//! Application state - single source of truth

use std::collections::{HashMap, HashSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Entries shown per catalog page.
pub const PAGE_SIZE: usize = 10;

/// How many entries the startup load requests from the name index.
pub const CATALOG_LIMIT: usize = 151;

/// The fixed type enumeration used for filter cycling and badge colors.
pub const TYPE_TAGS: [&str; 18] = [
    "normal", "fire", "water", "electric", "grass", "ice", "fighting", "poison", "ground",
    "flying", "psychic", "bug", "rock", "ghost", "dragon", "dark", "steel", "fairy",
];

/// Generations available in the generation filter (1-based ids).
pub const GENERATION_COUNT: u8 = 9;

/// One lightweight catalog record, projected from a full detail document at
/// load time. Immutable for the lifetime of the session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogEntry {
    pub id: u16,
    pub name: String,
    pub types: Vec<String>,
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub sprite: Option<String>,
    pub url: String,
}

/// A named base-stat value from the full stat list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StatValue {
    pub name: String,
    pub value: u16,
}

/// Full per-item record, fetched on demand when an entry is inspected.
/// Never cached: reopening the same entry re-fetches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DetailRecord {
    pub id: u16,
    pub name: String,
    pub types: Vec<String>,
    pub stats: Vec<StatValue>,
    pub abilities: Vec<String>,
    pub height: u16,
    pub weight: u16,
    pub sprite: Option<String>,
}

/// Descending sort applied to the working set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum SortKey {
    Hp,
    Attack,
    Defense,
}

impl SortKey {
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Hp => "hp",
            SortKey::Attack => "attack",
            SortKey::Defense => "defense",
        }
    }

    pub fn stat_of(&self, entry: &CatalogEntry) -> u16 {
        match self {
            SortKey::Hp => entry.hp,
            SortKey::Attack => entry.attack,
            SortKey::Defense => entry.defense,
        }
    }
}

/// Current search/filter/sort selections. The filter dimensions are mutually
/// exclusive: setting one clears the others (last filter wins). Sort is
/// orthogonal and combines with whichever filter is active.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FilterState {
    pub query: String,
    pub type_tag: Option<String>,
    pub generation: Option<u8>,
    pub sort: Option<SortKey>,
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    /// Full in-memory catalog, loaded once at startup.
    #[debug(skip)]
    pub catalog: Vec<CatalogEntry>,

    /// Indices into `catalog` after filter + sort. Recomputed wholesale on
    /// every filter change, never mutated in place.
    #[debug(skip)]
    pub working_set: Vec<usize>,

    /// Current page, 1-based. Invariant: 1 <= current_page <= total_pages().
    #[debug(section = "Page", label = "Current")]
    pub current_page: usize,

    /// Selected row within the current page slice.
    #[debug(section = "Page", label = "Row")]
    pub selected_row: usize,

    #[debug(section = "Filters", label = "State", debug_fmt)]
    pub filters: FilterState,

    /// Whether the search prompt is capturing keystrokes.
    #[debug(section = "Filters", label = "Search active")]
    pub search_active: bool,

    /// Membership set for the currently applied generation filter.
    #[debug(skip)]
    pub generation_members: HashSet<String>,

    /// Session cache of resolved generation memberships.
    #[debug(skip)]
    pub generation_cache: HashMap<u8, HashSet<String>>,

    /// Contents of the detail overlay. Survives failed re-fetches.
    #[debug(skip)]
    pub detail: Option<DetailRecord>,

    #[debug(section = "Detail", label = "Open")]
    pub detail_open: bool,

    #[debug(section = "Status", label = "Catalog loading")]
    pub catalog_loading: bool,

    #[debug(section = "Status", label = "Filter loading")]
    pub filter_loading: bool,

    #[debug(section = "Status", label = "Detail loading")]
    pub detail_loading: bool,

    /// Transient user-visible notice, rendered in the footer.
    #[debug(section = "Status", label = "Message", debug_fmt)]
    pub message: Option<String>,

    #[debug(skip)]
    pub tick: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            catalog: Vec::new(),
            working_set: Vec::new(),
            current_page: 1,
            selected_row: 0,
            filters: FilterState::default(),
            search_active: false,
            generation_members: HashSet::new(),
            generation_cache: HashMap::new(),
            detail: None,
            detail_open: false,
            catalog_loading: false,
            filter_loading: false,
            detail_loading: false,
            message: None,
            tick: 0,
        }
    }
}

impl AppState {
    /// Recompute the working set from the catalog and the current filters.
    ///
    /// Filter precedence: generation, else type tag, else search text, else
    /// the full catalog. The sort key then applies as a stable descending
    /// sort, so ties keep source order.
    pub fn rebuild_working_set(&mut self) {
        let query = self.filters.query.trim().to_lowercase();
        let mut indices: Vec<usize> = self
            .catalog
            .iter()
            .enumerate()
            .filter(|(_, entry)| {
                if self.filters.generation.is_some() {
                    self.generation_members.contains(&entry.name)
                } else if let Some(tag) = &self.filters.type_tag {
                    entry.types.iter().any(|t| t == tag)
                } else if !query.is_empty() {
                    entry.name.to_lowercase().contains(&query)
                } else {
                    true
                }
            })
            .map(|(idx, _)| idx)
            .collect();

        if let Some(sort) = self.filters.sort {
            indices.sort_by(|&a, &b| {
                sort.stat_of(&self.catalog[b])
                    .cmp(&sort.stat_of(&self.catalog[a]))
            });
        }

        self.working_set = indices;
    }

    pub fn total_pages(&self) -> usize {
        total_pages_for(self.working_set.len())
    }

    /// The working-set indices visible on the current page.
    pub fn page_indices(&self) -> &[usize] {
        let (start, end) = page_bounds(self.working_set.len(), self.current_page);
        &self.working_set[start..end]
    }

    pub fn page_len(&self) -> usize {
        self.page_indices().len()
    }

    pub fn page_entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.page_indices().iter().map(|&idx| &self.catalog[idx])
    }

    pub fn selected_entry(&self) -> Option<&CatalogEntry> {
        self.page_indices()
            .get(self.selected_row)
            .map(|&idx| &self.catalog[idx])
    }

    pub fn can_page_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn can_page_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn any_loading(&self) -> bool {
        self.catalog_loading || self.filter_loading || self.detail_loading
    }
}

/// Total page count for a working set of `len` entries, never below 1.
pub fn total_pages_for(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE).max(1)
}

/// Half-open slice bounds for a 1-based page, clamped to `len`. An
/// out-of-range page yields an empty slice rather than an error.
pub fn page_bounds(len: usize, page: usize) -> (usize, usize) {
    let start = page.saturating_sub(1).saturating_mul(PAGE_SIZE).min(len);
    let end = start.saturating_add(PAGE_SIZE).min(len);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u16, name: &str) -> CatalogEntry {
        CatalogEntry {
            id,
            name: name.to_string(),
            types: vec!["normal".to_string()],
            hp: 50,
            attack: 50,
            defense: 50,
            sprite: None,
            url: format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
        }
    }

    #[test]
    fn test_total_pages_never_below_one() {
        assert_eq!(total_pages_for(0), 1);
        assert_eq!(total_pages_for(1), 1);
        assert_eq!(total_pages_for(10), 1);
        assert_eq!(total_pages_for(11), 2);
        assert_eq!(total_pages_for(151), 16);
    }

    #[test]
    fn test_page_bounds_clamped() {
        assert_eq!(page_bounds(25, 1), (0, 10));
        assert_eq!(page_bounds(25, 3), (20, 25));
        // Out-of-range pages produce an empty slice, not a panic.
        assert_eq!(page_bounds(25, 4), (25, 25));
        assert_eq!(page_bounds(0, 1), (0, 0));
    }

    #[test]
    fn test_empty_filters_keep_source_order() {
        let mut state = AppState {
            catalog: vec![
                entry(1, "bulbasaur"),
                entry(4, "charmander"),
                entry(7, "squirtle"),
            ],
            ..Default::default()
        };
        state.rebuild_working_set();
        assert_eq!(state.working_set, vec![0, 1, 2]);
    }

    #[test]
    fn test_generation_filter_takes_precedence_over_query() {
        let mut state = AppState {
            catalog: vec![entry(1, "bulbasaur"), entry(4, "charmander")],
            ..Default::default()
        };
        state.filters.generation = Some(1);
        state.filters.query = "char".to_string();
        state.generation_members.insert("bulbasaur".to_string());
        state.rebuild_working_set();
        assert_eq!(state.working_set, vec![0]);
    }

    #[test]
    fn test_stable_sort_keeps_tied_order() {
        let mut a = entry(1, "bulbasaur");
        let mut b = entry(4, "charmander");
        let mut c = entry(7, "squirtle");
        a.attack = 50;
        b.attack = 50;
        c.attack = 60;
        let mut state = AppState {
            catalog: vec![a, b, c],
            ..Default::default()
        };
        state.filters.sort = Some(SortKey::Attack);
        state.rebuild_working_set();
        // squirtle first, then the tied pair in source order.
        assert_eq!(state.working_set, vec![2, 0, 1]);
    }
}

//! Reducer - pure function: (state, action) -> DispatchResult

use std::collections::HashSet;

use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{AppState, SortKey, CATALOG_LIMIT, GENERATION_COUNT, TYPE_TAGS};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Catalog =====
        Action::CatalogFetch => {
            state.catalog_loading = true;
            state.message = None;
            DispatchResult::changed_with(Effect::LoadCatalog {
                limit: CATALOG_LIMIT,
            })
        }

        Action::CatalogDidLoad(entries) => {
            state.catalog = entries;
            state.catalog_loading = false;
            state.search_active = false;
            state.filters = Default::default();
            state.generation_members.clear();
            state.filter_loading = false;
            state.rebuild_working_set();
            reset_page(state);
            DispatchResult::changed()
        }

        Action::CatalogDidError(error) => {
            state.catalog_loading = false;
            state.message = Some(format!("Catalog error: {error}"));
            DispatchResult::changed()
        }

        // ===== Search =====
        Action::SearchStart => {
            if state.search_active {
                return DispatchResult::unchanged();
            }
            state.search_active = true;
            state.filters.query.clear();
            state.filters.type_tag = None;
            state.filters.generation = None;
            state.generation_members.clear();
            state.filter_loading = false;
            state.rebuild_working_set();
            reset_page(state);
            DispatchResult::changed()
        }

        Action::SearchInput(ch) => {
            state.filters.query.push(ch);
            state.rebuild_working_set();
            reset_page(state);
            DispatchResult::changed()
        }

        Action::SearchBackspace => {
            if state.filters.query.pop().is_none() {
                return DispatchResult::unchanged();
            }
            state.rebuild_working_set();
            reset_page(state);
            DispatchResult::changed()
        }

        Action::SearchSubmit => {
            if !state.search_active {
                return DispatchResult::unchanged();
            }
            state.search_active = false;
            DispatchResult::changed()
        }

        Action::SearchCancel => {
            if !state.search_active && state.filters.query.is_empty() {
                return DispatchResult::unchanged();
            }
            state.search_active = false;
            state.filters.query.clear();
            state.rebuild_working_set();
            reset_page(state);
            DispatchResult::changed()
        }

        // ===== Type filter (local containment, no fetch) =====
        Action::TypeFilterNext => cycle_type_filter(state, 1),
        Action::TypeFilterPrev => cycle_type_filter(state, -1),

        // ===== Generation filter (resolved via the API) =====
        Action::GenerationNext => cycle_generation(state, 1),
        Action::GenerationPrev => cycle_generation(state, -1),

        Action::GenerationDidLoad { id, species } => {
            let set: HashSet<String> = species.into_iter().collect();
            state.generation_cache.insert(id, set.clone());
            // A stale completion only warms the cache.
            if state.filters.generation == Some(id) {
                state.filter_loading = false;
                state.generation_members = set;
                state.rebuild_working_set();
                reset_page(state);
            }
            DispatchResult::changed()
        }

        Action::GenerationDidError { id, error } => {
            if state.filters.generation == Some(id) {
                state.filter_loading = false;
                state.filters.generation = None;
            }
            state.message = Some(format!("Generation {id} error: {error}"));
            DispatchResult::changed()
        }

        // ===== Sort / reset =====
        Action::SortCycle => {
            state.filters.sort = next_sort(state.filters.sort);
            state.rebuild_working_set();
            reset_page(state);
            DispatchResult::changed()
        }

        Action::FiltersReset => {
            let already_clean = state.filters == Default::default()
                && !state.search_active
                && state.current_page == 1
                && state.selected_row == 0;
            if already_clean {
                return DispatchResult::unchanged();
            }
            state.search_active = false;
            state.filters = Default::default();
            state.generation_members.clear();
            state.filter_loading = false;
            state.message = None;
            state.rebuild_working_set();
            reset_page(state);
            DispatchResult::changed()
        }

        // ===== Paging =====
        Action::PageNext => {
            if !state.can_page_next() {
                return DispatchResult::unchanged();
            }
            state.current_page += 1;
            state.selected_row = 0;
            DispatchResult::changed()
        }

        Action::PagePrev => {
            if !state.can_page_prev() {
                return DispatchResult::unchanged();
            }
            state.current_page -= 1;
            state.selected_row = 0;
            DispatchResult::changed()
        }

        Action::SelectionMove(delta) => {
            let len = state.page_len();
            if len == 0 {
                return DispatchResult::unchanged();
            }
            let next = clamp_index(state.selected_row, len, delta);
            if next == state.selected_row {
                return DispatchResult::unchanged();
            }
            state.selected_row = next;
            DispatchResult::changed()
        }

        // ===== Detail overlay =====
        Action::DetailOpen => {
            let Some(entry) = state.selected_entry() else {
                return DispatchResult::unchanged();
            };
            let (id, name) = (entry.id, entry.name.clone());
            state.detail_open = true;
            state.detail_loading = true;
            state.message = None;
            DispatchResult::changed_with(Effect::LoadDetail { id, name })
        }

        Action::DetailDidLoad(record) => {
            state.detail = Some(record);
            state.detail_loading = false;
            DispatchResult::changed()
        }

        Action::DetailDidError { name, error } => {
            // Previously displayed contents stay; only the notice changes.
            state.detail_loading = false;
            state.message = Some(format!("{name} detail error: {error}"));
            DispatchResult::changed()
        }

        Action::DetailClose => {
            if !state.detail_open {
                return DispatchResult::unchanged();
            }
            state.detail_open = false;
            state.detail_loading = false;
            DispatchResult::changed()
        }

        // ===== Global =====
        Action::Tick => {
            if state.any_loading() {
                state.tick = state.tick.wrapping_add(1);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn reset_page(state: &mut AppState) {
    state.current_page = 1;
    state.selected_row = 0;
}

/// Cycle over [none, TYPE_TAGS...]. Selecting a tag replaces any search or
/// generation filter; the membership test is local, so the working set is
/// rebuilt immediately.
fn cycle_type_filter(state: &mut AppState, step: i16) -> DispatchResult<Effect> {
    let max_index = TYPE_TAGS.len() as i16;
    let current = state
        .filters
        .type_tag
        .as_deref()
        .and_then(|tag| TYPE_TAGS.iter().position(|t| *t == tag))
        .map(|idx| idx as i16 + 1)
        .unwrap_or(0);
    let mut next = current + step;
    if next < 0 {
        next = max_index;
    } else if next > max_index {
        next = 0;
    }

    state.search_active = false;
    state.filters.query.clear();
    state.filters.generation = None;
    state.generation_members.clear();
    state.filter_loading = false;
    state.filters.type_tag = if next == 0 {
        None
    } else {
        Some(TYPE_TAGS[(next - 1) as usize].to_string())
    };
    state.rebuild_working_set();
    reset_page(state);
    DispatchResult::changed()
}

/// Cycle over [none, 1..=GENERATION_COUNT]. Membership comes from the API;
/// until the lookup resolves the previous working set stays on screen, and a
/// failed lookup reverts the selection without touching it.
fn cycle_generation(state: &mut AppState, step: i16) -> DispatchResult<Effect> {
    let max_index = GENERATION_COUNT as i16;
    let current = state.filters.generation.map(|id| id as i16).unwrap_or(0);
    let mut next = current + step;
    if next < 0 {
        next = max_index;
    } else if next > max_index {
        next = 0;
    }

    state.search_active = false;
    state.filters.query.clear();
    state.filters.type_tag = None;

    if next == 0 {
        state.filters.generation = None;
        state.generation_members.clear();
        state.filter_loading = false;
        state.rebuild_working_set();
        reset_page(state);
        return DispatchResult::changed();
    }

    let id = next as u8;
    state.filters.generation = Some(id);
    if let Some(cached) = state.generation_cache.get(&id).cloned() {
        state.generation_members = cached;
        state.filter_loading = false;
        state.rebuild_working_set();
        reset_page(state);
        return DispatchResult::changed();
    }

    state.filter_loading = true;
    DispatchResult::changed_with(Effect::LoadGenerationMembers { id })
}

fn next_sort(sort: Option<SortKey>) -> Option<SortKey> {
    match sort {
        None => Some(SortKey::Hp),
        Some(SortKey::Hp) => Some(SortKey::Attack),
        Some(SortKey::Attack) => Some(SortKey::Defense),
        Some(SortKey::Defense) => None,
    }
}

fn clamp_index(current: usize, len: usize, delta: i16) -> usize {
    if len == 0 {
        return 0;
    }
    let mut next = current as i16 + delta;
    if next < 0 {
        next = 0;
    } else if next >= len as i16 {
        next = len as i16 - 1;
    }
    next as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CatalogEntry;

    fn entry(id: u16, name: &str, types: &[&str]) -> CatalogEntry {
        CatalogEntry {
            id,
            name: name.to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
            hp: 40 + id,
            attack: 40,
            defense: 40,
            sprite: None,
            url: format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
        }
    }

    fn loaded_state(count: u16) -> AppState {
        let mut state = AppState::default();
        let catalog = (1..=count)
            .map(|id| entry(id, &format!("mon-{id}"), &["normal"]))
            .collect();
        reducer(&mut state, Action::CatalogDidLoad(catalog));
        state
    }

    #[test]
    fn test_catalog_fetch_sets_loading() {
        let mut state = AppState::default();

        let result = reducer(&mut state, Action::CatalogFetch);

        assert!(result.changed);
        assert!(state.catalog_loading);
        assert_eq!(result.effects.len(), 1);
        assert!(matches!(result.effects[0], Effect::LoadCatalog { .. }));
    }

    #[test]
    fn test_page_navigation_no_ops_at_boundaries() {
        let mut state = loaded_state(25);
        assert_eq!(state.total_pages(), 3);

        let result = reducer(&mut state, Action::PagePrev);
        assert!(!result.changed);
        assert_eq!(state.current_page, 1);

        reducer(&mut state, Action::PageNext);
        reducer(&mut state, Action::PageNext);
        assert_eq!(state.current_page, 3);

        let result = reducer(&mut state, Action::PageNext);
        assert!(!result.changed);
        assert_eq!(state.current_page, 3);
    }

    #[test]
    fn test_sort_cycle_sequence() {
        let mut state = loaded_state(3);

        reducer(&mut state, Action::SortCycle);
        assert_eq!(state.filters.sort, Some(SortKey::Hp));
        reducer(&mut state, Action::SortCycle);
        assert_eq!(state.filters.sort, Some(SortKey::Attack));
        reducer(&mut state, Action::SortCycle);
        assert_eq!(state.filters.sort, Some(SortKey::Defense));
        reducer(&mut state, Action::SortCycle);
        assert_eq!(state.filters.sort, None);
    }

    #[test]
    fn test_generation_error_reverts_without_touching_working_set() {
        let mut state = loaded_state(12);
        reducer(&mut state, Action::PageNext);
        let before = state.working_set.clone();

        let result = reducer(&mut state, Action::GenerationNext);
        assert!(matches!(
            result.effects.first(),
            Some(Effect::LoadGenerationMembers { id: 1 })
        ));
        assert!(state.filter_loading);
        assert_eq!(state.working_set, before);

        reducer(
            &mut state,
            Action::GenerationDidError {
                id: 1,
                error: "timeout".to_string(),
            },
        );
        assert_eq!(state.filters.generation, None);
        assert!(!state.filter_loading);
        assert_eq!(state.working_set, before);
        assert!(state.message.is_some());
    }

    #[test]
    fn test_stale_generation_completion_only_warms_cache() {
        let mut state = loaded_state(5);
        reducer(&mut state, Action::GenerationNext);
        // User moved on to generation 2 before 1 resolved.
        reducer(&mut state, Action::GenerationNext);
        assert_eq!(state.filters.generation, Some(2));

        reducer(
            &mut state,
            Action::GenerationDidLoad {
                id: 1,
                species: vec!["mon-1".to_string()],
            },
        );
        assert!(state.generation_cache.contains_key(&1));
        assert!(state.generation_members.is_empty());
        assert!(state.filter_loading);
    }

    #[test]
    fn test_selection_clamped_to_page() {
        let mut state = loaded_state(13);
        reducer(&mut state, Action::PageNext);
        assert_eq!(state.page_len(), 3);

        reducer(&mut state, Action::SelectionMove(10));
        assert_eq!(state.selected_row, 2);

        let result = reducer(&mut state, Action::SelectionMove(1));
        assert!(!result.changed);
    }
}

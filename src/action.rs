//! Actions - user intents and async completions

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::{CatalogEntry, DetailRecord};

/// Application actions with automatic category inference
#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Catalog category =====
    /// Intent: (re)load the full catalog from the name index
    CatalogFetch,

    /// Result: catalog loaded (possibly partial - failed items are dropped)
    CatalogDidLoad(Vec<CatalogEntry>),

    /// Result: the listing fetch itself failed; catalog stays empty
    CatalogDidError(String),

    // ===== Search category =====
    /// Open the search prompt (clears any type/generation filter)
    SearchStart,

    /// Append a character to the search text
    SearchInput(char),

    /// Remove the last character of the search text
    SearchBackspace,

    /// Leave the prompt, keeping the current search text applied
    SearchSubmit,

    /// Leave the prompt and drop the search text
    SearchCancel,

    // ===== Type filter category =====
    TypeFilterNext,
    TypeFilterPrev,

    // ===== Generation category =====
    GenerationNext,
    GenerationPrev,

    /// Result: membership list for a generation resolved
    GenerationDidLoad { id: u8, species: Vec<String> },

    /// Result: generation lookup failed; working set stays as it was
    GenerationDidError { id: u8, error: String },

    // ===== Sort / reset =====
    /// Cycle none -> hp -> attack -> defense -> none
    SortCycle,

    /// Clear search, filters and sort; back to the full catalog, page 1
    FiltersReset,

    // ===== Page category =====
    /// No-op when already on the last page
    PageNext,

    /// No-op when already on the first page
    PagePrev,

    /// Move the row selection within the current page
    SelectionMove(i16),

    // ===== Detail category =====
    /// Fetch and show detail for the selected row
    DetailOpen,

    DetailDidLoad(DetailRecord),

    /// Result: detail fetch failed; previously shown contents are kept
    DetailDidError { name: String, error: String },

    DetailClose,

    // ===== Uncategorized (global) =====
    /// Periodic tick for the loading spinner
    Tick,

    /// Exit the application
    Quit,
}

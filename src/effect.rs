//! Effects - side effects declared by the reducer

/// Side effects that can be triggered by actions
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch the name index and every referenced detail document
    LoadCatalog { limit: usize },
    /// Resolve generation membership via the generation endpoint
    LoadGenerationMembers { id: u8 },
    /// Fetch the full detail document for one entry
    LoadDetail { id: u16, name: String },
}

//! Effects - side effects declared by the reducer

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Fetch one listing page and its details
    LoadPage {
        token: u64,
        limit: usize,
        offset: usize,
    },
    /// Fetch a single record by name or number
    LookupPokemon { token: u64, identifier: String },
    /// Fetch and decode the sprite for `id`
    LoadSprite { id: u32 },
}

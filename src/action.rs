//! Actions: user intents and async results

use serde::{Deserialize, Serialize};

use crate::api::FetchError;
use crate::sprite::SpriteArt;
use crate::state::PokemonRecord;

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(infer_categories)]
pub enum Action {
    /// Mount: load the first page
    Init,

    // ===== Pagination =====
    PageDidLoad {
        token: u64,
        records: Vec<PokemonRecord>,
    },
    PageDidError {
        token: u64,
        error: FetchError,
    },

    // ===== Lookup by id =====
    LookupDidLoad {
        token: u64,
        record: PokemonRecord,
    },
    LookupDidError {
        token: u64,
        error: FetchError,
    },

    // ===== Sprites =====
    SpriteDidLoad {
        id: u32,
        sprite: SpriteArt,
    },
    SpriteDidError {
        id: u32,
        error: String,
    },

    // ===== Search input =====
    SearchStart,
    SearchCancel,
    SearchSubmit,
    SearchInput(char),
    SearchBackspace,

    // ===== Type filter =====
    /// Select a type; the empty string clears the filter
    TypeFilterSelect(String),
    TypeFilterNext,
    TypeFilterPrev,

    // ===== Grid navigation =====
    SelectionMove(i16),
    SelectionRow(i16),
    SelectionPage(i16),
    SelectionJumpTop,
    SelectionJumpBottom,
    ScrollRows(i16),

    // ===== UI =====
    UiTerminalResize(u16, u16),

    Tick,
    Quit,
}

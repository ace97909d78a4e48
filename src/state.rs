//! Application state - single source of truth

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use serde::{Deserialize, Serialize};
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::layout::GridGeometry;
use crate::roster::Roster;
use crate::sensor::VisibilitySensor;
use crate::sprite::SpriteArt;

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const TICK_MS: u64 = 90;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PokemonRecord {
    pub id: u32,
    pub name: String,
    pub types: Vec<String>,
}

impl PokemonRecord {
    pub fn has_type(&self, type_name: &str) -> bool {
        self.types.iter().any(|t| t == type_name)
    }
}

/// How a finished page is committed to the roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageMode {
    Replace,
    Append,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub token: u64,
    pub offset: usize,
    pub mode: PageMode,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRequest {
    pub token: u64,
    pub identifier: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    pub page_size: usize,

    /// Every record fetched so far.
    pub roster: Roster,
    /// Search or type filter result. Empty means "show the roster".
    pub filtered: Vec<PokemonRecord>,
    pub search: SearchState,
    pub type_filter: Option<String>,

    pub page_request: Option<PageRequest>,
    pub lookup_request: Option<LookupRequest>,
    pub next_token: u64,
    /// Cleared on quit; results arriving afterwards are dropped.
    pub mounted: bool,
    pub sensor: VisibilitySensor,

    pub selected: usize,
    pub scroll_row: usize,

    pub sprites: HashMap<u32, SpriteArt>,
    pub sprites_pending: HashSet<u32>,
    pub sprites_failed: HashSet<u32>,

    pub message: Option<String>,
    pub tick: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            terminal_size: (80, 24),
            page_size: DEFAULT_PAGE_SIZE,
            roster: Roster::new(),
            filtered: Vec::new(),
            search: SearchState::default(),
            type_filter: None,
            page_request: None,
            lookup_request: None,
            next_token: 1,
            mounted: true,
            sensor: VisibilitySensor::default(),
            selected: 0,
            scroll_row: 0,
            sprites: HashMap::new(),
            sprites_pending: HashSet::new(),
            sprites_failed: HashSet::new(),
            message: None,
            tick: 0,
        }
    }
}

impl AppState {
    pub fn new(page_size: usize, terminal_size: (u16, u16)) -> Self {
        Self {
            page_size: page_size.max(1),
            terminal_size,
            ..Self::default()
        }
    }

    /// The list being rendered: the filtered list when it has entries,
    /// otherwise the roster.
    pub fn active_list(&self) -> &[PokemonRecord] {
        if self.filtered.is_empty() {
            self.roster.as_slice()
        } else {
            &self.filtered
        }
    }

    pub fn is_filtered(&self) -> bool {
        !self.filtered.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.page_request.is_some() || self.lookup_request.is_some()
    }

    pub fn type_options(&self) -> Vec<String> {
        self.roster.type_options()
    }

    pub fn geometry(&self) -> GridGeometry {
        GridGeometry::for_terminal(self.terminal_size.0, self.terminal_size.1)
    }

    pub fn visible_range(&self) -> Range<usize> {
        self.geometry()
            .visible_indices(self.scroll_row, self.active_list().len())
    }

    pub fn issue_token(&mut self) -> u64 {
        let token = self.next_token;
        self.next_token = self.next_token.wrapping_add(1);
        token
    }

    /// Move the selection, clamped to the active list, and scroll it into view.
    /// Returns whether anything moved.
    pub fn select(&mut self, index: usize) -> bool {
        let len = self.active_list().len();
        let bounded = if len == 0 { 0 } else { index.min(len - 1) };
        let scroll = self.geometry().scroll_to(bounded, self.scroll_row);
        let changed = bounded != self.selected || scroll != self.scroll_row;
        self.selected = bounded;
        self.scroll_row = scroll;
        changed
    }

    /// Scroll by whole rows and pull the selection along so it stays visible.
    pub fn scroll_by(&mut self, delta: i16) -> bool {
        let geometry = self.geometry();
        let max_scroll = geometry.max_scroll(self.active_list().len());
        let next = self
            .scroll_row
            .saturating_add_signed(isize::from(delta))
            .min(max_scroll);
        if next == self.scroll_row {
            return false;
        }
        self.scroll_row = next;
        let visible = geometry.visible_indices(next, self.active_list().len());
        if !visible.is_empty() {
            self.selected = self.selected.clamp(visible.start, visible.end - 1);
        }
        true
    }

    /// Reset selection and scrolling after the active list was swapped.
    pub fn reset_view(&mut self) {
        self.selected = 0;
        self.scroll_row = 0;
    }

    /// Re-clamp selection and scrolling after the active list or the
    /// terminal changed size.
    pub fn clamp_view(&mut self) {
        let len = self.active_list().len();
        let geometry = self.geometry();
        self.scroll_row = self.scroll_row.min(geometry.max_scroll(len));
        self.select(self.selected);
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("Dex")
                .entry("roster", ron_string(&self.roster.len()))
                .entry("filtered", ron_string(&self.filtered.len()))
                .entry("selected", ron_string(&self.selected))
                .entry("scroll_row", ron_string(&self.scroll_row))
                .entry("page_size", ron_string(&self.page_size)),
            DebugSection::new("Filters")
                .entry("search", ron_string(&self.search.query))
                .entry("search_active", ron_string(&self.search.active))
                .entry("type", ron_string(&self.type_filter)),
            DebugSection::new("Requests")
                .entry("page", ron_string(&self.page_request))
                .entry("lookup", ron_string(&self.lookup_request))
                .entry("sensor_target", ron_string(&self.sensor.target()))
                .entry("sensor_armed", ron_string(&self.sensor.is_armed()))
                .entry("mounted", ron_string(&self.mounted)),
            DebugSection::new("Status")
                .entry("sprites", ron_string(&self.sprites.len()))
                .entry("sprites_pending", ron_string(&self.sprites_pending.len()))
                .entry("message", ron_string(&self.message)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u32) -> PokemonRecord {
        PokemonRecord {
            id,
            name: format!("mon-{id}"),
            types: vec!["normal".into()],
        }
    }

    fn state_with(count: u32) -> AppState {
        let mut state = AppState::new(DEFAULT_PAGE_SIZE, (48, 30));
        state.roster.upsert((1..=count).map(record).collect());
        state
    }

    #[test]
    fn test_active_list_prefers_filtered() {
        let mut state = state_with(3);
        assert_eq!(state.active_list().len(), 3);

        state.filtered = vec![record(2)];
        assert_eq!(state.active_list(), &[record(2)]);
        assert!(state.is_filtered());
    }

    #[test]
    fn test_select_clamps_and_scrolls() {
        // 48x30 terminal: 2 columns, 2 visible rows
        let mut state = state_with(10);
        assert!(state.select(7));
        assert_eq!(state.selected, 7);
        assert_eq!(state.scroll_row, 2);

        assert!(state.select(100));
        assert_eq!(state.selected, 9);
        assert!(!state.select(9));
    }

    #[test]
    fn test_scroll_by_drags_selection() {
        let mut state = state_with(10);
        assert!(state.scroll_by(2));
        assert_eq!(state.scroll_row, 2);
        assert_eq!(state.selected, 4);

        assert!(state.scroll_by(10));
        assert_eq!(state.scroll_row, 3);
        assert!(!state.scroll_by(1));
    }

    #[test]
    fn test_tokens_increase() {
        let mut state = AppState::default();
        let first = state.issue_token();
        let second = state.issue_token();
        assert!(second > first);
    }
}

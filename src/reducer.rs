//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{AppState, LookupRequest, PageMode, PageRequest};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            state.mounted = true;
            state.message = None;
            state.sensor.arm();
            let effect = start_page(state, PageMode::Replace);
            DispatchResult::changed_with(effect)
        }

        // ===== Pagination =====
        Action::PageDidLoad { token, records } => {
            let Some(request) = take_page_request(state, token) else {
                tracing::debug!(token, "dropping stale page result");
                return DispatchResult::unchanged();
            };
            let grew = match request.mode {
                PageMode::Replace => {
                    let grew = !records.is_empty();
                    state.roster.replace(records);
                    grew
                }
                PageMode::Append => {
                    let added = state.roster.upsert(records);
                    tracing::debug!(offset = request.offset, added, "page appended");
                    added > 0
                }
            };
            // An empty page means the listing ran out; wait for navigation.
            if grew {
                state.sensor.arm();
            } else {
                tracing::debug!(offset = request.offset, "listing exhausted");
                state.sensor.disarm();
            }
            state.message = None;
            state.clamp_view();
            DispatchResult::changed_with_many(follow_up(state))
        }

        Action::PageDidError { token, error } => {
            let Some(request) = take_page_request(state, token) else {
                tracing::debug!(token, "dropping stale page error");
                return DispatchResult::unchanged();
            };
            tracing::warn!(offset = request.offset, %error, "page load failed");
            state.message = Some(format!("Page load failed: {error}"));
            // Wait for the user to scroll again instead of refetching in a loop.
            state.sensor.disarm();
            DispatchResult::changed()
        }

        // ===== Lookup by id =====
        Action::LookupDidLoad { token, record } => {
            if take_lookup_request(state, token).is_none() {
                tracing::debug!(token, "dropping stale lookup result");
                return DispatchResult::unchanged();
            }
            state.filtered = vec![record];
            state.message = None;
            state.reset_view();
            DispatchResult::changed_with_many(follow_up(state))
        }

        Action::LookupDidError { token, error } => {
            let Some(request) = take_lookup_request(state, token) else {
                tracing::debug!(token, "dropping stale lookup error");
                return DispatchResult::unchanged();
            };
            tracing::warn!(identifier = %request.identifier, %error, "lookup failed");
            state.filtered.clear();
            state.reset_view();
            state.message = Some(if error.is_not_found() {
                format!("No Pokemon matches \"{}\"", request.identifier)
            } else {
                format!("Lookup failed: {error}")
            });
            DispatchResult::changed_with_many(follow_up(state))
        }

        // ===== Sprites =====
        Action::SpriteDidLoad { id, sprite } => {
            if !state.mounted {
                return DispatchResult::unchanged();
            }
            state.sprites_pending.remove(&id);
            state.sprites.insert(id, sprite);
            DispatchResult::changed()
        }

        Action::SpriteDidError { id, error } => {
            if !state.mounted {
                return DispatchResult::unchanged();
            }
            tracing::debug!(id, %error, "sprite unavailable");
            state.sprites_pending.remove(&id);
            state.sprites_failed.insert(id);
            DispatchResult::changed()
        }

        // ===== Search input =====
        Action::SearchStart => {
            if state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.active = true;
            DispatchResult::changed()
        }

        Action::SearchCancel => {
            if !state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            DispatchResult::changed()
        }

        Action::SearchInput(ch) => {
            state.search.query.push(ch);
            DispatchResult::changed()
        }

        Action::SearchBackspace => {
            if state.search.query.pop().is_none() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::SearchSubmit => {
            state.search.active = false;
            state.filtered.clear();
            state.type_filter = None;
            state.reset_view();
            // A newer submission supersedes any lookup still in flight.
            state.lookup_request = None;
            let identifier = state.search.query.trim().to_lowercase();
            if identifier.is_empty() {
                return DispatchResult::changed_with_many(follow_up(state));
            }
            let token = state.issue_token();
            state.lookup_request = Some(LookupRequest {
                token,
                identifier: identifier.clone(),
            });
            tracing::debug!(token, %identifier, "lookup requested");
            DispatchResult::changed_with(Effect::LookupPokemon { token, identifier })
        }

        // ===== Type filter =====
        Action::TypeFilterSelect(name) => {
            select_type(state, name);
            DispatchResult::changed_with_many(follow_up(state))
        }

        Action::TypeFilterNext => cycle_type(state, 1),
        Action::TypeFilterPrev => cycle_type(state, -1),

        // ===== Grid navigation =====
        Action::SelectionMove(delta) => {
            let target = offset_index(state.selected, isize::from(delta));
            navigate(state, target)
        }

        Action::SelectionRow(delta) => {
            let columns = state.geometry().columns as isize;
            let target = offset_index(state.selected, isize::from(delta) * columns);
            navigate(state, target)
        }

        Action::SelectionPage(delta) => {
            let page = state.geometry().cards_per_page() as isize;
            let target = offset_index(state.selected, isize::from(delta) * page);
            navigate(state, target)
        }

        Action::SelectionJumpTop => navigate(state, 0),

        Action::SelectionJumpBottom => {
            let last = state.active_list().len().saturating_sub(1);
            navigate(state, last)
        }

        Action::ScrollRows(delta) => {
            let moved = state.scroll_by(delta);
            state.sensor.arm();
            finish_navigation(state, moved)
        }

        // ===== UI =====
        Action::UiTerminalResize(width, height) => {
            if state.terminal_size == (width, height) {
                return DispatchResult::unchanged();
            }
            state.terminal_size = (width, height);
            state.clamp_view();
            state.sensor.arm();
            DispatchResult::changed_with_many(follow_up(state))
        }

        Action::Tick => {
            if !state.is_loading() {
                return DispatchResult::unchanged();
            }
            state.tick = state.tick.wrapping_add(1);
            DispatchResult::changed()
        }

        Action::Quit => {
            state.mounted = false;
            state.page_request = None;
            state.lookup_request = None;
            state.sprites_pending.clear();
            state.sensor.disconnect();
            DispatchResult::changed()
        }
    }
}

/// Occupy the page slot and describe the fetch. The slot is filled before the
/// effect leaves the reducer, so no second page can start until it resolves.
fn start_page(state: &mut AppState, mode: PageMode) -> Effect {
    let offset = match mode {
        PageMode::Replace => 0,
        PageMode::Append => state.roster.len(),
    };
    let token = state.issue_token();
    state.page_request = Some(PageRequest {
        token,
        offset,
        mode,
    });
    tracing::debug!(token, offset, "page requested");
    Effect::LoadPage {
        token,
        limit: state.page_size,
        offset,
    }
}

fn take_page_request(state: &mut AppState, token: u64) -> Option<PageRequest> {
    if !state.mounted {
        return None;
    }
    state.page_request.take_if(|request| request.token == token)
}

fn take_lookup_request(state: &mut AppState, token: u64) -> Option<LookupRequest> {
    if !state.mounted {
        return None;
    }
    state.lookup_request.take_if(|request| request.token == token)
}

/// Re-observe the last card, then collect the page and sprite fetches the
/// current viewport calls for.
///
/// Only the roster paginates: a filtered list is a snapshot, so while one is
/// shown the sensor watches nothing. The sensor disarms when it fires and is
/// re-armed by a page that grew the roster or by user navigation.
fn follow_up(state: &mut AppState) -> Vec<Effect> {
    let mut effects = Vec::new();
    if !state.mounted {
        return effects;
    }
    let last = if state.is_filtered() {
        None
    } else {
        state.roster.len().checked_sub(1)
    };
    state.sensor.observe(last);
    if !state.is_loading() && state.sensor.poll(&state.geometry(), state.scroll_row) {
        state.sensor.disarm();
        effects.push(start_page(state, PageMode::Append));
    }
    effects.extend(sprite_requests(state));
    effects
}

fn sprite_requests(state: &mut AppState) -> Vec<Effect> {
    let wanted: Vec<u32> = state.active_list()[state.visible_range()]
        .iter()
        .map(|record| record.id)
        .filter(|id| {
            !state.sprites.contains_key(id)
                && !state.sprites_pending.contains(id)
                && !state.sprites_failed.contains(id)
        })
        .collect();
    wanted
        .into_iter()
        .map(|id| {
            state.sprites_pending.insert(id);
            Effect::LoadSprite { id }
        })
        .collect()
}

fn select_type(state: &mut AppState, name: String) {
    // The chosen type replaces whatever a pending lookup would show.
    state.lookup_request = None;
    if name.is_empty() {
        state.type_filter = None;
        state.filtered.clear();
    } else {
        state.filtered = state.roster.with_type(&name);
        state.type_filter = Some(name);
    }
    state.reset_view();
    state.sensor.arm();
}

fn cycle_type(state: &mut AppState, step: isize) -> DispatchResult<Effect> {
    let mut options = vec![String::new()];
    options.extend(state.type_options());
    let current = state
        .type_filter
        .as_ref()
        .and_then(|name| options.iter().position(|option| option == name))
        .unwrap_or(0);
    let next = (current as isize + step).rem_euclid(options.len() as isize) as usize;
    let name = options.swap_remove(next);
    select_type(state, name);
    DispatchResult::changed_with_many(follow_up(state))
}

fn offset_index(current: usize, delta: isize) -> usize {
    current.saturating_add_signed(delta)
}

fn navigate(state: &mut AppState, target: usize) -> DispatchResult<Effect> {
    let moved = state.select(target);
    state.sensor.arm();
    finish_navigation(state, moved)
}

fn finish_navigation(state: &mut AppState, moved: bool) -> DispatchResult<Effect> {
    let effects = follow_up(state);
    if moved || !effects.is_empty() {
        DispatchResult::changed_with_many(effects)
    } else {
        DispatchResult::unchanged()
    }
}

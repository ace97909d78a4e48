//! Pokedex TUI - paginated PokeAPI browser
//!
//! The library exposes the store, fetcher and components so they can be
//! driven from tests without a terminal.

pub mod action;
pub mod api;
pub mod components;
pub mod config;
pub mod effect;
pub mod layout;
pub mod logging;
pub mod reducer;
pub mod roster;
pub mod sensor;
pub mod sprite;
pub mod state;

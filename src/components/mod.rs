pub mod card;
pub mod dex_grid;
pub mod pokedex_view;
pub mod search_bar;

use ratatui::style::Color;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use card::{PokemonCard, PokemonCardProps, SpriteSlot};
pub use dex_grid::{DexGrid, DexGridProps};
pub use pokedex_view::{PokedexView, PokedexViewProps};
pub use search_bar::{SearchBar, SearchBarProps};

pub(crate) const BG_BASE: Color = Color::Rgb(12, 18, 28);
pub(crate) const BG_PANEL: Color = Color::Rgb(20, 32, 46);
pub(crate) const TEXT_MAIN: Color = Color::Rgb(232, 242, 244);
pub(crate) const TEXT_DIM: Color = Color::Rgb(176, 195, 207);
pub(crate) const ACCENT_TEAL: Color = Color::Rgb(72, 204, 184);
pub(crate) const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);

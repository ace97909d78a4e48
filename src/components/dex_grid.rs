use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::Line,
    widgets::Paragraph,
    Frame,
};
use tui_dispatch::EventKind;

use super::{Component, PokemonCard, PokemonCardProps, SpriteSlot, TEXT_DIM};
use crate::action::Action;
use crate::layout::{GridGeometry, CARD_HEIGHT, CARD_WIDTH};
use crate::state::AppState;

pub struct DexGridProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Grid of cards for the active list, scrolled by `state.scroll_row`.
#[derive(Default)]
pub struct DexGrid {
    card: PokemonCard,
}

impl DexGrid {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component<Action> for DexGrid {
    type Props<'a> = DexGridProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Left | KeyCode::Char('h') => Some(Action::SelectionMove(-1)),
                KeyCode::Right | KeyCode::Char('l') => Some(Action::SelectionMove(1)),
                KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectionRow(-1)),
                KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectionRow(1)),
                KeyCode::PageUp => Some(Action::SelectionPage(-1)),
                KeyCode::PageDown => Some(Action::SelectionPage(1)),
                KeyCode::Home | KeyCode::Char('g') => Some(Action::SelectionJumpTop),
                KeyCode::End | KeyCode::Char('G') => Some(Action::SelectionJumpBottom),
                _ => None,
            },
            EventKind::Scroll { delta, .. } if *delta != 0 => {
                Some(Action::ScrollRows((*delta).signum() as i16))
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let list = state.active_list();
        if list.is_empty() {
            let text = if state.is_loading() {
                "Loading..."
            } else {
                "Nothing to show"
            };
            let y = area.y + area.height / 2;
            let line_area = Rect::new(area.x, y, area.width, 1.min(area.height));
            frame.render_widget(
                Paragraph::new(Line::styled(text, Style::default().fg(TEXT_DIM)))
                    .alignment(Alignment::Center),
                line_area,
            );
            return;
        }

        let geometry = GridGeometry::for_area(area.width, area.height);
        let used_width = (geometry.columns as u16 * CARD_WIDTH).min(area.width);
        let left = area.x + (area.width - used_width) / 2;

        for index in geometry.visible_indices(state.scroll_row, list.len()) {
            let slot = index - state.scroll_row * geometry.columns;
            let column = (slot % geometry.columns) as u16;
            let row = (slot / geometry.columns) as u16;
            let card_area = Rect::new(
                left + column * CARD_WIDTH,
                area.y + row * CARD_HEIGHT,
                CARD_WIDTH,
                CARD_HEIGHT,
            )
            .intersection(area);
            if card_area.is_empty() {
                continue;
            }

            let record = &list[index];
            let sprite = match state.sprites.get(&record.id) {
                Some(sprite) => SpriteSlot::Ready(sprite),
                None if state.sprites_failed.contains(&record.id) => SpriteSlot::Missing,
                None => SpriteSlot::Loading,
            };
            self.card.render(
                frame,
                card_area,
                PokemonCardProps {
                    record,
                    sprite,
                    is_selected: props.is_focused && index == state.selected,
                },
            );
        }
    }
}

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;

use super::{Component, ACCENT_GOLD, ACCENT_TEAL, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::state::SearchState;

pub struct SearchBarProps<'a> {
    pub search: &'a SearchState,
    pub type_filter: Option<&'a str>,
    pub is_focused: bool,
}

/// Header row: the id search field and the current type filter.
#[derive(Default)]
pub struct SearchBar;

impl Component<Action> for SearchBar {
    type Props<'a> = SearchBarProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused || !props.search.active {
            return None;
        }

        let EventKind::Key(key) = event else {
            return None;
        };
        match key.code {
            KeyCode::Esc => Some(Action::SearchCancel),
            KeyCode::Enter => Some(Action::SearchSubmit),
            KeyCode::Backspace => Some(Action::SearchBackspace),
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::SearchInput(ch))
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let search = props.search;
        let field = if search.active {
            format!("{}_", search.query)
        } else if search.query.is_empty() {
            "press / to search".to_string()
        } else {
            search.query.clone()
        };
        let field_style = if search.active {
            Style::default()
                .fg(ACCENT_TEAL)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_DIM)
        };

        let filter = match props.type_filter {
            Some(name) => Span::styled(name.to_string(), Style::default().fg(ACCENT_GOLD)),
            None => Span::styled("Filter by Type", Style::default().fg(TEXT_DIM)),
        };

        let line = Line::from(vec![
            Span::raw("Search by ID: "),
            Span::styled(field, field_style),
            Span::raw("  |  "),
            filter,
            Span::styled("  [ ]", Style::default().fg(TEXT_DIM)),
        ]);

        let border = if props.is_focused && search.active {
            Style::default().fg(ACCENT_TEAL)
        } else {
            Style::default().fg(TEXT_DIM)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
            .title("POKEDEX");
        frame.render_widget(Paragraph::new(line).block(block), area);
    }
}

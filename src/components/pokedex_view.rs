use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::Span,
    widgets::Block,
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::{
    Component, DexGrid, DexGridProps, SearchBar, SearchBarProps, ACCENT_GOLD, BG_BASE, TEXT_DIM,
};
use crate::action::Action;
use crate::layout::{FOOTER_HEIGHT, HEADER_HEIGHT};
use crate::state::AppState;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub struct PokedexViewProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Whole screen: search header, card grid and status bar.
#[derive(Default)]
pub struct PokedexView {
    search: SearchBar,
    grid: DexGrid,
    status_bar: StatusBar,
}

impl PokedexView {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component<Action> for PokedexView {
    type Props<'a> = PokedexViewProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        let state = props.state;
        if !props.is_focused {
            return Vec::new();
        }

        if state.search.active {
            return self
                .search
                .handle_event(
                    event,
                    SearchBarProps {
                        search: &state.search,
                        type_filter: state.type_filter.as_deref(),
                        is_focused: true,
                    },
                )
                .into_iter()
                .collect();
        }

        if let EventKind::Key(key) = event {
            let action = match key.code {
                KeyCode::Char('/') => Some(Action::SearchStart),
                KeyCode::Char(']') => Some(Action::TypeFilterNext),
                KeyCode::Char('[') => Some(Action::TypeFilterPrev),
                KeyCode::Char('c') => Some(Action::TypeFilterSelect(String::new())),
                KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
                _ => None,
            };
            if let Some(action) = action {
                return vec![action];
            }
        }

        self.grid
            .handle_event(
                event,
                DexGridProps {
                    state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);

        let chunks = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(area);

        self.search.render(
            frame,
            chunks[0],
            SearchBarProps {
                search: &state.search,
                type_filter: state.type_filter.as_deref(),
                is_focused: props.is_focused,
            },
        );
        self.grid.render(
            frame,
            chunks[1],
            DexGridProps {
                state,
                is_focused: props.is_focused && !state.search.active,
            },
        );

        let hints = if state.search.active {
            vec![
                StatusBarHint::new("Enter", "lookup"),
                StatusBarHint::new("Esc", "cancel"),
            ]
        } else {
            vec![
                StatusBarHint::new("/", "search"),
                StatusBarHint::new("[ ]", "type"),
                StatusBarHint::new("c", "clear"),
                StatusBarHint::new("q", "quit"),
            ]
        };
        let count = format!("{}/{}", state.active_list().len(), state.roster.len());
        let status = status_text(state);
        let items = [
            StatusBarItem::span(Span::styled(count, Style::default().fg(TEXT_DIM))),
            StatusBarItem::span(Span::styled(status, Style::default().fg(ACCENT_GOLD))),
        ];

        <StatusBar as Component<Action>>::render(
            &mut self.status_bar,
            frame,
            chunks[2],
            StatusBarProps {
                left: StatusBarSection::hints(&hints).with_separator("  "),
                center: StatusBarSection::empty(),
                right: StatusBarSection::items(&items).with_separator("  "),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}

fn status_text(state: &AppState) -> String {
    let spinner = SPINNER[(state.tick % SPINNER.len() as u64) as usize];
    if state.lookup_request.is_some() {
        format!("{spinner} Looking up...")
    } else if state.page_request.is_some() {
        format!("{spinner} Loading...")
    } else {
        state.message.clone().unwrap_or_default()
    }
}

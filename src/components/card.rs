use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use super::{Component, ACCENT_GOLD, ACCENT_TEAL, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::sprite::{SpriteArt, SPRITE_MAX_HEIGHT};
use crate::state::PokemonRecord;

const SPRITE_ROWS: u16 = (SPRITE_MAX_HEIGHT / 2) as u16;

/// What the card can show in its sprite slot.
#[derive(Clone, Copy, Debug)]
pub enum SpriteSlot<'a> {
    Ready(&'a SpriteArt),
    Loading,
    Missing,
}

pub struct PokemonCardProps<'a> {
    pub record: &'a PokemonRecord,
    pub sprite: SpriteSlot<'a>,
    pub is_selected: bool,
}

/// One bordered card: sprite, name, types and number.
#[derive(Default)]
pub struct PokemonCard;

impl Component<Action> for PokemonCard {
    type Props<'a> = PokemonCardProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let border = if props.is_selected {
            Style::default().fg(ACCENT_GOLD)
        } else {
            Style::default().fg(TEXT_DIM)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border)
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::vertical([
            Constraint::Length(SPRITE_ROWS),
            Constraint::Length(1), // Name
            Constraint::Length(1), // Types
            Constraint::Length(1), // ID
        ])
        .split(inner);

        let sprite = match props.sprite {
            SpriteSlot::Ready(sprite) => Paragraph::new(sprite_lines(sprite, SPRITE_ROWS)),
            SpriteSlot::Loading => placeholder("···", SPRITE_ROWS),
            SpriteSlot::Missing => placeholder("no sprite", SPRITE_ROWS),
        };
        frame.render_widget(sprite.alignment(Alignment::Center), chunks[0]);

        let name_style = if props.is_selected {
            Style::default()
                .fg(ACCENT_TEAL)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_MAIN)
        };
        let record = props.record;
        let lines = [
            labeled("Name: ", record.name.clone(), name_style),
            labeled(
                "Type(s): ",
                record.types.join(", "),
                Style::default().fg(TEXT_MAIN),
            ),
            labeled("ID: ", record.id.to_string(), Style::default().fg(TEXT_MAIN)),
        ];
        for (line, area) in lines.into_iter().zip(chunks.iter().skip(1)) {
            frame.render_widget(Paragraph::new(line), *area);
        }
    }
}

fn labeled(label: &'static str, value: String, style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(label, Style::default().fg(TEXT_DIM)),
        Span::styled(value, style),
    ])
}

fn placeholder(text: &'static str, rows: u16) -> Paragraph<'static> {
    let mut lines = vec![Line::default(); usize::from(rows / 2)];
    lines.push(Line::styled(text, Style::default().fg(TEXT_DIM)));
    Paragraph::new(lines)
}

/// Draw two pixel rows per cell with half blocks, vertically centered in
/// `rows` cells.
pub fn sprite_lines(sprite: &SpriteArt, rows: u16) -> Vec<Line<'static>> {
    let cell_rows = sprite.cell_rows().min(u32::from(rows));
    let pad = usize::from(rows).saturating_sub(cell_rows as usize) / 2;
    let mut lines = vec![Line::default(); pad];
    for row in 0..cell_rows {
        let spans: Vec<Span<'static>> = (0..sprite.width)
            .map(|x| {
                let top = sprite.pixel(x, row * 2);
                let bottom = sprite.pixel(x, row * 2 + 1);
                half_block(top, bottom)
            })
            .collect();
        lines.push(Line::from(spans));
    }
    lines
}

fn half_block(top: Option<[u8; 3]>, bottom: Option<[u8; 3]>) -> Span<'static> {
    let rgb = |[r, g, b]: [u8; 3]| Color::Rgb(r, g, b);
    match (top, bottom) {
        (Some(top), Some(bottom)) => {
            Span::styled("▀", Style::default().fg(rgb(top)).bg(rgb(bottom)))
        }
        (Some(top), None) => Span::styled("▀", Style::default().fg(rgb(top))),
        (None, Some(bottom)) => Span::styled("▄", Style::default().fg(rgb(bottom))),
        (None, None) => Span::raw(" "),
    }
}

use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use trowel_engine::{GardenGame, Session, SpriteProvider as _};

use crate::ui::widgets::{GlyphSprites, TILE_HEIGHT, TILE_WIDTH, style};

/// Budget, clock and selection panel shown while a garden is open.
pub struct HudDisplay<'a> {
    game: &'a GardenGame,
    sprites: &'a GlyphSprites,
    block: Option<BlockWidget<'a>>,
}

impl<'a> HudDisplay<'a> {
    pub fn new(game: &'a GardenGame, sprites: &'a GlyphSprites) -> Self {
        Self {
            game,
            sprites,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        20 + super::block_margins(self.block.as_ref()).0
    }

    pub fn height(&self) -> u16 {
        u16::try_from(ROWS.len()).unwrap_or(u16::MAX)
            + TILE_HEIGHT
            + super::block_margins(self.block.as_ref()).1
    }
}

type Value = &'static dyn Fn(&GardenGame) -> String;

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(Value),
    LabelValue(&'static str, Value),
}

fn session_value(game: &GardenGame, f: impl FnOnce(&Session) -> String) -> String {
    game.session().map_or_else(|| "-".to_owned(), f)
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn format_clock(secs: f32) -> String {
    let tenths = (secs.max(0.0) * 10.0).ceil() as u32;
    format!("{}:{:0>2}.{}", tenths / 600, tenths / 10 % 60, tenths % 10)
}

fn format_budget(session: &Session) -> String {
    if session.is_infinity() {
        "P ----".to_owned()
    } else {
        format!("P {:.0}", session.resources().budget())
    }
}

const ROWS: &[Row] = &[
    Row::FullLabel("BUDGET:"),
    Row::FullValue(&|game| session_value(game, format_budget)),
    Row::FullLabel("TIME:"),
    Row::FullValue(&|game| {
        session_value(game, |s| format_clock(s.resources().time_remaining()))
    }),
    Row::Empty,
    Row::LabelValue("MODE:", &|game| {
        session_value(game, |s| s.difficulty().to_string())
    }),
    Row::LabelValue("TARGET:", &|game| {
        session_value(game, |s| {
            s.threshold()
                .map_or_else(|| "-".to_owned(), |t| format!("{t:.1}"))
        })
    }),
    Row::LabelValue("GARDENS:", &|game| {
        game.stats().gardens_completed().to_string()
    }),
    Row::LabelValue("BEST:", &|game| game.stats().best_gardens().to_string()),
    Row::LabelValue("UNLOCK:", &|game| game.unlock_level().to_string()),
    Row::Empty,
    Row::FullLabel("ITEM:"),
    Row::FullValue(&|game| match game.selected_item() {
        Some(item) if game.is_selected_unlocked() => item.name.clone(),
        Some(item) => format!("{} (locked)", item.name),
        None => "-".to_owned(),
    }),
    Row::LabelValue("COST:", &|game| {
        game.selected_item()
            .map_or_else(|| "-".to_owned(), |item| format!("{:.0}", item.cost))
    }),
    Row::LabelValue("AMOUNT:", &|game| match game.selected_item() {
        Some(item) if item.is_overlay() => (game.selected_amount() + 1).to_string(),
        _ => "-".to_owned(),
    }),
];

impl Widget for HudDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let low_budget = self.game.session().is_some_and(|s| {
            !s.is_infinity() && s.resources().budget() < self.game.config().resources.low_budget
        });

        let [rows_area, preview_area] = Layout::vertical([
            Constraint::Length(u16::try_from(ROWS.len()).unwrap_or(u16::MAX)),
            Constraint::Length(TILE_HEIGHT),
        ])
        .areas(area);
        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(rows_area);

        for (i, (row, area)) in iter::zip(ROWS.iter().copied(), rows_areas.iter().copied())
            .enumerate()
        {
            let style = if i == 1 && low_budget {
                style::WARNING
            } else {
                style::DEFAULT
            };
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(self.game), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(self.game), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }

        let preview = self.game.selected_item().and_then(|item| {
            self.sprites
                .display_sprite(item.id, self.game.selected_amount())
        });
        if let Some(glyph) = preview {
            let area = preview_area.centered_horizontally(Constraint::Length(TILE_WIDTH));
            glyph.render(area, buf);
        }
    }
}

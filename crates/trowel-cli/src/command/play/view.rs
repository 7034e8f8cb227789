use ratatui::text::{Line, Text};
use trowel_engine::{Difficulty, FinishSummary, GameConfig, GardenGame, Phase, Verdict};

use crate::ui::widgets::{KeyBinding, style};

const TITLE_KEYS: &[KeyBinding] = &[
    (&["Enter"], "Start"),
    (&["t"], "Tutorial"),
    (&["d"], "Delete data"),
    (&["a"], "Angry trowel"),
    (&["+", "-"], "Volume"),
    (&["q"], "Quit"),
];
const TUTORIAL_KEYS: &[KeyBinding] = &[(&["t", "Esc"], "Close")];
const DATA_RESET_KEYS: &[KeyBinding] = &[(&["y"], "Delete"), (&["n", "Esc"], "Keep")];
const SELECT_KEYS: &[KeyBinding] = &[
    (&["1", "2", "3", "4"], "Difficulty"),
    (&["a"], "Angry trowel"),
    (&["Esc"], "Back"),
];
const PLAY_KEYS: &[KeyBinding] = &[
    (&["Mouse", "hjkl"], "Aim"),
    (&["LMB", "Space"], "Place"),
    (&["RMB", "x"], "Reset tile"),
    (&["←", "→"], "Item"),
    (&["↑", "↓"], "Amount"),
    (&["Enter"], "Finish"),
];
const FINISH_KEYS: &[KeyBinding] = &[
    (&["Enter"], "Next garden"),
    (&["t"], "Title"),
    (&["Esc", "q"], "Quit"),
];
const NEXT_GARDEN_KEYS: &[KeyBinding] = &[(&["Esc"], "Title")];

pub fn key_bindings(game: &GardenGame) -> &'static [KeyBinding<'static>] {
    match game.phase() {
        Phase::Title if game.is_data_reset_open() => DATA_RESET_KEYS,
        Phase::Title if game.is_tutorial_open() => TUTORIAL_KEYS,
        Phase::Title => TITLE_KEYS,
        Phase::DifficultySelect => SELECT_KEYS,
        Phase::Playing => PLAY_KEYS,
        Phase::Finished => FINISH_KEYS,
        Phase::NextGarden => NEXT_GARDEN_KEYS,
        Phase::Countdown | Phase::ToTitle => &[],
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

pub fn title_text(game: &GardenGame) -> Text<'static> {
    Text::from(vec![
        Line::from("Build the garden the judge wants."),
        Line::from(""),
        Line::from(format!("Unlock level: {}", game.unlock_level())),
        Line::from(format!("Volume: {:.0}%", game.volume() * 100.0)),
        Line::from(format!("Angry trowel: {}", on_off(game.is_angry_trowel()))),
    ])
}

pub fn tutorial_text() -> Text<'static> {
    Text::from(vec![
        Line::from("Point at a tile and click to paint it with the selected item."),
        Line::from("Every placement costs money; right click resets a tile to dirt."),
        Line::from("Cycle items with left/right and plant density with up/down."),
        Line::from(""),
        Line::from("Each judge likes one plant, hates another, and may hate pavement."),
        Line::from("Beat the target score before time or money runs out."),
        Line::from("Best gardens unlock new items."),
    ])
}

pub fn data_reset_text() -> Text<'static> {
    Text::from(vec![
        Line::from("Delete all saved data?"),
        Line::from("Unlocked items and volume are lost."),
        Line::from(""),
        Line::from("[y] delete    [n] keep"),
    ])
}

fn budget_label(config: &GameConfig, difficulty: Difficulty) -> String {
    if difficulty.budget_fraction().is_none() {
        "P ----".to_owned()
    } else {
        format!("P {:.0}", config.resources.starting_budget(difficulty))
    }
}

pub fn difficulty_text(game: &GardenGame) -> Text<'static> {
    let mut lines = vec![Line::from("Choose a difficulty"), Line::from("")];
    for (i, difficulty) in Difficulty::ALL.into_iter().enumerate() {
        lines.push(Line::from(format!(
            "[{}] {:<9}{:>9}  {:>3.0}s",
            i + 1,
            difficulty.to_string(),
            budget_label(game.config(), difficulty),
            difficulty.time_limit(),
        )));
    }
    Text::from(lines)
}

/// Countdown stage over the judge's hints.
pub fn start_text(game: &GardenGame, stage: Option<&str>) -> Text<'static> {
    let mut lines = vec![
        Line::styled(stage.unwrap_or("").to_owned(), style::WARNING).centered(),
        Line::from(""),
    ];
    if game.judge_hints().is_empty() {
        lines.push(Line::from("The judge has no opinions today."));
    } else {
        lines.push(Line::from("The judge says:"));
        lines.extend(
            game.judge_hints()
                .iter()
                .map(|hint| Line::from(format!("  {hint}"))),
        );
    }
    Text::from(lines)
}

pub fn finish_text(summary: &FinishSummary, banner: Option<&str>) -> Text<'static> {
    let mut lines = vec![];
    match (summary.score, summary.threshold, summary.verdict) {
        (Some(score), Some(threshold), Some(verdict)) => {
            let (label, style) = match verdict {
                Verdict::Success => ("Best garden!", style::SUCCESS),
                Verdict::Fail => ("Not good enough.", style::FAILURE),
            };
            lines.push(Line::styled(label, style).centered());
            lines.push(
                Line::from(format!("Score {:.1} / {threshold:.1}", score.total())).centered(),
            );
        }
        _ => {
            let line = format!("{} garden complete", summary.difficulty);
            lines.push(Line::from(line).centered());
        }
    }
    if let Some(narrative) = &summary.narrative {
        lines.push(Line::from(""));
        lines.extend(
            narrative
                .to_string()
                .lines()
                .map(|line| Line::from(line.to_owned())),
        );
    }
    if let Some(banner) = banner {
        lines.push(Line::from(""));
        lines.push(Line::styled(banner.to_owned(), style::WARNING).centered());
    }
    Text::from(lines)
}

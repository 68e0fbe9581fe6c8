// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Trailmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use ratatui::style::{Color, Modifier, Style};

use crate::model::{Difficulty, ProgressStatus};

/// Light by default; `t` flips to dark.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TuiTheme {
    dark: bool,
}

#[derive(Debug, Clone, Copy)]
struct Palette {
    fg: Color,
    bg: Color,
    muted: Color,
    edge: Color,
    idle_node: Color,
}

const LIGHT: Palette = Palette {
    fg: Color::Black,
    bg: Color::White,
    muted: Color::DarkGray,
    edge: Color::Gray,
    idle_node: Color::DarkGray,
};

const DARK: Palette = Palette {
    fg: Color::White,
    bg: Color::Black,
    muted: Color::Gray,
    edge: Color::DarkGray,
    idle_node: Color::Gray,
};

impl TuiTheme {
    pub(crate) fn is_dark(&self) -> bool {
        self.dark
    }

    pub(crate) fn toggle(&mut self) {
        self.dark = !self.dark;
    }

    fn palette(&self) -> &'static Palette {
        if self.dark {
            &DARK
        } else {
            &LIGHT
        }
    }

    pub(crate) fn base_style(&self) -> Style {
        let palette = self.palette();
        Style::default().fg(palette.fg).bg(palette.bg)
    }

    pub(crate) fn muted_style(&self) -> Style {
        self.base_style().fg(self.palette().muted)
    }

    pub(crate) fn panel_border_style(&self, focused: bool) -> Style {
        if focused {
            self.base_style().fg(Color::Yellow)
        } else {
            self.muted_style()
        }
    }

    pub(crate) fn selection_style(&self) -> Style {
        self.base_style()
            .add_modifier(Modifier::REVERSED | Modifier::BOLD)
    }

    pub(crate) fn error_style(&self) -> Style {
        self.base_style().fg(Color::Red)
    }

    pub(crate) fn edge_color(&self) -> Color {
        self.palette().edge
    }

    pub(crate) fn gauge_style(&self) -> Style {
        self.base_style().fg(Color::Green)
    }

    /// Gauge style tinted with a roadmap's catalog color, when it names one.
    pub(crate) fn roadmap_gauge_style(&self, color: &str) -> Style {
        match roadmap_accent(color) {
            Some(accent) => self.base_style().fg(accent),
            None => self.gauge_style(),
        }
    }

    pub(crate) fn roadmap_title_style(&self, color: &str) -> Style {
        let style = self.base_style().add_modifier(Modifier::BOLD);
        roadmap_accent(color).map_or(style, |accent| style.fg(accent))
    }

    pub(crate) fn status_color(&self, status: ProgressStatus) -> Color {
        match status {
            ProgressStatus::Completed => Color::Green,
            ProgressStatus::Learning => Color::Yellow,
            ProgressStatus::Skipped => Color::Gray,
            ProgressStatus::NotStarted => self.palette().idle_node,
        }
    }

    pub(crate) fn status_style(&self, status: ProgressStatus) -> Style {
        self.base_style().fg(self.status_color(status))
    }

    pub(crate) fn difficulty_style(&self, difficulty: Difficulty) -> Style {
        let color = match difficulty {
            Difficulty::Beginner => Color::Green,
            Difficulty::Intermediate => Color::Yellow,
            Difficulty::Advanced => Color::Red,
        };
        self.base_style().fg(color)
    }
}

/// Terminal color for a catalog color. The catalog uses gradient classes like
/// `from-blue-500 to-cyan-500`; the `from-` hue wins. Plain names and `#rrggbb` also parse.
pub(crate) fn roadmap_accent(color: &str) -> Option<Color> {
    let color = color.trim();
    let start = color
        .split_whitespace()
        .find_map(|class| class.strip_prefix("from-"));
    let Some(start) = start else {
        return color.parse::<Color>().ok().filter(|_| !color.is_empty());
    };

    let hue = start.split('-').next().unwrap_or(start);
    let accent = match hue {
        "blue" => Color::Blue,
        "sky" | "indigo" => Color::LightBlue,
        "cyan" | "teal" => Color::Cyan,
        "purple" | "violet" | "fuchsia" => Color::Magenta,
        "pink" | "rose" => Color::LightMagenta,
        "red" => Color::Red,
        "orange" | "amber" | "yellow" => Color::Yellow,
        "green" | "emerald" | "lime" => Color::Green,
        "slate" | "gray" | "zinc" | "neutral" | "stone" => Color::Gray,
        _ => return None,
    };
    Some(accent)
}

/// Single-cell marker drawn next to a node title.
pub(crate) fn status_glyph(status: ProgressStatus) -> &'static str {
    match status {
        ProgressStatus::NotStarted => "○",
        ProgressStatus::Learning => "◔",
        ProgressStatus::Completed => "●",
        ProgressStatus::Skipped => "◌",
    }
}

#[cfg(test)]
mod tests {
    use ratatui::style::Color;

    use rstest::rstest;

    use super::{roadmap_accent, TuiTheme};
    use crate::model::ProgressStatus;

    #[rstest]
    #[case("from-blue-500 to-cyan-500", Some(Color::Blue))]
    #[case("bg-gradient-to-r from-purple-500 to-pink-500", Some(Color::Magenta))]
    #[case("from-emerald-400", Some(Color::Green))]
    #[case("#ff8800", Some(Color::Rgb(0xff, 0x88, 0x00)))]
    #[case("red", Some(Color::Red))]
    #[case("from-chartreuse-500", None)]
    #[case("", None)]
    fn catalog_colors_map_to_terminal_colors(#[case] raw: &str, #[case] expected: Option<Color>) {
        assert_eq!(roadmap_accent(raw), expected);
    }

    #[test]
    fn unknown_roadmap_color_falls_back_to_the_plain_gauge() {
        let theme = TuiTheme::default();
        assert_eq!(theme.roadmap_gauge_style("nope-nope"), theme.gauge_style());
        assert_eq!(theme.roadmap_gauge_style("from-blue-500").fg, Some(Color::Blue));
    }

    #[test]
    fn toggle_swaps_palettes_but_keeps_status_colors() {
        let mut theme = TuiTheme::default();
        assert!(!theme.is_dark());
        let light_idle = theme.status_color(ProgressStatus::NotStarted);

        theme.toggle();
        assert!(theme.is_dark());
        assert_ne!(theme.status_color(ProgressStatus::NotStarted), light_idle);
        assert_eq!(theme.status_color(ProgressStatus::Completed), Color::Green);
        assert_eq!(theme.base_style().bg, Some(Color::Black));
    }
}

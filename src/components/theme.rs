use cc_api::League;
use tui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Palette {
    Primary,
    Secondary,
    Accent,
    Dim,
    Winner,
    Live,
    Qualifying,
    Error,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Theme {
    #[default]
    Dark,
}

pub fn resolve(color: Palette, _theme: Theme) -> Style {
    match color {
        Palette::Primary => Style::default().fg(Color::Rgb(0, 122, 195)),
        Palette::Secondary => Style::default().fg(Color::Rgb(255, 103, 31)),
        Palette::Accent => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        Palette::Dim => Style::default().fg(Color::Indexed(240)),
        Palette::Winner => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        Palette::Live => Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
        Palette::Qualifying => Style::default().fg(Color::Green),
        Palette::Error => Style::default().fg(Color::Red),
    }
}

/// ADL in blue, BDL in orange, untagged teams dimmed.
pub fn league_style(league: Option<League>, theme: Theme) -> Style {
    match league {
        Some(League::Adl) => resolve(Palette::Primary, theme),
        Some(League::Bdl) => resolve(Palette::Secondary, theme),
        None => resolve(Palette::Dim, theme),
    }
}

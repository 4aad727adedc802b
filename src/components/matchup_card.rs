use cc_api::view::{MatchupCard, SideView, score_or_dash};
use tui::style::{Color, Style};
use tui::text::{Line, Span};

use crate::components::theme::{Palette, Theme, resolve};

const LABEL_W: usize = 3;
const SCORE_W: usize = 7;
const WINNER_MARK: &str = " ✓";

/// When a side's score is shown instead of "-".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreDisplay {
    /// Each side shows its score once it is above zero.
    PerSide,
    /// Both sides show their scores once either is above zero.
    Pair,
}

/// Home line, away line, status line.
pub fn card_lines(card: &MatchupCard, width: u16, display: ScoreDisplay, theme: Theme) -> Vec<Line<'static>> {
    let either = card.home.score > 0.0 || card.away.score > 0.0;
    let show = |side: &SideView| match display {
        ScoreDisplay::PerSide => side.score > 0.0,
        ScoreDisplay::Pair => either,
    };
    vec![
        side_line(&card.home, show(&card.home), width as usize, theme),
        side_line(&card.away, show(&card.away), width as usize, theme),
        status_line(card, theme),
    ]
}

pub fn status_text(card: &MatchupCard) -> String {
    if card.complete {
        "FINAL".into()
    } else if card.live {
        let playing = card.home.playing + card.away.playing;
        let to_play = card.home.yet_to_play + card.away.yet_to_play;
        format!("LIVE  {playing} playing, {to_play} to play")
    } else {
        "UPCOMING".into()
    }
}

fn status_line(card: &MatchupCard, theme: Theme) -> Line<'static> {
    let style = if card.live && !card.complete {
        resolve(Palette::Live, theme)
    } else {
        resolve(Palette::Dim, theme)
    };
    Line::from(vec![
        Span::raw(" ".repeat(LABEL_W + 1)),
        Span::styled(status_text(card), style),
    ])
}

fn side_line(side: &SideView, show_score: bool, width: usize, theme: Theme) -> Line<'static> {
    let label = side.label.as_deref().unwrap_or("");
    let score = score_or_dash(side.score, show_score);
    let name_w = width.saturating_sub(LABEL_W + SCORE_W + WINNER_MARK.chars().count() + 2);
    let name = fit(&side.name, name_w);
    let style = if side.is_winner {
        resolve(Palette::Winner, theme)
    } else {
        Style::default().fg(Color::Gray)
    };

    Line::from(vec![
        Span::styled(format!("{:>w$} ", fit(label, LABEL_W), w = LABEL_W), resolve(Palette::Dim, theme)),
        Span::styled(format!("{:<w$} ", name, w = name_w), style),
        Span::styled(format!("{:>w$}", score, w = SCORE_W), style),
        Span::styled(if side.is_winner { WINNER_MARK } else { "  " }, style),
    ])
}

pub fn fit(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

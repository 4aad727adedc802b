use cc_api::view::{MatchupCard, SideView};
use cc_api::bracket_round_label;
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::widgets::Widget;

use crate::components::matchup_card::{fit, status_text};
use crate::components::theme::{Palette, Theme, resolve};

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

/// Rows per game cell: home line, status line, away line.
pub const GAME_HEIGHT: u16 = 3;

/// Slot heights per bracket depth (d=0 = Sweet 16 leaf, d=3 = Championship root).
/// Formula: SH[0] = GAME_HEIGHT; SH[d] = 2 * SH[d-1] + 1.
const SH: [u16; 4] = [
    GAME_HEIGHT,                             // Sweet 16:      3
    2 * GAME_HEIGHT + 1,                     // Elite 8:       7
    2 * (2 * GAME_HEIGHT + 1) + 1,           // Final 4:      15
    2 * (2 * (2 * GAME_HEIGHT + 1) + 1) + 1, // Championship: 31
];

/// Rows used by the whole bracket below the header. Equals SH[3] = 31.
pub const BRACKET_HEIGHT: u16 = SH[3];

/// Header row with round names plus a blank spacer.
pub const HEADER_HEIGHT: u16 = 2;

/// Width of the connector zone drawn between adjacent round columns.
pub const CONNECTOR_WIDTH: u16 = 3;

/// Widest game cell.
const CELL_W_FULL: u16 = 28;

/// Narrowest game cell that still shows a seed, a name and a score.
pub const CELL_W_MIN: u16 = 16;

/// Games per round, Sweet 16 first.
pub const GAMES_PER_ROUND: [usize; 4] = [8, 4, 2, 1];

// ---------------------------------------------------------------------------
// GameCell — pre-computed position for one game
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct GameCell {
    /// Row of the status line (center of the 3-row cell), relative to the
    /// top of the bracket body. Not scroll-adjusted.
    pub center_row: u16,
    /// Starting x-column, relative to the area.
    pub col: u16,
    pub cell_width: u16,
    /// 0 = Sweet 16 .. 3 = Championship.
    pub depth: usize,
    /// Index of this game within its round, in sheet order.
    pub game_idx: usize,
}

// ---------------------------------------------------------------------------
// BracketGrid — layout engine
// ---------------------------------------------------------------------------

/// Column order left → right: Sweet 16 | conn | Elite 8 | conn | Final 4 | conn | Championship
#[derive(Debug, Clone)]
pub struct BracketGrid {
    /// Depth-major: 8 + 4 + 2 + 1 = 15 cells.
    pub cells: Vec<GameCell>,
    pub round_cols: [u16; 4],
    pub cell_width: u16,
}

impl BracketGrid {
    /// `4 * cell_width + 3 * CONNECTOR_WIDTH <= width`, capped at `CELL_W_FULL`.
    ///
    /// Center rows follow the triangle formula:
    ///   center[d][i] = SH[d]/2 + i * (SH[d+1] - SH[d])
    ///
    ///   Sweet 16     (d=0): [1, 5, 9, 13, 17, 21, 25, 29]
    ///   Elite 8      (d=1): [3, 11, 19, 27]
    ///   Final 4      (d=2): [7, 23]
    ///   Championship (d=3): [15]
    pub fn compute(width: u16) -> Self {
        let per_col = width.saturating_sub(CONNECTOR_WIDTH * 3) / 4;
        let cell_width = per_col.clamp(1, CELL_W_FULL);
        let stride = cell_width + CONNECTOR_WIDTH;
        let round_cols = [0u16, stride, stride * 2, stride * 3];

        let first_center = [SH[0] / 2, SH[1] / 2, SH[2] / 2, SH[3] / 2];
        let spacing: [u16; 4] = [SH[1] - SH[0], SH[2] - SH[1], SH[3] - SH[2], 0];

        let mut cells = Vec::with_capacity(15);
        for (depth, games) in GAMES_PER_ROUND.iter().enumerate() {
            for i in 0..*games {
                cells.push(GameCell {
                    center_row: first_center[depth] + i as u16 * spacing[depth],
                    col: round_cols[depth],
                    cell_width,
                    depth,
                    game_idx: i,
                });
            }
        }

        Self { cells, round_cols, cell_width }
    }

    /// Cells for a depth (0 = Sweet 16 .. 3 = Championship).
    pub fn cells_for_depth(&self, depth: usize) -> &[GameCell] {
        const OFFSETS: [usize; 5] = [0, 8, 12, 14, 15];
        &self.cells[OFFSETS[depth]..OFFSETS[depth + 1]]
    }

    /// Whether the full bracket fits `width` without squashing names.
    pub fn fits(width: u16) -> bool {
        width >= CELL_W_MIN * 4 + CONNECTOR_WIDTH * 3
    }
}

// ---------------------------------------------------------------------------
// CupBracket widget
// ---------------------------------------------------------------------------

/// Sweet 16 through Championship as one left-to-right tree.
pub struct CupBracket<'a> {
    /// Cards per round, Sweet 16 first. A short round leaves empty slots.
    pub rounds: &'a [Vec<MatchupCard>; 4],
    pub grid: &'a BracketGrid,
    /// Round in play, highlighted in the header.
    pub current_round: Option<u32>,
    pub scroll_offset: u16,
    pub theme: Theme,
}

impl<'a> Widget for CupBracket<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < HEADER_HEIGHT + GAME_HEIGHT {
            return;
        }

        draw_header(&self, area, buf);

        let body = Rect {
            y: area.y + HEADER_HEIGHT,
            height: area.height - HEADER_HEIGHT,
            ..area
        };

        // Pass 1: game cells
        for cell in &self.grid.cells {
            let card = self.rounds[cell.depth].get(cell.game_idx);
            draw_game_cell(card, cell, body, self.scroll_offset, self.theme, buf);
        }

        // Pass 2: connectors. Each parent at depth d+1 joins two children at depth d.
        for depth in 0..3usize {
            let child_cells = self.grid.cells_for_depth(depth);
            let parent_cells = self.grid.cells_for_depth(depth + 1);
            let conn_x = body.x + self.grid.round_cols[depth] + self.grid.cell_width;

            for (j, parent) in parent_cells.iter().enumerate() {
                draw_connector(
                    child_cells[2 * j].center_row,
                    parent.center_row,
                    child_cells[2 * j + 1].center_row,
                    conn_x,
                    body,
                    self.scroll_offset,
                    self.theme,
                    buf,
                );
            }
        }
    }
}

fn draw_header(view: &CupBracket, area: Rect, buf: &mut Buffer) {
    let limit_x = area.x + area.width;
    for (depth, col) in view.grid.round_cols.iter().enumerate() {
        let x = area.x + col;
        if x >= limit_x {
            break;
        }
        let round = depth as u32 + 1;
        let style = if view.current_round == Some(round) {
            resolve(Palette::Accent, view.theme)
        } else {
            resolve(Palette::Dim, view.theme)
        };
        let avail = (limit_x - x).min(view.grid.cell_width) as usize;
        buf.set_string(x, area.y, fit(bracket_round_label(round), avail), style);
    }
}

// ---------------------------------------------------------------------------
// Drawing helpers
// ---------------------------------------------------------------------------

/// Bracket-relative row to screen y, `None` when scrolled out of view.
fn screen_y(bracket_row: u16, scroll: u16, area: Rect) -> Option<u16> {
    if bracket_row < scroll {
        return None;
    }
    let rel = bracket_row - scroll;
    if rel >= area.height {
        return None;
    }
    Some(area.y + rel)
}

fn draw_game_cell(
    card: Option<&MatchupCard>,
    cell: &GameCell,
    area: Rect,
    scroll: u16,
    theme: Theme,
    buf: &mut Buffer,
) {
    let x = area.x + cell.col;
    if x >= area.x + area.width {
        return;
    }
    let avail_w = (area.x + area.width).saturating_sub(x) as usize;

    let top_row = cell.center_row.saturating_sub(1);
    let mid_row = cell.center_row;
    let bot_row = cell.center_row.saturating_add(1);

    for (bracket_row, slot_idx) in [(top_row, 0u8), (mid_row, 1), (bot_row, 2)] {
        let Some(sy) = screen_y(bracket_row, scroll, area) else {
            continue;
        };

        let content = format_game_row(card, slot_idx, cell.cell_width as usize);
        let text: String = content.chars().take(avail_w).collect();

        let style = match (slot_idx, card) {
            (1, Some(c)) if c.live && !c.complete => resolve(Palette::Live, theme),
            (1, _) | (_, None) => resolve(Palette::Dim, theme),
            (0, Some(c)) => side_style(&c.home, theme),
            (_, Some(c)) => side_style(&c.away, theme),
        };

        buf.set_string(x, sy, &text, style);
    }
}

fn side_style(side: &SideView, theme: Theme) -> Style {
    if side.is_winner {
        resolve(Palette::Winner, theme).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    }
}

/// `slot_idx`: 0 = home line, 1 = status line, 2 = away line.
fn format_game_row(card: Option<&MatchupCard>, slot_idx: u8, width: usize) -> String {
    let Some(card) = card else {
        return match slot_idx {
            1 => " ".repeat(width),
            _ => format_placeholder_line(width),
        };
    };
    match slot_idx {
        0 => format_side_line(&card.home, width),
        2 => format_side_line(&card.away, width),
        _ => format!("{:<width$}", format!(" {}", status_text(card)), width = width)
            .chars()
            .take(width)
            .collect(),
    }
}

/// `"[seed] [name      ] [score] "`: seed(3) + sp + name + sp + score(6) + sp = width.
fn format_side_line(side: &SideView, width: usize) -> String {
    let seed = fit(side.label.as_deref().unwrap_or(""), 3);
    let score = side.score_text();
    let name_w = width.saturating_sub(12);
    format!(
        "{:>3} {:<name_w$} {:>6} ",
        seed,
        fit(&side.name, name_w),
        fit(&score, 6),
        name_w = name_w
    )
}

fn format_placeholder_line(width: usize) -> String {
    let name_w = width.saturating_sub(12);
    format!("    {:<name_w$}        ", "TBD", name_w = name_w)
}

/// Box-drawing connector between one parent and its two children.
///
/// ```text
///  child_top  ──┐
///               │
///  parent     ──├──
///               │
///  child_bot  ──┘
/// ```
#[allow(clippy::too_many_arguments)]
fn draw_connector(
    r_top: u16,
    r_mid: u16,
    r_bot: u16,
    conn_base_x: u16,
    area: Rect,
    scroll: u16,
    theme: Theme,
    buf: &mut Buffer,
) {
    let style = resolve(Palette::Dim, theme);
    let col_a = conn_base_x;
    let col_b = conn_base_x + 1;
    let col_c = conn_base_x + 2;
    let limit_x = area.x + area.width;

    macro_rules! put {
        ($x:expr, $row:expr, $ch:expr) => {
            if $x < limit_x {
                if let Some(sy) = screen_y($row, scroll, area) {
                    put_char(buf, $x, sy, $ch, style);
                }
            }
        };
    }

    put!(col_a, r_top, '─');
    put!(col_b, r_top, '┐');
    for row in (r_top + 1)..r_mid {
        put!(col_b, row, '│');
    }
    put!(col_a, r_mid, '─');
    put!(col_b, r_mid, '├');
    put!(col_c, r_mid, '─');
    for row in (r_mid + 1)..r_bot {
        put!(col_b, row, '│');
    }
    put!(col_a, r_bot, '─');
    put!(col_b, r_bot, '┘');
}

fn put_char(buf: &mut Buffer, x: u16, y: u16, ch: char, style: Style) {
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_char(ch);
        cell.set_style(style);
    }
}

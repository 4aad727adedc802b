use log::error;
use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, Tabs, Wrap};
use tui::{Frame, Terminal};
use tui_logger::{TuiLoggerLevelOutput, TuiLoggerWidget};

use crate::app::{App, MenuItem};
use crate::components::bracket::{BRACKET_HEIGHT, BracketGrid, CupBracket, HEADER_HEIGHT};
use crate::components::matchup_card::{ScoreDisplay, card_lines, fit};
use crate::components::rules::rules_lines;
use crate::components::theme::{Palette, Theme, league_style, resolve};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use cc_api::view::{self, CurrentWeek, Dashboard, MarginPick, MatchupCard, PRIZE_POOL, Streak};
use cc_api::{Franchise, GROUPS, League, TOTAL_TEAMS, Tables, bracket_round_label, format_score};

/// Widest a matchup card is drawn, however wide the pane.
const CARD_MAX_WIDTH: u16 = 64;

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        draw_active_tab(f, layout.main, app);

        if app.state.show_logs {
            draw_logs(f, layout.logs);
        }

        draw_loading_spinner(f, f.area(), &layout, app, loading);
    });

    if let Err(e) = result {
        error!("Failed to draw: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn titled<'a>(title: impl Into<String>) -> Block<'a> {
    default_border(Color::White).title(format!(" {} ", title.into()))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = app
        .state
        .active_tab
        .tab_index()
        .or(app.state.previous_tab.tab_index())
        .unwrap_or(0);

    let titles: Vec<Line> = MenuItem::TABS
        .iter()
        .enumerate()
        .map(|(i, t)| Line::from(format!("{} {}", i + 1, t.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let updated = match app.state.last_updated {
        Some(at) => format!("Updated {}", at.format("%H:%M:%S")),
        None => "Not loaded".to_string(),
    };
    let updated_style = if app.state.last_failures.is_empty() {
        Style::default().fg(Color::Gray)
    } else {
        resolve(Palette::Error, Theme::default())
    };
    let status = Paragraph::new(Line::from(vec![
        Span::styled(updated, updated_style),
        Span::raw("  Help: ? "),
    ]))
    .alignment(Alignment::Right)
    .block(
        Block::default()
            .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
            .border_type(border_type),
    )
    .style(style);
    f.render_widget(status, tab_bar[1]);
}

fn draw_active_tab(f: &mut Frame, area: Rect, app: &App) {
    let tab = app.state.active_tab;
    match tab {
        MenuItem::Rules => return draw_rules(f, area, app),
        MenuItem::Help => return draw_help(f, area),
        _ => {}
    }

    let Some(tables) = app.state.tables.as_ref() else {
        draw_loading(f, area, tab, app);
        return;
    };

    match tab {
        MenuItem::Dashboard => draw_dashboard(f, area, app, tables),
        MenuItem::Standings => draw_standings(f, area, tables),
        MenuItem::Matchups => draw_matchups(f, area, app, tables),
        MenuItem::Bracket => draw_bracket(f, area, app, tables),
        MenuItem::Teams => draw_teams(f, area, app, tables),
        MenuItem::History => draw_history(f, area, app, tables),
        MenuItem::Rules | MenuItem::Help => {}
    }
}

fn draw_loading(f: &mut Frame, area: Rect, tab: MenuItem, app: &App) {
    let block = titled(tab.title());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let msg = if let Some(err) = app.state.last_error.as_deref() {
        format!("Sheet load failed:\n{err}\n\nPress r to retry")
    } else {
        "Loading sheets...".to_string()
    };
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        inner,
    );
}

fn section(title: impl Into<String>, theme: Theme) -> Line<'static> {
    Line::from(Span::styled(title.into(), resolve(Palette::Accent, theme)))
}

fn dim(text: impl Into<String>, theme: Theme) -> Line<'static> {
    Line::from(Span::styled(text.into(), resolve(Palette::Dim, theme)))
}

fn card_width(area: Rect) -> u16 {
    area.width.min(CARD_MAX_WIDTH)
}

fn push_cards(
    lines: &mut Vec<Line<'static>>,
    cards: impl IntoIterator<Item = MatchupCard>,
    width: u16,
    display: ScoreDisplay,
    theme: Theme,
) {
    for card in cards {
        lines.extend(card_lines(&card, width, display, theme));
        lines.push(Line::from(""));
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

fn draw_dashboard(f: &mut Frame, area: Rect, app: &App, tables: &Tables) {
    let theme = Theme::default();
    let board = Dashboard::build(tables);

    let block = titled("Commissioner's Cup");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [header, stats, body] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(4), Constraint::Fill(1)]).areas(inner);

    let mut header_spans = vec![
        Span::styled(format!("NFL Week {}", board.nfl_week), Style::default().fg(Color::White)),
        Span::styled(format!("  {}", board.phase.label()), resolve(Palette::Accent, theme)),
    ];
    if !app.state.last_failures.is_empty() {
        let names: Vec<&str> = app.state.last_failures.iter().map(|s| s.sheet.name()).collect();
        header_spans.push(Span::styled(
            format!("  last refresh failed: {}", names.join(", ")),
            resolve(Palette::Error, theme),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(header_spans)), header);

    draw_stat_cards(f, stats, &board, tables, theme);

    let [week_area, leaders_area] = if body.width >= 90 {
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(body)
    } else {
        Layout::vertical([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(body)
    };

    let week_block = default_border(Color::DarkGray).title(current_week_title(&board.current_week));
    let week_inner = week_block.inner(week_area);
    f.render_widget(week_block, week_area);
    let week_lines = current_week_lines(tables, &board.current_week, card_width(week_inner), theme);
    f.render_widget(Paragraph::new(week_lines).scroll((app.state.scroll.offset, 0)), week_inner);

    let leaders_block = default_border(Color::DarkGray).title(" Leaders ");
    let leaders_inner = leaders_block.inner(leaders_area);
    f.render_widget(leaders_block, leaders_area);
    f.render_widget(
        Paragraph::new(leader_lines(tables, &board, leaders_inner.width, theme)),
        leaders_inner,
    );
}

fn draw_stat_cards(f: &mut Frame, area: Rect, board: &Dashboard, tables: &Tables, theme: Theme) {
    let cols: [Rect; 4] = Layout::horizontal([Constraint::Percentage(25); 4]).areas(area);

    let high = match board.high_scorer {
        Some(live) => (
            "High Scorer",
            format_score(live.score),
            tables.team_name(live.franchise_id.as_deref()).to_string(),
        ),
        None => ("Prize Pool", format!("${PRIZE_POOL}"), format!("{TOTAL_TEAMS} teams")),
    };

    let cards = [
        ("Phase", board.phase.label().to_string(), board.phase.detail()),
        ("Teams Left", board.teams_remaining.to_string(), format!("of {TOTAL_TEAMS}")),
        (
            "Matchups",
            format!("{}/{}", board.matchups_complete, board.matchups_total),
            "complete".to_string(),
        ),
        high,
    ];

    for (rect, (title, value, detail)) in cols.into_iter().zip(cards) {
        let block = default_border(Color::DarkGray).title(format!(" {title} "));
        let inner = block.inner(rect);
        f.render_widget(block, rect);
        let lines = vec![
            Line::from(Span::styled(value, resolve(Palette::Accent, theme))),
            dim(fit(&detail, inner.width as usize), theme),
        ];
        f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
    }
}

fn current_week_title(current: &CurrentWeek) -> String {
    match current {
        CurrentWeek::Group { week, .. } => format!(" Group Play Week {week} "),
        CurrentWeek::Bracket { round, .. } => format!(" {} ", bracket_round_label(*round)),
        CurrentWeek::None => " This Week ".to_string(),
    }
}

fn current_week_lines(tables: &Tables, current: &CurrentWeek, width: u16, theme: Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    match current {
        CurrentWeek::Group { groups, .. } => {
            for (letter, matchups) in groups {
                lines.push(section(format!("Group {letter}"), theme));
                let cards = matchups.iter().map(|m| MatchupCard::group(tables, m));
                push_cards(&mut lines, cards, width, ScoreDisplay::PerSide, theme);
            }
        }
        CurrentWeek::Bracket { matchups, .. } => {
            let cards = matchups.iter().map(|m| MatchupCard::bracket(tables, m));
            push_cards(&mut lines, cards, width, ScoreDisplay::PerSide, theme);
        }
        CurrentWeek::None => {}
    }

    if lines.is_empty() {
        lines.push(dim("No matchups this week", theme));
    }
    lines
}

fn margin_lines(title: &str, pick: Option<MarginPick>, tables: &Tables, theme: Theme) -> Vec<Line<'static>> {
    let mut lines = vec![section(title, theme)];
    match pick {
        Some(p) => {
            let m = p.matchup;
            lines.push(Line::from(format!(
                "  {} {} - {} {}",
                tables.team_name(m.home_id.as_deref()),
                format_score(m.home_score),
                format_score(m.away_score),
                tables.team_name(m.away_id.as_deref()),
            )));
            lines.push(dim(format!("  margin {}", format_score(p.margin)), theme));
        }
        None => lines.push(dim("  -", theme)),
    }
    lines
}

fn streak_line(title: &str, pick: Option<(&str, u32)>, won: bool, tables: &Tables, theme: Theme) -> Line<'static> {
    let value = match pick {
        Some((id, n)) => {
            let streak = if won { Streak::Win(n) } else { Streak::Loss(n) };
            format!("{} {}", tables.team_name(Some(id)), streak.label())
        }
        None => "-".to_string(),
    };
    let style = match (pick, won) {
        (None, _) => resolve(Palette::Dim, theme),
        (Some(_), true) => resolve(Palette::Winner, theme),
        (Some(_), false) => resolve(Palette::Error, theme),
    };
    Line::from(vec![Span::raw(format!("{title:<13}")), Span::styled(value, style)])
}

fn leader_lines(tables: &Tables, board: &Dashboard, width: u16, theme: Theme) -> Vec<Line<'static>> {
    let mut lines = vec![section("Top 4", theme)];
    if board.top_four.is_empty() {
        lines.push(dim("  -", theme));
    }
    let name_w = (width as usize).saturating_sub(22);
    for (i, s) in board.top_four.iter().enumerate() {
        let name = fit(tables.team_name(s.franchise_id.as_deref()), name_w);
        lines.push(Line::from(vec![
            Span::raw(format!("  {}. {:<name_w$} ", i + 1, name, name_w = name_w)),
            Span::styled(format!("{}-{}", s.wins, s.losses), Style::default().fg(Color::White)),
            Span::styled(format!(" {:>8}", format_score(s.points_for)), resolve(Palette::Dim, theme)),
        ]));
    }

    lines.push(Line::from(""));
    lines.extend(margin_lines("Closest Matchup", board.closest, tables, theme));
    lines.push(Line::from(""));
    lines.extend(margin_lines("Biggest Blowout", board.blowout, tables, theme));
    lines.push(Line::from(""));
    lines.push(streak_line("Hot Streak", board.hot_streak(), true, tables, theme));
    lines.push(streak_line("Cold Streak", board.cold_streak(), false, tables, theme));
    lines.push(Line::from(vec![
        Span::raw(format!("{:<13}", "Avg Points")),
        Span::styled(format_score(board.average_points), Style::default().fg(Color::White)),
    ]));
    lines
}

// ---------------------------------------------------------------------------
// Standings
// ---------------------------------------------------------------------------

fn draw_standings(f: &mut Frame, area: Rect, tables: &Tables) {
    let theme = Theme::default();
    let block = titled("Group Standings");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [grid, legend] = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);
    let [top, bottom] = Layout::vertical([Constraint::Fill(1); 2]).areas(grid);
    let [a, b] = Layout::horizontal([Constraint::Fill(1); 2]).areas(top);
    let [c, d] = Layout::horizontal([Constraint::Fill(1); 2]).areas(bottom);

    let streaks = view::compute_streaks(&tables.franchises, &tables.group_matchups);
    for (group, rect) in GROUPS.iter().zip([a, b, c, d]) {
        let rows: Vec<Row> = view::group_table(&tables.group_standings, group)
            .into_iter()
            .map(|row| {
                let s = row.standing;
                let style = if row.qualifying {
                    resolve(Palette::Qualifying, theme)
                } else {
                    Style::default().fg(Color::Gray)
                };
                let streak = s.franchise_id.as_deref().map_or(Streak::None, |id| streaks.get(id));
                Row::new(vec![
                    Cell::from(s.rank.to_string()),
                    Cell::from(tables.team_name(s.franchise_id.as_deref()).to_string()),
                    Cell::from(format!("{}-{}", s.wins, s.losses)),
                    Cell::from(format_score(s.points_for)),
                    Cell::from(streak.label()),
                ])
                .style(style)
            })
            .collect();

        let widths = [
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(5),
            Constraint::Length(8),
            Constraint::Length(4),
        ];
        let table = Table::new(rows, widths)
            .header(Row::new(vec!["#", "Team", "W-L", "PF", "Strk"]).style(resolve(Palette::Dim, theme)))
            .block(default_border(Color::DarkGray).title(format!(" Group {group} ")));
        f.render_widget(table, rect);
    }

    f.render_widget(
        Paragraph::new(dim("Top 4 in each group advance to the Sweet 16", theme)).alignment(Alignment::Center),
        legend,
    );
}

// ---------------------------------------------------------------------------
// Matchups
// ---------------------------------------------------------------------------

fn draw_matchups(f: &mut Frame, area: Rect, app: &App, tables: &Tables) {
    let theme = Theme::default();
    let block = titled("Group Play Matchups");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let weeks = view::group_play_weeks(tables);
    if weeks.is_empty() {
        f.render_widget(
            Paragraph::new("Group play schedule not posted yet")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let width = card_width(inner);
    let mut lines = Vec::new();
    for week in weeks {
        let mut title = vec![
            Span::styled(format!("Week {}", week.week), resolve(Palette::Accent, theme)),
            Span::styled(format!("  NFL Week {}", week.nfl_week), resolve(Palette::Dim, theme)),
        ];
        if week.is_current {
            title.push(Span::styled("  ◀ CURRENT", resolve(Palette::Live, theme)));
        }
        lines.push(Line::from(title));
        for (letter, matchups) in &week.groups {
            lines.push(Line::from(Span::styled(
                format!(" Group {letter}"),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )));
            push_cards(
                &mut lines,
                matchups.iter().map(|m| MatchupCard::group_result(tables, m)),
                width,
                ScoreDisplay::Pair,
                theme,
            );
        }
    }

    f.render_widget(Paragraph::new(lines).scroll((app.state.scroll.offset, 0)), inner);
}

// ---------------------------------------------------------------------------
// Bracket
// ---------------------------------------------------------------------------

fn draw_bracket(f: &mut Frame, area: Rect, app: &App, tables: &Tables) {
    let theme = Theme::default();
    let block = titled("Bracket");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if tables.bracket_matchups.is_empty() {
        f.render_widget(
            Paragraph::new("Bracket play begins NFL Week 14\nThe top 4 from each group advance")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let current_round = tables.phase().bracket_round();

    if BracketGrid::fits(inner.width) {
        let rounds: [Vec<MatchupCard>; 4] = std::array::from_fn(|i| {
            tables
                .bracket_matchups
                .iter()
                .filter(|m| m.round == i as u32 + 1)
                .map(|m| MatchupCard::bracket_result(tables, m))
                .collect()
        });
        let grid = BracketGrid::compute(inner.width);
        let max_scroll = (HEADER_HEIGHT + BRACKET_HEIGHT).saturating_sub(inner.height);
        f.render_widget(
            CupBracket {
                rounds: &rounds,
                grid: &grid,
                current_round,
                scroll_offset: app.state.scroll.offset.min(max_scroll),
                theme,
            },
            inner,
        );
        return;
    }

    // Too narrow for the tree: list the rounds instead.
    let width = card_width(inner);
    let mut lines = Vec::new();
    for round in view::bracket_rounds(tables) {
        let mut title = vec![Span::styled(round.name, resolve(Palette::Accent, theme))];
        if current_round == Some(round.round) {
            title.push(Span::styled("  ◀ CURRENT", resolve(Palette::Live, theme)));
        }
        lines.push(Line::from(title));
        push_cards(
            &mut lines,
            round.matchups.iter().map(|m| MatchupCard::bracket_result(tables, m)),
            width,
            ScoreDisplay::PerSide,
            theme,
        );
    }
    f.render_widget(Paragraph::new(lines).scroll((app.state.scroll.offset, 0)), inner);
}

// ---------------------------------------------------------------------------
// Teams / History / Rules / Help
// ---------------------------------------------------------------------------

fn roster_lines(franchises: &[&Franchise], theme: Theme) -> Vec<Line<'static>> {
    if franchises.is_empty() {
        return vec![dim("No teams", theme)];
    }
    franchises
        .iter()
        .map(|f| {
            Line::from(vec![
                Span::styled(f.name.clone(), Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
                Span::styled(format!("  {}", f.owner), resolve(Palette::Dim, theme)),
            ])
        })
        .collect()
}

fn draw_teams(f: &mut Frame, area: Rect, app: &App, tables: &Tables) {
    let theme = Theme::default();
    let rosters = view::teams_by_league(&tables.franchises);

    let [adl_area, bdl_area] = Layout::horizontal([Constraint::Fill(1); 2]).areas(area);
    for (league, teams, rect) in [(League::Adl, &rosters.adl, adl_area), (League::Bdl, &rosters.bdl, bdl_area)] {
        let block = default_border(Color::White)
            .border_style(league_style(Some(league), theme))
            .title(format!(" {} ({}) ", league.label(), teams.len()));
        f.render_widget(
            Paragraph::new(roster_lines(teams, theme))
                .block(block)
                .scroll((app.state.scroll.offset, 0)),
            rect,
        );
    }
}

fn draw_history(f: &mut Frame, area: Rect, app: &App, tables: &Tables) {
    let theme = Theme::default();
    let block = titled("Champions");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let (champions, summary) = view::champions(&tables.history);
    if champions.is_empty() {
        f.render_widget(
            Paragraph::new("No champions recorded yet")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let [summary_area, table_area] = Layout::vertical([Constraint::Length(2), Constraint::Fill(1)]).areas(inner);
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{} tournaments", summary.total), Style::default().fg(Color::White)),
            Span::styled(format!("  ADL {}", summary.adl), league_style(Some(League::Adl), theme)),
            Span::styled(format!("  BDL {}", summary.bdl), league_style(Some(League::Bdl), theme)),
        ])),
        summary_area,
    );

    let rows: Vec<Row> = champions
        .iter()
        .skip(app.state.scroll.offset as usize)
        .map(|row| {
            let h = row.entry;
            let style = if row.is_current {
                resolve(Palette::Winner, theme)
            } else {
                Style::default().fg(Color::Gray)
            };
            Row::new(vec![
                Cell::from(h.year.map(|y| y.to_string()).unwrap_or_default()),
                Cell::from(h.champion.clone()),
                Cell::from(h.owner.clone()),
                Cell::from(Span::styled(h.league.map_or("", |l| l.label()), league_style(h.league, theme))),
                Cell::from(if row.is_current { "CURRENT CHAMPION" } else { "" }),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Fill(2),
        Constraint::Fill(1),
        Constraint::Length(6),
        Constraint::Length(17),
    ];
    let table = Table::new(rows, widths)
        .header(Row::new(vec!["Year", "Champion", "Owner", "League", ""]).style(resolve(Palette::Dim, theme)));
    f.render_widget(table, table_area);
}

fn draw_rules(f: &mut Frame, area: Rect, app: &App) {
    f.render_widget(
        Paragraph::new(rules_lines(Theme::default()))
            .block(titled("Rules"))
            .wrap(Wrap { trim: false })
            .scroll((app.state.scroll.offset, 0)),
        area,
    );
}

const HELP: &[(&str, &str)] = &[
    ("1-7", "jump to a tab"),
    ("h / l, ← / →", "previous / next tab"),
    ("j / k, ↓ / ↑", "scroll"),
    ("r", "refresh now"),
    ("f", "toggle full screen"),
    ("\"", "toggle log pane"),
    ("?", "this help"),
    ("Esc", "close help"),
    ("q, Ctrl-C", "quit"),
];

fn draw_help(f: &mut Frame, area: Rect) {
    let theme = Theme::default();
    let mut lines = vec![section("Keys", theme), Line::from("")];
    lines.extend(HELP.iter().map(|(key, action)| {
        Line::from(vec![
            Span::styled(format!("  {key:<16}"), Style::default().fg(Color::White)),
            Span::styled(*action, resolve(Palette::Dim, theme)),
        ])
    }));
    f.render_widget(Paragraph::new(lines).block(titled("Help")), area);
}

// ---------------------------------------------------------------------------
// Chrome
// ---------------------------------------------------------------------------

fn draw_logs(f: &mut Frame, area: Rect) {
    let logger = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Cyan))
        .style_debug(Style::default().fg(Color::Green))
        .style_trace(Style::default().fg(Color::Magenta))
        .output_separator(' ')
        .output_timestamp(Some("%H:%M:%S".to_string()))
        .output_level(Some(TuiLoggerLevelOutput::Abbreviated))
        .output_target(false)
        .output_file(false)
        .output_line(false);
    f.render_widget(logger, area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, layout: &LayoutAreas, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string()).style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(layout.tab_bar[1].x + 1, 1, 1, 1)
    };
    f.render_widget(spinner, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::app_settings::AppSettings;
    use cc_api::{
        BracketMatchup, CURRENT_WEEK_KEY, CellValue, ConfigEntry, GroupMatchup, GroupStanding, HistoryEntry,
        LiveScore, Matchup,
    };
    use tui::backend::TestBackend;

    fn franchise(id: &str, name: &str, league: League) -> Franchise {
        Franchise {
            id: Some(id.into()),
            name: name.into(),
            owner: format!("Owner {id}"),
            logo_url: None,
            league: Some(league),
        }
    }

    fn matchup(home: &str, away: &str, home_score: f64, away_score: f64) -> Matchup {
        Matchup {
            home_id: Some(home.into()),
            away_id: Some(away.into()),
            home_score,
            away_score,
            winner_id: (home_score > away_score).then(|| home.to_string()),
        }
    }

    fn tables(nfl_week: f64) -> Tables {
        Tables {
            franchises: vec![
                franchise("1", "Touchdown Titans", League::Adl),
                franchise("2", "Blitz Brigade", League::Bdl),
            ],
            group_matchups: vec![GroupMatchup {
                week: 2,
                group: "A".into(),
                home_label: Some("A1".into()),
                away_label: Some("A2".into()),
                loser_id: Some("2".into()),
                matchup: matchup("1", "2", 110.4, 95.25),
            }],
            group_standings: vec![GroupStanding {
                group: "A".into(),
                franchise_id: Some("1".into()),
                wins: 2,
                losses: 0,
                points_for: 220.0,
                rank: 1,
            }],
            bracket_matchups: vec![BracketMatchup {
                round: 1,
                home_seed: Some("1".into()),
                away_seed: Some("16".into()),
                matchup: matchup("1", "2", 0.0, 0.0),
            }],
            config: vec![ConfigEntry { key: CURRENT_WEEK_KEY.into(), value: CellValue::Number(nfl_week) }],
            history: vec![HistoryEntry {
                year: Some(2024),
                champion: "Touchdown Titans".into(),
                owner: "Owner 1".into(),
                league: Some(League::Adl),
                logo_url: None,
            }],
            ..Default::default()
        }
    }

    fn render(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        draw(&mut terminal, app, LoadingState::default());
        let buf = terminal.backend().buffer().clone();
        (0..height)
            .map(|y| (0..width).map(|x| buf[(x, y)].symbol().to_string()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app_on(tab: MenuItem, nfl_week: f64) -> App {
        let mut app = App::with_settings(AppSettings::default());
        app.on_tables_loaded(tables(nfl_week));
        app.update_tab(tab);
        app
    }

    #[test]
    fn loading_placeholder_before_first_refresh() {
        let mut app = App::with_settings(AppSettings::default());
        let screen = render(&mut app, 100, 30);
        assert!(screen.contains("1 Dashboard"));
        assert!(screen.contains("Loading sheets..."));
        assert!(screen.contains("Not loaded"));
    }

    #[test]
    fn dashboard_shows_phase_and_current_week() {
        let mut app = app_on(MenuItem::Dashboard, 10.0);
        let screen = render(&mut app, 120, 40);
        assert!(screen.contains("NFL Week 10"));
        assert!(screen.contains("Group Stage"));
        assert!(screen.contains("Week 2 of 5"));
        assert!(screen.contains("Group Play Week 2"));
        assert!(screen.contains("Touchdown Titans"));
        assert!(screen.contains("Prize Pool"));
        assert!(screen.contains("$600"));
    }

    #[test]
    fn standings_list_every_group() {
        let mut app = app_on(MenuItem::Standings, 10.0);
        let screen = render(&mut app, 120, 40);
        for group in GROUPS {
            assert!(screen.contains(&format!("Group {group}")), "missing group {group}");
        }
        assert!(screen.contains("2-0"));
    }

    #[test]
    fn matchups_flag_the_current_week() {
        let mut app = app_on(MenuItem::Matchups, 10.0);
        let screen = render(&mut app, 100, 30);
        assert!(screen.contains("NFL Week 10"));
        assert!(screen.contains("CURRENT"));
        assert!(screen.contains("110.40"));
    }

    fn with_live_row(mut app: App) -> App {
        let mut tables = tables(15.0);
        tables.live_scoring = vec![LiveScore {
            franchise_id: Some("1".into()),
            score: 40.0,
            playing: 2,
            ..Default::default()
        }];
        app.on_tables_loaded(tables);
        app
    }

    #[test]
    fn matchups_show_recorded_scores_while_live_scoring_runs() {
        let mut app = with_live_row(App::with_settings(AppSettings::default()));
        app.update_tab(MenuItem::Matchups);
        let screen = render(&mut app, 100, 30);
        assert!(screen.contains("110.40"));
        assert!(!screen.contains("40.00"));
        assert!(!screen.contains("LIVE"));
        assert!(screen.contains("FINAL"));
    }

    #[test]
    fn bracket_ignores_live_scoring_rows() {
        let mut app = with_live_row(App::with_settings(AppSettings::default()));
        app.update_tab(MenuItem::Bracket);
        let screen = render(&mut app, 100, 40);
        assert!(screen.contains("Touchdown"));
        assert!(!screen.contains("40.00"));
        assert!(!screen.contains("LIVE"));
    }

    #[test]
    fn bracket_unplayed_scores_show_dashes() {
        let mut app = app_on(MenuItem::Bracket, 14.0);
        let screen = render(&mut app, 100, 40);
        assert!(screen.contains("Sweet 16"));
        assert!(screen.contains("Touchdown"));
        assert!(!screen.contains("0.00"));
    }

    #[test]
    fn narrow_bracket_falls_back_to_a_list() {
        let mut app = app_on(MenuItem::Bracket, 14.0);
        let screen = render(&mut app, 50, 30);
        assert!(screen.contains("Sweet 16"));
        assert!(screen.contains("CURRENT"));
    }

    #[test]
    fn history_marks_the_current_champion() {
        let mut app = app_on(MenuItem::History, 10.0);
        let screen = render(&mut app, 100, 20);
        assert!(screen.contains("CURRENT CHAMPION"));
        assert!(screen.contains("1 tournaments"));
    }

    #[test]
    fn teams_are_split_by_league() {
        let mut app = app_on(MenuItem::Teams, 10.0);
        let screen = render(&mut app, 100, 20);
        assert!(screen.contains("ADL (1)"));
        assert!(screen.contains("BDL (1)"));
        assert!(screen.contains("Blitz Brigade"));
    }

    #[test]
    fn rules_render_without_tables() {
        let mut app = App::with_settings(AppSettings::default());
        app.update_tab(MenuItem::Rules);
        let screen = render(&mut app, 100, 40);
        assert!(screen.contains("Timeline"));
    }
}

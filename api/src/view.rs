//! Derived view data. Every function here is a pure read of [`Tables`] and
//! is recomputed on each draw.

use crate::{
    BracketMatchup, Franchise, GROUP_PLAY_WEEKS, GroupMatchup, GroupStanding,
    HistoryEntry, League, LiveScore, Matchup, Phase, TOTAL_TEAMS, Tables, bracket_round_label,
    format_score, teams_remaining,
};
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub const ENTRY_FEE: u32 = 25;
pub const PRIZE_POOL: u32 = TOTAL_TEAMS * ENTRY_FEE;
/// Standings rows per group that advance to the bracket.
pub const QUALIFIERS_PER_GROUP: usize = 4;
/// NFL week = group-play week + this offset.
pub const NFL_WEEK_OFFSET: u32 = 8;

// ---------------------------------------------------------------------------
// Matchup cards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SideView {
    pub franchise_id: Option<String>,
    pub name: String,
    pub owner: String,
    pub logo_url: Option<String>,
    /// Seed or week label shown next to the name.
    pub label: Option<String>,
    /// Live score when a live-scoring row exists, otherwise the recorded score.
    pub score: f64,
    pub yet_to_play: u32,
    pub playing: u32,
    pub seconds_remaining: f64,
    pub is_winner: bool,
}

impl SideView {
    /// `live` prefers the franchise's live-scoring row over the recorded score.
    fn build(tables: &Tables, matchup: &Matchup, id: Option<&str>, recorded: f64, label: Option<&str>, live: bool) -> Self {
        let live = if live { tables.live_score(id) } else { None };
        SideView {
            franchise_id: id.map(str::to_owned),
            name: tables.team_name(id).to_owned(),
            owner: tables.team_owner(id).to_owned(),
            logo_url: tables.team_logo(id).map(str::to_owned),
            label: label.map(str::to_owned),
            score: live.map_or(recorded, |l| l.score),
            yet_to_play: live.map_or(0, |l| l.yet_to_play),
            playing: live.map_or(0, |l| l.playing),
            seconds_remaining: live.map_or(0.0, |l| l.seconds_remaining),
            is_winner: matchup.is_winner(id),
        }
    }

    pub fn score_text(&self) -> String {
        score_or_dash(self.score, self.score > 0.0)
    }
}

/// Two-decimal score, or "-" when there is nothing to show yet.
pub fn score_or_dash(score: f64, show: bool) -> String {
    if show { format_score(score) } else { "-".into() }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchupCard {
    pub home: SideView,
    pub away: SideView,
    pub live: bool,
    pub complete: bool,
}

impl MatchupCard {
    fn assemble(
        tables: &Tables,
        matchup: &Matchup,
        home_label: Option<&str>,
        away_label: Option<&str>,
        live_scores: bool,
    ) -> Self {
        let side = |id: &Option<String>, recorded, label| {
            SideView::build(tables, matchup, id.as_deref(), recorded, label, live_scores)
        };
        let home = side(&matchup.home_id, matchup.home_score, home_label);
        let away = side(&matchup.away_id, matchup.away_score, away_label);
        let live = home.playing > 0 || away.playing > 0 || home.yet_to_play > 0 || away.yet_to_play > 0;
        MatchupCard { home, away, live, complete: matchup.is_complete() }
    }

    /// Card for the week in play: live-scoring rows override recorded scores.
    pub fn build(tables: &Tables, matchup: &Matchup, home_label: Option<&str>, away_label: Option<&str>) -> Self {
        Self::assemble(tables, matchup, home_label, away_label, true)
    }

    /// Card from the recorded scores only. Live scoring holds the current
    /// week, so any other week must not read it.
    pub fn recorded(tables: &Tables, matchup: &Matchup, home_label: Option<&str>, away_label: Option<&str>) -> Self {
        Self::assemble(tables, matchup, home_label, away_label, false)
    }

    pub fn group(tables: &Tables, m: &GroupMatchup) -> Self {
        Self::build(tables, &m.matchup, m.home_label.as_deref(), m.away_label.as_deref())
    }

    pub fn bracket(tables: &Tables, m: &BracketMatchup) -> Self {
        Self::build(tables, &m.matchup, m.home_seed.as_deref(), m.away_seed.as_deref())
    }

    pub fn group_result(tables: &Tables, m: &GroupMatchup) -> Self {
        Self::recorded(tables, &m.matchup, m.home_label.as_deref(), m.away_label.as_deref())
    }

    pub fn bracket_result(tables: &Tables, m: &BracketMatchup) -> Self {
        Self::recorded(tables, &m.matchup, m.home_seed.as_deref(), m.away_seed.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Current week
// ---------------------------------------------------------------------------

pub type GroupBuckets<'a> = BTreeMap<String, Vec<&'a GroupMatchup>>;

/// Bucket group matchups by group letter, letters in sorted order.
pub fn group_by_letter<'a>(matchups: impl IntoIterator<Item = &'a GroupMatchup>) -> GroupBuckets<'a> {
    let mut buckets = GroupBuckets::new();
    for m in matchups {
        buckets.entry(m.group.clone()).or_default().push(m);
    }
    buckets
}

#[derive(Debug, Clone, PartialEq)]
pub enum CurrentWeek<'a> {
    Group { week: u32, groups: GroupBuckets<'a> },
    Bracket { round: u32, matchups: Vec<&'a BracketMatchup> },
    None,
}

impl<'a> CurrentWeek<'a> {
    pub fn for_phase(tables: &'a Tables, phase: Phase) -> Self {
        if let Some(week) = phase.group_week() {
            let groups = group_by_letter(tables.group_matchups.iter().filter(|m| m.week == week));
            CurrentWeek::Group { week, groups }
        } else if let Some(round) = phase.bracket_round() {
            let matchups = tables.bracket_matchups.iter().filter(|m| m.round == round).collect();
            CurrentWeek::Bracket { round, matchups }
        } else {
            CurrentWeek::None
        }
    }

    fn matchups(&self) -> Vec<&'a Matchup> {
        match self {
            CurrentWeek::Group { groups, .. } => groups.values().flatten().copied().map(|m| &m.matchup).collect(),
            CurrentWeek::Bracket { matchups, .. } => matchups.iter().copied().map(|m| &m.matchup).collect(),
            CurrentWeek::None => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.matchups().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn completed(&self) -> usize {
        self.matchups().into_iter().filter(|m| m.is_complete()).count()
    }
}

// ---------------------------------------------------------------------------
// Standings
// ---------------------------------------------------------------------------

/// Standings with a franchise, by wins then points-for, both descending.
/// Equal rows keep their sheet order.
pub fn top_standings(standings: &[GroupStanding], n: usize) -> Vec<&GroupStanding> {
    let mut ranked: Vec<&GroupStanding> = standings.iter().filter(|s| s.franchise_id.is_some()).collect();
    ranked.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then_with(|| b.points_for.partial_cmp(&a.points_for).unwrap_or(Ordering::Equal))
    });
    ranked.truncate(n);
    ranked
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandingRow<'a> {
    pub standing: &'a GroupStanding,
    pub qualifying: bool,
}

pub fn group_table<'a>(standings: &'a [GroupStanding], group: &str) -> Vec<StandingRow<'a>> {
    let mut rows: Vec<&GroupStanding> = standings
        .iter()
        .filter(|s| s.group == group && s.franchise_id.is_some())
        .collect();
    rows.sort_by_key(|s| s.rank);
    rows.into_iter()
        .enumerate()
        .map(|(i, standing)| StandingRow { standing, qualifying: i < QUALIFIERS_PER_GROUP })
        .collect()
}

// ---------------------------------------------------------------------------
// Margins
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarginPick<'a> {
    pub matchup: &'a Matchup,
    pub margin: f64,
}

/// Group matchups first, then bracket matchups.
fn all_matchups(tables: &Tables) -> impl Iterator<Item = &Matchup> {
    tables
        .group_matchups
        .iter()
        .map(|m| &m.matchup)
        .chain(tables.bracket_matchups.iter().map(|m| &m.matchup))
}

/// Smallest differential among matchups where both sides scored. The first
/// one seen wins a tie.
pub fn closest_matchup(tables: &Tables) -> Option<MarginPick<'_>> {
    let mut best: Option<MarginPick> = None;
    for matchup in all_matchups(tables) {
        let Some(margin) = matchup.margin() else { continue };
        if best.is_none_or(|b| margin < b.margin) {
            best = Some(MarginPick { matchup, margin });
        }
    }
    best
}

/// Largest differential among matchups where both sides scored. A dead heat
/// is never a blowout.
pub fn biggest_blowout(tables: &Tables) -> Option<MarginPick<'_>> {
    let mut best: Option<MarginPick> = None;
    let mut largest = 0.0;
    for matchup in all_matchups(tables) {
        let Some(margin) = matchup.margin() else { continue };
        if margin > largest {
            largest = margin;
            best = Some(MarginPick { matchup, margin });
        }
    }
    best
}

// ---------------------------------------------------------------------------
// Streaks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Streak {
    #[default]
    None,
    Win(u32),
    Loss(u32),
}

impl Streak {
    fn record_win(self) -> Self {
        match self {
            Streak::Win(n) => Streak::Win(n + 1),
            _ => Streak::Win(1),
        }
    }

    fn record_loss(self) -> Self {
        match self {
            Streak::Loss(n) => Streak::Loss(n + 1),
            _ => Streak::Loss(1),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Streak::None => "-".into(),
            Streak::Win(n) => format!("W{n}"),
            Streak::Loss(n) => format!("L{n}"),
        }
    }
}

/// Active streak per franchise, in franchise-table order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreakTable {
    entries: Vec<(String, Streak)>,
}

/// Shortest run reported as hot or cold.
const MIN_STREAK: u32 = 2;

impl StreakTable {
    pub fn get(&self, franchise_id: &str) -> Streak {
        self.entries
            .iter()
            .find(|(id, _)| id == franchise_id)
            .map_or(Streak::None, |(_, s)| *s)
    }

    fn slot(&mut self, franchise_id: Option<&str>) -> Option<&mut Streak> {
        let id = franchise_id?;
        self.entries.iter_mut().find(|(k, _)| k == id).map(|(_, s)| s)
    }

    fn longest(&self, pick: impl Fn(Streak) -> Option<u32>) -> Option<(&str, u32)> {
        let mut best: Option<(&str, u32)> = None;
        for (id, streak) in &self.entries {
            let Some(n) = pick(*streak).filter(|n| *n >= MIN_STREAK) else { continue };
            if best.is_none_or(|(_, b)| n > b) {
                best = Some((id.as_str(), n));
            }
        }
        best
    }

    pub fn hot(&self) -> Option<(&str, u32)> {
        self.longest(|s| match s {
            Streak::Win(n) => Some(n),
            _ => None,
        })
    }

    pub fn cold(&self) -> Option<(&str, u32)> {
        self.longest(|s| match s {
            Streak::Loss(n) => Some(n),
            _ => None,
        })
    }
}

/// Replay completed group matchups week by week (ascending; the sheet's
/// order is kept within a week) and return each franchise's active streak.
/// Ids not in the franchise table are ignored.
pub fn compute_streaks(franchises: &[Franchise], group_matchups: &[GroupMatchup]) -> StreakTable {
    let mut table = StreakTable::default();
    for id in franchises.iter().filter_map(|f| f.id.as_deref()) {
        if !table.entries.iter().any(|(k, _)| k == id) {
            table.entries.push((id.to_owned(), Streak::None));
        }
    }

    let mut played: Vec<&GroupMatchup> = group_matchups.iter().filter(|m| m.matchup.is_complete()).collect();
    played.sort_by_key(|m| m.week);

    for m in played {
        if let Some(s) = table.slot(m.matchup.winner_id.as_deref()) {
            *s = s.record_win();
        }
        if let Some(s) = table.slot(m.loser_id.as_deref()) {
            *s = s.record_loss();
        }
    }
    table
}

/// Mean of every positive group-play score, each side counted on its own.
pub fn average_points(group_matchups: &[GroupMatchup]) -> f64 {
    let scores: Vec<f64> = group_matchups
        .iter()
        .flat_map(|m| [m.matchup.home_score, m.matchup.away_score])
        .filter(|s| *s > 0.0)
        .collect();
    if scores.is_empty() { 0.0 } else { scores.iter().sum::<f64>() / scores.len() as f64 }
}

/// Highest live score above zero; the first row wins a tie.
pub fn live_high_scorer(live_scoring: &[LiveScore]) -> Option<&LiveScore> {
    let mut best: Option<&LiveScore> = None;
    let mut high = 0.0;
    for row in live_scoring.iter().filter(|l| l.franchise_id.is_some()) {
        if row.score > high {
            high = row.score;
            best = Some(row);
        }
    }
    best
}

// ---------------------------------------------------------------------------
// Tab views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct GroupPlayWeek<'a> {
    pub week: u32,
    pub nfl_week: u32,
    pub is_current: bool,
    pub groups: GroupBuckets<'a>,
}

/// Group-play weeks that have matchups, first week first.
pub fn group_play_weeks(tables: &Tables) -> Vec<GroupPlayWeek<'_>> {
    let current = tables.phase().group_week();
    (1..=GROUP_PLAY_WEEKS)
        .filter_map(|week| {
            let groups = group_by_letter(tables.group_matchups.iter().filter(|m| m.week == week));
            (!groups.is_empty()).then_some(GroupPlayWeek {
                week,
                nfl_week: week + NFL_WEEK_OFFSET,
                is_current: current == Some(week),
                groups,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct BracketRound<'a> {
    pub round: u32,
    pub name: &'static str,
    pub matchups: Vec<&'a BracketMatchup>,
}

/// Rounds one through four, skipping rounds without matchups.
pub fn bracket_rounds(tables: &Tables) -> Vec<BracketRound<'_>> {
    (1..=4)
        .filter_map(|round| {
            let matchups: Vec<&BracketMatchup> =
                tables.bracket_matchups.iter().filter(|m| m.round == round).collect();
            (!matchups.is_empty()).then_some(BracketRound { round, name: bracket_round_label(round), matchups })
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeagueRosters<'a> {
    pub adl: Vec<&'a Franchise>,
    pub bdl: Vec<&'a Franchise>,
}

pub fn teams_by_league(franchises: &[Franchise]) -> LeagueRosters<'_> {
    let of = |league: League| -> Vec<&Franchise> {
        franchises.iter().filter(|f| f.league == Some(league)).collect()
    };
    LeagueRosters { adl: of(League::Adl), bdl: of(League::Bdl) }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChampionRow<'a> {
    pub entry: &'a HistoryEntry,
    pub is_current: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChampionSummary {
    pub total: usize,
    pub adl: usize,
    pub bdl: usize,
}

/// Champions with a year, newest first. The newest year holds the title.
pub fn champions(history: &[HistoryEntry]) -> (Vec<ChampionRow<'_>>, ChampionSummary) {
    let mut dated: Vec<&HistoryEntry> = history.iter().filter(|h| h.year.is_some()).collect();
    dated.sort_by(|a, b| b.year.cmp(&a.year));

    let newest = dated.first().and_then(|h| h.year);
    let summary = ChampionSummary {
        total: dated.len(),
        adl: dated.iter().filter(|h| h.league == Some(League::Adl)).count(),
        bdl: dated.iter().filter(|h| h.league == Some(League::Bdl)).count(),
    };
    let rows = dated
        .into_iter()
        .map(|entry| ChampionRow { entry, is_current: entry.year == newest })
        .collect();
    (rows, summary)
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard<'a> {
    pub nfl_week: u32,
    pub phase: Phase,
    pub teams_remaining: u32,
    pub current_week: CurrentWeek<'a>,
    pub matchups_complete: usize,
    pub matchups_total: usize,
    pub high_scorer: Option<&'a LiveScore>,
    pub top_four: Vec<&'a GroupStanding>,
    pub closest: Option<MarginPick<'a>>,
    pub blowout: Option<MarginPick<'a>>,
    pub streaks: StreakTable,
    pub average_points: f64,
}

impl<'a> Dashboard<'a> {
    pub fn build(tables: &'a Tables) -> Self {
        let nfl_week = tables.current_nfl_week();
        let phase = Phase::from_nfl_week(nfl_week);
        let current_week = CurrentWeek::for_phase(tables, phase);
        Dashboard {
            nfl_week,
            phase,
            teams_remaining: teams_remaining(nfl_week),
            matchups_complete: current_week.completed(),
            matchups_total: current_week.len(),
            current_week,
            high_scorer: live_high_scorer(&tables.live_scoring),
            top_four: top_standings(&tables.group_standings, 4),
            closest: closest_matchup(tables),
            blowout: biggest_blowout(tables),
            streaks: compute_streaks(&tables.franchises, &tables.group_matchups),
            average_points: average_points(&tables.group_matchups),
        }
    }

    pub fn hot_streak(&self) -> Option<(&str, u32)> {
        self.streaks.hot()
    }

    pub fn cold_streak(&self) -> Option<(&str, u32)> {
        self.streaks.cold()
    }
}

pub mod client;
pub mod gviz;
pub mod schema;
pub mod view;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Sheets — the seven tabs of the tournament workbook
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sheet {
    Franchises,
    GroupMatchups,
    GroupStandings,
    BracketMatchups,
    LiveScoring,
    Config,
    History,
}

impl Sheet {
    pub const ALL: [Sheet; 7] = [
        Sheet::Franchises,
        Sheet::GroupMatchups,
        Sheet::GroupStandings,
        Sheet::BracketMatchups,
        Sheet::LiveScoring,
        Sheet::Config,
        Sheet::History,
    ];

    /// Tab name exactly as it appears in the workbook.
    pub fn name(&self) -> &'static str {
        match self {
            Sheet::Franchises => "franchises",
            Sheet::GroupMatchups => "group matchups",
            Sheet::GroupStandings => "group standings",
            Sheet::BracketMatchups => "bracket matchups",
            Sheet::LiveScoring => "live scoring",
            Sheet::Config => "Config",
            Sheet::History => "cc history",
        }
    }

    pub fn key(&self) -> String {
        normalize_sheet_key(self.name())
    }
}

/// Lowercase and drop spaces: "group matchups" -> "groupmatchups".
pub fn normalize_sheet_key(name: &str) -> String {
    name.chars().filter(|c| *c != ' ').collect::<String>().to_lowercase()
}

// ---------------------------------------------------------------------------
// Raw cells and rows — positional, untyped
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

static NULL_CELL: CellValue = CellValue::Null;

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Trimmed display text. Null and blank text have none; whole numbers
    /// drop their fraction so a numeric id `3.0` reads as "3".
    pub fn as_text(&self) -> Option<String> {
        let text = match self {
            CellValue::Null => return None,
            CellValue::Bool(b) => b.to_string(),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.trim().to_string(),
        };
        if text.is_empty() { None } else { Some(text) }
    }
}

/// One sheet row keyed by position: `col0`, `col1`, ... A cell past the end
/// of the row reads as null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: Vec<CellValue>,
}

impl RawRow {
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn col(&self, index: usize) -> &CellValue {
        self.cells.get(index).unwrap_or(&NULL_CELL)
    }

    /// Look up a cell by its positional key, e.g. `row.get("col8")`.
    pub fn get(&self, key: &str) -> Option<&CellValue> {
        let index = key.strip_prefix("col")?.parse::<usize>().ok()?;
        self.cells.get(index)
    }

    pub fn columns(&self) -> impl Iterator<Item = (String, &CellValue)> {
        self.cells.iter().enumerate().map(|(i, v)| (format!("col{i}"), v))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawSheet {
    pub sheet: Sheet,
    /// Column count declared by the sheet (or the widest row, if larger).
    pub columns: usize,
    pub rows: Vec<RawRow>,
}

/// Normalized sheet key -> rows.
pub type SheetMap = HashMap<String, RawSheet>;

// ---------------------------------------------------------------------------
// Numeric coercion
// ---------------------------------------------------------------------------

/// Coerce any cell to a number. Null, non-numeric text and NaN become 0;
/// text is read like `parseFloat`, taking the longest numeric prefix.
pub fn to_number(value: &CellValue) -> f64 {
    let n = match value {
        CellValue::Null => 0.0,
        CellValue::Bool(b) => f64::from(u8::from(*b)),
        CellValue::Number(n) => *n,
        CellValue::Text(s) => parse_float_prefix(s).unwrap_or(0.0),
    };
    if n.is_nan() { 0.0 } else { n }
}

/// Whole, non-negative count (weeks, rounds, wins, players).
pub fn to_count(value: &CellValue) -> u32 {
    let n = to_number(value);
    if n <= 0.0 { 0 } else { n as u32 }
}

pub fn format_score(value: f64) -> String {
    format!("{value:.2}")
}

fn parse_float_prefix(text: &str) -> Option<f64> {
    let bytes = text.trim_start().as_bytes();
    let mut pos = 0;

    let sign = match bytes.first() {
        Some(b'-') => {
            pos += 1;
            "-"
        }
        Some(b'+') => {
            pos += 1;
            ""
        }
        _ => "",
    };

    let digits_from = |mut at: usize| {
        let start = at;
        while at < bytes.len() && bytes[at].is_ascii_digit() {
            at += 1;
        }
        (start, at)
    };

    let (int_start, int_end) = digits_from(pos);
    pos = int_end;
    let mut frac = (pos, pos);
    if bytes.get(pos) == Some(&b'.') {
        frac = digits_from(pos + 1);
        if frac.1 > frac.0 || int_end > int_start {
            pos = frac.1;
        }
    }
    if int_end == int_start && frac.1 == frac.0 {
        return None;
    }

    let mut exponent = String::new();
    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut at = pos + 1;
        let exp_sign = match bytes.get(at) {
            Some(b'-') => {
                at += 1;
                "-"
            }
            Some(b'+') => {
                at += 1;
                ""
            }
            _ => "",
        };
        let (exp_start, exp_end) = digits_from(at);
        if exp_end > exp_start {
            exponent = format!("e{exp_sign}{}", ascii(&bytes[exp_start..exp_end]));
        }
    }

    let int_part = if int_end > int_start { ascii(&bytes[int_start..int_end]) } else { "0" };
    let frac_part = if frac.1 > frac.0 { ascii(&bytes[frac.0..frac.1]) } else { "0" };
    format!("{sign}{int_part}.{frac_part}{exponent}").parse::<f64>().ok()
}

fn ascii(bytes: &[u8]) -> &str {
    std::str::from_utf8(bytes).unwrap_or("0")
}

// ---------------------------------------------------------------------------
// Domain types — named fields bound from the positional sheets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum League {
    Adl,
    Bdl,
}

impl League {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim() {
            "ADL" => Some(League::Adl),
            "BDL" => Some(League::Bdl),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            League::Adl => "ADL",
            League::Bdl => "BDL",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Franchise {
    pub id: Option<String>,
    pub name: String,
    pub owner: String,
    pub logo_url: Option<String>,
    pub league: Option<League>,
}

/// The two sides of a head-to-head pairing, shared by group and bracket play.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matchup {
    pub home_id: Option<String>,
    pub away_id: Option<String>,
    pub home_score: f64,
    pub away_score: f64,
    pub winner_id: Option<String>,
}

impl Matchup {
    pub fn is_complete(&self) -> bool {
        self.winner_id.is_some()
    }

    /// Absolute score differential, only when both sides have scored.
    pub fn margin(&self) -> Option<f64> {
        (self.home_score > 0.0 && self.away_score > 0.0)
            .then(|| (self.home_score - self.away_score).abs())
    }

    pub fn is_winner(&self, franchise_id: Option<&str>) -> bool {
        franchise_id.is_some() && self.winner_id.as_deref() == franchise_id
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupMatchup {
    /// Group-play week, 1..=5.
    pub week: u32,
    pub group: String,
    pub home_label: Option<String>,
    pub away_label: Option<String>,
    pub loser_id: Option<String>,
    pub matchup: Matchup,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupStanding {
    pub group: String,
    pub franchise_id: Option<String>,
    pub wins: u32,
    pub losses: u32,
    pub points_for: f64,
    pub rank: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BracketMatchup {
    /// Bracket round, 1 (Sweet 16) ..= 4 (Championship).
    pub round: u32,
    pub home_seed: Option<String>,
    pub away_seed: Option<String>,
    pub matchup: Matchup,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveScore {
    pub franchise_id: Option<String>,
    pub score: f64,
    pub seconds_remaining: f64,
    pub yet_to_play: u32,
    pub playing: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigEntry {
    pub key: String,
    pub value: CellValue,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryEntry {
    pub year: Option<u32>,
    pub champion: String,
    pub owner: String,
    pub league: Option<League>,
    pub logo_url: Option<String>,
}

pub const UNKNOWN_TEAM: &str = "Unknown";
pub const CURRENT_WEEK_KEY: &str = "Current NFL Week";
pub const DEFAULT_NFL_WEEK: u32 = 10;

/// Everything loaded in one refresh cycle. Replaced wholesale, never merged.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub franchises: Vec<Franchise>,
    pub group_matchups: Vec<GroupMatchup>,
    pub group_standings: Vec<GroupStanding>,
    pub bracket_matchups: Vec<BracketMatchup>,
    pub live_scoring: Vec<LiveScore>,
    pub config: Vec<ConfigEntry>,
    pub history: Vec<HistoryEntry>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl Tables {
    pub fn franchise(&self, id: Option<&str>) -> Option<&Franchise> {
        let id = id?;
        self.franchises.iter().find(|f| f.id.as_deref() == Some(id))
    }

    pub fn team_name(&self, id: Option<&str>) -> &str {
        self.franchise(id).map_or(UNKNOWN_TEAM, |f| f.name.as_str())
    }

    pub fn team_owner(&self, id: Option<&str>) -> &str {
        self.franchise(id).map_or(UNKNOWN_TEAM, |f| f.owner.as_str())
    }

    pub fn team_logo(&self, id: Option<&str>) -> Option<&str> {
        self.franchise(id).and_then(|f| f.logo_url.as_deref())
    }

    pub fn live_score(&self, id: Option<&str>) -> Option<&LiveScore> {
        let id = id?;
        self.live_scoring.iter().find(|l| l.franchise_id.as_deref() == Some(id))
    }

    pub fn config_value(&self, key: &str) -> Option<&CellValue> {
        self.config.iter().find(|c| c.key == key).map(|c| &c.value)
    }

    pub fn current_nfl_week(&self) -> u32 {
        self.config_value(CURRENT_WEEK_KEY).map_or(DEFAULT_NFL_WEEK, to_count)
    }

    pub fn phase(&self) -> Phase {
        Phase::from_nfl_week(self.current_nfl_week())
    }
}

// ---------------------------------------------------------------------------
// Tournament phase
// ---------------------------------------------------------------------------

pub const TOTAL_TEAMS: u32 = 24;
pub const GROUP_PLAY_WEEKS: u32 = 5;
pub const GROUPS: [&str; 4] = ["A", "B", "C", "D"];

/// NFL week of the first group-play week.
const GROUP_STAGE_START: u32 = 9;
/// NFL week of the Sweet 16.
const BRACKET_START: u32 = 14;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    PreTournament,
    GroupStage {
        week: u32,
    },
    Sweet16,
    Elite8,
    Final4,
    Championship,
    Complete,
}

impl Phase {
    pub fn from_nfl_week(nfl_week: u32) -> Self {
        match nfl_week {
            9..=13 => Phase::GroupStage { week: nfl_week - (GROUP_STAGE_START - 1) },
            14 => Phase::Sweet16,
            15 => Phase::Elite8,
            16 => Phase::Final4,
            17 => Phase::Championship,
            w if w > 17 => Phase::Complete,
            _ => Phase::PreTournament,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Phase::PreTournament => "Pre-Tournament",
            Phase::GroupStage { .. } => "Group Stage",
            Phase::Sweet16 => "Sweet 16",
            Phase::Elite8 => "Elite 8",
            Phase::Final4 => "Final 4",
            Phase::Championship => "Championship",
            Phase::Complete => "Complete",
        }
    }

    pub fn detail(&self) -> String {
        match self {
            Phase::PreTournament => "Awaiting Start".into(),
            Phase::GroupStage { week } => format!("Week {week} of {GROUP_PLAY_WEEKS}"),
            Phase::Sweet16 => "Round 1".into(),
            Phase::Elite8 => "Quarterfinals".into(),
            Phase::Final4 => "Semifinals".into(),
            Phase::Championship => "Final".into(),
            Phase::Complete => "Season Ended".into(),
        }
    }

    pub fn group_week(&self) -> Option<u32> {
        match self {
            Phase::GroupStage { week } => Some(*week),
            _ => None,
        }
    }

    /// Bracket round in play (1 = Sweet 16 .. 4 = Championship).
    pub fn bracket_round(&self) -> Option<u32> {
        match self {
            Phase::Sweet16 => Some(1),
            Phase::Elite8 => Some(2),
            Phase::Final4 => Some(3),
            Phase::Championship => Some(4),
            _ => None,
        }
    }
}

pub fn teams_remaining(nfl_week: u32) -> u32 {
    match nfl_week {
        w if w < BRACKET_START => TOTAL_TEAMS,
        14 => 16,
        15 => 8,
        16 => 4,
        17 => 2,
        _ => 1,
    }
}

pub fn bracket_round_label(round: u32) -> &'static str {
    match round {
        1 => "Sweet 16",
        2 => "Elite 8",
        3 => "Final 4",
        4 => "Championship",
        _ => "Bracket",
    }
}

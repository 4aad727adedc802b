//! Column contract for each sheet and the binding of positional rows into
//! named-field records.
//!
//! The workbook has no header-driven schema; every field lives at a fixed
//! column index. Those indices are declared once here so a reordered sheet
//! is caught at load time instead of silently corrupting lookups.

use crate::{
    BracketMatchup, ConfigEntry, Franchise, GroupMatchup, GroupStanding, HistoryEntry,
    League, LiveScore, Matchup, RawRow, RawSheet, Sheet, SheetMap, Tables, to_count, to_number,
};
use chrono::{DateTime, Utc};
use std::fmt;

mod franchise {
    pub const NAME: usize = 1;
    pub const OWNER: usize = 3;
    pub const LOGO: usize = 6;
    pub const LEAGUE: usize = 7;
    pub const ID: usize = 8;
}

mod group_matchup {
    pub const WEEK: usize = 0;
    pub const GROUP: usize = 2;
    pub const HOME_LABEL: usize = 3;
    pub const AWAY_LABEL: usize = 4;
    pub const LOSER: usize = 11;
}

/// Shared by group and bracket matchups.
mod sides {
    pub const HOME_ID: usize = 6;
    pub const AWAY_ID: usize = 7;
    pub const HOME_SCORE: usize = 8;
    pub const AWAY_SCORE: usize = 9;
    pub const WINNER: usize = 10;
}

mod standing {
    pub const GROUP: usize = 0;
    pub const FRANCHISE: usize = 1;
    pub const WINS: usize = 2;
    pub const LOSSES: usize = 3;
    pub const POINTS_FOR: usize = 4;
    pub const RANK: usize = 6;
}

mod bracket {
    pub const ROUND: usize = 0;
    pub const HOME_SEED: usize = 4;
    pub const AWAY_SEED: usize = 5;
}

mod live {
    pub const SCORE: usize = 2;
    pub const SECONDS_LEFT: usize = 3;
    pub const YET_TO_PLAY: usize = 4;
    pub const PLAYING: usize = 5;
    pub const FRANCHISE: usize = 6;
}

mod config {
    pub const KEY: usize = 0;
    pub const VALUE: usize = 1;
}

mod history {
    pub const YEAR: usize = 0;
    pub const CHAMPION: usize = 1;
    pub const OWNER: usize = 2;
    pub const LEAGUE: usize = 3;
    pub const LOGO: usize = 4;
}

/// Minimum column count a sheet must declare: one past its highest bound index.
pub fn required_columns(sheet: Sheet) -> usize {
    match sheet {
        Sheet::Franchises => franchise::ID + 1,
        Sheet::GroupMatchups => group_matchup::LOSER + 1,
        Sheet::GroupStandings => standing::RANK + 1,
        Sheet::BracketMatchups => sides::WINNER + 1,
        Sheet::LiveScoring => live::FRANCHISE + 1,
        Sheet::Config => config::VALUE + 1,
        Sheet::History => history::LOGO + 1,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    pub sheet: Sheet,
    pub expected: usize,
    pub found: usize,
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sheet '{}' has {} columns, expected at least {}",
            self.sheet.name(),
            self.found,
            self.expected
        )
    }
}

impl std::error::Error for SchemaError {}

/// Reject a sheet too narrow for its column contract. A sheet without rows
/// binds to nothing and always passes.
pub fn validate(raw: &RawSheet) -> Result<(), SchemaError> {
    let expected = required_columns(raw.sheet);
    if raw.rows.is_empty() || raw.columns >= expected {
        return Ok(());
    }
    Err(SchemaError { sheet: raw.sheet, expected, found: raw.columns })
}

/// Bind every loaded sheet into typed tables. A sheet absent from the map
/// yields an empty table.
pub fn bind_tables(sheets: &SheetMap, fetched_at: DateTime<Utc>) -> Tables {
    let rows = |sheet: Sheet| sheet_rows(sheets, sheet);

    Tables {
        franchises: rows(Sheet::Franchises).iter().map(bind_franchise).collect(),
        group_matchups: rows(Sheet::GroupMatchups).iter().map(bind_group_matchup).collect(),
        group_standings: rows(Sheet::GroupStandings).iter().map(bind_standing).collect(),
        bracket_matchups: rows(Sheet::BracketMatchups).iter().map(bind_bracket_matchup).collect(),
        live_scoring: rows(Sheet::LiveScoring).iter().map(bind_live_score).collect(),
        config: rows(Sheet::Config).iter().map(bind_config).collect(),
        history: rows(Sheet::History).iter().map(bind_history).collect(),
        fetched_at: Some(fetched_at),
    }
}

fn sheet_rows(sheets: &SheetMap, sheet: Sheet) -> &[RawRow] {
    sheets.get(&sheet.key()).map(|s| s.rows.as_slice()).unwrap_or_default()
}

fn text(row: &RawRow, index: usize) -> Option<String> {
    row.col(index).as_text()
}

fn text_or_empty(row: &RawRow, index: usize) -> String {
    text(row, index).unwrap_or_default()
}

fn league(row: &RawRow, index: usize) -> Option<League> {
    text(row, index).as_deref().and_then(League::parse)
}

fn bind_franchise(row: &RawRow) -> Franchise {
    Franchise {
        id: text(row, franchise::ID),
        name: text_or_empty(row, franchise::NAME),
        owner: text_or_empty(row, franchise::OWNER),
        logo_url: text(row, franchise::LOGO),
        league: league(row, franchise::LEAGUE),
    }
}

fn bind_sides(row: &RawRow) -> Matchup {
    Matchup {
        home_id: text(row, sides::HOME_ID),
        away_id: text(row, sides::AWAY_ID),
        home_score: to_number(row.col(sides::HOME_SCORE)),
        away_score: to_number(row.col(sides::AWAY_SCORE)),
        winner_id: text(row, sides::WINNER),
    }
}

fn bind_group_matchup(row: &RawRow) -> GroupMatchup {
    GroupMatchup {
        week: to_count(row.col(group_matchup::WEEK)),
        group: text_or_empty(row, group_matchup::GROUP),
        home_label: text(row, group_matchup::HOME_LABEL),
        away_label: text(row, group_matchup::AWAY_LABEL),
        loser_id: text(row, group_matchup::LOSER),
        matchup: bind_sides(row),
    }
}

fn bind_standing(row: &RawRow) -> GroupStanding {
    GroupStanding {
        group: text_or_empty(row, standing::GROUP),
        franchise_id: text(row, standing::FRANCHISE),
        wins: to_count(row.col(standing::WINS)),
        losses: to_count(row.col(standing::LOSSES)),
        points_for: to_number(row.col(standing::POINTS_FOR)),
        rank: to_count(row.col(standing::RANK)),
    }
}

fn bind_bracket_matchup(row: &RawRow) -> BracketMatchup {
    BracketMatchup {
        round: to_count(row.col(bracket::ROUND)),
        home_seed: text(row, bracket::HOME_SEED),
        away_seed: text(row, bracket::AWAY_SEED),
        matchup: bind_sides(row),
    }
}

fn bind_live_score(row: &RawRow) -> LiveScore {
    LiveScore {
        franchise_id: text(row, live::FRANCHISE),
        score: to_number(row.col(live::SCORE)),
        seconds_remaining: to_number(row.col(live::SECONDS_LEFT)),
        yet_to_play: to_count(row.col(live::YET_TO_PLAY)),
        playing: to_count(row.col(live::PLAYING)),
    }
}

fn bind_config(row: &RawRow) -> ConfigEntry {
    ConfigEntry {
        key: text_or_empty(row, config::KEY),
        value: row.col(config::VALUE).clone(),
    }
}

fn bind_history(row: &RawRow) -> HistoryEntry {
    let year = row.col(history::YEAR);
    HistoryEntry {
        year: (!year.is_null()).then(|| to_count(year)),
        champion: text_or_empty(row, history::CHAMPION),
        owner: text_or_empty(row, history::OWNER),
        league: league(row, history::LEAGUE),
        logo_url: text(row, history::LOGO),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CellValue;
    use crate::CellValue::{Null, Number, Text};

    fn t(s: &str) -> CellValue {
        Text(s.into())
    }

    fn sheet(sheet: Sheet, rows: Vec<Vec<CellValue>>) -> RawSheet {
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        RawSheet { sheet, columns, rows: rows.into_iter().map(RawRow::new).collect() }
    }

    #[test]
    fn required_columns_follow_highest_index() {
        assert_eq!(required_columns(Sheet::Franchises), 9);
        assert_eq!(required_columns(Sheet::GroupMatchups), 12);
        assert_eq!(required_columns(Sheet::GroupStandings), 7);
        assert_eq!(required_columns(Sheet::BracketMatchups), 11);
        assert_eq!(required_columns(Sheet::LiveScoring), 7);
        assert_eq!(required_columns(Sheet::Config), 2);
        assert_eq!(required_columns(Sheet::History), 5);
    }

    #[test]
    fn narrow_sheet_fails_validation() {
        let raw = sheet(Sheet::Franchises, vec![vec![Null, t("Team"), Null, t("Owner")]]);
        let err = validate(&raw).unwrap_err();
        assert_eq!(err, SchemaError { sheet: Sheet::Franchises, expected: 9, found: 4 });
        assert!(err.to_string().contains("franchises"));
    }

    #[test]
    fn empty_sheet_passes_validation() {
        let raw = RawSheet { sheet: Sheet::LiveScoring, columns: 0, rows: vec![] };
        assert!(validate(&raw).is_ok());
    }

    #[test]
    fn binds_franchise_columns() {
        let raw = sheet(
            Sheet::Franchises,
            vec![vec![
                Null,
                t("Gridiron Ghosts"),
                Null,
                t("Sam"),
                Null,
                Null,
                t("https://img.example/g.png"),
                t("ADL"),
                Number(7.0),
            ]],
        );
        let mut map = SheetMap::new();
        map.insert(Sheet::Franchises.key(), raw);
        let tables = bind_tables(&map, Utc::now());
        let f = &tables.franchises[0];
        assert_eq!(f.id.as_deref(), Some("7"));
        assert_eq!(f.name, "Gridiron Ghosts");
        assert_eq!(f.owner, "Sam");
        assert_eq!(f.logo_url.as_deref(), Some("https://img.example/g.png"));
        assert_eq!(f.league, Some(League::Adl));
    }

    #[test]
    fn binds_group_matchup_and_coerces_scores() {
        let raw = sheet(
            Sheet::GroupMatchups,
            vec![vec![
                Number(2.0),
                Null,
                t("B"),
                t("1 seed"),
                t("4 seed"),
                Null,
                t("CC01"),
                t("CC04"),
                t("101.5"),
                Null,
                t("CC01"),
                t("CC04"),
            ]],
        );
        let mut map = SheetMap::new();
        map.insert(Sheet::GroupMatchups.key(), raw);
        let tables = bind_tables(&map, Utc::now());
        let m = &tables.group_matchups[0];
        assert_eq!(m.week, 2);
        assert_eq!(m.group, "B");
        assert_eq!(m.home_label.as_deref(), Some("1 seed"));
        assert_eq!(m.matchup.home_id.as_deref(), Some("CC01"));
        assert_eq!(m.matchup.home_score, 101.5);
        assert_eq!(m.matchup.away_score, 0.0);
        assert!(m.matchup.is_complete());
        assert_eq!(m.loser_id.as_deref(), Some("CC04"));
    }

    #[test]
    fn blank_standing_franchise_is_left_out_of_the_leaders() {
        let raw = sheet(
            Sheet::GroupStandings,
            vec![
                vec![t("A"), t("  "), Number(5.0), Number(0.0), Number(600.0), Null, Number(1.0)],
                vec![t("A"), t("7"), Number(3.0), Number(2.0), Number(500.0), Null, Number(2.0)],
            ],
        );
        let mut map = SheetMap::new();
        map.insert(Sheet::GroupStandings.key(), raw);
        let tables = bind_tables(&map, Utc::now());
        assert_eq!(tables.group_standings[0].franchise_id, None);

        let top = crate::view::top_standings(&tables.group_standings, 4);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].franchise_id.as_deref(), Some("7"));
    }

    #[test]
    fn blank_winner_is_not_complete() {
        let mut row = vec![Null; 12];
        row[10] = t("");
        let raw = sheet(Sheet::BracketMatchups, vec![row]);
        let mut map = SheetMap::new();
        map.insert(Sheet::BracketMatchups.key(), raw);
        let tables = bind_tables(&map, Utc::now());
        assert!(!tables.bracket_matchups[0].matchup.is_complete());
    }

    #[test]
    fn missing_sheets_bind_to_empty_tables() {
        let tables = bind_tables(&SheetMap::new(), Utc::now());
        assert!(tables.franchises.is_empty());
        assert!(tables.history.is_empty());
        assert!(tables.fetched_at.is_some());
    }

    #[test]
    fn history_year_is_optional() {
        let raw = sheet(
            Sheet::History,
            vec![
                vec![Number(2023.0), t("Ghosts"), t("Sam"), t("BDL"), Null],
                vec![Null, t("Notes"), Null, Null, Null],
            ],
        );
        let mut map = SheetMap::new();
        map.insert(Sheet::History.key(), raw);
        let tables = bind_tables(&map, Utc::now());
        assert_eq!(tables.history[0].year, Some(2023));
        assert_eq!(tables.history[0].league, Some(League::Bdl));
        assert_eq!(tables.history[1].year, None);
    }
}

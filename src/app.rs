use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use cc_api::Tables;
use cc_api::client::RefreshError;
use chrono::{Local, Utc};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MenuItem {
    #[default]
    Dashboard,
    Standings,
    Matchups,
    Bracket,
    Teams,
    History,
    Rules,
    Help,
}

impl MenuItem {
    /// The seven tabs in tab-bar order; Help is an overlay, not a tab.
    pub const TABS: [MenuItem; 7] = [
        MenuItem::Dashboard,
        MenuItem::Standings,
        MenuItem::Matchups,
        MenuItem::Bracket,
        MenuItem::Teams,
        MenuItem::History,
        MenuItem::Rules,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            MenuItem::Dashboard => "Dashboard",
            MenuItem::Standings => "Standings",
            MenuItem::Matchups => "Matchups",
            MenuItem::Bracket => "Bracket",
            MenuItem::Teams => "Teams",
            MenuItem::History => "History",
            MenuItem::Rules => "Rules",
            MenuItem::Help => "Help",
        }
    }

    pub fn tab_index(&self) -> Option<usize> {
        Self::TABS.iter().position(|t| t == self)
    }

    /// Tab for a `1`..`7` key.
    pub fn from_digit(digit: char) -> Option<Self> {
        let index = digit.to_digit(10)?.checked_sub(1)? as usize;
        Self::TABS.get(index).copied()
    }

    fn step(&self, forward: bool) -> Self {
        let len = Self::TABS.len();
        let Some(i) = self.tab_index() else {
            return *self;
        };
        let next = if forward { (i + 1) % len } else { (i + len - 1) % len };
        Self::TABS[next]
    }
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new() -> Self {
        Self::with_settings(AppSettings::load())
    }

    pub fn with_settings(settings: AppSettings) -> Self {
        let app = Self { state: AppState::new(), settings };

        let level = app.settings.log_filter();
        log::set_max_level(level);
        tui_logger::set_default_level(level);

        app
    }

    // -----------------------------------------------------------------------
    // Network response handlers — called from main_ui_loop
    // -----------------------------------------------------------------------

    /// Swap in a complete set of tables.
    pub fn on_tables_loaded(&mut self, tables: Tables) {
        let fetched_at = tables.fetched_at.unwrap_or_else(Utc::now);
        self.state.tables = Some(tables);
        self.state.last_updated = Some(fetched_at.with_timezone(&Local));
        self.state.last_failures.clear();
        self.state.last_error = None;
    }

    /// Keep whatever is on screen and remember what went wrong.
    pub fn on_refresh_failed(&mut self, error: RefreshError) {
        self.state.last_error = Some(error.to_string());
        self.state.last_failures = error.failures;
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
        self.state.scroll.reset();
    }

    pub fn next_tab(&mut self) {
        self.update_tab(self.state.active_tab.step(true));
    }

    pub fn prev_tab(&mut self) {
        self.update_tab(self.state.active_tab.step(false));
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn scroll_down(&mut self) {
        self.state.scroll.down();
    }

    pub fn scroll_up(&mut self) {
        self.state.scroll.up();
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cc_api::client::SheetFailure;
    use cc_api::{Franchise, Sheet};

    fn app() -> App {
        App::with_settings(AppSettings::default())
    }

    fn tables_named(name: &str) -> Tables {
        Tables {
            franchises: vec![Franchise { id: Some("1".into()), name: name.into(), ..Default::default() }],
            fetched_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    #[test]
    fn failed_refresh_keeps_previous_tables() {
        let mut app = app();
        app.on_tables_loaded(tables_named("Original"));
        let updated = app.state.last_updated;

        app.on_refresh_failed(RefreshError {
            failures: vec![SheetFailure { sheet: Sheet::LiveScoring, reason: "timed out".into() }],
        });

        let tables = app.state.tables.as_ref().expect("tables kept");
        assert_eq!(tables.franchises[0].name, "Original");
        assert_eq!(app.state.last_updated, updated);
        assert_eq!(app.state.last_failures.len(), 1);
        assert!(app.state.last_error.as_deref().unwrap().contains("live scoring"));
    }

    #[test]
    fn successful_refresh_replaces_tables_and_clears_failures() {
        let mut app = app();
        app.on_refresh_failed(RefreshError {
            failures: vec![SheetFailure { sheet: Sheet::Config, reason: "500".into() }],
        });
        assert!(app.state.tables.is_none());

        app.on_tables_loaded(tables_named("Fresh"));
        assert_eq!(app.state.tables.as_ref().unwrap().franchises[0].name, "Fresh");
        assert!(app.state.last_failures.is_empty());
        assert!(app.state.last_error.is_none());
        assert!(app.state.last_updated.is_some());
    }

    #[test]
    fn tabs_cycle_in_both_directions() {
        let mut app = app();
        app.prev_tab();
        assert_eq!(app.state.active_tab, MenuItem::Rules);
        app.next_tab();
        app.next_tab();
        assert_eq!(app.state.active_tab, MenuItem::Standings);
    }

    #[test]
    fn digits_select_tabs() {
        assert_eq!(MenuItem::from_digit('1'), Some(MenuItem::Dashboard));
        assert_eq!(MenuItem::from_digit('7'), Some(MenuItem::Rules));
        assert_eq!(MenuItem::from_digit('8'), None);
        assert_eq!(MenuItem::from_digit('0'), None);
    }

    #[test]
    fn help_returns_to_previous_tab() {
        let mut app = app();
        app.update_tab(MenuItem::History);
        app.update_tab(MenuItem::Help);
        app.exit_help();
        assert_eq!(app.state.active_tab, MenuItem::History);
    }

    #[test]
    fn changing_tab_resets_scroll() {
        let mut app = app();
        app.scroll_down();
        app.scroll_down();
        assert_eq!(app.state.scroll.offset, 2);
        app.next_tab();
        assert_eq!(app.state.scroll.offset, 0);
        app.scroll_up();
        assert_eq!(app.state.scroll.offset, 0);
    }
}

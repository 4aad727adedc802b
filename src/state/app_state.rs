use crate::app::MenuItem;
use cc_api::Tables;
use cc_api::client::SheetFailure;
use chrono::{DateTime, Local};

/// Vertical scroll position of the active tab. Reset on tab change.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    pub offset: u16,
}

impl ScrollState {
    pub fn down(&mut self) {
        self.offset = self.offset.saturating_add(1);
    }

    pub fn up(&mut self) {
        self.offset = self.offset.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }
}

#[derive(Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    /// Tables from the last refresh that loaded every sheet.
    pub tables: Option<Tables>,
    pub last_updated: Option<DateTime<Local>>,
    /// Sheets that failed on the most recent refresh; empty after a good one.
    pub last_failures: Vec<SheetFailure>,
    pub last_error: Option<String>,
    pub scroll: ScrollState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

use crate::state::network::LoadingState;
use cc_api::Tables;
use cc_api::client::RefreshError;
use crossterm::event::KeyEvent;

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    /// Reload all seven sheets. Sent at startup, by the refresher, and on `r`.
    RefreshSheets,
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    TablesLoaded { tables: Box<Tables> },
    RefreshFailed { error: RefreshError },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}

use crate::state::app_settings::AppSettings;
use crate::state::messages::{NetworkRequest, NetworkResponse};
use cc_api::client::{RefreshError, SheetsApi};
use log::{debug, error, info};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

pub struct NetworkWorker {
    client: SheetsApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        settings: &AppSettings,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        let client = SheetsApi::new(settings.sheet_id.clone()).with_snapshot_dir(settings.sheets_dir.clone());
        Self::with_client(client, requests, responses)
    }

    pub fn with_client(
        client: SheetsApi,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            // Requests queued behind a running refresh would only repeat it.
            while self.requests.try_recv().is_ok() {}

            self.start_loading_animation().await;

            let result = match request {
                NetworkRequest::RefreshSheets => self.handle_refresh_sheets().await,
            };

            debug!("network request complete");
            self.stop_loading_animation(result.is_ok()).await;

            let response = match result {
                Ok(response) => response,
                Err(error) => NetworkResponse::RefreshFailed { error },
            };

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_refresh_sheets(&self) -> Result<NetworkResponse, RefreshError> {
        debug!("refreshing sheets for {}", self.client.sheet_id());
        let tables = self.client.fetch_tables().await?;
        info!(
            "loaded {} franchises, {} group matchups, {} bracket matchups",
            tables.franchises.len(),
            tables.group_matchups.len(),
            tables.bracket_matchups.len()
        );
        Ok(NetworkResponse::TablesLoaded { tables: Box::new(tables) })
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drain responses until the worker reports the refresh outcome.
    async fn outcome(rx: &mut mpsc::Receiver<NetworkResponse>) -> (NetworkResponse, LoadingState) {
        let mut last_loading = LoadingState::default();
        loop {
            match rx.recv().await.expect("worker hung up") {
                NetworkResponse::LoadingStateChanged { loading_state } => last_loading = loading_state,
                other => return (other, last_loading),
            }
        }
    }

    #[tokio::test]
    async fn failed_refresh_reports_every_sheet_and_error_spinner() {
        let dir = std::env::temp_dir().join(format!("cctui-network-empty-{}", std::process::id()));
        let client = SheetsApi::default().with_snapshot_dir(Some(dir));

        let (req_tx, req_rx) = mpsc::channel(4);
        let (resp_tx, mut resp_rx) = mpsc::channel(64);
        let task = tokio::spawn(NetworkWorker::with_client(client, req_rx, resp_tx).run());

        req_tx.send(NetworkRequest::RefreshSheets).await.unwrap();
        let (response, loading) = outcome(&mut resp_rx).await;

        match response {
            NetworkResponse::RefreshFailed { error } => assert_eq!(error.failures.len(), 7),
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(!loading.is_loading);
        assert_eq!(loading.spinner_char, ERROR_CHAR);
        task.abort();
    }
}

use crate::gviz::{GvizResponse, GvizRow};
use crate::schema::{self, SchemaError};
use crate::{CellValue, RawRow, RawSheet, Sheet, SheetMap, Tables};
use chrono::Utc;
use futures_util::future::join_all;
use log::{debug, error};
use reqwest::Client;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

/// Workbook the dashboard reads when no other id is configured.
pub const DEFAULT_SHEET_ID: &str = "1ucF98nx4O5Pq50JtOwM-HC4npoFtJS9YMR4Oclbb0dw";
const GOOGLE_DOCS: &str = "https://docs.google.com";
const GVIZ_PREFIX: &str = "/*O_o*/\ngoogle.visualization.Query.setResponse(";
const GVIZ_SUFFIX: &str = ");";

/// Google Sheets client reading the tournament workbook through the gviz endpoint.
#[derive(Debug, Clone)]
pub struct SheetsApi {
    client: Client,
    base_url: String,
    sheet_id: String,
    snapshot_dir: Option<PathBuf>,
    timeout: Duration,
}

impl Default for SheetsApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("cctui/0.1 (commissioner's cup dashboard)")
                .build()
                .unwrap_or_default(),
            base_url: GOOGLE_DOCS.to_owned(),
            sheet_id: DEFAULT_SHEET_ID.to_owned(),
            snapshot_dir: None,
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(String, String),
    Sheet(String, String),
    NotFound(String),
    Schema(SchemaError),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(msg, source) => write!(f, "Parse error for {source}: {msg}"),
            ApiError::Sheet(msg, source) => write!(f, "Sheet error for {source}: {msg}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Schema(e) => write!(f, "Schema error: {e}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<SchemaError> for ApiError {
    fn from(e: SchemaError) -> Self {
        ApiError::Schema(e)
    }
}

/// Result of loading one sheet in a refresh cycle.
#[derive(Debug)]
pub struct SheetOutcome {
    pub sheet: Sheet,
    pub result: ApiResult<RawSheet>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetFailure {
    pub sheet: Sheet,
    pub reason: String,
}

/// A refresh cycle that did not commit. Lists every sheet that failed.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshError {
    pub failures: Vec<SheetFailure>,
}

impl RefreshError {
    pub fn sheet_names(&self) -> Vec<&'static str> {
        self.failures.iter().map(|f| f.sheet.name()).collect()
    }
}

impl fmt::Display for RefreshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "refresh failed for {} sheet(s)", self.failures.len())?;
        for failure in &self.failures {
            write!(f, "; {}: {}", failure.sheet.name(), failure.reason)?;
        }
        Ok(())
    }
}

impl std::error::Error for RefreshError {}

impl SheetsApi {
    pub fn new(sheet_id: impl Into<String>) -> Self {
        Self { sheet_id: sheet_id.into(), ..Self::default() }
    }

    /// Point the client at another host. Used by tests against a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    /// Read `{dir}/{key}.json` snapshots instead of going to the network.
    pub fn with_snapshot_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.snapshot_dir = dir;
        self
    }

    pub fn sheet_id(&self) -> &str {
        &self.sheet_id
    }

    pub fn sheet_url(&self, sheet: Sheet) -> ApiResult<reqwest::Url> {
        let endpoint = format!("{}/spreadsheets/d/{}/gviz/tq", self.base_url, self.sheet_id);
        reqwest::Url::parse_with_params(&endpoint, &[("tqx", "out:json"), ("sheet", sheet.name())])
            .map_err(|e| ApiError::Parsing(e.to_string(), endpoint))
    }

    /// Load a single sheet, from the snapshot directory when one is set.
    pub async fn fetch_sheet(&self, sheet: Sheet) -> ApiResult<RawSheet> {
        if let Some(dir) = &self.snapshot_dir {
            let path = dir.join(format!("{}.json", sheet.key()));
            let source = path.display().to_string();
            debug!("reading {} from {source}", sheet.name());
            let body = std::fs::read_to_string(&path)
                .map_err(|e| ApiError::NotFound(format!("could not read {source}: {e}")))?;
            return parse_sheet(sheet, &body, &source);
        }

        let url = self.sheet_url(sheet)?;
        let source = url.to_string();
        debug!("fetching {} from {source}", sheet.name());
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, source.clone()))?;

        let body = response
            .error_for_status()
            .map_err(|e| ApiError::Api(e, source.clone()))?
            .text()
            .await
            .map_err(|e| ApiError::Network(e, source.clone()))?;

        parse_sheet(sheet, &body, &source)
    }

    /// Fire all seven sheet requests at once and report each one's result,
    /// in `Sheet::ALL` order.
    pub async fn fetch_all(&self) -> Vec<SheetOutcome> {
        let requests = Sheet::ALL.iter().map(|&sheet| async move {
            let result = self
                .fetch_sheet(sheet)
                .await
                .and_then(|raw| schema::validate(&raw).map(|_| raw).map_err(ApiError::from));
            SheetOutcome { sheet, result }
        });
        join_all(requests).await
    }

    /// One refresh cycle. Either every sheet loads and the tables are bound,
    /// or nothing is returned but the list of failures.
    pub async fn fetch_tables(&self) -> Result<Tables, RefreshError> {
        let mut sheets = SheetMap::new();
        let mut failures = Vec::new();

        for outcome in self.fetch_all().await {
            match outcome.result {
                Ok(raw) => {
                    sheets.insert(outcome.sheet.key(), raw);
                }
                Err(e) => {
                    error!("{}: {e}", outcome.sheet.name());
                    failures.push(SheetFailure { sheet: outcome.sheet, reason: e.to_string() });
                }
            }
        }

        if !failures.is_empty() {
            return Err(RefreshError { failures });
        }

        debug!("loaded {} sheets", sheets.len());
        Ok(schema::bind_tables(&sheets, Utc::now()))
    }
}

/// Strip the gviz script callback, returning the JSON document inside.
pub fn unwrap_payload(body: &str) -> Option<&str> {
    body.trim_end()
        .strip_prefix(GVIZ_PREFIX)?
        .strip_suffix(GVIZ_SUFFIX)
}

pub fn parse_sheet(sheet: Sheet, body: &str, source: &str) -> ApiResult<RawSheet> {
    let json = unwrap_payload(body).ok_or_else(|| {
        ApiError::Parsing(
            format!("unexpected response wrapper for sheet '{}'", sheet.name()),
            source.to_owned(),
        )
    })?;

    let response: GvizResponse = serde_json::from_str(json)
        .map_err(|e| ApiError::Parsing(e.to_string(), source.to_owned()))?;

    if response.status == "error" {
        let message = response
            .errors
            .first()
            .map(|e| if e.detailed_message.is_empty() { e.message.clone() } else { e.detailed_message.clone() })
            .unwrap_or_else(|| "unknown error".into());
        return Err(ApiError::Sheet(message, source.to_owned()));
    }

    let table = response.table.unwrap_or_default();
    let rows: Vec<RawRow> = table.rows.into_iter().map(convert_row).collect();
    let widest = rows.iter().map(RawRow::len).max().unwrap_or(0);

    Ok(RawSheet { sheet, columns: table.cols.len().max(widest), rows })
}

fn convert_row(row: GvizRow) -> RawRow {
    RawRow::new(
        row.c
            .into_iter()
            .map(|cell| cell.map(|c| c.v).unwrap_or(CellValue::Null))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn wrap(json: &str) -> String {
        format!("{GVIZ_PREFIX}{json}{GVIZ_SUFFIX}")
    }

    /// A table with `width` columns and one row of numbers.
    fn table_json(width: usize) -> String {
        let cols: Vec<String> =
            (0..width).map(|i| format!(r#"{{"id":"{i}","label":"","type":"number"}}"#)).collect();
        let cells: Vec<String> = (0..width).map(|i| format!(r#"{{"v":{i}}}"#)).collect();
        format!(
            r#"{{"version":"0.6","status":"ok","table":{{"cols":[{}],"rows":[{{"c":[{}]}}]}}}}"#,
            cols.join(","),
            cells.join(",")
        )
    }

    #[test]
    fn wrapper_is_forty_seven_and_two_chars() {
        assert_eq!(GVIZ_PREFIX.chars().count(), 47);
        assert_eq!(GVIZ_SUFFIX.chars().count(), 2);
        assert_eq!(unwrap_payload(&wrap("{}")), Some("{}"));
        assert_eq!(unwrap_payload(&format!("{}\n", wrap("{\"a\":1}"))), Some("{\"a\":1}"));
    }

    #[test]
    fn foreign_wrapper_is_rejected() {
        assert_eq!(unwrap_payload("{}"), None);
        assert_eq!(unwrap_payload("callback({});"), None);
        let err = parse_sheet(Sheet::Config, "<html>sign in</html>", "test").unwrap_err();
        assert!(matches!(err, ApiError::Parsing(..)));
        assert!(err.to_string().contains("Config"));
    }

    #[test]
    fn rows_become_positional_cells_with_nulls() {
        let body = wrap(
            r#"{"status":"ok","table":{"cols":[{"id":"A"},{"id":"B"},{"id":"C"}],
               "rows":[{"c":[{"v":"3"},null,{"v":12.5,"f":"12.50"}]},{"c":[{"v":true}]}]}}"#,
        );
        let raw = parse_sheet(Sheet::LiveScoring, &body, "test").unwrap();
        assert_eq!(raw.columns, 3);
        assert_eq!(raw.rows.len(), 2);
        assert_eq!(raw.rows[0].get("col0"), Some(&CellValue::Text("3".into())));
        assert_eq!(raw.rows[0].get("col1"), Some(&CellValue::Null));
        assert_eq!(raw.rows[0].get("col2"), Some(&CellValue::Number(12.5)));
        assert_eq!(raw.rows[1].col(0), &CellValue::Bool(true));
        assert_eq!(raw.rows[1].get("col1"), None);
    }

    #[test]
    fn gviz_error_status_is_a_sheet_error() {
        let body = wrap(
            r#"{"status":"error","errors":[{"reason":"invalid_query","message":"INVALID_QUERY",
               "detailed_message":"Invalid sheet name: nope"}]}"#,
        );
        let err = parse_sheet(Sheet::History, &body, "test").unwrap_err();
        match err {
            ApiError::Sheet(msg, _) => assert_eq!(msg, "Invalid sheet name: nope"),
            other => panic!("expected sheet error, got {other:?}"),
        }
    }

    #[test]
    fn gviz_error_without_detail_uses_message() {
        let body = wrap(r#"{"status":"error","errors":[{"reason":"access_denied","message":"ACCESS_DENIED"}]}"#);
        match parse_sheet(Sheet::Config, &body, "test").unwrap_err() {
            ApiError::Sheet(msg, _) => assert_eq!(msg, "ACCESS_DENIED"),
            other => panic!("expected sheet error, got {other:?}"),
        }
    }

    #[test]
    fn sheet_url_encodes_name() {
        let api = SheetsApi::new("abc").with_base_url("http://localhost:1234/");
        let url = api.sheet_url(Sheet::GroupMatchups).unwrap();
        assert_eq!(url.path(), "/spreadsheets/d/abc/gviz/tq");
        let pairs: Vec<(String, String)> =
            url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect();
        assert!(pairs.contains(&("tqx".into(), "out:json".into())));
        assert!(pairs.contains(&("sheet".into(), "group matchups".into())));
    }

    #[tokio::test]
    async fn fetches_every_sheet_by_name() {
        let mut server = mockito::Server::new_async().await;
        let mut mocks = Vec::new();
        for sheet in Sheet::ALL {
            let mock = server
                .mock("GET", "/spreadsheets/d/test-id/gviz/tq")
                .match_query(Matcher::AllOf(vec![
                    Matcher::UrlEncoded("tqx".into(), "out:json".into()),
                    Matcher::UrlEncoded("sheet".into(), sheet.name().into()),
                ]))
                .with_status(200)
                .with_body(wrap(&table_json(schema::required_columns(sheet))))
                .create_async()
                .await;
            mocks.push(mock);
        }

        let api = SheetsApi::new("test-id").with_base_url(server.url());
        let tables = api.fetch_tables().await.expect("all sheets should load");

        for mock in &mocks {
            mock.assert_async().await;
        }
        assert_eq!(tables.franchises.len(), 1);
        assert_eq!(tables.history.len(), 1);
        assert!(tables.fetched_at.is_some());
    }

    #[tokio::test]
    async fn one_failed_sheet_fails_the_cycle() {
        let mut server = mockito::Server::new_async().await;
        let mut mocks = Vec::new();
        for sheet in Sheet::ALL {
            let mock = server
                .mock("GET", "/spreadsheets/d/test-id/gviz/tq")
                .match_query(Matcher::UrlEncoded("sheet".into(), sheet.name().into()));
            let mock = if sheet == Sheet::LiveScoring {
                mock.with_status(500)
            } else {
                mock.with_status(200).with_body(wrap(&table_json(12)))
            };
            mocks.push(mock.create_async().await);
        }

        let api = SheetsApi::new("test-id").with_base_url(server.url());
        let err = api.fetch_tables().await.unwrap_err();
        assert_eq!(err.sheet_names(), vec!["live scoring"]);
        assert!(err.to_string().contains("live scoring"));
    }

    #[tokio::test]
    async fn narrow_sheet_is_reported_as_schema_failure() {
        let mut server = mockito::Server::new_async().await;
        let _narrow = server
            .mock("GET", "/spreadsheets/d/test-id/gviz/tq")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(wrap(&table_json(2)))
            .create_async()
            .await;

        let api = SheetsApi::new("test-id").with_base_url(server.url());
        let outcomes = api.fetch_all().await;
        assert_eq!(outcomes.len(), 7);
        let failed: Vec<Sheet> =
            outcomes.iter().filter(|o| o.result.is_err()).map(|o| o.sheet).collect();
        // Config only needs key and value.
        assert_eq!(failed.len(), 6);
        assert!(!failed.contains(&Sheet::Config));
        assert!(matches!(outcomes[0].result, Err(ApiError::Schema(_))));
    }

    #[tokio::test]
    async fn reads_snapshots_from_directory() {
        let dir = std::env::temp_dir().join(format!("cctui-snapshots-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        for sheet in Sheet::ALL {
            let body = wrap(&table_json(schema::required_columns(sheet)));
            std::fs::write(dir.join(format!("{}.json", sheet.key())), body).unwrap();
        }

        let api = SheetsApi::default().with_snapshot_dir(Some(dir.clone()));
        let tables = api.fetch_tables().await;
        std::fs::remove_dir_all(&dir).unwrap();

        let tables = tables.expect("snapshot sheets should load");
        assert_eq!(tables.group_matchups.len(), 1);
        assert_eq!(tables.config.len(), 1);
    }

    #[tokio::test]
    async fn missing_snapshot_is_not_found() {
        let dir = std::env::temp_dir().join("cctui-snapshots-missing");
        let api = SheetsApi::default().with_snapshot_dir(Some(dir));
        let err = api.fetch_sheet(Sheet::Franchises).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}

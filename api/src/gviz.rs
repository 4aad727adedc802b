/// Wire types for the Google Visualization ("gviz") query endpoint.
/// Endpoint: https://docs.google.com/spreadsheets/d/{id}/gviz/tq?tqx=out:json&sheet={name}
///
/// The body is a JSON document wrapped in a script callback:
/// `/*O_o*/\ngoogle.visualization.Query.setResponse({...});`
use crate::CellValue;
use serde::Deserialize;

#[derive(Deserialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GvizResponse {
    #[serde(default)]
    pub version: String,
    /// "ok", "warning" or "error".
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub errors: Vec<GvizError>,
    pub table: Option<GvizTable>,
}

/// Field names arrive in snake_case, unlike the table objects.
#[derive(Deserialize, Default, Debug)]
pub struct GvizError {
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub detailed_message: String,
}

#[derive(Deserialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GvizTable {
    #[serde(default)]
    pub cols: Vec<GvizColumn>,
    #[serde(default)]
    pub rows: Vec<GvizRow>,
    #[serde(default)]
    pub parsed_num_headers: u32,
}

#[derive(Deserialize, Default, Debug)]
pub struct GvizColumn {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, rename = "type")]
    pub kind: String,
}

#[derive(Deserialize, Default, Debug)]
pub struct GvizRow {
    /// One entry per column; `null` for an empty cell.
    #[serde(default)]
    pub c: Vec<Option<GvizCell>>,
}

#[derive(Deserialize, Default, Debug)]
pub struct GvizCell {
    #[serde(default)]
    pub v: CellValue,
    /// Formatted display value, when the sheet applies a number format.
    pub f: Option<String>,
}

//! Wire types for the Reporting API v4 `batchGet` call
//!
//! Requests serialize in the API's camelCase shape. Response types default
//! every level to empty, so partial payloads flatten to empty reports.

use serde::{Deserialize, Serialize};

/// Metric the ranking is ordered by
pub const PAGEVIEWS_METRIC: &str = "ga:pageviews";
/// Dimension carrying the page path
pub const PAGE_PATH_DIMENSION: &str = "ga:pagePath";

/// One report row: a page path and its view count as delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub path: String,
    pub views: String,
}

/// A decoded report, rows in API order (most viewed first)
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub rows: Vec<ReportRow>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetReportsRequest {
    pub report_requests: Vec<ReportRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub view_id: String,
    pub date_ranges: Vec<DateRange>,
    pub metrics: Vec<Metric>,
    pub dimensions: Vec<Dimension>,
    pub order_bys: Vec<OrderBy>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Serialize)]
pub struct Metric {
    pub expression: String,
}

#[derive(Debug, Serialize)]
pub struct Dimension {
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBy {
    pub field_name: String,
    pub order_type: String,
    pub sort_order: String,
}

impl ReportRequest {
    /// The one request shape the ranking needs: page views per path over a
    /// date range, most viewed first
    pub fn pageviews(view_id: &str, start_date: &str, end_date: &str) -> Self {
        Self {
            view_id: view_id.to_string(),
            date_ranges: vec![DateRange {
                start_date: start_date.to_string(),
                end_date: end_date.to_string(),
            }],
            metrics: vec![Metric {
                expression: PAGEVIEWS_METRIC.to_string(),
            }],
            dimensions: vec![Dimension {
                name: PAGE_PATH_DIMENSION.to_string(),
            }],
            order_bys: vec![OrderBy {
                field_name: PAGEVIEWS_METRIC.to_string(),
                order_type: "VALUE".to_string(),
                sort_order: "DESCENDING".to_string(),
            }],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct GetReportsResponse {
    #[serde(default)]
    pub reports: Vec<ReportBody>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportBody {
    #[serde(default)]
    pub data: ReportData,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportData {
    #[serde(default)]
    pub rows: Vec<WireRow>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireRow {
    #[serde(default)]
    pub dimensions: Vec<String>,
    #[serde(default)]
    pub metrics: Vec<MetricValues>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MetricValues {
    #[serde(default)]
    pub values: Vec<serde_json::Value>,
}

impl GetReportsResponse {
    /// Flatten the wire shape into plain reports; rows missing a path or a
    /// metric value are dropped
    pub fn into_reports(self) -> Vec<Report> {
        self.reports
            .into_iter()
            .map(|report| Report {
                rows: report
                    .data
                    .rows
                    .into_iter()
                    .filter_map(flatten_row)
                    .collect(),
            })
            .collect()
    }
}

fn flatten_row(row: WireRow) -> Option<ReportRow> {
    let path = row.dimensions.into_iter().next()?;
    let views = row
        .metrics
        .into_iter()
        .next()?
        .values
        .into_iter()
        .next()
        .map(metric_value_text)?;
    Some(ReportRow { path, views })
}

/// Metric values usually arrive as JSON strings but may be raw numbers
fn metric_value_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

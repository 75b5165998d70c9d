use crate::utils::error::{InsightsError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const NAME_COLUMN: &str = "name";
pub const NETWORTH_COLUMN: &str = "networth";
pub const COUNTRY_COLUMN: &str = "country";
pub const INDUSTRY_COLUMN: &str = "industry";
pub const AGE_COLUMN: &str = "age";

/// Columns every downstream section reads unconditionally.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    NAME_COLUMN,
    NETWORTH_COLUMN,
    COUNTRY_COLUMN,
    INDUSTRY_COLUMN,
    AGE_COLUMN,
];

/// One row of the uploaded file. `None` marks an empty cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub cells: Vec<Option<String>>,
}

impl Record {
    pub fn new(cells: Vec<Option<String>>) -> Self {
        Self { cells }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|cell| cell.as_deref())
    }
}

/// Parsed upload: header plus records in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    /// Fails with `MissingColumnError` for the first required column not in `columns`.
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Result<Self> {
        for required in REQUIRED_COLUMNS {
            if !columns.iter().any(|c| c == required) {
                return Err(InsightsError::MissingColumnError {
                    column: required.to_string(),
                });
            }
        }
        Ok(Self { columns, records })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Result<usize> {
        find_column(&self.columns, column)
    }

    /// First `n` records, for the raw preview.
    pub fn head(&self, n: usize) -> &[Record] {
        &self.records[..n.min(self.records.len())]
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Record>) {
        (self.columns, self.records)
    }
}

/// Row/column access shared by the raw and cleaned datasets.
pub trait Table {
    fn columns(&self) -> &[String];
    fn row_count(&self) -> usize;
    fn cell(&self, row: usize, column: usize) -> Option<&str>;
}

impl Table for Dataset {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn row_count(&self) -> usize {
        self.records.len()
    }

    fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.records.get(row).and_then(|r| r.get(column))
    }
}

pub(crate) fn find_column(columns: &[String], column: &str) -> Result<usize> {
    columns
        .iter()
        .position(|c| c == column)
        .ok_or_else(|| InsightsError::MissingColumnError {
            column: column.to_string(),
        })
}

/// A record whose `networth` has been converted to billions.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedRecord {
    /// Position of the record in the original dataset.
    pub row: usize,
    pub cells: Vec<Option<String>>,
    pub networth: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CleanedDataset {
    columns: Vec<String>,
    records: Vec<CleanedRecord>,
    networth_index: usize,
    dropped_rows: usize,
}

impl CleanedDataset {
    pub(crate) fn new(
        columns: Vec<String>,
        records: Vec<CleanedRecord>,
        networth_index: usize,
        dropped_rows: usize,
    ) -> Self {
        Self {
            columns,
            records,
            networth_index,
            dropped_rows,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[CleanedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows removed by the `drop_row` policy.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    pub fn column_index(&self, column: &str) -> Result<usize> {
        find_column(&self.columns, column)
    }

    pub fn networth_values(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.networth).collect()
    }

    /// Text of a cell; `networth` reads back as its cleaned number.
    pub fn text(&self, record: &CleanedRecord, index: usize) -> Option<String> {
        if index == self.networth_index {
            return Some(record.networth.to_string());
        }
        record.cells.get(index).and_then(|c| c.clone())
    }

    /// Numeric value of a cell. Absent cells give `Ok(None)`.
    pub fn numeric(&self, record: &CleanedRecord, index: usize) -> Result<Option<f64>> {
        if index == self.networth_index {
            return Ok(Some(record.networth));
        }
        let Some(raw) = record.cells.get(index).and_then(|c| c.as_deref()) else {
            return Ok(None);
        };
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Some(value)),
            _ => Err(InsightsError::CleaningError {
                row: record.row,
                column: self.columns[index].clone(),
                value: raw.to_string(),
            }),
        }
    }
}

impl Table for CleanedDataset {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn row_count(&self) -> usize {
        self.records.len()
    }

    /// Raw cell text; `networth` keeps the string it was uploaded with.
    fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.records
            .get(row)
            .and_then(|r| r.cells.get(column))
            .and_then(|c| c.as_deref())
    }
}

/// What `clean` does with a `networth` value it cannot parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowPolicy {
    #[default]
    FailWhole,
    DropRow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub preview_rows: usize,
    pub top_n: usize,
    pub category_limit: usize,
    pub histogram_bins: usize,
    pub currency_markers: Vec<char>,
    pub row_policy: RowPolicy,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            top_n: 10,
            category_limit: 20,
            histogram_bins: 20,
            currency_markers: vec!['$', 'B'],
            row_policy: RowPolicy::FailWhole,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregator {
    Sum,
    Mean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extreme {
    Max,
    Min,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedValue {
    pub key: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingCount {
    pub column: String,
    pub missing: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtremeRecord {
    pub row: usize,
    pub name: Option<String>,
    pub column: String,
    pub value: f64,
    pub networth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxSummary {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworthDistribution {
    pub values: Vec<f64>,
    pub histogram: Vec<HistogramBin>,
    pub box_summary: BoxSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryNetworth {
    pub country: String,
    pub networth: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeSummary {
    pub mean: f64,
    pub median: f64,
}

/// Every dashboard section computed from one upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub generated_at: DateTime<Utc>,
    pub total_rows: usize,
    pub dropped_rows: usize,
    pub raw_preview: RawPreview,
    pub missing_values: Vec<MissingCount>,
    pub networth_summary: SummaryStatistics,
    pub networth_distribution: NetworthDistribution,
    pub top_richest: Vec<RankedValue>,
    pub country_counts: Vec<CategoryCount>,
    pub networth_by_country: Vec<CountryNetworth>,
    pub industry_counts: Vec<CategoryCount>,
    pub industry_average: Vec<RankedValue>,
    pub age_summary: AgeSummary,
    pub oldest: ExtremeRecord,
    pub youngest: ExtremeRecord,
}

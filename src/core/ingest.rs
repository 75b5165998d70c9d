use crate::domain::model::{Dataset, Record};
use crate::utils::error::{InsightsError, Result};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Cell texts read as null, the same set pandas' `read_csv` uses by default.
pub const NA_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_null(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty() || NA_TOKENS.contains(&cell)
}

fn parse_error(err: csv::Error) -> InsightsError {
    InsightsError::ParseError {
        message: err.to_string(),
    }
}

/// Parses an uploaded CSV file. The first row is the header; empty cells and
/// NA tokens become `None`.
pub fn parse(raw: &[u8]) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(raw);

    let columns: Vec<String> = reader
        .headers()
        .map_err(parse_error)?
        .iter()
        .map(|h| h.trim_start_matches(BYTE_ORDER_MARK).trim().to_string())
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.map_err(parse_error)?;
        let cells = row
            .iter()
            .map(|cell| (!is_null(cell)).then(|| cell.to_string()))
            .collect();
        records.push(Record::new(cells));
    }

    tracing::debug!(
        "Parsed {} records with {} columns: {}",
        records.len(),
        columns.len(),
        columns.join(", ")
    );

    Dataset::new(columns, records)
}

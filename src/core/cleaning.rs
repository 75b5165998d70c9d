use crate::domain::model::{CleanedDataset, CleanedRecord, Dataset, RowPolicy, NETWORTH_COLUMN};
use crate::utils::error::{InsightsError, Result};

/// Removes every occurrence of the marker characters and surrounding whitespace.
pub fn strip_markers(value: &str, markers: &[char]) -> String {
    value
        .chars()
        .filter(|c| !markers.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Converts a currency string such as `"$12.3 B"` to billions.
pub fn parse_networth(value: &str, markers: &[char]) -> Option<f64> {
    strip_markers(value, markers)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Replaces the `networth` column with numbers.
///
/// With [`RowPolicy::FailWhole`] the first unparseable value aborts the whole
/// dataset; with [`RowPolicy::DropRow`] the row is skipped and counted.
pub fn clean(dataset: Dataset, markers: &[char], policy: RowPolicy) -> Result<CleanedDataset> {
    let networth_index = dataset.column_index(NETWORTH_COLUMN)?;
    let (columns, records) = dataset.into_parts();

    let mut cleaned = Vec::with_capacity(records.len());
    let mut dropped_rows = 0;

    for (row, record) in records.into_iter().enumerate() {
        let raw = record.get(networth_index).unwrap_or_default();
        match parse_networth(raw, markers) {
            Some(networth) => cleaned.push(CleanedRecord {
                row,
                cells: record.cells,
                networth,
            }),
            None => {
                let err = InsightsError::CleaningError {
                    row,
                    column: NETWORTH_COLUMN.to_string(),
                    value: raw.to_string(),
                };
                match policy {
                    RowPolicy::FailWhole => return Err(err),
                    RowPolicy::DropRow => {
                        tracing::warn!("Dropping row: {}", err);
                        dropped_rows += 1;
                    }
                }
            }
        }
    }

    if dropped_rows > 0 {
        tracing::info!("Dropped {} rows with unparseable networth", dropped_rows);
    }

    Ok(CleanedDataset::new(
        columns,
        cleaned,
        networth_index,
        dropped_rows,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Record;

    const MARKERS: [char; 2] = ['$', 'B'];

    fn dataset(networth: &[Option<&str>]) -> Dataset {
        let columns = ["name", "networth", "country", "industry", "age"]
            .iter()
            .map(|c| c.to_string())
            .collect();
        let records = networth
            .iter()
            .enumerate()
            .map(|(i, value)| {
                Record::new(vec![
                    Some(format!("Person {}", i)),
                    value.map(|v| v.to_string()),
                    Some("US".to_string()),
                    Some("Tech".to_string()),
                    Some("40".to_string()),
                ])
            })
            .collect();
        Dataset::new(columns, records).unwrap()
    }

    #[test]
    fn test_parse_networth_formats() {
        assert_eq!(parse_networth("$12.3B", &MARKERS), Some(12.3));
        assert_eq!(parse_networth("$219 B", &MARKERS), Some(219.0));
        assert_eq!(parse_networth(" $1.5 B ", &MARKERS), Some(1.5));
        assert_eq!(parse_networth("$$1B", &MARKERS), Some(1.0));
        assert_eq!(parse_networth("$B", &MARKERS), None);
        assert_eq!(parse_networth("$1.2M", &MARKERS), None);
        assert_eq!(parse_networth("NaN", &MARKERS), None);
    }

    #[test]
    fn test_clean_is_idempotent_on_numbers() {
        assert_eq!(parse_networth("12.3", &MARKERS), Some(12.3));
        let first = clean(dataset(&[Some("$12.3B")]), &MARKERS, RowPolicy::FailWhole).unwrap();
        let again = clean(
            dataset(&[Some(&first.records()[0].networth.to_string())]),
            &MARKERS,
            RowPolicy::FailWhole,
        )
        .unwrap();
        assert_eq!(first.records()[0].networth, again.records()[0].networth);
    }

    #[test]
    fn test_clean_keeps_other_columns() {
        let cleaned = clean(dataset(&[Some("$5B"), Some("$10B")]), &MARKERS, RowPolicy::FailWhole)
            .unwrap();
        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned.networth_values(), vec![5.0, 10.0]);
        assert_eq!(cleaned.records()[1].cells[0].as_deref(), Some("Person 1"));
        assert_eq!(cleaned.dropped_rows(), 0);
    }

    #[test]
    fn test_clean_fail_whole_reports_row() {
        let result = clean(
            dataset(&[Some("$5B"), Some("$abcB"), Some("$7B")]),
            &MARKERS,
            RowPolicy::FailWhole,
        );
        match result {
            Err(InsightsError::CleaningError { row, column, value }) => {
                assert_eq!(row, 1);
                assert_eq!(column, "networth");
                assert_eq!(value, "$abcB");
            }
            other => panic!("expected CleaningError, got {:?}", other),
        }
    }

    #[test]
    fn test_clean_drop_row_skips_bad_values() {
        let cleaned = clean(
            dataset(&[Some("$5B"), None, Some("oops"), Some("$7B")]),
            &MARKERS,
            RowPolicy::DropRow,
        )
        .unwrap();
        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned.dropped_rows(), 2);
        assert_eq!(cleaned.records()[1].row, 3);
        assert_eq!(cleaned.networth_values(), vec![5.0, 7.0]);
    }

    #[test]
    fn test_clean_custom_markers() {
        let cleaned = clean(dataset(&[Some("€3bn")]), &['€', 'b', 'n'], RowPolicy::FailWhole)
            .unwrap();
        assert_eq!(cleaned.networth_values(), vec![3.0]);
    }
}

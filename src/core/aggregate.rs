use crate::domain::model::{
    find_column, Aggregator, CategoryCount, CleanedDataset, Extreme, ExtremeRecord, MissingCount,
    RankedValue, SummaryStatistics, Table, NAME_COLUMN,
};
use crate::utils::error::{InsightsError, Result};
use std::collections::HashMap;

/// Absent cells per column, in header order.
pub fn missing_value_counts<T: Table>(table: &T) -> Vec<MissingCount> {
    table
        .columns()
        .iter()
        .enumerate()
        .map(|(index, column)| MissingCount {
            column: column.clone(),
            missing: (0..table.row_count())
                .filter(|&row| table.cell(row, index).is_none())
                .count(),
        })
        .collect()
}

fn numeric_column(data: &CleanedDataset, column: &str) -> Result<Vec<f64>> {
    let index = data.column_index(column)?;
    let mut values = Vec::with_capacity(data.len());
    for record in data.records() {
        if let Some(value) = data.numeric(record, index)? {
            values.push(value);
        }
    }
    Ok(values)
}

pub(crate) fn median_of_sorted(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

pub(crate) fn summarize(column: &str, values: &[f64]) -> Result<SummaryStatistics> {
    if values.is_empty() {
        return Err(InsightsError::EmptyDatasetError {
            column: column.to_string(),
        });
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    Ok(SummaryStatistics {
        mean: sorted.iter().sum::<f64>() / sorted.len() as f64,
        median: median_of_sorted(&sorted),
        min: sorted[0],
        max: sorted[sorted.len() - 1],
    })
}

/// Mean, median, min and max of a numeric column, skipping absent cells.
pub fn summary_statistics(data: &CleanedDataset, column: &str) -> Result<SummaryStatistics> {
    let values = numeric_column(data, column)?;
    summarize(column, &values)
}

/// The `n` groups with the largest aggregate, descending. Ties keep first-seen order.
pub fn top_n_by_group(
    data: &CleanedDataset,
    group_column: &str,
    value_column: &str,
    n: usize,
    aggregator: Aggregator,
) -> Result<Vec<RankedValue>> {
    let group_index = data.column_index(group_column)?;
    let value_index = data.column_index(value_column)?;

    // (key, sum, count) in first-seen order
    let mut groups: Vec<(String, f64, usize)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for record in data.records() {
        let Some(key) = data.text(record, group_index) else {
            continue;
        };
        let Some(value) = data.numeric(record, value_index)? else {
            continue;
        };
        match positions.get(&key) {
            Some(&pos) => {
                groups[pos].1 += value;
                groups[pos].2 += 1;
            }
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push((key, value, 1));
            }
        }
    }

    if group_column == NAME_COLUMN {
        let merged = groups.iter().filter(|(_, _, count)| *count > 1).count();
        if merged > 0 {
            tracing::debug!("{} names appear on more than one row and were merged", merged);
        }
    }

    let mut ranked: Vec<RankedValue> = groups
        .into_iter()
        .map(|(key, sum, count)| RankedValue {
            key,
            value: match aggregator {
                Aggregator::Sum => sum,
                Aggregator::Mean => sum / count as f64,
            },
        })
        .collect();

    // stable sort keeps first-seen order among equal values
    ranked.sort_by(|a, b| b.value.total_cmp(&a.value));
    ranked.truncate(n);
    Ok(ranked)
}

/// Occurrences of each distinct value, descending by count, at most `limit` entries.
pub fn value_counts<T: Table>(table: &T, column: &str, limit: usize) -> Result<Vec<CategoryCount>> {
    let index = find_column(table.columns(), column)?;

    let mut counts: Vec<CategoryCount> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for row in 0..table.row_count() {
        let Some(value) = table.cell(row, index) else {
            continue;
        };
        match positions.get(value) {
            Some(&pos) => counts[pos].count += 1,
            None => {
                positions.insert(value, counts.len());
                counts.push(CategoryCount {
                    category: value.to_string(),
                    count: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    Ok(counts)
}

/// The first row holding the max or min of `column`, with its name and networth.
pub fn extreme_row(data: &CleanedDataset, column: &str, which: Extreme) -> Result<ExtremeRecord> {
    let index = data.column_index(column)?;
    let name_index = data.column_index(NAME_COLUMN)?;

    let mut best: Option<(f64, usize)> = None;
    for (pos, record) in data.records().iter().enumerate() {
        let Some(value) = data.numeric(record, index)? else {
            continue;
        };
        let better = match (best, which) {
            (None, _) => true,
            (Some((current, _)), Extreme::Max) => value > current,
            (Some((current, _)), Extreme::Min) => value < current,
        };
        if better {
            best = Some((value, pos));
        }
    }

    let (value, pos) = best.ok_or_else(|| InsightsError::EmptyDatasetError {
        column: column.to_string(),
    })?;
    let record = &data.records()[pos];

    Ok(ExtremeRecord {
        row: record.row,
        name: data.text(record, name_index),
        column: column.to_string(),
        value,
        networth: record.networth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cleaning::clean;
    use crate::core::ingest::parse;
    use crate::domain::model::{Dataset, RowPolicy};

    fn load(csv: &str) -> (Dataset, CleanedDataset) {
        let dataset = parse(csv.as_bytes()).unwrap();
        let cleaned = clean(dataset.clone(), &['$', 'B'], RowPolicy::FailWhole).unwrap();
        (dataset, cleaned)
    }

    const TWO_ROWS: &str = "name,networth,country,industry,age
A,$5B,US,Tech,30
B,$10B,US,Retail,50
";

    const SAMPLE: &str = "name,networth,country,industry,age
Ann,$5B,US,Tech,30
Bo,$10B,France,Retail,50
Cy,$2B,US,Tech,
Ann,$6B,China,Energy,61
Di,$3B,,Tech,44
Ed,$9B,France,,61
";

    #[test]
    fn test_two_row_scenario() {
        let (_, cleaned) = load(TWO_ROWS);

        let stats = summary_statistics(&cleaned, "networth").unwrap();
        assert_eq!(stats.mean, 7.5);
        assert_eq!(stats.median, 7.5);
        assert_eq!(stats.min, 5.0);
        assert_eq!(stats.max, 10.0);

        let oldest = extreme_row(&cleaned, "age", Extreme::Max).unwrap();
        assert_eq!(oldest.name.as_deref(), Some("B"));
        assert_eq!(oldest.value, 50.0);
        assert_eq!(oldest.networth, 10.0);

        let top = top_n_by_group(&cleaned, "name", "networth", 1, Aggregator::Sum).unwrap();
        assert_eq!(
            top,
            vec![RankedValue {
                key: "B".to_string(),
                value: 10.0
            }]
        );
    }

    #[test]
    fn test_missing_value_counts_cover_every_column() {
        let (dataset, _) = load(SAMPLE);
        let counts = missing_value_counts(&dataset);

        let columns: Vec<&str> = counts.iter().map(|c| c.column.as_str()).collect();
        assert_eq!(columns, vec!["name", "networth", "country", "industry", "age"]);
        let missing: Vec<usize> = counts.iter().map(|c| c.missing).collect();
        assert_eq!(missing, vec![0, 0, 1, 1, 1]);

        let total_nulls: usize = dataset
            .records()
            .iter()
            .map(|r| r.cells.iter().filter(|c| c.is_none()).count())
            .sum();
        assert_eq!(counts.iter().map(|c| c.missing).sum::<usize>(), total_nulls);
    }

    const NA_CELLS: &str = "name,networth,country,industry,age
A,$5B,US,Tech,N/A
B,$10B,NaN,Retail,50
C,$7B,US,null,40
";

    #[test]
    fn test_na_tokens_count_as_missing() {
        let (dataset, cleaned) = load(NA_CELLS);

        let missing: Vec<usize> = missing_value_counts(&dataset)
            .iter()
            .map(|c| c.missing)
            .collect();
        assert_eq!(missing, vec![0, 0, 1, 1, 1]);
        assert_eq!(
            missing_value_counts(&cleaned)
                .iter()
                .map(|c| c.missing)
                .sum::<usize>(),
            3
        );
    }

    #[test]
    fn test_na_tokens_are_not_categories() {
        let (_, cleaned) = load(NA_CELLS);

        let countries = value_counts(&cleaned, "country", 20).unwrap();
        assert_eq!(
            countries,
            vec![CategoryCount { category: "US".to_string(), count: 2 }]
        );
        let industries = value_counts(&cleaned, "industry", 20).unwrap();
        assert!(industries.iter().all(|c| c.category != "null"));
        assert_eq!(industries.len(), 2);
    }

    #[test]
    fn test_na_tokens_skipped_in_age_statistics() {
        let (_, cleaned) = load(NA_CELLS);

        let age = summary_statistics(&cleaned, "age").unwrap();
        assert_eq!(age.mean, 45.0);
        assert_eq!(age.min, 40.0);

        let oldest = extreme_row(&cleaned, "age", Extreme::Max).unwrap();
        assert_eq!(oldest.name.as_deref(), Some("B"));
        let youngest = extreme_row(&cleaned, "age", Extreme::Min).unwrap();
        assert_eq!(youngest.name.as_deref(), Some("C"));
    }

    #[test]
    fn test_summary_statistics_skips_absent_cells() {
        let (_, cleaned) = load(SAMPLE);
        let age = summary_statistics(&cleaned, "age").unwrap();
        assert_eq!(age.min, 30.0);
        assert_eq!(age.max, 61.0);
        assert_eq!(age.median, 50.0);
        assert!((age.mean - 49.2).abs() < 1e-9);
    }

    #[test]
    fn test_summary_statistics_empty_dataset() {
        let (_, cleaned) = load("name,networth,country,industry,age\n");
        assert!(matches!(
            summary_statistics(&cleaned, "networth"),
            Err(InsightsError::EmptyDatasetError { .. })
        ));
    }

    #[test]
    fn test_summary_statistics_rejects_text_column() {
        let (_, cleaned) = load(TWO_ROWS);
        assert!(matches!(
            summary_statistics(&cleaned, "country"),
            Err(InsightsError::CleaningError { .. })
        ));
        assert!(matches!(
            summary_statistics(&cleaned, "rank"),
            Err(InsightsError::MissingColumnError { .. })
        ));
    }

    #[test]
    fn test_top_n_sums_duplicate_names() {
        let (_, cleaned) = load(SAMPLE);
        let top = top_n_by_group(&cleaned, "name", "networth", 10, Aggregator::Sum).unwrap();

        assert_eq!(top[0].key, "Ann");
        assert_eq!(top[0].value, 11.0);
        assert_eq!(top.len(), 5);
        let mut keys: Vec<&str> = top.iter().map(|r| r.key.as_str()).collect();
        keys.dedup();
        assert_eq!(keys.len(), 5);
        assert!(top.windows(2).all(|w| w[0].value >= w[1].value));
    }

    #[test]
    fn test_top_n_mean_by_industry_skips_absent_groups() {
        let (_, cleaned) = load(SAMPLE);
        let avg = top_n_by_group(&cleaned, "industry", "networth", 2, Aggregator::Mean).unwrap();

        assert_eq!(avg.len(), 2);
        assert_eq!(avg[0].key, "Retail");
        assert_eq!(avg[0].value, 10.0);
        assert_eq!(avg[1].key, "Energy");
        assert_eq!(avg[1].value, 6.0);
    }

    #[test]
    fn test_top_n_ties_keep_first_seen_order() {
        let (_, cleaned) = load(
            "name,networth,country,industry,age\nX,$4B,US,T,1\nY,$4B,US,T,1\nZ,$4B,US,T,1\n",
        );
        let top = top_n_by_group(&cleaned, "name", "networth", 2, Aggregator::Sum).unwrap();
        let keys: Vec<&str> = top.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["X", "Y"]);
    }

    #[test]
    fn test_value_counts_sorted_and_truncated() {
        let (dataset, _) = load(SAMPLE);
        let countries = value_counts(&dataset, "country", 20).unwrap();

        assert_eq!(
            countries,
            vec![
                CategoryCount { category: "US".to_string(), count: 2 },
                CategoryCount { category: "France".to_string(), count: 2 },
                CategoryCount { category: "China".to_string(), count: 1 },
            ]
        );

        let top_one = value_counts(&dataset, "industry", 1).unwrap();
        assert_eq!(top_one.len(), 1);
        assert_eq!(top_one[0].category, "Tech");
        assert_eq!(top_one[0].count, 3);
    }

    #[test]
    fn test_extreme_row_first_occurrence_wins() {
        let (_, cleaned) = load(SAMPLE);

        let oldest = extreme_row(&cleaned, "age", Extreme::Max).unwrap();
        assert_eq!(oldest.name.as_deref(), Some("Ann"));
        assert_eq!(oldest.row, 3);
        assert_eq!(oldest.networth, 6.0);

        let youngest = extreme_row(&cleaned, "age", Extreme::Min).unwrap();
        assert_eq!(youngest.name.as_deref(), Some("Ann"));
        assert_eq!(youngest.row, 0);
    }

    #[test]
    fn test_extreme_row_all_equal_returns_first() {
        let (_, cleaned) = load(
            "name,networth,country,industry,age\nP,$1B,US,T,40\nQ,$2B,US,T,40\nR,$3B,US,T,40\n",
        );
        for which in [Extreme::Max, Extreme::Min] {
            let record = extreme_row(&cleaned, "age", which).unwrap();
            assert_eq!(record.row, 0);
            assert_eq!(record.name.as_deref(), Some("P"));
        }
    }

    #[test]
    fn test_extreme_row_without_values() {
        let (_, cleaned) = load("name,networth,country,industry,age\nP,$1B,US,T,\n");
        assert!(matches!(
            extreme_row(&cleaned, "age", Extreme::Max),
            Err(InsightsError::EmptyDatasetError { .. })
        ));
    }
}

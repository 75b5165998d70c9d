use crate::core::aggregate::{
    extreme_row, missing_value_counts, summary_statistics, top_n_by_group, value_counts,
};
use crate::core::cleaning::clean;
use crate::core::distribution::{box_summary, histogram};
use crate::domain::model::{
    Aggregator, AgeSummary, AnalysisSettings, CountryNetworth, DashboardReport, Dataset, Extreme,
    NetworthDistribution, RawPreview, AGE_COLUMN, COUNTRY_COLUMN, INDUSTRY_COLUMN, NAME_COLUMN,
    NETWORTH_COLUMN,
};
use crate::utils::error::Result;

/// Cleans the upload and computes every dashboard section from it.
///
/// The preview and missing-value counts describe the file as uploaded; every
/// other section reads the cleaned rows.
pub fn build_report(dataset: Dataset, settings: &AnalysisSettings) -> Result<DashboardReport> {
    let total_rows = dataset.len();
    let raw_preview = RawPreview {
        columns: dataset.columns().to_vec(),
        rows: dataset
            .head(settings.preview_rows)
            .iter()
            .map(|r| r.cells.clone())
            .collect(),
    };
    let missing_values = missing_value_counts(&dataset);

    let data = clean(dataset, &settings.currency_markers, settings.row_policy)?;
    tracing::debug!(
        "Cleaned {} of {} rows ({} dropped)",
        data.len(),
        total_rows,
        data.dropped_rows()
    );

    let networth_summary = summary_statistics(&data, NETWORTH_COLUMN)?;
    let values = data.networth_values();
    let networth_distribution = NetworthDistribution {
        histogram: histogram(&values, settings.histogram_bins),
        box_summary: box_summary(NETWORTH_COLUMN, &values)?,
        values,
    };

    let country_index = data.column_index(COUNTRY_COLUMN)?;
    let networth_by_country = data
        .records()
        .iter()
        .filter_map(|record| {
            data.text(record, country_index).map(|country| CountryNetworth {
                country,
                networth: record.networth,
            })
        })
        .collect();

    let age = summary_statistics(&data, AGE_COLUMN)?;

    let report = DashboardReport {
        generated_at: chrono::Utc::now(),
        total_rows,
        dropped_rows: data.dropped_rows(),
        raw_preview,
        missing_values,
        networth_summary,
        networth_distribution,
        top_richest: top_n_by_group(
            &data,
            NAME_COLUMN,
            NETWORTH_COLUMN,
            settings.top_n,
            Aggregator::Sum,
        )?,
        country_counts: value_counts(&data, COUNTRY_COLUMN, settings.category_limit)?,
        networth_by_country,
        industry_counts: value_counts(&data, INDUSTRY_COLUMN, settings.category_limit)?,
        industry_average: top_n_by_group(
            &data,
            INDUSTRY_COLUMN,
            NETWORTH_COLUMN,
            settings.top_n,
            Aggregator::Mean,
        )?,
        age_summary: AgeSummary {
            mean: age.mean,
            median: age.median,
        },
        oldest: extreme_row(&data, AGE_COLUMN, Extreme::Max)?,
        youngest: extreme_row(&data, AGE_COLUMN, Extreme::Min)?,
    };

    Ok(report)
}

use crate::domain::model::{CategoryCount, DashboardReport, ExtremeRecord, RankedValue};
use crate::utils::error::{InsightsError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

const BAR_WIDTH: usize = 40;

fn money(value: f64) -> String {
    format!("${:.2}B", value)
}

fn plain_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

fn heading(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "{}", title)?;
    writeln!(f, "{}", "-".repeat(title.chars().count()))
}

fn bars(
    f: &mut fmt::Formatter<'_>,
    rows: &[(String, f64)],
    format_value: fn(f64) -> String,
) -> fmt::Result {
    let label_width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    let max = rows.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    for (label, value) in rows {
        let len = if max > 0.0 {
            ((value / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        writeln!(
            f,
            "  {:<width$}  {:<bar$}  {}",
            label,
            "#".repeat(len),
            format_value(*value),
            width = label_width,
            bar = BAR_WIDTH
        )?;
    }
    Ok(())
}

fn ranked_rows(values: &[RankedValue]) -> Vec<(String, f64)> {
    values.iter().map(|r| (r.key.trim().to_string(), r.value)).collect()
}

fn count_rows(counts: &[CategoryCount]) -> Vec<(String, f64)> {
    counts
        .iter()
        .map(|c| (c.category.clone(), c.count as f64))
        .collect()
}

fn extreme(f: &mut fmt::Formatter<'_>, record: &ExtremeRecord) -> fmt::Result {
    writeln!(f, "  name      {}", record.name.as_deref().unwrap_or("-").trim())?;
    writeln!(f, "  {:<9} {}", record.column, plain_number(record.value))?;
    writeln!(f, "  networth  {}", money(record.networth))
}

/// Plain-text dashboard, one headed block per section.
pub struct TextDashboard<'a>(pub &'a DashboardReport);

impl fmt::Display for TextDashboard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(f, "Forbes Billionaires Analysis")?;
        writeln!(
            f,
            "{} rows uploaded, {} dropped during cleaning",
            report.total_rows, report.dropped_rows
        )?;

        heading(f, "Raw Data")?;
        writeln!(f, "  {}", report.raw_preview.columns.join(" | "))?;
        for row in &report.raw_preview.rows {
            let cells: Vec<&str> = row.iter().map(|c| c.as_deref().unwrap_or("")).collect();
            writeln!(f, "  {}", cells.join(" | "))?;
        }

        heading(f, "Missing Values")?;
        let width = report
            .missing_values
            .iter()
            .map(|m| m.column.chars().count())
            .max()
            .unwrap_or(0);
        for missing in &report.missing_values {
            writeln!(f, "  {:<width$}  {}", missing.column, missing.missing, width = width)?;
        }

        let stats = &report.networth_summary;
        heading(f, "Net Worth Statistics")?;
        writeln!(
            f,
            "  Mean {}   Median {}   Min {}   Max {}",
            money(stats.mean),
            money(stats.median),
            money(stats.min),
            money(stats.max)
        )?;

        heading(f, "Net Worth Distribution")?;
        let bins: Vec<(String, f64)> = report
            .networth_distribution
            .histogram
            .iter()
            .map(|b| (format!("{:>8.2} - {:<8.2}", b.lower, b.upper), b.count as f64))
            .collect();
        bars(f, &bins, plain_number)?;

        let boxed = &report.networth_distribution.box_summary;
        heading(f, "Net Worth Boxplot")?;
        writeln!(
            f,
            "  whiskers {} .. {}   Q1 {}   median {}   Q3 {}   outliers {}",
            money(boxed.lower_whisker),
            money(boxed.upper_whisker),
            money(boxed.q1),
            money(boxed.median),
            money(boxed.q3),
            boxed.outliers
        )?;

        heading(f, "Top Richest Billionaires")?;
        bars(f, &ranked_rows(&report.top_richest), money)?;

        heading(f, "Billionaires by Country")?;
        bars(f, &count_rows(&report.country_counts), plain_number)?;

        heading(f, "Net Worth by Country")?;
        let mut by_country: BTreeMap<&str, (usize, f64, f64)> = BTreeMap::new();
        for point in &report.networth_by_country {
            let entry = by_country
                .entry(point.country.as_str())
                .or_insert((0, f64::INFINITY, f64::NEG_INFINITY));
            entry.0 += 1;
            entry.1 = entry.1.min(point.networth);
            entry.2 = entry.2.max(point.networth);
        }
        for (country, (count, low, high)) in by_country {
            writeln!(
                f,
                "  {}: {} points, {} .. {}",
                country,
                count,
                money(low),
                money(high)
            )?;
        }

        heading(f, "Industry Distribution")?;
        bars(f, &count_rows(&report.industry_counts), plain_number)?;

        heading(f, "Average Net Worth by Industry")?;
        bars(f, &ranked_rows(&report.industry_average), money)?;

        heading(f, "Age Analysis")?;
        writeln!(
            f,
            "  Average Age {:.2} years   Median Age {:.2} years",
            report.age_summary.mean, report.age_summary.median
        )?;

        heading(f, "Oldest Billionaire")?;
        extreme(f, &report.oldest)?;

        heading(f, "Youngest Billionaire")?;
        extreme(f, &report.youngest)
    }
}

pub fn render_text(report: &DashboardReport) -> String {
    TextDashboard(report).to_string()
}

pub fn render_json(report: &DashboardReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

fn to_csv<T: Serialize>(rows: &[T]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| InsightsError::IoError(e.into_error()))
}

#[derive(Serialize)]
struct NetworthValue {
    networth: f64,
}

/// One CSV per chart series, zipped together.
pub fn build_csv_bundle(report: &DashboardReport) -> Result<Vec<u8>> {
    let values: Vec<NetworthValue> = report
        .networth_distribution
        .values
        .iter()
        .map(|&networth| NetworthValue { networth })
        .collect();

    let files = [
        ("missing_values.csv", to_csv(&report.missing_values)?),
        ("networth_values.csv", to_csv(&values)?),
        (
            "networth_histogram.csv",
            to_csv(&report.networth_distribution.histogram)?,
        ),
        ("top_richest.csv", to_csv(&report.top_richest)?),
        ("country_counts.csv", to_csv(&report.country_counts)?),
        ("networth_by_country.csv", to_csv(&report.networth_by_country)?),
        ("industry_counts.csv", to_csv(&report.industry_counts)?),
        ("industry_average.csv", to_csv(&report.industry_average)?),
    ];

    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, data) in files {
        zip.start_file::<_, ()>(name, FileOptions::default())?;
        zip.write_all(&data)?;
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

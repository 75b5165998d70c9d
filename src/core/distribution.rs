use crate::core::aggregate::median_of_sorted;
use crate::domain::model::{BoxSummary, HistogramBin};
use crate::utils::error::{InsightsError, Result};

const WHISKER_SPAN: f64 = 1.5;

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Linear-interpolated quantile of already sorted values.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Equal-width bins over `[min, max]`; the last bin includes `max`.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: values.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut result: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for value in values {
        let index = (((value - min) / width).floor() as usize).min(bins - 1);
        result[index].count += 1;
    }
    result
}

/// Quartiles and 1.5 IQR whiskers for a boxplot.
pub fn box_summary(column: &str, values: &[f64]) -> Result<BoxSummary> {
    if values.is_empty() {
        return Err(InsightsError::EmptyDatasetError {
            column: column.to_string(),
        });
    }

    let sorted = sorted(values);
    let q1 = quantile(&sorted, 0.25);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;
    let low_fence = q1 - WHISKER_SPAN * iqr;
    let high_fence = q3 + WHISKER_SPAN * iqr;

    let inside: Vec<f64> = sorted
        .iter()
        .copied()
        .filter(|v| *v >= low_fence && *v <= high_fence)
        .collect();

    Ok(BoxSummary {
        q1,
        median: median_of_sorted(&sorted),
        q3,
        lower_whisker: inside.first().copied().unwrap_or(q1),
        upper_whisker: inside.last().copied().unwrap_or(q3),
        outliers: sorted.len() - inside.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&values, 0.25), 1.75);
        assert_eq!(quantile(&values, 0.5), 2.5);
        assert_eq!(quantile(&values, 1.0), 4.0);
    }

    #[test]
    fn test_histogram_counts_every_value() {
        let values = [1.0, 1.5, 2.0, 9.0, 10.0];
        let bins = histogram(&values, 3);

        assert_eq!(bins.len(), 3);
        assert_eq!(bins[0].lower, 1.0);
        assert_eq!(bins[2].upper, 10.0);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        assert_eq!(bins[0].count, 3);
        assert_eq!(bins[2].count, 2);
    }

    #[test]
    fn test_histogram_single_value() {
        let bins = histogram(&[4.0, 4.0], 10);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 2);
        assert!(histogram(&[], 10).is_empty());
    }

    #[test]
    fn test_box_summary_flags_outliers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let summary = box_summary("networth", &values).unwrap();

        assert_eq!(summary.median, 3.5);
        assert_eq!(summary.q1, 2.25);
        assert_eq!(summary.q3, 4.75);
        assert_eq!(summary.lower_whisker, 1.0);
        assert_eq!(summary.upper_whisker, 5.0);
        assert_eq!(summary.outliers, 1);
    }

    #[test]
    fn test_box_summary_empty() {
        assert!(box_summary("networth", &[]).is_err());
    }
}

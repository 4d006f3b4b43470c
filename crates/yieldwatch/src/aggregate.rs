//! Per-subject means and threshold classification.

use crate::types::{Classification, Reading, SubjectMean, SubjectReadings};

/// Arithmetic mean of a series, or `None` when it is empty.
///
/// Quantities are summed as `i64`; realistic herds stay far from overflow.
pub fn mean(series: &[Reading]) -> Option<f64> {
    if series.is_empty() {
        return None;
    }
    let sum: i64 = series.iter().map(|r| r.quantity).sum();
    Some(sum as f64 / series.len() as f64)
}

/// Split subjects into `high` (mean >= threshold) and `low`, in id order.
///
/// Subjects with an empty series have no mean and are left out of both
/// sets. The engine rejects such input before calling this.
pub fn classify(readings: &SubjectReadings, threshold: f64) -> Classification {
    let mut high = Vec::new();
    let mut low = Vec::new();
    let mut means = Vec::with_capacity(readings.len());

    for (subject, series) in readings {
        let Some(avg) = mean(series) else {
            continue;
        };

        if avg >= threshold {
            high.push(subject.clone());
        } else {
            low.push(subject.clone());
        }
        means.push(SubjectMean {
            subject: subject.clone(),
            mean: avg,
        });
    }

    Classification {
        threshold,
        found: !high.is_empty(),
        high,
        low,
        means,
    }
}

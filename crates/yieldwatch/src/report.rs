//! Reporting surface for engine results.
//!
//! The engine hands every intermediate result to a [`ReportSink`]. Sinks
//! decide how (or whether) to render them; all hooks default to no-ops.

use crate::types::{Classification, PatternOutcome, Subject, SubjectReadings};

/// Receiver of engine results.
pub trait ReportSink {
    /// The monitored subjects, in id order.
    fn subjects(&self, _subjects: &[&Subject]) {}

    /// Readings per subject, under a caption.
    fn readings(&self, _title: &str, _readings: &SubjectReadings) {}

    /// Output of `sort_all`.
    fn sorted(&self, _readings: &SubjectReadings) {}

    /// Output of a pattern search.
    fn pattern(&self, _outcome: &PatternOutcome) {}

    /// Output of a classification by average.
    fn classification(&self, _classification: &Classification) {}
}

impl<T: ReportSink + ?Sized> ReportSink for &T {
    fn subjects(&self, subjects: &[&Subject]) {
        (**self).subjects(subjects)
    }

    fn readings(&self, title: &str, readings: &SubjectReadings) {
        (**self).readings(title, readings)
    }

    fn sorted(&self, readings: &SubjectReadings) {
        (**self).sorted(readings)
    }

    fn pattern(&self, outcome: &PatternOutcome) {
        (**self).pattern(outcome)
    }

    fn classification(&self, classification: &Classification) {
        (**self).classification(classification)
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ReportSink for NullSink {}

/// Forwards results as structured `tracing` events at INFO level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn subjects(&self, subjects: &[&Subject]) {
        for subject in subjects {
            tracing::info!(id = %subject.id, name = %subject.name, "monitored subject");
        }
    }

    fn readings(&self, title: &str, readings: &SubjectReadings) {
        for (subject, series) in readings {
            let quantities: Vec<i64> = series.iter().map(|r| r.quantity).collect();
            tracing::info!(title, subject = %subject.id, ?quantities, "readings");
        }
    }

    fn sorted(&self, readings: &SubjectReadings) {
        self.readings("sorted", readings);
    }

    fn pattern(&self, outcome: &PatternOutcome) {
        tracing::info!(
            pattern = ?outcome.pattern,
            found = outcome.found,
            matched = outcome.matched.len(),
            unmatched = outcome.unmatched.len(),
            "pattern search"
        );
    }

    fn classification(&self, classification: &Classification) {
        for m in &classification.means {
            tracing::info!(
                subject = %m.subject.id,
                mean = m.mean,
                high = m.mean >= classification.threshold,
                "subject mean"
            );
        }
        tracing::info!(
            threshold = classification.threshold,
            found = classification.found,
            high = classification.high.len(),
            low = classification.low.len(),
            "classification"
        );
    }
}

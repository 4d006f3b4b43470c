//! Operations engine: validates input and sequences the sorter, the pattern
//! matcher and the aggregator over a whole [`SubjectReadings`] mapping.
//!
//! The engine keeps no state between calls. Sorting works on copies, so the
//! caller's series are never reordered behind its back.

use crate::aggregate;
use crate::pattern::find_pattern;
use crate::report::{NullSink, ReportSink};
use crate::sorting::merge_sort;
use crate::types::{
    Classification, EngineError, EngineResult, PatternMatch, PatternOutcome, Reading,
    SubjectReadings,
};

/// Entry point for the three analytical operations.
#[derive(Debug, Default, Clone)]
pub struct OperationsEngine<S = NullSink> {
    sink: S,
}

impl OperationsEngine<NullSink> {
    /// Create an engine that reports nowhere.
    pub fn new() -> Self {
        Self { sink: NullSink }
    }
}

impl<S: ReportSink> OperationsEngine<S> {
    /// Create an engine that hands every result to `sink`.
    pub fn with_sink(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Report the monitored subjects.
    pub fn report_subjects(&self, readings: &SubjectReadings) {
        let subjects: Vec<_> = readings.keys().collect();
        self.sink.subjects(&subjects);
    }

    /// Report every subject's readings as they are.
    pub fn report_readings(&self, title: &str, readings: &SubjectReadings) {
        self.sink.readings(title, readings);
    }

    /// Return a new mapping with every series sorted ascending by quantity.
    pub fn sort_all(&self, readings: &SubjectReadings) -> EngineResult<SubjectReadings> {
        validate_subjects(readings)?;

        let sorted: SubjectReadings = readings
            .iter()
            .map(|(subject, series)| {
                tracing::debug!(subject = %subject.id, len = series.len(), "sorting series");
                let mut copy = series.clone();
                merge_sort(&mut copy);
                (subject.clone(), copy)
            })
            .collect();

        tracing::info!(subjects = sorted.len(), "sorted all series");
        self.sink.sorted(&sorted);
        Ok(sorted)
    }

    /// Search every subject's current series for `pattern`.
    pub fn search_pattern(
        &self,
        readings: &SubjectReadings,
        pattern: &[Reading],
    ) -> EngineResult<PatternOutcome> {
        validate_subjects(readings)?;

        let mut matched = Vec::new();
        let mut unmatched = Vec::new();

        for (subject, series) in readings {
            match find_pattern(series, pattern) {
                Some(offset) => {
                    tracing::debug!(subject = %subject.id, offset, "pattern found");
                    matched.push(PatternMatch {
                        subject: subject.clone(),
                        offset,
                    });
                }
                None => unmatched.push(subject.clone()),
            }
        }

        let outcome = PatternOutcome {
            pattern: pattern.iter().map(|r| r.quantity).collect(),
            found: !matched.is_empty(),
            matched,
            unmatched,
        };

        tracing::info!(
            found = outcome.found,
            matched = outcome.matched.len(),
            "pattern search finished"
        );
        self.sink.pattern(&outcome);
        Ok(outcome)
    }

    /// Whether at least one subject's series contains `pattern`.
    pub fn pattern_exists(
        &self,
        readings: &SubjectReadings,
        pattern: &[Reading],
    ) -> EngineResult<bool> {
        Ok(self.search_pattern(readings, pattern)?.found)
    }

    /// Classify every subject by mean against `threshold`.
    ///
    /// Fails without classifying anything if any subject has no readings.
    pub fn classify(
        &self,
        readings: &SubjectReadings,
        threshold: f64,
    ) -> EngineResult<Classification> {
        if !threshold.is_finite() {
            return Err(EngineError::InvalidThreshold(threshold));
        }
        validate_subjects(readings)?;
        if let Some((subject, _)) = readings.iter().find(|(_, series)| series.is_empty()) {
            return Err(EngineError::NoReadings {
                subject: subject.id.clone(),
            });
        }

        let classification = aggregate::classify(readings, threshold);

        tracing::info!(
            threshold,
            high = classification.high.len(),
            low = classification.low.len(),
            "classified subjects by average"
        );
        self.sink.classification(&classification);
        Ok(classification)
    }

    /// Whether at least one subject's mean is `>= threshold`.
    pub fn classify_by_average(
        &self,
        readings: &SubjectReadings,
        threshold: f64,
    ) -> EngineResult<bool> {
        Ok(self.classify(readings, threshold)?.found)
    }
}

fn validate_subjects(readings: &SubjectReadings) -> EngineResult<()> {
    for subject in readings.keys() {
        if subject.id.trim().is_empty() {
            return Err(EngineError::InvalidSubject(format!(
                "empty id for subject named '{}'",
                subject.name
            )));
        }
    }
    Ok(())
}

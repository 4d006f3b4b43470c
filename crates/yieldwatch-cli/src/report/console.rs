//! Human-readable report written line by line.

use std::cell::RefCell;
use std::io::Write;

use yieldwatch::{Classification, PatternOutcome, ReportSink, Subject, SubjectReadings};

use super::format_series;

/// Writes each result as plain text as soon as the engine produces it.
pub struct ConsoleReport<W: Write> {
    out: RefCell<W>,
}

impl ConsoleReport<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsoleReport<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn line(&self, text: &str) {
        if let Err(e) = writeln!(self.out.borrow_mut(), "{text}") {
            tracing::warn!("Failed to write report line: {e}");
        }
    }

    fn series_block(&self, title: &str, readings: &SubjectReadings) {
        self.line(&format!("{title}:"));
        for (subject, series) in readings {
            self.line(&format!("  {subject}: {}", format_series(series)));
        }
    }
}

impl<W: Write> ReportSink for ConsoleReport<W> {
    fn subjects(&self, subjects: &[&Subject]) {
        self.line("Monitored subjects:");
        for subject in subjects {
            self.line(&format!("  {subject}"));
        }
    }

    fn readings(&self, title: &str, readings: &SubjectReadings) {
        self.series_block(title, readings);
    }

    fn sorted(&self, readings: &SubjectReadings) {
        self.series_block("Sorted readings", readings);
    }

    fn pattern(&self, outcome: &PatternOutcome) {
        if outcome.found {
            self.line(&format!(
                "Pattern {:?} found in {} subject(s):",
                outcome.pattern,
                outcome.matched.len()
            ));
            for m in &outcome.matched {
                self.line(&format!("  {} at position {}", m.subject, m.offset));
            }
        } else {
            self.line(&format!("Pattern {:?} not found", outcome.pattern));
        }
    }

    fn classification(&self, classification: &Classification) {
        let threshold = classification.threshold;
        let mean_of = |s: &Subject| classification.mean_of(&s.id).unwrap_or(f64::NAN);

        self.line(&format!("Subjects with mean >= {threshold}:"));
        for subject in &classification.high {
            self.line(&format!(
                "  id: {}, name: {}, mean: {:.2}",
                subject.id,
                subject.name,
                mean_of(subject)
            ));
        }

        self.line(&format!("Subjects with mean < {threshold}:"));
        for subject in &classification.low {
            self.line(&format!(
                "  id: {}, name: {}, mean: {:.2}",
                subject.id,
                subject.name,
                mean_of(subject)
            ));
        }
    }
}

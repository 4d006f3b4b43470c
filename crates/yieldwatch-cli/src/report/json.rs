//! Machine-readable report collected into a single JSON document.

use std::cell::RefCell;

use serde_json::{json, Map, Value};

use yieldwatch::{Classification, PatternOutcome, ReportSink, Subject, SubjectReadings};

/// Collects results keyed by kind; render with [`JsonReport::into_value`].
#[derive(Debug, Default)]
pub struct JsonReport {
    doc: RefCell<Map<String, Value>>,
}

impl JsonReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.doc.into_inner())
    }

    fn put(&self, key: &str, value: Value) {
        self.doc.borrow_mut().insert(key.to_string(), value);
    }
}

fn readings_value(readings: &SubjectReadings) -> Value {
    Value::Array(
        readings
            .iter()
            .map(|(subject, series)| {
                json!({
                    "id": subject.id,
                    "name": subject.name,
                    "readings": series.iter().map(|r| r.quantity).collect::<Vec<_>>(),
                })
            })
            .collect(),
    )
}

impl ReportSink for JsonReport {
    fn subjects(&self, subjects: &[&Subject]) {
        self.put("subjects", json!(subjects));
    }

    fn readings(&self, _title: &str, readings: &SubjectReadings) {
        self.put("readings", readings_value(readings));
    }

    fn sorted(&self, readings: &SubjectReadings) {
        self.put("sorted", readings_value(readings));
    }

    fn pattern(&self, outcome: &PatternOutcome) {
        self.put("pattern", json!(outcome));
    }

    fn classification(&self, classification: &Classification) {
        self.put("classification", json!(classification));
    }
}

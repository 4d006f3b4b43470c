//! Sequencing of engine operations for the command line and the REPL.

use serde::Serialize;

use yieldwatch::{EngineResult, OperationsEngine, Reading, ReportSink, SubjectReadings};

use crate::config::SimulationConfig;

/// What a full run found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub pattern_found: bool,
    pub high_found: bool,
}

/// A single analysis to run over a herd.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Everything, in the order a herd report reads.
    All,
    Sort,
    Pattern(Vec<i64>),
    Classify(f64),
}

/// Pattern quantities as readings.
pub fn pattern_readings(pattern: &[i64]) -> Vec<Reading> {
    pattern.iter().copied().map(Reading::new).collect()
}

/// Run `operation` over `readings`, reporting through the engine's sink.
pub fn execute<S: ReportSink>(
    engine: &OperationsEngine<S>,
    readings: &SubjectReadings,
    config: &SimulationConfig,
    operation: &Operation,
) -> EngineResult<RunSummary> {
    let mut summary = RunSummary {
        pattern_found: false,
        high_found: false,
    };

    match operation {
        Operation::All => {
            engine.report_subjects(readings);
            engine.report_readings("Readings", readings);
            // The pattern is looked for in the ordered readings.
            let sorted = engine.sort_all(readings)?;
            summary.pattern_found =
                engine.pattern_exists(&sorted, &pattern_readings(&config.pattern))?;
            summary.high_found = engine.classify_by_average(readings, config.threshold)?;
        }
        Operation::Sort => {
            engine.sort_all(readings)?;
        }
        Operation::Pattern(pattern) => {
            summary.pattern_found = engine.pattern_exists(readings, &pattern_readings(pattern))?;
        }
        Operation::Classify(threshold) => {
            summary.high_found = engine.classify_by_average(readings, *threshold)?;
        }
    }

    tracing::info!(
        pattern_found = summary.pattern_found,
        high_found = summary.high_found,
        "run finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use yieldwatch::{series_of, EngineError, Subject};

    fn herd() -> SubjectReadings {
        let mut readings = SubjectReadings::new();
        readings.insert(Subject::new("1", "Mimosa"), series_of(&[18, 20, 24]));
        readings.insert(Subject::new("2", "Estrela"), series_of(&[15, 16]));
        readings
    }

    #[test]
    fn test_all_runs_every_operation() {
        let engine = OperationsEngine::new();
        let summary = execute(
            &engine,
            &herd(),
            &SimulationConfig::default(),
            &Operation::All,
        )
        .unwrap();
        assert_eq!(
            summary,
            RunSummary {
                pattern_found: true,
                high_found: true
            }
        );
    }

    #[test]
    fn test_all_searches_sorted_readings() {
        let mut readings = SubjectReadings::new();
        readings.insert(Subject::new("1", "Mimosa"), series_of(&[20, 18, 21]));
        let engine = OperationsEngine::new();

        let summary = execute(
            &engine,
            &readings,
            &SimulationConfig::default(),
            &Operation::All,
        )
        .unwrap();
        assert!(summary.pattern_found);

        let direct = execute(
            &engine,
            &readings,
            &SimulationConfig::default(),
            &Operation::Pattern(vec![18, 20]),
        )
        .unwrap();
        assert!(!direct.pattern_found);
    }

    #[test]
    fn test_single_operations() {
        let engine = OperationsEngine::new();
        let config = SimulationConfig::default();

        let s = execute(&engine, &herd(), &config, &Operation::Pattern(vec![16, 15])).unwrap();
        assert!(!s.pattern_found);

        let s = execute(&engine, &herd(), &config, &Operation::Classify(21.0)).unwrap();
        assert!(!s.high_found);
    }

    #[test]
    fn test_error_propagates() {
        let mut readings = herd();
        readings.insert(Subject::new("3", "Luzia"), Vec::new());
        let engine = OperationsEngine::new();
        let err = execute(
            &engine,
            &readings,
            &SimulationConfig::default(),
            &Operation::All,
        )
        .unwrap_err();
        assert_eq!(
            err,
            EngineError::NoReadings {
                subject: "3".into()
            }
        );
    }
}

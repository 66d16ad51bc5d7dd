use super::row::{ReportRow, parse_seconds};
use super::types::{CheckoutStep, ReportSummary, RunStatus, StepStatus};
use crate::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// A report artifact read back from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedReport {
    pub steps: Vec<CheckoutStep>,
    pub summary: Option<ReportSummary>,
}

impl ParsedReport {
    /// Verdict from the summary row, or derived from the steps when it is missing.
    pub fn status(&self) -> RunStatus {
        match &self.summary {
            Some(summary) => summary.status,
            None => ReportSummary::from_steps(&self.steps).status,
        }
    }

    pub fn failed_step(&self) -> Option<&CheckoutStep> {
        self.steps.iter().find(|s| s.status == StepStatus::Failed)
    }
}

pub struct ReportReader;

impl ReportReader {
    /// Read and parse an exported report from the given path
    pub fn from_file(path: &Path) -> Result<ParsedReport> {
        tracing::debug!("Reading step report from: {}", path.display());

        let file = File::open(path)?;
        let report = Self::from_reader(BufReader::new(file))?;

        tracing::info!(
            "Parsed step report with {} steps from {}",
            report.steps.len(),
            path.display()
        );
        Ok(report)
    }

    pub fn from_str(content: &str) -> Result<ParsedReport> {
        Self::from_reader(content.as_bytes())
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<ParsedReport> {
        let mut csv = csv::Reader::from_reader(reader);
        let mut steps = Vec::new();
        let mut summary = None;

        for (line, row) in csv.deserialize::<ReportRow>().enumerate() {
            let row = row?;
            if summary.is_some() {
                return Err(Error::InvalidReport(format!(
                    "row {} follows the summary row",
                    line + 1
                )));
            }

            if row.is_summary() {
                summary = Some(parse_summary(&row)?);
            } else {
                steps.push(parse_step(&row, line + 1)?);
            }
        }

        Ok(ParsedReport { steps, summary })
    }
}

fn parse_step(row: &ReportRow, line: usize) -> Result<CheckoutStep> {
    let index = row
        .step_number
        .ok_or_else(|| Error::InvalidReport(format!("row {} has no step number", line)))?;
    let duration = parse_seconds(&row.duration).ok_or_else(|| {
        Error::InvalidReport(format!("row {} has invalid duration '{}'", line, row.duration))
    })?;

    Ok(CheckoutStep {
        index,
        name: row.step_name.clone(),
        status: row.status.parse()?,
        duration,
        details: row.details.clone(),
        error: if row.error_message.is_empty() {
            None
        } else {
            Some(row.error_message.clone())
        },
    })
}

fn parse_summary(row: &ReportRow) -> Result<ReportSummary> {
    let (total, passed, failed) = ReportSummary::parse_details(&row.details).ok_or_else(|| {
        Error::InvalidReport(format!("malformed summary details '{}'", row.details))
    })?;
    let duration = parse_seconds(&row.duration).ok_or_else(|| {
        Error::InvalidReport(format!("summary has invalid duration '{}'", row.duration))
    })?;

    Ok(ReportSummary {
        total,
        passed,
        failed,
        duration,
        status: row.status.parse()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{ReportSink, ReportWriter, StepReport};
    use std::time::Duration;

    fn steps() -> Vec<CheckoutStep> {
        vec![
            CheckoutStep::pending(0, "User Registration")
                .succeed(Duration::from_millis(1500), "Registered user: a@example.com"),
            CheckoutStep::pending(1, "Logout After Registration")
                .succeed(Duration::from_millis(250), "User logged out after registration"),
            CheckoutStep::pending(2, "Login with New Credentials").fail(
                Duration::from_millis(2000),
                "Failed to login with new credentials: a@example.com",
                "Timeout after 5s waiting for \"authenticated\" session",
            ),
        ]
    }

    #[test]
    fn test_export_then_parse_reconstructs_steps() {
        let mut report = StepReport::new();
        for step in steps() {
            report.record(step).unwrap();
        }
        let report = report.finalize();

        let dir = tempfile::tempdir().unwrap();
        let path = ReportWriter::to_file(&report, &ReportSink::new(dir.path(), "roundtrip")).unwrap();
        let parsed = ReportReader::from_file(&path).unwrap();

        assert_eq!(parsed.steps, steps());
        let summary = parsed.summary.clone().unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.duration, Duration::from_millis(3750));
        assert_eq!(parsed.status(), RunStatus::Failed);
        assert_eq!(parsed.failed_step().unwrap().index, 2);
    }

    #[test]
    fn test_round_trip_with_measured_durations() {
        let steps: Vec<CheckoutStep> = (0..3)
            .map(|i| {
                CheckoutStep::pending(i, format!("Step {}", i))
                    .succeed(Duration::from_micros(1_234_567 + i as u64), "ok")
            })
            .collect();
        let mut report = StepReport::new();
        for step in steps.clone() {
            report.record(step).unwrap();
        }
        let report = report.finalize();

        let dir = tempfile::tempdir().unwrap();
        let path = ReportWriter::to_file(&report, &ReportSink::new(dir.path(), "measured")).unwrap();
        let parsed = ReportReader::from_file(&path).unwrap();

        assert_eq!(parsed.steps, steps);
        let row_total: Duration = parsed.steps.iter().map(|s| s.duration).sum();
        assert_eq!(parsed.summary.unwrap().duration, row_total);
        assert_eq!(row_total, Duration::from_millis(3690));
    }

    #[test]
    fn test_parse_report_without_summary() {
        let csv = "Step Number,Step Name,Status,Duration (seconds),Details,Error Message\n\
                   0,User Registration,SUCCESS,1.00,ok,\n";
        let parsed = ReportReader::from_str(csv).unwrap();

        assert_eq!(parsed.steps.len(), 1);
        assert!(parsed.summary.is_none());
        assert_eq!(parsed.status(), RunStatus::Passed);
    }

    #[test]
    fn test_rows_after_summary_are_rejected() {
        let csv = "Step Number,Step Name,Status,Duration (seconds),Details,Error Message\n\
                   ,SUMMARY,PASSED,0.00,\"Total: 0, Passed: 0, Failed: 0\",\n\
                   0,User Registration,SUCCESS,1.00,ok,\n";
        let err = ReportReader::from_str(csv).unwrap_err();
        assert!(matches!(err, Error::InvalidReport(_)));
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let csv = "Step Number,Step Name,Status,Duration (seconds),Details,Error Message\n\
                   0,User Registration,MAYBE,1.00,ok,\n";
        assert!(matches!(
            ReportReader::from_str(csv),
            Err(Error::InvalidReport(_))
        ));
    }
}

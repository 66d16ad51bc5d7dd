use super::FinalReport;
use super::row::ReportRow;
use crate::{Error, Result};
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Where exported reports land and how they are named.
#[derive(Debug, Clone)]
pub struct ReportSink {
    dir: PathBuf,
    name: String,
}

impl ReportSink {
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create a fresh `<name>_<timestamp>[_n].csv` file that did not exist before.
    fn create_unique(&self) -> Result<(PathBuf, File)> {
        std::fs::create_dir_all(&self.dir).map_err(|source| Error::ReportWrite {
            path: self.dir.clone(),
            source,
        })?;

        let stem = format!("{}_{}", self.name, Local::now().format("%Y%m%d_%H%M%S"));
        let mut attempt = 0usize;
        loop {
            let file_name = if attempt == 0 {
                format!("{}.csv", stem)
            } else {
                format!("{}_{}.csv", stem, attempt)
            };
            let path = self.dir.join(file_name);

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
                Err(source) => return Err(Error::ReportWrite { path, source }),
            }
        }
    }
}

pub struct ReportWriter;

impl ReportWriter {
    /// Export a finalized report into a new file under the sink's directory
    pub fn to_file(report: &FinalReport, sink: &ReportSink) -> Result<PathBuf> {
        let (path, file) = sink.create_unique()?;
        tracing::debug!("Writing step report to: {}", path.display());

        Self::to_writer(report, BufWriter::new(file)).map_err(|e| match e {
            Error::Csv(csv) => Error::ReportWrite {
                path: path.clone(),
                source: csv.into(),
            },
            Error::Io(source) => Error::ReportWrite {
                path: path.clone(),
                source,
            },
            other => other,
        })?;

        tracing::info!(
            "Step report with {} steps written to {}",
            report.steps().len(),
            path.display()
        );
        Ok(path)
    }

    /// Serialize the steps plus the trailing summary row as CSV
    pub fn to_writer<W: Write>(report: &FinalReport, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);

        for step in report.steps() {
            csv.serialize(ReportRow::from_step(step))?;
        }
        csv.serialize(ReportRow::from_summary(report.summary()))?;
        csv.flush()?;

        Ok(())
    }

    pub fn to_string(report: &FinalReport) -> Result<String> {
        let mut buffer = Vec::new();
        Self::to_writer(report, &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| Error::InvalidReport(format!("report is not UTF-8: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{CheckoutStep, StepReport};
    use std::time::Duration;

    fn sample_report() -> FinalReport {
        let mut report = StepReport::new();
        report
            .record(
                CheckoutStep::pending(0, "User Registration")
                    .succeed(Duration::from_millis(1234), "Registered user: a@example.com"),
            )
            .unwrap();
        report
            .record(CheckoutStep::pending(1, "Logout After Registration").fail(
                Duration::from_millis(500),
                "Failed to logout, retry later",
                "Element not found: Log out",
            ))
            .unwrap();
        report.finalize()
    }

    #[test]
    fn test_report_to_string_has_header_and_summary() {
        let csv = ReportWriter::to_string(&sample_report()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "Step Number,Step Name,Status,Duration (seconds),Details,Error Message"
        );
        assert_eq!(
            lines[1],
            "0,User Registration,SUCCESS,1.23,Registered user: a@example.com,"
        );
        assert!(lines[2].starts_with("1,Logout After Registration,FAILED,0.50,"));
        assert!(lines[2].contains("\"Failed to logout, retry later\""));
        assert_eq!(lines[3], ",SUMMARY,FAILED,1.73,\"Total: 2, Passed: 1, Failed: 1\",");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_same_second_exports_do_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let sink = ReportSink::new(dir.path(), "e2e_checkout_test");
        let report = sample_report();

        let first = ReportWriter::to_file(&report, &sink).unwrap();
        let second = ReportWriter::to_file(&report, &sink).unwrap();

        assert_ne!(first, second);
        assert!(first.exists());
        assert!(second.exists());
        let name = first.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("e2e_checkout_test_"));
        assert!(name.ends_with(".csv"));
    }

    #[test]
    fn test_export_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let sink = ReportSink::new(dir.path().join("nested").join("reports"), "run");

        let path = ReportWriter::to_file(&sample_report(), &sink).unwrap();
        assert!(path.starts_with(dir.path().join("nested").join("reports")));
    }

    #[test]
    fn test_unwritable_location_is_report_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "occupied").unwrap();

        let sink = ReportSink::new(blocker.join("reports"), "run");
        let err = ReportWriter::to_file(&sample_report(), &sink).unwrap_err();

        assert!(matches!(err, Error::ReportWrite { .. }));
    }
}

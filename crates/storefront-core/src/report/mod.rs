//! Step result reporting.
//!
//! A [`StepReport`] accumulates the steps of one run in order. Calling
//! [`StepReport::finalize`] consumes it and yields a read-only
//! [`FinalReport`] carrying the derived summary, which can then be exported
//! as a CSV artifact and parsed back with [`ReportReader`].

mod reader;
mod row;
mod types;
mod writer;

pub use reader::{ParsedReport, ReportReader};
pub use types::*;
pub use writer::{ReportSink, ReportWriter};

use crate::{Error, Result};
use std::path::PathBuf;

/// Append-only accumulator for the steps of a single run.
#[derive(Debug, Default)]
pub struct StepReport {
    steps: Vec<CheckoutStep>,
}

impl StepReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the next recorded step must carry.
    pub fn next_index(&self) -> usize {
        self.steps.len()
    }

    /// Append a finished step.
    ///
    /// Indices must be contiguous from zero; anything else is rejected with
    /// [`Error::DuplicateIndex`] and the report is left untouched.
    pub fn record(&mut self, step: CheckoutStep) -> Result<()> {
        let expected = self.next_index();
        if step.index != expected {
            return Err(Error::DuplicateIndex {
                expected,
                got: step.index,
            });
        }
        if !step.is_finalized() {
            return Err(Error::StepNotFinalized(step.index));
        }

        tracing::debug!("Recorded step {}: {} - {}", step.index, step.name, step.status);
        self.steps.push(step);
        Ok(())
    }

    pub fn steps(&self) -> &[CheckoutStep] {
        &self.steps
    }

    pub fn has_failure(&self) -> bool {
        self.steps.iter().any(|s| s.status == StepStatus::Failed)
    }

    /// Compute the summary and freeze the report.
    pub fn finalize(self) -> FinalReport {
        let summary = ReportSummary::from_steps(&self.steps);
        tracing::info!(
            "Summary - Total: {}, Passed: {}, Failed: {}",
            summary.total,
            summary.passed,
            summary.failed
        );

        FinalReport {
            steps: self.steps,
            summary,
        }
    }
}

/// A report whose step sequence and summary can no longer change.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalReport {
    steps: Vec<CheckoutStep>,
    summary: ReportSummary,
}

impl FinalReport {
    pub fn steps(&self) -> &[CheckoutStep] {
        &self.steps
    }

    pub fn summary(&self) -> &ReportSummary {
        &self.summary
    }

    pub fn passed(&self) -> bool {
        self.summary.status == RunStatus::Passed
    }

    pub fn export(&self, sink: &ReportSink) -> Result<PathBuf> {
        ReportWriter::to_file(self, sink)
    }
}

use crate::Error;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepStatus {
    Pending,
    Success,
    Failed,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Pending => "PENDING",
            StepStatus::Success => "SUCCESS",
            StepStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(StepStatus::Pending),
            "SUCCESS" => Ok(StepStatus::Success),
            "FAILED" => Ok(StepStatus::Failed),
            other => Err(Error::InvalidReport(format!("unknown step status '{}'", other))),
        }
    }
}

/// Overall verdict of a run, written on the summary row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunStatus {
    Passed,
    Failed,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Passed => "PASSED",
            RunStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PASSED" => Ok(RunStatus::Passed),
            "FAILED" => Ok(RunStatus::Failed),
            other => Err(Error::InvalidReport(format!("unknown run status '{}'", other))),
        }
    }
}

/// One reportable step of a checkout run.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutStep {
    pub index: usize,
    pub name: String,
    pub status: StepStatus,
    pub duration: Duration,
    pub details: String,
    pub error: Option<String>,
}

impl CheckoutStep {
    /// A step that has started but has no outcome yet.
    pub fn pending(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            status: StepStatus::Pending,
            duration: Duration::ZERO,
            details: String::new(),
            error: None,
        }
    }

    pub fn succeed(mut self, duration: Duration, details: impl Into<String>) -> Self {
        self.status = StepStatus::Success;
        self.duration = centiseconds(duration);
        self.details = details.into();
        self.error = None;
        self
    }

    pub fn fail(
        mut self,
        duration: Duration,
        details: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        self.status = StepStatus::Failed;
        self.duration = centiseconds(duration);
        self.details = details.into();
        self.error = Some(error.into());
        self
    }

    pub fn is_finalized(&self) -> bool {
        self.status != StepStatus::Pending
    }
}

/// Durations are kept at the two-decimal precision the report is written with.
fn centiseconds(duration: Duration) -> Duration {
    const CENTI_NANOS: u128 = 10_000_000;
    let centis = (duration.as_nanos() + CENTI_NANOS / 2) / CENTI_NANOS;
    Duration::from_millis(u64::try_from(centis * 10).unwrap_or(u64::MAX))
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration: Duration,
    pub status: RunStatus,
}

impl ReportSummary {
    pub fn from_steps(steps: &[CheckoutStep]) -> Self {
        let total = steps.len();
        let passed = steps
            .iter()
            .filter(|s| s.status == StepStatus::Success)
            .count();
        let failed = total - passed;
        let duration = steps.iter().map(|s| s.duration).sum();

        Self {
            total,
            passed,
            failed,
            duration,
            status: if failed == 0 {
                RunStatus::Passed
            } else {
                RunStatus::Failed
            },
        }
    }

    /// Text written to the Details column of the summary row.
    pub fn details(&self) -> String {
        format!(
            "Total: {}, Passed: {}, Failed: {}",
            self.total, self.passed, self.failed
        )
    }

    pub(crate) fn parse_details(details: &str) -> Option<(usize, usize, usize)> {
        let mut counts = [None; 3];
        for part in details.split(',') {
            let (key, value) = part.split_once(':')?;
            let value: usize = value.trim().parse().ok()?;
            match key.trim() {
                "Total" => counts[0] = Some(value),
                "Passed" => counts[1] = Some(value),
                "Failed" => counts[2] = Some(value),
                _ => return None,
            }
        }
        Some((counts[0]?, counts[1]?, counts[2]?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(index: usize, status: StepStatus, millis: u64) -> CheckoutStep {
        let pending = CheckoutStep::pending(index, format!("Step {}", index));
        let duration = Duration::from_millis(millis);
        match status {
            StepStatus::Success => pending.succeed(duration, "ok"),
            StepStatus::Failed => pending.fail(duration, "failed", "boom"),
            StepStatus::Pending => pending,
        }
    }

    #[test]
    fn test_summary_passes_without_failures() {
        let steps = vec![
            step(0, StepStatus::Success, 1000),
            step(1, StepStatus::Success, 500),
        ];
        let summary = ReportSummary::from_steps(&steps);

        assert_eq!(summary.total, 2);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.duration, Duration::from_millis(1500));
        assert_eq!(summary.status, RunStatus::Passed);
    }

    #[test]
    fn test_any_failure_fails_summary() {
        let steps = vec![
            step(0, StepStatus::Success, 1000),
            step(1, StepStatus::Failed, 250),
        ];
        let summary = ReportSummary::from_steps(&steps);

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.status, RunStatus::Failed);
        assert_eq!(summary.details(), "Total: 2, Passed: 1, Failed: 1");
    }

    #[test]
    fn test_finalized_duration_is_rounded_to_centiseconds() {
        let done = CheckoutStep::pending(0, "Confirm Order")
            .succeed(Duration::from_micros(1_234_567), "ok");
        assert_eq!(done.duration, Duration::from_millis(1230));

        let failed = CheckoutStep::pending(1, "Confirm Order")
            .fail(Duration::from_micros(1_235_001), "failed", "boom");
        assert_eq!(failed.duration, Duration::from_millis(1240));
    }

    #[test]
    fn test_summary_sums_rounded_durations() {
        let steps: Vec<_> = (0..3)
            .map(|i| {
                CheckoutStep::pending(i, format!("Step {}", i))
                    .succeed(Duration::from_micros(1_234_567 + i as u64), "ok")
            })
            .collect();
        assert_eq!(
            ReportSummary::from_steps(&steps).duration,
            Duration::from_millis(3690)
        );
    }

    #[test]
    fn test_empty_report_passes() {
        let summary = ReportSummary::from_steps(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.status, RunStatus::Passed);
    }

    #[test]
    fn test_parse_summary_details() {
        assert_eq!(
            ReportSummary::parse_details("Total: 13, Passed: 12, Failed: 1"),
            Some((13, 12, 1))
        );
        assert_eq!(ReportSummary::parse_details("Total: 3"), None);
        assert_eq!(ReportSummary::parse_details("garbage"), None);
    }

    #[test]
    fn test_step_lifecycle() {
        let pending = CheckoutStep::pending(4, "Cart Validation");
        assert!(!pending.is_finalized());

        let failed = pending.fail(Duration::from_secs(2), "Failed to validate cart", "Cart is empty");
        assert!(failed.is_finalized());
        assert_eq!(failed.status, StepStatus::Failed);
        assert_eq!(failed.error.as_deref(), Some("Cart is empty"));
    }

    #[test]
    fn test_status_strings() {
        assert_eq!("SUCCESS".parse::<StepStatus>().unwrap(), StepStatus::Success);
        assert_eq!(StepStatus::Failed.to_string(), "FAILED");
        assert!("success".parse::<StepStatus>().is_err());
        assert_eq!("PASSED".parse::<RunStatus>().unwrap(), RunStatus::Passed);
    }
}

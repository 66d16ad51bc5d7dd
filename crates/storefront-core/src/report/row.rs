use super::types::{CheckoutStep, ReportSummary};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub(crate) const SUMMARY_NAME: &str = "SUMMARY";

/// Fixed column schema of the report artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ReportRow {
    #[serde(rename = "Step Number")]
    pub step_number: Option<usize>,
    #[serde(rename = "Step Name")]
    pub step_name: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Duration (seconds)")]
    pub duration: String,
    #[serde(rename = "Details")]
    pub details: String,
    #[serde(rename = "Error Message")]
    pub error_message: String,
}

impl ReportRow {
    pub fn from_step(step: &CheckoutStep) -> Self {
        Self {
            step_number: Some(step.index),
            step_name: step.name.clone(),
            status: step.status.to_string(),
            duration: format_seconds(step.duration),
            details: step.details.clone(),
            error_message: step.error.clone().unwrap_or_default(),
        }
    }

    pub fn from_summary(summary: &ReportSummary) -> Self {
        Self {
            step_number: None,
            step_name: SUMMARY_NAME.to_string(),
            status: summary.status.to_string(),
            duration: format_seconds(summary.duration),
            details: summary.details(),
            error_message: String::new(),
        }
    }

    pub fn is_summary(&self) -> bool {
        self.step_number.is_none() && self.step_name == SUMMARY_NAME
    }
}

pub(crate) fn format_seconds(duration: Duration) -> String {
    format!("{:.2}", duration.as_secs_f64())
}

/// Seconds with two decimals back to a millisecond-precision duration.
pub(crate) fn parse_seconds(text: &str) -> Option<Duration> {
    let secs: f64 = text.trim().parse().ok()?;
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }
    Some(Duration::from_millis((secs * 1000.0).round() as u64))
}

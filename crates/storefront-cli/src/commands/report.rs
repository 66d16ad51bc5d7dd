use crate::OutputFormat;
use anyhow::{Context, Result};
use console::style;
use serde::Serialize;
use std::path::Path;
use storefront_core::report::{ParsedReport, ReportReader, RunStatus, StepStatus};

#[derive(Debug, Serialize)]
pub struct StepView {
    pub index: usize,
    pub name: String,
    pub status: String,
    pub duration_seconds: f64,
    pub details: String,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummaryView {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_seconds: f64,
}

/// Serializable form of an exported step report
#[derive(Debug, Serialize)]
pub struct ReportView {
    pub status: String,
    pub steps: Vec<StepView>,
    pub summary: Option<SummaryView>,
}

impl From<&ParsedReport> for ReportView {
    fn from(report: &ParsedReport) -> Self {
        Self {
            status: report.status().to_string(),
            steps: report
                .steps
                .iter()
                .map(|s| StepView {
                    index: s.index,
                    name: s.name.clone(),
                    status: s.status.to_string(),
                    duration_seconds: s.duration.as_secs_f64(),
                    details: s.details.clone(),
                    error: s.error.clone(),
                })
                .collect(),
            summary: report.summary.as_ref().map(|s| SummaryView {
                total: s.total,
                passed: s.passed,
                failed: s.failed,
                duration_seconds: s.duration.as_secs_f64(),
            }),
        }
    }
}

/// Print an exported report. Returns `true` when the run it records passed.
pub fn execute(file: &Path, format: OutputFormat) -> Result<bool> {
    tracing::debug!("Reading {} as {}", file.display(), format.as_str());
    let report = ReportReader::from_file(file)
        .with_context(|| format!("Failed to read step report {}", file.display()))?;

    match format {
        OutputFormat::Json => output_json(&report)?,
        OutputFormat::Pretty => output_pretty(&report, file),
    }

    Ok(report.status() == RunStatus::Passed)
}

fn output_json(report: &ParsedReport) -> Result<()> {
    let json_str = serde_json::to_string_pretty(&ReportView::from(report))?;
    println!("{}", json_str);
    Ok(())
}

fn output_pretty(report: &ParsedReport, file: &Path) {
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    println!("\n{}", style(format!("Checkout Report: {}", file_name)).bold().cyan());
    println!();

    for step in &report.steps {
        let status = match step.status {
            StepStatus::Success => style(step.status.as_str()).green(),
            StepStatus::Failed => style(step.status.as_str()).red().bold(),
            StepStatus::Pending => style(step.status.as_str()).yellow(),
        };
        println!(
            "  {:>2}. {:<32} {:<8} {:>6.2}s  {}",
            step.index,
            step.name,
            status,
            step.duration.as_secs_f64(),
            style(&step.details).dim()
        );
        if let Some(error) = &step.error {
            println!("      {}", style(error).red());
        }
    }

    println!();
    match &report.summary {
        Some(summary) => println!(
            "{} {} ({:.2}s)",
            style(summary.status.as_str()).bold(),
            summary.details(),
            summary.duration.as_secs_f64()
        ),
        None => println!(
            "{} (no summary row)",
            style(report.status().as_str()).bold()
        ),
    }
}

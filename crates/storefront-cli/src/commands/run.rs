//! The `run` command: drive one checkout through a real browser.
//!
//! Loads the test data fixture, applies command-line overrides, launches
//! Chrome, runs the checkout flow and exports the step report. The caller
//! turns the verdict into the process exit status.

use anyhow::{Context, Result, anyhow};
use clap::Args;
use console::style;
use std::path::{Path, PathBuf};
use storefront_browser::{BrowserOptions, BrowserSession, DEFAULT_DEBUGGING_PORT, ScreenshotStore, Storefront};
use storefront_core::data::{Address, TestConfig, TestData};
use storefront_core::flow::{CheckoutFlow, CheckoutPlan, FlowOptions, RunOutcome, Stage};
use storefront_core::report::{ReportSink, StepStatus};

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Test data fixture (JSON)
    #[arg(long, value_name = "FILE", default_value = "data/test_data.json")]
    pub data: PathBuf,

    /// Storefront URL, overriding test_config.base_url
    #[arg(long, env = "STOREFRONT_BASE_URL", value_name = "URL")]
    pub base_url: Option<String>,

    /// Run Chrome without a window
    #[arg(long)]
    pub headless: bool,

    /// Path to the Chrome executable
    #[arg(long, env = "CHROME_PATH", value_name = "PATH")]
    pub chrome_path: Option<PathBuf>,

    /// Named Chrome profile kept between runs (default: throwaway profile)
    #[arg(long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Remote debugging port for Chrome
    #[arg(long, default_value_t = DEFAULT_DEBUGGING_PORT)]
    pub port: u16,

    /// Directory for the step report, overriding test_config.reports_dir
    #[arg(long, value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Directory for screenshots, overriding test_config.screenshots_dir
    #[arg(long, value_name = "DIR")]
    pub screenshots_dir: Option<PathBuf>,

    /// Stop successfully after this stage (e.g. billing, shipping_method)
    #[arg(long, value_name = "STAGE")]
    pub until: Option<Stage>,
}

/// Everything resolved before the browser starts.
#[derive(Debug, Clone)]
pub struct RunSetup {
    pub config: TestConfig,
    pub plan: CheckoutPlan,
    /// Compared against billing only; the order ships to the billing address.
    pub shipping_address: Option<Address>,
    pub flow: FlowOptions,
    pub browser: BrowserOptions,
}

impl RunSetup {
    pub fn load(args: &RunArgs) -> Result<Self> {
        let data = TestData::from_file(&args.data)
            .with_context(|| format!("Failed to load test data from {}", args.data.display()))?;

        let mut config = data.test_config()?;
        if let Some(url) = &args.base_url {
            config.base_url = url.clone();
        }
        if args.headless {
            config.headless = true;
        }
        if let Some(dir) = &args.reports_dir {
            config.reports_dir = dir.clone();
        }
        if let Some(dir) = &args.screenshots_dir {
            config.screenshots_dir = dir.clone();
        }

        let plan = CheckoutPlan {
            credentials: data.user_credentials()?,
            billing_address: data.billing_address()?,
            products: data.products_to_search()?,
        };

        let shipping_address = match data.shipping_address() {
            Ok(address) => {
                if address != plan.billing_address {
                    tracing::warn!(
                        "shipping_address ({}, {}) differs from billing_address; the order ships to the billing address",
                        address.city,
                        address.country
                    );
                }
                Some(address)
            }
            Err(e) => {
                tracing::debug!("{}", e);
                None
            }
        };

        let mut flow = FlowOptions::from_config(&config);
        flow.stop_after = args.until;

        let mut browser = BrowserOptions::from_config(&config);
        browser.chrome_path = args.chrome_path.clone();
        browser.debugging_port = args.port;
        browser.profile_dir = args.profile.as_deref().map(profile_dir).transpose()?;

        Ok(Self {
            config,
            plan,
            shipping_address,
            flow,
            browser,
        })
    }
}

fn profile_dir(name: &str) -> Result<PathBuf> {
    Ok(dirs::home_dir()
        .ok_or_else(|| anyhow!("Could not determine home directory"))?
        .join(".storefront-e2e")
        .join("profiles")
        .join(name))
}

/// Returns `true` when every recorded stage passed.
pub fn execute(args: &RunArgs) -> Result<bool> {
    let setup = RunSetup::load(args)?;
    tracing::debug!("Run configuration: {:?}", setup.config);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(run_checkout(&setup));
    runtime.shutdown_timeout(std::time::Duration::from_millis(100));
    let outcome = result?;

    let sink = ReportSink::new(&setup.config.reports_dir, &setup.config.report_name);
    let report_path = outcome
        .report
        .export(&sink)
        .context("Failed to write step report")?;

    print_outcome(&outcome, &report_path);
    Ok(outcome.passed())
}

async fn run_checkout(setup: &RunSetup) -> Result<RunOutcome> {
    println!("🚀 Launching Chrome...");
    let session = BrowserSession::start(&setup.browser).await?;
    println!("✅ Opened {}", setup.config.base_url);

    let storefront = Storefront::new(
        session.driver(),
        ScreenshotStore::new(&setup.config.screenshots_dir),
        setup.config.confirmation_wait(),
    );

    println!("🛒 Running checkout as {}", setup.plan.credentials.email);
    let outcome = CheckoutFlow::new(storefront.pages(), &setup.plan, setup.flow.clone())
        .run()
        .await;

    if outcome.passed() {
        if let Err(e) = storefront.capture_success("checkout_flow").await {
            tracing::warn!("Could not capture success screenshot: {}", e);
        }
    }

    drop(storefront);
    if let Err(e) = session.close().await {
        tracing::warn!("Browser did not shut down cleanly: {}", e);
    }
    Ok(outcome)
}

fn print_outcome(outcome: &RunOutcome, report_path: &Path) {
    println!();
    for step in outcome.report.steps() {
        let marker = match step.status {
            StepStatus::Success => style("✅").green(),
            _ => style("❌").red(),
        };
        println!(
            "{} {:>2}. {:<32} {:>6.2}s  {}",
            marker,
            step.index,
            step.name,
            step.duration.as_secs_f64(),
            style(&step.details).dim()
        );
        if let Some(error) = &step.error {
            println!("       {}", style(error).red());
        }
    }

    let summary = outcome.report.summary();
    println!();
    println!(
        "{} {} ({:.2}s)",
        style(summary.status.as_str()).bold(),
        summary.details(),
        summary.duration.as_secs_f64()
    );

    if let Some(failure) = &outcome.failure {
        println!(
            "❌ Stopped at {}: {}",
            style(failure.stage.label()).bold(),
            failure.error
        );
    }
    if let Some(path) = &outcome.diagnostic {
        println!("📸 Failure screenshot: {}", path.display());
    }
    println!("📄 Report written to: {}", report_path.display());
}

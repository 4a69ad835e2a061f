use std::any::Any;
use std::fmt::Debug;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use colored::Colorize;
use futures::FutureExt;
use tempfile::TempDir;
use tracing::{info, warn};

use crate::api::ServiceClient;
use crate::cases::{self, Context};
use crate::config::{build_config, HarnessSettings};
use crate::database::DbHelper;
use crate::error::HarnessError;
use crate::runner::registry::Registry;
use crate::service::{wait_for_service, ServiceProcess};

/// Lifecycle of one test case within a run.
///
/// `Running` only exists while the case future is awaited; a finished
/// `SuiteReport` holds `Passed`, `Failed` or `Pending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseStatus {
    Pending,
    Running,
    Passed,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct CaseResult {
    pub name: &'static str,
    pub status: CaseStatus,
    pub elapsed: Option<Duration>,
}

/// Outcome of running a registry: one entry per registered case
#[derive(Debug, Clone)]
pub struct SuiteReport {
    pub results: Vec<CaseResult>,
    pub elapsed: Duration,
}

impl SuiteReport {
    pub fn passed(&self) -> bool {
        self.results.iter().all(|r| r.status == CaseStatus::Passed)
    }

    pub fn first_failure(&self) -> Option<&CaseResult> {
        self.results
            .iter()
            .find(|r| matches!(r.status, CaseStatus::Failed(_)))
    }

    pub fn count_passed(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == CaseStatus::Passed)
            .count()
    }

    pub fn count_pending(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == CaseStatus::Pending)
            .count()
    }
}

/// Run every case in registration order against `ctx`, stopping at the first
/// failure. Cases after the failing one are left `Pending`.
pub async fn run_cases<C, K>(registry: &Registry<C, K>, ctx: &mut C) -> SuiteReport
where
    K: PartialEq + Debug + 'static,
{
    let start = Instant::now();
    let total = registry.len();
    let mut results: Vec<CaseResult> = registry
        .iter()
        .map(|case| CaseResult {
            name: case.name,
            status: CaseStatus::Pending,
            elapsed: None,
        })
        .collect();

    for (index, case) in registry.iter().enumerate() {
        println!("({}/{}) {}:", index + 1, total, case.name);
        results[index].status = CaseStatus::Running;

        let case_start = Instant::now();
        let outcome = match AssertUnwindSafe((case.run)(&mut *ctx))
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(payload) => Err(anyhow::anyhow!("panicked: {}", panic_message(&*payload))),
        };
        results[index].elapsed = Some(case_start.elapsed());

        match outcome {
            Ok(()) => {
                results[index].status = CaseStatus::Passed;
                println!("{}", "OK".green());
                println!();
            }
            Err(e) => {
                println!("{}", "FAIL".red());
                println!("{:?}", e);
                println!();
                warn!(case = case.name, "Test case failed, skipping the remaining cases");
                results[index].status = CaseStatus::Failed(format!("{:#}", e));
                break;
            }
        }
    }

    SuiteReport {
        results,
        elapsed: start.elapsed(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "non-string panic payload"
    }
}

/// Command-line inputs of a run
#[derive(Debug, Clone)]
pub struct SuiteOptions {
    pub db: String,
    pub skip_clean_db: bool,
    pub port: u16,
}

/// Everything a run acquires and must give back, whatever happens
#[derive(Default)]
struct Resources {
    tmp_dir: Option<TempDir>,
    service: Option<ServiceProcess>,
    db: Option<Arc<DbHelper>>,
}

impl Resources {
    /// Release everything; each step runs even if an earlier one failed.
    /// Returns the service's full output when a service was started.
    async fn teardown(&mut self) -> Option<String> {
        if let Some(dir) = self.tmp_dir.take() {
            if let Err(e) = dir.close() {
                warn!("Failed to remove temporary directory: {}", e);
            }
        }

        let mut log = None;
        if let Some(mut service) = self.service.take() {
            if let Err(e) = service.terminate().await {
                warn!("Failed to terminate service: {}", e);
            }
            log = Some(service.drain_log().await);
        }

        if let Some(db) = self.db.take() {
            db.close().await;
        }

        log
    }
}

/// Full functional run: set up the database and the service, run the
/// registered cases, tear everything down. Returns true when all cases pass.
pub async fn run_suite(options: &SuiteOptions, settings: &HarnessSettings) -> bool {
    let mut resources = Resources::default();
    let outcome = execute(options, settings, &mut resources).await;
    let service_log = resources.teardown().await;

    match outcome {
        Ok(report) if report.passed() => true,
        Ok(_) => {
            print_service_log(service_log.as_deref());
            false
        }
        Err(e) => {
            print_service_log(service_log.as_deref());
            println!("{}", "Exception occurred during the test:".red());
            println!("{:?}", anyhow::Error::from(e));
            false
        }
    }
}

async fn execute(
    options: &SuiteOptions,
    settings: &HarnessSettings,
    resources: &mut Resources,
) -> Result<SuiteReport, HarnessError> {
    let registry = cases::registry();
    registry.validate()?;

    let tmp_dir = resources.tmp_dir.insert(tempfile::tempdir()?);
    let db = Arc::new(DbHelper::connect(&options.db).await?);
    resources.db = Some(db.clone());

    let config_path = build_config(tmp_dir.path(), &options.db, options.port)?;
    if !options.skip_clean_db {
        db.reset_schema().await?;
    }

    let client = ServiceClient::local(options.port)?;
    let service = resources
        .service
        .insert(ServiceProcess::spawn(&settings.service_bin, &config_path)?);
    wait_for_service(
        service,
        &client,
        settings.ping_attempts,
        settings.ping_interval(),
    )
    .await?;
    println!();

    info!(cases = registry.len(), "Running test cases");
    let mut ctx = Context::new(db, client);
    Ok(run_cases(&registry, &mut ctx).await)
}

fn print_service_log(log: Option<&str>) {
    println!();
    println!("{}", "WebSentry log:".blue());
    if let Some(log) = log {
        println!("{}", log);
    }
    println!();
}

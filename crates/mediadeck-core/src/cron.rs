//! Minimal interval scheduler for the background loops.
//!
//! Every registered job gets its own task that sleeps for the job interval
//! and then runs it. Disabled jobs keep ticking; their runs are recorded as
//! skipped so an operator can tell a paused loop from a dead one.

use crate::config::RefreshConfig;
use crate::error::{MediaDeckError, Result};
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Body of a cron job. Errors are recorded in the run history.
pub type JobFn = Arc<dyn Fn() -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// One recorded execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunInfo {
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub duration_ms: u64,
    pub skipped: bool,
    pub error: Option<String>,
}

/// Operator view of a job.
#[derive(Debug, Clone, Serialize)]
pub struct CronJobStatus {
    pub name: String,
    pub interval_secs: u64,
    pub enabled: bool,
    pub running_since: Option<DateTime<Utc>>,
    /// Newest first.
    pub history: Vec<RunInfo>,
}

struct JobState {
    enabled: bool,
    running_since: Option<DateTime<Utc>>,
    history: VecDeque<RunInfo>,
}

/// A registered periodic job.
pub struct CronJob {
    name: String,
    interval: Duration,
    job: JobFn,
    state: Mutex<JobState>,
}

impl CronJob {
    fn new(name: String, interval: Duration, enabled: bool, job: JobFn) -> Self {
        Self {
            name,
            interval,
            job,
            state: Mutex::new(JobState {
                enabled,
                running_since: None,
                history: VecDeque::new(),
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, JobState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Idempotent.
    pub fn enable(&self) {
        self.lock().enabled = true;
    }

    /// Idempotent.
    pub fn disable(&self) {
        self.lock().enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.lock().enabled
    }

    /// Run the job once now, or record a skipped run if it is disabled.
    ///
    /// Returns `false` when the run was skipped.
    pub async fn run(&self) -> bool {
        let start = Utc::now();
        {
            let mut state = self.lock();
            if !state.enabled {
                push_run(
                    &mut state.history,
                    RunInfo {
                        start,
                        end: None,
                        duration_ms: 0,
                        skipped: true,
                        error: None,
                    },
                );
                return false;
            }
            state.running_since = Some(start);
        }

        let result = (self.job)().await;
        let end = Utc::now();
        if let Err(e) = &result {
            warn!("Cron job {} failed: {}", self.name, e);
        }

        let mut state = self.lock();
        state.running_since = None;
        push_run(
            &mut state.history,
            RunInfo {
                start,
                end: Some(end),
                duration_ms: (end - start).num_milliseconds().max(0) as u64,
                skipped: false,
                error: result.err().map(|e| e.to_string()),
            },
        );
        true
    }

    /// Newest first.
    pub fn history(&self) -> Vec<RunInfo> {
        self.lock().history.iter().cloned().collect()
    }

    pub fn status(&self) -> CronJobStatus {
        let state = self.lock();
        CronJobStatus {
            name: self.name.clone(),
            interval_secs: self.interval.as_secs(),
            enabled: state.enabled,
            running_since: state.running_since,
            history: state.history.iter().cloned().collect(),
        }
    }
}

fn push_run(history: &mut VecDeque<RunInfo>, run: RunInfo) {
    history.push_front(run);
    history.truncate(RefreshConfig::CRON_HISTORY_CAP);
}

/// Registry of periodic jobs.
#[derive(Default)]
pub struct Cron {
    jobs: Mutex<BTreeMap<String, (Arc<CronJob>, JoinHandle<()>)>>,
}

impl Cron {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `job` under a unique `name` and start its loop.
    ///
    /// Must be called from within a tokio runtime.
    pub fn register(
        &self,
        name: &str,
        interval: Duration,
        enabled: bool,
        job: JobFn,
    ) -> Result<Arc<CronJob>> {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        if jobs.contains_key(name) {
            return Err(MediaDeckError::CronJobExists {
                name: name.to_string(),
            });
        }

        let cron_job = Arc::new(CronJob::new(name.to_string(), interval, enabled, job));
        let looping = cron_job.clone();
        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(looping.interval).await;
                debug!("Cron tick: {}", looping.name);
                looping.run().await;
            }
        });
        info!("Registered cron job {} every {:?}", name, interval);
        jobs.insert(name.to_string(), (cron_job.clone(), handle));
        Ok(cron_job)
    }

    pub fn get(&self, name: &str) -> Option<Arc<CronJob>> {
        let jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        jobs.get(name).map(|(job, _)| job.clone())
    }

    /// Status of every job, by name.
    pub fn jobs(&self) -> Vec<CronJobStatus> {
        let jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        jobs.values().map(|(job, _)| job.status()).collect()
    }

    /// Stop every job loop. Registered jobs stay queryable.
    pub fn shutdown(&self) {
        let jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        for (job, handle) in jobs.values() {
            debug!("Stopping cron job {}", job.name);
            handle.abort();
        }
    }
}

impl Drop for Cron {
    fn drop(&mut self) {
        self.shutdown();
    }
}

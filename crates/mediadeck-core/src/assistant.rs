//! Autonomous policy loop that starts paused downloads and moves finished
//! ones, within fixed concurrency caps.
//!
//! A tick holds the registry lock from the first read to the last enqueue,
//! including the torrent client calls, so its view cannot be changed by a
//! concurrent reconciliation halfway through.

use crate::api::{weak_job, Shared};
use crate::config::{AssistantConfig, AssistantSettings};
use crate::cron::CronJob;
use crate::error::{MediaDeckError, Result};
use crate::models::{Item, TorrentRecord};
use crate::moves::{request_move, validate};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

/// What a tick decided for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistantDecision {
    /// Queued for a move this tick.
    Move,
    /// Resumed in the torrent client this tick.
    Start,
    /// Qualified, but a concurrency cap or a failed step held it back.
    Wait,
    /// Not eligible for anything.
    Skip,
}

/// Per-item reasoning of the last tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssistantItemStatus {
    pub name: String,
    pub move_status: String,
    pub start_status: String,
    pub decision: AssistantDecision,
}

/// Counts and selections of one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TickSummary {
    pub considered: usize,
    pub to_move: usize,
    pub to_start: usize,
    pub moving: usize,
    pub downloading: usize,
    pub moved: Vec<String>,
    pub started: Vec<String>,
    pub errors: Vec<String>,
}

/// Operator view of the assistant.
#[derive(Debug, Clone, Serialize)]
pub struct AssistantStatus {
    pub enabled: bool,
    pub settings: AssistantSettings,
    pub last_tick: Option<DateTime<Utc>>,
    pub summary: Option<TickSummary>,
    pub items: Vec<AssistantItemStatus>,
}

#[derive(Default)]
struct LastTick {
    at: Option<DateTime<Utc>>,
    summary: Option<TickSummary>,
    items: Vec<AssistantItemStatus>,
}

pub(crate) struct AssistantState {
    settings: AssistantSettings,
    enabled: AtomicBool,
    last: Mutex<LastTick>,
}

impl AssistantState {
    pub(crate) fn new(settings: AssistantSettings) -> Self {
        Self {
            enabled: AtomicBool::new(settings.enabled),
            settings,
            last: Mutex::new(LastTick::default()),
        }
    }
}

/// Handle to the assistant. Cheap to clone.
#[derive(Clone)]
pub struct Assistant {
    shared: Arc<Shared>,
    state: Arc<AssistantState>,
}

/// Why `item` may not be moved by the assistant, or `Ok` if it may.
fn should_move(item: &Item) -> std::result::Result<(), String> {
    if !item.allow_move {
        return Err("not allowed to move".to_string());
    }
    if !item.allow_assistant {
        return Err("assistant disabled for this item".to_string());
    }
    if item.move_info.moving {
        return Err("currently moving".to_string());
    }
    if item.path.is_none() {
        return Err("not on disk, only known to the torrent client".to_string());
    }
    if let Some(error) = &item.move_info.last_error {
        return Err(format!("last move failed: {error}"));
    }
    let Some(torrent) = &item.torrent else {
        return Err("no torrent, only found on disk".to_string());
    };
    if !torrent.is_downloaded() {
        return Err(format!(
            "download incomplete ({:.0}%)",
            torrent.percent_done * 100.0
        ));
    }
    if !torrent.is_paused() {
        return Err(format!("torrent is {}, not paused", torrent.status));
    }
    Ok(())
}

/// Why `item`'s torrent may not be started, or `Ok` if it may.
fn should_start(item: &Item) -> std::result::Result<(), String> {
    let Some(torrent) = &item.torrent else {
        return Err("no torrent, only found on disk".to_string());
    };
    if !torrent.is_paused() {
        return Err(format!("torrent is {}, not paused", torrent.status));
    }
    if torrent.is_downloaded() || torrent.done_date != 0 {
        return Err("already downloaded".to_string());
    }
    Ok(())
}

impl Assistant {
    pub(crate) fn new(shared: Arc<Shared>, state: Arc<AssistantState>) -> Self {
        Self { shared, state }
    }

    pub fn settings(&self) -> &AssistantSettings {
        &self.state.settings
    }

    fn job(&self) -> Option<Arc<CronJob>> {
        self.shared.cron.get(AssistantConfig::JOB_NAME)
    }

    /// Register the periodic tick. Ticks while disabled are recorded as
    /// skipped.
    pub(crate) fn register(&self) -> Result<Arc<CronJob>> {
        let state = self.state.clone();
        let job = weak_job(&self.shared, move |shared| {
            let assistant = Assistant::new(shared, state.clone());
            async move {
                let summary = assistant.tick().await?;
                if summary.errors.is_empty() {
                    Ok(())
                } else {
                    Err(MediaDeckError::Internal(summary.errors.join("; ")))
                }
            }
        });
        self.shared.cron.register(
            AssistantConfig::JOB_NAME,
            self.state.settings.sleep(),
            self.is_enabled(),
            job,
        )
    }

    /// Idempotent.
    pub fn enable(&self) {
        let was = self.state.enabled.swap(true, Ordering::SeqCst);
        if let Some(job) = self.job() {
            job.enable();
        }
        if !was {
            self.shared.messages.log("assistant.info", "Assistant enabled");
        }
    }

    /// Idempotent.
    pub fn disable(&self) {
        let was = self.state.enabled.swap(false, Ordering::SeqCst);
        if let Some(job) = self.job() {
            job.disable();
        }
        if was {
            self.shared.messages.log("assistant.info", "Assistant disabled");
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.state.enabled.load(Ordering::SeqCst)
    }

    pub fn status(&self) -> AssistantStatus {
        let last = self.state.last.lock().unwrap_or_else(PoisonError::into_inner);
        AssistantStatus {
            enabled: self.is_enabled(),
            settings: self.state.settings.clone(),
            last_tick: last.at,
            summary: last.summary.clone(),
            items: last.items.clone(),
        }
    }

    /// Run one tick now, regardless of the enabled flag.
    pub async fn run_once(&self) -> Result<TickSummary> {
        self.tick().await
    }

    /// One decision round.
    ///
    /// Failures of individual steps are collected in the summary rather than
    /// returned; only a failure to reach the state at all is an `Err`.
    async fn tick(&self) -> Result<TickSummary> {
        let shared = &self.shared;
        let settings = &self.state.settings;
        let mut registry = shared.registry.lock().await;

        let mut statuses = Vec::with_capacity(registry.len());
        let mut to_move: Vec<String> = Vec::new();
        let mut to_start: Vec<TorrentRecord> = Vec::new();
        let mut summary = TickSummary::default();

        for item in registry.items() {
            summary.considered += 1;
            if item.move_info.moving {
                summary.moving += 1;
            }
            if item.torrent.as_ref().is_some_and(|t| !t.is_paused()) {
                summary.downloading += 1;
            }

            let move_check = should_move(item);
            let start_check = should_start(item);
            if move_check.is_ok() {
                to_move.push(item.name.clone());
            } else if let (Ok(()), Some(torrent)) = (&start_check, &item.torrent) {
                to_start.push(torrent.clone());
            }
            statuses.push(AssistantItemStatus {
                name: item.name.clone(),
                move_status: move_check.err().unwrap_or_else(|| "ready to move".to_string()),
                start_status: start_check.err().unwrap_or_else(|| "ready to start".to_string()),
                decision: AssistantDecision::Skip,
            });
        }
        summary.to_move = to_move.len();
        summary.to_start = to_start.len();

        // Moves. Torrents are only removed for moves the queue can take.
        let depth = shared.queue.depth();
        let move_slots = settings
            .max_concurrent_moving
            .saturating_sub(summary.moving)
            .min(depth.capacity.saturating_sub(depth.len));
        let mut selected: Vec<String> = Vec::new();
        for name in &to_move {
            if selected.len() >= move_slots {
                break;
            }
            match validate(&registry, &shared.queue, name) {
                Ok(_) => selected.push(name.clone()),
                Err(e) => {
                    summary.errors.push(format!("{name}: {e}"));
                    shared
                        .messages
                        .log("assistant.error", format!("Not moving {name}: {e}"));
                }
            }
        }

        if !selected.is_empty() {
            let torrents: Vec<TorrentRecord> = selected
                .iter()
                .filter_map(|name| registry.get(name).and_then(|i| i.torrent.clone()))
                .collect();
            shared.messages.log(
                "assistant.info",
                format!("Removing torrents from the client: {}", selected.join(", ")),
            );
            match shared.torrents.remove(&torrents).await {
                Ok(()) => {
                    for name in &selected {
                        match request_move(&mut registry, &shared.queue, name) {
                            Ok(request) => {
                                shared.messages.log(
                                    "assistant.info",
                                    format!(
                                        "Moving {} to {}",
                                        name,
                                        request.destination.display()
                                    ),
                                );
                                summary.moved.push(name.clone());
                            }
                            Err(e) => {
                                summary.errors.push(format!("{name}: {e}"));
                                shared
                                    .messages
                                    .log("assistant.error", format!("Moving {name} failed: {e}"));
                            }
                        }
                    }
                }
                Err(e) => {
                    summary
                        .errors
                        .push(format!("removing torrents failed: {e}"));
                    shared.messages.log(
                        "assistant.error",
                        format!("Removing torrents failed, deferring moves: {e}"),
                    );
                }
            }
        }

        // Starts.
        let start_slots = settings
            .max_concurrent_downloading
            .saturating_sub(summary.downloading);
        let starting: Vec<TorrentRecord> = to_start.into_iter().take(start_slots).collect();
        if !starting.is_empty() {
            match shared.torrents.start(&starting).await {
                Ok(()) => {
                    summary.started = starting.iter().map(|t| t.name.clone()).collect();
                    shared.messages.log(
                        "assistant.info",
                        format!("Started torrents: {}", summary.started.join(", ")),
                    );
                }
                Err(e) => {
                    summary.errors.push(format!("starting torrents failed: {e}"));
                    shared
                        .messages
                        .log("assistant.error", format!("Starting torrents failed: {e}"));
                }
            }
        }
        drop(registry);

        for status in &mut statuses {
            status.decision = if summary.moved.contains(&status.name) {
                AssistantDecision::Move
            } else if summary.started.contains(&status.name) {
                AssistantDecision::Start
            } else if status.move_status == "ready to move"
                || status.start_status == "ready to start"
            {
                AssistantDecision::Wait
            } else {
                AssistantDecision::Skip
            };
        }

        let message = format!(
            "Considered {}: {} to move ({} moving), {} to start ({} downloading); moved {}, started {}, {} errors",
            summary.considered,
            summary.to_move,
            summary.moving,
            summary.to_start,
            summary.downloading,
            summary.moved.len(),
            summary.started.len(),
            summary.errors.len()
        );
        debug!("Assistant tick: {:?}", summary);
        info!("{}", message);
        shared.messages.log("assistant.tick", message);

        let mut last = self.state.last.lock().unwrap_or_else(PoisonError::into_inner);
        last.at = Some(Utc::now());
        last.summary = Some(summary.clone());
        last.items = statuses;
        Ok(summary)
    }
}

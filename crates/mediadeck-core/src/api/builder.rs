//! Builder for configuring a MoveServer.

use std::sync::{Arc, Mutex};

use crate::api::state::Shared;
use crate::assistant::{Assistant, AssistantState};
use crate::config::MediaDeckConfig;
use crate::cron::Cron;
use crate::disk_usage::{DiskProber, SysinfoDiskProber};
use crate::error::Result;
use crate::listing::{DirectoryLister, WalkDirLister};
use crate::messages::MessageLog;
use crate::moves::{MoveQueue, Mover, ShellMover};
use crate::registry::Registry;
use crate::transmission::{TorrentClient, TransmissionClient};
use crate::{MoveServer, Runtime};

/// Builder for configuring a [`MoveServer`].
///
/// Every collaborator has a production default; tests swap in fakes.
///
/// # Example
///
/// ```rust,ignore
/// use mediadeck_core::{MediaDeckConfig, MoveServer};
///
/// let server = MoveServer::builder(config)
///     .with_mover(Arc::new(MyMover))
///     .build()?;
/// server.start().await?;
/// ```
pub struct MoveServerBuilder {
    config: MediaDeckConfig,
    torrents: Option<Arc<dyn TorrentClient>>,
    lister: Option<Arc<dyn DirectoryLister>>,
    mover: Option<Arc<dyn Mover>>,
    disk_prober: Option<Arc<dyn DiskProber>>,
}

impl MoveServerBuilder {
    pub fn new(config: MediaDeckConfig) -> Self {
        Self {
            config,
            torrents: None,
            lister: None,
            mover: None,
            disk_prober: None,
        }
    }

    /// Use `client` instead of a Transmission client built from the config.
    pub fn with_torrent_client(mut self, client: Arc<dyn TorrentClient>) -> Self {
        self.torrents = Some(client);
        self
    }

    /// Default: [`WalkDirLister`].
    pub fn with_lister(mut self, lister: Arc<dyn DirectoryLister>) -> Self {
        self.lister = Some(lister);
        self
    }

    /// Default: [`ShellMover`].
    pub fn with_mover(mut self, mover: Arc<dyn Mover>) -> Self {
        self.mover = Some(mover);
        self
    }

    /// Default: [`SysinfoDiskProber`].
    pub fn with_disk_prober(mut self, prober: Arc<dyn DiskProber>) -> Self {
        self.disk_prober = Some(prober);
        self
    }

    /// Build the server. Nothing runs until [`MoveServer::start`].
    pub fn build(self) -> Result<MoveServer> {
        self.config.validate()?;
        let config = self.config.normalized();

        let torrents: Arc<dyn TorrentClient> = match self.torrents {
            Some(client) => client,
            None => Arc::new(TransmissionClient::new(&config.transmission)?),
        };
        let lister = self
            .lister
            .unwrap_or_else(|| Arc::new(WalkDirLister::new()));
        let mover = self.mover.unwrap_or_else(|| Arc::new(ShellMover::new()));
        let disk_prober = self
            .disk_prober
            .unwrap_or_else(|| Arc::new(SysinfoDiskProber::new()));

        let registry = Registry::new(
            config.movie_targets.clone(),
            config.series_targets.clone(),
            config.effective_default_target(),
        );
        let (queue, receiver) = MoveQueue::new(config.move_queue_capacity);
        let assistant_state = Arc::new(AssistantState::new(config.assistant.clone()));

        let shared = Arc::new(Shared {
            config,
            registry: Arc::new(tokio::sync::Mutex::new(registry)),
            queue,
            messages: Arc::new(MessageLog::new()),
            torrents,
            lister,
            mover,
            disk_prober,
            disk_stats: Mutex::new(Vec::new()),
            cron: Cron::new(),
        });
        let assistant = Assistant::new(shared.clone(), assistant_state);

        Ok(MoveServer {
            shared,
            assistant,
            runtime: Mutex::new(Runtime {
                receiver: Some(receiver),
                workers: Vec::new(),
            }),
        })
    }
}

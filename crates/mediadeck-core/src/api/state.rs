//! State shared by the server facade, the workers and the cron jobs.

use crate::config::MediaDeckConfig;
use crate::cron::{Cron, JobFn};
use crate::disk_usage::DiskProber;
use crate::error::Result;
use crate::listing::DirectoryLister;
use crate::messages::MessageLog;
use crate::models::DiskStats;
use crate::moves::{MoveQueue, Mover};
use crate::registry::Registry;
use crate::transmission::TorrentClient;
use futures::FutureExt;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Everything a running server owns.
///
/// The registry has one exclusive lock for readers and writers alike. The
/// message log and the disk stats are guarded separately so neither ever
/// waits on a reconciliation.
pub(crate) struct Shared {
    pub(crate) config: MediaDeckConfig,
    pub(crate) registry: Arc<tokio::sync::Mutex<Registry>>,
    pub(crate) queue: MoveQueue,
    pub(crate) messages: Arc<MessageLog>,
    pub(crate) torrents: Arc<dyn TorrentClient>,
    pub(crate) lister: Arc<dyn DirectoryLister>,
    pub(crate) mover: Arc<dyn Mover>,
    pub(crate) disk_prober: Arc<dyn DiskProber>,
    pub(crate) disk_stats: Mutex<Vec<DiskStats>>,
    pub(crate) cron: Cron,
}

/// Wrap `f` as a cron job body holding only a weak reference to `shared`.
///
/// The cron registry lives inside [`Shared`], so a strong reference here
/// would keep the state alive forever. Runs after the state is gone are
/// no-ops.
pub(crate) fn weak_job<F, Fut>(shared: &Arc<Shared>, f: F) -> JobFn
where
    F: Fn(Arc<Shared>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    let weak = Arc::downgrade(shared);
    Arc::new(move || {
        let run = weak.upgrade().map(|shared| f(shared));
        async move {
            match run {
                Some(run) => run.await,
                None => Ok(()),
            }
        }
        .boxed()
    })
}

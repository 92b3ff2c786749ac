//! Integration tests for the MoveServer public interface.
//!
//! Servers are built but not started unless a test needs the workers, so
//! accepted moves stay queued and completions are reported by hand.

mod common;

use common::{torrent, Env};
use mediadeck_core::config::MessageConfig;
use mediadeck_core::{MediaDeckConfig, MediaDeckError, MoveRejection, TorrentStatus};
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::time::Duration;

#[tokio::test]
async fn test_refresh_builds_items_from_disk_and_torrents() {
    let env = Env::new();
    env.download("Movie.2020");
    env.torrents.set(vec![
        torrent(1, "Movie.2020", 1.0, TorrentStatus::Stopped),
        torrent(2, "Pending.Show", 0.2, TorrentStatus::Downloading),
    ]);
    let server = env.server();

    let summary = server.refresh().await.unwrap();
    assert_eq!(summary.items, 2);
    assert_eq!(summary.on_disk, 1);

    let items = server.items().await;
    assert_eq!(items[0].name, "Movie.2020");
    assert!(items[0].allow_move);
    assert_eq!(items[0].move_to, Some(env.movies()));
    assert_eq!(items[1].name, "Pending.Show");
    assert!(items[1].path.is_none());
    assert!(!items[1].allow_move);
    assert!(server.refreshed_at().await.is_some());
}

#[tokio::test]
async fn test_move_target_survives_refresh() {
    let env = Env::new();
    env.download("X");
    std::fs::create_dir_all(env.series().join("Show")).unwrap();
    let server = env.server();
    server.refresh().await.unwrap();

    server
        .set_move_target("X", env.series().join("Show"))
        .await
        .unwrap();
    env.torrents
        .set(vec![torrent(7, "X", 1.0, TorrentStatus::Seeding)]);
    server.refresh().await.unwrap();

    let x = server.item("X").await.unwrap();
    assert_eq!(x.move_to, Some(env.series().join("Show")));
    assert!(x.torrent.is_some());
}

#[tokio::test]
async fn test_vanished_item_is_disappeared() {
    let env = Env::new();
    env.download("X");
    let y = env.download("Y");
    let server = env.server();
    server.refresh().await.unwrap();

    std::fs::remove_dir_all(y).unwrap();
    let summary = server.refresh().await.unwrap();

    assert_eq!(summary.disappeared, vec!["Y".to_string()]);
    assert!(server.item("Y").await.is_none());
    let disappeared = server.disappeared().await;
    assert_eq!(disappeared.len(), 1);
    assert_eq!(disappeared[0].item.name, "Y");
}

#[tokio::test]
async fn test_unlistable_source_leaves_state_untouched() {
    let env = Env::new();
    env.download("X");
    let server = env.server();
    server.refresh().await.unwrap();
    let items = server.items().await;
    let targets = server.move_targets().await;
    let refreshed_at = server.refreshed_at().await;
    let logged = server.messages().len();

    std::fs::remove_dir_all(env.source()).unwrap();
    let err = server.refresh().await.unwrap_err();

    assert!(matches!(err, MediaDeckError::Listing { .. }));
    assert_eq!(server.items().await, items);
    assert_eq!(server.move_targets().await, targets);
    assert_eq!(server.refreshed_at().await, refreshed_at);
    assert!(server.history().await.is_empty());
    assert_eq!(server.messages().len(), logged + 1);
    assert_eq!(server.messages()[0].kind, "refresh.error");
}

#[tokio::test]
async fn test_unreachable_torrent_client_keeps_incomplete_downloads_unmovable() {
    let env = Env::new();
    env.download("Partial");
    env.torrents
        .set(vec![torrent(1, "Partial", 0.6, TorrentStatus::Downloading)]);
    let server = env.server();
    server.refresh().await.unwrap();
    assert!(!server.item("Partial").await.unwrap().allow_move);

    env.torrents.fail_list.store(true, Ordering::SeqCst);
    server.refresh().await.unwrap();

    let item = server.item("Partial").await.unwrap();
    assert!(item.torrent.is_some());
    assert!(!item.allow_move);
    assert!(server
        .messages()
        .iter()
        .any(|m| m.kind == "refresh.error" && m.message.contains("torrents")));
}

#[tokio::test]
async fn test_second_move_is_rejected_as_currently_moving() {
    let env = Env::new();
    env.download("foo");
    let server = env.server();
    server.refresh().await.unwrap();

    server.move_item("foo").await.unwrap();
    let err = server.move_item("foo").await.unwrap_err();

    assert!(matches!(
        err.rejection(),
        Some(MoveRejection::CurrentlyMoving { .. })
    ));
    assert!(err.to_string().contains("currently moving"));
    assert_eq!(server.queue_depth().len, 1);
}

#[tokio::test]
async fn test_full_queue_rejects_without_blocking() {
    let env = Env::new();
    for name in ["a", "b", "c"] {
        env.download(name);
    }
    let server = env.server_with(MediaDeckConfig {
        move_queue_capacity: 2,
        ..env.config()
    });
    server.refresh().await.unwrap();

    server.move_item("a").await.unwrap();
    server.move_item("b").await.unwrap();
    let third = tokio::time::timeout(Duration::from_secs(5), server.move_item("c"))
        .await
        .expect("move_item must not block on a full queue");

    let err = third.unwrap_err();
    assert_eq!(
        err.rejection(),
        Some(&MoveRejection::BufferFull { capacity: 2 })
    );
    assert!(err.to_string().contains("buffer full"));
    assert!(!server.item("c").await.unwrap().move_info.moving);
}

#[tokio::test]
async fn test_successful_move_round_trip() {
    let env = Env::new();
    let source = env.download("foo");
    let server = env.server();
    server.refresh().await.unwrap();

    let request = server.move_item("foo").await.unwrap();
    assert_eq!(request.source, source);
    let item = server.item("foo").await.unwrap();
    assert!(item.move_info.moving);
    assert_eq!(item.move_info.target, Some(env.movies().join("foo")));

    server.report_result("foo", None, "").await.unwrap();

    assert!(server.item("foo").await.is_none());
    let history = server.history().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].item.name, "foo");
    assert!(!history[0].item.move_info.moving);
    assert!(history[0].item.move_info.last_error.is_none());
}

#[tokio::test]
async fn test_failed_move_stays_retryable() {
    let env = Env::new();
    env.download("foo");
    let server = env.server();
    server.refresh().await.unwrap();

    server.move_item("foo").await.unwrap();
    server
        .report_result("foo", Some("mv exited with 1".into()), "mv: permission denied")
        .await
        .unwrap();

    let item = server.item("foo").await.unwrap();
    assert!(!item.move_info.moving);
    assert_eq!(item.move_info.last_error.as_deref(), Some("mv exited with 1"));
    assert_eq!(item.move_info.last_error_output, "mv: permission denied");
    assert!(item.move_info.target.is_none());
    assert!(item.allow_move);
    assert!(server.history().await.is_empty());
}

#[tokio::test]
async fn test_result_for_unknown_item_is_internal_error() {
    let env = Env::new();
    let server = env.server();
    let err = server.report_result("ghost", None, "").await.unwrap_err();
    assert!(matches!(err, MediaDeckError::Internal(_)));
    assert_eq!(server.messages()[0].kind, "move.error");
}

#[tokio::test]
async fn test_success_report_for_idle_item_keeps_it_live() {
    let env = Env::new();
    env.download("foo");
    let server = env.server();
    server.refresh().await.unwrap();

    let err = server.report_result("foo", None, "").await.unwrap_err();
    assert!(matches!(err, MediaDeckError::Internal(_)));
    assert!(server.item("foo").await.is_some());
    assert!(server.history().await.is_empty());
}

#[tokio::test]
async fn test_stale_target_is_rejected() {
    let env = Env::new();
    env.download("ep");
    let show = env.series().join("Show");
    std::fs::create_dir_all(&show).unwrap();
    let server = env.server();
    server.refresh().await.unwrap();
    server.set_move_target("ep", &show).await.unwrap();

    std::fs::remove_dir_all(&show).unwrap();
    server.refresh().await.unwrap();

    let err = server.move_item("ep").await.unwrap_err();
    assert_eq!(
        err.rejection(),
        Some(&MoveRejection::UnknownTarget(show.clone()))
    );
    let err = server.set_move_target("ep", &show).await.unwrap_err();
    assert!(matches!(
        err.rejection(),
        Some(MoveRejection::UnknownTarget(_))
    ));
}

#[tokio::test]
async fn test_move_targets_order() {
    let env = Env::new();
    std::fs::create_dir_all(env.series().join("B Show/Season 1")).unwrap();
    std::fs::create_dir_all(env.series().join("A Show")).unwrap();
    let server = env.server();
    server.refresh().await.unwrap();

    let targets = server.move_targets().await;
    assert_eq!(targets[0], env.movies());
    assert!(targets.contains(&env.series()));
    assert!(targets.contains(&env.series().join("A Show")));
    assert!(targets.contains(&env.series().join("B Show/Season 1")));
    let series_part: Vec<PathBuf> = targets[1..].to_vec();
    let mut sorted = series_part.clone();
    sorted.sort();
    assert_eq!(series_part, sorted);
}

#[tokio::test]
async fn test_unlistable_series_root_keeps_other_suggestions() {
    let env = Env::new();
    std::fs::create_dir_all(env.series().join("Show")).unwrap();
    let missing_root = env.series().with_file_name("gone");
    let server = env.server_with(MediaDeckConfig {
        series_targets: vec![env.series(), missing_root],
        ..env.config()
    });
    server.refresh().await.unwrap();

    let targets = server.move_targets().await;
    assert!(targets.contains(&env.series().join("Show")));
    assert!(server
        .messages()
        .iter()
        .any(|m| m.kind == "refresh.error" && m.message.contains("gone")));
}

#[tokio::test]
async fn test_set_allow_assistant_and_unknown_item() {
    let env = Env::new();
    env.download("X");
    let server = env.server();
    server.refresh().await.unwrap();

    server.set_allow_assistant("X", false).await.unwrap();
    assert!(!server.item("X").await.unwrap().allow_assistant);
    server.refresh().await.unwrap();
    assert!(!server.item("X").await.unwrap().allow_assistant);

    let err = server.set_allow_assistant("nope", true).await.unwrap_err();
    assert_eq!(err.to_rpc_error_code(), -32002);
}

#[tokio::test]
async fn test_disk_stats_keep_target_mounts() {
    let env = Env::new();
    let server = env.server();
    let stats = server.refresh_disk_stats().await.unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].mount_path, env.dir.path());
    assert_eq!(server.disk_stats(), stats);
}

#[tokio::test]
async fn test_message_ring_is_bounded() {
    let env = Env::new();
    let server = env.server();
    for _ in 0..=MessageConfig::MAX_ENTRIES {
        let _ = server.move_item("missing").await;
    }
    assert!(server.messages().len() <= MessageConfig::MAX_ENTRIES);
}

#[tokio::test]
async fn test_build_rejects_missing_source_dir() {
    let result = mediadeck_core::MoveServer::builder(MediaDeckConfig::default()).build();
    assert!(matches!(result, Err(MediaDeckError::Config { .. })));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_started_server_moves_files() {
    let env = Env::new();
    env.download("Movie.2021");
    let server = env.server();
    server.start().await.unwrap();
    assert!(server.item("Movie.2021").await.is_some());
    assert_eq!(server.disk_stats().len(), 1);

    server.move_item("Movie.2021").await.unwrap();

    let mut done = false;
    for _ in 0..100 {
        if server.item("Movie.2021").await.is_none() {
            done = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(done, "move did not finish");
    assert!(env.movies().join("Movie.2021/video.mkv").exists());
    assert!(!env.source().join("Movie.2021").exists());
    assert_eq!(server.history().await.len(), 1);

    let jobs: Vec<String> = server.cron_jobs().into_iter().map(|j| j.name).collect();
    assert_eq!(jobs, vec!["assistant", "disk-stats", "refresh"]);
    server.shutdown();
}

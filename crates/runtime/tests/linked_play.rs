mod common;

use std::time::Duration;

use janggi_core::{
    GameConfig, MoveCommand, MoveIntent, Origin, Piece, PieceKind, Session, Side, SnapshotBatch,
    Square, TableId,
};
use janggi_runtime::{
    Authority, AuthorityConfig, Event, Runtime, RuntimeConfig, RuntimeError, SyncEvent,
    TableLayout, Topic,
};
use tokio::sync::broadcast::error::TryRecvError;

use common::{init_tracing, wait_for};

fn on_board(row: usize, col: usize) -> Origin {
    Origin::OnBoard(Square::new(row, col))
}

fn linked_config() -> RuntimeConfig {
    RuntimeConfig {
        tables: TableLayout::Linked,
        ..RuntimeConfig::default()
    }
}

#[tokio::test]
async fn new_subscribers_receive_current_state() {
    init_tracing();
    let session = Session::linked_pair(&GameConfig::default());
    let authority = Authority::spawn(session.clone(), AuthorityConfig::default());

    let (current, _rx) = authority.handle().subscribe().await.unwrap();
    assert_eq!(current, SnapshotBatch::encode(&session));

    authority.shutdown().await.unwrap();
}

#[tokio::test]
async fn authority_routes_converted_capture_to_partner() {
    init_tracing();
    let authority = Authority::spawn(
        Session::linked_pair(&GameConfig::default()),
        AuthorityConfig::default(),
    );
    let host = authority.handle();
    let (_, mut snapshots) = host.subscribe().await.unwrap();

    // First side's chariot on table 1 takes the opposing chariot.
    let command = MoveCommand::new(on_board(9, 0), Square::new(0, 0));
    let commit = host
        .submit(MoveIntent::new(Some(TableId(1)), &command))
        .await
        .unwrap();
    assert_eq!(
        commit.capture.map(|capture| capture.taken),
        Some(Piece::new(Side::Second, PieceKind::Chariot))
    );

    let batch = snapshots.recv().await.unwrap();
    let decoded = batch.decode().unwrap();
    assert_eq!(decoded.len(), 2);
    assert_eq!(
        decoded[0].1.first_drops,
        Some(vec![Piece::new(Side::First, PieceKind::Chariot)])
    );
    assert_eq!(decoded[1].1.first_drops, Some(vec![]));
    assert_eq!(decoded[1].1.turn, Side::Second);
    assert_eq!(decoded[0].1.turn, Side::First);

    authority.shutdown().await.unwrap();
}

#[tokio::test]
async fn authority_drops_bad_intents_without_broadcasting() {
    init_tracing();
    let authority = Authority::spawn(
        Session::linked_pair(&GameConfig::default()),
        AuthorityConfig::default(),
    );
    let host = authority.handle();
    let (before, mut snapshots) = host.subscribe().await.unwrap();

    let unknown_table = r#"{"table":5,"from":{"location":0,"x":6,"y":0},"to":{"x":5,"y":0}}"#;
    assert!(matches!(
        host.submit_json(unknown_table).await,
        Err(RuntimeError::Session(_))
    ));

    let empty_origin = r#"{"from":{"location":0,"x":4,"y":4},"to":{"x":5,"y":4}}"#;
    assert!(matches!(
        host.submit_json(empty_origin).await,
        Err(RuntimeError::Session(_))
    ));

    assert!(matches!(
        host.submit_json("{}").await,
        Err(RuntimeError::Wire(_))
    ));

    assert_eq!(snapshots.try_recv(), Err(TryRecvError::Empty));
    let session = host.query_session().await.unwrap();
    assert_eq!(SnapshotBatch::encode(&session), before);

    authority.shutdown().await.unwrap();
}

#[tokio::test]
async fn replica_converges_with_authority() {
    init_tracing();
    let authority = Authority::spawn(
        Session::linked_pair(&GameConfig::default()),
        AuthorityConfig::default(),
    );
    let host = authority.handle();
    let (current, snapshots) = host.subscribe().await.unwrap();

    let runtime = Runtime::builder()
        .config(linked_config())
        .notifier(host.clone())
        .snapshot_source(snapshots)
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut sync_rx = handle.subscribe(Topic::Sync);
    handle.apply_decoded(current).await.unwrap();

    // Table 0: chariot runs up the file and captures.
    handle.pick(TableId(0), on_board(9, 0)).await.unwrap();
    handle.pick(TableId(0), on_board(0, 0)).await.unwrap();

    // One apply for the initial batch, one for the batch the commit produced.
    // The relay and the notifier race, so accept either order.
    let mut applied = 0;
    let mut sent = None;
    while applied < 2 || sent.is_none() {
        match wait_for(&mut sync_rx, Some).await {
            Event::Sync(SyncEvent::SnapshotApplied { .. }) => applied += 1,
            Event::Sync(SyncEvent::NotifySent { intent }) => sent = Some(intent),
            other => panic!("unexpected sync event: {other:?}"),
        }
    }
    assert_eq!(sent.map(|intent| intent.table), Some(Some(0)));

    let replica = handle.query_session().await.unwrap();
    let canonical = host.query_session().await.unwrap();
    for id in [TableId(0), TableId(1)] {
        let local = replica.table(id).unwrap();
        let remote = canonical.table(id).unwrap();
        assert_eq!(local.board, remote.board);
        assert_eq!(local.drops, remote.drops);
        assert_eq!(local.turn, remote.turn);
        assert_eq!(local.last_moved, remote.last_moved);
    }
    assert_eq!(
        replica.table(TableId(1)).unwrap().drops.pieces(Side::First),
        &[Piece::new(Side::First, PieceKind::Chariot)]
    );

    runtime.shutdown().await.unwrap();
    authority.shutdown().await.unwrap();
}

#[tokio::test]
async fn authority_shutdown_does_not_wait_for_replicas() {
    init_tracing();
    let authority = Authority::spawn(
        Session::linked_pair(&GameConfig::default()),
        AuthorityConfig::default(),
    );
    let host = authority.handle();
    let runtime = Runtime::builder()
        .config(linked_config())
        .notifier(host.clone())
        .build()
        .await
        .unwrap();

    tokio::time::timeout(Duration::from_secs(3), authority.shutdown())
        .await
        .expect("shutdown should not wait for the replica's notifier")
        .unwrap();
    assert!(matches!(
        host.submit_json(r#"{"from":{"location":0,"x":6,"y":0},"to":{"x":5,"y":0}}"#)
            .await,
        Err(RuntimeError::CommandChannelClosed)
    ));

    // The replica keeps playing locally; delivery now fails.
    let handle = runtime.handle();
    let mut sync_rx = handle.subscribe(Topic::Sync);
    handle.pick(TableId(0), on_board(6, 0)).await.unwrap();
    handle.pick(TableId(0), on_board(5, 0)).await.unwrap();
    let error = wait_for(&mut sync_rx, |event| match event {
        Event::Sync(SyncEvent::NotifyFailed { error, .. }) => Some(error),
        _ => None,
    })
    .await;
    assert!(!error.is_empty());

    runtime.shutdown().await.unwrap();
}

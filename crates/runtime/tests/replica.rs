mod common;

use std::time::Duration;

use async_trait::async_trait;
use janggi_core::{
    Board, IgnoreReason, MoveCommand, MoveIntent, Origin, PickEffect, Piece, PieceKind,
    Selection, Side, Square, TableId, TableState, WireOrigin, WireSquare,
};
use janggi_runtime::{
    ChannelNotifier, Event, MoveNotifier, NotifyError, Runtime, RuntimeConfig, RuntimeError,
    SyncEvent, TableEvent, Topic,
};

use common::{OPENING_SECOND_TO_MOVE, init_tracing, wait_for};

fn on_board(row: usize, col: usize) -> Origin {
    Origin::OnBoard(Square::new(row, col))
}

struct FailingNotifier;

#[async_trait]
impl MoveNotifier for FailingNotifier {
    async fn notify(&self, _intent: MoveIntent) -> Result<(), NotifyError> {
        Err(NotifyError::Rejected("host unavailable".into()))
    }
}

#[tokio::test]
async fn commit_publishes_events_and_posts_intent() {
    init_tracing();
    let (notifier, mut intents) = ChannelNotifier::channel(8);
    let runtime = Runtime::builder()
        .notifier(notifier)
        .build()
        .await
        .expect("runtime should build");
    let handle = runtime.handle();
    let mut table_rx = handle.subscribe(Topic::Table);
    let mut sync_rx = handle.subscribe(Topic::Sync);

    let effect = handle.pick(TableId(0), on_board(6, 0)).await.unwrap();
    assert_eq!(effect, PickEffect::Selected(on_board(6, 0)));
    let effect = handle.pick(TableId(0), on_board(5, 0)).await.unwrap();
    assert!(matches!(effect, PickEffect::Committed(_)));

    assert_eq!(
        table_rx.recv().await.unwrap(),
        Event::Table(TableEvent::SelectionChanged {
            table: TableId(0),
            selection: Selection::OnBoard(Square::new(6, 0)),
        })
    );
    let turn = wait_for(&mut table_rx, |event| match event {
        Event::Table(TableEvent::Committed { turn, .. }) => Some(turn),
        _ => None,
    })
    .await;
    assert_eq!(turn, Side::Second);

    let intent = intents.recv().await.expect("intent should be posted");
    assert_eq!(
        intent,
        MoveIntent {
            table: None,
            from: WireOrigin {
                location: 0,
                x: 6,
                y: 0
            },
            to: WireSquare { x: 5, y: 0 },
        }
    );
    let sent = wait_for(&mut sync_rx, |event| match event {
        Event::Sync(SyncEvent::NotifySent { intent }) => Some(intent),
        _ => None,
    })
    .await;
    assert_eq!(sent, intent);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn failed_notification_keeps_local_commit() {
    init_tracing();
    let runtime = Runtime::builder()
        .notifier(FailingNotifier)
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut sync_rx = handle.subscribe(Topic::Sync);

    handle.pick(TableId(0), on_board(6, 0)).await.unwrap();
    handle.pick(TableId(0), on_board(5, 0)).await.unwrap();

    let error = wait_for(&mut sync_rx, |event| match event {
        Event::Sync(SyncEvent::NotifyFailed { error, .. }) => Some(error),
        _ => None,
    })
    .await;
    assert!(error.contains("host unavailable"));

    let session = handle.query_session().await.unwrap();
    let table = session.table(TableId(0)).unwrap();
    assert_eq!(
        table.board.get(Square::new(5, 0)).unwrap(),
        Some(Piece::new(Side::First, PieceKind::Soldier))
    );
    assert_eq!(table.turn, Side::Second);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn ignored_and_rejected_picks_leave_state_alone() {
    init_tracing();
    let runtime = Runtime::builder()
        .validator(|_: &TableState, command: &MoveCommand| command.destination.row != 4)
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut table_rx = handle.subscribe(Topic::Table);

    let effect = handle.pick(TableId(0), on_board(4, 4)).await.unwrap();
    assert_eq!(effect, PickEffect::Ignored(IgnoreReason::EmptySquare));
    assert_eq!(
        table_rx.recv().await.unwrap(),
        Event::Table(TableEvent::PickIgnored {
            table: TableId(0),
            reason: IgnoreReason::EmptySquare,
        })
    );

    handle.pick(TableId(0), on_board(6, 4)).await.unwrap();
    let effect = handle.pick(TableId(0), on_board(4, 4)).await.unwrap();
    assert_eq!(effect, PickEffect::Ignored(IgnoreReason::Rejected));

    let session = handle.query_session().await.unwrap();
    let table = session.table(TableId(0)).unwrap();
    assert_eq!(table.board, Board::starting());
    assert_eq!(table.selection, Selection::OnBoard(Square::new(6, 4)));

    let missing = handle.pick(TableId(3), on_board(6, 4)).await;
    assert!(matches!(missing, Err(RuntimeError::Session(_))));

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn snapshot_overwrites_table() {
    init_tracing();
    let runtime = Runtime::builder().build().await.unwrap();
    let handle = runtime.handle();
    let mut sync_rx = handle.subscribe(Topic::Sync);

    let tables = handle
        .apply_snapshot(OPENING_SECOND_TO_MOVE)
        .await
        .unwrap();
    assert_eq!(tables, vec![TableId(0)]);
    assert_eq!(
        sync_rx.recv().await.unwrap(),
        Event::Sync(SyncEvent::SnapshotApplied {
            tables: vec![TableId(0)]
        })
    );

    let session = handle.query_session().await.unwrap();
    let table = session.table(TableId(0)).unwrap();
    assert_eq!(table.turn, Side::Second);
    assert_eq!(
        table.board.get(Square::new(5, 0)).unwrap(),
        Some(Piece::new(Side::First, PieceKind::Soldier))
    );
    assert_eq!(
        table.drops.pieces(Side::Second),
        &[Piece::new(Side::Second, PieceKind::Horse)]
    );
    assert_eq!(
        table.last_moved.as_slice(),
        &[Square::new(5, 0), Square::new(6, 0)]
    );

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn malformed_snapshots_are_dropped_whole() {
    init_tracing();
    let runtime = Runtime::builder().build().await.unwrap();
    let handle = runtime.handle();
    let mut sync_rx = handle.subscribe(Topic::Sync);
    let before = handle.query_session().await.unwrap();

    let result = handle.apply_snapshot("{not json").await;
    assert!(matches!(result, Err(RuntimeError::Wire(_))));
    assert!(matches!(
        sync_rx.recv().await.unwrap(),
        Event::Sync(SyncEvent::SnapshotDropped { .. })
    ));

    // Second entry targets a table this session does not have.
    let batch = format!("[{OPENING_SECOND_TO_MOVE}, {OPENING_SECOND_TO_MOVE}]");
    let result = handle.apply_snapshot(&batch).await;
    assert!(matches!(result, Err(RuntimeError::Session(_))));
    assert!(matches!(
        sync_rx.recv().await.unwrap(),
        Event::Sync(SyncEvent::SnapshotDropped { .. })
    ));

    assert_eq!(handle.query_session().await.unwrap(), before);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn shutdown_stops_worker_while_handles_are_alive() {
    init_tracing();
    let runtime = Runtime::builder().build().await.unwrap();
    let handle = runtime.handle();
    let other = handle.clone();

    tokio::time::timeout(Duration::from_secs(3), runtime.shutdown())
        .await
        .expect("shutdown should not wait for outstanding handles")
        .unwrap();

    assert!(matches!(
        handle.pick(TableId(0), on_board(6, 0)).await,
        Err(RuntimeError::CommandChannelClosed)
    ));
    assert!(other.query_session().await.unwrap_err().is_closed());
}

#[tokio::test]
async fn online_mode_requires_api_host() {
    let mut config = RuntimeConfig::default();
    config.remote.online = true;

    let result = Runtime::builder().config(config).build().await;
    assert!(matches!(result, Err(RuntimeError::MissingApiHost)));
}

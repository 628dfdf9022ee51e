//! Event types for different topics.

use janggi_core::{Commit, IgnoreReason, MoveIntent, Selection, Side, TableId};
use serde::{Deserialize, Serialize};

/// Events describing what local picks did to a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableEvent {
    /// A pick armed, re-armed or disarmed a selection.
    SelectionChanged { table: TableId, selection: Selection },

    /// A move was committed on the table.
    Committed {
        table: TableId,
        commit: Commit,
        /// Side on turn after the commit.
        turn: Side,
    },

    /// A pick left the table unchanged.
    PickIgnored { table: TableId, reason: IgnoreReason },

    /// A commit built from a stale selection was refused; the selection
    /// was dropped.
    CommitAborted { table: TableId, error: String },
}

/// Events related to the remote source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncEvent {
    /// A snapshot batch overwrote these tables.
    SnapshotApplied { tables: Vec<TableId> },

    /// A snapshot was malformed or targeted an unknown table and was dropped.
    SnapshotDropped { error: String },

    /// The remote source accepted a move intent.
    NotifySent { intent: MoveIntent },

    /// Posting a move intent failed. Local state is not rolled back.
    NotifyFailed { intent: MoveIntent, error: String },
}

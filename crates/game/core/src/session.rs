//! Ordered set of tables played together.
//!
//! A session owns one slot per table. Slots may be linked to one partner:
//! captures on a linked table feed the partner's drop pool instead of the
//! capturing table's own, which is what lets pieces cross between boards.
//! Links are explicit per slot, so layouts other than the observed single
//! table and linked pair remain representable.

use crate::config::GameConfig;
use crate::engine::{ApplyError, Capture, CaptureRoute, MoveCommand, MoveEngine};
use crate::error::{ErrorSeverity, GameError};
use crate::selection::{Commit, MoveValidator, PickEffect, SelectionMachine};
use crate::state::{Origin, Side, SnapshotPolicy, TableSnapshot, TableState};

/// Index of a table inside its session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableId(pub usize);

impl std::fmt::Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "table#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("{table} does not exist (session has {len} tables)")]
    UnknownTable { table: TableId, len: usize },

    #[error("{table} cannot be linked to itself")]
    SelfLink { table: TableId },

    #[error("{table} is already linked to {partner}")]
    AlreadyLinked { table: TableId, partner: TableId },

    #[error("session needs at least one table")]
    Empty,

    #[error("commit on {table} failed: {source}")]
    Apply {
        table: TableId,
        #[source]
        source: ApplyError,
    },
}

impl GameError for SessionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Apply { source, .. } => source.severity(),
            Self::UnknownTable { .. }
            | Self::SelfLink { .. }
            | Self::AlreadyLinked { .. }
            | Self::Empty => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownTable { .. } => "SESSION_UNKNOWN_TABLE",
            Self::SelfLink { .. } => "SESSION_SELF_LINK",
            Self::AlreadyLinked { .. } => "SESSION_ALREADY_LINKED",
            Self::Empty => "SESSION_EMPTY",
            Self::Apply { source, .. } => source.error_code(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Slot {
    table: TableState,
    link: Option<TableId>,
}

impl Slot {
    fn route(&self) -> CaptureRoute {
        if self.link.is_some() {
            CaptureRoute::Forward
        } else {
            CaptureRoute::Local
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    slots: Vec<Slot>,
    policy: SnapshotPolicy,
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// One table from the standard opening; captures stay on it.
    pub fn single(config: &GameConfig) -> Self {
        Self {
            slots: vec![Slot {
                table: TableState::new(config),
                link: None,
            }],
            policy: SnapshotPolicy::default(),
        }
    }

    /// Two linked tables from the standard opening, facing opposite ways.
    pub fn linked_pair(config: &GameConfig) -> Self {
        let first = TableState::new(config).with_orientation(Side::First);
        let second = TableState::new(config).with_orientation(Side::Second);
        Self {
            slots: vec![
                Slot {
                    table: first,
                    link: Some(TableId(1)),
                },
                Slot {
                    table: second,
                    link: Some(TableId(0)),
                },
            ],
            policy: SnapshotPolicy::default(),
        }
    }

    pub fn with_snapshot_policy(mut self, policy: SnapshotPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn snapshot_policy(&self) -> SnapshotPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_linked(&self) -> bool {
        self.slots.iter().any(|slot| slot.link.is_some())
    }

    pub fn table(&self, id: TableId) -> Result<&TableState, SessionError> {
        self.slot(id).map(|slot| &slot.table)
    }

    pub fn tables(&self) -> impl Iterator<Item = (TableId, &TableState)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(|(index, slot)| (TableId(index), &slot.table))
    }

    pub fn link(&self, id: TableId) -> Result<Option<TableId>, SessionError> {
        self.slot(id).map(|slot| slot.link)
    }

    /// Pieces on every board plus pieces in every pool.
    pub fn piece_count(&self) -> usize {
        self.slots.iter().map(|slot| slot.table.piece_count()).sum()
    }

    /// Routes a pick to one table's selection machine and delivers any
    /// forwarded capture to the linked table.
    pub fn handle_pick<V: MoveValidator>(
        &mut self,
        machine: &SelectionMachine<V>,
        id: TableId,
        pick: Origin,
    ) -> Result<PickEffect, SessionError> {
        let slot = self.slot(id)?;
        let outcome = machine.handle_pick(&slot.table, pick, slot.route());

        self.slots[id.0].table = outcome.table;
        if let PickEffect::Committed(Commit {
            capture: Some(capture),
            ..
        }) = &outcome.effect
        {
            self.deliver(id, capture)?;
        }
        Ok(outcome.effect)
    }

    /// Applies a command directly, bypassing selection. This is the path of
    /// an authoritative host replaying move intents.
    pub fn commit(&mut self, id: TableId, command: MoveCommand) -> Result<Commit, SessionError> {
        let slot = self.slot(id)?;
        let transition = MoveEngine::new(&slot.table)
            .apply(&command, slot.route())
            .map_err(|source| SessionError::Apply { table: id, source })?;

        self.slots[id.0].table = transition.table;
        if let Some(capture) = &transition.capture {
            self.deliver(id, capture)?;
        }
        Ok(Commit {
            command,
            capture: transition.capture,
        })
    }

    /// Overwrites one table with an authoritative snapshot.
    pub fn apply_snapshot(
        &mut self,
        id: TableId,
        snapshot: &TableSnapshot,
    ) -> Result<(), SessionError> {
        let policy = self.policy;
        let slot = self.slot_mut(id)?;
        slot.table = slot.table.overwritten(snapshot, policy);
        Ok(())
    }

    fn deliver(&mut self, from: TableId, capture: &Capture) -> Result<(), SessionError> {
        if capture.route != CaptureRoute::Forward {
            return Ok(());
        }
        let Some(partner) = self.slot(from)?.link else {
            return Ok(());
        };

        let slot = self.slot_mut(partner)?;
        slot.table = slot.table.receive_drop(capture.converted);
        tracing::debug!(%from, %partner, piece = %capture.converted, "capture forwarded");
        Ok(())
    }

    fn slot(&self, id: TableId) -> Result<&Slot, SessionError> {
        let len = self.slots.len();
        self.slots
            .get(id.0)
            .ok_or(SessionError::UnknownTable { table: id, len })
    }

    fn slot_mut(&mut self, id: TableId) -> Result<&mut Slot, SessionError> {
        let len = self.slots.len();
        self.slots
            .get_mut(id.0)
            .ok_or(SessionError::UnknownTable { table: id, len })
    }
}

/// Builder for sessions with arbitrary tables and links.
#[derive(Default)]
pub struct SessionBuilder {
    tables: Vec<TableState>,
    links: Vec<(TableId, TableId)>,
    policy: SnapshotPolicy,
}

impl SessionBuilder {
    fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, table: TableState) -> Self {
        self.tables.push(table);
        self
    }

    /// Links two tables in both directions.
    pub fn link(mut self, a: TableId, b: TableId) -> Self {
        self.links.push((a, b));
        self
    }

    pub fn snapshot_policy(mut self, policy: SnapshotPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn build(self) -> Result<Session, SessionError> {
        if self.tables.is_empty() {
            return Err(SessionError::Empty);
        }

        let mut slots: Vec<Slot> = self
            .tables
            .into_iter()
            .map(|table| Slot { table, link: None })
            .collect();
        let len = slots.len();

        for (a, b) in self.links {
            for id in [a, b] {
                if id.0 >= len {
                    return Err(SessionError::UnknownTable { table: id, len });
                }
            }
            if a == b {
                return Err(SessionError::SelfLink { table: a });
            }
            for (id, partner) in [(a, b), (b, a)] {
                if let Some(existing) = slots[id.0].link
                    && existing != partner
                {
                    return Err(SessionError::AlreadyLinked {
                        table: id,
                        partner: existing,
                    });
                }
                slots[id.0].link = Some(partner);
            }
        }

        Ok(Session {
            slots,
            policy: self.policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Board, Piece, PieceKind, Square};

    #[test]
    fn builder_validates_links() {
        let table = TableState::default;
        assert_eq!(Session::builder().build(), Err(SessionError::Empty));
        assert_eq!(
            Session::builder()
                .table(table())
                .link(TableId(0), TableId(0))
                .build(),
            Err(SessionError::SelfLink { table: TableId(0) })
        );
        assert_eq!(
            Session::builder()
                .table(table())
                .link(TableId(0), TableId(3))
                .build(),
            Err(SessionError::UnknownTable {
                table: TableId(3),
                len: 1
            })
        );
        assert_eq!(
            Session::builder()
                .table(table())
                .table(table())
                .table(table())
                .link(TableId(0), TableId(1))
                .link(TableId(0), TableId(2))
                .build(),
            Err(SessionError::AlreadyLinked {
                table: TableId(0),
                partner: TableId(1)
            })
        );
    }

    #[test]
    fn builder_links_are_symmetric() {
        let session = Session::builder()
            .table(TableState::default())
            .table(TableState::default())
            .table(TableState::default())
            .link(TableId(2), TableId(0))
            .build()
            .unwrap();
        assert_eq!(session.link(TableId(0)), Ok(Some(TableId(2))));
        assert_eq!(session.link(TableId(2)), Ok(Some(TableId(0))));
        assert_eq!(session.link(TableId(1)), Ok(None));
    }

    #[test]
    fn direct_commit_forwards_capture_to_partner() {
        let mut session = Session::linked_pair(&GameConfig::default());
        let command = MoveCommand::new(Origin::OnBoard(Square::new(9, 0)), Square::new(0, 0));

        let commit = session.commit(TableId(1), command).unwrap();

        assert_eq!(
            commit.capture.map(|c| c.converted),
            Some(Piece::new(Side::First, PieceKind::Chariot))
        );
        assert!(session.table(TableId(1)).unwrap().drops.is_empty());
        assert_eq!(
            session.table(TableId(0)).unwrap().drops.pieces(Side::First),
            &[Piece::new(Side::First, PieceKind::Chariot)]
        );
        assert_eq!(session.piece_count(), 64);
    }

    #[test]
    fn snapshot_for_unknown_table_is_an_error() {
        let mut session = Session::single(&GameConfig::default());
        let snapshot = TableSnapshot::new(Board::empty(), Side::First);
        assert!(matches!(
            session.apply_snapshot(TableId(1), &snapshot),
            Err(SessionError::UnknownTable { .. })
        ));
    }
}

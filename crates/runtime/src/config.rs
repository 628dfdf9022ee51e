//! Runtime configuration structures and loaders.
use std::env;
use std::time::Duration;

use janggi_core::{GameConfig, Session, Side, SnapshotPolicy};

/// How many tables a session holds and whether they feed each other.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TableLayout {
    #[default]
    Single,
    Linked,
}

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    pub tables: TableLayout,
    pub snapshot_policy: SnapshotPolicy,
    /// Display orientation of table 0. Linked partners face the other way.
    pub orientation: Side,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    pub remote: RemoteConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            tables: TableLayout::default(),
            snapshot_policy: SnapshotPolicy::default(),
            orientation: Side::First,
            event_buffer_size: 100,
            command_buffer_size: 32,
            remote: RemoteConfig::default(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RemoteConfig {
    /// Post committed moves and follow the remote snapshot stream.
    pub online: bool,
    /// Base URL of the remote source. Snapshots stream from the URL itself,
    /// moves are posted to `{api_host}/moves`.
    pub api_host: Option<String>,
    /// Pause before reopening a snapshot stream that ended or failed.
    pub reconnect_delay: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            online: false,
            api_host: None,
            reconnect_delay: Duration::from_millis(1000),
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `JANGGI_TABLES` - `single` or `linked` (default: single)
    /// - `JANGGI_SNAPSHOT_POLICY` - `retain` or `clear` (default: retain)
    /// - `JANGGI_ORIENTATION` - `first` or `second` (default: first)
    /// - `JANGGI_STARTING_TURN` - `first` or `second` (default: first)
    /// - `JANGGI_ONLINE` - Enable remote sync (default: false)
    /// - `JANGGI_API_HOST` - Remote source base URL
    /// - `JANGGI_RECONNECT_MS` - Stream reconnect delay (default: 1000)
    /// - `JANGGI_COMMAND_BUFFER` - Command queue size (default: 32)
    /// - `JANGGI_EVENT_BUFFER` - Event channel capacity (default: 100)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`RuntimeConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).map(|raw| raw.trim().to_string());
        let mut config = Self::default();

        if let Some(tables) = parse(read("JANGGI_TABLES")) {
            config.tables = tables;
        }
        if let Some(policy) = parse(read("JANGGI_SNAPSHOT_POLICY")) {
            config.snapshot_policy = policy;
        }
        if let Some(side) = parse(read("JANGGI_ORIENTATION")) {
            config.orientation = side;
        }
        if let Some(side) = parse(read("JANGGI_STARTING_TURN")) {
            config.game_config.starting_turn = side;
        }

        // Accept a bare `JANGGI_ONLINE=` as "true" as well.
        match read("JANGGI_ONLINE") {
            Some(raw) if raw.is_empty() => config.remote.online = true,
            raw => {
                if let Some(online) = parse::<bool>(raw) {
                    config.remote.online = online;
                }
            }
        }
        config.remote.api_host = read("JANGGI_API_HOST").filter(|host| !host.is_empty());
        if let Some(ms) = parse::<u64>(read("JANGGI_RECONNECT_MS")) {
            config.remote.reconnect_delay = Duration::from_millis(ms);
        }

        if let Some(capacity) = parse::<usize>(read("JANGGI_COMMAND_BUFFER")) {
            config.command_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = parse::<usize>(read("JANGGI_EVENT_BUFFER")) {
            config.event_buffer_size = capacity.max(1);
        }

        config
    }

    /// Fresh session for the configured layout.
    pub fn session(&self) -> Session {
        let session = match self.tables {
            TableLayout::Single => Session::single(&self.game_config),
            TableLayout::Linked => Session::linked_pair(&self.game_config),
        };
        let oriented = match (self.tables, self.orientation) {
            (_, Side::First) => session,
            (TableLayout::Single, Side::Second) => reorient(session, &[Side::Second]),
            (TableLayout::Linked, Side::Second) => {
                reorient(session, &[Side::Second, Side::First])
            }
        };
        oriented.with_snapshot_policy(self.snapshot_policy)
    }
}

fn reorient(session: Session, orientations: &[Side]) -> Session {
    let builder = session
        .tables()
        .zip(orientations)
        .fold(Session::builder(), |builder, ((_, table), side)| {
            builder.table(table.clone().with_orientation(*side))
        });
    let builder = if session.is_linked() {
        builder.link(janggi_core::TableId(0), janggi_core::TableId(1))
    } else {
        builder
    };
    // Rebuilding the same topology cannot fail; keep the original if it somehow does.
    builder.build().unwrap_or(session)
}

fn parse<T: std::str::FromStr>(raw: Option<String>) -> Option<T> {
    raw?.parse().ok()
}

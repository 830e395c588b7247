use capsule_drop_common::types::{
    current_event, DropEvent, ManifestItem, PoolItem, PrizeType, Rarity, WinStatus,
};
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, StdResult, Storage, Timestamp};
use cw_storage_plus::Item;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const CONFIG: Item<Config> = Item::new("config");
pub const PULL_SESSION: Item<PullSession> = Item::new("pull_session");

/// Visitor-facing collections. Key names are the persisted storage keys of
/// the drop site and must not change.
pub const EVENT_OVERRIDE: Item<DropEvent> = Item::new("capsule_admin_event_v1");
pub const POOL: Item<Vec<PoolItem>> = Item::new("capsule_pool_v1");
pub const MANIFEST: Item<Vec<ManifestItem>> = Item::new("capsule_manifest_v1");
pub const EVENT_LOCKED: Item<String> = Item::new("capsule_event_locked_v1");
pub const WINS: Item<Vec<Win>> = Item::new("capsule_wins_v1");
pub const ARCHIVE: Item<Vec<ArchiveEntry>> = Item::new("capsule_archive_v1");

pub const DEFAULT_OPEN_DELAY_MS: u64 = 850;
pub const DEFAULT_REVEAL_DELAY_MS: u64 = 1_400;

#[cw_serde]
pub struct Config {
    pub admin: Addr,
    /// Suspense delay between confirming a pull and drawing from the pool.
    pub open_delay_ms: u64,
    /// Delay between the draw and the reveal of the result.
    pub reveal_delay_ms: u64,
}

/// A reward drawn by the visitor. Snapshot of the ticket at draw time.
#[cw_serde]
pub struct Win {
    pub id: String,
    /// Milliseconds since epoch.
    #[serde(rename = "ts")]
    pub timestamp: u64,
    pub rarity: Rarity,
    pub title: String,
    pub subtitle: String,
    /// Name of the active drop when the win was recorded.
    #[serde(rename = "event")]
    pub event_name: String,
    #[serde(rename = "type")]
    pub prize_type: PrizeType,
    pub status: WinStatus,
}

/// Snapshot of a drop taken when the admin closes it.
#[cw_serde]
#[serde(rename_all = "camelCase")]
pub struct ArchiveEntry {
    pub id: String,
    #[serde(rename = "ts")]
    pub timestamp: u64,
    pub name: String,
    pub partner: String,
    pub accent: String,
    pub sold_out: bool,
    pub capsule_total: u32,
    pub manifest_count: u32,
}

#[cw_serde]
pub enum PullStep {
    Ready,
    Confirm,
    Opening {
        started_at: Timestamp,
        /// Empty until the open delay has elapsed and the pool was drawn.
        drawn: Vec<PoolItem>,
        drawn_at: Option<Timestamp>,
    },
    Result {
        best: Win,
        wins: Vec<Win>,
    },
}

impl PullStep {
    pub fn name(&self) -> &'static str {
        match self {
            PullStep::Ready => "ready",
            PullStep::Confirm => "confirm",
            PullStep::Opening { .. } => "opening",
            PullStep::Result { .. } => "result",
        }
    }
}

#[cw_serde]
pub struct PullSession {
    pub step: PullStep,
    /// Capsules per pull, kept within `[1, maxPerUser]` by the selector.
    pub count: u32,
    pub sold_out: bool,
}

impl Default for PullSession {
    fn default() -> Self {
        PullSession {
            step: PullStep::Ready,
            count: 1,
            sold_out: false,
        }
    }
}

/// Result of taking tickets off the front of the pool.
#[cw_serde]
pub struct PoolDraw {
    pub taken: Vec<PoolItem>,
    pub remaining: u32,
}

/// Load a persisted value, treating a missing key or a value that does not
/// parse as the declared type the same way: fall back to `default`.
fn load_or_else<T, F>(storage: &dyn Storage, item: &Item<T>, default: F) -> T
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> T,
{
    match item.may_load(storage) {
        Ok(Some(value)) => value,
        _ => default(),
    }
}

// ── Event ───────────────────────────────────────────────────────

/// The admin override if one is stored and well formed, else the
/// compiled-in drop.
pub fn active_event(storage: &dyn Storage) -> DropEvent {
    load_or_else(storage, &EVENT_OVERRIDE, current_event)
}

pub fn save_event_override(storage: &mut dyn Storage, event: &DropEvent) -> StdResult<()> {
    EVENT_OVERRIDE.save(storage, event)
}

pub fn clear_event_override(storage: &mut dyn Storage) {
    EVENT_OVERRIDE.remove(storage)
}

// ── Pool ────────────────────────────────────────────────────────

pub fn read_pool(storage: &dyn Storage) -> Vec<PoolItem> {
    load_or_else(storage, &POOL, Vec::new)
}

pub fn write_pool(storage: &mut dyn Storage, pool: &Vec<PoolItem>) -> StdResult<()> {
    POOL.save(storage, pool)
}

pub fn clear_pool(storage: &mut dyn Storage) {
    POOL.remove(storage)
}

/// Take up to `n` tickets off the front of the pool and write the rest back.
///
/// An empty pool is left untouched.
pub fn pop_from_pool(storage: &mut dyn Storage, n: u32) -> StdResult<PoolDraw> {
    let mut pool = read_pool(storage);
    if pool.is_empty() {
        return Ok(PoolDraw {
            taken: vec![],
            remaining: 0,
        });
    }

    let split = (n as usize).min(pool.len());
    let rest = pool.split_off(split);
    write_pool(storage, &rest)?;

    Ok(PoolDraw {
        taken: pool,
        remaining: rest.len() as u32,
    })
}

// ── Manifest ────────────────────────────────────────────────────

pub fn read_manifest(storage: &dyn Storage) -> Vec<ManifestItem> {
    load_or_else(storage, &MANIFEST, Vec::new)
}

pub fn write_manifest(storage: &mut dyn Storage, items: &Vec<ManifestItem>) -> StdResult<()> {
    MANIFEST.save(storage, items)
}

// ── Lock flag ───────────────────────────────────────────────────

pub fn is_event_locked(storage: &dyn Storage) -> bool {
    load_or_else(storage, &EVENT_LOCKED, String::new) == "1"
}

pub fn set_event_locked(storage: &mut dyn Storage, locked: bool) -> StdResult<()> {
    let flag = if locked { "1" } else { "0" };
    EVENT_LOCKED.save(storage, &flag.to_string())
}

// ── Wins ────────────────────────────────────────────────────────

/// Newest first.
pub fn read_wins(storage: &dyn Storage) -> Vec<Win> {
    load_or_else(storage, &WINS, Vec::new)
}

pub fn write_wins(storage: &mut dyn Storage, wins: &Vec<Win>) -> StdResult<()> {
    WINS.save(storage, wins)
}

// ── Archive ─────────────────────────────────────────────────────

/// Newest first.
pub fn read_archive(storage: &dyn Storage) -> Vec<ArchiveEntry> {
    load_or_else(storage, &ARCHIVE, Vec::new)
}

pub fn write_archive(storage: &mut dyn Storage, entries: &Vec<ArchiveEntry>) -> StdResult<()> {
    ARCHIVE.save(storage, entries)
}

// ── Pull session ────────────────────────────────────────────────

pub fn load_pull_session(storage: &dyn Storage) -> PullSession {
    load_or_else(storage, &PULL_SESSION, PullSession::default)
}

pub fn save_pull_session(storage: &mut dyn Storage, session: &PullSession) -> StdResult<()> {
    PULL_SESSION.save(storage, session)
}

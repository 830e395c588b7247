use capsule_drop_common::pool::PoolComposition;
use capsule_drop_common::types::{
    DropEvent, ManifestItem, PrizeType, Rarity, ShowcaseDrop,
};
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Decimal;

use crate::state::{ArchiveEntry, Config, PullSession, Win};

#[cw_serde]
pub struct InstantiateMsg {
    /// Defaults to 850 ms.
    pub open_delay_ms: Option<u64>,
    /// Defaults to 1400 ms.
    pub reveal_delay_ms: Option<u64>,
}

#[cw_serde]
pub enum ExecuteMsg {
    // ── Admin console ──
    /// Store an edited copy of the active drop. Rejected while locked.
    SaveEvent { event: DropEvent },
    /// Drop the stored override and go back to the compiled-in drop.
    ResetEvent {},
    /// Toggle "Vault Verified".
    SetLocked { locked: bool },
    AddManifestItem {
        name: String,
        prize_type: PrizeType,
        rarity: Rarity,
        note: Option<String>,
    },
    UpdateManifestItem { item: ManifestItem },
    RemoveManifestItem { id: String },
    /// Replace the pool with a freshly shuffled one. Not gated by the lock.
    GeneratePool { total: i64 },
    ClearPool {},
    /// Archive the drop and empty the pool. Requires the lock.
    CloseEvent {},
    /// Update timings. Admin only.
    UpdateConfig {
        open_delay_ms: Option<u64>,
        reveal_delay_ms: Option<u64>,
    },

    // ── Pull flow ──
    SetPullCount { count: u32 },
    /// ready → confirm
    StartPull {},
    /// confirm → ready
    CancelPull {},
    /// confirm → opening
    ConfirmPull {},
    /// Drive the opening step forward once its delays have elapsed.
    AdvancePull {},
    /// result → ready
    PullAgain {},

    // ── Collection ──
    /// Wipe the win history. No confirmation.
    ClearWins {},
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Config)]
    Config {},
    #[returns(DropEvent)]
    Event {},
    #[returns(StorefrontResponse)]
    Storefront {},
    #[returns(PoolSummaryResponse)]
    PoolSummary {},
    /// What `GeneratePool { total }` would produce.
    #[returns(PoolComposition)]
    PoolPlan { total: i64 },
    #[returns(Vec<ManifestItem>)]
    Manifest {},
    #[returns(bool)]
    Locked {},
    #[returns(WinsResponse)]
    Wins {},
    #[returns(Vec<ArchiveEntry>)]
    Archive {},
    #[returns(Vec<ShowcaseDrop>)]
    SponsorWall {},
    #[returns(PullSessionResponse)]
    PullSession {},
}

#[cw_serde]
pub struct StorefrontResponse {
    pub event: DropEvent,
    pub locked: bool,
    /// "Vault Verified" or "Unverified (Unlock in Admin)".
    pub verified_label: String,
    pub manifest_count: u32,
    pub pool_remaining: u32,
    pub sold_out: bool,
}

#[cw_serde]
pub struct PoolSummaryResponse {
    pub remaining: u32,
    pub composition: PoolComposition,
}

#[cw_serde]
pub struct WinsResponse {
    /// Newest first.
    pub wins: Vec<Win>,
    pub total: u32,
    pub physical: u32,
    pub digital: u32,
}

#[cw_serde]
pub struct PullSessionResponse {
    pub session: PullSession,
    pub pool_remaining: u32,
    pub price: Decimal,
    /// `price * count`
    pub total_price: Decimal,
    pub max_per_user: u32,
}

/// Parameters for `ExecuteMsg::UpdateConfig`.
pub struct UpdateConfigParams {
    pub open_delay_ms: Option<u64>,
    pub reveal_delay_ms: Option<u64>,
}

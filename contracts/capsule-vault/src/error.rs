use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("event is locked (Vault Verified); unlock it before editing")]
    EventLocked,

    #[error("event must be locked before it can be closed")]
    EventNotLocked,

    #[error("invalid event: {reason}")]
    InvalidEvent { reason: String },

    #[error("invalid manifest item: {reason}")]
    InvalidManifestItem { reason: String },

    #[error("pool total {total} exceeds the maximum of {max}")]
    PoolTooLarge { total: i64, max: i64 },

    #[error("manifest item {id} not found")]
    ManifestItemNotFound { id: String },

    #[error("sold out: the capsule pool is empty")]
    SoldOut,

    #[error("pull is in step {actual}, expected {expected}")]
    InvalidPullStep { expected: String, actual: String },

    #[error("capsule is still opening (ready at {ready_at_ms} ms)")]
    PullNotReady { ready_at_ms: u64 },
}

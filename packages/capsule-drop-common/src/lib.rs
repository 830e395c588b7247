pub mod entropy;
pub mod pool;
pub mod types;

pub use entropy::{derive_seed, shuffle};
pub use pool::{best_index, best_of, generate_pool, PoolComposition, MAX_POOL_TOTAL};
pub use types::{
    current_event, sponsor_wall, DropEvent, ManifestItem, PoolItem, PrizeType, Rarity,
    ShowcaseDrop, WinStatus,
};

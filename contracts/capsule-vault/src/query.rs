use capsule_drop_common::pool::PoolComposition;
use capsule_drop_common::types::{sponsor_wall, PrizeType};
use cosmwasm_std::{to_json_binary, Binary, Decimal, Deps, StdResult};

use crate::msg::{PoolSummaryResponse, PullSessionResponse, StorefrontResponse, WinsResponse};
use crate::pull::clamp_pull_count;
use crate::state::{
    active_event, is_event_locked, load_pull_session, read_archive, read_manifest, read_pool,
    read_wins, PullStep, CONFIG,
};

const VERIFIED_LABEL: &str = "Vault Verified";
const UNVERIFIED_LABEL: &str = "Unverified (Unlock in Admin)";

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_event(deps: Deps) -> StdResult<Binary> {
    to_json_binary(&active_event(deps.storage))
}

pub fn query_storefront(deps: Deps) -> StdResult<Binary> {
    let locked = is_event_locked(deps.storage);
    let pool_remaining = read_pool(deps.storage).len() as u32;

    to_json_binary(&StorefrontResponse {
        event: active_event(deps.storage),
        locked,
        verified_label: if locked { VERIFIED_LABEL } else { UNVERIFIED_LABEL }.to_string(),
        manifest_count: read_manifest(deps.storage).len() as u32,
        pool_remaining,
        sold_out: pool_remaining == 0,
    })
}

pub fn query_pool_summary(deps: Deps) -> StdResult<Binary> {
    let pool = read_pool(deps.storage);
    to_json_binary(&PoolSummaryResponse {
        remaining: pool.len() as u32,
        composition: PoolComposition::of(&pool),
    })
}

pub fn query_pool_plan(total: i64) -> StdResult<Binary> {
    to_json_binary(&PoolComposition::for_total(total))
}

pub fn query_manifest(deps: Deps) -> StdResult<Binary> {
    to_json_binary(&read_manifest(deps.storage))
}

pub fn query_locked(deps: Deps) -> StdResult<Binary> {
    to_json_binary(&is_event_locked(deps.storage))
}

pub fn query_wins(deps: Deps) -> StdResult<Binary> {
    let wins = read_wins(deps.storage);
    let physical = wins
        .iter()
        .filter(|w| w.prize_type == PrizeType::Physical)
        .count() as u32;
    let digital = wins
        .iter()
        .filter(|w| w.prize_type == PrizeType::Digital)
        .count() as u32;

    to_json_binary(&WinsResponse {
        total: wins.len() as u32,
        physical,
        digital,
        wins,
    })
}

pub fn query_archive(deps: Deps) -> StdResult<Binary> {
    to_json_binary(&read_archive(deps.storage))
}

pub fn query_sponsor_wall() -> StdResult<Binary> {
    to_json_binary(&sponsor_wall())
}

pub fn query_pull_session(deps: Deps) -> StdResult<Binary> {
    let mut session = load_pull_session(deps.storage);
    let event = active_event(deps.storage);
    let pool_remaining = read_pool(deps.storage).len() as u32;

    // Both follow the live drop while idle.
    if session.step == PullStep::Ready {
        session.count = clamp_pull_count(session.count, event.pricing.max_per_user);
        session.sold_out = pool_remaining == 0;
    }

    let price = event.pricing.price;
    let total_price = price.checked_mul(Decimal::from_ratio(session.count, 1u32))?;

    to_json_binary(&PullSessionResponse {
        pool_remaining,
        price,
        total_price,
        max_per_user: event.pricing.max_per_user,
        session,
    })
}

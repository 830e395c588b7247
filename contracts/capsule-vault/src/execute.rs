use capsule_drop_common::entropy::derive_seed;
use capsule_drop_common::pool::{generate_pool, PoolComposition, MAX_POOL_TOTAL};
use capsule_drop_common::types::{DropEvent, ManifestItem, PrizeType, Rarity};
use cosmwasm_std::{DepsMut, Env, Event, MessageInfo, Response, Storage};

use crate::error::ContractError;
use crate::msg::UpdateConfigParams;
use crate::state::{
    active_event, clear_event_override, clear_pool, is_event_locked, read_archive,
    read_manifest, read_pool, save_event_override, set_event_locked, write_archive,
    write_manifest, write_pool, write_wins, ArchiveEntry, CONFIG,
};

/// Block time in milliseconds, the resolution used for ids and timestamps.
pub fn block_time_ms(env: &Env) -> u64 {
    env.block.time.nanos() / 1_000_000
}

fn ensure_unlocked(storage: &dyn Storage) -> Result<(), ContractError> {
    if is_event_locked(storage) {
        return Err(ContractError::EventLocked);
    }
    Ok(())
}

/// Save an edited drop. Rejected while locked or when a field is invalid.
pub fn save_event(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    event: DropEvent,
) -> Result<Response, ContractError> {
    ensure_unlocked(deps.storage)?;
    event
        .validate()
        .map_err(|reason| ContractError::InvalidEvent { reason })?;

    save_event_override(deps.storage, &event)?;

    Ok(Response::new()
        .add_attribute("action", "save_event")
        .add_attribute("event_id", event.id.clone())
        .add_event(
            Event::new("capsule_event_saved")
                .add_attribute("event_id", event.id)
                .add_attribute("name", event.name)
                .add_attribute("price", event.pricing.price.to_string())
                .add_attribute("max_per_user", event.pricing.max_per_user.to_string())
                .add_attribute("inventory_total", event.inventory.total.to_string())
                .add_attribute("inventory_remaining", event.inventory.remaining.to_string()),
        ))
}

/// Discard the stored override.
pub fn reset_event(deps: DepsMut, _env: Env, _info: MessageInfo) -> Result<Response, ContractError> {
    ensure_unlocked(deps.storage)?;
    clear_event_override(deps.storage);

    let event = active_event(deps.storage);
    Ok(Response::new()
        .add_attribute("action", "reset_event")
        .add_attribute("event_id", event.id))
}

pub fn set_locked(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    locked: bool,
) -> Result<Response, ContractError> {
    set_event_locked(deps.storage, locked)?;

    Ok(Response::new()
        .add_attribute("action", "set_locked")
        .add_attribute("locked", locked.to_string())
        .add_event(
            Event::new("capsule_lock_changed").add_attribute("locked", locked.to_string()),
        ))
}

pub fn add_manifest_item(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    name: String,
    prize_type: PrizeType,
    rarity: Rarity,
    note: Option<String>,
) -> Result<Response, ContractError> {
    ensure_unlocked(deps.storage)?;

    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(ContractError::InvalidManifestItem {
            reason: "name must not be empty".to_string(),
        });
    }

    let mut items = read_manifest(deps.storage);
    let item = ManifestItem {
        id: format!("M-{}-{}", items.len(), block_time_ms(&env)),
        name,
        prize_type,
        rarity,
        note: note.filter(|n| !n.trim().is_empty()),
    };
    items.push(item.clone());
    write_manifest(deps.storage, &items)?;

    Ok(Response::new()
        .add_attribute("action", "add_manifest_item")
        .add_attribute("item_id", item.id.clone())
        .add_event(
            Event::new("capsule_manifest_item_added")
                .add_attribute("item_id", item.id)
                .add_attribute("name", item.name)
                .add_attribute("type", item.prize_type.as_str())
                .add_attribute("rarity", item.rarity.as_str())
                .add_attribute("manifest_count", items.len().to_string()),
        ))
}

/// Replace the manifest entry with the same id.
pub fn update_manifest_item(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    item: ManifestItem,
) -> Result<Response, ContractError> {
    ensure_unlocked(deps.storage)?;

    if item.name.trim().is_empty() {
        return Err(ContractError::InvalidManifestItem {
            reason: "name must not be empty".to_string(),
        });
    }

    let mut items = read_manifest(deps.storage);
    let slot = items
        .iter_mut()
        .find(|existing| existing.id == item.id)
        .ok_or_else(|| ContractError::ManifestItemNotFound {
            id: item.id.clone(),
        })?;
    *slot = item.clone();
    write_manifest(deps.storage, &items)?;

    Ok(Response::new()
        .add_attribute("action", "update_manifest_item")
        .add_attribute("item_id", item.id))
}

pub fn remove_manifest_item(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    id: String,
) -> Result<Response, ContractError> {
    ensure_unlocked(deps.storage)?;

    let mut items = read_manifest(deps.storage);
    let before = items.len();
    items.retain(|item| item.id != id);
    if items.len() == before {
        return Err(ContractError::ManifestItemNotFound { id });
    }
    write_manifest(deps.storage, &items)?;

    Ok(Response::new()
        .add_attribute("action", "remove_manifest_item")
        .add_attribute("item_id", id)
        .add_attribute("manifest_count", items.len().to_string()))
}

/// Replace the pool with a freshly generated, shuffled one.
///
/// Allowed while locked. Zero or negative totals still produce the minimum
/// tiers; totals above [`MAX_POOL_TOTAL`] are rejected.
pub fn generate(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    total: i64,
) -> Result<Response, ContractError> {
    if total > MAX_POOL_TOTAL {
        return Err(ContractError::PoolTooLarge {
            total,
            max: MAX_POOL_TOTAL,
        });
    }

    let now_ms = block_time_ms(&env);
    let seed = derive_seed(&[
        env.contract.address.as_bytes(),
        &env.block.height.to_be_bytes(),
        &env.block.time.nanos().to_be_bytes(),
        &total.to_be_bytes(),
    ]);

    let pool = generate_pool(total, now_ms, &seed);
    write_pool(deps.storage, &pool)?;

    let composition = PoolComposition::of(&pool);
    Ok(Response::new()
        .add_attribute("action", "generate_pool")
        .add_attribute("requested_total", total.to_string())
        .add_attribute("pool_size", pool.len().to_string())
        .add_event(
            Event::new("capsule_pool_generated")
                .add_attribute("pool_size", pool.len().to_string())
                .add_attribute("ultra_rare", composition.ultra_rare.to_string())
                .add_attribute("super_rare", composition.super_rare.to_string())
                .add_attribute("rare", composition.rare.to_string())
                .add_attribute("digital", composition.digital.to_string())
                .add_attribute("seed", hex::encode(seed)),
        ))
}

pub fn clear(deps: DepsMut, _env: Env, _info: MessageInfo) -> Result<Response, ContractError> {
    let dropped = read_pool(deps.storage).len();
    clear_pool(deps.storage);

    Ok(Response::new()
        .add_attribute("action", "clear_pool")
        .add_attribute("dropped", dropped.to_string()))
}

/// Snapshot the drop into the archive and empty the pool.
///
/// Only a locked (Vault Verified) drop can be closed; otherwise nothing is
/// written.
pub fn close_event(deps: DepsMut, env: Env, _info: MessageInfo) -> Result<Response, ContractError> {
    if !is_event_locked(deps.storage) {
        return Err(ContractError::EventNotLocked);
    }

    let event = active_event(deps.storage);
    let manifest_count = read_manifest(deps.storage).len() as u32;
    let sold_out = read_pool(deps.storage).is_empty();
    let now_ms = block_time_ms(&env);

    let entry = ArchiveEntry {
        id: format!("{}-{}", event.id, now_ms),
        timestamp: now_ms,
        name: event.name,
        partner: event.hero.partner,
        accent: event.accent,
        sold_out,
        capsule_total: event.inventory.total,
        manifest_count,
    };

    let mut archive = read_archive(deps.storage);
    archive.insert(0, entry.clone());
    write_archive(deps.storage, &archive)?;
    clear_pool(deps.storage);

    Ok(Response::new()
        .add_attribute("action", "close_event")
        .add_attribute("archive_id", entry.id.clone())
        .add_event(
            Event::new("capsule_event_closed")
                .add_attribute("archive_id", entry.id)
                .add_attribute("name", entry.name)
                .add_attribute("sold_out", entry.sold_out.to_string())
                .add_attribute("capsule_total", entry.capsule_total.to_string())
                .add_attribute("manifest_count", entry.manifest_count.to_string())
                .add_attribute("archive_size", archive.len().to_string()),
        ))
}

/// Wipe the visitor's win history.
pub fn clear_wins(deps: DepsMut, _env: Env, _info: MessageInfo) -> Result<Response, ContractError> {
    write_wins(deps.storage, &vec![])?;

    Ok(Response::new().add_attribute("action", "clear_wins"))
}

/// Update pull timings. Admin only.
pub fn update_config(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    params: UpdateConfigParams,
) -> Result<Response, ContractError> {
    let UpdateConfigParams {
        open_delay_ms,
        reveal_delay_ms,
    } = params;

    let mut config = CONFIG.load(deps.storage)?;

    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update config".to_string(),
        });
    }

    if let Some(delay) = open_delay_ms {
        config.open_delay_ms = delay;
    }
    if let Some(delay) = reveal_delay_ms {
        config.reveal_delay_ms = delay;
    }

    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_config")
        .add_attribute("open_delay_ms", config.open_delay_ms.to_string())
        .add_attribute("reveal_delay_ms", config.reveal_delay_ms.to_string()))
}

use cosmwasm_std::{entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult};
use cw2::{get_contract_version, set_contract_version};

use crate::error::ContractError;
use crate::execute;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg, UpdateConfigParams};
use crate::pull;
use crate::query;
use crate::state::{
    save_pull_session, Config, PullSession, CONFIG, DEFAULT_OPEN_DELAY_MS,
    DEFAULT_REVEAL_DELAY_MS,
};

const CONTRACT_NAME: &str = "crates.io:capsule-vault";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let config = Config {
        admin: info.sender.clone(),
        open_delay_ms: msg.open_delay_ms.unwrap_or(DEFAULT_OPEN_DELAY_MS),
        reveal_delay_ms: msg.reveal_delay_ms.unwrap_or(DEFAULT_REVEAL_DELAY_MS),
    };
    CONFIG.save(deps.storage, &config)?;
    save_pull_session(deps.storage, &PullSession::default())?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "capsule-vault")
        .add_attribute("admin", info.sender.to_string())
        .add_attribute("open_delay_ms", config.open_delay_ms.to_string())
        .add_attribute("reveal_delay_ms", config.reveal_delay_ms.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::SaveEvent { event } => execute::save_event(deps, env, info, event),
        ExecuteMsg::ResetEvent {} => execute::reset_event(deps, env, info),
        ExecuteMsg::SetLocked { locked } => execute::set_locked(deps, env, info, locked),
        ExecuteMsg::AddManifestItem {
            name,
            prize_type,
            rarity,
            note,
        } => execute::add_manifest_item(deps, env, info, name, prize_type, rarity, note),
        ExecuteMsg::UpdateManifestItem { item } => {
            execute::update_manifest_item(deps, env, info, item)
        }
        ExecuteMsg::RemoveManifestItem { id } => execute::remove_manifest_item(deps, env, info, id),
        ExecuteMsg::GeneratePool { total } => execute::generate(deps, env, info, total),
        ExecuteMsg::ClearPool {} => execute::clear(deps, env, info),
        ExecuteMsg::CloseEvent {} => execute::close_event(deps, env, info),
        ExecuteMsg::UpdateConfig {
            open_delay_ms,
            reveal_delay_ms,
        } => execute::update_config(
            deps,
            env,
            info,
            UpdateConfigParams {
                open_delay_ms,
                reveal_delay_ms,
            },
        ),
        ExecuteMsg::SetPullCount { count } => pull::set_pull_count(deps, env, info, count),
        ExecuteMsg::StartPull {} => pull::start_pull(deps, env, info),
        ExecuteMsg::CancelPull {} => pull::cancel_pull(deps, env, info),
        ExecuteMsg::ConfirmPull {} => pull::confirm_pull(deps, env, info),
        ExecuteMsg::AdvancePull {} => pull::advance_pull(deps, env, info),
        ExecuteMsg::PullAgain {} => pull::pull_again(deps, env, info),
        ExecuteMsg::ClearWins {} => execute::clear_wins(deps, env, info),
    }
}

#[entry_point]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::Event {} => query::query_event(deps),
        QueryMsg::Storefront {} => query::query_storefront(deps),
        QueryMsg::PoolSummary {} => query::query_pool_summary(deps),
        QueryMsg::PoolPlan { total } => query::query_pool_plan(total),
        QueryMsg::Manifest {} => query::query_manifest(deps),
        QueryMsg::Locked {} => query::query_locked(deps),
        QueryMsg::Wins {} => query::query_wins(deps),
        QueryMsg::Archive {} => query::query_archive(deps),
        QueryMsg::SponsorWall {} => query::query_sponsor_wall(),
        QueryMsg::PullSession {} => query::query_pull_session(deps),
    }
}

#[entry_point]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::Unauthorized {
            reason: "Cannot migrate from different contract type".to_string(),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}

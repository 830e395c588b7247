//! Pull flow: `ready → confirm → opening → result → ready`.
//!
//! The opening step carries two artificial delays taken from [`Config`]:
//! the pool is drawn once `open_delay_ms` has passed since confirmation,
//! and the result is revealed once `reveal_delay_ms` has passed since the
//! draw. Time only moves with the block clock, so the visitor (or a
//! front-end timer) calls `AdvancePull` to move the step along.
//!
//! [`Config`]: crate::state::Config

use capsule_drop_common::entropy::derive_seed;
use capsule_drop_common::pool::best_index;
use capsule_drop_common::types::{PoolItem, PrizeType, WinStatus};
use cosmwasm_std::{DepsMut, Env, Event, MessageInfo, Response, Timestamp};

use crate::error::ContractError;
use crate::execute::block_time_ms;
use crate::state::{
    active_event, load_pull_session, pop_from_pool, read_pool, read_wins, save_pull_session,
    write_wins, PullSession, PullStep, Win, CONFIG,
};

fn wrong_step(expected: &str, session: &PullSession) -> ContractError {
    ContractError::InvalidPullStep {
        expected: expected.to_string(),
        actual: session.step.name().to_string(),
    }
}

fn after_ms(start: Timestamp, delay_ms: u64) -> Timestamp {
    start.plus_nanos(delay_ms.saturating_mul(1_000_000))
}

fn to_ms(time: Timestamp) -> u64 {
    time.nanos() / 1_000_000
}

/// Capsules per pull within `[1, max_per_user]`. A cap of zero counts as one.
pub fn clamp_pull_count(count: u32, max_per_user: u32) -> u32 {
    count.clamp(1, max_per_user.max(1))
}

/// Pick the number of capsules for the next pull.
///
/// Clamped to `[1, maxPerUser]` of the active drop. The stored count is
/// clamped again on start and confirm against the cap in force then.
/// Nothing counts pulls across sessions.
pub fn set_pull_count(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    count: u32,
) -> Result<Response, ContractError> {
    let mut session = load_pull_session(deps.storage);
    if session.step != PullStep::Ready {
        return Err(wrong_step("ready", &session));
    }

    let max_per_user = active_event(deps.storage).pricing.max_per_user;
    session.count = clamp_pull_count(count, max_per_user);
    save_pull_session(deps.storage, &session)?;

    Ok(Response::new()
        .add_attribute("action", "set_pull_count")
        .add_attribute("requested", count.to_string())
        .add_attribute("count", session.count.to_string()))
}

/// ready → confirm
pub fn start_pull(deps: DepsMut, _env: Env, _info: MessageInfo) -> Result<Response, ContractError> {
    let mut session = load_pull_session(deps.storage);
    if session.step != PullStep::Ready {
        return Err(wrong_step("ready", &session));
    }
    if read_pool(deps.storage).is_empty() {
        return Err(ContractError::SoldOut);
    }

    session.step = PullStep::Confirm;
    session.count = clamp_pull_count(
        session.count,
        active_event(deps.storage).pricing.max_per_user,
    );
    session.sold_out = false;
    save_pull_session(deps.storage, &session)?;

    Ok(Response::new()
        .add_attribute("action", "start_pull")
        .add_attribute("count", session.count.to_string()))
}

/// confirm → ready
pub fn cancel_pull(deps: DepsMut, _env: Env, _info: MessageInfo) -> Result<Response, ContractError> {
    let mut session = load_pull_session(deps.storage);
    if session.step != PullStep::Confirm {
        return Err(wrong_step("confirm", &session));
    }

    session.step = PullStep::Ready;
    save_pull_session(deps.storage, &session)?;

    Ok(Response::new().add_attribute("action", "cancel_pull"))
}

/// confirm → opening. There is no way back out of opening.
pub fn confirm_pull(deps: DepsMut, env: Env, _info: MessageInfo) -> Result<Response, ContractError> {
    let mut session = load_pull_session(deps.storage);
    if session.step != PullStep::Confirm {
        return Err(wrong_step("confirm", &session));
    }
    if read_pool(deps.storage).is_empty() {
        return Err(ContractError::SoldOut);
    }

    let config = CONFIG.load(deps.storage)?;
    session.count = clamp_pull_count(
        session.count,
        active_event(deps.storage).pricing.max_per_user,
    );
    session.step = PullStep::Opening {
        started_at: env.block.time,
        drawn: vec![],
        drawn_at: None,
    };
    save_pull_session(deps.storage, &session)?;

    Ok(Response::new()
        .add_attribute("action", "confirm_pull")
        .add_attribute("count", session.count.to_string())
        .add_attribute(
            "draw_at_ms",
            to_ms(after_ms(env.block.time, config.open_delay_ms)).to_string(),
        ))
}

/// Move the opening step forward.
///
/// 1. Before the open delay has elapsed: `PullNotReady`.
/// 2. Draw `count` tickets. An empty pool (drained since confirmation)
///    sends the session back to ready, flagged sold out.
/// 3. Once the reveal delay has elapsed since the draw, record every drawn
///    ticket as a win and show the best one.
///
/// Steps 2 and 3 run in the same call when the reveal delay is already
/// satisfied.
pub fn advance_pull(deps: DepsMut, env: Env, _info: MessageInfo) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let mut session = load_pull_session(deps.storage);
    let now = env.block.time;

    let (started_at, drawn, drawn_at) = match session.step.clone() {
        PullStep::Opening {
            started_at,
            drawn,
            drawn_at,
        } => (started_at, drawn, drawn_at),
        _ => return Err(wrong_step("opening", &session)),
    };

    let mut response = Response::new().add_attribute("action", "advance_pull");

    let (drawn, drawn_at, drew_now) = match drawn_at {
        Some(drawn_at) => (drawn, drawn_at, false),
        None => {
            let draw_at = after_ms(started_at, config.open_delay_ms);
            if now < draw_at {
                return Err(ContractError::PullNotReady {
                    ready_at_ms: to_ms(draw_at),
                });
            }

            let draw = pop_from_pool(deps.storage, session.count)?;
            if draw.taken.is_empty() {
                session.step = PullStep::Ready;
                session.sold_out = true;
                save_pull_session(deps.storage, &session)?;

                return Ok(response.add_attribute("outcome", "sold_out").add_event(
                    Event::new("capsule_pull_sold_out")
                        .add_attribute("requested", session.count.to_string()),
                ));
            }

            session.sold_out = draw.remaining == 0;
            response = response.add_event(
                Event::new("capsule_pull_drawn")
                    .add_attribute("requested", session.count.to_string())
                    .add_attribute("taken", draw.taken.len().to_string())
                    .add_attribute("remaining", draw.remaining.to_string()),
            );
            (draw.taken, now, true)
        }
    };

    let reveal_at = after_ms(drawn_at, config.reveal_delay_ms);
    if now < reveal_at {
        if !drew_now {
            return Err(ContractError::PullNotReady {
                ready_at_ms: to_ms(reveal_at),
            });
        }
        session.step = PullStep::Opening {
            started_at,
            drawn,
            drawn_at: Some(drawn_at),
        };
        save_pull_session(deps.storage, &session)?;

        return Ok(response
            .add_attribute("outcome", "drawn")
            .add_attribute("reveal_at_ms", to_ms(reveal_at).to_string()));
    }

    reveal(deps, &env, session, drawn, response)
}

/// Record the drawn tickets as wins (newest first) and show the best one.
fn reveal(
    deps: DepsMut,
    env: &Env,
    mut session: PullSession,
    drawn: Vec<PoolItem>,
    response: Response,
) -> Result<Response, ContractError> {
    let event_name = active_event(deps.storage).name;
    let now_ms = block_time_ms(env);

    let new_wins: Vec<Win> = drawn
        .iter()
        .enumerate()
        .map(|(index, ticket)| {
            let prize_type = PrizeType::for_rarity(ticket.rarity);
            let id_seed = derive_seed(&[
                &env.block.time.nanos().to_be_bytes(),
                &env.block.height.to_be_bytes(),
                ticket.id.as_bytes(),
                &(index as u64).to_be_bytes(),
            ]);
            Win {
                id: hex::encode(&id_seed[..16]),
                timestamp: now_ms,
                rarity: ticket.rarity,
                title: ticket.title.clone(),
                subtitle: ticket.subtitle.clone(),
                event_name: event_name.clone(),
                prize_type,
                status: WinStatus::for_type(prize_type),
            }
        })
        .collect();

    let best = best_index(&drawn)
        .and_then(|index| new_wins.get(index))
        .cloned()
        .ok_or(ContractError::SoldOut)?;

    let mut wins = new_wins.clone();
    wins.extend(read_wins(deps.storage));
    write_wins(deps.storage, &wins)?;

    session.step = PullStep::Result {
        best: best.clone(),
        wins: new_wins.clone(),
    };
    save_pull_session(deps.storage, &session)?;

    Ok(response
        .add_attribute("outcome", "revealed")
        .add_attribute("best_rarity", best.rarity.as_str())
        .add_event(
            Event::new("capsule_pull_revealed")
                .add_attribute("event", event_name)
                .add_attribute("wins", new_wins.len().to_string())
                .add_attribute("best_id", best.id)
                .add_attribute("best_rarity", best.rarity.as_str())
                .add_attribute("best_title", best.title)
                .add_attribute("best_type", best.prize_type.as_str())
                .add_attribute("collection_size", wins.len().to_string()),
        ))
}

/// result → ready
pub fn pull_again(deps: DepsMut, _env: Env, _info: MessageInfo) -> Result<Response, ContractError> {
    let mut session = load_pull_session(deps.storage);
    if !matches!(session.step, PullStep::Result { .. }) {
        return Err(wrong_step("result", &session));
    }

    session.step = PullStep::Ready;
    session.sold_out = read_pool(deps.storage).is_empty();
    save_pull_session(deps.storage, &session)?;

    Ok(Response::new()
        .add_attribute("action", "pull_again")
        .add_attribute("sold_out", session.sold_out.to_string()))
}

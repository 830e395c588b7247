//! Integration tests for the capsule drop vault.
//!
//! Every scenario drives the contract through its `instantiate` / `execute`
//! / `query` entry points with `cosmwasm_std::testing` mocks, the way a
//! storefront and admin console would.
//!
//! Run:
//! ```bash
//! cargo test -p capsule-drop-integration-tests
//! ```

use capsule_drop_common::pool::PoolComposition;
use capsule_drop_common::types::{
    current_event, DropEvent, ManifestItem, PrizeType, Rarity, ShowcaseDrop, WinStatus,
};
use capsule_vault::contract::{execute, instantiate, query};
use capsule_vault::msg::{
    ExecuteMsg, InstantiateMsg, PoolSummaryResponse, PullSessionResponse, QueryMsg,
    StorefrontResponse, WinsResponse,
};
use capsule_vault::state::{ArchiveEntry, PullStep};
use capsule_vault::ContractError;
use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env, MockApi, MockQuerier};
use cosmwasm_std::{from_json, Decimal, Env, MemoryStorage, OwnedDeps, Response};
use serde::de::DeserializeOwned;

type Deps = OwnedDeps<MemoryStorage, MockApi, MockQuerier>;

// ─── Helpers ───

fn setup(open_delay_ms: Option<u64>, reveal_delay_ms: Option<u64>) -> Deps {
    let mut deps = mock_dependencies();
    let admin = deps.api.addr_make("admin");
    instantiate(
        deps.as_mut(),
        mock_env(),
        message_info(&admin, &[]),
        InstantiateMsg {
            open_delay_ms,
            reveal_delay_ms,
        },
    )
    .unwrap();
    deps
}

fn run(deps: &mut Deps, env: Env, msg: ExecuteMsg) -> Result<Response, ContractError> {
    let visitor = deps.api.addr_make("visitor");
    execute(deps.as_mut(), env, message_info(&visitor, &[]), msg)
}

fn ask<T: DeserializeOwned>(deps: &Deps, msg: QueryMsg) -> T {
    from_json(query(deps.as_ref(), mock_env(), msg).unwrap()).unwrap()
}

fn at_ms(offset_ms: u64) -> Env {
    let mut env = mock_env();
    env.block.time = env.block.time.plus_nanos(offset_ms * 1_000_000);
    env.block.height += offset_ms / 100 + 1;
    env
}

/// One complete pull with zero delays: start, confirm, open and reveal.
fn pull_once(deps: &mut Deps, env: Env) -> Response {
    run(deps, env.clone(), ExecuteMsg::StartPull {}).unwrap();
    run(deps, env.clone(), ExecuteMsg::ConfirmPull {}).unwrap();
    let res = run(deps, env.clone(), ExecuteMsg::AdvancePull {}).unwrap();
    run(deps, env, ExecuteMsg::PullAgain {}).unwrap();
    res
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_full_drop_lifecycle() {
    let mut deps = setup(Some(0), Some(0));

    // 1. Admin edits the drop and fills the prize manifest
    let mut event: DropEvent = current_event();
    event.name = "MIDNIGHT ARCADE DROP".to_string();
    event.hero.partner = "Arcade Co.".to_string();
    event.inventory.total = 60;
    event.inventory.remaining = 60;
    run(&mut deps, mock_env(), ExecuteMsg::SaveEvent { event }).unwrap();

    for (name, prize_type, rarity) in [
        ("Golden cabinet figure", PrizeType::Physical, Rarity::UltraRare),
        ("Joystick keychain", PrizeType::Physical, Rarity::Rare),
        ("Animated wallpaper", PrizeType::Digital, Rarity::Digital),
    ] {
        run(
            &mut deps,
            mock_env(),
            ExecuteMsg::AddManifestItem {
                name: name.to_string(),
                prize_type,
                rarity,
                note: None,
            },
        )
        .unwrap();
    }

    // 2. Generate the pool and lock the drop
    run(&mut deps, mock_env(), ExecuteMsg::GeneratePool { total: 60 }).unwrap();
    run(&mut deps, mock_env(), ExecuteMsg::SetLocked { locked: true }).unwrap();

    let summary: PoolSummaryResponse = ask(&deps, QueryMsg::PoolSummary {});
    assert_eq!(summary.remaining, 60);
    assert_eq!(
        summary.composition,
        PoolComposition {
            ultra_rare: 1,
            super_rare: 2,
            rare: 10,
            digital: 47,
        }
    );

    let storefront: StorefrontResponse = ask(&deps, QueryMsg::Storefront {});
    assert_eq!(storefront.event.name, "MIDNIGHT ARCADE DROP");
    assert_eq!(storefront.verified_label, "Vault Verified");
    assert_eq!(storefront.manifest_count, 3);
    assert!(!storefront.sold_out);

    // 3. A visitor pulls 20 at a time until the pool runs dry
    run(&mut deps, mock_env(), ExecuteMsg::SetPullCount { count: 20 }).unwrap();
    for round in 0..3u64 {
        pull_once(&mut deps, at_ms(round * 5_000));
    }

    let storefront: StorefrontResponse = ask(&deps, QueryMsg::Storefront {});
    assert!(storefront.sold_out);
    assert_eq!(storefront.pool_remaining, 0);

    let session: PullSessionResponse = ask(&deps, QueryMsg::PullSession {});
    assert_eq!(session.session.step, PullStep::Ready);
    assert!(session.session.sold_out);

    let err = run(&mut deps, at_ms(20_000), ExecuteMsg::StartPull {}).unwrap_err();
    assert!(matches!(err, ContractError::SoldOut));

    // 4. Every ticket became exactly one win
    let wins: WinsResponse = ask(&deps, QueryMsg::Wins {});
    assert_eq!(wins.total, 60);
    assert_eq!(wins.physical, 13);
    assert_eq!(wins.digital, 47);
    let ultra = wins
        .wins
        .iter()
        .filter(|w| w.rarity == Rarity::UltraRare)
        .count();
    assert_eq!(ultra, 1);
    assert!(wins
        .wins
        .iter()
        .all(|w| w.event_name == "MIDNIGHT ARCADE DROP"));

    let mut ids: Vec<&str> = wins.wins.iter().map(|w| w.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 60);

    // 5. Close the drop into the archive
    run(&mut deps, at_ms(30_000), ExecuteMsg::CloseEvent {}).unwrap();
    let archive: Vec<ArchiveEntry> = ask(&deps, QueryMsg::Archive {});
    assert_eq!(archive.len(), 1);
    assert_eq!(archive[0].name, "MIDNIGHT ARCADE DROP");
    assert_eq!(archive[0].partner, "Arcade Co.");
    assert_eq!(archive[0].capsule_total, 60);
    assert_eq!(archive[0].manifest_count, 3);
    assert!(archive[0].sold_out);
}

#[test]
fn test_newest_wins_first_and_best_shown() {
    let mut deps = setup(Some(0), Some(0));
    run(&mut deps, mock_env(), ExecuteMsg::GeneratePool { total: 30 }).unwrap();

    let res = pull_once(&mut deps, at_ms(0));
    let first_best = res
        .attributes
        .iter()
        .find(|a| a.key == "best_rarity")
        .map(|a| a.value.clone())
        .unwrap();
    let after_first: WinsResponse = ask(&deps, QueryMsg::Wins {});
    assert_eq!(after_first.total, 1);
    assert_eq!(after_first.wins[0].rarity.as_str(), first_best);

    run(&mut deps, at_ms(1_000), ExecuteMsg::SetPullCount { count: 5 }).unwrap();
    run(&mut deps, at_ms(1_000), ExecuteMsg::StartPull {}).unwrap();
    run(&mut deps, at_ms(1_000), ExecuteMsg::ConfirmPull {}).unwrap();
    run(&mut deps, at_ms(1_000), ExecuteMsg::AdvancePull {}).unwrap();

    let session: PullSessionResponse = ask(&deps, QueryMsg::PullSession {});
    let (best, batch) = match session.session.step {
        PullStep::Result { best, wins } => (best, wins),
        other => panic!("expected result step, got {other:?}"),
    };
    assert_eq!(batch.len(), 5);
    assert!(batch.iter().all(|w| w.rarity.rank() <= best.rarity.rank()));
    let first_top = batch
        .iter()
        .find(|w| w.rarity == best.rarity)
        .unwrap();
    assert_eq!(first_top.id, best.id);

    let wins: WinsResponse = ask(&deps, QueryMsg::Wins {});
    assert_eq!(wins.total, 6);
    assert_eq!(wins.wins[..5], batch[..]);
    assert_eq!(wins.wins[5], after_first.wins[0]);

    for win in &wins.wins {
        match win.prize_type {
            PrizeType::Physical => assert_eq!(win.status, WinStatus::Reserved),
            PrizeType::Digital => assert_eq!(win.status, WinStatus::Delivered),
        }
    }
}

#[test]
fn test_opening_respects_block_time() {
    let mut deps = setup(None, None);
    run(&mut deps, mock_env(), ExecuteMsg::GeneratePool { total: 24 }).unwrap();
    run(&mut deps, at_ms(0), ExecuteMsg::StartPull {}).unwrap();
    run(&mut deps, at_ms(0), ExecuteMsg::ConfirmPull {}).unwrap();

    let err = run(&mut deps, at_ms(500), ExecuteMsg::AdvancePull {}).unwrap_err();
    match err {
        ContractError::PullNotReady { ready_at_ms } => {
            assert_eq!(ready_at_ms, mock_env().block.time.nanos() / 1_000_000 + 850)
        }
        other => panic!("unexpected error {other:?}"),
    }

    let res = run(&mut deps, at_ms(900), ExecuteMsg::AdvancePull {}).unwrap();
    assert!(res
        .attributes
        .iter()
        .any(|a| a.key == "outcome" && a.value == "drawn"));

    let summary: PoolSummaryResponse = ask(&deps, QueryMsg::PoolSummary {});
    assert_eq!(summary.remaining, 23);

    let err = run(&mut deps, at_ms(2_000), ExecuteMsg::AdvancePull {}).unwrap_err();
    assert!(matches!(err, ContractError::PullNotReady { .. }));

    let res = run(&mut deps, at_ms(2_300), ExecuteMsg::AdvancePull {}).unwrap();
    assert!(res
        .attributes
        .iter()
        .any(|a| a.key == "outcome" && a.value == "revealed"));
    let wins: WinsResponse = ask(&deps, QueryMsg::Wins {});
    assert_eq!(wins.total, 1);
}

#[test]
fn test_lock_gates_admin_edits_only() {
    let mut deps = setup(Some(0), Some(0));
    run(
        &mut deps,
        mock_env(),
        ExecuteMsg::AddManifestItem {
            name: "Mini figure".to_string(),
            prize_type: PrizeType::Physical,
            rarity: Rarity::SuperRare,
            note: Some("random colour".to_string()),
        },
    )
    .unwrap();
    run(&mut deps, mock_env(), ExecuteMsg::SetLocked { locked: true }).unwrap();
    assert!(ask::<bool>(&deps, QueryMsg::Locked {}));

    let mut item: ManifestItem = ask::<Vec<ManifestItem>>(&deps, QueryMsg::Manifest {})
        .pop()
        .unwrap();
    item.name = "Renamed".to_string();
    let err = run(
        &mut deps,
        mock_env(),
        ExecuteMsg::UpdateManifestItem { item: item.clone() },
    )
    .unwrap_err();
    assert!(matches!(err, ContractError::EventLocked));

    // Pulls and pool maintenance carry on while locked
    run(&mut deps, mock_env(), ExecuteMsg::GeneratePool { total: 30 }).unwrap();
    pull_once(&mut deps, at_ms(0));

    run(&mut deps, mock_env(), ExecuteMsg::SetLocked { locked: false }).unwrap();
    run(&mut deps, mock_env(), ExecuteMsg::UpdateManifestItem { item }).unwrap();
    let manifest: Vec<ManifestItem> = ask(&deps, QueryMsg::Manifest {});
    assert_eq!(manifest[0].name, "Renamed");

    let err = run(&mut deps, mock_env(), ExecuteMsg::CloseEvent {}).unwrap_err();
    assert!(matches!(err, ContractError::EventNotLocked));
}

#[test]
fn test_persisted_json_shapes() {
    let mut deps = setup(Some(0), Some(0));
    run(&mut deps, mock_env(), ExecuteMsg::GeneratePool { total: 30 }).unwrap();
    pull_once(&mut deps, at_ms(0));
    run(&mut deps, mock_env(), ExecuteMsg::SetLocked { locked: true }).unwrap();
    run(&mut deps, at_ms(100), ExecuteMsg::CloseEvent {}).unwrap();

    let wins: serde_json::Value = ask(&deps, QueryMsg::Wins {});
    let win = &wins["wins"][0];
    for key in ["id", "ts", "rarity", "title", "subtitle", "event", "type", "status"] {
        assert!(win.get(key).is_some(), "win is missing {key}");
    }
    assert_eq!(win["event"], "PASTEL GODDESS DROP");

    let archive: serde_json::Value = ask(&deps, QueryMsg::Archive {});
    let entry = &archive[0];
    for key in [
        "id",
        "ts",
        "name",
        "partner",
        "accent",
        "soldOut",
        "capsuleTotal",
        "manifestCount",
    ] {
        assert!(entry.get(key).is_some(), "archive entry is missing {key}");
    }
    assert_eq!(entry["capsuleTotal"], 500);

    let event: serde_json::Value = ask(&deps, QueryMsg::Event {});
    assert_eq!(event["hero"]["titleTop"], "ANIME VAULT CAPSULE");
    assert_eq!(event["pricing"]["maxPerUser"], 20);
}

#[test]
fn test_storefront_catalogue_queries() {
    let deps = setup(None, None);

    let wall: Vec<ShowcaseDrop> = ask(&deps, QueryMsg::SponsorWall {});
    assert_eq!(wall.len(), 6);

    let plan: PoolComposition = ask(&deps, QueryMsg::PoolPlan { total: 500 });
    assert_eq!(plan.total(), 500);
    assert_eq!(plan.count(Rarity::UltraRare), 3);

    let plan: PoolComposition = ask(&deps, QueryMsg::PoolPlan { total: -5 });
    assert_eq!(plan.total(), 13);

    let quote: PullSessionResponse = ask(&deps, QueryMsg::PullSession {});
    assert_eq!(quote.price, Decimal::permille(4_990));
    assert_eq!(quote.total_price, quote.price);
    assert_eq!(quote.pool_remaining, 0);
}

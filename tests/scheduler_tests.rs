mod common;

use common::*;
use std::time::Duration;
use sugar_pool_cache::{RefreshScheduler, TransportMode};
use tokio_test::assert_ok;

fn seeded() -> MockConnector {
    let connector = MockConnector::default();
    connector.state.set_pools("8453", vec![pool(
        "8453", "0x0000000000000000000000000000000000000a01", USDC, WETH, 1.0,
    )]);
    connector.state.set_pools("10", vec![pool(
        "10", "0x0000000000000000000000000000000000000b01", USDC, WETH, 1.0,
    )]);
    connector
}

#[tokio::test(start_paused = true)]
async fn start_is_idempotent_across_schedulers() {
    let connector = seeded();
    let gateway = gateway(&connector, &["8453", "10"]);
    let scheduler = RefreshScheduler::new(gateway.clone());

    assert!(assert_ok!(scheduler.start().await));
    assert!(!assert_ok!(scheduler.start().await));
    assert!(!assert_ok!(RefreshScheduler::new(gateway.clone()).start().await));
    assert_eq!(scheduler.running_loops().await, 2);
    assert!(gateway.refresh_started());

    scheduler.stop().await;
    assert_eq!(scheduler.running_loops().await, 0);
}

#[tokio::test(start_paused = true)]
async fn stopped_scheduler_can_start_again() {
    let connector = seeded();
    let gateway = gateway(&connector, &["8453"]);
    let scheduler = RefreshScheduler::new(gateway.clone());

    assert!(assert_ok!(scheduler.start().await));
    scheduler.stop().await;
    assert!(!gateway.refresh_started());

    assert!(assert_ok!(scheduler.start().await));
    assert_eq!(scheduler.running_loops().await, 1);
    scheduler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn stopping_an_idle_scheduler_leaves_loops_running() {
    let connector = seeded();
    let gateway = gateway(&connector, &["8453"]);
    let owner = RefreshScheduler::new(gateway.clone());
    let idle = RefreshScheduler::new(gateway.clone());

    assert!(assert_ok!(owner.start().await));
    assert!(!assert_ok!(idle.start().await));
    idle.stop().await;
    assert!(gateway.refresh_started());
    assert_eq!(owner.running_loops().await, 1);
    assert!(!assert_ok!(idle.start().await));

    owner.stop().await;
}

#[tokio::test(start_paused = true)]
async fn hanging_chain_does_not_block_others() {
    let connector = seeded();
    connector.state.set_hanging("10");
    let gateway = gateway(&connector, &["8453", "10"]);
    let scheduler = RefreshScheduler::new(gateway.clone());
    assert_ok!(scheduler.start().await);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(gateway.store("8453").unwrap().current().await.unwrap().len(), 1);
    assert!(gateway.store("10").unwrap().current().await.is_none());

    // Past the 5s call timeout the hung fetch is counted as a failure.
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(gateway.store("10").unwrap().consecutive_failures(), 1);
    assert_eq!(gateway.store("8453").unwrap().consecutive_failures(), 0);

    scheduler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn refreshes_again_after_interval() {
    let connector = seeded();
    let gateway = gateway(&connector, &["8453"]);
    let scheduler = RefreshScheduler::new(gateway.clone());
    assert_ok!(scheduler.start().await);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(connector.state.fetches("8453"), 1);
    let first = gateway.store("8453").unwrap().current().await.unwrap();

    tokio::time::sleep(gateway.config().refresh_interval()).await;
    assert_eq!(connector.state.fetches("8453"), 2);
    let second = gateway.store("8453").unwrap().current().await.unwrap();
    assert!(second.fetched_at > first.fetched_at);

    scheduler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn failed_tick_is_retried_next_interval() {
    let connector = seeded();
    connector.state.set_failing("8453", true);
    let gateway = gateway(&connector, &["8453"]);
    let scheduler = RefreshScheduler::new(gateway.clone());
    assert_ok!(scheduler.start().await);

    tokio::time::sleep(Duration::from_secs(1)).await;
    let store = gateway.store("8453").unwrap();
    assert!(store.current().await.is_none());
    assert_eq!(store.consecutive_failures(), 1);

    connector.state.set_failing("8453", false);
    tokio::time::sleep(gateway.config().refresh_interval()).await;
    assert!(store.current().await.is_some());
    assert_eq!(store.consecutive_failures(), 0);

    scheduler.stop().await;
}

#[tokio::test]
async fn single_shot_mode_cannot_start() {
    let connector = seeded();
    let gateway = gateway_in_mode(&connector, &["8453"], TransportMode::SingleShot);
    let scheduler = RefreshScheduler::new(gateway.clone());

    assert!(scheduler.start().await.is_err());
    assert!(!gateway.refresh_started());
    assert_eq!(scheduler.running_loops().await, 0);
}

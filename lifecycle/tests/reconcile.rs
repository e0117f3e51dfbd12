mod common;

use common::*;

#[tokio::test]
async fn valid_identities_stay() {
    let h = harness();
    h.enroll_alice().await;

    let report = h.engine.driver.reconcile_all().await.unwrap();

    assert_eq!(report.checked, 1);
    assert_eq!(report.valid, 1);
    assert!(h.failures.is_empty());
}

#[tokio::test]
async fn lapsed_credential_is_removed_on_fourth_pass() {
    let h = harness();
    h.enroll_alice().await;
    h.stars.set_rejected("alice", "profile link removed");
    let driver = &h.engine.driver;

    let first = driver.reconcile_all().await.unwrap();
    assert_eq!(first.failed, 1);
    assert_eq!(h.failures.get_string("failure-ghstar-alice.example").as_deref(), Some("1"));

    let second = driver.reconcile_all().await.unwrap();
    assert_eq!(second.warned, 1);
    assert_eq!(h.warnings(), 1);

    driver.reconcile_all().await.unwrap();
    let fourth = driver.reconcile_all().await.unwrap();
    assert_eq!(fourth.removed, 1);
    assert_eq!(h.warnings(), 1);
    assert_eq!(h.removal_notices(), 1);

    assert!(h.records.is_empty());
    assert!(h.failures.is_empty());
    assert_eq!(h.memberships_of(ALICE_DID), 0);

    let after = driver.reconcile_all().await.unwrap();
    assert_eq!(after.checked, 0);
}

#[tokio::test]
async fn recovery_resets_the_count() {
    let h = harness();
    h.enroll_alice().await;
    let driver = &h.engine.driver;

    h.stars.set_unreachable("alice");
    driver.reconcile_all().await.unwrap();
    assert!(!h.failures.is_empty());

    h.stars.set_verified("alice");
    driver.reconcile_all().await.unwrap();
    assert!(h.failures.is_empty());
}

#[tokio::test]
async fn timeout_counts_as_failure() {
    let h = harness_with(short_timeout());
    h.enroll_alice().await;
    h.stars.set_delay(Some(std::time::Duration::from_secs(5)));

    let report = h.engine.driver.reconcile_all().await.unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(h.failures.get_string("failure-ghstar-alice.example").as_deref(), Some("1"));
}

#[tokio::test]
async fn session_keys_are_not_reconciled() {
    let h = harness();
    h.enroll_alice().await;
    badge_store::KvStore::put(h.records.as_ref(), "accessJwt", b"token").unwrap();
    badge_store::KvStore::put(h.records.as_ref(), "endpoint", b"https://pds.example").unwrap();

    let report = h.engine.driver.reconcile_all().await.unwrap();
    assert_eq!(report.checked, 1);
}

#[tokio::test]
async fn reconcile_handle_only_checks_that_handle() {
    let h = harness();
    h.enroll_alice().await;
    h.mvp.set_verified("77");
    h.engine
        .enrollment
        .enroll(&key("mvp"), "77", &handle("bob.example"))
        .await
        .unwrap();

    let report = h.engine.driver.reconcile_handle(&handle("bob.example")).await.unwrap();
    assert_eq!(report.checked, 1);
}

#[tokio::test]
async fn status_reports_without_writing() {
    let h = harness();
    h.enroll_alice().await;
    h.engine
        .enrollment
        .enroll(&key("mvp"), "5003", &alice())
        .await
        .unwrap();
    h.engine
        .tracker
        .record_result(&alice(), &key("mvp"), 1)
        .await
        .unwrap();
    h.mvp.set_rejected("5003", "not an MVP anymore");

    let status = h.engine.driver.status(&alice()).await.unwrap();

    assert_eq!(status.bsky_handle, "alice.example");
    let stars = &status.module_results["ghstar"];
    assert!(stars.is_valid);
    assert_eq!(stars.failure_count, 0);
    let mvp = &status.module_results["mvp"];
    assert!(!mvp.is_valid);
    assert_eq!(mvp.failure_count, 1);
    assert_eq!(h.failures.get_string("failure-mvp-alice.example").as_deref(), Some("1"));
}

#[tokio::test]
async fn status_of_unknown_handle_is_empty() {
    let h = harness();
    let status = h.engine.driver.status(&handle("nobody.example")).await.unwrap();
    assert!(status.module_results.is_empty());
}

async fn enroll_alice_twice(h: &Harness) {
    h.enroll_alice().await;
    h.stars.set_verified("alice2");
    h.engine
        .enrollment
        .enroll(&key("ghstar"), "alice2", &alice())
        .await
        .unwrap();
}

#[tokio::test]
async fn two_ids_for_one_module_count_once_per_pass() {
    let h = harness();
    enroll_alice_twice(&h).await;
    h.stars.set_rejected("alice", "profile link removed");
    h.stars.set_rejected("alice2", "profile link removed");
    let driver = &h.engine.driver;

    let first = driver.reconcile_all().await.unwrap();
    assert_eq!(first.checked, 1);
    assert_eq!(first.warned, 0);
    assert_eq!(h.failures.get_string("failure-ghstar-alice.example").as_deref(), Some("1"));

    let second = driver.reconcile_all().await.unwrap();
    assert_eq!(second.warned, 1);
    assert_eq!(second.removed, 0);

    driver.reconcile_all().await.unwrap();
    assert!(!h.records.is_empty());

    let fourth = driver.reconcile_all().await.unwrap();
    assert_eq!(fourth.removed, 1);
    assert!(h.records.is_empty());
    assert_eq!(h.removal_notices(), 1);
    assert_eq!(h.memberships_of(ALICE_DID), 0);
}

#[tokio::test]
async fn one_valid_id_keeps_the_pair_valid() {
    let h = harness();
    enroll_alice_twice(&h).await;
    h.stars.set_rejected("alice2", "profile link removed");

    let report = h.engine.driver.reconcile_all().await.unwrap();

    assert_eq!(report.checked, 1);
    assert_eq!(report.valid, 1);
    assert!(h.failures.is_empty());
    let status = h.engine.driver.status(&alice()).await.unwrap();
    assert!(status.module_results["ghstar"].is_valid);
}

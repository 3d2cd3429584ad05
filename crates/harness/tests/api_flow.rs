//! API flow tests against the in-process booking fixture

use flowcheck_common::{Credentials, Error};
use flowcheck_fixture::FixtureServer;
use flowcheck_harness::{ApiFlow, BookingClient};

async fn fixture_client() -> (FixtureServer, BookingClient) {
    let server = FixtureServer::spawn().await.expect("fixture spawns");
    let client = BookingClient::new(server.base_url()).expect("client builds");
    client.wait_until_ready(50).await.expect("fixture healthy");
    (server, client)
}

#[tokio::test]
async fn valid_credentials_yield_a_non_empty_token() {
    let (_server, client) = fixture_client().await;

    let token = client
        .authenticate(&Credentials::default())
        .await
        .expect("auth succeeds");
    assert!(!token.as_str().is_empty());
}

#[tokio::test]
async fn bad_credentials_map_to_auth_failed() {
    let (_server, client) = fixture_client().await;

    let err = client
        .authenticate(&Credentials::new("admin", "wrong"))
        .await
        .expect_err("auth must fail");
    assert!(matches!(err, Error::AuthFailed(reason) if reason == "Bad credentials"));
}

#[tokio::test]
async fn every_collection_id_resolves_to_a_record() {
    let (_server, client) = fixture_client().await;

    let ids = client.booking_ids().await.expect("collection fetch");
    assert!(!ids.is_empty());
    for entry in ids {
        client
            .booking(entry.bookingid)
            .await
            .unwrap_or_else(|e| panic!("booking {} should resolve: {e}", entry.bookingid));
    }
}

#[tokio::test]
async fn the_default_api_flow_passes() {
    let (_server, client) = fixture_client().await;

    let steps = ApiFlow::default().run(&client).await.expect("flow runs");
    assert_eq!(steps.len(), 6);
    assert!(steps.iter().all(|s| s.success), "steps: {steps:?}");

    // The mutation stuck
    let booking = client.booking(10).await.unwrap();
    assert_eq!(booking.lastname, "HolyOne");
}

#[tokio::test]
async fn applying_the_same_last_name_twice_is_idempotent() {
    let (_server, client) = fixture_client().await;
    let token = client.authenticate(&Credentials::default()).await.unwrap();

    let mut booking = client.booking(10).await.unwrap();
    booking.lastname = "HolyOne".to_string();

    client.update_booking(10, &booking, &token).await.unwrap();
    let after_once = client.booking(10).await.unwrap();

    client.update_booking(10, &booking, &token).await.unwrap();
    let after_twice = client.booking(10).await.unwrap();

    assert_eq!(after_once, after_twice);
}

#[tokio::test]
async fn update_without_a_token_is_refused_and_does_not_mutate() {
    let (_server, client) = fixture_client().await;

    let before = client.booking(10).await.unwrap();
    let mut changed = before.clone();
    changed.lastname = "Intruder".to_string();

    let response = reqwest::Client::new()
        .put(format!("{}/booking/10", client.base_url()))
        .json(&changed)
        .send()
        .await
        .expect("request sends");
    assert_eq!(response.status().as_u16(), 403);

    assert_eq!(client.booking(10).await.unwrap(), before);
}

#[tokio::test]
async fn delete_removes_the_record() {
    let (_server, client) = fixture_client().await;
    let token = client.authenticate(&Credentials::default()).await.unwrap();

    client.delete_booking(1, &token).await.expect("delete succeeds");

    let err = client.booking(1).await.expect_err("record is gone");
    assert!(matches!(err, Error::UnexpectedStatus { status: 404, .. }));
}

#[tokio::test]
async fn a_missing_target_aborts_the_flow_at_the_collection_check() {
    let (_server, client) = fixture_client().await;

    let flow = ApiFlow {
        booking_id: 999,
        ..Default::default()
    };
    let steps = flow.run(&client).await.expect("flow runs");

    let last = steps.last().expect("at least one step");
    assert!(!last.success);
    assert_eq!(last.step_name, "collection-contains-target");
    // Nothing past the failed assertion ran
    assert_eq!(steps.len(), 3);
}

//! SIGHUP invalidation. Kept in its own binary since it signals the
//! whole test process.

#![cfg(unix)]

mod common;

use common::{config_for, start_gateway, start_mock_whois, RECORD};
use std::time::Duration;
use whois_blob_gateway::lifecycle::signals::invalidate_on_hangup;

#[tokio::test]
async fn test_sighup_clears_cache() {
    let whois = start_mock_whois(RECORD).await;
    let gateway = start_gateway(config_for(&whois)).await;
    tokio::spawn(invalidate_on_hangup(gateway.cache.clone()).unwrap());

    let client = reqwest::Client::new();
    let res = client
        .get(gateway.url("/"))
        .header("x-frontend-ip", "192.0.2.1")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(gateway.cache.len(), 1);

    let status = std::process::Command::new("kill")
        .args(["-HUP", &std::process::id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());

    tokio::time::timeout(Duration::from_secs(5), async {
        while !gateway.cache.is_empty() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("cache was not cleared after SIGHUP");

    client
        .get(gateway.url("/"))
        .header("x-frontend-ip", "192.0.2.1")
        .send()
        .await
        .unwrap();
    assert_eq!(whois.queries(), 2);

    gateway.shutdown.trigger();
}

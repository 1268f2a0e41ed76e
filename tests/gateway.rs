//! End-to-end forwarding through the proxy.

use std::collections::HashMap;
use std::sync::Arc;

use liveproxy::config::ProbeConfig;
use liveproxy::health::Prober;
use liveproxy::lifecycle::admit_backends;
use liveproxy::load_balancer::{Balancer, SmoothWeighted};

mod common;

fn fast_probe() -> ProbeConfig {
    ProbeConfig {
        rounds: 2,
        requests_per_round: 3,
        timeout_ms: 500,
    }
}

#[tokio::test]
async fn test_forwarding_is_transparent() {
    let backend = common::spawn_echo_backend().await;
    let balancer = Arc::new(SmoothWeighted::new());
    balancer.add(&format!("http://{}", backend), 1).unwrap();
    let (proxy, shutdown) = common::spawn_proxy(balancer).await;

    let res = common::client()
        .put(format!("http://{}/items/42?verbose=true", proxy))
        .header("x-custom", "kept")
        .body("hello")
        .send()
        .await
        .expect("Proxy unreachable");

    assert_eq!(res.status(), 201);
    assert_eq!(res.headers()["x-backend"], "echo");
    assert_eq!(res.headers()["x-seen-custom"], "kept");
    assert_eq!(res.text().await.unwrap(), "PUT /items/42?verbose=true|hello");

    shutdown.trigger();
}

#[tokio::test]
async fn test_large_body_is_relayed() {
    let backend = common::spawn_counting_backend().await;
    let balancer = Arc::new(SmoothWeighted::new());
    balancer.add(&format!("http://{}", backend), 1).unwrap();
    let (proxy, shutdown) = common::spawn_proxy(balancer).await;

    let payload = vec![b'x'; 8 * 1024 * 1024];
    let res = common::client()
        .post(format!("http://{}/upload", proxy))
        .body(payload)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), (8 * 1024 * 1024).to_string());

    shutdown.trigger();
}

#[tokio::test]
async fn test_empty_pool_is_unavailable() {
    let (proxy, shutdown) = common::spawn_proxy(Arc::new(SmoothWeighted::new())).await;

    let res = common::client()
        .get(format!("http://{}/", proxy))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 503);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"]["type"], "dispatch_unavailable");

    shutdown.trigger();
}

#[tokio::test]
async fn test_dead_backend_yields_bad_gateway() {
    let dead = common::refused_addr().await;
    let balancer = Arc::new(SmoothWeighted::new());
    balancer.add(&format!("http://{}", dead), 1).unwrap();
    let (proxy, shutdown) = common::spawn_proxy(balancer).await;

    let res = common::client()
        .get(format!("http://{}/x", proxy))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 502);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"]["type"], "forwarding_failure");

    shutdown.trigger();
}

#[tokio::test]
async fn test_weighted_distribution_after_admission() {
    let a = common::spawn_named_backend("a").await;
    let b = common::spawn_named_backend("b").await;
    let c = common::spawn_named_backend("c").await;
    let dead = common::refused_addr().await;

    let tokens = vec![
        format!("1:http:127.0.0.1:{}", a.port()),
        format!("2:http:127.0.0.1:{}", b.port()),
        format!("1:http:127.0.0.1:{}", c.port()),
        format!("50:http:127.0.0.1:{}", dead.port()),
        "not-a-backend".to_string(),
    ];

    let balancer = Arc::new(SmoothWeighted::new());
    let prober = Prober::from_config(&fast_probe()).unwrap();
    let admitted = admit_backends(&tokens, &prober, &fast_probe(), balancer.as_ref()).await;

    assert_eq!(admitted, 3);
    assert!(!balancer
        .ids()
        .contains(&format!("http://127.0.0.1:{}", dead.port())));

    let (proxy, shutdown) = common::spawn_proxy(balancer).await;
    let client = common::client();
    let url = format!("http://{}/", proxy);

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let client = client.clone();
            let url = url.clone();
            tokio::spawn(async move {
                let mut seen = Vec::with_capacity(500);
                for _ in 0..500 {
                    let res = client.get(&url).send().await.unwrap();
                    seen.push(res.text().await.unwrap());
                }
                seen
            })
        })
        .collect();

    let mut counts: HashMap<String, usize> = HashMap::new();
    for task in tasks {
        for name in task.await.unwrap() {
            *counts.entry(name).or_default() += 1;
        }
    }

    assert_eq!(counts.values().sum::<usize>(), 4000);
    for (name, expected) in [("a", 1000usize), ("b", 2000), ("c", 1000)] {
        let got = counts.get(name).copied().unwrap_or(0);
        assert!(got.abs_diff(expected) <= 40, "{}: {} (expected ~{})", name, got, expected);
    }

    shutdown.trigger();
}

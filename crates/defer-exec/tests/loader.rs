use std::sync::Arc;
use std::time::Duration;

use defer_core::Settlement;
use defer_exec::prelude::*;
use defer_model::Locator;

const LODASH: &str = "https://cdnjs.cloudflare.com/ajax/libs/lodash.js/3.2.0/lodash.js";
const BROKEN: &str = "https://cdnjs.cloudflare.com/ajax/libs/lodash.js/3.2./lodash.js";

fn document() -> SimulatedDocument {
    SimulatedDocument::new()
        .with_latency(Duration::from_millis(40))
        .route(LODASH, SimulatedOutcome::Load { size: 50_000 })
}

#[tokio::test(start_paused = true)]
async fn successful_load_carries_the_locator() {
    let doc = document();
    let resource = load_script(&doc, LODASH).await.unwrap();

    assert_eq!(resource.src, Locator::from(LODASH));
    assert_eq!(resource.size, Some(50_000));
}

#[tokio::test(start_paused = true)]
async fn failed_load_mentions_the_locator() {
    let doc = document();
    let err = load_script(&doc, BROKEN).await.unwrap_err();

    assert!(err.message().contains(BROKEN));
}

#[tokio::test(start_paused = true)]
async fn each_call_attaches_again() {
    let doc = document();
    let src = Locator::from(LODASH);

    load_script(&doc, src.clone()).await.unwrap();
    load_script(&doc, src.clone()).await.unwrap();

    assert_eq!(doc.attach_count(&src), 2);
}

#[tokio::test(start_paused = true)]
async fn callback_api_reports_errors() {
    let doc = document();
    let (tx, rx) = tokio::sync::oneshot::channel();

    load_script_with(&doc, BROKEN, move |outcome| {
        let _ = tx.send(outcome);
    });

    let err = rx.await.unwrap().unwrap_err();
    assert_eq!(err.message(), format!("failed to load script {BROKEN}"));
}

#[tokio::test(start_paused = true)]
async fn chain_loads_in_order() {
    let other = "https://cdn.example.org/app.js";
    let doc = Arc::new(document().route(other, SimulatedOutcome::Load { size: 10 }));

    let loaded = load_chain(Arc::clone(&doc), [Locator::from(LODASH), Locator::from(other)])
        .await
        .unwrap();

    let srcs: Vec<_> = loaded.iter().map(|r| r.src.as_str()).collect();
    assert_eq!(srcs, vec![LODASH, other]);
}

#[tokio::test(start_paused = true)]
async fn chain_stops_at_first_failure() {
    let doc = Arc::new(document());
    let chain = load_chain(
        Arc::clone(&doc),
        [Locator::from(BROKEN), Locator::from(LODASH)],
    );

    let err = chain.clone().await.unwrap_err();
    assert!(err.message().contains(BROKEN));
    assert_eq!(chain.state(), Settlement::Rejected);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(doc.attach_count(&Locator::from(LODASH)), 0);
}

#[tokio::test(start_paused = true)]
async fn chain_waits_for_previous_load() {
    let doc = Arc::new(document());
    let chain = load_chain(Arc::clone(&doc), [Locator::from(LODASH), Locator::from(LODASH)]);

    assert_eq!(doc.attached().len(), 1);
    chain.await.unwrap();
    assert_eq!(doc.attached().len(), 2);
}

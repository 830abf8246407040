//! Money App - Client Host Entry Point
//!
//! Wires the pieces of the client together: Firebase service handles, the
//! route table, the offline worker (installed and activated against the
//! app origin), and the push worker draining its own message channel.
//! Views are rendered elsewhere; this host owns lifecycle and plumbing.

use std::sync::Arc;

use anyhow::Context;
use money_common::{init_logging, LogConfig};
use money_firebase::{FirebaseApp, FirebaseConfig};
use money_net::HttpFetcher;
use money_push::{LogSink, PushWorker};
use money_router::{MemorySessionStore, Router};
use money_sw::OfflineWorker;
use tokio::sync::mpsc;
use tracing::{debug, info};
use url::Url;

/// Push payloads buffered while the worker is busy.
const PUSH_CHANNEL_CAPACITY: usize = 16;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging(LogConfig::default());

    let firebase = FirebaseApp::initialize(FirebaseConfig::default())?;
    debug!(
        firestore = firebase.firestore().documents_root(),
        messaging = firebase.messaging().send_endpoint(),
        analytics = ?firebase.analytics().map(|a| a.measurement_id().to_string()),
        "Firebase handles ready"
    );

    let origin = std::env::var("MONEY_APP_ORIGIN")
        .unwrap_or_else(|_| format!("https://{}", firebase.config().auth_domain));
    let origin = Url::parse(&origin).context("invalid MONEY_APP_ORIGIN")?;

    let fetcher = Arc::new(HttpFetcher::new()?);
    let offline_worker = Arc::new(OfflineWorker::new(origin.clone(), fetcher));
    offline_worker.install().await?;
    offline_worker.activate().await?;

    let router = Router::new();
    let session = MemorySessionStore::new();
    // A fresh tab has no session flag, so the guard lands on login.
    let landing = router.navigate("/", &session)?;
    debug!(?landing, "Initial navigation");

    let (push_tx, push_rx) = mpsc::channel(PUSH_CHANNEL_CAPACITY);
    let push_worker = PushWorker::new(Arc::new(LogSink));
    let push_task = tokio::spawn(async move { push_worker.run(push_rx).await });

    info!(origin = %origin, "Money App client ready");
    tokio::signal::ctrl_c().await?;
    info!("Shutting down");

    drop(push_tx);
    push_task.await?;
    offline_worker.retire().await?;
    Ok(())
}

//! Board node binary
//!
//! Serves the reading-progress leaderboard engine over HTTP, backed by
//! the in-process store.

use bookwyrm_board::{api, Authorizer, BoardConfig, StaticIdentity};
use bookwyrm_rank::sample_roster;
use bookwyrm_store::{DocumentStore, MemoryStore};
use bookwyrm_sync::Session;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> bookwyrm_board::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "board_node=info,bookwyrm=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Board Node");

    let config = BoardConfig::from_env();
    let store = Arc::new(MemoryStore::new());

    if let Some(email) = &config.admin_email {
        store
            .set_document(&config.admins_collection, email, serde_json::json!({}))
            .await?;
        tracing::info!(%email, "admin allowlisted");
    }

    if config.seed_sample_data {
        for participant in sample_roster() {
            store
                .add_document(&config.sync.participants_collection, participant.to_value())
                .await?;
        }
        tracing::info!("seeded the sample roster");
    }

    let session = Arc::new(Session::open(
        store.clone() as Arc<dyn DocumentStore>,
        config.sync.clone(),
    ));
    let authorizer = Authorizer::new(store, config.admins_collection.clone());

    // Headless nodes carry no ambient sign-in; callers authenticate
    // per-request through the email header.
    let app = api::build_router(session, authorizer, Arc::new(StaticIdentity::anonymous()));

    let listener = tokio::net::TcpListener::bind(config.api_addr).await?;
    tracing::info!("HTTP server listening on {}", config.api_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

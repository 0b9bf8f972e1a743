//! Facility assistant - conversational help desk for a waste management site
//!
//! Answers route requests over the facility grid, keeps per-session dialogue
//! context, and falls back to rule, FAQ and generative collaborators.

mod api;
mod collaborators;
mod db;
mod llm;
mod navigation;
mod runtime;
mod state_machine;

use api::{create_router, AppState};
use axum::http::{header, HeaderValue, Method};
use collaborators::{FaqTable, KnowledgeBase, ResponderChain};
use db::Database;
use llm::LlmConfig;
use navigation::Facility;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "facility_assistant=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let db_path = std::env::var("FACILITY_DB_PATH").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
        format!("{home}/.facility-assistant/assistant.db")
    });

    let port: u16 = std::env::var("FACILITY_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5001);

    let allowed_origin = std::env::var("FACILITY_ALLOWED_ORIGIN")
        .unwrap_or_else(|_| "http://localhost:3000".to_string());

    // Facility map
    let facility = match std::env::var("FACILITY_MAP_PATH") {
        Ok(path) => {
            tracing::info!(path = %path, "Loading facility map");
            Facility::load(&path)?
        }
        Err(_) => Facility::sample()?,
    };
    tracing::info!(
        rows = facility.grid().rows(),
        cols = facility.grid().cols(),
        waypoints = facility.waypoints().len(),
        "Facility map ready"
    );
    let facility = Arc::new(facility);

    // Collaborators
    let faq = match std::env::var("FACILITY_FAQ_PATH") {
        Ok(path) => FaqTable::load_or_empty(&path)?,
        Err(_) => FaqTable::default(),
    };
    if faq.is_empty() {
        tracing::info!("FAQ table is empty");
    } else {
        tracing::info!(entries = faq.len(), "FAQ table loaded");
    }

    let llm_config = LlmConfig::from_env();
    let llm = llm_config.build();
    match &llm {
        Some(service) => tracing::info!(model = %service.model_id(), "Generative collaborator enabled"),
        None => tracing::warn!("No LLM configured. Set ANTHROPIC_API_KEY or LLM_GATEWAY."),
    }

    let responders = ResponderChain::standard(
        facility.clone(),
        Arc::new(KnowledgeBase::standard()),
        faq,
        llm,
    );
    tracing::info!(order = ?responders.names(), "Collaborator chain ready");

    // Ensure database directory exists
    if let Some(parent) = PathBuf::from(&db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!(path = %db_path, "Opening database");
    let db = Database::open(&db_path)?;

    let state = AppState::new(facility, db, Arc::new(responders));

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .layer(compression),
    );

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Facility assistant listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

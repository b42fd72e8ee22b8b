use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use clap::Parser;
use parliament_rag_core::{
    ingest_records, load_config, EntityQueryService, InMemoryVectorStore, MongoRecordSource,
    OllamaClient,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "parliament-rag-server", version)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(long, env = "PARLIAMENT_RAG_CONFIG", default_value = "config.yaml")]
    config: PathBuf,

    /// Address the server binds once ingestion has completed.
    #[arg(long, env = "PARLIAMENT_RAG_BIND", default_value = "0.0.0.0:8000")]
    bind: String,
}

struct AppState {
    service: EntityQueryService<OllamaClient, OllamaClient>,
    loaded_chunks: usize,
    started_at: DateTime<Utc>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();

    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        "parliament-rag-server boot"
    );

    let config = load_config(&cli.config)?;

    let embedder = OllamaClient::new(&config.model.model_url, config.model.model_name.clone())?;
    let generator = embedder.clone();
    let source = MongoRecordSource::new(
        config.database.connection_string.clone(),
        config.database.db_name.clone(),
        config.database.collection_name.clone(),
        config.database.field_names.clone(),
    );

    // Startup barrier: the listener is not bound until the index is fully
    // built, so no query can ever observe a partially ingested store. An
    // ingestion failure exits here instead of serving from a broken index.
    let mut store = InMemoryVectorStore::new(embedder);
    let report = ingest_records(&source, &mut store, config.chunking).await?;
    info!(
        loaded_chunks = report.chunk_ids.len(),
        record_count = report.record_count,
        completed_at = %report.completed_at.to_rfc3339(),
        "index built"
    );

    let state = Arc::new(AppState {
        loaded_chunks: report.chunk_ids.len(),
        service: EntityQueryService::new(Arc::new(store), generator)
            .with_top_k(config.retrieval.top_k),
        started_at: Utc::now(),
    });

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/query_parliamentary_data/:entity", get(query_entity))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = TcpListener::bind(&cli.bind).await?;
    info!(bind = %cli.bind, "accepting queries");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Hello World" }))
}

/// Readiness signal for supervising processes: reachable only after the
/// startup ingestion has completed.
async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ready",
        "loaded_chunks": state.loaded_chunks,
        "started_at": state.started_at.to_rfc3339(),
    }))
}

async fn query_entity(
    State(state): State<Arc<AppState>>,
    Path(entity): Path<String>,
) -> impl IntoResponse {
    match state.service.answer(&entity).await {
        Ok(answer) => (
            StatusCode::OK,
            Json(json!({ "entity_response": answer.entity_summary_answer })),
        ),
        Err(err) => {
            error!(entity = %entity, error = %err, "entity query failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": err.to_string() })),
            )
        }
    }
}

mod error;
mod handlers;
mod ingest;
mod mapview;
mod retrieval;
mod store;
mod translate;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use clap::Parser;
use serde_json::json;
use std::sync::atomic::AtomicBool;
use std::{env, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::retrieval::MetadataCatalog;
use crate::store::ProfileStore;
use crate::translate::{OllamaTranslator, QueryTranslator};

/// Schema sheet the translator sees with every request. Kept in lockstep
/// with the columns written by `ProfileStore::replace_profiles`.
const DB_SCHEMA_METADATA: &str = "\
SQL Table: argo_data
Columns:
- latitude (REAL): Float position latitude.
- longitude (REAL): Float position longitude.
- time (TEXT): Profile time (YYYY-MM-DD HH:MM:SS).
- depth (REAL): Pressure in dbar (approximates depth).
- temperature (REAL): Seawater temperature.
- salinity (REAL): Seawater salinity.
- chla (REAL): Chlorophyll-a concentration.";

#[derive(Parser, Debug, Clone)]
#[command(name = "floatchat-backend")]
#[command(about = "FloatChat backend server")]
struct Args {
    /// Path to the SQLite database file
    #[arg(long, default_value = "argo_data.db")]
    database: String,

    /// Path to frontend dist directory to serve
    #[arg(long, default_value = "frontend/dist")]
    frontend_dist: String,

    /// Ollama model used for query translation
    #[arg(long, default_value = "phi3")]
    model: String,
}

pub struct AppState {
    pub store: ProfileStore,
    pub translator: Arc<dyn QueryTranslator>,
    pub catalog: MetadataCatalog,
    pub data_loaded: AtomicBool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Open the profile store
    let store = ProfileStore::open(&args.database).await?;
    let data_loaded = store.has_data().await?;
    if data_loaded {
        tracing::info!("Existing profile data found in {}", args.database);
    }

    // Seed the retrieval catalog with the table schema
    let mut catalog = MetadataCatalog::new();
    catalog.add_metadata(DB_SCHEMA_METADATA, "DB_SCHEMA");

    // Connect the query translator
    let translator = OllamaTranslator::from_env(args.model.clone());
    if translator.health_check().await {
        tracing::info!("Ollama is reachable, model '{}' will be used", args.model);
    } else {
        tracing::warn!("Ollama is not reachable; chat queries will fail until it is up");
    }

    // Create app state
    let app_state = Arc::new(AppState {
        store,
        translator: Arc::new(translator),
        catalog,
        data_loaded: AtomicBool::new(data_loaded),
    });

    // Setup CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build our application with routes
    let mut app = Router::new()
        // Health check / root
        .route(
            "/",
            get(|| async { Json(json!({"message": "FloatChat API is running."})) }),
        )
        // Chat and ingestion API routes
        .route(
            shared::CHATBOT_RESPONSE_PATH,
            post(handlers::chat::chatbot_response),
        )
        .route(shared::UPLOAD_DATA_PATH, post(handlers::upload::upload_data))
        // Add single unified state
        .with_state(app_state.clone());

    // Serve frontend static files if path exists
    if std::path::Path::new(&args.frontend_dist).exists() {
        tracing::info!("Serving frontend from: {}", args.frontend_dist);
        app = app.nest_service("/app", ServeDir::new(&args.frontend_dist));
    } else {
        tracing::warn!("Frontend dist not found at: {}", args.frontend_dist);
    }

    // Add CORS, request tracing, and an upload-sized body limit
    let app = app
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(handlers::upload::MAX_UPLOAD_SIZE));

    // Run the server
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "8000".to_string());
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

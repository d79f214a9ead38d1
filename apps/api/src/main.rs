use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use shared_config::{AppConfig, StorageBackend};
use shared_database::{seed_directory, ClinicStore, InMemoryClinicStore, SupabaseClinicStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting clinic assistant API server");

    let config = Arc::new(AppConfig::from_env());
    let store = open_store(&config);

    if config.seed_on_start {
        let today = chrono::Local::now().date_naive();
        let report = seed_directory(store.as_ref(), today)
            .await
            .context("seeding the doctor directory")?;
        info!(
            "Seed complete: {} doctors, {} patients added",
            report.doctors_added, report.patients_added
        );
    }

    let app = router::create_router(config.clone(), store)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    axum::serve(listener, app).await.context("serving HTTP")?;

    Ok(())
}

fn open_store(config: &AppConfig) -> Arc<dyn ClinicStore> {
    match config.storage_backend {
        StorageBackend::Supabase => {
            info!("Using Supabase storage at {}", config.supabase_url);
            Arc::new(SupabaseClinicStore::new(config))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on restart");
            Arc::new(InMemoryClinicStore::new())
        }
    }
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

//! callsim - simulated restaurant phone calls
//!
//! Serves a single simulated call over HTTP: an automated receptionist
//! answers caller messages using an editable business profile.

mod api;
mod config;
mod dialogue;
mod profile;
mod session;

use api::{create_router, AppState};
use config::AppConfig;
use dialogue::Receptionist;
use profile::{BusinessProfile, ProfileStore};
use session::{CallController, SequentialIds};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "callsim=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = AppConfig::from_env();

    let profile = match &config.profile_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading business profile");
            BusinessProfile::load(path)?
        }
        None => {
            tracing::info!("No CALLSIM_PROFILE set, using sample profile");
            BusinessProfile::sample()
        }
    };

    // One id generator for the life of the process
    let ids = Arc::new(SequentialIds::new());
    let controller = CallController::new(Arc::new(Receptionist::new()), ids, Arc::new(profile.clone()));
    let state = AppState::new(controller, ProfileStore::new(profile));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = config.socket_addr();
    tracing::info!("callsim listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

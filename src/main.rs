use std::sync::Arc;

use tactical_board_backend::analysis::Analyzer;
use tactical_board_backend::api::{self, AppState};
use tactical_board_backend::coach::CoachClient;
use tactical_board_backend::config::Config;
use tactical_board_backend::hub::BoardHub;
use tactical_board_backend::metrics;
use tactical_board_backend::persona::Persona;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = Config::load();
    metrics::register_metrics();

    let persona = Persona::load_or_default(config.persona_file.as_deref());
    let coach = CoachClient::from_config(&config);
    if !coach.is_enabled() {
        tracing::warn!("OPENROUTER_KEY not set; coach commentary uses local fallback text");
    }
    tracing::info!(coach = %persona.name, club = %persona.club, "persona loaded");

    let state = AppState {
        hub: BoardHub::new(),
        analyzer: Arc::new(Analyzer::new(persona, coach)),
    };
    let app = api::router(state, config.static_dir.as_deref());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!("tactical board backend listening on port {}", config.port);
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}

use std::sync::Arc;

use breakeven_planner::config::AppConfig;
use breakeven_planner::http::{app_routes, AppState};
use breakeven_planner::llm::create_provider;
use breakeven_planner::store::MemorySessionStore;
use breakeven_planner::suggest::SuggestionEngine;
use breakeven_planner::view::JsonRenderer;
use breakeven_planner::wizard::WizardMachine;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("  export OPENAI_API_KEY=sk-...");
            std::process::exit(1);
        }
    };

    eprintln!("📈 Breakeven Planner v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.model);
    eprintln!("   Wizard: http://0.0.0.0:{}/", config.port);
    if config.access_code.is_some() {
        eprintln!("   Access gate: enabled");
    }
    eprintln!();

    let llm = create_provider(&config)?;
    let engine = Arc::new(SuggestionEngine::new(llm, &config));
    let machine = Arc::new(WizardMachine::new(engine));
    let store = Arc::new(MemorySessionStore::new());

    let port = config.port;
    let state = AppState {
        store,
        machine,
        renderer: Arc::new(JsonRenderer),
        config: Arc::new(config),
    };

    let app = app_routes(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    tracing::info!(port, "Wizard server started");
    axum::serve(listener, app).await?;

    Ok(())
}

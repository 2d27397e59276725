use std::sync::Arc;
use std::time::Duration;

use nutrition_ai::config::ProxyConfig;
use nutrition_ai::llm::create_provider;
use nutrition_ai::nutrition::NutritionAi;
use nutrition_ai::onboarding::OnboardingManager;
use nutrition_ai::server;

/// How often idle onboarding sessions are swept.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

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

    let config = ProxyConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export AI_GATEWAY_API_KEY=...");
        std::process::exit(1);
    });

    eprintln!("🥗 Nutrition AI v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.model);
    eprintln!("   Gateway: {}", config.gateway_url);
    eprintln!("   Proxy: http://0.0.0.0:{}/nutrition-ai", config.port);
    eprintln!("   Onboarding: http://0.0.0.0:{}/api/onboarding/sessions\n", config.port);

    let llm = create_provider(&config)?;
    let ai = Arc::new(NutritionAi::new(llm));
    let manager = Arc::new(
        OnboardingManager::new(config.scan_duration)
            .with_session_ttl(config.session_ttl)
            .with_max_sessions(config.max_sessions),
    );
    let sweeper = manager.spawn_sweeper(SWEEP_INTERVAL);
    let app = server::app(ai, manager);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, "Nutrition AI server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    tracing::info!("Nutrition AI server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

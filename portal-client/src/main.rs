use dotenvy::dotenv;
use portal_client::config::get_configuration;
use portal_client::services::{
    AuthService, ConsorcioApi, Credentials, FinanceApi, current_period,
};
use portal_client::startup::build_client;
use portal_core::observability::init_tracing;
use secrecy::Secret;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "portal-client",
        &configuration.telemetry.log_level,
        configuration.telemetry.otlp_endpoint.as_deref(),
    )?;

    let client = build_client(&configuration)?;

    // Stands in for the UI's navigation to the login screen
    let mut events = client.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if event.requires_login() {
                tracing::warn!(?event, "Session ended, login required");
            } else {
                info!(?event, "Session event");
            }
        }
    });

    let auth = AuthService::new(client.clone());
    if !auth.is_authenticated() {
        let credentials = credentials_from_env()?;
        let user = auth.login(&credentials).await.map_err(|e| {
            tracing::error!(code = e.code().map(|c| c.as_str()), error = %e, "Login failed");
            anyhow::anyhow!("Login failed: {}", e)
        })?;
        info!(user = %user.display_name(), "Signed in");
    }

    let consorcios = ConsorcioApi::new(client.clone());
    let buildings = consorcios.my_consorcios().await?;
    info!(count = buildings.len(), "Fetched consorcios");

    let Some(first) = buildings.first() else {
        info!("No consorcios available for this user");
        return Ok(());
    };
    if consorcios.active().is_none() {
        consorcios.select(first);
    }

    let overview = FinanceApi::new(client).overview(&current_period()).await?;
    info!(
        consorcio = %overview.summary.consorcio_name,
        period = %overview.period,
        collected = %overview.summary.collected,
        total = %overview.summary.total,
        pending = %overview.summary.pending,
        health_percent = overview.summary.health_percent,
        recent = overview.recent_activity.len(),
        "Finance overview"
    );

    Ok(())
}

fn credentials_from_env() -> anyhow::Result<Credentials> {
    let email = std::env::var("PORTAL_EMAIL")
        .map_err(|_| anyhow::anyhow!("PORTAL_EMAIL must be set when no session is stored"))?;
    let password = std::env::var("PORTAL_PASSWORD")
        .map_err(|_| anyhow::anyhow!("PORTAL_PASSWORD must be set when no session is stored"))?;

    Ok(Credentials {
        email,
        password: Secret::new(password),
    })
}

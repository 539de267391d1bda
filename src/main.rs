use anyhow::Context;
use rollcall::{AppState, app, config::Config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let app_state = AppState::new(&config);
    let app = app(app_state);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("couldn't bind {}", config.addr))?;
    tracing::info!(
        addr = %config.addr,
        poll_timeout = ?config.poll_timeout,
        roll_off_delay = ?config.roll_off_delay,
        embeds = config.embedly_key.is_some(),
        "serving"
    );
    axum::serve(listener, app).await?;
    Ok(())
}

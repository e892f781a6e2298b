use tracing_subscriber::EnvFilter;
use vidgate_api::setup;
use vidgate_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let state = setup::build_state(config.clone()).await?;
    let router = setup::routes::build_router(state)?;

    setup::server::start_server(&config, router).await?;

    Ok(())
}

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use wayside::config::Config;
use wayside::engine::{spawn_sweeper, Engine};
use wayside::error::Error;
use wayside::external::google_maps::GoogleMaps;
use wayside::server::serve;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let engine = Arc::new(Engine::new(GoogleMaps::new(&config), config.map));

    spawn_sweeper(engine.clone(), config.session_ttl);

    serve(engine, config.listen_addr).await
}

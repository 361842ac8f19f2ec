use mediaserve::assets::AssetBundle;
use mediaserve::config::Config;
use mediaserve::server::{signal, Server};
use mediaserve::{handler, logger};

/// Config file used when no path is given on the command line
const DEFAULT_CONFIG: &str = "config";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg.logging)?;

    // Create the Tokio runtime with the configured number of worker threads
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(cfg.server.workers)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let assets = AssetBundle::from_config(cfg.assets.dir.as_deref());
    let metadata = cfg.assets.metadata.clone();

    let mut server = Server::new(cfg);
    handler::register_media_routes(&mut server, &assets, &metadata)?;
    let handle = server.start()?;

    signal::wait_for_shutdown().await?;
    handle.shutdown().await;
    Ok(())
}

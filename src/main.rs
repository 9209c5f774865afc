use std::sync::Arc;
use tokio::net::TcpListener;

use servus::config::{AppState, Config};
use servus::logger;
use servus::server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load_from("config")?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    // Fails fast on a missing document root or a bad rule pattern
    let state = Arc::new(AppState::new(cfg)?);

    logger::init(&state.config);
    let listener = TcpListener::bind(addr).await?;
    logger::log_server_start(&addr, &state.config);

    server::run(listener, state).await
}

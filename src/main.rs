mod adapters;
mod app;
mod cli;
mod core;
mod global_constants;
mod ports;
mod utils;


use global_constants::{APPLICATION_NAME, LOG_TAG_MAIN};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("{} Starting {}", LOG_TAG_MAIN, APPLICATION_NAME);

    let cli = cli::parse();
    let app = app::RelayApp::build(&cli).await?;

    app.run().await
}

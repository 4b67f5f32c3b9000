#[tokio::main]
async fn main() -> anyhow::Result<()> {
    jobwatch_app::init_tracing();
    tracing::info!("Starting jobwatch {}", env!("CARGO_PKG_VERSION"));
    jobwatch_app::run().await
}

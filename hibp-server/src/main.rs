use clap::Parser;
use hibp_server::Args;
use hibp_verifier::Engine;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_filter())),
        )
        .init();

    let engine = Engine::open(args.engine_config())
        .map_err(|e| std::io::Error::other(format!("failed to open database: {e}")))?;
    let _reload_worker = engine.spawn_reload_worker();

    hibp_server::serve(args.bind, engine).await
}

use anyhow::Result;
use axum::Router;
use clap::Parser;
use linkrank::RankConfig;
use std::net::SocketAddr;
use tracing_subscriber::{fmt, EnvFilter};
use server::build_app;
use tokio::net::TcpListener;

#[derive(Parser)]
struct Args {
    /// Page records: a .json/.jsonl file or a directory of them
    #[arg(long, default_value = "./pages")]
    pages: String,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Probability of following a link instead of jumping to a random page
    #[arg(long, default_value_t = 0.85)]
    decay: f64,
    /// Stop ranking once no score changes by more than this
    #[arg(long, default_value_t = 1e-4)]
    epsilon: f64,
    /// Maximum number of ranking iterations
    #[arg(long, default_value_t = 100)]
    limit: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let config = RankConfig { decay: args.decay, epsilon: args.epsilon, limit: args.limit };
    let app: Router = build_app(args.pages.clone(), config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, pages = %args.pages, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

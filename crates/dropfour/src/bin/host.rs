//! The `dropfour-host` binary: one process, one match, two seats.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dropfour::prelude::*;

/// Authoritative Connect Four host.
#[derive(Parser, Debug)]
#[command(name = "dropfour-host", version, about)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:8080")]
    bind: String,

    /// Board height
    #[arg(long, default_value = "6")]
    rows: usize,

    /// Board width
    #[arg(long, default_value = "7")]
    columns: usize,

    /// Accepted join token; pass twice, one per player. Seats go in
    /// connection order, whichever token arrives first. Defaults to
    /// player1/player2.
    #[arg(long = "token")]
    tokens: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), HostError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let tokens = if args.tokens.is_empty() {
        vec!["player1".to_string(), "player2".to_string()]
    } else {
        args.tokens
    };

    let server = HostServerBuilder::new()
        .bind(&args.bind)
        .match_config(MatchConfig {
            rows: args.rows,
            columns: args.columns,
        })
        .build(StaticTokenAuth::new(tokens))
        .await?;

    tracing::info!(addr = %server.local_addr()?, "dropfour host listening");
    server.run().await
}

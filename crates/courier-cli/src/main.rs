use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::AsyncWriteExt;
use tracing::Span;
use tracing_subscriber::EnvFilter;

use courier_client::{CancellationToken, FetcherBuilder, Response};
use courier_core::{FetcherConfig, parse_header};

#[derive(Parser)]
#[command(name = "courier", version, about = "Configurable HTTP fetcher")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a URL with a single GET request and stream the body to stdout
    Fetch {
        /// Target URL
        url: String,

        /// Extra request header, e.g. -H 'Accept: text/html' (repeatable)
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// User-Agent to send (overrides COURIER_USER_AGENT)
        #[arg(short = 'A', long)]
        user_agent: Option<String>,

        /// Client timeout in seconds (overrides COURIER_TIMEOUT_SECS)
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Print the status line and response headers to stderr
        #[arg(short, long, default_value_t = false)]
        include: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("courier=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            url,
            headers,
            user_agent,
            timeout,
            include,
        } => {
            let base = FetcherConfig::from_env()?;
            let config = merge_config(base, &headers, user_agent, timeout)?;
            cmd_fetch(&url, &config, include).await?;
        }
    }

    Ok(())
}

/// Layer command-line flags over the environment configuration.
fn merge_config(
    mut config: FetcherConfig,
    headers: &[String],
    user_agent: Option<String>,
    timeout: Option<u64>,
) -> Result<FetcherConfig> {
    if let Some(user_agent) = user_agent {
        config.user_agent = Some(user_agent);
    }

    if let Some(secs) = timeout {
        anyhow::ensure!(secs > 0, "--timeout must be at least 1 second");
        config.timeout = Some(Duration::from_secs(secs));
    }

    for raw in headers {
        config.headers.push(parse_header(raw)?);
    }

    Ok(config)
}

async fn cmd_fetch(url: &str, config: &FetcherConfig, include: bool) -> Result<()> {
    let fetcher = FetcherBuilder::from_config(&Span::current(), config)?.build();

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling request");
            trigger.cancel();
        }
    });

    tracing::info!("Fetching {}", url);

    let response = fetcher
        .fetch(&cancel, url)
        .await
        .with_context(|| format!("Failed to fetch {url}"))?;

    if include {
        print_head(&response);
    }

    let bytes = stream_body(response, &cancel).await?;
    tracing::info!("Received {} bytes", bytes);

    Ok(())
}

fn print_head(response: &Response) {
    eprintln!("{:?} {}", response.version(), response.status());
    for (name, value) in response.headers() {
        eprintln!("{}: {}", name, value.to_str().unwrap_or("<binary>"));
    }
    eprintln!();
}

/// Copy the response body to stdout chunk by chunk. Returns the byte count.
async fn stream_body(mut response: Response, cancel: &CancellationToken) -> Result<usize> {
    let mut stdout = tokio::io::stdout();
    let mut total = 0;

    loop {
        let chunk = tokio::select! {
            () = cancel.cancelled() => anyhow::bail!("Cancelled while reading response body"),
            chunk = response.chunk() => chunk.context("Failed to read response body")?,
        };

        let Some(chunk) = chunk else {
            break;
        };
        stdout.write_all(&chunk).await?;
        total += chunk.len();
    }

    stdout.flush().await?;
    Ok(total)
}

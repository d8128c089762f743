//! `skiff` binary: parse the CLI, build the service state, and serve the
//! API until ctrl-c.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;
use owo_colors::OwoColorize;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use skiff_daemon::http_server;
use skiff_daemon::{ServiceConfig, ServiceState};

/// Share one directory over HTTP: browse, upload, download, rename, delete.
#[derive(Parser, Debug)]
#[command(name = "skiff", version, about)]
struct Cli {
    /// Directory to serve (default: current directory)
    #[arg(value_parser = valid_directory, default_value = ".")]
    directory: PathBuf,

    /// Host/interface to bind
    #[arg(short = 'H', long, env = "SKIFF_HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to run the server on
    #[arg(short, long, env = "SKIFF_PORT", default_value_t = 8000)]
    port: u16,

    /// Require this token in the `x-access-token` header on every API call
    #[arg(short, long, env = "SKIFF_TOKEN")]
    token: Option<String>,

    /// Allow delete operations
    #[arg(short = 'd', long, default_value_t = false)]
    allow_delete: bool,

    /// Largest accepted request body, in bytes
    #[arg(long, env = "SKIFF_MAX_UPLOAD_BYTES", default_value_t = 2 * 1024 * 1024 * 1024)]
    max_upload_bytes: usize,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "SKIFF_LOG", default_value = "info")]
    log_level: tracing::Level,
}

impl Cli {
    fn config(&self) -> ServiceConfig {
        ServiceConfig {
            root: self.directory.clone(),
            api_listen_addr: SocketAddr::new(self.host, self.port),
            token: self.token.clone(),
            allow_delete: self.allow_delete,
            max_upload_bytes: self.max_upload_bytes,
            log_level: self.log_level,
        }
    }
}

/// Resolve and vet the served directory while errors can still surface as
/// CLI usage errors.
fn valid_directory(raw: &str) -> Result<PathBuf, String> {
    let path = std::fs::canonicalize(raw)
        .map_err(|e| format!("'{raw}' is not a valid directory: {e}"))?;
    if !path.is_dir() {
        return Err(format!("'{raw}' is not a directory"));
    }
    Ok(path)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.config();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string())),
        )
        .with_writer(std::io::stderr)
        .init();

    let state = ServiceState::from_config(&config).await?;
    let listener = TcpListener::bind(config.api_listen_addr).await?;
    let bound = listener.local_addr()?;

    print_banner(&config, bound);

    http_server::serve(listener, state).await?;
    Ok(())
}

fn print_banner(config: &ServiceConfig, bound: SocketAddr) {
    let info = skiff_daemon::build_info();
    let reach_host = if config.api_listen_addr.ip().is_unspecified() {
        lan_ip().unwrap_or_else(|| bound.ip())
    } else {
        bound.ip()
    };

    println!("{} {}", "skiff".bold(), info);
    println!(
        "  {} {}",
        "serving:".dimmed(),
        config.root.display()
    );
    println!("  {} {}", "bind:".dimmed(), bound);
    println!(
        "  {} http://{}:{}/api/v0/tree",
        "browse:".dimmed(),
        reach_host,
        bound.port()
    );
    if config.allow_delete {
        println!("  {} {}", "delete:".dimmed(), "enabled".yellow());
    }
    if config.token.is_some() {
        println!("  {} {}", "token:".dimmed(), "required".green());
    }
}

/// Best-effort LAN address, found by the routing table via a connected UDP
/// socket; no packet is sent.
fn lan_ip() -> Option<IpAddr> {
    let socket = std::net::UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    socket.local_addr().ok().map(|addr| addr.ip())
}

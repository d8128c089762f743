use std::net::SocketAddr;
use std::path::PathBuf;

/// Runtime configuration for the daemon, assembled by the CLI.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory served to clients.
    pub root: PathBuf,
    /// Address the API server binds.
    pub api_listen_addr: SocketAddr,
    /// Shared secret clients must present in the `x-access-token` header.
    /// `None` leaves the API open.
    pub token: Option<String>,
    /// Whether delete endpoints are honored.
    pub allow_delete: bool,
    /// Upper bound on a request body, in bytes. Uploads larger than this
    /// are rejected by the transport before a handler runs.
    pub max_upload_bytes: usize,
    pub log_level: tracing::Level,
}

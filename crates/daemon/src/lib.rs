// Service modules (daemon functionality)
pub mod http_server;
pub mod service_config;
pub mod service_state;

// Re-exports for consumers (CLI, tests)
pub use service_config::Config as ServiceConfig;
pub use service_state::State as ServiceState;

/// Build info stamped with the daemon's own compile environment.
///
/// `common::version::BuildInfo::new()` would report common's package
/// version, not the daemon's, so the daemon assembles its own.
pub fn build_info() -> common::version::BuildInfo {
    common::build_info!()
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// Build metadata baked in at compile time.
///
/// `BUILD_TIMESTAMP` and `BUILD_PROFILE` are emitted by `build.rs`; the
/// version comes from the package manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildInfo {
    pub version: String,
    pub build_timestamp: String,
    pub build_profile: String,
}

impl BuildInfo {
    /// Build info as seen from this crate's own compile environment.
    ///
    /// Binary crates usually want [`crate::build_info!`] instead, which
    /// captures the calling crate's version and build script output.
    pub fn new() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            build_timestamp: option_env!("BUILD_TIMESTAMP").unwrap_or("unknown").to_string(),
            build_profile: option_env!("BUILD_PROFILE").unwrap_or("unknown").to_string(),
        }
    }
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, built {})",
            self.version, self.build_profile, self.build_timestamp
        )
    }
}

/// Capture [`BuildInfo`] from the calling crate's compile-time environment.
#[macro_export]
macro_rules! build_info {
    () => {
        $crate::version::BuildInfo {
            version: env!("CARGO_PKG_VERSION").to_string(),
            build_timestamp: option_env!("BUILD_TIMESTAMP")
                .unwrap_or("unknown")
                .to_string(),
            build_profile: option_env!("BUILD_PROFILE").unwrap_or("unknown").to_string(),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macro_reads_caller_environment() {
        let info = crate::build_info!();
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_display_includes_version() {
        let info = BuildInfo::new();
        assert!(info.to_string().contains(&info.version));
    }
}

// Core tree service modules
pub mod error;
pub mod jail;
pub mod node;
pub mod share;
pub mod version;

// Re-exports for consumers (daemon, tests)
pub use error::TreeError;
pub use jail::Jail;
pub use node::{Node, NodeId, NodeRegistry};
pub use share::{Content, Entry, Listing, Share};

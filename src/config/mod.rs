//! Configuration loading and validation
//!
//! All settings come from a single TOML file read once at startup. The
//! resulting [`Config`] is immutable and passed explicitly into every
//! component; nothing reads the environment after launch.

mod parser;
mod types;
mod validation;

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use types::{Config, CrawlerConfig, ServerConfig, StorageConfig, UserAgentConfig};
pub use validation::validate;

//! Configuration file loading.
//!
//! Projects configure the analyzer through a JSON file named `.embedqlrc`,
//! `.embedqlrc.json`, or `embedql.config.json`, discovered by walking up the
//! directory tree from the file being analyzed.

mod config;
mod error;
mod loader;

pub use config::{CacheConfig, EmbedqlConfig};
pub use error::{ConfigError, Result};
pub use loader::{find_config, load_config, load_config_from_str};

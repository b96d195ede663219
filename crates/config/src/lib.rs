//! Configuration loading and schema for the lumen browser shell.
//!
//! Config files: `lumen.toml`, `lumen.yaml`, or `lumen.json`
//! Searched in `./` then `~/.config/lumen/`.
//!
//! Supports `${ENV_VAR}` and `${ENV_VAR:-default}` substitution in config
//! text before parsing. [`ConfigHandle`] is the shared runtime view: callers
//! read a fresh snapshot per access, so replacing the config (settings
//! change, file reload) is visible on the very next read.

pub mod handle;
pub mod loader;
pub mod schema;

pub use {
    handle::ConfigHandle,
    loader::{config_dir, discover_and_load, load_config},
    schema::{AppLinksSettings, LumenConfig, OpenLinksMode},
};

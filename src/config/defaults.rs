//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::path::PathBuf;
use std::time::Duration;

/// Default output path of `sendpigeon init`.
pub const INIT_OUTPUT: &str = "sendpigeon.toml";

/// Directory under the platform config dir holding the config file.
pub const CONFIG_DIR: &str = "sendpigeon";

/// File name of the config file inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

/// Default per-attempt timeout in seconds.
pub const TIMEOUT_SECS: u64 = 30;

/// Default number of retries after the first attempt.
pub const MAX_RETRIES: i64 = 2;

/// Default maximum webhook timestamp age in seconds.
pub const WEBHOOK_MAX_AGE_SECS: i64 = crate::webhook::DEFAULT_MAX_AGE;

/// Default per-attempt timeout as Duration.
#[must_use]
pub const fn timeout() -> Duration {
    Duration::from_secs(TIMEOUT_SECS)
}

/// Platform config file location, e.g. `~/.config/sendpigeon/config.toml`.
///
/// Returns `None` if the platform has no config directory.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

//! Logging setup for the `bulkmail` binary.
//!
//! Library code only uses the `log` macros; the binary installs
//! `env_logger` writing to stderr, controlled by `RUST_LOG`.

use env_logger::{Builder, Env, Target};

/// Install the stderr logger. Default level is `info` (`debug` if verbose).
///
/// Calling it twice is harmless: the second call is ignored.
pub fn init_cli(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };

    let _ = Builder::from_env(Env::default().default_filter_or(default_level))
        .target(Target::Stderr)
        .format_timestamp(None)
        .format_module_path(false)
        .try_init();
}

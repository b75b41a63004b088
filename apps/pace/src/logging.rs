//! Tracing subscriber setup
//!
//! Logs always go to stderr so stdout carries only the passed-through lines.

use pace_config::LoggingSettings;
use tracing_subscriber::EnvFilter;

/// Initialize tracing from the logging settings
///
/// `RUST_LOG` wins over the configured filter; `--debug` wins over both.
pub fn init_tracing(settings: &LoggingSettings, debug_enabled: bool) {
    let filter = if debug_enabled {
        EnvFilter::new("pace=debug,pace_session=debug,pace_progress=debug,pace_config=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.filter))
    };

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false);

    if settings.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

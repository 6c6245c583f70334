//! Logging initialization.
//!
//! Installs a global `tracing` subscriber writing to stderr, so the report on
//! stdout or in the output file is never interleaved with log lines.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    /// Compact human-readable lines.
    #[default]
    Human,
    /// One JSON object per event.
    Json,
}

static INIT_ONCE: Once = Once::new();

/// Maps a `-v` count to a default filter directive for the forkdiff crates.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "forkdiff=warn,forkdiff_core=warn",
        1 => "forkdiff=info,forkdiff_core=info",
        2 => "forkdiff=debug,forkdiff_core=debug",
        _ => "forkdiff=trace,forkdiff_core=trace",
    }
}

/// Initializes the global subscriber once; later calls are no-ops.
///
/// `RUST_LOG` takes precedence over `verbosity` when set.
pub fn init(profile: Profile, verbosity: u8) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr);
        // A subscriber may already be installed by an embedding application.
        let _ = match profile {
            Profile::Human => builder.compact().try_init(),
            Profile::Json => builder.json().try_init(),
        };
    });
}

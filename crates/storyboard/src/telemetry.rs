//! Tracing subscriber setup for the CLI.
//!
//! Library crates only emit events; installing a subscriber is the binary's job.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset.
fn default_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("info,storyboard=debug")
    } else {
        EnvFilter::new("warn,storyboard=info")
    }
}

/// Install a global subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over `verbose`. With `json` set, events are
/// emitted as one JSON object per line.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(verbose: bool, json: bool) -> Result<(), tracing_subscriber::util::TryInitError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose));

    let json_layer = json.then(|| fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (!json).then(|| {
        fmt::layer()
            .with_target(verbose)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
}

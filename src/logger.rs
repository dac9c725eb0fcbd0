pub use tracing::{debug, error, info, warn, trace, instrument};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt::{self, format::FmtSpan}};

/// Filter used when `RUST_LOG` is unset.
fn default_directive(verbose: bool) -> &'static str {
    if verbose { "cfa_lossless_rs=debug,info" } else { "info" }
}

/// Installs the global subscriber, logging to stderr so the encoded stream
/// can go to stdout. `RUST_LOG` takes precedence over `verbose`.
pub fn init(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    // span timings (decode, statistics, residual pass) only at debug and below
    let show_spans = env_filter.to_string().contains("debug") || env_filter.to_string().contains("trace");

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::uptime())
        .with_span_events(if show_spans { FmtSpan::CLOSE } else { FmtSpan::NONE });

    // a subscriber may already be installed by an embedding application
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}

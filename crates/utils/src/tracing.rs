//! Tracing subscriber initialisation

use lumen_core::LUMEN_LOG_VAR;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use tracing::{debug, error, info, instrument, span, trace, warn, Level, Span};

/// Filter used when neither environment variable is set
pub const DEFAULT_FILTER: &str = "info";

type InitResult = Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>;

/// Initialize the tracing system with the `info` default
///
/// The filter is read from `LUMEN_LOG`, then `RUST_LOG`. Output is a compact
/// format on stderr, coloured only when stderr is a terminal.
pub fn init() -> InitResult {
    init_with_default(DEFAULT_FILTER)
}

/// Initialize tracing with `default` as the fallback filter directive
pub fn init_with_default(default: &str) -> InitResult {
    let filter = build_filter(default)?;
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(is_tty())
        .compact()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}

/// Install a subscriber that writes through the test harness
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_for_tests() {
    let filter = build_filter("debug").unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .compact()
        .try_init();
}

fn build_filter(default: &str) -> Result<EnvFilter, tracing_subscriber::filter::ParseError> {
    EnvFilter::try_from_env(LUMEN_LOG_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .or_else(|_| EnvFilter::try_new(default))
}

fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}

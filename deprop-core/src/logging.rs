//! Structured logging via **tracing**.
//!
//! The engine emits `tracing` events with structured fields (file, name,
//! line, counts). Front ends install a subscriber once at startup through
//! [`init_logging`]; library users may install their own instead.

use tracing_subscriber::EnvFilter;

/// Output format for the global subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Machine-readable JSON lines, one event per line.
    #[default]
    Json,
    /// Human-readable single-line output.
    Pretty,
}

/// Initializes the global tracing collector (subscriber).
///
/// Call *once* at the beginning of the application's runtime. Output goes to
/// stderr so stdout stays clean for tool output.
///
/// # Environment Variables
/// - `RUST_LOG`: Controls log filtering (e.g., `RUST_LOG=deprop_core=debug`)
pub fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let result = match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_ansi(false)
            .with_level(true)
            .with_target(true)
            .with_current_span(true)
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_target(true)
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };

    // A subscriber installed by the embedding application wins.
    if let Err(e) = result {
        eprintln!("[WARN] tracing subscriber already installed: {}", e);
    }
}

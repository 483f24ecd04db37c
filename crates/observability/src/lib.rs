//! Tracing/logging setup shared by binaries.

/// Initialize process-wide logging with the defaults (JSON, `info`).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    self::tracing::init_with(&ObservabilityConfig::from_env());
}

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use self::tracing::{LogFormat, ObservabilityConfig, init_with};

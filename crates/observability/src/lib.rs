//! Shared logging setup for goldbook binaries.

/// Tracing configuration (filters, formatting).
pub mod tracing;

/// Initialize process-wide logging.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

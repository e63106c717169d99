//! Process-wide tracing setup shared by the storage binaries.

/// Tracing subscriber configuration (filters, formatting).
pub mod tracing;

/// Initialize logging with the default `info` filter.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init_with_default("info");
}

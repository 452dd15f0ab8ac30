//! TTL bounds and defaults.

use std::time::Duration;

// ═══════════════════════════════════════════════════════════════════════════════
// TTL BOUNDS
// ═══════════════════════════════════════════════════════════════════════════════

/// Seconds in one hundred 365-day years.
pub const MAX_TTL_SECS: u64 = 100 * 365 * 24 * 60 * 60;

/// Largest TTL a cell accepts.
///
/// Keeps `now + ttl` representable as an `Instant` on every platform.
/// Longer durations passed to a constructor are clamped to this value.
pub const MAX_TTL: Duration = Duration::from_secs(MAX_TTL_SECS);

// ═══════════════════════════════════════════════════════════════════════════════
// DEFAULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// TTL used by `CellConfig::default()`, in seconds.
pub const DEFAULT_TTL_SECS: u64 = 300;

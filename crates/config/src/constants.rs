//! Centralized constants for the envreg workspace.
//!
//! This module contains default values shared by the decoder, the registry
//! and the durable writer so the literals live in one place.

// =============================================================================
// Config File Defaults
// =============================================================================

/// Default name of the configuration file, resolved against the current directory.
pub const DEFAULT_CONFIG_FILE: &str = ".env";

/// Permission bits applied to a saved config file on Unix.
pub const DEFAULT_FILE_MODE: u32 = 0o644;

// =============================================================================
// Key Handling
// =============================================================================

/// Separator appended to a registry prefix (`app` becomes `APP_`).
pub const PREFIX_SEPARATOR: char = '_';

/// Marker routing an entry to the process environment instead of the cache.
pub const EXPORT_MARKER: &str = "export ";

/// UTF-8 byte-order mark stripped from the start of a document.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

// =============================================================================
// Size Parsing
// =============================================================================

/// Multiplier for a `KB` suffix.
pub const KIB: u64 = 1 << 10;

/// Multiplier for an `MB` suffix.
pub const MIB: u64 = 1 << 20;

/// Multiplier for a `GB` suffix.
pub const GIB: u64 = 1 << 30;

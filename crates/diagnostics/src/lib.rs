// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Logging for the logmount crates
//!
//! Structured events go through `emit` to stderr. The level comes from the
//! LOGMOUNT_LOG environment variable:
//! - LOGMOUNT_LOG=off (default) - no logs
//! - LOGMOUNT_LOG=error - failed listings and requests
//! - LOGMOUNT_LOG=warn - also skipped entries and unreadable roots
//! - LOGMOUNT_LOG=info - also mounts and commands
//! - LOGMOUNT_LOG=debug - everything, including expected not-found lookups

use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

/// Environment variable selecting the log level
pub const LOG_ENV: &str = "LOGMOUNT_LOG";

static INIT: Once = Once::new();

/// Level for a LOGMOUNT_LOG value.
///
/// `Ok(None)` turns logging off. Unknown values are returned as the error.
pub fn parse_level(value: &str) -> Result<Option<emit::Level>, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "off" => Ok(None),
        "error" => Ok(Some(emit::Level::Error)),
        "warn" => Ok(Some(emit::Level::Warn)),
        "info" => Ok(Some(emit::Level::Info)),
        "debug" => Ok(Some(emit::Level::Debug)),
        other => Err(other.to_string()),
    }
}

/// Install the stderr emitter for the level named by LOGMOUNT_LOG.
///
/// Only the first call has any effect.
pub fn init_diagnostics() {
    INIT.call_once(|| {
        let value = std::env::var(LOG_ENV).unwrap_or_default();
        let (level, unknown) = match parse_level(&value) {
            Ok(None) => return,
            Ok(Some(level)) => (level, None),
            Err(unknown) => (emit::Level::Info, Some(unknown)),
        };

        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(level))
            .init();

        if let Some(value) = unknown {
            emit::warn!("Unknown {env} value {value}, using info", env: LOG_ENV, value);
        }

        // The emitter lives for the rest of the process
        std::mem::forget(rt);
    });
}

/// Normal operations: mounts, commands run
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Detail useful when chasing a problem, including expected misses
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Recoverable conditions: skipped entries, failed closes
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Failures that cost the caller part of a result
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

// Short names

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

pub use init_diagnostics as init;

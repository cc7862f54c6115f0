//! Caller stack snapshots for diagnostic records

use std::backtrace::Backtrace;

/// Capture the current thread's stack, regardless of `RUST_BACKTRACE`
///
/// Only call this after the target severity is known to be enabled; a
/// capture walks and symbolizes the whole stack.
pub fn caller_stack() -> String {
    Backtrace::force_capture().to_string()
}

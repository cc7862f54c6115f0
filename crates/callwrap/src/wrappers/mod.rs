//! Observability wrappers and the composition adapters
//!
//! - **[`exception_log`]**: log any failure, then return it unchanged
//! - **[`entry_exit`]**: `ENTERING`/`LEAVING` records around each call
//! - **[`compose`]**: [`OperationExt`] adapters for stacking wrappers

pub mod compose;
pub mod entry_exit;
pub mod exception_log;

pub use compose::OperationExt;
pub use entry_exit::{EntryExitLayer, EntryExitTracer, TraceConfig};
pub use exception_log::{ExceptionLogger, ExceptionLoggingLayer};

//! `reorder-session`
//!
//! **Responsibility:** the single-user session a UI drives: it owns the
//! product catalog and wires form submission, selection, spreadsheet import
//! and export to the metrics engine.

pub mod config;
pub mod error;
pub mod session;
pub mod status;

pub use config::SessionConfig;
pub use error::{SessionError, SessionResult};
pub use session::Session;
pub use status::{EXPORT_SUCCESS_MESSAGE, ExportSummary, ImportSummary, format_quantity};

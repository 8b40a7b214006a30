use thiserror::Error;

use reorder_core::DomainError;
use reorder_spreadsheet::SheetError;

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Sheet(#[from] SheetError),

    #[error("No data to export. Please add some products first.")]
    EmptyExport,
}

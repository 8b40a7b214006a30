//! Async file boundary for import/export.
//!
//! Reads and writes go through `tokio::fs`. There is no timeout and no
//! cancellation: a stalled read blocks the importing caller.

use std::path::Path;

use reorder_inventory::Product;

use crate::codec;
use crate::error::SheetError;

/// Read and parse an xlsx file.
pub async fn read_products(path: impl AsRef<Path>) -> Result<Vec<Product>, SheetError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|err| SheetError::io(path, err))?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "read spreadsheet");
    codec::parse(&bytes)
}

/// Write workbook bytes to `path`, replacing any existing file.
pub async fn write_workbook(path: impl AsRef<Path>, bytes: &[u8]) -> Result<(), SheetError> {
    let path = path.as_ref();
    tokio::fs::write(path, bytes)
        .await
        .map_err(|err| SheetError::io(path, err))?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "wrote spreadsheet");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn template_file_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(codec::TEMPLATE_FILE_NAME);

        write_workbook(&path, &codec::template().unwrap()).await.unwrap();
        let products = read_products(&path).await.unwrap();

        assert_eq!(products, vec![codec::sample_product()]);
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_products(dir.path().join("nope.xlsx")).await.unwrap_err();
        assert_eq!(err.kind(), "io");
        assert!(err.message().contains("nope.xlsx"));
    }
}

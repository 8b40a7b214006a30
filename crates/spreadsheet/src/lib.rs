//! Spreadsheet import/export for product lists.
//!
//! Workbooks are xlsx files with a single sheet whose first row holds the
//! fixed column headers (see [`columns::Column`]). The codec only produces or
//! consumes [`reorder_inventory::Product`] records; it never touches metrics.

pub mod codec;
pub mod columns;
pub mod error;
pub mod file;
pub mod xlsx;

pub use codec::{
    TEMPLATE_FILE_NAME, export_file_name, parse, sample_product, serialize, template,
};
pub use columns::Column;
pub use error::SheetError;
pub use file::{read_products, write_workbook};

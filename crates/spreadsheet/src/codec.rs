//! Product list ⇄ xlsx workbook.

use std::collections::HashMap;

use chrono::NaiveDate;

use reorder_inventory::Product;

use crate::columns::Column;
use crate::error::SheetError;
use crate::xlsx::{self, CellValue, Sheet, SheetRow};

pub const EXPORT_SHEET_NAME: &str = "Inventory Data";
pub const TEMPLATE_SHEET_NAME: &str = "Template";
pub const TEMPLATE_FILE_NAME: &str = "inventory_template.xlsx";

/// `inventory_data_YYYY-MM-DD.xlsx`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("inventory_data_{}.xlsx", date.format("%Y-%m-%d"))
}

/// The single row shipped in the downloadable template.
pub fn sample_product() -> Product {
    Product::new("Sample T-Shirt", "TS-001", "Apparel")
        .with_stock(100.0, 50.0)
        .with_sales(500.0, 30.0)
        .with_lead_time(7.0)
}

/// Parse products from the first worksheet of an xlsx workbook.
///
/// Sheet row 1 holds the headers; columns are matched by header text, so their order
/// does not matter and unknown columns are ignored. The batch is all or
/// nothing: one bad row rejects the whole sheet. Parsed products carry no id.
pub fn parse(bytes: &[u8]) -> Result<Vec<Product>, SheetError> {
    let mut rows = xlsx::read_first_sheet(bytes)?.into_iter().peekable();

    let header = rows
        .next_if(|row| row.number == 1 && !row.is_blank())
        .ok_or_else(|| SheetError::format("No data found in Excel file"))?;
    let layout = header_layout(&header);

    let products = rows
        .filter(|row| !row.is_blank())
        .map(|row| product_from_row(&row, &layout))
        .collect::<Result<Vec<_>, _>>()?;

    if products.is_empty() {
        return Err(SheetError::format("No data found in Excel file"));
    }

    tracing::info!(count = products.len(), "parsed products from spreadsheet");
    Ok(products)
}

/// Write `products` as a workbook: header row plus one row per product.
pub fn serialize(products: &[Product]) -> Result<Vec<u8>, SheetError> {
    let bytes = xlsx::write_workbook(&products_sheet(EXPORT_SHEET_NAME, products))?;
    tracing::info!(count = products.len(), bytes = bytes.len(), "serialized products to spreadsheet");
    Ok(bytes)
}

/// The import template: headers plus [`sample_product`].
pub fn template() -> Result<Vec<u8>, SheetError> {
    xlsx::write_workbook(&products_sheet(TEMPLATE_SHEET_NAME, &[sample_product()]))
}

fn products_sheet(name: &str, products: &[Product]) -> Sheet {
    let mut sheet = Sheet::new(name).with_widths(Column::ALL.iter().map(|c| c.width()).collect());

    sheet.push_row(
        Column::ALL
            .iter()
            .map(|c| CellValue::Text(c.header().to_string()))
            .collect(),
    );

    for product in products {
        sheet.push_row(Column::ALL.iter().map(|c| cell_for(product, *c)).collect());
    }

    sheet
}

fn cell_for(product: &Product, column: Column) -> CellValue {
    match column {
        Column::Name => CellValue::Text(product.name.clone()),
        Column::Sku => CellValue::Text(product.sku.clone()),
        Column::Category => CellValue::Text(product.category.clone()),
        Column::CurrentStock => CellValue::Number(product.current_stock),
        Column::TotalSales => CellValue::Number(product.total_sales),
        Column::TotalDays => CellValue::Number(product.total_days),
        Column::LeadTime => CellValue::Number(product.lead_time),
        Column::SafetyStock => CellValue::Number(product.safety_stock),
    }
}

/// Column → cell index, from the header row. First occurrence wins.
fn header_layout(header: &SheetRow) -> HashMap<Column, usize> {
    let mut layout = HashMap::new();
    for (index, cell) in header.cells.iter().enumerate() {
        if let CellValue::Text(text) = cell {
            if let Some(column) = Column::from_header(text) {
                layout.entry(column).or_insert(index);
            }
        }
    }
    layout
}

fn product_from_row(row: &SheetRow, layout: &HashMap<Column, usize>) -> Result<Product, SheetError> {
    let cell = |column: Column| cell_at(row, layout, column);
    let number = |column: Column| numeric_cell(row.number, column, cell(column));

    let product = Product {
        id: None,
        name: text_cell(cell(Column::Name)),
        sku: text_cell(cell(Column::Sku)),
        category: text_cell(cell(Column::Category)),
        current_stock: number(Column::CurrentStock)?,
        total_sales: number(Column::TotalSales)?,
        total_days: number(Column::TotalDays)?,
        lead_time: number(Column::LeadTime)?,
        safety_stock: number(Column::SafetyStock)?,
        monthly_data: Vec::new(),
    };

    product.validate().map_err(|e| {
        tracing::warn!(row = row.number, error = %e, "rejected spreadsheet row");
        SheetError::format(format!(
            "Invalid data found in row {}: {e}. Please check the template format.",
            row.number
        ))
    })?;

    Ok(product)
}

fn cell_at<'a>(row: &'a SheetRow, layout: &HashMap<Column, usize>, column: Column) -> &'a CellValue {
    layout
        .get(&column)
        .map(|i| row.cell(*i))
        .unwrap_or(&CellValue::Empty)
}

/// Text columns: kept verbatim. Numbers (e.g. a numeric SKU) are rendered
/// back to text, missing cells become the empty string.
fn text_cell(value: &CellValue) -> String {
    match value {
        CellValue::Empty => String::new(),
        CellValue::Text(s) => s.clone(),
        CellValue::Number(n) => n.to_string(),
    }
}

/// Numeric columns: missing or blank cells default to 0.
fn numeric_cell(row: u32, column: Column, value: &CellValue) -> Result<f64, SheetError> {
    match value {
        CellValue::Empty => Ok(0.0),
        CellValue::Number(n) => Ok(*n),
        CellValue::Text(s) if s.trim().is_empty() => Ok(0.0),
        CellValue::Text(s) => s.trim().parse::<f64>().map_err(|_| {
            SheetError::format(format!(
                "Invalid data found in row {row}: {} is not a number ({s:?}). Please check the template format.",
                column.header()
            ))
        }),
    }
}

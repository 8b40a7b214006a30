//! Fixed column layout shared by import, export and the template.

/// One spreadsheet column, in sheet order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Column {
    Name,
    Sku,
    Category,
    CurrentStock,
    TotalSales,
    TotalDays,
    LeadTime,
    SafetyStock,
}

impl Column {
    pub const ALL: [Column; 8] = [
        Column::Name,
        Column::Sku,
        Column::Category,
        Column::CurrentStock,
        Column::TotalSales,
        Column::TotalDays,
        Column::LeadTime,
        Column::SafetyStock,
    ];

    /// Header text exactly as it appears in row 1.
    pub fn header(self) -> &'static str {
        match self {
            Column::Name => "Product Name",
            Column::Sku => "SKU",
            Column::Category => "Category",
            Column::CurrentStock => "Current Stock",
            Column::TotalSales => "Total Sales",
            Column::TotalDays => "Total Days",
            Column::LeadTime => "Lead Time (days)",
            Column::SafetyStock => "Safety Stock",
        }
    }

    /// Display width in characters.
    pub fn width(self) -> f64 {
        match self {
            Column::Name => 20.0,
            Column::Sku => 10.0,
            Column::TotalDays => 12.0,
            _ => 15.0,
        }
    }

    pub fn from_header(header: &str) -> Option<Column> {
        let header = header.trim();
        Column::ALL.into_iter().find(|c| c.header() == header)
    }
}

//! User-facing messages and number formatting for the results views.

use std::path::PathBuf;

use reorder_inventory::round_to;

pub const EXPORT_SUCCESS_MESSAGE: &str = "Data exported successfully!";

/// Outcome of a successful import.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
}

impl ImportSummary {
    pub fn message(&self) -> String {
        format!("Successfully imported {} products!", self.imported)
    }
}

/// Outcome of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub exported: usize,
}

impl ExportSummary {
    pub fn message(&self) -> &'static str {
        EXPORT_SUCCESS_MESSAGE
    }
}

/// Render a quantity the way the results cards show it: `0` stays `0`,
/// fractions below one keep one decimal, everything else is rounded to a
/// whole unit.
pub fn format_quantity(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else if value < 1.0 {
        format!("{:.1}", round_to(value, 1))
    } else {
        format!("{:.0}", value.round())
    }
}

use serde::{Deserialize, Serialize};

use reorder_core::{DomainError, DomainResult, ProductId};

/// One month's sales observation, used only by seasonality analytics.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySales {
    /// Calendar month, 1 (January) through 12 (December).
    pub month: u32,
    pub sales: f64,
}

impl MonthlySales {
    pub fn new(month: u32, sales: f64) -> Self {
        Self { month, sales }
    }
}

/// One inventory item together with the sales history the reorder math needs.
///
/// Quantities are plain `f64`: imported sheets and form input both carry
/// fractional values, and the metrics engine rounds where it must.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Product {
    /// Assigned by the catalog on add; `None` for freshly entered or imported rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub name: String,
    pub sku: String,
    pub category: String,
    pub current_stock: f64,
    pub total_sales: f64,
    /// Length of the sales observation window in days. Must be > 0.
    pub total_days: f64,
    /// Days between placing a reorder and receiving it.
    pub lead_time: f64,
    /// User-declared minimum buffer; the engine never recommends less.
    pub safety_stock: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub monthly_data: Vec<MonthlySales>,
}

impl Product {
    pub fn new(name: impl Into<String>, sku: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sku: sku.into(),
            category: category.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: ProductId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_stock(mut self, current_stock: f64, safety_stock: f64) -> Self {
        self.current_stock = current_stock;
        self.safety_stock = safety_stock;
        self
    }

    pub fn with_sales(mut self, total_sales: f64, total_days: f64) -> Self {
        self.total_sales = total_sales;
        self.total_days = total_days;
        self
    }

    pub fn with_lead_time(mut self, lead_time: f64) -> Self {
        self.lead_time = lead_time;
        self
    }

    pub fn with_monthly_data(mut self, monthly_data: Vec<MonthlySales>) -> Self {
        self.monthly_data = monthly_data;
        self
    }

    /// Check the product invariant.
    ///
    /// A valid product has non-empty name/SKU/category, finite non-negative
    /// stock, sales, lead time and safety stock, and a positive observation
    /// window. Only valid products may reach the metrics engine or the catalog.
    pub fn validate(&self) -> DomainResult<()> {
        require_text("name", &self.name)?;
        require_text("sku", &self.sku)?;
        require_text("category", &self.category)?;

        require_non_negative("current_stock", self.current_stock)?;
        require_non_negative("total_sales", self.total_sales)?;
        require_non_negative("lead_time", self.lead_time)?;
        require_non_negative("safety_stock", self.safety_stock)?;

        if !(self.total_days.is_finite() && self.total_days > 0.0) {
            return Err(DomainError::validation("total_days must be greater than zero"));
        }

        for entry in &self.monthly_data {
            if !(1..=12).contains(&entry.month) {
                return Err(DomainError::validation(format!(
                    "monthly_data month must be 1-12, got {}",
                    entry.month
                )));
            }
            require_non_negative("monthly_data sales", entry.sales)?;
        }

        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

fn require_text(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_non_negative(field: &str, value: f64) -> DomainResult<()> {
    if !(value.is_finite() && value >= 0.0) {
        return Err(DomainError::validation(format!(
            "{field} must be a non-negative number, got {value}"
        )));
    }
    Ok(())
}

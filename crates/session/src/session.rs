//! The session a UI drives.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use reorder_core::{DomainError, IdGenerator, ProductId, UuidV7Generator};
use reorder_inventory::{
    CalculationResult, Catalog, Product, SeasonalityPattern, compute_metrics, monthly_seasonality,
    next_month_forecast,
};
use reorder_spreadsheet as sheet;

use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::status::{ExportSummary, ImportSummary};

/// One user's working state: configuration plus the product catalog.
///
/// Every operation runs synchronously against the catalog except the file
/// reads/writes, which are async.
#[derive(Debug)]
pub struct Session<G = UuidV7Generator> {
    config: SessionConfig,
    catalog: Catalog<G>,
}

impl Session<UuidV7Generator> {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_catalog(config, Catalog::new())
    }
}

impl<G: IdGenerator> Session<G> {
    pub fn with_catalog(config: SessionConfig, catalog: Catalog<G>) -> Self {
        Self { config, catalog }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog<G> {
        &self.catalog
    }

    /// Save a product from the entry form and compute its recommendation.
    ///
    /// Products carrying an id update the stored copy; products without one
    /// are added. The computed result becomes the session's current result.
    pub fn submit(&mut self, product: Product) -> SessionResult<CalculationResult> {
        if product.id.is_some() {
            self.catalog.update(product.clone())?;
        } else {
            self.catalog.add(product.clone())?;
        }

        let results = compute_metrics(&product);
        self.catalog.set_results(Some(results));
        Ok(results)
    }

    /// Select a stored product and compute its recommendation.
    pub fn select(&mut self, id: ProductId) -> SessionResult<CalculationResult> {
        self.catalog.select(Some(id))?;
        let product = self.catalog.selected().ok_or_else(DomainError::not_found)?;

        let results = compute_metrics(product);
        self.catalog.set_results(Some(results));
        Ok(results)
    }

    pub fn clear_selection(&mut self) {
        self.catalog.clear_selection();
        self.catalog.set_results(None);
    }

    pub fn selected(&self) -> Option<&Product> {
        self.catalog.selected()
    }

    pub fn results(&self) -> Option<&CalculationResult> {
        self.catalog.results()
    }

    /// Monthly seasonality factors for a stored product's monthly history.
    pub fn seasonality(&self, id: ProductId) -> SessionResult<Vec<SeasonalityPattern>> {
        let product = self.catalog.get(id).ok_or_else(DomainError::not_found)?;
        Ok(monthly_seasonality(&product.monthly_data))
    }

    /// Seasonally adjusted unit forecast for the month after `current_month`.
    pub fn next_month_forecast(&self, id: ProductId, current_month: u32) -> SessionResult<f64> {
        let product = self.catalog.get(id).ok_or_else(DomainError::not_found)?;
        let patterns = monthly_seasonality(&product.monthly_data);
        let average_daily_sales = compute_metrics(product).average_daily_sales;
        Ok(next_month_forecast(average_daily_sales, &patterns, current_month))
    }

    /// Import every product in an xlsx workbook, or none of them.
    pub fn import_bytes(&mut self, bytes: &[u8]) -> SessionResult<ImportSummary> {
        let products = sheet::parse(bytes).inspect_err(|e| {
            tracing::warn!(error = %e, "spreadsheet import rejected");
        })?;
        self.add_imported(products)
    }

    /// Read an xlsx file and import it like [`Session::import_bytes`].
    pub async fn import_file(&mut self, path: impl AsRef<Path>) -> SessionResult<ImportSummary> {
        let products = sheet::read_products(path).await.inspect_err(|e| {
            tracing::warn!(error = %e, "spreadsheet import rejected");
        })?;
        self.add_imported(products)
    }

    fn add_imported(&mut self, products: Vec<Product>) -> SessionResult<ImportSummary> {
        let ids = self.catalog.add_all(products)?;
        tracing::info!(imported = ids.len(), "spreadsheet import complete");
        Ok(ImportSummary { imported: ids.len() })
    }

    /// Workbook bytes for every product in the catalog.
    pub fn export_bytes(&self) -> SessionResult<Vec<u8>> {
        if self.catalog.is_empty() {
            return Err(SessionError::EmptyExport);
        }
        Ok(sheet::serialize(self.catalog.products())?)
    }

    /// Write `inventory_data_<date>.xlsx` into the export directory.
    pub async fn export_to_dir(&self, date: NaiveDate) -> SessionResult<ExportSummary> {
        let bytes = self.export_bytes()?;
        let path = self.config.export_dir.join(sheet::export_file_name(date));
        sheet::write_workbook(&path, &bytes).await?;

        let summary = ExportSummary {
            path,
            exported: self.catalog.len(),
        };
        tracing::info!(
            path = %summary.path.display(),
            exported = summary.exported,
            "{}",
            summary.message()
        );
        Ok(summary)
    }

    /// Export stamped with today's local date.
    pub async fn export_today(&self) -> SessionResult<ExportSummary> {
        self.export_to_dir(chrono::Local::now().date_naive()).await
    }

    /// Write `inventory_template.xlsx` into the export directory.
    pub async fn write_template(&self) -> SessionResult<PathBuf> {
        let path = self.config.export_dir.join(sheet::TEMPLATE_FILE_NAME);
        sheet::write_workbook(&path, &sheet::template()?).await?;
        Ok(path)
    }
}

//! In-memory product catalog for a single session.
//!
//! The catalog owns the ordered product list plus the "selected product" and
//! "last computed results" slots the UI renders from. It is a plain value with
//! one owner; there is no global instance and no locking.

use reorder_core::{DomainError, DomainResult, IdGenerator, ProductId, UuidV7Generator};

use crate::metrics::CalculationResult;
use crate::product::Product;

#[derive(Debug, Clone)]
pub struct Catalog<G = UuidV7Generator> {
    products: Vec<Product>,
    selected: Option<ProductId>,
    results: Option<CalculationResult>,
    ids: G,
}

impl Catalog<UuidV7Generator> {
    pub fn new() -> Self {
        Self::with_id_generator(UuidV7Generator)
    }
}

impl Default for Catalog<UuidV7Generator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: IdGenerator> Catalog<G> {
    pub fn with_id_generator(ids: G) -> Self {
        Self {
            products: Vec::new(),
            selected: None,
            results: None,
            ids,
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == Some(id))
    }

    /// Append a product under a freshly generated id.
    ///
    /// Any id already on `product` is replaced.
    pub fn add(&mut self, mut product: Product) -> DomainResult<ProductId> {
        product.validate()?;

        let id = self.ids.next_id();
        if self.get(id).is_some() {
            return Err(DomainError::conflict(format!("duplicate product id {id}")));
        }

        product.id = Some(id);
        tracing::info!(product_id = %id, sku = %product.sku, "product added");
        self.products.push(product);
        Ok(id)
    }

    /// Add a batch atomically: if any product is invalid, or any generated id
    /// collides, none are added.
    pub fn add_all(&mut self, products: Vec<Product>) -> DomainResult<Vec<ProductId>> {
        for (index, product) in products.iter().enumerate() {
            product.validate().map_err(|e| match e {
                DomainError::Validation(msg) => {
                    DomainError::validation(format!("product {}: {msg}", index + 1))
                }
                other => other,
            })?;
        }

        let mut ids: Vec<ProductId> = Vec::with_capacity(products.len());
        for _ in 0..products.len() {
            let id = self.ids.next_id();
            if self.get(id).is_some() || ids.contains(&id) {
                return Err(DomainError::conflict(format!("duplicate product id {id}")));
            }
            ids.push(id);
        }

        for (mut product, id) in products.into_iter().zip(ids.iter().copied()) {
            product.id = Some(id);
            tracing::info!(product_id = %id, sku = %product.sku, "product added");
            self.products.push(product);
        }
        Ok(ids)
    }

    /// Replace the stored product that has the same id.
    pub fn update(&mut self, product: Product) -> DomainResult<()> {
        product.validate()?;

        let id = product.id.ok_or_else(DomainError::not_found)?;
        let slot = self
            .products
            .iter_mut()
            .find(|p| p.id == Some(id))
            .ok_or_else(DomainError::not_found)?;

        tracing::info!(product_id = %id, sku = %product.sku, "product updated");
        *slot = product;
        Ok(())
    }

    /// Select a product by id, or clear the selection with `None`.
    pub fn select(&mut self, id: Option<ProductId>) -> DomainResult<()> {
        if let Some(id) = id {
            if self.get(id).is_none() {
                return Err(DomainError::not_found());
            }
        }
        self.selected = id;
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&Product> {
        self.selected.and_then(|id| self.get(id))
    }

    pub fn set_results(&mut self, results: Option<CalculationResult>) {
        self.results = results;
    }

    pub fn results(&self) -> Option<&CalculationResult> {
        self.results.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::compute_metrics;
    use reorder_core::SequentialIdGenerator;

    fn catalog() -> Catalog<SequentialIdGenerator> {
        Catalog::with_id_generator(SequentialIdGenerator::new())
    }

    fn shirt() -> Product {
        Product::new("Sample T-Shirt", "TS-001", "Apparel")
            .with_stock(100.0, 50.0)
            .with_sales(500.0, 30.0)
            .with_lead_time(7.0)
    }

    #[test]
    fn add_assigns_sequential_ids_in_order() {
        let mut catalog = catalog();
        let a = catalog.add(shirt()).unwrap();
        let b = catalog.add(Product { sku: "TS-002".to_string(), ..shirt() }).unwrap();

        assert_ne!(a, b);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.products()[0].id, Some(a));
        assert_eq!(catalog.products()[1].sku, "TS-002");
        assert_eq!(a.to_string(), "00000000-0000-0000-0000-000000000001");
    }

    #[test]
    fn add_replaces_incoming_id() {
        let mut catalog = catalog();
        let foreign = SequentialIdGenerator::starting_at(99).next_id();
        let id = catalog.add(shirt().with_id(foreign)).unwrap();
        assert_ne!(id, foreign);
        assert!(catalog.get(foreign).is_none());
    }

    #[test]
    fn add_rejects_invalid_product() {
        let mut catalog = catalog();
        let err = catalog.add(shirt().with_sales(500.0, 0.0)).unwrap_err();
        assert!(err.is_validation());
        assert!(catalog.is_empty());
    }

    #[test]
    fn duplicate_generated_id_is_a_conflict() {
        #[derive(Debug)]
        struct Stuck;
        impl IdGenerator for Stuck {
            fn next_id(&mut self) -> ProductId {
                SequentialIdGenerator::new().next_id()
            }
        }

        let mut catalog = Catalog::with_id_generator(Stuck);
        catalog.add(shirt()).unwrap();
        let err = catalog.add(shirt()).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn add_all_with_colliding_ids_adds_nothing() {
        #[derive(Debug)]
        struct Scripted(Vec<u128>);
        impl IdGenerator for Scripted {
            fn next_id(&mut self) -> ProductId {
                SequentialIdGenerator::starting_at(self.0.remove(0)).next_id()
            }
        }

        let mut catalog = Catalog::with_id_generator(Scripted(vec![1, 2, 2, 1, 3, 1, 4, 5]));
        let err = catalog.add_all(vec![shirt(), shirt(), shirt()]).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert!(catalog.is_empty());

        // The stored product gets 1; the next batch draws 3 then 1 again.
        catalog.add(shirt()).unwrap();
        let err = catalog.add_all(vec![shirt(), shirt()]).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(catalog.len(), 1);

        let ids = catalog.add_all(vec![shirt(), shirt()]).unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn update_replaces_matching_product() {
        let mut catalog = catalog();
        let id = catalog.add(shirt()).unwrap();

        let mut edited = catalog.get(id).cloned().unwrap();
        edited.current_stock = 5.0;
        catalog.update(edited).unwrap();

        assert_eq!(catalog.get(id).unwrap().current_stock, 5.0);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn update_of_unknown_or_missing_id_is_not_found() {
        let mut catalog = catalog();
        catalog.add(shirt()).unwrap();

        assert_eq!(catalog.update(shirt()).unwrap_err(), DomainError::NotFound);

        let stranger = shirt().with_id(SequentialIdGenerator::starting_at(77).next_id());
        assert_eq!(catalog.update(stranger).unwrap_err(), DomainError::NotFound);
    }

    #[test]
    fn add_all_is_all_or_nothing() {
        let mut catalog = catalog();
        let bad = Product { category: String::new(), ..shirt() };

        let err = catalog.add_all(vec![shirt(), bad]).unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.starts_with("product 2:")),
            _ => panic!("Expected Validation error"),
        }
        assert!(catalog.is_empty());

        let ids = catalog.add_all(vec![shirt(), shirt()]).unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn selection_and_results_slots() {
        let mut catalog = catalog();
        let id = catalog.add(shirt()).unwrap();

        assert!(catalog.selected().is_none());
        catalog.select(Some(id)).unwrap();
        assert_eq!(catalog.selected().map(|p| p.sku.as_str()), Some("TS-001"));

        let results = compute_metrics(catalog.selected().unwrap());
        catalog.set_results(Some(results));
        assert_eq!(catalog.results().map(|r| r.reorder_quantity), Some(90.0));

        catalog.clear_selection();
        catalog.set_results(None);
        assert!(catalog.selected().is_none());
        assert!(catalog.results().is_none());
    }

    #[test]
    fn selecting_unknown_id_is_not_found() {
        let mut catalog = catalog();
        let ghost = SequentialIdGenerator::starting_at(5).next_id();
        assert_eq!(catalog.select(Some(ghost)).unwrap_err(), DomainError::NotFound);
    }
}

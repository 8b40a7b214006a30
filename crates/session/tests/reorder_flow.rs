//! Black-box walk through a session: template → import → select → export.

use chrono::NaiveDate;

use reorder_core::SequentialIdGenerator;
use reorder_inventory::{Catalog, Product, StockStatus};
use reorder_session::{Session, SessionConfig, SessionError, format_quantity};

#[tokio::test]
async fn template_import_select_export() {
    let dir = tempfile::tempdir().unwrap();
    let config = SessionConfig::default().with_export_dir(dir.path());
    let mut session =
        Session::with_catalog(config, Catalog::with_id_generator(SequentialIdGenerator::new()));

    assert!(matches!(
        session.export_today().await.unwrap_err(),
        SessionError::EmptyExport
    ));

    let template = session.write_template().await.unwrap();
    let summary = session.import_file(&template).await.unwrap();
    assert_eq!(summary.imported, 1);

    let id = session.catalog().products()[0].id.unwrap();
    let results = session.select(id).unwrap();
    assert_eq!(results.stock_status(), StockStatus::ReorderNeeded);
    assert_eq!(format_quantity(results.average_daily_sales), "17");
    assert_eq!(format_quantity(results.reorder_quantity), "90");
    assert_eq!(format_quantity(results.post_reorder_inventory), "190");

    let restock = Product {
        current_stock: 250.0,
        ..session.selected().cloned().unwrap()
    };
    let results = session.submit(restock).unwrap();
    assert_eq!(results.stock_status(), StockStatus::Healthy);
    assert_eq!(results.stock_status().headline(), "Stock Level OK");

    let date = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
    let exported = session.export_to_dir(date).await.unwrap();
    let reimported = reorder_spreadsheet::read_products(&exported.path).await.unwrap();
    assert_eq!(reimported.len(), 1);
    assert_eq!(reimported[0].current_stock, 250.0);
}

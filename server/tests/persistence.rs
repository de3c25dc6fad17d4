//! On-disk database round trip
//!
//! The service normally runs against RocksDB; make sure records written
//! through the repositories survive a close-and-reopen.

use milksync_server::db::DbService;
use milksync_server::db::models::ProductCreate;
use milksync_server::db::repository::ProductRepository;

#[tokio::test]
async fn records_survive_reopen() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("milksync.db");
    let path = path.to_string_lossy();

    let product_id = {
        let service = DbService::new(&path).await.expect("open database");
        let repo = ProductRepository::new(service.db.clone());
        let product = repo
            .create(ProductCreate {
                name: "Toned Milk".to_string(),
                unit: None,
                cost_per_tub: Some(100),
                cost_per_packet: Some(10),
                packets_per_tub: Some(10),
            })
            .await
            .expect("create product");
        product.id.expect("product id").to_string()
        // Dropping the service releases the storage lock
    };

    let service = DbService::new(&path).await.expect("reopen database");
    let repo = ProductRepository::new(service.db.clone());
    let product = repo
        .find_by_id(&product_id)
        .await
        .expect("lookup succeeds")
        .expect("product persisted");
    assert_eq!(product.name, "Toned Milk");
    assert_eq!(product.cost_per_tub, Some(100));
}

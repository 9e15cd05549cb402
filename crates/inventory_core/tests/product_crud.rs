use inventory_core::db::open_db_in_memory;
use inventory_core::{
    Confirmation, DeleteOutcome, Field, NewProduct, Product, ProductRepository, RepoError,
    SqliteProductRepository, ValidationError, ValidationReason,
};
use rusqlite::Connection;

fn new_product(name: &str, quantity: i64, price: f64, category: Option<&str>) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        description: Some(format!("{name} description")),
        quantity,
        price,
        category: category.map(str::to_string),
    }
}

fn insert(repo: &SqliteProductRepository<'_>, name: &str, quantity: i64) -> Product {
    repo.create_product(&new_product(name, quantity, 1.0, None))
        .unwrap()
}

fn count_rows(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM products;", [], |row| row.get(0))
        .unwrap()
}

fn assert_validation(err: RepoError, field: Field, reason: ValidationReason) {
    match err {
        RepoError::Validation(v) => assert_eq!(v, ValidationError::new(field, reason)),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::new(&conn);

    let created = repo
        .create_product(&new_product("Bolt", 100, 0.15, Some("Hardware")))
        .unwrap();

    let loaded = repo.get_product(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.name, "Bolt");
    assert_eq!(loaded.description.as_deref(), Some("Bolt description"));
    assert_eq!(loaded.quantity, 100);
    assert_eq!(loaded.price, 0.15);
    assert_eq!(loaded.category.as_deref(), Some("Hardware"));
}

#[test]
fn create_then_list_then_delete_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::new(&conn);

    let created = repo
        .create_product(&NewProduct {
            name: "Nut".to_string(),
            description: None,
            quantity: 5,
            price: 0.05,
            category: None,
        })
        .unwrap();

    let listed = repo.list_products().unwrap();
    assert_eq!(listed, vec![created.clone()]);

    let outcome = repo
        .delete_product(created.id, Confirmation::Affirmative)
        .unwrap();
    assert_eq!(outcome, DeleteOutcome::Deleted(created));
    assert!(repo.list_products().unwrap().is_empty());
}

#[test]
fn list_is_ordered_by_id_and_empty_store_is_not_an_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::new(&conn);
    assert!(repo.list_products().unwrap().is_empty());

    let ids = ["c", "a", "b"]
        .iter()
        .map(|name| insert(&repo, name, 1).id)
        .collect::<Vec<_>>();

    let listed = repo
        .list_products()
        .unwrap()
        .into_iter()
        .map(|product| product.id)
        .collect::<Vec<_>>();
    assert_eq!(listed, ids);
    assert!(listed.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn invalid_create_changes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::new(&conn);

    let cases = [
        (
            new_product("  ", 1, 1.0, None),
            Field::Name,
            ValidationReason::Empty,
        ),
        (
            new_product("Bolt", -1, 1.0, None),
            Field::Quantity,
            ValidationReason::Negative,
        ),
        (
            new_product("Bolt", 1, -0.5, None),
            Field::Price,
            ValidationReason::Negative,
        ),
        (
            new_product("Bolt", 1, 1e308, None),
            Field::Price,
            ValidationReason::TooLarge,
        ),
    ];

    for (product, field, reason) in cases {
        let err = repo.create_product(&product).unwrap_err();
        assert_validation(err, field, reason);
    }
    assert_eq!(count_rows(&conn), 0);
}

#[test]
fn update_quantity_changes_only_quantity() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::new(&conn);
    let created = repo
        .create_product(&new_product("Washer", 12, 0.02, Some("Hardware")))
        .unwrap();

    let change = repo.update_quantity(created.id, 3).unwrap();
    assert_eq!(change.product_id, created.id);
    assert_eq!(change.name, "Washer");
    assert_eq!(change.previous, 12);
    assert_eq!(change.current, 3);

    let loaded = repo.get_product(created.id).unwrap().unwrap();
    assert_eq!(
        loaded,
        Product {
            quantity: 3,
            ..created
        }
    );
}

#[test]
fn update_quantity_not_found_changes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::new(&conn);
    let created = insert(&repo, "Gear", 4);

    let err = repo.update_quantity(created.id + 100, 9).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == created.id + 100));

    let err = repo.update_quantity(created.id, -2).unwrap_err();
    assert_validation(err, Field::Quantity, ValidationReason::Negative);

    let err = repo
        .update_quantity(created.id, 10_000_000_000)
        .unwrap_err();
    assert_validation(err, Field::Quantity, ValidationReason::TooLarge);

    assert_eq!(repo.get_product(created.id).unwrap().unwrap().quantity, 4);
}

#[test]
fn declined_delete_keeps_record() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::new(&conn);
    let created = insert(&repo, "Hinge", 2);

    let outcome = repo
        .delete_product(created.id, Confirmation::from_token("n"))
        .unwrap();
    assert!(matches!(outcome, DeleteOutcome::Cancelled(ref product) if product.id == created.id));
    assert!(repo.get_product(created.id).unwrap().is_some());
}

#[test]
fn confirmed_delete_removes_exactly_one_record() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::new(&conn);
    let keep = insert(&repo, "Keep", 1);
    let drop_me = insert(&repo, "Drop", 1);

    repo.delete_product(drop_me.id, Confirmation::from_token("S"))
        .unwrap();

    let remaining = repo.list_products().unwrap();
    assert_eq!(remaining, vec![keep]);
}

#[test]
fn delete_missing_id_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::new(&conn);

    let err = repo
        .delete_product(42, Confirmation::Affirmative)
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(42)));
}

#[test]
fn ids_are_never_reused_after_delete() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::new(&conn);

    let first = insert(&repo, "First", 1);
    repo.delete_product(first.id, Confirmation::Affirmative)
        .unwrap();
    let second = insert(&repo, "Second", 1);

    assert!(second.id > first.id);
}

#[test]
fn low_stock_example_from_bolt_inventory() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::new(&conn);
    let bolt = repo
        .create_product(&NewProduct {
            name: "Bolt".to_string(),
            description: Some("Steel bolt".to_string()),
            quantity: 100,
            price: 0.15,
            category: Some("Hardware".to_string()),
        })
        .unwrap();

    assert!(repo.low_stock(50).unwrap().is_empty());

    repo.update_quantity(bolt.id, 30).unwrap();
    let entries = repo.low_stock(50).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].product.id, bolt.id);
    assert_eq!(entries[0].product.quantity, 30);
    assert!(!entries[0].out_of_stock);
}

#[test]
fn low_stock_zero_returns_only_out_of_stock_records() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::new(&conn);
    let empty_a = insert(&repo, "A", 0);
    insert(&repo, "B", 1);
    let empty_c = insert(&repo, "C", 0);

    let entries = repo.low_stock(0).unwrap();
    let ids = entries
        .iter()
        .map(|entry| entry.product.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![empty_a.id, empty_c.id]);
    assert!(entries.iter().all(|entry| entry.out_of_stock));
}

#[test]
fn low_stock_orders_by_quantity_and_rejects_negative_threshold() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::new(&conn);
    insert(&repo, "Seven", 7);
    insert(&repo, "Zero", 0);
    insert(&repo, "Three", 3);
    insert(&repo, "Plenty", 70);

    let quantities = repo
        .low_stock(10)
        .unwrap()
        .into_iter()
        .map(|entry| entry.product.quantity)
        .collect::<Vec<_>>();
    assert_eq!(quantities, vec![0, 3, 7]);

    let err = repo.low_stock(-1).unwrap_err();
    assert_validation(err, Field::Threshold, ValidationReason::Negative);
}

#[test]
fn invalid_persisted_row_is_rejected_on_read() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "PRAGMA ignore_check_constraints = ON;
         INSERT INTO products (name, quantity, price) VALUES ('Broken', -4, 1.0);",
    )
    .unwrap();

    let repo = SqliteProductRepository::new(&conn);
    let err = repo.list_products().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn product_serializes_with_field_names() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::new(&conn);
    let created = repo
        .create_product(&new_product("Bolt", 1, 0.5, None))
        .unwrap();

    let value = serde_json::to_value(&created).unwrap();
    assert_eq!(value["id"], created.id);
    assert_eq!(value["name"], "Bolt");
    assert_eq!(value["quantity"], 1);
    assert_eq!(value["price"], 0.5);
    assert!(value["category"].is_null());
}

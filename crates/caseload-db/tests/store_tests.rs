// Copyright 2026 Caseload Contributors
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use caseload_app::{Category, FieldValue, RecordId};
use caseload_db::{Store, validate_db_path};
use caseload_testkit::{CareFaker, temp_db_path};

#[test]
fn validate_db_path_rejects_uri_forms() {
    assert!(validate_db_path("https://example.com/db.sqlite").is_err());
    assert!(validate_db_path("postgres://localhost/caseload").is_err());
    assert!(validate_db_path("").is_err());
    assert!(validate_db_path("/tmp/caseload.db").is_ok());
    assert!(validate_db_path(":memory:").is_ok());
}

#[test]
fn bootstrap_creates_empty_categories() -> Result<()> {
    let store = Store::open_memory()?;
    store.bootstrap()?;

    for (category, count) in store.category_counts()? {
        assert_eq!(count, 0, "category {}", category.as_str());
    }
    Ok(())
}

#[test]
fn bootstrap_rejects_schema_missing_required_column() -> Result<()> {
    let store = Store::open_memory()?;
    store.bootstrap()?;

    store.raw_connection().execute_batch(
        "
        ALTER TABLE records RENAME TO records_old;
        CREATE TABLE records (
          position   INTEGER PRIMARY KEY AUTOINCREMENT,
          category   TEXT NOT NULL,
          id         TEXT NOT NULL,
          created_at TEXT NOT NULL,
          updated_at TEXT NOT NULL
        );
        DROP TABLE records_old;
        ",
    )?;

    let err = store
        .bootstrap()
        .expect_err("schema validation should fail");
    let message = err.to_string();
    assert!(message.contains("table `records` is missing required columns"));
    assert!(message.contains("body"));
    Ok(())
}

#[test]
fn record_round_trip_preserves_typed_fields() -> Result<()> {
    let store = Store::open_memory()?;
    store.bootstrap()?;

    let mut faker = CareFaker::new(42);
    let record = faker.record(Category::Facilities);
    store.insert_record(&record)?;

    let loaded = store
        .get_record(Category::Facilities, record.id())?
        .expect("inserted record");
    assert_eq!(loaded, record);
    Ok(())
}

#[test]
fn list_preserves_insertion_order() -> Result<()> {
    let store = Store::open_memory()?;
    store.bootstrap()?;

    let mut faker = CareFaker::new(7);
    let clients = faker.records(Category::Clients, 4);
    for client in &clients {
        store.insert_record(client)?;
    }

    let listed = store.list_records(Category::Clients)?;
    let ids: Vec<&str> = listed.iter().map(|record| record.id().as_str()).collect();
    assert_eq!(ids, vec!["c1", "c2", "c3", "c4"]);
    Ok(())
}

#[test]
fn update_rewrites_body_and_reports_misses() -> Result<()> {
    let store = Store::open_memory()?;
    store.bootstrap()?;
    store.seed_demo_data()?;

    let mut client = store
        .get_record(Category::Clients, &RecordId::from("c1"))?
        .expect("seeded client");
    client.apply_field("status", &FieldValue::Text("tour".to_owned()));
    assert!(store.update_record(&client)?);

    let reloaded = store
        .get_record(Category::Clients, &RecordId::from("c1"))?
        .expect("updated client");
    assert_eq!(
        reloaded.field("status"),
        Some(FieldValue::Text("tour".to_owned()))
    );

    // Only c1 is seeded, so the faker's second client id (c2) has no row.
    let mut faker = CareFaker::new(1);
    let ghost = faker.records(Category::Clients, 2).remove(1);
    assert!(!store.update_record(&ghost)?);
    Ok(())
}

#[test]
fn delete_removes_row_once() -> Result<()> {
    let store = Store::open_memory()?;
    store.bootstrap()?;
    store.seed_demo_data()?;

    let v1 = RecordId::from("v1");
    assert!(store.delete_record(Category::Favorites, &v1)?);
    assert!(!store.delete_record(Category::Favorites, &v1)?);
    assert_eq!(store.record_count(Category::Favorites)?, 0);
    Ok(())
}

#[test]
fn duplicate_id_within_category_is_rejected() -> Result<()> {
    let store = Store::open_memory()?;
    store.bootstrap()?;

    let mut faker = CareFaker::new(9);
    let client = faker.record(Category::Clients);
    store.insert_record(&client)?;
    assert!(store.insert_record(&client).is_err());
    Ok(())
}

#[test]
fn file_backed_store_persists_across_reopen() -> Result<()> {
    let (_dir, db_path) = temp_db_path()?;

    {
        let store = Store::open(&db_path)?;
        store.bootstrap()?;
        store.seed_demo_data()?;
    }

    let store = Store::open(&db_path)?;
    store.bootstrap()?;
    assert_eq!(store.record_count(Category::Clients)?, 1);
    let client = store
        .get_record(Category::Clients, &RecordId::from("c1"))?
        .expect("persisted client");
    assert_eq!(
        client.field("name"),
        Some(FieldValue::Text("John Doe".to_owned()))
    );
    Ok(())
}

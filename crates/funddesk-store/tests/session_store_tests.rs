// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use funddesk_app::{PersistedListState, SortDirection, StateStore};
use funddesk_store::{SessionStateStore, SessionStore};
use std::rc::Rc;

fn open_store() -> Result<Rc<SessionStore>> {
    let store = SessionStore::open_memory()?;
    store.bootstrap()?;
    Ok(Rc::new(store))
}

#[test]
fn bootstrap_creates_schema_and_is_idempotent() -> Result<()> {
    let store = SessionStore::open_memory()?;
    store.bootstrap()?;
    store.bootstrap()?;
    assert!(store.keys()?.is_empty());
    Ok(())
}

#[test]
fn bootstrap_rejects_schema_missing_required_column() -> Result<()> {
    let store = SessionStore::open_memory()?;
    store.bootstrap()?;

    store.raw_connection().execute_batch(
        "
        ALTER TABLE ui_state RENAME TO ui_state_old;
        CREATE TABLE ui_state (key TEXT PRIMARY KEY, value TEXT NOT NULL);
        DROP TABLE ui_state_old;
        ",
    )?;

    let err = store
        .bootstrap()
        .expect_err("schema validation should fail");
    let message = err.to_string();
    assert!(message.contains("ui_state"));
    assert!(message.contains("updated_at"));
    Ok(())
}

#[test]
fn put_get_round_trip_overwrites_in_place() -> Result<()> {
    let store = SessionStore::open_memory()?;
    store.bootstrap()?;

    store.put("list.securities", "{\"page\":2}")?;
    store.put("list.securities", "{\"page\":3}")?;
    assert_eq!(
        store.get("list.securities")?.as_deref(),
        Some("{\"page\":3}")
    );
    assert_eq!(store.get("list.accounts")?, None);
    assert_eq!(store.keys()?, vec!["list.securities".to_owned()]);
    Ok(())
}

#[test]
fn delete_removes_a_key() -> Result<()> {
    let store = SessionStore::open_memory()?;
    store.bootstrap()?;

    store.put("list.funds", "{}")?;
    store.delete("list.funds")?;
    assert_eq!(store.get("list.funds")?, None);
    Ok(())
}

#[test]
fn state_store_round_trips_a_snapshot() -> Result<()> {
    let store = SessionStateStore::new(open_store()?);
    let snapshot = PersistedListState {
        search_term: Some("AAPL".to_owned()),
        page: Some(3),
        page_size: Some(50),
        sort_column: Some("ticker".to_owned()),
        sort_direction: Some(SortDirection::Desc),
    };

    store.save("list.securities", &snapshot);
    assert_eq!(store.load("list.securities"), Some(snapshot));
    Ok(())
}

#[test]
fn state_store_loads_none_for_missing_key() -> Result<()> {
    let store = SessionStateStore::new(open_store()?);
    assert_eq!(store.load("list.never-written"), None);
    Ok(())
}

#[test]
fn corrupt_persisted_json_loads_as_none() -> Result<()> {
    let session = open_store()?;
    session.put("list.securities", "{not json")?;

    let store = SessionStateStore::new(session);
    assert_eq!(store.load("list.securities"), None);
    Ok(())
}

#[test]
fn record_missing_fields_still_loads() -> Result<()> {
    let session = open_store()?;
    session.put("list.securities", "{\"search_term\":\"AAPL\",\"page\":3}")?;

    let store = SessionStateStore::new(session);
    let loaded = store
        .load("list.securities")
        .expect("partial record should parse");
    assert_eq!(loaded.search_term.as_deref(), Some("AAPL"));
    assert_eq!(loaded.page, Some(3));
    assert_eq!(loaded.page_size, None);
    assert_eq!(loaded.sort_column, None);
    assert_eq!(loaded.sort_direction, None);
    Ok(())
}

#[test]
fn on_disk_store_survives_reopen() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let path = temp.path().join("funddesk.db");

    {
        let store = SessionStore::open(&path)?;
        store.bootstrap()?;
        store.put("list.accounts", "{\"page\":4}")?;
    }

    let reopened = SessionStore::open(&path)?;
    reopened.bootstrap()?;
    assert_eq!(
        reopened.get("list.accounts")?.as_deref(),
        Some("{\"page\":4}")
    );
    Ok(())
}

use tessera_engine::EavError;
use tessera_engine::config::StoreConfig;
use tessera_engine::persistence::{ColumnType, Store, Table, Value};

use super::open_store;

#[test]
fn schema_init_is_idempotent() {
    let store = open_store();

    store.init_schema().unwrap();
    store.init_schema().unwrap();

    assert_eq!(store.relation_count().unwrap(), 4);
}

#[test]
fn reopening_a_file_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tables.db");

    let table_id = {
        let store = Store::open_path(&path).unwrap();
        let table = Table::create(&store, "Users").unwrap();
        let name = table
            .add_column(&store, "Name", ColumnType::Text, Value::Null)
            .unwrap();
        let row = table.add_row(&store, None).unwrap();
        row.set_cell(&store, name.id, "Alice").unwrap();
        store.close().unwrap();
        table.id
    };

    let store = Store::open_path(&path).unwrap();
    assert_eq!(store.relation_count().unwrap(), 4);

    let table = Table::get(&store, table_id).unwrap().unwrap();
    let data = table.get_data(&store).unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["Name"], "Alice");
}

#[test]
fn scoped_store_is_closed_afterwards() {
    let config = StoreConfig::in_memory();

    let leaked = Store::scoped(&config, |store| {
        Table::create(store, "Scratch")?;
        Ok(store.clone())
    })
    .unwrap();

    assert!(!leaked.is_open());
    assert!(matches!(
        Table::get_all(&leaked),
        Err(EavError::StoreClosed)
    ));
}

#[test]
fn scoped_store_is_closed_on_error() {
    let config = StoreConfig::in_memory();
    let mut seen = None;

    let result: Result<(), EavError> = Store::scoped(&config, |store| {
        seen = Some(store.clone());
        Err(EavError::Config("stop".to_string()))
    });

    assert!(matches!(result, Err(EavError::Config(_))));
    assert!(!seen.unwrap().is_open());
}

#[test]
fn operations_after_close_fail() {
    let store = open_store();
    store.close().unwrap();

    assert!(matches!(
        Table::create(&store, "Late"),
        Err(EavError::StoreClosed)
    ));
}

#[test]
fn transaction_commits_on_success() {
    let store = open_store();

    let table = store
        .transaction(|tx| {
            let table = Table::create(tx, "Inside")?;
            table.add_row(tx, None)?;
            Ok(table)
        })
        .unwrap();

    assert!(Table::get(&store, table.id).unwrap().is_some());
    assert_eq!(table.row_count(&store).unwrap(), 1);
}

#[test]
fn transaction_rolls_back_on_error() {
    let store = open_store();

    let result: Result<(), EavError> = store.transaction(|tx| {
        Table::create(tx, "Doomed")?;
        Err(EavError::Config("abort".to_string()))
    });

    assert!(matches!(result, Err(EavError::Config(_))));
    assert!(Table::get_all(&store).unwrap().is_empty());
}

#[test]
fn using_the_store_inside_its_transaction_fails_fast() {
    let store = open_store();

    let result = store.transaction(|tx| {
        Table::create(tx, "Staged")?;
        Table::create(&store, "Sideways")
    });

    assert!(matches!(result, Err(EavError::TransactionActive)));
    assert!(Table::get_all(&store).unwrap().is_empty());
}

#[test]
fn other_threads_wait_for_the_transaction() {
    let store = open_store();
    let (started_tx, started_rx) = std::sync::mpsc::channel();

    let writer = {
        let store = store.clone();
        std::thread::spawn(move || {
            started_rx.recv().unwrap();
            Table::create(&store, "After").map(|table| table.id)
        })
    };

    let inside = store
        .transaction(|tx| {
            let table = Table::create(tx, "First")?;
            started_tx.send(()).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(20));
            Ok(table.id)
        })
        .unwrap();

    let after = writer.join().unwrap().unwrap();
    assert!(after > inside);
    assert_eq!(Table::get_all(&store).unwrap().len(), 2);
}

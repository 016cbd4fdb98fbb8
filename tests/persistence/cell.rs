use std::{collections::BTreeMap, thread, time::Duration};

use serde::Serialize;
use serde_json::json;
use tessera_engine::EavError;
use tessera_engine::persistence::{Cell, Column, ColumnType, Row, RowId, Store, Table, Value};

use super::open_store;

fn single_cell_table(store: &Store) -> (Table, Column, Row) {
    let table = Table::create(store, "Cells").unwrap();
    let column = table
        .add_column(store, "Data", ColumnType::Text, Value::Null)
        .unwrap();
    let row = table.add_row(store, None).unwrap();
    (table, column, row)
}

#[test]
fn values_round_trip() {
    let store = open_store();
    let (_, column, row) = single_cell_table(&store);

    let values = [
        json!("hello"),
        json!(""),
        json!(42),
        json!(-7),
        json!(2.75),
        json!(true),
        Value::Null,
        json!([1, "two", [3.5, null], { "four": false }]),
        json!({ "name": "Alice", "tags": ["a", "b"], "address": { "zip": "10115" } }),
    ];

    for value in values {
        row.set_cell(&store, column.id, &value).unwrap();

        let stored = row.get_cell(&store, column.id).unwrap().unwrap();
        assert_eq!(stored.value, value);
    }
}

#[test]
fn serializable_structs_are_accepted() {
    #[derive(Serialize)]
    struct Address {
        street: String,
        number: u32,
    }

    let store = open_store();
    let (_, column, row) = single_cell_table(&store);

    let address = Address {
        street: "Main".to_string(),
        number: 5,
    };
    let cell = row.set_cell(&store, column.id, &address).unwrap();

    assert_eq!(cell.value, json!({ "street": "Main", "number": 5 }));
    assert_eq!(
        Cell::get(&store, row.id, column.id).unwrap().unwrap().value,
        cell.value
    );
}

#[test]
fn set_twice_overwrites_one_cell() {
    let store = open_store();
    let (_, column, row) = single_cell_table(&store);

    let first = row.set_cell(&store, column.id, "v1").unwrap();
    thread::sleep(Duration::from_millis(5));
    let second = row.set_cell(&store, column.id, "v2").unwrap();

    assert_eq!(first.id, second.id);
    assert!(second.updated_at > first.updated_at);

    let cells = row.get_all_cells(&store).unwrap();
    assert_eq!(cells.len(), 1);
    assert_eq!(cells[0].value, "v2");
    assert_eq!(cells[0].updated_at, second.updated_at);
}

#[test]
fn explicit_null_and_missing_cell_project_alike() {
    let store = open_store();
    let table = Table::create(&store, "Sparse").unwrap();
    let set_null = table
        .add_column(&store, "SetNull", ColumnType::Text, Value::Null)
        .unwrap();
    let never_set = table
        .add_column(&store, "NeverSet", ColumnType::Text, Value::Null)
        .unwrap();
    let row = table.add_row(&store, None).unwrap();

    row.set_cell(&store, set_null.id, &Value::Null).unwrap();

    let data = table.get_data(&store).unwrap();
    assert_eq!(data[0]["SetNull"], Value::Null);
    assert_eq!(data[0]["NeverSet"], Value::Null);

    let persisted = Cell::get(&store, row.id, set_null.id).unwrap();
    assert_eq!(persisted.map(|cell| cell.value), Some(Value::Null));
    assert!(Cell::get(&store, row.id, never_set.id).unwrap().is_none());
}

#[test]
fn none_is_stored_as_null() {
    let store = open_store();
    let (_, column, row) = single_cell_table(&store);

    let cell = row.set_cell(&store, column.id, &None::<String>).unwrap();

    assert_eq!(cell.value, Value::Null);
    assert!(row.get_cell(&store, column.id).unwrap().is_some());
}

#[test]
fn plain_insert_collides_with_existing_cell() {
    let store = open_store();
    let (_, column, row) = single_cell_table(&store);

    Cell::insert(&store, row.id, column.id, "first").unwrap();
    let result = Cell::insert(&store, row.id, column.id, "second");

    assert!(matches!(result, Err(EavError::ConstraintViolation(_))));
    assert_eq!(
        Cell::get(&store, row.id, column.id).unwrap().unwrap().value,
        "first"
    );
}

#[test]
fn unserializable_values_are_rejected() {
    let store = open_store();
    let (_, column, row) = single_cell_table(&store);

    let mut keyed_by_pairs = BTreeMap::new();
    keyed_by_pairs.insert((1, 2), "pair");

    let result = row.set_cell(&store, column.id, &keyed_by_pairs);

    assert!(matches!(result, Err(EavError::Serialization(_))));
    assert!(row.get_all_cells(&store).unwrap().is_empty());
}

#[test]
fn non_finite_floats_are_rejected() {
    let store = open_store();
    let (_, column, row) = single_cell_table(&store);

    for number in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let result = row.set_cell(&store, column.id, &number);
        assert!(matches!(result, Err(EavError::Serialization(_))));
    }

    let nested = json!({ "ok": 1.5 });
    let result = row.set_cell(&store, column.id, &(nested, vec![0.0, f64::NAN]));
    assert!(matches!(result, Err(EavError::Serialization(_))));

    assert!(row.get_all_cells(&store).unwrap().is_empty());
    assert!(Cell::get(&store, row.id, column.id).unwrap().is_none());
}

#[test]
fn cell_for_missing_row_is_rejected() {
    let store = open_store();
    let (_, column, _) = single_cell_table(&store);

    let result = Cell::set(&store, RowId(5_000), column.id, "lost");

    assert!(matches!(result, Err(EavError::ConstraintViolation(_))));
}

#[test]
fn cells_are_listed_per_row() {
    let store = open_store();
    let table = Table::create(&store, "Grid").unwrap();
    let columns: Vec<Column> = ["A", "B", "C"]
        .iter()
        .map(|name| {
            table
                .add_column(&store, name, ColumnType::Number, Value::Null)
                .unwrap()
        })
        .collect();
    let top = table.add_row(&store, None).unwrap();
    let bottom = table.add_row(&store, None).unwrap();

    for (index, column) in columns.iter().enumerate() {
        top.set_cell(&store, column.id, &index).unwrap();
    }
    bottom.set_cell(&store, columns[0].id, &100).unwrap();

    assert_eq!(Cell::get_by_row(&store, top.id).unwrap().len(), 3);
    assert_eq!(Cell::get_by_row(&store, bottom.id).unwrap().len(), 1);
    assert_eq!(Cell::get_by_column(&store, columns[0].id).unwrap().len(), 2);
}

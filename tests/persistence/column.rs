use serde_json::json;
use tessera_engine::EavError;
use tessera_engine::persistence::{Column, ColumnId, ColumnType, Table, TableId, Value};

use super::open_store;

#[test]
fn columns_come_back_in_creation_order() {
    let store = open_store();
    let table = Table::create(&store, "Orders").unwrap();

    for name in ["Id", "Customer", "Total", "Shipped"] {
        table
            .add_column(&store, name, ColumnType::Text, Value::Null)
            .unwrap();
    }

    let names: Vec<String> = table
        .get_columns(&store)
        .unwrap()
        .into_iter()
        .map(|column| column.name)
        .collect();

    assert_eq!(names, vec!["Id", "Customer", "Total", "Shipped"]);
}

#[test]
fn type_and_options_round_trip() {
    let store = open_store();
    let teams = Table::create(&store, "Teams").unwrap();
    let users = Table::create(&store, "Users").unwrap();

    let cases = [
        (ColumnType::Text, Value::Null),
        (ColumnType::Number, json!({ "min": 0, "max": 120.5 })),
        (ColumnType::Boolean, json!(false)),
        (ColumnType::Date, json!({ "format": "%Y-%m-%d" })),
        (ColumnType::reference(teams.id), json!({ "display": ["Name"] })),
        (ColumnType::Custom("currency".to_string()), json!("EUR")),
    ];

    for (column_type, options) in cases {
        let created = users
            .add_column(&store, "Field", column_type.clone(), options.clone())
            .unwrap();

        let loaded = Column::get(&store, created.id).unwrap().unwrap();

        assert_eq!(loaded.column_type, column_type);
        assert_eq!(loaded.options, options);
        assert_eq!(loaded, created);
    }
}

#[test]
fn references_are_not_checked() {
    let store = open_store();
    let table = Table::create(&store, "Links").unwrap();
    let target = table
        .add_column(&store, "Target", ColumnType::reference(TableId(12_345)), Value::Null)
        .unwrap();
    let row = table.add_row(&store, None).unwrap();

    let cell = row.set_cell(&store, target.id, &987_654).unwrap();

    assert_eq!(cell.value, json!(987_654));
}

#[test]
fn column_in_missing_table_is_rejected() {
    let store = open_store();

    let result = Column::create(&store, TableId(3), "Orphan", ColumnType::Text, Value::Null);

    assert!(matches!(result, Err(EavError::ConstraintViolation(_))));
}

#[test]
fn get_unknown_column_is_none() {
    let store = open_store();

    assert!(Column::get(&store, ColumnId(1)).unwrap().is_none());
    assert!(Column::get_by_table(&store, TableId(1)).unwrap().is_empty());
}

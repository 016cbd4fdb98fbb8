use tessera_engine::EavError;
use tessera_engine::persistence::{Cell, ColumnType, Row, RowId, Table, TableId, Value};

use super::open_store;

fn positions(rows: &[Row]) -> Vec<i64> {
    rows.iter().map(|row| row.position).collect()
}

#[test]
fn appended_rows_count_up_from_zero() {
    let store = open_store();
    let table = Table::create(&store, "Log").unwrap();

    let created: Vec<Row> = (0..3).map(|_| table.add_row(&store, None).unwrap()).collect();

    assert_eq!(positions(&created), vec![0, 1, 2]);
    assert_eq!(table.get_rows(&store).unwrap(), created);
}

#[test]
fn rows_are_ordered_by_explicit_position() {
    let store = open_store();
    let table = Table::create(&store, "Ranked").unwrap();

    for position in [7, -3, 42, 0] {
        table.add_row(&store, Some(position)).unwrap();
    }

    assert_eq!(positions(&table.get_rows(&store).unwrap()), vec![-3, 0, 7, 42]);
}

#[test]
fn equal_positions_keep_creation_order() {
    let store = open_store();
    let table = Table::create(&store, "Ties").unwrap();

    let first = table.add_row(&store, Some(5)).unwrap();
    let second = table.add_row(&store, Some(5)).unwrap();
    let before = table.add_row(&store, Some(1)).unwrap();

    let ids: Vec<RowId> = table.get_rows(&store).unwrap().iter().map(|r| r.id).collect();

    assert_eq!(ids, vec![before.id, first.id, second.id]);
}

#[test]
fn appended_position_uses_the_row_count() {
    let store = open_store();
    let table = Table::create(&store, "Gaps").unwrap();
    let first = table.add_row(&store, None).unwrap();
    table.add_row(&store, None).unwrap();
    let third = table.add_row(&store, None).unwrap();

    first.delete(&store).unwrap();
    let appended = table.add_row(&store, None).unwrap();

    // two rows remain, so the new row lands on position 2 next to the old third row
    assert_eq!(appended.position, 2);
    assert_eq!(appended.position, third.position);
    assert_eq!(
        table.get_rows(&store).unwrap().last().map(|r| r.id),
        Some(appended.id)
    );
}

#[test]
fn rows_are_scoped_to_their_table() {
    let store = open_store();
    let left = Table::create(&store, "Left").unwrap();
    let right = Table::create(&store, "Right").unwrap();

    left.add_row(&store, None).unwrap();
    let right_row = right.add_row(&store, None).unwrap();

    assert_eq!(right_row.position, 0);
    assert_eq!(Row::get_by_table(&store, left.id).unwrap().len(), 1);
    assert_eq!(Row::get(&store, right_row.id).unwrap(), Some(right_row));
}

#[test]
fn row_in_missing_table_is_rejected() {
    let store = open_store();

    let result = Row::create(&store, TableId(77), None);

    assert!(matches!(result, Err(EavError::ConstraintViolation(_))));
}

#[test]
fn deleting_a_row_removes_its_cells() {
    let store = open_store();
    let table = Table::create(&store, "Contacts").unwrap();
    let email = table
        .add_column(&store, "Email", ColumnType::Text, Value::Null)
        .unwrap();
    let row = table.add_row(&store, None).unwrap();
    let other = table.add_row(&store, None).unwrap();
    row.set_cell(&store, email.id, "a@example.com").unwrap();
    other.set_cell(&store, email.id, "b@example.com").unwrap();
    let row_id = row.id;

    assert!(row.delete(&store).unwrap());

    assert!(Row::get(&store, row_id).unwrap().is_none());
    assert!(Cell::get(&store, row_id, email.id).unwrap().is_none());
    assert_eq!(Cell::get_by_column(&store, email.id).unwrap().len(), 1);
}

#[test]
fn row_cell_accessors() {
    let store = open_store();
    let table = Table::create(&store, "Pets").unwrap();
    let kind = table
        .add_column(&store, "Kind", ColumnType::Text, Value::Null)
        .unwrap();
    let legs = table
        .add_column(&store, "Legs", ColumnType::Number, Value::Null)
        .unwrap();
    let row = table.add_row(&store, None).unwrap();

    assert!(row.get_cell(&store, kind.id).unwrap().is_none());

    row.set_cell(&store, kind.id, "cat").unwrap();
    row.set_cell(&store, legs.id, &4).unwrap();

    assert_eq!(row.get_cell(&store, kind.id).unwrap().unwrap().value, "cat");
    assert_eq!(row.get_all_cells(&store).unwrap().len(), 2);
}

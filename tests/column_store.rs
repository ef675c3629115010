use coretable::{
    CellValue, ColumnStore, Row, column_store_to_rows, make_key_fn, make_row_from_column_store,
    rows_to_column_store,
};
use proptest::prelude::*;

fn cell_strategy() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        (-1.0e6f64..1.0e6).prop_map(CellValue::Number),
        "[a-zA-Z ]{0,8}".prop_map(CellValue::String),
    ]
}

fn rectangular_rows() -> impl Strategy<Value = Vec<Row>> {
    (1usize..5, 0usize..12).prop_flat_map(|(columns, rows)| {
        proptest::collection::vec(
            proptest::collection::vec(cell_strategy(), columns),
            rows,
        )
        .prop_map(move |grid| {
            grid.into_iter()
                .map(|cells| {
                    cells
                        .into_iter()
                        .enumerate()
                        .map(|(idx, cell)| (format!("col{idx}"), cell))
                        .collect::<Row>()
                })
                .collect::<Vec<_>>()
        })
    })
}

fn ragged_store() -> impl Strategy<Value = ColumnStore> {
    proptest::collection::vec(
        proptest::collection::vec(proptest::option::of(cell_strategy()), 0..8),
        1..5,
    )
    .prop_map(|columns| {
        columns
            .into_iter()
            .enumerate()
            .map(|(idx, column)| (format!("s{idx}"), column))
            .collect::<ColumnStore>()
    })
}

proptest! {
    #[test]
    fn rectangular_rows_round_trip(rows in rectangular_rows()) {
        let store = rows_to_column_store(&rows);
        for column in store.values() {
            prop_assert_eq!(column.len(), rows.len());
        }
        prop_assert_eq!(column_store_to_rows(&store), rows);
    }

    #[test]
    fn first_column_sets_row_count(store in ragged_store()) {
        let rows = column_store_to_rows(&store);
        let first_len = store.values().next().map_or(0, Vec::len);
        prop_assert_eq!(rows.len(), first_len);
        for (idx, row) in rows.iter().enumerate() {
            for (slug, column) in &store {
                prop_assert_eq!(row.get(slug), column.get(idx).and_then(Option::as_ref));
            }
            prop_assert_eq!(row, &make_row_from_column_store(idx, &store));
        }
    }
}

#[test]
fn key_fn_matches_documented_example() {
    let key = make_key_fn(&["a".to_string(), "b".to_string()]);
    let row = [("a", "x"), ("b", "y"), ("c", "z")]
        .into_iter()
        .map(|(slug, value)| (slug.to_string(), CellValue::from(value)))
        .collect::<Row>();
    assert_eq!(key(&row), "x y");
}

#[test]
fn store_order_is_preserved_in_rows() {
    let mut store = ColumnStore::new();
    store.insert("zeta".to_string(), vec![Some(CellValue::from("z"))]);
    store.insert("alpha".to_string(), vec![Some(CellValue::from("a"))]);
    let rows = column_store_to_rows(&store);
    assert_eq!(rows[0].keys().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
}

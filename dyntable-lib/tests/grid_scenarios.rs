//! End-to-end grid scenarios against the in-memory host.
//!
//! Run with: `cargo test -p dyntable-lib --test grid_scenarios`

use std::collections::HashSet;
use std::sync::Arc;

use dyntable_lib::DynamicTable;
use dyntable_lib::cell::CellView;
use dyntable_lib::cell::SaveState;
use dyntable_lib::error::EditError;
use dyntable_lib::error::SchemaError;
use dyntable_lib::events::GridEvent;
use dyntable_lib::host::GridHost;
use dyntable_lib::host::InMemoryHost;
use dyntable_lib::model::ColumnDefinition;
use dyntable_lib::model::ColumnType;
use dyntable_lib::model::Row;
use dyntable_lib::model::TableSchema;
use dyntable_lib::model::Value;
use dyntable_lib::query::FilterSpec;
use dyntable_lib::query::SortDirection;
use dyntable_lib::reference::ReferencedTable;
use dyntable_lib::reference::TableCatalog;
use dyntable_lib::rows::IdScheme;
use dyntable_lib::rows::RowTemplate;
use dyntable_lib::schema_editor::InsertAt;
use dyntable_lib::schema_editor::NewColumn;

fn lease_schema() -> TableSchema {
    TableSchema::new(
        "lease",
        "Leases",
        vec![
            ColumnDefinition::new("c1", "id", "ID", ColumnType::String),
            ColumnDefinition::new("c2", "customer", "Customer", ColumnType::String),
            ColumnDefinition::new("c3", "term", "Term", ColumnType::Number),
            ColumnDefinition::new("c4", "approved", "Approved", ColumnType::Boolean),
            ColumnDefinition::new("c5", "lender_id", "Lender", ColumnType::String).references("lender", Some("name")),
        ],
    )
}

fn lease_rows() -> Vec<Row> {
    vec![
        Row::new()
            .set("id", "D1")
            .set("customer", "Acme Corp")
            .set("term", 36)
            .set("approved", true)
            .set("lender_id", "L-1"),
        Row::new()
            .set("id", "D2")
            .set("customer", "Beta LLC")
            .set("term", 48)
            .set("approved", false)
            .set("lender_id", "L-999"),
        Row::new()
            .set("id", "D3")
            .set("customer", "Acme Holdings")
            .set("term", 36)
            .set("approved", false)
            .set("lender_id", "L-2"),
    ]
}

fn catalog() -> Arc<TableCatalog> {
    let lenders = TableSchema::new(
        "lender",
        "Lenders",
        vec![
            ColumnDefinition::new("l1", "id", "ID", ColumnType::String),
            ColumnDefinition::new("l2", "name", "Name", ColumnType::String),
        ],
    );
    let catalog = TableCatalog::new();
    catalog.insert(ReferencedTable::new(
        lenders,
        vec![
            Row::new().set("id", "L-1").set("name", "Ally Bank"),
            Row::new().set("id", "L-2").set("name", "Key Equipment"),
        ],
    ));
    Arc::new(catalog)
}

fn grid() -> DynamicTable {
    DynamicTable::new(lease_schema(), lease_rows()).with_catalog(catalog())
}

fn ids(rows: &[Row]) -> Vec<String> {
    rows.iter().map(|r| r.id("id")).collect()
}

// =============================================================================
// Filter and sort
// =============================================================================

mod query {
    use super::*;

    #[test]
    fn test_filters_do_not_mutate_rows() {
        let mut grid = grid();
        let before = grid.rows().to_vec();

        grid.add_filter(FilterSpec::new("customer", "Acme"));
        assert_eq!(ids(&grid.visible_rows()), vec!["D1", "D3"]);
        assert_eq!(grid.rows(), before.as_slice());

        grid.clear_all_filters();
        assert_eq!(grid.visible_rows(), before);
    }

    #[test]
    fn test_excluded_rows_never_reappear_after_sort() {
        let mut grid = grid();
        grid.add_filter(FilterSpec::new("term", 36));
        grid.toggle_sort("customer");
        grid.toggle_sort("customer");

        let visible = grid.visible_rows();
        assert_eq!(ids(&visible), vec!["D3", "D1"]);
        assert!(visible.iter().all(|r| r.value("term") == &Value::from(36)));
    }

    #[test]
    fn test_multi_column_sort() {
        let schema = TableSchema::new(
            "t",
            "T",
            vec![
                ColumnDefinition::new("c0", "id", "ID", ColumnType::String),
                ColumnDefinition::new("c1", "a", "A", ColumnType::Number),
                ColumnDefinition::new("c2", "b", "B", ColumnType::Number),
            ],
        );
        let rows = vec![
            Row::new().set("id", "r1").set("a", 1).set("b", 2),
            Row::new().set("id", "r2").set("a", 1).set("b", 1),
            Row::new().set("id", "r3").set("a", 2).set("b", 0),
        ];
        let mut grid = DynamicTable::new(schema, rows);
        grid.toggle_sort("a");
        grid.toggle_sort("b");

        assert_eq!(grid.get_sort("b"), Some((SortDirection::Asc, 1)));
        assert_eq!(ids(&grid.visible_rows()), vec!["r2", "r1", "r3"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let mut grid = grid();
        grid.toggle_sort("term");
        assert_eq!(ids(&grid.visible_rows()), vec!["D1", "D3", "D2"]);
    }

    #[test]
    fn test_filter_then_remove_column() {
        let mut grid = grid();
        let host = InMemoryHost::new();
        grid.add_filter(FilterSpec::new("approved", true));
        grid.toggle_sort("approved");

        grid.remove_column(&host, "c4").unwrap();

        assert!(grid.filters().is_empty());
        assert!(grid.sorts().is_empty());
        assert_eq!(grid.visible_rows().len(), 3);
    }
}

// =============================================================================
// Row lifecycle
// =============================================================================

mod rows {
    use super::*;

    fn assert_unique(rows: &[Row]) {
        let set: HashSet<String> = ids(rows).into_iter().collect();
        assert_eq!(set.len(), rows.len());
    }

    #[test]
    fn test_primary_keys_stay_unique() {
        let mut grid = grid();
        let host = InMemoryHost::new();

        grid.add_row(&host).unwrap();
        grid.copy_row(&host, "D1").unwrap();
        grid.copy_row(&host, "D1").unwrap();
        grid.add_row(&host).unwrap();

        assert_eq!(grid.rows().len(), 7);
        assert_unique(grid.rows());
        assert_eq!(host.rows().unwrap(), grid.rows());
    }

    #[test]
    fn test_sequential_template_fills_gap_above_max() {
        let schema = TableSchema::new(
            "fpc",
            "Fee codes",
            vec![
                ColumnDefinition::new("c1", "code_id", "Code", ColumnType::String),
                ColumnDefinition::new("c2", "label", "Label", ColumnType::String),
            ],
        );
        let rows = ["FPC01", "FPC02", "FPC04"]
            .into_iter()
            .map(|id| Row::new().set("code_id", id).set("label", "fee"))
            .collect();
        let host = InMemoryHost::new();
        let mut grid =
            DynamicTable::new(schema, rows).with_template(RowTemplate::new(IdScheme::sequential("FPC")));

        grid.add_row(&host).unwrap();
        assert_eq!(grid.rows().last().unwrap().id("code_id"), "FPC05");
    }

    #[test]
    fn test_delete_publishes_selection() {
        let mut grid = grid();
        let host = InMemoryHost::new();
        let mut events = grid.events().subscribe();

        grid.toggle_selection(&host, "D2");
        grid.delete_row(&host, "D2").unwrap();

        assert!(host.selection().is_empty());
        let mut seen = Vec::new();
        while let Ok(event) = events.try_recv() {
            seen.push(event);
        }
        assert!(matches!(seen.last(), Some(GridEvent::SelectionChanged { selected, .. }) if selected.is_empty()));
        assert!(seen.iter().any(|e| matches!(e, GridEvent::DataChanged { row_count: 2, .. })));
    }
}

// =============================================================================
// Schema editing
// =============================================================================

mod schema {
    use super::*;

    #[test]
    fn test_primary_key_cannot_be_removed() {
        let mut grid = grid();
        let host = InMemoryHost::new();
        let before = grid.schema().clone();

        let result = grid.remove_column(&host, "c1");

        assert!(matches!(result, Err(SchemaError::PrimaryKeyRemoval { .. })));
        assert_eq!(grid.schema(), &before);
    }

    #[test]
    fn test_id_column_cannot_take_over_primary_key() {
        let schema = TableSchema::new(
            "deal",
            "Deals",
            vec![
                ColumnDefinition::new("d1", "deal_id", "Deal", ColumnType::String),
                ColumnDefinition::new("d2", "customer", "Customer", ColumnType::String),
            ],
        );
        let rows = vec![Row::new().set("deal_id", "FPC01").set("customer", "Acme Corp")];
        let mut grid = DynamicTable::new(schema, rows);
        let host = InMemoryHost::new();
        let before = grid.schema().clone();

        let id = ColumnDefinition::new("", "id", "ID", ColumnType::String);
        let result = grid.add_column(&host, NewColumn::Defined(id), InsertAt::End);

        assert_eq!(
            result,
            Err(SchemaError::PrimaryKeyConflict {
                current: "deal_id".into(),
                candidate: "id".into(),
            })
        );
        assert_eq!(grid.schema(), &before);
        assert_eq!(grid.primary_key().as_deref(), Some("deal_id"));
        assert_eq!(grid.row("FPC01").unwrap().value("customer"), &Value::from("Acme Corp"));
        assert!(host.schema().is_none());
    }

    #[test]
    fn test_reference_column_is_derived_and_read_only() {
        let mut grid = grid();
        let host = InMemoryHost::new();

        grid.add_column(&host, NewColumn::reference("lender", "name"), InsertAt::End)
            .unwrap();

        let column = grid.schema().column("lender_name").unwrap().clone();
        assert_eq!(column.source_table.as_deref(), Some("lender"));
        assert!(!grid.is_editable("lender_name"));
        assert_eq!(host.schema().unwrap().len(), 6);
    }
}

// =============================================================================
// Cells
// =============================================================================

mod cells {
    use super::*;

    #[test]
    fn test_broken_reference_degrades_to_raw_value() {
        let grid = grid();
        let row = grid.row("D2").unwrap().clone();
        assert_eq!(grid.render_cell(&row, "lender_id").text(), "L-999");

        let row = grid.row("D1").unwrap().clone();
        assert_eq!(grid.render_cell(&row, "lender_id").text(), "Ally Bank");
    }

    #[test]
    fn test_cancel_is_a_no_op() {
        let mut grid = grid();
        let before = grid.rows().to_vec();

        grid.begin_edit("D1", "term").unwrap();
        grid.stage_input("72").unwrap();
        grid.cancel_edit();

        assert_eq!(grid.rows(), before.as_slice());
    }

    #[test]
    fn test_reference_edit_rejects_unknown_id() {
        let mut grid = grid();
        grid.begin_edit("D1", "lender_id").unwrap();
        assert!(matches!(
            grid.stage_value(Value::from("L-404")),
            Err(EditError::UnknownReference { .. })
        ));
        grid.stage_value(Value::from("L-2")).unwrap();
        assert!(matches!(grid.render_cell(grid.row("D1").unwrap(), "lender_id"), CellView::Reference { .. }));
    }

    #[tokio::test]
    async fn test_failed_save_restores_previous_value() {
        let mut grid = grid();
        let host = InMemoryHost::new();
        host.fail_saves("service unavailable");

        grid.begin_edit("D1", "customer").unwrap();
        grid.stage_input("Acme Renamed").unwrap();
        let result = grid.save_edit(&host).await;

        assert!(matches!(result, Err(EditError::Persist(_))));
        assert_eq!(grid.row("D1").unwrap().value("customer"), &Value::from("Acme Corp"));
        assert_eq!(host.save_calls(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_saves_on_different_cells() {
        let mut grid = grid();
        let host = InMemoryHost::new();
        host.fail_cell("D2", "term", "locked");

        grid.begin_edit("D1", "term").unwrap();
        grid.stage_input("24").unwrap();
        let mut first = grid.begin_save().unwrap();
        grid.begin_edit("D2", "term").unwrap();
        grid.stage_input("12").unwrap();
        let mut second = grid.begin_save().unwrap();
        assert_eq!(grid.pending_saves().count(), 2);

        let (r1, r2) = futures::join!(
            host.save_cell(first.row_id(), first.column_key(), first.value()),
            host.save_cell(second.row_id(), second.column_key(), second.value()),
        );

        assert_eq!(grid.complete_save(&mut first, r1), Ok(SaveState::Committed));
        assert!(grid.complete_save(&mut second, r2).is_err());
        assert_eq!(first.state(), SaveState::Committed);
        assert_eq!(second.state(), SaveState::RolledBack);
        assert_eq!(grid.pending_saves().count(), 0);
        assert_eq!(grid.row("D1").unwrap().value("term"), &Value::from(24));
        assert_eq!(grid.row("D2").unwrap().value("term"), &Value::from(48));
    }

    #[tokio::test]
    async fn test_successful_save_is_visible_through_filters() {
        let mut grid = grid();
        let host = InMemoryHost::new();
        grid.add_filter(FilterSpec::new("term", 60));
        assert!(grid.visible_rows().is_empty());

        grid.begin_edit("D2", "term").unwrap();
        grid.stage_input("60").unwrap();
        assert_eq!(grid.save_edit(&host).await, Ok(SaveState::Committed));

        assert_eq!(ids(&grid.visible_rows()), vec!["D2"]);
    }
}

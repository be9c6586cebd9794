//! Read-only cell rendering.

use serde::Serialize;

use super::format_number;
use crate::config::NumberFormat;
use crate::model::ColumnDefinition;
use crate::model::ColumnType;
use crate::model::EditorKind;
use crate::model::Row;
use crate::model::Value;
use crate::reference::TableCatalog;

/// Color of a yes/no badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BadgeTone {
    /// Green.
    Positive,
    /// Red.
    Negative,
}

/// What a cell shows when it is not being edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CellView {
    /// Nothing to show.
    Empty,
    /// Plain text.
    Text { text: String },
    /// Locale-formatted number.
    Number { text: String },
    /// Yes/No badge for boolean columns.
    Badge { label: String, tone: BadgeTone },
    /// Foreign-key value with its resolved label.
    Reference { label: String, raw: String, resolved: bool },
}

impl CellView {
    /// Returns the text a plain renderer would print for this cell.
    pub fn text(&self) -> &str {
        match self {
            CellView::Empty => "",
            CellView::Text { text } | CellView::Number { text } => text,
            CellView::Badge { label, .. } | CellView::Reference { label, .. } => label,
        }
    }
}

/// Renders the read view of one cell.
pub fn render_cell(row: &Row, column: &ColumnDefinition, catalog: &TableCatalog, format: &NumberFormat) -> CellView {
    let value = row.value(&column.key);

    if let Some(source) = &column.source_table {
        if value.is_null() {
            return CellView::Empty;
        }
        let raw = value.key_string();
        let label = catalog.resolve(source, value, column.display_column.as_deref());
        let resolved = column.display_column.is_some() && catalog.contains(source, &raw);
        return CellView::Reference { label, raw, resolved };
    }

    if let EditorKind::Select { options } = column.editor_kind() {
        if let Some(option) = options.iter().find(|o| &o.value == value) {
            return CellView::Text {
                text: option.label.clone(),
            };
        }
    }

    match (column.column_type, value) {
        (_, Value::Null) => CellView::Empty,
        (ColumnType::Boolean, Value::Bool(b)) => CellView::Badge {
            label: if *b { "Yes" } else { "No" }.to_string(),
            tone: if *b { BadgeTone::Positive } else { BadgeTone::Negative },
        },
        (ColumnType::Number, Value::Number(n)) => CellView::Number {
            text: format_number(*n, format),
        },
        (_, other) => CellView::Text {
            text: other.key_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SelectOption;
    use crate::model::TableSchema;
    use crate::reference::ReferencedTable;

    fn catalog() -> TableCatalog {
        let catalog = TableCatalog::new();
        catalog.insert(ReferencedTable::new(
            TableSchema::new(
                "lender",
                "Lenders",
                vec![
                    ColumnDefinition::new("l1", "id", "ID", ColumnType::String),
                    ColumnDefinition::new("l2", "name", "Name", ColumnType::String),
                ],
            ),
            vec![Row::new().set("id", "L-1").set("name", "Ally Bank")],
        ));
        catalog
    }

    #[test]
    fn test_boolean_badge() {
        let column = ColumnDefinition::new("c", "approved", "Approved", ColumnType::Boolean);
        let view = render_cell(&Row::new().set("approved", true), &column, &catalog(), &NumberFormat::default());
        assert_eq!(
            view,
            CellView::Badge {
                label: "Yes".into(),
                tone: BadgeTone::Positive
            }
        );
        let view = render_cell(&Row::new().set("approved", false), &column, &catalog(), &NumberFormat::default());
        assert_eq!(view.text(), "No");
    }

    #[test]
    fn test_number_is_formatted() {
        let column = ColumnDefinition::new("c", "amount", "Amount", ColumnType::Number);
        let view = render_cell(&Row::new().set("amount", 32500), &column, &catalog(), &NumberFormat::default());
        assert_eq!(view.text(), "32,500");
    }

    #[test]
    fn test_reference_resolution_and_degradation() {
        let column = ColumnDefinition::new("c", "lender_id", "Lender", ColumnType::String)
            .references("lender", Some("name"));

        let view = render_cell(&Row::new().set("lender_id", "L-1"), &column, &catalog(), &NumberFormat::default());
        assert_eq!(
            view,
            CellView::Reference {
                label: "Ally Bank".into(),
                raw: "L-1".into(),
                resolved: true
            }
        );

        let view = render_cell(&Row::new().set("lender_id", "L-999"), &column, &catalog(), &NumberFormat::default());
        assert_eq!(
            view,
            CellView::Reference {
                label: "L-999".into(),
                raw: "L-999".into(),
                resolved: false
            }
        );
    }

    #[test]
    fn test_select_shows_option_label() {
        let column = ColumnDefinition::new("c", "status", "Status", ColumnType::String).editor(EditorKind::Select {
            options: vec![SelectOption::new("open", "Open"), SelectOption::new("closed", "Closed")],
        });
        let view = render_cell(&Row::new().set("status", "closed"), &column, &catalog(), &NumberFormat::default());
        assert_eq!(view.text(), "Closed");
        let view = render_cell(&Row::new(), &column, &catalog(), &NumberFormat::default());
        assert_eq!(view, CellView::Empty);
    }
}

//! Filter and sort engines.
//!
//! Both engines are pure derivations over a row snapshot:
//!
//! - [`filter_rows`] keeps the rows matching every active [`FilterSpec`]
//! - [`sort_rows`] orders rows by the entries of a [`SortSpec`]
//!
//! [`view_rows`] composes them in the only valid order, filter then sort.

mod filter;
mod order;

pub use filter::FilterSet;
pub use filter::FilterSpec;
pub use filter::filter_rows;
pub use order::SortDirection;
pub use order::SortEntry;
pub use order::SortSpec;
pub use order::sort_rows;

use crate::config::StringMatch;
use crate::model::Row;
use crate::model::TableSchema;

/// Filters then sorts a row snapshot.
pub fn view_rows(
    rows: &[Row],
    schema: &TableSchema,
    filters: &FilterSet,
    sorts: &SortSpec,
    string_match: StringMatch,
) -> Vec<Row> {
    let mut rows = filter_rows(rows, filters, schema, string_match);
    sort_rows(&mut rows, sorts, schema);
    rows
}

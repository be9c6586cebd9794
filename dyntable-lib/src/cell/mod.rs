//! Cell rendering and editing.
//!
//! A cell is either displayed ([`render_cell`]) or, for the one cell with an
//! open [`EditSession`], shown as an [`EditControl`]. Saving goes through the
//! optimistic [`PendingSave`] lifecycle driven by
//! [`DynamicTable`](crate::grid::DynamicTable).

mod edit;
mod format;
mod save;
mod view;

pub use edit::*;
pub use format::format_number;
pub use save::*;
pub use view::*;

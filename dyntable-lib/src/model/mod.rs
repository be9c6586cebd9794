//! Table model: values, rows, columns and schemas

mod column;
mod row;
mod schema;
mod value;

pub use column::*;
pub use row::*;
pub use schema::*;
pub use value::*;

//! List query composition
//!
//! The store driver executes a `ListQuery` as
//! `SELECT ... FROM <table> WHERE <condition> ORDER BY <sort>` and applies
//! its own pagination.

mod ast;
mod list;

pub use ast::{SortDirection, SortSpec};
pub use list::{build_list_query, build_list_query_at, ListOptions, ListQuery};

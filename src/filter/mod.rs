//! Filter and search compilation
//!
//! Untyped admin input (filter maps, operator tokens, search terms) is
//! compiled into parameterized `CompiledCondition`s. Column names come only
//! from reflected schema; every user-supplied value is bound.

mod compiler;
mod condition;
mod dialect;
mod grammar;
mod operator;
mod search;
mod spec;

pub use compiler::{compile_filters, FilterCompiler};
pub use condition::{BoundValue, CompiledCondition};
pub use dialect::{escape_like_pattern, Dialect};
pub use grammar::{build_condition, OperatorGrammar};
pub use operator::{ControlToken, TemporalOp, TextMatch};
pub use search::{compile_search, SearchCompiler};
pub use spec::{FieldFilter, FilterEntry, FilterSpec};

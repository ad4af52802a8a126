//! SQL text → AST: lexer, cursor utilities, and per-construct parsers.
//!
//! The umbrella entry points are [`parse`] (process-default dialect) and
//! [`parse_with`]; per-statement entry points ([`parse_select`],
//! [`parse_insert`], …) and [`parse_expr_chain`] accept one production on
//! its own. Parsers are pure functions of their input text plus the
//! dialect; they hold no state across calls. Dialect affects only quoted
//! identifiers and bind-parameter markers — the grammar itself is one
//! canonical SQL.

pub mod cursor;
mod ddl;
mod expr;
pub mod lexer;
pub mod metrics;
mod parser;
pub mod span;

pub use cursor::Cursor;
pub use lexer::Lexer;
pub use parser::{
    parse, parse_alter_table, parse_create_index, parse_create_table, parse_delete,
    parse_expr_chain, parse_insert, parse_merge, parse_select, parse_update, parse_values,
    parse_with,
};
pub use span::{LexicalSpan, SpanKind};

//! sqlforge: a bidirectional SQL text ⇄ AST engine.
//!
//! Parse dialect-flavored SQL into a composable tree, inspect or rewrite
//! it, and format it back to normalized, indented text:
//!
//! ```
//! use sqlforge::{parse, format};
//!
//! let stmt = parse("select id, name from users where active = 1").unwrap();
//! assert_eq!(
//!     format(&stmt),
//!     "SELECT\n    id,\n    name\nFROM users\nWHERE active = 1"
//! );
//! ```
//!
//! Dialect differences are confined to identifier quoting and bind-marker
//! style; see [`dialect`]. Parameter and table collection ride along on
//! the tree: [`ast::Statement::parameters`],
//! [`ast::Statement::physical_tables`], and friends.

pub use sqlforge_ast as ast;
pub use sqlforge_ast::dialect;
pub use sqlforge_ast::{Expr, ExprChain, Statement};
pub use sqlforge_error::{ForgeError, ForgeResult};
pub use sqlforge_format::{format, format_with, format_with_parameters, render};
pub use sqlforge_parser::{
    parse, parse_alter_table, parse_create_index, parse_create_table, parse_delete,
    parse_expr_chain, parse_insert, parse_merge, parse_select, parse_update, parse_values,
    parse_with,
};

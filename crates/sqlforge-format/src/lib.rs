//! AST → SQL text: token emission glue and the indenting renderer.

pub mod render;

use sqlforge_ast::dialect::{default_dialect, Dialect};
use sqlforge_ast::{Parameter, Statement};
use tracing::trace;

pub use render::render;

/// Format a statement using the process-default dialect.
#[must_use]
pub fn format(statement: &Statement) -> String {
    format_with(statement, &default_dialect())
}

/// Format a statement with an explicit dialect.
#[must_use]
pub fn format_with(statement: &Statement, dialect: &Dialect) -> String {
    let tokens = statement.tokens(dialect);
    trace!(tokens = tokens.len(), "rendering statement");
    render(&tokens)
}

/// Format a statement and return the bind parameters it references, in
/// first-appearance order.
#[must_use]
pub fn format_with_parameters(
    statement: &Statement,
    dialect: &Dialect,
) -> (String, Vec<Parameter>) {
    (format_with(statement, dialect), statement.parameters())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlforge_ast::{Expr, ExprChain, SelectItem, SelectQuery};

    #[test]
    fn parameters_ride_along_with_the_text() {
        let mut query = SelectQuery {
            items: vec![SelectItem::bare(Expr::column("a"))],
            ..SelectQuery::default()
        };
        let mut cond = ExprChain::solo(Expr::column("id"));
        cond.push(
            sqlforge_ast::ChainOp::Eq,
            Expr::Bind(sqlforge_ast::Parameter::named("id")),
        );
        query.where_clause = Some(cond);
        let (text, params) = format_with_parameters(
            &Statement::Select(query),
            &Dialect::ANSI,
        );
        assert!(text.contains(":id"));
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "id");
    }
}

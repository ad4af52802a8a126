//! DDL parsers: CREATE TABLE, CREATE INDEX, and ALTER TABLE.

use sqlforge_ast::{
    AlterAction, AlterTableQuery, ColumnConstraint, ColumnDef, CreateIndexQuery, CreateTableQuery,
    Expr, ExprChain, Statement, TableConstraint, TableConstraintKind,
};
use sqlforge_error::{ForgeError, ForgeResult};

use crate::cursor::Cursor;
use crate::expr;
use crate::parser;

pub(crate) fn create(c: &mut Cursor<'_>) -> ForgeResult<Statement> {
    c.expect_word("create")?;
    if c.eat_word("table") {
        return Ok(Statement::CreateTable(create_table(c)?));
    }
    if c.at_word("unique") || c.at_word("index") {
        return Ok(Statement::CreateIndex(create_index(c)?));
    }
    match c.peek() {
        Some(span) => Err(ForgeError::unsupported(format!(
            "CREATE {} statement",
            span.text.to_ascii_uppercase()
        ))),
        None => Err(c.error_here("expected TABLE or INDEX after CREATE")),
    }
}

pub(crate) fn create_table_query(c: &mut Cursor<'_>) -> ForgeResult<CreateTableQuery> {
    c.expect_word("create")?;
    c.expect_word("table")?;
    create_table(c)
}

pub(crate) fn create_index_query(c: &mut Cursor<'_>) -> ForgeResult<CreateIndexQuery> {
    c.expect_word("create")?;
    create_index(c)
}

fn if_not_exists(c: &mut Cursor<'_>) -> ForgeResult<bool> {
    if c.eat_word("if") {
        c.expect_word("not")?;
        c.expect_word("exists")?;
        Ok(true)
    } else {
        Ok(false)
    }
}

fn create_table(c: &mut Cursor<'_>) -> ForgeResult<CreateTableQuery> {
    let if_not_exists = if_not_exists(c)?;
    let name = expr::qualified_name(c)?;
    c.expect_symbol("(")?;
    let mut columns = Vec::new();
    let mut constraints = Vec::new();
    loop {
        if at_table_constraint(c) {
            constraints.push(table_constraint(c)?);
        } else {
            columns.push(column_def(c)?);
        }
        if !c.eat_symbol(",") {
            break;
        }
    }
    c.expect_symbol(")")?;
    if columns.is_empty() {
        return Err(ForgeError::MissingClause {
            construct: "CREATE TABLE",
            clause: "column list",
        });
    }
    Ok(CreateTableQuery {
        if_not_exists,
        name,
        columns,
        constraints,
    })
}

fn at_table_constraint(c: &Cursor<'_>) -> bool {
    c.at_word("constraint")
        || c.at_word("check")
        || c.at_word("foreign")
        // PRIMARY KEY / UNIQUE open a table constraint only when a column
        // list follows; as the first word of a definition they cannot be
        // a column name anyway.
        || (c.at_word("primary") && c.peek_nth(1).is_some_and(|s| s.is_word("key")))
        || (c.at_word("unique") && c.peek_nth(1).is_some_and(|s| s.is_symbol("(")))
}

pub(crate) fn column_def(c: &mut Cursor<'_>) -> ForgeResult<ColumnDef> {
    let name = expr::expect_ident(c)?;
    let ty = if c
        .peek()
        .is_some_and(|s| s.kind == crate::span::SpanKind::Word && !at_column_constraint_word(s.text))
    {
        Some(expr::type_name(c)?)
    } else {
        None
    };
    let mut constraints = Vec::new();
    loop {
        if c.eat_words("primary", "key") {
            let autoincrement = c.eat_word("autoincrement");
            constraints.push(ColumnConstraint::PrimaryKey { autoincrement });
        } else if c.at_word("not") && c.peek_nth(1).is_some_and(|s| s.is_word("null")) {
            c.bump();
            c.bump();
            constraints.push(ColumnConstraint::NotNull);
        } else if c.eat_word("unique") {
            constraints.push(ColumnConstraint::Unique);
        } else if c.eat_word("default") {
            constraints.push(ColumnConstraint::Default(default_value(c)?));
        } else if c.eat_word("check") {
            c.expect_symbol("(")?;
            let chain = expr::chain(c)?;
            c.expect_symbol(")")?;
            constraints.push(ColumnConstraint::Check(chain));
        } else if c.eat_word("references") {
            let table = expr::qualified_name(c)?;
            let columns = optional_ident_list(c)?;
            constraints.push(ColumnConstraint::References { table, columns });
        } else {
            break;
        }
    }
    Ok(ColumnDef {
        name,
        ty,
        constraints,
    })
}

fn at_column_constraint_word(word: &str) -> bool {
    ["primary", "not", "unique", "default", "check", "references", "constraint"]
        .iter()
        .any(|kw| word.eq_ignore_ascii_case(kw))
}

/// A DEFAULT value: a single operand, or a parenthesized expression kept
/// under its bracket.
fn default_value(c: &mut Cursor<'_>) -> ForgeResult<ExprChain> {
    if c.at_symbol("(") {
        c.bump();
        let inner = expr::chain(c)?;
        c.expect_symbol(")")?;
        return Ok(ExprChain::solo(Expr::Bracket(Box::new(inner))));
    }
    Ok(ExprChain::solo(expr::operand(c)?))
}

fn optional_ident_list(c: &mut Cursor<'_>) -> ForgeResult<Vec<String>> {
    if !c.eat_symbol("(") {
        return Ok(Vec::new());
    }
    let mut names = vec![expr::expect_ident(c)?];
    while c.eat_symbol(",") {
        names.push(expr::expect_ident(c)?);
    }
    c.expect_symbol(")")?;
    Ok(names)
}

fn table_constraint(c: &mut Cursor<'_>) -> ForgeResult<TableConstraint> {
    let name = if c.eat_word("constraint") {
        Some(expr::expect_ident(c)?)
    } else {
        None
    };
    let kind = if c.eat_words("primary", "key") {
        TableConstraintKind::PrimaryKey(optional_ident_list(c)?)
    } else if c.eat_word("unique") {
        TableConstraintKind::Unique(optional_ident_list(c)?)
    } else if c.eat_word("check") {
        c.expect_symbol("(")?;
        let chain = expr::chain(c)?;
        c.expect_symbol(")")?;
        TableConstraintKind::Check(chain)
    } else if c.eat_words("foreign", "key") {
        let columns = optional_ident_list(c)?;
        c.expect_word("references")?;
        let table = expr::qualified_name(c)?;
        let ref_columns = optional_ident_list(c)?;
        TableConstraintKind::ForeignKey {
            columns,
            table,
            ref_columns,
        }
    } else {
        return Err(c.error_here("expected a table constraint"));
    };
    Ok(TableConstraint { name, kind })
}

fn create_index(c: &mut Cursor<'_>) -> ForgeResult<CreateIndexQuery> {
    let unique = c.eat_word("unique");
    c.expect_word("index")?;
    let if_not_exists = if_not_exists(c)?;
    let name = expr::qualified_name(c)?;
    c.expect_word("on")?;
    let table = expr::qualified_name(c)?;
    c.expect_symbol("(")?;
    let mut columns = vec![parser::ordering_term(c)?];
    while c.eat_symbol(",") {
        columns.push(parser::ordering_term(c)?);
    }
    c.expect_symbol(")")?;
    let where_clause = if c.eat_word("where") {
        Some(expr::chain(c)?)
    } else {
        None
    };
    Ok(CreateIndexQuery {
        unique,
        if_not_exists,
        name,
        table,
        columns,
        where_clause,
    })
}

pub(crate) fn alter_table(c: &mut Cursor<'_>) -> ForgeResult<AlterTableQuery> {
    c.expect_word("alter")?;
    c.expect_word("table")?;
    let table = expr::qualified_name(c)?;
    let action = if c.eat_word("add") {
        c.eat_word("column");
        AlterAction::AddColumn(column_def(c)?)
    } else if c.eat_word("drop") {
        c.eat_word("column");
        AlterAction::DropColumn(expr::expect_ident(c)?)
    } else if c.eat_word("rename") {
        if c.eat_word("to") {
            AlterAction::RenameTo(expr::expect_ident(c)?)
        } else {
            c.eat_word("column");
            let from = expr::expect_ident(c)?;
            c.expect_word("to")?;
            let to = expr::expect_ident(c)?;
            AlterAction::RenameColumn { from, to }
        }
    } else {
        return Err(c.error_here("expected ADD, DROP, or RENAME"));
    };
    Ok(AlterTableQuery { table, action })
}

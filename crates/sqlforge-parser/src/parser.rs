//! Statement parsers: one routine per grammar production, all driven by
//! the shared [`Cursor`].
//!
//! Compound selects are flattened as they are parsed: the loop in
//! [`select_body`] pushes each `UNION`/`INTERSECT`/`EXCEPT` branch onto
//! the leading query's compound vector, so a 50,000-way `UNION ALL` costs
//! one vector push per branch and no recursion.
//!
//! One deliberate reinterpretation: the canonical grammar gives INSERT no
//! leading WITH clause. When the input carries one anyway, the clause is
//! reparented onto the nested SELECT source so the emitted text is still
//! valid SQL. An `INSERT … VALUES` under a leading WITH has no SELECT to
//! adopt the clause and fails with a structural error.

use sqlforge_ast::dialect::{default_dialect, Dialect};
use sqlforge_ast::{
    keywords, AlterTableQuery, Assignment, AssignmentTarget, CommonTable, CreateIndexQuery,
    CreateTableQuery, DeleteQuery, ExprChain, FromClause, InsertQuery, InsertSource, JoinKind,
    LimitClause, MergeAction, MergeQuery, MergeWhen, NullsOrder, OrderingTerm, Relation,
    SelectItem, SelectQuery, SetOp, SortDirection, Statement, TableRef, TableSource, UpdateQuery,
    ValuesQuery, WindowDef, WithClause,
};
use sqlforge_error::{ForgeError, ForgeResult};
use tracing::{debug, trace};

use crate::cursor::Cursor;
use crate::ddl;
use crate::expr;
use crate::metrics;
use crate::span::SpanKind;

/// Parse one SQL statement using the process-default dialect.
pub fn parse(text: &str) -> ForgeResult<Statement> {
    parse_with(text, &default_dialect())
}

/// Parse one SQL statement with an explicit dialect.
pub fn parse_with(text: &str, dialect: &Dialect) -> ForgeResult<Statement> {
    debug!(bytes = text.len(), "parsing statement");
    let result = parse_inner(text, dialect);
    metrics::record_parse(result.is_ok());
    if let Err(ref err) = result {
        debug!(%err, "parse failed");
    }
    result
}

fn parse_inner(text: &str, dialect: &Dialect) -> ForgeResult<Statement> {
    parse_production(text, dialect, statement)
}

/// Run one grammar production over a whole input, requiring it to consume
/// everything.
fn parse_production<T>(
    text: &str,
    dialect: &Dialect,
    production: impl FnOnce(&mut Cursor<'_>) -> ForgeResult<T>,
) -> ForgeResult<T> {
    let mut c = Cursor::new(text, *dialect)?;
    let value = production(&mut c)?;
    if !c.at_end() {
        return Err(c.error_here("unexpected trailing input"));
    }
    Ok(value)
}

/// Parse a standalone SELECT, including any leading WITH.
pub fn parse_select(text: &str, dialect: &Dialect) -> ForgeResult<SelectQuery> {
    parse_production(text, dialect, select_query)
}

/// Parse a standalone INSERT; a leading WITH is reparented onto the
/// SELECT source exactly as [`parse`] does it.
pub fn parse_insert(text: &str, dialect: &Dialect) -> ForgeResult<InsertQuery> {
    parse_production(text, dialect, |c| {
        if c.at_word("with") {
            let with = with_clause(c)?;
            insert_under_with(c, with)
        } else {
            insert_query(c)
        }
    })
}

/// Parse a standalone UPDATE, including any leading WITH.
pub fn parse_update(text: &str, dialect: &Dialect) -> ForgeResult<UpdateQuery> {
    parse_production(text, dialect, |c| {
        let with = if c.at_word("with") {
            Some(with_clause(c)?)
        } else {
            None
        };
        update_query(c, with)
    })
}

/// Parse a standalone DELETE, including any leading WITH.
pub fn parse_delete(text: &str, dialect: &Dialect) -> ForgeResult<DeleteQuery> {
    parse_production(text, dialect, |c| {
        let with = if c.at_word("with") {
            Some(with_clause(c)?)
        } else {
            None
        };
        delete_query(c, with)
    })
}

/// Parse a standalone MERGE.
pub fn parse_merge(text: &str, dialect: &Dialect) -> ForgeResult<MergeQuery> {
    parse_production(text, dialect, merge_query)
}

/// Parse a bare VALUES list.
pub fn parse_values(text: &str, dialect: &Dialect) -> ForgeResult<ValuesQuery> {
    parse_production(text, dialect, values_query)
}

/// Parse a standalone CREATE TABLE.
pub fn parse_create_table(text: &str, dialect: &Dialect) -> ForgeResult<CreateTableQuery> {
    parse_production(text, dialect, ddl::create_table_query)
}

/// Parse a standalone ALTER TABLE.
pub fn parse_alter_table(text: &str, dialect: &Dialect) -> ForgeResult<AlterTableQuery> {
    parse_production(text, dialect, ddl::alter_table)
}

/// Parse a standalone CREATE [UNIQUE] INDEX.
pub fn parse_create_index(text: &str, dialect: &Dialect) -> ForgeResult<CreateIndexQuery> {
    parse_production(text, dialect, ddl::create_index_query)
}

/// Parse an expression fragment on its own, outside any statement.
pub fn parse_expr_chain(text: &str, dialect: &Dialect) -> ForgeResult<ExprChain> {
    parse_production(text, dialect, expr::chain)
}

pub(crate) fn statement(c: &mut Cursor<'_>) -> ForgeResult<Statement> {
    if c.at_word("with") {
        let with = with_clause(c)?;
        return statement_after_with(c, with);
    }
    let Some(first) = c.peek() else {
        return Err(c.error_here("empty statement"));
    };
    if first.is_word("select") {
        return Ok(Statement::Select(select_body(c)?));
    }
    if first.is_word("values") {
        return Ok(Statement::Values(values_query(c)?));
    }
    if first.is_word("insert") {
        return Ok(Statement::Insert(insert_query(c)?));
    }
    if first.is_word("update") {
        return Ok(Statement::Update(update_query(c, None)?));
    }
    if first.is_word("delete") {
        return Ok(Statement::Delete(delete_query(c, None)?));
    }
    if first.is_word("merge") {
        return Ok(Statement::Merge(merge_query(c)?));
    }
    if first.is_word("create") {
        return ddl::create(c);
    }
    if first.is_word("alter") {
        return Ok(Statement::AlterTable(ddl::alter_table(c)?));
    }
    if first.kind == SpanKind::Word {
        return Err(ForgeError::unsupported(format!(
            "{} statement",
            first.text.to_ascii_uppercase()
        )));
    }
    Err(c.error_here("expected a statement keyword"))
}

fn statement_after_with(c: &mut Cursor<'_>, with: WithClause) -> ForgeResult<Statement> {
    if c.at_word("select") {
        let mut query = select_body(c)?;
        query.with = Some(with);
        return Ok(Statement::Select(query));
    }
    if c.at_word("update") {
        return Ok(Statement::Update(update_query(c, Some(with))?));
    }
    if c.at_word("delete") {
        return Ok(Statement::Delete(delete_query(c, Some(with))?));
    }
    if c.at_word("insert") {
        return Ok(Statement::Insert(insert_under_with(c, with)?));
    }
    Err(c.error_here("expected SELECT, INSERT, UPDATE, or DELETE after WITH"))
}

/// Reparent a leading WITH onto the INSERT's SELECT source; VALUES has
/// nowhere to put it.
fn insert_under_with(c: &mut Cursor<'_>, with: WithClause) -> ForgeResult<InsertQuery> {
    let mut insert = insert_query(c)?;
    match insert.source {
        InsertSource::Select(ref mut select) => {
            let mut merged = with;
            if let Some(inner) = select.strip_with() {
                merged.merge(inner);
            }
            select.with = Some(merged);
            trace!("reparented leading WITH onto INSERT's SELECT source");
        }
        InsertSource::Values(_) | InsertSource::DefaultValues => {
            return Err(ForgeError::MissingClause {
                construct: "INSERT under a leading WITH clause",
                clause: "SELECT source",
            });
        }
    }
    Ok(insert)
}

/// A full select: core, compound branches, then trailing ORDER BY/LIMIT.
/// Also accepts its own leading WITH so subqueries can carry CTEs.
pub(crate) fn select_query(c: &mut Cursor<'_>) -> ForgeResult<SelectQuery> {
    let with = if c.at_word("with") {
        Some(with_clause(c)?)
    } else {
        None
    };
    let mut query = select_body(c)?;
    query.with = with;
    Ok(query)
}

fn select_body(c: &mut Cursor<'_>) -> ForgeResult<SelectQuery> {
    let mut head = select_core(c)?;
    loop {
        let op = if c.eat_word("union") {
            if c.eat_word("all") {
                SetOp::UnionAll
            } else {
                SetOp::Union
            }
        } else if c.eat_word("intersect") {
            if c.eat_word("all") {
                SetOp::IntersectAll
            } else {
                SetOp::Intersect
            }
        } else if c.eat_word("except") {
            if c.eat_word("all") {
                SetOp::ExceptAll
            } else {
                SetOp::Except
            }
        } else {
            break;
        };
        let branch = select_core(c)?;
        head.compounds.push((op, branch));
    }
    if c.eat_words("order", "by") {
        head.order_by.push(ordering_term(c)?);
        while c.eat_symbol(",") {
            head.order_by.push(ordering_term(c)?);
        }
    }
    if c.eat_word("limit") {
        let limit = expr::chain(c)?;
        let offset = if c.eat_word("offset") {
            Some(expr::chain(c)?)
        } else {
            None
        };
        head.limit = Some(LimitClause { limit, offset });
    }
    Ok(head)
}

fn select_core(c: &mut Cursor<'_>) -> ForgeResult<SelectQuery> {
    c.expect_word("select")?;
    let distinct = c.eat_word("distinct");
    if !distinct {
        c.eat_word("all");
    }
    let mut query = SelectQuery {
        distinct,
        items: vec![select_item(c)?],
        ..SelectQuery::default()
    };
    while c.eat_symbol(",") {
        query.items.push(select_item(c)?);
    }
    if c.eat_word("from") {
        query.from = Some(relations(c)?);
    }
    if c.eat_word("where") {
        query.where_clause = Some(expr::chain(c)?);
    }
    if c.eat_words("group", "by") {
        query.group_by.push(expr::chain(c)?);
        while c.eat_symbol(",") {
            query.group_by.push(expr::chain(c)?);
        }
    }
    if c.eat_word("having") {
        query.having = Some(expr::chain(c)?);
    }
    if c.eat_word("window") {
        query.windows.push(window_def(c)?);
        while c.eat_symbol(",") {
            query.windows.push(window_def(c)?);
        }
    }
    Ok(query)
}

fn window_def(c: &mut Cursor<'_>) -> ForgeResult<WindowDef> {
    let name = expr::expect_ident(c)?;
    c.expect_word("as")?;
    c.expect_symbol("(")?;
    let spec = expr::window_spec(c)?;
    c.expect_symbol(")")?;
    Ok(WindowDef { name, spec })
}

fn select_item(c: &mut Cursor<'_>) -> ForgeResult<SelectItem> {
    let chain = expr::chain(c)?;
    let alias = alias(c)?;
    Ok(SelectItem { chain, alias })
}

/// An optional `[AS] name` alias. Without `AS`, a bare reserved word is a
/// keyword, not an alias.
fn alias(c: &mut Cursor<'_>) -> ForgeResult<Option<String>> {
    if c.eat_word("as") {
        return expr::expect_ident(c).map(Some);
    }
    match c.peek() {
        Some(s) if s.kind == SpanKind::QuotedWord => {
            c.bump();
            Ok(Some(expr::decode_ident(s)))
        }
        Some(s) if s.kind == SpanKind::Word && !keywords::is_reserved(s.text) => {
            c.bump();
            Ok(Some(s.text.to_owned()))
        }
        _ => Ok(None),
    }
}

pub(crate) fn ordering_term(c: &mut Cursor<'_>) -> ForgeResult<OrderingTerm> {
    let chain = expr::chain(c)?;
    let direction = if c.eat_word("asc") {
        Some(SortDirection::Asc)
    } else if c.eat_word("desc") {
        Some(SortDirection::Desc)
    } else {
        None
    };
    let nulls = if c.eat_word("nulls") {
        if c.eat_word("first") {
            Some(NullsOrder::First)
        } else {
            c.expect_word("last")?;
            Some(NullsOrder::Last)
        }
    } else {
        None
    };
    Ok(OrderingTerm {
        chain,
        direction,
        nulls,
    })
}

// ---------------------------------------------------------------------------
// FROM and table references
// ---------------------------------------------------------------------------

/// The relation list of a FROM/USING clause, with its join chain.
pub(crate) fn relations(c: &mut Cursor<'_>) -> ForgeResult<FromClause> {
    let mut clause = FromClause {
        relations: vec![Relation {
            join: JoinKind::From,
            table: table_ref(c)?,
            on: None,
        }],
    };
    loop {
        let join = if c.eat_symbol(",") {
            JoinKind::Comma
        } else if c.eat_word("join") {
            JoinKind::Inner
        } else if c.eat_word("inner") {
            c.expect_word("join")?;
            JoinKind::Inner
        } else if c.eat_word("left") {
            c.eat_word("outer");
            c.expect_word("join")?;
            JoinKind::Left
        } else if c.eat_word("right") {
            c.eat_word("outer");
            c.expect_word("join")?;
            JoinKind::Right
        } else if c.eat_word("full") {
            c.eat_word("outer");
            c.expect_word("join")?;
            JoinKind::Full
        } else if c.eat_word("cross") {
            c.expect_word("join")?;
            JoinKind::Cross
        } else {
            break;
        };
        let table = table_ref(c)?;
        let on = if c.eat_word("on") {
            Some(expr::chain(c)?)
        } else {
            None
        };
        clause.relations.push(Relation { join, table, on });
    }
    Ok(clause)
}

/// A FROM item: physical table, derived table, or table function, chosen
/// by a short lookahead on the leading span.
fn table_ref(c: &mut Cursor<'_>) -> ForgeResult<TableRef> {
    let source = if c.at_symbol("(") {
        c.bump();
        let stmt = if c.at_word("values") {
            Statement::Values(values_query(c)?)
        } else if c.at_word("select") || c.at_word("with") {
            Statement::Select(select_query(c)?)
        } else {
            return Err(c.error_here("expected a subquery after `(`"));
        };
        c.expect_symbol(")")?;
        TableSource::Query(Box::new(stmt))
    } else {
        let name = expr::qualified_name(c)?;
        if name.schema.is_none() && c.at_symbol("(") {
            TableSource::Function(expr::function_call(c, name.name)?)
        } else {
            TableSource::Physical(name)
        }
    };
    let alias = alias(c)?;
    Ok(TableRef { source, alias })
}

// ---------------------------------------------------------------------------
// WITH
// ---------------------------------------------------------------------------

/// `WITH [RECURSIVE] name [(cols)] AS [[NOT] MATERIALIZED] (body), …`.
/// Each body is pulled out as a balanced subspan and handed to a nested
/// statement parse, which keeps any comments inside the body intact in
/// the extracted text.
pub(crate) fn with_clause(c: &mut Cursor<'_>) -> ForgeResult<WithClause> {
    c.expect_word("with")?;
    let recursive = c.eat_word("recursive");
    let mut clause = WithClause {
        recursive,
        tables: Vec::new(),
    };
    loop {
        let name = expr::expect_ident(c)?;
        let mut columns = Vec::new();
        if c.eat_symbol("(") {
            columns.push(expr::expect_ident(c)?);
            while c.eat_symbol(",") {
                columns.push(expr::expect_ident(c)?);
            }
            c.expect_symbol(")")?;
        }
        c.expect_word("as")?;
        let materialized = if c.eat_word("materialized") {
            Some(true)
        } else if c.at_word("not") && c.peek_nth(1).is_some_and(|s| s.is_word("materialized")) {
            c.bump();
            c.bump();
            Some(false)
        } else {
            None
        };
        let body = c.extract_balanced("(", ")")?;
        let dialect = c.dialect();
        let query = parse_with(body, &dialect)?;
        clause.add(CommonTable {
            name,
            columns,
            materialized,
            query: Box::new(query),
        });
        if !c.eat_symbol(",") {
            break;
        }
    }
    Ok(clause)
}

// ---------------------------------------------------------------------------
// VALUES / INSERT / UPDATE / DELETE / MERGE
// ---------------------------------------------------------------------------

pub(crate) fn values_query(c: &mut Cursor<'_>) -> ForgeResult<ValuesQuery> {
    c.expect_word("values")?;
    let mut rows = Vec::new();
    loop {
        c.expect_symbol("(")?;
        let mut row = vec![expr::chain(c)?];
        while c.eat_symbol(",") {
            row.push(expr::chain(c)?);
        }
        c.expect_symbol(")")?;
        rows.push(row);
        if !c.eat_symbol(",") {
            break;
        }
    }
    Ok(ValuesQuery { rows })
}

fn insert_query(c: &mut Cursor<'_>) -> ForgeResult<InsertQuery> {
    c.expect_word("insert")?;
    c.expect_word("into")?;
    let table = expr::qualified_name(c)?;
    let alias = if c.eat_word("as") {
        Some(expr::expect_ident(c)?)
    } else {
        None
    };
    let mut columns = Vec::new();
    if c.eat_symbol("(") {
        columns.push(expr::expect_ident(c)?);
        while c.eat_symbol(",") {
            columns.push(expr::expect_ident(c)?);
        }
        c.expect_symbol(")")?;
    }
    let source = if c.at_word("values") {
        InsertSource::Values(values_query(c)?)
    } else if c.at_word("select") || c.at_word("with") {
        InsertSource::Select(Box::new(select_query(c)?))
    } else if c.eat_words("default", "values") {
        InsertSource::DefaultValues
    } else {
        return Err(ForgeError::MissingClause {
            construct: "INSERT",
            clause: "row source",
        });
    };
    let returning = returning(c)?;
    Ok(InsertQuery {
        table,
        alias,
        columns,
        source,
        returning,
    })
}

fn returning(c: &mut Cursor<'_>) -> ForgeResult<Vec<SelectItem>> {
    if !c.eat_word("returning") {
        return Ok(Vec::new());
    }
    let mut items = vec![select_item(c)?];
    while c.eat_symbol(",") {
        items.push(select_item(c)?);
    }
    Ok(items)
}

fn update_query(c: &mut Cursor<'_>, with: Option<WithClause>) -> ForgeResult<UpdateQuery> {
    c.expect_word("update")?;
    let table = table_ref(c)?;
    c.expect_word("set")?;
    let mut assignments = vec![assignment(c)?];
    while c.eat_symbol(",") {
        assignments.push(assignment(c)?);
    }
    let from = if c.eat_word("from") {
        Some(relations(c)?)
    } else {
        None
    };
    let where_clause = if c.eat_word("where") {
        Some(expr::chain(c)?)
    } else {
        None
    };
    let returning = returning(c)?;
    Ok(UpdateQuery {
        with,
        table,
        assignments,
        from,
        where_clause,
        returning,
    })
}

fn assignment(c: &mut Cursor<'_>) -> ForgeResult<Assignment> {
    let target = if c.eat_symbol("(") {
        let mut names = vec![expr::expect_ident(c)?];
        while c.eat_symbol(",") {
            names.push(expr::expect_ident(c)?);
        }
        c.expect_symbol(")")?;
        AssignmentTarget::ColumnList(names)
    } else {
        AssignmentTarget::Column(expr::expect_ident(c)?)
    };
    c.expect_symbol("=")?;
    let value = expr::chain(c)?;
    Ok(Assignment { target, value })
}

fn delete_query(c: &mut Cursor<'_>, with: Option<WithClause>) -> ForgeResult<DeleteQuery> {
    c.expect_word("delete")?;
    c.expect_word("from")?;
    let table = table_ref(c)?;
    let using = if c.eat_word("using") {
        Some(relations(c)?)
    } else {
        None
    };
    let where_clause = if c.eat_word("where") {
        Some(expr::chain(c)?)
    } else {
        None
    };
    let returning = returning(c)?;
    Ok(DeleteQuery {
        with,
        table,
        using,
        where_clause,
        returning,
    })
}

fn merge_query(c: &mut Cursor<'_>) -> ForgeResult<MergeQuery> {
    c.expect_word("merge")?;
    c.expect_word("into")?;
    let into = table_ref(c)?;
    c.expect_word("using")?;
    let using = table_ref(c)?;
    c.expect_word("on")?;
    let on = expr::chain(c)?;
    let mut whens = Vec::new();
    while c.eat_word("when") {
        let matched = if c.eat_word("not") {
            c.expect_word("matched")?;
            false
        } else {
            c.expect_word("matched")?;
            true
        };
        let condition = if c.eat_word("and") {
            Some(expr::chain(c)?)
        } else {
            None
        };
        c.expect_word("then")?;
        let action = merge_action(c)?;
        whens.push(MergeWhen {
            matched,
            condition,
            action,
        });
    }
    if whens.is_empty() {
        return Err(ForgeError::MissingClause {
            construct: "MERGE",
            clause: "WHEN clause",
        });
    }
    Ok(MergeQuery {
        into,
        using,
        on,
        whens,
    })
}

fn merge_action(c: &mut Cursor<'_>) -> ForgeResult<MergeAction> {
    if c.eat_word("update") {
        c.expect_word("set")?;
        let mut assignments = vec![assignment(c)?];
        while c.eat_symbol(",") {
            assignments.push(assignment(c)?);
        }
        return Ok(MergeAction::Update(assignments));
    }
    if c.eat_word("insert") {
        let mut columns = Vec::new();
        if c.eat_symbol("(") {
            columns.push(expr::expect_ident(c)?);
            while c.eat_symbol(",") {
                columns.push(expr::expect_ident(c)?);
            }
            c.expect_symbol(")")?;
        }
        c.expect_word("values")?;
        if !c.at_symbol("(") {
            return Err(ForgeError::InvalidArgument {
                construct: "MERGE",
                detail: "INSERT action requires a parenthesized value row".to_owned(),
            });
        }
        c.bump();
        let mut values = vec![expr::chain(c)?];
        while c.eat_symbol(",") {
            values.push(expr::chain(c)?);
        }
        c.expect_symbol(")")?;
        return Ok(MergeAction::Insert { columns, values });
    }
    if c.eat_word("delete") {
        return Ok(MergeAction::Delete);
    }
    if c.eat_words("do", "nothing") {
        return Ok(MergeAction::DoNothing);
    }
    Err(c.error_here("expected UPDATE, INSERT, DELETE, or DO NOTHING"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlforge_ast::Expr;

    fn parse_ok(src: &str) -> Statement {
        parse_with(src, &Dialect::ANSI).unwrap()
    }

    fn select(stmt: Statement) -> SelectQuery {
        match stmt {
            Statement::Select(q) => q,
            other => panic!("expected select, got {other:?}"),
        }
    }

    #[test]
    fn select_with_joins_and_aliases() {
        let q = select(parse_ok(
            "select u.id, count(*) total from users u \
             left join orders o on o.user_id = u.id \
             group by u.id having count(*) > 3 order by total desc limit 10",
        ));
        assert_eq!(q.items.len(), 2);
        assert_eq!(q.items[1].alias.as_deref(), Some("total"));
        let from = q.from.as_ref().unwrap();
        assert_eq!(from.relations.len(), 2);
        assert_eq!(from.relations[1].join, JoinKind::Left);
        assert!(from.relations[1].on.is_some());
        assert_eq!(q.group_by.len(), 1);
        assert!(q.having.is_some());
        assert_eq!(q.order_by.len(), 1);
        assert_eq!(q.order_by[0].direction, Some(SortDirection::Desc));
        assert!(q.limit.is_some());
    }

    #[test]
    fn compound_selects_flatten() {
        let q = select(parse_ok(
            "select 1 union all select 2 union select 3 except select 4",
        ));
        assert_eq!(q.compounds.len(), 3);
        assert_eq!(q.compounds[0].0, SetOp::UnionAll);
        assert_eq!(q.compounds[1].0, SetOp::Union);
        assert_eq!(q.compounds[2].0, SetOp::Except);
    }

    #[test]
    fn trailing_order_by_belongs_to_the_compound() {
        let q = select(parse_ok("select 1 union select 2 order by 1"));
        assert_eq!(q.compounds.len(), 1);
        assert_eq!(q.order_by.len(), 1);
        assert!(q.compounds[0].1.order_by.is_empty());
    }

    #[test]
    fn derived_table_in_from() {
        let q = select(parse_ok("select x from (select 1 x) sub"));
        let from = q.from.as_ref().unwrap();
        assert!(matches!(
            from.relations[0].table.source,
            TableSource::Query(_)
        ));
        assert_eq!(from.relations[0].table.alias.as_deref(), Some("sub"));
    }

    #[test]
    fn table_function_in_from() {
        let q = select(parse_ok("select * from generate_series(1, 10) n"));
        let from = q.from.as_ref().unwrap();
        assert!(matches!(
            from.relations[0].table.source,
            TableSource::Function(_)
        ));
    }

    #[test]
    fn with_clause_parses_bodies_recursively() {
        let q = select(parse_ok(
            "with recent (id) as (select id from events where ts > :since) \
             select * from recent",
        ));
        let with = q.with.as_ref().unwrap();
        assert_eq!(with.tables.len(), 1);
        assert_eq!(with.tables[0].name, "recent");
        assert_eq!(with.tables[0].columns, vec!["id".to_owned()]);
        assert!(matches!(*with.tables[0].query, Statement::Select(_)));
    }

    #[test]
    fn cte_body_comments_survive_extraction() {
        // The body text handed to the nested parse keeps the comment; the
        // outer parse is unaffected by it.
        let stmt = parse_ok("with r as (select 1 /* keep me */) select * from r");
        let Statement::Select(q) = stmt else {
            panic!("expected select");
        };
        assert!(q.with.is_some());
    }

    #[test]
    fn materialized_hint_round_trips_through_the_tree() {
        let q = select(parse_ok(
            "with r as not materialized (select 1) select * from r",
        ));
        assert_eq!(q.with.as_ref().unwrap().tables[0].materialized, Some(false));
    }

    #[test]
    fn insert_values_and_returning() {
        let stmt = parse_ok("insert into logs (msg, level) values ('hi', 1), ('bye', 2) returning id");
        let Statement::Insert(q) = stmt else {
            panic!("expected insert");
        };
        assert_eq!(q.columns, vec!["msg".to_owned(), "level".to_owned()]);
        let InsertSource::Values(ref values) = q.source else {
            panic!("expected values source");
        };
        assert_eq!(values.rows.len(), 2);
        assert_eq!(q.returning.len(), 1);
    }

    #[test]
    fn leading_with_reparents_onto_insert_select() {
        let stmt = parse_ok(
            "with src as (select * from staging) insert into t select * from src",
        );
        let Statement::Insert(q) = stmt else {
            panic!("expected insert");
        };
        let InsertSource::Select(ref select) = q.source else {
            panic!("expected select source");
        };
        let with = select.with.as_ref().unwrap();
        assert_eq!(with.tables[0].name, "src");
    }

    #[test]
    fn leading_with_over_insert_values_is_structural_error() {
        let err = parse_with(
            "with src as (select 1) insert into t values (1)",
            &Dialect::ANSI,
        )
        .unwrap_err();
        assert!(matches!(err, ForgeError::MissingClause { .. }));
    }

    #[test]
    fn update_with_from_and_where() {
        let stmt = parse_ok(
            "update t set a = 1, (b, c) = 2 from u where t.id = u.id returning a",
        );
        let Statement::Update(q) = stmt else {
            panic!("expected update");
        };
        assert_eq!(q.assignments.len(), 2);
        assert!(matches!(
            q.assignments[1].target,
            AssignmentTarget::ColumnList(_)
        ));
        assert!(q.from.is_some());
        assert!(q.where_clause.is_some());
        assert_eq!(q.returning.len(), 1);
    }

    #[test]
    fn delete_using() {
        let stmt = parse_ok("delete from t using u where t.id = u.id");
        let Statement::Delete(q) = stmt else {
            panic!("expected delete");
        };
        assert!(q.using.is_some());
        assert!(q.where_clause.is_some());
    }

    #[test]
    fn merge_with_all_arm_kinds() {
        let stmt = parse_ok(
            "merge into t using s on t.id = s.id \
             when matched and s.stale = 1 then delete \
             when matched then update set v = s.v \
             when not matched then insert (id, v) values (s.id, s.v)",
        );
        let Statement::Merge(q) = stmt else {
            panic!("expected merge");
        };
        assert_eq!(q.whens.len(), 3);
        assert!(q.whens[0].condition.is_some());
        assert!(matches!(q.whens[0].action, MergeAction::Delete));
        assert!(matches!(q.whens[1].action, MergeAction::Update(_)));
        assert!(!q.whens[2].matched);
    }

    #[test]
    fn merge_without_when_is_structural_error() {
        let err = parse_with("merge into t using s on t.id = s.id", &Dialect::ANSI).unwrap_err();
        assert!(matches!(
            err,
            ForgeError::MissingClause {
                construct: "MERGE",
                ..
            }
        ));
    }

    #[test]
    fn unsupported_statement_keyword_is_reported_by_name() {
        let err = parse_with("grant all on t to u", &Dialect::ANSI).unwrap_err();
        let ForgeError::Unsupported { construct } = err else {
            panic!("expected unsupported");
        };
        assert!(construct.contains("GRANT"));
    }

    #[test]
    fn trailing_input_is_rejected() {
        let err = parse_with("select 1 select 2", &Dialect::ANSI).unwrap_err();
        assert!(matches!(err, ForgeError::Syntax { .. }));
    }

    #[test]
    fn reserved_word_is_not_taken_as_implicit_alias() {
        let q = select(parse_ok("select a from t where b = 1"));
        assert_eq!(q.items.len(), 1);
        assert!(q.items[0].alias.is_none());
        assert!(q.where_clause.is_some());
    }

    #[test]
    fn scalar_subquery_in_select_list() {
        let q = select(parse_ok("select (select max(id) from t) as top"));
        assert!(matches!(q.items[0].chain.head, Expr::Subquery(_)));
        assert_eq!(q.items[0].alias.as_deref(), Some("top"));
    }

    #[test]
    fn per_statement_entry_points_accept_only_their_production() {
        let q = parse_select("with r as (select 1) select * from r", &Dialect::ANSI).unwrap();
        assert!(q.with.is_some());

        let v = parse_values("values (1), (2)", &Dialect::ANSI).unwrap();
        assert_eq!(v.rows.len(), 2);

        let u = parse_update("with src as (select 1) update t set a = 1", &Dialect::ANSI).unwrap();
        assert!(u.with.is_some());

        let d = parse_delete("delete from t where id = 1", &Dialect::ANSI).unwrap();
        assert!(d.where_clause.is_some());

        let m = parse_merge(
            "merge into t using s on t.id = s.id when matched then delete",
            &Dialect::ANSI,
        )
        .unwrap();
        assert_eq!(m.whens.len(), 1);

        let table = parse_create_table("create table t (id integer)", &Dialect::ANSI).unwrap();
        assert_eq!(table.columns.len(), 1);

        let index = parse_create_index("create unique index i on t (a)", &Dialect::ANSI).unwrap();
        assert!(index.unique);

        let alter = parse_alter_table("alter table t rename to u", &Dialect::ANSI).unwrap();
        assert!(matches!(
            alter.action,
            sqlforge_ast::AlterAction::RenameTo(_)
        ));

        // The wrong production is a plain parse failure, not a panic.
        assert!(parse_select("delete from t", &Dialect::ANSI).is_err());
        assert!(parse_create_table("create index i on t (a)", &Dialect::ANSI).is_err());
    }

    #[test]
    fn insert_entry_point_reparents_a_leading_with() {
        let q = parse_insert(
            "with src as (select * from staging) insert into t select * from src",
            &Dialect::ANSI,
        )
        .unwrap();
        let InsertSource::Select(ref select) = q.source else {
            panic!("expected select source");
        };
        assert_eq!(select.with.as_ref().unwrap().tables[0].name, "src");
    }

    #[test]
    fn expression_fragments_parse_on_their_own() {
        let chain = parse_expr_chain("a + b * 2", &Dialect::ANSI).unwrap();
        assert_eq!(chain.links.len(), 2);
        assert!(parse_expr_chain("a +", &Dialect::ANSI).is_err());
        assert!(parse_expr_chain("a b", &Dialect::ANSI).is_err());
    }

    #[test]
    fn deep_union_chain_parses_iteratively() {
        let mut src = String::from("select 1");
        for _ in 0..50_000 {
            src.push_str(" union all select 1");
        }
        let q = select(parse_ok(&src));
        assert_eq!(q.compounds.len(), 50_000);
    }

    #[test]
    fn very_wide_values_parses_iteratively() {
        let mut src = String::from("values ");
        for i in 0..50_001 {
            if i > 0 {
                src.push_str(", ");
            }
            src.push_str("(1)");
        }
        let Statement::Values(v) = parse_ok(&src) else {
            panic!("expected values");
        };
        assert_eq!(v.rows.len(), 50_001);
    }
}

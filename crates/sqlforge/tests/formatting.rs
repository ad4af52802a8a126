//! Canonical text expectations for the indenting formatter.

use sqlforge::dialect::Dialect;
use sqlforge::{format, format_with, format_with_parameters, parse, parse_with, Expr, Statement};

fn fmt(src: &str) -> String {
    format(&parse(src).unwrap())
}

#[test]
fn single_item_clauses_stay_on_the_keyword_line() {
    assert_eq!(fmt("select a from t where x = 1"), "SELECT a\nFROM t\nWHERE x = 1");
}

#[test]
fn multi_item_lists_break_one_per_line() {
    assert_eq!(
        fmt("select a, b, c from t group by a, b"),
        "SELECT\n    a,\n    b,\n    c\nFROM t\nGROUP BY\n    a,\n    b"
    );
}

#[test]
fn joins_take_their_own_lines() {
    assert_eq!(
        fmt("select u.id from users u left join orders o on o.user_id = u.id"),
        "SELECT u.id\nFROM users AS u\nLEFT JOIN orders AS o ON o.user_id = u.id"
    );
}

#[test]
fn subqueries_render_as_indented_blocks() {
    assert_eq!(
        fmt("select x from (select 1 x) sub"),
        "SELECT x\nFROM (\n    SELECT 1 AS x\n) AS sub"
    );
}

#[test]
fn cte_bodies_indent_under_with() {
    assert_eq!(
        fmt("with r as (select 1) select * from r"),
        "WITH r AS (\n    SELECT 1\n)\nSELECT *\nFROM r"
    );
}

#[test]
fn compound_branches_align_at_the_margin() {
    assert_eq!(
        fmt("select 1 union all select 2 except select 3"),
        "SELECT 1\nUNION ALL\nSELECT 2\nEXCEPT\nSELECT 3"
    );
}

#[test]
fn insert_rows_list_one_per_line() {
    assert_eq!(
        fmt("insert into logs (msg, level) values ('hi', 1), ('bye', 2)"),
        "INSERT INTO logs(msg, level)\nVALUES\n    ('hi', 1),\n    ('bye', 2)"
    );
}

#[test]
fn merge_arms_stay_inline_after_the_when_line() {
    assert_eq!(
        fmt(
            "merge into tgt using src on tgt.id = src.id \
             when matched then update set v = src.v \
             when not matched then insert (id, v) values (src.id, src.v)"
        ),
        "MERGE INTO tgt\nUSING src ON tgt.id = src.id\n\
         WHEN MATCHED THEN UPDATE SET v = src.v\n\
         WHEN NOT MATCHED THEN INSERT (id, v)\nVALUES (src.id, src.v)"
    );
}

#[test]
fn update_and_delete_layout() {
    assert_eq!(
        fmt("update t set a = 1, b = 2 where id = 3"),
        "UPDATE t\nSET\n    a = 1,\n    b = 2\nWHERE id = 3"
    );
    assert_eq!(
        fmt("delete from t using u where t.id = u.id"),
        "DELETE FROM t\nUSING u\nWHERE t.id = u.id"
    );
}

#[test]
fn window_specs_never_break_lines() {
    assert_eq!(
        fmt("select sum(v) over (partition by g order by ts desc) from t"),
        "SELECT sum(v) OVER (PARTITION BY g ORDER BY ts DESC)\nFROM t"
    );
}

#[test]
fn null_comparisons_render_as_is_null() {
    assert_eq!(
        fmt("select * from t where a = null and b <> null"),
        "SELECT *\nFROM t\nWHERE a IS NULL AND b IS NOT NULL"
    );
}

#[test]
fn redundant_aliases_are_dropped() {
    assert_eq!(fmt("select t.col as col from t as t"), "SELECT t.col\nFROM t");
    assert_eq!(fmt("select t.col as c from t"), "SELECT t.col AS c\nFROM t");
}

#[test]
fn string_escapes_survive_formatting() {
    assert_eq!(fmt("select 'it''s' from t"), "SELECT 'it''s'\nFROM t");
}

#[test]
fn identifier_quoting_follows_the_dialect() {
    assert_eq!(fmt("select \"odd name\", \"order\" from t"), "SELECT\n    \"odd name\",\n    \"order\"\nFROM t");

    let stmt = parse_with("select [order] from t", &Dialect::MSSQL).unwrap();
    assert_eq!(format_with(&stmt, &Dialect::MSSQL), "SELECT [order]\nFROM t");

    let stmt = parse_with("select `order` from t", &Dialect::MYSQL).unwrap();
    assert_eq!(format_with(&stmt, &Dialect::MYSQL), "SELECT `order`\nFROM t");
}

#[test]
fn unquoted_identifiers_stay_bare() {
    assert_eq!(fmt("select plain_name from t"), "SELECT plain_name\nFROM t");
}

#[test]
fn appended_conditions_bracket_the_existing_chain() {
    let mut stmt = parse("select * from t").unwrap();
    let Statement::Select(ref mut query) = stmt else {
        panic!("expected a select");
    };
    query.and_where(Expr::column("flag"));
    query.and_where(Expr::column("active"));
    query.or_where(Expr::column("admin"));
    assert_eq!(
        format(&stmt),
        "SELECT *\nFROM t\nWHERE (flag AND active) OR admin"
    );
}

#[test]
fn parameters_are_reported_alongside_the_text() {
    let stmt = parse("select * from t where id = :id and k = :k and id2 = :id").unwrap();
    let (text, params) = format_with_parameters(&stmt, &Dialect::ANSI);
    assert_eq!(text, "SELECT *\nFROM t\nWHERE id = :id AND k = :k AND id2 = :id");
    let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["id", "k"]);
}

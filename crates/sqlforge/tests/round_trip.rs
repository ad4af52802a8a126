//! Round-trip contract: reparsing formatted output reproduces the same
//! token sequence as the original parse.

use sqlforge::dialect::Dialect;
use sqlforge::{format_with, parse_with};

fn assert_round_trip(src: &str) {
    let dialect = Dialect::ANSI;
    let first = parse_with(src, &dialect).unwrap_or_else(|e| panic!("parse of {src:?}: {e}"));
    let text = format_with(&first, &dialect);
    let second =
        parse_with(&text, &dialect).unwrap_or_else(|e| panic!("reparse of {text:?}: {e}"));
    let a: Vec<String> = first.tokens(&dialect).into_iter().map(|t| t.text).collect();
    let b: Vec<String> = second
        .tokens(&dialect)
        .into_iter()
        .map(|t| t.text)
        .collect();
    assert_eq!(a, b, "token drift for {src:?}; formatted as:\n{text}");
}

#[test]
fn select_with_joins() {
    assert_round_trip(
        "select u.id, u.name, count(*) as orders from users u \
         left join orders o on o.user_id = u.id \
         inner join plans p on p.id = u.plan_id \
         where u.active = 1 group by u.id, u.name having count(*) > 0 \
         order by orders desc nulls last limit 20 offset 40",
    );
}

#[test]
fn select_with_cte_and_window() {
    assert_round_trip(
        "with recent as materialized (select * from events where ts > :since), \
         ranked as (select id, row_number() over (partition by kind order by ts desc) rn from recent) \
         select * from ranked where rn = 1",
    );
}

#[test]
fn select_with_case_and_predicates() {
    assert_round_trip(
        "select case status when 1 then 'new' when 2 then 'open' else 'done' end, \
         x is not null, y not in (1, 2, 3), z between (1) and (9), \
         name like 'a%' escape '!' from items",
    );
}

#[test]
fn select_with_subqueries() {
    assert_round_trip(
        "select (select max(id) from t) top, x from (select 1 x union all select 2) sub \
         where exists (select 1 from audit a where a.ref = sub.x)",
    );
}

#[test]
fn select_with_named_window() {
    assert_round_trip(
        "select sum(v) over w from t window w as (partition by g order by ts \
         rows between 2 preceding and current row)",
    );
}

#[test]
fn compound_with_trailing_order() {
    assert_round_trip("select 1 a union select 2 intersect all select 3 order by a");
}

#[test]
fn insert_values() {
    assert_round_trip(
        "insert into logs (msg, level) values ('hi', 1), ('it''s fine', 2) returning id",
    );
}

#[test]
fn insert_select_with_reparented_with() {
    assert_round_trip(
        "with src as (select * from staging where ok = 1) insert into t (a, b) select a, b from src",
    );
}

#[test]
fn insert_default_values() {
    assert_round_trip("insert into heartbeats default values");
}

#[test]
fn update_from() {
    assert_round_trip(
        "with fresh as (select * from staging) \
         update t set v = f.v, touched = 1 from fresh f where t.id = f.id returning t.id",
    );
    assert_round_trip("update t set (a, b) = (select 1, 2) where id = 3");
}

#[test]
fn delete_using() {
    assert_round_trip("delete from t using u, v where t.id = u.id and u.ref = v.id returning t.id");
}

#[test]
fn merge_statement() {
    assert_round_trip(
        "merge into tgt using src on tgt.id = src.id \
         when matched and src.stale = 1 then delete \
         when matched then update set v = src.v \
         when not matched then insert (id, v) values (src.id, src.v)",
    );
}

#[test]
fn create_table() {
    assert_round_trip(
        "create table if not exists accounts (\
         id integer primary key autoincrement, \
         email varchar(255) not null unique, \
         balance decimal(10, 2) default 0 check (balance >= 0), \
         owner integer references users (id), \
         constraint uq unique (email), \
         foreign key (owner) references users (id))",
    );
}

#[test]
fn alter_table() {
    assert_round_trip("alter table t add column note text default 'n/a'");
    assert_round_trip("alter table t drop column note");
    assert_round_trip("alter table t rename column a to b");
    assert_round_trip("alter table t rename to u");
}

#[test]
fn create_index() {
    assert_round_trip(
        "create unique index if not exists ix_live on events (ts desc, id asc) where deleted = 0",
    );
}

#[test]
fn bare_values() {
    assert_round_trip("values (1, 'a'), (2, 'b'), (3, null)");
}

#[test]
fn null_comparisons_rewrite_stably() {
    assert_round_trip("select * from t where a = null and b <> null and c is null");
}

#[test]
fn quoted_identifiers_and_binds() {
    assert_round_trip("select \"order\", \"odd name\" from \"group\" where id = :id and k = :k");
}

#[test]
fn mssql_dialect_round_trip() {
    let dialect = Dialect::MSSQL;
    let src = "select [order] from t where id = @id";
    let first = parse_with(src, &dialect).unwrap();
    let text = format_with(&first, &dialect);
    let second = parse_with(&text, &dialect).unwrap();
    let a: Vec<String> = first.tokens(&dialect).into_iter().map(|t| t.text).collect();
    let b: Vec<String> = second
        .tokens(&dialect)
        .into_iter()
        .map(|t| t.text)
        .collect();
    assert_eq!(a, b);
}

#[test]
fn mysql_dialect_round_trip() {
    let dialect = Dialect::MYSQL;
    let src = "select `order` from t where id = @id";
    let first = parse_with(src, &dialect).unwrap();
    let text = format_with(&first, &dialect);
    let second = parse_with(&text, &dialect).unwrap();
    assert_eq!(
        first
            .tokens(&dialect)
            .into_iter()
            .map(|t| t.text)
            .collect::<Vec<_>>(),
        second
            .tokens(&dialect)
            .into_iter()
            .map(|t| t.text)
            .collect::<Vec<_>>()
    );
}

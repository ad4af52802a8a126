//! Tree collectors: parameters and referenced tables are found anywhere
//! in the tree, including CTE bodies and nested subqueries, with declared
//! CTE names excluded from the physical-table list.

use sqlforge::dialect::Dialect;
use sqlforge::parse_with;

fn names(params: &[sqlforge::ast::Parameter]) -> Vec<&str> {
    params.iter().map(|p| p.name.as_str()).collect()
}

fn tables(stmt: &sqlforge::Statement) -> Vec<String> {
    stmt.physical_tables()
        .into_iter()
        .map(|q| q.name)
        .collect()
}

#[test]
fn parameters_are_found_inside_cte_bodies_and_subqueries() {
    let stmt = parse_with(
        "with recent as (select id from events where ts > :since) \
         select * from recent \
         where author in (select actor from audit where actor = :actor)",
        &Dialect::ANSI,
    )
    .unwrap();
    assert_eq!(names(&stmt.parameters()), vec!["since", "actor"]);
    // The CTE name is not a physical table; the tables its body and the
    // subquery reference are.
    assert_eq!(tables(&stmt), vec!["events".to_owned(), "audit".to_owned()]);
}

#[test]
fn derived_table_and_scalar_subquery_parameters_keep_traversal_order() {
    let stmt = parse_with(
        "select (select max(v) from m where k = :first) \
         from (select * from inner_t where id = :second) sub \
         where flag = :third",
        &Dialect::ANSI,
    )
    .unwrap();
    assert_eq!(names(&stmt.parameters()), vec!["first", "second", "third"]);
    assert_eq!(
        tables(&stmt),
        vec!["m".to_owned(), "inner_t".to_owned()]
    );
}

#[test]
fn update_with_leading_cte_collects_through_the_wrapper() {
    let stmt = parse_with(
        "with src as (select id, v from staging where batch = :batch) \
         update t set v = :v from src where t.id = src.id",
        &Dialect::ANSI,
    )
    .unwrap();
    assert_eq!(names(&stmt.parameters()), vec!["batch", "v"]);
    assert_eq!(tables(&stmt), vec!["staging".to_owned(), "t".to_owned()]);
}

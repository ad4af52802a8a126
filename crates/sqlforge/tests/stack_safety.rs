//! Degenerate inputs that would overflow a recursive walk: compound
//! chains and VALUES row lists are flat vectors end to end, so these
//! finish without deepening the stack.

use sqlforge::{format, parse, Statement};

#[test]
fn fifty_thousand_way_union_all() {
    let mut sql = String::from("select 1");
    for _ in 0..50_000 {
        sql.push_str(" union all select 1");
    }
    let stmt = parse(&sql).unwrap();
    let Statement::Select(ref query) = stmt else {
        panic!("expected a select");
    };
    assert_eq!(query.compounds.len(), 50_000);

    let text = format(&stmt);
    assert_eq!(text.matches("UNION ALL").count(), 50_000);
    assert_eq!(stmt.physical_tables().len(), 0);
}

#[test]
fn fifty_thousand_and_one_value_rows() {
    let mut sql = String::from("insert into t (a, b) values ");
    for i in 0..50_001 {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str("(1, 'x')");
    }
    let stmt = parse(&sql).unwrap();
    let Statement::Insert(ref insert) = stmt else {
        panic!("expected an insert");
    };
    let sqlforge::ast::InsertSource::Values(ref values) = insert.source else {
        panic!("expected a values source");
    };
    assert_eq!(values.rows.len(), 50_001);

    let text = format(&stmt);
    // One line per row plus INSERT INTO and VALUES keyword lines.
    assert_eq!(text.lines().count(), 50_003);
}

#[test]
fn deep_compound_walks_stay_iterative() {
    let mut sql = String::from("select x from t0");
    for i in 1..=10_000 {
        sql.push_str(&format!(" union select x from t{i}"));
    }
    let stmt = parse(&sql).unwrap();
    assert_eq!(stmt.physical_tables().len(), 10_001);
    assert_eq!(stmt.parameters().len(), 0);
}

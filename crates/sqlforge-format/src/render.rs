//! The token renderer: display tokens in, indented SQL text out.
//!
//! Layout rules, all keyed off the token stream alone:
//! - Clause-opener keywords (`SELECT`, `FROM`, `WHERE`, …) start a new
//!   line at the current indent. Set operators, join keywords, and MERGE
//!   arms also start lines but carry no item list.
//! - A clause whose comma-separated list has more than one item puts each
//!   item on its own line one level deeper, comma trailing; a single-item
//!   clause stays on the keyword's line. Only commas owned by the clause's
//!   emitting node count — commas inside function calls or type arguments
//!   belong to other nodes and never break lines.
//! - A parenthesis whose first inner token opens a query (`SELECT`,
//!   `VALUES`, `WITH`) is a block: its body is indented one level and the
//!   closer gets its own line. Every other parenthesis stays inline, so
//!   `OVER (…)` and DDL bodies do not explode vertically.
//!
//! One indent level is four spaces. The walk is a single loop over the
//! tokens; statement depth never maps to call depth.

use sqlforge_ast::emit::{DisplayToken, NodeId};

const INDENT: &str = "    ";

/// Clause openers: start a line and own a comma-separated item list.
const OPENERS: &[&str] = &[
    "SELECT",
    "SELECT DISTINCT",
    "FROM",
    "WHERE",
    "GROUP BY",
    "HAVING",
    "WINDOW",
    "ORDER BY",
    "LIMIT",
    "WITH",
    "WITH RECURSIVE",
    "VALUES",
    "INSERT INTO",
    "UPDATE",
    "SET",
    "DELETE FROM",
    "USING",
    "RETURNING",
    "MERGE INTO",
];

/// Keywords that start a line without list semantics.
const LINE_STARTERS: &[&str] = &[
    "UNION",
    "UNION ALL",
    "INTERSECT",
    "INTERSECT ALL",
    "EXCEPT",
    "EXCEPT ALL",
    "INNER JOIN",
    "LEFT JOIN",
    "RIGHT JOIN",
    "FULL JOIN",
    "CROSS JOIN",
    "WHEN MATCHED",
    "WHEN NOT MATCHED",
];

/// Parenthesis bodies that open one of these are rendered as blocks.
const BLOCK_OPENERS: &[&str] = &["SELECT", "SELECT DISTINCT", "VALUES", "WITH", "WITH RECURSIVE"];

fn is_opener(token: &DisplayToken) -> bool {
    token.reserved && OPENERS.contains(&token.text.as_str())
}

fn is_line_starter(token: &DisplayToken) -> bool {
    token.reserved && LINE_STARTERS.contains(&token.text.as_str())
}

/// An identifier-ish token: a parenthesis directly after one belongs to a
/// call (`count(…)`, `varchar(255)`) and gets no separating space.
fn is_ident_like(token: &DisplayToken) -> bool {
    !token.reserved
        && token
            .text
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || matches!(c, '_' | '"' | '`' | '['))
}

/// Whether the clause opened at `index` has more than one item: true when
/// a comma owned by the same node appears before the next line-breaking
/// keyword at the same parenthesis level.
fn opener_is_multi(tokens: &[DisplayToken], index: usize) -> bool {
    let owner = tokens[index].owner;
    let mut depth = 0usize;
    for token in &tokens[index + 1..] {
        match token.text.as_str() {
            "(" => depth += 1,
            ")" => {
                let Some(next) = depth.checked_sub(1) else {
                    return false;
                };
                depth = next;
            }
            "," if depth == 0 && token.owner == owner => return true,
            _ if depth == 0 && (is_opener(token) || is_line_starter(token)) => return false,
            _ => {}
        }
    }
    false
}

#[derive(Debug, Clone, Copy)]
struct ListState {
    owner: NodeId,
    multi: bool,
}

struct Renderer {
    out: String,
    line: String,
    indent: usize,
    /// One frame per open parenthesis: whether it is a block, and the
    /// list state to restore when it closes.
    parens: Vec<(bool, Option<ListState>)>,
    list: Option<ListState>,
}

impl Renderer {
    fn new() -> Self {
        Self {
            out: String::new(),
            line: String::new(),
            indent: 0,
            parens: Vec::new(),
            list: None,
        }
    }

    fn flush(&mut self) {
        if !self.line.trim().is_empty() {
            if !self.out.is_empty() {
                self.out.push('\n');
            }
            self.out.push_str(self.line.trim_end());
        }
        self.line.clear();
    }

    fn open_line(&mut self, indent: usize) {
        self.flush();
        for _ in 0..indent {
            self.line.push_str(INDENT);
        }
    }

    fn append(&mut self, text: &str, space_before: bool) {
        if space_before && !self.line.is_empty() && !self.line.ends_with(' ') {
            self.line.push(' ');
        }
        self.line.push_str(text);
    }

    fn finish(mut self) -> String {
        self.flush();
        self.out
    }
}

/// Render a display-token stream into indented SQL text.
#[must_use]
pub fn render(tokens: &[DisplayToken]) -> String {
    let mut r = Renderer::new();
    let mut prev: Option<&DisplayToken> = None;

    for (i, token) in tokens.iter().enumerate() {
        // Inside an inline paren (OVER specs, DDL bodies) clause keywords
        // lose their line-breaking power.
        let breakable = r.parens.iter().all(|(block, _)| *block);
        match token.text.as_str() {
            "(" => {
                let block = tokens
                    .get(i + 1)
                    .is_some_and(|n| n.reserved && BLOCK_OPENERS.contains(&n.text.as_str()));
                let space = prev.is_some_and(|p| {
                    !is_ident_like(p) && !matches!(p.text.as_str(), "(" | ".")
                });
                r.append("(", space);
                r.parens.push((block, r.list.take()));
                if block {
                    r.indent += 1;
                }
            }
            ")" => {
                let (block, saved) = r.parens.pop().unwrap_or((false, None));
                if block {
                    r.indent = r.indent.saturating_sub(1);
                    r.open_line(r.indent);
                }
                r.append(")", false);
                r.list = saved;
            }
            "," => {
                r.append(",", false);
                if r.list.is_some_and(|l| l.multi && l.owner == token.owner) {
                    r.open_line(r.indent + 1);
                }
            }
            "." => r.append(".", false),
            _ if is_opener(token) && breakable => {
                r.open_line(r.indent);
                r.append(&token.text, false);
                let multi = opener_is_multi(tokens, i);
                r.list = Some(ListState {
                    owner: token.owner,
                    multi,
                });
                if multi {
                    r.open_line(r.indent + 1);
                }
            }
            _ if is_line_starter(token) && breakable => {
                r.open_line(r.indent);
                r.append(&token.text, false);
                r.list = None;
            }
            text => {
                let space = !matches!(prev.map(|p| p.text.as_str()), Some("(" | "."));
                r.append(text, space);
            }
        }
        prev = Some(token);
    }
    r.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlforge_ast::dialect::Dialect;
    use sqlforge_ast::{
        Expr, FromClause, QualifiedName, SelectItem, SelectQuery, Statement, TableRef,
    };

    fn select_of(items: Vec<SelectItem>, table: Option<&str>) -> Statement {
        Statement::Select(SelectQuery {
            items,
            from: table.map(|t| FromClause::of(TableRef::physical(QualifiedName::bare(t)))),
            ..SelectQuery::default()
        })
    }

    #[test]
    fn single_item_clauses_stay_inline() {
        let stmt = select_of(vec![SelectItem::bare(Expr::column("a"))], Some("t"));
        let text = render(&stmt.tokens(&Dialect::ANSI));
        assert_eq!(text, "SELECT a\nFROM t");
    }

    #[test]
    fn multi_item_select_list_breaks_per_item() {
        let stmt = select_of(
            vec![
                SelectItem::bare(Expr::column("a")),
                SelectItem::bare(Expr::column("b")),
            ],
            None,
        );
        let text = render(&stmt.tokens(&Dialect::ANSI));
        assert_eq!(text, "SELECT\n    a,\n    b");
    }

    #[test]
    fn function_call_commas_never_break_lines() {
        use sqlforge_ast::{ExprChain, FunctionCall};
        let call = FunctionCall::new(
            "coalesce",
            vec![
                ExprChain::solo(Expr::column("a")),
                ExprChain::solo(Expr::column("b")),
            ],
        );
        let stmt = select_of(
            vec![
                SelectItem::bare(Expr::Function(call)),
                SelectItem::bare(Expr::column("c")),
            ],
            None,
        );
        let text = render(&stmt.tokens(&Dialect::ANSI));
        assert_eq!(text, "SELECT\n    coalesce(a, b),\n    c");
    }
}

//! Value-expression parsing: operands, postfix predicates, and the flat
//! left-to-right operator chain.
//!
//! The chain builder never recurses per operator: it parses one operand,
//! then loops appending `(op, operand)` links for as long as the next
//! significant span is a chain operator. Grouping parentheses recurse into
//! a fresh inner chain and come back as a single bracket operand, so the
//! tree records exactly the grouping the source text wrote.

use sqlforge_ast::{
    CaseExpr, CaseWhen, ChainOp, ColumnRef, Expr, ExprChain, FrameBound, FrameSpec, FrameUnits,
    FunctionArgs, FunctionCall, InSet, Literal, OverClause, Parameter, QualifiedName, TypeName,
    UnaryOp, WindowSpec,
};
use sqlforge_error::{ForgeError, ForgeResult};

use crate::cursor::Cursor;
use crate::parser;
use crate::span::{LexicalSpan, SpanKind};

/// Parse a full operator chain at the current position.
pub(crate) fn chain(c: &mut Cursor<'_>) -> ForgeResult<ExprChain> {
    let head = operand(c)?;
    let mut out = ExprChain::solo(head);
    while let Some(op) = peek_chain_op(c) {
        consume_chain_op(c, op);
        let next = operand(c)?;
        out.push(op, next);
    }
    Ok(out)
}

fn peek_chain_op(c: &Cursor<'_>) -> Option<ChainOp> {
    let span = c.peek()?;
    match span.kind {
        SpanKind::Operator => ChainOp::from_symbol(span.text),
        SpanKind::Word if span.is_word("and") => Some(ChainOp::And),
        SpanKind::Word if span.is_word("or") => Some(ChainOp::Or),
        SpanKind::Word if span.is_word("is") => {
            if c.peek_nth(1).is_some_and(|s| s.is_word("not")) {
                Some(ChainOp::IsNot)
            } else {
                Some(ChainOp::Is)
            }
        }
        _ => None,
    }
}

fn consume_chain_op(c: &mut Cursor<'_>, op: ChainOp) {
    c.bump();
    if op == ChainOp::IsNot {
        c.bump();
    }
}

/// Parse one operand: a primary expression plus any postfix predicates
/// (`IS [NOT] NULL`, `[NOT] IN/BETWEEN/LIKE`).
pub(crate) fn operand(c: &mut Cursor<'_>) -> ForgeResult<Expr> {
    let mut expr = primary(c)?;
    loop {
        if c.at_word("is") && is_null_ahead(c) {
            c.bump();
            let not = c.eat_word("not");
            c.expect_word("null")?;
            expr = Expr::IsNull {
                expr: Box::new(expr),
                not,
            };
            continue;
        }
        let not = c.at_word("not")
            && c.peek_nth(1).is_some_and(|s| {
                s.is_word("in") || s.is_word("between") || s.is_word("like")
            });
        if not {
            c.bump();
        }
        if c.eat_word("in") {
            expr = in_predicate(c, expr, not)?;
        } else if c.eat_word("between") {
            expr = between_predicate(c, expr, not)?;
        } else if c.eat_word("like") {
            expr = like_predicate(c, expr, not)?;
        } else {
            break;
        }
    }
    Ok(expr)
}

/// `IS [NOT] NULL` as a postfix predicate; bare `IS` stays a chain
/// operator for shapes like `x IS TRUE`.
fn is_null_ahead(c: &Cursor<'_>) -> bool {
    match c.peek_nth(1) {
        Some(s) if s.is_word("null") => true,
        Some(s) if s.is_word("not") => c.peek_nth(2).is_some_and(|s| s.is_word("null")),
        _ => false,
    }
}

fn in_predicate(c: &mut Cursor<'_>, expr: Expr, not: bool) -> ForgeResult<Expr> {
    if !c.at_symbol("(") {
        return Err(ForgeError::MissingClause {
            construct: "IN",
            clause: "right-hand operand list",
        });
    }
    c.bump();
    let set = if c.at_word("select") || c.at_word("with") {
        let query = parser::select_query(c)?;
        InSet::Query(Box::new(query))
    } else {
        let mut items = vec![chain(c)?];
        while c.eat_symbol(",") {
            items.push(chain(c)?);
        }
        InSet::List(items)
    };
    c.expect_symbol(")")?;
    Ok(Expr::In {
        expr: Box::new(expr),
        set,
        not,
    })
}

fn between_predicate(c: &mut Cursor<'_>, expr: Expr, not: bool) -> ForgeResult<Expr> {
    if c.at_end() {
        return Err(ForgeError::MissingClause {
            construct: "BETWEEN",
            clause: "lower bound",
        });
    }
    let low = operand(c)?;
    if !c.eat_word("and") {
        return Err(ForgeError::MissingClause {
            construct: "BETWEEN",
            clause: "upper bound",
        });
    }
    let high = operand(c)?;
    Ok(Expr::Between {
        expr: Box::new(expr),
        low: Box::new(low),
        high: Box::new(high),
        not,
    })
}

fn like_predicate(c: &mut Cursor<'_>, expr: Expr, not: bool) -> ForgeResult<Expr> {
    if c.at_end() {
        return Err(ForgeError::MissingClause {
            construct: "LIKE",
            clause: "pattern",
        });
    }
    let pattern = operand(c)?;
    let escape = if c.eat_word("escape") {
        Some(Box::new(operand(c)?))
    } else {
        None
    };
    Ok(Expr::Like {
        expr: Box::new(expr),
        pattern: Box::new(pattern),
        escape,
        not,
    })
}

fn primary(c: &mut Cursor<'_>) -> ForgeResult<Expr> {
    let Some(span) = c.peek() else {
        return Err(c.error_here("expected an expression"));
    };
    match span.kind {
        SpanKind::Number => {
            c.bump();
            Ok(Expr::Literal(Literal::Number(span.text.to_owned())))
        }
        SpanKind::StringLit => {
            c.bump();
            Ok(Expr::Literal(Literal::String(decode_string(span.text))))
        }
        SpanKind::Bind => {
            c.bump();
            Ok(Expr::Bind(Parameter::named(&span.text[1..])))
        }
        SpanKind::Operator => match span.text {
            "(" => bracket_or_subquery(c),
            "*" => {
                c.bump();
                Ok(Expr::Star(None))
            }
            "-" => {
                c.bump();
                Ok(Expr::Unary {
                    op: UnaryOp::Neg,
                    expr: Box::new(operand(c)?),
                })
            }
            "+" => {
                c.bump();
                operand(c)
            }
            other => Err(c.error_here(format!("unexpected `{other}` in expression"))),
        },
        SpanKind::Word | SpanKind::QuotedWord => word_primary(c, span),
        SpanKind::CommentOpen | SpanKind::CommentClose | SpanKind::CommentBody => {
            unreachable!("cursor never yields comment spans")
        }
    }
}

fn word_primary(c: &mut Cursor<'_>, span: LexicalSpan<'_>) -> ForgeResult<Expr> {
    if span.is_word("null") {
        c.bump();
        return Ok(Expr::Literal(Literal::Null));
    }
    if span.is_word("true") {
        c.bump();
        return Ok(Expr::Literal(Literal::True));
    }
    if span.is_word("false") {
        c.bump();
        return Ok(Expr::Literal(Literal::False));
    }
    if span.is_word("not") {
        c.bump();
        if c.at_word("exists") {
            return exists_predicate(c, true);
        }
        return Ok(Expr::Unary {
            op: UnaryOp::Not,
            expr: Box::new(operand(c)?),
        });
    }
    if span.is_word("exists") {
        return exists_predicate(c, false);
    }
    if span.is_word("case") {
        return case_expression(c);
    }
    if span.is_word("cast") {
        return cast_expression(c);
    }

    let first = decode_ident(c.bump().unwrap_or(span));
    if c.at_symbol("(") && span.kind == SpanKind::Word {
        return function_call(c, first).map(Expr::Function);
    }
    if c.at_symbol(".") {
        c.bump();
        if c.eat_symbol("*") {
            return Ok(Expr::Star(Some(first)));
        }
        let column = expect_ident(c)?;
        return Ok(Expr::Column(ColumnRef::qualified(first, column)));
    }
    Ok(Expr::Column(ColumnRef::bare(first)))
}

fn bracket_or_subquery(c: &mut Cursor<'_>) -> ForgeResult<Expr> {
    c.expect_symbol("(")?;
    if c.at_word("select") || c.at_word("with") {
        let query = parser::select_query(c)?;
        c.expect_symbol(")")?;
        return Ok(Expr::Subquery(Box::new(query)));
    }
    let inner = chain(c)?;
    c.expect_symbol(")")?;
    Ok(Expr::Bracket(Box::new(inner)))
}

fn exists_predicate(c: &mut Cursor<'_>, not: bool) -> ForgeResult<Expr> {
    c.expect_word("exists")?;
    c.expect_symbol("(")?;
    let query = parser::select_query(c)?;
    c.expect_symbol(")")?;
    Ok(Expr::Exists {
        query: Box::new(query),
        not,
    })
}

fn case_expression(c: &mut Cursor<'_>) -> ForgeResult<Expr> {
    c.expect_word("case")?;
    let operand_chain = if c.at_word("when") {
        None
    } else {
        Some(Box::new(chain(c)?))
    };
    let mut whens = Vec::new();
    while c.eat_word("when") {
        let when = chain(c)?;
        c.expect_word("then")?;
        let then = chain(c)?;
        whens.push(CaseWhen { when, then });
    }
    if whens.is_empty() {
        return Err(ForgeError::MissingClause {
            construct: "CASE",
            clause: "WHEN branch",
        });
    }
    let else_branch = if c.eat_word("else") {
        Some(Box::new(chain(c)?))
    } else {
        None
    };
    c.expect_word("end")?;
    Ok(Expr::Case(CaseExpr {
        operand: operand_chain,
        whens,
        else_branch,
    }))
}

fn cast_expression(c: &mut Cursor<'_>) -> ForgeResult<Expr> {
    c.expect_word("cast")?;
    c.expect_symbol("(")?;
    let inner = chain(c)?;
    c.expect_word("as")?;
    let ty = type_name(c)?;
    c.expect_symbol(")")?;
    Ok(Expr::Cast {
        expr: Box::new(inner),
        ty,
    })
}

pub(crate) fn function_call(c: &mut Cursor<'_>, name: String) -> ForgeResult<FunctionCall> {
    c.expect_symbol("(")?;
    let distinct = c.eat_word("distinct");
    let args = if c.eat_symbol(")") {
        FunctionArgs::List(Vec::new())
    } else if c.at_symbol("*") {
        c.bump();
        c.expect_symbol(")")?;
        FunctionArgs::Star
    } else {
        let mut args = vec![chain(c)?];
        while c.eat_symbol(",") {
            args.push(chain(c)?);
        }
        c.expect_symbol(")")?;
        FunctionArgs::List(args)
    };
    let over = if c.eat_word("over") {
        if c.eat_symbol("(") {
            let spec = window_spec(c)?;
            c.expect_symbol(")")?;
            Some(Box::new(OverClause::Spec(spec)))
        } else {
            Some(Box::new(OverClause::Named(expect_ident(c)?)))
        }
    } else {
        None
    };
    Ok(FunctionCall {
        name,
        args,
        distinct,
        over,
    })
}

/// The interior of an `OVER (…)` or `WINDOW … AS (…)` specification.
pub(crate) fn window_spec(c: &mut Cursor<'_>) -> ForgeResult<WindowSpec> {
    let base = match c.peek() {
        Some(s)
            if s.kind == SpanKind::Word
                && !s.is_word("partition")
                && !s.is_word("order")
                && !s.is_word("rows")
                && !s.is_word("range")
                && !s.is_word("groups") =>
        {
            c.bump();
            Some(decode_ident(s))
        }
        _ => None,
    };
    let mut partition_by = Vec::new();
    if c.eat_words("partition", "by") {
        partition_by.push(chain(c)?);
        while c.eat_symbol(",") {
            partition_by.push(chain(c)?);
        }
    }
    let mut order_by = Vec::new();
    if c.eat_words("order", "by") {
        order_by.push(parser::ordering_term(c)?);
        while c.eat_symbol(",") {
            order_by.push(parser::ordering_term(c)?);
        }
    }
    let frame = frame_spec(c)?;
    Ok(WindowSpec {
        base,
        partition_by,
        order_by,
        frame,
    })
}

fn frame_spec(c: &mut Cursor<'_>) -> ForgeResult<Option<FrameSpec>> {
    let units = if c.eat_word("rows") {
        FrameUnits::Rows
    } else if c.eat_word("range") {
        FrameUnits::Range
    } else if c.eat_word("groups") {
        FrameUnits::Groups
    } else {
        return Ok(None);
    };
    if c.eat_word("between") {
        let start = frame_bound(c)?;
        c.expect_word("and")?;
        let end = frame_bound(c)?;
        Ok(Some(FrameSpec {
            units,
            start,
            end: Some(end),
        }))
    } else {
        let start = frame_bound(c)?;
        Ok(Some(FrameSpec {
            units,
            start,
            end: None,
        }))
    }
}

fn frame_bound(c: &mut Cursor<'_>) -> ForgeResult<FrameBound> {
    if c.eat_word("unbounded") {
        if c.eat_word("preceding") {
            return Ok(FrameBound::UnboundedPreceding);
        }
        c.expect_word("following")?;
        return Ok(FrameBound::UnboundedFollowing);
    }
    if c.eat_words("current", "row") {
        return Ok(FrameBound::CurrentRow);
    }
    let offset = chain(c)?;
    if c.eat_word("preceding") {
        Ok(FrameBound::Preceding(offset))
    } else {
        c.expect_word("following")?;
        Ok(FrameBound::Following(offset))
    }
}

/// A column type name as written in DDL or CAST: a word, optionally with
/// a parenthesized argument list of numbers/words.
pub(crate) fn type_name(c: &mut Cursor<'_>) -> ForgeResult<TypeName> {
    let mut name = expect_ident(c)?;
    // Two-word types like DOUBLE PRECISION.
    if let Some(next) = c.peek() {
        if next.kind == SpanKind::Word && next.is_word("precision") {
            c.bump();
            name.push(' ');
            name.push_str("PRECISION");
        }
    }
    let mut args = Vec::new();
    if c.eat_symbol("(") {
        loop {
            let Some(arg) = c.bump() else {
                return Err(c.error_here("unterminated type argument list"));
            };
            args.push(arg.text.to_owned());
            if c.eat_symbol(",") {
                continue;
            }
            c.expect_symbol(")")?;
            break;
        }
    }
    Ok(TypeName { name, args })
}

/// Parse a possibly schema-qualified object name.
pub(crate) fn qualified_name(c: &mut Cursor<'_>) -> ForgeResult<QualifiedName> {
    let first = expect_ident(c)?;
    if c.at_symbol(".") {
        c.bump();
        let name = expect_ident(c)?;
        Ok(QualifiedName::qualified(first, name))
    } else {
        Ok(QualifiedName::bare(first))
    }
}

/// Consume a word or quoted word as an identifier.
pub(crate) fn expect_ident(c: &mut Cursor<'_>) -> ForgeResult<String> {
    match c.consume_if(|s| matches!(s.kind, SpanKind::Word | SpanKind::QuotedWord)) {
        Some(span) => Ok(decode_ident(span)),
        None => Err(c.error_here("expected an identifier")),
    }
}

/// Decode an identifier span: quoted words lose their quote pair and
/// collapse doubled closers, bare words stay as written.
pub(crate) fn decode_ident(span: LexicalSpan<'_>) -> String {
    if span.kind != SpanKind::QuotedWord {
        return span.text.to_owned();
    }
    let inner = &span.text[1..span.text.len() - 1];
    let close = span.text.chars().last().unwrap_or('"');
    let doubled: String = [close, close].iter().collect();
    inner.replace(&doubled, &close.to_string())
}

/// Decode a string literal span: strip the outer quotes and collapse the
/// `''` escape.
pub(crate) fn decode_string(raw: &str) -> String {
    raw[1..raw.len() - 1].replace("''", "'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlforge_ast::dialect::Dialect;
    use sqlforge_ast::LogicalProfile;

    fn parse_chain(src: &str) -> ExprChain {
        let mut c = Cursor::new(src, Dialect::ANSI).unwrap();
        let chain = chain(&mut c).unwrap();
        assert!(c.at_end(), "trailing input after {src:?}");
        chain
    }

    #[test]
    fn flat_chain_has_no_nesting() {
        let chain = parse_chain("a + b + c + d");
        assert_eq!(chain.links.len(), 3);
        assert!(chain.links.iter().all(|l| l.op == ChainOp::Add));
    }

    #[test]
    fn brackets_become_explicit_group_nodes() {
        let chain = parse_chain("a * (b + c)");
        assert_eq!(chain.links.len(), 1);
        assert_eq!(chain.links[0].op, ChainOp::Mul);
        let Expr::Bracket(ref inner) = chain.links[0].expr else {
            panic!("expected bracket operand");
        };
        assert_eq!(inner.links[0].op, ChainOp::Add);
    }

    #[test]
    fn null_comparison_rewrites_at_parse_time() {
        let chain = parse_chain("x = null");
        assert_eq!(chain.links[0].op, ChainOp::Is);
        let chain = parse_chain("x <> null");
        assert_eq!(chain.links[0].op, ChainOp::IsNot);
    }

    #[test]
    fn is_null_postfix_binds_tighter_than_the_chain() {
        let chain = parse_chain("x is null and y is not null");
        assert_eq!(chain.logical_profile(), LogicalProfile::Pure(ChainOp::And));
        assert!(matches!(chain.head, Expr::IsNull { not: false, .. }));
        assert!(matches!(chain.links[0].expr, Expr::IsNull { not: true, .. }));
    }

    #[test]
    fn string_literal_decodes_doubled_quotes() {
        let chain = parse_chain("'It''s raining'");
        assert_eq!(
            chain.head,
            Expr::Literal(Literal::String("It's raining".to_owned()))
        );
    }

    #[test]
    fn between_requires_both_bounds() {
        let mut c = Cursor::new("x between 1", Dialect::ANSI).unwrap();
        let err = chain(&mut c).unwrap_err();
        assert!(matches!(err, ForgeError::MissingClause { construct: "BETWEEN", .. }));
    }

    #[test]
    fn in_requires_a_parenthesized_set() {
        let mut c = Cursor::new("x in y", Dialect::ANSI).unwrap();
        let err = chain(&mut c).unwrap_err();
        assert!(matches!(err, ForgeError::MissingClause { construct: "IN", .. }));
    }

    #[test]
    fn not_in_parses_as_negated_membership() {
        let chain = parse_chain("x not in (1, 2, 3)");
        let Expr::In { not, ref set, .. } = chain.head else {
            panic!("expected IN predicate");
        };
        assert!(not);
        let InSet::List(ref items) = *set else {
            panic!("expected list set");
        };
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn case_with_operand_and_else() {
        let chain = parse_chain("case x when 1 then 'one' else 'many' end");
        let Expr::Case(ref case) = chain.head else {
            panic!("expected case");
        };
        assert!(case.operand.is_some());
        assert_eq!(case.whens.len(), 1);
        assert!(case.else_branch.is_some());
    }

    #[test]
    fn case_without_branches_is_a_structural_error() {
        let mut c = Cursor::new("case end", Dialect::ANSI).unwrap();
        let err = chain(&mut c).unwrap_err();
        assert!(matches!(err, ForgeError::MissingClause { construct: "CASE", .. }));
    }

    #[test]
    fn windowed_aggregate_with_frame() {
        let chain = parse_chain(
            "sum(x) over (partition by dept order by hired rows between unbounded preceding and current row)",
        );
        let Expr::Function(ref call) = chain.head else {
            panic!("expected function");
        };
        let Some(ref over) = call.over else {
            panic!("expected OVER clause");
        };
        let OverClause::Spec(ref spec) = **over else {
            panic!("expected inline spec");
        };
        assert_eq!(spec.partition_by.len(), 1);
        assert_eq!(spec.order_by.len(), 1);
        let frame = spec.frame.as_ref().unwrap();
        assert_eq!(frame.units, FrameUnits::Rows);
        assert!(matches!(frame.start, FrameBound::UnboundedPreceding));
        assert!(matches!(frame.end, Some(FrameBound::CurrentRow)));
    }

    #[test]
    fn count_star_and_distinct() {
        let chain = parse_chain("count(*)");
        let Expr::Function(ref call) = chain.head else {
            panic!("expected function");
        };
        assert_eq!(call.args, FunctionArgs::Star);

        let chain = parse_chain("count(distinct id)");
        let Expr::Function(ref call) = chain.head else {
            panic!("expected function");
        };
        assert!(call.distinct);
    }

    #[test]
    fn quoted_identifier_decodes_per_dialect() {
        let mut c = Cursor::new("\"odd \"\"name\"\"\"", Dialect::ANSI).unwrap();
        let chain = chain(&mut c).unwrap();
        assert_eq!(
            chain.head,
            Expr::Column(ColumnRef::bare("odd \"name\""))
        );
    }

    #[test]
    fn type_cast_operator_chains() {
        let chain = parse_chain("price::text");
        assert_eq!(chain.links[0].op, ChainOp::TypeCast);
    }

    #[test]
    fn cast_function_form() {
        let chain = parse_chain("cast(price as decimal(10, 2))");
        let Expr::Cast { ref ty, .. } = chain.head else {
            panic!("expected cast");
        };
        assert_eq!(ty.name, "decimal");
        assert_eq!(ty.args, vec!["10".to_owned(), "2".to_owned()]);
    }
}

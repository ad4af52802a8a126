//! The lexer: a lazy iterator from SQL text to [`LexicalSpan`]s.
//!
//! Whitespace is a boundary only and never surfaces as a span. Comments do
//! surface: their markers (`--`, `/*`, `*/`) are distinct spans so callers
//! can preserve or discard them, and the interior of a block comment is
//! scanned with a reduced grammar (word runs and single characters) so an
//! apostrophe inside a comment cannot fail the lex. Adjacent comment
//! markers are never merged across an intervening token: `a//*b**/` lexes
//! as `a`, `/`, `/*`, `b`, `*`, `*/`.
//!
//! Dialect affects exactly two things here: which identifier-quote pair is
//! recognized and which bind-marker character introduces a parameter.

use memchr::memchr;
use sqlforge_ast::dialect::{Dialect, QuoteStyle};
use sqlforge_error::{ForgeError, ForgeResult};

use crate::span::{LexicalSpan, SpanKind};

const TWO_CHAR_OPERATORS: [&str; 6] = ["<=", ">=", "<>", "!=", "::", "||"];

/// Lazy span producer. Restartable by constructing a new one; finite once
/// the end of input is reached; callers may abandon it mid-stream.
#[derive(Debug)]
pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    dialect: Dialect,
    /// Block-comment nesting depth.
    comment_depth: u32,
    /// Set after emitting a `--` opener; the next span is the line body.
    pending_line_body: bool,
    /// Whether the previous significant span can end an operand, which
    /// decides leading-sign folding for `-`/`+`.
    prev_ends_operand: bool,
    done: bool,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(src: &'a str, dialect: Dialect) -> Self {
        Self::at(src, 0, dialect)
    }

    /// Start lexing at a byte offset into a larger buffer. Span offsets
    /// are absolute within `src`.
    #[must_use]
    pub fn at(src: &'a str, offset: usize, dialect: Dialect) -> Self {
        Self {
            src,
            pos: offset.min(src.len()),
            dialect,
            comment_depth: 0,
            pending_line_body: false,
            prev_ends_operand: false,
            done: false,
        }
    }

    fn bytes(&self) -> &'a [u8] {
        self.src.as_bytes()
    }

    fn peek_byte(&self, ahead: usize) -> Option<u8> {
        self.bytes().get(self.pos + ahead).copied()
    }

    fn span(&mut self, start: usize, end: usize, kind: SpanKind) -> LexicalSpan<'a> {
        self.pos = end;
        LexicalSpan {
            text: &self.src[start..end],
            offset: start,
            kind,
        }
    }

    fn skip_whitespace(&mut self) {
        while self
            .peek_byte(0)
            .is_some_and(|b| b.is_ascii_whitespace())
        {
            self.pos += 1;
        }
    }

    /// The rest of the current line after a `--` opener.
    fn line_body(&mut self) -> Option<LexicalSpan<'a>> {
        self.pending_line_body = false;
        let start = self.pos;
        let end = memchr(b'\n', &self.bytes()[start..]).map_or(self.src.len(), |i| start + i);
        if start == end {
            return None;
        }
        Some(self.span(start, end, SpanKind::CommentBody))
    }

    /// Reduced scan used inside block comments: markers, word runs, and
    /// single characters. String quoting is not interpreted here.
    fn comment_interior(&mut self) -> LexicalSpan<'a> {
        let start = self.pos;
        if self.src[start..].starts_with("*/") {
            self.comment_depth -= 1;
            return self.span(start, start + 2, SpanKind::CommentClose);
        }
        if self.src[start..].starts_with("/*") {
            self.comment_depth += 1;
            return self.span(start, start + 2, SpanKind::CommentOpen);
        }
        let bytes = self.bytes();
        if is_ident_continue(bytes[start]) {
            let mut end = start + 1;
            while end < bytes.len() && is_ident_continue(bytes[end]) {
                end += 1;
            }
            return self.span(start, end, SpanKind::Word);
        }
        let ch_len = self.src[start..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        self.span(start, start + ch_len, SpanKind::Operator)
    }

    fn string_literal(&mut self) -> ForgeResult<LexicalSpan<'a>> {
        let start = self.pos;
        let bytes = self.bytes();
        let mut cursor = start + 1;
        loop {
            let Some(quote) = memchr(b'\'', &bytes[cursor..]) else {
                self.done = true;
                return Err(ForgeError::lexical(start, "unterminated string literal"));
            };
            cursor += quote + 1;
            // A doubled quote is an escaped quote inside the literal.
            if bytes.get(cursor) == Some(&b'\'') {
                cursor += 1;
                continue;
            }
            return Ok(self.span(start, cursor, SpanKind::StringLit));
        }
    }

    fn quoted_identifier(&mut self) -> ForgeResult<LexicalSpan<'a>> {
        let start = self.pos;
        let close = self.dialect.quote.close() as u8;
        let doubles_escape = !matches!(self.dialect.quote, QuoteStyle::Bracket);
        let bytes = self.bytes();
        let mut cursor = start + 1;
        loop {
            let Some(hit) = memchr(close, &bytes[cursor..]) else {
                self.done = true;
                return Err(ForgeError::lexical(start, "unterminated quoted identifier"));
            };
            cursor += hit + 1;
            if doubles_escape && bytes.get(cursor) == Some(&close) {
                cursor += 1;
                continue;
            }
            return Ok(self.span(start, cursor, SpanKind::QuotedWord));
        }
    }

    /// Scan a numeric literal starting at `start`; `self.pos` may already
    /// sit past a folded sign character.
    fn number(&mut self, start: usize) -> LexicalSpan<'a> {
        let bytes = self.bytes();
        let mut end = self.pos;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if bytes.get(end) == Some(&b'.')
            && bytes.get(end + 1).is_some_and(u8::is_ascii_digit)
        {
            end += 2;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
        }
        // Exponent suffix: only when the digits actually follow, so `1e`
        // stays a number and a word.
        if matches!(bytes.get(end), Some(b'e' | b'E')) {
            let mut cursor = end + 1;
            if matches!(bytes.get(cursor), Some(b'+' | b'-')) {
                cursor += 1;
            }
            if bytes.get(cursor).is_some_and(u8::is_ascii_digit) {
                end = cursor + 1;
                while end < bytes.len() && bytes[end].is_ascii_digit() {
                    end += 1;
                }
            }
        }
        self.span(start, end, SpanKind::Number)
    }

    fn word(&mut self) -> LexicalSpan<'a> {
        let start = self.pos;
        let bytes = self.bytes();
        let mut end = start + 1;
        while end < bytes.len() && is_ident_continue(bytes[end]) {
            end += 1;
        }
        self.span(start, end, SpanKind::Word)
    }

    fn bind_parameter(&mut self) -> LexicalSpan<'a> {
        let start = self.pos;
        let bytes = self.bytes();
        let mut end = start + 1;
        while end < bytes.len() && is_ident_continue(bytes[end]) {
            end += 1;
        }
        self.span(start, end, SpanKind::Bind)
    }

    fn next_span(&mut self) -> Option<ForgeResult<LexicalSpan<'a>>> {
        if self.pending_line_body {
            if let Some(body) = self.line_body() {
                return Some(Ok(body));
            }
        }
        self.skip_whitespace();
        if self.pos >= self.src.len() {
            if self.comment_depth > 0 {
                self.done = true;
                return Some(Err(ForgeError::lexical(
                    self.src.len(),
                    "unterminated block comment",
                )));
            }
            return None;
        }
        if self.comment_depth > 0 {
            return Some(Ok(self.comment_interior()));
        }

        let start = self.pos;
        let b = self.bytes()[start];
        let next = self.peek_byte(1);

        if b == b'-' && next == Some(b'-') {
            self.pending_line_body = true;
            return Some(Ok(self.span(start, start + 2, SpanKind::CommentOpen)));
        }
        if b == b'/' && next == Some(b'*') {
            self.comment_depth = 1;
            return Some(Ok(self.span(start, start + 2, SpanKind::CommentOpen)));
        }
        if b == b'\'' {
            return Some(self.string_literal());
        }
        if b == self.dialect.quote.open() as u8 {
            return Some(self.quoted_identifier());
        }
        if b.is_ascii() && next.is_some_and(|n| n.is_ascii()) {
            let pair = &self.src[start..start + 2];
            if TWO_CHAR_OPERATORS.contains(&pair) {
                return Some(Ok(self.span(start, start + 2, SpanKind::Operator)));
            }
        }
        if b == self.dialect.bind.char() as u8
            && next.is_some_and(|n| is_ident_continue(n))
        {
            return Some(Ok(self.bind_parameter()));
        }
        if (b == b'-' || b == b'+') && !self.prev_ends_operand {
            let digit_follows = next.is_some_and(|n| n.is_ascii_digit())
                || (next == Some(b'.') && self.peek_byte(2).is_some_and(|n| n.is_ascii_digit()));
            if digit_follows {
                self.pos = start + 1;
                return Some(Ok(self.number(start)));
            }
        }
        if b.is_ascii_digit()
            || (b == b'.' && next.is_some_and(|n| n.is_ascii_digit()))
        {
            return Some(Ok(self.number(start)));
        }
        if is_ident_start(b) {
            return Some(Ok(self.word()));
        }
        let ch_len = self.src[start..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        Some(Ok(self.span(start, start + ch_len, SpanKind::Operator)))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = ForgeResult<LexicalSpan<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.next_span();
        if let Some(Ok(ref span)) = item {
            if !span.kind.is_comment() {
                self.prev_ends_operand = span.ends_operand();
            }
        }
        item
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> Vec<(String, SpanKind)> {
        Lexer::new(src, Dialect::ANSI)
            .map(|r| r.map(|s| (s.text.to_owned(), s.kind)))
            .collect::<ForgeResult<Vec<_>>>()
            .unwrap()
    }

    fn texts(src: &str) -> Vec<String> {
        lex(src).into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn adjacent_comment_markers_do_not_merge() {
        assert_eq!(texts("a//*b**/"), vec!["a", "/", "/*", "b", "*", "*/"]);
    }

    #[test]
    fn doubled_quote_stays_inside_one_string_span() {
        let spans = lex("select 'It''s raining'");
        assert_eq!(spans[1], ("'It''s raining'".to_owned(), SpanKind::StringLit));
    }

    #[test]
    fn unterminated_string_is_a_lexical_error() {
        let result: ForgeResult<Vec<_>> = Lexer::new("select 'oops", Dialect::ANSI).collect();
        assert!(matches!(result, Err(ForgeError::Lexical { .. })));
    }

    #[test]
    fn unterminated_block_comment_is_a_lexical_error() {
        let result: ForgeResult<Vec<_>> = Lexer::new("a /* no close", Dialect::ANSI).collect();
        assert!(matches!(result, Err(ForgeError::Lexical { .. })));
    }

    #[test]
    fn line_comment_emits_marker_then_body() {
        let spans = lex("a -- trailing note\nb");
        assert_eq!(
            spans,
            vec![
                ("a".to_owned(), SpanKind::Word),
                ("--".to_owned(), SpanKind::CommentOpen),
                (" trailing note".to_owned(), SpanKind::CommentBody),
                ("b".to_owned(), SpanKind::Word),
            ]
        );
    }

    #[test]
    fn multi_character_operators_lex_greedily() {
        assert_eq!(texts("a<=b<>c!=d::e||f"), vec![
            "a", "<=", "b", "<>", "c", "!=", "d", "::", "e", "||", "f"
        ]);
    }

    #[test]
    fn leading_sign_folds_into_number_only_after_non_operand() {
        // After `=` the sign is part of the literal.
        assert_eq!(texts("x = -5"), vec!["x", "=", "-5"]);
        // After an operand it is a binary operator.
        assert_eq!(texts("x - 5"), vec!["x", "-", "5"]);
        assert_eq!(texts("(x) - 5"), vec!["(", "x", ")", "-", "5"]);
        assert_eq!(texts("x + +1.5"), vec!["x", "+", "+1.5"]);
    }

    #[test]
    fn exponents_extend_numbers_only_with_trailing_digits() {
        assert_eq!(texts("1.5e10 + 2E-3"), vec!["1.5e10", "+", "2E-3"]);
        // Without digits the `e` is the start of a word.
        assert_eq!(texts("2e"), vec!["2", "e"]);
    }

    #[test]
    fn bind_markers_follow_dialect() {
        let spans = lex("where id = :id");
        assert_eq!(spans.last().unwrap(), &(":id".to_owned(), SpanKind::Bind));

        let mssql: Vec<_> = Lexer::new("@name", Dialect::MSSQL)
            .collect::<ForgeResult<Vec<_>>>()
            .unwrap();
        assert_eq!(mssql[0].kind, SpanKind::Bind);
        assert_eq!(mssql[0].text, "@name");
    }

    #[test]
    fn double_colon_is_an_operator_not_a_bind() {
        assert_eq!(texts("x::int"), vec!["x", "::", "int"]);
    }

    #[test]
    fn quoted_identifiers_follow_dialect() {
        let spans = lex("\"order count\"");
        assert_eq!(spans[0], ("\"order count\"".to_owned(), SpanKind::QuotedWord));

        let mysql: Vec<_> = Lexer::new("`order`", Dialect::MYSQL)
            .collect::<ForgeResult<Vec<_>>>()
            .unwrap();
        assert_eq!(mysql[0].kind, SpanKind::QuotedWord);

        let mssql: Vec<_> = Lexer::new("[order]", Dialect::MSSQL)
            .collect::<ForgeResult<Vec<_>>>()
            .unwrap();
        assert_eq!(mssql[0].kind, SpanKind::QuotedWord);
    }

    #[test]
    fn offsets_are_absolute() {
        let spans = lex("ab  cd");
        assert_eq!(spans[0].0, "ab");
        let all: Vec<_> = Lexer::new("ab  cd", Dialect::ANSI)
            .collect::<ForgeResult<Vec<_>>>()
            .unwrap();
        assert_eq!(all[1].offset, 4);
    }

    #[test]
    fn restart_at_offset() {
        let src = "select x";
        let spans: Vec<_> = Lexer::at(src, 7, Dialect::ANSI)
            .collect::<ForgeResult<Vec<_>>>()
            .unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "x");
        assert_eq!(spans[0].offset, 7);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn spans_always_point_back_into_the_source(src in "[ -~]{0,60}") {
                let lexed: ForgeResult<Vec<_>> = Lexer::new(&src, Dialect::ANSI).collect();
                if let Ok(spans) = lexed {
                    for span in spans {
                        prop_assert!(src[span.offset..].starts_with(span.text));
                    }
                }
            }
        }
    }
}

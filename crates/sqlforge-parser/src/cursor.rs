//! Cursor over a lexed span stream: lookahead, conditional consumption,
//! and balanced-parenthesis extraction for the per-construct parsers.
//!
//! The cursor lexes its input up front and then navigates the span list.
//! Comment spans stay in the list (so balanced extraction can hand back a
//! subrange with its comments intact) but every navigation method skips
//! them, which is the right default for expression contexts.

use sqlforge_ast::dialect::Dialect;
use sqlforge_error::{ForgeError, ForgeResult};

use crate::lexer::Lexer;
use crate::span::{LexicalSpan, SpanKind};

#[derive(Debug)]
pub struct Cursor<'a> {
    src: &'a str,
    dialect: Dialect,
    spans: Vec<LexicalSpan<'a>>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Lex the whole input. Lexical errors surface here, before any
    /// parsing begins.
    pub fn new(src: &'a str, dialect: Dialect) -> ForgeResult<Self> {
        let spans = Lexer::new(src, dialect).collect::<ForgeResult<Vec<_>>>()?;
        Ok(Self {
            src,
            dialect,
            spans,
            pos: 0,
        })
    }

    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    #[must_use]
    pub fn source(&self) -> &'a str {
        self.src
    }

    /// Index of the first non-comment span at or after the current
    /// position, without moving.
    fn significant(&self) -> Option<usize> {
        self.spans[self.pos..]
            .iter()
            .position(|s| !s.kind.is_comment())
            .map(|i| self.pos + i)
    }

    /// Look at the next significant span without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<LexicalSpan<'a>> {
        self.significant().map(|i| self.spans[i])
    }

    /// Look `n` significant spans ahead (`peek_nth(0)` is `peek`).
    #[must_use]
    pub fn peek_nth(&self, n: usize) -> Option<LexicalSpan<'a>> {
        self.spans[self.pos..]
            .iter()
            .filter(|s| !s.kind.is_comment())
            .nth(n)
            .copied()
    }

    /// Consume and return the next significant span.
    pub fn bump(&mut self) -> Option<LexicalSpan<'a>> {
        let i = self.significant()?;
        self.pos = i + 1;
        Some(self.spans[i])
    }

    /// Consume the next significant span only if the predicate accepts it.
    pub fn consume_if(&mut self, pred: impl FnOnce(&LexicalSpan<'a>) -> bool) -> Option<LexicalSpan<'a>> {
        let i = self.significant()?;
        if pred(&self.spans[i]) {
            self.pos = i + 1;
            Some(self.spans[i])
        } else {
            None
        }
    }

    #[must_use]
    pub fn at_end(&self) -> bool {
        self.significant().is_none()
    }

    #[must_use]
    pub fn at_word(&self, keyword: &str) -> bool {
        self.peek().is_some_and(|s| s.is_word(keyword))
    }

    #[must_use]
    pub fn at_symbol(&self, symbol: &str) -> bool {
        self.peek().is_some_and(|s| s.is_symbol(symbol))
    }

    pub fn eat_word(&mut self, keyword: &str) -> bool {
        self.consume_if(|s| s.is_word(keyword)).is_some()
    }

    pub fn eat_symbol(&mut self, symbol: &str) -> bool {
        self.consume_if(|s| s.is_symbol(symbol)).is_some()
    }

    /// Consume two keywords in a row, only if both are present.
    pub fn eat_words(&mut self, first: &str, second: &str) -> bool {
        if self.at_word(first) && self.peek_nth(1).is_some_and(|s| s.is_word(second)) {
            self.bump();
            self.bump();
            true
        } else {
            false
        }
    }

    pub fn expect_word(&mut self, keyword: &str) -> ForgeResult<LexicalSpan<'a>> {
        self.consume_if(|s| s.is_word(keyword))
            .ok_or_else(|| self.error_here(format!("expected {keyword}")))
    }

    pub fn expect_symbol(&mut self, symbol: &str) -> ForgeResult<LexicalSpan<'a>> {
        self.consume_if(|s| s.is_symbol(symbol))
            .ok_or_else(|| self.error_here(format!("expected `{symbol}`")))
    }

    /// The byte offset of the next significant span, or end of input.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.peek().map_or(self.src.len(), |s| s.offset)
    }

    /// A syntax error anchored at the current position.
    #[must_use]
    pub fn error_here(&self, detail: impl Into<String>) -> ForgeError {
        ForgeError::syntax(self.offset(), detail)
    }

    /// Consume a balanced `open … close` region starting at the current
    /// span and return the raw text strictly between the delimiters,
    /// comments included. Parentheses inside strings or comments never
    /// affect the nesting count: strings are single spans and comment
    /// interiors are tracked by their marker spans.
    pub fn extract_balanced(&mut self, open: &str, close: &str) -> ForgeResult<&'a str> {
        let start = self
            .significant()
            .ok_or_else(|| self.error_here(format!("expected `{open}`")))?;
        if !self.spans[start].is_symbol(open) {
            return Err(self.error_here(format!("expected `{open}`")));
        }
        let inner_start = self.spans[start].offset + self.spans[start].len();
        let mut depth = 1usize;
        let mut comment_depth = 0usize;
        for i in start + 1..self.spans.len() {
            let span = self.spans[i];
            match span.kind {
                SpanKind::CommentOpen if span.text == "/*" => comment_depth += 1,
                SpanKind::CommentClose => comment_depth = comment_depth.saturating_sub(1),
                SpanKind::Operator if comment_depth == 0 => {
                    if span.text == open {
                        depth += 1;
                    } else if span.text == close {
                        depth -= 1;
                        if depth == 0 {
                            self.pos = i + 1;
                            return Ok(&self.src[inner_start..span.offset]);
                        }
                    }
                }
                _ => {}
            }
        }
        Err(ForgeError::syntax(
            self.spans[start].offset,
            format!("unbalanced `{open}`"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(src: &str) -> Cursor<'_> {
        Cursor::new(src, Dialect::ANSI).unwrap()
    }

    #[test]
    fn navigation_skips_comments() {
        let mut c = cursor("a /* note */ b -- tail\nc");
        assert_eq!(c.bump().unwrap().text, "a");
        assert_eq!(c.bump().unwrap().text, "b");
        assert_eq!(c.bump().unwrap().text, "c");
        assert!(c.at_end());
    }

    #[test]
    fn keyword_matching_is_case_insensitive() {
        let mut c = cursor("SeLeCt x");
        assert!(c.eat_word("select"));
        assert!(c.at_word("X"));
    }

    #[test]
    fn quoted_words_never_match_keywords() {
        let c = cursor("\"select\"");
        assert!(!c.at_word("select"));
    }

    #[test]
    fn extract_balanced_handles_nesting() {
        let mut c = cursor("(a (b) c) d");
        let inner = c.extract_balanced("(", ")").unwrap();
        assert_eq!(inner.trim(), "a (b) c");
        assert_eq!(c.bump().unwrap().text, "d");
    }

    #[test]
    fn extract_balanced_ignores_parens_in_strings_and_comments() {
        let mut c = cursor("(a ')' /* ) */ b) tail");
        let inner = c.extract_balanced("(", ")").unwrap();
        assert!(inner.contains("')'"));
        assert!(inner.contains("/* ) */"));
        assert_eq!(c.bump().unwrap().text, "tail");
    }

    #[test]
    fn extract_balanced_reports_unbalanced_input() {
        let mut c = cursor("(a (b)");
        assert!(matches!(
            c.extract_balanced("(", ")"),
            Err(ForgeError::Syntax { .. })
        ));
    }

    #[test]
    fn two_word_lookahead() {
        let mut c = cursor("group by x order  by y");
        assert!(c.eat_words("group", "by"));
        assert_eq!(c.bump().unwrap().text, "x");
        assert!(c.eat_words("order", "by"));
    }
}
